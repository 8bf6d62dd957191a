//! Payment documents: a few flat fields plus the sub-sections sharing the document's span.

use chrono::prelude::*;
use rust_decimal::Decimal;
use std::fmt;

use crate::engine::Lines;
use crate::errors::{ParseError, ValidationError};
use crate::extract::Extractor;
use crate::schema::Section;
use crate::sections::{Payer, Payment, Receipt, Receiver, Special, Tax};

const DOCUMENT_BEGIN: &str = "СекцияДокумент";

section! {
    /// A payment document.
    ///
    /// The begin line doubles as the document type, e.g. `СекцияДокумент=Платежное поручение`.
    pub struct Document: Document {
        document_type: Option<String> = ("СекцияДокумент", "Вид документа", NONE),
        number: Option<String> = ("Номер", "Номер документа", BOTH),
        date: Option<NaiveDate> = ("Дата", "Дата документа", BOTH),
        amount: Option<Decimal> = ("Сумма", "Сумма платежа", BOTH),
    }
    embeds {
        receipt: Receipt,
        payer: Payer,
        receiver: Receiver,
        payment: Payment,
        tax: Tax,
        special: Special,
    }
}

impl Document {
    pub const EXTRACTOR: Extractor = Extractor::Anchored {
        begin: DOCUMENT_BEGIN,
        end: Some("КонецДокумента"),
        keep_begin: true,
    };

    /// Parse every document found in `text`, in source order.
    pub fn parse_all(text: &str) -> Result<Vec<Document>, ParseError> {
        Self::EXTRACTOR
            .extract(text)
            .into_iter()
            .map(Document::parse_span)
            .collect()
    }

    /// Parse a single document span, sub-sections included.
    ///
    /// Sub-sections are always attached, with all attributes absent if nothing matched. The
    /// receipt is the exception and stays `None` unless the bank sent one.
    pub fn parse_span(span: &str) -> Result<Document, ParseError> {
        let lines = Lines::scan(span)?;
        let mut document = Document::from_lines(&lines)?;

        let receipt = Receipt::from_lines(&lines)?;
        document.receipt = if receipt.is_empty() {
            None
        } else {
            Some(receipt)
        };
        document.payer = Some(Payer::from_lines(&lines)?);
        document.receiver = Some(Receiver::from_lines(&lines)?);
        document.payment = Some(Payment::from_lines(&lines)?);
        document.tax = Some(Tax::from_lines(&lines)?);
        document.special = Some(Special::from_lines(&lines)?);

        debug!(
            "Parsed document {} from {}",
            document.number.as_deref().unwrap_or("<no number>"),
            document
                .date
                .map(|d| d.to_string())
                .unwrap_or_else(|| "<no date>".to_string())
        );
        Ok(document)
    }

    /// Render the document: flat fields, then receipt, payer, receiver, payment, tax and special
    /// details, then the end marker.
    ///
    /// A sub-section with all attributes absent renders nothing and is not validated, it stands
    /// for a document that doesn't use those details. Without a document type the begin line is
    /// written as a bare marker.
    pub fn to_block(&self, validate: bool) -> Result<String, ValidationError> {
        let mut lines = self.render_lines(validate)?;
        if self.document_type.as_deref().map_or(true, |t| t.trim().is_empty()) {
            lines.insert(0, DOCUMENT_BEGIN.to_string());
        }
        render_sub_section(&self.receipt, validate, &mut lines)?;
        render_sub_section(&self.payer, validate, &mut lines)?;
        render_sub_section(&self.receiver, validate, &mut lines)?;
        render_sub_section(&self.payment, validate, &mut lines)?;
        render_sub_section(&self.tax, validate, &mut lines)?;
        render_sub_section(&self.special, validate, &mut lines)?;
        Ok(Self::EXTRACTOR.enclose(lines).join("\n"))
    }

    /// BIC of the payer's bank, if the document has one.
    pub fn payer_bic(&self) -> Option<&str> {
        self.payer.as_ref().and_then(|p| p.bank_bic.as_deref())
    }

    pub fn payer_account_number(&self) -> Option<&str> {
        self.payer
            .as_ref()
            .and_then(|p| p.account_number.as_deref())
    }
}

fn render_sub_section<S: Section>(
    section: &Option<S>,
    validate: bool,
    out: &mut Vec<String>,
) -> Result<(), ValidationError> {
    match section {
        Some(section) if !section.is_empty() => {
            out.extend(section.render_lines(validate)?);
            Ok(())
        }
        _ => Ok(()),
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = self.to_block(false).map_err(|_| fmt::Error)?;
        f.write_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    use super::*;
    use crate::errors::SchemaViolation;

    fn outbound_document() -> Document {
        Document {
            document_type: Some("Платежное поручение".to_string()),
            number: Some("42".to_string()),
            date: NaiveDate::from_ymd_opt(2019, 3, 15),
            amount: Some(Decimal::from_str("15000.50").unwrap()),
            receipt: None,
            payer: Some(Payer {
                account: Some("40702810400000000001".to_string()),
                name: Some("ИНН 7701000001 ООО Ромашка".to_string()),
                inn: Some("7701000001".to_string()),
                l1_name: Some("ООО Ромашка".to_string()),
                account_number: Some("40702810400000000001".to_string()),
                bank_1_name: Some("ПАО СБЕРБАНК".to_string()),
                bank_2_city: Some("г. Москва".to_string()),
                bank_bic: Some("044525225".to_string()),
                bank_corr_account: Some("30101810400000000225".to_string()),
                ..Payer::default()
            }),
            receiver: Some(Receiver {
                account: Some("40702810900000000002".to_string()),
                name: Some("ИНН 7702000002 АО Лютик".to_string()),
                inn: Some("7702000002".to_string()),
                l1_name: Some("АО Лютик".to_string()),
                account_number: Some("40702810900000000002".to_string()),
                bank_1_name: Some("АО АЛЬФА-БАНК".to_string()),
                bank_2_city: Some("г. Москва".to_string()),
                bank_bic: Some("044525593".to_string()),
                bank_corr_account: Some("30101810200000000593".to_string()),
                ..Receiver::default()
            }),
            payment: Some(Payment {
                operation_type: Some("01".to_string()),
                purpose: Some("Оплата по счету 17 от 01.03.2019, НДС не облагается".to_string()),
                ..Payment::default()
            }),
            tax: Some(Tax {
                originator_status: Some("01".to_string()),
                payer_kpp: Some("770101001".to_string()),
                receiver_kpp: Some("770201001".to_string()),
                kbk: Some("18210102010011000110".to_string()),
                okato: Some("45382000".to_string()),
                basis: Some("ТП".to_string()),
                period: Some("МС.02.2019".to_string()),
                number: Some("0".to_string()),
                date: Some("0".to_string()),
                ..Tax::default()
            }),
            special: Some(Special {
                priority: Some("5".to_string()),
                ..Special::default()
            }),
        }
    }

    #[test]
    fn document_survives_a_round_trip() {
        let document = outbound_document();
        let text = document.to_block(true).unwrap();
        let parsed = Document::parse_span(&text).unwrap();
        assert_eq!(parsed, document);
        assert_eq!(parsed.to_block(true).unwrap(), text);
    }

    #[test]
    fn document_renders_sub_sections_in_fixed_order() {
        let text = outbound_document().to_block(true).unwrap();
        let position = |key: &str| {
            text.lines()
                .position(|line| line.starts_with(key))
                .unwrap()
        };
        assert_eq!(position("СекцияДокумент="), 0);
        assert!(position("Сумма=") < position("ПлательщикСчет="));
        assert!(position("ПлательщикКорсчет=") < position("ПолучательСчет="));
        assert!(position("ПолучательКорсчет=") < position("ВидОплаты="));
        assert!(position("НазначениеПлатежа=") < position("СтатусСоставителя="));
        assert!(position("ПоказательДаты=") < position("Очередность="));
        assert_eq!(text.lines().last(), Some("КонецДокумента"));
        assert!(!text.contains("\n\n"));
    }

    #[test]
    fn missing_sub_section_fields_fail_validation() {
        let mut document = outbound_document();
        if let Some(tax) = document.tax.as_mut() {
            tax.kbk = None;
        }
        assert_eq!(
            document.to_block(true),
            Err(ValidationError::MissingRequired {
                key: "ПоказательКБК",
                description: "Показатель кода бюджетной классификации",
            })
        );
        assert!(document.to_block(false).is_ok());
    }

    #[test]
    fn document_without_tax_details_validates_again_after_parsing() {
        let document = Document {
            tax: None,
            ..outbound_document()
        };
        let text = document.to_block(true).unwrap();
        assert!(!text.contains("СтатусСоставителя"));

        let parsed = Document::parse_span(&text).unwrap();
        assert_eq!(parsed.tax, Some(Tax::default()));
        assert_eq!(parsed.to_block(true).unwrap(), text);
    }

    #[test]
    fn partially_filled_sub_section_is_still_validated() {
        let mut document = outbound_document();
        document.tax = Some(Tax {
            payer_kpp: Some("770101001".to_string()),
            ..Tax::default()
        });
        assert_eq!(
            document.to_block(true),
            Err(ValidationError::MissingRequired {
                key: "СтатусСоставителя",
                description: "Статус составителя расчетного документа",
            })
        );
    }

    #[test]
    fn untyped_document_keeps_its_begin_line() {
        let document = Document {
            document_type: None,
            ..outbound_document()
        };
        let text = document.to_block(true).unwrap();
        assert_eq!(text.lines().next(), Some("СекцияДокумент"));

        let documents = Document::parse_all(&format!("{}\nКонецФайла", text)).unwrap();
        assert_eq!(documents.len(), 1);
        assert_eq!(documents[0].document_type, None);
        assert_eq!(documents[0].number.as_deref(), Some("42"));
        assert_eq!(documents[0].to_block(true).unwrap(), text);
    }

    #[test]
    fn multi_line_purpose_cannot_inject_fields() {
        let mut document = outbound_document();
        if let Some(payment) = document.payment.as_mut() {
            payment.purpose = Some("Оплата по счету 17\nНомер=9".to_string());
        }
        let text = document.to_block(true).unwrap();
        assert!(text.contains("\nНазначениеПлатежа=Оплата по счету 17 Номер=9\n"));

        let parsed = Document::parse_span(&text).unwrap();
        assert_eq!(parsed.number.as_deref(), Some("42"));
        assert_eq!(
            parsed.payment.unwrap().purpose.as_deref(),
            Some("Оплата по счету 17 Номер=9")
        );
    }

    #[test]
    fn receipt_is_only_attached_when_present() {
        let span = "СекцияДокумент=Платежное поручение\n\
                    Номер=7\n\
                    КвитанцияДата=16.03.2019\n\
                    КвитанцияВремя=09:30:00\n\
                    КвитанцияСодержание=Исполнено\n";
        let document = Document::parse_span(span).unwrap();
        let receipt = document.receipt.unwrap();
        assert_eq!(receipt.content.as_deref(), Some("Исполнено"));
        assert_eq!(receipt.date, NaiveDate::from_ymd_opt(2019, 3, 16));

        let document = Document::parse_span("СекцияДокумент=Платежное поручение\nНомер=8").unwrap();
        assert_eq!(document.receipt, None);
        assert_eq!(document.payer, Some(Payer::default()));
        assert_eq!(document.special, Some(Special::default()));
    }

    #[test]
    fn repeated_document_field_is_rejected() {
        let span = "СекцияДокумент=Платежное поручение\nНомер=1\nНомер=2\n";
        assert_eq!(
            Document::parse_span(span),
            Err(ParseError::SchemaViolation(SchemaViolation::new("Номер", 2)))
        );
    }

    #[test]
    fn all_documents_are_found() {
        let text = format!(
            "{}\n\n{}\n\nКонецФайла",
            outbound_document().to_block(true).unwrap(),
            Document {
                number: Some("43".to_string()),
                ..outbound_document()
            }
            .to_block(true)
            .unwrap()
        );
        let documents = Document::parse_all(&text).unwrap();
        let numbers: Vec<_> = documents.iter().map(|d| d.number.as_deref()).collect();
        assert_eq!(numbers, vec![Some("42"), Some("43")]);
    }
}
