//! The section kinds of the exchange format.
//!
//! Field order within each declaration is the order lines are written in.

use chrono::prelude::*;
use rust_decimal::Decimal;
use std::fmt;

use crate::extract::Extractor;
use crate::schema::Section;

section! {
    /// File header: format, version, encoding, sender and receiver programs and the conditions
    /// the transferred data was selected by.
    pub struct Header: Header {
        format_name: bool = ("1CClientBankExchange", "Внутренний признак файла обмена", BOTH),
        format_version: Option<String> = ("ВерсияФормата", "Номер версии формата обмена", BOTH),
        encoding: Option<String> = ("Кодировка", "Кодировка файла", BOTH),
        sender: Option<String> = ("Отправитель", "Программа-отправитель", TO_BANK),
        receiver: Option<String> = ("Получатель", "Программа-получатель", FROM_BANK),
        creation_date: Option<NaiveDate> = ("ДатаСоздания", "Дата формирования файла", NONE),
        creation_time: Option<NaiveTime> = ("ВремяСоздания", "Время формирования файла", NONE),
        filter_date_since: Option<NaiveDate> = ("ДатаНачала", "Дата начала интервала", BOTH),
        filter_date_till: Option<NaiveDate> = ("ДатаКонца", "Дата конца интервала", BOTH),
        filter_account_numbers: Vec<String> = ("РасчСчет", "Расчетный счет организации", BOTH),
        filter_document_types: Vec<String> = ("Документ", "Вид документа", NONE),
    }
}

impl Header {
    /// The header is whatever precedes the first section.
    pub const EXTRACTOR: Extractor = Extractor::Preamble { until: "Секция" };
}

section! {
    /// Balances and turnovers of a settlement account.
    pub struct Balance: Balance {
        date_since: Option<NaiveDate> = ("ДатаНачала", "Дата начала интервала", FROM_BANK),
        date_till: Option<NaiveDate> = ("ДатаКонца", "Дата конца интервала", NONE),
        account_number: Option<String> = ("РасчСчет", "Расчетный счет организации", FROM_BANK),
        initial_balance: Option<Decimal> = ("НачальныйОстаток", "Начальный остаток", FROM_BANK),
        total_income: Option<Decimal> = ("ВсегоПоступило", "Обороты входящих платежей", NONE),
        total_expense: Option<Decimal> = ("ВсегоСписано", "Обороты исходящих платежей", NONE),
        final_balance: Option<Decimal> = ("КонечныйОстаток", "Конечный остаток", NONE),
    }
}

impl Balance {
    pub const EXTRACTOR: Extractor = Extractor::Anchored {
        begin: "СекцияРасчСчет",
        end: Some("КонецРасчСчет"),
        keep_begin: false,
    };

    /// The balance block including its begin and end markers.
    pub fn to_block(&self, validate: bool) -> Result<String, crate::errors::ValidationError> {
        Ok(Self::EXTRACTOR
            .enclose(self.render_lines(validate)?)
            .join("\n"))
    }
}

section! {
    /// Bank receipt for a payment document.
    pub struct Receipt: Receipt {
        date: Option<NaiveDate> = ("КвитанцияДата", "Дата формирования квитанции", NONE),
        time: Option<NaiveTime> = ("КвитанцияВремя", "Время формирования квитанции", NONE),
        content: Option<String> = ("КвитанцияСодержание", "Содержание квитанции", NONE),
    }
}

section! {
    /// The paying party and its bank.
    pub struct Payer: Payer {
        account: Option<String> = ("ПлательщикСчет", "Расчетный счет плательщика", BOTH),
        date_charged: Option<NaiveDate> = ("ДатаСписано", "Дата списания средств с р/с", FROM_BANK),
        name: Option<String> = ("Плательщик", "Плательщик", TO_BANK),
        inn: Option<String> = ("ПлательщикИНН", "ИНН плательщика", BOTH),
        l1_name: Option<String> = ("Плательщик1", "Наименование плательщика, стр. 1", TO_BANK),
        l2_account_number: Option<String> = ("Плательщик2", "Наименование плательщика, стр. 2", NONE),
        l3_bank: Option<String> = ("Плательщик3", "Наименование плательщика, стр. 3", NONE),
        l4_city: Option<String> = ("Плательщик4", "Наименование плательщика, стр. 4", NONE),
        account_number: Option<String> = ("ПлательщикРасчСчет", "Расчетный счет плательщика", TO_BANK),
        bank_1_name: Option<String> = ("ПлательщикБанк1", "Банк плательщика", TO_BANK),
        bank_2_city: Option<String> = ("ПлательщикБанк2", "Город банка плательщика", TO_BANK),
        bank_bic: Option<String> = ("ПлательщикБИК", "БИК банка плательщика", TO_BANK),
        bank_corr_account: Option<String> = ("ПлательщикКорсчет", "Корсчет банка плательщика", TO_BANK),
    }
}

section! {
    /// The receiving party and its bank.
    pub struct Receiver: Receiver {
        account: Option<String> = ("ПолучательСчет", "Расчетный счет получателя", BOTH),
        date_received: Option<NaiveDate> = ("ДатаПоступило", "Дата поступления средств на р/с", FROM_BANK),
        name: Option<String> = ("Получатель", "Получатель", TO_BANK),
        inn: Option<String> = ("ПолучательИНН", "ИНН получателя", BOTH),
        l1_name: Option<String> = ("Получатель1", "Наименование получателя", TO_BANK),
        l2_account_number: Option<String> = ("Получатель2", "Наименование получателя, стр. 2", NONE),
        l3_bank: Option<String> = ("Получатель3", "Наименование получателя, стр. 3", NONE),
        l4_city: Option<String> = ("Получатель4", "Наименование получателя, стр. 4", NONE),
        account_number: Option<String> = ("ПолучательРасчСчет", "Расчетный счет получателя", TO_BANK),
        bank_1_name: Option<String> = ("ПолучательБанк1", "Банк получателя", TO_BANK),
        bank_2_city: Option<String> = ("ПолучательБанк2", "Город банка получателя", TO_BANK),
        bank_bic: Option<String> = ("ПолучательБИК", "БИК банка получателя", TO_BANK),
        bank_corr_account: Option<String> = ("ПолучательКорсчет", "Корсчет банка получателя", TO_BANK),
    }
}

section! {
    /// Payment kind and purpose.
    pub struct Payment: Payment {
        payment_type: Option<String> = ("ВидПлатежа", "Вид платежа", NONE),
        operation_type: Option<String> = ("ВидОплаты", "Вид оплаты (вид операции)", TO_BANK),
        code: Option<String> = ("Код", "Уникальный идентификатор платежа", NONE),
        purpose: Option<String> = ("НазначениеПлатежа", "Назначение платежа", NONE),
        purpose_l1: Option<String> = ("НазначениеПлатежа1", "Назначение платежа, стр. 1", NONE),
        purpose_l2: Option<String> = ("НазначениеПлатежа2", "Назначение платежа, стр. 2", NONE),
        purpose_l3: Option<String> = ("НазначениеПлатежа3", "Назначение платежа, стр. 3", NONE),
        purpose_l4: Option<String> = ("НазначениеПлатежа4", "Назначение платежа, стр. 4", NONE),
        purpose_l5: Option<String> = ("НазначениеПлатежа5", "Назначение платежа, стр. 5", NONE),
        purpose_l6: Option<String> = ("НазначениеПлатежа6", "Назначение платежа, стр. 6", NONE),
    }
}

section! {
    /// Additional details of payments into the budget system.
    pub struct Tax: Tax {
        originator_status: Option<String> = ("СтатусСоставителя", "Статус составителя расчетного документа", BOTH),
        payer_kpp: Option<String> = ("ПлательщикКПП", "КПП плательщика", BOTH),
        receiver_kpp: Option<String> = ("ПолучательКПП", "КПП получателя", BOTH),
        kbk: Option<String> = ("ПоказательКБК", "Показатель кода бюджетной классификации", BOTH),
        okato: Option<String> = ("ОКАТО", "Код ОКТМО территории, на которой мобилизуются денежные средства от уплаты налога, сбора и иного платежа", BOTH),
        basis: Option<String> = ("ПоказательОснования", "Показатель основания налогового платежа", BOTH),
        period: Option<String> = ("ПоказательПериода", "Показатель налогового периода / Код таможенного органа", BOTH),
        number: Option<String> = ("ПоказательНомера", "Показатель номера документа", BOTH),
        date: Option<String> = ("ПоказательДаты", "Показатель даты документа", BOTH),
        payment_type: Option<String> = ("ПоказательТипа", "Показатель типа платежа", NONE),
    }
}

section! {
    /// Additional details of particular document kinds (letters of credit, collection orders).
    pub struct Special: Special {
        priority: Option<String> = ("Очередность", "Очередность платежа", NONE),
        term_of_acceptance: Option<String> = ("СрокАкцепта", "Срок акцепта, количество дней", NONE),
        letter_of_credit_type: Option<String> = ("ВидАккредитива", "Вид аккредитива", NONE),
        maturity: Option<String> = ("СрокПлатежа", "Срок платежа (аккредитива)", NONE),
        payment_condition_1: Option<String> = ("УсловиеОплаты1", "Условие оплаты, стр. 1", NONE),
        payment_condition_2: Option<String> = ("УсловиеОплаты2", "Условие оплаты, стр. 2", NONE),
        payment_condition_3: Option<String> = ("УсловиеОплаты3", "Условие оплаты, стр. 3", NONE),
        by_submission: Option<String> = ("ПлатежПоПредст", "Платеж по представлению", NONE),
        extra_conditions: Option<String> = ("ДополнУсловия", "Дополнительные условия", NONE),
        supplier_account_number: Option<String> = ("НомерСчетаПоставщика", "№ счета поставщика", NONE),
        docs_sent_date: Option<String> = ("ДатаОтсылкиДок", "Дата отсылки документов", NONE),
    }
}

macro_rules! display_section {
    ($($name:ident),*) => {
        $(
            impl fmt::Display for $name {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    let text = self.to_text(false).map_err(|_| fmt::Error)?;
                    f.write_str(&text)
                }
            }
        )*
    };
}

display_section!(Header, Receipt, Payer, Receiver, Payment, Tax, Special);

impl fmt::Display for Balance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = self.to_block(false).map_err(|_| fmt::Error)?;
        f.write_str(&text)
    }
}
