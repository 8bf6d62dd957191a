extern crate pest;
#[macro_use]
extern crate pest_derive;

#[macro_use]
extern crate log;

extern crate strum;
#[macro_use]
extern crate strum_macros;

extern crate serde;
extern crate serde_json;

#[macro_use]
extern crate serde_derive;

extern crate chrono;
extern crate rust_decimal;

#[macro_use]
mod schema;

mod document;
mod engine;
mod errors;
mod extract;
pub mod sanitizers;
mod sections;
mod utils;
mod values;

use chrono::prelude::*;
use rust_decimal::Decimal;
use std::fmt;

pub use crate::document::Document;
pub use crate::engine::{Lines, Slot};
pub use crate::errors::{
    AttributeError, FormatError, ParseError, SchemaViolation, ValidationError,
};
pub use crate::extract::Extractor;
pub use crate::schema::{Field, Required, Section, SectionKind};
pub use crate::sections::{Balance, Header, Payer, Payment, Receipt, Receiver, Special, Tax};
pub use crate::utils::{
    date_from_exchange_date, decimal_from_exchange_amount, time_from_exchange_time,
};
pub use crate::values::{Codec, Kind, Value};

#[derive(Parser)]
#[grammar = "exchange.pest"]
pub struct ExchangeParser;

/// Format version written into statements built for the bank.
pub const FORMAT_VERSION: &str = "1.02";

/// Encoding name written into statements built for the bank.
pub const ENCODING: &str = "Windows";

/// Last line of every exchange file.
pub const END_OF_FILE: &str = "КонецФайла";

/// A complete exchange file: header, optional account balance and payment documents.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Statement {
    pub header: Header,
    pub balance: Option<Balance>,
    pub documents: Vec<Document>,
}

impl Statement {
    /// Construct a `Statement` from the full text of an exchange file.
    ///
    /// The text must already be decoded, picking the encoding is up to the caller.
    pub fn parse(text: &str) -> Result<Statement, ParseError> {
        let header = match Header::EXTRACTOR.extract_one(text) {
            Some(span) => Header::from_text(span)?,
            None => Header::default(),
        };
        let balance = match Balance::EXTRACTOR.extract_one(text) {
            Some(span) => Some(Balance::from_text(span)?),
            None => None,
        };
        let documents = Document::parse_all(text)?;
        debug!(
            "Parsed statement with {} balance and {} documents",
            if balance.is_some() { "a" } else { "no" },
            documents.len()
        );
        Ok(Statement {
            header,
            balance,
            documents,
        })
    }

    /// Build a statement for uploading `documents` to the bank.
    ///
    /// All documents must be drawn on the same bank. The header gets the current local time as
    /// its creation timestamp.
    pub fn from_documents(
        sender: &str,
        documents: Vec<Document>,
    ) -> Result<Statement, ValidationError> {
        Statement::from_documents_at(sender, documents, Local::now().naive_local())
    }

    /// Like `from_documents` with an explicit creation timestamp.
    pub fn from_documents_at(
        sender: &str,
        documents: Vec<Document>,
        created_at: NaiveDateTime,
    ) -> Result<Statement, ValidationError> {
        let mut bics: Vec<Option<&str>> = documents.iter().map(Document::payer_bic).collect();
        bics.sort_unstable();
        bics.dedup();
        match bics.len() {
            0 => return Err(ValidationError::NoDocuments),
            1 => (),
            _ => {
                return Err(ValidationError::MultipleBanks {
                    bics: bics.into_iter().map(|b| b.map(String::from)).collect(),
                })
            }
        }

        let dates = documents.iter().filter_map(|d| d.date);
        let filter_date_since = dates.clone().min();
        let filter_date_till = dates.max();

        let mut filter_account_numbers: Vec<String> = vec![];
        for account in documents.iter().filter_map(Document::payer_account_number) {
            if !filter_account_numbers.iter().any(|a| a == account) {
                filter_account_numbers.push(account.to_string());
            }
        }

        let header = Header {
            format_name: true,
            format_version: Some(FORMAT_VERSION.to_string()),
            encoding: Some(ENCODING.to_string()),
            sender: Some(sender.to_string()),
            creation_date: Some(created_at.date()),
            creation_time: created_at.time().with_nanosecond(0),
            filter_date_since,
            filter_date_till,
            filter_account_numbers,
            ..Header::default()
        };

        Ok(Statement {
            header,
            balance: None,
            documents,
        })
    }

    /// Serialize into the exchange format.
    ///
    /// With `validate`, every field required when sending to the bank has to be present. Blocks
    /// are separated by a blank line and the text ends with the end-of-file marker.
    pub fn to_text(&self, validate: bool) -> Result<String, ValidationError> {
        let mut blocks = vec![self.header.to_text(validate)?];
        if let Some(balance) = &self.balance {
            blocks.push(balance.to_block(validate)?);
        }
        for document in &self.documents {
            blocks.push(document.to_block(validate)?);
        }
        blocks.push(END_OF_FILE.to_string());
        blocks.retain(|block| !block.is_empty());
        Ok(blocks.join("\n\n"))
    }

    /// Number of documents.
    pub fn count(&self) -> usize {
        self.documents.len()
    }

    /// Sum of all document amounts. Documents without an amount count as zero.
    pub fn total_amount(&self) -> Decimal {
        self.documents
            .iter()
            .filter_map(|d| d.amount)
            .fold(Decimal::ZERO, |total, amount| total + amount)
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = self.to_text(false).map_err(|_| fmt::Error)?;
        f.write_str(&text)
    }
}

/// Parse the full text of an exchange file.
pub fn parse_statement(text: &str) -> Result<Statement, ParseError> {
    Statement::parse(text)
}
