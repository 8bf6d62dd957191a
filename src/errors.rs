use thiserror::Error;

use crate::schema::{Field, SectionKind};
use crate::values::Kind;
use crate::Rule;

/// Error thrown when a value token can't be decoded into its semantic type.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum FormatError {
    #[error("Date '{0}' doesn't match the DD.MM.YYYY format")]
    Date(String),

    #[error("Date parsing failed for date: '{year}-{month}-{day}'")]
    DateOutOfRange {
        year: String,
        month: String,
        day: String,
    },

    #[error("Time '{0}' doesn't match the HH:MM:SS format")]
    Time(String),

    #[error("Time parsing failed for time: '{hour}:{minute}:{second}'")]
    TimeOutOfRange {
        hour: String,
        minute: String,
        second: String,
    },

    #[error("Couldn't parse amount: '{0}'")]
    Amount(String),
}

/// Error thrown when a single-valued key occurs more than once within a section.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
#[error("Key '{key}' must occur at most once per section but was found {occurrences} times.")]
pub struct SchemaViolation {
    key: String,
    occurrences: usize,
}

impl SchemaViolation {
    pub fn new(key: &str, occurrences: usize) -> SchemaViolation {
        SchemaViolation {
            key: key.to_string(),
            occurrences,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

/// Error thrown when parsing fails.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum ParseError {
    #[error("Pest parsing error: {0}")]
    PestParseError(pest::error::Error<Rule>),

    #[error("{0}")]
    FormatError(FormatError),

    #[error("{0}")]
    SchemaViolation(SchemaViolation),
}

impl From<pest::error::Error<Rule>> for ParseError {
    fn from(err: pest::error::Error<Rule>) -> ParseError {
        ParseError::PestParseError(err)
    }
}

impl From<FormatError> for ParseError {
    fn from(err: FormatError) -> ParseError {
        ParseError::FormatError(err)
    }
}

impl From<SchemaViolation> for ParseError {
    fn from(err: SchemaViolation) -> ParseError {
        ParseError::SchemaViolation(err)
    }
}

/// Error thrown when a section or statement can't be serialized for the bank.
///
/// Serialization aborts on the first of these, so no partial output is ever returned.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum ValidationError {
    #[error("Attribute '{key}' ({description}) is required when sending to the bank but has no value.")]
    MissingRequired {
        key: &'static str,
        description: &'static str,
    },

    #[error("A statement for the bank needs at least one document.")]
    NoDocuments,

    #[error("A statement for the bank must only contain payments drawn on one bank, found BICs {bics:?}.")]
    MultipleBanks { bics: Vec<Option<String>> },
}

impl ValidationError {
    pub fn missing(field: &Field) -> ValidationError {
        ValidationError::MissingRequired {
            key: field.key,
            description: field.description,
        }
    }
}

/// Error thrown when a section attribute is accessed by name.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum AttributeError {
    #[error("Section '{section}' has no attribute '{attribute}'.")]
    Unknown {
        section: SectionKind,
        attribute: String,
    },

    #[error("Attribute '{attribute}' of section '{section}' holds {expected} values.")]
    KindMismatch {
        section: SectionKind,
        attribute: String,
        expected: Kind,
    },
}
