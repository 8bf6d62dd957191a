//! Semantic value types and the codecs moving them in and out of raw text tokens.

use chrono::prelude::*;
use rust_decimal::Decimal;

use crate::errors::FormatError;
use crate::utils::{
    date_from_exchange_date, decimal_from_exchange_amount, time_from_exchange_time, DATE_FORMAT,
    TIME_FORMAT,
};

/// The semantic type of a field.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Display)]
pub enum Kind {
    #[strum(serialize = "text")]
    Text,
    #[strum(serialize = "date")]
    Date,
    #[strum(serialize = "time")]
    Time,
    #[strum(serialize = "amount")]
    Amount,
    /// A bare keyword line, its presence is the whole value.
    #[strum(serialize = "flag")]
    Flag,
    /// Zero or more occurrences of the same key, in source order.
    #[strum(serialize = "list")]
    List,
}

/// A decoded field value detached from its section.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Text(String),
    Date(NaiveDate),
    Time(NaiveTime),
    Amount(Decimal),
    Flag,
    List(Vec<String>),
}

impl Value {
    pub fn kind(&self) -> Kind {
        match self {
            Value::Text(_) => Kind::Text,
            Value::Date(_) => Kind::Date,
            Value::Time(_) => Kind::Time,
            Value::Amount(_) => Kind::Amount,
            Value::Flag => Kind::Flag,
            Value::List(_) => Kind::List,
        }
    }
}

/// Bidirectional conversion between a single raw token and a typed value.
///
/// `decode` yields `Ok(None)` for blank tokens. `encode` never emits grouping or padding beyond
/// the fixed format of the type.
pub trait Codec: Sized + Clone {
    const KIND: Kind;

    fn decode(raw: &str) -> Result<Option<Self>, FormatError>;

    fn encode(&self) -> String;

    fn into_value(self) -> Value;

    fn from_value(value: Value) -> Option<Self>;
}

impl Codec for String {
    const KIND: Kind = Kind::Text;

    fn decode(raw: &str) -> Result<Option<Self>, FormatError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            Ok(None)
        } else {
            Ok(Some(trimmed.to_string()))
        }
    }

    /// Line breaks inside the value are joined with a space, a value always fits on its line.
    fn encode(&self) -> String {
        let trimmed = self.trim();
        if !trimmed.contains(is_line_break) {
            return trimmed.to_string();
        }
        warn!("Text '{}' spans several lines, joining them", trimmed);
        let parts: Vec<&str> = trimmed
            .split(is_line_break)
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect();
        parts.join(" ")
    }

    fn into_value(self) -> Value {
        Value::Text(self)
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }
}

fn is_line_break(c: char) -> bool {
    c == '\n' || c == '\r'
}

impl Codec for NaiveDate {
    const KIND: Kind = Kind::Date;

    fn decode(raw: &str) -> Result<Option<Self>, FormatError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        date_from_exchange_date(trimmed).map(Some)
    }

    fn encode(&self) -> String {
        self.format(DATE_FORMAT).to_string()
    }

    fn into_value(self) -> Value {
        Value::Date(self)
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Date(d) => Some(d),
            _ => None,
        }
    }
}

impl Codec for NaiveTime {
    const KIND: Kind = Kind::Time;

    fn decode(raw: &str) -> Result<Option<Self>, FormatError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        time_from_exchange_time(trimmed).map(Some)
    }

    fn encode(&self) -> String {
        self.format(TIME_FORMAT).to_string()
    }

    fn into_value(self) -> Value {
        Value::Time(self)
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Time(t) => Some(t),
            _ => None,
        }
    }
}

impl Codec for Decimal {
    const KIND: Kind = Kind::Amount;

    fn decode(raw: &str) -> Result<Option<Self>, FormatError> {
        if raw.trim().is_empty() {
            return Ok(None);
        }
        decimal_from_exchange_amount(raw).map(Some)
    }

    fn encode(&self) -> String {
        self.to_string()
    }

    fn into_value(self) -> Value {
        Value::Amount(self)
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Amount(a) => Some(a),
            _ => None,
        }
    }
}
