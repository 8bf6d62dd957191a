//! Line level parsing and rendering shared by all section kinds.

use std::collections::HashMap;

use pest::Parser;

use crate::errors::{ParseError, SchemaViolation, ValidationError};
use crate::schema::Field;
use crate::values::{Codec, Kind, Value};
use crate::{ExchangeParser, Rule};

/// Every `key=value` and bare marker line of a span, grouped by key in source order.
///
/// Built in a single pass so fields are resolved against the map instead of rescanning the span
/// once per field.
#[derive(Debug, Default)]
pub struct Lines<'a> {
    assignments: HashMap<&'a str, Vec<&'a str>>,
    markers: HashMap<&'a str, Vec<&'a str>>,
}

impl<'a> Lines<'a> {
    pub fn scan(span: &'a str) -> Result<Lines<'a>, ParseError> {
        let mut lines = Lines::default();
        for raw_line in span.split('\n') {
            let line = raw_line.strip_suffix('\r').unwrap_or(raw_line);
            for pair in ExchangeParser::parse(Rule::line, line)? {
                match pair.as_rule() {
                    Rule::assignment => {
                        let mut inner = pair.into_inner();
                        let key = inner.next().map(|p| p.as_str()).unwrap_or_default();
                        let value = inner.next().map(|p| p.as_str()).unwrap_or_default();
                        trace!("Assignment {}={}", key, value);
                        lines.assignments.entry(key).or_default().push(value);
                    }
                    Rule::marker => {
                        let marker = pair.as_str().trim();
                        trace!("Marker {}", marker);
                        lines.markers.entry(marker).or_default().push(marker);
                    }
                    _ => (),
                }
            }
        }
        Ok(lines)
    }

    /// Raw occurrences of a field, bare lines for flags and values for everything else.
    pub fn occurrences(&self, field: &Field) -> &[&'a str] {
        let source = if field.kind == Kind::Flag {
            &self.markers
        } else {
            &self.assignments
        };
        source.get(field.key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn load<S: Slot>(&self, field: &Field) -> Result<S, ParseError> {
        S::load(field, self.occurrences(field))
    }
}

/// The storage shape of a field inside a section struct.
///
/// The shape decides multiplicity: `Option<T>` holds at most one value, `Vec<String>` holds every
/// occurrence and `bool` records a bare marker line.
pub trait Slot: Sized {
    const KIND: Kind;

    fn load(field: &Field, raw: &[&str]) -> Result<Self, ParseError>;

    /// Rendered lines, empty if there is nothing to write.
    fn render(&self, field: &Field) -> Vec<String>;

    fn to_value(&self) -> Option<Value>;

    /// `None` if the value has a different kind than the slot.
    fn from_value(value: Option<Value>) -> Option<Self>;
}

impl<T: Codec> Slot for Option<T> {
    const KIND: Kind = T::KIND;

    fn load(field: &Field, raw: &[&str]) -> Result<Self, ParseError> {
        match raw {
            [] => Ok(None),
            [single] => Ok(T::decode(single)?),
            _ => Err(SchemaViolation::new(field.key, raw.len()).into()),
        }
    }

    fn render(&self, field: &Field) -> Vec<String> {
        self.as_ref()
            .map(Codec::encode)
            .filter(|value| !value.is_empty())
            .map(|value| format!("{}={}", field.key, value))
            .into_iter()
            .collect()
    }

    fn to_value(&self) -> Option<Value> {
        self.clone().map(Codec::into_value)
    }

    fn from_value(value: Option<Value>) -> Option<Self> {
        match value {
            None => Some(None),
            Some(v) => T::from_value(v).map(Some),
        }
    }
}

impl Slot for Vec<String> {
    const KIND: Kind = Kind::List;

    fn load(_field: &Field, raw: &[&str]) -> Result<Self, ParseError> {
        let mut values = vec![];
        for item in raw {
            if let Some(value) = String::decode(item)? {
                values.push(value);
            }
        }
        Ok(values)
    }

    fn render(&self, field: &Field) -> Vec<String> {
        self.iter()
            .map(Codec::encode)
            .filter(|value| !value.is_empty())
            .map(|value| format!("{}={}", field.key, value))
            .collect()
    }

    fn to_value(&self) -> Option<Value> {
        if self.is_empty() {
            None
        } else {
            Some(Value::List(self.clone()))
        }
    }

    fn from_value(value: Option<Value>) -> Option<Self> {
        match value {
            None => Some(vec![]),
            Some(Value::List(values)) => Some(values),
            Some(_) => None,
        }
    }
}

impl Slot for bool {
    const KIND: Kind = Kind::Flag;

    fn load(field: &Field, raw: &[&str]) -> Result<Self, ParseError> {
        match raw.len() {
            0 => Ok(false),
            1 => Ok(true),
            n => Err(SchemaViolation::new(field.key, n).into()),
        }
    }

    fn render(&self, field: &Field) -> Vec<String> {
        if *self {
            vec![field.key.to_string()]
        } else {
            vec![]
        }
    }

    fn to_value(&self) -> Option<Value> {
        if *self {
            Some(Value::Flag)
        } else {
            None
        }
    }

    fn from_value(value: Option<Value>) -> Option<Self> {
        match value {
            None => Some(false),
            Some(Value::Flag) => Some(true),
            Some(_) => None,
        }
    }
}

/// Render one field into `out`.
///
/// With `validate`, a field required towards the bank that renders to nothing is an error.
/// Flags are never validated.
pub fn render<S: Slot>(
    field: &Field,
    slot: &S,
    validate: bool,
    out: &mut Vec<String>,
) -> Result<(), ValidationError> {
    let rendered = slot.render(field);
    if validate && rendered.is_empty() && field.kind != Kind::Flag && field.is_required_to_bank()
    {
        return Err(ValidationError::missing(field));
    }
    out.extend(rendered);
    Ok(())
}
