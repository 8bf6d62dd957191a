use chrono::prelude::*;
use pest::Parser;
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::errors::FormatError;
use crate::ExchangeParser;
use crate::Rule;

pub const DATE_FORMAT: &str = "%d.%m.%Y";
pub const TIME_FORMAT: &str = "%H:%M:%S";

/// Create a `Decimal` from an exchange amount.
///
/// Amounts are supposed to be plain `rub[.kop]` but in practice they arrive with thousands
/// grouping (`1'234`, `1 234`) and with a comma as decimal separator. Everything but digits,
/// commas, periods and minus signs is dropped, commas become periods and if several periods
/// remain, only the last one is kept as the decimal point.
pub fn decimal_from_exchange_amount(s: &str) -> Result<Decimal, FormatError> {
    let normalized: String = s
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, ',' | '.' | '-'))
        .map(|c| if c == ',' { '.' } else { c })
        .collect();

    if !normalized.chars().any(|c| c.is_ascii_digit()) {
        return Err(FormatError::Amount(s.to_string()));
    }

    let collapsed = match normalized.rfind('.') {
        Some(last) if normalized[..last].contains('.') => {
            warn!(
                "Amount '{}' has several decimal point candidates, keeping only the last one",
                s
            );
            let integer_part: String = normalized[..last].chars().filter(|&c| c != '.').collect();
            format!("{}{}", integer_part, &normalized[last..])
        }
        _ => normalized,
    };

    Decimal::from_str(&collapsed).map_err(|_| FormatError::Amount(s.to_string()))
}

/// Create a `NaiveDate` from an exchange date.
///
/// Dates are always given as `DD.MM.YYYY`, anything else is rejected.
pub fn date_from_exchange_date(s: &str) -> Result<NaiveDate, FormatError> {
    let parsed_date = ExchangeParser::parse(Rule::date_token, s)
        .map_err(|_| FormatError::Date(s.to_string()))?
        .next()
        .ok_or_else(|| FormatError::Date(s.to_string()))?
        .into_inner();
    let mut year = "";
    let mut month = "";
    let mut day = "";
    for p in parsed_date {
        match p.as_rule() {
            Rule::year => year = p.as_str(),
            Rule::month => month = p.as_str(),
            Rule::day => day = p.as_str(),
            _ => (),
        }
    }
    let out_of_range = || FormatError::DateOutOfRange {
        year: year.to_string(),
        month: month.to_string(),
        day: day.to_string(),
    };
    let (y, m, d) = match (year.parse::<i32>(), month.parse::<u32>(), day.parse::<u32>()) {
        (Ok(y), Ok(m), Ok(d)) => (y, m, d),
        _ => return Err(out_of_range()),
    };
    NaiveDate::from_ymd_opt(y, m, d).ok_or_else(out_of_range)
}

/// Create a `NaiveTime` from an exchange time given as `HH:MM:SS`.
pub fn time_from_exchange_time(s: &str) -> Result<NaiveTime, FormatError> {
    let parsed_time = ExchangeParser::parse(Rule::time_token, s)
        .map_err(|_| FormatError::Time(s.to_string()))?
        .next()
        .ok_or_else(|| FormatError::Time(s.to_string()))?
        .into_inner();
    let mut hour = "";
    let mut minute = "";
    let mut second = "";
    for p in parsed_time {
        match p.as_rule() {
            Rule::hour => hour = p.as_str(),
            Rule::minute => minute = p.as_str(),
            Rule::second => second = p.as_str(),
            _ => (),
        }
    }
    let out_of_range = || FormatError::TimeOutOfRange {
        hour: hour.to_string(),
        minute: minute.to_string(),
        second: second.to_string(),
    };
    let (h, m, sec) = match (
        hour.parse::<u32>(),
        minute.parse::<u32>(),
        second.parse::<u32>(),
    ) {
        (Ok(h), Ok(m), Ok(sec)) => (h, m, sec),
        _ => return Err(out_of_range()),
    };
    NaiveTime::from_hms_opt(h, m, sec).ok_or_else(out_of_range)
}
