//! Normalization of caller-entered values into their encoded form.
//!
//! Free text is not handled here: its width rule (truncation) is applied by
//! the element types in [`crate::aamva::dlid::types`].
use chrono::{Datelike, NaiveDate};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DateError {
    #[error("expected 8 digits (MMDDCCYY), found {0}")]
    DigitCount(usize),

    #[error("not a numeric date")]
    NotNumeric,

    #[error("no such calendar date")]
    NoSuchDate,
}

/// Parses an `MMDDCCYY` date.
///
/// `/` and `-` separators are ignored, so `01/31/1990` is accepted.
pub fn parse_date(value: &str) -> Result<NaiveDate, DateError> {
    let chars: Vec<char> = value.chars().filter(|c| !matches!(c, '/' | '-')).collect();
    let digits: Vec<u32> = chars.iter().filter_map(|c| c.to_digit(10)).collect();

    if digits.len() != chars.len() {
        return Err(DateError::NotNumeric);
    }

    if digits.len() != 8 {
        return Err(DateError::DigitCount(digits.len()));
    }

    let number = |range: std::ops::Range<usize>| {
        digits[range].iter().fold(0u32, |acc, d| acc * 10 + d)
    };

    NaiveDate::from_ymd_opt(number(4..8) as i32, number(0..2), number(2..4))
        .ok_or(DateError::NoSuchDate)
}

/// Encodes a date as `MMDDCCYY`.
pub fn format_date(date: NaiveDate) -> String {
    format!("{:02}{:02}{:04}", date.month(), date.day(), date.year())
}

/// Validates and re-encodes a caller date.
pub fn normalize_date(value: &str) -> Result<String, DateError> {
    parse_date(value).map(format_date)
}

/// Error of a numeric physical description value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MeasureError {
    #[error("not a number")]
    NotANumber,

    #[error("more than 3 digits")]
    TooLong,
}

fn three_digits(value: &str) -> Result<String, MeasureError> {
    let value = value.trim();
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(MeasureError::NotANumber);
    }

    let value = value.trim_start_matches('0');
    if value.len() > 3 {
        return Err(MeasureError::TooLong);
    }

    Ok(format!("{value:0>3}"))
}

/// Height in inches, as `065 IN`.
pub fn format_height(inches: &str) -> Result<String, MeasureError> {
    Ok(format!("{} IN", three_digits(inches)?))
}

/// Weight in pounds, as `130`.
pub fn format_weight(pounds: &str) -> Result<String, MeasureError> {
    three_digits(pounds)
}

/// US postal code, ZIP+4 without hyphen, left-justified on 11 characters.
///
/// A 5-digit ZIP gets a `0000` extension. Anything longer than 11
/// characters once the hyphen is removed is returned as is and left for the
/// width rule to reject. So is a non-ASCII value, left for the character
/// class check.
pub fn format_postal_code(value: &str) -> String {
    let mut code: String = value.trim().chars().filter(|c| *c != '-').collect();
    if !code.is_ascii() {
        return code;
    }

    if code.len() == 5 && code.bytes().all(|b| b.is_ascii_digit()) {
        code.push_str("0000");
    }

    format!("{code:<11}")
}

/// Organ donor flag, `1` or `0`.
pub fn format_donor(value: &str) -> Option<&'static str> {
    match value.trim().to_ascii_uppercase().as_str() {
        "YES" | "Y" | "1" | "TRUE" => Some("1"),
        "NO" | "N" | "0" | "FALSE" => Some("0"),
        _ => None,
    }
}
