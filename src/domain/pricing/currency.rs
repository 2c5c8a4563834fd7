//! Localized currency parsing
//!
//! Retail pages in the tracked locale write amounts as `12.345,67`: dots
//! group thousands, the comma is the decimal separator.

use crate::shared::errors::OfferError;

/// Parse a localized amount string into a plain number.
///
/// Keeps only digits, `.` and `,`; drops a `.` when it introduces a group of
/// exactly three digits (thousands separator); the remaining `,` becomes the
/// decimal point. Returns `None` for anything that does not end up as a
/// finite, non-negative number. Never panics.
pub fn parse_localized_amount(text: &str) -> Option<f64> {
    let kept: Vec<char> = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == ',')
        .collect();
    if kept.is_empty() {
        return None;
    }

    let mut cleaned = String::with_capacity(kept.len());
    for (i, &c) in kept.iter().enumerate() {
        match c {
            '.' if is_thousands_separator(&kept, i) => {}
            ',' => cleaned.push('.'),
            other => cleaned.push(other),
        }
    }

    match cleaned.parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 => Some(v),
        _ => None,
    }
}

/// Result-typed variant for callers that must report what failed to parse
pub fn parse_amount(text: &str) -> Result<f64, OfferError> {
    parse_localized_amount(text).ok_or_else(|| OfferError::Parse(text.trim().to_string()))
}

// A `.` separates thousands when followed by exactly three digits and then a
// non-digit or the end of the string.
fn is_thousands_separator(chars: &[char], dot: usize) -> bool {
    let following_digits = chars[dot + 1..]
        .iter()
        .take_while(|c| c.is_ascii_digit())
        .count();
    following_digits == 3
}
