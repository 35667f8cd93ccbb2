use std::sync::LazyLock;

use error_stack::{Report, ResultExt};
use regex::Regex;
use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Error, Debug)]
#[error("Invalid price text: {raw:?}")]
pub struct InvalidPrice {
    pub raw: String,
}

static PLAIN_DECIMAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+(\.[0-9]+)?$").expect("valid price regex"));

/// Removes whitespace (NBSP included) and the currency symbol, and settles the
/// decimal separator: with a dot present commas are thousands separators,
/// otherwise a comma is the decimal mark.
pub fn normalize_price(raw: &str, currency_symbol: &str) -> String {
    let stripped: String = raw
        .replace(currency_symbol, "")
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();

    if stripped.contains('.') {
        stripped.replace(',', "")
    } else {
        stripped.replace(',', ".")
    }
}

pub fn parse_price(raw: &str, currency_symbol: &str) -> error_stack::Result<Decimal, InvalidPrice> {
    let normalized = normalize_price(raw, currency_symbol);

    if !PLAIN_DECIMAL.is_match(&normalized) {
        return Err(Report::new(InvalidPrice {
            raw: raw.to_string(),
        })
        .attach_printable(format!("Normalized text: {:?}", normalized)));
    }

    // Exact, so digits past the 28-place scale are rejected instead of rounded.
    Decimal::from_str_exact(&normalized).change_context(InvalidPrice {
        raw: raw.to_string(),
    })
}
