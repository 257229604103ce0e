//! Cell coercion helpers.
//!
//! None of these fail: a cell that cannot be read as a number or a date
//! yields `None` and the caller substitutes its default.

use bigdecimal::{BigDecimal, RoundingMode};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::types::Cell;

/// Number of decimal places every canonical amount carries
pub const AMOUNT_SCALE: i64 = 2;

/// Largest number of digits accepted on either side of the decimal point.
/// Anything wider (`1e2000000000`) is read as non-numeric.
pub const MAX_AMOUNT_DIGITS: i64 = 30;

const ISO_DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%Y.%m.%d"];
const MONTH_FIRST_FORMATS: &[&str] = &["%m/%d/%Y", "%m-%d-%Y", "%m.%d.%Y"];
const DAY_FIRST_FORMATS: &[&str] = &["%d/%m/%Y", "%d-%m-%Y", "%d.%m.%Y"];

/// Preferred reading of ambiguous numeric dates such as `03/04/2024`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateOrder {
    /// `MM/DD/YYYY` first, `DD/MM/YYYY` as fallback
    #[default]
    MonthFirst,
    /// `DD/MM/YYYY` first, `MM/DD/YYYY` as fallback
    DayFirst,
}

impl DateOrder {
    fn format_groups(self) -> [&'static [&'static str]; 2] {
        match self {
            DateOrder::MonthFirst => [MONTH_FIRST_FORMATS, DAY_FIRST_FORMATS],
            DateOrder::DayFirst => [DAY_FIRST_FORMATS, MONTH_FIRST_FORMATS],
        }
    }
}

/// Round an amount to two decimals, half to even
pub fn round_amount(value: &BigDecimal) -> BigDecimal {
    value.with_scale_round(AMOUNT_SCALE, RoundingMode::HalfEven)
}

/// Read a cell as a decimal number
pub fn parse_amount(cell: &Cell) -> Option<BigDecimal> {
    let value = match cell {
        Cell::Int(value) => Some(BigDecimal::from(*value)),
        // Shortest round-trip text keeps 150.005 as 150.005 instead of its binary expansion
        Cell::Float(value) if value.is_finite() => BigDecimal::from_str(&value.to_string()).ok(),
        Cell::Text(text) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                None
            } else {
                BigDecimal::from_str(trimmed).ok()
            }
        }
        _ => None,
    }?;
    within_amount_range(&value).then_some(value)
}

fn within_amount_range(value: &BigDecimal) -> bool {
    let (_, scale) = value.as_bigint_and_exponent();
    let integer_digits = value.digits() as i64 - scale;
    scale <= MAX_AMOUNT_DIGITS && integer_digits <= MAX_AMOUNT_DIGITS
}

/// Read a cell as a calendar date
pub fn parse_date(cell: &Cell, order: DateOrder) -> Option<NaiveDate> {
    match cell {
        Cell::Date(date) => Some(*date),
        Cell::DateTime(datetime) => Some(datetime.date()),
        Cell::Text(text) => parse_date_text(text, order),
        _ => None,
    }
}

fn parse_date_text(text: &str, order: DateOrder) -> Option<NaiveDate> {
    // Drop any time-of-day suffix ("2024-01-05 10:30:00", "2024-01-05T10:30:00")
    let date_part = text
        .trim()
        .split(|c: char| c == 'T' || c.is_whitespace())
        .next()?;
    if date_part.is_empty() {
        return None;
    }

    let [preferred, fallback] = order.format_groups();
    ISO_DATE_FORMATS
        .iter()
        .chain(preferred)
        .chain(fallback)
        .find_map(|format| NaiveDate::parse_from_str(date_part, format).ok())
}
