//! Validation utilities

use bigdecimal::BigDecimal;
use chrono::NaiveDate;

use crate::types::*;

/// Validate that a tolerance is not negative
pub fn validate_tolerance(tolerance: &BigDecimal) -> ReconResult<()> {
    if *tolerance < BigDecimal::from(0) {
        Err(ReconError::Config(format!(
            "tolerance cannot be negative, got {tolerance}"
        )))
    } else {
        Ok(())
    }
}

/// Validate that a count setting is at least one
pub fn validate_at_least_one(name: &str, value: usize) -> ReconResult<()> {
    if value == 0 {
        return Err(ReconError::Config(format!("{name} must be at least 1")));
    }
    Ok(())
}

/// Validate that an inclusive date range is not inverted
pub fn validate_date_range(from: Option<NaiveDate>, to: Option<NaiveDate>) -> ReconResult<()> {
    if let (Some(from), Some(to)) = (from, to) {
        if from > to {
            return Err(ReconError::Config(format!(
                "date_from ({from}) is after date_to ({to})"
            )));
        }
    }
    Ok(())
}

/// Validate a synonym list for a column role
pub fn validate_synonyms(role: ColumnRole, synonyms: &[String]) -> ReconResult<()> {
    if synonyms.is_empty() {
        return Err(ReconError::Config(format!(
            "at least one {role} column synonym is required"
        )));
    }

    if synonyms.iter().any(|s| s.trim().is_empty()) {
        return Err(ReconError::Config(format!(
            "{role} column synonyms cannot be blank"
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_tolerance() {
        assert!(validate_tolerance(&BigDecimal::from(0)).is_ok());
        assert!(validate_tolerance(&BigDecimal::from(-1)).is_err());
    }

    #[test]
    fn test_validate_date_range() {
        let jan = NaiveDate::from_ymd_opt(2024, 1, 1);
        let feb = NaiveDate::from_ymd_opt(2024, 2, 1);
        assert!(validate_date_range(jan, feb).is_ok());
        assert!(validate_date_range(None, jan).is_ok());
        assert!(validate_date_range(feb, jan).is_err());
    }

    #[test]
    fn test_validate_synonyms() {
        assert!(validate_synonyms(ColumnRole::Debit, &["debe".to_string()]).is_ok());
        assert!(validate_synonyms(ColumnRole::Debit, &[]).is_err());
        let err = validate_synonyms(ColumnRole::Credit, &[" ".to_string()]).unwrap_err();
        assert!(err.to_string().contains("credit"));
    }

    #[test]
    fn test_validate_at_least_one() {
        assert!(validate_at_least_one("header_scan_rows", 1).is_ok());
        assert!(validate_at_least_one("header_scan_rows", 0).is_err());
    }
}
