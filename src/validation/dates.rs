//! Date parsing and the to/current exclusivity rule for history entries

use bson::DateTime;
use chrono::{NaiveDate, TimeZone, Utc};

use crate::types::DevLinkError;

/// Parse an entry date, accepting RFC 3339 or plain `YYYY-MM-DD`
pub fn parse_date(field: &str, value: &str) -> Result<DateTime, DevLinkError> {
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(value) {
        return Ok(DateTime::from_chrono(dt.with_timezone(&Utc)));
    }

    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Ok(DateTime::from_chrono(Utc.from_utc_datetime(&midnight)));
        }
    }

    Err(DevLinkError::invalid(
        "Invalid date",
        field,
        "Enter a date as YYYY-MM-DD",
    ))
}

/// Enforce that exactly one of `to` / `current=true` is provided
pub fn validate_entry_dates(to: Option<&str>, current: bool) -> Result<(), DevLinkError> {
    match (to, current) {
        (Some(_), true) => Err(DevLinkError::invalid(
            "Invalid date range",
            "to",
            "An end date cannot be combined with a current position",
        )),
        (None, false) => Err(DevLinkError::invalid(
            "Invalid date range",
            "to",
            "Provide an end date or mark the position as current",
        )),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_and_rfc3339_dates() {
        assert!(parse_date("from", "2020-05-01").is_ok());
        assert!(parse_date("from", "2020-05-01T12:30:00Z").is_ok());
        assert!(parse_date("from", "May 2020").is_err());
    }

    #[test]
    fn exactly_one_of_to_or_current() {
        assert!(validate_entry_dates(Some("2021-01-01"), false).is_ok());
        assert!(validate_entry_dates(None, true).is_ok());
        assert!(validate_entry_dates(Some("2021-01-01"), true).is_err());
        assert!(validate_entry_dates(None, false).is_err());
    }
}
