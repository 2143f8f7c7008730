use chrono::{DateTime, Months, NaiveDate};

use crate::error::{ScError, ScResult};

pub fn date_from_str(s: &str) -> ScResult<NaiveDate> {
    const FORMATS: &[&str] = &[
        "%Y%m%d",
        "%Y-%m-%d",
        "%Y%m%dT%H%M%S",        // ISO 8601 Basic
        "%Y-%m-%dT%H:%M:%S%.f", // ISO 8601 Extended
    ];

    for format in FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, format) {
            return Ok(date);
        }
    }

    if let Ok(datetime) = DateTime::parse_from_rfc3339(s) {
        // RFC 3339
        return Ok(datetime.date_naive());
    }

    Err(ScError::Invalid {
        code: "INVALID_DATE",
        message: format!("Unable to parse date '{s}'"),
    })
}

pub fn date_to_str(date: &NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// The earliest start date the free market-data plan serves.
pub fn one_year_before(date: &NaiveDate) -> NaiveDate {
    date.checked_sub_months(Months::new(12)).unwrap_or(*date)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_from_str() {
        assert_eq!(
            date_to_str(&date_from_str("20231231").unwrap()),
            "2023-12-31"
        );
        assert_eq!(
            date_to_str(&date_from_str("2023-12-31").unwrap()),
            "2023-12-31"
        );
        assert_eq!(
            date_to_str(&date_from_str("20231231T235959").unwrap()),
            "2023-12-31"
        );
        assert_eq!(
            date_to_str(&date_from_str("2023-12-31T23:59:59").unwrap()),
            "2023-12-31"
        );
        assert_eq!(
            date_to_str(&date_from_str("2023-12-31T23:59:59+08:00").unwrap()),
            "2023-12-31"
        );
        assert!(date_from_str("invalid-date").is_err());
    }

    #[test]
    fn test_date_to_str() {
        assert_eq!(
            date_to_str(&NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()),
            "2024-01-01"
        );
        assert_eq!(
            date_to_str(&NaiveDate::from_ymd_opt(2024, 12, 31).unwrap()),
            "2024-12-31"
        );
    }

    #[test]
    fn test_one_year_before() {
        assert_eq!(
            one_year_before(&NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()),
            NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
        );
        // Feb 29 maps onto the last day of February
        assert_eq!(
            one_year_before(&NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()),
            NaiveDate::from_ymd_opt(2023, 2, 28).unwrap()
        );
    }
}
