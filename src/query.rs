use chrono::NaiveDate;
use url::form_urlencoded;

use crate::{
    error::{ScError, ScResult},
    symbol::{MAX_SELECTION, StockSymbol},
    utils::datetime::{date_to_str, one_year_before},
};

/// Parameters of one performance comparison request.
///
/// `validate` must pass before the query is allowed near the network.
#[derive(Clone, Debug, PartialEq)]
pub struct PerformanceQuery {
    pub symbols: Vec<StockSymbol>,
    pub initial_investment: f64,
    pub date_from: NaiveDate,
    pub date_to: NaiveDate,
}

impl PerformanceQuery {
    pub fn validate(&self, today: &NaiveDate) -> ScResult<()> {
        if self.symbols.is_empty() {
            return Err(ScError::Invalid {
                code: "SYMBOLS_EMPTY",
                message: "At least one symbol is required".to_string(),
            });
        }

        if self.symbols.len() > MAX_SELECTION {
            return Err(ScError::Invalid {
                code: "TOO_MANY_SYMBOLS",
                message: format!("At most {MAX_SELECTION} symbols can be compared"),
            });
        }

        let investable =
            self.initial_investment.is_finite() && self.initial_investment > 0.0;
        if !investable {
            return Err(ScError::Invalid {
                code: "NOTHING_TO_INVEST",
                message: "Nothing to invest".to_string(),
            });
        }

        if self.date_from > self.date_to {
            return Err(ScError::Invalid {
                code: "DATES_REVERSED",
                message: format!(
                    "The start date {} cannot be later than the end date {}",
                    date_to_str(&self.date_from),
                    date_to_str(&self.date_to)
                ),
            });
        }

        let floor = one_year_before(today);
        if self.date_from < floor {
            return Err(ScError::Invalid {
                code: "DATE_FROM_TOO_EARLY",
                message: format!(
                    "The start date cannot be earlier than {}",
                    date_to_str(&floor)
                ),
            });
        }

        if self.date_to > *today {
            return Err(ScError::Invalid {
                code: "DATE_TO_IN_FUTURE",
                message: format!("The end date cannot be later than {}", date_to_str(today)),
            });
        }

        Ok(())
    }

    /// Pull out-of-range dates back inside the service window, returning the
    /// adjusted query together with one notice per adjusted bound.
    pub fn clamped(&self, today: &NaiveDate) -> (Self, Vec<String>) {
        let mut query = self.clone();
        let mut notices = vec![];

        let floor = one_year_before(today);
        if query.date_from < floor {
            query.date_from = floor;
            notices.push(format!(
                "The start date was moved up to {}, earlier data is not served",
                date_to_str(&floor)
            ));
        }

        if query.date_to > *today {
            query.date_to = *today;
            notices.push(format!(
                "The end date was moved back to {}",
                date_to_str(today)
            ));
        }

        (query, notices)
    }

    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let symbols = self
            .symbols
            .iter()
            .map(StockSymbol::as_str)
            .collect::<Vec<_>>()
            .join(",");

        vec![
            ("symbols".to_string(), symbols),
            (
                "initial_investment".to_string(),
                self.initial_investment.to_string(),
            ),
            ("date_from".to_string(), date_to_str(&self.date_from)),
            ("date_to".to_string(), date_to_str(&self.date_to)),
        ]
    }

    pub fn to_query_string(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (key, value) in self.to_query_pairs() {
            serializer.append_pair(&key, &value);
        }

        serializer.finish()
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    fn query(symbols: &[&str], investment: f64, from: &str, to: &str) -> PerformanceQuery {
        PerformanceQuery {
            symbols: symbols
                .iter()
                .map(|s| StockSymbol::from_str(s).unwrap())
                .collect(),
            initial_investment: investment,
            date_from: NaiveDate::from_str(from).unwrap(),
            date_to: NaiveDate::from_str(to).unwrap(),
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()
    }

    #[test]
    fn test_validate_accepts_well_formed_query() {
        let q = query(&["AAPL", "MSFT"], 10000.0, "2025-01-01", "2025-06-01");
        assert!(q.validate(&today()).is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_symbols() {
        let q = query(&[], 10000.0, "2025-01-01", "2025-06-01");
        let err = q.validate(&today()).unwrap_err();
        assert_eq!(err.user_message(), "At least one symbol is required");
    }

    #[test]
    fn test_validate_rejects_non_positive_investment() {
        for investment in [0.0, -5.0, f64::NAN] {
            let q = query(&["AAPL"], investment, "2025-01-01", "2025-06-01");
            let err = q.validate(&today()).unwrap_err();
            assert_eq!(err.user_message(), "Nothing to invest");
        }
    }

    #[test]
    fn test_validate_rejects_reversed_dates() {
        let q = query(&["AAPL"], 10000.0, "2025-06-01", "2025-01-01");
        assert!(q.validate(&today()).is_err());
    }

    #[test]
    fn test_validate_rejects_out_of_window_dates() {
        let q = query(&["AAPL"], 10000.0, "2024-01-01", "2025-06-01");
        assert!(q.validate(&today()).is_err());

        let q = query(&["AAPL"], 10000.0, "2025-01-01", "2025-12-31");
        assert!(q.validate(&today()).is_err());
    }

    #[test]
    fn test_clamped_pulls_dates_into_window() {
        let q = query(&["AAPL"], 10000.0, "2024-01-01", "2025-12-31");
        let (clamped, notices) = q.clamped(&today());

        assert_eq!(
            clamped.date_from,
            NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
        );
        assert_eq!(clamped.date_to, today());
        assert_eq!(notices.len(), 2);
        assert!(clamped.validate(&today()).is_ok());
    }

    #[test]
    fn test_clamped_leaves_in_window_dates_alone() {
        let q = query(&["AAPL"], 10000.0, "2025-01-01", "2025-06-01");
        let (clamped, notices) = q.clamped(&today());

        assert_eq!(clamped, q);
        assert!(notices.is_empty());
    }

    #[test]
    fn test_query_string_round_trip() {
        let q = query(&["AAPL", "MSFT", "GOOG"], 12500.5, "2025-01-02", "2025-06-01");
        let serialized = q.to_query_string();

        let parsed: Vec<(String, String)> = form_urlencoded::parse(serialized.as_bytes())
            .into_owned()
            .collect();
        assert_eq!(parsed, q.to_query_pairs());

        let symbols = &parsed
            .iter()
            .find(|(k, _)| k == "symbols")
            .map(|(_, v)| v.clone())
            .unwrap();
        assert_eq!(symbols, "AAPL,MSFT,GOOG");
    }
}
