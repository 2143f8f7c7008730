use std::collections::HashMap;

use chrono::NaiveDate;
use itertools::Itertools;
use serde::Deserialize;

use crate::symbol::StockSymbol;

/// One day of hypothetical portfolio value for one symbol.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
pub struct PerformancePoint {
    pub date: NaiveDate,
    pub portfolio_value: f64,
}

/// Per-symbol series rebased onto one shared date axis.
///
/// The axis is the union of the input dates, deduplicated and sorted by
/// calendar value. Rows keep the input symbol order, one value slot per axis
/// date, `None` where the symbol has no point for that date.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AlignedSeries {
    dates: Vec<NaiveDate>,
    rows: Vec<(StockSymbol, Vec<Option<f64>>)>,
}

/// Symbols with an empty series are dropped entirely, a symbol never shows up
/// as an all-`None` row.
pub fn align(series: &[(StockSymbol, Vec<PerformancePoint>)]) -> AlignedSeries {
    let surviving: Vec<_> = series
        .iter()
        .filter(|(_, points)| !points.is_empty())
        .collect();

    let dates: Vec<NaiveDate> = surviving
        .iter()
        .flat_map(|(_, points)| points.iter().map(|point| point.date))
        .unique()
        .sorted()
        .collect();

    let rows = surviving
        .iter()
        .map(|(symbol, points)| {
            let by_date: HashMap<NaiveDate, f64> = points
                .iter()
                .map(|point| (point.date, point.portfolio_value))
                .collect();

            let values = dates.iter().map(|date| by_date.get(date).copied()).collect();

            (symbol.clone(), values)
        })
        .collect();

    AlignedSeries { dates, rows }
}

impl AlignedSeries {
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn rows(&self) -> &[(StockSymbol, Vec<Option<f64>>)] {
        &self.rows
    }

    pub fn start_date(&self) -> Option<NaiveDate> {
        self.dates.first().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// `(date, value)` pairs of one row, gaps skipped.
    pub fn present_values(&self, row: usize) -> Vec<(NaiveDate, f64)> {
        let Some((_, values)) = self.rows.get(row) else {
            return vec![];
        };

        self.dates
            .iter()
            .zip(values)
            .filter_map(|(date, value)| value.map(|v| (*date, v)))
            .collect()
    }
}
