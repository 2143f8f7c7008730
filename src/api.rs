use chrono::Local;
use log::debug;

use crate::{
    CONFIG,
    chart::{ChartSpec, build_chart},
    config,
    data::series::{AlignedSeries, PerformancePoint, align},
    ds::marketstack,
    error::*,
    query::PerformanceQuery,
    symbol::StockSymbol,
    utils::financial::{calc_annualized_return_rate_by_start_end, calc_max_drawdown},
};

pub use crate::config::AppConfig;
pub use crate::ds::marketstack::{ApiResponse, ApiStockItem, Pagination, PerformanceResponse};

/// Result of one comparison cycle, ready for table and chart rendering.
pub struct ComparisonOutcome {
    pub aligned: AlignedSeries,
    pub chart: ChartSpec,
    pub excluded_symbols: Vec<String>,
    pub summaries: Vec<SymbolSummary>,
}

pub struct SymbolSummary {
    pub symbol: StockSymbol,
    pub data_points: usize,
    pub final_value: Option<f64>,
    pub profit: Option<f64>,
    pub return_rate: Option<f64>,
    pub annualized_return_rate: Option<f64>,
    pub max_drawdown: Option<f64>,
}

pub async fn compare(query: &PerformanceQuery) -> ScResult<ComparisonOutcome> {
    let today = Local::now().date_naive();
    query.validate(&today)?;

    let response = marketstack::fetch_performance(query).await?;

    let excluded_symbols = response.excluded_symbols.clone();
    let series: Vec<(StockSymbol, Vec<PerformancePoint>)> = query
        .symbols
        .iter()
        .filter(|symbol| !excluded_symbols.iter().any(|e| e == symbol.as_str()))
        .map(|symbol| {
            let points = response
                .individual_stock_performance
                .get(symbol.as_str())
                .cloned()
                .unwrap_or_default();

            (symbol.clone(), points)
        })
        .collect();

    let aligned = align(&series);
    debug!(
        "[compare] {} symbols on a {}-date axis",
        aligned.rows().len(),
        aligned.dates().len()
    );

    let chart = build_chart(&aligned);
    let summaries = summarize(&aligned, query.initial_investment);

    Ok(ComparisonOutcome {
        aligned,
        chart,
        excluded_symbols,
        summaries,
    })
}

pub fn summarize(aligned: &AlignedSeries, initial_investment: f64) -> Vec<SymbolSummary> {
    aligned
        .rows()
        .iter()
        .enumerate()
        .map(|(row, (symbol, _))| {
            let present = aligned.present_values(row);

            let final_value = present.last().map(|(_, value)| *value);
            let profit = final_value.map(|value| value - initial_investment);
            let return_rate = profit.map(|profit| profit / initial_investment);

            let annualized_return_rate = match (present.first(), present.last()) {
                (Some((first_date, _)), Some((last_date, final_value))) => {
                    let days = ((*last_date - *first_date).num_days() + 1) as u64;
                    calc_annualized_return_rate_by_start_end(
                        initial_investment,
                        *final_value,
                        days,
                    )
                }
                _ => None,
            };

            let values: Vec<f64> = present.iter().map(|(_, value)| *value).collect();
            let max_drawdown = calc_max_drawdown(&values);

            SymbolSummary {
                symbol: symbol.clone(),
                data_points: present.len(),
                final_value,
                profit,
                return_rate,
                annualized_return_rate,
                max_drawdown,
            }
        })
        .collect()
}

/// Probe the backend proxy, one `(title, error)` row per probe.
pub async fn check() -> Vec<(String, Option<ScError>)> {
    vec![(
        "market-data passthrough".to_string(),
        marketstack::check_api().await.err(),
    )]
}

pub async fn get_config() -> ScResult<AppConfig> {
    Ok(CONFIG.read().await.clone())
}

pub async fn set_config(key: &str, value: &str) -> ScResult<()> {
    let mut config = CONFIG.write().await;
    config.set(key, value)?;
    config::store(&config)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use chrono::NaiveDate;

    use super::*;

    fn point(date: &str, value: f64) -> PerformancePoint {
        PerformancePoint {
            date: NaiveDate::from_str(date).unwrap(),
            portfolio_value: value,
        }
    }

    #[test]
    fn test_summarize() {
        let aligned = align(&[
            (
                StockSymbol::from_str("AAPL").unwrap(),
                vec![
                    point("2024-01-01", 10000.0),
                    point("2024-01-02", 11000.0),
                    point("2024-01-03", 9900.0),
                ],
            ),
            (
                StockSymbol::from_str("MSFT").unwrap(),
                vec![point("2024-01-02", 10500.0)],
            ),
        ]);

        let summaries = summarize(&aligned, 10000.0);
        assert_eq!(summaries.len(), 2);

        let aapl = &summaries[0];
        assert_eq!(aapl.data_points, 3);
        assert_eq!(aapl.final_value, Some(9900.0));
        assert_eq!(aapl.profit, Some(-100.0));
        assert_eq!(aapl.return_rate, Some(-0.01));
        assert_eq!(aapl.max_drawdown, Some(0.1));

        let msft = &summaries[1];
        assert_eq!(msft.data_points, 1);
        assert_eq!(msft.final_value, Some(10500.0));
        assert!(msft.max_drawdown.is_none());
    }

    #[test]
    fn test_summarize_empty() {
        assert!(summarize(&align(&[]), 10000.0).is_empty());
    }
}
