use std::collections::HashMap;

use log::debug;
use serde::Deserialize;

use crate::{
    CONFIG,
    data::series::PerformancePoint,
    error::{ScError, ScResult},
    query::PerformanceQuery,
    utils::net::http_get,
};

/// One raw daily record as delivered by the upstream market-data API,
/// passed through the backend untouched.
#[derive(Clone, Debug, Deserialize)]
pub struct ApiStockItem {
    pub symbol: String,
    pub exchange: Option<String>,
    pub date: String,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: Option<f64>,
    pub volume: Option<f64>,
    pub adj_open: Option<f64>,
    pub adj_high: Option<f64>,
    pub adj_low: Option<f64>,
    pub adj_close: Option<f64>,
    pub adj_volume: Option<f64>,
    pub split_factor: Option<f64>,
    pub dividend: Option<f64>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Pagination {
    pub limit: u64,
    pub offset: u64,
    pub count: u64,
    pub total: u64,
}

/// The upstream API envelope.
#[derive(Clone, Debug, Deserialize)]
pub struct ApiResponse {
    pub pagination: Pagination,
    pub data: Vec<ApiStockItem>,
}

/// Payload of `GET /api/market-stack`.
///
/// `excluded_symbols` lists requested symbols the backend dropped for
/// insufficient data, alongside whatever data did come back.
#[derive(Clone, Debug, Deserialize)]
pub struct PerformanceResponse {
    pub market_data: ApiResponse,
    pub individual_stock_performance: HashMap<String, Vec<PerformancePoint>>,
    #[serde(default)]
    pub excluded_symbols: Vec<String>,
}

pub async fn fetch_performance(query: &PerformanceQuery) -> ScResult<PerformanceResponse> {
    let (backend_api, timeout_secs, max_retries) = {
        let config = CONFIG.read().await;
        (
            config.backend_api.clone(),
            config.request_timeout_secs,
            config.request_max_retries,
        )
    };

    let bytes = http_get(
        &backend_api,
        Some("/api/market-stack"),
        &query.to_query_pairs(),
        timeout_secs,
        max_retries,
    )
    .await?;

    let response: PerformanceResponse = serde_json::from_slice(&bytes)?;

    debug!(
        "[market-stack] {} series, {} excluded",
        response.individual_stock_performance.len(),
        response.excluded_symbols.len()
    );

    Ok(response)
}

pub async fn check_api() -> ScResult<ApiResponse> {
    let (backend_api, timeout_secs, max_retries) = {
        let config = CONFIG.read().await;
        (
            config.backend_api.clone(),
            config.request_timeout_secs,
            config.request_max_retries,
        )
    };

    let bytes = http_get(
        &backend_api,
        Some("/api/test-marketstack"),
        &[],
        timeout_secs,
        max_retries,
    )
    .await?;

    let response: ApiResponse = serde_json::from_slice(&bytes)?;

    if response.data.is_empty() {
        return Err(ScError::NoData {
            code: "EMPTY_PASSTHROUGH",
            message: "The market-data passthrough returned no items".to_string(),
        });
    }

    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_performance_response() {
        let json = r#"{
            "market_data": {
                "pagination": {"limit": 100, "offset": 0, "count": 2, "total": 2},
                "data": [
                    {"symbol": "AAPL", "exchange": "XNAS", "date": "2024-01-02T00:00:00+0000",
                     "open": 187.15, "high": 188.44, "low": 183.89, "close": 185.64,
                     "volume": 82488700.0, "adj_close": 185.64, "split_factor": 1.0, "dividend": 0.0}
                ]
            },
            "individual_stock_performance": {
                "AAPL": [
                    {"date": "2024-01-02", "portfolio_value": 10000.0},
                    {"date": "2024-01-03", "portfolio_value": 9875.5}
                ]
            },
            "excluded_symbols": ["XYZ"]
        }"#;

        let response: PerformanceResponse = serde_json::from_str(json).unwrap();

        assert_eq!(response.market_data.pagination.count, 2);
        assert_eq!(response.market_data.data[0].symbol, "AAPL");
        assert_eq!(response.excluded_symbols, vec!["XYZ"]);

        let series = &response.individual_stock_performance["AAPL"];
        assert_eq!(series.len(), 2);
        assert_eq!(series[1].portfolio_value, 9875.5);
    }

    #[test]
    fn test_parse_performance_response_without_exclusions() {
        let json = r#"{
            "market_data": {
                "pagination": {"limit": 100, "offset": 0, "count": 0, "total": 0},
                "data": []
            },
            "individual_stock_performance": {}
        }"#;

        let response: PerformanceResponse = serde_json::from_str(json).unwrap();

        assert!(response.excluded_symbols.is_empty());
        assert!(response.individual_stock_performance.is_empty());
    }
}
