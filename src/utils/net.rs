use std::time::Duration;

use log::debug;
use reqwest::Method;
use reqwest_middleware::ClientBuilder;
use reqwest_retry::{Jitter, RetryTransientMiddleware, policies::ExponentialBackoff};
use url::Url;

use crate::error::{ScError, ScResult};

/// Query pairs are sent in the given order, the request builder's
/// serialization order is part of its contract.
pub async fn http_get(
    url: &str,
    path: Option<&str>,
    query: &[(String, String)],
    timeout_secs: u64,
    max_retries: u64,
) -> ScResult<Vec<u8>> {
    let request_url = if let Some(path) = path {
        &join_url(url, path)?
    } else {
        url
    };

    let retry_policy = ExponentialBackoff::builder()
        .retry_bounds(Duration::from_secs(1), Duration::from_secs(timeout_secs))
        .jitter(Jitter::Bounded)
        .base(2)
        .build_with_total_retry_duration_and_max_retries(Duration::from_secs(
            max_retries * timeout_secs,
        ));
    let client = ClientBuilder::new(reqwest::Client::new())
        .with(RetryTransientMiddleware::new_with_policy(retry_policy))
        .build();

    let request_builder = client
        .request(Method::GET, request_url)
        .timeout(Duration::from_secs(timeout_secs))
        .query(query);

    let response = request_builder.send().await?;

    if response.status().is_success() {
        Ok(response.bytes().await?.to_vec())
    } else {
        debug!("[HTTP Status Error] {response:?}");

        Err(ScError::HttpStatusError {
            status: response.status().to_string(),
            request: request_url.to_string(),
        })
    }
}

pub fn join_url(base_url: &str, extend_url: &str) -> Result<String, url::ParseError> {
    let mut url = Url::parse(base_url)?;

    url.path_segments_mut()
        .map_err(|_| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
        .pop_if_empty()
        .extend(extend_url.split('/').filter(|s| !s.is_empty()));

    Ok(url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_url() {
        assert_eq!(
            join_url("http://127.0.0.1:8000/", "/api/market-stack").unwrap(),
            "http://127.0.0.1:8000/api/market-stack"
        );
        assert_eq!(
            join_url("http://127.0.0.1:8000", "api/test-marketstack").unwrap(),
            "http://127.0.0.1:8000/api/test-marketstack"
        );
    }
}
