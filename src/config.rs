use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ScError, ScResult};

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    pub backend_api: String,
    pub request_timeout_secs: u64,
    pub request_max_retries: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend_api: "http://127.0.0.1:8000".to_string(),
            request_timeout_secs: 30,
            request_max_retries: 3,
        }
    }
}

#[derive(strum::Display, strum::EnumString)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ConfigKey {
    BackendApi,
    RequestTimeoutSecs,
    RequestMaxRetries,
}

pub fn load() -> ScResult<AppConfig> {
    confy::load(env!("CARGO_PKG_NAME"), None).map_err(Into::into)
}

pub fn store(config: &AppConfig) -> ScResult<()> {
    confy::store(env!("CARGO_PKG_NAME"), None, config).map_err(Into::into)
}

impl AppConfig {
    pub fn set(&mut self, key: &str, value: &str) -> ScResult<()> {
        match ConfigKey::from_str(key)? {
            ConfigKey::BackendApi => {
                url::Url::parse(value)?;
                self.backend_api = value.to_string();
            }
            ConfigKey::RequestTimeoutSecs => {
                self.request_timeout_secs = parse_u64(key, value)?;
            }
            ConfigKey::RequestMaxRetries => {
                self.request_max_retries = parse_u64(key, value)?;
            }
        }

        Ok(())
    }
}

fn parse_u64(key: &str, value: &str) -> ScResult<u64> {
    value.parse::<u64>().map_err(|_| ScError::Invalid {
        code: "INVALID_CONFIG_VALUE",
        message: format!("'{value}' is not a valid value for '{key}'"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_known_keys() {
        let mut config = AppConfig::default();

        config.set("backend_api", "http://localhost:9000").unwrap();
        assert_eq!(config.backend_api, "http://localhost:9000");

        config.set("REQUEST_TIMEOUT_SECS", "60").unwrap();
        assert_eq!(config.request_timeout_secs, 60);

        config.set("request_max_retries", "5").unwrap();
        assert_eq!(config.request_max_retries, 5);
    }

    #[test]
    fn test_set_rejects_bad_input() {
        let mut config = AppConfig::default();

        assert!(config.set("unknown_key", "1").is_err());
        assert!(config.set("request_timeout_secs", "soon").is_err());
        assert!(config.set("backend_api", "not a url").is_err());
    }
}
