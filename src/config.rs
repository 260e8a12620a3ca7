//! Application configuration, loaded from the environment via figment.

use serde::Deserialize;
use std::time::Duration;

fn default_base_url() -> String {
    "https://api.spoonacular.com".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_string()
}

/// One hour — the maximum the Spoonacular FAQ allows cached API data to be
/// reused.
fn default_cache_max_age_secs() -> u64 {
    60 * 60
}

fn default_request_timeout_secs() -> u64 {
    20
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub database_url: String,
    pub spoonacular_api_key: String,
    #[serde(default = "default_base_url")]
    pub spoonacular_base_url: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// How long cached API data stays fresh, in seconds.
    #[serde(default = "default_cache_max_age_secs")]
    pub cache_max_age_secs: u64,
    /// Deadline for a single upstream request, in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Config {
    pub fn cache_max_age(&self) -> Duration {
        Duration::from_secs(self.cache_max_age_secs)
    }

    /// The freshness window in milliseconds, for the HTTP cache consumer.
    pub fn cache_max_age_ms(&self) -> i64 {
        (self.cache_max_age_secs * 1000) as i64
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_optional_fields() {
        let config: Config = serde_json::from_str(
            r#"{"database_url": "postgres://localhost/spoonful", "spoonacular_api_key": "k"}"#,
        )
        .unwrap();
        assert_eq!(config.spoonacular_base_url, "https://api.spoonacular.com");
        assert_eq!(config.port, 8080);
        assert_eq!(config.cache_max_age_secs, 3600);
        assert_eq!(config.cache_max_age_ms(), 3_600_000);
    }
}
