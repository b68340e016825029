use std::{fs, path::Path};

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// store config
    #[serde(default)]
    pub store: StoreConfig,
    /// number of async worker threads, range [1, 32768), defaults to 16
    #[serde(default = "default_worker_threads")]
    pub async_worker_thread_number: u16,
    /// webhook retry/backoff config
    #[serde(default)]
    pub webhook: WebhookRetryConfig,
    /// business hours window for delay clamping
    #[serde(default)]
    pub business_hours: BusinessHours,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StoreConfig {
    /// store type
    pub store_type: StoreType,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StoreType {
    #[default]
    Mem,
}

/// Base backoff for webhook retries; attempt n waits base * 2^(n-1).
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookRetryConfig {
    pub backoff_base_ms: u64,
}

impl Default for WebhookRetryConfig {
    fn default() -> Self {
        Self {
            backoff_base_ms: 1_000,
        }
    }
}

/// Daily window used by `businessHoursOnly` delays. Hours are in UTC.
#[derive(Debug, Clone, Deserialize)]
pub struct BusinessHours {
    pub start_hour: u32,
    pub end_hour: u32,
}

impl Default for BusinessHours {
    fn default() -> Self {
        Self {
            start_hour: 9,
            end_hour: 17,
        }
    }
}

fn default_worker_threads() -> u16 {
    16
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store: StoreConfig::default(),
            async_worker_thread_number: default_worker_threads(),
            webhook: WebhookRetryConfig::default(),
            business_hours: BusinessHours::default(),
        }
    }
}

impl Config {
    pub fn create<T: AsRef<Path>>(path: T) -> Self {
        let data = fs::read_to_string(path.as_ref()).unwrap_or_else(|_| panic!("failed to load config file {:?}", path.as_ref()));

        Self::load_from_str(data.as_str())
    }

    pub fn load_from_str(toml_str: &str) -> Self {
        toml::from_str::<Config>(toml_str).expect("failed to parse the toml str")
    }
}

#[cfg(test)]
mod test {
    use crate::{Config, StoreType};

    #[test]
    fn test_config_deserialize() {
        let toml_str = r#"
        async_worker_thread_number = 10
        [store]
        store_type = "mem"

        [webhook]
        backoff_base_ms = 250

        [business_hours]
        start_hour = 8
        end_hour = 18
        "#;
        let config = Config::load_from_str(toml_str);
        assert_eq!(config.async_worker_thread_number, 10);
        assert_eq!(config.store.store_type, StoreType::Mem);
        assert_eq!(config.webhook.backoff_base_ms, 250);
        assert_eq!(config.business_hours.start_hour, 8);
        assert_eq!(config.business_hours.end_hour, 18);
    }

    #[test]
    fn test_config_defaults() {
        let config = Config::load_from_str("");
        assert_eq!(config.async_worker_thread_number, 16);
        assert_eq!(config.webhook.backoff_base_ms, 1_000);
        assert_eq!(config.business_hours.start_hour, 9);
        assert_eq!(config.business_hours.end_hour, 17);
    }
}
