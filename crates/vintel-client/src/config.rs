//! Client configuration.

use std::time::Duration;

/// Video Intelligence client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API endpoint, without a trailing slash
    pub endpoint: String,
    /// Request timeout
    pub timeout: Duration,
    /// Connect timeout
    pub connect_timeout: Duration,
    /// How long a polled operation status stays fresh before the next
    /// cached access refetches it
    pub cache_expiry: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://videointelligence.googleapis.com".to_string(),
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(5),
            cache_expiry: Duration::from_secs(60),
        }
    }
}

impl ClientConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            endpoint: std::env::var("VINTEL_ENDPOINT")
                .unwrap_or_else(|_| "https://videointelligence.googleapis.com".to_string()),
            timeout: Duration::from_secs(
                std::env::var("VINTEL_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(30),
            ),
            connect_timeout: Duration::from_secs(
                std::env::var("VINTEL_CONNECT_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(5),
            ),
            cache_expiry: Duration::from_secs(
                std::env::var("VINTEL_CACHE_EXPIRY_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(60),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_config_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.endpoint, "https://videointelligence.googleapis.com");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.cache_expiry, Duration::from_secs(60));
    }

    #[test]
    #[serial]
    fn test_config_from_env_overrides() {
        std::env::set_var("VINTEL_ENDPOINT", "http://localhost:9090");
        std::env::set_var("VINTEL_CACHE_EXPIRY_SECS", "5");
        let config = ClientConfig::from_env();
        assert_eq!(config.endpoint, "http://localhost:9090");
        assert_eq!(config.cache_expiry, Duration::from_secs(5));
        std::env::remove_var("VINTEL_ENDPOINT");
        std::env::remove_var("VINTEL_CACHE_EXPIRY_SECS");
    }

    #[test]
    #[serial]
    fn test_config_handles_invalid_env_values() {
        std::env::remove_var("VINTEL_ENDPOINT");
        std::env::set_var("VINTEL_TIMEOUT_SECS", "not-a-number");
        let config = ClientConfig::from_env();
        assert_eq!(config.timeout, Duration::from_secs(30));
        std::env::remove_var("VINTEL_TIMEOUT_SECS");
    }
}
