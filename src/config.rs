//! Relay configuration
//!
//! Values come from built-in defaults, then the optional YAML file, then the
//! `WEBHOOK_URL` environment variable.

use crate::error::{RelayError, RelayResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{info, warn};

/// Optional configuration file
pub const CONFIG_FILE: &str = "config/relay.yaml";
/// Environment variable holding the destination webhook
pub const WEBHOOK_ENV: &str = "WEBHOOK_URL";

pub const DEFAULT_BAN_LIST_URL: &str = "https://api.pvpgym.net/banlist";
pub const DEFAULT_WINDOW: u32 = 25;
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 5;
pub const DEFAULT_AVATAR_BASE_URL: &str = "https://mc-heads.net/avatar";

/// Runtime settings for the relay
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelayConfig {
    /// Discord webhook that receives the notifications
    pub webhook_url: String,
    /// Ban-list endpoint, without pagination parameters
    pub ban_list_url: String,
    /// Number of most recent bans requested per poll
    pub window: u32,
    /// Seconds between polls
    pub poll_interval_secs: u64,
    /// Base of the avatar thumbnail URL; `/{id}/64` is appended
    pub avatar_base_url: String,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            webhook_url: String::new(),
            ban_list_url: DEFAULT_BAN_LIST_URL.to_string(),
            window: DEFAULT_WINDOW,
            poll_interval_secs: DEFAULT_POLL_INTERVAL_SECS,
            avatar_base_url: DEFAULT_AVATAR_BASE_URL.to_string(),
        }
    }
}

impl RelayConfig {
    /// Load the configuration from `.env`, the config file and the environment
    ///
    /// # Errors
    ///
    /// Returns `RelayError::Config` if no webhook URL is configured or a
    /// value is out of range.
    pub async fn load() -> RelayResult<Self> {
        if let Ok(path) = dotenvy::dotenv() {
            info!("Loaded environment from {}", path.display());
        }

        let file_content = match tokio::fs::read_to_string(CONFIG_FILE).await {
            Ok(content) => Some(content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                warn!("Could not read {CONFIG_FILE}, using defaults: {e}");
                None
            }
        };

        Self::from_sources(file_content.as_deref(), std::env::var(WEBHOOK_ENV).ok())
    }

    /// Build and validate a configuration from already-read sources
    ///
    /// # Errors
    ///
    /// Returns `RelayError::Config` if the result fails validation.
    pub fn from_sources(yaml: Option<&str>, webhook_env: Option<String>) -> RelayResult<Self> {
        let mut config = match yaml {
            Some(content) => match serde_yaml::from_str::<Self>(content) {
                Ok(config) => config,
                Err(e) => {
                    warn!("Ignoring invalid {CONFIG_FILE}: {e}");
                    Self::default()
                }
            },
            None => Self::default(),
        };

        if let Some(url) = webhook_env.filter(|url| !url.trim().is_empty()) {
            config.webhook_url = url;
        }

        config.validate()?;
        Ok(config)
    }

    /// Check that every value is usable
    ///
    /// # Errors
    ///
    /// Returns `RelayError::Config` describing the first invalid value.
    pub fn validate(&self) -> RelayResult<()> {
        if self.webhook_url.trim().is_empty() {
            return Err(RelayError::Config(format!("{WEBHOOK_ENV} must be set")));
        }
        if self.window == 0 {
            return Err(RelayError::Config("window must be at least 1".to_string()));
        }
        if self.poll_interval_secs == 0 {
            return Err(RelayError::Config(
                "poll_interval_secs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WEBHOOK: &str = "https://discord.com/api/webhooks/1/token";

    #[test]
    fn test_defaults() {
        let config = RelayConfig::default();
        assert_eq!(config.ban_list_url, "https://api.pvpgym.net/banlist");
        assert_eq!(config.window, 25);
        assert_eq!(config.poll_interval(), Duration::from_secs(5));
        assert_eq!(config.avatar_base_url, "https://mc-heads.net/avatar");
    }

    #[test]
    fn test_webhook_from_env() {
        let config = RelayConfig::from_sources(None, Some(WEBHOOK.to_string()))
            .expect("config should be valid");
        assert_eq!(config.webhook_url, WEBHOOK);
        assert_eq!(config.window, 25);
    }

    #[test]
    fn test_missing_webhook_is_rejected() {
        let err = RelayConfig::from_sources(None, None).unwrap_err();
        assert!(matches!(err, RelayError::Config(_)));

        let err = RelayConfig::from_sources(None, Some("  ".to_string())).unwrap_err();
        assert!(matches!(err, RelayError::Config(_)));
    }

    #[test]
    fn test_yaml_overrides_defaults() {
        let yaml = "window: 10\npoll_interval_secs: 30\nwebhook_url: https://example.com/hook\n";
        let config = RelayConfig::from_sources(Some(yaml), None).expect("config should be valid");
        assert_eq!(config.window, 10);
        assert_eq!(config.poll_interval_secs, 30);
        assert_eq!(config.webhook_url, "https://example.com/hook");
        assert_eq!(config.ban_list_url, DEFAULT_BAN_LIST_URL);
    }

    #[test]
    fn test_env_takes_precedence_over_yaml() {
        let yaml = "webhook_url: https://example.com/hook\n";
        let config = RelayConfig::from_sources(Some(yaml), Some(WEBHOOK.to_string()))
            .expect("config should be valid");
        assert_eq!(config.webhook_url, WEBHOOK);
    }

    #[test]
    fn test_invalid_yaml_falls_back_to_defaults() {
        let config = RelayConfig::from_sources(Some("window: [oops"), Some(WEBHOOK.to_string()))
            .expect("config should be valid");
        assert_eq!(config.window, DEFAULT_WINDOW);
    }

    #[test]
    fn test_zero_values_are_rejected() {
        let err = RelayConfig::from_sources(Some("window: 0"), Some(WEBHOOK.to_string()))
            .unwrap_err();
        assert!(err.to_string().contains("window"));

        let err = RelayConfig::from_sources(
            Some("poll_interval_secs: 0"),
            Some(WEBHOOK.to_string()),
        )
        .unwrap_err();
        assert!(err.to_string().contains("poll_interval_secs"));
    }
}
