//! Provider configuration.
//!
//! Read from environment variables, the same way the controllers configure
//! their NetBox connection:
//!
//! | Variable | Default |
//! |---|---|
//! | `NETBOX_URL` | `http://netbox.netbox:80` |
//! | `NETBOX_TOKEN` | required |
//! | `NETBOX_TIMEOUT_SECS` | `30` |

use crate::error::ProviderError;
use netbox_client::NetBoxClient;
use std::time::Duration;

pub const NETBOX_URL: &str = "NETBOX_URL";
pub const NETBOX_TOKEN: &str = "NETBOX_TOKEN";
pub const NETBOX_TIMEOUT_SECS: &str = "NETBOX_TIMEOUT_SECS";

pub const DEFAULT_URL: &str = "http://netbox.netbox:80";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Connection settings for one NetBox instance
#[derive(Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    pub url: String,
    pub token: String,
    pub timeout: Duration,
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("url", &self.url)
            .field("token", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl ProviderConfig {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self, ProviderError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from any key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ProviderError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let url = lookup(NETBOX_URL)
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_URL.to_string());

        let token = lookup(NETBOX_TOKEN)
            .filter(|token| !token.trim().is_empty())
            .ok_or_else(|| {
                ProviderError::InvalidConfig(format!("{} environment variable is required", NETBOX_TOKEN))
            })?;

        let timeout_secs = match lookup(NETBOX_TIMEOUT_SECS) {
            Some(raw) => raw.trim().parse::<u64>().ok().filter(|secs| *secs > 0).ok_or_else(|| {
                ProviderError::InvalidConfig(format!(
                    "{} must be a positive number of seconds, got {:?}",
                    NETBOX_TIMEOUT_SECS, raw
                ))
            })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            url,
            token,
            timeout: Duration::from_secs(timeout_secs),
        })
    }

    /// Build an HTTP client for this configuration
    pub fn connect(&self) -> Result<NetBoxClient, ProviderError> {
        Ok(NetBoxClient::with_timeout(self.url.clone(), self.token.clone(), self.timeout)?)
    }
}
