//! curlew.toml client configuration.

use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use curlew_transport::{CacheConfig, HandleMode};
use serde::{Deserialize, Serialize};

use crate::retry::RetryPolicy;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub cache: CacheSection,
    pub multi: MultiSection,
    pub request: RequestSection,
    pub retry: RetrySection,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSection {
    pub capacity: usize,
}

impl Default for CacheSection {
    fn default() -> Self {
        Self {
            capacity: curlew_transport::cache::DEFAULT_CAPACITY,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MultiSection {
    pub wait_timeout_ms: u64,
}

impl Default for MultiSection {
    fn default() -> Self {
        Self {
            wait_timeout_ms: 1000,
        }
    }
}

/// Defaults for every request made through a configured client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestSection {
    /// Empty keeps libcurl's own user agent.
    pub user_agent: String,
    /// Zero disables the transfer timeout.
    pub timeout_secs: u64,
    /// `"single"` or `"multi"`.
    pub mode: String,
}

impl Default for RequestSection {
    fn default() -> Self {
        Self {
            user_agent: String::new(),
            timeout_secs: 0,
            mode: HandleMode::Single.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrySection {
    pub max_retries: u32,
    pub base_delay_ms: u64,
}

impl Default for RetrySection {
    fn default() -> Self {
        Self {
            max_retries: 0,
            base_delay_ms: 100,
        }
    }
}

impl ClientConfig {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_toml_str(&content).with_context(|| format!("invalid config {}", path.display()))
    }

    /// Parse and validate a TOML document. Missing sections and keys take
    /// their defaults.
    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        let config: ClientConfig = toml::from_str(content)?;
        config.mode()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> anyhow::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn cache_config(&self) -> CacheConfig {
        CacheConfig {
            capacity: self.cache.capacity,
            wait_timeout: Duration::from_millis(self.multi.wait_timeout_ms),
        }
    }

    pub fn mode(&self) -> anyhow::Result<HandleMode> {
        Ok(self.request.mode.parse::<HandleMode>()?)
    }

    pub fn user_agent(&self) -> Option<&str> {
        Some(self.request.user_agent.as_str()).filter(|ua| !ua.is_empty())
    }

    pub fn timeout(&self) -> Option<Duration> {
        (self.request.timeout_secs > 0).then(|| Duration::from_secs(self.request.timeout_secs))
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.retry.max_retries,
            Duration::from_millis(self.retry.base_delay_ms),
        )
    }
}
