//! Application Configuration
//!
//! Configuration for the trademark application layer.

use std::env;
use std::time::Duration;

pub use platform::cookie::{CookieConfig, SameSite};
pub use platform::rate_limit::RateLimitPolicy;

use crate::domain::services::NameLimits;

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";

/// Text-generation provider settings
#[derive(Clone, PartialEq)]
pub struct ProviderSettings {
    /// Provider credential; absence is reported per call
    pub api_key: Option<String>,
    /// OpenAI-compatible API root, without trailing slash
    pub base_url: String,
    pub model: String,
    /// High temperature favors novel names
    pub temperature: f32,
    /// Sized for about 10 short JSON records
    pub max_tokens: u32,
    pub timeout: Duration,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            model: DEFAULT_OPENAI_MODEL.to_string(),
            temperature: 0.95,
            max_tokens: 1000,
            timeout: Duration::from_secs(30),
        }
    }
}

// Keep the credential out of logs
impl std::fmt::Debug for ProviderSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderSettings")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl ProviderSettings {
    /// Read `OPENAI_API_KEY`, `OPENAI_BASE_URL` and `OPENAI_MODEL`
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            api_key: non_empty_var("OPENAI_API_KEY"),
            base_url: non_empty_var("OPENAI_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.base_url),
            model: non_empty_var("OPENAI_MODEL").unwrap_or(defaults.model),
            ..defaults
        }
    }

    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }
}

/// Trademark application configuration
#[derive(Debug, Clone)]
pub struct TrademarkConfig {
    /// Ordered quota tiers
    pub rate_limit: RateLimitPolicy,
    pub provider: ProviderSettings,
    /// Identity cookie
    pub cookie: CookieConfig,
    pub limits: NameLimits,
}

impl Default for TrademarkConfig {
    fn default() -> Self {
        Self {
            rate_limit: RateLimitPolicy::standard(),
            provider: ProviderSettings::default(),
            cookie: CookieConfig::default(),
            limits: NameLimits::default(),
        }
    }
}

impl TrademarkConfig {
    /// Create config for development (insecure cookie)
    pub fn development() -> Self {
        Self {
            cookie: CookieConfig::insecure(),
            ..Default::default()
        }
    }

    /// Production defaults with provider settings from the environment
    pub fn from_env() -> Self {
        let base = if cfg!(debug_assertions) {
            Self::development()
        } else {
            Self::default()
        };
        Self {
            provider: ProviderSettings::from_env(),
            ..base
        }
    }

    pub fn with_rate_limit(mut self, policy: RateLimitPolicy) -> Self {
        self.rate_limit = policy;
        self
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
