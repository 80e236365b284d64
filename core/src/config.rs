//! Client configuration.

use std::env;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";
pub const DEFAULT_PAGE_SIZE: u32 = 5;

#[derive(Clone, Debug, PartialEq)]
pub struct ClientConfig {
    pub base_url: String,
    /// Per-request timeout. `None` keeps the HTTP client's default.
    pub timeout: Option<Duration>,
    pub user_agent: String,
    pub default_page_size: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: None,
            user_agent: concat!("diary-core/", env!("CARGO_PKG_VERSION")).to_string(),
            default_page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            ..Self::default()
        }
    }

    /// Read `DIARY_BASE_URL`, `DIARY_TIMEOUT_SECS` and `DIARY_PAGE_SIZE`,
    /// falling back to the defaults for unset variables.
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, String> {
        let mut config = Self::default();
        if let Some(url) = lookup("DIARY_BASE_URL") {
            config.base_url = url;
        }
        if let Some(raw) = lookup("DIARY_TIMEOUT_SECS") {
            let secs: u64 = raw
                .parse()
                .map_err(|_| format!("DIARY_TIMEOUT_SECS must be a whole number of seconds, got `{raw}`"))?;
            config.timeout = Some(Duration::from_secs(secs));
        }
        if let Some(raw) = lookup("DIARY_PAGE_SIZE") {
            config.default_page_size = match raw.parse::<u32>() {
                Ok(size) if size > 0 => size,
                _ => return Err(format!("DIARY_PAGE_SIZE must be a positive integer, got `{raw}`")),
            };
        }
        Ok(config)
    }
}
