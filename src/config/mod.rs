//! Configuration loaded from environment variables

use std::path::PathBuf;
use std::time::Duration;

use crate::error::{ConfigError, Result};
use crate::output::formatters::truncate_chars;

pub const API_KEY_VAR: &str = "CREBAIN_API_KEY";
pub const BASE_URL_VAR: &str = "CREBAIN_BASE_URL";
pub const ANON_KEY_VAR: &str = "SUPABASE_ANON_KEY";
pub const DOWNLOAD_DIR_VAR: &str = "CREBAIN_DOWNLOAD_DIR";
pub const TIMEOUT_VAR: &str = "CREBAIN_TIMEOUT_SECONDS";
pub const WEBHOOK_SECRET_VAR: &str = "WEBHOOK_SECRET";
pub const PORT_VAR: &str = "PORT";

/// Required prefix of every Crebain API key
pub const API_KEY_PREFIX: &str = "ck_";

const DEFAULT_DOWNLOAD_DIR: &str = "downloads";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_PORT: u16 = 5001;

/// Characters that indicate a value was pasted across lines
const FORBIDDEN_WHITESPACE: [char; 4] = [' ', '\t', '\r', '\n'];

/// Validated client configuration.
///
/// Built once at startup by [`Config::from_env`] and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Crebain API key (`ck_live_...`)
    pub api_key: String,

    /// API base URL, without trailing slash
    pub base_url: String,

    /// Supabase anon key for the gateway, if configured
    pub anon_key: Option<String>,

    /// Directory downloaded files are written to
    pub download_dir: PathBuf,

    /// Per-request HTTP timeout
    pub timeout: Duration,
}

impl Config {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(env_lookup)
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// Variables that are set but empty are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.is_empty());

        let api_key = validate_api_key(get(API_KEY_VAR).unwrap_or_default().trim())?;
        let base_url = validate_base_url(
            get(BASE_URL_VAR)
                .unwrap_or_default()
                .trim()
                .trim_end_matches('/'),
        )?;

        let anon_key = get(ANON_KEY_VAR)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());

        let download_dir = get(DOWNLOAD_DIR_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DOWNLOAD_DIR));

        let timeout_secs = match get(TIMEOUT_VAR) {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => secs,
                _ => {
                    return Err(ConfigError::InvalidNumber {
                        var: TIMEOUT_VAR,
                        expected: "a positive number of seconds",
                        value: raw,
                    }
                    .into());
                }
            },
            None => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            api_key,
            base_url,
            anon_key,
            download_dir,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

/// Webhook receiver settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookConfig {
    /// Shared secret the webhook was registered with
    pub secret: String,

    /// Port the receiver listens on
    pub port: u16,
}

impl WebhookConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(env_lookup)
    }

    /// Only the shared secret; subscription commands never bind a port.
    pub fn secret_from_env() -> String {
        Self::secret_from_lookup(env_lookup)
    }

    pub fn secret_from_lookup<F>(lookup: F) -> String
    where
        F: Fn(&str) -> Option<String>,
    {
        lookup(WEBHOOK_SECRET_VAR).unwrap_or_default()
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.is_empty());

        let port = match get(PORT_VAR) {
            Some(raw) => match raw.trim().parse::<u16>() {
                Ok(port) if port > 0 => port,
                _ => {
                    return Err(ConfigError::InvalidNumber {
                        var: PORT_VAR,
                        expected: "a port number between 1 and 65535",
                        value: raw,
                    }
                    .into());
                }
            },
            None => DEFAULT_PORT,
        };

        Ok(Self {
            secret: Self::secret_from_lookup(&lookup),
            port,
        })
    }
}

fn env_lookup(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

fn validate_api_key(api_key: &str) -> std::result::Result<String, ConfigError> {
    if api_key.is_empty() {
        return Err(ConfigError::MissingApiKey);
    }
    if !api_key.starts_with(API_KEY_PREFIX) {
        return Err(ConfigError::ApiKeyPrefix {
            got: truncate_chars(api_key, 50).0.to_string(),
        });
    }
    if api_key.contains(FORBIDDEN_WHITESPACE) {
        return Err(ConfigError::ApiKeyWhitespace {
            got: truncate_chars(api_key, 80).0.to_string(),
        });
    }
    Ok(api_key.to_string())
}

fn validate_base_url(base_url: &str) -> std::result::Result<String, ConfigError> {
    if base_url.is_empty() {
        return Err(ConfigError::MissingBaseUrl);
    }
    if !base_url.starts_with("https://") {
        return Err(ConfigError::BaseUrlScheme {
            got: truncate_chars(base_url, 50).0.to_string(),
        });
    }
    if base_url.contains(FORBIDDEN_WHITESPACE) {
        return Err(ConfigError::BaseUrlWhitespace {
            got: truncate_chars(base_url, 80).0.to_string(),
        });
    }
    Ok(base_url.to_string())
}
