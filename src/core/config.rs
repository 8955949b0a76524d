use std::fmt;
use std::time::Duration;

use thiserror::Error;
use tracing::{error, info};

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_DEVICE_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_GEMINI_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} environment variable is required")]
    Missing(&'static str),
    #[error("invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// SOCKS5 proxy used for the Telegram connection only.
#[derive(Clone, PartialEq, Eq)]
pub struct ProxyConfig {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl ProxyConfig {
    pub fn url(&self) -> String {
        match (&self.username, &self.password) {
            (Some(user), Some(pass)) => {
                format!("socks5://{}:{}@{}:{}", user, pass, self.host, self.port)
            }
            _ => format!("socks5://{}:{}", self.host, self.port),
        }
    }
}

impl fmt::Debug for ProxyConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProxyConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "****"))
            .finish()
    }
}

/// Process-wide settings, read once at startup and shared read-only afterwards.
#[derive(Clone)]
pub struct AppConfig {
    pub telegram_token: String,
    pub gemini_api_key: String,
    pub gemini_model: String,
    pub gemini_api_base: String,
    pub gemini_timeout: Duration,
    pub pc_api_base_url: String,
    pub pc_api_timeout: Duration,
    pub proxy: Option<ProxyConfig>,
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("telegram_token", &"****")
            .field("gemini_api_key", &"****")
            .field("gemini_model", &self.gemini_model)
            .field("gemini_api_base", &self.gemini_api_base)
            .field("gemini_timeout", &self.gemini_timeout)
            .field("pc_api_base_url", &self.pc_api_base_url)
            .field("pc_api_timeout", &self.pc_api_timeout)
            .field("proxy", &self.proxy)
            .finish()
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let telegram_token =
            get("TELEGRAM_BOT_TOKEN").ok_or(ConfigError::Missing("TELEGRAM_BOT_TOKEN"))?;
        let gemini_api_key = get("GEMINI_API_KEY").ok_or(ConfigError::Missing("GEMINI_API_KEY"))?;
        let pc_api_base_url = normalize_base_url(
            "PC_API_BASE_URL",
            &get("PC_API_BASE_URL").ok_or(ConfigError::Missing("PC_API_BASE_URL"))?,
        )?;

        let gemini_api_base = match get("GEMINI_API_BASE") {
            Some(base) => normalize_base_url("GEMINI_API_BASE", &base)?,
            None => DEFAULT_GEMINI_API_BASE.to_string(),
        };

        Ok(Self {
            telegram_token,
            gemini_api_key,
            gemini_model: get("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
            gemini_api_base,
            gemini_timeout: parse_timeout(
                "GEMINI_TIMEOUT_SECS",
                get("GEMINI_TIMEOUT_SECS"),
                DEFAULT_GEMINI_TIMEOUT_SECS,
            )?,
            pc_api_base_url,
            pc_api_timeout: parse_timeout(
                "PC_API_TIMEOUT_SECS",
                get("PC_API_TIMEOUT_SECS"),
                DEFAULT_DEVICE_TIMEOUT_SECS,
            )?,
            proxy: parse_proxy(&get),
        })
    }
}

fn normalize_base_url(name: &'static str, raw: &str) -> Result<String, ConfigError> {
    let parsed = url::Url::parse(raw).map_err(|e| ConfigError::Invalid {
        name,
        reason: e.to_string(),
    })?;
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(ConfigError::Invalid {
            name,
            reason: format!("unsupported scheme '{}'", parsed.scheme()),
        });
    }
    Ok(raw.trim_end_matches('/').to_string())
}

fn parse_timeout(
    name: &'static str,
    raw: Option<String>,
    default_secs: u64,
) -> Result<Duration, ConfigError> {
    let secs = match raw {
        None => default_secs,
        Some(v) => v.parse::<u64>().map_err(|e| ConfigError::Invalid {
            name,
            reason: e.to_string(),
        })?,
    };
    if secs == 0 {
        return Err(ConfigError::Invalid {
            name,
            reason: "timeout must be greater than zero".to_string(),
        });
    }
    Ok(Duration::from_secs(secs))
}

// A bad proxy port is not fatal: the bot falls back to a direct connection.
fn parse_proxy<G>(get: &G) -> Option<ProxyConfig>
where
    G: Fn(&str) -> Option<String>,
{
    let (Some(host), Some(port)) = (get("PROXY_HOST"), get("PROXY_PORT")) else {
        info!("No proxy configuration found, connecting directly");
        return None;
    };

    let port = match port.parse::<u16>() {
        Ok(port) => port,
        Err(_) => {
            error!("Invalid proxy port: {}", port);
            return None;
        }
    };

    let (username, password) = match (get("PROXY_USERNAME"), get("PROXY_PASSWORD")) {
        (Some(user), Some(pass)) => (Some(user), Some(pass)),
        _ => (None, None),
    };

    info!("Using SOCKS proxy: {}:{}", host, port);
    Some(ProxyConfig {
        host,
        port,
        username,
        password,
    })
}
