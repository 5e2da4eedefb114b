use std::{fs, time::Duration};

use serde::Deserialize;
use thiserror::Error;
use url::Url;

pub const SETTINGS_FILE: &str = "client.toml";
pub const API_URL_ENV: &str = "CHURN_API_URL";
pub const API_URL_ENV_ALIAS: &str = "APP__API_URL";
pub const REQUEST_TIMEOUT_ENV: &str = "CHURN_REQUEST_TIMEOUT_SECS";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("prediction service URL is not configured; set CHURN_API_URL or `api_url` in client.toml")]
    MissingApiUrl,
    #[error("invalid prediction service URL {url:?}: {reason}")]
    InvalidApiUrl { url: String, reason: String },
    #[error("invalid request timeout {0:?}; expected a positive number of seconds")]
    InvalidTimeout(String),
    #[error("failed to parse client.toml: {0}")]
    File(#[from] toml::de::Error),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClientSettings {
    pub api_base_url: Url,
    pub request_timeout: Duration,
}

impl ClientSettings {
    pub fn new(api_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            api_base_url: parse_api_url(api_url)?,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        })
    }

    pub fn predict_url(&self) -> String {
        format!("{}/predict", self.api_base_url.as_str().trim_end_matches('/'))
    }
}

/// Values given on a command line; they beat both the file and the environment.
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    pub api_url: Option<String>,
    pub request_timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    api_url: Option<String>,
    request_timeout_secs: Option<u64>,
}

pub fn load_settings(overrides: &SettingsOverrides) -> Result<ClientSettings, ConfigError> {
    let file = fs::read_to_string(SETTINGS_FILE).ok();
    resolve_settings(file.as_deref(), |name| std::env::var(name).ok(), overrides)
}

/// File first, then environment, then overrides.
pub fn resolve_settings(
    file_contents: Option<&str>,
    env: impl Fn(&str) -> Option<String>,
    overrides: &SettingsOverrides,
) -> Result<ClientSettings, ConfigError> {
    let file = match file_contents {
        Some(raw) => toml::from_str::<FileSettings>(raw)?,
        None => FileSettings::default(),
    };

    let mut api_url = file.api_url;
    let mut request_timeout = match file.request_timeout_secs {
        Some(secs) => timeout_from_secs(secs)?,
        None => DEFAULT_REQUEST_TIMEOUT,
    };

    if let Some(v) = env(API_URL_ENV) {
        api_url = Some(v);
    }
    if let Some(v) = env(API_URL_ENV_ALIAS) {
        api_url = Some(v);
    }
    if let Some(v) = env(REQUEST_TIMEOUT_ENV) {
        request_timeout = parse_timeout_secs(&v)?;
    }

    if let Some(v) = &overrides.api_url {
        api_url = Some(v.clone());
    }
    if let Some(secs) = overrides.request_timeout_secs {
        request_timeout = timeout_from_secs(secs)?;
    }

    let api_url = api_url
        .filter(|v| !v.trim().is_empty())
        .ok_or(ConfigError::MissingApiUrl)?;

    Ok(ClientSettings {
        api_base_url: parse_api_url(&api_url)?,
        request_timeout,
    })
}

pub fn parse_api_url(raw: &str) -> Result<Url, ConfigError> {
    let raw = raw.trim();
    let url = Url::parse(raw).map_err(|err| ConfigError::InvalidApiUrl {
        url: raw.to_string(),
        reason: err.to_string(),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidApiUrl {
            url: raw.to_string(),
            reason: format!("unsupported scheme `{}`", url.scheme()),
        });
    }
    Ok(url)
}

fn parse_timeout_secs(raw: &str) -> Result<Duration, ConfigError> {
    let secs = raw
        .trim()
        .parse::<u64>()
        .map_err(|_| ConfigError::InvalidTimeout(raw.to_string()))?;
    timeout_from_secs(secs)
}

fn timeout_from_secs(secs: u64) -> Result<Duration, ConfigError> {
    if secs == 0 {
        return Err(ConfigError::InvalidTimeout(secs.to_string()));
    }
    Ok(Duration::from_secs(secs))
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
