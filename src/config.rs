// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Knine-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Knine and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Client configuration.
//!
//! Defaults are overridden by `KNINE_*` environment variables, which are in turn overridden by
//! CLI flags in `main`.

use std::{env, error::Error, fmt, time::Duration};

pub const DEFAULT_API_URL: &str = "http://localhost:8000";

pub const ENV_API_URL: &str = "KNINE_API_URL";
pub const ENV_TOP_K: &str = "KNINE_TOP_K";
pub const ENV_PREVIEW_CHARS: &str = "KNINE_PREVIEW_CHARS";
pub const ENV_RECENT_LIMIT: &str = "KNINE_RECENT_LIMIT";
pub const ENV_REQUEST_TIMEOUT_SECS: &str = "KNINE_REQUEST_TIMEOUT_SECS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub chat_top_k: u32,
    pub search_k: u32,
    pub preview_chars: u32,
    pub recent_files_limit: u32,
    pub open_folder_path: String,
    pub navigator_root: String,
    /// `None` keeps the transport default (no overall timeout).
    pub request_timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_owned(),
            chat_top_k: 5,
            search_k: 5,
            preview_chars: 800,
            recent_files_limit: 5,
            open_folder_path: ".".to_owned(),
            navigator_root: ".".to_owned(),
            request_timeout: None,
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(url) = non_empty(lookup(ENV_API_URL)) {
            config.set_base_url(ENV_API_URL, url)?;
        }
        if let Some(top_k) = positive_u32(ENV_TOP_K, lookup(ENV_TOP_K))? {
            config.chat_top_k = top_k;
            config.search_k = top_k;
        }
        if let Some(chars) = positive_u32(ENV_PREVIEW_CHARS, lookup(ENV_PREVIEW_CHARS))? {
            config.preview_chars = chars;
        }
        if let Some(limit) = positive_u32(ENV_RECENT_LIMIT, lookup(ENV_RECENT_LIMIT))? {
            config.recent_files_limit = limit;
        }
        if let Some(secs) =
            positive_u32(ENV_REQUEST_TIMEOUT_SECS, lookup(ENV_REQUEST_TIMEOUT_SECS))?
        {
            config.request_timeout = Some(Duration::from_secs(u64::from(secs)));
        }

        Ok(config)
    }

    /// Sets the backend URL. `source` names where the value came from (env var or CLI flag).
    pub fn set_base_url(&mut self, source: &str, url: impl Into<String>) -> Result<(), ConfigError> {
        let url = url.into();
        let trimmed = url.trim().trim_end_matches('/');
        if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
            return Err(ConfigError::InvalidValue {
                name: source.to_owned(),
                value: url,
                reason: "expected an http:// or https:// URL",
            });
        }
        self.base_url = trimmed.to_owned();
        Ok(())
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|value| value.trim().to_owned()).filter(|value| !value.is_empty())
}

fn positive_u32(name: &str, value: Option<String>) -> Result<Option<u32>, ConfigError> {
    let Some(raw) = non_empty(value) else {
        return Ok(None);
    };
    match raw.parse::<u32>() {
        Ok(parsed) if parsed > 0 => Ok(Some(parsed)),
        _ => Err(ConfigError::InvalidValue {
            name: name.to_owned(),
            value: raw,
            reason: "expected a positive integer",
        }),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidValue { name: String, value: String, reason: &'static str },
    HttpClient { message: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidValue { name, value, reason } => {
                write!(f, "invalid {name}={value:?}: {reason}")
            }
            Self::HttpClient { message } => write!(f, "failed to build HTTP client: {message}"),
        }
    }
}

impl Error for ConfigError {}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::time::Duration;

    use super::{ClientConfig, ConfigError, DEFAULT_API_URL};

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map = pairs
            .iter()
            .map(|(key, value)| ((*key).to_owned(), (*value).to_owned()))
            .collect::<HashMap<_, _>>();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults_without_env() {
        let config = ClientConfig::from_lookup(lookup(&[])).expect("config");
        assert_eq!(config.base_url, DEFAULT_API_URL);
        assert_eq!(config.chat_top_k, 5);
        assert_eq!(config.preview_chars, 800);
        assert_eq!(config.request_timeout, None);
    }

    #[test]
    fn env_overrides_are_applied() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("KNINE_API_URL", " http://k9.local:9000/ "),
            ("KNINE_TOP_K", "8"),
            ("KNINE_REQUEST_TIMEOUT_SECS", "30"),
        ]))
        .expect("config");

        assert_eq!(config.base_url, "http://k9.local:9000");
        assert_eq!(config.chat_top_k, 8);
        assert_eq!(config.search_k, 8);
        assert_eq!(config.request_timeout, Some(Duration::from_secs(30)));
    }

    #[test]
    fn invalid_values_are_errors_not_defaults() {
        let err = ClientConfig::from_lookup(lookup(&[("KNINE_TOP_K", "0")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));

        let err = ClientConfig::from_lookup(lookup(&[("KNINE_API_URL", "ftp://x")])).unwrap_err();
        assert!(err.to_string().contains("KNINE_API_URL"));
    }

    #[test]
    fn cli_url_errors_name_the_flag() {
        let mut config = ClientConfig::default();
        let err = config.set_base_url("--api-url", "localhost:8000").unwrap_err();
        assert!(err.to_string().contains("--api-url"));
        assert!(!err.to_string().contains("KNINE_API_URL"));
        assert_eq!(config.base_url, DEFAULT_API_URL);

        config.set_base_url("--api-url", "https://k9.example/").expect("valid url");
        assert_eq!(config.base_url, "https://k9.example");
    }
}
