//! Client configuration parsed from environment variables.

use crate::i18n::Locale;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

/// Errors produced while reading client configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// `BASE_URL` is set but is not an absolute http(s) URL.
    #[error("invalid BASE_URL '{0}': expected an http:// or https:// URL")]
    InvalidBaseUrl(String),

    /// `TUTORAT_LOCALE` names a locale the client does not ship.
    #[error("unknown TUTORAT_LOCALE: {0}")]
    UnknownLocale(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Backend origin every request path is appended to. Never ends in `/`.
    pub base_url: String,
    pub locale: Locale,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self { base_url: DEFAULT_BASE_URL.to_owned(), locale: Locale::default() }
    }
}

impl ClientConfig {
    /// Build typed client config from environment variables.
    ///
    /// Optional:
    /// - `BASE_URL`: backend origin, default `http://localhost:8080`
    /// - `TUTORAT_LOCALE`: `fr` (default) or `en`
    ///
    /// # Errors
    ///
    /// Returns an error if `BASE_URL` is not an http(s) URL or the locale is unknown.
    pub fn from_env() -> Result<Self, ConfigError> {
        let base_url = parse_base_url(std::env::var("BASE_URL").ok().as_deref())?;
        let locale = parse_locale(std::env::var("TUTORAT_LOCALE").ok().as_deref())?;
        Ok(Self { base_url, locale })
    }

    /// Replace the backend origin, applying the same rules as `BASE_URL`.
    ///
    /// # Errors
    ///
    /// Returns an error if `base_url` is not an http(s) URL.
    pub fn with_base_url(mut self, base_url: &str) -> Result<Self, ConfigError> {
        self.base_url = parse_base_url(Some(base_url))?;
        Ok(self)
    }
}

fn parse_base_url(raw: Option<&str>) -> Result<String, ConfigError> {
    let raw = match raw.map(str::trim) {
        None | Some("") => return Ok(DEFAULT_BASE_URL.to_owned()),
        Some(value) => value,
    };
    if !(raw.starts_with("http://") || raw.starts_with("https://")) {
        return Err(ConfigError::InvalidBaseUrl(raw.to_owned()));
    }
    Ok(raw.trim_end_matches('/').to_owned())
}

fn parse_locale(raw: Option<&str>) -> Result<Locale, ConfigError> {
    match raw {
        None | Some("") => Ok(Locale::default()),
        Some(code) => Locale::from_code(code).ok_or_else(|| ConfigError::UnknownLocale(code.to_owned())),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
