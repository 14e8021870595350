//! Locale configuration and message catalogs.
//!
//! DESIGN
//! ======
//! Two locales ship with the client: `fr` (default) and `en`. Routes carry no
//! locale prefix. Each locale's messages live in an external JSON file of
//! nested objects; keys are resolved with dotted paths (`auth.logout.success`)
//! and fall back to the default locale when the active catalog lacks them.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Fr,
    En,
}

impl Locale {
    pub const ALL: [Locale; 2] = [Locale::Fr, Locale::En];

    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::Fr => "fr",
            Self::En => "en",
        }
    }

    /// Display name in the locale's own language.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Fr => "Français",
            Self::En => "English",
        }
    }

    /// File name of the locale's message catalog.
    #[must_use]
    pub fn file(self) -> &'static str {
        match self {
            Self::Fr => "fr.json",
            Self::En => "en.json",
        }
    }

    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|locale| locale.code().eq_ignore_ascii_case(code.trim()))
    }
}

/// How locales appear in application routes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RoutingStrategy {
    /// Routes are identical for every locale.
    #[default]
    NoPrefix,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct I18nConfig {
    pub default_locale: Locale,
    pub strategy: RoutingStrategy,
    pub locales: Vec<Locale>,
}

impl Default for I18nConfig {
    fn default() -> Self {
        Self { default_locale: Locale::Fr, strategy: RoutingStrategy::NoPrefix, locales: Locale::ALL.to_vec() }
    }
}

impl I18nConfig {
    /// Resolve a requested locale, falling back to the default when it is not configured.
    #[must_use]
    pub fn resolve(&self, requested: Option<Locale>) -> Locale {
        requested
            .filter(|locale| self.locales.contains(locale))
            .unwrap_or(self.default_locale)
    }

    /// Path of `locale`'s catalog inside `dir`.
    #[must_use]
    pub fn catalog_path(&self, dir: &Path, locale: Locale) -> PathBuf {
        dir.join(locale.file())
    }
}

/// Errors produced while loading a message catalog.
#[derive(Debug, thiserror::Error)]
pub enum I18nError {
    #[error("failed to read catalog {path}: {source}")]
    Io { path: PathBuf, source: std::io::Error },

    #[error("catalog parse failed: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("catalog root must be a JSON object")]
    NotAnObject,
}

/// Messages for a single locale.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    locale: Locale,
    messages: Value,
}

impl Catalog {
    /// Parse a catalog from its JSON text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not JSON or its root is not an object.
    pub fn from_json_str(locale: Locale, json: &str) -> Result<Self, I18nError> {
        let messages: Value = serde_json::from_str(json)?;
        if !messages.is_object() {
            return Err(I18nError::NotAnObject);
        }
        Ok(Self { locale, messages })
    }

    /// Load `locale`'s catalog file from `dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(dir: &Path, locale: Locale) -> Result<Self, I18nError> {
        let path = dir.join(locale.file());
        let json = std::fs::read_to_string(&path).map_err(|source| I18nError::Io { path: path.clone(), source })?;
        tracing::debug!(locale = locale.code(), path = %path.display(), "loaded locale catalog");
        Self::from_json_str(locale, &json)
    }

    #[must_use]
    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// Look up a dotted key. Only string leaves resolve.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        key.split('.')
            .try_fold(&self.messages, |node, segment| node.get(segment))
            .and_then(Value::as_str)
    }
}

/// Active catalog plus the default-locale fallback.
#[derive(Debug, Clone)]
pub struct Translator {
    active: Catalog,
    fallback: Option<Catalog>,
}

impl Translator {
    #[must_use]
    pub fn new(active: Catalog, fallback: Option<Catalog>) -> Self {
        Self { active, fallback }
    }

    /// Load the catalogs for `locale` (and the default locale, when different) from `dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if either catalog cannot be loaded.
    pub fn load(config: &I18nConfig, dir: &Path, locale: Locale) -> Result<Self, I18nError> {
        let locale = config.resolve(Some(locale));
        let active = Catalog::load(dir, locale)?;
        let fallback = if locale == config.default_locale {
            None
        } else {
            Some(Catalog::load(dir, config.default_locale)?)
        };
        Ok(Self { active, fallback })
    }

    #[must_use]
    pub fn locale(&self) -> Locale {
        self.active.locale()
    }

    /// Translate `key`, returning the key itself when no catalog has it.
    #[must_use]
    pub fn t<'a>(&'a self, key: &'a str) -> &'a str {
        self.active
            .get(key)
            .or_else(|| self.fallback.as_ref().and_then(|catalog| catalog.get(key)))
            .unwrap_or(key)
    }
}

#[cfg(test)]
#[path = "i18n_test.rs"]
mod tests;
