use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown locale: {0}")]
pub struct ParseLocaleError(pub String);

/// Display language for prompts and explanations.
///
/// Only selects which text variant is shown; scoring never looks at it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    De,
}

impl Locale {
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::De => "de",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Locale {
    type Err = ParseLocaleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Locale::En),
            "de" => Ok(Locale::De),
            _ => Err(ParseLocaleError(s.to_owned())),
        }
    }
}

/// Text with an English base and an optional German variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalizedText {
    en: String,
    de: Option<String>,
}

impl LocalizedText {
    #[must_use]
    pub fn new(en: impl Into<String>, de: Option<String>) -> Self {
        Self { en: en.into(), de }
    }

    #[must_use]
    pub fn en_only(en: impl Into<String>) -> Self {
        Self::new(en, None)
    }

    #[must_use]
    pub fn both(en: impl Into<String>, de: impl Into<String>) -> Self {
        Self::new(en, Some(de.into()))
    }

    /// Returns the variant for `locale`, falling back to English.
    #[must_use]
    pub fn get(&self, locale: Locale) -> &str {
        match locale {
            Locale::De => self.de.as_deref().unwrap_or(&self.en),
            Locale::En => &self.en,
        }
    }

    #[must_use]
    pub fn en(&self) -> &str {
        &self.en
    }

    #[must_use]
    pub fn de(&self) -> Option<&str> {
        self.de.as_deref()
    }

    pub(crate) fn is_blank(&self) -> bool {
        self.en.trim().is_empty()
    }

    /// Applies `f` to every variant.
    #[must_use]
    pub fn map(self, f: impl Fn(String) -> String) -> Self {
        Self {
            en: f(self.en),
            de: self.de.map(f),
        }
    }
}
