//! Where a rule set comes from.
//!
//! The bundled assets are picked by an explicit [`Language`] rather than by
//! probing the parser, and are resolved once when the matcher is built.

use crate::{ConfigError, RuleSet};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Language of a bundled rule asset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Language {
    #[default]
    English,
    Russian,
}

impl Language {
    pub fn code(self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Russian => "ru",
        }
    }

    pub(crate) fn bundled_rules(self) -> &'static str {
        match self {
            Language::English => include_str!("../../assets/en_patterns.json"),
            Language::Russian => include_str!("../../assets/ru_patterns.json"),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unsupported language '{0}' (expected en or ru)")]
pub struct UnknownLanguage(pub String);

impl FromStr for Language {
    type Err = UnknownLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "en" | "english" => Ok(Language::English),
            "ru" | "russian" => Ok(Language::Russian),
            _ => Err(UnknownLanguage(s.to_string())),
        }
    }
}

/// Rule configuration resource. Defaults to the bundled English rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleSource {
    Bundled(Language),
    File(PathBuf),
    /// JSON text in the rule file schema.
    Inline(String),
}

impl Default for RuleSource {
    fn default() -> Self {
        RuleSource::Bundled(Language::default())
    }
}

impl RuleSource {
    pub fn load(&self) -> Result<RuleSet, ConfigError> {
        match self {
            RuleSource::Bundled(language) => RuleSet::bundled(*language),
            RuleSource::File(path) => RuleSet::from_path(path),
            RuleSource::Inline(json) => RuleSet::from_json_str(json),
        }
    }
}
