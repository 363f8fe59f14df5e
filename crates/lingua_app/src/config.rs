//! Translation configuration file handling

use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use lingua_i18n::files::ResourceDir;
use lingua_i18n::Translator;

/// File name looked up in the application's config directory.
pub const CONFIG_FILE: &str = "translation.toml";

/// Translator settings (translation.toml)
#[derive(Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct TranslationConfig {
    /// Default locale
    #[serde(default)]
    pub locale: Option<String>,
    /// Locale -> fallback locale
    #[serde(default)]
    pub fallbacks: IndexMap<String, String>,
    /// Locale -> canonical locale, applied before fallbacks
    #[serde(default)]
    pub mapping: IndexMap<String, String>,
    /// Additional translation directories
    #[serde(default)]
    pub dirs: Vec<DirConfig>,
}

/// An extra translation directory
#[derive(Debug, Deserialize, Serialize, PartialEq)]
pub struct DirConfig {
    /// Absolute, or relative to the app directory
    pub path: PathBuf,
    #[serde(default = "default_priority")]
    pub priority: i32,
}

fn default_priority() -> i32 {
    200
}

impl TranslationConfig {
    /// Load `translation.toml` from a directory, if present.
    pub fn load_from_dir(path: &Path) -> Result<Option<Self>> {
        let config_path = path.join(CONFIG_FILE);
        if !config_path.exists() {
            return Ok(None);
        }
        Self::load(&config_path).map(Some)
    }

    pub fn load(config_path: &Path) -> Result<Self> {
        let content = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;

        let config: TranslationConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", config_path.display()))?;

        Ok(config)
    }

    /// Apply locale, fallbacks and mapping. Empty sections leave the
    /// translator untouched.
    pub fn apply(&self, translator: &Translator) {
        if let Some(locale) = &self.locale {
            translator.set_locale(locale.as_str());
        }
        if !self.fallbacks.is_empty() {
            translator.set_locale_fallbacks(&self.fallbacks);
        }
        if !self.mapping.is_empty() {
            translator.set_locale_mapping(&self.mapping);
        }
    }

    /// Extra translation directories, relative paths resolved against `base`.
    pub fn resource_dirs(&self, base: &Path) -> Vec<ResourceDir> {
        self.dirs
            .iter()
            .map(|d| ResourceDir::new(base.join(&d.path), d.priority))
            .collect()
    }

    /// Serialize to TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize translation config")
    }
}
