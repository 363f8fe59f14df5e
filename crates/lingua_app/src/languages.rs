//! Source of the current locale and the per-locale fallbacks.

use indexmap::IndexMap;

/// Supplies the initial translator locale and fallbacks.
pub trait LocaleSource: Send + Sync {
    fn current_locale(&self) -> String;

    /// Locale → fallback locale.
    fn fallbacks(&self) -> IndexMap<String, String>;
}

/// A configured application language.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Language {
    pub locale: String,
    pub default: bool,
    pub fallback: Option<String>,
    pub active: bool,
}

impl Language {
    pub fn new(locale: impl Into<String>) -> Self {
        Self {
            locale: locale.into(),
            default: false,
            fallback: None,
            active: true,
        }
    }

    pub fn default_language(mut self) -> Self {
        self.default = true;
        self
    }

    pub fn fallback(mut self, locale: impl Into<String>) -> Self {
        self.fallback = Some(locale.into());
        self
    }

    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }
}

/// An ordered list of languages.
#[derive(Clone, Debug, Default)]
pub struct Languages {
    languages: Vec<Language>,
}

impl Languages {
    pub fn new(languages: impl IntoIterator<Item = Language>) -> Self {
        Self {
            languages: languages.into_iter().collect(),
        }
    }

    /// The active default language, else the first active one.
    pub fn current(&self) -> Option<&Language> {
        self.languages
            .iter()
            .find(|l| l.active && l.default)
            .or_else(|| self.languages.iter().find(|l| l.active))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Language> {
        self.languages.iter()
    }
}

impl LocaleSource for Languages {
    fn current_locale(&self) -> String {
        self.current()
            .map(|l| l.locale.clone())
            .unwrap_or_else(|| lingua_i18n::DEFAULT_LOCALE.to_string())
    }

    fn fallbacks(&self) -> IndexMap<String, String> {
        self.languages
            .iter()
            .filter_map(|l| Some((l.locale.clone(), l.fallback.clone()?)))
            .collect()
    }
}
