use std::borrow::Cow;
use std::fmt;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use indexmap::IndexMap;
use tracing::debug;

use crate::locale::normalize_locale;
use crate::message::{ArgValue, Message, SRC_ARG};
use crate::missing::{MissingTranslationHandler, ReturnKey};
use crate::modifier::Modifiers;
use crate::resolver::{resolve, LocaleFallbacks, LocaleMapping};
use crate::resource::Resources;

/// Locale used when nothing else is configured.
pub const DEFAULT_LOCALE: &str = "en";

/// Locale settings, read and replaced under one lock so a lookup always sees
/// a consistent combination.
#[derive(Clone, Debug, Default, PartialEq)]
struct LocaleState {
    locale: String,
    fallbacks: LocaleFallbacks,
    mapping: LocaleMapping,
}

/// Translates message keys against a shared resource store.
///
/// Locale, fallbacks and mapping can be replaced at any time; the change is
/// seen by the next lookup.
pub struct Translator {
    state: RwLock<LocaleState>,
    resources: Resources,
    modifiers: Modifiers,
    missing: Box<dyn MissingTranslationHandler>,
}

impl Translator {
    /// A translator over `resources` with default modifiers and missing handler.
    pub fn new(resources: Resources) -> Self {
        Self::builder().resources(resources).build()
    }

    pub fn builder() -> TranslatorBuilder {
        TranslatorBuilder::default()
    }

    /// Shared handle to the resource store. Resources added through it are
    /// visible immediately.
    pub fn resources(&self) -> &Resources {
        &self.resources
    }

    pub fn locale(&self) -> String {
        self.read_state().locale.clone()
    }

    /// Set the default locale. Empty input is ignored.
    pub fn set_locale(&self, locale: impl Into<String>) {
        let loc = normalize_locale(&locale.into());
        if loc.is_empty() {
            return;
        }

        let mut state = self.write_state();
        if state.locale == loc {
            return;
        }
        debug!("Translator::set_locale: {} -> {}", state.locale, loc);
        state.locale = loc;
    }

    pub fn locale_fallbacks(&self) -> LocaleFallbacks {
        self.read_state().fallbacks.clone()
    }

    /// Replace the fallback map wholesale.
    pub fn set_locale_fallbacks<I, K, V>(&self, fallbacks: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let map = normalize_map(fallbacks);
        debug!(fallbacks = ?map, "Translator::set_locale_fallbacks");
        self.write_state().fallbacks = map;
    }

    pub fn locale_mapping(&self) -> LocaleMapping {
        self.read_state().mapping.clone()
    }

    /// Replace the locale mapping wholesale.
    pub fn set_locale_mapping<I, K, V>(&self, mapping: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let map = normalize_map(mapping);
        debug!(mapping = ?map, "Translator::set_locale_mapping");
        self.write_state().mapping = map;
    }

    /// Replace locale, fallbacks and mapping in one step.
    ///
    /// Concurrent lookups see either the old or the new settings, never a mix.
    pub fn set_locale_settings<F, FK, FV, M, MK, MV>(
        &self,
        locale: &str,
        fallbacks: F,
        mapping: M,
    ) where
        F: IntoIterator<Item = (FK, FV)>,
        FK: AsRef<str>,
        FV: AsRef<str>,
        M: IntoIterator<Item = (MK, MV)>,
        MK: AsRef<str>,
        MV: AsRef<str>,
    {
        let locale = normalize_locale(locale);
        let fallbacks = normalize_map(fallbacks);
        let mapping = normalize_map(mapping);
        let mut state = self.write_state();
        if !locale.is_empty() {
            state.locale = locale;
        }
        state.fallbacks = fallbacks;
        state.mapping = mapping;
        debug!(
            locale = %state.locale,
            fallbacks = ?state.fallbacks,
            mapping = ?state.mapping,
            "Translator::set_locale_settings"
        );
    }

    /// Locales searched for a lookup in `locale` (or the default locale).
    pub fn candidate_locales(&self, locale: Option<&str>) -> Vec<String> {
        let state = self.read_state();
        resolve(locale, &state.locale, &state.mapping, &state.fallbacks)
    }

    /// Translate `key` with string-like parameters.
    ///
    /// A `src` parameter restricts the lookup to resources of that name and
    /// is not used for substitution.
    pub fn translate<I, K, V>(&self, key: &str, params: I, locale: Option<&str>) -> String
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<Cow<'static, str>>,
        V: Into<ArgValue>,
    {
        let msg = Message::with_params(key.to_string(), params);
        self.trans(&msg, locale)
    }

    /// Translate a message in `locale`, or the default locale when `None`.
    pub fn trans(&self, msg: &Message, locale: Option<&str>) -> String {
        let mut scoped;
        let msg = if msg.args.iter().any(|(k, _)| k.as_ref() == SRC_ARG) {
            scoped = msg.clone();
            scoped.lift_src();
            &scoped
        } else {
            msg
        };

        let src = msg.src.as_deref();
        let (candidates, requested) = {
            let state = self.read_state();
            let candidates = resolve(locale, &state.locale, &state.mapping, &state.fallbacks);
            let requested = locale
                .map(normalize_locale)
                .filter(|l| !l.is_empty())
                .unwrap_or_else(|| state.locale.clone());
            (candidates, requested)
        };
        for loc in &candidates {
            if let Some(tmpl) = self.resources.lookup(loc, src, &msg.id) {
                return self.modifiers.apply(&tmpl, &msg.args);
            }
        }

        debug!(
            key = %msg.id,
            locale = %requested,
            src = ?src,
            candidates = ?candidates,
            "no translation found"
        );
        let fallback = self.missing.missing(&msg.id, &requested);
        self.modifiers.apply(&fallback, &msg.args)
    }
}

impl Translator {
    fn read_state(&self) -> RwLockReadGuard<'_, LocaleState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, LocaleState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for Translator {
    fn default() -> Self {
        Self::new(Resources::new())
    }
}

impl fmt::Debug for Translator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.read_state();
        f.debug_struct("Translator")
            .field("locale", &state.locale)
            .field("fallbacks", &state.fallbacks)
            .field("mapping", &state.mapping)
            .field("resources", &self.resources.len())
            .field("modifiers", &self.modifiers)
            .finish_non_exhaustive()
    }
}

fn normalize_map<I, K, V>(pairs: I) -> IndexMap<String, String>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (normalize_locale(k.as_ref()), normalize_locale(v.as_ref())))
        .filter(|(k, v)| !k.is_empty() && !v.is_empty())
        .collect()
}

/// Builder for [`Translator`].
#[derive(Default)]
pub struct TranslatorBuilder {
    locale: Option<String>,
    fallbacks: LocaleFallbacks,
    mapping: LocaleMapping,
    resources: Option<Resources>,
    modifiers: Option<Modifiers>,
    missing: Option<Box<dyn MissingTranslationHandler>>,
}

impl TranslatorBuilder {
    pub fn locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = Some(locale.into());
        self
    }

    pub fn fallbacks<I, K, V>(mut self, fallbacks: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        self.fallbacks = normalize_map(fallbacks);
        self
    }

    pub fn mapping<I, K, V>(mut self, mapping: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        self.mapping = normalize_map(mapping);
        self
    }

    pub fn resources(mut self, resources: Resources) -> Self {
        self.resources = Some(resources);
        self
    }

    pub fn modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = Some(modifiers);
        self
    }

    pub fn missing_handler(mut self, handler: impl MissingTranslationHandler + 'static) -> Self {
        self.missing = Some(Box::new(handler));
        self
    }

    pub fn missing_handler_boxed(mut self, handler: Box<dyn MissingTranslationHandler>) -> Self {
        self.missing = Some(handler);
        self
    }

    pub fn build(self) -> Translator {
        let locale = self
            .locale
            .map(|l| normalize_locale(&l))
            .filter(|l| !l.is_empty())
            .unwrap_or_else(|| DEFAULT_LOCALE.to_string());

        Translator {
            state: RwLock::new(LocaleState {
                locale,
                fallbacks: self.fallbacks,
                mapping: self.mapping,
            }),
            resources: self.resources.unwrap_or_default(),
            modifiers: self.modifiers.unwrap_or_default(),
            missing: self.missing.unwrap_or_else(|| Box::new(ReturnKey)),
        }
    }
}
