//! Resources and the shared, priority-layered resource store.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::locale::normalize_locale;

/// A named, locale-tagged bundle of key → template translations.
#[derive(Clone, Debug, PartialEq)]
pub struct Resource {
    name: String,
    locale: String,
    translations: HashMap<String, String>,
    priority: i32,
}

impl Resource {
    pub fn new<I, K, V>(name: impl Into<String>, locale: &str, translations: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            name: name.into(),
            locale: normalize_locale(locale),
            translations: translations
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            priority: 0,
        }
    }

    /// Higher priority resources are applied later and win on conflicts.
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    pub fn priority(&self) -> i32 {
        self.priority
    }

    pub fn translations(&self) -> &HashMap<String, String> {
        &self.translations
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.translations.get(key).map(|s| s.as_str())
    }
}

/// Shared handle to an ordered resource collection.
///
/// Clones share the same storage, so resources added through any handle are
/// visible to every translator holding it.
#[derive(Clone, Debug, Default)]
pub struct Resources {
    inner: Arc<RwLock<Vec<Arc<Resource>>>>,
}

impl Resources {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, resource: Resource) {
        debug!(
            name = %resource.name,
            locale = %resource.locale,
            priority = resource.priority,
            keys = resource.translations.len(),
            "resource added"
        );
        let mut resources = self.write();
        // Ascending priority; equal priorities keep insertion order.
        let at = resources.partition_point(|r| r.priority <= resource.priority);
        resources.insert(at, Arc::new(resource));
    }

    pub fn extend(&self, resources: impl IntoIterator<Item = Resource>) {
        for resource in resources {
            self.add(resource);
        }
    }

    /// Resources for `locale`, ascending by priority; ties keep insertion order.
    pub fn for_locale(&self, locale: &str) -> Vec<Arc<Resource>> {
        let locale = normalize_locale(locale);
        self.read()
            .iter()
            .filter(|r| r.locale == locale)
            .cloned()
            .collect()
    }

    /// Effective key → template table for a locale, optionally scoped to one
    /// resource name. Later (higher priority) resources overwrite earlier keys.
    pub fn merge(&self, locale: &str, name: Option<&str>) -> FxHashMap<String, String> {
        let mut table = FxHashMap::default();
        for resource in self.for_locale(locale) {
            if name.is_some_and(|n| n != resource.name) {
                continue;
            }
            for (k, v) in &resource.translations {
                table.insert(k.clone(), v.clone());
            }
        }
        table
    }

    /// Look up one key the way [`Resources::merge`] would resolve it, without
    /// building the whole table.
    pub fn lookup(&self, locale: &str, name: Option<&str>, key: &str) -> Option<String> {
        let locale = normalize_locale(locale);
        self.read()
            .iter()
            .rev()
            .filter(|r| r.locale == locale && name.map_or(true, |n| n == r.name))
            .find_map(|r| r.get(key).map(str::to_string))
    }

    /// Distinct locales, in store order.
    pub fn locales(&self) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for r in self.read().iter() {
            if !out.contains(&r.locale) {
                out.push(r.locale.clone());
            }
        }
        out
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Vec<Arc<Resource>>> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Vec<Arc<Resource>>> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}
