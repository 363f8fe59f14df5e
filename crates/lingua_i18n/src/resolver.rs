//! Candidate locale resolution: alias mapping, then the fallback chain.

use std::collections::HashSet;

use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::locale::normalize_locale;

/// Locale → single fallback locale. Following it repeatedly yields the chain.
pub type LocaleFallbacks = IndexMap<String, String>;

/// Input locale → canonical locale, applied once before fallback expansion.
pub type LocaleMapping = IndexMap<String, String>;

/// Compute the ordered list of locales to search.
///
/// The requested locale (or `default` when absent or empty) is mapped through
/// `mapping` exactly once, then `fallbacks` is followed until a locale has no
/// entry or a locale repeats. The result never contains duplicates.
pub fn resolve(
    requested: Option<&str>,
    default: &str,
    mapping: &LocaleMapping,
    fallbacks: &LocaleFallbacks,
) -> Vec<String> {
    let start = requested
        .map(normalize_locale)
        .filter(|l| !l.is_empty())
        .unwrap_or_else(|| normalize_locale(default));

    let first = match mapping.get(&start) {
        Some(canonical) => {
            debug!(from = %start, to = %canonical, "locale mapped");
            canonical.clone()
        }
        None => start,
    };

    let mut chain = vec![first.clone()];
    let mut seen = HashSet::from([first.clone()]);
    let mut current = first;

    while let Some(next) = fallbacks.get(&current) {
        if !seen.insert(next.clone()) {
            warn!(
                locale = %current,
                fallback = %next,
                chain = ?chain,
                "cycle in locale fallbacks, stopping"
            );
            break;
        }
        chain.push(next.clone());
        current = next.clone();
    }

    chain
}
