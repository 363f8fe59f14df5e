//! What to return when no resource provides a key.

use tracing::warn;

/// Strategy invoked after every candidate locale failed to provide `key`.
///
/// `locale` is the requested locale (or the translator default), before
/// locale mapping.
pub trait MissingTranslationHandler: Send + Sync {
    fn missing(&self, key: &str, locale: &str) -> String;
}

/// Returns the key unchanged.
#[derive(Clone, Copy, Debug, Default)]
pub struct ReturnKey;

impl MissingTranslationHandler for ReturnKey {
    fn missing(&self, key: &str, _locale: &str) -> String {
        key.to_string()
    }
}

/// Logs the miss, then returns the key unchanged.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogMissing;

impl MissingTranslationHandler for LogMissing {
    fn missing(&self, key: &str, locale: &str) -> String {
        warn!(key = %key, locale = %locale, "missing translation");
        key.to_string()
    }
}

impl<F> MissingTranslationHandler for F
where
    F: Fn(&str, &str) -> String + Send + Sync,
{
    fn missing(&self, key: &str, locale: &str) -> String {
        self(key, locale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_handlers_return_key() {
        assert_eq!(ReturnKey.missing("about", "de"), "about");
        assert_eq!(LogMissing.missing("about", "de"), "about");
    }

    #[test]
    fn closures_are_handlers() {
        let handler = |key: &str, locale: &str| format!("[{locale}] {key}");
        assert_eq!(handler.missing("about", "fr"), "[fr] about");
    }
}
