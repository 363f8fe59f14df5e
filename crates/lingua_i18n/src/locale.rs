/// Normalize locale identifiers to a canonical-ish form for lookup.
///
/// - Converts `_` to `-` (`en_US` is common in environment variables).
/// - Trims whitespace.
pub fn normalize_locale(s: &str) -> String {
    s.trim().replace('_', "-")
}

/// Basic structural check: `language[-script][-region]`.
///
/// Rejects empty strings, whitespace, special characters and empty subtags.
pub fn is_valid_locale(locale: &str) -> bool {
    if locale.is_empty() || locale.len() > 20 {
        return false;
    }

    locale.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
        && !locale.starts_with('-')
        && !locale.ends_with('-')
        && !locale.contains("--")
}
