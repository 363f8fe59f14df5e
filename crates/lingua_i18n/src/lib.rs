//! Lingua message translation
//!
//! - Resources: named, locale-tagged key → template tables with a priority
//! - Locale resolution: one alias mapping step, then the fallback chain
//! - Modifiers: pluralization, then `{name}` / `:name` parameter substitution
//! - Missing keys: pluggable handler, the key itself by default
//! - Files: `<dir>/<locale>/<name>.json|yaml` loading (feature `files`)

mod error;
mod locale;
mod message;
mod missing;
mod modifier;
mod resolver;
mod resource;
mod translator;

#[cfg(feature = "files")]
pub mod files;

pub use error::I18nError;
pub use locale::{is_valid_locale, normalize_locale};
pub use message::{find_arg, ArgValue, Args, Message, SRC_ARG};
pub use missing::{LogMissing, MissingTranslationHandler, ReturnKey};
pub use modifier::{Modifier, Modifiers, ParameterReplacer, Pluralization};
pub use resolver::{resolve, LocaleFallbacks, LocaleMapping};
pub use resource::{Resource, Resources};
pub use translator::{Translator, TranslatorBuilder, DEFAULT_LOCALE};

/// Convenience macro for building a [`Message`] key + args.
///
/// Examples:
/// - `msg!("app.title")`
/// - `msg!("greeting", { name: user_name, count: 3 })`
/// - `msg!("cart" => "shop", { count: 2 })` scopes the lookup to the `shop` resource
#[macro_export]
macro_rules! msg {
    ($id:expr) => {
        $crate::Message::new($id)
    };
    ($id:expr, { $($name:ident : $value:expr),* $(,)? }) => {{
        let mut m = $crate::Message::new($id);
        $(
            m = m.arg(stringify!($name), $value);
        )*
        m
    }};
    ($id:expr => $src:expr) => {
        $crate::Message::new($id).src($src)
    };
    ($id:expr => $src:expr, { $($name:ident : $value:expr),* $(,)? }) => {{
        let mut m = $crate::Message::new($id).src($src);
        $(
            m = m.arg(stringify!($name), $value);
        )*
        m
    }};
}
