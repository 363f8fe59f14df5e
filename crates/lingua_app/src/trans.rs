//! Process-wide `trans` call-site.

use std::borrow::Cow;
use std::sync::{Arc, PoisonError, RwLock};

use lingua_i18n::{ArgValue, Message, Modifiers, Translator};

/// Translator used by [`trans`]; set when an app builds its translator.
static TRANSLATOR: RwLock<Option<Arc<Translator>>> = RwLock::new(None);

/// Make `translator` the one used by [`trans`].
pub fn register(translator: Arc<Translator>) {
    *TRANSLATOR.write().unwrap_or_else(PoisonError::into_inner) = Some(translator);
}

/// Forget the registered translator.
pub fn clear() {
    *TRANSLATOR.write().unwrap_or_else(PoisonError::into_inner) = None;
}

pub fn translator() -> Option<Arc<Translator>> {
    TRANSLATOR
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}

/// Returns the translated message.
///
/// If no translator is registered, this degrades gracefully to the message
/// itself with its parameters applied.
pub fn trans<I, K, V>(message: &str, params: I, locale: Option<&str>) -> String
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<Cow<'static, str>>,
    V: Into<ArgValue>,
{
    let msg = Message::with_params(message.to_string(), params);
    match translator() {
        Some(t) => t.trans(&msg, locale),
        None => Modifiers::default().apply(&msg.id, &msg.args),
    }
}
