use std::borrow::Cow;

/// Name of the argument reserved for scoping a lookup to one resource.
pub const SRC_ARG: &str = "src";

/// A translation argument value.
#[derive(Clone, Debug, PartialEq)]
pub enum ArgValue {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl ArgValue {
    /// Text used when the value is substituted into a template.
    pub fn to_text(&self) -> String {
        match self {
            ArgValue::Str(s) => s.clone(),
            ArgValue::Int(i) => i.to_string(),
            ArgValue::Float(f) => {
                let mut s = f.to_string();
                if s.contains('.') {
                    while s.ends_with('0') {
                        s.pop();
                    }
                    if s.ends_with('.') {
                        s.pop();
                    }
                }
                s
            }
            ArgValue::Bool(b) => b.to_string(),
        }
    }

    /// Numeric view of the value, used for plural branch selection.
    ///
    /// Strings count when they parse as a number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            ArgValue::Int(i) => Some(*i as f64),
            ArgValue::Float(f) if f.is_finite() => Some(*f),
            ArgValue::Str(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
            _ => None,
        }
    }
}

impl From<String> for ArgValue {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

impl From<&str> for ArgValue {
    fn from(v: &str) -> Self {
        Self::Str(v.to_string())
    }
}

impl From<&String> for ArgValue {
    fn from(v: &String) -> Self {
        Self::Str(v.clone())
    }
}

impl From<i64> for ArgValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<i32> for ArgValue {
    fn from(v: i32) -> Self {
        Self::Int(v as i64)
    }
}

impl From<u32> for ArgValue {
    fn from(v: u32) -> Self {
        Self::Int(v as i64)
    }
}

impl From<usize> for ArgValue {
    fn from(v: usize) -> Self {
        Self::Int(v as i64)
    }
}

impl From<f64> for ArgValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<f32> for ArgValue {
    fn from(v: f32) -> Self {
        Self::Float(v as f64)
    }
}

impl From<bool> for ArgValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

/// Ordered message arguments, looked up by name.
pub type Args = [(Cow<'static, str>, ArgValue)];

/// Find an argument by name. The first occurrence wins.
pub fn find_arg<'a>(args: &'a Args, name: &str) -> Option<&'a ArgValue> {
    args.iter()
        .find(|(k, _)| k.as_ref() == name)
        .map(|(_, v)| v)
}

/// A message key + arguments, optionally scoped to one named resource.
#[derive(Clone, Debug, PartialEq)]
pub struct Message {
    pub id: Cow<'static, str>,
    pub args: Vec<(Cow<'static, str>, ArgValue)>,
    pub src: Option<Cow<'static, str>>,
}

impl Message {
    pub fn new(id: impl Into<Cow<'static, str>>) -> Self {
        Self {
            id: id.into(),
            args: Vec::new(),
            src: None,
        }
    }

    pub fn arg(mut self, name: impl Into<Cow<'static, str>>, value: impl Into<ArgValue>) -> Self {
        self.args.push((name.into(), value.into()));
        self
    }

    /// Restrict the lookup to resources with this name.
    pub fn src(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.src = Some(name.into());
        self
    }

    /// Build a message from string arguments.
    ///
    /// A `src` argument is lifted into the resource scope instead of being
    /// kept as a substitution parameter.
    pub fn with_params<I, K, V>(id: impl Into<Cow<'static, str>>, params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<Cow<'static, str>>,
        V: Into<ArgValue>,
    {
        let mut msg = Self::new(id);
        for (k, v) in params {
            msg = msg.arg(k, v);
        }
        msg.lift_src();
        msg
    }

    /// Move a reserved `src` string argument into [`Message::src`].
    ///
    /// An explicit scope set with [`Message::src`] is kept; the reserved
    /// argument is dropped either way.
    pub fn lift_src(&mut self) {
        let Some(pos) = self.args.iter().position(|(k, _)| k.as_ref() == SRC_ARG) else {
            return;
        };
        let (_, value) = self.args.remove(pos);
        if self.src.is_none() {
            if let ArgValue::Str(s) = value {
                self.src = Some(Cow::Owned(s));
            }
        }
        self.args.retain(|(k, _)| k.as_ref() != SRC_ARG);
    }
}

impl From<&'static str> for Message {
    fn from(id: &'static str) -> Self {
        Self::new(id)
    }
}

impl From<String> for Message {
    fn from(id: String) -> Self {
        Self::new(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn src_argument_becomes_scope() {
        let msg = Message::with_params("cart", [("src", "shop"), ("name", "John")]);
        assert_eq!(msg.src.as_deref(), Some("shop"));
        assert_eq!(msg.args.len(), 1);
        assert_eq!(find_arg(&msg.args, "name"), Some(&ArgValue::from("John")));
    }

    #[test]
    fn explicit_scope_wins_over_argument() {
        let mut msg = Message::new("cart").src("pages").arg("src", "shop");
        msg.lift_src();
        assert_eq!(msg.src.as_deref(), Some("pages"));
        assert!(msg.args.is_empty());
    }

    #[test]
    fn numeric_views() {
        assert_eq!(ArgValue::from(3).as_number(), Some(3.0));
        assert_eq!(ArgValue::from(" 2.5 ").as_number(), Some(2.5));
        assert_eq!(ArgValue::from("many").as_number(), None);
        assert_eq!(ArgValue::from(true).as_number(), None);
        assert_eq!(ArgValue::from(1.50).to_text(), "1.5");
        assert_eq!(ArgValue::from(2.0).to_text(), "2");
    }
}
