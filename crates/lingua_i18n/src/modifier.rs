//! Post-processing of resolved templates: pluralization, then parameters.

use std::fmt;

use crate::message::{find_arg, ArgValue, Args};

const MAX_EXPANDED_BYTES: usize = 64 * 1024;

/// A pure transformation applied to a resolved template.
pub trait Modifier: Send + Sync {
    fn modify(&self, template: &str, args: &Args) -> String;

    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// An ordered chain of modifiers.
pub struct Modifiers {
    stages: Vec<Box<dyn Modifier>>,
}

impl Modifiers {
    /// An empty chain; templates pass through untouched.
    pub fn empty() -> Self {
        Self { stages: Vec::new() }
    }

    pub fn with(mut self, modifier: impl Modifier + 'static) -> Self {
        self.stages.push(Box::new(modifier));
        self
    }

    pub fn apply(&self, template: &str, args: &Args) -> String {
        let mut out = template.to_string();
        for stage in &self.stages {
            out = stage.modify(&out, args);
        }
        out
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
}

impl Default for Modifiers {
    /// Pluralization first: substitution must not touch the branch markers.
    fn default() -> Self {
        Self::empty()
            .with(Pluralization::default())
            .with(ParameterReplacer)
    }
}

impl fmt::Debug for Modifiers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.stages.iter().map(|s| s.name()))
            .finish()
    }
}

/// Selects one `|`-separated branch based on a count argument.
///
/// Branches may start with a condition:
/// - `{n}` or `{n,m,...}`: exact values
/// - `[a,b]`: inclusive range, `*` leaves a bound open
///
/// Without any conditions the two-form rule applies when a count is given: a
/// count of 1 picks the first branch, anything else the second. Without
/// conditions or a count the template is returned unchanged.
#[derive(Clone, Debug)]
pub struct Pluralization {
    count_args: Vec<String>,
}

impl Default for Pluralization {
    fn default() -> Self {
        Self {
            count_args: vec!["count".to_string(), ":count".to_string()],
        }
    }
}

impl Pluralization {
    /// Use different argument names for the count, checked in order.
    pub fn with_count_args<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            count_args: names.into_iter().map(Into::into).collect(),
        }
    }

    fn count(&self, args: &Args) -> Option<f64> {
        self.count_args
            .iter()
            .find_map(|name| find_arg(args, name))
            .and_then(ArgValue::as_number)
    }
}

impl Modifier for Pluralization {
    fn modify(&self, template: &str, args: &Args) -> String {
        if !template.contains('|') {
            return template.to_string();
        }

        let branches: Vec<Branch<'_>> = template.split('|').map(Branch::parse).collect();
        let conditioned = branches.iter().any(|b| b.condition.is_some());
        let count = self.count(args);

        // A bare `|` is only a plural separator when a count is given.
        if !conditioned && count.is_none() {
            return template.to_string();
        }

        let first = branches[0].text;
        let Some(n) = count else {
            return first.to_string();
        };

        if !conditioned {
            let idx = if n == 1.0 { 0 } else { 1 };
            return branches[idx.min(branches.len() - 1)].text.to_string();
        }

        branches
            .iter()
            .find(|b| b.condition.as_ref().is_some_and(|c| c.matches(n)))
            .or_else(|| branches.iter().rev().find(|b| b.condition.is_none()))
            .map_or(first, |b| b.text)
            .to_string()
    }

    fn name(&self) -> &'static str {
        "pluralization"
    }
}

#[derive(Debug, PartialEq)]
enum Condition {
    Exact(Vec<f64>),
    Range(Option<f64>, Option<f64>),
}

impl Condition {
    fn matches(&self, n: f64) -> bool {
        match self {
            Condition::Exact(values) => values.iter().any(|v| *v == n),
            Condition::Range(lo, hi) => {
                lo.map_or(true, |lo| n >= lo) && hi.map_or(true, |hi| n <= hi)
            }
        }
    }

    fn parse_exact(inner: &str) -> Option<Self> {
        let values = inner
            .split(',')
            .map(|v| v.trim().parse::<f64>().ok())
            .collect::<Option<Vec<_>>>()?;
        Some(Condition::Exact(values))
    }

    fn parse_range(inner: &str) -> Option<Self> {
        let (lo, hi) = inner.split_once(',')?;
        let bound = |s: &str| -> Option<Option<f64>> {
            match s.trim() {
                "*" => Some(None),
                v => v.parse::<f64>().ok().map(Some),
            }
        };
        Some(Condition::Range(bound(lo)?, bound(hi)?))
    }
}

#[derive(Debug)]
struct Branch<'a> {
    condition: Option<Condition>,
    text: &'a str,
}

impl<'a> Branch<'a> {
    fn parse(raw: &'a str) -> Self {
        let trimmed = raw.trim();
        let parsed = match trimmed.chars().next() {
            Some('{') => trimmed
                .find('}')
                .and_then(|end| Some((Condition::parse_exact(&trimmed[1..end])?, end))),
            Some('[') => trimmed
                .find(']')
                .and_then(|end| Some((Condition::parse_range(&trimmed[1..end])?, end))),
            _ => None,
        };

        match parsed {
            Some((condition, end)) => Branch {
                condition: Some(condition),
                text: trimmed[end + 1..].trim(),
            },
            // `{name}` placeholders are not conditions; keep them for substitution.
            None => Branch {
                condition: None,
                text: trimmed,
            },
        }
    }
}

/// Replaces `{name}` placeholders and literal `:name` tokens with argument values.
#[derive(Clone, Copy, Debug, Default)]
pub struct ParameterReplacer;

impl Modifier for ParameterReplacer {
    fn modify(&self, template: &str, args: &Args) -> String {
        apply_placeholders(template, args)
    }

    fn name(&self) -> &'static str {
        "parameters"
    }
}

fn take_prefix_by_bytes(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

fn is_token_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn apply_placeholders(tmpl: &str, args: &Args) -> String {
    let colon_tokens = args.iter().any(|(k, _)| k.starts_with(':'));
    if !tmpl.contains('{') && !tmpl.contains('}') && !(colon_tokens && tmpl.contains(':')) {
        return tmpl.to_string();
    }

    fn push_char_limited(out: &mut String, c: char) -> bool {
        if out.len() + c.len_utf8() > MAX_EXPANDED_BYTES {
            return true;
        }
        out.push(c);
        out.len() >= MAX_EXPANDED_BYTES
    }

    fn push_str_limited(out: &mut String, s: &str) -> bool {
        if out.len() >= MAX_EXPANDED_BYTES {
            return true;
        }
        let remaining = MAX_EXPANDED_BYTES - out.len();
        out.push_str(take_prefix_by_bytes(s, remaining));
        out.len() >= MAX_EXPANDED_BYTES
    }

    // Single pass: substituted values are never scanned again.
    let mut out = String::with_capacity(std::cmp::min(tmpl.len() + 8, MAX_EXPANDED_BYTES));
    let mut chars = tmpl.chars().peekable();

    while let Some(c) = chars.next() {
        if c == ':' && colon_tokens {
            let mut token = String::from(":");
            while let Some(&n) = chars.peek() {
                if !is_token_char(n) {
                    break;
                }
                token.push(n);
                chars.next();
            }
            let text = match find_arg(args, &token) {
                Some(v) => v.to_text(),
                None => token,
            };
            if push_str_limited(&mut out, &text) {
                break;
            }
            continue;
        }

        // Escaped braces: `{{` -> `{`, `}}` -> `}`.
        if c == '}' {
            if chars.peek() == Some(&'}') {
                chars.next();
            }
            if push_char_limited(&mut out, '}') {
                break;
            }
            continue;
        }
        if c != '{' {
            if push_char_limited(&mut out, c) {
                break;
            }
            continue;
        }

        if chars.peek() == Some(&'{') {
            chars.next();
            if push_char_limited(&mut out, '{') {
                break;
            }
            continue;
        }

        let mut key = String::new();
        let mut closed = false;
        while let Some(&n) = chars.peek() {
            chars.next();
            if n == '}' {
                closed = true;
                break;
            }
            key.push(n);
        }

        // No closing brace: the rest is literal text.
        if !closed {
            if push_char_limited(&mut out, '{') {
                break;
            }
            push_str_limited(&mut out, &key);
            break;
        }

        let key = key.trim();
        if key.is_empty() {
            if push_str_limited(&mut out, "{}") {
                break;
            }
            continue;
        }

        let text = match find_arg(args, key) {
            Some(v) => v.to_text(),
            // Unknown placeholders stay visible.
            None => format!("{{{key}}}"),
        };
        if push_str_limited(&mut out, &text) {
            break;
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use std::borrow::Cow;

    use super::*;
    use pretty_assertions::assert_eq;

    fn args(pairs: &[(&'static str, ArgValue)]) -> Vec<(Cow<'static, str>, ArgValue)> {
        pairs
            .iter()
            .map(|(k, v)| (Cow::Borrowed(*k), v.clone()))
            .collect()
    }

    #[test]
    fn replaces_named_placeholders() {
        let a = args(&[("name", "John".into()), ("unused", 1.into())]);
        assert_eq!(apply_placeholders("Hi {name}", &a), "Hi John");
        assert_eq!(apply_placeholders("Hi { name }!", &a), "Hi John!");
        assert_eq!(apply_placeholders("Hi {other}", &a), "Hi {other}");
    }

    #[test]
    fn placeholders_are_order_independent() {
        let a = args(&[("last", "Doe".into()), ("first", "John".into())]);
        assert_eq!(apply_placeholders("{first} {last}", &a), "John Doe");
        assert_eq!(apply_placeholders("{last}, {first}", &a), "Doe, John");
    }

    #[test]
    fn replaces_colon_tokens() {
        let a = args(&[(":name", "John".into()), (":n", 3.into())]);
        assert_eq!(apply_placeholders("Hi :name", &a), "Hi John");
        assert_eq!(apply_placeholders(":n items at 10:30", &a), "3 items at 10:30");
        assert_eq!(apply_placeholders("Hi :names", &a), "Hi :names");
    }

    #[test]
    fn colon_tokens_need_colon_arguments() {
        let a = args(&[("name", "John".into())]);
        assert_eq!(apply_placeholders("Hi :name", &a), "Hi :name");
    }

    #[test]
    fn substituted_text_is_not_rescanned() {
        let a = args(&[("a", "{b}".into()), ("b", "x".into()), (":c", ":c".into())]);
        assert_eq!(apply_placeholders("{a} :c", &a), "{b} :c");
    }

    #[test]
    fn escaped_braces() {
        let a = args(&[("name", "Chris".into())]);
        assert_eq!(apply_placeholders("Hello, {{name}}!", &a), "Hello, {name}!");
        assert_eq!(apply_placeholders("{{{name}}}", &a), "{Chris}");
        assert_eq!(apply_placeholders("}}", &a), "}");
        assert_eq!(apply_placeholders("{{", &a), "{");
    }

    #[test]
    fn missing_closing_brace_is_literal() {
        let a = args(&[("name", "Chris".into())]);
        assert_eq!(apply_placeholders("Hello, {name", &a), "Hello, {name");
        assert_eq!(apply_placeholders("{name", &a), "{name");
    }

    #[test]
    fn placeholder_output_is_limited() {
        let a = args(&[("name", "a".repeat(MAX_EXPANDED_BYTES * 2).into())]);
        let s = apply_placeholders("{name}{name}{name}", &a);
        assert!(s.len() <= MAX_EXPANDED_BYTES);
    }

    #[test]
    fn plural_conditions() {
        let p = Pluralization::default();
        let tmpl = "{0} no apples|{1} one apple|[2,*] many apples";
        assert_eq!(p.modify(tmpl, &args(&[("count", 0.into())])), "no apples");
        assert_eq!(p.modify(tmpl, &args(&[("count", 1.into())])), "one apple");
        assert_eq!(p.modify(tmpl, &args(&[("count", 7.into())])), "many apples");
        assert_eq!(p.modify(tmpl, &args(&[(":count", "2".into())])), "many apples");
    }

    #[test]
    fn plural_without_count_uses_first_branch() {
        let p = Pluralization::default();
        let tmpl = "{0} no apples|[1,*] apples";
        assert_eq!(p.modify(tmpl, &args(&[])), "no apples");
        assert_eq!(p.modify(tmpl, &args(&[("count", "lots".into())])), "no apples");
        assert_eq!(p.modify(tmpl, &args(&[("count", (-1).into())])), "no apples");
    }

    #[test]
    fn plural_two_forms() {
        let p = Pluralization::default();
        let tmpl = "one item|{count} items";
        assert_eq!(p.modify(tmpl, &args(&[("count", 1.into())])), "one item");
        assert_eq!(p.modify(tmpl, &args(&[("count", 4.into())])), "{count} items");
        assert_eq!(p.modify("only", &args(&[("count", 4.into())])), "only");
    }

    #[test]
    fn literal_pipe_without_count_is_kept() {
        let p = Pluralization::default();
        assert_eq!(p.modify("Home | Shop", &args(&[])), "Home | Shop");
        assert_eq!(p.modify("a|b", &args(&[("name", "x".into())])), "a|b");
    }

    #[test]
    fn plural_unconditioned_branch_is_default() {
        let p = Pluralization::default();
        let tmpl = "{0} none|{count} items";
        assert_eq!(p.modify(tmpl, &args(&[("count", 0.into())])), "none");
        assert_eq!(p.modify(tmpl, &args(&[("count", 9.into())])), "{count} items");
    }

    #[test]
    fn plural_ranges_and_sets() {
        let p = Pluralization::with_count_args(["n"]);
        let tmpl = "{1,21} form a|[2,4] form b|[5,*] form c";
        assert_eq!(p.modify(tmpl, &args(&[("n", 21.into())])), "form a");
        assert_eq!(p.modify(tmpl, &args(&[("n", 3.into())])), "form b");
        assert_eq!(p.modify(tmpl, &args(&[("n", 12.into())])), "form c");
    }

    #[test]
    fn pipeline_pluralizes_before_substituting() {
        let m = Modifiers::default();
        let tmpl = "{0} No messages|{1} One message|[2,*] {count} messages";
        assert_eq!(m.apply(tmpl, &args(&[("count", 5.into())])), "5 messages");
        assert_eq!(m.apply(tmpl, &args(&[("count", 1.into())])), "One message");
        assert_eq!(format!("{m:?}"), r#"["pluralization", "parameters"]"#);
    }

    #[test]
    fn empty_pipeline_is_identity() {
        let m = Modifiers::empty();
        assert!(m.is_empty());
        assert_eq!(m.apply("Hi {name}", &args(&[("name", "x".into())])), "Hi {name}");
    }
}
