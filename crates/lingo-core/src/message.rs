use serde::{Deserialize, Serialize};

/// A single translated message for one language.
///
/// Entries are immutable once constructed; a new value for the same key
/// replaces the entry wholesale. Lookups hand out derived copies, never
/// references into the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageEntry {
    /// Dash/underscore-combined ISO-639 + ISO-3166 code (e.g. "en_US").
    pub language_code: String,
    /// Key identifying the message (e.g. "menu.settings.title").
    pub key: String,
    /// The message text, possibly containing `%name%` placeholder tokens.
    pub value: String,
}

impl MessageEntry {
    pub fn new(
        language_code: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            language_code: language_code.into(),
            key: key.into(),
            value: value.into(),
        }
    }
}

/// A placeholder argument value.
///
/// The variant name doubles as the type summary written to the miss log
/// when a lookup fails in the fallback language.
#[derive(Debug, Clone, PartialEq)]
pub enum PlaceholderValue {
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl PlaceholderValue {
    /// Type name used in miss-log diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            PlaceholderValue::Text(_) => "String",
            PlaceholderValue::Int(_) => "Int",
            PlaceholderValue::Float(_) => "Float",
            PlaceholderValue::Bool(_) => "Bool",
            PlaceholderValue::Null => "None",
        }
    }
}

impl std::fmt::Display for PlaceholderValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlaceholderValue::Text(s) => write!(f, "{s}"),
            PlaceholderValue::Int(i) => write!(f, "{i}"),
            PlaceholderValue::Float(x) => write!(f, "{x}"),
            PlaceholderValue::Bool(b) => write!(f, "{b}"),
            PlaceholderValue::Null => write!(f, "null"),
        }
    }
}

impl From<&str> for PlaceholderValue {
    fn from(s: &str) -> Self {
        PlaceholderValue::Text(s.to_string())
    }
}

impl From<String> for PlaceholderValue {
    fn from(s: String) -> Self {
        PlaceholderValue::Text(s)
    }
}

impl From<i64> for PlaceholderValue {
    fn from(i: i64) -> Self {
        PlaceholderValue::Int(i)
    }
}

impl From<f64> for PlaceholderValue {
    fn from(x: f64) -> Self {
        PlaceholderValue::Float(x)
    }
}

impl From<bool> for PlaceholderValue {
    fn from(b: bool) -> Self {
        PlaceholderValue::Bool(b)
    }
}

/// Insertion-ordered placeholder arguments for a lookup.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Placeholders(Vec<(String, PlaceholderValue)>);

impl Placeholders {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite a placeholder; first insertion fixes its position.
    pub fn set(mut self, name: impl Into<String>, value: impl Into<PlaceholderValue>) -> Self {
        let name = name.into();
        let value = value.into();
        if let Some(slot) = self.0.iter_mut().find(|(n, _)| *n == name) {
            slot.1 = value;
        } else {
            self.0.push((name, value));
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&PlaceholderValue> {
        self.0.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PlaceholderValue)> {
        self.0.iter().map(|(n, v)| (n.as_str(), v))
    }

    /// Miss-log summary: `name::TypeName|name2::TypeName2`.
    pub fn type_summary(&self) -> String {
        self.0
            .iter()
            .map(|(n, v)| format!("{n}::{}", v.type_name()))
            .collect::<Vec<_>>()
            .join("|")
    }
}

/// Replace `%name%` tokens in `template` with the supplied placeholder values.
///
/// Single pass over the template: a substituted value that itself contains a
/// `%name%` token is emitted verbatim and never re-substituted. Tokens with
/// no matching placeholder are left untouched.
pub fn substitute(template: &str, placeholders: &Placeholders) -> String {
    if placeholders.is_empty() {
        return template.to_string();
    }

    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('%') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        match after.find('%') {
            Some(end) => {
                let name = &after[..end];
                match placeholders.get(name) {
                    Some(value) => {
                        out.push_str(&value.to_string());
                        rest = &after[end + 1..];
                    }
                    None => {
                        // Unknown token: keep the leading '%' literal and
                        // rescan from the next character, so "%a%b%" with
                        // only `b` supplied still substitutes `%b%`.
                        out.push('%');
                        rest = after;
                    }
                }
            }
            None => {
                out.push_str(&rest[start..]);
                return out;
            }
        }
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_substitute_basic() {
        let ph = Placeholders::new().set("name", "World");
        assert_eq!(substitute("Hello %name%!", &ph), "Hello World!");
    }

    #[test]
    fn test_substitute_multiple_occurrences() {
        let ph = Placeholders::new().set("x", 3i64);
        assert_eq!(substitute("%x% + %x% = 6", &ph), "3 + 3 = 6");
    }

    #[test]
    fn test_substitute_single_pass_only() {
        // A substituted value containing another token is not re-substituted.
        let ph = Placeholders::new().set("a", "%b%").set("b", "X");
        assert_eq!(substitute("%a%", &ph), "%b%");
    }

    #[test]
    fn test_substitute_unknown_token_kept() {
        let ph = Placeholders::new().set("known", "v");
        assert_eq!(substitute("%known% %unknown%", &ph), "v %unknown%");
    }

    #[test]
    fn test_substitute_unknown_then_known() {
        let ph = Placeholders::new().set("b", "X");
        assert_eq!(substitute("%a%b%", &ph), "%aX");
    }

    #[test]
    fn test_substitute_dangling_percent() {
        let ph = Placeholders::new().set("a", "v");
        assert_eq!(substitute("100%", &ph), "100%");
        assert_eq!(substitute("%a% and 100%", &ph), "v and 100%");
    }

    #[test]
    fn test_substitute_empty_placeholders_is_identity() {
        let ph = Placeholders::new();
        assert_eq!(substitute("Hello %name%!", &ph), "Hello %name%!");
    }

    #[test]
    fn test_placeholder_display_and_type_names() {
        let ph = Placeholders::new()
            .set("s", "text")
            .set("i", 42i64)
            .set("f", 1.5f64)
            .set("b", true)
            .set("n", PlaceholderValue::Null);
        assert_eq!(
            ph.type_summary(),
            "s::String|i::Int|f::Float|b::Bool|n::None"
        );
        let rendered = substitute("%s% %i% %f% %b% %n%", &ph);
        assert_eq!(rendered, "text 42 1.5 true null");
    }

    #[test]
    fn test_placeholders_set_overwrites_in_place() {
        let ph = Placeholders::new().set("a", "1").set("b", "2").set("a", "3");
        assert_eq!(ph.type_summary(), "a::String|b::String");
        assert_eq!(
            ph.get("a"),
            Some(&PlaceholderValue::Text("3".to_string()))
        );
    }
}
