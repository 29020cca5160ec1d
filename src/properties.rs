//! Typed access to loosely-typed filter property bags.
//!
//! Build scripts describe filters as string-keyed maps of JSON values. Each
//! filter type has exactly one parsing function that turns such a map into
//! its strongly-typed config; this module holds the shared lookups they use.
//! Nothing downstream of those functions ever sees the raw map.

use std::path::PathBuf;

use serde_json::{Map, Value};

use crate::color::Color;
use crate::error::{Error, Result};
use crate::text::FontSpec;

/// An enumerated configuration value with a closed set of spellings.
pub trait Token: Sized + Copy + 'static {
    /// Human readable name of the enumeration, used in error messages.
    const KIND: &'static str;

    /// Every variant, in the order they are listed in error messages.
    const ALL: &'static [Self];

    /// Canonical spelling of this variant.
    fn name(self) -> &'static str;

    /// Whether `raw` spells this variant. Case-insensitive by default.
    fn matches(self, raw: &str) -> bool {
        raw.eq_ignore_ascii_case(self.name())
    }

    /// Parses `raw`, failing with the list of accepted spellings.
    fn parse_token(raw: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|token| token.matches(raw))
            .ok_or_else(|| Error::UnknownToken {
                kind: Self::KIND,
                value: raw.to_string(),
                expected: Self::ALL.iter().map(|token| token.name()).collect(),
            })
    }
}

/// Read-only view over a filter's property map.
#[derive(Debug, Clone, Copy)]
pub struct Properties<'a> {
    map: &'a Map<String, Value>,
}

impl<'a> Properties<'a> {
    pub fn new(map: &'a Map<String, Value>) -> Self {
        Self { map }
    }

    /// First non-null value among `keys`.
    fn raw(&self, keys: &[&str]) -> Option<&'a Value> {
        keys.iter()
            .filter_map(|key| self.map.get(*key))
            .find(|value| !value.is_null())
    }

    /// A value rendered as a string; non-string scalars use their JSON text.
    pub fn string(&self, keys: &[&str]) -> Option<String> {
        self.raw(keys).map(|value| match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
    }

    /// A number given either as a JSON number or a numeric string.
    /// Unparsable values count as absent.
    pub fn float(&self, key: &str) -> Option<f32> {
        match self.raw(&[key])? {
            Value::Number(n) => n.as_f64().map(|v| v as f32),
            Value::String(s) => s.trim().parse::<f32>().ok(),
            _ => None,
        }
        .filter(|value| value.is_finite())
    }

    /// A number rounded to the nearest integer.
    pub fn integer(&self, key: &str) -> Option<i32> {
        self.float(key).map(|value| value.round() as i32)
    }

    /// `true` only for a JSON `true` or the string `"true"` in any case.
    pub fn boolean(&self, key: &str) -> Option<bool> {
        self.raw(&[key]).map(|value| match value {
            Value::Bool(b) => *b,
            Value::String(s) => s.trim().eq_ignore_ascii_case("true"),
            _ => false,
        })
    }

    pub fn color(&self, key: &str) -> Result<Option<Color>> {
        self.string(&[key]).map(|raw| Color::parse(&raw)).transpose()
    }

    pub fn path(&self, key: &str) -> Option<PathBuf> {
        self.string(&[key]).map(PathBuf::from)
    }

    pub fn token<T: Token>(&self, keys: &[&str]) -> Result<Option<T>> {
        self.string(keys).map(|raw| T::parse_token(&raw)).transpose()
    }

    /// A list of tokens given as an array or as a single string.
    pub fn tokens<T: Token>(&self, key: &str) -> Result<Vec<T>> {
        match self.raw(&[key]) {
            None => Ok(Vec::new()),
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| match item {
                    Value::String(s) => T::parse_token(s),
                    other => T::parse_token(&other.to_string()),
                })
                .collect(),
            Some(Value::String(s)) => T::parse_token(s).map(|token| vec![token]),
            Some(other) => T::parse_token(&other.to_string()).map(|token| vec![token]),
        }
    }

    /// The label font.
    ///
    /// `font` may be a family name or an object `{ "file": path }`; when it is
    /// absent, `fontName` supplies the family.
    pub fn font(&self) -> Result<FontSpec> {
        match self.raw(&["font"]) {
            Some(Value::String(family)) => Ok(FontSpec::family(family.clone())),
            Some(Value::Object(object)) => {
                let nested = Properties::new(object);
                match nested.path("file") {
                    Some(file) => Ok(FontSpec::file(file)),
                    None => Err(Error::InvalidProperty {
                        key: "font",
                        reason: "expected a family name or an object with a `file` path".into(),
                    }),
                }
            }
            Some(other) => Err(Error::InvalidProperty {
                key: "font",
                reason: format!("expected a family name, got {other}"),
            }),
            None => Ok(FontSpec {
                family: self.string(&["fontName"]),
                file: None,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Side {
        Left,
        Right,
    }

    impl Token for Side {
        const KIND: &'static str = "side";
        const ALL: &'static [Self] = &[Side::Left, Side::Right];

        fn name(self) -> &'static str {
            match self {
                Side::Left => "LEFT",
                Side::Right => "RIGHT",
            }
        }
    }

    fn bag(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn strings_and_aliases() {
        let map = bag(json!({ "name": "beta", "padding": 4 }));
        let props = Properties::new(&map);
        assert_eq!(props.string(&["label", "name"]).as_deref(), Some("beta"));
        assert_eq!(props.string(&["padding"]).as_deref(), Some("4"));
        assert_eq!(props.string(&["missing"]), None);
    }

    #[test]
    fn lenient_numbers() {
        let map = bag(json!({ "a": 0.25, "b": "0.5", "c": "abc", "d": "3.6", "e": null }));
        let props = Properties::new(&map);
        assert_eq!(props.float("a"), Some(0.25));
        assert_eq!(props.float("b"), Some(0.5));
        assert_eq!(props.float("c"), None);
        assert_eq!(props.integer("d"), Some(4));
        assert_eq!(props.float("e"), None);
    }

    #[test]
    fn lenient_booleans() {
        let map = bag(json!({ "a": true, "b": "TRUE", "c": "yes", "d": false }));
        let props = Properties::new(&map);
        assert_eq!(props.boolean("a"), Some(true));
        assert_eq!(props.boolean("b"), Some(true));
        assert_eq!(props.boolean("c"), Some(false));
        assert_eq!(props.boolean("d"), Some(false));
        assert_eq!(props.boolean("missing"), None);
    }

    #[test]
    fn malformed_color_fails_fast() {
        let map = bag(json!({ "ribbonColor": "#nothex" }));
        let props = Properties::new(&map);
        assert!(matches!(props.color("ribbonColor"), Err(Error::InvalidColor(_))));
        assert_eq!(props.color("labelColor").unwrap(), None);
    }

    #[test]
    fn tokens_are_case_insensitive() {
        let map = bag(json!({ "side": "left", "sides": ["Right", "LEFT"] }));
        let props = Properties::new(&map);
        assert_eq!(props.token::<Side>(&["side"]).unwrap(), Some(Side::Left));
        assert_eq!(props.tokens::<Side>("sides").unwrap(), vec![Side::Right, Side::Left]);
        assert!(props.tokens::<Side>("missing").unwrap().is_empty());
    }

    #[test]
    fn unknown_token_enumerates_choices() {
        let map = bag(json!({ "side": "middle" }));
        let err = Properties::new(&map).token::<Side>(&["side"]).unwrap_err();
        assert_eq!(err.to_string(), "unknown side: middle. Use one of [LEFT, RIGHT]");
    }

    #[test]
    fn font_forms() {
        let map = bag(json!({ "font": "Roboto" }));
        assert_eq!(Properties::new(&map).font().unwrap(), FontSpec::family("Roboto"));

        let map = bag(json!({ "font": { "file": "fonts/label.ttf" } }));
        assert_eq!(Properties::new(&map).font().unwrap(), FontSpec::file("fonts/label.ttf"));

        let map = bag(json!({ "fontName": "Serif" }));
        assert_eq!(Properties::new(&map).font().unwrap(), FontSpec::family("Serif"));

        let map = bag(json!({}));
        assert_eq!(Properties::new(&map).font().unwrap(), FontSpec::default());

        let map = bag(json!({ "font": 12 }));
        assert!(Properties::new(&map).font().is_err());
    }
}
