//! Transport-neutral value representation.
//!
//! Every property value crosses the persistence boundary as a `Variant`.
//! The set of tags is closed; property kinds map themselves onto it through
//! the conversion service (see `conversion.rs`).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Serialized adjacently tagged: `{"type": "real", "value": 0.5}`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Variant {
    #[default]
    Absent,
    Bool(bool),
    Int(i64),
    Real(f64),
    String(String),
    /// Stable value of an enumeration item (never its label)
    Enum(i64),
    List(Vec<Variant>),
}

impl Variant {
    pub fn type_name(&self) -> &'static str {
        match self {
            Variant::Absent => "absent",
            Variant::Bool(_) => "bool",
            Variant::Int(_) => "int",
            Variant::Real(_) => "real",
            Variant::String(_) => "string",
            Variant::Enum(_) => "enum",
            Variant::List(_) => "list",
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Variant::Absent)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Variant::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Variant::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Reals also accept integer payloads
    pub fn as_real(&self) -> Option<f64> {
        match self {
            Variant::Real(r) => Some(*r),
            Variant::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Variant::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_enum(&self) -> Option<i64> {
        match self {
            Variant::Enum(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Variant]> {
        match self {
            Variant::List(items) => Some(items),
            _ => None,
        }
    }

    /// Parse user text into a variant carrying the same tag as `self`.
    ///
    /// Lists are written as comma-separated items parsed like the first
    /// element of `self` (or as strings when `self` is empty).
    pub fn parse_like(&self, text: &str) -> Option<Variant> {
        let text = text.trim();
        match self {
            Variant::Absent => Some(Variant::String(text.to_string())),
            Variant::Bool(_) => match text.to_ascii_lowercase().as_str() {
                "true" | "on" | "yes" | "1" => Some(Variant::Bool(true)),
                "false" | "off" | "no" | "0" => Some(Variant::Bool(false)),
                _ => None,
            },
            Variant::Int(_) => text.parse().ok().map(Variant::Int),
            Variant::Real(_) => text.parse().ok().map(Variant::Real),
            Variant::String(_) => Some(Variant::String(text.to_string())),
            Variant::Enum(_) => text.parse().ok().map(Variant::Enum),
            Variant::List(items) => {
                let template = items.first().cloned().unwrap_or(Variant::String(String::new()));
                if text.is_empty() {
                    return Some(Variant::List(Vec::new()));
                }
                text.split(',')
                    .map(|part| template.parse_like(part))
                    .collect::<Option<Vec<_>>>()
                    .map(Variant::List)
            }
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Variant::Absent => write!(f, "<absent>"),
            Variant::Bool(b) => write!(f, "{b}"),
            Variant::Int(i) => write!(f, "{i}"),
            Variant::Real(r) => write!(f, "{r}"),
            Variant::String(s) => write!(f, "{s}"),
            Variant::Enum(v) => write!(f, "{v}"),
            Variant::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
        }
    }
}

impl From<bool> for Variant {
    fn from(b: bool) -> Self {
        Variant::Bool(b)
    }
}

impl From<i64> for Variant {
    fn from(i: i64) -> Self {
        Variant::Int(i)
    }
}

impl From<f64> for Variant {
    fn from(r: f64) -> Self {
        Variant::Real(r)
    }
}

impl From<&str> for Variant {
    fn from(s: &str) -> Self {
        Variant::String(s.to_string())
    }
}

impl From<String> for Variant {
    fn from(s: String) -> Self {
        Variant::String(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equality_requires_same_tag() {
        assert_eq!(Variant::Int(3), Variant::Int(3));
        assert_ne!(Variant::Int(3), Variant::Enum(3));
        assert_ne!(Variant::Int(3), Variant::Real(3.0));
    }

    #[test]
    fn test_real_accepts_int() {
        assert_eq!(Variant::Int(2).as_real(), Some(2.0));
        assert_eq!(Variant::Real(2.0).as_int(), None);
    }

    #[test]
    fn test_json_shape() {
        let json = serde_json::to_string(&Variant::Real(0.5)).unwrap();
        assert_eq!(json, r#"{"type":"real","value":0.5}"#);
        let back: Variant = serde_json::from_str(r#"{"type":"enum","value":2}"#).unwrap();
        assert_eq!(back, Variant::Enum(2));
        let absent: Variant = serde_json::from_str(r#"{"type":"absent"}"#).unwrap();
        assert!(absent.is_absent());
    }

    #[test]
    fn test_parse_like() {
        assert_eq!(Variant::Bool(false).parse_like("on"), Some(Variant::Bool(true)));
        assert_eq!(Variant::Real(0.0).parse_like(" 0.25 "), Some(Variant::Real(0.25)));
        assert_eq!(Variant::Int(0).parse_like("x"), None);
        assert_eq!(
            Variant::List(vec![Variant::Real(0.0)]).parse_like("1,0.5"),
            Some(Variant::List(vec![Variant::Real(1.0), Variant::Real(0.5)]))
        );
    }

    #[test]
    fn test_display() {
        let v = Variant::List(vec![Variant::Int(1), Variant::String("a".into())]);
        assert_eq!(v.to_string(), "[1, a]");
    }
}
