//! Values bound to route parameters
//!
//! A parameter binds either the percent-decoded path text or, when a type
//! constraint such as `int` or `guid` is attached, the converted value. Absent
//! optional parameters and a handler's unused parameters bind null (`None`).

use chrono::NaiveDateTime;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use uuid::Uuid;

/// A single bound parameter value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RouteValue {
    /// Unconstrained or validator-only parameters (`{slug}`, `{name:alpha}`)
    Str(String),
    /// `int`
    Int(i32),
    /// `long`
    Long(i64),
    /// `bool`
    Bool(bool),
    /// `datetime`
    DateTime(NaiveDateTime),
    /// `decimal`
    Decimal(f64),
    /// `double`
    Double(f64),
    /// `float`
    Float(f32),
    /// `guid`
    Guid(Uuid),
}

impl RouteValue {
    /// Returns the text for [`RouteValue::Str`]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            RouteValue::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Returns integral values widened to `i64`
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            RouteValue::Int(v) => Some(i64::from(*v)),
            RouteValue::Long(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            RouteValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Short name of the variant, used in CLI output
    pub fn kind(&self) -> &'static str {
        match self {
            RouteValue::Str(_) => "string",
            RouteValue::Int(_) => "int",
            RouteValue::Long(_) => "long",
            RouteValue::Bool(_) => "bool",
            RouteValue::DateTime(_) => "datetime",
            RouteValue::Decimal(_) => "decimal",
            RouteValue::Double(_) => "double",
            RouteValue::Float(_) => "float",
            RouteValue::Guid(_) => "guid",
        }
    }
}

impl fmt::Display for RouteValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteValue::Str(s) => f.write_str(s),
            RouteValue::Int(v) => write!(f, "{}", v),
            RouteValue::Long(v) => write!(f, "{}", v),
            RouteValue::Bool(v) => write!(f, "{}", v),
            RouteValue::DateTime(v) => write!(f, "{}", v.format("%Y-%m-%dT%H:%M:%S")),
            RouteValue::Decimal(v) | RouteValue::Double(v) => write!(f, "{}", v),
            RouteValue::Float(v) => write!(f, "{}", v),
            RouteValue::Guid(v) => write!(f, "{}", v),
        }
    }
}

impl From<&str> for RouteValue {
    fn from(value: &str) -> Self {
        RouteValue::Str(value.to_string())
    }
}

impl From<String> for RouteValue {
    fn from(value: String) -> Self {
        RouteValue::Str(value)
    }
}

/// Parameters extracted by a successful match
///
/// Keys are the names as declared in the template (case-sensitive). A key
/// mapped to `None` is an explicit null binding.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RouteParams {
    values: HashMap<String, Option<RouteValue>>,
}

impl RouteParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, name: impl Into<String>, value: Option<RouteValue>) {
        self.values.insert(name.into(), value);
    }

    /// Bound value for `name`; `None` when the name is unbound or bound to null
    pub fn get(&self, name: &str) -> Option<&RouteValue> {
        self.values.get(name).and_then(Option::as_ref)
    }

    /// Text value for `name` when it was bound without a type conversion
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(RouteValue::as_str)
    }

    /// True when `name` is present, including explicit null bindings
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// True when `name` is present and bound to null
    pub fn is_null(&self, name: &str) -> bool {
        matches!(self.values.get(name), Some(None))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&RouteValue>)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_ref()))
    }

    /// Names in sorted order, for stable output
    pub fn sorted_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.values.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn into_inner(self) -> HashMap<String, Option<RouteValue>> {
        self.values
    }
}

impl From<RouteParams> for HashMap<String, Option<RouteValue>> {
    fn from(params: RouteParams) -> Self {
        params.into_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_binding_is_distinct_from_missing() {
        let mut params = RouteParams::new();
        params.insert("x", None);
        params.insert("id", Some(RouteValue::Int(7)));

        assert!(params.contains("x"));
        assert!(params.is_null("x"));
        assert_eq!(params.get("x"), None);

        assert!(!params.contains("y"));
        assert!(!params.is_null("y"));

        assert_eq!(params.get("id").and_then(RouteValue::as_i64), Some(7));
        assert_eq!(params.sorted_names(), vec!["id", "x"]);
    }

    #[test]
    fn test_typed_accessors() {
        assert_eq!(RouteValue::Bool(true).as_bool(), Some(true));
        assert_eq!(RouteValue::from("true").as_bool(), None);
        assert_eq!(RouteValue::Long(1 << 40).as_i64(), Some(1 << 40));
        assert_eq!(RouteValue::Int(3).as_str(), None);
    }

    #[test]
    fn test_keys_are_case_sensitive() {
        let mut params = RouteParams::new();
        params.insert("Id", Some("a".into()));
        assert_eq!(params.get_str("Id"), Some("a"));
        assert_eq!(params.get_str("id"), None);
    }

    #[test]
    fn test_serializes_to_plain_json() {
        let mut params = RouteParams::new();
        params.insert("id", Some(RouteValue::Int(42)));
        params.insert("flag", Some(RouteValue::Bool(true)));
        params.insert("missing", None);

        let json = serde_json::to_value(&params).unwrap();
        assert_eq!(json["id"], 42);
        assert_eq!(json["flag"], true);
        assert!(json["missing"].is_null());
    }

    #[test]
    fn test_display() {
        assert_eq!(RouteValue::Str("a b".into()).to_string(), "a b");
        assert_eq!(RouteValue::Long(-3).to_string(), "-3");
        assert_eq!(RouteValue::Int(1).kind(), "int");
    }
}
