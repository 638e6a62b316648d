//! Parameter constraints
//!
//! A constraint is attached to a parameter segment (`{id:int}`) and is
//! resolved by name at parse time against a [`ConstraintRegistry`]. At match
//! time each constraint both validates the decoded path text and may convert
//! it: type constraints (`int`, `guid`, ...) replace the bound value, while
//! validators (`alpha`, `regex(...)`, `min(...)`, ...) keep the current one.
//!
//! # Examples
//!
//! ```
//! use pathway_router::{ConstraintRegistry, RouteValue};
//!
//! let registry = ConstraintRegistry::default();
//! let int = registry.resolve("int").unwrap();
//! assert_eq!(int.apply("42", RouteValue::from("42")), Some(RouteValue::Int(42)));
//! assert_eq!(int.apply("abc", RouteValue::from("abc")), None);
//! ```

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::SyntaxError;
use crate::value::RouteValue;

static ALPHA_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z]+$").unwrap());

/// Behavior of a constraint at match time
///
/// `raw` is the percent-decoded path text, `current` the value produced by
/// the constraints applied before this one (initially the raw text). Return
/// `None` to reject the match.
pub trait ConstraintCheck: Send + Sync + fmt::Debug {
    fn apply(&self, raw: &str, current: RouteValue) -> Option<RouteValue>;
}

/// Builds a check from the optional argument written in parentheses
pub type ConstraintFactory =
    Arc<dyn Fn(Option<&str>) -> Result<Arc<dyn ConstraintCheck>, String> + Send + Sync>;

/// A resolved constraint as it appears on a template segment
#[derive(Clone)]
pub struct ParameterConstraint {
    name: String,
    argument: Option<String>,
    check: Arc<dyn ConstraintCheck>,
}

impl ParameterConstraint {
    /// Lowercased constraint name
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn argument(&self) -> Option<&str> {
        self.argument.as_deref()
    }

    /// Validates `raw` and returns the (possibly converted) value
    pub fn apply(&self, raw: &str, current: RouteValue) -> Option<RouteValue> {
        self.check.apply(raw, current)
    }
}

impl PartialEq for ParameterConstraint {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.argument == other.argument
    }
}

impl Eq for ParameterConstraint {}

impl fmt::Debug for ParameterConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ParameterConstraint({})", self)
    }
}

impl fmt::Display for ParameterConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.argument {
            Some(arg) => write!(f, "{}({})", self.name, arg),
            None => f.write_str(&self.name),
        }
    }
}

/// Name → factory table consulted by the template parser
///
/// `ConstraintRegistry::default()` knows the built-in constraints. Custom
/// ones are added with [`ConstraintRegistry::with_constraint`]:
///
/// ```
/// use pathway_router::{ConstraintCheck, ConstraintRegistry, RouteValue};
/// use std::sync::Arc;
///
/// #[derive(Debug)]
/// struct Even;
///
/// impl ConstraintCheck for Even {
///     fn apply(&self, raw: &str, current: RouteValue) -> Option<RouteValue> {
///         raw.parse::<i64>().ok().filter(|n| n % 2 == 0).map(|_| current)
///     }
/// }
///
/// let registry = ConstraintRegistry::default()
///     .with_constraint("even", |_| Ok(Arc::new(Even) as Arc<dyn ConstraintCheck>));
/// assert!(registry.contains("even"));
/// ```
#[derive(Clone)]
pub struct ConstraintRegistry {
    factories: HashMap<String, ConstraintFactory>,
}

const BUILTIN_NAMES: &[&str] = &[
    "int",
    "long",
    "bool",
    "datetime",
    "decimal",
    "double",
    "float",
    "guid",
    "alpha",
    "regex",
    "min",
    "max",
    "range",
    "length",
    "minlength",
    "maxlength",
];

impl Default for ConstraintRegistry {
    fn default() -> Self {
        BUILTIN_NAMES.iter().fold(Self::empty(), |registry, &name| {
            registry.with_constraint(name, move |argument| {
                parse_builtin(name, argument).map(|b| Arc::new(b) as Arc<dyn ConstraintCheck>)
            })
        })
    }
}

impl fmt::Debug for ConstraintRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&String> = self.factories.keys().collect();
        names.sort();
        f.debug_struct("ConstraintRegistry").field("names", &names).finish()
    }
}

impl ConstraintRegistry {
    /// A registry without any constraints
    pub fn empty() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Adds (or replaces) a constraint; names are case-insensitive
    pub fn with_constraint<F>(mut self, name: impl AsRef<str>, factory: F) -> Self
    where
        F: Fn(Option<&str>) -> Result<Arc<dyn ConstraintCheck>, String> + Send + Sync + 'static,
    {
        self.factories
            .insert(name.as_ref().to_ascii_lowercase(), Arc::new(factory));
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(&name.to_ascii_lowercase())
    }

    /// Resolves one constraint token such as `int` or `range(1,10)`
    pub fn resolve(&self, token: &str) -> Result<ParameterConstraint, SyntaxError> {
        let (name, argument) = split_argument(token)?;
        let name = name.to_ascii_lowercase();
        let factory = self
            .factories
            .get(&name)
            .ok_or_else(|| SyntaxError::UnknownConstraint(name.clone()))?;

        let check = factory(argument).map_err(|reason| SyntaxError::InvalidConstraint {
            name: name.clone(),
            reason,
        })?;

        Ok(ParameterConstraint {
            name,
            argument: argument.map(str::to_string),
            check,
        })
    }

    /// Resolves a constraint list such as `int,min(1)` or `int:min(1)`
    pub fn resolve_list(&self, spec: &str) -> Result<Vec<ParameterConstraint>, SyntaxError> {
        split_constraint_list(spec)?
            .into_iter()
            .map(|token| self.resolve(token))
            .collect()
    }
}

/// Splits on `,` and `:` outside parentheses
fn split_constraint_list(spec: &str) -> Result<Vec<&str>, SyntaxError> {
    let mut tokens = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;

    for (idx, c) in spec.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth = depth.checked_sub(1).ok_or_else(|| malformed(spec, "unbalanced ')'"))?
            }
            ',' | ':' if depth == 0 => {
                tokens.push(&spec[start..idx]);
                start = idx + 1;
            }
            _ => {}
        }
    }
    if depth != 0 {
        return Err(malformed(spec, "unbalanced '('"));
    }
    tokens.push(&spec[start..]);

    if tokens.iter().any(|t| t.trim().is_empty()) {
        return Err(malformed(spec, "empty constraint"));
    }
    Ok(tokens)
}

/// `name(arg)` → (`name`, `Some(arg)`), `name` → (`name`, `None`)
fn split_argument(token: &str) -> Result<(&str, Option<&str>), SyntaxError> {
    match token.split_once('(') {
        Some((name, rest)) => rest
            .strip_suffix(')')
            .map(|arg| (name, Some(arg)))
            .ok_or_else(|| malformed(token, "missing ')'")),
        None => Ok((token, None)),
    }
}

fn malformed(token: &str, reason: &str) -> SyntaxError {
    SyntaxError::InvalidConstraint {
        name: token.to_string(),
        reason: reason.to_string(),
    }
}

#[derive(Debug)]
enum Builtin {
    Int,
    Long,
    Bool,
    DateTime,
    Decimal,
    Double,
    Float,
    Guid,
    Alpha,
    Regex(Regex),
    Min(i64),
    Max(i64),
    Range(i64, i64),
    Length(usize, usize),
    MinLength(usize),
    MaxLength(usize),
}

fn parse_builtin(name: &str, argument: Option<&str>) -> Result<Builtin, String> {
    let takes_argument = matches!(
        name,
        "regex" | "min" | "max" | "range" | "length" | "minlength" | "maxlength"
    );
    match (takes_argument, argument) {
        (false, Some(_)) => return Err("does not take an argument".to_string()),
        (true, None) => return Err("requires an argument".to_string()),
        _ => {}
    }
    let arg = argument.unwrap_or_default();

    let builtin = match name {
        "int" => Builtin::Int,
        "long" => Builtin::Long,
        "bool" => Builtin::Bool,
        "datetime" => Builtin::DateTime,
        "decimal" => Builtin::Decimal,
        "double" => Builtin::Double,
        "float" => Builtin::Float,
        "guid" => Builtin::Guid,
        "alpha" => Builtin::Alpha,
        "regex" => Regex::new(&format!("(?i){}", arg))
            .map(Builtin::Regex)
            .map_err(|e| e.to_string())?,
        "min" => Builtin::Min(parse_number(arg)?),
        "max" => Builtin::Max(parse_number(arg)?),
        "range" => {
            let (min, max) = parse_pair(arg)?;
            Builtin::Range(min, max)
        }
        "length" if arg.contains(',') => {
            let (min, max) = parse_pair(arg)?;
            Builtin::Length(to_len(min)?, to_len(max)?)
        }
        "length" => {
            let exact = to_len(parse_number(arg)?)?;
            Builtin::Length(exact, exact)
        }
        "minlength" => Builtin::MinLength(to_len(parse_number(arg)?)?),
        "maxlength" => Builtin::MaxLength(to_len(parse_number(arg)?)?),
        other => return Err(format!("'{}' is not a built-in constraint", other)),
    };
    Ok(builtin)
}

fn parse_number(arg: &str) -> Result<i64, String> {
    arg.trim()
        .parse()
        .map_err(|_| format!("'{}' is not an integer", arg))
}

fn parse_pair(arg: &str) -> Result<(i64, i64), String> {
    let (lo, hi) = arg
        .split_once(',')
        .ok_or_else(|| format!("expected two comma-separated integers, got '{}'", arg))?;
    let (lo, hi) = (parse_number(lo)?, parse_number(hi)?);
    if lo > hi {
        return Err(format!("lower bound {} exceeds upper bound {}", lo, hi));
    }
    Ok((lo, hi))
}

fn to_len(n: i64) -> Result<usize, String> {
    usize::try_from(n).map_err(|_| format!("length {} must not be negative", n))
}

fn parse_bool(raw: &str) -> Option<bool> {
    if raw.eq_ignore_ascii_case("true") {
        Some(true)
    } else if raw.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

fn parse_finite(raw: &str) -> Option<f64> {
    raw.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn parse_datetime(raw: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_utc());
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

impl ConstraintCheck for Builtin {
    fn apply(&self, raw: &str, current: RouteValue) -> Option<RouteValue> {
        let chars = || raw.chars().count();
        let as_int = || raw.parse::<i64>().ok();

        match self {
            Builtin::Int => raw.parse().ok().map(RouteValue::Int),
            Builtin::Long => raw.parse().ok().map(RouteValue::Long),
            Builtin::Bool => parse_bool(raw).map(RouteValue::Bool),
            Builtin::DateTime => parse_datetime(raw).map(RouteValue::DateTime),
            Builtin::Decimal => parse_finite(raw).map(RouteValue::Decimal),
            Builtin::Double => parse_finite(raw).map(RouteValue::Double),
            Builtin::Float => raw
                .parse::<f32>()
                .ok()
                .filter(|v| v.is_finite())
                .map(RouteValue::Float),
            Builtin::Guid => Uuid::parse_str(raw).ok().map(RouteValue::Guid),
            Builtin::Alpha => ALPHA_REGEX.is_match(raw).then_some(current),
            Builtin::Regex(re) => re.is_match(raw).then_some(current),
            Builtin::Min(min) => as_int().filter(|v| v >= min).map(|_| current),
            Builtin::Max(max) => as_int().filter(|v| v <= max).map(|_| current),
            Builtin::Range(min, max) => as_int()
                .filter(|v| (*min..=*max).contains(v))
                .map(|_| current),
            Builtin::Length(min, max) => (*min..=*max).contains(&chars()).then_some(current),
            Builtin::MinLength(min) => (chars() >= *min).then_some(current),
            Builtin::MaxLength(max) => (chars() <= *max).then_some(current),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn apply(spec: &str, raw: &str) -> Option<RouteValue> {
        ConstraintRegistry::default()
            .resolve(spec)
            .unwrap()
            .apply(raw, RouteValue::from(raw))
    }

    #[rstest]
    #[case("int", "42", Some(RouteValue::Int(42)))]
    #[case("int", "-7", Some(RouteValue::Int(-7)))]
    #[case("int", "4294967296", None)]
    #[case("int", "abc", None)]
    #[case("long", "4294967296", Some(RouteValue::Long(4_294_967_296)))]
    #[case("bool", "TRUE", Some(RouteValue::Bool(true)))]
    #[case("bool", "yes", None)]
    #[case("double", "1.5", Some(RouteValue::Double(1.5)))]
    #[case("double", "NaN", None)]
    #[case("decimal", "10.25", Some(RouteValue::Decimal(10.25)))]
    #[case("float", "2.5", Some(RouteValue::Float(2.5)))]
    #[case("alpha", "abcXYZ", Some(RouteValue::from("abcXYZ")))]
    #[case("alpha", "abc1", None)]
    #[case("min(10)", "10", Some(RouteValue::from("10")))]
    #[case("min(10)", "9", None)]
    #[case("max(10)", "11", None)]
    #[case("range(1,5)", "3", Some(RouteValue::from("3")))]
    #[case("range(1,5)", "6", None)]
    #[case("length(3)", "abc", Some(RouteValue::from("abc")))]
    #[case("length(3)", "ab", None)]
    #[case("length(2,4)", "abcd", Some(RouteValue::from("abcd")))]
    #[case("minlength(2)", "a", None)]
    #[case("maxlength(2)", "abc", None)]
    #[case("regex(^\\d{3}$)", "123", Some(RouteValue::from("123")))]
    #[case("regex(^\\d{3}$)", "1234", None)]
    #[case("regex(^abc$)", "ABC", Some(RouteValue::from("ABC")))]
    fn test_builtin_constraints(
        #[case] spec: &str,
        #[case] raw: &str,
        #[case] expected: Option<RouteValue>,
    ) {
        assert_eq!(apply(spec, raw), expected);
    }

    #[test]
    fn test_guid_converts() {
        let raw = "6f9619ff-8b86-d011-b42d-00cf4fc964ff";
        let value = apply("guid", raw).unwrap();
        assert_eq!(value, RouteValue::Guid(Uuid::parse_str(raw).unwrap()));
        assert_eq!(apply("guid", "not-a-guid"), None);
    }

    #[test]
    fn test_datetime_formats() {
        let midnight = NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert_eq!(
            apply("datetime", "2024-03-01"),
            Some(RouteValue::DateTime(midnight))
        );

        let noon = NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(12, 30, 0)
            .unwrap();
        assert_eq!(
            apply("datetime", "2024-03-01T12:30:00"),
            Some(RouteValue::DateTime(noon))
        );
        assert_eq!(
            apply("datetime", "2024-03-01T14:30:00+02:00"),
            Some(RouteValue::DateTime(noon))
        );
        assert_eq!(apply("datetime", "yesterday"), None);
    }

    #[test]
    fn test_names_are_case_insensitive() {
        let registry = ConstraintRegistry::default();
        let c = registry.resolve("INT").unwrap();
        assert_eq!(c.name(), "int");
        assert_eq!(c, registry.resolve("int").unwrap());
    }

    #[test]
    fn test_unknown_constraint() {
        let err = ConstraintRegistry::default().resolve("nope").unwrap_err();
        assert_eq!(err, SyntaxError::UnknownConstraint("nope".to_string()));
    }

    #[rstest]
    #[case("int(3)")]
    #[case("regex")]
    #[case("min(abc)")]
    #[case("range(5,1)")]
    #[case("length(-1)")]
    #[case("regex([)")]
    #[case("min(3")]
    fn test_malformed_arguments(#[case] token: &str) {
        let err = ConstraintRegistry::default().resolve(token).unwrap_err();
        assert!(matches!(err, SyntaxError::InvalidConstraint { .. }), "{token}: {err:?}");
    }

    #[test]
    fn test_resolve_list_respects_parentheses() {
        let registry = ConstraintRegistry::default();
        let list = registry.resolve_list("int:range(1,10),max(5)").unwrap();
        let rendered: Vec<String> = list.iter().map(ToString::to_string).collect();
        assert_eq!(rendered, vec!["int", "range(1,10)", "max(5)"]);

        assert!(registry.resolve_list("int,").is_err());
        assert!(registry.resolve_list("regex(a))").is_err());
    }

    #[test]
    fn test_custom_constraint() {
        #[derive(Debug)]
        struct Upper;

        impl ConstraintCheck for Upper {
            fn apply(&self, raw: &str, _current: RouteValue) -> Option<RouteValue> {
                Some(RouteValue::Str(raw.to_uppercase()))
            }
        }

        let registry = ConstraintRegistry::empty()
            .with_constraint("Upper", |_| Ok(Arc::new(Upper) as Arc<dyn ConstraintCheck>));
        assert!(registry.contains("upper"));
        assert!(!registry.contains("int"));

        let c = registry.resolve("upper").unwrap();
        assert_eq!(c.apply("abc", "abc".into()), Some(RouteValue::from("ABC")));
    }
}
