//! Template segments
//!
//! Classification of one `/`-delimited template segment into a
//! [`TemplateSegment`], and the per-segment matcher used by the route
//! matching algorithm. All functions are pure.

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

use crate::constraint::{ConstraintRegistry, ParameterConstraint};
use crate::error::SyntaxError;
use crate::value::RouteValue;

static PARAM_NAME_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_][A-Za-z0-9_.\-]*$").unwrap());

/// One token of a parsed template
///
/// # Examples
///
/// ```
/// use pathway_router::route::pattern::classify_segment;
/// use pathway_router::ConstraintRegistry;
///
/// let registry = ConstraintRegistry::default();
///
/// let seg = classify_segment("users", &registry).unwrap();
/// assert!(!seg.is_parameter);
///
/// let seg = classify_segment("{id:int?}", &registry).unwrap();
/// assert_eq!(seg.value, "id");
/// assert!(seg.is_parameter && seg.is_optional);
/// assert_eq!(seg.constraints.len(), 1);
///
/// let seg = classify_segment("{*rest}", &registry).unwrap();
/// assert!(seg.is_catch_all);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateSegment {
    /// Literal text, or the parameter name without braces and modifiers
    pub value: String,
    pub is_parameter: bool,
    /// `{name?}`, `{name=default}` or `{*name?}`
    pub is_optional: bool,
    /// `{*name}`
    pub is_catch_all: bool,
    /// Applied in declaration order
    pub constraints: Vec<ParameterConstraint>,
    /// Raw default bound when an optional parameter is absent
    pub default_value: Option<String>,
}

/// Outcome of matching one segment against one path token
#[derive(Debug, Clone, PartialEq)]
pub enum SegmentMatch {
    /// The segment rejects the token (or its absence)
    NoMatch,
    /// A literal segment matched; nothing is bound
    Literal,
    /// A parameter matched; `None` is a null binding
    Parameter(Option<RouteValue>),
}

impl SegmentMatch {
    pub fn is_match(&self) -> bool {
        !matches!(self, SegmentMatch::NoMatch)
    }
}

impl TemplateSegment {
    /// Creates a literal segment
    pub fn literal(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            is_parameter: false,
            is_optional: false,
            is_catch_all: false,
            constraints: Vec::new(),
            default_value: None,
        }
    }

    /// Matches a single path token; `None` means the path ran out of tokens
    ///
    /// Literals compare case-insensitively. Parameters run their constraints
    /// in order, each one validating the raw token and possibly converting the
    /// value; the first rejection fails the segment. An absent optional
    /// parameter binds its default, or null when none is declared.
    pub fn try_match(&self, token: Option<&str>) -> SegmentMatch {
        match (self.is_parameter, token) {
            (false, Some(token)) if eq_ignore_case(token, &self.value) => SegmentMatch::Literal,
            (false, _) => SegmentMatch::NoMatch,
            (true, Some(token)) => self
                .convert(token)
                .map_or(SegmentMatch::NoMatch, |v| SegmentMatch::Parameter(Some(v))),
            (true, None) if self.is_optional => match &self.default_value {
                Some(default) => self
                    .convert(default)
                    .map_or(SegmentMatch::NoMatch, |v| SegmentMatch::Parameter(Some(v))),
                None => SegmentMatch::Parameter(None),
            },
            (true, None) => SegmentMatch::NoMatch,
        }
    }

    /// Runs the constraint chain over `raw`
    pub(crate) fn convert(&self, raw: &str) -> Option<RouteValue> {
        self.constraints
            .iter()
            .try_fold(RouteValue::from(raw), |current, c| c.apply(raw, current))
    }
}

impl fmt::Display for TemplateSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.is_parameter {
            return f.write_str(&self.value);
        }

        f.write_str("{")?;
        if self.is_catch_all {
            f.write_str("*")?;
        }
        f.write_str(&self.value)?;
        for (idx, constraint) in self.constraints.iter().enumerate() {
            f.write_str(if idx == 0 { ":" } else { "," })?;
            write!(f, "{}", constraint)?;
        }
        match &self.default_value {
            Some(default) => write!(f, "={}", default)?,
            None if self.is_optional => f.write_str("?")?,
            None => {}
        }
        f.write_str("}")
    }
}

/// Classifies a single template segment (pure function)
///
/// # Parsing Rules
///
/// 1. **Catch-all**: `{*name}`, `{*name:constraint}`, `{*name?}`
/// 2. **Default value**: `{name=value}`, `{name:constraint=value}` (implies optional)
/// 3. **Optional**: `{name?}`, `{name:constraint?}`
/// 4. **Required**: `{name}`, `{name:c1,c2}`, `{name:c1:c2}`
/// 5. **Literal**: anything without braces
pub fn classify_segment(
    segment: &str,
    registry: &ConstraintRegistry,
) -> Result<TemplateSegment, SyntaxError> {
    if segment.is_empty() {
        return Err(SyntaxError::EmptySegment);
    }

    let opens = segment.starts_with('{');
    let closes = segment.ends_with('}');
    let inner = match (opens, closes) {
        (true, true) if segment.len() >= 2 => &segment[1..segment.len() - 1],
        (false, false) if segment.contains(['{', '}']) => {
            return Err(SyntaxError::BraceInLiteral(segment.to_string()))
        }
        (false, false) => return Ok(TemplateSegment::literal(segment)),
        _ => return Err(SyntaxError::UnbalancedBraces(segment.to_string())),
    };

    if has_brace_outside_parens(inner) {
        return Err(SyntaxError::UnbalancedBraces(segment.to_string()));
    }

    let (is_catch_all, inner) = match inner.strip_prefix('*') {
        Some(rest) => (true, rest),
        None => (false, inner),
    };

    let (inner, default_value) = match find_outside_parens(inner, '=') {
        Some(idx) => (&inner[..idx], Some(inner[idx + 1..].to_string())),
        None => (inner, None),
    };

    let (inner, marked_optional) = match inner.strip_suffix('?') {
        Some(rest) => (rest, true),
        None => (inner, false),
    };

    let (name, constraint_spec) = match find_outside_parens(inner, ':') {
        Some(idx) => (&inner[..idx], Some(&inner[idx + 1..])),
        None => (inner, None),
    };

    if name.is_empty() {
        return Err(SyntaxError::EmptyParameterName(segment.to_string()));
    }
    if !PARAM_NAME_REGEX.is_match(name) {
        return Err(SyntaxError::InvalidParameterName(name.to_string()));
    }
    if is_catch_all && default_value.is_some() {
        return Err(SyntaxError::CatchAllDefault);
    }
    if marked_optional && default_value.is_some() {
        return Err(SyntaxError::OptionalWithDefault(name.to_string()));
    }

    let constraints = constraint_spec
        .map(|spec| registry.resolve_list(spec))
        .transpose()?
        .unwrap_or_default();

    let parsed = TemplateSegment {
        value: name.to_string(),
        is_parameter: true,
        is_optional: marked_optional || default_value.is_some(),
        is_catch_all,
        constraints,
        default_value,
    };

    if let Some(default) = &parsed.default_value {
        if parsed.convert(default).is_none() {
            return Err(SyntaxError::InvalidDefault {
                param: parsed.value.clone(),
                value: default.clone(),
            });
        }
    }

    Ok(parsed)
}

fn has_brace_outside_parens(text: &str) -> bool {
    find_outside_parens(text, '{').is_some() || find_outside_parens(text, '}').is_some()
}

/// Byte index of the first `needle` at parenthesis depth zero
fn find_outside_parens(text: &str, needle: char) -> Option<usize> {
    let mut depth = 0usize;
    for (idx, c) in text.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            c if c == needle && depth == 0 => return Some(idx),
            _ => {}
        }
    }
    None
}

fn fold_case(s: &str) -> impl Iterator<Item = char> + '_ {
    s.chars().flat_map(char::to_uppercase)
}

/// Case-insensitive equality used for literals and template text
pub(crate) fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b) || fold_case(a).eq(fold_case(b))
}

/// Case-insensitive lexical order used by the precedence comparator
pub(crate) fn cmp_ignore_case(a: &str, b: &str) -> std::cmp::Ordering {
    fold_case(a).cmp(fold_case(b))
}

/// Feeds the case-folded characters of `s` into a hasher
pub(crate) fn hash_ignore_case<H: std::hash::Hasher>(s: &str, state: &mut H) {
    use std::hash::Hash;
    for c in fold_case(s) {
        c.hash(state);
    }
}
