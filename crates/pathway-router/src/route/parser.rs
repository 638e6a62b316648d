//! Route template parsing
//!
//! Turns template text such as `/users/{id:int}/posts/{*rest}` into an
//! immutable [`RouteTemplate`]. Parsing is pure and deterministic: the same
//! text always yields an equal template, and every syntax problem is reported
//! here rather than at lookup time.

use once_cell::sync::Lazy;
use std::fmt;
use std::hash::{Hash, Hasher};

use super::pattern::{classify_segment, eq_ignore_case, hash_ignore_case, TemplateSegment};
use crate::constraint::ConstraintRegistry;
use crate::error::{RouteError, SyntaxError};

static DEFAULT_CONSTRAINTS: Lazy<ConstraintRegistry> = Lazy::new(ConstraintRegistry::default);

/// A parsed route template
///
/// Equality and hashing use the original text compared case-insensitively,
/// so `/Users/{id}` equals `/users/{id}`.
#[derive(Debug, Clone)]
pub struct RouteTemplate {
    text: String,
    segments: Vec<TemplateSegment>,
    optional_segments_count: usize,
    contains_catch_all: bool,
}

impl RouteTemplate {
    fn new(text: &str, segments: Vec<TemplateSegment>) -> Self {
        let optional_segments_count = segments.iter().filter(|s| s.is_optional).count();
        let contains_catch_all = segments.iter().any(|s| s.is_catch_all);
        Self {
            text: text.to_string(),
            segments,
            optional_segments_count,
            contains_catch_all,
        }
    }

    /// The template text exactly as registered
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn segments(&self) -> &[TemplateSegment] {
        &self.segments
    }

    /// Number of segments
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// True for the root template (`/`)
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn optional_segments_count(&self) -> usize {
        self.optional_segments_count
    }

    pub fn contains_catch_all(&self) -> bool {
        self.contains_catch_all
    }

    /// Parameter names in declaration order
    pub fn parameter_names(&self) -> impl Iterator<Item = &str> {
        self.segments
            .iter()
            .filter(|s| s.is_parameter)
            .map(|s| s.value.as_str())
    }
}

impl PartialEq for RouteTemplate {
    fn eq(&self, other: &Self) -> bool {
        eq_ignore_case(&self.text, &other.text)
    }
}

impl Eq for RouteTemplate {}

impl Hash for RouteTemplate {
    fn hash<H: Hasher>(&self, state: &mut H) {
        hash_ignore_case(&self.text, state);
    }
}

impl fmt::Display for RouteTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Parses a template with the built-in constraints
///
/// # Examples
///
/// ```
/// use pathway_router::parse_template;
///
/// let template = parse_template("/users/{id:int}/{tab?}").unwrap();
/// assert_eq!(template.len(), 3);
/// assert_eq!(template.optional_segments_count(), 1);
/// assert_eq!(template.parameter_names().collect::<Vec<_>>(), vec!["id", "tab"]);
///
/// assert!(parse_template("/files/{*path}/edit").is_err());
/// ```
pub fn parse_template(text: &str) -> Result<RouteTemplate, RouteError> {
    parse_template_with(text, &DEFAULT_CONSTRAINTS)
}

/// Parses a template resolving constraint names against `registry`
pub fn parse_template_with(
    text: &str,
    registry: &ConstraintRegistry,
) -> Result<RouteTemplate, RouteError> {
    let segments = split_template(text)
        .into_iter()
        .map(|segment| classify_segment(segment, registry))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|kind| RouteError::syntax(text, kind))?;

    validate_segments(&segments).map_err(|kind| RouteError::syntax(text, kind))?;

    Ok(RouteTemplate::new(text, segments))
}

/// Splits on `/` outside braces, ignoring leading and trailing separators
fn split_template(text: &str) -> Vec<&str> {
    let trimmed = text.trim_matches('/');
    if trimmed.is_empty() {
        return Vec::new();
    }

    let mut segments = Vec::new();
    let mut depth = 0i32;
    let mut start = 0;
    for (idx, c) in trimmed.char_indices() {
        match c {
            '{' => depth += 1,
            '}' => depth -= 1,
            '/' if depth <= 0 => {
                segments.push(&trimmed[start..idx]);
                start = idx + 1;
            }
            _ => {}
        }
    }
    segments.push(&trimmed[start..]);
    segments
}

fn validate_segments(segments: &[TemplateSegment]) -> Result<(), SyntaxError> {
    if segments.iter().filter(|s| s.is_catch_all).count() > 1 {
        return Err(SyntaxError::MultipleCatchAll);
    }

    let last = segments.len().saturating_sub(1);
    for (idx, segment) in segments.iter().enumerate() {
        if segment.is_catch_all && idx != last {
            return Err(SyntaxError::CatchAllNotLast);
        }
        if !segment.is_parameter {
            continue;
        }

        for next in &segments[idx + 1..] {
            if segment.is_optional && !next.is_optional {
                return Err(SyntaxError::RequiredAfterOptional(segment.value.clone()));
            }
            if next.is_parameter && eq_ignore_case(&segment.value, &next.value) {
                return Err(SyntaxError::DuplicateParameter(next.value.clone()));
            }
        }
    }
    Ok(())
}
