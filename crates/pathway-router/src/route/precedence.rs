//! Route precedence
//!
//! Routes are sorted from most to least specific:
//!
//! 1. Shorter templates come first.
//! 2. At the first segment position where the two differ:
//!    - a literal beats a parameter,
//!    - a required parameter beats an optional one,
//!    - a parameter with more constraints beats one with fewer,
//!    - two literals are ordered case-insensitively.
//!
//! Two templates that tie at every position are ambiguous (`/literal` and
//! `/Literal`, `/{a}/x` and `/{b}/x`). Comparison only reports the tie as
//! `Ordering::Equal`; [`check_ambiguity`] turns ties into errors in a
//! separate pass over the sorted sequence.

use std::cmp::Ordering;

use super::parser::RouteTemplate;
use super::pattern::{cmp_ignore_case, TemplateSegment};
use crate::error::RouteError;

/// Total order over templates; `Ordering::Equal` means ambiguous
///
/// # Examples
///
/// ```
/// use pathway_router::{compare_templates, parse_template};
/// use std::cmp::Ordering;
///
/// let literal = parse_template("/users/new").unwrap();
/// let param = parse_template("/users/{id}").unwrap();
/// assert_eq!(compare_templates(&literal, &param), Ordering::Less);
/// ```
pub fn compare_templates(x: &RouteTemplate, y: &RouteTemplate) -> Ordering {
    x.len().cmp(&y.len()).then_with(|| {
        x.segments()
            .iter()
            .zip(y.segments())
            .map(|(a, b)| compare_segments(a, b))
            .find(|ordering| ordering.is_ne())
            .unwrap_or(Ordering::Equal)
    })
}

fn compare_segments(x: &TemplateSegment, y: &TemplateSegment) -> Ordering {
    match (x.is_parameter, y.is_parameter) {
        (false, true) => Ordering::Less,
        (true, false) => Ordering::Greater,
        (false, false) => cmp_ignore_case(&x.value, &y.value),
        (true, true) => x
            .is_optional
            .cmp(&y.is_optional)
            .then_with(|| y.constraints.len().cmp(&x.constraints.len())),
    }
}

/// Fails on the first pair of adjacent templates that tie
///
/// `templates` must already be sorted by [`compare_templates`]; in a sorted
/// sequence any tie is between neighbors.
pub fn check_ambiguity<'a, I>(templates: I) -> Result<(), RouteError>
where
    I: IntoIterator<Item = &'a RouteTemplate>,
{
    let mut previous: Option<&RouteTemplate> = None;
    for current in templates {
        if let Some(prev) = previous {
            if compare_templates(prev, current).is_eq() {
                tracing::warn!(
                    first = prev.text(),
                    second = current.text(),
                    "ambiguous routes detected"
                );
                return Err(RouteError::Ambiguous {
                    first: prev.text().to_string(),
                    second: current.text().to_string(),
                });
            }
        }
        previous = Some(current);
    }
    Ok(())
}
