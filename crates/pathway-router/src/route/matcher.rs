//! Route matching
//!
//! Decides whether one template matches one request path and collects the
//! parameter bindings. The checks run in a fixed order:
//!
//! 1. Catch-all templates with enough tokens capture the remainder up front.
//! 2. Templates without optional segments fail fast on a length mismatch.
//! 3. Segments are walked positionally; a catch-all ends the walk.
//! 4. Unused handler parameters are bound to null.
//! 5. The match is accepted when the template has a catch-all, or when the
//!    matched segments cover every path token *and* every non-optional
//!    template segment.

use super::parser::RouteTemplate;
use super::pattern::{eq_ignore_case, SegmentMatch};
use crate::path::path_segments;
use crate::value::RouteParams;

/// Matches `path` against `template`
///
/// `unused` lists parameter names that must be present as null bindings
/// (see [`crate::RouteEntry`]); they are skipped for catch-all templates.
///
/// # Examples
///
/// ```
/// use pathway_router::{match_template, parse_template};
///
/// let template = parse_template("/foo/bar/{*rest}").unwrap();
/// let params = match_template(&template, &[], "/foo/bar/one/two/three").unwrap();
/// assert_eq!(params.get_str("rest"), Some("one/two/three"));
/// ```
pub fn match_template(
    template: &RouteTemplate,
    unused: &[String],
    path: &str,
) -> Option<RouteParams> {
    match_tokens(template, unused, &path_segments(path))
}

/// Same as [`match_template`] over an already tokenized path
pub fn match_tokens(
    template: &RouteTemplate,
    unused: &[String],
    tokens: &[String],
) -> Option<RouteParams> {
    let segment_count = template.len();

    let catch_all_value = if template.contains_catch_all() && tokens.len() >= segment_count {
        Some(tokens[segment_count - 1..].join("/"))
    } else if template.optional_segments_count() == 0 && segment_count != tokens.len() {
        return None;
    } else {
        None
    };

    let mut params = RouteParams::new();
    let mut matched = 0usize;

    for (idx, segment) in template.segments().iter().enumerate() {
        let token = if segment.is_catch_all {
            catch_all_value.as_deref()
        } else {
            tokens.get(idx).map(String::as_str)
        };

        match segment.try_match(token) {
            SegmentMatch::NoMatch => return None,
            SegmentMatch::Literal => matched += 1,
            SegmentMatch::Parameter(value) => {
                matched += 1;
                params.insert(segment.value.as_str(), value);
            }
        }

        if segment.is_catch_all {
            break;
        }
    }

    if !template.contains_catch_all() {
        for name in unused {
            let bound = template
                .parameter_names()
                .any(|own| eq_ignore_case(own, name));
            if !bound {
                params.insert(name.as_str(), None);
            }
        }
    }

    let covers_path = matched >= tokens.len();
    let covers_required = matched >= segment_count - template.optional_segments_count();
    if template.contains_catch_all() || (covers_path && covers_required) {
        Some(params)
    } else {
        None
    }
}
