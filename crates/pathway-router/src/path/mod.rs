//! Path utilities for request-path tokenization
//!
//! All functions are **pure**: given same input, always produce same output with no side effects.

use std::borrow::Cow;

pub mod location;
pub use location::path_and_query;

/// Removes a `?query` or `#fragment` tail
///
/// # Examples
///
/// ```
/// use pathway_router::path::strip_query;
///
/// assert_eq!(strip_query("/users/1?tab=posts"), "/users/1");
/// assert_eq!(strip_query("/docs#intro"), "/docs");
/// assert_eq!(strip_query("/plain"), "/plain");
/// ```
pub fn strip_query(path: &str) -> &str {
    path.find(['?', '#']).map_or(path, |idx| &path[..idx])
}

/// Percent-decodes one path segment as UTF-8
///
/// Segments that do not decode to valid UTF-8 are returned unchanged.
/// `+` is not treated as a space.
pub fn decode_segment(segment: &str) -> Cow<'_, str> {
    urlencoding::decode(segment).unwrap_or(Cow::Borrowed(segment))
}

/// Splits a request path into decoded tokens
///
/// The query and fragment are ignored, leading/trailing separators are
/// trimmed, empty segments are dropped and every remaining segment is
/// percent-decoded.
///
/// # Examples
///
/// ```
/// use pathway_router::path::path_segments;
///
/// assert_eq!(path_segments("/a//b/"), vec!["a", "b"]);
/// assert_eq!(path_segments("/files/my%20doc?x=1"), vec!["files", "my doc"]);
/// assert!(path_segments("/").is_empty());
/// ```
pub fn path_segments(path: &str) -> Vec<String> {
    strip_query(path)
        .trim_matches('/')
        .split('/')
        .filter(|s| !s.is_empty())
        .map(|s| decode_segment(s).into_owned())
        .collect()
}
