//! Conversion of a browser-style location into the text handed to matching
//!
//! Navigation layers usually report absolute URIs
//! (`https://host/app/users/1?tab=posts`), while route tables are written
//! against paths. Relative input is passed through untouched.

use std::borrow::Cow;
use url::Url;

/// Path and query of `location`
///
/// # Examples
///
/// ```
/// use pathway_router::path::path_and_query;
///
/// assert_eq!(path_and_query("https://example.com/users/1?tab=a"), "/users/1?tab=a");
/// assert_eq!(path_and_query("https://example.com"), "/");
/// assert_eq!(path_and_query("/already/relative"), "/already/relative");
/// ```
pub fn path_and_query(location: &str) -> Cow<'_, str> {
    match Url::parse(location) {
        Ok(url) if url.has_host() => match url.query() {
            Some(query) => Cow::Owned(format!("{}?{}", url.path(), query)),
            None => Cow::Owned(url.path().to_string()),
        },
        _ => Cow::Borrowed(location),
    }
}
