//! # Pathway Router
//!
//! Template-based route matching for navigation layers:
//! - Literal segments (`/about`), matched case-insensitively
//! - Parameters (`/users/{id}`) with typed constraints (`{id:int}`)
//! - Optional parameters and defaults (`/blog/{year?}`, `/list/{page:int=1}`)
//! - Catch-all parameters (`/docs/{*path}`)
//!
//! ## Lookup
//!
//! Routes live in a [`RouteRegistry`] sorted by precedence (most specific
//! first). A lookup walks the sorted entries and returns the first one that
//! matches, so `/users/new` wins over `/users/{id}` regardless of the order in
//! which they were registered. Two routes that cannot be ordered are rejected
//! when the table is built, never during lookup.
//!
//! Each [`RouteEntry`] also knows the parameter names its handler uses in
//! other templates; those are bound to null on a match so the handler always
//! sees the same parameter set.
//!
//! ## Example
//!
//! ```
//! use pathway_router::{RouteRegistry, RouteValue};
//!
//! let registry = RouteRegistry::from_handler_templates(vec![
//!     ("user", vec!["/users/{id:int}", "/users/me"]),
//!     ("files", vec!["/files/{*path}"]),
//! ])
//! .unwrap();
//!
//! let found = registry.try_match("/users/42").unwrap();
//! assert_eq!(*found.handler(), "user");
//! assert_eq!(found.params.get("id"), Some(&RouteValue::Int(42)));
//!
//! let found = registry.try_match("/users/me").unwrap();
//! assert!(found.params.is_null("id"));
//!
//! let found = registry.try_match("/files/a/b.txt").unwrap();
//! assert_eq!(found.params.get_str("path"), Some("a/b.txt"));
//! assert!(registry.try_match("/nowhere").is_none());
//! ```

use std::fmt;
use std::sync::Arc;

// ============================================================================
// Module Declarations
// ============================================================================

pub mod constraint;
pub mod discovery;
pub mod error;
pub mod merge;
pub mod path;
pub mod registry;
pub mod route;
pub mod shared;
pub mod value;

pub use constraint::{ConstraintCheck, ConstraintRegistry, ParameterConstraint};
pub use discovery::{combine_sources, RouteSource};
pub use error::{RouteError, SyntaxError};
pub use merge::merge;
pub use path::{path_and_query, path_segments, strip_query};
pub use registry::RouteRegistry;
pub use route::{
    check_ambiguity, compare_templates, match_template, match_tokens, parse_template,
    parse_template_with, RouteTemplate, SegmentMatch, TemplateSegment,
};
pub use shared::SharedRegistry;
pub use value::{RouteParams, RouteValue};

use route::pattern::eq_ignore_case;

// ============================================================================
// Core Types
// ============================================================================

/// A parsed template bound to its handler
///
/// Entries are created once at registration and never change afterwards;
/// registries share them as `Arc<RouteEntry<H>>`.
#[derive(Debug)]
pub struct RouteEntry<H> {
    template: RouteTemplate,
    handler: H,
    unused_parameter_names: Vec<String>,
}

impl<H> RouteEntry<H> {
    /// Creates an entry from an already parsed template
    ///
    /// Names that are also parameters of `template` (compared
    /// case-insensitively) are dropped from `unused_parameter_names`.
    pub fn new(
        template: RouteTemplate,
        handler: H,
        mut unused_parameter_names: Vec<String>,
    ) -> Self {
        unused_parameter_names.retain(|name| {
            !template
                .parameter_names()
                .any(|own| eq_ignore_case(own, name))
        });
        Self {
            template,
            handler,
            unused_parameter_names,
        }
    }

    /// Parses `text` with the built-in constraints and creates an entry
    ///
    /// # Examples
    ///
    /// ```
    /// use pathway_router::RouteEntry;
    ///
    /// let entry = RouteEntry::parse("/a", "page", vec!["x".to_string()]).unwrap();
    /// let params = entry.try_match("/a").unwrap();
    /// assert!(params.is_null("x"));
    /// assert!(entry.try_match("/b").is_none());
    /// ```
    pub fn parse(
        text: &str,
        handler: H,
        unused_parameter_names: Vec<String>,
    ) -> Result<Self, RouteError> {
        Ok(Self::new(
            parse_template(text)?,
            handler,
            unused_parameter_names,
        ))
    }

    pub fn template(&self) -> &RouteTemplate {
        &self.template
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

    /// Parameter names the handler declares in its other templates
    pub fn unused_parameter_names(&self) -> &[String] {
        &self.unused_parameter_names
    }

    /// Runs the route matching algorithm against `path`
    pub fn try_match(&self, path: &str) -> Option<RouteParams> {
        match_template(&self.template, &self.unused_parameter_names, path)
    }

    /// Same as [`RouteEntry::try_match`] over an already tokenized path
    pub fn try_match_tokens(&self, tokens: &[String]) -> Option<RouteParams> {
        match_tokens(&self.template, &self.unused_parameter_names, tokens)
    }
}

impl<H: fmt::Debug> fmt::Display for RouteEntry<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {:?}", self.template, self.handler)
    }
}

/// Result of a successful lookup
///
/// Holds a shared handle on the matched entry, so a match stays valid after
/// the registry it came from has been replaced.
#[derive(Debug)]
pub struct RouteMatch<H> {
    pub entry: Arc<RouteEntry<H>>,
    pub params: RouteParams,
}

impl<H> RouteMatch<H> {
    pub fn handler(&self) -> &H {
        self.entry.handler()
    }

    pub fn template(&self) -> &RouteTemplate {
        self.entry.template()
    }
}

impl<H> Clone for RouteMatch<H> {
    fn clone(&self) -> Self {
        Self {
            entry: Arc::clone(&self.entry),
            params: self.params.clone(),
        }
    }
}
