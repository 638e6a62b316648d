//! Ordered route table with first-match lookup

use std::fmt;
use std::sync::Arc;

use crate::constraint::ConstraintRegistry;
use crate::discovery::RouteSource;
use crate::error::RouteError;
use crate::path::path_segments;
use crate::route::pattern::eq_ignore_case;
use crate::route::{check_ambiguity, compare_templates, parse_template_with, RouteTemplate};
use crate::{RouteEntry, RouteMatch};

/// Route entries kept in precedence order
///
/// Every mutation builds the new sequence aside, sorts it, checks it for
/// ambiguous neighbors and only then replaces the current one, so a failed
/// `register` or `merge` leaves the registry as it was.
pub struct RouteRegistry<H> {
    entries: Vec<Arc<RouteEntry<H>>>,
    constraints: ConstraintRegistry,
}

impl<H> Default for RouteRegistry<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> Clone for RouteRegistry<H> {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
            constraints: self.constraints.clone(),
        }
    }
}

impl<H: fmt::Debug> fmt::Debug for RouteRegistry<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteRegistry")
            .field("entries", &self.entries)
            .finish_non_exhaustive()
    }
}

impl<H> RouteRegistry<H> {
    /// Creates an empty registry using the built-in constraints
    pub fn new() -> Self {
        Self::with_constraints(ConstraintRegistry::default())
    }

    /// Creates an empty registry resolving constraint names against `constraints`
    pub fn with_constraints(constraints: ConstraintRegistry) -> Self {
        Self {
            entries: Vec::new(),
            constraints,
        }
    }

    /// Entries in precedence order
    pub fn entries(&self) -> &[Arc<RouteEntry<H>>] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn constraints(&self) -> &ConstraintRegistry {
        &self.constraints
    }

    /// Finds the first entry, in precedence order, that matches `path`
    ///
    /// The path is tokenized once; a constraint rejection simply moves on to
    /// the next candidate.
    ///
    /// # Examples
    ///
    /// ```
    /// use pathway_router::RouteRegistry;
    ///
    /// let mut registry = RouteRegistry::new();
    /// registry.register("/{anything}", "any", Vec::new()).unwrap();
    /// registry.register("/users/{id:int}", "user", Vec::new()).unwrap();
    ///
    /// assert_eq!(*registry.try_match("/users/1").unwrap().handler(), "user");
    /// assert_eq!(*registry.try_match("/users").unwrap().handler(), "any");
    /// assert!(registry.try_match("/users/abc").is_none());
    /// ```
    pub fn try_match(&self, path: &str) -> Option<RouteMatch<H>> {
        let tokens = path_segments(path);
        let found = self.entries.iter().find_map(|entry| {
            entry.try_match_tokens(&tokens).map(|params| RouteMatch {
                entry: Arc::clone(entry),
                params,
            })
        });

        match &found {
            Some(m) => tracing::trace!(path, template = m.template().text(), "route matched"),
            None => tracing::trace!(path, "no route matched"),
        }
        found
    }
}

impl<H: PartialEq> RouteRegistry<H> {
    /// Parses `text` and inserts it in precedence order
    ///
    /// Registering the same template text for an equal handler again is a
    /// no-op returning the existing entry. Any other tie with a registered
    /// template, including one that differs only in letter case, fails with
    /// [`RouteError::Ambiguous`].
    ///
    /// # Examples
    ///
    /// ```
    /// use pathway_router::RouteRegistry;
    ///
    /// let mut registry = RouteRegistry::new();
    /// registry.register("/literal", 1, Vec::new()).unwrap();
    /// registry.register("/literal", 1, Vec::new()).unwrap();
    /// assert_eq!(registry.len(), 1);
    ///
    /// let err = registry.register("/Literal", 2, Vec::new()).unwrap_err();
    /// assert!(err.is_ambiguous());
    /// assert_eq!(registry.len(), 1);
    /// ```
    pub fn register(
        &mut self,
        text: &str,
        handler: H,
        unused_parameter_names: Vec<String>,
    ) -> Result<Arc<RouteEntry<H>>, RouteError> {
        let template = parse_template_with(text, &self.constraints)?;
        let entry = Arc::new(RouteEntry::new(template, handler, unused_parameter_names));

        if let Some(existing) = self.entries.iter().find(|e| is_duplicate(e, &entry)) {
            tracing::trace!(template = text, "route already registered");
            return Ok(Arc::clone(existing));
        }

        self.merge([Arc::clone(&entry)])?;
        Ok(entry)
    }

    /// Inserts many entries at once
    ///
    /// Duplicates (see [`RouteRegistry::register`]) are skipped, the combined
    /// sequence is sorted once and checked for ambiguity once.
    pub fn merge<I>(&mut self, entries: I) -> Result<(), RouteError>
    where
        I: IntoIterator<Item = Arc<RouteEntry<H>>>,
    {
        let mut combined = self.entries.clone();
        let mut added = 0usize;

        for entry in entries {
            if combined.iter().any(|e| is_duplicate(e, &entry)) {
                continue;
            }
            combined.push(entry);
            added += 1;
        }

        if added == 0 {
            return Ok(());
        }

        combined.sort_by(|a, b| compare_templates(a.template(), b.template()));
        check_ambiguity(combined.iter().map(|e| e.template()))?;

        self.entries = combined;
        tracing::debug!(added, total = self.entries.len(), "routes merged");
        Ok(())
    }

    /// Merges every entry of `other` into this registry
    pub fn merge_registry(&mut self, other: &RouteRegistry<H>) -> Result<(), RouteError> {
        self.merge(other.entries.iter().cloned())
    }
}

impl<H: Clone + PartialEq> RouteRegistry<H> {
    /// Builds a registry from handler → template list pairs
    ///
    /// Each handler's parameter names are collected across all of its
    /// templates; an entry records the names missing from its own template
    /// (compared case-insensitively) so they can be bound to null on a match.
    ///
    /// # Examples
    ///
    /// ```
    /// use pathway_router::RouteRegistry;
    ///
    /// let registry = RouteRegistry::from_handler_templates(vec![
    ///     ("counter", vec!["/counter", "/counter/{start:int}"]),
    /// ])
    /// .unwrap();
    ///
    /// let found = registry.try_match("/counter").unwrap();
    /// assert!(found.params.is_null("start"));
    /// ```
    pub fn from_handler_templates<I, T, S>(pairs: I) -> Result<Self, RouteError>
    where
        I: IntoIterator<Item = (H, T)>,
        T: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::new().with_handler_templates(pairs)
    }

    /// Builds a registry from a discovery source
    pub fn from_source<R>(source: &R) -> Result<Self, RouteError>
    where
        R: RouteSource<H> + ?Sized,
    {
        Self::from_handler_templates(source.templates_by_handler())
    }

    /// Adds handler → template list pairs to this registry
    ///
    /// Same rules as [`RouteRegistry::from_handler_templates`], using this
    /// registry's constraints.
    pub fn with_handler_templates<I, T, S>(mut self, pairs: I) -> Result<Self, RouteError>
    where
        I: IntoIterator<Item = (H, T)>,
        T: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut entries = Vec::new();

        for (handler, texts) in pairs {
            let templates = texts
                .into_iter()
                .map(|text| parse_template_with(text.as_ref(), &self.constraints))
                .collect::<Result<Vec<_>, _>>()?;

            let all_names = union_parameter_names(&templates);
            for template in templates {
                let unused = all_names.clone();
                entries.push(Arc::new(RouteEntry::new(template, handler.clone(), unused)));
            }
        }

        // Sources such as hash maps yield pairs in no fixed order; ordering by
        // text keeps tied templates, and any ambiguity error, stable.
        entries.sort_by(|a, b| a.template().text().cmp(b.template().text()));

        let count = entries.len();
        self.merge(entries)?;
        tracing::debug!(templates = count, routes = self.len(), "route table built");
        Ok(self)
    }
}

fn is_duplicate<H: PartialEq>(
    existing: &Arc<RouteEntry<H>>,
    incoming: &Arc<RouteEntry<H>>,
) -> bool {
    Arc::ptr_eq(existing, incoming)
        || (existing.template().text() == incoming.template().text()
            && existing.handler() == incoming.handler())
}

/// Parameter names across `templates`, first spelling wins
fn union_parameter_names(templates: &[RouteTemplate]) -> Vec<String> {
    templates
        .iter()
        .flat_map(RouteTemplate::parameter_names)
        .fold(Vec::new(), |mut names: Vec<String>, name| {
            if !names.iter().any(|n| eq_ignore_case(n, name)) {
                names.push(name.to_string());
            }
            names
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RouteValue;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn texts<H>(registry: &RouteRegistry<H>) -> Vec<&str> {
        registry
            .entries()
            .iter()
            .map(|e| e.template().text())
            .collect()
    }

    #[test]
    fn test_register_keeps_precedence_order() {
        let mut registry = RouteRegistry::new();
        registry.register("/{anything}", "a", Vec::new()).unwrap();
        registry.register("/users/{id:int}", "b", Vec::new()).unwrap();
        registry.register("/users/1", "c", Vec::new()).unwrap();
        registry.register("/", "d", Vec::new()).unwrap();

        assert_eq!(
            texts(&registry),
            vec!["/", "/{anything}", "/users/1", "/users/{id:int}"]
        );
    }

    #[rstest]
    #[case("/users/1", "literal")]
    #[case("/users/2", "typed")]
    #[case("/users/x", "any")]
    fn test_first_match_wins(#[case] path: &str, #[case] expected: &str) {
        let registry = RouteRegistry::from_handler_templates(vec![
            ("any", vec!["/users/{name}"]),
            ("typed", vec!["/users/{id:int}"]),
            ("literal", vec!["/users/1"]),
        ])
        .unwrap();

        assert_eq!(*registry.try_match(path).unwrap().handler(), expected);
    }

    #[test]
    fn test_register_duplicate_returns_existing_entry() {
        let mut registry = RouteRegistry::new();
        let first = registry.register("/a/{x}", 1, Vec::new()).unwrap();
        let second = registry.register("/a/{x}", 1, Vec::new()).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(registry.len(), 1);
    }

    #[rstest]
    #[case("/literal", "/Literal")]
    #[case("/a/{x}", "/a/{y}")]
    #[case("/a/{x}", "/a/{x}")]
    #[case("/{a:int}/b", "/{c:guid}/b")]
    fn test_ambiguous_registration_fails(#[case] first: &str, #[case] second: &str) {
        let mut registry = RouteRegistry::new();
        registry.register(first, 1, Vec::new()).unwrap();

        let err = registry.register(second, 2, Vec::new()).unwrap_err();
        assert_eq!(
            err,
            RouteError::Ambiguous {
                first: first.to_string(),
                second: second.to_string(),
            }
        );
        assert_eq!(texts(&registry), vec![first]);
    }

    #[test]
    fn test_syntax_error_leaves_registry_unchanged() {
        let mut registry = RouteRegistry::new();
        registry.register("/ok", (), Vec::new()).unwrap();
        let err = registry.register("/{*a}/{b}", (), Vec::new()).unwrap_err();
        assert!(!err.is_ambiguous());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_merge_is_atomic() {
        let mut registry = RouteRegistry::new();
        registry.register("/a", 1, Vec::new()).unwrap();

        let incoming = vec![
            Arc::new(RouteEntry::parse("/b", 2, Vec::new()).unwrap()),
            Arc::new(RouteEntry::parse("/A", 3, Vec::new()).unwrap()),
        ];
        assert!(registry.merge(incoming).unwrap_err().is_ambiguous());
        assert_eq!(texts(&registry), vec!["/a"]);
    }

    #[test]
    fn test_merge_registry_combines_tables() {
        let left = RouteRegistry::from_handler_templates(vec![("home", vec!["/"])]).unwrap();
        let right = RouteRegistry::from_handler_templates(vec![
            ("about", vec!["/about"]),
            ("home", vec!["/"]),
        ])
        .unwrap();

        let mut combined = left.clone();
        combined.merge_registry(&right).unwrap();

        assert_eq!(texts(&combined), vec!["/", "/about"]);
        assert_eq!(left.len(), 1);
        assert_eq!(right.len(), 2);
    }

    #[test]
    fn test_unused_parameters_are_case_insensitive() {
        let registry = RouteRegistry::from_handler_templates(vec![(
            "page",
            vec!["/p/{Id}", "/p/{id}/{tab}", "/p"],
        )])
        .unwrap();

        let names = |text: &str| {
            registry
                .entries()
                .iter()
                .find(|e| e.template().text() == text)
                .map(|e| e.unused_parameter_names().to_vec())
                .unwrap()
        };
        assert_eq!(names("/p/{Id}"), vec!["tab".to_string()]);
        assert_eq!(names("/p/{id}/{tab}"), Vec::<String>::new());
        assert_eq!(names("/p"), vec!["Id".to_string(), "tab".to_string()]);

        let found = registry.try_match("/p").unwrap();
        assert!(found.params.is_null("Id"));
        assert!(found.params.is_null("tab"));
    }

    #[test]
    fn test_handler_templates_error_propagates() {
        let err = RouteRegistry::from_handler_templates(vec![("x", vec!["/{id:bogus}"])])
            .unwrap_err();
        assert!(matches!(err, RouteError::TemplateSyntax { .. }));
    }

    #[test]
    fn test_custom_constraints() {
        let constraints = ConstraintRegistry::default().with_constraint("even", |_arg| {
            Err("even takes no argument here".to_string())
        });
        let mut registry: RouteRegistry<()> = RouteRegistry::with_constraints(constraints);
        assert!(registry.register("/n/{v:even}", (), Vec::new()).is_err());
        assert!(registry.constraints().contains("even"));
    }

    #[test]
    fn test_typed_values_in_match() {
        let registry =
            RouteRegistry::from_handler_templates(vec![("item", vec!["/items/{id:int}"])]).unwrap();
        let found = registry.try_match("/items/42?x=1").unwrap();
        assert_eq!(found.params.get("id"), Some(&RouteValue::Int(42)));
        assert!(registry.try_match("/items/abc").is_none());
    }

    #[test]
    fn test_empty_registry() {
        let registry: RouteRegistry<()> = RouteRegistry::default();
        assert!(registry.is_empty());
        assert!(registry.try_match("/").is_none());
    }
}
