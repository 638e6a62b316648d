//! Handler discovery input
//!
//! Whatever finds route declarations (a config file, a plugin scan, a build
//! script) hands them over as handler → template list pairs. The registry
//! only needs that mapping, never the mechanism that produced it.

use std::collections::{BTreeMap, HashMap};
use std::hash::{BuildHasher, Hash};

use crate::merge::merge;

/// A supplier of route templates grouped by handler
pub trait RouteSource<H> {
    /// Handler and its raw template strings, one pair per handler
    fn templates_by_handler(&self) -> Vec<(H, Vec<String>)>;
}

impl<H: Clone, S> RouteSource<H> for HashMap<H, Vec<String>, S> {
    fn templates_by_handler(&self) -> Vec<(H, Vec<String>)> {
        self.iter()
            .map(|(handler, templates)| (handler.clone(), templates.clone()))
            .collect()
    }
}

impl<H: Clone> RouteSource<H> for BTreeMap<H, Vec<String>> {
    fn templates_by_handler(&self) -> Vec<(H, Vec<String>)> {
        self.iter()
            .map(|(handler, templates)| (handler.clone(), templates.clone()))
            .collect()
    }
}

impl<H: Clone> RouteSource<H> for Vec<(H, Vec<String>)> {
    fn templates_by_handler(&self) -> Vec<(H, Vec<String>)> {
        self.clone()
    }
}

/// Combines two handler maps
///
/// A handler present on both sides keeps the left templates followed by the
/// right ones it does not already list.
///
/// # Examples
///
/// ```
/// use pathway_router::combine_sources;
/// use std::collections::HashMap;
///
/// let core = HashMap::from([("home", vec!["/".to_string()])]);
/// let plugin = HashMap::from([
///     ("home", vec!["/index".to_string(), "/".to_string()]),
///     ("about", vec!["/about".to_string()]),
/// ]);
///
/// let combined = combine_sources(&core, &plugin);
/// assert_eq!(combined["home"], vec!["/", "/index"]);
/// assert_eq!(combined["about"], vec!["/about"]);
/// ```
pub fn combine_sources<H, S>(
    left: &HashMap<H, Vec<String>, S>,
    right: &HashMap<H, Vec<String>, S>,
) -> HashMap<H, Vec<String>, S>
where
    H: Eq + Hash + Clone,
    S: BuildHasher + Clone,
{
    merge(left, right, |_, l, r| {
        l.iter()
            .chain(r.iter().filter(|t| !l.contains(t)))
            .cloned()
            .collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{RouteError, RouteRegistry};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_btree_source_keeps_handler_order() {
        let source = BTreeMap::from([
            ("b", vec!["/b".to_string()]),
            ("a", vec!["/a".to_string(), "/a/{id}".to_string()]),
        ]);
        let pairs = source.templates_by_handler();
        assert_eq!(pairs[0].0, "a");
        assert_eq!(pairs[1], ("b", vec!["/b".to_string()]));
    }

    #[test]
    fn test_registry_from_hash_map_source() {
        let source = HashMap::from([
            ("users", vec!["/users".to_string(), "/users/{id:int}".to_string()]),
            ("home", vec!["/".to_string()]),
        ]);
        let registry = RouteRegistry::from_source(&source).unwrap();
        assert_eq!(registry.len(), 3);

        let found = registry.try_match("/users").unwrap();
        assert_eq!(*found.handler(), "users");
        assert!(found.params.is_null("id"));
    }

    #[test]
    fn test_hash_map_ambiguity_is_reported_in_stable_order() {
        for _ in 0..50 {
            let source = HashMap::from([
                ("a", vec!["/x/{id}".to_string()]),
                ("b", vec!["/x/{name}".to_string()]),
            ]);
            assert_eq!(
                RouteRegistry::from_source(&source).unwrap_err(),
                RouteError::Ambiguous {
                    first: "/x/{id}".to_string(),
                    second: "/x/{name}".to_string(),
                }
            );
        }
    }

    #[test]
    fn test_registry_from_vec_source() {
        let source = vec![(1u8, vec!["/one".to_string()]), (2u8, vec!["/two".to_string()])];
        let registry = RouteRegistry::from_source(&source).unwrap();
        assert_eq!(*registry.try_match("/two").unwrap().handler(), 2);
    }

    #[test]
    fn test_combine_sources_does_not_touch_inputs() {
        let left = HashMap::from([("a", vec!["/a".to_string()])]);
        let right = HashMap::from([("a", vec!["/a/{x}".to_string()])]);

        let combined = combine_sources(&left, &right);

        assert_eq!(combined["a"], vec!["/a", "/a/{x}"]);
        assert_eq!(left["a"], vec!["/a"]);
        assert_eq!(right["a"], vec!["/a/{x}"]);
    }
}
