//! Generic map union used when composing route sources and tables

use std::collections::HashMap;
use std::hash::{BuildHasher, Hash};

/// Union of two maps with a caller-supplied conflict resolver
///
/// Neither input is modified; keys present on one side only are copied and
/// keys present on both sides take `resolve(key, left, right)`.
///
/// # Examples
///
/// ```
/// use pathway_router::merge;
/// use std::collections::HashMap;
///
/// let left = HashMap::from([("a", 1), ("b", 2)]);
/// let right = HashMap::from([("b", 10), ("c", 3)]);
///
/// let merged = merge(&left, &right, |_, l, r| l + r);
/// assert_eq!(merged, HashMap::from([("a", 1), ("b", 12), ("c", 3)]));
/// assert_eq!(left.len(), 2);
/// ```
pub fn merge<K, V, S, F>(
    left: &HashMap<K, V, S>,
    right: &HashMap<K, V, S>,
    mut resolve: F,
) -> HashMap<K, V, S>
where
    K: Eq + Hash + Clone,
    V: Clone,
    S: BuildHasher + Clone,
    F: FnMut(&K, &V, &V) -> V,
{
    let mut result = left.clone();
    for (key, right_value) in right {
        let value = match left.get(key) {
            Some(left_value) => resolve(key, left_value, right_value),
            None => right_value.clone(),
        };
        result.insert(key.clone(), value);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_disjoint_keys_are_copied() {
        let left = HashMap::from([("a".to_string(), 1)]);
        let right = HashMap::from([("b".to_string(), 2)]);
        let merged = merge(&left, &right, |_, _, _| unreachable!());
        assert_eq!(merged.len(), 2);
        assert_eq!(merged["a"], 1);
        assert_eq!(merged["b"], 2);
    }

    #[test]
    fn test_conflicts_use_resolver_with_key() {
        let left = HashMap::from([("k", vec![1]), ("only_left", vec![0])]);
        let right = HashMap::from([("k", vec![2, 3])]);

        let mut seen = Vec::new();
        let merged = merge(&left, &right, |key, l, r| {
            seen.push(*key);
            l.iter().chain(r).copied().collect()
        });

        assert_eq!(seen, vec!["k"]);
        assert_eq!(merged["k"], vec![1, 2, 3]);
        assert_eq!(merged["only_left"], vec![0]);
    }

    #[test]
    fn test_inputs_are_untouched() {
        let left = HashMap::from([("x", 1)]);
        let right = HashMap::from([("x", 2)]);
        let before = (left.clone(), right.clone());

        let merged = merge(&left, &right, |_, _, r| *r);

        assert_eq!(merged["x"], 2);
        assert_eq!((left, right), before);
    }

    #[test]
    fn test_empty_sides() {
        let empty: HashMap<&str, i32> = HashMap::new();
        let right = HashMap::from([("x", 2)]);
        assert_eq!(merge(&empty, &right, |_, l, _| *l), right);
        assert_eq!(merge(&right, &empty, |_, l, _| *l), right);
        assert!(merge(&empty, &empty, |_, l, _| *l).is_empty());
    }
}
