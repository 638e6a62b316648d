//! Publishing a route table to concurrent readers
//!
//! Lookups load the current table without locking. Writers build a complete
//! replacement aside and swap it in; a reader sees either the old table or
//! the new one, never a half-registered state.

use arc_swap::ArcSwap;
use std::sync::{Arc, Mutex, PoisonError};

use crate::error::RouteError;
use crate::registry::RouteRegistry;
use crate::RouteMatch;

/// Route table shared between lookup callers and an occasional writer
///
/// # Examples
///
/// ```
/// use pathway_router::{RouteRegistry, SharedRegistry};
///
/// let shared = SharedRegistry::new(RouteRegistry::new());
/// assert!(shared.try_match("/about").is_none());
///
/// shared
///     .update(|registry| registry.register("/about", "about", Vec::new()).map(|_| ()))
///     .unwrap();
/// assert_eq!(*shared.try_match("/about").unwrap().handler(), "about");
/// ```
pub struct SharedRegistry<H> {
    current: ArcSwap<RouteRegistry<H>>,
    writer: Mutex<()>,
}

impl<H> SharedRegistry<H> {
    pub fn new(initial: RouteRegistry<H>) -> Self {
        Self {
            current: ArcSwap::new(Arc::new(initial)),
            writer: Mutex::new(()),
        }
    }

    /// Current table; stays valid even if a newer one is published
    pub fn snapshot(&self) -> Arc<RouteRegistry<H>> {
        self.current.load_full()
    }

    /// Looks `path` up in the current table
    pub fn try_match(&self, path: &str) -> Option<RouteMatch<H>> {
        self.current.load().try_match(path)
    }

    /// Publishes `registry` as the current table
    pub fn replace(&self, registry: RouteRegistry<H>) {
        let _guard = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        self.publish(registry);
    }

    fn publish(&self, registry: RouteRegistry<H>) {
        let routes = registry.len();
        self.current.store(Arc::new(registry));
        tracing::debug!(routes, "route table published");
    }
}

impl<H: PartialEq> SharedRegistry<H> {
    /// Applies `change` to a copy of the current table and publishes it
    ///
    /// Writers are serialized. When `change` fails the current table stays
    /// in place and the error is returned.
    pub fn update<F>(&self, change: F) -> Result<(), RouteError>
    where
        F: FnOnce(&mut RouteRegistry<H>) -> Result<(), RouteError>,
    {
        let _guard = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        let mut next = RouteRegistry::clone(&self.current.load());
        change(&mut next)?;
        self.publish(next);
        Ok(())
    }
}

impl<H> Default for SharedRegistry<H> {
    fn default() -> Self {
        Self::new(RouteRegistry::new())
    }
}

impl<H> From<RouteRegistry<H>> for SharedRegistry<H> {
    fn from(registry: RouteRegistry<H>) -> Self {
        Self::new(registry)
    }
}
