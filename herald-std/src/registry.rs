//! Tag-keyed handler registry with multicast composition.
//!
//! The registry owns the tag → handler mapping. At most one entry exists
//! per tag, but that entry is an ordered multicast sequence: registering a
//! second handler for a tag appends to the sequence instead of replacing
//! it, and an entry is never implicitly removed.
//!
//! The registry carries no concurrency guard of its own. Writers are
//! expected to be serialized (registration is a setup-phase activity);
//! the dispatcher wraps the registry in a read-write lock for its
//! read-mostly steady state.

use herald_core::{
    BoxError, DynHandler, Handler, HeraldError, Payload, RegistryError, SharedHandler, Tag,
};
use std::{collections::HashMap, sync::Arc};

/// An ordered multicast sequence of handlers registered for one tag.
///
/// Invoking the sequence executes every member in registration order
/// against the same parameter; only the last member's result is returned,
/// so earlier members participate through their side effects alone.
pub struct ComposedHandler<P, R> {
    chain: Vec<SharedHandler<P, R>>,
}

impl<P, R> Clone for ComposedHandler<P, R> {
    fn clone(&self) -> Self {
        Self {
            chain: self.chain.clone(),
        }
    }
}

impl<P: Payload, R: Send + 'static> ComposedHandler<P, R> {
    fn new(first: SharedHandler<P, R>) -> Self {
        Self { chain: vec![first] }
    }

    fn push(&mut self, handler: SharedHandler<P, R>) {
        self.chain.push(handler);
    }

    /// Number of members in the sequence.
    pub fn len(&self) -> usize {
        self.chain.len()
    }

    /// A sequence is created with its first member and only ever grows.
    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }

    /// Execute every member in registration order, returning the last
    /// member's result.
    ///
    /// A failing member aborts the remainder of the sequence and its
    /// error is propagated.
    pub async fn invoke(&self, param: P) -> Result<R, BoxError> {
        match self.chain.split_last() {
            Some((last, rest)) => {
                for handler in rest {
                    // Earlier results are discarded; members before the
                    // last contribute side effects only.
                    handler.call_dyn(param.clone()).await?;
                }
                last.call_dyn(param).await
            }
            None => Err("empty multicast sequence".into()),
        }
    }
}

/// The tag → composed handler mapping.
pub struct Registry<K: Tag, P: Payload, R> {
    routes: HashMap<K, ComposedHandler<P, R>>,
}

impl<K: Tag, P: Payload, R: Send + 'static> Registry<K, P, R> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            routes: HashMap::new(),
        }
    }

    /// Append `handler` to the multicast sequence for `tag`, creating the
    /// sequence if absent. Never fails, never replaces.
    pub fn register<H>(&mut self, tag: K, handler: H)
    where
        H: Handler<P, Output = R>,
    {
        self.register_arc(tag, Arc::new(handler));
    }

    /// Append an already-shared handler to the sequence for `tag`.
    pub fn register_arc(&mut self, tag: K, handler: SharedHandler<P, R>) {
        match self.routes.entry(tag) {
            std::collections::hash_map::Entry::Occupied(mut entry) => {
                entry.get_mut().push(handler);
            }
            std::collections::hash_map::Entry::Vacant(entry) => {
                entry.insert(ComposedHandler::new(handler));
            }
        }
    }

    /// Look up the composed sequence for `tag`.
    pub fn lookup(&self, tag: &K) -> Result<&ComposedHandler<P, R>, RegistryError> {
        self.routes
            .get(tag)
            .ok_or_else(|| RegistryError::NotFound(format!("{tag:?}")))
    }

    /// Execute the composed sequence for `tag` against `param`.
    pub async fn invoke(&self, tag: &K, param: P) -> Result<R, HeraldError> {
        let composed = self.lookup(tag)?;
        composed.invoke(param).await.map_err(HeraldError::Custom)
    }

    /// Check whether a sequence exists for `tag`.
    pub fn contains(&self, tag: &K) -> bool {
        self.routes.contains_key(tag)
    }

    /// Number of registered tags.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Check if the registry has no entries.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl<K: Tag, P: Payload, R: Send + 'static> Default for Registry<K, P, R> {
    fn default() -> Self {
        Self::new()
    }
}
