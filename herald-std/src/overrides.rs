//! Waiting-override table.
//!
//! The one structure in the engine that is mutated concurrently by
//! design: dispatching callers read it while independently running
//! command instances install and remove claims through their lifecycle
//! signals. All operations are safe under arbitrary concurrent
//! invocation without external locking.
//!
//! While a claim is present for a tag it fully supersedes the registry
//! entry for that tag; the registry entry is neither consulted nor
//! mutated.

use dashmap::DashMap;
use herald_core::{Payload, SharedHandler, Tag};
use std::sync::Arc;

/// Concurrency-safe mapping from tag to the single claimed override
/// handler for that tag.
pub struct OverrideTable<K: Tag, P: Payload, R> {
    claims: DashMap<K, SharedHandler<P, R>>,
}

impl<K: Tag, P: Payload, R: Send + 'static> OverrideTable<K, P, R> {
    /// Create an empty table.
    pub fn new() -> Self {
        Self {
            claims: DashMap::new(),
        }
    }

    /// Insert or replace the claim for `tag`.
    ///
    /// Returns `true` when an existing claim was replaced. A replacement
    /// happens in place; the tag never passes through an unclaimed state.
    pub fn install(&self, tag: K, handler: SharedHandler<P, R>) -> bool {
        self.claims.insert(tag, handler).is_some()
    }

    /// Remove the claim for `tag`, returning the handler it held.
    /// Removing an absent tag is a no-op.
    pub fn remove(&self, tag: &K) -> Option<SharedHandler<P, R>> {
        self.claims.remove(tag).map(|(_, handler)| handler)
    }

    /// Non-blocking lookup of the claim for `tag`.
    ///
    /// Lookup and fetch are a single step: the handler is cloned out
    /// while the shard lock is held, so a concurrent removal can never
    /// interleave between a presence check and the fetch.
    pub fn try_get(&self, tag: &K) -> Option<SharedHandler<P, R>> {
        self.claims.get(tag).map(|entry| Arc::clone(entry.value()))
    }

    /// Check whether a claim is present for `tag`.
    pub fn contains(&self, tag: &K) -> bool {
        self.claims.contains_key(tag)
    }

    /// Number of active claims.
    pub fn len(&self) -> usize {
        self.claims.len()
    }

    /// Check if no claims are active.
    pub fn is_empty(&self) -> bool {
        self.claims.is_empty()
    }
}

impl<K: Tag, P: Payload, R: Send + 'static> Default for OverrideTable<K, P, R> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use herald_core::{BoxError, DynHandler};

    fn handler(output: &'static str) -> SharedHandler<String, String> {
        Arc::new(move |_p: String| async move { Ok::<_, BoxError>(output.to_string()) })
    }

    #[tokio::test]
    async fn install_then_try_get_then_remove() {
        let table: OverrideTable<&'static str, String, String> = OverrideTable::new();

        assert!(!table.install("T", handler("first")));
        let claimed = table.try_get(&"T").expect("claim must be present");
        let result = claimed.call_dyn("p".to_string()).await.unwrap();
        assert_eq!(result, "first");

        assert!(table.remove(&"T").is_some());
        assert!(table.try_get(&"T").is_none());
    }

    #[tokio::test]
    async fn second_install_replaces_in_place() {
        let table: OverrideTable<&'static str, String, String> = OverrideTable::new();

        table.install("T", handler("first"));
        assert!(table.install("T", handler("second")), "must report replacement");
        assert_eq!(table.len(), 1);

        let claimed = table.try_get(&"T").unwrap();
        assert_eq!(claimed.call_dyn("p".to_string()).await.unwrap(), "second");
    }

    #[test]
    fn removing_an_absent_tag_is_a_no_op() {
        let table: OverrideTable<&'static str, String, String> = OverrideTable::new();
        assert!(table.remove(&"missing").is_none());
        assert!(table.is_empty());
    }

    #[test]
    fn concurrent_install_and_remove_never_panic() {
        let table = Arc::new(OverrideTable::<usize, String, String>::new());

        let threads: Vec<_> = (0..8)
            .map(|t| {
                let table = Arc::clone(&table);
                std::thread::spawn(move || {
                    for i in 0..500 {
                        let tag = (t + i) % 16;
                        if i % 3 == 0 {
                            table.remove(&tag);
                        } else {
                            table.install(tag, handler("claimed"));
                        }
                        // Fetch must observe either a whole claim or none.
                        if let Some(h) = table.try_get(&tag) {
                            drop(h);
                        }
                    }
                })
            })
            .collect();

        for thread in threads {
            thread.join().unwrap();
        }
    }
}
