//! Explicit startup-time registration.
//!
//! Replaces runtime discovery of command types with a host-supplied list
//! of `(tag, registration)` pairs, assembled at build or startup time and
//! applied to a dispatcher in one pass.

use crate::dispatcher::CommandDispatcher;
use herald_core::{CommandFactory, Handler, Payload, SharedFactory, SharedHandler, Tag};
use std::sync::Arc;

enum Registration<K: Tag, P: Payload, R> {
    /// Factory-backed command: lifecycle-wired on every dispatch.
    Factory(SharedFactory<K, P, R>),
    /// Bare function: no instance, no lifecycle wiring.
    Function(SharedHandler<P, R>),
}

/// A builder-style list of registrations.
///
/// # Example
///
/// ```rust,ignore
/// Registrar::new()
///     .command("Sync", SyncCommandFactory)
///     .function("Ping", |p: String| async move { Ok(p) })
///     .apply(&dispatcher);
/// ```
pub struct Registrar<K: Tag, P: Payload, R> {
    entries: Vec<(K, Registration<K, P, R>)>,
}

impl<K: Tag, P: Payload, R: Send + 'static> Registrar<K, P, R> {
    /// Create an empty registrar.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Add a factory-backed command registration.
    pub fn command<F>(mut self, tag: K, factory: F) -> Self
    where
        F: CommandFactory<K, P, Output = R>,
    {
        self.entries
            .push((tag, Registration::Factory(Arc::new(factory))));
        self
    }

    /// Add a bare static-function registration, bypassing instance
    /// construction and lifecycle wiring entirely.
    pub fn function<H>(mut self, tag: K, handler: H) -> Self
    where
        H: Handler<P, Output = R>,
    {
        self.entries
            .push((tag, Registration::Function(Arc::new(handler))));
        self
    }

    /// Perform every registration against `dispatcher`, in listed order.
    pub fn apply(self, dispatcher: &CommandDispatcher<K, P, R>) {
        for (tag, registration) in self.entries {
            match registration {
                Registration::Factory(factory) => {
                    dispatcher.register_factory_arc(tag, factory);
                }
                Registration::Function(handler) => {
                    dispatcher.register_arc(tag, handler);
                }
            }
        }
    }

    /// Number of pending registrations.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the registrar has no registrations.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Tag, P: Payload, R: Send + 'static> Default for Registrar<K, P, R> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use herald_core::BoxError;

    #[tokio::test]
    async fn applies_registrations_in_listed_order() {
        let dispatcher: CommandDispatcher<&'static str, String, String> =
            CommandDispatcher::new();

        let registrar = Registrar::new()
            .function("Ping", |_p: String| async move {
                Ok::<_, BoxError>("pong".to_string())
            })
            .function("Ping", |_p: String| async move {
                Ok::<_, BoxError>("pong2".to_string())
            });
        assert_eq!(registrar.len(), 2);
        registrar.apply(&dispatcher);

        // Both landed on the same tag as one multicast sequence; the
        // later registration supplies the result.
        let result = dispatcher.dispatch("Ping", String::new()).await.unwrap();
        assert_eq!(result, "pong2");
    }
}
