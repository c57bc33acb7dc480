//! Command dispatcher orchestration.
//!
//! The dispatcher wires the three engine structures together and gives
//! each tag an implicit two-state machine:
//!
//! - **Normal** — no claim in the waiting-override table; dispatches
//!   route to the registry's composed sequence.
//! - **Overridden** — a claim is present; dispatches route to the
//!   claimed handler and the registry entry is bypassed entirely.
//!
//! A wait signal from an in-flight command moves its tag to Overridden
//! (or replaces the claimed handler in place); a finish signal moves it
//! back to Normal. Races between a dispatch and a concurrent transition
//! are resolved by whichever reaches the override table first.
//!
//! Nothing here cancels or times out: a hung handler blocks its caller
//! (or its spawned task) indefinitely. That limitation is part of the
//! contract.

use crate::{
    overrides::OverrideTable,
    queue::SubmissionQueue,
    registry::{ComposedHandler, Registry},
};
use herald_core::{
    BoxError, CommandFactory, DispatchError, DynCommand, DynHandler, FinishListener, Handler,
    Payload, SharedCommand, SharedFactory, SharedHandler, Signals, Tag, WaitListener,
};
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use tracing::{debug, trace};

// ============================================================================
// Listener set - external finish/wait observers
// ============================================================================

struct ListenerSet<K: Tag, P: Payload, R> {
    finished: Mutex<Vec<Arc<dyn FinishListener<K, P, R>>>>,
    waiting: Mutex<Vec<Arc<dyn WaitListener<K, P, R>>>>,
}

impl<K: Tag, P: Payload, R: Send + 'static> ListenerSet<K, P, R> {
    fn new() -> Self {
        Self {
            finished: Mutex::new(Vec::new()),
            waiting: Mutex::new(Vec::new()),
        }
    }

    // The list is cloned out of the lock so listener bodies run unlocked
    // and may themselves register further listeners.
    fn notify_finished(&self, command: &SharedCommand<K, P, R>, param: &P) {
        let listeners = self.finished.lock().clone();
        for listener in listeners {
            listener.on_finished(command, param);
        }
    }

    fn notify_waiting(&self, command: &SharedCommand<K, P, R>, param: &P) {
        let listeners = self.waiting.lock().clone();
        for listener in listeners {
            listener.on_waiting(command, param);
        }
    }
}

// ============================================================================
// Per-instance signal subscription
// ============================================================================

/// The dispatcher's subscription to one command instance's lifecycle,
/// scoped to a single `initialize` call.
struct CommandSignals<K: Tag, P: Payload, R> {
    tag: K,
    command: SharedCommand<K, P, R>,
    /// Parameter the instance was initialized with; forwarded to waiting
    /// listeners, which observe `(command, param)` like finish listeners.
    param: P,
    overrides: Arc<OverrideTable<K, P, R>>,
    listeners: Arc<ListenerSet<K, P, R>>,
}

impl<K: Tag, P: Payload, R: Send + 'static> Signals<P, R> for CommandSignals<K, P, R> {
    fn raise_wait(&self, handler: Option<SharedHandler<P, R>>) {
        let Some(handler) = handler else {
            trace!(tag = ?self.tag, "ignoring wait signal without a handler");
            return;
        };
        let replaced = self.overrides.install(self.tag.clone(), handler);
        debug!(tag = ?self.tag, replaced, "command claimed its tag");
        self.listeners.notify_waiting(&self.command, &self.param);
    }

    fn raise_finish(&self, param: P) {
        let released = self.overrides.remove(&self.tag).is_some();
        debug!(tag = ?self.tag, released, "command released its tag");
        self.listeners.notify_finished(&self.command, &param);
    }
}

async fn run_initialize<K: Tag, P: Payload, R: Send + 'static>(
    command: SharedCommand<K, P, R>,
    param: P,
    overrides: &Arc<OverrideTable<K, P, R>>,
    listeners: &Arc<ListenerSet<K, P, R>>,
) -> Result<R, BoxError> {
    // Subscribe before handing over the parameter, so signals raised from
    // inside initialize already reach the override table.
    let signals: Arc<dyn Signals<P, R>> = Arc::new(CommandSignals {
        tag: command.tag_dyn(),
        command: Arc::clone(&command),
        param: param.clone(),
        overrides: Arc::clone(overrides),
        listeners: Arc::clone(listeners),
    });
    command.initialize_dyn(param, signals).await
}

// ============================================================================
// Factory adapter - the handler form of a command registration
// ============================================================================

/// Adapts a command factory into a registry handler: each call constructs
/// a fresh instance, wires its lifecycle signals, and runs `initialize`.
struct FactoryAdapter<K: Tag, P: Payload, R> {
    factory: SharedFactory<K, P, R>,
    overrides: Arc<OverrideTable<K, P, R>>,
    listeners: Arc<ListenerSet<K, P, R>>,
}

impl<K: Tag, P: Payload, R: Send + 'static> Handler<P> for FactoryAdapter<K, P, R> {
    type Output = R;

    async fn call(&self, param: P) -> Result<R, BoxError> {
        // Construction failures pass through untranslated.
        let command = self.factory.create()?;
        run_initialize(command, param, &self.overrides, &self.listeners).await
    }
}

// ============================================================================
// CommandDispatcher
// ============================================================================

/// The dispatch orchestrator.
///
/// Parameterized over the identifier type `K`, the parameter type `P`,
/// and the result type `R`, fixed per instantiation; there is no untyped
/// escape hatch.
///
/// The dispatcher is a cheap handle over shared state: cloning it yields
/// another handle to the same registry, queue, and override table.
///
/// # Example
///
/// ```rust,ignore
/// let dispatcher: CommandDispatcher<&str, String, String> = CommandDispatcher::new();
/// dispatcher.register("Greet", |name: String| async move {
///     Ok(format!("Hello, {name}"))
/// });
/// let greeting = dispatcher.dispatch("Greet", "World".into()).await?;
/// ```
pub struct CommandDispatcher<K: Tag, P: Payload, R> {
    inner: Arc<DispatcherInner<K, P, R>>,
}

struct DispatcherInner<K: Tag, P: Payload, R> {
    registry: RwLock<Registry<K, P, R>>,
    queue: SubmissionQueue<K, P>,
    overrides: Arc<OverrideTable<K, P, R>>,
    listeners: Arc<ListenerSet<K, P, R>>,
}

impl<K: Tag, P: Payload, R> Clone for CommandDispatcher<K, P, R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K: Tag, P: Payload, R: Send + 'static> CommandDispatcher<K, P, R> {
    /// Create a dispatcher with an empty registry, queue, and override
    /// table.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(DispatcherInner {
                registry: RwLock::new(Registry::new()),
                queue: SubmissionQueue::new(),
                overrides: Arc::new(OverrideTable::new()),
                listeners: Arc::new(ListenerSet::new()),
            }),
        }
    }

    // ------------------------------------------------------------------
    // Registration
    // ------------------------------------------------------------------

    /// Append `handler` to the multicast sequence for `tag`.
    pub fn register<H>(&self, tag: K, handler: H)
    where
        H: Handler<P, Output = R>,
    {
        self.inner.registry.write().register(tag, handler);
    }

    /// Append an already-shared handler to the sequence for `tag`.
    pub fn register_arc(&self, tag: K, handler: SharedHandler<P, R>) {
        self.inner.registry.write().register_arc(tag, handler);
    }

    /// Register a bare function as the handler for `tag`.
    ///
    /// This is the registrar's static-function path: there is no command
    /// instance behind the handler, so no lifecycle wiring takes place
    /// and the handler can never claim its tag.
    pub fn register_fn<H>(&self, tag: K, handler: H)
    where
        H: Handler<P, Output = R>,
    {
        self.register(tag, handler);
    }

    /// Register a factory-backed command for `tag`.
    ///
    /// Each dispatch of `tag` asks the factory for a fresh instance,
    /// subscribes to its finish and wait signals, and runs `initialize`
    /// with the dispatched parameter.
    pub fn register_factory<F>(&self, tag: K, factory: F)
    where
        F: CommandFactory<K, P, Output = R>,
    {
        self.register_factory_arc(tag, Arc::new(factory));
    }

    /// Register an already-shared factory for `tag`.
    pub fn register_factory_arc(&self, tag: K, factory: SharedFactory<K, P, R>) {
        let adapter = FactoryAdapter {
            factory,
            overrides: Arc::clone(&self.inner.overrides),
            listeners: Arc::clone(&self.inner.listeners),
        };
        self.inner.registry.write().register(tag, adapter);
    }

    /// Check whether a dispatch of `tag` would find a target, either a
    /// registry entry or an active override claim.
    pub fn command_exists(&self, tag: &K) -> bool {
        self.inner.overrides.contains(tag) || self.inner.registry.read().contains(tag)
    }

    // ------------------------------------------------------------------
    // Dispatch
    // ------------------------------------------------------------------

    /// Route a command to its handler and return the handler's result.
    ///
    /// The waiting-override table is consulted first; lookup and fetch
    /// are one atomic step, so a claim observed present is the claim that
    /// runs. With no claim present the registry's composed sequence runs
    /// instead. Fails with [`DispatchError::NotFound`] when the tag was
    /// never registered and no claim is active.
    pub async fn dispatch(&self, tag: K, param: P) -> Result<R, DispatchError> {
        if let Some(claimed) = self.inner.overrides.try_get(&tag) {
            trace!(?tag, "dispatch routed to waiting override");
            return claimed.call_dyn(param).await.map_err(DispatchError::Handler);
        }

        // The guard is released before the handlers run; dispatch never
        // holds the registry lock across an await point.
        let composed = {
            let registry = self.inner.registry.read();
            registry.lookup(&tag).map(ComposedHandler::clone)
        };
        match composed {
            Ok(composed) => {
                trace!(?tag, members = composed.len(), "dispatch routed to registry");
                composed.invoke(param).await.map_err(DispatchError::Handler)
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Run the same dispatch algorithm on the runtime's worker pool,
    /// fire-and-forget.
    ///
    /// The caller may await the returned handle for the eventual result
    /// or failure, but the engine offers no cancellation and no timeout.
    pub fn spawn_dispatch(
        &self,
        tag: K,
        param: P,
    ) -> tokio::task::JoinHandle<Result<R, DispatchError>> {
        let dispatcher = self.clone();
        tokio::spawn(async move { dispatcher.dispatch(tag, param).await })
    }

    /// Enqueue a command for the next [`submit`](Self::submit) call.
    pub fn dispatch_on_submit(&self, tag: K, param: P) {
        self.inner.queue.enqueue(tag, param);
    }

    /// Drain the submission queue and dispatch every entry in enqueue
    /// order, one at a time, on the calling task.
    ///
    /// Returns the result of the last dispatch, or `Ok(None)` for an
    /// empty batch. A failing dispatch aborts the batch: the error is
    /// returned and the remaining drained entries are discarded, not
    /// re-queued.
    pub async fn submit(&self) -> Result<Option<R>, DispatchError> {
        let batch = self.inner.queue.drain_and_reset();
        debug!(len = batch.len(), "submitting deferred batch");

        let mut last = None;
        for (tag, param) in batch {
            last = Some(self.dispatch(tag, param).await?);
        }
        Ok(last)
    }

    /// Number of commands currently waiting for a submit.
    pub fn pending_submissions(&self) -> usize {
        self.inner.queue.len()
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// Subscribe to a freshly constructed command instance's lifecycle
    /// signals, then run its `initialize` with `param`.
    ///
    /// This is the wiring every factory-backed registration goes through;
    /// it is public so hosts can drive externally constructed instances
    /// through the same path.
    pub async fn initialize_command(
        &self,
        command: SharedCommand<K, P, R>,
        param: P,
    ) -> Result<R, BoxError> {
        run_initialize(command, param, &self.inner.overrides, &self.inner.listeners).await
    }

    /// Register an observer of finish signals.
    pub fn on_finished<L>(&self, listener: L)
    where
        L: FinishListener<K, P, R>,
    {
        self.inner.listeners.finished.lock().push(Arc::new(listener));
    }

    /// Register an observer of wait signals.
    pub fn on_waiting<L>(&self, listener: L)
    where
        L: WaitListener<K, P, R>,
    {
        self.inner.listeners.waiting.lock().push(Arc::new(listener));
    }

    /// Check whether a tag currently holds an override claim.
    pub fn is_overridden(&self, tag: &K) -> bool {
        self.inner.overrides.contains(tag)
    }
}

impl<K: Tag, P: Payload, R: Send + 'static> Default for CommandDispatcher<K, P, R> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dispatcher() -> CommandDispatcher<&'static str, String, String> {
        CommandDispatcher::new()
    }

    #[tokio::test]
    async fn unregistered_tag_fails_not_found() {
        let d = dispatcher();
        let err = d.dispatch("missing", "p".to_string()).await.unwrap_err();
        assert!(matches!(err, DispatchError::NotFound(_)));
    }

    #[tokio::test]
    async fn submit_of_empty_queue_returns_none() {
        let d = dispatcher();
        assert!(d.submit().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn command_exists_sees_registry_entries() {
        let d = dispatcher();
        assert!(!d.command_exists(&"Greet"));

        d.register("Greet", |name: String| async move {
            Ok::<_, BoxError>(format!("Hello, {name}"))
        });
        assert!(d.command_exists(&"Greet"));
        assert!(!d.is_overridden(&"Greet"));
    }

    #[tokio::test]
    async fn spawn_dispatch_completes_off_the_caller() {
        let d = dispatcher();
        d.register("Echo", |p: String| async move { Ok::<_, BoxError>(p) });

        let handle = d.spawn_dispatch("Echo", "payload".to_string());
        let result = handle.await.unwrap().unwrap();
        assert_eq!(result, "payload");
    }
}
