//! Testing utilities for Herald.
//!
//! This module provides utilities to make testing handlers, commands, and
//! lifecycle listeners easier.
//!
//! # Features
//!
//! - [`RecordingHandler`]: records every parameter it receives and
//!   returns a fixed output
//! - [`OrderRecordingHandler`]: appends its id to a shared log, for
//!   multicast-order assertions
//! - [`CountingListener`]: atomic counters over finish/wait notifications
//! - [`ScriptedCommand`]: a command whose `initialize` raises a
//!   configurable sequence of lifecycle signals
//! - [`StallingHandler`]: a handler that never completes, for exercising
//!   the engine's no-timeout contract
//! - [`NullSignals`]: a signal port that ignores everything, for driving
//!   commands without a dispatcher

use herald_core::{
    BoxError, Command, Payload, SharedCommand, SharedHandler, Signals, Tag,
};
use std::{
    marker::PhantomData,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

// ============================================================================
// Recording Handler
// ============================================================================

/// A handler that records every parameter it receives and returns a
/// fixed output.
///
/// # Example
///
/// ```rust,ignore
/// let recorder = RecordingHandler::new("done".to_string());
/// dispatcher.register("T", recorder.clone());
///
/// dispatcher.dispatch("T", "p".to_string()).await?;
/// assert_eq!(recorder.params(), vec!["p".to_string()]);
/// ```
pub struct RecordingHandler<P, R> {
    params: Arc<Mutex<Vec<P>>>,
    output: R,
}

impl<P, R: Clone> Clone for RecordingHandler<P, R> {
    fn clone(&self) -> Self {
        Self {
            params: Arc::clone(&self.params),
            output: self.output.clone(),
        }
    }
}

impl<P: Payload, R: Clone + Send + Sync + 'static> RecordingHandler<P, R> {
    /// Create a recording handler that returns `output` on every call.
    pub fn new(output: R) -> Self {
        Self {
            params: Arc::new(Mutex::new(Vec::new())),
            output,
        }
    }

    /// Get a clone of the recorded parameters.
    pub fn params(&self) -> Vec<P> {
        self.params.lock().unwrap().clone()
    }

    /// Get the number of recorded calls.
    pub fn count(&self) -> usize {
        self.params.lock().unwrap().len()
    }

    /// Clear all recorded parameters.
    pub fn clear(&self) {
        self.params.lock().unwrap().clear();
    }
}

impl<P: Payload, R: Clone + Send + Sync + 'static> herald_core::Handler<P>
    for RecordingHandler<P, R>
{
    type Output = R;

    async fn call(&self, param: P) -> Result<R, BoxError> {
        self.params.lock().unwrap().push(param);
        Ok(self.output.clone())
    }
}

// ============================================================================
// Order Recording Handler
// ============================================================================

/// A handler that appends its id to a shared log before returning, so
/// tests can assert multicast execution order.
pub struct OrderRecordingHandler<R> {
    id: usize,
    order: Arc<Mutex<Vec<usize>>>,
    output: R,
}

impl<R: Clone + Send + Sync + 'static> OrderRecordingHandler<R> {
    /// Create a handler that logs `id` into `order` on every call.
    pub fn new(id: usize, order: Arc<Mutex<Vec<usize>>>, output: R) -> Self {
        Self { id, order, output }
    }
}

impl<P: Payload, R: Clone + Send + Sync + 'static> herald_core::Handler<P>
    for OrderRecordingHandler<R>
{
    type Output = R;

    async fn call(&self, _param: P) -> Result<R, BoxError> {
        self.order.lock().unwrap().push(self.id);
        Ok(self.output.clone())
    }
}

// ============================================================================
// Counting Listener
// ============================================================================

/// A lifecycle listener that counts finish and wait notifications.
///
/// Clone it before registering; all clones share the same counters.
pub struct CountingListener {
    finished: Arc<AtomicUsize>,
    waiting: Arc<AtomicUsize>,
}

impl Clone for CountingListener {
    fn clone(&self) -> Self {
        Self {
            finished: Arc::clone(&self.finished),
            waiting: Arc::clone(&self.waiting),
        }
    }
}

impl CountingListener {
    /// Create a listener with both counters at zero.
    pub fn new() -> Self {
        Self {
            finished: Arc::new(AtomicUsize::new(0)),
            waiting: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of finish notifications observed.
    pub fn finished(&self) -> usize {
        self.finished.load(Ordering::SeqCst)
    }

    /// Number of wait notifications observed.
    pub fn waiting(&self) -> usize {
        self.waiting.load(Ordering::SeqCst)
    }
}

impl Default for CountingListener {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Tag, P: Payload, R: Send + 'static> herald_core::FinishListener<K, P, R>
    for CountingListener
{
    fn on_finished(&self, _command: &SharedCommand<K, P, R>, _param: &P) {
        self.finished.fetch_add(1, Ordering::SeqCst);
    }
}

impl<K: Tag, P: Payload, R: Send + 'static> herald_core::WaitListener<K, P, R>
    for CountingListener
{
    fn on_waiting(&self, _command: &SharedCommand<K, P, R>, _param: &P) {
        self.waiting.fetch_add(1, Ordering::SeqCst);
    }
}

// ============================================================================
// Scripted Command
// ============================================================================

/// A command whose `initialize` raises a configurable sequence of
/// lifecycle signals before returning a fixed output.
///
/// # Example
///
/// ```rust,ignore
/// // Claims its tag with `busy` and returns "started".
/// let command = ScriptedCommand::new("Sync", "started".to_string())
///     .claims_with(busy);
/// ```
pub struct ScriptedCommand<K, P, R> {
    tag: K,
    wait_with: Option<SharedHandler<P, R>>,
    raise_noop_wait: bool,
    finishes: bool,
    output: R,
}

impl<K: Tag, P: Payload, R: Clone + Send + Sync + 'static> ScriptedCommand<K, P, R> {
    /// Create a command that raises no signals and returns `output`.
    pub fn new(tag: K, output: R) -> Self {
        Self {
            tag,
            wait_with: None,
            raise_noop_wait: false,
            finishes: false,
            output,
        }
    }

    /// Raise a wait signal claiming the command's tag with `handler`
    /// during `initialize`.
    pub fn claims_with(mut self, handler: SharedHandler<P, R>) -> Self {
        self.wait_with = Some(handler);
        self
    }

    /// Raise the defined no-op wait signal (no handler) during
    /// `initialize`.
    pub fn raises_noop_wait(mut self) -> Self {
        self.raise_noop_wait = true;
        self
    }

    /// Raise a finish signal during `initialize`, after any wait signal.
    pub fn releases(mut self) -> Self {
        self.finishes = true;
        self
    }
}

impl<K: Tag, P: Payload, R: Clone + Send + Sync + 'static> Command<K, P>
    for ScriptedCommand<K, P, R>
{
    type Output = R;

    fn tag(&self) -> K {
        self.tag.clone()
    }

    async fn initialize(
        &self,
        param: P,
        signals: Arc<dyn Signals<P, R>>,
    ) -> Result<R, BoxError> {
        if self.raise_noop_wait {
            signals.raise_wait(None);
        }
        if let Some(handler) = &self.wait_with {
            signals.raise_wait(Some(Arc::clone(handler)));
        }
        if self.finishes {
            signals.raise_finish(param);
        }
        Ok(self.output.clone())
    }
}

// ============================================================================
// Stalling Handler
// ============================================================================

/// A handler that never completes.
///
/// The engine offers no cancellation and no timeout anywhere; a hung
/// handler blocks its caller or its spawned task indefinitely. This
/// handler makes that contract testable.
pub struct StallingHandler<R> {
    _result: PhantomData<fn() -> R>,
}

impl<R> StallingHandler<R> {
    /// Create a handler that stalls forever on every call.
    pub fn new() -> Self {
        Self {
            _result: PhantomData,
        }
    }
}

impl<R> Default for StallingHandler<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Payload, R: Send + 'static> herald_core::Handler<P> for StallingHandler<R> {
    type Output = R;

    async fn call(&self, _param: P) -> Result<R, BoxError> {
        futures::future::pending().await
    }
}

// ============================================================================
// Null Signals
// ============================================================================

/// A signal port that ignores every signal, for exercising a command's
/// `initialize` without a dispatcher behind it.
pub struct NullSignals;

impl<P: Payload, R> Signals<P, R> for NullSignals {
    fn raise_wait(&self, _handler: Option<SharedHandler<P, R>>) {}

    fn raise_finish(&self, _param: P) {}
}
