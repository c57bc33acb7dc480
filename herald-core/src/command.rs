//! The command capability and its construction factory.
//!
//! A command is an external, stateful object identified by its own tag.
//! The dispatcher's involvement with an instance is a single
//! [`initialize`] call; any longer-lived state is the command's own
//! responsibility. During that call the instance may raise lifecycle
//! signals through the [`Signals`] port the dispatcher hands it:
//!
//! - **Wait** claims exclusive routing for the command's own tag until a
//!   matching finish.
//! - **Finish** releases the claim and notifies finish listeners.
//!
//! [`initialize`]: Command::initialize
//! [`Signals`]: crate::signal::Signals

use crate::{error::BoxError, payload::Payload, signal::Signals, tag::Tag};
use std::{future::Future, pin::Pin, sync::Arc};

/// The capability every dispatchable command instance implements.
///
/// # Static vs Dynamic Dispatch
///
/// This trait uses native `async fn` futures. The dispatcher stores
/// instances as trait objects, so every `Command` is also a
/// [`DynCommand`] via a blanket impl.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a dispatchable command over `{P}`",
    label = "missing `Command<{K}, {P}>` implementation",
    note = "Commands expose their own tag and an `initialize` method."
)]
pub trait Command<K: Tag, P: Payload>: Send + Sync + 'static {
    /// The result type produced by initialization.
    type Output: Send + 'static;

    /// The command's own routing identifier.
    fn tag(&self) -> K;

    /// Run the command once against the dispatched parameter.
    ///
    /// The `signals` port is the dispatcher's subscription to this
    /// instance's lifecycle events; it is scoped to this single call.
    fn initialize(
        &self,
        param: P,
        signals: Arc<dyn Signals<P, Self::Output>>,
    ) -> impl Future<Output = Result<Self::Output, BoxError>> + Send;
}

/// Object-safe version of [`Command`] for storage behind the dispatcher.
pub trait DynCommand<K: Tag, P: Payload, R>: Send + Sync + 'static {
    /// The command's own routing identifier (dynamic dispatch version).
    fn tag_dyn(&self) -> K;

    /// Run the command once (dynamic dispatch version).
    fn initialize_dyn<'a>(
        &'a self,
        param: P,
        signals: Arc<dyn Signals<P, R>>,
    ) -> Pin<Box<dyn Future<Output = Result<R, BoxError>> + Send + 'a>>;
}

// Blanket implementation: any Command is a DynCommand for its own Output.
impl<K: Tag, P: Payload, T: Command<K, P>> DynCommand<K, P, T::Output> for T {
    fn tag_dyn(&self) -> K {
        self.tag()
    }

    fn initialize_dyn<'a>(
        &'a self,
        param: P,
        signals: Arc<dyn Signals<P, T::Output>>,
    ) -> Pin<Box<dyn Future<Output = Result<T::Output, BoxError>> + Send + 'a>> {
        Box::pin(self.initialize(param, signals))
    }
}

/// A reference-counted command trait object.
pub type SharedCommand<K, P, R> = Arc<dyn DynCommand<K, P, R>>;

/// The external construction capability for command instances.
///
/// The engine never builds instances itself; a factory supplies a fresh
/// one per dispatch of a factory-backed registration. Construction
/// failures are propagated to the dispatching caller unchanged.
pub trait CommandFactory<K: Tag, P: Payload>: Send + Sync + 'static {
    /// The result type of the commands this factory produces.
    type Output: Send + 'static;

    /// Construct a fresh command instance.
    fn create(&self) -> Result<SharedCommand<K, P, Self::Output>, BoxError>;
}

// Blanket impl for closures
impl<K, P, R, F> CommandFactory<K, P> for F
where
    K: Tag,
    P: Payload,
    R: Send + 'static,
    F: Fn() -> Result<SharedCommand<K, P, R>, BoxError> + Send + Sync + 'static,
{
    type Output = R;

    fn create(&self) -> Result<SharedCommand<K, P, R>, BoxError> {
        (self)()
    }
}

/// A reference-counted factory trait object.
pub type SharedFactory<K, P, R> = Arc<dyn CommandFactory<K, P, Output = R>>;
