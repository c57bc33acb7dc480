//! Handler traits for dispatchable callables.
//!
//! A [`Handler`] is a callable registered against a tag: it receives the
//! dispatched parameter and produces a result. Handlers registered for the
//! same tag compose into an ordered multicast sequence; the engine invokes
//! every member and keeps only the last result.
//!
//! # Usage Patterns
//!
//! 1. **Direct closure**: `|param| async move { Ok(...) }`
//! 2. **Struct implementation**: `impl Handler<MyParam> for MyHandler`
//!
//! # Static vs Dynamic Dispatch
//!
//! [`Handler`] uses native `async fn` futures for static dispatch. The
//! registry and the waiting-override table store handlers as trait objects,
//! so every `Handler` is also a [`DynHandler`] via a blanket impl.

use crate::{error::BoxError, payload::Payload};
use std::{future::Future, pin::Pin, sync::Arc};

/// A callable taking a parameter and producing a result, registered
/// against a tag.
///
/// Failure is part of the contract: a handler that cannot complete
/// returns its error as a [`BoxError`], which the engine surfaces to the
/// dispatching caller without translation.
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot handle parameters of type `{P}`",
    label = "missing `Handler<{P}>` implementation",
    note = "Handlers must implement the `call` method for the parameter type `{P}`."
)]
pub trait Handler<P: Payload>: Send + Sync + 'static {
    /// The result type produced by this handler.
    type Output: Send + 'static;

    /// Executes the handler against the dispatched parameter.
    fn call(&self, param: P) -> impl Future<Output = Result<Self::Output, BoxError>> + Send;
}

// Blanket impl for closures
impl<F, P, Out, Fut> Handler<P> for F
where
    P: Payload,
    Out: Send + 'static,
    F: Fn(P) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Out, BoxError>> + Send,
{
    type Output = Out;

    fn call(&self, param: P) -> impl Future<Output = Result<Self::Output, BoxError>> + Send {
        (self)(param)
    }
}

/// Object-safe version of [`Handler`] for storage in registries and
/// override tables.
pub trait DynHandler<P: Payload, R>: Send + Sync + 'static {
    /// Executes the handler (dynamic dispatch version).
    fn call_dyn<'a>(
        &'a self,
        param: P,
    ) -> Pin<Box<dyn Future<Output = Result<R, BoxError>> + Send + 'a>>;
}

// Blanket implementation: any Handler is a DynHandler for its own Output.
impl<P: Payload, T: Handler<P>> DynHandler<P, T::Output> for T {
    fn call_dyn<'a>(
        &'a self,
        param: P,
    ) -> Pin<Box<dyn Future<Output = Result<T::Output, BoxError>> + Send + 'a>> {
        Box::pin(self.call(param))
    }
}

/// A reference-counted handler trait object, the storage form used by the
/// registry and the waiting-override table.
pub type SharedHandler<P, R> = Arc<dyn DynHandler<P, R>>;

/// Wrap a [`Handler`] into its shared storage form.
pub fn share<P, H>(handler: H) -> SharedHandler<P, H::Output>
where
    P: Payload,
    H: Handler<P>,
{
    Arc::new(handler)
}
