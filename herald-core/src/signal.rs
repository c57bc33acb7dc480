//! Lifecycle signal port and external listener traits.
//!
//! The dispatcher subscribes to a command instance's lifecycle events by
//! constructing a [`Signals`] port bound to that instance and passing it
//! into `initialize`. The subscription lives exactly as long as that one
//! call, which is the whole of the dispatcher's interest in the instance.

use crate::{command::SharedCommand, handler::SharedHandler, payload::Payload, tag::Tag};

/// The per-instance lifecycle port a command raises its signals through.
///
/// Both signals target the command's *own* tag; a command cannot claim or
/// release routing control over any other identifier.
pub trait Signals<P: Payload, R>: Send + Sync {
    /// Raise a wait signal: claim exclusive routing for the command's tag.
    ///
    /// While the claim is held, every dispatch for that tag is routed to
    /// `handler` and the registry entry is bypassed entirely. Raising a
    /// second wait replaces the claimed handler in place; there is no
    /// intermediate unclaimed state. `raise_wait(None)` is the defined
    /// no-op signal and leaves the override table untouched.
    fn raise_wait(&self, handler: Option<SharedHandler<P, R>>);

    /// Raise a finish signal: release the claim on the command's tag.
    ///
    /// Releasing when no claim is held is a no-op, not a fault. Finish
    /// listeners are notified either way, after the release.
    fn raise_finish(&self, param: P);
}

/// Observer of finish signals, notified with `(command, param)` after the
/// override for the command's tag has been removed.
pub trait FinishListener<K: Tag, P: Payload, R>: Send + Sync + 'static {
    /// Called once per finish signal.
    fn on_finished(&self, command: &SharedCommand<K, P, R>, param: &P);
}

// Blanket impl for closures
impl<K, P, R, F> FinishListener<K, P, R> for F
where
    K: Tag,
    P: Payload,
    R: Send + 'static,
    F: Fn(&SharedCommand<K, P, R>, &P) + Send + Sync + 'static,
{
    fn on_finished(&self, command: &SharedCommand<K, P, R>, param: &P) {
        (self)(command, param);
    }
}

/// Observer of wait signals, notified with `(command, param)` after the
/// override has been installed. The parameter is the one the in-flight
/// `initialize` call was dispatched with.
pub trait WaitListener<K: Tag, P: Payload, R>: Send + Sync + 'static {
    /// Called once per effective (non-no-op) wait signal.
    fn on_waiting(&self, command: &SharedCommand<K, P, R>, param: &P);
}

// Blanket impl for closures
impl<K, P, R, F> WaitListener<K, P, R> for F
where
    K: Tag,
    P: Payload,
    R: Send + 'static,
    F: Fn(&SharedCommand<K, P, R>, &P) + Send + Sync + 'static,
{
    fn on_waiting(&self, command: &SharedCommand<K, P, R>, param: &P) {
        (self)(command, param);
    }
}
