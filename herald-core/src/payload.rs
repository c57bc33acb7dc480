//! Payload trait for command parameter types.

/// A marker trait for the parameter value a command is dispatched with.
///
/// `Clone` is required because a multicast sequence hands the same
/// parameter to every member, and because waiting-state notifications
/// carry the parameter alongside the command instance.
pub trait Payload: Clone + Send + Sync + 'static {}
impl<T: Clone + Send + Sync + 'static> Payload for T {}
