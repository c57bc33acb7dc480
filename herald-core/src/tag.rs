//! Tag trait for command identifier types.

use std::fmt::Debug;
use std::hash::Hash;

/// A marker trait for the identifiers used to route commands.
///
/// A tag keys three structures at once: the handler registry, the
/// submission queue, and the waiting-override table. It therefore has to
/// be hashable, cloneable, and safe to move across threads.
///
/// # Example
///
/// ```rust,ignore
/// #[derive(Clone, Debug, PartialEq, Eq, Hash)]
/// enum OpCode { Greet, Shutdown }
///
/// impl Tag for OpCode {}
/// ```
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a valid Tag",
    label = "must be `Eq + Hash + Clone + Debug + Send + Sync + 'static`",
    note = "Command identifiers must be hashable and thread-safe."
)]
pub trait Tag: Eq + Hash + Clone + Debug + Send + Sync + 'static {}

// Common Tag implementations
impl Tag for String {}
impl Tag for &'static str {}
impl Tag for std::sync::Arc<str> {}
impl Tag for u16 {}
impl Tag for u32 {}
impl Tag for u64 {}
impl Tag for usize {}
impl Tag for i32 {}
impl Tag for i64 {}
