//! # herald-core
//!
//! Core traits for the Herald command dispatch engine.
//!
//! This crate has minimal dependencies and is designed to be imported by
//! hosts and extensions that don't need the full `herald-std` engine.
//!
//! # Engine Model
//!
//! Herald routes commands — an opaque identifier ([`Tag`]) plus a
//! parameter ([`Payload`]) — to registered callables ([`Handler`]). Three
//! cooperating structures back the routing decision:
//!
//! ## Registry
//!
//! The tag → handler mapping. Registering a second handler for the same
//! tag composes a multicast sequence rather than replacing the first:
//! every member runs in registration order against the same parameter and
//! only the last result is kept.
//!
//! ## Submission Queue
//!
//! An ordered buffer of pending commands. Enqueued commands sit until a
//! submit call drains the whole buffer in one indivisible step and
//! dispatches the drained batch strictly in enqueue order.
//!
//! ## Waiting-Override Table
//!
//! A concurrency-safe tag → handler mapping consulted *before* the
//! registry. An in-flight [`Command`] claims its own tag by raising a wait
//! signal through its [`Signals`] port; until it raises finish, every
//! dispatch for that tag goes to the claimed handler and the registry
//! entry is bypassed. This table is the one structure in the system that
//! is mutated concurrently by design.
//!
//! # Error Types
//!
//! - [`HeraldError`] - Top-level error type
//! - [`DispatchError`] - Dispatch-time errors (including the
//!   `NotFound` / `ConsistencyFault` distinction)
//! - [`RegistryError`] - Registry lookup errors

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod command;
mod error;
mod handler;
mod payload;
mod signal;
mod tag;

// Re-exports
pub use command::{Command, CommandFactory, DynCommand, SharedCommand, SharedFactory};
pub use error::{BoxError, DispatchError, HeraldError, RegistryError};
pub use handler::{DynHandler, Handler, SharedHandler, share};
pub use payload::Payload;
pub use signal::{FinishListener, Signals, WaitListener};
pub use tag::Tag;
