//! # herald-std
//!
//! Standard engine implementation for the Herald command dispatch
//! framework.
//!
//! This crate provides:
//! - **Registry**: [`Registry`] with multicast composition per tag
//! - **Submission queue**: [`SubmissionQueue`] with an indivisible
//!   drain-and-reset step
//! - **Waiting-override table**: [`OverrideTable`], the concurrency-safe
//!   claim map consulted ahead of the registry
//! - **Orchestration**: [`CommandDispatcher`], wiring dispatch, deferred
//!   submission, and command lifecycle signals together
//! - **Registration**: [`Registrar`], the explicit startup-time
//!   replacement for runtime discovery
//!
//! [`Registry`]: registry::Registry
//! [`SubmissionQueue`]: queue::SubmissionQueue
//! [`OverrideTable`]: overrides::OverrideTable
//! [`CommandDispatcher`]: dispatcher::CommandDispatcher
//! [`Registrar`]: registrar::Registrar

#![deny(clippy::pub_use, clippy::wildcard_imports)]
#![warn(missing_docs)]

// Re-export core traits
pub use herald_core;

// Modules
pub mod dispatcher;
pub mod overrides;
pub mod queue;
pub mod registrar;
pub mod registry;
pub mod testing;
