//! # herald - Identifier-Keyed Command Dispatch
//!
//! `herald` routes commands — an opaque identifier plus a parameter — to
//! registered handlers, with three twists over a plain keyed callback
//! map:
//!
//! - **Multicast composition**: registering a second handler for a tag
//!   appends to an ordered sequence instead of replacing; dispatch runs
//!   every member and returns the last result.
//! - **Deferred submission**: commands can be enqueued and flushed as a
//!   batch, dispatched strictly in enqueue order.
//! - **Waiting overrides**: an in-flight command can claim exclusive
//!   routing for its own tag until it signals completion, intercepting
//!   every dispatch to that tag in the meantime.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use herald::prelude::*;
//!
//! let dispatcher: CommandDispatcher<&str, String, String> = CommandDispatcher::new();
//! dispatcher.register("Greet", |name: String| async move {
//!     Ok(format!("Hello, {name}"))
//! });
//!
//! let greeting = dispatcher.dispatch("Greet", "World".into()).await?;
//! assert_eq!(greeting, "Hello, World");
//! ```

#![deny(clippy::pub_use, clippy::wildcard_imports)]
#![warn(missing_docs)]

pub use herald_core::{
    // Error types
    BoxError,
    // Command capability
    Command,
    CommandFactory,
    DispatchError,
    DynCommand,
    // Handler
    DynHandler,
    // Lifecycle listeners
    FinishListener,
    Handler,
    HeraldError,
    // Parameter / identifier markers
    Payload,
    RegistryError,
    SharedCommand,
    SharedFactory,
    SharedHandler,
    // Signal port
    Signals,
    Tag,
    WaitListener,
    share,
};

// Engine
pub use herald_std::{
    dispatcher::CommandDispatcher,
    overrides::OverrideTable,
    queue::SubmissionQueue,
    registrar::Registrar,
    registry::{ComposedHandler, Registry},
};

/// Testing utilities.
pub mod testing {
    #![allow(clippy::wildcard_imports)]
    pub use herald_std::testing::*;
}

/// Prelude module - common imports for Herald.
///
/// # Usage
///
/// ```rust,ignore
/// use herald::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        // Errors
        BoxError,
        // Capabilities
        Command,
        // Engine
        CommandDispatcher,
        CommandFactory,
        DispatchError,
        // Core traits
        Handler,
        HeraldError,
        Payload,
        Registrar,
        SharedCommand,
        SharedHandler,
        Signals,
        Tag,
    };
}
