//! Error types for Herald.
//!
//! This module provides a structured error hierarchy using `thiserror`:
//!
//! - [`HeraldError`] - Top-level error type for all Herald operations
//! - [`DispatchError`] - Errors during command dispatch
//! - [`RegistryError`] - Errors from registry lookups
//!
//! No operation in the engine retries; every failure is surfaced to the
//! immediate caller, synchronously or through the spawned-dispatch handle.

use thiserror::Error;

/// A boxed error type for dynamic error handling.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Top-level error type for all Herald operations.
#[derive(Error, Debug)]
pub enum HeraldError {
    /// An error occurred during command dispatch.
    #[error("dispatch error: {0}")]
    Dispatch(#[from] DispatchError),

    /// An error occurred during a registry operation.
    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),

    /// A custom error occurred.
    #[error(transparent)]
    Custom(BoxError),
}

/// Errors that can occur during command dispatch.
#[derive(Error, Debug)]
pub enum DispatchError {
    /// The tag was never registered and no override is active.
    #[error("no handler registered for tag {0}")]
    NotFound(String),

    /// The override table reported a claim present, but the follow-up
    /// fetch found it gone.
    ///
    /// Distinct from [`NotFound`] so callers can tell "never registered"
    /// apart from "raced with a concurrent finish". The shipped override
    /// table performs lookup-and-fetch as one atomic step, so this variant
    /// is reserved for alternative table backends that split the two.
    ///
    /// [`NotFound`]: DispatchError::NotFound
    #[error("override for tag {0} vanished between lookup and fetch")]
    ConsistencyFault(String),

    /// A handler body failed; the source error is propagated unchanged.
    ///
    /// Command construction failures from a factory-backed registration
    /// also surface here, untranslated.
    #[error("handler failed")]
    Handler(#[source] BoxError),
}

/// Errors that can occur during registry lookups.
#[derive(Error, Debug)]
pub enum RegistryError {
    /// No handler sequence was registered for the tag.
    #[error("no handler registered for tag {0}")]
    NotFound(String),
}

// Convenience conversions
impl From<BoxError> for HeraldError {
    fn from(err: BoxError) -> Self {
        HeraldError::Custom(err)
    }
}

impl From<BoxError> for DispatchError {
    fn from(err: BoxError) -> Self {
        DispatchError::Handler(err)
    }
}

impl From<RegistryError> for DispatchError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::NotFound(tag) => DispatchError::NotFound(tag),
        }
    }
}
