//! Error types for Herald.
//!
//! Registry and forwarding operations never fail: duplicate adds, removals
//! of unknown observers, and forwards with zero responders are all silent
//! no-ops. The fallible surface is context construction.

use std::io;
use thiserror::Error;

/// A boxed error type for dynamic error handling.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Top-level error type for all Herald operations.
#[derive(Error, Debug)]
pub enum HeraldError {
    /// An execution context could not be built or driven.
    #[error("context error: {0}")]
    Context(#[from] ContextError),

    /// A custom error occurred.
    #[error(transparent)]
    Custom(BoxError),
}

/// Errors from execution context implementations.
#[derive(Error, Debug)]
pub enum ContextError {
    /// The worker thread backing a context could not be spawned.
    #[error("failed to spawn worker thread for context `{label}`")]
    Spawn {
        /// Label of the context being built.
        label: String,
        /// The underlying OS error.
        #[source]
        source: io::Error,
    },
}

impl From<BoxError> for HeraldError {
    fn from(err: BoxError) -> Self {
        HeraldError::Custom(err)
    }
}
