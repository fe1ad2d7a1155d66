//! # herald-core
//!
//! Core traits for the Herald multicast delegate dispatcher.
//!
//! This crate has minimal dependencies and is designed to be imported by
//! observer implementations and custom execution contexts that don't need
//! the full `herald-std` implementation.
//!
//! # Model
//!
//! Herald fans one invocation out to many observers, each on its own
//! execution context. The pieces defined here:
//!
//! - [`OpId`] - operation identity, the selector a forwarded call carries
//! - [`Invocation`] - an `OpId` plus a type-erased argument tuple
//! - [`Observer`] - a receiver of invocations, with an explicit capability
//!   set ([`Observer::ops`] / [`Observer::responds_to`])
//! - [`ExecutionContext`] - a FIFO task runner observers bind callbacks to
//!
//! The registry and forwarder that tie these together live in
//! `herald-std`, alongside the standard context implementations.
//!
//! # Error Types
//!
//! - [`HeraldError`] - Top-level error type
//! - [`ContextError`] - Execution context errors

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod context;
mod error;
mod invocation;
mod observer;
mod op;

// Re-exports
pub use context::{ContextRef, ExecutionContext, Task};
pub use error::{BoxError, ContextError, HeraldError};
pub use invocation::Invocation;
pub use observer::{Observer, ObserverRef};
pub use op::OpId;
