//! # herald-std
//!
//! Standard implementations for the Herald multicast delegate dispatcher.
//!
//! This crate provides:
//! - **Registry**: [`Registry`], the thread-safe set of (observer, context)
//!   pairs with snapshot-based dispatch
//! - **Forwarder**: [`MulticastDelegate`], the management API plus
//!   fire-and-forget invocation fan-out
//! - **Contexts**: [`SerialContext`], the process [`default_context`], and
//!   (behind the `tokio` feature) [`TokioContext`]
//! - **Testing utilities**: [`testing`]

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod context;
mod delegate;
mod registry;
pub mod testing;

pub use context::SerialContext;
#[cfg(feature = "tokio")]
pub use context::TokioContext;
pub use context::default_context;
pub use delegate::MulticastDelegate;
pub use registry::{Entry, Registry, Snapshot, Visit};
