//! # herald - Multicast Delegate Dispatcher
//!
//! `herald` maintains a registry of observers, each bound to a FIFO
//! execution context, and fans arbitrary invocations out to every
//! registered observer capable of handling them. Delivery is asynchronous:
//! the forwarding call never blocks, and each observer's callback runs on
//! the context it asked for.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use herald::{MulticastDelegate, Observer, OpId, Invocation, SerialContext};
//! use std::sync::Arc;
//!
//! const DID_CONNECT: OpId = OpId::new("did_connect");
//!
//! struct Logger;
//! impl Observer for Logger {
//!     fn ops(&self) -> &[OpId] { &[DID_CONNECT] }
//!     fn handle(&self, invocation: Invocation) {
//!         if let Some(addr) = invocation.args::<String>() {
//!             println!("connected: {addr}");
//!         }
//!     }
//! }
//!
//! let delegate = MulticastDelegate::new();
//! delegate.add(Arc::new(Logger));                    // default context
//! let q = Arc::new(SerialContext::spawn("net")?);
//! delegate.add_on(Arc::new(Logger), q);              // explicit context
//!
//! // Fire-and-forget: one async call per responding observer.
//! delegate.notify(DID_CONNECT, String::from("10.0.0.7:5222"));
//! ```

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

pub use herald_core::{
    // Error types
    BoxError,
    ContextError,
    // Context abstraction
    ContextRef,
    ExecutionContext,
    HeraldError,
    // Invocation model
    Invocation,
    // Observer capability model
    Observer,
    ObserverRef,
    OpId,
    Task,
};

pub use herald_std::{
    // Registry + forwarder
    Entry,
    MulticastDelegate,
    Registry,
    // Contexts
    SerialContext,
    Snapshot,
    Visit,
    default_context,
};

#[cfg(feature = "tokio")]
pub use herald_std::TokioContext;

/// Testing utilities.
pub mod testing {
    pub use herald_std::testing::{CountingObserver, ManualContext, RecordingObserver};
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
        BoxError, ContextRef, ExecutionContext, Invocation, MulticastDelegate, Observer,
        ObserverRef, OpId, Visit,
    };
}
