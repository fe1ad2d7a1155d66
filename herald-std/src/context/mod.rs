//! Standard execution context implementations.

mod serial;
#[cfg(feature = "tokio")]
mod tokio;

pub use serial::SerialContext;
#[cfg(feature = "tokio")]
pub use self::tokio::TokioContext;

use herald_core::ContextRef;
use std::sync::{Arc, OnceLock};

static DEFAULT: OnceLock<ContextRef> = OnceLock::new();

/// The process-wide default context.
///
/// Used when an observer is registered without naming a context. Lazily
/// spawns one shared [`SerialContext`] the first time it is needed and
/// returns clones of the same handle from then on, so everything added
/// through the default shares one FIFO queue.
pub fn default_context() -> ContextRef {
    DEFAULT
        .get_or_init(|| {
            let context = SerialContext::spawn("herald-default")
                .expect("failed to spawn the default context worker thread");
            Arc::new(context)
        })
        .clone()
}
