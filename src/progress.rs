//! Observer trait for per-request events.
//!
//! Inject an [`Arc<dyn RequestObserver>`] via
//! [`crate::config::ClientConfigBuilder::observer`] to be told when a request
//! goes out and how it ended. The CLI uses this to drive its spinner while a
//! request is pending; other hosts can forward events to a log, a channel or
//! a status bar without the library knowing about it.
//!
//! # Example
//!
//! ```rust
//! use researchrot::{Action, ClientConfig, RequestObserver};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingObserver {
//!     sent: AtomicUsize,
//! }
//!
//! impl RequestObserver for CountingObserver {
//!     fn on_request_start(&self, action: Action) {
//!         self.sent.fetch_add(1, Ordering::SeqCst);
//!         eprintln!("sending {}", action.label());
//!     }
//! }
//!
//! let observer = Arc::new(CountingObserver { sent: AtomicUsize::new(0) });
//!
//! let config = ClientConfig::builder()
//!     .observer(observer as Arc<dyn RequestObserver>)
//!     .build()
//!     .unwrap();
//! ```

use crate::pipeline::transport::Action;
use std::sync::Arc;
use std::time::Duration;

/// Called by the transport around every backend request.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. Implementations must be `Send + Sync` because the
/// client may be shared across tasks.
pub trait RequestObserver: Send + Sync {
    /// Called just before the request is sent.
    fn on_request_start(&self, action: Action) {
        let _ = action;
    }

    /// Called when a 2xx response has been decoded.
    fn on_request_complete(&self, action: Action, elapsed: Duration) {
        let _ = (action, elapsed);
    }

    /// Called when the request ended in any error.
    ///
    /// `message` is the user-facing text that becomes the error state.
    fn on_request_error(&self, action: Action, message: &str) {
        let _ = (action, message);
    }
}

/// A no-op implementation, used when no observer is configured.
pub struct NoopObserver;

impl RequestObserver for NoopObserver {}

/// Convenience alias matching the type stored in [`crate::config::ClientConfig`].
pub type SharedObserver = Arc<dyn RequestObserver>;
