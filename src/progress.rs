//! Progress-callback trait for batch file operations.
//!
//! Pass an [`Arc<dyn BatchProgressCallback>`] to the functions in
//! [`crate::batch`] to receive an event per item as a folder or file list is
//! processed. Failures of single items are reported through
//! [`BatchProgressCallback::on_item_error`] and never abort the batch.
//!
//! # Example
//!
//! ```rust
//! use media_files_manager::BatchProgressCallback;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//!
//! struct Counter(AtomicUsize);
//!
//! impl BatchProgressCallback for Counter {
//!     fn on_item_complete(&self, _index: usize, total: usize, subject: &str) {
//!         let done = self.0.fetch_add(1, Ordering::SeqCst) + 1;
//!         eprintln!("{done}/{total} {subject}");
//!     }
//! }
//! ```

use std::sync::Arc;

/// Called by batch operations as they process each item.
///
/// Implementations must be `Send + Sync`: the async wrappers run the batch
/// on a blocking worker thread. All methods default to no-ops.
pub trait BatchProgressCallback: Send + Sync {
    /// Called once before the first item.
    fn on_batch_start(&self, total: usize) {
        let _ = total;
    }

    /// Called before an item is processed. `index` is 1-based.
    fn on_item_start(&self, index: usize, total: usize, subject: &str) {
        let _ = (index, total, subject);
    }

    /// Called when an item succeeded.
    fn on_item_complete(&self, index: usize, total: usize, subject: &str) {
        let _ = (index, total, subject);
    }

    /// Called when an item failed; the batch continues.
    fn on_item_error(&self, index: usize, total: usize, subject: &str, error: &str) {
        let _ = (index, total, subject, error);
    }

    /// Called once after every item was attempted.
    fn on_batch_complete(&self, total: usize, success_count: usize) {
        let _ = (total, success_count);
    }
}

/// A no-op implementation, used when no callback is supplied.
pub struct NoopProgressCallback;

impl BatchProgressCallback for NoopProgressCallback {}

/// Shared callback handle accepted by [`crate::batch`].
pub type ProgressCallback = Arc<dyn BatchProgressCallback>;
