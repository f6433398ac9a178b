//! Progress reporting for dataset loading.
//!
//! Loading a full PRF export means normalizing a few hundred thousand
//! rows. The loader reports that work through [`ProgressCallback`] so the
//! CLI can drive a progress bar while library callers and tests stay
//! silent.

use std::sync::Arc;

/// Receives row-level progress while a dataset is being normalized.
pub trait ProgressCallback: Send + Sync {
    /// Set the total number of rows to normalize.
    fn set_total(&self, total: u64);

    /// Advance progress by `delta` rows.
    fn inc(&self, delta: u64);

    /// Update the message displayed alongside the progress indicator.
    fn set_message(&self, msg: String);

    /// Mark progress as complete with a final message.
    fn finish(&self, msg: String);
}

/// Ignores all progress updates.
pub struct NullProgress;

impl ProgressCallback for NullProgress {
    fn set_total(&self, _total: u64) {}
    fn inc(&self, _delta: u64) {}
    fn set_message(&self, _msg: String) {}
    fn finish(&self, _msg: String) {}
}

/// Returns a shared [`NullProgress`] instance.
#[must_use]
pub fn null_progress() -> Arc<dyn ProgressCallback> {
    Arc::new(NullProgress)
}
