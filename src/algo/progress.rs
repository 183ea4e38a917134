//! Progress reporting for multi-tier runs.
//!
//! A tiered bevel on a dense mesh can take a while; callers that want to
//! show progress pass a [`Progress`] to
//! [`final_bevel_with_progress`](crate::algo::bevel::final_bevel_with_progress).
//!
//! # Example
//!
//! ```
//! use finalbevel::algo::progress::Progress;
//!
//! let progress = Progress::new(|current, total, message| {
//!     println!("[{}/{}] {}", current, total, message);
//! });
//! progress.report(0, 3, "Bevelling tier");
//! ```

/// A progress callback that receives updates during a run.
///
/// The callback receives:
/// - `current`: Tiers completed so far
/// - `total`: Number of tiers
/// - `message`: What is happening now
pub struct Progress {
    callback: Box<dyn Fn(usize, usize, &str) + Send + Sync>,
}

impl Progress {
    /// Create a new progress reporter with the given callback.
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(usize, usize, &str) + Send + Sync + 'static,
    {
        Self {
            callback: Box::new(callback),
        }
    }

    /// Report progress.
    #[inline]
    pub fn report(&self, current: usize, total: usize, message: &str) {
        (self.callback)(current, total, message);
    }

    /// Create a no-op progress reporter that discards all updates.
    pub fn none() -> Self {
        Self::new(|_, _, _| {})
    }
}

impl Default for Progress {
    fn default() -> Self {
        Self::none()
    }
}

impl std::fmt::Debug for Progress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Progress").finish_non_exhaustive()
    }
}
