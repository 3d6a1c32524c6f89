//! Progress reporting for mesh generation.
//!
//! # Example
//!
//! ```
//! use dualmesh::algo::Progress;
//! use dualmesh::generate::{MeshBuilder, MeshOptions};
//!
//! let progress = Progress::new(|current, total, stage| {
//!     println!("[{}/{}] {}", current + 1, total, stage);
//! });
//!
//! let options = MeshOptions::default().with_size(50.0, 50.0).with_spacing(5.0);
//! let triangulation = MeshBuilder::new(options)
//!     .with_progress(progress)
//!     .build()
//!     .unwrap();
//! assert!(triangulation.num_triangles() > 0);
//! ```

/// A progress callback that receives updates during long-running operations.
///
/// The callback receives:
/// - `current`: Current step (0-based)
/// - `total`: Total number of steps
/// - `message`: Name of the stage being entered
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
