//! Triangle quality analysis.
//!
//! Poisson-disk point sets triangulate into well-shaped triangles away from
//! the boundary ring, where the tightly packed ring points produce slivers.
//! [`skinny_triangles`] measures how many solid triangles fall below an angle
//! limit and how they are distributed.
//!
//! # Example
//!
//! ```
//! use dualmesh::algo::quality::{skinny_triangles, QualityOptions};
//! use dualmesh::generate::{MeshBuilder, MeshOptions};
//! use dualmesh::mesh::DualMesh;
//!
//! let options = MeshOptions::default().with_size(100.0, 100.0).with_spacing(5.0);
//! let mesh: DualMesh = MeshBuilder::new(options).build_dual().unwrap();
//!
//! let report = skinny_triangles(&mesh, &QualityOptions::default());
//! assert_eq!(report.total, mesh.num_solid_triangles());
//! assert!(report.skinny <= report.total);
//! ```

use rayon::prelude::*;

use crate::geometry::min_angle_degrees;
use crate::mesh::{DualMesh, MeshIndex, TriangleId};

/// Options for [`skinny_triangles`].
#[derive(Debug, Clone)]
pub struct QualityOptions {
    /// Triangles whose smallest angle is below this limit (degrees) count as
    /// skinny.
    pub angle_limit: f64,

    /// Whether to use parallel execution (default: true).
    pub parallel: bool,
}

impl Default for QualityOptions {
    fn default() -> Self {
        Self {
            angle_limit: 30.0,
            parallel: true,
        }
    }
}

impl QualityOptions {
    /// Set the angle limit in degrees, clamped to `[0, 60]`.
    pub fn with_angle_limit(mut self, degrees: f64) -> Self {
        self.angle_limit = degrees.clamp(0.0, 60.0);
        self
    }

    /// Set whether to use parallel execution.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Create options for single-threaded execution.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }
}

/// Result of [`skinny_triangles`].
#[derive(Debug, Clone, PartialEq)]
pub struct QualityReport {
    /// `histogram[d]` counts skinny triangles whose smallest angle lies in
    /// `[d, d + 1)` degrees.
    pub histogram: Vec<usize>,
    /// Number of skinny triangles.
    pub skinny: usize,
    /// Number of solid triangles examined.
    pub total: usize,
    /// Smallest angle over all solid triangles, in degrees.
    pub min_angle: f64,
}

impl QualityReport {
    /// Fraction of examined triangles that are skinny.
    pub fn skinny_fraction(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.skinny as f64 / self.total as f64
        }
    }
}

/// Measure the minimum angles of all solid triangles.
///
/// Ghost triangles are ignored. The result is the same with and without
/// parallel execution.
pub fn skinny_triangles<R: MeshIndex, S: MeshIndex>(
    mesh: &DualMesh<R, S>,
    options: &QualityOptions,
) -> QualityReport {
    let total = mesh.num_solid_triangles();
    let angle_of = |t: usize| {
        let [a, b, c] = mesh.triangle_regions(TriangleId::new(t));
        min_angle_degrees(
            mesh.region_position(a),
            mesh.region_position(b),
            mesh.region_position(c),
        )
    };

    let angles: Vec<f64> = if options.parallel {
        (0..total).into_par_iter().map(angle_of).collect()
    } else {
        (0..total).map(angle_of).collect()
    };

    let buckets = options.angle_limit.ceil() as usize;
    let mut histogram = vec![0; buckets];
    let mut skinny = 0;
    let mut min_angle = f64::INFINITY;

    for &angle in &angles {
        min_angle = min_angle.min(angle);
        if angle < options.angle_limit {
            skinny += 1;
            let bucket = (angle.floor() as usize).min(buckets.saturating_sub(1));
            histogram[bucket] += 1;
        }
    }

    if skinny > 0 {
        log::info!(
            "{} of {} triangles have an angle below {} degrees (smallest {:.3})",
            skinny,
            total,
            options.angle_limit,
            min_angle
        );
    } else {
        log::debug!("no triangles below {} degrees", options.angle_limit);
    }

    QualityReport {
        histogram,
        skinny,
        total,
        min_angle,
    }
}
