//! Point set generation and triangulation.
//!
//! [`MeshBuilder`] produces a [`Triangulation`] in three stages:
//!
//! 1. a ring of points just inside the domain rectangle ([`boundary_points`]),
//! 2. Poisson-disk sampling of the interior, seeded with that ring
//!    ([`poisson_disk`]),
//! 3. Delaunay triangulation of the combined set.
//!
//! The ring keeps the convex hull close to the domain rectangle, so Voronoi
//! cells of interior regions are bounded by the domain.
//!
//! # Example
//!
//! ```
//! use dualmesh::generate::{MeshBuilder, MeshOptions};
//! use dualmesh::mesh::DualMesh;
//!
//! let options = MeshOptions::default()
//!     .with_size(100.0, 100.0)
//!     .with_spacing(10.0);
//!
//! let triangulation = MeshBuilder::new(options).build().unwrap();
//! let mesh: DualMesh = DualMesh::from_triangulation(&triangulation).unwrap();
//! assert_eq!(mesh.num_sides(), 3 * mesh.num_triangles());
//! ```

mod boundary;
mod poisson;

use nalgebra::Point2;

pub use boundary::boundary_points;
pub use poisson::poisson_disk;

use crate::algo::Progress;
use crate::error::{MeshError, Result};
use crate::mesh::{DualMesh, MeshIndex};
use crate::triangulate::{triangulate, EMPTY};

/// Options for mesh generation.
#[derive(Debug, Clone)]
pub struct MeshOptions {
    /// Minimum distance between generated points.
    pub spacing: f64,

    /// Domain width; points lie in `[0, width)`.
    pub width: f64,

    /// Domain height; points lie in `[0, height)`.
    pub height: f64,

    /// Seed for the sampler's random number generator.
    pub seed: u64,

    /// Rejected candidates before an active sample is retired.
    pub max_sample_attempts: usize,

    /// Close the dual mesh with ghost elements in [`MeshBuilder::build_dual`].
    pub ghost: bool,
}

impl Default for MeshOptions {
    fn default() -> Self {
        Self {
            spacing: 2.0,
            width: 1000.0,
            height: 1000.0,
            seed: 1981,
            max_sample_attempts: 30,
            ghost: false,
        }
    }
}

impl MeshOptions {
    /// Upper bound on the estimated number of generated points.
    ///
    /// The sampler's grid and the boundary ring are sized from
    /// `extent / spacing`, so a vanishing spacing is rejected up front.
    pub const MAX_POINTS: usize = 1 << 28;

    /// Rough upper estimate of the number of points these options generate.
    pub fn estimated_points(&self) -> f64 {
        (self.width / self.spacing + 1.0) * (self.height / self.spacing + 1.0)
    }

    /// Set the point spacing.
    pub fn with_spacing(mut self, spacing: f64) -> Self {
        self.spacing = spacing;
        self
    }

    /// Set the domain extents.
    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Set the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the number of sampling attempts per active point.
    pub fn with_max_sample_attempts(mut self, attempts: usize) -> Self {
        self.max_sample_attempts = attempts;
        self
    }

    /// Enable or disable ghost structure.
    pub fn with_ghost(mut self, ghost: bool) -> Self {
        self.ghost = ghost;
        self
    }

    /// Check that the options describe a non-empty domain and a usable spacing.
    pub fn validate(&self) -> Result<()> {
        if !self.spacing.is_finite() || self.spacing <= 0.0 {
            return Err(MeshError::invalid_param(
                "spacing",
                self.spacing,
                "must be finite and positive",
            ));
        }
        if !self.width.is_finite() || self.width <= 0.0 {
            return Err(MeshError::invalid_param(
                "width",
                self.width,
                "must be finite and positive",
            ));
        }
        if !self.height.is_finite() || self.height <= 0.0 {
            return Err(MeshError::invalid_param(
                "height",
                self.height,
                "must be finite and positive",
            ));
        }
        if self.max_sample_attempts == 0 {
            return Err(MeshError::invalid_param(
                "max_sample_attempts",
                self.max_sample_attempts,
                "must be at least 1",
            ));
        }
        let estimate = self.estimated_points();
        if estimate > Self::MAX_POINTS as f64 {
            return Err(MeshError::IndexOverflow {
                element: "point",
                count: estimate as usize,
                max: Self::MAX_POINTS,
            });
        }
        Ok(())
    }
}

/// A triangulated point set.
///
/// Triangles are counterclockwise. Side `3t + i` runs from `triangles[t][i]`
/// to `triangles[t][(i + 1) % 3]`, and `halfedges[s]` is the side running the
/// other way along the same edge.
#[derive(Debug, Clone, Default)]
pub struct Triangulation {
    /// Point positions.
    pub points: Vec<Point2<f64>>,
    /// Triangle incidence list.
    pub triangles: Vec<[usize; 3]>,
    /// Opposite of every side, `None` on the convex hull.
    pub halfedges: Vec<Option<usize>>,
    /// Convex hull, counterclockwise.
    pub hull: Vec<usize>,
    /// The first `num_boundary_points` points form the boundary ring.
    pub num_boundary_points: usize,
}

impl Triangulation {
    /// Delaunay-triangulate an arbitrary point set.
    pub fn from_points(points: Vec<Point2<f64>>) -> Self {
        Self::from_points_with_boundary(points, 0)
    }

    fn from_points_with_boundary(points: Vec<Point2<f64>>, num_boundary_points: usize) -> Self {
        let delaunay = triangulate(&points);
        if !delaunay.skipped.is_empty() {
            log::warn!(
                "skipped {} near-duplicate points during triangulation",
                delaunay.skipped.len()
            );
        }

        let triangles = delaunay
            .triangles
            .chunks_exact(3)
            .map(|t| [t[0], t[1], t[2]])
            .collect();
        let halfedges = delaunay
            .halfedges
            .iter()
            .map(|&o| if o == EMPTY { None } else { Some(o) })
            .collect();

        Self {
            points,
            triangles,
            halfedges,
            hull: delaunay.hull,
            num_boundary_points,
        }
    }

    /// Number of points.
    pub fn num_points(&self) -> usize {
        self.points.len()
    }

    /// Number of triangles.
    pub fn num_triangles(&self) -> usize {
        self.triangles.len()
    }

    /// Number of sides (`3 * num_triangles`).
    pub fn num_sides(&self) -> usize {
        self.halfedges.len()
    }
}

/// Generates triangulated Poisson-disk point sets.
#[derive(Debug, Default)]
pub struct MeshBuilder {
    options: MeshOptions,
    progress: Progress,
}

impl MeshBuilder {
    /// Number of stages reported to the progress callback.
    pub const STAGES: usize = 3;

    /// Create a builder with the given options.
    pub fn new(options: MeshOptions) -> Self {
        Self {
            options,
            progress: Progress::none(),
        }
    }

    /// Report stages (`boundary`, `sampling`, `triangulating`) to `progress`.
    pub fn with_progress(mut self, progress: Progress) -> Self {
        self.progress = progress;
        self
    }

    /// The builder's options.
    pub fn options(&self) -> &MeshOptions {
        &self.options
    }

    /// Generate and triangulate the point set.
    ///
    /// # Errors
    /// [`MeshError::InvalidParameter`] if the options are invalid. Options are
    /// checked before any point is generated.
    pub fn build(&self) -> Result<Triangulation> {
        let opts = &self.options;
        opts.validate()?;

        self.progress.report(0, Self::STAGES, "boundary");
        let ring = boundary_points(opts.width, opts.height, opts.spacing);
        let num_boundary_points = ring.len();

        self.progress.report(1, Self::STAGES, "sampling");
        let points = poisson_disk(
            ring,
            opts.width,
            opts.height,
            opts.spacing,
            opts.max_sample_attempts,
            opts.seed,
        );
        log::debug!(
            "sampled {} points ({} on the boundary ring)",
            points.len(),
            num_boundary_points
        );

        self.progress.report(2, Self::STAGES, "triangulating");
        let triangulation = Triangulation::from_points_with_boundary(points, num_boundary_points);

        log::info!(
            "built {}x{} mesh at spacing {}: {} points, {} triangles, hull of {}",
            opts.width,
            opts.height,
            opts.spacing,
            triangulation.num_points(),
            triangulation.num_triangles(),
            triangulation.hull.len()
        );

        Ok(triangulation)
    }

    /// Generate the point set and build its dual mesh.
    ///
    /// Adds ghost structure if [`MeshOptions::ghost`] is set.
    ///
    /// # Errors
    /// Everything [`build`](Self::build) reports, plus
    /// [`MeshError::IndexOverflow`] if the mesh does not fit `R` or `S`.
    pub fn build_dual<R: MeshIndex, S: MeshIndex>(&self) -> Result<DualMesh<R, S>> {
        let triangulation = self.build()?;
        if self.options.ghost {
            DualMesh::from_triangulation_with_ghost(&triangulation)
        } else {
            DualMesh::from_triangulation(&triangulation)
        }
    }
}

/// Generate a triangulated point set with the given options.
pub fn create_mesh(options: &MeshOptions) -> Result<Triangulation> {
    MeshBuilder::new(options.clone()).build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_default_options() {
        let opts = MeshOptions::default();
        assert_eq!(opts.spacing, 2.0);
        assert_eq!(opts.seed, 1981);
        assert_eq!(opts.max_sample_attempts, 30);
        assert!(opts.validate().is_ok());
    }

    #[test]
    fn test_invalid_options() {
        let bad = [
            MeshOptions::default().with_spacing(0.0),
            MeshOptions::default().with_spacing(-1.0),
            MeshOptions::default().with_spacing(f64::NAN),
            MeshOptions::default().with_size(0.0, 10.0),
            MeshOptions::default().with_size(10.0, f64::INFINITY),
            MeshOptions::default().with_max_sample_attempts(0),
        ];
        for opts in bad {
            let err = create_mesh(&opts).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Config, "{:?}", opts);
        }
    }

    #[test]
    fn test_vanishing_spacing() {
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = calls.clone();
        let progress = Progress::new(move |_, _, _| {
            seen.fetch_add(1, Ordering::SeqCst);
        });

        for opts in [
            MeshOptions::default().with_spacing(1e-300),
            MeshOptions::default().with_spacing(1e-3),
            MeshOptions::default().with_size(1e12, 1.0).with_spacing(1.0),
        ] {
            let err = opts.validate().unwrap_err();
            assert!(err.is_config());
            match err {
                MeshError::IndexOverflow { element, count, max } => {
                    assert_eq!(element, "point");
                    assert_eq!(max, MeshOptions::MAX_POINTS);
                    assert!(count > max);
                }
                other => panic!("expected point overflow, got {:?}", other),
            }
        }

        let err = MeshBuilder::new(MeshOptions::default().with_spacing(1e-300))
            .with_progress(progress)
            .build()
            .unwrap_err();
        assert!(matches!(err, MeshError::IndexOverflow { .. }));
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        // Defaults and the large scenario stay well inside the bound.
        assert!(MeshOptions::default().validate().is_ok());
        assert!(MeshOptions::default()
            .with_size(10_000.0, 10_000.0)
            .with_spacing(50.0)
            .validate()
            .is_ok());
    }

    #[test]
    fn test_progress_stages() {
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = calls.clone();
        let progress = Progress::new(move |current, total, _| {
            assert_eq!(current, seen.fetch_add(1, Ordering::SeqCst));
            assert_eq!(total, MeshBuilder::STAGES);
        });

        let opts = MeshOptions::default().with_size(50.0, 50.0).with_spacing(5.0);
        MeshBuilder::new(opts).with_progress(progress).build().unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_triangulation_layout() {
        let opts = MeshOptions::default().with_size(80.0, 60.0).with_spacing(6.0);
        let tri = create_mesh(&opts).unwrap();

        assert_eq!(tri.num_boundary_points, 2 * 15 + 2 * 11);
        assert_eq!(tri.num_sides(), 3 * tri.num_triangles());

        for (s, o) in tri.halfedges.iter().enumerate() {
            if let Some(o) = *o {
                assert_eq!(tri.halfedges[o], Some(s));
            }
        }

        // The boundary ring spans the domain, so the hull is made of ring points.
        assert!(tri.hull.iter().all(|&i| i < tri.num_boundary_points));
    }

    #[test]
    fn test_from_points() {
        let points = vec![
            Point2::new(0.0, 0.0),
            Point2::new(2.0, 0.0),
            Point2::new(2.0, 2.0),
            Point2::new(0.0, 2.0),
            Point2::new(1.0, 1.2),
        ];
        let tri = Triangulation::from_points(points);
        assert_eq!(tri.num_triangles(), 4);
        assert_eq!(tri.hull.len(), 4);
        assert_eq!(tri.num_boundary_points, 0);
        assert_eq!(tri.halfedges.iter().filter(|o| o.is_none()).count(), 4);
    }

    #[test]
    fn test_deterministic() {
        let opts = MeshOptions::default().with_size(40.0, 40.0).with_spacing(3.0);
        let a = create_mesh(&opts).unwrap();
        let b = create_mesh(&opts).unwrap();
        assert_eq!(a.points, b.points);
        assert_eq!(a.triangles, b.triangles);
    }

    #[test]
    fn test_build_dual_with_ghost() {
        let opts = MeshOptions::default()
            .with_size(30.0, 30.0)
            .with_spacing(3.0)
            .with_ghost(true);
        let mesh: DualMesh = MeshBuilder::new(opts).build_dual().unwrap();
        assert!(mesh.has_ghost());
        assert!(mesh.side_ids().all(|s| mesh.opposite(s).is_some()));
    }
}
