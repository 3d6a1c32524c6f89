//! # dualmesh
//!
//! Delaunay triangulations of Poisson-disk point sets, viewed as dual meshes.
//!
//! A dual mesh presents a planar triangulation and its Voronoi diagram as one
//! structure: every point is a *region* (a Voronoi cell), every triangle is a
//! Voronoi vertex, and every directed triangle edge is a *side* that also
//! separates two Voronoi cells.
//!
//! ## Features
//!
//! - **Point generation**: boundary ring plus Poisson-disk sampling, seeded
//! - **Delaunay triangulation**: sweep-hull insertion with edge flips
//! - **Flexible indexing**: independent 16-, 32- or 64-bit region and side ids
//! - **Ghost structure**: optional closure of boundary fans
//!
//! ## Quick Start
//!
//! ```
//! use dualmesh::prelude::*;
//!
//! let options = MeshOptions::default()
//!     .with_size(200.0, 200.0)
//!     .with_spacing(10.0);
//! let triangulation = create_mesh(&options).unwrap();
//!
//! let mesh: DualMesh = DualMesh::from_triangulation(&triangulation).unwrap();
//! println!("Regions: {}", mesh.num_regions());
//! println!("Triangles: {}", mesh.num_triangles());
//!
//! for r in mesh.region_ids().take(5) {
//!     let neighbors = mesh.region_neighbors(r).unwrap();
//!     println!("{:?}: {} neighbors, boundary={}", r, neighbors.len(), mesh.is_boundary(r));
//! }
//! ```
//!
//! ## Mixed Index Widths
//!
//! Sides outnumber regions roughly six to one, so a mesh may need 32-bit side
//! ids while its region ids still fit in 16 bits:
//!
//! ```
//! use dualmesh::prelude::*;
//!
//! let options = MeshOptions::default().with_size(100.0, 100.0).with_spacing(4.0);
//! let mesh: DualMesh<u16, u32> = MeshBuilder::new(options).build_dual().unwrap();
//! assert!(mesh.num_regions() < 1 << 16);
//! ```
//!
//! ## Mesh Traversal
//!
//! ```
//! use dualmesh::prelude::*;
//! use nalgebra::Point2;
//!
//! let points = vec![
//!     Point2::new(0.0, 0.0),
//!     Point2::new(1.0, 0.0),
//!     Point2::new(1.0, 1.0),
//!     Point2::new(0.0, 1.0),
//! ];
//! let mesh: DualMesh = DualMesh::from_triangles(&points, &[[0, 1, 2], [0, 2, 3]]).unwrap();
//!
//! // Sides of a triangle and their opposites
//! for s in mesh.triangle_sides(TriangleId::new(0)) {
//!     println!("{:?} -> {:?}: opposite {:?}", mesh.begin(s), mesh.end(s), mesh.opposite(s));
//! }
//!
//! // Voronoi cell of a region
//! let cell = mesh.region_vertices(RegionId::new(0));
//! assert_eq!(cell.len(), 2);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algo;
pub mod error;
pub mod generate;
pub mod geometry;
pub mod mesh;
pub mod triangulate;

/// Prelude module for convenient imports.
///
/// ```
/// use dualmesh::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{ErrorKind, MeshError, Result};
    pub use crate::generate::{create_mesh, MeshBuilder, MeshOptions, Triangulation};
    pub use crate::mesh::{DualMesh, MeshIndex, RegionId, SideId, TriangleId};
}

// Re-export nalgebra types for convenience
pub use nalgebra;

#[cfg(test)]
mod tests {
    use super::prelude::*;
    use nalgebra::Point2;

    #[test]
    fn test_square() {
        let points = vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(0.0, 1.0),
        ];
        let triangles = vec![[0, 1, 2], [0, 2, 3]];

        let mesh: DualMesh = DualMesh::from_triangles(&points, &triangles).unwrap();

        assert_eq!(mesh.num_regions(), 4);
        assert_eq!(mesh.num_triangles(), 2);
        assert_eq!(mesh.num_sides(), 6);
        assert!(mesh.is_valid());

        // Every region of a lone square is on the boundary
        for r in mesh.region_ids() {
            assert!(mesh.is_boundary(r), "region {:?} should be on boundary", r);
        }

        // The diagonal is the only interior edge
        let interior: Vec<_> = mesh.side_ids().filter(|&s| mesh.opposite(s).is_some()).collect();
        assert_eq!(interior.len(), 2);
    }
}
