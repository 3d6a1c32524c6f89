//! Dual mesh data structures.
//!
//! This module provides the dual-mesh view of a planar triangulation and the
//! index types used to address its elements.
//!
//! # Overview
//!
//! The primary type is [`DualMesh`]. Every point of the triangulation is a
//! *region* (a Voronoi cell), every triangle is a *triangle* (a Voronoi
//! vertex, placed at its circumcenter) and every directed edge is a *side*.
//! Sides are numbered triangle-major: triangle `t` owns sides `3t`, `3t + 1`
//! and `3t + 2` in counterclockwise order, so most side arithmetic needs no
//! stored links at all.
//!
//! # Index Types
//!
//! Mesh elements are identified by type-safe index wrappers:
//! - [`RegionId`] - Identifies a region
//! - [`TriangleId`] - Identifies a triangle
//! - [`SideId`] - Identifies a side
//!
//! Region ids and side/triangle ids are generic over separate integer types
//! ([`MeshIndex`] trait), so `DualMesh<u16, u32>` stores regions in 16 bits
//! and sides in 32 bits.
//!
//! # Construction
//!
//! ```
//! use dualmesh::mesh::{DualMesh, RegionId};
//! use nalgebra::Point2;
//!
//! let points = vec![
//!     Point2::new(0.0, 0.0),
//!     Point2::new(1.0, 0.0),
//!     Point2::new(0.5, 1.0),
//! ];
//! let triangles = vec![[0, 1, 2]];
//!
//! let mesh: DualMesh = DualMesh::from_triangles(&points, &triangles).unwrap();
//! assert_eq!(mesh.num_sides(), 3);
//! assert!(mesh.is_boundary_region(RegionId::new(0)).unwrap());
//! ```

mod builder;
mod dual;
mod index;

pub use dual::{DualMesh, RegionSideIter};
pub use index::{MeshIndex, RegionId, SideId, TriangleId};
