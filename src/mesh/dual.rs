//! Dual mesh data structure.
//!
//! A [`DualMesh`] views a planar triangulation through its dual graph:
//!
//! - a **region** is the dual of a point (its Voronoi cell)
//! - a **triangle** is a Delaunay face; its circumcenter is a Voronoi vertex
//! - a **side** is a directed half-edge between two regions
//!
//! Sides are numbered triangle-major: triangle `t` owns sides `3t`, `3t + 1`
//! and `3t + 2`, counterclockwise. Each side knows the region it starts from
//! and its opposite side in the neighbouring triangle, if there is one. All
//! other relations (next/prev, end region, inner/outer triangle, region fans)
//! are derived from those two arrays.
//!
//! # Boundary Handling
//!
//! Sides on the outer boundary of the triangulation have no opposite, and the
//! regions they touch are flagged as boundary regions: their triangle fans are
//! open. An optional ghost structure (see
//! [`DualMesh::from_triangles_with_ghost`]) closes every fan by adding one
//! ghost region and a ring of ghost triangles around the hull. Ghost elements
//! are numbered after all solid elements.

use nalgebra::Point2;

use super::index::{MeshIndex, RegionId, SideId, TriangleId};
use crate::error::{MeshError, Result};
use crate::geometry::centroid;

/// Immutable dual mesh over a triangulation.
///
/// Region ids are stored as `R` and side/triangle ids as `S`, so the two
/// widths can be chosen independently. Sharing a `DualMesh` between threads
/// needs no locking: it has no mutation API.
#[derive(Debug, Clone)]
pub struct DualMesh<R: MeshIndex = u32, S: MeshIndex = u32> {
    /// Position of every region (the ghost region sits at the center of the
    /// solid bounding box).
    pub(crate) points: Vec<Point2<f64>>,

    /// Start region of every side.
    pub(crate) triangles: Vec<RegionId<R>>,

    /// Opposite side of every side, invalid on the boundary.
    pub(crate) halfedges: Vec<SideId<S>>,

    /// First outgoing side of every region's counterclockwise fan.
    /// For open fans this is the side with no opposite.
    pub(crate) region_out: Vec<SideId<S>>,

    /// Dual vertex of every triangle.
    pub(crate) centers: Vec<Point2<f64>>,

    /// Regions whose triangle fan is open in the solid triangulation.
    pub(crate) boundary: Vec<bool>,

    pub(crate) num_solid_regions: usize,
    pub(crate) num_solid_sides: usize,
}

impl<R: MeshIndex, S: MeshIndex> DualMesh<R, S> {
    // ==================== Counts ====================

    /// Number of regions, including the ghost region if present.
    #[inline]
    pub fn num_regions(&self) -> usize {
        self.points.len()
    }

    /// Number of triangles, including ghost triangles.
    #[inline]
    pub fn num_triangles(&self) -> usize {
        self.triangles.len() / 3
    }

    /// Number of sides. Always `3 * num_triangles()`.
    #[inline]
    pub fn num_sides(&self) -> usize {
        self.triangles.len()
    }

    /// Number of regions that correspond to input points.
    #[inline]
    pub fn num_solid_regions(&self) -> usize {
        self.num_solid_regions
    }

    /// Number of triangles from the input triangulation.
    #[inline]
    pub fn num_solid_triangles(&self) -> usize {
        self.num_solid_sides / 3
    }

    /// Number of sides belonging to input triangles.
    #[inline]
    pub fn num_solid_sides(&self) -> usize {
        self.num_solid_sides
    }

    /// Whether the ghost structure was added.
    #[inline]
    pub fn has_ghost(&self) -> bool {
        self.num_solid_sides < self.triangles.len()
    }

    // ==================== Checked Queries ====================

    /// Neighbouring regions of `r` in counterclockwise order.
    ///
    /// Interior regions yield a closed cycle with one neighbour per incident
    /// triangle. Boundary regions yield an open chain with one more neighbour
    /// than triangles, starting and ending on the boundary.
    ///
    /// # Errors
    /// [`MeshError::IndexOutOfRange`] if `r` is not a region of this mesh.
    pub fn region_neighbors(&self, r: RegionId<R>) -> Result<Vec<RegionId<R>>> {
        self.check_region(r)?;
        Ok(self.neighbors(r))
    }

    /// The three regions of a triangle, counterclockwise.
    ///
    /// # Errors
    /// [`MeshError::IndexOutOfRange`] if `t` is not a triangle of this mesh.
    pub fn triangle_vertices(&self, t: TriangleId<S>) -> Result<[RegionId<R>; 3]> {
        self.check_triangle(t)?;
        Ok(self.triangle_regions(t))
    }

    /// The opposite side of `s`, or `None` if `s` lies on the boundary.
    ///
    /// # Errors
    /// [`MeshError::IndexOutOfRange`] if `s` is not a side of this mesh.
    pub fn side_opposite(&self, s: SideId<S>) -> Result<Option<SideId<S>>> {
        self.check_side(s)?;
        Ok(self.opposite(s))
    }

    /// Whether `r` touches the outer boundary of the triangulation.
    ///
    /// # Errors
    /// [`MeshError::IndexOutOfRange`] if `r` is not a region of this mesh.
    pub fn is_boundary_region(&self, r: RegionId<R>) -> Result<bool> {
        self.check_region(r)?;
        Ok(self.is_boundary(r))
    }

    fn check_region(&self, r: RegionId<R>) -> Result<()> {
        check_range("region", r.is_valid(), r.index(), self.num_regions())
    }

    fn check_triangle(&self, t: TriangleId<S>) -> Result<()> {
        check_range("triangle", t.is_valid(), t.index(), self.num_triangles())
    }

    fn check_side(&self, s: SideId<S>) -> Result<()> {
        check_range("side", s.is_valid(), s.index(), self.num_sides())
    }

    // ==================== Side Topology ====================
    //
    // These take ids produced by this mesh and panic on anything else, like
    // slice indexing.

    /// The region a side starts from.
    #[inline]
    pub fn begin(&self, s: SideId<S>) -> RegionId<R> {
        self.triangles[s.index()]
    }

    /// The region a side ends at.
    #[inline]
    pub fn end(&self, s: SideId<S>) -> RegionId<R> {
        self.triangles[s.next().index()]
    }

    /// The next side counterclockwise around the same triangle.
    #[inline]
    pub fn next(&self, s: SideId<S>) -> SideId<S> {
        s.next()
    }

    /// The previous side around the same triangle.
    #[inline]
    pub fn prev(&self, s: SideId<S>) -> SideId<S> {
        s.prev()
    }

    /// The opposite side, `None` on the boundary.
    #[inline]
    pub fn opposite(&self, s: SideId<S>) -> Option<SideId<S>> {
        self.halfedges[s.index()].valid()
    }

    /// The triangle that owns a side.
    #[inline]
    pub fn inner_triangle(&self, s: SideId<S>) -> TriangleId<S> {
        s.triangle()
    }

    /// The triangle on the other side of a side, `None` on the boundary.
    #[inline]
    pub fn outer_triangle(&self, s: SideId<S>) -> Option<TriangleId<S>> {
        self.opposite(s).map(SideId::triangle)
    }

    /// Check if a side lies on the boundary (has no opposite).
    #[inline]
    pub fn is_boundary_side(&self, s: SideId<S>) -> bool {
        !self.halfedges[s.index()].is_valid()
    }

    // ==================== Triangle Topology ====================

    /// The three sides of a triangle.
    #[inline]
    pub fn triangle_sides(&self, t: TriangleId<S>) -> [SideId<S>; 3] {
        t.sides()
    }

    /// The three regions of a triangle, counterclockwise.
    pub fn triangle_regions(&self, t: TriangleId<S>) -> [RegionId<R>; 3] {
        let [s0, s1, s2] = t.sides();
        [self.begin(s0), self.begin(s1), self.begin(s2)]
    }

    /// The triangles across each side of `t`.
    pub fn triangle_neighbors(&self, t: TriangleId<S>) -> [Option<TriangleId<S>>; 3] {
        let [s0, s1, s2] = t.sides();
        [
            self.outer_triangle(s0),
            self.outer_triangle(s1),
            self.outer_triangle(s2),
        ]
    }

    // ==================== Region Topology ====================

    /// Outgoing sides of a region, counterclockwise.
    pub fn region_sides(&self, r: RegionId<R>) -> RegionSideIter<'_, R, S> {
        RegionSideIter::new(self, r)
    }

    /// Triangles around a region, counterclockwise.
    pub fn region_triangles(&self, r: RegionId<R>) -> impl Iterator<Item = TriangleId<S>> + '_ {
        self.region_sides(r).map(SideId::triangle)
    }

    /// Neighbouring regions of `r` in counterclockwise order.
    ///
    /// Unchecked form of [`region_neighbors`](Self::region_neighbors).
    pub fn neighbors(&self, r: RegionId<R>) -> Vec<RegionId<R>> {
        let mut out = Vec::with_capacity(8);
        let mut last = None;
        for s in self.region_sides(r) {
            out.push(self.end(s));
            last = Some(s);
        }
        // An open fan ends on a boundary side coming into r; its start region
        // is the final neighbour.
        if let Some(s) = last {
            let incoming = s.prev();
            if self.is_boundary_side(incoming) {
                out.push(self.begin(incoming));
            }
        }
        out
    }

    /// Number of outgoing sides reachable around a region.
    pub fn valence(&self, r: RegionId<R>) -> usize {
        self.region_sides(r).count()
    }

    /// Check if a region's triangle fan is open in the solid triangulation.
    #[inline]
    pub fn is_boundary(&self, r: RegionId<R>) -> bool {
        self.boundary[r.index()]
    }

    // ==================== Ghost Elements ====================

    /// Check if a region is the ghost region.
    #[inline]
    pub fn is_ghost_region(&self, r: RegionId<R>) -> bool {
        r.index() >= self.num_solid_regions
    }

    /// Check if a side belongs to a ghost triangle.
    #[inline]
    pub fn is_ghost_side(&self, s: SideId<S>) -> bool {
        s.index() >= self.num_solid_sides
    }

    /// Check if a triangle is a ghost triangle.
    #[inline]
    pub fn is_ghost_triangle(&self, t: TriangleId<S>) -> bool {
        3 * t.index() >= self.num_solid_sides
    }

    // ==================== Iteration ====================

    /// Iterate over all region IDs.
    pub fn region_ids(&self) -> impl Iterator<Item = RegionId<R>> + '_ {
        (0..self.num_regions()).map(RegionId::new)
    }

    /// Iterate over region IDs that are not ghosts.
    pub fn solid_region_ids(&self) -> impl Iterator<Item = RegionId<R>> + '_ {
        (0..self.num_solid_regions).map(RegionId::new)
    }

    /// Iterate over all triangle IDs.
    pub fn triangle_ids(&self) -> impl Iterator<Item = TriangleId<S>> + '_ {
        (0..self.num_triangles()).map(TriangleId::new)
    }

    /// Iterate over triangle IDs that are not ghosts.
    pub fn solid_triangle_ids(&self) -> impl Iterator<Item = TriangleId<S>> + '_ {
        (0..self.num_solid_triangles()).map(TriangleId::new)
    }

    /// Iterate over all side IDs.
    pub fn side_ids(&self) -> impl Iterator<Item = SideId<S>> + '_ {
        (0..self.num_sides()).map(SideId::new)
    }

    // ==================== Geometry ====================

    /// Position of a region's point.
    #[inline]
    pub fn region_position(&self, r: RegionId<R>) -> &Point2<f64> {
        &self.points[r.index()]
    }

    /// Dual vertex of a triangle.
    ///
    /// The circumcenter for solid triangles (the centroid if the triangle is
    /// collinear); for ghost triangles a point outside the hull, half a side
    /// length beyond the middle of their solid side.
    #[inline]
    pub fn triangle_center(&self, t: TriangleId<S>) -> &Point2<f64> {
        &self.centers[t.index()]
    }

    /// Centroid of a triangle's three regions.
    pub fn triangle_centroid(&self, t: TriangleId<S>) -> Point2<f64> {
        let [a, b, c] = self.triangle_regions(t);
        centroid(
            self.region_position(a),
            self.region_position(b),
            self.region_position(c),
        )
    }

    /// Corners of a region's Voronoi cell: the centers of its triangles in
    /// counterclockwise order. Open fans give an open polyline.
    pub fn region_vertices(&self, r: RegionId<R>) -> Vec<Point2<f64>> {
        self.region_triangles(r)
            .map(|t| *self.triangle_center(t))
            .collect()
    }

    // ==================== Validation ====================

    /// Check mesh connectivity.
    ///
    /// Every opposite pair must point back at each other with reversed
    /// endpoints, and walking around each region must reach all of its
    /// outgoing sides (a region with two separate fans is a pinch point).
    pub fn validate(&self) -> Result<()> {
        for s in self.side_ids() {
            if let Some(o) = self.opposite(s) {
                if o.index() >= self.num_sides() || self.halfedges[o.index()] != s {
                    return Err(MeshError::NonManifold {
                        details: format!("opposite of {:?} does not point back", s),
                    });
                }
                if self.begin(o) != self.end(s) || self.end(o) != self.begin(s) {
                    return Err(MeshError::NonManifold {
                        details: format!("{:?} and {:?} do not share endpoints", s, o),
                    });
                }
            }
        }

        let mut outgoing = vec![0usize; self.num_regions()];
        for r in &self.triangles {
            outgoing[r.index()] += 1;
        }
        for r in self.region_ids() {
            let expected = outgoing[r.index()];
            let reached = self.region_sides(r).take(expected + 1).count();
            if reached != expected {
                return Err(MeshError::NonManifold {
                    details: format!(
                        "circulating {:?} reaches {} of {} outgoing sides",
                        r, reached, expected
                    ),
                });
            }
        }

        Ok(())
    }

    /// Check if the mesh is valid (all connectivity is consistent).
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }
}

fn check_range(element: &'static str, valid: bool, index: usize, len: usize) -> Result<()> {
    if valid && index < len {
        Ok(())
    } else {
        Err(MeshError::IndexOutOfRange {
            element,
            index,
            len,
        })
    }
}

pub(crate) fn bounding_box(points: &[Point2<f64>]) -> Option<(Point2<f64>, Point2<f64>)> {
    let first = points.first()?;
    let mut min = *first;
    let mut max = *first;
    for p in points {
        min.x = min.x.min(p.x);
        min.y = min.y.min(p.y);
        max.x = max.x.max(p.x);
        max.y = max.y.max(p.y);
    }
    Some((min, max))
}

/// Iterator over the outgoing sides of a region, counterclockwise.
///
/// From outgoing side `s`, the next one is the opposite of the side coming
/// into the region in the same triangle (`opposite(prev(s))`). The walk stops
/// on returning to the start or on reaching the boundary.
pub struct RegionSideIter<'a, R: MeshIndex = u32, S: MeshIndex = u32> {
    mesh: &'a DualMesh<R, S>,
    start: SideId<S>,
    current: SideId<S>,
    done: bool,
}

impl<'a, R: MeshIndex, S: MeshIndex> RegionSideIter<'a, R, S> {
    fn new(mesh: &'a DualMesh<R, S>, r: RegionId<R>) -> Self {
        let start = mesh.region_out[r.index()];
        Self {
            mesh,
            start,
            current: start,
            done: !start.is_valid(),
        }
    }
}

impl<'a, R: MeshIndex, S: MeshIndex> Iterator for RegionSideIter<'a, R, S> {
    type Item = SideId<S>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let result = self.current;
        match self.mesh.opposite(result.prev()) {
            Some(s) if s != self.start => self.current = s,
            _ => self.done = true,
        }

        Some(result)
    }
}
