//! Dual mesh construction.
//!
//! This module builds [`DualMesh`] values from triangle incidence lists, as
//! produced by the generator in [`crate::generate`] or by any external
//! triangulator.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use nalgebra::Point2;

use super::dual::{bounding_box, DualMesh};
use super::index::{MeshIndex, RegionId, SideId};
use crate::error::{MeshError, Result};
use crate::generate::Triangulation;
use crate::geometry::{centroid, circumcenter};
use crate::triangulate::EMPTY;

#[inline]
fn next_side(s: usize) -> usize {
    if s % 3 == 2 {
        s - 2
    } else {
        s + 1
    }
}

impl<R: MeshIndex, S: MeshIndex> DualMesh<R, S> {
    /// Build a dual mesh from points and counterclockwise triangles.
    ///
    /// # Arguments
    /// * `points` - Region positions; `points.len()` is the region count
    /// * `triangles` - Each triangle as three region indices
    ///
    /// # Errors
    /// * [`MeshError::EmptyMesh`] if there are no triangles
    /// * [`MeshError::InvalidRegionIndex`] if a triangle references a region
    ///   outside `[0, points.len())`
    /// * [`MeshError::DegenerateTriangle`] if a triangle repeats a region
    /// * [`MeshError::NonManifoldEdge`] if an edge is used by more than two sides
    /// * [`MeshError::InconsistentOrientation`] if an edge's two sides run the
    ///   same way
    /// * [`MeshError::IndexOverflow`] if the counts do not fit `R` or `S`
    ///
    /// # Example
    /// ```
    /// use dualmesh::mesh::{DualMesh, RegionId};
    /// use nalgebra::Point2;
    ///
    /// let points = vec![
    ///     Point2::new(0.0, 0.0),
    ///     Point2::new(1.0, 0.0),
    ///     Point2::new(0.0, 1.0),
    ///     Point2::new(1.0, 1.0),
    /// ];
    /// let triangles = vec![[0, 1, 2], [2, 1, 3]];
    ///
    /// let mesh: DualMesh = DualMesh::from_triangles(&points, &triangles).unwrap();
    /// assert_eq!(mesh.num_sides(), 6);
    /// assert_eq!(mesh.region_neighbors(RegionId::new(1)).unwrap().len(), 3);
    /// ```
    pub fn from_triangles(points: &[Point2<f64>], triangles: &[[usize; 3]]) -> Result<Self> {
        build(points, triangles, false)
    }

    /// Build a dual mesh and close every boundary fan with ghost elements.
    ///
    /// One ghost region is appended after the input points and one ghost
    /// triangle per boundary side after the input triangles, so every side
    /// of the result has an opposite. The boundary must form a single loop.
    ///
    /// # Errors
    /// Everything [`from_triangles`](Self::from_triangles) reports, plus
    /// [`MeshError::NonManifold`] if the boundary is not a single simple loop.
    pub fn from_triangles_with_ghost(
        points: &[Point2<f64>],
        triangles: &[[usize; 3]],
    ) -> Result<Self> {
        build(points, triangles, true)
    }

    /// Build a dual mesh from generator output.
    pub fn from_triangulation(triangulation: &Triangulation) -> Result<Self> {
        Self::from_triangles(&triangulation.points, &triangulation.triangles)
    }

    /// Build a dual mesh with ghost structure from generator output.
    pub fn from_triangulation_with_ghost(triangulation: &Triangulation) -> Result<Self> {
        Self::from_triangles_with_ghost(&triangulation.points, &triangulation.triangles)
    }
}

fn build<R: MeshIndex, S: MeshIndex>(
    points: &[Point2<f64>],
    faces: &[[usize; 3]],
    ghost: bool,
) -> Result<DualMesh<R, S>> {
    if faces.is_empty() {
        return Err(MeshError::EmptyMesh);
    }

    let num_regions = points.len();

    // Validate region indices
    for (ti, face) in faces.iter().enumerate() {
        for &r in face {
            if r >= num_regions {
                return Err(MeshError::InvalidRegionIndex {
                    triangle: ti,
                    region: r,
                    num_regions,
                });
            }
        }
        if face[0] == face[1] || face[1] == face[2] || face[0] == face[2] {
            return Err(MeshError::DegenerateTriangle { triangle: ti });
        }
    }

    // Fail before pairing if the solid mesh already overflows.
    check_capacity::<R>("region", num_regions)?;
    check_capacity::<S>("side", 3 * faces.len())?;

    let mut triangles: Vec<usize> = faces.iter().flatten().copied().collect();
    let mut halfedges = pair_sides(&triangles)?;

    let num_solid_sides = triangles.len();
    let mut boundary = boundary_flags(num_regions, &triangles, &halfedges);

    let mut points = points.to_vec();
    if ghost {
        add_ghost_structure(&mut points, &mut triangles, &mut halfedges)?;
        check_capacity::<R>("region", points.len())?;
        check_capacity::<S>("side", triangles.len())?;
    }

    let centers = triangle_centers(&points, &triangles, num_solid_sides);
    let region_out = region_out_sides(points.len(), &triangles, &halfedges);

    boundary.resize(points.len(), false);

    log::debug!(
        "dual mesh: {} regions, {} triangles ({} ghost), {} boundary regions",
        points.len(),
        triangles.len() / 3,
        (triangles.len() - num_solid_sides) / 3,
        boundary.iter().filter(|&&b| b).count()
    );

    Ok(DualMesh {
        points,
        triangles: triangles.into_iter().map(RegionId::new).collect(),
        halfedges: halfedges
            .into_iter()
            .map(|o| if o == EMPTY { SideId::invalid() } else { SideId::new(o) })
            .collect(),
        region_out,
        centers,
        boundary,
        num_solid_regions: num_regions,
        num_solid_sides,
    })
}

fn check_capacity<I: MeshIndex>(element: &'static str, count: usize) -> Result<()> {
    let max = I::capacity();
    if count > max {
        return Err(MeshError::IndexOverflow {
            element,
            count,
            max,
        });
    }
    Ok(())
}

/// Pair every side with the side running the other way along the same edge.
fn pair_sides(triangles: &[usize]) -> Result<Vec<usize>> {
    let mut halfedges = vec![EMPTY; triangles.len()];

    // Undirected edge -> first side seen on it
    let mut edge_map: HashMap<(usize, usize), usize> = HashMap::with_capacity(triangles.len());

    for s in 0..triangles.len() {
        let r0 = triangles[s];
        let r1 = triangles[next_side(s)];
        let key = (r0.min(r1), r0.max(r1));

        match edge_map.entry(key) {
            Entry::Vacant(slot) => {
                slot.insert(s);
            }
            Entry::Occupied(slot) => {
                let first = *slot.get();
                if halfedges[first] != EMPTY {
                    return Err(MeshError::NonManifoldEdge { r0: key.0, r1: key.1 });
                }
                if triangles[first] == r0 {
                    return Err(MeshError::InconsistentOrientation { r0, r1 });
                }
                halfedges[first] = s;
                halfedges[s] = first;
            }
        }
    }

    Ok(halfedges)
}

fn boundary_flags(num_regions: usize, triangles: &[usize], halfedges: &[usize]) -> Vec<bool> {
    let mut boundary = vec![false; num_regions];
    let mut used = vec![false; num_regions];
    for s in 0..triangles.len() {
        used[triangles[s]] = true;
        if halfedges[s] == EMPTY {
            boundary[triangles[s]] = true;
            boundary[triangles[next_side(s)]] = true;
        }
    }
    // Regions no triangle touches have no fan at all.
    for (b, u) in boundary.iter_mut().zip(used) {
        *b |= !u;
    }
    boundary
}

/// Pick the side each region's fan walk starts from: a side without an
/// opposite if there is one, so open fans are walked from their first side.
fn region_out_sides<S: MeshIndex>(
    num_regions: usize,
    triangles: &[usize],
    halfedges: &[usize],
) -> Vec<SideId<S>> {
    let mut out = vec![EMPTY; num_regions];
    for s in 0..triangles.len() {
        let r = triangles[s];
        if out[r] == EMPTY || halfedges[s] == EMPTY {
            out[r] = s;
        }
    }
    out.into_iter()
        .map(|s| if s == EMPTY { SideId::invalid() } else { SideId::new(s) })
        .collect()
}

fn triangle_centers(
    points: &[Point2<f64>],
    triangles: &[usize],
    num_solid_sides: usize,
) -> Vec<Point2<f64>> {
    triangles
        .chunks_exact(3)
        .enumerate()
        .map(|(t, tri)| {
            if 3 * t < num_solid_sides {
                let [a, b, c] = [&points[tri[0]], &points[tri[1]], &points[tri[2]]];
                circumcenter(a, b, c).unwrap_or_else(|| centroid(a, b, c))
            } else {
                // Ghost triangle (b, a, ghost) sits across solid side a -> b,
                // whose outward normal points to the right.
                let b = points[tri[0]];
                let a = points[tri[1]];
                let d = b - a;
                let mid = nalgebra::center(&a, &b);
                Point2::new(mid.x + 0.5 * d.y, mid.y - 0.5 * d.x)
            }
        })
        .collect()
}

/// Close the mesh with one ghost region and a ghost triangle per boundary side.
///
/// Ghost triangle `i` takes the `i`-th boundary side in loop order, `a -> b`,
/// and becomes `(b, a, ghost)`. Its side `b -> a` pairs with the solid side and
/// its side `ghost -> b` pairs with side `b -> ghost` of the next ghost triangle.
fn add_ghost_structure(
    points: &mut Vec<Point2<f64>>,
    triangles: &mut Vec<usize>,
    halfedges: &mut Vec<usize>,
) -> Result<()> {
    let num_solid_sides = triangles.len();
    let ghost_r = points.len();

    // Region -> boundary side starting at it
    let mut unpaired = vec![EMPTY; points.len()];
    let mut first = EMPTY;
    let mut count = 0;
    for s in 0..num_solid_sides {
        if halfedges[s] != EMPTY {
            continue;
        }
        let r = triangles[s];
        if unpaired[r] != EMPTY {
            return Err(MeshError::NonManifold {
                details: format!("region {} starts two boundary sides", r),
            });
        }
        unpaired[r] = s;
        count += 1;
        if first == EMPTY {
            first = s;
        }
    }

    if count == 0 {
        log::debug!("mesh is closed, no ghost structure needed");
        return Ok(());
    }

    let ghost_position = bounding_box(points)
        .map(|(min, max)| nalgebra::center(&min, &max))
        .unwrap_or_else(Point2::origin);
    points.push(ghost_position);

    let num_sides = num_solid_sides + 3 * count;
    triangles.resize(num_sides, ghost_r);
    halfedges.resize(num_sides, EMPTY);

    let mut s = first;
    for i in 0..count {
        if i > 0 && s == first {
            return Err(MeshError::NonManifold {
                details: format!("boundary splits into several loops ({} sides)", count),
            });
        }

        let ghost_s = num_solid_sides + 3 * i;
        halfedges[s] = ghost_s;
        halfedges[ghost_s] = s;

        let end = triangles[next_side(s)];
        triangles[ghost_s] = end;
        triangles[ghost_s + 1] = triangles[s];
        triangles[ghost_s + 2] = ghost_r;

        let k = num_solid_sides + (3 * i + 4) % (3 * count);
        halfedges[ghost_s + 2] = k;
        halfedges[k] = ghost_s + 2;

        s = unpaired[end];
        if s == EMPTY {
            return Err(MeshError::NonManifold {
                details: format!("boundary loop breaks at region {}", end),
            });
        }
    }

    if s != first {
        return Err(MeshError::NonManifold {
            details: "boundary loop does not close".to_string(),
        });
    }

    log::debug!("added ghost region {} with {} ghost triangles", ghost_r, count);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::mesh::TriangleId;

    fn two_triangles() -> (Vec<Point2<f64>>, Vec<[usize; 3]>) {
        let points = vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(0.0, 1.0),
            Point2::new(1.0, 1.0),
        ];
        let triangles = vec![[0, 1, 2], [2, 1, 3]];
        (points, triangles)
    }

    #[test]
    fn test_side_numbering() {
        let (points, triangles) = two_triangles();
        let mesh: DualMesh = DualMesh::from_triangles(&points, &triangles).unwrap();

        assert_eq!(mesh.num_regions(), 4);
        assert_eq!(mesh.num_triangles(), 2);
        assert_eq!(mesh.num_sides(), 6);

        // Side 1 is 1 -> 2, side 3 is 2 -> 1.
        assert_eq!(mesh.side_opposite(SideId::new(1)).unwrap(), Some(SideId::new(3)));
        assert_eq!(mesh.side_opposite(SideId::new(3)).unwrap(), Some(SideId::new(1)));
        for s in [0, 2, 4, 5] {
            assert_eq!(mesh.side_opposite(SideId::new(s)).unwrap(), None);
        }

        let [a, b, c] = mesh.triangle_vertices(TriangleId::new(1)).unwrap();
        assert_eq!((a.index(), b.index(), c.index()), (2, 1, 3));
        assert!(mesh.is_valid());
    }

    #[test]
    fn test_all_regions_on_boundary() {
        let (points, triangles) = two_triangles();
        let mesh: DualMesh = DualMesh::from_triangles(&points, &triangles).unwrap();
        for r in mesh.region_ids() {
            assert!(mesh.is_boundary_region(r).unwrap());
        }
    }

    #[test]
    fn test_isolated_region() {
        let (mut points, triangles) = two_triangles();
        points.push(Point2::new(5.0, 5.0));
        let mesh: DualMesh = DualMesh::from_triangles(&points, &triangles).unwrap();
        let lonely = RegionId::new(4);
        assert!(mesh.is_boundary(lonely));
        assert!(mesh.region_neighbors(lonely).unwrap().is_empty());
    }

    #[test]
    fn test_empty() {
        let result: Result<DualMesh> = DualMesh::from_triangles(&[], &[]);
        assert_eq!(result.unwrap_err(), MeshError::EmptyMesh);
    }

    #[test]
    fn test_invalid_region_index() {
        let points = vec![Point2::new(0.0, 0.0)];
        let result: Result<DualMesh> = DualMesh::from_triangles(&points, &[[0, 1, 2]]);
        let err = result.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedMesh);
        assert!(matches!(err, MeshError::InvalidRegionIndex { region: 1, .. }));
    }

    #[test]
    fn test_degenerate_triangle() {
        let (points, _) = two_triangles();
        let result: Result<DualMesh> = DualMesh::from_triangles(&points, &[[0, 0, 2]]);
        assert_eq!(result.unwrap_err(), MeshError::DegenerateTriangle { triangle: 0 });
    }

    #[test]
    fn test_non_manifold_edge() {
        // Three triangles hinged on edge 0-1.
        let points = vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(0.5, 1.0),
            Point2::new(0.5, -1.0),
            Point2::new(0.5, 2.0),
        ];
        let triangles = vec![[0, 1, 2], [1, 0, 3], [1, 0, 4]];
        let result: Result<DualMesh> = DualMesh::from_triangles(&points, &triangles);
        assert_eq!(result.unwrap_err(), MeshError::NonManifoldEdge { r0: 0, r1: 1 });
    }

    #[test]
    fn test_inconsistent_orientation() {
        let (points, _) = two_triangles();
        let triangles = vec![[0, 1, 2], [1, 2, 3]];
        let result: Result<DualMesh> = DualMesh::from_triangles(&points, &triangles);
        assert_eq!(
            result.unwrap_err(),
            MeshError::InconsistentOrientation { r0: 1, r1: 2 }
        );
    }

    #[test]
    fn test_index_overflow() {
        let points: Vec<Point2<f64>> = (0..70_000).map(|i| Point2::new(i as f64, 0.0)).collect();
        let triangles = vec![[0, 1, 69_999]];
        let result: Result<DualMesh<u16, u32>> = DualMesh::from_triangles(&points, &triangles);
        let err = result.unwrap_err();
        assert!(err.is_config());
        assert_eq!(
            err,
            MeshError::IndexOverflow {
                element: "region",
                count: 70_000,
                max: 65_535
            }
        );
    }

    #[test]
    fn test_ghost_structure() {
        let (points, triangles) = two_triangles();
        let mesh: DualMesh = DualMesh::from_triangles_with_ghost(&points, &triangles).unwrap();

        // 4 boundary sides -> 4 ghost triangles, 1 ghost region.
        assert!(mesh.has_ghost());
        assert_eq!(mesh.num_regions(), 5);
        assert_eq!(mesh.num_solid_regions(), 4);
        assert_eq!(mesh.num_triangles(), 6);
        assert_eq!(mesh.num_sides(), 18);
        assert!(mesh.is_valid());

        for s in mesh.side_ids() {
            let o = mesh.opposite(s).expect("ghost mesh has no boundary sides");
            assert_eq!(mesh.opposite(o), Some(s));
        }

        let ghost = RegionId::new(4);
        assert!(mesh.is_ghost_region(ghost));
        assert!(!mesh.is_boundary(ghost));
        assert_eq!(mesh.region_neighbors(ghost).unwrap().len(), 4);

        // Solid regions keep their boundary flag and now have closed fans.
        for r in mesh.solid_region_ids() {
            assert!(mesh.is_boundary(r));
            let neighbors = mesh.neighbors(r);
            assert_eq!(neighbors.len(), mesh.region_triangles(r).count());
            assert!(neighbors.contains(&ghost));
        }

        // Ghost centers sit outside the unit square.
        for t in mesh.triangle_ids().filter(|&t| mesh.is_ghost_triangle(t)) {
            let c = mesh.triangle_center(t);
            assert!(c.x < 0.0 || c.x > 1.0 || c.y < 0.0 || c.y > 1.0);
        }
    }

    #[test]
    fn test_ghost_rejects_pinched_boundary() {
        // Two triangles touching at region 0 only.
        let points = vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(0.0, 1.0),
            Point2::new(-1.0, 0.0),
            Point2::new(0.0, -1.0),
        ];
        let triangles = vec![[0, 1, 2], [0, 3, 4]];
        let result: Result<DualMesh> = DualMesh::from_triangles_with_ghost(&points, &triangles);
        assert!(matches!(result.unwrap_err(), MeshError::NonManifold { .. }));

        // Without ghosts the mesh builds but the pinched fan fails validation.
        let mesh: DualMesh = DualMesh::from_triangles(&points, &triangles).unwrap();
        assert!(!mesh.is_valid());
    }
}
