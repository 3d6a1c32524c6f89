//! Delaunay triangulation of planar point sets.
//!
//! Points are inserted in order of distance from the circumcenter of a small
//! seed triangle. Each new point lies outside the current triangulation, so it
//! only connects to the edges of the convex hull it can see; an angular hash
//! over the hull finds a visible edge quickly. Every new triangle is then
//! legalized with recursive edge flips, which keeps the triangulation
//! Delaunay. Expected running time is `O(n log n)`, dominated by the sort.
//!
//! The result uses the flat side layout shared with [`DualMesh`]: triangle `t`
//! owns sides `3t`, `3t + 1`, `3t + 2`, `triangles[s]` is the region side `s`
//! starts from, and `halfedges[s]` is the opposite side.
//!
//! [`DualMesh`]: crate::mesh::DualMesh

use std::cmp::Ordering;

use nalgebra::Point2;

use crate::geometry::{circumcenter, circumradius_sq, in_circle, orient2d};

/// Marker for a side without an opposite (convex hull edge).
pub const EMPTY: usize = usize::MAX;

/// Raw output of [`triangulate`].
#[derive(Debug, Clone, Default)]
pub struct Delaunay {
    /// Start region of every side; three consecutive entries per triangle,
    /// counterclockwise.
    pub triangles: Vec<usize>,
    /// Opposite side of every side, [`EMPTY`] on the hull.
    pub halfedges: Vec<usize>,
    /// Convex hull, counterclockwise.
    pub hull: Vec<usize>,
    /// Points skipped as near-duplicates of an earlier point.
    pub skipped: Vec<usize>,
}

impl Delaunay {
    /// Number of triangles.
    pub fn num_triangles(&self) -> usize {
        self.triangles.len() / 3
    }
}

/// Triangulate a set of points.
///
/// Fewer than three points, or points that are all collinear, produce a
/// result with no triangles; the hull then lists the points sorted along
/// their common line.
pub fn triangulate(points: &[Point2<f64>]) -> Delaunay {
    if points.len() < 3 {
        return Delaunay {
            hull: (0..points.len()).collect(),
            ..Default::default()
        };
    }

    let (i0, i1, i2) = match find_seed_triangle(points) {
        Some(seed) => seed,
        None => return collinear_hull(points),
    };

    let mut sweep = Sweep::new(points, i0, i1, i2);
    sweep.run();
    sweep.finish()
}

/// Pick a seed triangle near the center of the bounding box with the
/// smallest circumcircle. Always returned counterclockwise.
fn find_seed_triangle(points: &[Point2<f64>]) -> Option<(usize, usize, usize)> {
    let center = bbox_center(points);

    let i0 = nearest(points, &center, |_| true)?;
    let p0 = points[i0];

    let i1 = nearest(points, &p0, |i| i != i0 && points[i] != p0)?;
    let p1 = points[i1];

    let mut min_radius = f64::INFINITY;
    let mut i2 = None;
    for (i, p) in points.iter().enumerate() {
        if i == i0 || i == i1 {
            continue;
        }
        let r = circumradius_sq(&p0, &p1, p);
        if r < min_radius {
            min_radius = r;
            i2 = Some(i);
        }
    }
    let i2 = i2?;

    if orient2d(&p0, &p1, &points[i2]) < 0.0 {
        Some((i0, i2, i1))
    } else {
        Some((i0, i1, i2))
    }
}

fn bbox_center(points: &[Point2<f64>]) -> Point2<f64> {
    let mut min = points[0];
    let mut max = points[0];
    for p in points {
        min.x = min.x.min(p.x);
        min.y = min.y.min(p.y);
        max.x = max.x.max(p.x);
        max.y = max.y.max(p.y);
    }
    nalgebra::center(&min, &max)
}

fn nearest(
    points: &[Point2<f64>],
    target: &Point2<f64>,
    accept: impl Fn(usize) -> bool,
) -> Option<usize> {
    points
        .iter()
        .enumerate()
        .filter(|&(i, _)| accept(i))
        .map(|(i, p)| (i, (p - target).norm_squared()))
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(i, _)| i)
}

fn collinear_hull(points: &[Point2<f64>]) -> Delaunay {
    let origin = points[0];
    let key = |p: &Point2<f64>| {
        let dx = p.x - origin.x;
        if dx != 0.0 {
            dx
        } else {
            p.y - origin.y
        }
    };
    let mut hull: Vec<usize> = (0..points.len()).collect();
    hull.sort_by(|&a, &b| key(&points[a]).total_cmp(&key(&points[b])));
    hull.dedup_by(|a, b| points[*a] == points[*b]);
    Delaunay {
        hull,
        ..Default::default()
    }
}

/// Monotone mapping of a direction to `[0, 1)`, cheaper than `atan2`.
#[inline]
fn pseudo_angle(dx: f64, dy: f64) -> f64 {
    let p = dx / (dx.abs() + dy.abs());
    if dy > 0.0 {
        (3.0 - p) / 4.0
    } else {
        (1.0 + p) / 4.0
    }
}

/// Working state of the sweep.
struct Sweep<'a> {
    points: &'a [Point2<f64>],
    seed: [usize; 3],
    center: Point2<f64>,

    triangles: Vec<usize>,
    halfedges: Vec<usize>,

    // The advancing hull as a doubly linked list over point ids. A removed
    // point has `hull_next[i] == i`.
    hull_start: usize,
    hull_next: Vec<usize>,
    hull_prev: Vec<usize>,
    hull_tri: Vec<usize>,
    hull_hash: Vec<usize>,

    edge_stack: Vec<usize>,
    skipped: Vec<usize>,
}

impl<'a> Sweep<'a> {
    fn new(points: &'a [Point2<f64>], i0: usize, i1: usize, i2: usize) -> Self {
        let n = points.len();
        let center = circumcenter(&points[i0], &points[i1], &points[i2])
            .unwrap_or_else(|| bbox_center(points));
        let hash_size = (n as f64).sqrt().ceil() as usize;
        let max_triangles = (2 * n).saturating_sub(5);

        let mut sweep = Self {
            points,
            seed: [i0, i1, i2],
            center,
            triangles: Vec::with_capacity(max_triangles * 3),
            halfedges: Vec::with_capacity(max_triangles * 3),
            hull_start: i0,
            hull_next: vec![0; n],
            hull_prev: vec![0; n],
            hull_tri: vec![0; n],
            hull_hash: vec![EMPTY; hash_size.max(1)],
            edge_stack: Vec::with_capacity(512),
            skipped: Vec::new(),
        };

        sweep.hull_next[i0] = i1;
        sweep.hull_prev[i2] = i1;
        sweep.hull_next[i1] = i2;
        sweep.hull_prev[i0] = i2;
        sweep.hull_next[i2] = i0;
        sweep.hull_prev[i1] = i0;

        sweep.hull_tri[i0] = 0;
        sweep.hull_tri[i1] = 1;
        sweep.hull_tri[i2] = 2;

        for i in [i0, i1, i2] {
            let key = sweep.hash_key(&points[i]);
            sweep.hull_hash[key] = i;
        }

        sweep.add_triangle(i0, i1, i2, EMPTY, EMPTY, EMPTY);
        sweep
    }

    fn hash_key(&self, p: &Point2<f64>) -> usize {
        let len = self.hull_hash.len();
        let angle = pseudo_angle(p.x - self.center.x, p.y - self.center.y);
        // NaN (a point exactly at the center) maps to bucket 0.
        ((angle * len as f64).floor() as usize) % len
    }

    fn run(&mut self) {
        let points = self.points;
        let center = self.center;

        let dists: Vec<f64> = points.iter().map(|p| (p - center).norm_squared()).collect();
        let mut ids: Vec<usize> = (0..points.len()).collect();
        ids.sort_by(|&a, &b| dists[a].partial_cmp(&dists[b]).unwrap_or(Ordering::Equal));

        let mut last: Option<Point2<f64>> = None;
        for &i in &ids {
            let p = points[i];

            if let Some(q) = last {
                if (p.x - q.x).abs() <= f64::EPSILON && (p.y - q.y).abs() <= f64::EPSILON {
                    if !self.seed.contains(&i) {
                        self.skipped.push(i);
                    }
                    continue;
                }
            }
            last = Some(p);

            if self.seed.contains(&i) {
                continue;
            }

            self.insert(i, &p);
        }
    }

    fn insert(&mut self, i: usize, p: &Point2<f64>) {
        let points = self.points;

        // Find a live hull point near the angle of p.
        let key = self.hash_key(p);
        let len = self.hull_hash.len();
        let mut start = self.hull_start;
        for j in 0..len {
            let candidate = self.hull_hash[(key + j) % len];
            if candidate != EMPTY && candidate != self.hull_next[candidate] {
                start = candidate;
                break;
            }
        }

        // Walk forward to the first hull edge that p can see.
        start = self.hull_prev[start];
        let mut e = start;
        loop {
            let q = self.hull_next[e];
            if orient2d(p, &points[e], &points[q]) < 0.0 {
                break;
            }
            e = q;
            if e == start {
                // No visible edge: p duplicates or lies on the hull.
                self.skipped.push(i);
                return;
            }
        }

        let t = self.add_triangle(e, i, self.hull_next[e], EMPTY, EMPTY, self.hull_tri[e]);
        self.hull_tri[i] = self.legalize(t + 2);
        self.hull_tri[e] = t;

        // Walk forward, connecting p to every further visible edge.
        let mut n = self.hull_next[e];
        loop {
            let q = self.hull_next[n];
            if orient2d(p, &points[n], &points[q]) >= 0.0 {
                break;
            }
            let t = self.add_triangle(n, i, q, self.hull_tri[i], EMPTY, self.hull_tri[n]);
            self.hull_tri[i] = self.legalize(t + 2);
            self.hull_next[n] = n;
            n = q;
        }

        // Walk backward from the first edge if it was the starting one.
        if e == start {
            loop {
                let q = self.hull_prev[e];
                if orient2d(p, &points[q], &points[e]) >= 0.0 {
                    break;
                }
                let t = self.add_triangle(q, i, e, EMPTY, self.hull_tri[e], self.hull_tri[q]);
                self.legalize(t + 2);
                self.hull_tri[q] = t;
                self.hull_next[e] = e;
                e = q;
            }
        }

        self.hull_start = e;
        self.hull_prev[i] = e;
        self.hull_next[e] = i;
        self.hull_prev[n] = i;
        self.hull_next[i] = n;

        let key = self.hash_key(p);
        self.hull_hash[key] = i;
        let key = self.hash_key(&points[e]);
        self.hull_hash[key] = e;
    }

    /// Flip edges until every triangle around side `a` is Delaunay. Returns
    /// the side that ends up on the hull next to the inserted point.
    fn legalize(&mut self, mut a: usize) -> usize {
        let points = self.points;
        let mut ar;

        loop {
            let b = self.halfedges[a];

            //           pl                    pl
            //          /||\                  /  \
            //       al/ || \bl            al/    \a
            //        /  ||  \              /      \
            //       /  a||b  \    flip    /___ar___\
            //     p0\   ||   /p1   =>   p0\---bl---/p1
            //        \  ||  /              \      /
            //       ar\ || /br             b\    /br
            //          \||/                  \  /
            //           pr                    pr
            let a0 = a - a % 3;
            ar = a0 + (a + 2) % 3;

            if b == EMPTY {
                match self.edge_stack.pop() {
                    Some(next) => {
                        a = next;
                        continue;
                    }
                    None => break,
                }
            }

            let b0 = b - b % 3;
            let al = a0 + (a + 1) % 3;
            let bl = b0 + (b + 2) % 3;

            let p0 = self.triangles[ar];
            let pr = self.triangles[a];
            let pl = self.triangles[al];
            let p1 = self.triangles[bl];

            if in_circle(&points[p0], &points[pr], &points[pl], &points[p1]) {
                self.triangles[a] = p1;
                self.triangles[b] = p0;

                let hbl = self.halfedges[bl];

                // The flipped edge was on the hull on the far side.
                if hbl == EMPTY {
                    let mut e = self.hull_start;
                    loop {
                        if self.hull_tri[e] == bl {
                            self.hull_tri[e] = a;
                            break;
                        }
                        e = self.hull_prev[e];
                        if e == self.hull_start {
                            break;
                        }
                    }
                }

                self.link(a, hbl);
                let har = self.halfedges[ar];
                self.link(b, har);
                self.link(ar, bl);

                let br = b0 + (b + 1) % 3;
                self.edge_stack.push(br);
            } else {
                match self.edge_stack.pop() {
                    Some(next) => a = next,
                    None => break,
                }
            }
        }

        ar
    }

    #[inline]
    fn link(&mut self, a: usize, b: usize) {
        self.halfedges[a] = b;
        if b != EMPTY {
            self.halfedges[b] = a;
        }
    }

    fn add_triangle(&mut self, i0: usize, i1: usize, i2: usize, a: usize, b: usize, c: usize) -> usize {
        let t = self.triangles.len();
        self.triangles.extend_from_slice(&[i0, i1, i2]);
        self.halfedges.extend_from_slice(&[EMPTY, EMPTY, EMPTY]);
        self.link(t, a);
        self.link(t + 1, b);
        self.link(t + 2, c);
        t
    }

    fn finish(self) -> Delaunay {
        let mut hull = Vec::new();
        let mut e = self.hull_start;
        loop {
            hull.push(e);
            e = self.hull_next[e];
            if e == self.hull_start {
                break;
            }
        }

        Delaunay {
            triangles: self.triangles,
            halfedges: self.halfedges,
            hull,
            skipped: self.skipped,
        }
    }
}
