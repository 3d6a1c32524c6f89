//! Poisson-disk sampling (Bridson's algorithm).

use std::f64::consts::TAU;

use nalgebra::{Point2, Vector2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const NONE: usize = usize::MAX;

/// Background grid for distance queries.
///
/// Cells are `spacing / sqrt(2)` wide. Generated samples never share a cell,
/// but initial samples may, so each cell holds an intrusive linked list.
struct Grid {
    cell: f64,
    cols: usize,
    rows: usize,
    head: Vec<usize>,
    next: Vec<usize>,
}

impl Grid {
    fn new(width: f64, height: f64, spacing: f64) -> Self {
        let cell = spacing / std::f64::consts::SQRT_2;
        let cols = ((width / cell).ceil() as usize).max(1);
        let rows = ((height / cell).ceil() as usize).max(1);
        Self {
            cell,
            cols,
            rows,
            head: vec![NONE; cols * rows],
            next: Vec::new(),
        }
    }

    fn coords(&self, p: &Point2<f64>) -> (usize, usize) {
        let cx = ((p.x / self.cell).max(0.0) as usize).min(self.cols - 1);
        let cy = ((p.y / self.cell).max(0.0) as usize).min(self.rows - 1);
        (cx, cy)
    }

    /// Register sample `i`; samples must be inserted in index order.
    fn insert(&mut self, i: usize, p: &Point2<f64>) {
        debug_assert_eq!(i, self.next.len());
        let (cx, cy) = self.coords(p);
        let c = cy * self.cols + cx;
        self.next.push(self.head[c]);
        self.head[c] = i;
    }

    /// True if no sample lies within `spacing` of `p`.
    fn is_clear(&self, samples: &[Point2<f64>], p: &Point2<f64>, spacing: f64) -> bool {
        let (cx, cy) = self.coords(p);
        let spacing_sq = spacing * spacing;

        for y in cy.saturating_sub(2)..=(cy + 2).min(self.rows - 1) {
            for x in cx.saturating_sub(2)..=(cx + 2).min(self.cols - 1) {
                let mut i = self.head[y * self.cols + x];
                while i != NONE {
                    if (samples[i] - p).norm_squared() < spacing_sq {
                        return false;
                    }
                    i = self.next[i];
                }
            }
        }
        true
    }
}

/// Fill the rectangle `[0, width) × [0, height)` with points at least
/// `spacing` apart.
///
/// The `initial` points are kept as they are (even if closer than `spacing`
/// to each other) and seed the active list. New candidates are drawn from the
/// annulus `[spacing, 2 * spacing)` around a random active sample; a sample is
/// retired after `max_attempts` rejected candidates. The output starts with
/// `initial` and is fully determined by `seed`.
pub fn poisson_disk(
    initial: Vec<Point2<f64>>,
    width: f64,
    height: f64,
    spacing: f64,
    max_attempts: usize,
    seed: u64,
) -> Vec<Point2<f64>> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut grid = Grid::new(width, height, spacing);
    let mut samples = initial;

    for (i, p) in samples.iter().enumerate() {
        grid.insert(i, p);
    }

    if samples.is_empty() {
        let first = Point2::new(rng.random_range(0.0..width), rng.random_range(0.0..height));
        grid.insert(0, &first);
        samples.push(first);
    }

    let mut active: Vec<usize> = (0..samples.len()).collect();

    while !active.is_empty() {
        let slot = rng.random_range(0..active.len());
        let center = samples[active[slot]];

        let mut accepted = false;
        for _ in 0..max_attempts {
            let angle = rng.random_range(0.0..TAU);
            let radius = rng.random_range(spacing..2.0 * spacing);
            let candidate = center + Vector2::new(angle.cos(), angle.sin()) * radius;

            if candidate.x < 0.0 || candidate.x >= width || candidate.y < 0.0 || candidate.y >= height
            {
                continue;
            }
            if !grid.is_clear(&samples, &candidate, spacing) {
                continue;
            }

            let i = samples.len();
            grid.insert(i, &candidate);
            samples.push(candidate);
            active.push(i);
            accepted = true;
            break;
        }

        if !accepted {
            active.swap_remove(slot);
        }
    }

    samples
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generate::boundary::boundary_points;

    fn min_distance(points: &[Point2<f64>], skip: usize) -> f64 {
        let mut best = f64::INFINITY;
        for i in skip..points.len() {
            for j in 0..i {
                best = best.min((points[i] - points[j]).norm());
            }
        }
        best
    }

    #[test]
    fn test_spacing_respected() {
        let samples = poisson_disk(Vec::new(), 100.0, 100.0, 5.0, 30, 7);
        assert!(samples.len() > 100);
        assert!(min_distance(&samples, 1) >= 5.0);
        for p in &samples {
            assert!(p.x >= 0.0 && p.x < 100.0 && p.y >= 0.0 && p.y < 100.0);
        }
    }

    #[test]
    fn test_deterministic() {
        let a = poisson_disk(Vec::new(), 50.0, 80.0, 4.0, 30, 1981);
        let b = poisson_disk(Vec::new(), 50.0, 80.0, 4.0, 30, 1981);
        let c = poisson_disk(Vec::new(), 50.0, 80.0, 4.0, 30, 1982);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_keeps_initial_points() {
        let ring = boundary_points(100.0, 100.0, 10.0);
        let samples = poisson_disk(ring.clone(), 100.0, 100.0, 10.0, 30, 3);
        assert_eq!(&samples[..ring.len()], &ring[..]);
        assert!(samples.len() > ring.len());
        // Generated points keep their distance from everything before them.
        assert!(min_distance(&samples, ring.len()) >= 10.0);
    }

    #[test]
    fn test_coverage() {
        // No large empty disk should remain.
        let samples = poisson_disk(Vec::new(), 60.0, 60.0, 3.0, 30, 11);
        for i in 0..12 {
            for j in 0..12 {
                let probe = Point2::new(2.5 + 5.0 * i as f64, 2.5 + 5.0 * j as f64);
                let nearest = samples
                    .iter()
                    .map(|p| (p - probe).norm())
                    .fold(f64::INFINITY, f64::min);
                assert!(nearest < 9.0, "gap at {:?}", probe);
            }
        }
    }
}
