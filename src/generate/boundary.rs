//! Points along the edge of the sampling rectangle.

use nalgebra::Point2;

/// Place a ring of points strictly inside the `width × height` rectangle.
///
/// Each side gets `n + 1` points with `n = ceil(extent / spacing)`, evenly
/// spaced at parameters `t = (i + 0.5) / (n + 1)` and pushed inward by
/// [`inset`]. The inward push is never zero and grows towards the corners, so
/// the ring is strictly convex and the triangulation never sees collinear
/// boundary points.
///
/// Points are emitted left and right sides first, then bottom and top, each
/// pair interleaved.
pub fn boundary_points(width: f64, height: f64, spacing: f64) -> Vec<Point2<f64>> {
    let nx = (width / spacing).ceil() as usize;
    let ny = (height / spacing).ceil() as usize;

    // Distance between neighbouring ring points along each direction.
    let step_x = width / (nx as f64 + 1.0);
    let step_y = height / (ny as f64 + 1.0);

    let mut points = Vec::with_capacity(2 * (nx + 1) + 2 * (ny + 1));

    for i in 0..=ny {
        let t = (i as f64 + 0.5) / (ny as f64 + 1.0);
        let y = height * t;
        let offset = inset(t, step_x);
        points.push(Point2::new(offset, y));
        points.push(Point2::new(width - offset, y));
    }

    for i in 0..=nx {
        let t = (i as f64 + 0.5) / (nx as f64 + 1.0);
        let x = width * t;
        let offset = inset(t, step_y);
        points.push(Point2::new(x, offset));
        points.push(Point2::new(x, height - offset));
    }

    points
}

/// Inward push at parameter `t` along a side.
///
/// `0.25 + (t - 0.5)^2` lies in `[0.25, 0.5)`. It is scaled by at most half
/// the ring step of the perpendicular sides (`step`), so the push stays below
/// `step / 4`: each corner point sits closer to its own side than the first
/// point of the adjacent side, which keeps the corners convex.
fn inset(t: f64, step: f64) -> f64 {
    let scale = (step / 2.0).min(1.0);
    scale * (0.25 + (t - 0.5).powi(2))
}
