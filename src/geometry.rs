//! Planar geometric predicates and triangle measures.
//!
//! All predicates use the usual y-up convention: positive orientation means
//! counterclockwise.

use nalgebra::Point2;

/// Twice the signed area of triangle `(a, b, c)`.
///
/// Positive if `c` lies to the left of the directed line `a → b`.
#[inline]
pub fn orient2d(a: &Point2<f64>, b: &Point2<f64>, c: &Point2<f64>) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

/// True if `p` lies strictly inside the circumcircle of the counterclockwise
/// triangle `(a, b, c)`.
#[inline]
pub fn in_circle(a: &Point2<f64>, b: &Point2<f64>, c: &Point2<f64>, p: &Point2<f64>) -> bool {
    in_circle_det(a, b, c, p) > 0.0
}

/// The incircle determinant; positive when `p` is inside the circumcircle of
/// the counterclockwise triangle `(a, b, c)`.
#[inline]
pub fn in_circle_det(a: &Point2<f64>, b: &Point2<f64>, c: &Point2<f64>, p: &Point2<f64>) -> f64 {
    let dx = a.x - p.x;
    let dy = a.y - p.y;
    let ex = b.x - p.x;
    let ey = b.y - p.y;
    let fx = c.x - p.x;
    let fy = c.y - p.y;

    let ap = dx * dx + dy * dy;
    let bp = ex * ex + ey * ey;
    let cp = fx * fx + fy * fy;

    dx * (ey * cp - bp * fy) - dy * (ex * cp - bp * fx) + ap * (ex * fy - ey * fx)
}

/// Offset of the circumcenter from `a`, or non-finite values for collinear
/// input.
#[inline]
fn circumcenter_offset(a: &Point2<f64>, b: &Point2<f64>, c: &Point2<f64>) -> (f64, f64) {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let ex = c.x - a.x;
    let ey = c.y - a.y;

    let bl = dx * dx + dy * dy;
    let cl = ex * ex + ey * ey;
    let d = 0.5 / (dx * ey - dy * ex);

    ((ey * bl - dy * cl) * d, (dx * cl - ex * bl) * d)
}

/// Squared circumradius; infinite or NaN for collinear points.
#[inline]
pub fn circumradius_sq(a: &Point2<f64>, b: &Point2<f64>, c: &Point2<f64>) -> f64 {
    let (x, y) = circumcenter_offset(a, b, c);
    x * x + y * y
}

/// Circumcenter of a triangle, `None` if the points are collinear.
pub fn circumcenter(a: &Point2<f64>, b: &Point2<f64>, c: &Point2<f64>) -> Option<Point2<f64>> {
    let (x, y) = circumcenter_offset(a, b, c);
    if x.is_finite() && y.is_finite() {
        Some(Point2::new(a.x + x, a.y + y))
    } else {
        None
    }
}

/// Centroid of a triangle.
#[inline]
pub fn centroid(a: &Point2<f64>, b: &Point2<f64>, c: &Point2<f64>) -> Point2<f64> {
    Point2::from((a.coords + b.coords + c.coords) / 3.0)
}

/// Smallest interior angle of a triangle, in degrees.
///
/// Degenerate triangles (a zero-length edge) report 0.
pub fn min_angle_degrees(a: &Point2<f64>, b: &Point2<f64>, c: &Point2<f64>) -> f64 {
    let corner = |p: &Point2<f64>, q: &Point2<f64>, r: &Point2<f64>| {
        let u = q - p;
        let v = r - p;
        let denom = u.norm() * v.norm();
        if denom == 0.0 {
            return 0.0;
        }
        (u.dot(&v) / denom).clamp(-1.0, 1.0).acos().to_degrees()
    };
    corner(a, b, c).min(corner(b, c, a)).min(corner(c, a, b))
}
