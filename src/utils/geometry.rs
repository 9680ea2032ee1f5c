//! Coordinate rectification: exact four-point projective transforms

use crate::error::{CornerSide, GeometryError};
use crate::models::{CornerCorrespondence, Point};

/// Minimum |sin| of the angle at a corner before three points count as collinear
const COLLINEAR_SINE_TOL: f64 = 1e-6;
/// Relative separation below which two points count as coincident
const COINCIDENT_REL_TOL: f64 = 1e-9;
/// Smallest usable pivot in the normalized 8x8 system
const PIVOT_EPS: f64 = 1e-12;
/// Homogeneous scale below which a point maps to infinity
const W_EPS: f64 = 1e-12;

/// Perspective transformation matrix (3x3), normalized so `a33 == 1`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerspectiveTransform {
    a11: f64,
    a12: f64,
    a13: f64,
    a21: f64,
    a22: f64,
    a23: f64,
    a31: f64,
    a32: f64,
    a33: f64,
}

impl PerspectiveTransform {
    /// The identity transform
    pub fn identity() -> Self {
        Self::from_matrix([[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]])
    }

    /// Pure translation by `(dx, dy)`
    pub fn translation(dx: f64, dy: f64) -> Self {
        Self::from_matrix([[1.0, 0.0, dx], [0.0, 1.0, dy], [0.0, 0.0, 1.0]])
    }

    fn from_matrix(m: [[f64; 3]; 3]) -> Self {
        Self {
            a11: m[0][0],
            a12: m[0][1],
            a13: m[0][2],
            a21: m[1][0],
            a22: m[1][1],
            a23: m[1][2],
            a31: m[2][0],
            a32: m[2][1],
            a33: m[2][2],
        }
    }

    /// Estimate the transform mapping the correspondence's layout corners onto its image corners
    pub fn from_correspondence(c: &CornerCorrespondence) -> Result<Self, GeometryError> {
        Self::from_points(&c.layout, &c.image)
    }

    /// Create transform from 4 source points to 4 destination points.
    ///
    /// Fails instead of returning a near-singular matrix when any two points
    /// on a side coincide or any three are collinear.
    pub fn from_points(src: &[Point; 4], dst: &[Point; 4]) -> Result<Self, GeometryError> {
        validate_quad(src, CornerSide::Layout)?;
        validate_quad(dst, CornerSide::Image)?;

        // Condition both sides before the direct linear transform so pivots
        // are comparable regardless of pixel scale.
        let (src_n, t_src) = normalize(src);
        let (dst_n, t_dst) = normalize(dst);

        let mut a = [[0.0f64; 8]; 8];
        let mut b = [0.0f64; 8];

        for i in 0..4 {
            let (sx, sy) = (src_n[i].x, src_n[i].y);
            let (dx, dy) = (dst_n[i].x, dst_n[i].y);

            let row = i * 2;
            a[row] = [sx, sy, 1.0, 0.0, 0.0, 0.0, -dx * sx, -dx * sy];
            b[row] = dx;
            a[row + 1] = [0.0, 0.0, 0.0, sx, sy, 1.0, -dy * sx, -dy * sy];
            b[row + 1] = dy;
        }

        let h = solve_linear_system(&a, &b).ok_or(GeometryError::Singular)?;
        let normalized = Self {
            a11: h[0],
            a12: h[1],
            a13: h[2],
            a21: h[3],
            a22: h[4],
            a23: h[5],
            a31: h[6],
            a32: h[7],
            a33: 1.0,
        };

        // H = T_dst^-1 * Hn * T_src
        let t_dst_inv = t_dst.inverse().ok_or(GeometryError::Singular)?;
        let full = t_dst_inv.compose(&normalized.compose(&t_src));
        full.normalized().ok_or(GeometryError::Singular)
    }

    /// Row-major coefficients
    pub fn matrix(&self) -> [[f64; 3]; 3] {
        [
            [self.a11, self.a12, self.a13],
            [self.a21, self.a22, self.a23],
            [self.a31, self.a32, self.a33],
        ]
    }

    /// Determinant of the 3x3 matrix
    pub fn determinant(&self) -> f64 {
        self.a11 * (self.a22 * self.a33 - self.a23 * self.a32)
            - self.a12 * (self.a21 * self.a33 - self.a23 * self.a31)
            + self.a13 * (self.a21 * self.a32 - self.a22 * self.a31)
    }

    /// Inverse transform, `None` when the matrix is singular
    pub fn inverse(&self) -> Option<Self> {
        let det = self.determinant();
        if !det.is_finite() || det.abs() < f64::MIN_POSITIVE {
            return None;
        }
        let inv = [
            [
                (self.a22 * self.a33 - self.a23 * self.a32) / det,
                (self.a13 * self.a32 - self.a12 * self.a33) / det,
                (self.a12 * self.a23 - self.a13 * self.a22) / det,
            ],
            [
                (self.a23 * self.a31 - self.a21 * self.a33) / det,
                (self.a11 * self.a33 - self.a13 * self.a31) / det,
                (self.a13 * self.a21 - self.a11 * self.a23) / det,
            ],
            [
                (self.a21 * self.a32 - self.a22 * self.a31) / det,
                (self.a12 * self.a31 - self.a11 * self.a32) / det,
                (self.a11 * self.a22 - self.a12 * self.a21) / det,
            ],
        ];
        Self::from_matrix(inv).normalized()
    }

    /// `self * other`: apply `other` first, then `self`
    pub fn compose(&self, other: &Self) -> Self {
        let a = self.matrix();
        let b = other.matrix();
        let mut m = [[0.0f64; 3]; 3];
        for (i, row) in m.iter_mut().enumerate() {
            for (j, cell) in row.iter_mut().enumerate() {
                *cell = (0..3).map(|k| a[i][k] * b[k][j]).sum();
            }
        }
        Self::from_matrix(m)
    }

    /// Rescale so `a33 == 1`; `None` if that is impossible or any entry is non-finite
    fn normalized(&self) -> Option<Self> {
        let s = self.a33;
        if !s.is_finite() || s.abs() < W_EPS {
            return None;
        }
        let m = self.matrix().map(|row| row.map(|v| v / s));
        if m.iter().flatten().all(|v| v.is_finite()) {
            Some(Self::from_matrix(m))
        } else {
            None
        }
    }

    /// Homogeneous image of `(x, y)` as `(x', y', w)`
    #[inline]
    pub fn apply_homogeneous(&self, x: f64, y: f64) -> (f64, f64, f64) {
        (
            self.a11 * x + self.a12 * y + self.a13,
            self.a21 * x + self.a22 * y + self.a23,
            self.a31 * x + self.a32 * y + self.a33,
        )
    }

    /// Transform a point using this perspective matrix.
    ///
    /// Returns `None` for points mapped to (or near) the line at infinity.
    pub fn transform(&self, p: &Point) -> Option<Point> {
        let (x, y, w) = self.apply_homogeneous(p.x, p.y);
        if w.abs() < W_EPS {
            return None;
        }
        Some(Point::new(x / w, y / w))
    }
}

fn validate_quad(points: &[Point; 4], side: CornerSide) -> Result<(), GeometryError> {
    if !points.iter().all(Point::is_finite) {
        return Err(GeometryError::NonFinite);
    }

    let mut max_dist = 0.0f64;
    for i in 0..4 {
        for j in (i + 1)..4 {
            max_dist = max_dist.max(points[i].distance(&points[j]));
        }
    }
    for i in 0..4 {
        for j in (i + 1)..4 {
            if points[i].distance(&points[j]) <= COINCIDENT_REL_TOL * max_dist.max(1.0) {
                return Err(GeometryError::CoincidentPoints {
                    side,
                    first: i,
                    second: j,
                });
            }
        }
    }

    const TRIPLES: [[usize; 3]; 4] = [[0, 1, 2], [0, 1, 3], [0, 2, 3], [1, 2, 3]];
    for [i, j, k] in TRIPLES {
        let (p, q, r) = (&points[i], &points[j], &points[k]);
        // Near-zero sine at any vertex means the triangle has collapsed
        let sine = [(p, q, r), (q, p, r), (r, p, q)]
            .into_iter()
            .map(|(o, a, b)| o.cross(a, b).abs() / (o.distance(a) * o.distance(b)))
            .fold(f64::INFINITY, f64::min);
        if sine <= COLLINEAR_SINE_TOL {
            return Err(GeometryError::CollinearPoints {
                side,
                indices: [i, j, k],
            });
        }
    }
    Ok(())
}

/// Translate the centroid to the origin and scale mean distance to sqrt(2)
fn normalize(points: &[Point; 4]) -> ([Point; 4], PerspectiveTransform) {
    let cx = points.iter().map(|p| p.x).sum::<f64>() / 4.0;
    let cy = points.iter().map(|p| p.y).sum::<f64>() / 4.0;
    let centroid = Point::new(cx, cy);
    let mean = points.iter().map(|p| p.distance(&centroid)).sum::<f64>() / 4.0;
    let s = std::f64::consts::SQRT_2 / mean;
    let t = PerspectiveTransform::from_matrix([
        [s, 0.0, -s * cx],
        [0.0, s, -s * cy],
        [0.0, 0.0, 1.0],
    ]);
    let out = points.map(|p| Point::new(s * (p.x - cx), s * (p.y - cy)));
    (out, t)
}

/// Solve 8x8 linear system using Gaussian elimination
#[allow(clippy::needless_range_loop)]
fn solve_linear_system(a: &[[f64; 8]; 8], b: &[f64; 8]) -> Option<[f64; 8]> {
    let mut a = *a;
    let mut b = *b;
    let n = 8;

    // Forward elimination
    for i in 0..n {
        // Find pivot
        let mut max_val = a[i][i].abs();
        let mut max_row = i;

        for k in (i + 1)..n {
            if a[k][i].abs() > max_val {
                max_val = a[k][i].abs();
                max_row = k;
            }
        }

        // Check for singular matrix
        if max_val < PIVOT_EPS {
            return None;
        }

        // Swap rows
        if max_row != i {
            a.swap(i, max_row);
            b.swap(i, max_row);
        }

        // Eliminate column
        for k in (i + 1)..n {
            let factor = a[k][i] / a[i][i];
            b[k] -= factor * b[i];

            for j in i..n {
                a[k][j] -= factor * a[i][j];
            }
        }
    }

    // Back substitution
    let mut x = [0.0f64; 8];
    for i in (0..n).rev() {
        let mut sum = b[i];
        for j in (i + 1)..n {
            sum -= a[i][j] * x[j];
        }
        x[i] = sum / a[i][i];
    }

    if x.iter().all(|v| v.is_finite()) {
        Some(x)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(l: f64, t: f64, r: f64, b: f64) -> [Point; 4] {
        [
            Point::new(l, t),
            Point::new(r, t),
            Point::new(r, b),
            Point::new(l, b),
        ]
    }

    fn assert_close(a: &Point, b: &Point, tol: f64) {
        assert!(
            a.distance(b) < tol,
            "expected ({}, {}) got ({}, {})",
            b.x,
            b.y,
            a.x,
            a.y
        );
    }

    #[test]
    fn test_scaling_transform() {
        let src = rect(0.0, 0.0, 100.0, 100.0);
        let dst = rect(0.0, 0.0, 50.0, 50.0);

        let t = PerspectiveTransform::from_points(&src, &dst).unwrap();
        let p = t.transform(&Point::new(50.0, 50.0)).unwrap();
        assert_close(&p, &Point::new(25.0, 25.0), 1e-9);
    }

    #[test]
    fn test_corners_round_trip_under_perspective() {
        let src = rect(0.0, 0.0, 1200.0, 800.0);
        let dst = [
            Point::new(102.5, 40.0),
            Point::new(590.0, 88.25),
            Point::new(610.0, 455.0),
            Point::new(64.0, 410.75),
        ];
        let t = PerspectiveTransform::from_points(&src, &dst).unwrap();
        for (s, d) in src.iter().zip(&dst) {
            assert_close(&t.transform(s).unwrap(), d, 1e-6);
        }
        // Genuinely projective, not affine
        assert!(t.matrix()[2][0].abs() > 1e-9 || t.matrix()[2][1].abs() > 1e-9);
    }

    #[test]
    fn test_inverse_undoes_transform() {
        let src = rect(10.0, 20.0, 300.0, 220.0);
        let dst = [
            Point::new(0.0, 5.0),
            Point::new(200.0, 0.0),
            Point::new(240.0, 180.0),
            Point::new(-10.0, 160.0),
        ];
        let t = PerspectiveTransform::from_points(&src, &dst).unwrap();
        let inv = t.inverse().unwrap();
        let p = Point::new(123.0, 77.0);
        let back = inv.transform(&t.transform(&p).unwrap()).unwrap();
        assert_close(&back, &p, 1e-8);
    }

    #[test]
    fn test_identity_correspondence() {
        let quad = rect(0.0, 0.0, 640.0, 480.0);
        let t = PerspectiveTransform::from_points(&quad, &quad).unwrap();
        let m = t.matrix();
        let id = PerspectiveTransform::identity().matrix();
        for i in 0..3 {
            for j in 0..3 {
                assert!((m[i][j] - id[i][j]).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_coincident_points_rejected() {
        let src = rect(0.0, 0.0, 100.0, 100.0);
        let mut dst = rect(0.0, 0.0, 50.0, 50.0);
        dst[2] = dst[1];
        let err = PerspectiveTransform::from_points(&src, &dst).unwrap_err();
        assert_eq!(
            err,
            GeometryError::CoincidentPoints {
                side: CornerSide::Image,
                first: 1,
                second: 2
            }
        );
    }

    #[test]
    fn test_collinear_points_rejected() {
        let src = [
            Point::new(0.0, 0.0),
            Point::new(50.0, 0.0),
            Point::new(100.0, 0.0),
            Point::new(0.0, 100.0),
        ];
        let dst = rect(0.0, 0.0, 50.0, 50.0);
        let err = PerspectiveTransform::from_points(&src, &dst).unwrap_err();
        assert!(matches!(
            err,
            GeometryError::CollinearPoints {
                side: CornerSide::Layout,
                indices: [0, 1, 2]
            }
        ));
    }

    #[test]
    fn test_nearly_collinear_points_rejected() {
        let src = rect(0.0, 0.0, 100.0, 100.0);
        let dst = [
            Point::new(0.0, 0.0),
            Point::new(500.0, 1e-7),
            Point::new(1000.0, 0.0),
            Point::new(0.0, 300.0),
        ];
        assert!(matches!(
            PerspectiveTransform::from_points(&src, &dst),
            Err(GeometryError::CollinearPoints { .. })
        ));
    }

    #[test]
    fn test_non_finite_rejected() {
        let src = rect(0.0, 0.0, 100.0, 100.0);
        let mut dst = rect(0.0, 0.0, 50.0, 50.0);
        dst[0].x = f64::NAN;
        assert_eq!(
            PerspectiveTransform::from_points(&src, &dst),
            Err(GeometryError::NonFinite)
        );
    }
}
