//! 2D primitives used by the planar graph and the arrangement.
//!
//! - `Segment2`: closed segment with `[0, 1]` parameterisation.
//! - `Line2`: infinite line with unit direction (used by the cutter).
//! - `Aabb2`: axis-aligned bounds.
//! - `Affine2`: `x ↦ M x + t`.
//! - `intersect_segments`: tolerant segment/segment test (point or overlap).
//!
//! All predicates take an explicit distance tolerance; nothing here is exact.

use nalgebra::{Matrix2, Vector2};

use crate::cfg::{PARALLEL_EPS, ZERO_LEN_SQ};

/// 2D cross product (z of the 3D cross product).
#[inline]
pub fn perp(a: Vector2<f64>, b: Vector2<f64>) -> f64 {
    a.x * b.y - a.y * b.x
}

/// Angle of `d` in `[0, 2π)`.
#[inline]
pub fn angle_of(d: Vector2<f64>) -> f64 {
    let a = d.y.atan2(d.x);
    if a < 0.0 {
        a + std::f64::consts::TAU
    } else {
        a
    }
}

#[inline]
pub fn is_finite(p: Vector2<f64>) -> bool {
    p.x.is_finite() && p.y.is_finite()
}

/// Side of a point relative to a directed line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Negative,
    On,
    Positive,
}

impl Side {
    #[inline]
    fn classify(signed_dist: f64, tol: f64) -> Self {
        if signed_dist > tol {
            Side::Positive
        } else if signed_dist < -tol {
            Side::Negative
        } else {
            Side::On
        }
    }
}

/// Closed segment `a → b`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment2 {
    pub a: Vector2<f64>,
    pub b: Vector2<f64>,
}

impl Segment2 {
    #[inline]
    pub fn new(a: Vector2<f64>, b: Vector2<f64>) -> Self {
        Self { a, b }
    }
    #[inline]
    pub fn length(&self) -> f64 {
        (self.b - self.a).norm()
    }
    #[inline]
    pub fn center(&self) -> Vector2<f64> {
        (self.a + self.b) * 0.5
    }
    #[inline]
    pub fn point_at(&self, t: f64) -> Vector2<f64> {
        self.a + (self.b - self.a) * t
    }
    /// Unclamped parameter of the orthogonal projection of `p`.
    pub fn project(&self, p: Vector2<f64>) -> f64 {
        let d = self.b - self.a;
        let l2 = d.norm_squared();
        if l2 < ZERO_LEN_SQ {
            0.0
        } else {
            (p - self.a).dot(&d) / l2
        }
    }
    pub fn distance(&self, p: Vector2<f64>) -> f64 {
        let t = self.project(p).clamp(0.0, 1.0);
        (self.point_at(t) - p).norm()
    }
    /// Signed distance of `p` to the supporting line; positive to the left of `a → b`.
    pub fn signed_distance(&self, p: Vector2<f64>) -> f64 {
        let d = self.b - self.a;
        let l = d.norm();
        if l * l < ZERO_LEN_SQ {
            return (p - self.a).norm();
        }
        perp(d, p - self.a) / l
    }
    #[inline]
    pub fn which_side(&self, p: Vector2<f64>, tol: f64) -> Side {
        Side::classify(self.signed_distance(p), tol)
    }
}

/// Infinite line through `origin` with unit `direction`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Line2 {
    pub origin: Vector2<f64>,
    pub direction: Vector2<f64>,
}

impl Line2 {
    /// `None` if `direction` is (numerically) zero.
    pub fn new(origin: Vector2<f64>, direction: Vector2<f64>) -> Option<Self> {
        let l2 = direction.norm_squared();
        if l2 < ZERO_LEN_SQ || !l2.is_finite() {
            return None;
        }
        Some(Self {
            origin,
            direction: direction / l2.sqrt(),
        })
    }
    pub fn through(a: Vector2<f64>, b: Vector2<f64>) -> Option<Self> {
        Self::new(a, b - a)
    }
    #[inline]
    pub fn signed_distance(&self, p: Vector2<f64>) -> f64 {
        perp(self.direction, p - self.origin)
    }
    #[inline]
    pub fn which_side(&self, p: Vector2<f64>, tol: f64) -> Side {
        Side::classify(self.signed_distance(p), tol)
    }
    /// Arc-length parameter of the projection of `p`.
    #[inline]
    pub fn param(&self, p: Vector2<f64>) -> f64 {
        (p - self.origin).dot(&self.direction)
    }
    #[inline]
    pub fn point_at(&self, s: f64) -> Vector2<f64> {
        self.origin + self.direction * s
    }
    /// Intersection with segment `seg`; `None` if parallel.
    ///
    /// Returns the parameter along `seg` (unclamped).
    pub fn intersect_segment_param(&self, seg: &Segment2) -> Option<f64> {
        let d = seg.b - seg.a;
        let denom = perp(self.direction, d);
        if denom.abs() <= PARALLEL_EPS * d.norm() {
            return None;
        }
        Some(-perp(self.direction, seg.a - self.origin) / denom)
    }
}

/// Axis-aligned bounding box; `Aabb2::empty()` has `min > max`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb2 {
    pub min: Vector2<f64>,
    pub max: Vector2<f64>,
}

impl Default for Aabb2 {
    fn default() -> Self {
        Self::empty()
    }
}

impl Aabb2 {
    pub fn empty() -> Self {
        Self {
            min: Vector2::new(f64::INFINITY, f64::INFINITY),
            max: Vector2::new(f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }
    pub fn from_points<I: IntoIterator<Item = Vector2<f64>>>(pts: I) -> Self {
        let mut b = Self::empty();
        for p in pts {
            b.extend(p);
        }
        b
    }
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y
    }
    #[inline]
    pub fn extend(&mut self, p: Vector2<f64>) {
        self.min = self.min.inf(&p);
        self.max = self.max.sup(&p);
    }
    pub fn width(&self) -> f64 {
        if self.is_empty() {
            0.0
        } else {
            self.max.x - self.min.x
        }
    }
    pub fn height(&self) -> f64 {
        if self.is_empty() {
            0.0
        } else {
            self.max.y - self.min.y
        }
    }
    pub fn max_dim(&self) -> f64 {
        self.width().max(self.height())
    }
    pub fn contains(&self, p: Vector2<f64>) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
}

/// 2D affine map: `x ↦ M x + t`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Affine2 {
    pub m: Matrix2<f64>,
    pub t: Vector2<f64>,
}

impl Affine2 {
    #[inline]
    pub fn translation(t: Vector2<f64>) -> Self {
        Self {
            m: Matrix2::identity(),
            t,
        }
    }
    /// Counter-clockwise rotation by `theta` radians about the origin.
    pub fn rotation(theta: f64) -> Self {
        let (s, c) = theta.sin_cos();
        Self {
            m: Matrix2::new(c, -s, s, c),
            t: Vector2::zeros(),
        }
    }
    #[inline]
    pub fn apply(&self, p: Vector2<f64>) -> Vector2<f64> {
        self.m * p + self.t
    }
}

/// Segment/segment intersection result. Parameters are in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SegmentIntersection {
    Empty,
    /// Single point; `t0` on the first segment, `t1` on the second.
    Point { p: Vector2<f64>, t0: f64, t1: f64 },
    /// Colinear overlap `[t0[0], t0[1]]` along the first segment.
    Overlap {
        p0: Vector2<f64>,
        p1: Vector2<f64>,
        t0: [f64; 2],
    },
}

impl SegmentIntersection {
    #[inline]
    pub fn is_empty(&self) -> bool {
        matches!(self, SegmentIntersection::Empty)
    }
}

/// Tolerant intersection of `s0` and `s1`.
///
/// `tol` is a distance: endpoints within `tol` of the other segment count as
/// touching, and colinear overlaps no longer than `tol` collapse to a point.
pub fn intersect_segments(s0: &Segment2, s1: &Segment2, tol: f64) -> SegmentIntersection {
    let d0 = s0.b - s0.a;
    let d1 = s1.b - s1.a;
    let l0 = d0.norm();
    let l1 = d1.norm();
    if l0 * l0 < ZERO_LEN_SQ {
        return point_vs_segment(s0.a, s1, tol, false);
    }
    if l1 * l1 < ZERO_LEN_SQ {
        return point_vs_segment(s1.a, s0, tol, true);
    }
    let w = s1.a - s0.a;
    let denom = perp(d0, d1);
    if denom.abs() > PARALLEL_EPS * l0 * l1 {
        let t0 = perp(w, d1) / denom;
        let t1 = perp(w, d0) / denom;
        let (s0_slack, s1_slack) = (tol / l0, tol / l1);
        if (-s0_slack..=1.0 + s0_slack).contains(&t0) && (-s1_slack..=1.0 + s1_slack).contains(&t1)
        {
            let t0 = t0.clamp(0.0, 1.0);
            return SegmentIntersection::Point {
                p: s0.point_at(t0),
                t0,
                t1: t1.clamp(0.0, 1.0),
            };
        }
        return nearest_endpoint_touch(s0, s1, tol);
    }

    // parallel: colinear within tol?
    if (perp(d0, w) / l0).abs() > tol {
        return SegmentIntersection::Empty;
    }
    let u0 = s0.project(s1.a);
    let u1 = s0.project(s1.b);
    let lo = u0.min(u1).max(0.0);
    let hi = u0.max(u1).min(1.0);
    if hi < lo - tol / l0 {
        return SegmentIntersection::Empty;
    }
    if (hi - lo) * l0 <= tol {
        let t0 = (0.5 * (lo + hi)).clamp(0.0, 1.0);
        let p = s0.point_at(t0);
        return SegmentIntersection::Point {
            p,
            t0,
            t1: s1.project(p).clamp(0.0, 1.0),
        };
    }
    SegmentIntersection::Overlap {
        p0: s0.point_at(lo),
        p1: s0.point_at(hi),
        t0: [lo, hi],
    }
}

fn point_vs_segment(p: Vector2<f64>, seg: &Segment2, tol: f64, p_is_second: bool) -> SegmentIntersection {
    if seg.distance(p) > tol {
        return SegmentIntersection::Empty;
    }
    let t = seg.project(p).clamp(0.0, 1.0);
    let (t0, t1) = if p_is_second { (t, 0.0) } else { (0.0, t) };
    SegmentIntersection::Point { p, t0, t1 }
}

// Lines cross outside both segments but an endpoint may still lie within `tol`.
fn nearest_endpoint_touch(s0: &Segment2, s1: &Segment2, tol: f64) -> SegmentIntersection {
    let candidates = [
        (s1.a, s0.distance(s1.a)),
        (s1.b, s0.distance(s1.b)),
        (s0.a, s1.distance(s0.a)),
        (s0.b, s1.distance(s0.b)),
    ];
    let best = candidates
        .into_iter()
        .filter(|&(_, d)| d <= tol)
        .min_by(|x, y| x.1.partial_cmp(&y.1).unwrap_or(std::cmp::Ordering::Equal));
    match best {
        Some((p, _)) => SegmentIntersection::Point {
            p,
            t0: s0.project(p).clamp(0.0, 1.0),
            t1: s1.project(p).clamp(0.0, 1.0),
        },
        None => SegmentIntersection::Empty,
    }
}

/// Signed area of a closed loop; positive for counter-clockwise (y up).
pub fn signed_area(pts: &[Vector2<f64>]) -> f64 {
    let n = pts.len();
    if n < 3 {
        return 0.0;
    }
    let mut a = 0.0;
    for i in 0..n {
        a += perp(pts[i], pts[(i + 1) % n]);
    }
    0.5 * a
}

/// Even-odd point-in-polygon test on a closed loop.
pub fn polygon_contains(pts: &[Vector2<f64>], p: Vector2<f64>) -> bool {
    let n = pts.len();
    if n < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let (pi, pj) = (pts[i], pts[j]);
        if (pi.y > p.y) != (pj.y > p.y) {
            let x = pj.x + (p.y - pj.y) * (pi.x - pj.x) / (pi.y - pj.y);
            if p.x < x {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}
