//! External tangent lines between two circles on the Mercator plane.

use serde::{Deserialize, Serialize};

use crate::projection::PlanarPoint;

/// Points where one external tangent touches circle 1 (`p1`) and circle 2 (`p2`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TangentPair {
    pub p1: PlanarPoint,
    pub p2: PlanarPoint,
}

/// Why a consecutive pair of samples does or does not produce a strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentOutcome {
    /// Two external tangents exist; a strip is emitted.
    Strip,
    /// Both samples sit at the same point; no direction to follow.
    CoincidentCenters,
    /// One circle lies strictly inside the other.
    NestedCircles,
}

/// Feasibility test shared by [`external_tangents`] and the segment diagnostics.
pub fn classify_segment(c1: PlanarPoint, r1: f64, c2: PlanarPoint, r2: f64) -> SegmentOutcome {
    let d = c1.distance(c2);
    if d == 0.0 {
        SegmentOutcome::CoincidentCenters
    } else if d < (r2 - r1).abs() {
        SegmentOutcome::NestedCircles
    } else {
        SegmentOutcome::Strip
    }
}

/// The two external tangents of circles `(c1, r1)` and `(c2, r2)`.
///
/// Returns an empty vector when the centers coincide or one circle contains
/// the other. Otherwise returns exactly two pairs, side `s = +1` first and
/// `s = -1` second. Strip winding depends on that order.
pub fn external_tangents(c1: PlanarPoint, r1: f64, c2: PlanarPoint, r2: f64) -> Vec<TangentPair> {
    if classify_segment(c1, r1, c2, r2) != SegmentOutcome::Strip {
        return Vec::new();
    }

    let delta = c2 - c1;
    let d = delta.length();
    let u = delta * (1.0 / d);
    let p = u.perp();

    // n·u = (r2 - r1) / D for an external tangent with unit normal n.
    let k = (r2 - r1) / d;
    // Radicand can dip below zero by rounding when D ≈ |r2 - r1|.
    let h = (1.0 - k * k).max(0.0).sqrt();

    [1.0, -1.0]
        .iter()
        .map(|&s| {
            let n = u * k + p * (s * h);
            TangentPair {
                p1: c1 - n * r1,
                p2: c2 - n * r2,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn pt(x: f64, y: f64) -> PlanarPoint {
        PlanarPoint::new(x, y)
    }

    #[test]
    fn separated_circles_give_two_pairs() {
        let pairs = external_tangents(pt(0.0, 0.0), 10.0, pt(100.0, 0.0), 30.0);
        assert_eq!(pairs.len(), 2);
    }

    #[test]
    fn coincident_centers_give_none() {
        assert!(external_tangents(pt(5.0, 5.0), 1.0, pt(5.0, 5.0), 2.0).is_empty());
        assert!(external_tangents(pt(5.0, 5.0), 0.0, pt(5.0, 5.0), 0.0).is_empty());
    }

    #[test]
    fn nested_circles_give_none() {
        let pairs = external_tangents(pt(0.0, 0.0), 100.0, pt(10.0, 0.0), 5.0);
        assert!(pairs.is_empty());
        assert_eq!(
            classify_segment(pt(0.0, 0.0), 100.0, pt(10.0, 0.0), 5.0),
            SegmentOutcome::NestedCircles
        );
    }

    #[test]
    fn internally_tangent_circles_still_resolve() {
        // D == |r2 - r1| exactly: h clamps to 0 and both tangents coincide.
        let pairs = external_tangents(pt(0.0, 0.0), 10.0, pt(20.0, 0.0), 30.0);
        assert_eq!(pairs.len(), 2);
        for pair in &pairs {
            assert!(pair.p1.x.is_finite() && pair.p1.y.is_finite());
            assert!(pair.p2.x.is_finite() && pair.p2.y.is_finite());
        }
        assert_abs_diff_eq!(pairs[0].p1.x, pairs[1].p1.x, epsilon = 1e-9);
        assert_abs_diff_eq!(pairs[0].p1.y, pairs[1].p1.y, epsilon = 1e-9);
    }

    #[test]
    fn tangency_points_lie_on_circles() {
        let cases = [
            (pt(0.0, 0.0), 10.0, pt(100.0, 0.0), 30.0),
            (pt(-50.0, 20.0), 0.0, pt(40.0, -70.0), 25.0),
            (pt(1.0e6, 2.0e6), 20_000.0, pt(1.05e6, 2.06e6), 10_000.0),
            (pt(0.0, 0.0), 5.0, pt(0.0, 8.0), 5.0),
        ];
        for (c1, r1, c2, r2) in cases {
            let pairs = external_tangents(c1, r1, c2, r2);
            assert_eq!(pairs.len(), 2);
            for pair in pairs {
                let tol = 1e-9 * (1.0 + r1.max(r2) + c1.length().max(c2.length()));
                assert_abs_diff_eq!(pair.p1.distance(c1), r1, epsilon = tol);
                assert_abs_diff_eq!(pair.p2.distance(c2), r2, epsilon = tol);
            }
        }
    }

    #[test]
    fn tangent_line_is_perpendicular_to_radii() {
        let (c1, r1, c2, r2) = (pt(0.0, 0.0), 10.0, pt(100.0, 40.0), 25.0);
        for pair in external_tangents(c1, r1, c2, r2) {
            let line = pair.p2 - pair.p1;
            let scale = line.length();
            assert_abs_diff_eq!((pair.p1 - c1).dot(line) / scale, 0.0, epsilon = 1e-9);
            assert_abs_diff_eq!((pair.p2 - c2).dot(line) / scale, 0.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn equal_radii_tangents_are_parallel_to_center_line() {
        let (c1, c2, r) = (pt(0.0, 0.0), pt(30.0, 40.0), 7.0);
        let d = c2 - c1;
        let pairs = external_tangents(c1, r, c2, r);
        assert_eq!(pairs.len(), 2);
        for pair in &pairs {
            assert_abs_diff_eq!((pair.p1 - c1).dot(d), 0.0, epsilon = 1e-9);
            assert_abs_diff_eq!((pair.p2 - pair.p1).perp_dot(d), 0.0, epsilon = 1e-9);
        }
        let a = pairs[0].p2 - pairs[0].p1;
        let b = pairs[1].p2 - pairs[1].p1;
        assert_abs_diff_eq!(a.perp_dot(b), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn sides_are_ordered_positive_then_negative() {
        // Center line along +x: p = (0, 1). Side s = +1 has normal n = (0, 1)
        // for equal radii, so its tangency point sits below the axis.
        let pairs = external_tangents(pt(0.0, 0.0), 2.0, pt(10.0, 0.0), 2.0);
        assert_abs_diff_eq!(pairs[0].p1.y, -2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(pairs[1].p1.y, 2.0, epsilon = 1e-12);
    }

    #[test]
    fn zero_radius_start_collapses_to_center() {
        let c1 = pt(3.0, 4.0);
        for pair in external_tangents(c1, 0.0, pt(100.0, 4.0), 20.0) {
            assert_eq!(pair.p1, c1);
        }
    }
}
