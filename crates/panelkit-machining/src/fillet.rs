//! Fillet Calculator
//!
//! Rounds the corner between two straight segments `start -> corner` and
//! `corner -> end` with a tangent arc of a given radius.
//!
//! Both lines are offset by the radius toward the inside of the turn. The
//! offset lines meet at a point that is `radius` away from both segments;
//! projecting it back onto each segment gives the tangent points. The arc
//! center is then rebuilt from the chord between the tangent points.

use panelkit_core::{
    FilletDegeneracy, FilletError, FilletResult, Line, Point, Tolerances, Vector2,
};
use serde::{Deserialize, Serialize};

/// Solved fillet geometry for one corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FilletPoints {
    /// Tangent point on `start -> corner`. The first segment now ends here.
    pub first_tangent: Point,
    /// Tangent point on `corner -> end`. The second segment now starts here.
    pub second_tangent: Point,
    /// Arc center, `radius` away from both tangent points.
    pub center: Point,
    /// `true` when the path turns left at the corner.
    pub counter_clockwise: bool,
}

/// Computes tangent points and arc centers for corner fillets
#[derive(Debug, Clone, Default)]
pub struct FilletCalculator {
    tolerances: Tolerances,
}

impl FilletCalculator {
    /// Create a calculator with the given tolerances
    pub fn new(tolerances: Tolerances) -> Self {
        Self { tolerances }
    }

    pub fn tolerances(&self) -> &Tolerances {
        &self.tolerances
    }

    /// Solve the fillet of `radius` at `corner`.
    pub fn fillet_points(
        &self,
        start: Point,
        corner: Point,
        end: Point,
        radius: f64,
    ) -> FilletResult<FilletPoints> {
        let fail = |reason: FilletDegeneracy| FilletError::InvalidFillet {
            start,
            corner,
            end,
            reason,
        };

        if !radius.is_finite() || radius <= 0.0 {
            return Err(fail(FilletDegeneracy::InvalidRadius));
        }
        if !start.is_finite() || !corner.is_finite() || !end.is_finite() {
            return Err(fail(FilletDegeneracy::NonFinite));
        }

        let line1 = Line::new(start, corner);
        let line2 = Line::new(corner, end);
        let len1 = line1.length();
        let len2 = line2.length();
        if len1 <= self.tolerances.length_tolerance || len2 <= self.tolerances.length_tolerance {
            return Err(fail(FilletDegeneracy::ZeroLengthSegment));
        }

        let (u1, u2) = match (line1.unit_direction(), line2.unit_direction()) {
            (Some(u1), Some(u2)) => (u1, u2),
            _ => return Err(fail(FilletDegeneracy::ZeroLengthSegment)),
        };

        let counter_clockwise = u1.cross(&u2) > 0.0;
        let inward = |u: Vector2| {
            if counter_clockwise {
                u.perp_left()
            } else {
                u.perp_right()
            }
        };

        let offset1 = line1.translated(inward(u1) * radius);
        let offset2 = line2.translated(inward(u2) * radius);

        let denominator = u1.x * u2.y - u2.x * u1.y;
        if denominator.abs() <= self.tolerances.parallel_tolerance {
            return Err(fail(FilletDegeneracy::Collinear));
        }

        // Offset line intersection, as distances along each segment.
        let w = offset2.a - offset1.a;
        let s = (w.x * u2.y - w.y * u2.x) / denominator;
        let t = (w.x * u1.y - w.y * u1.x) / denominator;

        let first_tangent = start + u1 * s;
        let second_tangent = corner + u2 * t;
        if !first_tangent.is_finite() || !second_tangent.is_finite() {
            return Err(fail(FilletDegeneracy::NonFinite));
        }

        let slack = self.tolerances.length_tolerance;
        if s < -slack || s > len1 + slack || t < -slack || t > len2 + slack {
            return Err(fail(FilletDegeneracy::RadiusTooLarge));
        }

        let center = chord_center(first_tangent, second_tangent, radius, counter_clockwise)
            .ok_or_else(|| fail(FilletDegeneracy::RadiusTooLarge))?;
        if !center.is_finite() {
            return Err(fail(FilletDegeneracy::NonFinite));
        }

        tracing::trace!(
            "Fillet r={} at {}: tangents {} and {}, center {}, ccw={}",
            radius,
            corner,
            first_tangent,
            second_tangent,
            center,
            counter_clockwise
        );

        Ok(FilletPoints {
            first_tangent,
            second_tangent,
            center,
            counter_clockwise,
        })
    }
}

/// Center of the arc of `radius` through both tangent points.
///
/// Of the two circles through the chord, the one on the left of
/// `first -> second` belongs to a counter-clockwise arc.
fn chord_center(first: Point, second: Point, radius: f64, counter_clockwise: bool) -> Option<Point> {
    let chord = second - first;
    let half = chord.length() / 2.0;
    let h2 = radius * radius - half * half;
    if h2 < -(radius * radius * 1e-9) {
        return None;
    }
    let h = h2.max(0.0).sqrt();

    let mid = first.midpoint(&second);
    let Some(dir) = chord.normalized() else {
        // Tangent points coincide only for a vanishing arc.
        return None;
    };
    let side = if counter_clockwise {
        dir.perp_left()
    } else {
        dir.perp_right()
    };
    Some(mid + side * h)
}

/// Solve a fillet with default tolerances.
pub fn get_fillet_points(
    start: Point,
    corner: Point,
    end: Point,
    radius: f64,
) -> FilletResult<FilletPoints> {
    FilletCalculator::default().fillet_points(start, corner, end, radius)
}
