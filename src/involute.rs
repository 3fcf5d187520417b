//! Closed-form involute geometry.
//!
//! The cutting simulation never uses these to build the flank; they are the oracle the
//! swept envelope is checked against, and the yardstick for measuring undercut.

use crate::float_types::{FRAC_PI_2, Real};
use crate::resolve::DerivedGeometry;

/// The involute function `inv(α) = tan(α) − α`.
#[inline]
pub fn involute(angle: Real) -> Real {
    angle.tan() - angle
}

/// Inverse of [`involute`] on `[0, π/2)`.
///
/// Safeguarded Newton iteration: a Newton step that leaves the current bracket is
/// replaced by bisection, so the result is always bracketed.
pub fn inverse_involute(value: Real) -> Real {
    if value <= 0.0 {
        return 0.0;
    }
    let mut lo: Real = 0.0;
    let mut hi: Real = FRAC_PI_2;
    // inv(a) ≈ a³/3 for small a
    let mut a = (3.0 * value).cbrt().min(0.5 * FRAC_PI_2);
    for _ in 0..64 {
        let f = involute(a) - value;
        if f > 0.0 {
            hi = a;
        } else {
            lo = a;
        }
        let slope = a.tan().powi(2);
        let newton = a - f / slope;
        let next = if slope > 0.0 && newton > lo && newton < hi {
            newton
        } else {
            0.5 * (lo + hi)
        };
        if (next - a).abs() <= Real::EPSILON * a.max(1.0) {
            return next;
        }
        a = next;
    }
    a
}

/// Classic parametric involute of a circle.
///
/// # Parameters
/// - `rb`: base-circle radius
/// - `roll`: roll angle φ (unwound angle of the taut string)
///
/// x = rb( cosφ + φ·sinφ )
/// y = rb( sinφ – φ·cosφ )
#[inline]
pub fn involute_xy(rb: Real, roll: Real) -> (Real, Real) {
    (
        rb * (roll.cos() + roll * roll.sin()),
        rb * (roll.sin() - roll * roll.cos()),
    )
}

/// Roll angle φ at which the involute of `rb` reaches radius `r`: φ = sqrt((r/rb)² − 1).
#[inline]
pub fn roll_angle_at_radius(r: Real, rb: Real) -> Real {
    ((r / rb).powi(2) - 1.0).max(0.0).sqrt()
}

/// Arc length of the involute from the base circle out to radius `r`: rb·φ²/2.
#[inline]
pub fn involute_arc_length(rb: Real, r: Real) -> Real {
    let roll = roll_angle_at_radius(r, rb);
    0.5 * rb * roll * roll
}

/// Profile angle of the involute at radius `r` (0 on the base circle).
#[inline]
pub fn pressure_angle_at(r: Real, rb: Real) -> Real {
    (rb / r).clamp(-1.0, 1.0).acos()
}

/// Angular half-thickness of the ideal involute tooth at `radius`, or `None` inside the
/// base circle where no involute exists.
pub fn flank_half_angle(geometry: &DerivedGeometry, radius: Real) -> Option<Real> {
    let rb = geometry.base_radius;
    if radius < rb {
        return None;
    }
    Some(
        geometry.half_tooth_angle + involute(geometry.pressure_angle)
            - involute(pressure_angle_at(radius, rb)),
    )
}

/// Inverse of [`flank_half_angle`]: the radius at which the ideal flank sits
/// `half_angle` away from the tooth centre line. `None` when that flank point would lie
/// inside the base circle.
pub fn flank_radius_at(geometry: &DerivedGeometry, half_angle: Real) -> Option<Real> {
    let target = geometry.half_tooth_angle + involute(geometry.pressure_angle) - half_angle;
    if target < 0.0 {
        return None;
    }
    Some(geometry.base_radius / inverse_involute(target).cos())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::GearSpec;

    #[test]
    fn inverse_involute_round_trips() {
        for deg in [0.5, 5.0, 14.5, 20.0, 25.0, 40.0, 60.0, 80.0] {
            let a = (deg as Real).to_radians();
            let back = inverse_involute(involute(a));
            assert!((back - a).abs() < 1e-9, "{deg}: {back} vs {a}");
        }
        assert_eq!(inverse_involute(0.0), 0.0);
    }

    #[test]
    fn parametric_involute_matches_polar_form() {
        let rb = 10.0;
        for roll in [0.1, 0.4, 0.8] {
            let (x, y) = involute_xy(rb, roll);
            let r = (x * x + y * y).sqrt();
            assert!((roll_angle_at_radius(r, rb) - roll).abs() < 1e-9);
            // polar angle of the involute point is inv(profile angle)
            let polar = y.atan2(x);
            assert!((polar - involute(pressure_angle_at(r, rb))).abs() < 1e-9);
        }
    }

    #[test]
    fn flank_is_half_thickness_on_pitch_circle() {
        let g = GearSpec::new(2.0, 24).resolve().unwrap();
        let half = flank_half_angle(&g, g.pitch_radius).unwrap();
        assert!((half - g.half_tooth_angle).abs() < 1e-12);
        let r = flank_radius_at(&g, half).unwrap();
        assert!((r - g.pitch_radius).abs() < 1e-9);
        assert!(flank_half_angle(&g, 0.9 * g.base_radius).is_none());
    }
}
