//! Cross-section of the generating rack tooth.
//!
//! Rack-local coordinates: `u` runs along the rolling pitch line, `v` points away from
//! the gear centre with `v = 0` on the rolling pitch line. The tooth is centred on
//! `u = 0` and points towards the blank (negative `v`).
//!
//! ```text
//!   (-w_top, v_top) ____________________ (w_top, v_top)     back (rack root line)
//!                   \                  /
//!                    \  flank (α)     /
//!                     \              /
//!                      (__________)                           tip fillets + tip line
//!                         v = v_tip
//! ```

use crate::float_types::{FRAC_PI_2, PI, Real, tolerance};
use crate::resolve::DerivedGeometry;
use nalgebra::Point2;

/// Which feature of the rack tooth a profile segment belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RackRegion {
    /// Straight flank at the pressure angle; generates the involute.
    Flank,
    /// Rounded tip corner; generates the trochoidal root fillet.
    Fillet,
    /// Flat tip line; cuts the dedendum circle.
    Tip,
    /// Rack root line closing the polygon; always clear of the blank.
    Back,
}

/// One rack tooth as a closed polyline. Segment `i` runs from point `i` to point
/// `i + 1` (wrapping) and is tagged with `regions[i]`.
#[derive(Debug, Clone, PartialEq)]
pub struct RackProfile {
    points: Vec<Point2<Real>>,
    regions: Vec<RackRegion>,
}

impl RackProfile {
    /// Build the rack tooth that cuts a gear with the given geometry.
    ///
    /// - half width on the reference line `v = x·m`: `π·m/4 + j/2`
    /// - tip line at `v = (x − hf)·m` (reaches the dedendum circle), or a pointed tip
    ///   where steep flanks meet above it
    /// - back at `v = (x + ha + max(c, 1/4))·m` (clear of the addendum circle)
    pub fn generate(geometry: &DerivedGeometry) -> Self {
        let m = geometry.module;
        let alpha = geometry.pressure_angle;
        let x = geometry.profile_shift;
        let tan_alpha = alpha.tan();

        let v_ref = x * m;
        let v_tip = geometry.rack_tip_depth;
        let v_top = (x + geometry.addendum_coefficient + geometry.clearance.max(0.25)) * m;
        let w_ref = 0.25 * PI * m + 0.5 * geometry.backlash;
        let w_tip = geometry.rack_tip_half_width;
        let w_top = w_ref + (v_top - v_ref) * tan_alpha;

        let rho = geometry.tip_radius;
        let fillet_segments = geometry.sampling.fillet_segments.max(2) as usize;

        let mut profile = Self {
            points: Vec::with_capacity(2 * fillet_segments + 6),
            regions: Vec::with_capacity(2 * fillet_segments + 6),
        };

        profile.push(Point2::new(-w_top, v_top), RackRegion::Flank);

        // shape thresholds scale with the module
        let eps = tolerance() * m;
        if rho > eps {
            // tangent length from the tip corner to either fillet tangency
            let t = rho / (0.25 * PI + 0.5 * alpha).tan();
            let centre_u = w_tip - t;
            let centre_v = v_tip + rho;
            let sweep = FRAC_PI_2 - alpha;

            // left fillet: from the flank tangency (angle π + α) down to the tip (3π/2)
            for i in 0..fillet_segments {
                let angle = PI + alpha + sweep * i as Real / fillet_segments as Real;
                profile.push(
                    Point2::new(-centre_u + rho * angle.cos(), centre_v + rho * angle.sin()),
                    RackRegion::Fillet,
                );
            }
            if centre_u > eps {
                profile.push(Point2::new(-centre_u, v_tip), RackRegion::Tip);
                profile.push(Point2::new(centre_u, v_tip), RackRegion::Fillet);
            } else {
                profile.push(Point2::new(0.0, v_tip), RackRegion::Fillet);
            }
            // right fillet: from the tip (−π/2) up to the flank tangency (−α)
            for i in 1..=fillet_segments {
                let angle = -FRAC_PI_2 + sweep * i as Real / fillet_segments as Real;
                let region = if i == fillet_segments {
                    RackRegion::Flank
                } else {
                    RackRegion::Fillet
                };
                profile.push(
                    Point2::new(centre_u + rho * angle.cos(), centre_v + rho * angle.sin()),
                    region,
                );
            }
        } else if w_tip > eps {
            profile.push(Point2::new(-w_tip, v_tip), RackRegion::Tip);
            profile.push(Point2::new(w_tip, v_tip), RackRegion::Flank);
        } else {
            profile.push(Point2::new(0.0, v_tip), RackRegion::Flank);
        }

        profile.push(Point2::new(w_top, v_top), RackRegion::Back);
        profile
    }

    fn push(&mut self, point: Point2<Real>, region: RackRegion) {
        self.points.push(point);
        self.regions.push(region);
    }

    pub fn points(&self) -> &[Point2<Real>] {
        &self.points
    }

    pub fn regions(&self) -> &[RackRegion] {
        &self.regions
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Segments of the closed polyline with their region tags.
    pub fn segments(&self) -> impl Iterator<Item = (Point2<Real>, Point2<Real>, RackRegion)> + '_ {
        let n = self.points.len();
        (0..n).map(move |i| (self.points[i], self.points[(i + 1) % n], self.regions[i]))
    }

    /// Largest |u| reached by the tooth.
    pub fn half_extent(&self) -> Real {
        self.points.iter().fold(0.0, |acc: Real, p| acc.max(p.x.abs()))
    }

    /// Lowest `v` of the tooth (the tip line).
    pub fn tip_depth(&self) -> Real {
        self.points.iter().fold(Real::MAX, |acc, p| acc.min(p.y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::GearSpec;

    fn width_at(profile: &RackProfile, v: Real) -> Real {
        // crossing of the horizontal line v with the closed polyline, right minus left
        let mut crossings: Vec<Real> = profile
            .segments()
            .filter(|(a, b, _)| (a.y - v) * (b.y - v) < 0.0)
            .map(|(a, b, _)| a.x + (v - a.y) / (b.y - a.y) * (b.x - a.x))
            .collect();
        crossings.sort_by(|a, b| a.partial_cmp(b).unwrap());
        crossings.last().unwrap() - crossings.first().unwrap()
    }

    #[test]
    fn rack_is_symmetric_and_spans_the_tooth_depth() {
        let g = GearSpec::new(2.0, 20).with_profile_shift(0.2).resolve().unwrap();
        let rack = RackProfile::generate(&g);
        for p in rack.points() {
            let mirrored = rack
                .points()
                .iter()
                .any(|q| (q.x + p.x).abs() < 1e-9 && (q.y - p.y).abs() < 1e-9);
            assert!(mirrored, "no mirror image for {p}");
        }
        // tip reaches the dedendum circle, back clears the addendum circle
        assert!((g.pitch_radius + rack.tip_depth() - g.dedendum_radius).abs() < 1e-9);
        let top = rack.points().iter().fold(Real::MIN, |acc, p| acc.max(p.y));
        assert!(g.pitch_radius + top > g.addendum_radius);
    }

    #[test]
    fn reference_width_grows_with_backlash() {
        let g = GearSpec::new(2.0, 20).resolve().unwrap();
        let w = width_at(&RackProfile::generate(&g), 0.0);
        assert!((w - PI).abs() < 1e-9, "{w}");

        let g = GearSpec::new(2.0, 20).with_backlash(0.1).resolve().unwrap();
        let w = width_at(&RackProfile::generate(&g), 0.0);
        assert!((w - (PI + 0.1)).abs() < 1e-9, "{w}");
    }

    #[test]
    fn flanks_follow_the_pressure_angle() {
        let g = GearSpec::new(3.0, 20).with_pressure_angle(25.0).resolve().unwrap();
        let rack = RackProfile::generate(&g);
        let flanks: Vec<_> = rack
            .segments()
            .filter(|(_, _, region)| *region == RackRegion::Flank)
            .collect();
        assert_eq!(flanks.len(), 2);
        for (a, b, _) in flanks {
            let slope = ((b.x - a.x) / (b.y - a.y)).abs();
            assert!((slope - g.pressure_angle.tan()).abs() < 1e-9);
        }
    }

    #[test]
    fn sharp_tip_without_fillet_radius() {
        let g = GearSpec::new(2.0, 20)
            .with_tip_radius_coefficient(0.0)
            .resolve()
            .unwrap();
        let rack = RackProfile::generate(&g);
        assert_eq!(rack.len(), 4);
        assert!(!rack.regions().contains(&RackRegion::Fillet));
    }

    #[test]
    fn steep_flanks_meet_in_an_apex() {
        let g = GearSpec::new(2.0, 30).with_pressure_angle(40.0).resolve().unwrap();
        let rack = RackProfile::generate(&g);
        assert_eq!(rack.len(), 3);
        assert_eq!(rack.points()[1], Point2::new(0.0, g.rack_tip_depth));
        assert!(!rack.regions().contains(&RackRegion::Tip));
        assert!(g.pitch_radius + rack.tip_depth() > g.dedendum_radius);
        assert!((width_at(&rack, g.profile_shift * g.module) - 0.5 * PI * g.module).abs() < 1e-9);
    }

    #[test]
    fn tiny_module_keeps_the_fillet() {
        let big = GearSpec::new(2.0, 20).resolve().unwrap();
        let tiny = GearSpec::new(2e-6, 20).resolve().unwrap();
        let (big, tiny) = (RackProfile::generate(&big), RackProfile::generate(&tiny));
        assert_eq!(big.len(), tiny.len());
        for (a, b) in big.points().iter().zip(tiny.points()) {
            assert!((a * 1e-6 - *b).norm() < 1e-15);
        }
    }
}
