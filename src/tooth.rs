//! **Tooth Assembler**
//!
//! Turns a half-gap envelope into one closed tooth and the tooth into the full gear.
//!
//! A tooth is laid out centred on the +X axis and spans exactly one angular pitch, from
//! the centre of the gap below it (θ = −π/z) over the tip to the centre of the gap above
//! it (θ = +π/z). Envelope offsets `o` (measured from the gap centre) map to θ = o − π/z
//! on the lower flank; the upper flank is the mirror image about the X axis.

use crate::envelope::{GapEnvelope, ProfileRegion};
use crate::float_types::{PI, Real, TAU};
use crate::involute::flank_half_angle;
use crate::resolve::DerivedGeometry;
use crate::spec::TipShape;
use geo::{Coord, LineString, Polygon};
use nalgebra::{Point2, Rotation2};

/// One tooth, ordered root → tip → root.
#[derive(Debug, Clone, PartialEq)]
pub struct ToothProfile {
    points: Vec<Point2<Real>>,
    regions: Vec<ProfileRegion>,
    /// Points on the lower flank, gap centre to tip.
    half_len: usize,
    tip_land_width: Real,
}

#[derive(Debug, Clone, Copy)]
struct PolarSample {
    offset: Real,
    radius: Real,
    region: ProfileRegion,
}

impl ToothProfile {
    /// Clip the envelope to `[rf, ra]`, close the tip and mirror it into a full tooth.
    pub fn assemble(geometry: &DerivedGeometry, envelope: &GapEnvelope) -> Self {
        let half_pitch = PI / geometry.teeth as Real;
        let ra = geometry.addendum_radius;
        let rf = geometry.dedendum_radius;
        let samples = envelope.samples();

        // everything past the last cut ray is uncut addendum
        let tip_start = samples
            .iter()
            .rposition(|s| s.region != ProfileRegion::Tip)
            .map_or(0, |i| i + 1);

        let mut half: Vec<PolarSample> = samples[..tip_start]
            .iter()
            .map(|s| PolarSample {
                offset: s.offset,
                radius: s.radius.clamp(rf, ra),
                region: s.region,
            })
            .collect();

        let mut tip_land_width = 0.0;
        if tip_start < samples.len() {
            let next = samples[tip_start];
            let crossing = match tip_start.checked_sub(1).map(|i| samples[i]) {
                Some(prev) if prev.region == ProfileRegion::Flank => {
                    // the involute meets the addendum circle between the two rays
                    flank_half_angle(geometry, ra)
                        .map(|angle| half_pitch - angle)
                        .filter(|o| *o > prev.offset && *o <= next.offset)
                        .unwrap_or(next.offset)
                },
                _ => next.offset,
            };
            half.push(PolarSample {
                offset: crossing,
                radius: ra,
                region: ProfileRegion::Tip,
            });
            tip_land_width = 2.0 * ra * (half_pitch - crossing).max(0.0).sin();

            if geometry.tip_shape == TipShape::Rounded {
                half.extend(
                    samples[tip_start..]
                        .iter()
                        .filter(|s| s.offset > crossing)
                        .map(|s| PolarSample {
                            offset: s.offset,
                            radius: ra,
                            region: ProfileRegion::Tip,
                        }),
                );
            }
        }

        let half_len = half.len();
        let on_bisector = half
            .last()
            .is_some_and(|s| half_pitch - s.offset < 0.5 * envelope.ray_spacing());

        let lower = half.iter().map(|s| (s.offset - half_pitch, s));
        let upper = half
            .iter()
            .rev()
            .skip(usize::from(on_bisector))
            .map(|s| (half_pitch - s.offset, s));

        let (points, regions) = lower
            .chain(upper)
            .map(|(theta, s)| {
                (
                    Point2::new(s.radius * theta.cos(), s.radius * theta.sin()),
                    s.region,
                )
            })
            .unzip();

        Self {
            points,
            regions,
            half_len,
            tip_land_width,
        }
    }

    pub fn points(&self) -> &[Point2<Real>] {
        &self.points
    }

    /// Region of each point.
    pub fn regions(&self) -> &[ProfileRegion] {
        &self.regions
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Chord width of the top land on the addendum circle; 0 for a pointed tooth.
    pub fn tip_land_width(&self) -> Real {
        self.tip_land_width
    }

    /// Arc thickness of the tooth on the circle of `radius`, or `None` when the flank
    /// never crosses that circle.
    pub fn thickness_at(&self, radius: Real) -> Option<Real> {
        self.points[..self.half_len].windows(2).find_map(|w| {
            let (r0, r1) = (w[0].coords.norm(), w[1].coords.norm());
            if r0 > radius || r1 < radius || r0 == r1 {
                return None;
            }
            let t = (radius - r0) / (r1 - r0);
            let p = w[0] + (w[1] - w[0]) * t;
            Some(2.0 * radius * p.y.atan2(p.x).abs())
        })
    }
}

/// The full gear: `teeth` copies of one tooth, rotated about the origin.
///
/// The ring closes implicitly: the last point connects back to the first.
#[derive(Debug, Clone, PartialEq)]
pub struct GearOutline {
    points: Vec<Point2<Real>>,
    regions: Vec<ProfileRegion>,
    teeth: usize,
    tooth_len: usize,
}

impl GearOutline {
    /// Replicate `profile` by rigid rotation through `k·2π/teeth`. The last point of
    /// every copy coincides with the first point of the next one and is dropped.
    pub fn replicate(profile: &ToothProfile, teeth: usize) -> Self {
        let tooth_len = profile.len().saturating_sub(1);
        let mut points = Vec::with_capacity(teeth * tooth_len);
        let mut regions = Vec::with_capacity(teeth * tooth_len);
        for k in 0..teeth {
            let rotation = Rotation2::new(TAU * k as Real / teeth as Real);
            points.extend(profile.points()[..tooth_len].iter().map(|p| rotation * p));
            regions.extend_from_slice(&profile.regions()[..tooth_len]);
        }
        Self {
            points,
            regions,
            teeth,
            tooth_len,
        }
    }

    /// Ordered ring, without the closing point.
    pub fn points(&self) -> &[Point2<Real>] {
        &self.points
    }

    pub fn regions(&self) -> &[ProfileRegion] {
        &self.regions
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn teeth(&self) -> usize {
        self.teeth
    }

    /// Points contributed by each tooth.
    pub fn tooth_len(&self) -> usize {
        self.tooth_len
    }

    /// Points of tooth `index` (wrapping).
    pub fn tooth(&self, index: usize) -> &[Point2<Real>] {
        let start = (index % self.teeth.max(1)) * self.tooth_len;
        &self.points[start..start + self.tooth_len]
    }

    /// Ring with the first point repeated at the end.
    pub fn closed_points(&self) -> Vec<Point2<Real>> {
        let mut closed = self.points.clone();
        if let Some(first) = self.points.first() {
            closed.push(*first);
        }
        closed
    }

    /// Convert to a `geo::Polygon` for use with the `geo` algorithms.
    pub fn to_geo_polygon(&self) -> Polygon<Real> {
        let ring: Vec<Coord<Real>> = self
            .points
            .iter()
            .map(|p| Coord { x: p.x, y: p.y })
            .collect();
        // geo closes the exterior ring itself
        Polygon::new(LineString::new(ring), vec![])
    }

    pub fn min_radius(&self) -> Real {
        self.points
            .iter()
            .map(|p| p.coords.norm())
            .fold(Real::MAX, Real::min)
    }

    pub fn max_radius(&self) -> Real {
        self.points
            .iter()
            .map(|p| p.coords.norm())
            .fold(0.0, Real::max)
    }

    /// A copy rotated by `angle` radians about the gear centre.
    pub fn rotated(&self, angle: Real) -> Self {
        let rotation = Rotation2::new(angle);
        Self {
            points: self.points.iter().map(|p| rotation * p).collect(),
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rack::RackProfile;
    use crate::roll::{SerialSweepOps, SweepOps};
    use crate::spec::GearSpec;

    fn tooth(spec: &GearSpec) -> (DerivedGeometry, ToothProfile) {
        let g = spec.resolve().unwrap();
        let rack = RackProfile::generate(&g);
        let env = GapEnvelope::extract(&g, SerialSweepOps::new().sweep(&g, &rack));
        let tooth = ToothProfile::assemble(&g, &env);
        (g, tooth)
    }

    #[test]
    fn tooth_spans_one_pitch_and_is_mirrored() {
        let (g, tooth) = tooth(&GearSpec::new(2.0, 20));
        let first = tooth.points()[0];
        let last = *tooth.points().last().unwrap();
        assert!((first.y.atan2(first.x) + PI / 20.0).abs() < 1e-9);
        assert!((first.x - last.x).abs() < 1e-12 && (first.y + last.y).abs() < 1e-12);
        assert!((first.coords.norm() - g.dedendum_radius).abs() < 1e-6);

        let n = tooth.len();
        for i in 0..n {
            let (a, b) = (tooth.points()[i], tooth.points()[n - 1 - i]);
            assert!((a.x - b.x).abs() < 1e-12 && (a.y + b.y).abs() < 1e-12);
        }
        assert!(tooth.tip_land_width() > 0.0);
    }

    #[test]
    fn thickness_on_pitch_circle_matches_nominal() {
        let (g, tooth) = tooth(&GearSpec::new(2.0, 40));
        let s = tooth.thickness_at(g.pitch_radius).unwrap();
        assert!((s - g.tooth_thickness).abs() < 5e-3, "{s} vs {}", g.tooth_thickness);
        assert!(tooth.thickness_at(g.addendum_radius + 1.0).is_none());
    }

    #[test]
    fn flat_tip_closes_with_a_chord() {
        let (g, rounded) = tooth(&GearSpec::new(2.0, 20));
        let (_, flat) = tooth(&GearSpec::new(2.0, 20).with_tip_shape(TipShape::Flat));
        assert!(flat.len() < rounded.len());
        assert!((flat.tip_land_width() - rounded.tip_land_width()).abs() < 1e-12);

        let tips: Vec<_> = flat
            .points()
            .iter()
            .zip(flat.regions())
            .filter(|(_, r)| **r == ProfileRegion::Tip)
            .map(|(p, _)| *p)
            .collect();
        assert_eq!(tips.len(), 2);
        assert!((tips[0].coords.norm() - g.addendum_radius).abs() < 1e-9);
        assert!(((tips[1] - tips[0]).norm() - flat.tip_land_width()).abs() < 1e-9);
    }

    #[test]
    fn replication_drops_seam_duplicates() {
        let (g, tooth) = tooth(&GearSpec::new(2.0, 12));
        let outline = GearOutline::replicate(&tooth, g.teeth);
        assert_eq!(outline.len(), 12 * (tooth.len() - 1));
        assert_eq!(outline.tooth_len(), tooth.len() - 1);
        assert_eq!(outline.tooth(12), outline.tooth(0));
        let closed = outline.closed_points();
        assert_eq!(closed.len(), outline.len() + 1);
        assert_eq!(closed[0], *closed.last().unwrap());
        assert!((outline.max_radius() - g.addendum_radius).abs() < 1e-9);
        assert!((outline.min_radius() - g.dedendum_radius).abs() < 1e-6);
    }
}
