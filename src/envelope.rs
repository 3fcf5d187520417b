//! **Envelope Extractor**
//!
//! Recovers the boundary actually cut into the blank from the swept family of rack
//! positions. Rays leave the gear centre at a fixed angular spacing around the gap
//! bisector (+Y); every swept segment is intersected exactly with the rays it spans and
//! each ray keeps the intersection closest to the centre. Material that no rack position
//! reaches is left standing, so a ray nobody cuts stays on the addendum circle.
//!
//! The rack repeats every angular pitch and the gap is symmetric about its bisector, so
//! ray offsets are wrapped modulo the angular pitch and folded: the result is one half
//! gap, from the gap centre (offset 0) to the tooth centre (offset π/z).

use crate::float_types::{FRAC_PI_2, PI, Real, TAU};
use crate::involute::{flank_radius_at, involute_arc_length, pressure_angle_at};
use crate::rack::RackRegion;
use crate::resolve::DerivedGeometry;
use crate::roll::SweptCurveFamily;
use nalgebra::{Point2, Vector2};
use tracing::{debug, trace};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Undercut above this fraction of the involute flank is reported as `UndercutSevere`.
pub const SEVERE_UNDERCUT_FRACTION: Real = 0.1;

/// Envelope and flank positions closer than this many modules count as the same point
/// when measuring undercut.
pub const UNDERCUT_TOLERANCE: Real = 1e-3;

/// What shaped a point of the cut boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProfileRegion {
    /// Dedendum circle, cut by the flat rack tip.
    Root,
    /// Trochoidal root fillet, cut by the rack tip corners.
    Fillet,
    /// Involute flank, cut by the straight rack flank above the form radius.
    Flank,
    /// Uncut addendum circle.
    Tip,
}

/// One ray of the half gap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnvelopeSample {
    /// Angle from the gap bisector, 0 at the gap centre, π/z at the tooth centre.
    pub offset: Real,
    /// Distance of the cut boundary from the gear centre.
    pub radius: Real,
    pub region: ProfileRegion,
}

/// Result of comparing the envelope against the ideal involute flank.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct UndercutReport {
    /// Consumed share of the base-to-addendum involute arc length (0..1).
    pub fraction: Real,
    /// Highest radius at which the involute has been cut away.
    pub consumed_radius: Option<Real>,
    /// Number of rays that sit inside the involute.
    pub affected_samples: usize,
}

impl UndercutReport {
    pub fn is_severe(&self) -> bool {
        self.fraction > SEVERE_UNDERCUT_FRACTION
    }
}

/// Closest cut seen so far along one ray.
#[derive(Debug, Clone, Copy)]
struct Hit {
    radius: Real,
    /// (pose, segment) that produced the cut; lower wins ties.
    source: (usize, usize),
    region: RackRegion,
}

impl Hit {
    fn beats(&self, other: &Hit) -> bool {
        self.radius < other.radius || (self.radius == other.radius && self.source < other.source)
    }
}

fn keep_closest(slot: &mut Option<Hit>, hit: Hit) {
    match slot {
        Some(current) if !hit.beats(current) => {},
        _ => *slot = Some(hit),
    }
}

/// Ray layout for one gap.
#[derive(Debug, Clone, Copy)]
struct Rays {
    spacing: Real,
    /// Rays from the gap centre to the tooth centre, exclusive of the gap centre.
    half: usize,
    /// Cuts at or beyond this radius leave the ray uncut.
    limit: Real,
}

impl Rays {
    fn new(geometry: &DerivedGeometry) -> Self {
        let half_pitch = PI / geometry.teeth as Real;
        let sampling = &geometry.sampling;
        let by_step = (half_pitch
            / (geometry.roll_step / sampling.rays_per_roll_step as Real))
            .ceil() as usize;
        let half = by_step.max(sampling.min_rays_per_half_pitch as usize);
        Self {
            spacing: half_pitch / half as Real,
            half,
            limit: geometry.addendum_radius,
        }
    }

    /// Casts every ray that the segment `p0 -> p1` spans and reports the folded ray
    /// index with the distance of the crossing from the centre.
    fn cast(&self, p0: Point2<Real>, p1: Point2<Real>, mut visit: impl FnMut(usize, Real)) {
        let a0 = wrap_angle(p0.y.atan2(p0.x) - FRAC_PI_2);
        let a1 = a0 + wrap_angle(p1.y.atan2(p1.x) - FRAC_PI_2 - a0);
        let (lo, hi) = if a0 <= a1 { (a0, a1) } else { (a1, a0) };
        let first = (lo / self.spacing).ceil() as i64;
        let last = (hi / self.spacing).floor() as i64;
        let dir = p1 - p0;
        let period = 2 * self.half as i64;

        for j in first..=last {
            let angle = j as Real * self.spacing + FRAC_PI_2;
            let ray = Vector2::new(angle.cos(), angle.sin());
            let den = ray.perp(&dir);
            let radius = if den.abs() <= Real::EPSILON * dir.norm() {
                p0.coords.norm().min(p1.coords.norm())
            } else {
                let t = (-ray.perp(&p0.coords) / den).clamp(0.0, 1.0);
                ray.dot(&(p0.coords + dir * t))
            };
            if !(radius > 0.0) {
                continue;
            }
            let wrapped = j.rem_euclid(period) as usize;
            let folded = if wrapped <= self.half {
                wrapped
            } else {
                2 * self.half - wrapped
            };
            visit(folded, radius);
        }
    }

    fn cut_pose(
        &self,
        family: &SweptCurveFamily,
        pose: usize,
        buckets: &mut [Option<Hit>],
    ) {
        let regions = family.regions();
        let points = &family.curves()[pose].points;
        let n = points.len();
        for (segment, region) in regions.iter().enumerate() {
            self.cast(points[segment], points[(segment + 1) % n], |k, radius| {
                if radius < self.limit {
                    keep_closest(
                        &mut buckets[k],
                        Hit {
                            radius,
                            source: (pose, segment),
                            region: *region,
                        },
                    );
                }
            });
        }
    }

    #[cfg(not(feature = "parallel"))]
    fn cut(&self, family: &SweptCurveFamily) -> Vec<Option<Hit>> {
        let mut buckets = vec![None; self.half + 1];
        for pose in 0..family.len() {
            self.cut_pose(family, pose, &mut buckets);
        }
        buckets
    }

    #[cfg(feature = "parallel")]
    fn cut(&self, family: &SweptCurveFamily) -> Vec<Option<Hit>> {
        (0..family.len())
            .into_par_iter()
            .fold(
                || vec![None; self.half + 1],
                |mut buckets, pose| {
                    self.cut_pose(family, pose, &mut buckets);
                    buckets
                },
            )
            .reduce(
                || vec![None; self.half + 1],
                |mut left, right| {
                    for (slot, hit) in left.iter_mut().zip(right) {
                        if let Some(hit) = hit {
                            keep_closest(slot, hit);
                        }
                    }
                    left
                },
            )
    }
}

/// Wrap an angle into `[-π, π)`.
fn wrap_angle(angle: Real) -> Real {
    (angle + PI).rem_euclid(TAU) - PI
}

/// The cut boundary of one half gap.
#[derive(Debug, Clone, PartialEq)]
pub struct GapEnvelope {
    geometry: DerivedGeometry,
    ray_spacing: Real,
    samples: Vec<EnvelopeSample>,
    undercut: UndercutReport,
}

impl GapEnvelope {
    /// Reduce the swept family to its envelope. Consumes the family.
    pub fn extract(geometry: &DerivedGeometry, family: SweptCurveFamily) -> Self {
        let rays = Rays::new(geometry);
        trace!(
            rays = rays.half + 1,
            spacing = rays.spacing,
            poses = family.len(),
            "casting envelope rays"
        );
        let buckets = rays.cut(&family);
        drop(family);

        let samples = buckets
            .into_iter()
            .enumerate()
            .map(|(k, hit)| {
                let offset = k as Real * rays.spacing;
                match hit {
                    Some(hit) => EnvelopeSample {
                        offset,
                        radius: hit.radius,
                        region: classify(geometry, hit),
                    },
                    None => EnvelopeSample {
                        offset,
                        radius: geometry.addendum_radius,
                        region: ProfileRegion::Tip,
                    },
                }
            })
            .collect();

        let mut envelope = Self {
            geometry: geometry.clone(),
            ray_spacing: rays.spacing,
            samples,
            undercut: UndercutReport::default(),
        };
        envelope.undercut = envelope.measure_undercut();

        debug!(
            samples = envelope.samples.len(),
            undercut = envelope.undercut.fraction,
            consumed_radius = ?envelope.undercut.consumed_radius,
            "extracted gap envelope"
        );
        envelope
    }

    /// Samples from the gap centre (offset 0) to the tooth centre (offset π/z).
    pub fn samples(&self) -> &[EnvelopeSample] {
        &self.samples
    }

    pub fn ray_spacing(&self) -> Real {
        self.ray_spacing
    }

    pub fn geometry(&self) -> &DerivedGeometry {
        &self.geometry
    }

    pub fn undercut(&self) -> &UndercutReport {
        &self.undercut
    }

    /// Radius of the ideal involute flank along the ray at `offset`, or `None` where the
    /// involute does not exist (inside the base circle) or lies beyond the addendum.
    fn involute_radius(&self, offset: Real) -> Option<Real> {
        let half_angle = PI / self.geometry.teeth as Real - offset;
        flank_radius_at(&self.geometry, half_angle)
            .filter(|radius| *radius < self.geometry.addendum_radius)
    }

    /// Largest distance, measured along the flank normal, between a `Flank` sample and the
    /// analytic involute.
    pub fn involute_deviation(&self) -> Real {
        let rb = self.geometry.base_radius;
        self.samples
            .iter()
            .filter(|s| s.region == ProfileRegion::Flank)
            .filter_map(|s| {
                self.involute_radius(s.offset)
                    .map(|ideal| ((ideal - s.radius) * pressure_angle_at(ideal, rb).sin()).abs())
            })
            .fold(0.0, Real::max)
    }

    fn measure_undercut(&self) -> UndercutReport {
        let g = &self.geometry;
        let tolerance = UNDERCUT_TOLERANCE * g.module;
        let mut report = UndercutReport::default();
        for sample in &self.samples {
            let Some(ideal) = self.involute_radius(sample.offset) else {
                continue;
            };
            if ideal - sample.radius > tolerance {
                report.affected_samples += 1;
                report.consumed_radius =
                    Some(report.consumed_radius.map_or(ideal, |r| r.max(ideal)));
            }
        }
        if let Some(consumed) = report.consumed_radius {
            let full = involute_arc_length(g.base_radius, g.addendum_radius);
            if full > 0.0 {
                report.fraction = (involute_arc_length(g.base_radius, consumed) / full).min(1.0);
            }
        }
        report
    }
}

fn classify(geometry: &DerivedGeometry, hit: Hit) -> ProfileRegion {
    match hit.region {
        RackRegion::Tip => ProfileRegion::Root,
        RackRegion::Fillet => ProfileRegion::Fillet,
        RackRegion::Flank if hit.radius >= geometry.form_radius => ProfileRegion::Flank,
        RackRegion::Flank => ProfileRegion::Fillet,
        RackRegion::Back => ProfileRegion::Tip,
    }
}
