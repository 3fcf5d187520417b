//! **Roll Simulator**
//!
//! Rolls the rack along the pitch circle of the blank without slip and records the rack
//! tooth at every position in blank-fixed coordinates.
//!
//! ## **Pure rolling**
//! For a blank rotation φ the rack travels `d = r·φ` along the pitch tangent, so the arc
//! swept on the pitch circle always equals the linear rack travel. Keeping the rack fixed
//! and rotating the blank frame by −φ, a rack point `(u, v)` lands at
//! ```text
//! P(φ) = Rot(−φ) · (u − r·φ, r + v)
//! ```
//! in blank coordinates, with the gap being cut centred on the +Y axis.
//!
//! Poses run symmetrically from "rack clear of the addendum circle" on one side, through
//! the pitch-point contact at φ = 0, to "clear" on the other side. Each pose is independent
//! of the others, so the sweep is offered as a serial and a parallel implementation.

pub mod serial;
pub mod traits;

#[cfg(feature = "parallel")]
pub mod parallel;

pub use serial::SerialSweepOps;
pub use traits::SweepOps;

#[cfg(feature = "parallel")]
pub use parallel::ParallelSweepOps;

/// The sweep used by [`crate::generate`]: parallel when the `parallel` feature is on.
#[cfg(not(feature = "parallel"))]
pub type DefaultSweepOps = SerialSweepOps;
/// The sweep used by [`crate::generate`]: parallel when the `parallel` feature is on.
#[cfg(feature = "parallel")]
pub type DefaultSweepOps = ParallelSweepOps;

use crate::float_types::Real;
use crate::rack::{RackProfile, RackRegion};
use crate::resolve::DerivedGeometry;
use nalgebra::{Point2, Rotation2};

/// One simulation step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RollPose {
    /// Position of the pose in the sweep, 0-based.
    pub index: usize,
    /// Blank rotation φ (radians).
    pub rotation: Real,
    /// Rack travel along the pitch tangent, always `pitch_radius * rotation`.
    pub offset: Real,
}

impl RollPose {
    /// Map a rack-local point into blank-fixed coordinates.
    #[inline]
    pub fn transform(&self, rack_point: &Point2<Real>, pitch_radius: Real) -> Point2<Real> {
        Rotation2::new(-self.rotation)
            * Point2::new(rack_point.x - self.offset, pitch_radius + rack_point.y)
    }
}

/// The ordered poses of one sweep, from `-limit` to `+limit` in `roll_step` increments.
pub fn roll_poses(geometry: &DerivedGeometry, rack: &RackProfile) -> Vec<RollPose> {
    let step = geometry.roll_step;
    let limit = geometry.roll_limit(rack.half_extent());
    let half = (limit / step).ceil() as i64;
    (-half..=half)
        .enumerate()
        .map(|(index, i)| {
            let rotation = i as Real * step;
            RollPose {
                index,
                rotation,
                offset: geometry.pitch_radius * rotation,
            }
        })
        .collect()
}

/// The rack tooth at one pose, in blank coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct SweptCurve {
    pub pose: RollPose,
    pub points: Vec<Point2<Real>>,
}

impl SweptCurve {
    pub(crate) fn at(pose: RollPose, rack: &RackProfile, pitch_radius: Real) -> Self {
        Self {
            pose,
            points: rack
                .points()
                .iter()
                .map(|p| pose.transform(p, pitch_radius))
                .collect(),
        }
    }
}

/// All rack positions of one sweep. Built once by a [`SweepOps`] implementation and
/// consumed by the envelope extractor.
#[derive(Debug, Clone, PartialEq)]
pub struct SweptCurveFamily {
    regions: Vec<RackRegion>,
    curves: Vec<SweptCurve>,
}

impl SweptCurveFamily {
    pub(crate) const fn new(regions: Vec<RackRegion>, curves: Vec<SweptCurve>) -> Self {
        Self { regions, curves }
    }

    /// Segment tags shared by every curve (segment `i` runs from point `i` to `i + 1`).
    pub fn regions(&self) -> &[RackRegion] {
        &self.regions
    }

    pub fn curves(&self) -> &[SweptCurve] {
        &self.curves
    }

    pub fn len(&self) -> usize {
        self.curves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.curves.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::GearSpec;

    #[test]
    fn rack_travel_equals_pitch_arc() {
        let g = GearSpec::new(2.0, 17).resolve().unwrap();
        let rack = RackProfile::generate(&g);
        let poses = roll_poses(&g, &rack);
        assert_eq!(poses.len() % 2, 1);
        for pose in &poses {
            assert_eq!(pose.offset, g.pitch_radius * pose.rotation);
        }
        let mid = poses[poses.len() / 2];
        assert_eq!(mid.rotation, 0.0);
        assert_eq!(poses[0].rotation, -poses[poses.len() - 1].rotation);
    }

    #[test]
    fn pitch_point_does_not_slip() {
        let g = GearSpec::new(2.0, 30).resolve().unwrap();
        let r = g.pitch_radius;
        // the rack point that sits on the pitch point at pose φ is u = r·φ
        for phi in [-0.3, -0.01, 0.0, 0.02, 0.4] {
            let pose = RollPose {
                index: 0,
                rotation: phi,
                offset: r * phi,
            };
            let p = pose.transform(&Point2::new(r * phi, 0.0), r);
            let expected = Rotation2::new(-phi) * Point2::new(0.0, r);
            assert!((p - expected).norm() < 1e-12);
        }
    }

    #[test]
    fn first_and_last_pose_do_not_touch_the_blank() {
        let g = GearSpec::new(2.0, 12).resolve().unwrap();
        let rack = RackProfile::generate(&g);
        let family = SerialSweepOps::new().sweep(&g, &rack);
        for curve in [&family.curves()[0], family.curves().last().unwrap()] {
            let nearest = curve
                .points
                .iter()
                .map(|p| p.coords.norm())
                .fold(Real::MAX, Real::min);
            assert!(nearest > g.addendum_radius, "{nearest}");
        }
    }
}
