//! Serial implementation of the rack sweep.

use super::traits::SweepOps;
use super::{SweptCurve, SweptCurveFamily, roll_poses};
use crate::rack::RackProfile;
use crate::resolve::DerivedGeometry;
use tracing::trace;

/// Serial implementation of `SweepOps`.
pub struct SerialSweepOps;

impl Default for SerialSweepOps {
    fn default() -> Self {
        Self::new()
    }
}

impl SerialSweepOps {
    pub const fn new() -> Self {
        Self
    }
}

impl SweepOps for SerialSweepOps {
    fn sweep(&self, geometry: &DerivedGeometry, rack: &RackProfile) -> SweptCurveFamily {
        let poses = roll_poses(geometry, rack);
        trace!(poses = poses.len(), rack_points = rack.len(), "serial sweep");

        let curves = poses
            .into_iter()
            .map(|pose| SweptCurve::at(pose, rack, geometry.pitch_radius))
            .collect();

        SweptCurveFamily::new(rack.regions().to_vec(), curves)
    }
}
