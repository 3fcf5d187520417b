//! Parallel implementation of the rack sweep.

use super::traits::SweepOps;
use super::{SweptCurve, SweptCurveFamily, roll_poses};
use crate::rack::RackProfile;
use crate::resolve::DerivedGeometry;
use rayon::prelude::*;
use tracing::trace;

/// Parallel implementation of `SweepOps`.
pub struct ParallelSweepOps;

impl Default for ParallelSweepOps {
    fn default() -> Self {
        Self::new()
    }
}

impl ParallelSweepOps {
    pub const fn new() -> Self {
        Self
    }
}

impl SweepOps for ParallelSweepOps {
    fn sweep(&self, geometry: &DerivedGeometry, rack: &RackProfile) -> SweptCurveFamily {
        let poses = roll_poses(geometry, rack);
        trace!(poses = poses.len(), rack_points = rack.len(), "parallel sweep");

        // every pose fills its own slot of the pre-sized output
        let mut curves = Vec::with_capacity(poses.len());
        poses
            .par_iter()
            .map(|pose| SweptCurve::at(*pose, rack, geometry.pitch_radius))
            .collect_into_vec(&mut curves);

        SweptCurveFamily::new(rack.regions().to_vec(), curves)
    }
}
