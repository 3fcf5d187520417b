//! Traits for the rack sweep.

use super::SweptCurveFamily;
use crate::rack::RackProfile;
use crate::resolve::DerivedGeometry;

/// Trait for producing the swept family of rack positions.
pub trait SweepOps {
    /// Transforms `rack` into blank coordinates at every roll pose of `geometry`.
    fn sweep(&self, geometry: &DerivedGeometry, rack: &RackProfile) -> SweptCurveFamily;
}
