//! The generation pipeline: spec in, validated outline out.

use crate::envelope::GapEnvelope;
use crate::errors::{GearError, GearWarning};
use crate::rack::RackProfile;
use crate::resolve::DerivedGeometry;
use crate::roll::{DefaultSweepOps, SweepOps};
use crate::spec::GearSpec;
use crate::tooth::{GearOutline, ToothProfile};
use crate::validate::validate;
use tracing::{debug, warn};

/// Everything one generation request produces. Never mutated after creation.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedGear {
    pub spec: GearSpec,
    pub geometry: DerivedGeometry,
    /// Tooth 0, centred on +X.
    pub tooth: ToothProfile,
    pub outline: GearOutline,
    pub warnings: Vec<GearWarning>,
}

/// Cut a gear with the default sweep (parallel when the `parallel` feature is on).
///
/// ```
/// use gearcut::{GearSpec, generate};
///
/// let gear = generate(&GearSpec::new(2.0, 20)).unwrap();
/// assert_eq!(gear.outline.teeth(), 20);
/// assert!(gear.warnings.is_empty());
/// ```
pub fn generate(spec: &GearSpec) -> Result<GeneratedGear, GearError> {
    generate_with(spec, &DefaultSweepOps::new())
}

/// Cut a gear using the given sweep implementation.
pub fn generate_with<S: SweepOps>(spec: &GearSpec, sweep: &S) -> Result<GeneratedGear, GearError> {
    let geometry = spec.resolve()?;

    let rack = RackProfile::generate(&geometry);
    debug!(points = rack.len(), tip_radius = geometry.tip_radius, "rack profile");

    let family = sweep.sweep(&geometry, &rack);
    debug!(poses = family.len(), roll_step = geometry.roll_step, "rack swept");

    let envelope = GapEnvelope::extract(&geometry, family);
    let tooth = ToothProfile::assemble(&geometry, &envelope);
    let outline = GearOutline::replicate(&tooth, geometry.teeth);
    debug!(
        tooth_points = tooth.len(),
        outline_points = outline.len(),
        tip_land = tooth.tip_land_width(),
        "gear assembled"
    );

    let warnings = validate(&geometry, &tooth, &outline, envelope.undercut())?;
    if let Some(first) = warnings.first() {
        warn!(teeth = warnings.len(), "{first}");
    }

    Ok(GeneratedGear {
        spec: spec.clone(),
        geometry,
        tooth,
        outline,
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roll::SerialSweepOps;

    #[test]
    fn invalid_spec_stops_before_geometry() {
        let err = generate(&GearSpec::new(2.0, 2)).unwrap_err();
        assert_eq!(err.field(), Some("teeth"));
    }

    #[test]
    fn same_spec_same_outline() {
        let spec = GearSpec::new(1.25, 19).with_profile_shift(0.1).with_backlash(0.05);
        let a = generate_with(&spec, &SerialSweepOps::new()).unwrap();
        let b = generate_with(&spec, &SerialSweepOps::new()).unwrap();
        assert_eq!(a, b);
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn parallel_sweep_agrees_with_serial() {
        use crate::roll::ParallelSweepOps;
        let spec = GearSpec::new(2.0, 11);
        let serial = generate_with(&spec, &SerialSweepOps::new()).unwrap();
        let parallel = generate_with(&spec, &ParallelSweepOps::new()).unwrap();
        assert_eq!(serial.outline, parallel.outline);
    }
}
