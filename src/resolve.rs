//! **Parameter Resolver**
//!
//! Validates a [`GearSpec`] and derives every secondary dimension the cutting simulation
//! needs. Pure: the same spec always resolves to the same [`DerivedGeometry`].
//!
//! ## **Standard gear relations**
//! ```text
//! r  = m·z / 2                       pitch radius
//! rb = r·cos(α)                      base radius
//! ra = r + (ha + x)·m                addendum radius
//! rf = r − (hf − x)·m                dedendum radius
//! s  = π·m/2 + 2·x·m·tan(α) − j      tooth thickness on the pitch circle
//! ```
//! where `x` is the profile shift coefficient and `j` the backlash.

use crate::errors::GearError;
use crate::float_types::{FRAC_PI_4, PI, Real, TAU};
use crate::spec::{GearSpec, SamplingDensity, TipShape};
use tracing::debug;

/// Secondary dimensions, computed once per request and read-only afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedGeometry {
    pub module: Real,
    pub teeth: usize,
    /// Pressure angle in radians.
    pub pressure_angle: Real,
    pub profile_shift: Real,
    pub backlash: Real,
    pub clearance: Real,
    pub addendum_coefficient: Real,
    pub dedendum_coefficient: Real,

    pub pitch_radius: Real,
    pub base_radius: Real,
    pub addendum_radius: Real,
    pub dedendum_radius: Real,
    /// Arc thickness of a tooth on the pitch circle.
    pub tooth_thickness: Real,
    /// Angular half-width of a tooth on the pitch circle.
    pub half_tooth_angle: Real,
    /// 2π / z
    pub angular_pitch: Real,

    /// Half-width of the flat tip of the generating rack tooth, before filleting; 0 when
    /// the flanks meet in a point.
    pub rack_tip_half_width: Real,
    /// `v` of the rack tip: `(x - hf)·m`, or the apex of a pointed rack tooth above it.
    pub rack_tip_depth: Real,
    /// Radius of the rack tip fillets (after clamping to the tip width).
    pub tip_radius: Real,
    /// Radius where the generated involute starts; equals the base radius when the rack
    /// flank reaches past the interference point.
    pub form_radius: Real,
    /// True when the straight rack flank reaches past the interference point.
    pub theoretical_undercut: bool,

    /// Blank rotation between two consecutive rack positions (radians).
    pub roll_step: Real,
    pub sampling: SamplingDensity,
    pub tip_shape: TipShape,
}

impl GearSpec {
    /// Validate these parameters and compute their [`DerivedGeometry`].
    ///
    /// Fails with [`GearError::InvalidParameter`] naming the first offending field.
    pub fn resolve(&self) -> Result<DerivedGeometry, GearError> {
        self.validate_inputs()?;

        let m = self.module;
        let z = self.teeth as Real;
        let alpha = self.pressure_angle_deg.to_radians();
        let x = self.profile_shift;
        let ha = self.addendum_coefficient;
        let hf = self.dedendum();

        let pitch_radius = 0.5 * m * z;
        let base_radius = pitch_radius * alpha.cos();
        let addendum_radius = pitch_radius + (ha + x) * m;
        let dedendum_radius = pitch_radius - (hf - x) * m;

        if addendum_radius <= pitch_radius {
            let field = if x < 0.0 { "profile_shift" } else { "addendum_coefficient" };
            return Err(GearError::invalid(
                field,
                format!(
                    "puts the addendum radius ({addendum_radius}) at or inside the pitch radius ({pitch_radius})"
                ),
            ));
        }
        if dedendum_radius >= pitch_radius {
            let field = if x > 0.0 { "profile_shift" } else { "dedendum_coefficient" };
            return Err(GearError::invalid(
                field,
                format!(
                    "puts the dedendum radius ({dedendum_radius}) at or outside the pitch radius ({pitch_radius})"
                ),
            ));
        }
        if dedendum_radius <= 0.0 {
            let field = if x < 0.0 { "profile_shift" } else { "dedendum_coefficient" };
            return Err(GearError::invalid(
                field,
                format!("gives a non-positive dedendum radius ({dedendum_radius})"),
            ));
        }

        let tooth_thickness = 0.5 * PI * m + 2.0 * x * m * alpha.tan() - self.backlash;
        if tooth_thickness <= 0.0 {
            return Err(GearError::invalid(
                "backlash",
                format!("leaves no tooth on the pitch circle (thickness {tooth_thickness})"),
            ));
        }

        // The rack tooth is pi*m/2 + backlash wide on its reference line (v = x*m) and
        // narrows by tan(alpha) per unit of depth down to its tip at v = (x - hf)*m.
        // Steep flanks meet in an apex before reaching that depth.
        let reference_half_width = 0.25 * PI * m + 0.5 * self.backlash;
        let full_depth_half_width = reference_half_width - hf * m * alpha.tan();
        let (rack_tip_half_width, rack_tip_depth) = if full_depth_half_width > 0.0 {
            (full_depth_half_width, (x - hf) * m)
        } else {
            (0.0, x * m - reference_half_width / alpha.tan())
        };

        let corner = (FRAC_PI_4 + 0.5 * alpha).tan();
        let tip_radius = (self.tip_radius_coefficient * m).min(rack_tip_half_width * corner);

        // Lowest point of the straight flank (fillet tangency) and where the line of
        // action meets it.
        let flank_end_v = rack_tip_depth + (tip_radius / corner) * alpha.cos();
        let along_action = pitch_radius * alpha.sin() + flank_end_v / alpha.sin();
        let theoretical_undercut = along_action < 0.0;
        let form_radius = if theoretical_undercut {
            base_radius
        } else {
            (base_radius * base_radius + along_action * along_action).sqrt()
        };

        let geometry = DerivedGeometry {
            module: m,
            teeth: self.teeth,
            pressure_angle: alpha,
            profile_shift: x,
            backlash: self.backlash,
            clearance: self.clearance,
            addendum_coefficient: ha,
            dedendum_coefficient: hf,
            pitch_radius,
            base_radius,
            addendum_radius,
            dedendum_radius,
            tooth_thickness,
            half_tooth_angle: tooth_thickness / (2.0 * pitch_radius),
            angular_pitch: TAU / z,
            rack_tip_half_width,
            rack_tip_depth,
            tip_radius,
            form_radius,
            theoretical_undercut,
            roll_step: alpha / self.sampling.roll_steps_per_pressure_angle as Real,
            sampling: self.sampling,
            tip_shape: self.tip_shape,
        };

        debug!(
            pitch_radius = geometry.pitch_radius,
            base_radius = geometry.base_radius,
            addendum_radius = geometry.addendum_radius,
            dedendum_radius = geometry.dedendum_radius,
            tooth_thickness = geometry.tooth_thickness,
            form_radius = geometry.form_radius,
            profile_shift = geometry.profile_shift,
            "resolved gear geometry"
        );

        Ok(geometry)
    }

    fn validate_inputs(&self) -> Result<(), GearError> {
        if !(self.module.is_finite() && self.module > 0.0) {
            return Err(GearError::invalid("module", format!("must be > 0, got {}", self.module)));
        }
        if self.teeth < 3 {
            return Err(GearError::invalid("teeth", format!("must be >= 3, got {}", self.teeth)));
        }
        if !(self.pressure_angle_deg > 0.0 && self.pressure_angle_deg < 45.0) {
            return Err(GearError::invalid(
                "pressure_angle_deg",
                format!("must lie in (0, 45) degrees, got {}", self.pressure_angle_deg),
            ));
        }
        if !(self.backlash.is_finite() && self.backlash >= 0.0) {
            return Err(GearError::invalid("backlash", format!("must be >= 0, got {}", self.backlash)));
        }
        if !(self.clearance.is_finite() && self.clearance >= 0.0) {
            return Err(GearError::invalid(
                "clearance",
                format!("must be >= 0, got {}", self.clearance),
            ));
        }
        if !self.addendum_coefficient.is_finite() {
            return Err(GearError::invalid("addendum_coefficient", "must be finite"));
        }
        if !self.dedendum().is_finite() {
            return Err(GearError::invalid("dedendum_coefficient", "must be finite"));
        }
        if !self.profile_shift.is_finite() {
            return Err(GearError::invalid("profile_shift", "must be finite"));
        }
        if !(self.tip_radius_coefficient.is_finite() && self.tip_radius_coefficient >= 0.0) {
            return Err(GearError::invalid(
                "tip_radius_coefficient",
                format!("must be >= 0, got {}", self.tip_radius_coefficient),
            ));
        }

        let sampling = &self.sampling;
        if sampling.roll_steps_per_pressure_angle < SamplingDensity::MIN_ROLL_STEPS {
            return Err(GearError::invalid(
                "sampling.roll_steps_per_pressure_angle",
                format!(
                    "must be >= {} (roll step <= pressure angle / {}), got {}",
                    SamplingDensity::MIN_ROLL_STEPS,
                    SamplingDensity::MIN_ROLL_STEPS,
                    sampling.roll_steps_per_pressure_angle
                ),
            ));
        }
        if sampling.min_rays_per_half_pitch < SamplingDensity::MIN_RAYS_PER_HALF_PITCH {
            return Err(GearError::invalid(
                "sampling.min_rays_per_half_pitch",
                format!(
                    "must be >= {}, got {}",
                    SamplingDensity::MIN_RAYS_PER_HALF_PITCH,
                    sampling.min_rays_per_half_pitch
                ),
            ));
        }
        if sampling.rays_per_roll_step == 0 {
            return Err(GearError::invalid("sampling.rays_per_roll_step", "must be >= 1"));
        }
        if sampling.fillet_segments < SamplingDensity::MIN_FILLET_SEGMENTS {
            return Err(GearError::invalid(
                "sampling.fillet_segments",
                format!(
                    "must be >= {}, got {}",
                    SamplingDensity::MIN_FILLET_SEGMENTS,
                    sampling.fillet_segments
                ),
            ));
        }
        Ok(())
    }
}

impl DerivedGeometry {
    /// Blank rotation past which the rack no longer touches the blank: the rack tooth
    /// lies entirely outside the addendum circle once its nearest point, anywhere on the
    /// tooth (`half_extent` from its centre line), has rolled this far from the gap centre.
    pub fn roll_limit(&self, half_extent: Real) -> Real {
        let ra = self.addendum_radius;
        let rf = self.dedendum_radius;
        ((ra * ra - rf * rf).max(0.0).sqrt() + half_extent) / self.pitch_radius
            + self.roll_step
    }
}
