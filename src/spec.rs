//! `GearSpec`: the input contract of the generator.

use crate::float_types::Real;
use std::fmt::{self, Display};

/// How the tooth tip is closed between the two flanks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TipShape {
    /// Follow the addendum circle.
    #[default]
    Rounded,
    /// Close the tip with a straight chord between the flank ends.
    Flat,
}

impl TipShape {
    pub const fn as_str(self) -> &'static str {
        match self {
            TipShape::Rounded => "rounded",
            TipShape::Flat => "flat",
        }
    }
}

/// Sampling density of the cutting simulation.
///
/// The roll step is `pressure_angle / roll_steps_per_pressure_angle`. Coarse sampling
/// silently produces faceted or wrong teeth, so the resolver rejects anything below
/// [`SamplingDensity::MIN_ROLL_STEPS`] instead of offering a way to turn sampling down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SamplingDensity {
    /// Rack positions per radian-of-pressure-angle worth of blank rotation.
    pub roll_steps_per_pressure_angle: u32,
    /// Lower bound on envelope rays between a gap centre and the next tooth centre.
    pub min_rays_per_half_pitch: u32,
    /// Envelope rays per roll step (angular oversampling of the extracted boundary).
    pub rays_per_roll_step: u32,
    /// Polyline segments used for each rack tip fillet arc.
    pub fillet_segments: u32,
}

impl SamplingDensity {
    /// Documented minimum safe roll density: step <= pressure angle / 50.
    pub const MIN_ROLL_STEPS: u32 = 50;
    pub const MIN_RAYS_PER_HALF_PITCH: u32 = 16;
    pub const MIN_FILLET_SEGMENTS: u32 = 2;

    pub const fn new(roll_steps_per_pressure_angle: u32) -> Self {
        Self {
            roll_steps_per_pressure_angle,
            min_rays_per_half_pitch: 96,
            rays_per_roll_step: 4,
            fillet_segments: 8,
        }
    }
}

impl Default for SamplingDensity {
    fn default() -> Self {
        Self::new(Self::MIN_ROLL_STEPS)
    }
}

/// Primary gear parameters. Immutable once handed to [`crate::generate`].
///
/// Lengths share the unit of `module`; angles are in degrees.
#[derive(Debug, Clone, PartialEq)]
pub struct GearSpec {
    pub module: Real,
    pub teeth: usize,
    pub pressure_angle_deg: Real,
    /// Profile shift coefficient `x` (rack moved outward by `x * module`).
    pub profile_shift: Real,
    /// Circular backlash at the pitch circle, split evenly between both flanks.
    pub backlash: Real,
    /// Root clearance coefficient `c`.
    pub clearance: Real,
    pub addendum_coefficient: Real,
    /// Defaults to `addendum_coefficient + clearance` when `None`.
    pub dedendum_coefficient: Option<Real>,
    /// Rack tip fillet radius as a multiple of the module (clamped to what the tip holds).
    pub tip_radius_coefficient: Real,
    pub tip_shape: TipShape,
    pub sampling: SamplingDensity,
}

impl GearSpec {
    /// A standard, unshifted 20° spur gear with no backlash.
    pub fn new(module: Real, teeth: usize) -> Self {
        Self {
            module,
            teeth,
            pressure_angle_deg: 20.0,
            profile_shift: 0.0,
            backlash: 0.0,
            clearance: 0.25,
            addendum_coefficient: 1.0,
            dedendum_coefficient: None,
            tip_radius_coefficient: 0.38,
            tip_shape: TipShape::Rounded,
            sampling: SamplingDensity::default(),
        }
    }

    pub const fn with_pressure_angle(mut self, degrees: Real) -> Self {
        self.pressure_angle_deg = degrees;
        self
    }

    pub const fn with_profile_shift(mut self, x: Real) -> Self {
        self.profile_shift = x;
        self
    }

    pub const fn with_backlash(mut self, backlash: Real) -> Self {
        self.backlash = backlash;
        self
    }

    pub const fn with_clearance(mut self, clearance: Real) -> Self {
        self.clearance = clearance;
        self
    }

    pub const fn with_addendum_coefficient(mut self, coefficient: Real) -> Self {
        self.addendum_coefficient = coefficient;
        self
    }

    pub const fn with_dedendum_coefficient(mut self, coefficient: Real) -> Self {
        self.dedendum_coefficient = Some(coefficient);
        self
    }

    pub const fn with_tip_radius_coefficient(mut self, coefficient: Real) -> Self {
        self.tip_radius_coefficient = coefficient;
        self
    }

    pub const fn with_tip_shape(mut self, shape: TipShape) -> Self {
        self.tip_shape = shape;
        self
    }

    pub const fn with_sampling(mut self, sampling: SamplingDensity) -> Self {
        self.sampling = sampling;
        self
    }

    /// Effective dedendum coefficient `hf`.
    pub fn dedendum(&self) -> Real {
        self.dedendum_coefficient
            .unwrap_or(self.addendum_coefficient + self.clearance)
    }

    /// Bit-exact key for caches. Two specs share a key iff every field is identical.
    pub fn cache_key(&self) -> SpecKey {
        #[allow(clippy::unnecessary_cast)]
        let bits = |value: Real| (value as f64).to_bits();
        SpecKey {
            reals: [
                bits(self.module),
                bits(self.pressure_angle_deg),
                bits(self.profile_shift),
                bits(self.backlash),
                bits(self.clearance),
                bits(self.addendum_coefficient),
                bits(self.dedendum()),
                bits(self.tip_radius_coefficient),
            ],
            teeth: self.teeth,
            tip_shape: self.tip_shape,
            sampling: self.sampling,
        }
    }
}

impl Default for GearSpec {
    fn default() -> Self {
        Self::new(2.0, 20)
    }
}

/// Hashable identity of a [`GearSpec`], see [`GearSpec::cache_key`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SpecKey {
    reals: [u64; 8],
    teeth: usize,
    tip_shape: TipShape,
    sampling: SamplingDensity,
}

/// Renders the command line that reproduces this gear with the `gearcut` binary.
impl Display for GearSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "gearcut -c {} -m {} -p {} -b {} -x {} --clearance {} --addendum {} --dedendum {} \
             --tip-radius {} --tip {} -n {} --rays {} --rays-per-step {} --fillet-segments {}",
            self.teeth,
            self.module,
            self.pressure_angle_deg,
            self.backlash,
            self.profile_shift,
            self.clearance,
            self.addendum_coefficient,
            self.dedendum(),
            self.tip_radius_coefficient,
            self.tip_shape.as_str(),
            self.sampling.roll_steps_per_pressure_angle,
            self.sampling.min_rays_per_half_pitch,
            self.sampling.rays_per_roll_step,
            self.sampling.fillet_segments,
        )
    }
}
