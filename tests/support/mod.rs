//! Test support library
//! Provides various helper functions & utilities for tests.

use gearcut::float_types::Real;
use gearcut::roll::SerialSweepOps;
use gearcut::{GearSpec, GeneratedGear, generate_with};
use nalgebra::Point2;

/// Quick helper to compare floating-point results with an acceptable tolerance.
pub fn approx_eq(a: Real, b: Real, eps: Real) -> bool {
    (a - b).abs() < eps
}

/// `(radius, angle)` of a point about the gear centre.
pub fn polar(p: &Point2<Real>) -> (Real, Real) {
    (p.coords.norm(), p.y.atan2(p.x))
}

/// Generate with the serial sweep so results do not depend on the `parallel` feature.
pub fn cut(spec: &GearSpec) -> GeneratedGear {
    generate_with(spec, &SerialSweepOps::new())
        .unwrap_or_else(|e| panic!("generation failed for {spec}: {e}"))
}

/// Largest distance between corresponding points of two rings.
pub fn max_point_distance(a: &[Point2<Real>], b: &[Point2<Real>]) -> Real {
    assert_eq!(a.len(), b.len(), "rings differ in length");
    a.iter()
        .zip(b)
        .map(|(p, q)| (p - q).norm())
        .fold(0.0, Real::max)
}
