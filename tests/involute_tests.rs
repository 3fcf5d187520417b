//! The swept envelope checked against the closed-form involute of the base circle.

use gearcut::envelope::GapEnvelope;
use gearcut::float_types::{PI, Real};
use gearcut::involute::{flank_half_angle, pressure_angle_at};
use gearcut::rack::RackProfile;
use gearcut::roll::{SerialSweepOps, SweepOps};
use gearcut::{GearSpec, ProfileRegion};

mod support;

use crate::support::{cut, polar};

fn envelope(spec: &GearSpec) -> GapEnvelope {
    let g = spec.resolve().unwrap();
    let rack = RackProfile::generate(&g);
    GapEnvelope::extract(&g, SerialSweepOps::new().sweep(&g, &rack))
}

#[test]
fn envelope_flank_matches_involute() {
    let specs = [
        GearSpec::new(2.0, 30),
        GearSpec::new(2.0, 30).with_pressure_angle(14.5),
        GearSpec::new(2.0, 30).with_pressure_angle(25.0),
        GearSpec::new(1.0, 60),
        GearSpec::new(2.0, 30).with_backlash(0.1),
        GearSpec::new(2.0, 30).with_profile_shift(0.5),
    ];
    for spec in specs {
        let env = envelope(&spec);
        let deviation = env.involute_deviation();
        assert!(deviation < 1e-3 * spec.module, "{spec}: {deviation}");
        assert!(!env.undercut().is_severe(), "{spec}: {:?}", env.undercut());
    }
}

#[test]
fn outline_flank_points_lie_on_involute() {
    let spec = GearSpec::new(2.0, 30);
    let gear = cut(&spec);
    let g = &gear.geometry;

    let mut checked = 0;
    for (p, region) in gear.tooth.points().iter().zip(gear.tooth.regions()) {
        if *region != ProfileRegion::Flank {
            continue;
        }
        let (radius, angle) = polar(p);
        let ideal = flank_half_angle(g, radius).unwrap();
        // angular error turned into distance along the flank normal
        let normal = (angle.abs() - ideal).abs() * radius * pressure_angle_at(radius, g.base_radius).cos();
        assert!(normal < 1e-3 * spec.module, "{p}: {normal}");
        checked += 1;
    }
    assert!(checked > 40, "{checked}");
}

#[test]
fn flank_sits_above_form_radius() {
    let gear = cut(&GearSpec::new(3.0, 25));
    let g = &gear.geometry;
    for (p, region) in gear.tooth.points().iter().zip(gear.tooth.regions()) {
        let radius = p.coords.norm();
        match region {
            ProfileRegion::Flank => assert!(radius >= g.form_radius - 1e-9),
            ProfileRegion::Root => assert!((radius - g.dedendum_radius).abs() < 1e-3),
            ProfileRegion::Tip => assert!((radius - g.addendum_radius).abs() < 1e-9),
            ProfileRegion::Fillet => {
                assert!(radius >= g.dedendum_radius - 1e-9 && radius <= g.form_radius + 0.01 * g.module)
            },
        }
    }
    let half_pitch = PI / g.teeth as Real;
    assert!(gear.tooth.points().iter().all(|p| polar(p).1.abs() <= half_pitch + 1e-12));
}
