//! **Geometry Validator**
//!
//! Last stage before an outline is handed out. Checks, in order:
//! 1. the point count is consistent and every coordinate is finite,
//! 2. no two non-adjacent segments of a tooth, or across either seam to its
//!    neighbours, intersect,
//! 3. the tooth still has a tip land,
//!
//! and finally converts the envelope's undercut measurement into warnings.
//!
//! All teeth are rigid copies of tooth 0, so checking tooth 0 against itself and both
//! neighbours covers every pair of segments that can come into contact.

use crate::envelope::UndercutReport;
use crate::errors::{GearError, GearWarning, WarningKind};
use crate::float_types::{Real, tolerance};
use crate::resolve::DerivedGeometry;
use crate::tooth::{GearOutline, ToothProfile};
use geo::algorithm::line_intersection::{LineIntersection, line_intersection};
use geo::{BoundingRect, Coord, Intersects, Line};
use nalgebra::Point2;
use tracing::trace;

/// Smallest tooth that can enclose any area: two flank points and two root points.
pub const MIN_TOOTH_POINTS: usize = 4;

/// Run every check on an assembled gear. Returns the non-fatal findings.
pub fn validate(
    geometry: &DerivedGeometry,
    tooth: &ToothProfile,
    outline: &GearOutline,
    undercut: &UndercutReport,
) -> Result<Vec<GearWarning>, GearError> {
    check_point_count(geometry, outline)?;
    check_self_intersection(outline.points(), outline.tooth_len())?;
    check_tip_land(geometry, tooth)?;

    let mut warnings = Vec::new();
    if undercut.is_severe() {
        warnings.extend((0..outline.teeth()).map(|tooth_index| GearWarning {
            kind: WarningKind::UndercutSevere,
            tooth_index,
            magnitude: undercut.fraction,
        }));
    }
    Ok(warnings)
}

fn check_point_count(geometry: &DerivedGeometry, outline: &GearOutline) -> Result<(), GearError> {
    if outline.teeth() != geometry.teeth {
        return Err(GearError::MalformedOutline(format!(
            "outline has {} teeth, expected {}",
            outline.teeth(),
            geometry.teeth
        )));
    }
    if outline.tooth_len() < MIN_TOOTH_POINTS {
        return Err(GearError::MalformedOutline(format!(
            "a tooth needs at least {MIN_TOOTH_POINTS} points, got {}",
            outline.tooth_len()
        )));
    }
    if outline.len() != outline.teeth() * outline.tooth_len() {
        return Err(GearError::MalformedOutline(format!(
            "outline has {} points, expected {} teeth x {}",
            outline.len(),
            outline.teeth(),
            outline.tooth_len()
        )));
    }
    if let Some(index) = outline
        .points()
        .iter()
        .position(|p| !(p.x.is_finite() && p.y.is_finite()))
    {
        return Err(GearError::MalformedOutline(format!(
            "point {index} is not finite"
        )));
    }
    Ok(())
}

/// Segment `i` of the ring runs from point `i` to point `i + 1` (wrapping).
fn segment(points: &[Point2<Real>], i: usize) -> Line<Real> {
    let a = points[i];
    let b = points[(i + 1) % points.len()];
    Line::new(Coord { x: a.x, y: a.y }, Coord { x: b.x, y: b.y })
}

fn check_self_intersection(points: &[Point2<Real>], tooth_len: usize) -> Result<(), GearError> {
    let n = points.len();

    // tooth z-1, tooth 0 and tooth 1 as ring segment indices
    let neighbourhood: Vec<usize> = (0..3 * tooth_len)
        .map(|i| (n - tooth_len + i) % n)
        .collect();
    let adjacent = |a: usize, b: usize| a == b || (a + 1) % n == b || (b + 1) % n == a;

    let mut tested = 0usize;
    for s in 0..tooth_len {
        let line = segment(points, s);
        let bounds = line.bounding_rect();
        for &o in &neighbourhood {
            // pairs inside tooth 0 only once
            if (o < tooth_len && o <= s) || adjacent(s, o) {
                continue;
            }
            let other = segment(points, o);
            if !bounds.intersects(&other.bounding_rect()) {
                continue;
            }
            tested += 1;
            if let Some(hit) = line_intersection(line, other) {
                let at = match hit {
                    LineIntersection::SinglePoint { intersection, .. } => intersection,
                    LineIntersection::Collinear { intersection } => intersection.start,
                };
                return Err(GearError::GeometryInvalid {
                    tooth_index: 0,
                    segment: s,
                    other: o,
                    at: Point2::new(at.x, at.y),
                });
            }
        }
    }
    trace!(segments = tooth_len, tested, "outline is simple");
    Ok(())
}

fn check_tip_land(geometry: &DerivedGeometry, tooth: &ToothProfile) -> Result<(), GearError> {
    let land_width = tooth.tip_land_width();
    // relative to the module so the verdict does not depend on the unit
    if land_width <= tolerance() * geometry.module {
        return Err(GearError::DegenerateTooth {
            tooth_index: 0,
            land_width,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envelope::GapEnvelope;
    use crate::rack::RackProfile;
    use crate::roll::{SerialSweepOps, SweepOps};
    use crate::spec::GearSpec;

    fn assembled(spec: &GearSpec) -> (DerivedGeometry, GapEnvelope, ToothProfile, GearOutline) {
        let g = spec.resolve().unwrap();
        let rack = RackProfile::generate(&g);
        let env = GapEnvelope::extract(&g, SerialSweepOps::new().sweep(&g, &rack));
        let tooth = ToothProfile::assemble(&g, &env);
        let outline = GearOutline::replicate(&tooth, g.teeth);
        (g, env, tooth, outline)
    }

    #[test]
    fn standard_gear_passes() {
        let (g, env, tooth, outline) = assembled(&GearSpec::new(2.0, 24));
        let warnings = validate(&g, &tooth, &outline, env.undercut()).unwrap();
        assert!(warnings.is_empty());
    }

    #[test]
    fn crossing_ring_is_rejected() {
        let bow_tie = [
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(1.0, 0.0),
            Point2::new(0.0, 1.0),
        ];
        match check_self_intersection(&bow_tie, 4) {
            Err(GearError::GeometryInvalid { segment, other, at, .. }) => {
                assert_eq!((segment, other), (0, 2));
                assert!((at - Point2::new(0.5, 0.5)).norm() < 1e-12);
            },
            other => panic!("expected GeometryInvalid, got {other:?}"),
        }

        let square = [
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(0.0, 1.0),
        ];
        assert!(check_self_intersection(&square, 4).is_ok());
    }

    #[test]
    fn wrong_tooth_count_is_malformed() {
        let (g, _, tooth, _) = assembled(&GearSpec::new(2.0, 24));
        let outline = GearOutline::replicate(&tooth, 23);
        assert!(matches!(
            check_point_count(&g, &outline),
            Err(GearError::MalformedOutline(_))
        ));
    }

    #[test]
    fn tip_land_threshold_scales_with_module() {
        for module in [1.0, 1e-3, 1e-6, 1e-8] {
            let (g, env, tooth, outline) = assembled(&GearSpec::new(module, 20));
            assert!((tooth.tip_land_width() / module - 0.6948).abs() < 1e-3);
            assert!(validate(&g, &tooth, &outline, env.undercut()).is_ok(), "module {module}");
        }
    }

    #[test]
    fn pointed_tooth_is_degenerate() {
        let (g, _, tooth, _) = assembled(&GearSpec::new(2.0, 10).with_profile_shift(1.0));
        match check_tip_land(&g, &tooth) {
            Err(GearError::DegenerateTooth { tooth_index, land_width }) => {
                assert_eq!(tooth_index, 0);
                assert!(land_width <= tolerance() * g.module);
            },
            other => panic!("expected DegenerateTooth, got {other:?}"),
        }
    }

    #[test]
    fn undercut_warns_once_per_tooth() {
        let (g, env, tooth, outline) = assembled(&GearSpec::new(2.0, 8));
        let warnings = validate(&g, &tooth, &outline, env.undercut()).unwrap();
        assert_eq!(warnings.len(), 8);
        for (k, w) in warnings.iter().enumerate() {
            assert_eq!(w.kind, WarningKind::UndercutSevere);
            assert_eq!(w.tooth_index, k);
            assert!(w.magnitude > 0.1);
        }
    }
}
