//! Generation errors and warnings

use crate::float_types::Real;
use nalgebra::Point2;
use std::fmt::Display;

/// All the fatal issues a generation request can run into.
///
/// Parameter errors abort before any geometry is computed; the geometry errors abort
/// after the outline is assembled but before it is returned.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GearError {
    /// (InvalidParameter) An input is out of range or the derived dimensions are inconsistent
    #[error("(InvalidParameter) `{field}` {reason}")]
    InvalidParameter { field: &'static str, reason: String },
    /// (DegenerateTooth) The tooth has been cut to a point, no tip land is left
    #[error(
        "(DegenerateTooth) tooth {tooth_index} has no tip land (measured width {land_width})"
    )]
    DegenerateTooth { tooth_index: usize, land_width: Real },
    /// (GeometryInvalid) The assembled outline is not a simple polygon
    #[error(
        "(GeometryInvalid) tooth {tooth_index}: segment {segment} crosses segment {other} at: {at}"
    )]
    GeometryInvalid {
        tooth_index: usize,
        segment: usize,
        other: usize,
        at: Point2<Real>,
    },
    /// (GeometryInvalid) The outline is empty, malformed or has non-finite coordinates
    #[error("(GeometryInvalid) {0}")]
    MalformedOutline(String),
}

impl GearError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        GearError::InvalidParameter {
            field,
            reason: reason.into(),
        }
    }

    /// Name of the offending input, if the error is caller-correctable.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            GearError::InvalidParameter { field, .. } => Some(field),
            _ => None,
        }
    }
}

/// Non-fatal findings returned next to a best-effort outline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WarningKind {
    /// The trochoidal root fillet eats into the involute flank beyond the allowed fraction
    UndercutSevere,
}

/// A structured warning: what, where, and how much.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GearWarning {
    pub kind: WarningKind,
    pub tooth_index: usize,
    /// For `UndercutSevere`: fraction (0..1) of the involute flank arc length consumed
    pub magnitude: Real,
}

impl Display for GearWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            WarningKind::UndercutSevere => write!(
                f,
                "(UndercutSevere) tooth {}: {:.1}% of the involute flank is undercut",
                self.tooth_index,
                self.magnitude * 100.0
            ),
        }
    }
}
