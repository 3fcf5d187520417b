//! Plain text ring: one `x y` pair per line, six decimals, closing point repeated.

use super::IoError;
use crate::float_types::Real;
use crate::tooth::GearOutline;
use nalgebra::Point2;
use std::fmt::Write;

/// Render the closed ring of `outline`.
pub fn to_text(outline: &GearOutline) -> String {
    let mut out = String::with_capacity(24 * (outline.len() + 1));
    for p in outline.closed_points() {
        // writing into a String cannot fail
        let _ = writeln!(out, "{:.6} {:.6}", p.x, p.y);
    }
    out
}

/// Parse text written by [`to_text`] back into a ring (closing point removed).
pub fn from_text(text: &str) -> Result<Vec<Point2<Real>>, IoError> {
    let mut points = Vec::new();
    for (number, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let mut fields = line.split_whitespace();
        let (Some(x), Some(y), None) = (fields.next(), fields.next(), fields.next()) else {
            return Err(IoError::MalformedInput(format!(
                "line {}: expected `x y`, got `{line}`",
                number + 1
            )));
        };
        points.push(Point2::new(x.parse::<Real>()?, y.parse::<Real>()?));
    }
    if points.len() > 1 && points.first() == points.last() {
        points.pop();
    }
    Ok(points)
}
