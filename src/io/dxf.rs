//! DXF export: one LINE entity per ring segment on layer `GEAR`.

use super::IoError;
use crate::float_types::{LengthUnit, Real};
use crate::tooth::GearOutline;
use nalgebra::Point2;
use std::io::Cursor;

use dxf::Drawing;
use dxf::entities::*;
use dxf::enums::{AcadVersion, Units};
use dxf::tables::Layer;

/// Layer every gear entity is written to.
pub const LAYER: &str = "GEAR";

/// Export the closed ring of `outline` as DXF. `unit` is recorded in `$INSUNITS`.
///
/// ## Returns
/// The DXF file as bytes.
pub fn to_dxf(outline: &GearOutline, unit: LengthUnit) -> Result<Vec<u8>, IoError> {
    let mut drawing = Drawing::new();
    drawing.header.version = AcadVersion::R2000;
    drawing.header.default_drawing_units = match unit {
        LengthUnit::Millimeters => Units::Millimeters,
        LengthUnit::Inches => Units::Inches,
    };
    drawing.add_layer(Layer {
        name: LAYER.to_string(),
        ..Default::default()
    });

    let points = outline.points();
    for (i, a) in points.iter().enumerate() {
        let b = points[(i + 1) % points.len()];
        #[allow(clippy::unnecessary_cast)]
        let line = Line::new(
            dxf::Point::new(a.x as f64, a.y as f64, 0.0),
            dxf::Point::new(b.x as f64, b.y as f64, 0.0),
        );
        let mut entity = Entity::new(EntityType::Line(line));
        entity.common.layer = LAYER.to_string();
        drawing.add_entity(entity);
    }

    let mut buffer = Vec::new();
    drawing.save(&mut buffer)?;
    Ok(buffer)
}

/// Read the LINE entities of a DXF file back into an ordered ring.
///
/// Lines must be chained (each one starting where the previous ended), as written by
/// [`to_dxf`].
pub fn from_dxf(dxf_data: &[u8]) -> Result<Vec<Point2<Real>>, IoError> {
    let drawing = Drawing::load(&mut Cursor::new(dxf_data))?;
    let mut points: Vec<Point2<Real>> = Vec::new();
    let mut previous_end: Option<Point2<Real>> = None;

    for entity in drawing.entities() {
        let EntityType::Line(line) = &entity.specific else {
            continue;
        };
        let start = Point2::new(line.p1.x as Real, line.p1.y as Real);
        let end = Point2::new(line.p2.x as Real, line.p2.y as Real);
        if let Some(previous) = previous_end {
            if (previous - start).norm() > crate::float_types::tolerance() {
                return Err(IoError::MalformedInput(format!(
                    "LINE {} starts at {start} but the previous one ended at {previous}",
                    points.len()
                )));
            }
        }
        points.push(start);
        previous_end = Some(end);
    }

    if points.is_empty() {
        return Err(IoError::MalformedInput("no LINE entities".to_string()));
    }
    Ok(points)
}

/// Length unit recorded in a DXF file's `$INSUNITS`, if it is one we write.
pub fn dxf_unit(dxf_data: &[u8]) -> Result<Option<LengthUnit>, IoError> {
    let drawing = Drawing::load(&mut Cursor::new(dxf_data))?;
    Ok(match drawing.header.default_drawing_units {
        Units::Millimeters => Some(LengthUnit::Millimeters),
        Units::Inches => Some(LengthUnit::Inches),
        _ => None,
    })
}
