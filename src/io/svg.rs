//! SVG preview of an outline: a single closed path, Y pointing up.

use crate::tooth::GearOutline;
use svg::Document;
use svg::node::element::Path;
use svg::node::element::path::Data;

/// Render `outline` as a standalone SVG document fitted to its largest radius.
pub fn to_svg(outline: &GearOutline) -> String {
    let extent = outline.max_radius() * 1.05;
    let mut data = Data::new();
    for (i, p) in outline.points().iter().enumerate() {
        #[allow(clippy::unnecessary_cast)]
        let xy = (p.x as f32, -p.y as f32);
        data = if i == 0 { data.move_to(xy) } else { data.line_to(xy) };
    }
    let path = Path::new()
        .set("fill", "none")
        .set("stroke", "black")
        .set("stroke-width", format!("{}", extent / 500.0))
        .set("d", data.close());

    Document::new()
        .set(
            "viewBox",
            format!("{} {} {} {}", -extent, -extent, 2.0 * extent, 2.0 * extent),
        )
        .add(path)
        .to_string()
}
