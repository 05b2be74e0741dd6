//! Serialization of primitive streams into standalone SVG documents.

use std::fmt::Write;

use glam::Vec2;

use crate::primitive::{Primitive, Segment};

/// Writes one `<path>` element for a segment.
pub fn segment_element(segment: &Segment) -> String {
    let cap = if segment.style.round { "round" } else { "butt" };
    let join = if segment.style.round { "round" } else { "miter" };
    format!(
        r#"<path d="{}" fill="none" stroke="{}" stroke-opacity="{:.3}" stroke-width="{}" stroke-linecap="{}" stroke-linejoin="{}"/>"#,
        segment.path_data(),
        segment.style.color.to_hex(),
        segment.style.color.a as f32 / 255.0,
        segment.style.width.max(0.0),
        cap,
        join,
    )
}

/// Renders primitives, in emission order, into an SVG document.
///
/// ### Parameters
/// - `primitives` - The stream produced by a construction.
/// - `size` - Width and height of the document's viewport.
/// - `leaf_markup` - Turns a leaf primitive into an SVG fragment.
///
/// ### Returns
/// The complete document as a string.
pub fn render<L>(
    primitives: &[Primitive<L>],
    size: Vec2,
    mut leaf_markup: impl FnMut(&L) -> String,
) -> String {
    let mut doc = String::with_capacity(128 + primitives.len() * 96);
    // Writing into a String cannot fail.
    let _ = writeln!(
        doc,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
        w = size.x,
        h = size.y,
    );
    for p in primitives {
        let element = match p {
            Primitive::Segment(s) => segment_element(s),
            Primitive::Leaf(l) => leaf_markup(l),
        };
        let _ = writeln!(doc, "  {element}");
    }
    doc.push_str("</svg>\n");
    doc
}
