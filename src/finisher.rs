//! Footer stamping, run once the total page count is known.

use crate::canvas::{DrawOp, Page, PageGeometry};
use crate::fonts;
use crate::style::LayoutStyle;

/// Label printed on the left of every footer.
pub fn generated_label(timestamp: &str) -> String {
    format!("Generated at {timestamp}")
}

/// Label printed on the right of every footer.
pub fn page_label(number: usize, total: usize) -> String {
    format!("Page {number} of {total}")
}

/// Replaces the footer of every page with a separator rule, the generation
/// timestamp and `Page i of N`.
///
/// Footers are rebuilt from scratch, so finishing the same pages twice leaves
/// exactly one footer per page.
pub fn finish(pages: &mut [Page], geometry: &PageGeometry, style: &LayoutStyle, timestamp: &str) {
    let total = pages.len();
    let footer_style = style.footer();
    let size = footer_style.size_pt();
    let rule_y = geometry.footer_top();
    let baseline = rule_y + 6.0 + size;
    let left = geometry.content_left();
    let right = geometry.content_right();
    let generated = generated_label(timestamp);

    for page in pages.iter_mut() {
        let label = page_label(page.number(), total);
        let label_width = fonts::text_width(&label, footer_style.face(), size);
        page.set_footer(vec![
            DrawOp::Line {
                from: (left, rule_y),
                to: (right, rule_y),
                color: style.palette.rule,
                thickness: style.rule_thickness,
            },
            DrawOp::Text {
                x: left,
                baseline,
                text: generated.clone(),
                style: footer_style,
            },
            DrawOp::Text {
                x: right - label_width,
                baseline,
                text: label,
                style: footer_style,
            },
        ]);
    }
}
