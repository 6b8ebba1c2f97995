//! Serializes laid-out pages into PDF bytes with `printpdf`.

use std::collections::HashMap;
use std::io::BufWriter;

use printpdf::{Color, IndirectFontRef, Line, Mm, PdfDocument, PdfLayerReference, Point};

use crate::canvas::{DrawOp, Page, PageSize, Rect};
use crate::error::RenderError;
use crate::fonts::FontFace;
use crate::style::Rgb;

const LAYER: &str = "Content";

fn mm(points: f64) -> Mm {
    Mm(points * 25.4 / 72.0)
}

fn color(rgb: Rgb) -> Color {
    let (r, g, b) = rgb.unit();
    Color::Rgb(printpdf::Rgb::new(r, g, b, None))
}

/// Converts top-left point coordinates into printpdf's bottom-left millimetres.
struct Projection {
    height: f64,
}

impl Projection {
    fn point(&self, x: f64, y: f64) -> Point {
        Point::new(mm(x), mm(self.height - y))
    }
}

/// Writes one PDF page per entry of `pages`, body first, then footer.
pub fn write_pdf(title: &str, size: PageSize, pages: &[Page]) -> Result<Vec<u8>, RenderError> {
    let (document, first_page, first_layer) =
        PdfDocument::new(title, mm(size.width), mm(size.height), LAYER);

    let mut fonts = HashMap::new();
    for face in [FontFace::Regular, FontFace::Bold, FontFace::Italic] {
        let font = document
            .add_builtin_font(face.builtin())
            .map_err(|err| RenderError::Pdf(err.to_string()))?;
        fonts.insert(face, font);
    }

    let projection = Projection {
        height: size.height,
    };
    for (index, page) in pages.iter().enumerate() {
        let layer = if index == 0 {
            document.get_page(first_page).get_layer(first_layer)
        } else {
            let (page_index, layer_index) =
                document.add_page(mm(size.width), mm(size.height), LAYER);
            document.get_page(page_index).get_layer(layer_index)
        };
        for op in page.body().iter().chain(page.footer()) {
            draw(&layer, &projection, &fonts, op)?;
        }
    }

    let mut writer = BufWriter::new(Vec::<u8>::new());
    document
        .save(&mut writer)
        .map_err(|err| RenderError::Pdf(err.to_string()))?;
    writer
        .into_inner()
        .map_err(|err| RenderError::Io(err.into_error()))
}

fn draw(
    layer: &PdfLayerReference,
    projection: &Projection,
    fonts: &HashMap<FontFace, IndirectFontRef>,
    op: &DrawOp,
) -> Result<(), RenderError> {
    match op {
        DrawOp::Text {
            x,
            baseline,
            text,
            style,
        } => {
            let font = fonts
                .get(&style.face())
                .ok_or_else(|| RenderError::Pdf(format!("font {:?} was not loaded", style.face())))?;
            layer.set_fill_color(color(style.color()));
            layer.use_text(
                text.as_str(),
                style.size().into(),
                mm(*x),
                mm(projection.height - baseline),
                font,
            );
        }
        DrawOp::FillRect { rect, color: fill } => {
            layer.set_fill_color(color(*fill));
            layer.add_shape(Line {
                points: corners(projection, rect),
                is_closed: true,
                has_fill: true,
                has_stroke: false,
                is_clipping_path: false,
            });
        }
        DrawOp::Line {
            from,
            to,
            color: stroke,
            thickness,
        } => {
            layer.set_outline_color(color(*stroke));
            layer.set_outline_thickness(*thickness);
            layer.add_shape(Line {
                points: vec![
                    (projection.point(from.0, from.1), false),
                    (projection.point(to.0, to.1), false),
                ],
                is_closed: false,
                has_fill: false,
                has_stroke: true,
                is_clipping_path: false,
            });
        }
    }
    Ok(())
}

fn corners(projection: &Projection, rect: &Rect) -> Vec<(Point, bool)> {
    vec![
        (projection.point(rect.x, rect.y), false),
        (projection.point(rect.right(), rect.y), false),
        (projection.point(rect.right(), rect.bottom()), false),
        (projection.point(rect.x, rect.bottom()), false),
    ]
}
