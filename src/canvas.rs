//! Page geometry and the drawing cursor used by the layout engine.
//!
//! All coordinates are PDF points measured from the top-left corner of the
//! page; conversion to the bottom-left millimetre space of the PDF backend
//! happens once, in [`crate::pdf`]. Drawing calls are recorded as [`DrawOp`]s
//! so a laid-out document can be inspected before it is serialized.

use crate::error::RenderError;
use crate::style::{Rgb, TextStyle};

/// Height reserved under the content limit for the page footer.
pub const FOOTER_BAND_HEIGHT: f64 = 18.0;

/// Physical page dimensions in points.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PageSize {
    pub width: f64,
    pub height: f64,
}

impl PageSize {
    /// ISO A4, 210 x 297 mm.
    pub const A4: PageSize = PageSize {
        width: 595.28,
        height: 841.89,
    };

    /// US Letter, 8.5 x 11 in.
    pub const LETTER: PageSize = PageSize {
        width: 612.0,
        height: 792.0,
    };

    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

impl Default for PageSize {
    fn default() -> Self {
        Self::A4
    }
}

/// Page margins in points.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Margins {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Margins {
    pub fn new(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    /// The same margin on all four sides.
    pub fn uniform(value: f64) -> Self {
        Self::new(value, value, value, value)
    }
}

impl Default for Margins {
    fn default() -> Self {
        Self::uniform(50.0)
    }
}

impl From<f64> for Margins {
    fn from(value: f64) -> Self {
        Self::uniform(value)
    }
}

/// Axis-aligned rectangle, `y` growing downwards.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }
}

/// Validated page layout: size, margins and the lowest y content may reach.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PageGeometry {
    size: PageSize,
    margins: Margins,
    content_limit: f64,
}

impl PageGeometry {
    /// Validates and builds a geometry.
    ///
    /// `content_limit` is measured from the top edge of the page. It has to
    /// leave room for the footer band above the bottom margin.
    pub fn new(size: PageSize, margins: Margins, content_limit: f64) -> Result<Self, RenderError> {
        let values = [
            size.width,
            size.height,
            margins.top,
            margins.right,
            margins.bottom,
            margins.left,
            content_limit,
        ];
        if values.iter().any(|value| !value.is_finite()) {
            return Err(RenderError::Geometry(
                "dimensions must be finite numbers".into(),
            ));
        }
        if size.width <= 0.0 || size.height <= 0.0 {
            return Err(RenderError::Geometry(format!(
                "page size {}x{} is not positive",
                size.width, size.height
            )));
        }
        if [margins.top, margins.right, margins.bottom, margins.left]
            .iter()
            .any(|margin| *margin < 0.0)
        {
            return Err(RenderError::Geometry("margins must not be negative".into()));
        }
        if margins.left + margins.right >= size.width {
            return Err(RenderError::Geometry(format!(
                "horizontal margins ({} + {}) leave no content width on a {}pt wide page",
                margins.left, margins.right, size.width
            )));
        }
        if content_limit <= margins.top {
            return Err(RenderError::Geometry(format!(
                "content limit {content_limit} is above the top margin {}",
                margins.top
            )));
        }
        let footer_top = size.height - margins.bottom - FOOTER_BAND_HEIGHT;
        if content_limit > footer_top {
            return Err(RenderError::Geometry(format!(
                "content limit {content_limit} overlaps the footer band starting at {footer_top}"
            )));
        }

        Ok(Self {
            size,
            margins,
            content_limit,
        })
    }

    /// A4 with 50pt margins and content ending at 700pt from the top.
    pub fn a4() -> Self {
        Self {
            size: PageSize::A4,
            margins: Margins::default(),
            content_limit: 700.0,
        }
    }

    pub fn size(&self) -> PageSize {
        self.size
    }

    pub fn margins(&self) -> Margins {
        self.margins
    }

    /// Lowest y (from the top edge) that any row may reach.
    pub fn content_limit(&self) -> f64 {
        self.content_limit
    }

    pub fn content_left(&self) -> f64 {
        self.margins.left
    }

    pub fn content_right(&self) -> f64 {
        self.size.width - self.margins.right
    }

    pub fn content_width(&self) -> f64 {
        self.content_right() - self.content_left()
    }

    pub fn content_top(&self) -> f64 {
        self.margins.top
    }

    /// Vertical space available on an empty page.
    pub fn usable_height(&self) -> f64 {
        self.content_limit - self.content_top()
    }

    /// Top of the band holding the footer rule and labels.
    pub fn footer_top(&self) -> f64 {
        self.size.height - self.margins.bottom - FOOTER_BAND_HEIGHT
    }
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self::a4()
    }
}

/// One recorded drawing operation.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    /// Single line of text starting at `x` on the given baseline.
    Text {
        x: f64,
        baseline: f64,
        text: String,
        style: TextStyle,
    },
    /// Solid rectangle without outline.
    FillRect { rect: Rect, color: Rgb },
    /// Straight stroke between two points.
    Line {
        from: (f64, f64),
        to: (f64, f64),
        color: Rgb,
        thickness: f64,
    },
}

impl DrawOp {
    /// The text of a text operation.
    pub fn text(&self) -> Option<&str> {
        match self {
            DrawOp::Text { text, .. } => Some(text),
            DrawOp::FillRect { .. } | DrawOp::Line { .. } => None,
        }
    }
}

/// A page of the laid-out document.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Page {
    number: usize,
    body: Vec<DrawOp>,
    footer: Vec<DrawOp>,
}

impl Page {
    fn new(number: usize) -> Self {
        Self {
            number,
            ..Self::default()
        }
    }

    /// One-based page number.
    pub fn number(&self) -> usize {
        self.number
    }

    /// Operations drawn by the layout engine.
    pub fn body(&self) -> &[DrawOp] {
        &self.body
    }

    /// Operations added by the finisher.
    pub fn footer(&self) -> &[DrawOp] {
        &self.footer
    }

    pub(crate) fn set_footer(&mut self, footer: Vec<DrawOp>) {
        self.footer = footer;
    }

    /// Strings drawn in the page body, in drawing order.
    pub fn body_texts(&self) -> impl Iterator<Item = &str> {
        self.body.iter().filter_map(DrawOp::text)
    }

    /// Strings drawn in the page footer, in drawing order.
    pub fn footer_texts(&self) -> impl Iterator<Item = &str> {
        self.footer.iter().filter_map(DrawOp::text)
    }

    /// Every string on the page.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.body_texts().chain(self.footer_texts())
    }
}

/// Outcome of [`Canvas::place`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Placement {
    /// The block fits below the cursor on the current page.
    SamePage,
    /// The page was broken; the cursor is back at the top margin.
    NewPage,
}

/// Paginated drawing surface with a vertical cursor.
///
/// The canvas is the only place where pages are added, so every page break in
/// the document goes through [`Canvas::place`] or [`Canvas::break_page`].
#[derive(Debug)]
pub struct Canvas {
    geometry: PageGeometry,
    pages: Vec<Page>,
    y: f64,
}

impl Canvas {
    /// Creates a canvas holding one empty page with the cursor at the top margin.
    pub fn new(geometry: PageGeometry) -> Self {
        Self {
            geometry,
            pages: vec![Page::new(1)],
            y: geometry.content_top(),
        }
    }

    pub fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    /// Current cursor position, from the top edge of the page.
    pub fn y(&self) -> f64 {
        self.y
    }

    /// One-based number of the page being drawn.
    pub fn page_number(&self) -> usize {
        self.pages.len()
    }

    /// Space left between the cursor and the content limit.
    pub fn remaining(&self) -> f64 {
        self.geometry.content_limit() - self.y
    }

    /// Whether a block of `height` fits below the cursor.
    pub fn fits(&self, height: f64) -> bool {
        height <= self.remaining()
    }

    /// Whether nothing has been drawn on the current page yet.
    pub fn at_page_top(&self) -> bool {
        self.y <= self.geometry.content_top()
    }

    /// Ensures a block of `height` can be drawn at the cursor.
    ///
    /// Breaks the page when the block would cross the content limit. A block
    /// taller than an empty page is placed on a fresh page anyway; callers
    /// that care clip it to [`PageGeometry::usable_height`] beforehand.
    pub fn place(&mut self, height: f64) -> Placement {
        if self.fits(height) || self.at_page_top() {
            Placement::SamePage
        } else {
            self.break_page();
            Placement::NewPage
        }
    }

    /// Starts a new page and moves the cursor to the top margin.
    pub fn break_page(&mut self) {
        let number = self.pages.len() + 1;
        self.pages.push(Page::new(number));
        self.y = self.geometry.content_top();
    }

    /// Moves the cursor down.
    pub fn advance(&mut self, height: f64) {
        self.y += height;
    }

    fn current(&mut self) -> &mut Page {
        let index = self.pages.len() - 1;
        &mut self.pages[index]
    }

    /// Draws a single line of text with its baseline at `baseline`.
    pub fn text(&mut self, x: f64, baseline: f64, text: impl Into<String>, style: TextStyle) {
        let text = text.into();
        if text.is_empty() {
            return;
        }
        self.current().body.push(DrawOp::Text {
            x,
            baseline,
            text,
            style,
        });
    }

    pub fn fill_rect(&mut self, rect: Rect, color: Rgb) {
        self.current().body.push(DrawOp::FillRect { rect, color });
    }

    pub fn line(&mut self, from: (f64, f64), to: (f64, f64), color: Rgb, thickness: f64) {
        self.current().body.push(DrawOp::Line {
            from,
            to,
            color,
            thickness,
        });
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn into_pages(self) -> Vec<Page> {
        self.pages
    }
}
