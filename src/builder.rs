//! Renderer configuration and the render pipeline.

use chrono::format::{Item, StrftimeItems};
use chrono::{Local, NaiveDate, NaiveDateTime};
use log::info;

use crate::assembler::ReportView;
use crate::canvas::{Margins, Page, PageGeometry, PageSize};
use crate::error::RenderError;
use crate::finisher;
use crate::layout::{self, LayoutText, SectionMark};
use crate::pdf;
use crate::style::LayoutStyle;

/// Title printed at the top of every report.
pub const DEFAULT_TITLE: &str = "Daily Work Report";

/// Default `chrono` format for calendar dates.
pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";

/// Distance of the content limit from the bottom edge on the default A4
/// geometry; kept when only the paper size changes.
const DEFAULT_BOTTOM_RESERVE: f64 = 841.89 - 700.0;

/// Builder for [`ReportRenderer`] instances.
#[derive(Clone, Debug, Default)]
pub struct RendererBuilder {
    paper_size: Option<PageSize>,
    margins: Option<Margins>,
    content_limit: Option<f64>,
    style: Option<LayoutStyle>,
    generated_at: Option<NaiveDateTime>,
    date_format: Option<String>,
    title: Option<String>,
}

impl RendererBuilder {
    /// Creates a builder for A4 pages with the default style.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_paper_size(mut self, paper_size: PageSize) -> Self {
        self.paper_size = Some(paper_size);
        self
    }

    pub fn with_margins(mut self, margins: impl Into<Margins>) -> Self {
        self.margins = Some(margins.into());
        self
    }

    /// Sets the lowest y, from the top edge, that table rows may reach.
    pub fn with_content_limit(mut self, content_limit: f64) -> Self {
        self.content_limit = Some(content_limit);
        self
    }

    pub fn with_style(mut self, style: LayoutStyle) -> Self {
        self.style = Some(style);
        self
    }

    /// Pins the footer timestamp instead of reading the clock at render time.
    pub fn with_generated_at(mut self, generated_at: NaiveDateTime) -> Self {
        self.generated_at = Some(generated_at);
        self
    }

    /// Sets the `chrono` format used for dates; times append `%H:%M`.
    pub fn with_date_format(mut self, date_format: impl Into<String>) -> Self {
        self.date_format = Some(date_format.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Validates the configuration and builds the renderer.
    pub fn build(self) -> Result<ReportRenderer, RenderError> {
        let size = self.paper_size.unwrap_or_default();
        let margins = self.margins.unwrap_or_default();
        let content_limit = self
            .content_limit
            .unwrap_or(size.height - DEFAULT_BOTTOM_RESERVE);
        let geometry = PageGeometry::new(size, margins, content_limit)?;

        let style = self.style.unwrap_or_default();
        if style.row_height <= 0.0 || style.header_height <= 0.0 || style.line_height <= 0.0 {
            return Err(RenderError::Geometry(
                "row, header and line heights must be positive".into(),
            ));
        }
        if style.header_height + style.row_height + style.section_title_height
            > geometry.usable_height()
        {
            return Err(RenderError::Geometry(format!(
                "a section title with one row does not fit in {}pt of usable height",
                geometry.usable_height()
            )));
        }

        let text = LayoutText {
            title: self.title.unwrap_or_else(|| DEFAULT_TITLE.to_owned()),
            date_format: self
                .date_format
                .unwrap_or_else(|| DEFAULT_DATE_FORMAT.to_owned()),
        };
        validate_format(&text)?;

        Ok(ReportRenderer {
            geometry,
            style,
            generated_at: self.generated_at,
            text,
        })
    }
}

/// Rejects formats chrono cannot parse, and formats that need fields a
/// calendar date or a report timestamp does not carry (`%z` and the like).
fn validate_format(text: &LayoutText) -> Result<(), RenderError> {
    let format = text.date_format.as_str();
    let invalid = || RenderError::Format(format.to_owned());
    if format.trim().is_empty()
        || StrftimeItems::new(format).any(|item| matches!(item, Item::Error))
    {
        return Err(invalid());
    }

    let date = NaiveDate::from_ymd_opt(2024, 1, 31).ok_or_else(invalid)?;
    text.format_date(date)?;
    text.format_timestamp(date.and_hms_opt(23, 59, 0).ok_or_else(invalid)?)?;
    Ok(())
}

/// Laid-out report before serialization.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderedLayout {
    /// Pages with body and footer operations.
    pub pages: Vec<Page>,
    /// Where each section starts, in drawing order.
    pub sections: Vec<SectionMark>,
}

/// Final PDF output.
#[derive(Clone, Debug)]
pub struct RenderedPdf {
    pub bytes: Vec<u8>,
    pub page_count: usize,
    pub sections: Vec<SectionMark>,
}

/// Renders assembled reports into paginated PDF documents.
///
/// A renderer holds only configuration; every call builds a fresh document,
/// so one renderer can serve any number of reports.
#[derive(Clone, Debug)]
pub struct ReportRenderer {
    geometry: PageGeometry,
    style: LayoutStyle,
    generated_at: Option<NaiveDateTime>,
    text: LayoutText,
}

impl ReportRenderer {
    pub fn builder() -> RendererBuilder {
        RendererBuilder::new()
    }

    pub fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    pub fn style(&self) -> &LayoutStyle {
        &self.style
    }

    pub fn date_format(&self) -> &str {
        &self.text.date_format
    }

    /// Lays out `view` and stamps the footers.
    pub fn layout(&self, view: &ReportView) -> Result<RenderedLayout, RenderError> {
        let layout = layout::lay_out(view, self.geometry, &self.style, &self.text)?;
        let mut pages = layout.pages;

        let generated_at = self
            .generated_at
            .unwrap_or_else(|| Local::now().naive_local());
        let timestamp = self.text.format_timestamp(generated_at)?;
        finisher::finish(&mut pages, &self.geometry, &self.style, &timestamp);

        Ok(RenderedLayout {
            pages,
            sections: layout.sections,
        })
    }

    /// Lays out `view` and serializes it to PDF bytes.
    pub fn render(&self, view: &ReportView) -> Result<RenderedPdf, RenderError> {
        let layout = self.layout(view)?;
        let bytes = pdf::write_pdf(&self.text.title, self.geometry.size(), &layout.pages)?;
        info!(
            "rendered report {} ({} pages, {} bytes)",
            view.report.id,
            layout.pages.len(),
            bytes.len()
        );
        Ok(RenderedPdf {
            bytes,
            page_count: layout.pages.len(),
            sections: layout.sections,
        })
    }

    /// Renders `view` and adds an outline entry per section.
    #[cfg(feature = "bookmarks")]
    pub fn render_with_bookmarks(&self, view: &ReportView) -> Result<RenderedPdf, RenderError> {
        let mut rendered = self.render(view)?;
        rendered.bytes = crate::bookmarks::apply_section_bookmarks(&rendered.bytes, &rendered.sections)?;
        Ok(rendered)
    }
}
