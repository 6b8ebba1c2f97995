//! Download contract for the "export report as PDF" action.

use std::fmt;

use log::error;

use crate::assembler::{self, ReportView};
use crate::builder::{RenderedPdf, ReportRenderer};
use crate::error::{NotFound, RenderError};
use crate::model::ReportId;
use crate::store::ReportRepository;

/// Content type of every export.
pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// Message shown to the caller when rendering fails.
pub const RENDER_FAILURE_MESSAGE: &str = "could not generate report";

/// A rendered report ready to be sent as a file download.
#[derive(Clone, Debug)]
pub struct PdfDownload {
    pub file_name: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

/// Why an export did not produce a document.
#[derive(Debug)]
pub enum ExportError {
    /// The report or its project does not exist.
    NotFound(NotFound),
    /// Layout or serialization failed.
    RenderFailure(RenderError),
}

impl ExportError {
    /// HTTP status a web handler should answer with.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::NotFound(_) => 404,
            Self::RenderFailure(_) => 500,
        }
    }

    /// Message safe to show to the user; render internals stay in the logs.
    pub fn public_message(&self) -> String {
        match self {
            Self::NotFound(err) => err.to_string(),
            Self::RenderFailure(_) => RENDER_FAILURE_MESSAGE.to_owned(),
        }
    }
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound(err) => write!(f, "{err}"),
            Self::RenderFailure(_) => f.write_str(RENDER_FAILURE_MESSAGE),
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::NotFound(err) => Some(err),
            Self::RenderFailure(err) => Some(err),
        }
    }
}

impl From<NotFound> for ExportError {
    fn from(err: NotFound) -> Self {
        Self::NotFound(err)
    }
}

impl From<RenderError> for ExportError {
    fn from(err: RenderError) -> Self {
        Self::RenderFailure(err)
    }
}

/// File name offered for the download, e.g. `rdo-12-0007.pdf`.
pub fn file_name(project: impl fmt::Display, report_number: u32) -> String {
    format!("rdo-{project}-{report_number:04}.pdf")
}

/// Assembles report `id` from `repository` and renders it.
///
/// Nothing is written back to the repository, whether the export succeeds
/// or not.
pub fn export_report<R>(
    repository: &R,
    renderer: &ReportRenderer,
    id: ReportId,
) -> Result<PdfDownload, ExportError>
where
    R: ReportRepository + ?Sized,
{
    export_with(repository, id, |view| renderer.render(view))
}

/// Same as [`export_report`], with a PDF outline entry per section.
#[cfg(feature = "bookmarks")]
pub fn export_report_with_bookmarks<R>(
    repository: &R,
    renderer: &ReportRenderer,
    id: ReportId,
) -> Result<PdfDownload, ExportError>
where
    R: ReportRepository + ?Sized,
{
    export_with(repository, id, |view| renderer.render_with_bookmarks(view))
}

fn export_with<R, F>(repository: &R, id: ReportId, render: F) -> Result<PdfDownload, ExportError>
where
    R: ReportRepository + ?Sized,
    F: FnOnce(&ReportView) -> Result<RenderedPdf, RenderError>,
{
    let view = assembler::assemble(repository, id)?;
    let rendered = render(&view).map_err(|err| {
        error!("failed to render report {}: {}", id, err);
        ExportError::from(err)
    })?;

    Ok(PdfDownload {
        file_name: file_name(view.report.project_id, view.report.report_number),
        content_type: PDF_CONTENT_TYPE,
        bytes: rendered.bytes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ProjectId;

    #[test]
    fn file_name_pads_the_report_number() {
        assert_eq!(file_name(ProjectId(12), 7), "rdo-12-0007.pdf");
        assert_eq!(file_name(ProjectId(3), 12345), "rdo-3-12345.pdf");
    }

    #[test]
    fn render_failures_hide_details() {
        let err = ExportError::from(RenderError::Pdf("font table corrupt".into()));
        assert_eq!(err.status_code(), 500);
        assert_eq!(err.public_message(), "could not generate report");
        assert!(!err.to_string().contains("font table"));
    }

    #[test]
    fn missing_reports_map_to_404() {
        let err = ExportError::from(NotFound::Report(ReportId(4)));
        assert_eq!(err.status_code(), 404);
        assert_eq!(err.public_message(), "report 4 not found");
    }
}
