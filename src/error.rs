//! Error types shared by the assembler and the renderer.

use std::fmt;

use crate::model::{ProjectId, ReportId};

/// A record needed for the report could not be found.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NotFound {
    /// No report with this identifier is stored.
    Report(ReportId),
    /// The report exists but its owning project does not.
    Project(ProjectId),
}

impl fmt::Display for NotFound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Report(id) => write!(f, "report {id} not found"),
            Self::Project(id) => write!(f, "project {id} not found"),
        }
    }
}

impl std::error::Error for NotFound {}

/// Errors raised while laying out or serializing a report.
///
/// Any of these aborts the render; the partially drawn document is dropped.
#[derive(Debug)]
pub enum RenderError {
    /// Page size, margins or content limit do not describe a usable page.
    Geometry(String),
    /// A date or timestamp format string is not understood by `chrono`.
    Format(String),
    /// A section could not be drawn with the configured geometry.
    Layout {
        /// Title of the section being drawn.
        section: &'static str,
        /// What went wrong.
        message: String,
    },
    /// The PDF backend rejected the document.
    Pdf(String),
    /// Writing the PDF into the output buffer failed.
    Io(std::io::Error),
    /// The outline could not be embedded into the rendered bytes.
    #[cfg(feature = "bookmarks")]
    Bookmarks(crate::bookmarks::BookmarkError),
}

impl RenderError {
    pub(crate) fn layout(section: &'static str, message: impl Into<String>) -> Self {
        Self::Layout {
            section,
            message: message.into(),
        }
    }
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Geometry(message) => write!(f, "invalid page geometry: {message}"),
            Self::Format(format) => write!(f, "invalid date format '{format}'"),
            Self::Layout { section, message } => {
                write!(f, "failed to lay out section '{section}': {message}")
            }
            Self::Pdf(message) => write!(f, "failed to build PDF document: {message}"),
            Self::Io(err) => write!(f, "failed to write PDF bytes: {err}"),
            #[cfg(feature = "bookmarks")]
            Self::Bookmarks(err) => write!(f, "failed to add section bookmarks: {err}"),
        }
    }
}

impl std::error::Error for RenderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            #[cfg(feature = "bookmarks")]
            Self::Bookmarks(err) => Some(err),
            Self::Geometry(_) | Self::Format(_) | Self::Layout { .. } | Self::Pdf(_) => None,
        }
    }
}

impl From<std::io::Error> for RenderError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

#[cfg(feature = "bookmarks")]
impl From<crate::bookmarks::BookmarkError> for RenderError {
    fn from(err: crate::bookmarks::BookmarkError) -> Self {
        Self::Bookmarks(err)
    }
}
