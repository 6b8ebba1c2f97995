//! PDF export of daily construction-site reports (RDO).
//!
//! A report is loaded through a [`store::ReportRepository`], hydrated into an
//! [`assembler::ReportView`], laid out page by page onto a [`canvas::Canvas`],
//! stamped with `Page i of N` footers and serialized with `printpdf`.
//!
//! ```no_run
//! use rdo_report::builder::ReportRenderer;
//! use rdo_report::{export, sample};
//!
//! let repository = sample::sample_repository()?;
//! let renderer = ReportRenderer::builder().build()?;
//! let download = export::export_report(&repository, &renderer, sample::SAMPLE_REPORT)?;
//! std::fs::write(&download.file_name, &download.bytes)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod assembler;
pub mod builder;
pub mod canvas;
pub mod error;
pub mod export;
pub mod finisher;
pub mod fonts;
pub mod layout;
pub mod model;
pub mod pdf;
pub mod sample;
pub mod store;
pub mod style;

#[cfg(feature = "bookmarks")]
pub mod bookmarks;

pub use assembler::{assemble, ReportView};
pub use builder::{RendererBuilder, ReportRenderer};
pub use error::{NotFound, RenderError};
pub use export::{export_report, ExportError, PdfDownload};
