//! Page layout engine: turns a [`ReportView`] into laid-out pages.
//!
//! Sections are drawn in a fixed order onto a [`Canvas`]. Each data section
//! is either a table or, when its collection is empty, a single placeholder
//! line. Page breaks are decided by the canvas cursor; tables re-draw their
//! header band on every page they continue on.

pub mod table;

use std::fmt::{self, Write};

use chrono::{NaiveDate, NaiveDateTime};
use log::debug;

use crate::assembler::ReportView;
use crate::canvas::{Canvas, Page, PageGeometry};
use crate::error::RenderError;
use crate::fonts;
use crate::style::{self, LayoutStyle, TextStyle};

use table::{Align, Cell, Column, PreparedTable, TableSpec, TableStats};

/// Sections of the report, in drawing order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SectionKind {
    Details,
    Weather,
    Workforce,
    Equipment,
    Activities,
    Occurrences,
    Photos,
    Comments,
}

impl SectionKind {
    pub const ALL: [SectionKind; 8] = [
        SectionKind::Details,
        SectionKind::Weather,
        SectionKind::Workforce,
        SectionKind::Equipment,
        SectionKind::Activities,
        SectionKind::Occurrences,
        SectionKind::Photos,
        SectionKind::Comments,
    ];

    pub fn title(self) -> &'static str {
        match self {
            SectionKind::Details => "Report Details",
            SectionKind::Weather => "Weather",
            SectionKind::Workforce => "Workforce",
            SectionKind::Equipment => "Equipment",
            SectionKind::Activities => "Activities",
            SectionKind::Occurrences => "Occurrences",
            SectionKind::Photos => "Photos",
            SectionKind::Comments => "Comments",
        }
    }

    /// Line printed instead of a table when the section has no entries.
    pub fn placeholder(self) -> &'static str {
        match self {
            SectionKind::Details => "No report details recorded.",
            SectionKind::Weather => "No weather recorded.",
            SectionKind::Workforce => "No workforce recorded.",
            SectionKind::Equipment => "No equipment recorded.",
            SectionKind::Activities => "No activities recorded.",
            SectionKind::Occurrences => "No occurrences recorded.",
            SectionKind::Photos => "No photos recorded.",
            SectionKind::Comments => "No comments recorded.",
        }
    }
}

/// Where and how a section ended up in the document.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SectionMark {
    pub kind: SectionKind,
    /// One-based page the section title is drawn on.
    pub first_page: usize,
    /// The placeholder line was drawn instead of a table.
    pub placeholder: bool,
    /// Data rows drawn.
    pub rows: usize,
    /// Header bands drawn; more than one when the table spans pages.
    pub header_bands: usize,
}

impl SectionMark {
    pub fn title(&self) -> &'static str {
        self.kind.title()
    }
}

/// Text settings the layout needs besides geometry and style.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LayoutText {
    /// Document title printed at the top of the first page.
    pub title: String,
    /// `chrono` format string for calendar dates.
    pub date_format: String,
}

impl LayoutText {
    /// Formats a calendar date with the configured format.
    pub fn format_date(&self, date: NaiveDate) -> Result<String, RenderError> {
        self.write_formatted(date.format(&self.date_format))
    }

    /// Formats a timestamp as the configured date followed by `HH:MM`.
    pub fn format_timestamp(&self, timestamp: NaiveDateTime) -> Result<String, RenderError> {
        let format = format!("{} %H:%M", self.date_format);
        self.write_formatted(timestamp.format(&format))
    }

    // chrono reports fields the value does not carry as a fmt::Error.
    fn write_formatted(&self, value: impl fmt::Display) -> Result<String, RenderError> {
        let mut out = String::new();
        write!(out, "{value}").map_err(|_| RenderError::Format(self.date_format.clone()))?;
        Ok(out)
    }
}

/// Result of laying out one report.
#[derive(Clone, Debug, PartialEq)]
pub struct Layout {
    pub pages: Vec<Page>,
    pub sections: Vec<SectionMark>,
}

/// Draws every section of `view` and returns the pages without footers.
pub fn lay_out(
    view: &ReportView,
    geometry: PageGeometry,
    style: &LayoutStyle,
    text: &LayoutText,
) -> Result<Layout, RenderError> {
    let mut engine = Engine {
        canvas: Canvas::new(geometry),
        style,
        text,
        sections: Vec::with_capacity(SectionKind::ALL.len()),
    };

    engine.title_block(view)?;
    for kind in SectionKind::ALL {
        engine.section(kind, view)?;
    }

    Ok(Layout {
        pages: engine.canvas.into_pages(),
        sections: engine.sections,
    })
}

struct Engine<'a> {
    canvas: Canvas,
    style: &'a LayoutStyle,
    text: &'a LayoutText,
    sections: Vec<SectionMark>,
}

impl Engine<'_> {
    fn title_block(&mut self, view: &ReportView) -> Result<(), RenderError> {
        let style = self.style;
        let geometry = *self.canvas.geometry();
        let top = self.canvas.y();

        let title = TextStyle::new(style.title_size)
            .bold()
            .with_color(style.palette.accent);
        let baseline = top + title.size_pt();
        self.canvas
            .text(geometry.content_left(), baseline, self.text.title.clone(), title);

        let number = format!("No. {:04}", view.report.report_number);
        let number_width = fonts::text_width(&number, title.face(), title.size_pt());
        self.canvas.text(
            geometry.content_right() - number_width,
            baseline,
            number,
            title,
        );

        let subtitle = TextStyle::new(style.subtitle_size).with_color(style.palette.muted);
        let subtitle_baseline = baseline + subtitle.size_pt() + 6.0;
        let date = self.text.format_date(view.report.date)?;
        self.canvas.text(
            geometry.content_left(),
            subtitle_baseline,
            format!("{} - {}", view.project.name, date),
            subtitle,
        );

        let rule_y = subtitle_baseline + 6.0;
        self.canvas.line(
            (geometry.content_left(), rule_y),
            (geometry.content_right(), rule_y),
            style.palette.accent,
            1.0,
        );
        self.canvas.advance(rule_y - top + style.section_spacing);
        Ok(())
    }

    fn section(&mut self, kind: SectionKind, view: &ReportView) -> Result<(), RenderError> {
        match kind {
            SectionKind::Details => self.details(view),
            SectionKind::Weather => self.weather(view),
            SectionKind::Workforce => self.workforce(view),
            SectionKind::Equipment => self.equipment(view),
            SectionKind::Activities => self.activities(view),
            SectionKind::Occurrences => self.occurrences(view),
            SectionKind::Photos => self.photos(view),
            SectionKind::Comments => self.comments(view),
        }
    }

    /// Draws the section title, keeping it on the page of what follows it.
    fn section_title(&mut self, kind: SectionKind, following: f64) -> usize {
        let style = self.style;
        self.canvas.place(style.section_title_height + following);
        let first_page = self.canvas.page_number();

        let geometry = *self.canvas.geometry();
        let y = self.canvas.y();
        let title = style.section_title();
        self.canvas
            .text(geometry.content_left(), y + title.size_pt() + 2.0, kind.title(), title);
        let rule_y = y + style.section_title_height - 4.0;
        self.canvas.line(
            (geometry.content_left(), rule_y),
            (geometry.content_right(), rule_y),
            style.palette.rule,
            style.rule_thickness,
        );
        self.canvas.advance(style.section_title_height);
        first_page
    }

    fn table_section(
        &mut self,
        kind: SectionKind,
        spec: &TableSpec,
        rows: &[Vec<Cell>],
    ) -> Result<TableStats, RenderError> {
        let style = self.style;
        if rows.is_empty() {
            let first_page = self.section_title(kind, style.row_height);
            let placeholder = style.placeholder();
            let x = self.canvas.geometry().content_left() + style.cell_padding;
            let y = self.canvas.y();
            self.canvas.text(
                x,
                y + style.row_height / 2.0 + placeholder.size_pt() * 0.35,
                kind.placeholder(),
                placeholder,
            );
            self.canvas.advance(style.row_height);
            self.finish_section(SectionMark {
                kind,
                first_page,
                placeholder: true,
                rows: 0,
                header_bands: 0,
            });
            return Ok(TableStats::default());
        }

        let geometry = *self.canvas.geometry();
        let table = PreparedTable::new(&geometry, style, kind.title(), spec, rows)?;
        let first_page = self.section_title(kind, table.lead_height(style));
        let stats = table.draw(&mut self.canvas, style);
        self.finish_section(SectionMark {
            kind,
            first_page,
            placeholder: false,
            rows: stats.rows,
            header_bands: stats.header_bands,
        });
        Ok(stats)
    }

    fn finish_section(&mut self, mark: SectionMark) {
        debug!(
            "section '{}' drawn from page {} to page {} ({} rows, placeholder: {})",
            mark.kind.title(),
            mark.first_page,
            self.canvas.page_number(),
            mark.rows,
            mark.placeholder
        );
        self.sections.push(mark);
    }

    fn spacing(&mut self) {
        self.canvas.advance(self.style.section_spacing);
    }

    /// Draws wrapped free text across the content width.
    fn paragraph(&mut self, text: &str, text_style: TextStyle) {
        let style = self.style;
        let geometry = *self.canvas.geometry();
        let left = geometry.content_left() + style.cell_padding;
        let width = geometry.content_width() - 2.0 * style.cell_padding;
        for line in fonts::wrap_text(text, text_style.face(), text_style.size_pt(), width) {
            self.canvas.place(style.line_height);
            let y = self.canvas.y();
            self.canvas.text(
                left,
                y + style.line_height / 2.0 + text_style.size_pt() * 0.35,
                line,
                text_style,
            );
            self.canvas.advance(style.line_height);
        }
    }

    fn details(&mut self, view: &ReportView) -> Result<(), RenderError> {
        let palette = self.style.palette;
        let spec = TableSpec::new(vec![
            Column::new("Field", 1.1).filled(palette.key_fill),
            Column::new("Value", 2.9),
            Column::new("Field", 1.1).filled(palette.key_fill),
            Column::new("Value", 2.9),
        ])
        .without_header()
        .unstriped();

        let report = &view.report;
        let date = format!(
            "{} ({})",
            self.text.format_date(report.date)?,
            report.date.format("%A")
        );
        let author = match &view.author.job_title {
            Some(job_title) => format!("{} - {}", view.author.name, job_title),
            None => view.author.name.clone(),
        };
        let rows = vec![
            vec![
                Cell::new("Project").bold(),
                Cell::new(view.project.name.as_str()),
                Cell::new("Report No.").bold(),
                Cell::new(format!("{:04}", report.report_number)),
            ],
            vec![
                Cell::new("Client").bold(),
                Cell::new(view.project.client.as_str()),
                Cell::new("Date").bold(),
                Cell::new(date),
            ],
            vec![
                Cell::new("Location").bold(),
                Cell::new(view.project.location.as_str()),
                Cell::new("Status").bold(),
                Cell::new(report.status.label())
                    .bold()
                    .colored(style::report_status_color(report.status)),
            ],
            vec![
                Cell::new("Prepared by").bold(),
                Cell::new(author),
                Cell::new("Workforce").bold(),
                Cell::new(format!("{} people", view.total_headcount())),
            ],
        ];

        self.table_section(SectionKind::Details, &spec, &rows)?;
        self.spacing();
        Ok(())
    }

    fn weather(&mut self, view: &ReportView) -> Result<(), RenderError> {
        let periods = view.report.weather.periods();
        let spec = TableSpec::new(
            periods
                .iter()
                .map(|(label, _)| Column::new(*label, 1.0).centered())
                .collect(),
        );
        let row: Vec<Cell> = periods
            .iter()
            .map(|(_, condition)| match condition {
                Some(condition) => Cell::new(condition.label())
                    .bold()
                    .colored(style::weather_color(*condition)),
                None => Cell::new("-"),
            })
            .collect();

        self.table_section(SectionKind::Weather, &spec, &[row])?;
        if let Some(notes) = view
            .report
            .weather_notes
            .as_deref()
            .filter(|notes| !notes.trim().is_empty())
        {
            self.canvas.advance(4.0);
            let body = self.style.body();
            self.paragraph(&format!("Notes: {notes}"), body);
        }
        self.spacing();
        Ok(())
    }

    fn workforce(&mut self, view: &ReportView) -> Result<(), RenderError> {
        let spec = TableSpec::new(vec![
            Column::new("Role", 3.0),
            Column::new("Headcount", 1.2).centered(),
            Column::new("Start", 1.0).centered(),
            Column::new("End", 1.0).centered(),
            Column::new("Notes", 3.5),
        ]);
        let rows: Vec<Vec<Cell>> = view
            .workforce
            .iter()
            .map(|entry| {
                vec![
                    Cell::new(entry.role.as_str()),
                    Cell::new(entry.headcount.to_string()),
                    Cell::new(entry.start_time.as_deref().unwrap_or("-")),
                    Cell::new(entry.end_time.as_deref().unwrap_or("-")),
                    Cell::new(entry.notes.as_deref().unwrap_or_default()),
                ]
            })
            .collect();

        self.table_section(SectionKind::Workforce, &spec, &rows)?;
        if !rows.is_empty() {
            self.canvas.advance(4.0);
            let total = self.style.body().bold();
            self.paragraph(
                &format!("Total headcount: {}", view.total_headcount()),
                total,
            );
        }
        self.spacing();
        Ok(())
    }

    fn equipment(&mut self, view: &ReportView) -> Result<(), RenderError> {
        let spec = TableSpec::new(vec![
            Column::new("Equipment", 3.2),
            Column::new("Quantity", 1.2).centered(),
            Column::new("Hours used", 1.4).centered(),
            Column::new("Notes", 3.5),
        ]);
        let rows: Vec<Vec<Cell>> = view
            .equipment
            .iter()
            .map(|entry| {
                vec![
                    Cell::new(entry.name.as_str()),
                    Cell::new(entry.quantity.to_string()),
                    Cell::new(
                        entry
                            .hours_used
                            .map_or_else(|| "-".to_owned(), |hours| format!("{hours:.1} h")),
                    ),
                    Cell::new(entry.notes.as_deref().unwrap_or_default()),
                ]
            })
            .collect();

        self.table_section(SectionKind::Equipment, &spec, &rows)?;
        self.spacing();
        Ok(())
    }

    fn activities(&mut self, view: &ReportView) -> Result<(), RenderError> {
        let spec = TableSpec::new(vec![
            Column::new("Description", 5.5),
            Column::new("Progress", 1.3).align(Align::Right),
            Column::new("Status", 1.8).centered(),
        ]);
        let rows: Vec<Vec<Cell>> = view
            .activities
            .iter()
            .map(|entry| {
                vec![
                    Cell::new(entry.description.as_str()),
                    Cell::new(entry.completion.to_string()),
                    Cell::new(entry.status.label())
                        .colored(style::activity_status_color(entry.status)),
                ]
            })
            .collect();

        self.table_section(SectionKind::Activities, &spec, &rows)?;
        self.spacing();
        Ok(())
    }

    fn occurrences(&mut self, view: &ReportView) -> Result<(), RenderError> {
        let spec = TableSpec::new(vec![
            Column::new("Time", 0.9).centered(),
            Column::new("Title", 2.0).wrapped(),
            Column::new("Description", 4.2).wrapped(),
            Column::new("Tags", 1.6).wrapped(),
            Column::new("Reported by", 1.6).wrapped(),
        ])
        .wrapped();
        let rows: Vec<Vec<Cell>> = view
            .occurrences
            .iter()
            .map(|occurrence| {
                let entry = &occurrence.entry;
                vec![
                    Cell::new(entry.time.as_deref().unwrap_or("-")),
                    Cell::new(entry.title.as_str()).bold(),
                    Cell::new(entry.description.as_str()),
                    Cell::new(entry.tags.join(", ")),
                    Cell::new(occurrence.reported_by.as_str()),
                ]
            })
            .collect();

        self.table_section(SectionKind::Occurrences, &spec, &rows)?;
        self.spacing();
        Ok(())
    }

    fn photos(&mut self, view: &ReportView) -> Result<(), RenderError> {
        let spec = TableSpec::new(vec![
            Column::new("File", 2.4),
            Column::new("Caption", 3.4),
            Column::new("Uploaded by", 1.8),
            Column::new("Date", 1.7).centered(),
        ]);
        let rows = view
            .photos
            .iter()
            .map(|photo| {
                let entry = &photo.entry;
                Ok(vec![
                    Cell::new(entry.file_name()),
                    Cell::new(entry.caption.as_deref().unwrap_or("-")),
                    Cell::new(photo.uploaded_by.as_str()),
                    Cell::new(self.text.format_timestamp(entry.created_at)?),
                ])
            })
            .collect::<Result<Vec<Vec<Cell>>, RenderError>>()?;

        self.table_section(SectionKind::Photos, &spec, &rows)?;
        self.spacing();
        Ok(())
    }

    fn comments(&mut self, view: &ReportView) -> Result<(), RenderError> {
        let spec = TableSpec::new(vec![
            Column::new("Author", 1.8),
            Column::new("Role", 1.4),
            Column::new("Date", 1.7).centered(),
            Column::new("Comment", 4.4).wrapped(),
        ])
        .wrapped();
        let rows = view
            .comments
            .iter()
            .map(|comment| {
                Ok(vec![
                    Cell::new(comment.author.as_str()),
                    Cell::new(comment.author_role.as_deref().unwrap_or("-")),
                    Cell::new(self.text.format_timestamp(comment.entry.created_at)?),
                    Cell::new(comment.entry.body.as_str()),
                ])
            })
            .collect::<Result<Vec<Vec<Cell>>, RenderError>>()?;

        self.table_section(SectionKind::Comments, &spec, &rows)?;
        Ok(())
    }
}
