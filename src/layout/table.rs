//! Bordered, striped tables drawn onto a [`Canvas`].

use log::{debug, warn};

use crate::canvas::{Canvas, PageGeometry, Placement, Rect};
use crate::error::RenderError;
use crate::fonts::{self, FontFace};
use crate::style::{LayoutStyle, Rgb, TextStyle};

/// Horizontal placement of text inside a cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

/// Column of a table: label, proportional width and text handling.
#[derive(Clone, Debug, PartialEq)]
pub struct Column {
    label: &'static str,
    weight: f64,
    align: Align,
    wrap: bool,
    fill: Option<Rgb>,
}

impl Column {
    pub fn new(label: &'static str, weight: f64) -> Self {
        Self {
            label,
            weight,
            align: Align::Left,
            wrap: false,
            fill: None,
        }
    }

    pub fn align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    pub fn centered(self) -> Self {
        self.align(Align::Center)
    }

    /// Lets the cell text wrap over several lines in tables with wrapped rows.
    pub fn wrapped(mut self) -> Self {
        self.wrap = true;
        self
    }

    /// Paints the column background, above the row stripe.
    pub fn filled(mut self, color: Rgb) -> Self {
        self.fill = Some(color);
        self
    }
}

/// How row heights are computed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RowHeight {
    /// Every row has the base height; long text is truncated.
    #[default]
    Fixed,
    /// Rows grow with the wrapped line count of their wrapping columns.
    Wrapped,
}

/// Shape of a table: its columns and row behaviour.
#[derive(Clone, Debug, PartialEq)]
pub struct TableSpec {
    columns: Vec<Column>,
    row_height: RowHeight,
    header: bool,
    striped: bool,
}

impl TableSpec {
    pub fn new(columns: Vec<Column>) -> Self {
        Self {
            columns,
            row_height: RowHeight::Fixed,
            header: true,
            striped: true,
        }
    }

    /// Switches to [`RowHeight::Wrapped`].
    pub fn wrapped(mut self) -> Self {
        self.row_height = RowHeight::Wrapped;
        self
    }

    /// Omits the header band; a top rule is drawn instead.
    pub fn without_header(mut self) -> Self {
        self.header = false;
        self
    }

    pub fn unstriped(mut self) -> Self {
        self.striped = false;
        self
    }

    /// Splits `total` between the columns proportionally to their weights.
    pub fn column_widths(&self, total: f64) -> Option<Vec<f64>> {
        let sum: f64 = self.columns.iter().map(|column| column.weight).sum();
        if self.columns.is_empty()
            || !sum.is_finite()
            || sum <= 0.0
            || self.columns.iter().any(|column| column.weight <= 0.0)
        {
            return None;
        }
        Some(
            self.columns
                .iter()
                .map(|column| total * column.weight / sum)
                .collect(),
        )
    }
}

/// Content of one table cell.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Cell {
    text: String,
    color: Option<Rgb>,
    bold: bool,
}

impl Cell {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn colored(mut self, color: Rgb) -> Self {
        self.color = Some(color);
        self
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    fn face(&self) -> FontFace {
        if self.bold {
            FontFace::Bold
        } else {
            FontFace::Regular
        }
    }
}

impl From<String> for Cell {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}

impl From<&str> for Cell {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

/// What a drawn table amounted to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TableStats {
    /// Data rows drawn (header bands excluded).
    pub rows: usize,
    /// Header bands drawn: one, plus one per page break inside the table.
    pub header_bands: usize,
}

/// Height of a wrapped row holding `lines` lines of text.
///
/// `max(base row height, lines * line height + 2 * padding)`, so the height
/// never decreases as a cell gains lines, and a row of `n` lines is always
/// taller than `n - 1` lines of text.
pub fn wrapped_row_height(lines: usize, style: &LayoutStyle) -> f64 {
    let text_height = lines as f64 * style.line_height + 2.0 * style.cell_padding;
    style.row_height.max(text_height)
}

/// Most lines a single row may hold so that it fits on an empty page under
/// a section title and its header band.
pub fn max_row_lines(usable_height: f64, style: &LayoutStyle) -> usize {
    let room = usable_height
        - style.section_title_height
        - style.header_height
        - 2.0 * style.cell_padding;
    ((room / style.line_height).floor() as usize).max(1)
}

struct PreparedRow<'a> {
    cells: &'a [Cell],
    lines: Vec<Vec<String>>,
    height: f64,
}

/// A table whose column widths and row heights are resolved for a page
/// geometry, ready to be drawn.
pub struct PreparedTable<'a> {
    section: &'static str,
    spec: &'a TableSpec,
    widths: Vec<f64>,
    rows: Vec<PreparedRow<'a>>,
}

impl<'a> PreparedTable<'a> {
    /// Resolves widths, wraps or truncates every cell and computes row heights.
    pub fn new(
        geometry: &PageGeometry,
        style: &LayoutStyle,
        section: &'static str,
        spec: &'a TableSpec,
        rows: &'a [Vec<Cell>],
    ) -> Result<Self, RenderError> {
        let widths = spec
            .column_widths(geometry.content_width())
            .ok_or_else(|| RenderError::layout(section, "column weights must be positive"))?;
        if widths
            .iter()
            .any(|width| *width <= 2.0 * style.cell_padding)
        {
            return Err(RenderError::layout(
                section,
                "a column is narrower than its cell padding",
            ));
        }

        let max_lines = max_row_lines(geometry.usable_height(), style);
        let rows = rows
            .iter()
            .map(|cells| prepare_row(section, spec, &widths, style, cells, max_lines))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            section,
            spec,
            widths,
            rows,
        })
    }

    /// Height of the header band plus the first row, which are kept together.
    pub fn lead_height(&self, style: &LayoutStyle) -> f64 {
        band_height(self.spec, style) + self.rows.first().map_or(0.0, |row| row.height)
    }

    /// Draws the table at the cursor, breaking pages as needed.
    ///
    /// Each row is checked against the content limit before it is drawn. When
    /// it would cross the limit the canvas moves to a new page and the header
    /// band is drawn again before the same row.
    pub fn draw(&self, canvas: &mut Canvas, style: &LayoutStyle) -> TableStats {
        let mut stats = TableStats::default();
        canvas.place(self.lead_height(style));
        draw_band(canvas, style, self.spec, &self.widths);
        stats.header_bands += 1;

        for (index, row) in self.rows.iter().enumerate() {
            if canvas.place(row.height) == Placement::NewPage {
                debug!(
                    "section '{}' continues on page {} at row {}",
                    self.section,
                    canvas.page_number(),
                    index + 1
                );
                draw_band(canvas, style, self.spec, &self.widths);
                stats.header_bands += 1;
            }
            draw_row(canvas, style, self.spec, &self.widths, row, index);
            canvas.advance(row.height);
            stats.rows += 1;
        }

        stats
    }
}

/// Prepares and draws `rows` in one go.
pub fn draw_table(
    canvas: &mut Canvas,
    style: &LayoutStyle,
    section: &'static str,
    spec: &TableSpec,
    rows: &[Vec<Cell>],
) -> Result<TableStats, RenderError> {
    let geometry = *canvas.geometry();
    let table = PreparedTable::new(&geometry, style, section, spec, rows)?;
    Ok(table.draw(canvas, style))
}

fn band_height(spec: &TableSpec, style: &LayoutStyle) -> f64 {
    if spec.header {
        style.header_height
    } else {
        0.0
    }
}

fn prepare_row<'a>(
    section: &'static str,
    spec: &TableSpec,
    widths: &[f64],
    style: &LayoutStyle,
    cells: &'a [Cell],
    max_lines: usize,
) -> Result<PreparedRow<'a>, RenderError> {
    if cells.len() != spec.columns.len() {
        return Err(RenderError::layout(
            section,
            format!(
                "row has {} cells but the table has {} columns",
                cells.len(),
                spec.columns.len()
            ),
        ));
    }

    let size = style.body().size_pt();
    let mut lines = Vec::with_capacity(cells.len());
    for ((cell, column), width) in cells.iter().zip(&spec.columns).zip(widths) {
        let inner = width - 2.0 * style.cell_padding;
        let mut cell_lines = if spec.row_height == RowHeight::Wrapped && column.wrap {
            fonts::wrap_text(&cell.text, cell.face(), size, inner)
        } else {
            vec![fonts::truncate_to_width(&cell.text, cell.face(), size, inner)]
        };

        if cell_lines.len() > max_lines {
            warn!(
                "section '{}': clipping a {}-line '{}' cell to {} lines",
                section,
                cell_lines.len(),
                column.label,
                max_lines
            );
            cell_lines.truncate(max_lines);
            if let Some(last) = cell_lines.last_mut() {
                let clipped = format!("{last} ...");
                *last = fonts::truncate_to_width(&clipped, cell.face(), size, inner);
            }
        }
        lines.push(cell_lines);
    }

    let height = match spec.row_height {
        RowHeight::Fixed => style.row_height,
        RowHeight::Wrapped => {
            let tallest = lines.iter().map(Vec::len).max().unwrap_or(1);
            wrapped_row_height(tallest, style)
        }
    };

    Ok(PreparedRow {
        cells,
        lines,
        height,
    })
}

fn text_x(column: &Column, x: f64, width: f64, text_width: f64, padding: f64) -> f64 {
    match column.align {
        Align::Left => x + padding,
        Align::Center => x + (width - text_width) / 2.0,
        Align::Right => x + width - padding - text_width,
    }
}

/// Offset from the top of a line box to the baseline of `size` point text.
fn baseline_offset(line_box: f64, size: f64) -> f64 {
    line_box / 2.0 + size * 0.35
}

fn draw_band(canvas: &mut Canvas, style: &LayoutStyle, spec: &TableSpec, widths: &[f64]) {
    let geometry = *canvas.geometry();
    let left = geometry.content_left();
    let y = canvas.y();

    if !spec.header {
        canvas.line(
            (left, y),
            (geometry.content_right(), y),
            style.palette.rule,
            style.rule_thickness,
        );
        return;
    }

    let height = style.header_height;
    canvas.fill_rect(
        Rect::new(left, y, geometry.content_width(), height),
        style.palette.header_fill,
    );

    let label_style = style.header();
    let baseline = y + baseline_offset(height, label_style.size_pt());
    let mut x = left;
    for (index, (column, width)) in spec.columns.iter().zip(widths).enumerate() {
        let label = fonts::truncate_to_width(
            column.label,
            label_style.face(),
            label_style.size_pt(),
            width - 2.0 * style.cell_padding,
        );
        let label_width = fonts::text_width(&label, label_style.face(), label_style.size_pt());
        let label_x = text_x(column, x, *width, label_width, style.cell_padding);
        canvas.text(label_x, baseline, label, label_style);
        if index > 0 {
            canvas.line(
                (x, y),
                (x, y + height),
                style.palette.header_text,
                style.rule_thickness,
            );
        }
        x += width;
    }

    canvas.advance(height);
}

fn draw_row(
    canvas: &mut Canvas,
    style: &LayoutStyle,
    spec: &TableSpec,
    widths: &[f64],
    row: &PreparedRow<'_>,
    index: usize,
) {
    let geometry = *canvas.geometry();
    let left = geometry.content_left();
    let right = geometry.content_right();
    let y = canvas.y();
    let height = row.height;

    if spec.striped && index % 2 == 1 {
        canvas.fill_rect(
            Rect::new(left, y, geometry.content_width(), height),
            style.palette.stripe,
        );
    }

    let body = style.body();
    let size = body.size_pt();
    let mut x = left;
    for (((column, width), cell), lines) in spec
        .columns
        .iter()
        .zip(widths)
        .zip(row.cells)
        .zip(&row.lines)
    {
        if let Some(fill) = column.fill {
            canvas.fill_rect(Rect::new(x, y, *width, height), fill);
        }

        let text_style = TextStyle::new(body.size())
            .with_face(cell.face())
            .with_color(cell.color.unwrap_or(body.color()));
        for (line_index, line) in lines.iter().enumerate() {
            let baseline = match spec.row_height {
                RowHeight::Fixed => y + baseline_offset(height, size),
                RowHeight::Wrapped => {
                    y + style.cell_padding
                        + line_index as f64 * style.line_height
                        + baseline_offset(style.line_height, size)
                }
            };
            let line_width = fonts::text_width(line, text_style.face(), size);
            let line_x = text_x(column, x, *width, line_width, style.cell_padding);
            canvas.text(line_x, baseline, line.clone(), text_style);
        }
        x += width;
    }

    let mut divider = left;
    canvas.line(
        (divider, y),
        (divider, y + height),
        style.palette.rule,
        style.rule_thickness,
    );
    for width in widths {
        divider += width;
        canvas.line(
            (divider, y),
            (divider, y + height),
            style.palette.rule,
            style.rule_thickness,
        );
    }
    canvas.line(
        (left, y + height),
        (right, y + height),
        style.palette.rule,
        style.rule_thickness,
    );
}
