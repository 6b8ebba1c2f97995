//! Colours, text styles and the visual constants of the report layout.

use crate::fonts::FontFace;
use crate::model::{ActivityStatus, ReportStatus, WeatherCondition};

/// An sRGB colour with 8-bit channels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0, 0, 0);
    pub const WHITE: Rgb = Rgb(255, 255, 255);

    /// Channels scaled to `0.0..=1.0`, as PDF colour operators expect them.
    pub fn unit(self) -> (f64, f64, f64) {
        (
            f64::from(self.0) / 255.0,
            f64::from(self.1) / 255.0,
            f64::from(self.2) / 255.0,
        )
    }
}

/// Face, size and colour of a run of text.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextStyle {
    face: FontFace,
    size: u8,
    color: Rgb,
}

impl TextStyle {
    /// Creates a regular, black style of the given point size.
    pub fn new(size: u8) -> Self {
        Self {
            face: FontFace::Regular,
            size,
            color: Rgb::BLACK,
        }
    }

    pub fn face(&self) -> FontFace {
        self.face
    }

    /// Font size in points.
    pub fn size(&self) -> u8 {
        self.size
    }

    pub fn size_pt(&self) -> f64 {
        f64::from(self.size)
    }

    pub fn color(&self) -> Rgb {
        self.color
    }

    pub fn with_face(mut self, face: FontFace) -> Self {
        self.face = face;
        self
    }

    pub fn with_color(mut self, color: Rgb) -> Self {
        self.color = color;
        self
    }

    /// Shorthand for the bold face.
    pub fn bold(self) -> Self {
        self.with_face(FontFace::Bold)
    }

    /// Shorthand for the oblique face.
    pub fn italic(self) -> Self {
        self.with_face(FontFace::Italic)
    }
}

/// Colours used across the document.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Palette {
    pub text: Rgb,
    pub muted: Rgb,
    pub accent: Rgb,
    pub header_fill: Rgb,
    pub header_text: Rgb,
    pub stripe: Rgb,
    pub rule: Rgb,
    pub key_fill: Rgb,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            text: Rgb(33, 37, 41),
            muted: Rgb(108, 117, 125),
            accent: Rgb(31, 56, 100),
            header_fill: Rgb(31, 56, 100),
            header_text: Rgb::WHITE,
            stripe: Rgb(241, 244, 249),
            rule: Rgb(196, 203, 214),
            key_fill: Rgb(228, 233, 242),
        }
    }
}

/// Sizes and spacing of the layout, in points.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutStyle {
    pub title_size: u8,
    pub subtitle_size: u8,
    pub section_title_size: u8,
    pub header_size: u8,
    pub body_size: u8,
    pub footer_size: u8,
    /// Height of the filled band carrying the column labels.
    pub header_height: f64,
    /// Minimum height of a data row.
    pub row_height: f64,
    /// Distance between baselines of wrapped lines inside a cell.
    pub line_height: f64,
    pub cell_padding: f64,
    pub section_title_height: f64,
    pub section_spacing: f64,
    pub rule_thickness: f64,
    pub palette: Palette,
}

impl Default for LayoutStyle {
    fn default() -> Self {
        Self {
            title_size: 16,
            subtitle_size: 10,
            section_title_size: 11,
            header_size: 8,
            body_size: 8,
            footer_size: 7,
            header_height: 18.0,
            row_height: 18.0,
            line_height: 10.0,
            cell_padding: 4.0,
            section_title_height: 20.0,
            section_spacing: 14.0,
            rule_thickness: 0.5,
            palette: Palette::default(),
        }
    }
}

impl LayoutStyle {
    pub fn body(&self) -> TextStyle {
        TextStyle::new(self.body_size).with_color(self.palette.text)
    }

    pub fn header(&self) -> TextStyle {
        TextStyle::new(self.header_size)
            .bold()
            .with_color(self.palette.header_text)
    }

    pub fn section_title(&self) -> TextStyle {
        TextStyle::new(self.section_title_size)
            .bold()
            .with_color(self.palette.accent)
    }

    pub fn placeholder(&self) -> TextStyle {
        TextStyle::new(self.body_size)
            .italic()
            .with_color(self.palette.muted)
    }

    pub fn footer(&self) -> TextStyle {
        TextStyle::new(self.footer_size).with_color(self.palette.muted)
    }
}

/// Colour used for a weather condition label.
pub fn weather_color(condition: WeatherCondition) -> Rgb {
    match condition {
        WeatherCondition::Sunny => Rgb(191, 128, 0),
        WeatherCondition::Cloudy => Rgb(96, 108, 124),
        WeatherCondition::Rainy => Rgb(33, 99, 171),
        WeatherCondition::Stormy => Rgb(84, 56, 140),
        WeatherCondition::Impracticable => Rgb(176, 42, 55),
    }
}

/// Colour used for an activity status label.
pub fn activity_status_color(status: ActivityStatus) -> Rgb {
    match status {
        ActivityStatus::NotStarted => Rgb(108, 117, 125),
        ActivityStatus::InProgress => Rgb(33, 99, 171),
        ActivityStatus::Completed => Rgb(25, 135, 84),
        ActivityStatus::Delayed => Rgb(176, 42, 55),
        ActivityStatus::Paused => Rgb(191, 128, 0),
    }
}

/// Colour used for the report status in the header block.
pub fn report_status_color(status: ReportStatus) -> Rgb {
    match status {
        ReportStatus::Draft => Rgb(191, 128, 0),
        ReportStatus::Completed => Rgb(25, 135, 84),
    }
}
