//! Records that make up a daily construction-site report (RDO).
//!
//! The types mirror what the storage layer persists: a [`Report`] owned by a
//! [`Project`], plus the child entries attached to it. Enumerated codes
//! (weather, status) are exhaustive enums so an unknown code fails at
//! deserialization instead of falling through to a default label.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u64> for $name {
            fn from(value: u64) -> Self {
                Self(value)
            }
        }
    };
}

id_type!(
    /// Identifier of a stored project.
    ProjectId
);
id_type!(
    /// Identifier of a stored daily report.
    ReportId
);
id_type!(
    /// Identifier of a registered user.
    UserId
);

/// Construction project that owns daily reports.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    pub client: String,
    pub location: String,
}

/// Application user as far as report headers and attributions need it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    #[serde(default)]
    pub job_title: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

/// Weather observed during one period of the working day.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeatherCondition {
    Sunny,
    Cloudy,
    Rainy,
    Stormy,
    /// Weather prevented work on site.
    Impracticable,
}

impl WeatherCondition {
    /// All conditions in display order.
    pub const ALL: [WeatherCondition; 5] = [
        WeatherCondition::Sunny,
        WeatherCondition::Cloudy,
        WeatherCondition::Rainy,
        WeatherCondition::Stormy,
        WeatherCondition::Impracticable,
    ];

    /// Stored code of the condition.
    pub fn code(self) -> &'static str {
        match self {
            WeatherCondition::Sunny => "sunny",
            WeatherCondition::Cloudy => "cloudy",
            WeatherCondition::Rainy => "rainy",
            WeatherCondition::Stormy => "stormy",
            WeatherCondition::Impracticable => "impracticable",
        }
    }

    /// Human-readable label printed in the report.
    pub fn label(self) -> &'static str {
        match self {
            WeatherCondition::Sunny => "Sunny",
            WeatherCondition::Cloudy => "Cloudy",
            WeatherCondition::Rainy => "Rainy",
            WeatherCondition::Stormy => "Stormy",
            WeatherCondition::Impracticable => "Impracticable",
        }
    }
}

/// Weather for the three periods of the day. Any period may be left blank.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherConditions {
    #[serde(default)]
    pub morning: Option<WeatherCondition>,
    #[serde(default)]
    pub afternoon: Option<WeatherCondition>,
    #[serde(default)]
    pub night: Option<WeatherCondition>,
}

impl WeatherConditions {
    /// Creates a fully specified set of conditions.
    pub fn new(
        morning: impl Into<Option<WeatherCondition>>,
        afternoon: impl Into<Option<WeatherCondition>>,
        night: impl Into<Option<WeatherCondition>>,
    ) -> Self {
        Self {
            morning: morning.into(),
            afternoon: afternoon.into(),
            night: night.into(),
        }
    }

    /// Returns the periods paired with their labels, in display order.
    pub fn periods(&self) -> [(&'static str, Option<WeatherCondition>); 3] {
        [
            ("Morning", self.morning),
            ("Afternoon", self.afternoon),
            ("Night", self.night),
        ]
    }
}

/// Lifecycle flag of a report.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    #[default]
    Draft,
    Completed,
}

impl ReportStatus {
    pub fn code(self) -> &'static str {
        match self {
            ReportStatus::Draft => "draft",
            ReportStatus::Completed => "completed",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ReportStatus::Draft => "Draft",
            ReportStatus::Completed => "Completed",
        }
    }
}

/// One daily report of one project.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub id: ReportId,
    pub project_id: ProjectId,
    pub created_by: UserId,
    /// Sequential number, unique within the owning project.
    pub report_number: u32,
    pub date: NaiveDate,
    #[serde(default)]
    pub weather: WeatherConditions,
    #[serde(default)]
    pub weather_notes: Option<String>,
    #[serde(default)]
    pub status: ReportStatus,
}

/// Crew present on site.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkforceEntry {
    pub report_id: ReportId,
    pub role: String,
    pub headcount: u32,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Machinery or tooling used during the day.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EquipmentEntry {
    pub report_id: ReportId,
    pub name: String,
    pub quantity: u32,
    #[serde(default)]
    pub hours_used: Option<f64>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Completion percentage, always within `0..=100`.
///
/// Out-of-range inputs are clamped both when constructed in code and when
/// deserialized, so a stored value can never render outside the range.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "i64", into = "u8")]
pub struct Percent(u8);

impl Percent {
    pub const MAX: u8 = 100;

    /// Builds a percentage, clamping the value into `0..=100`.
    pub fn clamped(value: i64) -> Self {
        Self(value.clamp(0, i64::from(Self::MAX)) as u8)
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl From<i64> for Percent {
    fn from(value: i64) -> Self {
        Self::clamped(value)
    }
}

impl From<Percent> for u8 {
    fn from(value: Percent) -> Self {
        value.0
    }
}

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

/// Progress state of a scheduled activity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityStatus {
    #[default]
    NotStarted,
    InProgress,
    Completed,
    Delayed,
    Paused,
}

impl ActivityStatus {
    pub fn code(self) -> &'static str {
        match self {
            ActivityStatus::NotStarted => "not_started",
            ActivityStatus::InProgress => "in_progress",
            ActivityStatus::Completed => "completed",
            ActivityStatus::Delayed => "delayed",
            ActivityStatus::Paused => "paused",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ActivityStatus::NotStarted => "Not started",
            ActivityStatus::InProgress => "In progress",
            ActivityStatus::Completed => "Completed",
            ActivityStatus::Delayed => "Delayed",
            ActivityStatus::Paused => "Paused",
        }
    }
}

/// Work performed during the day.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityEntry {
    pub report_id: ReportId,
    pub description: String,
    pub completion: Percent,
    #[serde(default)]
    pub status: ActivityStatus,
}

/// Noteworthy event on site (incident, delivery, inspection...).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OccurrenceEntry {
    pub report_id: ReportId,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub reported_by: UserId,
}

/// Where the bytes of a photo live.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PhotoSource {
    /// Already uploaded and addressable by URL.
    Stored { url: String },
    /// Base64 payload captured by the form and not uploaded yet.
    Pending { data: String },
}

/// Photo attached to a report.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoEntry {
    pub report_id: ReportId,
    pub source: PhotoSource,
    #[serde(default)]
    pub caption: Option<String>,
    pub uploaded_by: UserId,
    pub created_at: NaiveDateTime,
}

impl PhotoEntry {
    /// Whether the photo is still waiting for its upload.
    pub fn is_pending(&self) -> bool {
        matches!(self.source, PhotoSource::Pending { .. })
    }

    /// File name shown in the report: the last path segment of the stored URL.
    pub fn file_name(&self) -> &str {
        match &self.source {
            PhotoSource::Stored { url } => {
                let path = url.split(['?', '#']).next().unwrap_or(url.as_str());
                path.trim_end_matches('/')
                    .rsplit('/')
                    .next()
                    .filter(|segment| !segment.is_empty())
                    .unwrap_or(url.as_str())
            }
            PhotoSource::Pending { .. } => "pending upload",
        }
    }
}

/// Remark left on a report.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentEntry {
    pub report_id: ReportId,
    pub body: String,
    pub author_id: UserId,
    pub created_at: NaiveDateTime,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_is_clamped() {
        assert_eq!(Percent::clamped(-5).value(), 0);
        assert_eq!(Percent::clamped(45).value(), 45);
        assert_eq!(Percent::clamped(180).value(), 100);
        assert_eq!(Percent::clamped(100).to_string(), "100%");
    }

    #[test]
    fn percent_is_clamped_when_deserialized() {
        let value: Percent = serde_json::from_str("250").expect("deserialize");
        assert_eq!(value.value(), 100);
        assert_eq!(serde_json::to_string(&value).expect("serialize"), "100");
    }

    #[test]
    fn unknown_weather_code_is_rejected() {
        let err = serde_json::from_str::<WeatherCondition>("\"foggy\"");
        assert!(err.is_err());
        let sunny: WeatherCondition = serde_json::from_str("\"sunny\"").expect("known code");
        assert_eq!(sunny, WeatherCondition::Sunny);
    }

    #[test]
    fn codes_round_trip_through_serde() {
        for condition in WeatherCondition::ALL {
            let json = serde_json::to_string(&condition).expect("serialize");
            assert_eq!(json, format!("\"{}\"", condition.code()));
        }
        for status in [ReportStatus::Draft, ReportStatus::Completed] {
            let json = serde_json::to_string(&status).expect("serialize");
            assert_eq!(json, format!("\"{}\"", status.code()));
        }
        for status in [
            ActivityStatus::NotStarted,
            ActivityStatus::InProgress,
            ActivityStatus::Completed,
            ActivityStatus::Delayed,
            ActivityStatus::Paused,
        ] {
            let json = serde_json::to_string(&status).expect("serialize");
            assert_eq!(json, format!("\"{}\"", status.code()));
        }
        let status: ActivityStatus = serde_json::from_str("\"in_progress\"").expect("status");
        assert_eq!(status.label(), "In progress");
    }

    #[test]
    fn photo_file_name_uses_last_segment() {
        let photo = PhotoEntry {
            report_id: ReportId(1),
            source: PhotoSource::Stored {
                url: "https://cdn.example.com/uploads/rdo/slab-pour.jpg?size=large".into(),
            },
            caption: None,
            uploaded_by: UserId(1),
            created_at: NaiveDate::from_ymd_opt(2024, 3, 1)
                .and_then(|date| date.and_hms_opt(9, 0, 0))
                .expect("valid timestamp"),
        };
        assert_eq!(photo.file_name(), "slab-pour.jpg");
        assert!(!photo.is_pending());
    }

    #[test]
    fn pending_photo_is_flagged() {
        let photo = PhotoEntry {
            report_id: ReportId(1),
            source: PhotoSource::Pending {
                data: "iVBORw0KGgo=".into(),
            },
            caption: Some("Crack".into()),
            uploaded_by: UserId(1),
            created_at: NaiveDate::from_ymd_opt(2024, 3, 1)
                .and_then(|date| date.and_hms_opt(9, 0, 0))
                .expect("valid timestamp"),
        };
        assert!(photo.is_pending());
        assert_eq!(photo.file_name(), "pending upload");
    }
}
