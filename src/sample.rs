//! A realistic demo dataset: one project, its team and a fully filled report.

use chrono::{NaiveDate, NaiveDateTime};

use crate::model::{
    ActivityEntry, ActivityStatus, CommentEntry, EquipmentEntry, OccurrenceEntry, Percent,
    PhotoEntry, PhotoSource, Project, ProjectId, Report, ReportId, ReportStatus, User, UserId,
    WeatherCondition, WeatherConditions, WorkforceEntry,
};
use crate::store::{Dataset, InMemoryRepository, StoreError};

/// Project of the sample report.
pub const SAMPLE_PROJECT: ProjectId = ProjectId(12);
/// Identifier of the sample report.
pub const SAMPLE_REPORT: ReportId = ReportId(1);

const ENGINEER: UserId = UserId(1);
const FOREMAN: UserId = UserId(2);
const INSPECTOR: UserId = UserId(3);

fn at(hour: u32, minute: u32) -> NaiveDateTime {
    sample_date()
        .and_hms_opt(hour, minute, 0)
        .unwrap_or_default()
}

fn sample_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 14).unwrap_or_default()
}

fn text(value: &str) -> Option<String> {
    Some(value.to_owned())
}

/// The sample records, ready to be serialized or loaded into a repository.
pub fn sample_dataset() -> Dataset {
    let report = SAMPLE_REPORT;
    Dataset {
        projects: vec![Project {
            id: SAMPLE_PROJECT,
            name: "Riverside Tower".into(),
            client: "Acme Developments Ltd.".into(),
            location: "14 Harbour Road, Porto Alegre".into(),
        }],
        users: vec![
            User {
                id: ENGINEER,
                name: "Ana Souza".into(),
                job_title: text("Site engineer"),
                role: text("engineer"),
            },
            User {
                id: FOREMAN,
                name: "Carlos Lima".into(),
                job_title: text("Foreman"),
                role: text("supervisor"),
            },
            User {
                id: INSPECTOR,
                name: "Marta Reis".into(),
                job_title: None,
                role: text("inspector"),
            },
        ],
        reports: vec![Report {
            id: report,
            project_id: SAMPLE_PROJECT,
            created_by: ENGINEER,
            report_number: 7,
            date: sample_date(),
            weather: WeatherConditions {
                morning: Some(WeatherCondition::Sunny),
                afternoon: Some(WeatherCondition::Rainy),
                night: None,
            },
            weather_notes: text("Heavy shower between 14:00 and 15:30; concrete pour postponed."),
            status: ReportStatus::Completed,
        }],
        workforce: vec![
            WorkforceEntry {
                report_id: report,
                role: "Mason".into(),
                headcount: 6,
                start_time: text("07:00"),
                end_time: text("17:00"),
                notes: text("Block walls, level 3"),
            },
            WorkforceEntry {
                report_id: report,
                role: "Carpenter".into(),
                headcount: 4,
                start_time: text("07:00"),
                end_time: text("16:00"),
                notes: text("Slab formwork, level 4"),
            },
            WorkforceEntry {
                report_id: report,
                role: "Electrician".into(),
                headcount: 2,
                start_time: text("08:00"),
                end_time: None,
                notes: None,
            },
        ],
        equipment: vec![
            EquipmentEntry {
                report_id: report,
                name: "Tower crane".into(),
                quantity: 1,
                hours_used: Some(7.5),
                notes: text("Stopped during the rain"),
            },
            EquipmentEntry {
                report_id: report,
                name: "Concrete mixer 400 L".into(),
                quantity: 2,
                hours_used: Some(3.0),
                notes: None,
            },
            EquipmentEntry {
                report_id: report,
                name: "Scaffolding set".into(),
                quantity: 12,
                hours_used: None,
                notes: None,
            },
        ],
        activities: vec![
            ActivityEntry {
                report_id: report,
                description: "Masonry, level 3 east wing".into(),
                completion: Percent::clamped(65),
                status: ActivityStatus::InProgress,
            },
            ActivityEntry {
                report_id: report,
                description: "Formwork, level 4 slab".into(),
                completion: Percent::clamped(40),
                status: ActivityStatus::Delayed,
            },
            ActivityEntry {
                report_id: report,
                description: "Electrical conduits, level 2".into(),
                completion: Percent::clamped(100),
                status: ActivityStatus::Completed,
            },
            ActivityEntry {
                report_id: report,
                description: "Facade waterproofing".into(),
                completion: Percent::clamped(0),
                status: ActivityStatus::NotStarted,
            },
        ],
        occurrences: vec![
            OccurrenceEntry {
                report_id: report,
                title: "Late delivery".into(),
                description: "Rebar delivery arrived at 11:20 instead of 08:00. Formwork crew \
                              was reassigned to cleaning until unloading finished."
                    .into(),
                time: text("11:20"),
                tags: vec!["supply".into(), "delay".into()],
                reported_by: FOREMAN,
            },
            OccurrenceEntry {
                report_id: report,
                title: "Safety inspection".into(),
                description: "Routine inspection of guard rails on levels 3 and 4. No issues found."
                    .into(),
                time: text("15:45"),
                tags: vec!["safety".into()],
                reported_by: INSPECTOR,
            },
        ],
        photos: vec![
            PhotoEntry {
                report_id: report,
                source: PhotoSource::Stored {
                    url: "https://cdn.example.com/rdo/12/7/level3-masonry.jpg".into(),
                },
                caption: text("Masonry progress, east wing"),
                uploaded_by: ENGINEER,
                created_at: at(10, 5),
            },
            PhotoEntry {
                report_id: report,
                source: PhotoSource::Stored {
                    url: "https://cdn.example.com/rdo/12/7/rebar-delivery.jpg?v=2".into(),
                },
                caption: None,
                uploaded_by: FOREMAN,
                created_at: at(11, 40),
            },
        ],
        comments: vec![
            CommentEntry {
                report_id: report,
                body: "Reschedule the level 4 pour for Monday if the forecast holds.".into(),
                author_id: ENGINEER,
                created_at: at(17, 10),
            },
            CommentEntry {
                report_id: report,
                body: "Supplier notified about the delay; penalty clause under review.".into(),
                author_id: FOREMAN,
                created_at: at(17, 25),
            },
        ],
    }
}

/// Appends `count` multi-line occurrences to the sample report, enough to
/// push the document over several pages.
pub fn with_long_occurrences(mut dataset: Dataset, count: usize) -> Dataset {
    let reporters = [ENGINEER, FOREMAN, INSPECTOR];
    for index in 0..count {
        let paragraph = format!(
            "Follow-up {number}: crew reported uneven settlement near column C{number}. \
             Survey team measured the slab and recorded the readings in the site log. \
             Temporary props were installed and the area was cordoned off until the \
             structural engineer signs off the remedial plan.",
            number = index + 1
        );
        dataset.occurrences.push(OccurrenceEntry {
            report_id: SAMPLE_REPORT,
            title: format!("Settlement check #{}", index + 1),
            description: paragraph,
            time: Some(format!("{:02}:{:02}", 8 + index % 10, (index * 7) % 60)),
            tags: vec!["structure".into(), "follow-up".into()],
            reported_by: reporters[index % reporters.len()],
        });
    }
    dataset
}

/// Repository holding [`sample_dataset`].
pub fn sample_repository() -> Result<InMemoryRepository, StoreError> {
    InMemoryRepository::from_dataset(sample_dataset())
}
