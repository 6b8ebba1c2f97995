//! Gathers a report and everything the PDF needs into one read-only view.

use log::debug;

use crate::error::NotFound;
use crate::model::{
    ActivityEntry, CommentEntry, EquipmentEntry, OccurrenceEntry, PhotoEntry, Report, ReportId,
    UserId, WorkforceEntry,
};
use crate::store::ReportRepository;

/// Display name used when a referenced user no longer exists.
pub const UNKNOWN_USER: &str = "Unknown user";

/// Project fields printed in the report header.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProjectSummary {
    pub name: String,
    pub client: String,
    pub location: String,
}

/// Author fields printed in the report header.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthorSummary {
    pub name: String,
    pub job_title: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OccurrenceView {
    pub entry: OccurrenceEntry,
    pub reported_by: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PhotoView {
    pub entry: PhotoEntry,
    pub uploaded_by: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommentView {
    pub entry: CommentEntry,
    pub author: String,
    pub author_role: Option<String>,
}

/// Fully hydrated report, ready to be rendered.
#[derive(Clone, Debug, PartialEq)]
pub struct ReportView {
    pub report: Report,
    pub project: ProjectSummary,
    pub author: AuthorSummary,
    pub workforce: Vec<WorkforceEntry>,
    pub equipment: Vec<EquipmentEntry>,
    pub activities: Vec<ActivityEntry>,
    pub occurrences: Vec<OccurrenceView>,
    pub photos: Vec<PhotoView>,
    pub comments: Vec<CommentView>,
}

impl ReportView {
    /// Sum of the headcount of every workforce entry.
    pub fn total_headcount(&self) -> u32 {
        self.workforce.iter().map(|entry| entry.headcount).sum()
    }
}

/// Loads report `id` with its project, author and child collections.
///
/// Fails with [`NotFound`] when the report or its project is missing. The
/// repository is only read. Photos that are still waiting for their upload
/// are left out since their bytes are not stored anywhere yet.
pub fn assemble<R>(repository: &R, id: ReportId) -> Result<ReportView, NotFound>
where
    R: ReportRepository + ?Sized,
{
    let report = repository.report(id).ok_or(NotFound::Report(id))?;
    let project = repository
        .project(report.project_id)
        .ok_or(NotFound::Project(report.project_id))?;

    let author = match repository.user(report.created_by) {
        Some(user) => AuthorSummary {
            name: user.name,
            job_title: user.job_title,
        },
        None => AuthorSummary {
            name: UNKNOWN_USER.to_owned(),
            job_title: None,
        },
    };

    let display_name = |user: UserId| {
        repository
            .user(user)
            .map_or_else(|| UNKNOWN_USER.to_owned(), |user| user.name)
    };

    let occurrences = repository
        .occurrences(id)
        .into_iter()
        .map(|entry| OccurrenceView {
            reported_by: display_name(entry.reported_by),
            entry,
        })
        .collect();

    let photos = repository
        .photos(id)
        .into_iter()
        .filter(|entry| {
            if entry.is_pending() {
                debug!("report {}: skipping photo pending upload", id);
            }
            !entry.is_pending()
        })
        .map(|entry| PhotoView {
            uploaded_by: display_name(entry.uploaded_by),
            entry,
        })
        .collect();

    let comments = repository
        .comments(id)
        .into_iter()
        .map(|entry| {
            let user = repository.user(entry.author_id);
            CommentView {
                author: user
                    .as_ref()
                    .map_or_else(|| UNKNOWN_USER.to_owned(), |user| user.name.clone()),
                author_role: user.and_then(|user| user.role),
                entry,
            }
        })
        .collect();

    Ok(ReportView {
        project: ProjectSummary {
            name: project.name,
            client: project.client,
            location: project.location,
        },
        author,
        workforce: repository.workforce(id),
        equipment: repository.equipment(id),
        activities: repository.activities(id),
        occurrences,
        photos,
        comments,
        report,
    })
}
