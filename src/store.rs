//! Repository access to stored reports.
//!
//! [`ReportRepository`] is the seam between the exporter and whatever storage
//! the application uses. [`InMemoryRepository`] is a complete implementation
//! backed by ordered maps; it is built once and handed around by reference.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::model::{
    ActivityEntry, CommentEntry, EquipmentEntry, OccurrenceEntry, PhotoEntry, Project, ProjectId,
    Report, ReportId, ReportStatus, User, UserId, WeatherConditions, WorkforceEntry,
};

/// Read access to reports and everything attached to them.
///
/// Child collections are returned in insertion order.
pub trait ReportRepository {
    fn project(&self, id: ProjectId) -> Option<Project>;
    fn report(&self, id: ReportId) -> Option<Report>;
    fn user(&self, id: UserId) -> Option<User>;
    fn workforce(&self, report: ReportId) -> Vec<WorkforceEntry>;
    fn equipment(&self, report: ReportId) -> Vec<EquipmentEntry>;
    fn activities(&self, report: ReportId) -> Vec<ActivityEntry>;
    fn occurrences(&self, report: ReportId) -> Vec<OccurrenceEntry>;
    fn photos(&self, report: ReportId) -> Vec<PhotoEntry>;
    fn comments(&self, report: ReportId) -> Vec<CommentEntry>;
}

/// Errors raised when writing to the in-memory repository.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StoreError {
    /// A report refers to a project that is not stored.
    UnknownProject(ProjectId),
    /// A child entry refers to a report that is not stored.
    UnknownReport(ReportId),
    /// Two reports of one project carry the same number.
    DuplicateReportNumber { project: ProjectId, number: u32 },
    /// An identifier is already taken.
    DuplicateId(String),
    /// No report identifier or number is left to hand out.
    Exhausted(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownProject(id) => write!(f, "project {id} does not exist"),
            Self::UnknownReport(id) => write!(f, "report {id} does not exist"),
            Self::DuplicateReportNumber { project, number } => write!(
                f,
                "project {project} already has a report numbered {number}"
            ),
            Self::DuplicateId(what) => write!(f, "{what} is already stored"),
            Self::Exhausted(what) => write!(f, "no {what} left to assign"),
        }
    }
}

impl std::error::Error for StoreError {}

/// Fields supplied when a new report is created; the number is assigned.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewReport {
    pub project_id: ProjectId,
    pub created_by: UserId,
    pub date: NaiveDate,
    pub weather: WeatherConditions,
    pub weather_notes: Option<String>,
    pub status: ReportStatus,
}

/// Everything a repository holds, in a serde-friendly shape.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Dataset {
    pub projects: Vec<Project>,
    pub users: Vec<User>,
    pub reports: Vec<Report>,
    pub workforce: Vec<WorkforceEntry>,
    pub equipment: Vec<EquipmentEntry>,
    pub activities: Vec<ActivityEntry>,
    pub occurrences: Vec<OccurrenceEntry>,
    pub photos: Vec<PhotoEntry>,
    pub comments: Vec<CommentEntry>,
}

#[derive(Clone, Debug, Default)]
struct Children {
    workforce: Vec<WorkforceEntry>,
    equipment: Vec<EquipmentEntry>,
    activities: Vec<ActivityEntry>,
    occurrences: Vec<OccurrenceEntry>,
    photos: Vec<PhotoEntry>,
    comments: Vec<CommentEntry>,
}

/// Repository keeping every record in memory.
#[derive(Clone, Debug, Default)]
pub struct InMemoryRepository {
    projects: BTreeMap<ProjectId, Project>,
    users: BTreeMap<UserId, User>,
    reports: BTreeMap<ReportId, Report>,
    numbers: BTreeSet<(ProjectId, u32)>,
    // Highest number ever stored per project; deletes never lower it.
    last_numbers: BTreeMap<ProjectId, u32>,
    last_report_id: u64,
    children: BTreeMap<ReportId, Children>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a dataset, enforcing the same invariants as the single inserts.
    pub fn from_dataset(dataset: Dataset) -> Result<Self, StoreError> {
        let mut repository = Self::new();
        for project in dataset.projects {
            repository.insert_project(project)?;
        }
        for user in dataset.users {
            repository.insert_user(user)?;
        }
        for report in dataset.reports {
            repository.insert_report(report)?;
        }
        for entry in dataset.workforce {
            repository.add_workforce(entry)?;
        }
        for entry in dataset.equipment {
            repository.add_equipment(entry)?;
        }
        for entry in dataset.activities {
            repository.add_activity(entry)?;
        }
        for entry in dataset.occurrences {
            repository.add_occurrence(entry)?;
        }
        for entry in dataset.photos {
            repository.add_photo(entry)?;
        }
        for entry in dataset.comments {
            repository.add_comment(entry)?;
        }
        Ok(repository)
    }

    pub fn insert_project(&mut self, project: Project) -> Result<(), StoreError> {
        if self.projects.contains_key(&project.id) {
            return Err(StoreError::DuplicateId(format!("project {}", project.id)));
        }
        self.projects.insert(project.id, project);
        Ok(())
    }

    pub fn insert_user(&mut self, user: User) -> Result<(), StoreError> {
        if self.users.contains_key(&user.id) {
            return Err(StoreError::DuplicateId(format!("user {}", user.id)));
        }
        self.users.insert(user.id, user);
        Ok(())
    }

    /// Stores a report that already carries its identifier and number.
    pub fn insert_report(&mut self, report: Report) -> Result<(), StoreError> {
        if !self.projects.contains_key(&report.project_id) {
            return Err(StoreError::UnknownProject(report.project_id));
        }
        if self.reports.contains_key(&report.id) {
            return Err(StoreError::DuplicateId(format!("report {}", report.id)));
        }
        if !self.numbers.insert((report.project_id, report.report_number)) {
            return Err(StoreError::DuplicateReportNumber {
                project: report.project_id,
                number: report.report_number,
            });
        }
        let last = self.last_numbers.entry(report.project_id).or_insert(0);
        *last = (*last).max(report.report_number);
        self.last_report_id = self.last_report_id.max(report.id.0);
        self.children.insert(report.id, Children::default());
        self.reports.insert(report.id, report);
        Ok(())
    }

    /// Creates a report with a fresh identifier and the next number of its
    /// project. Identifiers and numbers of deleted reports are not reused.
    pub fn create_report(&mut self, new: NewReport) -> Result<Report, StoreError> {
        if !self.projects.contains_key(&new.project_id) {
            return Err(StoreError::UnknownProject(new.project_id));
        }
        let id = self
            .last_report_id
            .checked_add(1)
            .map(ReportId)
            .ok_or_else(|| StoreError::Exhausted("report identifier".into()))?;
        let report = Report {
            id,
            project_id: new.project_id,
            created_by: new.created_by,
            report_number: self.next_report_number(new.project_id)?,
            date: new.date,
            weather: new.weather,
            weather_notes: new.weather_notes,
            status: new.status,
        };
        self.insert_report(report.clone())?;
        Ok(report)
    }

    /// Number the next report of `project` will get.
    pub fn next_report_number(&self, project: ProjectId) -> Result<u32, StoreError> {
        self.last_numbers
            .get(&project)
            .copied()
            .unwrap_or(0)
            .checked_add(1)
            .ok_or_else(|| StoreError::Exhausted(format!("report number in project {project}")))
    }

    /// Removes a report together with every entry attached to it.
    pub fn delete_report(&mut self, id: ReportId) -> Option<Report> {
        let report = self.reports.remove(&id)?;
        self.numbers.remove(&(report.project_id, report.report_number));
        self.children.remove(&id);
        Some(report)
    }

    fn children_mut(&mut self, report: ReportId) -> Result<&mut Children, StoreError> {
        self.children
            .get_mut(&report)
            .ok_or(StoreError::UnknownReport(report))
    }

    pub fn add_workforce(&mut self, entry: WorkforceEntry) -> Result<(), StoreError> {
        self.children_mut(entry.report_id)?.workforce.push(entry);
        Ok(())
    }

    pub fn add_equipment(&mut self, entry: EquipmentEntry) -> Result<(), StoreError> {
        self.children_mut(entry.report_id)?.equipment.push(entry);
        Ok(())
    }

    pub fn add_activity(&mut self, entry: ActivityEntry) -> Result<(), StoreError> {
        self.children_mut(entry.report_id)?.activities.push(entry);
        Ok(())
    }

    pub fn add_occurrence(&mut self, entry: OccurrenceEntry) -> Result<(), StoreError> {
        self.children_mut(entry.report_id)?.occurrences.push(entry);
        Ok(())
    }

    pub fn add_photo(&mut self, entry: PhotoEntry) -> Result<(), StoreError> {
        self.children_mut(entry.report_id)?.photos.push(entry);
        Ok(())
    }

    pub fn add_comment(&mut self, entry: CommentEntry) -> Result<(), StoreError> {
        self.children_mut(entry.report_id)?.comments.push(entry);
        Ok(())
    }

    fn collection<T: Clone>(&self, report: ReportId, pick: impl Fn(&Children) -> &Vec<T>) -> Vec<T> {
        self.children
            .get(&report)
            .map(|children| pick(children).clone())
            .unwrap_or_default()
    }
}

impl ReportRepository for InMemoryRepository {
    fn project(&self, id: ProjectId) -> Option<Project> {
        self.projects.get(&id).cloned()
    }

    fn report(&self, id: ReportId) -> Option<Report> {
        self.reports.get(&id).cloned()
    }

    fn user(&self, id: UserId) -> Option<User> {
        self.users.get(&id).cloned()
    }

    fn workforce(&self, report: ReportId) -> Vec<WorkforceEntry> {
        self.collection(report, |children| &children.workforce)
    }

    fn equipment(&self, report: ReportId) -> Vec<EquipmentEntry> {
        self.collection(report, |children| &children.equipment)
    }

    fn activities(&self, report: ReportId) -> Vec<ActivityEntry> {
        self.collection(report, |children| &children.activities)
    }

    fn occurrences(&self, report: ReportId) -> Vec<OccurrenceEntry> {
        self.collection(report, |children| &children.occurrences)
    }

    fn photos(&self, report: ReportId) -> Vec<PhotoEntry> {
        self.collection(report, |children| &children.photos)
    }

    fn comments(&self, report: ReportId) -> Vec<CommentEntry> {
        self.collection(report, |children| &children.comments)
    }
}
