use chrono::{NaiveDate, NaiveDateTime};
use rdo_report::builder::{RenderedLayout, ReportRenderer};
use rdo_report::canvas::{DrawOp, Page};
use rdo_report::layout::{self, LayoutText, SectionKind};
use rdo_report::model::{
    ActivityEntry, ActivityStatus, EquipmentEntry, OccurrenceEntry, Percent, Project, ProjectId,
    ReportId, ReportStatus, User, UserId, WeatherCondition, WeatherConditions, WorkforceEntry,
};
use rdo_report::store::{InMemoryRepository, NewReport};
use rdo_report::{assemble, sample, RenderError, ReportView};

const PROJECT: ProjectId = ProjectId(12);
const AUTHOR: UserId = UserId(1);

fn generated_at() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, 14)
        .and_then(|date| date.and_hms_opt(18, 30, 0))
        .expect("fixed timestamp")
}

fn renderer() -> ReportRenderer {
    ReportRenderer::builder()
        .with_generated_at(generated_at())
        .build()
        .expect("renderer")
}

/// Repository with one project, one author and an empty report.
fn empty_report() -> (InMemoryRepository, ReportId) {
    let mut repository = InMemoryRepository::new();
    repository
        .insert_project(Project {
            id: PROJECT,
            name: "Riverside Tower".into(),
            client: "Acme Developments".into(),
            location: "Porto Alegre".into(),
        })
        .expect("project");
    repository
        .insert_user(User {
            id: AUTHOR,
            name: "Ana Souza".into(),
            job_title: Some("Site engineer".into()),
            role: Some("engineer".into()),
        })
        .expect("user");
    let report = repository
        .create_report(NewReport {
            project_id: PROJECT,
            created_by: AUTHOR,
            date: NaiveDate::from_ymd_opt(2024, 3, 14).expect("date"),
            weather: WeatherConditions::default(),
            weather_notes: None,
            status: ReportStatus::Draft,
        })
        .expect("report");
    (repository, report.id)
}

fn workforce(report: ReportId, role: &str, headcount: u32) -> WorkforceEntry {
    WorkforceEntry {
        report_id: report,
        role: role.into(),
        headcount,
        start_time: Some("07:00".into()),
        end_time: Some("17:00".into()),
        notes: None,
    }
}

fn lay_out(repository: &InMemoryRepository, id: ReportId) -> RenderedLayout {
    let view = assemble(repository, id).expect("view");
    renderer().layout(&view).expect("layout")
}

fn all_texts(pages: &[Page]) -> Vec<&str> {
    pages.iter().flat_map(Page::body_texts).collect()
}

fn long_sample(occurrences: usize) -> ReportView {
    let dataset = sample::with_long_occurrences(sample::sample_dataset(), occurrences);
    let repository = InMemoryRepository::from_dataset(dataset).expect("dataset");
    assemble(&repository, sample::SAMPLE_REPORT).expect("view")
}

#[test]
fn two_workforce_rows_and_one_equipment_fit_on_one_page() {
    let (mut repository, id) = empty_report();
    repository
        .add_workforce(workforce(id, "Mason", 6))
        .expect("mason");
    repository
        .add_workforce(workforce(id, "Carpenter", 4))
        .expect("carpenter");
    repository
        .add_equipment(EquipmentEntry {
            report_id: id,
            name: "Tower crane".into(),
            quantity: 1,
            hours_used: Some(7.5),
            notes: None,
        })
        .expect("crane");

    let layout = lay_out(&repository, id);
    assert_eq!(layout.pages.len(), 1);

    let texts = all_texts(&layout.pages);
    for expected in ["Mason", "Carpenter", "Tower crane", "7.5 h", "Total headcount: 10"] {
        assert!(texts.contains(&expected), "missing {expected:?}");
    }
    let footer: Vec<_> = layout.pages[0].footer_texts().collect();
    assert_eq!(footer, vec!["Generated at 2024-03-14 18:30", "Page 1 of 1"]);

    let mark = |kind: SectionKind| {
        *layout
            .sections
            .iter()
            .find(|mark| mark.kind == kind)
            .expect("section mark")
    };
    assert_eq!(mark(SectionKind::Workforce).rows, 2);
    assert_eq!(mark(SectionKind::Workforce).header_bands, 1);
    assert_eq!(mark(SectionKind::Equipment).rows, 1);
    assert!(mark(SectionKind::Activities).placeholder);
    assert!(mark(SectionKind::Occurrences).placeholder);
    assert!(mark(SectionKind::Photos).placeholder);
    assert!(texts.contains(&"No activities recorded."));
    assert!(texts.contains(&"No occurrences recorded."));
}

#[test]
fn empty_sections_show_placeholders_instead_of_tables() {
    let (repository, id) = empty_report();
    let layout = lay_out(&repository, id);
    let texts = all_texts(&layout.pages);

    for kind in [
        SectionKind::Workforce,
        SectionKind::Equipment,
        SectionKind::Activities,
        SectionKind::Occurrences,
        SectionKind::Photos,
        SectionKind::Comments,
    ] {
        assert!(texts.contains(&kind.placeholder()), "{kind:?} placeholder");
        let mark = layout
            .sections
            .iter()
            .find(|mark| mark.kind == kind)
            .expect("section mark");
        assert!(mark.placeholder);
        assert_eq!(mark.header_bands, 0);
    }
    for label in ["Headcount", "Quantity", "Progress", "Reported by", "Uploaded by", "Comment"] {
        assert!(!texts.contains(&label), "unexpected table header {label:?}");
    }
    assert!(!texts.iter().any(|text| text.starts_with("Total headcount")));
}

#[test]
fn weather_table_is_always_drawn_with_blanks() {
    let (repository, id) = empty_report();
    let layout = lay_out(&repository, id);
    let texts = all_texts(&layout.pages);

    for label in ["Morning", "Afternoon", "Night"] {
        assert!(texts.contains(&label));
    }
    let weather = layout
        .sections
        .iter()
        .find(|mark| mark.kind == SectionKind::Weather)
        .expect("weather mark");
    assert!(!weather.placeholder);
    assert_eq!(weather.rows, 1);
    assert_eq!(texts.iter().filter(|text| **text == "-").count(), 3);
}

#[test]
fn weather_labels_follow_the_stored_codes() {
    let (mut repository, id) = empty_report();
    let mut report = repository.delete_report(id).expect("stored report");
    report.weather = WeatherConditions {
        morning: Some(WeatherCondition::Sunny),
        afternoon: Some(WeatherCondition::Impracticable),
        night: None,
    };
    report.weather_notes = Some("Site flooded after lunch".into());
    repository.insert_report(report).expect("reinsert");

    let layout = lay_out(&repository, id);
    let texts = all_texts(&layout.pages);
    assert!(texts.contains(&"Sunny"));
    assert!(texts.contains(&"Impracticable"));
    assert!(texts.contains(&"Notes: Site flooded after lunch"));
}

#[test]
fn activity_progress_is_printed_within_range() {
    let (mut repository, id) = empty_report();
    for (description, completion) in [("Overshoot", 250), ("Negative", -5), ("Half", 50)] {
        repository
            .add_activity(ActivityEntry {
                report_id: id,
                description: description.into(),
                completion: Percent::clamped(completion),
                status: ActivityStatus::InProgress,
            })
            .expect("activity");
    }

    let layout = lay_out(&repository, id);
    let texts = all_texts(&layout.pages);
    assert!(texts.contains(&"100%"));
    assert!(texts.contains(&"0%"));
    assert!(texts.contains(&"50%"));
    assert!(!texts.contains(&"250%"));
    assert!(texts.contains(&"In progress"));
}

#[test]
fn long_tables_repeat_their_header_on_every_page() {
    let (mut repository, id) = empty_report();
    for index in 0..80 {
        repository
            .add_workforce(workforce(id, &format!("Crew {index}"), 2))
            .expect("crew");
    }

    let layout = lay_out(&repository, id);
    let mark = layout
        .sections
        .iter()
        .find(|mark| mark.kind == SectionKind::Workforce)
        .expect("workforce mark");
    assert_eq!(mark.rows, 80);
    assert!(mark.header_bands >= 2);

    let headcount_labels = all_texts(&layout.pages)
        .into_iter()
        .filter(|text| *text == "Headcount")
        .count();
    assert_eq!(headcount_labels, mark.header_bands);

    // Every continuation page of the table opens with the header band.
    for page in &layout.pages[mark.first_page..mark.first_page + mark.header_bands - 1] {
        let opening: Vec<_> = page.body_texts().take(5).collect();
        assert_eq!(opening, vec!["Role", "Headcount", "Start", "End", "Notes"]);
    }
}

#[test]
fn nothing_is_drawn_below_the_content_limit() {
    let renderer = renderer();
    let limit = renderer.geometry().content_limit();
    let top = renderer.geometry().content_top();

    for occurrences in [0, 3, 12, 30] {
        let layout = renderer.layout(&long_sample(occurrences)).expect("layout");
        for page in &layout.pages {
            for op in page.body() {
                match op {
                    DrawOp::Text { baseline, .. } => {
                        assert!(*baseline <= limit && *baseline >= top)
                    }
                    DrawOp::FillRect { rect, .. } => {
                        assert!(rect.bottom() <= limit + 1e-6 && rect.y >= top - 1e-6)
                    }
                    DrawOp::Line { from, to, .. } => {
                        assert!(from.1 <= limit + 1e-6 && to.1 <= limit + 1e-6)
                    }
                }
            }
        }
    }
}

#[test]
fn section_titles_are_never_left_alone_at_a_page_bottom() {
    let renderer = renderer();
    let titles: Vec<_> = SectionKind::ALL.iter().map(|kind| kind.title()).collect();

    for occurrences in 0..24 {
        let layout = renderer.layout(&long_sample(occurrences)).expect("layout");
        for page in &layout.pages {
            if let Some(last) = page.body_texts().last() {
                assert!(
                    !titles.contains(&last),
                    "page {} of the {occurrences}-occurrence report ends with title {last:?}",
                    page.number()
                );
            }
        }
        for mark in &layout.sections {
            let page = &layout.pages[mark.first_page - 1];
            assert!(page.body_texts().any(|text| text == mark.kind.title()));
        }
    }
}

#[test]
fn wrapped_occurrence_rows_grow_with_their_text() {
    let (mut repository, id) = empty_report();
    let short = "Gate left open.".to_owned();
    let long = "Concrete truck blocked the access road for forty minutes while the \
                pump was repositioned, delaying the second pour and the crane lifts \
                scheduled for the east wing."
        .repeat(3);
    for description in [short, long] {
        repository
            .add_occurrence(OccurrenceEntry {
                report_id: id,
                title: "Access".into(),
                description,
                time: Some("09:15".into()),
                tags: vec!["logistics".into()],
                reported_by: AUTHOR,
            })
            .expect("occurrence");
    }

    let layout = lay_out(&repository, id);
    let page = &layout.pages[0];
    let baselines: Vec<f64> = page
        .body()
        .iter()
        .filter_map(|op| match op {
            DrawOp::Text { baseline, text, .. } if text == "Access" => Some(*baseline),
            _ => None,
        })
        .collect();
    assert_eq!(baselines.len(), 2);

    let photos_title = page
        .body()
        .iter()
        .find_map(|op| match op {
            DrawOp::Text { baseline, text, .. } if text == "Photos" => Some(*baseline),
            _ => None,
        })
        .expect("photos title on the same page");
    let long_row_lines = page
        .body()
        .iter()
        .filter(|op| {
            matches!(op, DrawOp::Text { baseline, .. }
                if *baseline > baselines[1] && *baseline < photos_title)
        })
        .count();
    assert!(long_row_lines > 3, "long description should wrap");

    // The short row keeps the base height.
    let style = *renderer().style();
    assert!((baselines[1] - baselines[0] - style.row_height).abs() < 1e-6);
}

#[test]
fn footers_number_pages_in_sequence() {
    let layout = renderer().layout(&long_sample(30)).expect("layout");
    let total = layout.pages.len();
    assert!(total >= 3);

    for (index, page) in layout.pages.iter().enumerate() {
        assert_eq!(page.number(), index + 1);
        let footer: Vec<_> = page.footer_texts().collect();
        assert_eq!(footer.len(), 2);
        assert_eq!(footer[1], format!("Page {} of {}", index + 1, total));
    }
}

#[test]
fn layout_is_repeatable() {
    let renderer = renderer();
    let view = long_sample(10);
    let first = renderer.layout(&view).expect("first layout");
    let second = renderer.layout(&view).expect("second layout");
    assert_eq!(first, second);
}

#[test]
fn header_block_uses_the_configured_date_format() {
    let (repository, id) = empty_report();
    let view = assemble(&repository, id).expect("view");
    let layout = ReportRenderer::builder()
        .with_generated_at(generated_at())
        .with_date_format("%d/%m/%Y")
        .with_title("RDO")
        .build()
        .expect("renderer")
        .layout(&view)
        .expect("layout");

    let texts = all_texts(&layout.pages);
    assert_eq!(texts[0], "RDO");
    assert_eq!(texts[1], "No. 0001");
    assert!(texts.contains(&"14/03/2024 (Thursday)"));
    let footer: Vec<_> = layout.pages[0].footer_texts().collect();
    assert_eq!(footer[0], "Generated at 14/03/2024 18:30");
}

/// Header labels of the occurrences table on one page, without their baseline.
#[test]
fn date_formats_without_a_calendar_value_fail_instead_of_panicking() {
    let view = long_sample(0);
    let renderer = renderer();
    let text = LayoutText {
        title: "RDO".into(),
        date_format: "%d/%m/%Y %H:%M".into(),
    };

    let err = layout::lay_out(&view, *renderer.geometry(), renderer.style(), &text).unwrap_err();
    assert!(matches!(err, RenderError::Format(ref format) if format == "%d/%m/%Y %H:%M"));

    let err = ReportRenderer::builder()
        .with_date_format("%d/%m/%Y %H:%M")
        .build()
        .unwrap_err();
    assert!(matches!(err, RenderError::Format(_)));
}

fn occurrence_header(page: &Page) -> Vec<DrawOp> {
    let labels = ["Time", "Tags", "Reported by"];
    page.body()
        .iter()
        .filter_map(|op| match op {
            DrawOp::Text { x, text, style, .. } if labels.contains(&text.as_str()) => {
                Some(DrawOp::Text {
                    x: *x,
                    baseline: 0.0,
                    text: text.clone(),
                    style: *style,
                })
            }
            _ => None,
        })
        .collect()
}

#[test]
fn occurrence_header_is_redrawn_identically_on_each_page() {
    let layout = renderer().layout(&long_sample(30)).expect("layout");
    let mark = layout
        .sections
        .iter()
        .find(|mark| mark.kind == SectionKind::Occurrences)
        .expect("occurrences mark");
    assert!(layout.pages.len() > 1);
    assert!(mark.header_bands > 1);

    let header = occurrence_header(&layout.pages[mark.first_page - 1]);
    assert_eq!(header.len(), 3);

    let continuation = &layout.pages[mark.first_page..mark.first_page - 1 + mark.header_bands];
    for page in continuation {
        assert_eq!(occurrence_header(page), header, "page {}", page.number());
    }
}

#[test]
fn re_rendering_changes_only_the_footer_timestamp() {
    let view = long_sample(8);
    let later = NaiveDate::from_ymd_opt(2024, 3, 15)
        .and_then(|date| date.and_hms_opt(9, 0, 0))
        .expect("later timestamp");
    let first = renderer().layout(&view).expect("first");
    let second = ReportRenderer::builder()
        .with_generated_at(later)
        .build()
        .expect("renderer")
        .layout(&view)
        .expect("second");

    assert_eq!(first.sections, second.sections);
    assert_eq!(first.pages.len(), second.pages.len());
    for (a, b) in first.pages.iter().zip(&second.pages) {
        assert_eq!(a.body(), b.body());
        assert_ne!(a.footer(), b.footer());
        assert_eq!(a.footer_texts().nth(1), b.footer_texts().nth(1));
    }
}
