use chrono::NaiveDate;
use rdo_report::builder::ReportRenderer;
use rdo_report::model::{ReportId, UserId};
use rdo_report::store::{Dataset, InMemoryRepository, ReportRepository};
use rdo_report::style::LayoutStyle;
use rdo_report::{assemble, export_report, ExportError, NotFound, RenderError};

const FIXTURE: &str = include_str!("fixtures/dataset.json");

fn repository() -> InMemoryRepository {
    let dataset: Dataset = serde_json::from_str(FIXTURE).expect("fixture parses");
    InMemoryRepository::from_dataset(dataset).expect("fixture is consistent")
}

fn renderer() -> ReportRenderer {
    let generated_at = NaiveDate::from_ymd_opt(2024, 5, 6)
        .and_then(|date| date.and_hms_opt(17, 0, 0))
        .expect("timestamp");
    ReportRenderer::builder()
        .with_generated_at(generated_at)
        .build()
        .expect("renderer")
}

#[test]
fn exports_a_named_pdf_download() {
    let repository = repository();
    let download = export_report(&repository, &renderer(), ReportId(40)).expect("export");

    assert_eq!(download.file_name, "rdo-3-0012.pdf");
    assert_eq!(download.content_type, "application/pdf");
    assert!(download.bytes.starts_with(b"%PDF"));
}

#[test]
fn fixture_values_reach_the_layout() {
    let repository = repository();
    let view = assemble(&repository, ReportId(40)).expect("view");

    assert_eq!(view.activities[0].completion.value(), 100);
    assert_eq!(view.photos.len(), 1, "pending photo is skipped");
    assert_eq!(view.photos[0].entry.file_name(), "block-b.jpg");
    assert_eq!(view.occurrences[0].reported_by, "Unknown user");
    assert_eq!(view.total_headcount(), 6);

    let layout = renderer().layout(&view).expect("layout");
    let texts: Vec<_> = layout.pages.iter().flat_map(|page| page.body_texts()).collect();
    for expected in [
        "Harbour Logistics Hub",
        "Cloudy",
        "Sunny",
        "100%",
        "6.0 h",
        "block-b.jpg",
        "2024-05-06 11:02",
        "No comments recorded.",
    ] {
        assert!(texts.contains(&expected), "missing {expected:?}");
    }
}

#[test]
fn unknown_report_is_not_found() {
    let err = export_report(&repository(), &renderer(), ReportId(41)).unwrap_err();
    assert!(matches!(err, ExportError::NotFound(NotFound::Report(ReportId(41)))));
    assert_eq!(err.status_code(), 404);
}

#[test]
fn render_failures_are_reported_without_touching_the_store() {
    let repository = repository();
    let before = repository.report(ReportId(40));

    let cramped = LayoutStyle {
        cell_padding: 40.0,
        ..LayoutStyle::default()
    };
    let renderer = ReportRenderer::builder()
        .with_style(cramped)
        .build()
        .expect("renderer");
    let err = export_report(&repository, &renderer, ReportId(40)).unwrap_err();

    assert!(matches!(
        err,
        ExportError::RenderFailure(RenderError::Layout { .. })
    ));
    assert_eq!(err.status_code(), 500);
    assert_eq!(err.public_message(), "could not generate report");
    assert_eq!(repository.report(ReportId(40)), before);
    assert_eq!(repository.photos(ReportId(40)).len(), 2);
    assert!(repository.user(UserId(99)).is_none());
}
