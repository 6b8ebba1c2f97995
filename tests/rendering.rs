use chrono::{NaiveDate, NaiveDateTime};
use rdo_report::builder::ReportRenderer;
use rdo_report::sample;
use rdo_report::{assemble, ReportView};
use sha2::{Digest, Sha256};

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

fn sample_view(long_occurrences: usize) -> ReportView {
    let dataset = sample::with_long_occurrences(sample::sample_dataset(), long_occurrences);
    let repository =
        rdo_report::store::InMemoryRepository::from_dataset(dataset).expect("sample dataset");
    assemble(&repository, sample::SAMPLE_REPORT).expect("sample report")
}

fn render_sample_pdf() -> Vec<u8> {
    renderer()
        .render(&sample_view(0))
        .expect("render sample pdf")
        .bytes
}

/// Digest of every page's content stream, in page order.
///
/// Document metadata (creation date, ids) changes between runs; the drawn
/// content must not.
fn content_digest(bytes: &[u8]) -> [u8; 32] {
    let document = lopdf::Document::load_mem(bytes).expect("parse rendered pdf");
    let mut hasher = Sha256::new();
    for (number, page_id) in document.get_pages() {
        let content = document
            .get_page_content(page_id)
            .unwrap_or_else(|err| panic!("content of page {number}: {err}"));
        hasher.update(number.to_be_bytes());
        hasher.update(&content);
    }
    hasher.finalize().into()
}

#[test]
fn renders_a_pdf_document() {
    let bytes = render_sample_pdf();
    assert!(bytes.starts_with(b"%PDF-"), "output should carry a PDF header");
}

#[test]
fn rendering_is_deterministic() {
    let first = content_digest(&render_sample_pdf());
    let second = content_digest(&render_sample_pdf());
    assert_eq!(first, second, "page contents differ between two renders");
}

#[test]
fn a_different_clock_changes_the_page_contents() {
    let later = ReportRenderer::builder()
        .with_generated_at(generated_at() + chrono::Duration::minutes(5))
        .build()
        .expect("renderer")
        .render(&sample_view(0))
        .expect("render")
        .bytes;
    assert_ne!(content_digest(&render_sample_pdf()), content_digest(&later));
}

#[test]
fn pdf_page_count_matches_footer_total() {
    let renderer = renderer();
    let view = sample_view(25);
    let layout = renderer.layout(&view).expect("layout");
    let rendered = renderer.render(&view).expect("render");

    let total = layout.pages.len();
    assert!(total > 1, "long occurrences should span several pages");
    assert_eq!(rendered.page_count, total);

    let document = lopdf::Document::load_mem(&rendered.bytes).expect("parse rendered pdf");
    assert_eq!(document.get_pages().len(), total);

    let last_footer: Vec<_> = layout.pages[total - 1].footer_texts().collect();
    assert_eq!(last_footer[1], format!("Page {total} of {total}"));
}

#[cfg(feature = "bookmarks")]
#[test]
fn bookmarks_point_at_section_pages() {
    use lopdf::Object;

    let rendered = renderer()
        .render_with_bookmarks(&sample_view(25))
        .expect("render with bookmarks");
    let document = lopdf::Document::load_mem(&rendered.bytes).expect("parse pdf");

    let catalog = document
        .trailer
        .get(b"Root")
        .and_then(Object::as_reference)
        .and_then(|root| document.get_object(root))
        .and_then(Object::as_dict)
        .expect("catalog");
    let outlines_id = catalog
        .get(b"Outlines")
        .and_then(Object::as_reference)
        .expect("outline root");
    let outlines = document
        .get_object(outlines_id)
        .and_then(Object::as_dict)
        .expect("outline dictionary");
    assert_eq!(
        outlines.get(b"Count").and_then(Object::as_i64).expect("count"),
        rendered.sections.len() as i64
    );

    let pages = document.get_pages();
    let first = outlines
        .get(b"First")
        .and_then(Object::as_reference)
        .expect("first entry");
    let entry = document
        .get_object(first)
        .and_then(Object::as_dict)
        .expect("entry");
    let dest = entry
        .get(b"Dest")
        .and_then(Object::as_array)
        .expect("destination");
    let page_ref = dest[0].as_reference().expect("page reference");
    assert_eq!(Some(&page_ref), pages.get(&1));
}
