//! Section outline for rendered reports.
//!
//! printpdf cannot write `/Outlines`, so the finished bytes are reopened with
//! `lopdf` and one top-level entry is added per section, each jumping to the
//! page the section title sits on.

use std::collections::BTreeMap;
use std::fmt;

use lopdf::{Dictionary, Document, Object, ObjectId};

use crate::layout::SectionMark;

/// Failure to add the section outline to a rendered document.
#[derive(Debug)]
pub enum BookmarkError {
    /// `lopdf` could not read or write the document.
    Unreadable(lopdf::Error),
    /// The trailer has no `/Root` reference.
    NoCatalog,
    /// `/Root` points at something other than a dictionary.
    CatalogNotDictionary,
    /// A section was laid out on a page the document does not contain.
    UnknownPage {
        section: &'static str,
        page_number: usize,
    },
}

impl From<lopdf::Error> for BookmarkError {
    fn from(err: lopdf::Error) -> Self {
        Self::Unreadable(err)
    }
}

impl From<std::io::Error> for BookmarkError {
    fn from(err: std::io::Error) -> Self {
        Self::Unreadable(err.into())
    }
}

impl fmt::Display for BookmarkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unreadable(err) => write!(f, "rendered report is not a readable PDF: {err}"),
            Self::NoCatalog => f.write_str("rendered report has no document catalog"),
            Self::CatalogNotDictionary => {
                f.write_str("document catalog of the rendered report is malformed")
            }
            Self::UnknownPage {
                section,
                page_number,
            } => write!(
                f,
                "cannot bookmark {section}: page {page_number} is not in the document"
            ),
        }
    }
}

impl std::error::Error for BookmarkError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        if let Self::Unreadable(err) = self {
            Some(err)
        } else {
            None
        }
    }
}

/// Returns `pdf_bytes` with an outline entry for every section in `sections`.
///
/// Entries keep drawing order and use a `/Fit` destination.
pub fn apply_section_bookmarks(
    pdf_bytes: &[u8],
    sections: &[SectionMark],
) -> Result<Vec<u8>, BookmarkError> {
    if sections.is_empty() {
        return Ok(pdf_bytes.to_vec());
    }

    let mut document = Document::load_mem(pdf_bytes)?;
    let destinations = resolve_destinations(&document.get_pages(), sections)?;

    let root_id = document.new_object_id();
    let entry_ids: Vec<ObjectId> = destinations
        .iter()
        .map(|_| document.new_object_id())
        .collect();

    for (position, (title, page)) in destinations.iter().enumerate() {
        let entry = outline_entry(root_id, title, *page, &entry_ids, position);
        document.objects.insert(entry_ids[position], Object::Dictionary(entry));
    }
    document.objects.insert(
        root_id,
        Object::Dictionary(outline_root(&entry_ids)),
    );
    attach_to_catalog(&mut document, root_id)?;

    let mut buffer = Vec::new();
    document.save_to(&mut buffer)?;
    Ok(buffer)
}

/// Pairs every section title with the page object it starts on.
fn resolve_destinations(
    pages: &BTreeMap<u32, ObjectId>,
    sections: &[SectionMark],
) -> Result<Vec<(&'static str, ObjectId)>, BookmarkError> {
    let mut destinations = Vec::with_capacity(sections.len());
    for mark in sections {
        let page = u32::try_from(mark.first_page)
            .ok()
            .and_then(|number| pages.get(&number))
            .ok_or(BookmarkError::UnknownPage {
                section: mark.title(),
                page_number: mark.first_page,
            })?;
        destinations.push((mark.title(), *page));
    }
    Ok(destinations)
}

fn outline_entry(
    root_id: ObjectId,
    title: &str,
    page: ObjectId,
    siblings: &[ObjectId],
    position: usize,
) -> Dictionary {
    let mut entry = Dictionary::new();
    entry.set("Title", Object::string_literal(title));
    entry.set("Parent", Object::Reference(root_id));
    entry.set(
        "Dest",
        Object::Array(vec![Object::Reference(page), Object::Name(b"Fit".to_vec())]),
    );
    if position > 0 {
        entry.set("Prev", Object::Reference(siblings[position - 1]));
    }
    if let Some(next) = siblings.get(position + 1) {
        entry.set("Next", Object::Reference(*next));
    }
    entry
}

fn outline_root(entry_ids: &[ObjectId]) -> Dictionary {
    let mut root = Dictionary::new();
    root.set("Type", Object::Name(b"Outlines".to_vec()));
    root.set("Count", Object::Integer(entry_ids.len() as i64));
    if let (Some(first), Some(last)) = (entry_ids.first(), entry_ids.last()) {
        root.set("First", Object::Reference(*first));
        root.set("Last", Object::Reference(*last));
    }
    root
}

fn attach_to_catalog(document: &mut Document, root_id: ObjectId) -> Result<(), BookmarkError> {
    let catalog_id = document
        .trailer
        .get(b"Root")
        .and_then(Object::as_reference)
        .map_err(|_| BookmarkError::NoCatalog)?;
    let catalog = document
        .objects
        .get_mut(&catalog_id)
        .ok_or(BookmarkError::NoCatalog)?;
    match catalog {
        Object::Dictionary(dictionary) => {
            dictionary.set("Outlines", Object::Reference(root_id));
            dictionary.set("PageMode", Object::Name(b"UseOutlines".to_vec()));
            Ok(())
        }
        _ => Err(BookmarkError::CatalogNotDictionary),
    }
}
