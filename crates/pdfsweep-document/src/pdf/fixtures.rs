// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Synthetic PDF documents for tests and benchmarks.

use std::path::Path;

use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, dictionary};

/// Shape of one generated page.
#[derive(Debug, Clone, Copy, Default)]
pub struct PageSpec {
    /// `/Subtype /Link` annotations on the page.
    pub links: usize,
    /// `/Subtype /Text` annotations on the page.
    pub notes: usize,
    /// Store /Annots as an indirect array object instead of inline.
    pub indirect_annots: bool,
}

impl PageSpec {
    pub fn new(links: usize, notes: usize) -> Self {
        Self {
            links,
            notes,
            indirect_annots: false,
        }
    }

    pub fn with_indirect_annots(mut self) -> Self {
        self.indirect_annots = true;
        self
    }
}

/// Build a document with one page per spec.
pub fn build_document(pages: &[PageSpec]) -> lopdf::Result<Document> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
    for (index, spec) in pages.iter().enumerate() {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 24.into()]),
                Operation::new("Td", vec![72.into(), 720.into()]),
                Operation::new(
                    "Tj",
                    vec![Object::string_literal(format!("Page {}", index + 1))],
                ),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));

        let mut annots: Vec<Object> = Vec::with_capacity(spec.links + spec.notes);
        for n in 0..spec.links {
            let top = 700 - (n as i64) * 20;
            let id = doc.add_object(dictionary! {
                "Type" => "Annot",
                "Subtype" => "Link",
                "Rect" => vec![72.into(), (top - 14).into(), 300.into(), top.into()],
                "Border" => vec![0.into(), 0.into(), 0.into()],
                "A" => dictionary! {
                    "S" => "URI",
                    "URI" => Object::string_literal(format!("https://example.com/{index}/{n}")),
                },
            });
            annots.push(id.into());
        }
        for n in 0..spec.notes {
            let top = 300 - (n as i64) * 20;
            let id = doc.add_object(dictionary! {
                "Type" => "Annot",
                "Subtype" => "Text",
                "Rect" => vec![400.into(), (top - 14).into(), 420.into(), top.into()],
                "Contents" => Object::string_literal(format!("note {n}")),
            });
            annots.push(id.into());
        }

        let mut page = dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        };
        if !annots.is_empty() {
            if spec.indirect_annots {
                let array_id = doc.add_object(Object::Array(annots));
                page.set("Annots", array_id);
            } else {
                page.set("Annots", annots);
            }
        }
        kids.push(doc.add_object(page).into());
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => pages.len() as i64,
            "Resources" => resources_id,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    Ok(doc)
}

/// Build a document and save it to `path`.
pub fn write_fixture(path: impl AsRef<Path>, pages: &[PageSpec]) -> lopdf::Result<()> {
    let mut doc = build_document(pages)?;
    doc.save(path.as_ref())?;
    Ok(())
}

/// Count every annotation (of any subtype) across all pages.
pub fn count_annotations(document: &Document) -> usize {
    document
        .get_pages()
        .values()
        .filter_map(|page_id| match document.get_object(*page_id) {
            Ok(Object::Dictionary(page)) => page.get(b"Annots").ok().cloned(),
            _ => None,
        })
        .map(|annots| match annots {
            Object::Array(entries) => entries.len(),
            Object::Reference(id) => match document.get_object(id) {
                Ok(Object::Array(entries)) => entries.len(),
                _ => 0,
            },
            _ => 0,
        })
        .sum()
}
