// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Link annotation removal. Open an unrestricted PDF with `lopdf`, filter
// every page's /Annots array, and serialise the result.

use std::collections::HashSet;
use std::path::Path;

use lopdf::{Document, Object, ObjectId};
use pdfsweep_core::error::StripError;
use tracing::{debug, info, instrument, warn};

use crate::traits::LinkStripper;

/// [`LinkStripper`] backed by `lopdf`.
///
/// The whole document is parsed into memory, so the source file handle is
/// closed as soon as loading finishes.
#[derive(Debug, Clone, Copy, Default)]
pub struct LopdfLinkStripper;

impl LopdfLinkStripper {
    pub fn new() -> Self {
        Self
    }
}

impl LinkStripper for LopdfLinkStripper {
    #[instrument(skip_all, fields(input = %input.display(), output = %output.display()))]
    fn strip_links(&self, input: &Path, output: &Path) -> Result<usize, StripError> {
        let mut document = load(input)?;
        let removed = remove_link_annotations(&mut document)?;

        let saved = document.save(output).and_then(|file| {
            // Flush to disk before the caller renames over the original.
            file.sync_all()
        });
        drop(document);

        if let Err(err) = saved {
            if let Err(cleanup) = std::fs::remove_file(output) {
                if cleanup.kind() != std::io::ErrorKind::NotFound {
                    warn!(error = %cleanup, "could not remove partial output");
                }
            }
            return Err(StripError::Save {
                path: output.to_path_buf(),
                detail: err.to_string(),
            });
        }

        info!(removed, "link annotations stripped");
        Ok(removed)
    }
}

// -- Inspection ---------------------------------------------------------------

/// Count link annotations in the PDF at `path` without modifying it.
#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn count_link_annotations(path: impl AsRef<Path>) -> Result<usize, StripError> {
    let document = load(path.as_ref())?;
    Ok(count_links(&document))
}

/// Count link annotations across every page of an in-memory document.
pub fn count_links(document: &Document) -> usize {
    document
        .get_pages()
        .into_iter()
        .filter_map(|(page_number, page_id)| page_annotations(document, page_number, page_id).ok())
        .flatten()
        .map(|(_, entries)| {
            entries
                .iter()
                .filter(|entry| is_link_annotation(document, entry))
                .count()
        })
        .sum()
}

// -- Removal ------------------------------------------------------------------

/// Drop every `/Subtype /Link` annotation from every page of `document`.
///
/// Returns the number removed. Link objects that were only reachable through
/// a page's /Annots are also deleted from the object table. Ones still
/// referenced from elsewhere (structure tree, trailer) stay.
pub fn remove_link_annotations(document: &mut Document) -> Result<usize, StripError> {
    let pages = document.get_pages();
    let mut removed = 0;
    let mut orphaned: Vec<ObjectId> = Vec::new();

    for (page_number, page_id) in pages {
        let Some((array_id, entries)) = page_annotations(document, page_number, page_id)? else {
            continue;
        };

        let before = entries.len();
        let mut kept = Vec::with_capacity(before);
        for entry in entries {
            if is_link_annotation(document, &entry) {
                if let Object::Reference(id) = entry {
                    orphaned.push(id);
                }
            } else {
                kept.push(entry);
            }
        }

        let dropped = before - kept.len();
        if dropped == 0 {
            continue;
        }
        debug!(page_number, dropped, "removing link annotations");
        removed += dropped;

        match array_id {
            // Shared /Annots array object: rewrite it in place.
            Some(id) => {
                if let Ok(object) = document.get_object_mut(id) {
                    *object = Object::Array(kept);
                }
            }
            None => {
                if let Ok(Object::Dictionary(page)) = document.get_object_mut(page_id) {
                    page.set("Annots", Object::Array(kept));
                }
            }
        }
    }

    let orphaned: HashSet<ObjectId> = orphaned.into_iter().collect();
    let mut referenced = HashSet::new();
    for (id, object) in &document.objects {
        if !orphaned.contains(id) {
            collect_references(object, &mut referenced);
        }
    }
    for (_, value) in document.trailer.iter() {
        collect_references(value, &mut referenced);
    }

    for id in orphaned.difference(&referenced) {
        document.objects.remove(id);
    }

    Ok(removed)
}

// -- Helpers ------------------------------------------------------------------

fn load(path: &Path) -> Result<Document, StripError> {
    let document = Document::load(path).map_err(|err| StripError::Load {
        path: path.to_path_buf(),
        detail: err.to_string(),
    })?;
    debug!(pages = document.get_pages().len(), "PDF loaded");
    Ok(document)
}

/// The page's /Annots entries, plus the id of the array object when /Annots
/// is an indirect reference. `None` when the page has no annotations.
fn page_annotations(
    document: &Document,
    page_number: u32,
    page_id: ObjectId,
) -> Result<Option<(Option<ObjectId>, Vec<Object>)>, StripError> {
    let page = match document.get_object(page_id) {
        Ok(Object::Dictionary(dict)) => dict,
        Ok(_) => {
            return Err(StripError::Malformed {
                page: page_number,
                detail: "page object is not a dictionary".into(),
            });
        }
        Err(err) => {
            return Err(StripError::Malformed {
                page: page_number,
                detail: format!("cannot read page object {page_id:?}: {err}"),
            });
        }
    };

    let annots = match page.get(b"Annots") {
        Ok(annots) => annots,
        Err(_) => return Ok(None),
    };

    match annots {
        Object::Array(entries) => Ok(Some((None, entries.clone()))),
        Object::Reference(id) => match document.get_object(*id) {
            Ok(Object::Array(entries)) => Ok(Some((Some(*id), entries.clone()))),
            Ok(Object::Null) | Err(_) => Ok(None),
            Ok(_) => Err(StripError::Malformed {
                page: page_number,
                detail: format!("/Annots reference {id:?} is not an array"),
            }),
        },
        Object::Null => Ok(None),
        _ => Err(StripError::Malformed {
            page: page_number,
            detail: "/Annots is neither an array nor a reference".into(),
        }),
    }
}

/// Every indirect reference reachable inside `object` without following
/// references.
fn collect_references(object: &Object, into: &mut HashSet<ObjectId>) {
    match object {
        Object::Reference(id) => {
            into.insert(*id);
        }
        Object::Array(items) => {
            for item in items {
                collect_references(item, into);
            }
        }
        Object::Dictionary(dict) => {
            for (_, value) in dict.iter() {
                collect_references(value, into);
            }
        }
        Object::Stream(stream) => {
            for (_, value) in stream.dict.iter() {
                collect_references(value, into);
            }
        }
        _ => {}
    }
}

/// Whether an /Annots entry (direct or indirect) has `/Subtype /Link`.
fn is_link_annotation(document: &Document, entry: &Object) -> bool {
    let resolved = match entry {
        Object::Reference(id) => match document.get_object(*id) {
            Ok(object) => object,
            Err(_) => return false,
        },
        other => other,
    };
    match resolved {
        Object::Dictionary(dict) => {
            matches!(dict.get(b"Subtype"), Ok(Object::Name(name)) if name.as_slice() == b"Link")
        }
        _ => false,
    }
}
