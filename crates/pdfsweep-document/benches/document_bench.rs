// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for link stripping in the pdfsweep-document crate.
// Runs against a synthetic 50-page document so the numbers reflect annotation
// filtering and serialisation rather than parsing of real-world content.

use criterion::{Criterion, black_box, criterion_group, criterion_main};

use pdfsweep_document::pdf::fixtures::{self, PageSpec};
use pdfsweep_document::pdf::links::remove_link_annotations;
use pdfsweep_document::{LinkStripper, LopdfLinkStripper};

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

/// In-memory filtering only: 50 pages, each with 10 links and 2 notes.
fn bench_remove_in_memory(c: &mut Criterion) {
    let pages = vec![PageSpec::new(10, 2); 50];
    let document = fixtures::build_document(&pages).expect("build fixture");

    c.bench_function("remove_link_annotations (50 pages x 10 links)", |b| {
        b.iter(|| {
            let mut doc = document.clone();
            black_box(remove_link_annotations(black_box(&mut doc)).expect("strip"));
        });
    });
}

/// Full load, filter and save through the filesystem.
fn bench_strip_file(c: &mut Criterion) {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = dir.path().join("links.pdf");
    let output = dir.path().join("links.pdf.tmp");
    fixtures::write_fixture(&input, &vec![PageSpec::new(10, 2); 50]).expect("write fixture");
    let stripper = LopdfLinkStripper::new();

    c.bench_function("strip_links file round trip (50 pages)", |b| {
        b.iter(|| {
            black_box(stripper.strip_links(&input, &output).expect("strip"));
        });
    });
}

criterion_group!(benches, bench_remove_in_memory, bench_strip_file);
criterion_main!(benches);
