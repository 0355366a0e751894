//! Benchmarks for code map rebuilds
//!
//! A rebuild happens on every refresh, so these cover the paths a save or
//! cursor move goes through:
//! - build() in tree, sorted and plain-text modes
//! - find_at_or_before_line over a built forest
//!
//! Run with: cargo bench build

use std::path::Path;

use codemap::outline::{build, BuildOptions, IconThemes, OutlineTree, SortMode};

#[global_allocator]
static ALLOC: divan::AllocProfiler = divan::AllocProfiler::system();

fn main() {
    divan::main();
}

/// Mapper output for `classes` classes with methods and nested helpers
fn make_items(classes: usize) -> Vec<String> {
    let mut items = Vec::with_capacity(classes * 6);
    let mut line = 1;
    for c in 0..classes {
        items.push(format!("Class{c}|{line}|class"));
        line += 2;
        for m in 0..4 {
            items.push(format!("  method_{m}|{line}|method"));
            line += 5;
            items.push(format!("    helper_{m}|{line}|function"));
            line += 3;
        }
    }
    items
}

fn build_tree(items: &[String], options: &BuildOptions, sort: SortMode) -> OutlineTree {
    build(
        items,
        Path::new("bench.rs"),
        options,
        sort,
        &IconThemes::default(),
    )
}

// ============================================================================
// Benchmarks: build
// ============================================================================

#[divan::bench(args = [100, 1_000, 10_000])]
fn build_tree_mode(bencher: divan::Bencher, classes: usize) {
    let items = make_items(classes);
    let options = BuildOptions::default();

    bencher.bench(|| build_tree(divan::black_box(&items), &options, SortMode::Unset));
}

#[divan::bench(args = [100, 1_000, 10_000])]
fn build_sorted(bencher: divan::Bencher, classes: usize) {
    let items = make_items(classes);
    let options = BuildOptions {
        sorting_enabled: true,
        ..BuildOptions::default()
    };

    bencher.bench(|| build_tree(divan::black_box(&items), &options, SortMode::Descending));
}

#[divan::bench(args = [100, 1_000, 10_000])]
fn build_text_mode(bencher: divan::Bencher, classes: usize) {
    let items = make_items(classes);
    let options = BuildOptions {
        text_mode: true,
        ..BuildOptions::default()
    };

    bencher.bench(|| build_tree(divan::black_box(&items), &options, SortMode::Unset));
}

// ============================================================================
// Benchmarks: cursor lookup
// ============================================================================

#[divan::bench(args = [100, 1_000, 10_000])]
fn find_at_or_before_line(bencher: divan::Bencher, classes: usize) {
    let items = make_items(classes);
    let tree = build_tree(&items, &BuildOptions::default(), SortMode::Unset);
    let middle = (classes * 34 / 2) as i64;

    bencher.bench(|| tree.find_at_or_before_line(divan::black_box(middle)));
}
