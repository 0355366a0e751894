//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use std::path::Path;

use codemap::outline::{build, BuildOptions, IconThemes, NodeId, OutlineTree, SortMode};
use codemap::source::MapInfo;
use codemap::{CodemapConfig, TreeProvider};

pub const SOURCE: &str = "src/lib.rs";

/// Build a forest in tree mode with default options
pub fn build_tree(items: &[&str]) -> OutlineTree {
    build_with(items, &BuildOptions::default(), SortMode::Unset)
}

pub fn build_with(items: &[&str], options: &BuildOptions, sort: SortMode) -> OutlineTree {
    build(items, Path::new(SOURCE), options, sort, &IconThemes::default())
}

/// Titles of the given nodes, in order
pub fn titles(tree: &OutlineTree, ids: &[NodeId]) -> Vec<String> {
    ids.iter().map(|id| tree[*id].title.clone()).collect()
}

/// Provider over a fixed item list
pub fn provider_for(items: &[&str], config: CodemapConfig) -> TreeProvider {
    let items: Vec<String> = items.iter().map(|s| s.to_string()).collect();
    TreeProvider::new(
        move || Some(MapInfo::new(SOURCE, items.clone())),
        config,
        IconThemes::default(),
    )
}

/// A typical mapper output for a small module
pub fn sample_items() -> Vec<&'static str> {
    vec![
        "Parser|3|class",
        "  new|5|method",
        "  parse|12|method",
        "    parse_header|20|function",
        "    parse_body|31|function",
        "Imports",
        "  std::io|1|module",
        "main|40|function",
    ]
}
