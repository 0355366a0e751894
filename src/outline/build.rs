//! Flat item list to outline forest
//!
//! Single pass over the mapper output. Nesting comes purely from
//! indentation: the first indented item fixes the width of one level, and
//! an open-path table remembers the most recent node per level so every
//! item finds its parent without backtracking.

use std::path::Path;

use super::parse::{decode_title, parse_item, LevelUnit, ParsedItem};
use super::{CollapsibleState, IconRef, IconThemes, MapNode, NodeId, OutlineTree, SortMode};
use crate::config::{config_value, keys, ConfigProvider};

/// Options read from the configuration on every rebuild
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOptions {
    /// Flat list with simulated indentation instead of a real tree
    pub text_mode: bool,
    /// Items nested deeper than this are dropped
    pub max_nesting_level: usize,
    /// Per-level filler for plain-text labels
    pub text_mode_level_prefix: String,
    /// Initial state of nodes with children
    pub text_mode_expanded: bool,
    /// Order siblings by title (tree mode only)
    pub sorting_enabled: bool,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            text_mode: false,
            max_nesting_level: 10,
            // U+00A0 survives the whitespace collapsing of tree renderers
            text_mode_level_prefix: "\u{a0}\u{a0}".to_string(),
            text_mode_expanded: true,
            sorting_enabled: false,
        }
    }
}

impl BuildOptions {
    /// Read every option from a host configuration, defaulting missing keys
    pub fn from_provider(provider: &dyn ConfigProvider) -> Self {
        let defaults = Self::default();
        Self {
            text_mode: config_value(provider, keys::TEXT_MODE, defaults.text_mode),
            max_nesting_level: config_value(
                provider,
                keys::MAX_NESTING_LEVEL,
                defaults.max_nesting_level,
            ),
            text_mode_level_prefix: config_value(
                provider,
                keys::TEXT_MODE_LEVEL_PREFIX,
                defaults.text_mode_level_prefix,
            ),
            text_mode_expanded: config_value(
                provider,
                keys::TEXT_MODE_EXPANDED,
                defaults.text_mode_expanded,
            ),
            sorting_enabled: config_value(
                provider,
                keys::SORTING_ENABLED,
                defaults.sorting_enabled,
            ),
        }
    }

    fn initial_state(&self) -> CollapsibleState {
        if self.text_mode {
            CollapsibleState::None
        } else if self.text_mode_expanded {
            CollapsibleState::Expanded
        } else {
            CollapsibleState::Collapsed
        }
    }

    /// Sort mode to apply while building, `None` keeps source order
    fn sorting(&self, mode: SortMode) -> Option<SortMode> {
        (self.sorting_enabled && !self.text_mode).then_some(mode)
    }
}

/// Build the outline forest for `source_file` from raw mapper items
pub fn build<S: AsRef<str>>(
    items: &[S],
    source_file: &Path,
    options: &BuildOptions,
    sort: SortMode,
    icons: &IconThemes,
) -> OutlineTree {
    let mut tree = OutlineTree::new();
    let mut unit = LevelUnit::default();
    // Most recent node per computed level
    let mut open_path: Vec<Option<NodeId>> = Vec::new();
    let sorting = options.sorting(sort);
    let mut skipped = 0usize;

    for item in items.iter().map(AsRef::as_ref) {
        if item.is_empty() {
            continue;
        }

        let parsed = parse_item(item);
        let level = unit.level_of(parsed.indent);
        if level > options.max_nesting_level {
            skipped += 1;
            continue;
        }

        let id = tree.insert(make_node(&parsed, level, source_file, options, icons));

        if options.text_mode {
            tree.push_root(id);
        } else {
            place(&mut tree, &open_path, id, level, sorting);
        }

        if open_path.len() <= level {
            open_path.resize(level + 1, None);
        }
        open_path[level] = Some(id);
    }

    if let Some(mode) = sorting {
        tree.sort_roots(mode);
    }

    tracing::debug!(
        "Built code map for {}: {} nodes, {} roots, {} items beyond level {}",
        source_file.display(),
        tree.len(),
        tree.roots().len(),
        skipped,
        options.max_nesting_level
    );

    tree
}

fn make_node(
    parsed: &ParsedItem<'_>,
    level: usize,
    source_file: &Path,
    options: &BuildOptions,
    icons: &IconThemes,
) -> MapNode {
    let title = decode_title(parsed.title, !options.text_mode);
    let label = if options.text_mode {
        format!("{}{}", options.text_mode_level_prefix.repeat(level), title)
    } else {
        title.clone()
    };

    MapNode::new(
        title,
        label,
        level,
        parsed.line_number.unwrap_or(0),
        parsed.line_number.map(|_| source_file.to_path_buf()),
        IconRef::resolve(parsed.icon, icons),
        options.initial_state(),
    )
}

fn place(
    tree: &mut OutlineTree,
    open_path: &[Option<NodeId>],
    id: NodeId,
    level: usize,
    sorting: Option<SortMode>,
) {
    if level == 0 {
        tree.push_root(id);
        return;
    }

    if let Some(parent) = open_path.get(level - 1).copied().flatten() {
        tree.add_child(parent, id, sorting);
        return;
    }

    // Input skipped a level: hang the node under the nearest shallower entry
    let fallback = open_path[..open_path.len().min(level - 1)]
        .iter()
        .rev()
        .find_map(|entry| *entry);

    match fallback {
        Some(parent) => {
            tracing::warn!(
                "No parent at level {} for {:?}; attaching under {:?}",
                level - 1,
                tree[id].title,
                tree[parent].title
            );
            tree.add_child(parent, id, sorting);
        }
        None => {
            tracing::warn!(
                "No parent for {:?} at level {}; keeping it as a root",
                tree[id].title,
                level
            );
            tree.node_mut(id).nesting_level = 0;
            tree.push_root(id);
        }
    }
}
