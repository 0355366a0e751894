//! Code map outline tree
//!
//! Holds the forest built from a mapper's flat item list. Nodes live in an
//! arena and refer to each other by [`NodeId`], so parent links stay cheap and
//! a whole forest can be swapped out on every rebuild.

mod build;
mod icons;
mod parse;

pub use build::{build, BuildOptions};
pub use icons::{IconRef, IconThemes};
pub use parse::{decode_title, indent_width, parse_item, LevelUnit, ParsedItem};

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::ops::Index;
use std::path::PathBuf;

/// Index of a node inside an [`OutlineTree`]
///
/// Ids are only meaningful for the tree that produced them; a rebuild
/// invalidates every id handed out before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(usize);

impl NodeId {
    /// Position of the node in the arena
    pub fn index(self) -> usize {
        self.0
    }
}

/// Expansion state reported to the tree view host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CollapsibleState {
    /// Leaf, nothing to expand
    None,
    Collapsed,
    Expanded,
}

/// Sibling ordering requested by the user
///
/// `Unset` is the state after every active-editor change. It sorts like
/// `Ascending` when sorting is enabled in the configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortMode {
    #[default]
    Unset,
    /// Keep the mapper's order
    ByLocation,
    Ascending,
    Descending,
}

impl SortMode {
    /// Compare two titles case-insensitively in this direction
    pub fn compare_titles(self, a: &str, b: &str) -> Ordering {
        match self {
            SortMode::Unset | SortMode::Ascending => compare_titles_ascending(a, b),
            SortMode::Descending => compare_titles_ascending(b, a),
            SortMode::ByLocation => Ordering::Equal,
        }
    }
}

fn compare_titles_ascending(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_uppercase)
        .cmp(b.chars().flat_map(char::to_uppercase))
}

/// A single entry of the code map
#[derive(Debug, Clone, PartialEq)]
pub struct MapNode {
    /// Display text with `%pipe%` decoded
    pub title: String,
    /// Text handed to the host; carries the level prefix in plain-text mode
    pub label: String,
    /// Depth in the tree (0 for roots)
    pub nesting_level: usize,
    /// Zero-based source line, `-1` when the entry is not navigable
    pub line_number: i64,
    /// File the entry points into; `None` for structural labels
    pub source_file: Option<PathBuf>,
    pub icon: IconRef,
    /// Stored expand/collapse flag, see [`MapNode::collapsible_state`]
    pub state: CollapsibleState,
    /// Host-side identity, `<file>|<line>`
    pub context: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl MapNode {
    pub(crate) fn new(
        title: String,
        label: String,
        nesting_level: usize,
        line_number: i64,
        source_file: Option<PathBuf>,
        icon: IconRef,
        state: CollapsibleState,
    ) -> Self {
        let context = format!(
            "{}|{}",
            source_file
                .as_deref()
                .map(|path| path.display().to_string())
                .unwrap_or_default(),
            line_number
        );
        Self {
            title,
            label,
            nesting_level,
            line_number,
            source_file,
            icon,
            state,
            context,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Effective state for the host: leaves never show an expander
    pub fn collapsible_state(&self) -> CollapsibleState {
        if self.children.is_empty() {
            CollapsibleState::None
        } else {
            self.state
        }
    }

    /// Whether clicking the entry should jump into the source
    pub fn is_navigable(&self) -> bool {
        self.line_number != -1 && self.source_file.is_some()
    }
}

/// Forest of [`MapNode`]s produced by one build
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OutlineTree {
    nodes: Vec<MapNode>,
    roots: Vec<NodeId>,
}

impl OutlineTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Total number of nodes, roots and descendants
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: NodeId) -> Option<&MapNode> {
        self.nodes.get(id.0)
    }

    /// Iterate over every node in creation order
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &MapNode)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(index, node)| (NodeId(index), node))
    }

    pub(crate) fn insert(&mut self, node: MapNode) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    pub(crate) fn push_root(&mut self, id: NodeId) {
        self.roots.push(id);
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut MapNode {
        &mut self.nodes[id.0]
    }

    /// Attach `child` under `parent`
    ///
    /// With a sort mode the child is inserted after every sibling that does
    /// not compare greater, which keeps the children ordered exactly as a
    /// stable re-sort after each insertion would.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId, sort: Option<SortMode>) {
        let position = match sort {
            Some(mode) => {
                let title = &self.nodes[child.0].title;
                self.nodes[parent.0].children.partition_point(|sibling| {
                    mode.compare_titles(&self.nodes[sibling.0].title, title) != Ordering::Greater
                })
            }
            None => self.nodes[parent.0].children.len(),
        };

        let nesting_level = self.nodes[parent.0].nesting_level + 1;
        let node = &mut self.nodes[child.0];
        node.parent = Some(parent);
        node.nesting_level = nesting_level;

        self.nodes[parent.0].children.insert(position, child);
    }

    pub(crate) fn sort_roots(&mut self, mode: SortMode) {
        let mut roots = std::mem::take(&mut self.roots);
        roots.sort_by(|a, b| self.compare_by_title(*a, *b, mode));
        self.roots = roots;
    }

    pub fn compare_by_title(&self, a: NodeId, b: NodeId, mode: SortMode) -> Ordering {
        mode.compare_titles(&self[a].title, &self[b].title)
    }

    pub fn compare_by_line_number(&self, a: NodeId, b: NodeId) -> Ordering {
        self[a].line_number.cmp(&self[b].line_number)
    }

    /// Depth-first pre-order of every descendant of `id`, not `id` itself
    pub fn collect_descendants(&self, id: NodeId, acc: &mut Vec<NodeId>) {
        for &child in &self[id].children {
            acc.push(child);
            self.collect_descendants(child, acc);
        }
    }

    /// Every node reachable from the roots, depth-first pre-order
    pub fn flatten(&self) -> Vec<NodeId> {
        let mut all = Vec::with_capacity(self.nodes.len());
        for &root in &self.roots {
            all.push(root);
            self.collect_descendants(root, &mut all);
        }
        all
    }

    /// The node whose source line most closely precedes or equals `line`
    ///
    /// Falls back to the first node in line order when every node starts
    /// after `line`. `None` only for an empty forest.
    pub fn find_at_or_before_line(&self, line: i64) -> Option<NodeId> {
        let mut all = self.flatten();
        all.sort_by(|a, b| self.compare_by_line_number(*a, *b));

        let mut result = all.first().copied();
        for id in all {
            if self[id].line_number > line {
                break;
            }
            result = Some(id);
        }
        result
    }
}

impl Index<NodeId> for OutlineTree {
    type Output = MapNode;

    fn index(&self, id: NodeId) -> &MapNode {
        &self.nodes[id.0]
    }
}
