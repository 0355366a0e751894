//! Plain-text rendering of the code map
//!
//! [`TextTreeView`] is the tree view host used by the standalone binary. It
//! draws the forest with box-drawing guides, marks the entry revealed for
//! the cursor line, and honors each entry's collapsible state.

use std::collections::HashSet;

use serde_json::{json, Value};

use crate::commands::RevealOptions;
use crate::outline::{CollapsibleState, NodeId, OutlineTree};
use crate::provider::{TreeProvider, TreeViewHost};

const EXPANDED_MARK: &str = "▾ ";
const COLLAPSED_MARK: &str = "▸ ";
const REVEALED_MARK: &str = "> ";
const PLAIN_MARK: &str = "  ";

/// Terminal tree view
#[derive(Debug, Default)]
pub struct TextTreeView {
    cursor_line: Option<i64>,
    revealed: Option<(NodeId, RevealOptions)>,
}

impl TreeViewHost for TextTreeView {
    fn reveal(&mut self, node: NodeId, options: RevealOptions) {
        self.revealed = Some((node, options));
    }
}

impl TextTreeView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Zero-based cursor line to reveal on every render
    pub fn with_cursor_line(mut self, line: Option<i64>) -> Self {
        self.cursor_line = line;
        self
    }

    /// Entry selected by the last reveal
    pub fn revealed(&self) -> Option<NodeId> {
        self.revealed.map(|(node, _)| node)
    }

    /// Rebuild the map through `provider` and draw it
    pub fn render(&mut self, provider: &mut TreeProvider) -> String {
        let roots = provider.get_children(None);

        self.revealed = None;
        if let Some(line) = self.cursor_line {
            provider.reveal_node_at_line(self, line);
        }

        // Ancestors of an expanded reveal are opened regardless of state
        let mut forced_open = HashSet::new();
        if let Some((node, options)) = self.revealed {
            if options.expand {
                forced_open.insert(node);
            }
            let mut current = provider.get_parent(node);
            while let Some(parent) = current {
                forced_open.insert(parent);
                current = provider.get_parent(parent);
            }
        }

        let mut out = String::new();
        let mut guides = Vec::new();
        for (i, &root) in roots.iter().enumerate() {
            let is_last = i + 1 == roots.len();
            self.render_node(provider, root, 0, is_last, &mut guides, &forced_open, &mut out);
        }
        out
    }

    #[allow(clippy::too_many_arguments)]
    fn render_node(
        &self,
        provider: &mut TreeProvider,
        node: NodeId,
        level: usize,
        is_last: bool,
        guides: &mut Vec<bool>,
        forced_open: &HashSet<NodeId>,
        out: &mut String,
    ) {
        let Some(item) = provider.get_tree_item(node) else {
            return;
        };

        let open = match item.collapsible_state {
            CollapsibleState::None => false,
            CollapsibleState::Expanded => true,
            CollapsibleState::Collapsed => forced_open.contains(&node),
        };

        let marker = if self.revealed() == Some(node) {
            REVEALED_MARK
        } else {
            PLAIN_MARK
        };
        let expander = match item.collapsible_state {
            CollapsibleState::None => "",
            _ if open => EXPANDED_MARK,
            _ => COLLAPSED_MARK,
        };

        out.push_str(marker);
        out.push_str(&tree_prefix(level, is_last, guides));
        out.push_str(expander);
        out.push_str(&item.label);
        if let Some(target) = &item.command {
            out.push_str(&format!("  :{}", target.line + 1));
        }
        out.push('\n');

        if !open {
            return;
        }

        let children = provider.get_children(Some(node));
        if level > 0 {
            guides.push(!is_last);
        }
        for (i, &child) in children.iter().enumerate() {
            let child_is_last = i + 1 == children.len();
            self.render_node(provider, child, level + 1, child_is_last, guides, forced_open, out);
        }
        if level > 0 {
            guides.pop();
        }
    }
}

fn tree_prefix(level: usize, is_last: bool, guides: &[bool]) -> String {
    if level == 0 {
        return String::new();
    }

    let mut prefix = String::new();
    for i in 0..level - 1 {
        if guides.get(i).copied().unwrap_or(false) {
            prefix.push_str("│   ");
        } else {
            prefix.push_str("    ");
        }
    }

    if is_last {
        prefix.push_str("└── ");
    } else {
        prefix.push_str("├── ");
    }
    prefix
}

/// The whole forest as nested JSON objects
pub fn tree_to_json(tree: &OutlineTree) -> Value {
    Value::Array(
        tree.roots()
            .iter()
            .map(|&root| node_to_json(tree, root))
            .collect(),
    )
}

fn node_to_json(tree: &OutlineTree, id: NodeId) -> Value {
    let node = &tree[id];
    let children: Vec<Value> = node
        .children()
        .iter()
        .map(|&child| node_to_json(tree, child))
        .collect();

    json!({
        "title": node.title,
        "label": node.label,
        "nestingLevel": node.nesting_level,
        "lineNumber": node.line_number,
        "sourceFile": node.source_file,
        "icon": node.icon,
        "collapsibleState": node.collapsible_state(),
        "context": node.context,
        "children": children,
    })
}
