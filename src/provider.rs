//! Tree data provider for editor hosts
//!
//! Rebuilds the code map whenever the host asks for the root entries,
//! answers child/parent queries from the last built forest, and maps cursor
//! lines back to entries for synchronized navigation.

use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender};

use serde::Serialize;

use crate::commands::{Cmd, RevealOptions};
use crate::config::ConfigProvider;
use crate::messages::CodemapMsg;
use crate::outline::{
    build, BuildOptions, CollapsibleState, IconRef, IconThemes, NodeId, OutlineTree, SortMode,
};
use crate::source::ItemSource;

/// Notification that the host should fetch the tree again
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeChanged;

/// Tree view implemented by the host
pub trait TreeViewHost {
    /// Scroll to `node` and apply the reveal options
    fn reveal(&mut self, node: NodeId, options: RevealOptions);
}

/// Where clicking an entry jumps to
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavigateTarget {
    pub file: PathBuf,
    pub line: i64,
}

/// Everything the host needs to render one entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreeItem {
    pub id: NodeId,
    pub label: String,
    pub collapsible_state: CollapsibleState,
    pub icon: IconRef,
    pub context: String,
    /// `None` for entries that are not navigable
    pub command: Option<NavigateTarget>,
}

/// Code map provider bound to an item source and a configuration
pub struct TreeProvider {
    source: Box<dyn ItemSource>,
    config: Box<dyn ConfigProvider>,
    icons: IconThemes,
    items: OutlineTree,
    sort_mode: SortMode,
    revision: u64,
    listeners: Vec<Sender<TreeChanged>>,
}

impl TreeProvider {
    pub fn new(
        source: impl ItemSource + 'static,
        config: impl ConfigProvider + 'static,
        icons: IconThemes,
    ) -> Self {
        Self {
            source: Box::new(source),
            config: Box::new(config),
            icons,
            items: OutlineTree::default(),
            sort_mode: SortMode::default(),
            revision: 0,
            listeners: Vec::new(),
        }
    }

    /// Swap the configuration; takes effect on the next rebuild
    pub fn set_config(&mut self, config: impl ConfigProvider + 'static) {
        self.config = Box::new(config);
    }

    /// Forest from the last rebuild
    pub fn items(&self) -> &OutlineTree {
        &self.items
    }

    pub fn sort_mode(&self) -> SortMode {
        self.sort_mode
    }

    /// Number of rebuilds so far; ids from older revisions are stale
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Receive a [`TreeChanged`] on every refresh
    pub fn subscribe(&mut self) -> Receiver<TreeChanged> {
        let (tx, rx) = mpsc::channel();
        self.listeners.push(tx);
        rx
    }

    /// Roots (rebuilding first) when `node` is `None`, else its children
    pub fn get_children(&mut self, node: Option<NodeId>) -> Vec<NodeId> {
        match node {
            Some(id) => self
                .items
                .get(id)
                .map(|node| node.children().to_vec())
                .unwrap_or_default(),
            None => {
                self.rebuild();
                self.items.roots().to_vec()
            }
        }
    }

    pub fn get_parent(&self, node: NodeId) -> Option<NodeId> {
        self.items.get(node).and_then(|node| node.parent())
    }

    pub fn get_tree_item(&self, node: NodeId) -> Option<TreeItem> {
        let entry = self.items.get(node)?;
        let command = match &entry.source_file {
            Some(file) if entry.is_navigable() => Some(NavigateTarget {
                file: file.clone(),
                line: entry.line_number,
            }),
            _ => None,
        };

        Some(TreeItem {
            id: node,
            label: entry.label.clone(),
            collapsible_state: entry.collapsible_state(),
            icon: entry.icon.clone(),
            context: entry.context.clone(),
            command,
        })
    }

    /// Tell every subscriber to re-render
    ///
    /// Best effort: listeners that went away are dropped silently.
    pub fn refresh(&mut self) {
        self.listeners.retain(|tx| match tx.send(TreeChanged) {
            Ok(()) => true,
            Err(_) => {
                tracing::debug!("Dropping disconnected tree listener");
                false
            }
        });
    }

    /// Entry whose line most closely precedes or equals `line`
    pub fn find_node_at_or_before_line(&self, line: i64) -> Option<NodeId> {
        self.items.find_at_or_before_line(line)
    }

    /// Ask the host to select the entry for the cursor at `line`
    pub fn reveal_node_at_line(&self, host: &mut dyn TreeViewHost, line: i64) -> Option<NodeId> {
        let node = self.find_node_at_or_before_line(line)?;
        host.reveal(node, RevealOptions::default());
        Some(node)
    }

    /// Handle a host event
    pub fn update(&mut self, msg: CodemapMsg) -> Option<Cmd> {
        match msg {
            CodemapMsg::ActiveEditorChanged(path) => {
                tracing::debug!("Active editor changed: {:?}", path);
                self.sort_mode = SortMode::Unset;
                self.source.set_active_file(path.as_deref());
                self.refresh();
                None
            }

            CodemapMsg::DocumentSaved(path) => {
                tracing::debug!("Document saved: {}", path.display());
                self.refresh();
                None
            }

            CodemapMsg::Refresh => {
                self.refresh();
                None
            }

            CodemapMsg::SetSortMode(mode) => {
                self.sort_mode = mode;
                self.refresh();
                None
            }

            CodemapMsg::RevealLine(line) => {
                self.find_node_at_or_before_line(line)
                    .map(|node| Cmd::Reveal {
                        node,
                        options: RevealOptions::default(),
                    })
            }

            CodemapMsg::Activate(node) => {
                let target = self.get_tree_item(node)?.command?;
                Some(Cmd::NavigateTo {
                    file: target.file,
                    line: target.line,
                })
            }
        }
    }

    fn rebuild(&mut self) {
        self.revision += 1;

        let info = self
            .source
            .aggregate_items()
            .filter(|info| !info.is_empty());

        let Some(info) = info else {
            tracing::debug!("No items to map, clearing code map");
            self.items = OutlineTree::default();
            return;
        };

        let options = BuildOptions::from_provider(&*self.config);
        self.items = build(
            &info.items,
            &info.source_file,
            &options,
            self.sort_mode,
            &self.icons,
        );
    }
}
