//! Message types for the Elm-style architecture
//!
//! Host events reach the tree provider as messages; see
//! [`crate::provider::TreeProvider::update`].

use std::path::PathBuf;

use crate::outline::{NodeId, SortMode};

/// Events delivered to the tree provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodemapMsg {
    /// The active editor changed; `None` when no editor is open
    ActiveEditorChanged(Option<PathBuf>),
    /// A document was written to disk
    DocumentSaved(PathBuf),
    /// Explicit refresh command
    Refresh,
    /// User picked a sort order from the view title menu
    SetSortMode(SortMode),
    /// Editor cursor moved; select the entry at or before this zero-based line
    RevealLine(i64),
    /// User clicked an entry
    Activate(NodeId),
}
