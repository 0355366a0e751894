//! Command types for the Elm-style architecture
//!
//! Commands represent side effects the host performs after an update.

use std::path::PathBuf;

use serde::Serialize;

use crate::outline::NodeId;

/// How the host should bring a revealed entry into view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RevealOptions {
    pub select: bool,
    pub focus: bool,
    pub expand: bool,
}

impl Default for RevealOptions {
    /// Select and expand without stealing focus from the editor
    fn default() -> Self {
        Self {
            select: true,
            focus: false,
            expand: true,
        }
    }
}

/// Side effects requested by the tree provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cmd {
    /// Scroll to and select an entry in the tree view
    Reveal {
        node: NodeId,
        options: RevealOptions,
    },
    /// Open `file` and move the cursor to the zero-based `line`
    NavigateTo { file: PathBuf, line: i64 },
}
