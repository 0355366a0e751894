//! Code map - hierarchical symbol outline for editor sidebars
//!
//! Turns the flat, indentation-tagged item list produced by an external
//! mapper into an outline forest, and exposes it through [`TreeProvider`]
//! using the Elm Architecture pattern: host events arrive as
//! [`CodemapMsg`] and leave as [`Cmd`].

pub mod cli;
pub mod commands;
pub mod config;
pub mod config_paths;
pub mod fs_watcher;
pub mod messages;
pub mod outline;
pub mod provider;
pub mod runtime;
pub mod source;
pub mod tracing;
pub mod view;

// Re-export commonly used types
pub use commands::{Cmd, RevealOptions};
pub use config::{CodemapConfig, ConfigProvider};
pub use messages::CodemapMsg;
pub use outline::{build, BuildOptions, MapNode, NodeId, OutlineTree, SortMode};
pub use provider::{TreeChanged, TreeItem, TreeProvider, TreeViewHost};
pub use source::{ItemSource, ItemsFile, MapInfo, MapperCommand};
