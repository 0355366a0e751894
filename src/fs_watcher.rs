//! Source file watching for live code map updates
//!
//! Uses the `notify` crate with debouncing to detect saves of the mapped
//! file and turn them into [`CodemapMsg::DocumentSaved`] messages.

use notify_debouncer_mini::{new_debouncer, DebouncedEvent, DebouncedEventKind, Debouncer};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver};
use std::time::Duration;

use crate::messages::CodemapMsg;

/// Debounced watcher for a single source file
///
/// Watches the parent directory of each file non-recursively and filters
/// events down to the watched files.
pub struct SourceWatcher {
    debouncer: Debouncer<notify::RecommendedWatcher>,
    rx: Receiver<Result<Vec<DebouncedEvent>, notify::Error>>,
    /// Additional files whose changes also refresh the map (items files)
    watched: Vec<PathBuf>,
}

impl SourceWatcher {
    /// Start watching `source`
    ///
    /// Events are debounced with a 500ms delay to coalesce the bursts an
    /// editor produces while saving.
    pub fn new(source: &Path) -> Result<Self, notify::Error> {
        let (tx, rx) = mpsc::channel();
        let mut debouncer = new_debouncer(Duration::from_millis(500), tx)?;

        let source = absolute(source);
        let dir = watch_dir(&source);
        debouncer
            .watcher()
            .watch(&dir, notify::RecursiveMode::NonRecursive)?;

        tracing::info!("Watching {} for changes", source.display());

        Ok(Self {
            debouncer,
            rx,
            watched: vec![source],
        })
    }

    /// Also refresh when `path` changes
    pub fn watch_also(&mut self, path: &Path) -> Result<(), notify::Error> {
        let path = absolute(path);
        let dir = watch_dir(&path);
        if !self.watched.iter().any(|p| watch_dir(p) == dir) {
            self.debouncer
                .watcher()
                .watch(&dir, notify::RecursiveMode::NonRecursive)?;
        }
        self.watched.push(path);
        Ok(())
    }

    /// Files whose changes trigger a refresh
    pub fn watched(&self) -> &[PathBuf] {
        &self.watched
    }

    /// Poll for pending saves (non-blocking)
    ///
    /// Returns at most one message per watched file.
    pub fn poll_events(&self) -> Vec<CodemapMsg> {
        let mut saved: Vec<PathBuf> = Vec::new();

        while let Ok(result) = self.rx.try_recv() {
            match result {
                Ok(events) => {
                    for event in events {
                        if matches!(event.kind, DebouncedEventKind::AnyContinuous) {
                            continue;
                        }
                        if let Some(path) = self.matching(&event.path) {
                            if !saved.contains(&path) {
                                saved.push(path);
                            }
                        }
                    }
                }
                Err(e) => {
                    tracing::warn!("File watcher error: {:?}", e);
                }
            }
        }

        if !saved.is_empty() {
            tracing::debug!("File watcher detected {} saved files", saved.len());
        }

        saved.into_iter().map(CodemapMsg::DocumentSaved).collect()
    }

    /// Watched file matching an event path, ignoring unrelated siblings
    fn matching(&self, path: &Path) -> Option<PathBuf> {
        self.watched
            .iter()
            .find(|watched| {
                watched.as_path() == path
                    || (watched.file_name() == path.file_name()
                        && watched.parent().map(canonical) == path.parent().map(canonical))
            })
            .cloned()
    }
}

fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

fn canonical(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}

fn watch_dir(path: &Path) -> PathBuf {
    path.parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."))
}
