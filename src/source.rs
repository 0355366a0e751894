//! Item sources feeding the code map
//!
//! The tree never parses source code itself. A source hands over the flat,
//! pre-extracted item list for the active file: a host closure, an external
//! mapper program, or a file holding mapper output.

use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Placeholder in mapper templates replaced by the source path
pub const FILE_PLACEHOLDER: &str = "{file}";

/// Raw items for one source file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MapInfo {
    pub source_file: PathBuf,
    pub items: Vec<String>,
}

impl MapInfo {
    pub fn new(source_file: impl Into<PathBuf>, items: Vec<String>) -> Self {
        Self {
            source_file: source_file.into(),
            items,
        }
    }

    /// Split mapper output into items, one per line
    pub fn from_output(source_file: impl Into<PathBuf>, output: &str) -> Self {
        let items = output
            .lines()
            .map(|line| line.trim_end_matches('\r').to_string())
            .collect();
        Self::new(source_file, items)
    }

    /// Nothing to build: no file or no items
    pub fn is_empty(&self) -> bool {
        self.source_file.as_os_str().is_empty() || self.items.is_empty()
    }
}

/// Supplier of map items, queried on every rebuild
pub trait ItemSource {
    /// Current items, `None` when there is no file to map
    fn aggregate_items(&mut self) -> Option<MapInfo>;

    /// The editor switched files; `None` when no editor is active
    fn set_active_file(&mut self, _path: Option<&Path>) {}
}

impl<F> ItemSource for F
where
    F: FnMut() -> Option<MapInfo>,
{
    fn aggregate_items(&mut self) -> Option<MapInfo> {
        self()
    }
}

/// Pre-extracted mapper output stored in a file
///
/// The items belong to one source file only; while another editor is active
/// the map stays empty.
#[derive(Debug, Clone)]
pub struct ItemsFile {
    mapped_file: PathBuf,
    active_file: Option<PathBuf>,
    items_path: PathBuf,
}

impl ItemsFile {
    pub fn new(source_file: impl Into<PathBuf>, items_path: impl Into<PathBuf>) -> Self {
        let mapped_file = source_file.into();
        Self {
            active_file: Some(mapped_file.clone()),
            mapped_file,
            items_path: items_path.into(),
        }
    }

    pub fn items_path(&self) -> &Path {
        &self.items_path
    }

    /// Source file the items were extracted from
    pub fn mapped_file(&self) -> &Path {
        &self.mapped_file
    }

    /// Read the items file
    ///
    /// Returns an empty map unless the mapped file is the active one.
    pub fn read(&self) -> Result<MapInfo> {
        if self.active_file.as_deref() != Some(self.mapped_file.as_path()) {
            tracing::debug!(
                "Active file {:?} has no items in {}",
                self.active_file,
                self.items_path.display()
            );
            return Ok(MapInfo::default());
        }
        let content = std::fs::read_to_string(&self.items_path)
            .with_context(|| format!("Failed to read items from {}", self.items_path.display()))?;
        Ok(MapInfo::from_output(self.mapped_file.clone(), &content))
    }
}

impl ItemSource for ItemsFile {
    fn aggregate_items(&mut self) -> Option<MapInfo> {
        match self.read() {
            Ok(info) if info.is_empty() => None,
            Ok(info) => Some(info),
            Err(e) => {
                tracing::warn!("{:#}", e);
                None
            }
        }
    }

    fn set_active_file(&mut self, path: Option<&Path>) {
        self.active_file = path.map(Path::to_path_buf);
    }
}

/// External mapper program producing items on stdout
///
/// The template is split on whitespace; `{file}` is replaced by the source
/// path, or the path is appended when the template has no placeholder.
#[derive(Debug, Clone)]
pub struct MapperCommand {
    template: String,
    source_file: Option<PathBuf>,
}

impl MapperCommand {
    pub fn new(template: impl Into<String>, source_file: impl Into<PathBuf>) -> Self {
        Self {
            template: template.into(),
            source_file: Some(source_file.into()),
        }
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    /// Program and arguments for mapping `source_file`
    pub fn command_line(&self, source_file: &Path) -> Vec<String> {
        let path = source_file.display().to_string();
        let mut args: Vec<String> = self
            .template
            .split_whitespace()
            .map(|arg| arg.replace(FILE_PLACEHOLDER, &path))
            .collect();
        if !self.template.contains(FILE_PLACEHOLDER) {
            args.push(path);
        }
        args
    }

    /// Run the mapper for the active file
    pub fn run(&self) -> Result<MapInfo> {
        let Some(source_file) = &self.source_file else {
            return Ok(MapInfo::default());
        };

        let args = self.command_line(source_file);
        let Some((program, rest)) = args.split_first() else {
            bail!("Empty mapper command");
        };

        tracing::debug!("Running mapper: {}", args.join(" "));
        let output = Command::new(program)
            .args(rest)
            .output()
            .with_context(|| format!("Failed to run mapper {}", program))?;

        if !output.status.success() {
            bail!(
                "Mapper {} exited with {}: {}",
                program,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        Ok(MapInfo::from_output(
            source_file.clone(),
            &String::from_utf8_lossy(&output.stdout),
        ))
    }
}

impl ItemSource for MapperCommand {
    fn aggregate_items(&mut self) -> Option<MapInfo> {
        match self.run() {
            Ok(info) if info.is_empty() => None,
            Ok(info) => Some(info),
            Err(e) => {
                tracing::warn!("{:#}", e);
                None
            }
        }
    }

    fn set_active_file(&mut self, path: Option<&Path>) {
        self.source_file = path.map(Path::to_path_buf);
    }
}
