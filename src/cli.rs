//! Command-line argument parsing for the code map
//!
//! Supports:
//! - Mapping a source file from a pre-extracted items file or a mapper program
//! - Revealing the entry at a cursor line
//! - Plain-text mode, sorting and nesting overrides
//! - JSON output and watch mode

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::config::CodemapConfig;
use crate::outline::SortMode;

/// Hierarchical code map of a source file
#[derive(Parser, Debug)]
#[command(
    name = "codemap",
    version,
    about = "Print the code map (symbol outline) of a source file"
)]
pub struct CliArgs {
    /// Source file the map entries point into
    #[arg(value_name = "SOURCE")]
    pub source: PathBuf,

    /// Read pre-extracted items from FILE instead of running a mapper
    #[arg(long, value_name = "FILE", conflicts_with = "mapper")]
    pub items: Option<PathBuf>,

    /// Mapper command template; `{file}` is replaced by SOURCE
    #[arg(long, value_name = "CMD")]
    pub mapper: Option<String>,

    /// Reveal the entry at line N (1-based)
    #[arg(long, value_name = "N")]
    pub line: Option<usize>,

    /// Flat list with simulated indentation
    #[arg(long)]
    pub text_mode: bool,

    /// Sort sibling entries
    #[arg(long, value_enum, value_name = "ORDER")]
    pub sort: Option<SortArg>,

    /// Drop entries nested deeper than N
    #[arg(long, value_name = "N")]
    pub max_nesting_level: Option<usize>,

    /// Print the tree as JSON
    #[arg(long)]
    pub json: bool,

    /// Reprint the map whenever the source or items file changes
    #[arg(short = 'w', long)]
    pub watch: bool,
}

/// Sort order accepted on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortArg {
    Asc,
    Desc,
    Location,
}

impl From<SortArg> for SortMode {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Asc => SortMode::Ascending,
            SortArg::Desc => SortMode::Descending,
            SortArg::Location => SortMode::ByLocation,
        }
    }
}

/// Where the map items come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemsOrigin {
    /// Pre-extracted items file
    File(PathBuf),
    /// Mapper command template
    Mapper(String),
}

/// Configuration derived from CLI arguments and the config file
#[derive(Debug, Clone)]
pub struct StartupConfig {
    pub source: PathBuf,
    pub origin: ItemsOrigin,
    /// Cursor line to reveal - 1-indexed from user, converted to 0-indexed
    pub cursor_line: Option<i64>,
    pub json: bool,
    pub watch: bool,
    pub sort_mode: SortMode,
    pub config: CodemapConfig,
}

impl CliArgs {
    /// Merge parsed CLI args over the loaded configuration
    ///
    /// Flags win over config values. A `--sort` flag also turns sorting on.
    pub fn into_config(self, mut config: CodemapConfig) -> Result<StartupConfig, String> {
        let origin = match (self.items, self.mapper.or_else(|| config.mapper.clone())) {
            (Some(items), _) => ItemsOrigin::File(items),
            (None, Some(mapper)) if !mapper.trim().is_empty() => ItemsOrigin::Mapper(mapper),
            _ => {
                return Err(
                    "No item source: pass --items FILE, --mapper CMD, or set `mapper` in the config"
                        .to_string(),
                )
            }
        };

        if self.text_mode {
            config.text_mode = true;
        }
        if let Some(level) = self.max_nesting_level {
            config.max_nesting_level = level;
        }

        let sort_mode = match self.sort {
            Some(arg) => {
                config.sorting_enabled = true;
                arg.into()
            }
            None => SortMode::Unset,
        };

        // Convert from 1-indexed (user input) to 0-indexed (internal)
        let cursor_line = self.line.map(|line| line.saturating_sub(1) as i64);

        Ok(StartupConfig {
            source: self.source,
            origin,
            cursor_line,
            json: self.json,
            watch: self.watch,
            sort_mode,
            config,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(source: &str) -> CliArgs {
        CliArgs {
            source: PathBuf::from(source),
            items: None,
            mapper: None,
            line: None,
            text_mode: false,
            sort: None,
            max_nesting_level: None,
            json: false,
            watch: false,
        }
    }

    #[test]
    fn test_missing_item_source_is_error() {
        let result = args("main.rs").into_config(CodemapConfig::default());
        assert!(result.is_err());
    }

    #[test]
    fn test_items_file_origin() {
        let args = CliArgs {
            items: Some(PathBuf::from("main.rs.map")),
            ..args("main.rs")
        };
        let config = args.into_config(CodemapConfig::default()).unwrap();
        assert_eq!(config.origin, ItemsOrigin::File(PathBuf::from("main.rs.map")));
        assert_eq!(config.source, PathBuf::from("main.rs"));
    }

    #[test]
    fn test_mapper_from_config() {
        let loaded = CodemapConfig {
            mapper: Some("outline {file}".to_string()),
            ..CodemapConfig::default()
        };
        let config = args("main.rs").into_config(loaded).unwrap();
        assert_eq!(config.origin, ItemsOrigin::Mapper("outline {file}".to_string()));
    }

    #[test]
    fn test_mapper_flag_overrides_config() {
        let loaded = CodemapConfig {
            mapper: Some("outline {file}".to_string()),
            ..CodemapConfig::default()
        };
        let args = CliArgs {
            mapper: Some("ctags-map".to_string()),
            ..args("main.rs")
        };
        let config = args.into_config(loaded).unwrap();
        assert_eq!(config.origin, ItemsOrigin::Mapper("ctags-map".to_string()));
    }

    #[test]
    fn test_line_conversion() {
        let args = CliArgs {
            items: Some(PathBuf::from("items")),
            line: Some(42),
            ..args("main.rs")
        };
        let config = args.into_config(CodemapConfig::default()).unwrap();
        // 1-indexed to 0-indexed: line 42 → 41
        assert_eq!(config.cursor_line, Some(41));
    }

    #[test]
    fn test_sort_flag_enables_sorting() {
        let args = CliArgs {
            items: Some(PathBuf::from("items")),
            sort: Some(SortArg::Desc),
            ..args("main.rs")
        };
        let config = args.into_config(CodemapConfig::default()).unwrap();
        assert_eq!(config.sort_mode, SortMode::Descending);
        assert!(config.config.sorting_enabled);
    }

    #[test]
    fn test_overrides_apply() {
        let args = CliArgs {
            items: Some(PathBuf::from("items")),
            text_mode: true,
            max_nesting_level: Some(2),
            ..args("main.rs")
        };
        let config = args.into_config(CodemapConfig::default()).unwrap();
        assert!(config.config.text_mode);
        assert_eq!(config.config.max_nesting_level, 2);
        assert_eq!(config.sort_mode, SortMode::Unset);
    }

    #[test]
    fn test_parse_from_command_line() {
        let args = CliArgs::try_parse_from([
            "codemap", "lib.rs", "--items", "lib.map", "--sort", "location", "--line", "3",
        ])
        .unwrap();
        assert_eq!(args.sort, Some(SortArg::Location));
        assert_eq!(args.line, Some(3));
    }

    #[test]
    fn test_items_conflicts_with_mapper() {
        let result = CliArgs::try_parse_from([
            "codemap", "lib.rs", "--items", "lib.map", "--mapper", "outline",
        ]);
        assert!(result.is_err());
    }
}
