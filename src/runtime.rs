//! Standalone driver: build, print, and optionally follow a code map

use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;
use std::thread;
use std::time::Duration;

use crate::cli::{ItemsOrigin, StartupConfig};
use crate::fs_watcher::SourceWatcher;
use crate::messages::CodemapMsg;
use crate::outline::SortMode;
use crate::provider::TreeProvider;
use crate::source::{ItemSource, ItemsFile, MapInfo, MapperCommand};
use crate::view::{tree_to_json, TextTreeView};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Item source selected on the command line
enum CliSource {
    File(ItemsFile),
    Mapper(MapperCommand),
}

impl CliSource {
    fn new(origin: &ItemsOrigin, source: &Path) -> Self {
        match origin {
            ItemsOrigin::File(items) => CliSource::File(ItemsFile::new(source, items)),
            ItemsOrigin::Mapper(template) => {
                CliSource::Mapper(MapperCommand::new(template.clone(), source))
            }
        }
    }
}

impl ItemSource for CliSource {
    fn aggregate_items(&mut self) -> Option<MapInfo> {
        match self {
            CliSource::File(file) => file.aggregate_items(),
            CliSource::Mapper(mapper) => mapper.aggregate_items(),
        }
    }

    fn set_active_file(&mut self, path: Option<&Path>) {
        match self {
            CliSource::File(file) => file.set_active_file(path),
            CliSource::Mapper(mapper) => mapper.set_active_file(path),
        }
    }
}

/// Print the map once, then keep reprinting on saves in watch mode
pub fn run(startup: StartupConfig) -> Result<()> {
    let source = CliSource::new(&startup.origin, &startup.source);
    let icons = startup.config.icon_themes();
    let mut provider = TreeProvider::new(source, startup.config.clone(), icons);

    if startup.sort_mode != SortMode::Unset {
        provider.update(CodemapMsg::SetSortMode(startup.sort_mode));
    }

    print_map(&mut provider, &startup)?;

    if !startup.watch {
        return Ok(());
    }

    let mut watcher = SourceWatcher::new(&startup.source)
        .with_context(|| format!("Failed to watch {}", startup.source.display()))?;
    if let ItemsOrigin::File(items) = &startup.origin {
        watcher
            .watch_also(items)
            .with_context(|| format!("Failed to watch {}", items.display()))?;
    }

    let changes = provider.subscribe();
    tracing::info!("Watching for changes, press Ctrl-C to stop");

    loop {
        for msg in watcher.poll_events() {
            provider.update(msg);
        }

        if changes.try_iter().count() > 0 {
            print_map(&mut provider, &startup)?;
        }

        thread::sleep(POLL_INTERVAL);
    }
}

fn print_map(provider: &mut TreeProvider, startup: &StartupConfig) -> Result<()> {
    let output = if startup.json {
        provider.get_children(None);
        serde_json::to_string_pretty(&tree_to_json(provider.items()))
            .context("Failed to serialize code map")?
    } else {
        TextTreeView::new()
            .with_cursor_line(startup.cursor_line)
            .render(provider)
    };

    let mut stdout = std::io::stdout().lock();
    if startup.watch {
        writeln!(stdout, "── {} ──", startup.source.display())?;
    }
    write!(stdout, "{}", output)?;
    if startup.json {
        writeln!(stdout)?;
    }
    stdout.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CodemapConfig;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_cli_source_reads_items_file() {
        let dir = tempdir().unwrap();
        let items = dir.path().join("lib.map");
        fs::write(&items, "Top|1|class\n  inner|2|method\n").unwrap();

        let mut source = CliSource::new(&ItemsOrigin::File(items), Path::new("lib.rs"));
        let info = source.aggregate_items().unwrap();
        assert_eq!(info.items.len(), 2);

        source.set_active_file(None);
        assert!(source.aggregate_items().is_none());
    }

    #[test]
    fn test_run_prints_once_without_watch() {
        let dir = tempdir().unwrap();
        let items = dir.path().join("lib.map");
        fs::write(&items, "Top|1|class\n").unwrap();

        let startup = StartupConfig {
            source: dir.path().join("lib.rs"),
            origin: ItemsOrigin::File(items),
            cursor_line: Some(0),
            json: true,
            watch: false,
            sort_mode: SortMode::Ascending,
            config: CodemapConfig::default(),
        };
        assert!(run(startup).is_ok());
    }
}
