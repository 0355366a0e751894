use anyhow::{anyhow, Result};
use clap::Parser;

use codemap::cli::CliArgs;
use codemap::config::CodemapConfig;

fn main() -> Result<()> {
    codemap::tracing::init();

    let args = CliArgs::parse();
    let startup = args
        .into_config(CodemapConfig::load())
        .map_err(|e| anyhow!(e))?;

    codemap::runtime::run(startup)
}
