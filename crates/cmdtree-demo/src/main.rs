//! `cmdtree`: manage configuration targets from the command line.
//!
//! Global options are parsed here; everything after them goes verbatim to the
//! command tree in [`commands`].

mod commands;
mod logging;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{anyhow, Context};
use clap::{ArgAction, Parser};
use cmdtree_config::{ConfigFile, ConfigTarget};

use crate::commands::Session;

#[derive(Debug, Parser)]
#[command(name = "cmdtree", version, about = "Manage named configuration targets")]
struct Cli {
    /// Path to the config file
    #[arg(short, long, value_name = "PATH", default_value = "cmdtree.yaml")]
    config: PathBuf,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Command and its arguments
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_name = "COMMAND")]
    args: Vec<String>,
}

fn default_target() -> ConfigTarget {
    let mut target = ConfigTarget::new();
    target.set(cmdtree_config::TYPE_KEY, "localDisk");
    target
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = ConfigFile::open(&cli.config, default_target())
        .with_context(|| format!("failed to open {}", cli.config.display()))?;

    let session = Session::shared(config);
    let tree = commands::build(Arc::clone(&session));
    let output = tree.dispatch(&cli.args)?;
    if !output.is_empty() {
        println!("{}", output);
    }

    let session = session
        .lock()
        .map_err(|_| anyhow!("config session is unusable after a failed command"))?;
    if session.is_dirty() {
        session
            .config()
            .persist(&cli.config)
            .with_context(|| format!("failed to write {}", cli.config.display()))?;
        tracing::info!(path = %cli.config.display(), "saved config");
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}
