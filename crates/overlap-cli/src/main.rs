// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![allow(clippy::print_stdout)]
//! `overlap`: timed runs and strategy comparison for the circle overlap kernel.

mod cli;
mod config;
mod harness;
mod output;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command};
use crate::config::{ConfigService, FsConfigStore, RunPrefs, PREFS_KEY};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so `--json` output stays machine-readable.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    match &cli.command {
        Command::Run(args) => {
            let prefs = args.apply(load_prefs(&cli)?);
            let report = harness::run(&prefs)?;
            if args.scenario.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("{}", output::run_table(&report));
            }
        }
        Command::Compare(args) => {
            let prefs = args.apply(load_prefs(&cli)?);
            let rows = harness::compare(&prefs)?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else {
                println!("{}", output::compare_table(&rows));
            }
        }
        Command::Features => println!("{}", output::features_table()),
    }
    Ok(())
}

/// Loads saved prefs, writing the defaults the first time none exist.
fn load_prefs(cli: &Cli) -> Result<RunPrefs> {
    let store = match &cli.config_dir {
        Some(dir) => FsConfigStore::at(dir).with_context(|| format!("opening {}", dir.display()))?,
        None => match FsConfigStore::new() {
            Ok(store) => store,
            // Without a config dir the run still proceeds on defaults.
            Err(err) => {
                warn!(%err, "no config directory; using default prefs");
                return Ok(RunPrefs::default());
            }
        },
    };
    let path = store.path_for(PREFS_KEY);
    let service = ConfigService::new(store);

    let saved = service
        .load::<RunPrefs>(PREFS_KEY)
        .with_context(|| format!("reading {}", path.display()))?;
    match saved {
        Some(prefs) => {
            debug!(path = %path.display(), "loaded run prefs");
            Ok(prefs)
        }
        None => {
            let prefs = RunPrefs::default();
            if let Err(err) = service.save(PREFS_KEY, &prefs) {
                warn!(%err, path = %path.display(), "could not persist default prefs");
            }
            Ok(prefs)
        }
    }
}
