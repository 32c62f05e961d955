// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Command-line surface.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use overlap_kernel::{Lanes, Sweep};

use crate::config::RunPrefs;

#[derive(Parser, Debug)]
#[command(name = "overlap")]
#[command(about = "Broad-phase circle overlap kernel: timed runs and strategy comparison")]
pub struct Cli {
    /// Directory holding `run_prefs.json` (defaults to the platform config dir)
    #[arg(long, global = true)]
    pub config_dir: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Time `advance` + `detect_overlaps` under one execution policy
    Run(RunArgs),
    /// Time every available lane strategy and sweep shape on the same scenario
    Compare(ScenarioArgs),
    /// Print detected CPU features and runnable lane strategies
    Features,
}

/// Flags shared by `run` and `compare`. Unset flags fall back to saved prefs.
#[derive(Args, Debug, Default)]
pub struct ScenarioArgs {
    /// Number of circles
    #[arg(long, short = 'n')]
    pub population: Option<usize>,
    /// Rounds of `advance` + `detect_overlaps`
    #[arg(long, short = 'i')]
    pub iterations: Option<usize>,
    /// PRNG seed for the population
    #[arg(long)]
    pub seed: Option<u64>,
    /// Threads per `detect_overlaps` call
    #[arg(long, short = 'w')]
    pub workers: Option<usize>,
    /// Emit JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug, Default)]
pub struct RunArgs {
    #[command(flatten)]
    pub scenario: ScenarioArgs,
    /// Lane strategy: auto, scalar, x4, x8, avx
    #[arg(long)]
    pub lanes: Option<Lanes>,
    /// Row coverage: full or triangle
    #[arg(long)]
    pub sweep: Option<Sweep>,
}

impl ScenarioArgs {
    /// Layers explicit flags over `prefs`.
    pub fn apply(&self, mut prefs: RunPrefs) -> RunPrefs {
        if let Some(population) = self.population {
            prefs.scenario.population = population;
        }
        if let Some(iterations) = self.iterations {
            prefs.iterations = iterations;
        }
        if let Some(seed) = self.seed {
            prefs.scenario.seed = seed;
        }
        if let Some(workers) = self.workers {
            prefs.policy.workers = workers;
        }
        prefs
    }
}

impl RunArgs {
    /// Layers explicit flags, including lanes and sweep, over `prefs`.
    pub fn apply(&self, prefs: RunPrefs) -> RunPrefs {
        let mut prefs = self.scenario.apply(prefs);
        if let Some(lanes) = self.lanes {
            prefs.policy.lanes = lanes;
        }
        if let Some(sweep) = self.sweep {
            prefs.policy.sweep = sweep;
        }
        prefs
    }
}
