// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Timed runs over a seeded kernel.

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use overlap_kernel::{CollisionKernel, ExecPolicy, Lanes, Sweep};
use serde::Serialize;
use tracing::{info, warn};

use crate::config::RunPrefs;

/// Outcome of one timed run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// Resolved lane strategy (never `auto`).
    pub lanes: Lanes,
    /// Row coverage of the pair loop.
    pub sweep: Sweep,
    /// Threads per `detect_overlaps` call.
    pub workers: usize,
    /// Number of circles.
    pub population: usize,
    /// Timed `advance` + `detect_overlaps` rounds.
    pub iterations: usize,
    /// Wall time of the timed loop.
    pub seconds: f64,
    /// Unordered overlapping pairs after the final sweep.
    pub pairs: usize,
    /// Hex BLAKE3 digest of the final matrix.
    pub digest: String,
}

impl RunReport {
    /// Full sweeps per second (`0` when nothing ran).
    #[allow(clippy::cast_precision_loss)]
    pub fn sweeps_per_second(&self) -> f64 {
        if self.seconds > 0.0 {
            self.iterations as f64 / self.seconds
        } else {
            0.0
        }
    }

    /// Mean wall time of one `advance` + `detect_overlaps` round.
    #[allow(clippy::cast_precision_loss)]
    pub fn millis_per_tick(&self) -> f64 {
        if self.iterations == 0 {
            0.0
        } else {
            self.seconds * 1000.0 / self.iterations as f64
        }
    }
}

/// Builds a kernel from `prefs` and times `iterations` rounds of
/// `advance` then `detect_overlaps`.
pub fn run(prefs: &RunPrefs) -> Result<RunReport> {
    let mut kernel = CollisionKernel::with_policy(&prefs.scenario, prefs.policy)
        .with_context(|| format!("building kernel for {} circles", prefs.scenario.population))?;
    let policy = kernel.policy();

    let start = Instant::now();
    for _ in 0..prefs.iterations {
        kernel.advance();
        kernel.detect_overlaps();
    }
    let elapsed = start.elapsed();

    let report = report_for(&kernel, prefs.iterations, elapsed);
    info!(
        lanes = %policy.lanes,
        sweep = %policy.sweep,
        workers = policy.workers,
        seconds = report.seconds,
        pairs = report.pairs,
        "run finished"
    );
    Ok(report)
}

fn report_for(kernel: &CollisionKernel, iterations: usize, elapsed: Duration) -> RunReport {
    let policy = kernel.policy();
    let matrix = kernel.overlaps();
    RunReport {
        lanes: policy.lanes,
        sweep: policy.sweep,
        workers: policy.workers,
        population: kernel.len(),
        iterations,
        seconds: elapsed.as_secs_f64(),
        pairs: matrix.pair_count(),
        digest: hex::encode(matrix.digest()),
    }
}

/// One row of a comparison, relative to the scalar full sweep.
#[derive(Debug, Clone, Serialize)]
pub struct CompareRow {
    /// The run itself, flattened into the row when serialized.
    #[serde(flatten)]
    pub report: RunReport,
    /// Scalar seconds divided by this run's seconds.
    pub speedup: f64,
    /// Whether the final matrix matches the scalar baseline bit for bit.
    pub agrees: bool,
}

/// Runs every available lane strategy under both sweep shapes.
///
/// The first row is always the scalar full sweep, the baseline for speedup
/// and agreement. A mismatch is logged rather than returned as an error.
pub fn compare(prefs: &RunPrefs) -> Result<Vec<CompareRow>> {
    let mut reports = Vec::new();
    for lanes in Lanes::available() {
        for sweep in [Sweep::Full, Sweep::Triangle] {
            let policy = ExecPolicy { lanes, sweep, workers: prefs.policy.workers };
            reports.push(run(&RunPrefs { policy, ..prefs.clone() })?);
        }
    }

    let Some(baseline) = reports.first().cloned() else {
        return Ok(Vec::new());
    };
    let rows = reports
        .into_iter()
        .map(|report| {
            let agrees = report.digest == baseline.digest;
            if !agrees {
                warn!(
                    lanes = %report.lanes,
                    sweep = %report.sweep,
                    expected = %baseline.digest,
                    actual = %report.digest,
                    "overlap matrix differs from scalar baseline"
                );
            }
            let speedup = if report.seconds > 0.0 { baseline.seconds / report.seconds } else { 0.0 };
            CompareRow { report, speedup, agrees }
        })
        .collect();
    Ok(rows)
}
