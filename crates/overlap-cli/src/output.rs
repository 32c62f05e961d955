// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Human-readable tables.

use comfy_table::{presets::UTF8_FULL, Cell, CellAlignment, ContentArrangement, Table};
use overlap_kernel::{CpuFeatures, Lanes};

use crate::harness::{CompareRow, RunReport};

fn table(header: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header.iter().copied());
    table
}

fn numeric(text: String) -> Cell {
    Cell::new(text).set_alignment(CellAlignment::Right)
}

/// Digest prefix wide enough to tell runs apart in a table.
fn short(digest: &str) -> &str {
    digest.get(..16).unwrap_or(digest)
}

/// One run: policy, timing and the final matrix.
pub fn run_table(report: &RunReport) -> Table {
    let mut t = table(&["field", "value"]);
    t.add_row(vec![Cell::new("lanes"), Cell::new(report.lanes)]);
    t.add_row(vec![Cell::new("sweep"), Cell::new(report.sweep)]);
    t.add_row(vec![Cell::new("workers"), numeric(report.workers.to_string())]);
    t.add_row(vec![Cell::new("population"), numeric(report.population.to_string())]);
    t.add_row(vec![Cell::new("iterations"), numeric(report.iterations.to_string())]);
    t.add_row(vec![Cell::new("seconds"), numeric(format!("{:.6}", report.seconds))]);
    t.add_row(vec![Cell::new("ms/tick"), numeric(format!("{:.4}", report.millis_per_tick()))]);
    t.add_row(vec![Cell::new("sweeps/s"), numeric(format!("{:.1}", report.sweeps_per_second()))]);
    t.add_row(vec![Cell::new("pairs"), numeric(report.pairs.to_string())]);
    t.add_row(vec![Cell::new("digest"), Cell::new(&report.digest)]);
    t
}

/// Every strategy side by side against the scalar baseline.
pub fn compare_table(rows: &[CompareRow]) -> Table {
    let mut t = table(&["lanes", "sweep", "seconds", "speedup", "pairs", "digest", "agrees"]);
    for row in rows {
        let r = &row.report;
        t.add_row(vec![
            Cell::new(r.lanes),
            Cell::new(r.sweep),
            numeric(format!("{:.6}", r.seconds)),
            numeric(format!("{:.2}x", row.speedup)),
            numeric(r.pairs.to_string()),
            Cell::new(short(&r.digest)),
            Cell::new(if row.agrees { "yes" } else { "NO" }),
        ]);
    }
    t
}

/// Detected CPU features and which lane strategies can run.
pub fn features_table() -> Table {
    let features = CpuFeatures::detect();
    let mut t = table(&["lanes", "width", "available"]);
    for lanes in Lanes::CONCRETE {
        let width = lanes.width().map_or_else(String::new, |w| w.to_string());
        let available = if lanes.is_supported_by(features) { "yes" } else { "no" };
        t.add_row(vec![Cell::new(lanes), numeric(width), Cell::new(available)]);
    }
    let auto = Lanes::Auto.resolve(features).map_or_else(|e| e.to_string(), |l| l.to_string());
    t.add_row(vec![Cell::new(Lanes::Auto), Cell::new(""), Cell::new(format!("-> {auto}"))]);
    t.add_row(vec![
        Cell::new("cpu"),
        Cell::new(""),
        Cell::new(format!("sse2={} avx={} avx2={}", features.sse2, features.avx, features.avx2)),
    ]);
    t
}
