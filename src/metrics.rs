//! Derivation of per-row epidemiological metrics.
//!
//! Two percentage semantics coexist and are deliberately kept apart:
//! `pct_infected`/`pct_recovered` are shares of the current total population,
//! while `s_pct`/`i_pct`/`r_pct` are growth ratios against the region's own
//! first-day value of the same column and can exceed 100.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::ingest::{RecordStore, SimulationRecord};

/// A simulation record with all derived columns attached.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessedRecord {
    pub region: u32,
    pub day: u32,
    pub s: f64,
    pub i: f64,
    pub r: f64,
    /// `s + i + r` for this row.
    pub total: f64,
    /// Infected share of the current total, 0 when the total is 0.
    pub pct_infected: f64,
    /// Recovered share of the current total, 0 when the total is 0.
    pub pct_recovered: f64,
    /// Growth ratio of S against the region's first-day S, 0 when that is 0.
    pub s_pct: f64,
    /// Growth ratio of I against the region's first-day I, 0 when that is 0.
    pub i_pct: f64,
    /// Growth ratio of R against the region's first-day R, 0 when that is 0.
    pub r_pct: f64,
    /// First difference of I within the region; 0 on the first day.
    pub new_infected: f64,
    /// Effective reproduction rate. `None` marks a missing value (zero S or
    /// zero I, or a non-finite result) that must stay out of any average.
    pub effective_r: Option<f64>,
}

/// Share of `part` in `total` as a percentage. Zero totals yield 0, not NaN.
fn pct(part: f64, total: f64) -> f64 {
    if total == 0.0 { 0.0 } else { part / total * 100.0 }
}

/// Growth ratio of `value` against the region's `initial` value of the same
/// column. A zero initial value yields 0.
fn growth_pct(value: f64, initial: f64) -> f64 {
    if initial == 0.0 {
        0.0
    } else {
        value / initial * 100.0
    }
}

/// Derives all metric columns from a record store.
///
/// Output is partitioned and ordered by region then day, input order within a
/// region preserved. The store itself is not mutated.
pub fn derive_metrics(store: &RecordStore) -> Vec<ProcessedRecord> {
    let mut by_region: BTreeMap<u32, Vec<&SimulationRecord>> = BTreeMap::new();
    for rec in store.records() {
        by_region.entry(rec.region).or_default().push(rec);
    }

    let mut out = Vec::with_capacity(store.len());

    for (_, rows) in by_region {
        let first = rows[0];
        let mut prev_i: Option<f64> = None;

        for rec in rows {
            let total = rec.s + rec.i + rec.r;
            let new_infected = match prev_i {
                Some(prev) => rec.i - prev,
                None => 0.0,
            };
            prev_i = Some(rec.i);

            let effective_r = if rec.s > 0.0 && rec.i > 0.0 {
                let v = (new_infected / rec.s) * (total / rec.i);
                v.is_finite().then_some(v)
            } else {
                None
            };

            out.push(ProcessedRecord {
                region: rec.region,
                day: rec.day,
                s: rec.s,
                i: rec.i,
                r: rec.r,
                total,
                pct_infected: pct(rec.i, total),
                pct_recovered: pct(rec.r, total),
                s_pct: growth_pct(rec.s, first.s),
                i_pct: growth_pct(rec.i, first.i),
                r_pct: growth_pct(rec.r, first.r),
                new_infected,
                effective_r,
            });
        }
    }

    out
}

/// Pearson correlation matrix of the infected series between every pair of
/// regions, aligned on the days both regions observed.
///
/// Returns the region identifiers in ascending order and a square matrix in
/// that order. Pairs with fewer than two shared days, or a constant series,
/// yield 0.
pub fn infected_correlation(records: &[ProcessedRecord]) -> (Vec<u32>, Vec<Vec<f64>>) {
    let mut series: BTreeMap<u32, BTreeMap<u32, f64>> = BTreeMap::new();
    for rec in records {
        series.entry(rec.region).or_default().insert(rec.day, rec.i);
    }

    let regions: Vec<u32> = series.keys().copied().collect();
    let n = regions.len();
    let mut matrix = vec![vec![0.0; n]; n];

    for a in 0..n {
        for b in a..n {
            let r = if a == b {
                1.0
            } else {
                pearson(&series[&regions[a]], &series[&regions[b]])
            };
            matrix[a][b] = r;
            matrix[b][a] = r;
        }
    }

    (regions, matrix)
}

fn pearson(xs: &BTreeMap<u32, f64>, ys: &BTreeMap<u32, f64>) -> f64 {
    let paired: Vec<(f64, f64)> = xs
        .iter()
        .filter_map(|(day, x)| ys.get(day).map(|y| (*x, *y)))
        .collect();

    if paired.len() < 2 {
        return 0.0;
    }

    let n = paired.len() as f64;
    let mean_x = paired.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = paired.iter().map(|(_, y)| y).sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (x, y) in &paired {
        cov += (x - mean_x) * (y - mean_y);
        var_x += (x - mean_x).powi(2);
        var_y += (y - mean_y).powi(2);
    }

    let denom = (var_x * var_y).sqrt();
    if denom == 0.0 { 0.0 } else { cov / denom }
}
