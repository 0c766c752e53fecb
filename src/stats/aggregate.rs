// src/stats/aggregate.rs
use std::collections::BTreeMap;

use serde::Serialize;

use crate::extract::ObservationRow;

/// One label's numbers for a slot, merged across every source.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AggregatedRow {
    pub label: String,
    /// Games-weighted mean of the per-source win rates.
    pub win_rate: f64,
    /// Share of the slot's total games, in percent.
    pub pick_rate: f64,
    pub games: u64,
}

/// All merged rows for one slot, ordered by label.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Aggregate {
    pub rows: Vec<AggregatedRow>,
    pub total_games: u64,
}

impl Aggregate {
    pub fn is_empty(&self) -> bool { self.rows.is_empty() }
}

#[derive(Default)]
struct Tally {
    games: u64,
    // win_rate * games per contributing row
    terms: Vec<f64>,
}

impl Tally {
    /// Sum of the weighted terms in a fixed order, so source order never changes the bits.
    fn weighted_sum(&mut self) -> f64 {
        self.terms.sort_by(f64::total_cmp);
        self.terms.iter().sum()
    }
}

/// Merge every source's rows for one slot.
///
/// Rows with zero games contribute nothing. The result is identical for any
/// permutation of `sources`.
pub fn aggregate<'a, I, R>(sources: I) -> Aggregate
where
    I: IntoIterator<Item = R>,
    R: IntoIterator<Item = &'a ObservationRow>,
{
    let mut acc: BTreeMap<&'a str, Tally> = BTreeMap::new();
    for rows in sources {
        for r in rows {
            if r.games == 0 { continue; }
            let win_rate = if r.win_rate.is_finite() { r.win_rate } else { 0.0 };
            let t = acc.entry(r.label.as_str()).or_default();
            t.games += r.games;
            t.terms.push(win_rate * r.games as f64);
        }
    }

    let total_games: u64 = acc.values().map(|t| t.games).sum();
    let rows = acc
        .into_iter()
        .map(|(label, mut t)| {
            let games = t.games;
            AggregatedRow {
                label: s!(label),
                win_rate: t.weighted_sum() / games as f64,
                pick_rate: if total_games > 0 { 100.0 * games as f64 / total_games as f64 } else { 0.0 },
                games,
            }
        })
        .collect();

    Aggregate { rows, total_games }
}
