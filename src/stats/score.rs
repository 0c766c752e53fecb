// src/stats/score.rs
//! Confidence filter and Empirical-Bayes shrinkage for one slot.
//!
//! ```text
//! hard  = max(floor(1%   of total), 30)
//! soft  = max(floor(0.5% of total), 15)
//! prior = min(floor(10%  of total), 300)
//! wr_eb = (wr * g + mu * prior) / (g + prior)
//! ```
//! The strict pass keeps `g ≥ hard` and shrinks toward the mean of every row.
//! Only when it keeps nothing does the soft pass run: `g ≥ soft`, shrinking toward
//! the mean of the rows that clear `soft`. A slot with no games at all is passed
//! through unshrunk, ranked by popularity.

use serde::Serialize;

use super::aggregate::{Aggregate, AggregatedRow};
use crate::config::consts::*;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ScoredCandidate {
    pub label: String,
    pub win_rate: f64,
    pub pick_rate: f64,
    pub games: u64,
    /// Shrunk win rate, 4 decimals.
    pub wr_eb: f64,
    /// Pick rate at 2 decimals.
    pub share: f64,
    /// Ranking key. Equal to `wr_eb` today.
    pub score: f64,
}

/// Which rule produced a slot's list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScorePass {
    Strict,
    Soft,
    Unweighted,
}

/// Sample-size cutoffs and prior weight derived from a slot's total games.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Thresholds {
    pub total_games: u64,
    pub hard: u64,
    pub soft: u64,
    pub prior_strength: u64,
}

impl Thresholds {
    pub fn for_total(total_games: u64) -> Self {
        let frac = |f: f64| (f * total_games as f64).floor() as u64;
        Self {
            total_games,
            hard: frac(HARD_MIN_FRAC).max(HARD_MIN_FLOOR),
            soft: frac(SOFT_MIN_FRAC).max(SOFT_MIN_FLOOR),
            prior_strength: frac(PRIOR_FRAC).min(PRIOR_CAP),
        }
    }
}

/// Ranked candidates for one slot plus how they were obtained.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SlotRanking {
    pub pass: ScorePass,
    pub thresholds: Thresholds,
    pub candidates: Vec<ScoredCandidate>,
}

/// Games-weighted mean win rate over `rows`; `denom` of 0 is treated as 1.
pub fn weighted_mean<'a>(rows: impl IntoIterator<Item = &'a AggregatedRow>, denom: u64) -> f64 {
    let num: f64 = rows.into_iter().map(|r| r.win_rate * r.games as f64).sum();
    num / denom.max(1) as f64
}

pub fn shrink(win_rate: f64, games: u64, mu: f64, prior_strength: u64) -> f64 {
    let (g, m) = (games as f64, prior_strength as f64);
    if g + m == 0.0 {
        return win_rate;
    }
    (win_rate * g + mu * m) / (g + m)
}

fn shrink_all(rows: &[AggregatedRow], min_games: u64, mu: f64, t: &Thresholds) -> Vec<ScoredCandidate> {
    let mut out: Vec<ScoredCandidate> = rows
        .iter()
        .filter(|r| r.games >= min_games)
        .map(|r| {
            let wr_eb = round_to!(shrink(r.win_rate, r.games, mu, t.prior_strength), 4);
            ScoredCandidate {
                label: r.label.clone(),
                win_rate: r.win_rate,
                pick_rate: r.pick_rate,
                games: r.games,
                wr_eb,
                share: round_to!(100.0 * r.games as f64 / t.total_games.max(1) as f64, 2),
                score: wr_eb,
            }
        })
        .collect();
    // Stable: equal scores keep input order.
    out.sort_by(|a, b| b.score.total_cmp(&a.score));
    out
}

/// Rows with `games ≥ hard`, shrunk toward the mean of all rows.
pub fn strict_filter(agg: &Aggregate, t: &Thresholds) -> Vec<ScoredCandidate> {
    let mu = weighted_mean(&agg.rows, agg.total_games);
    shrink_all(&agg.rows, t.hard, mu, t)
}

/// Rows with `games ≥ soft`, shrunk toward the mean of those same rows.
pub fn soft_filter(agg: &Aggregate, t: &Thresholds) -> Vec<ScoredCandidate> {
    let eligible = || agg.rows.iter().filter(|r| r.games >= t.soft);
    let denom: u64 = eligible().map(|r| r.games).sum();
    let mu_soft = weighted_mean(eligible(), denom);
    shrink_all(&agg.rows, t.soft, mu_soft, t)
}

/// No evidence to weigh: pass rows through, most picked first.
pub fn unweighted(agg: &Aggregate) -> Vec<ScoredCandidate> {
    let mut out: Vec<ScoredCandidate> = agg
        .rows
        .iter()
        .map(|r| ScoredCandidate {
            label: r.label.clone(),
            win_rate: r.win_rate,
            pick_rate: r.pick_rate,
            games: r.games,
            wr_eb: r.win_rate,
            share: 0.0,
            score: r.win_rate,
        })
        .collect();
    out.sort_by(|a, b| b.pick_rate.total_cmp(&a.pick_rate).then(b.win_rate.total_cmp(&a.win_rate)));
    out
}

/// Strict pass, falling back to the soft pass only when strict keeps nothing.
pub fn score_and_filter(agg: &Aggregate) -> SlotRanking {
    let thresholds = Thresholds::for_total(agg.total_games);

    if agg.total_games == 0 {
        return SlotRanking { pass: ScorePass::Unweighted, thresholds, candidates: unweighted(agg) };
    }

    let strict = strict_filter(agg, &thresholds);
    if !strict.is_empty() {
        return SlotRanking { pass: ScorePass::Strict, thresholds, candidates: strict };
    }

    SlotRanking { pass: ScorePass::Soft, thresholds, candidates: soft_filter(agg, &thresholds) }
}
