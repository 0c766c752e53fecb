// src/stats/select.rs
use std::cmp::Ordering;
use std::collections::HashSet;

use serde::Serialize;

use super::score::ScoredCandidate;
use crate::config::Slot;
use crate::config::consts::TIE_MARGIN;
use crate::config::options::SelectOptions;

/// The candidate chosen for one slot.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SlotSelection {
    pub slot: Slot,
    pub label: String,
    pub wr_eb: f64,
    pub pick_rate: f64,
    pub games: u64,
    pub adj_score: f64,
}

/// Chosen items in slot order. Slots without an eligible candidate are absent.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct BuildPlan {
    pub selections: Vec<SlotSelection>,
}

impl BuildPlan {
    pub fn get(&self, slot: Slot) -> Option<&SlotSelection> {
        self.selections.iter().find(|s| s.slot == slot)
    }
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.selections.iter().map(|s| s.label.as_str())
    }
    pub fn len(&self) -> usize { self.selections.len() }
    pub fn is_empty(&self) -> bool { self.selections.is_empty() }
}

/// Outcome of comparing the two best-ranked candidates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TieDecision {
    KeepFirst,
    SwapToSecond,
}

#[derive(Clone, Copy, Debug)]
struct Ranked<'a> {
    cand: &'a ScoredCandidate,
    adj_score: f64,
}

pub fn adjusted_score(wr_eb: f64, pick_rate: f64, beta: f64) -> f64 {
    wr_eb + beta * pick_rate.max(0.0).sqrt()
}

/// Prefer the runner-up when its adjusted score is within the tie margin and it
/// has strictly more games.
pub fn tie_break(first: (f64, u64), second: (f64, u64)) -> TieDecision {
    let (first_adj, first_games) = first;
    let (second_adj, second_games) = second;
    if first_adj - second_adj < TIE_MARGIN && second_games > first_games {
        TieDecision::SwapToSecond
    } else {
        TieDecision::KeepFirst
    }
}

fn rank_order(a: &Ranked, b: &Ranked) -> Ordering {
    b.adj_score
        .total_cmp(&a.adj_score)
        .then(b.cand.wr_eb.total_cmp(&a.cand.wr_eb))
        .then(b.cand.games.cmp(&a.cand.games))
}

/// Best not-yet-picked candidate for one slot, or `None` if nothing is eligible.
pub fn pick_for_slot(
    slot: Slot,
    candidates: &[ScoredCandidate],
    picked: &HashSet<String>,
    opts: &SelectOptions,
) -> Option<SlotSelection> {
    let mut ranked: Vec<Ranked> = candidates
        .iter()
        .filter(|c| !picked.contains(&c.label))
        .filter(|c| c.pick_rate >= opts.min_pr)
        .map(|c| Ranked { cand: c, adj_score: adjusted_score(c.wr_eb, c.pick_rate, opts.beta) })
        .collect();
    if ranked.is_empty() {
        return None;
    }
    ranked.sort_by(rank_order);

    let mut winner = ranked[0];
    if let Some(second) = ranked.get(1) {
        let decision = tie_break(
            (winner.adj_score, winner.cand.games),
            (second.adj_score, second.cand.games),
        );
        if decision == TieDecision::SwapToSecond {
            logd!("{slot}: near tie, {} over {} on sample size", second.cand.label, winner.cand.label);
            winner = *second;
        }
    }

    Some(SlotSelection {
        slot,
        label: winner.cand.label.clone(),
        wr_eb: winner.cand.wr_eb,
        pick_rate: winner.cand.pick_rate,
        games: winner.cand.games,
        adj_score: winner.adj_score,
    })
}

/// Walk slots in the order given, never reusing a label.
pub fn select_build<'a, I>(slots: I, opts: &SelectOptions) -> BuildPlan
where
    I: IntoIterator<Item = (Slot, &'a [ScoredCandidate])>,
{
    let mut picked: HashSet<String> = HashSet::new();
    let mut selections = Vec::new();

    for (slot, candidates) in slots {
        match pick_for_slot(slot, candidates, &picked, opts) {
            Some(sel) => {
                picked.insert(sel.label.clone());
                selections.push(sel);
            }
            None => logd!("{slot}: no eligible candidate, skipped"),
        }
    }

    BuildPlan { selections }
}
