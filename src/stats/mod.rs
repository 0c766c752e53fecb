// src/stats/mod.rs
//! Per-slot numbers: merge sources, shrink, pick.
//!
//! Everything here is synchronous and pure. No function in this module fails
//! on well-formed rows; empty inputs produce empty outputs.

pub mod aggregate;
pub mod score;
pub mod select;

pub use aggregate::{Aggregate, AggregatedRow, aggregate};
pub use score::{ScorePass, ScoredCandidate, SlotRanking, Thresholds, score_and_filter, soft_filter, strict_filter};
pub use select::{BuildPlan, SlotSelection, TieDecision, pick_for_slot, select_build, tie_break};
