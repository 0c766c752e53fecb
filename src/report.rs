// src/report.rs
use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Serialize;

use crate::config::Slot;
use crate::error::ExportError;
use crate::stats::{BuildPlan, SlotRanking, SlotSelection};

/// One chosen item as the caller receives it.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BuildItem {
    pub slot: &'static str,
    pub label: String,
    pub win_rate_eb: f64,
    pub pick_rate: f64,
    pub games: u64,
    pub adj_score: f64,
}

impl From<&SlotSelection> for BuildItem {
    fn from(s: &SlotSelection) -> Self {
        Self {
            slot: s.slot.pretty(),
            label: s.label.clone(),
            win_rate_eb: round_to!(s.wr_eb, 2),
            pick_rate: round_to!(s.pick_rate, 2),
            games: s.games,
            adj_score: round_to!(s.adj_score, 3),
        }
    }
}

/// Structured payload handed back to the caller.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BuildPayload {
    pub title: String,
    pub items: Vec<BuildItem>,
}

impl BuildPayload {
    pub fn new(plan: &BuildPlan, beta: f64) -> Self {
        Self {
            title: build_title(beta),
            items: plan.selections.iter().map(BuildItem::from).collect(),
        }
    }

    pub fn to_json(&self) -> Result<String, ExportError> {
        Ok(serde_json::to_string(self)?)
    }
}

pub fn build_title(beta: f64) -> String {
    format!("Optimal build (sequential pick with popularity bonus, beta={beta:.2})")
}

/// Everything one run produced.
#[derive(Clone, Debug, Default)]
pub struct RunReport {
    pub rankings: BTreeMap<Slot, SlotRanking>,
    pub plan: BuildPlan,
    pub files_written: Vec<PathBuf>,
    pub failed_sources: Vec<String>,
}

impl RunReport {
    pub fn payload(&self, beta: f64) -> BuildPayload {
        BuildPayload::new(&self.plan, beta)
    }
}
