// src/extract/mod.rs
//! # Extraction
//!
//! Pulls observation rows for one (source, slot) out of a virtualized list whose
//! length is unknown up front. The list itself is a capability supplied by the
//! collaborator that owns the page ([`ScrollSurface`]); this module only drives it.
//!
//! ## Traversal
//! ```text
//! loop (at most max_steps):
//!     read visible cards → keep cards with a new label and all three metrics
//!     no new label this step? idle += 1, else idle = 0
//!     advance(); stop if idle ≥ stability_window and the offset did not move
//! ```
//! Cards missing a metric are skipped without being marked seen, so a card that
//! renders late is picked up on a later step.
//!
//! ## Guarantees
//! - Labels are unique within one walk.
//! - The walk ends after at most `max_steps` reads.
//! - Order of emitted rows follows discovery and must not be relied on.

mod captured;
mod walker;

pub use captured::{CaptureExtractor, CapturedList};
pub use walker::{ListWalker, TraversalPolicy};

use serde::Serialize;

use crate::config::Slot;
use crate::config::consts::{PATCH, URL_TMPL};
use crate::sanitize::{clean_cell, parse_games, parse_metric, slug};
use crate::error::ExtractError;

/// One item's numbers for one source and slot.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ObservationRow {
    pub label: String,
    pub win_rate: f64,
    pub pick_rate: f64,
    pub games: u64,
}

impl ObservationRow {
    pub fn new(label: impl Into<String>, win_rate: f64, pick_rate: f64, games: u64) -> Self {
        Self { label: label.into(), win_rate, pick_rate, games }
    }
}

/// A card as the page shows it: raw text, any part possibly absent.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RawCard {
    pub label: Option<String>,
    pub win_rate: Option<String>,
    pub pick_rate: Option<String>,
    pub games: Option<String>,
}

impl RawCard {
    pub fn new(label: &str, win_rate: &str, pick_rate: &str, games: &str) -> Self {
        Self {
            label: Some(s!(label)),
            win_rate: Some(s!(win_rate)),
            pick_rate: Some(s!(pick_rate)),
            games: Some(s!(games)),
        }
    }

    /// Label of the card, if it has a non-blank one.
    pub fn label(&self) -> Option<String> {
        self.label.as_deref().map(clean_cell).filter(|l| !l.is_empty())
    }

    /// Coerce into a typed row. Any missing or unreadable field → `None`.
    pub fn to_row(&self) -> Option<ObservationRow> {
        let label = self.label()?;
        let win_rate = parse_metric(self.win_rate.as_deref()?)?;
        let pick_rate = parse_metric(self.pick_rate.as_deref()?)?;
        let games = parse_games(self.games.as_deref()?)?;
        Some(ObservationRow { label, win_rate, pick_rate, games })
    }
}

/// A horizontally scrolled, virtualized list: only part of it is rendered at a time.
pub trait ScrollSurface {
    /// Cards currently rendered.
    fn read_visible_items(&mut self) -> Result<Vec<RawCard>, ExtractError>;

    /// Scroll forward by one page. `Ok(false)` when the offset did not move (end reached).
    fn advance(&mut self) -> Result<bool, ExtractError>;
}

/// A source: the subject's games against one opponent.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Matchup {
    pub subject: String,
    pub opponent: String,
}

impl Matchup {
    pub fn new(subject: &str, opponent: &str) -> Self {
        Self { subject: s!(subject.trim()), opponent: s!(opponent.trim()) }
    }

    /// `<subject>_vs_<opponent>`, slugged. Stable across runs.
    pub fn id(&self) -> String {
        join!(slug(&self.subject), "_vs_", &slug(&self.opponent))
    }

    pub fn url(&self) -> String {
        URL_TMPL
            .replace("{subject}", &slug(&self.subject))
            .replace("{opponent}", &slug(&self.opponent))
            .replace("{patch}", PATCH)
    }
}

/// Produces the rows for one source and slot.
///
/// Implementations must return label-unique rows, terminate on their own, and
/// return `Ok(vec![])` for "no data". `Err` is reserved for transport failures;
/// the collector turns those into zero rows for that source.
pub trait Extractor: Send + Sync {
    fn extract(&self, source: &Matchup, slot: Slot) -> Result<Vec<ObservationRow>, ExtractError>;
}

/// Drive a surface to exhaustion and collect the walk.
pub fn extract_rows<S: ScrollSurface + ?Sized>(
    surface: &mut S,
    policy: TraversalPolicy,
) -> Result<Vec<ObservationRow>, ExtractError> {
    ListWalker::new(surface, policy).collect()
}
