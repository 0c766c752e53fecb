// src/extract/captured.rs
//
// Offline extractor: replays list captures saved on disk through the same
// virtualized-list walk a live page gets.
//
// Layout: <dir>/<subject>_vs_<opponent>/<slot>.tsv (or .csv)
// Rows:   label, win_rate, pick_rate, games   (raw cell text, optional header)

use std::fs;
use std::path::{Path, PathBuf};

use super::{Extractor, Matchup, ObservationRow, RawCard, ScrollSurface, TraversalPolicy, extract_rows};
use crate::config::Slot;
use crate::config::consts::CAPTURE_VIEWPORT;
use crate::csv::parse_rows;
use crate::error::ExtractError;

/// Captured cards shown through a fixed-width viewport.
/// Like the live list, two viewports' worth of cards are rendered at any offset.
#[derive(Clone, Debug)]
pub struct CapturedList {
    cards: Vec<RawCard>,
    viewport: usize,
    offset: usize,
}

impl CapturedList {
    pub fn new(cards: Vec<RawCard>, viewport: usize) -> Self {
        Self { cards, viewport: viewport.max(1), offset: 0 }
    }

    /// Parse capture text. A first row starting with "label" or "item" is a header.
    pub fn from_text(text: &str, sep: char, viewport: usize) -> Self {
        let mut rows = parse_rows(text, sep);
        let has_header = rows
            .first()
            .and_then(|r| r.first())
            .map(|c| {
                let c = c.trim();
                c.eq_ignore_ascii_case("label") || c.eq_ignore_ascii_case("item")
            })
            .unwrap_or(false);
        if has_header {
            rows.remove(0);
        }

        let cell = |row: &[String], i: usize| row.get(i).filter(|c| !c.trim().is_empty()).cloned();
        let cards = rows
            .iter()
            .map(|r| RawCard {
                label: cell(r, 0),
                win_rate: cell(r, 1),
                pick_rate: cell(r, 2),
                games: cell(r, 3),
            })
            .collect();
        Self::new(cards, viewport)
    }

    pub fn len(&self) -> usize { self.cards.len() }
    pub fn is_empty(&self) -> bool { self.cards.is_empty() }

    fn max_offset(&self) -> usize { self.cards.len().saturating_sub(self.viewport) }
}

impl ScrollSurface for CapturedList {
    fn read_visible_items(&mut self) -> Result<Vec<RawCard>, ExtractError> {
        let end = (self.offset + self.viewport * 2).min(self.cards.len());
        Ok(self.cards[self.offset.min(end)..end].to_vec())
    }

    /// Scroll by one and a half viewports, clamped to the end.
    fn advance(&mut self) -> Result<bool, ExtractError> {
        let step = (self.viewport * 3 / 2).max(1);
        let next = (self.offset + step).min(self.max_offset());
        let moved = next != self.offset;
        self.offset = next;
        Ok(moved)
    }
}

/// [`Extractor`] backed by a directory of captures.
#[derive(Clone, Debug)]
pub struct CaptureExtractor {
    dir: PathBuf,
    viewport: usize,
    policy: TraversalPolicy,
}

impl CaptureExtractor {
    pub fn new(dir: impl Into<PathBuf>, policy: TraversalPolicy) -> Self {
        Self { dir: dir.into(), viewport: CAPTURE_VIEWPORT, policy }
    }

    pub fn with_viewport(mut self, viewport: usize) -> Self {
        self.viewport = viewport.max(1);
        self
    }

    pub fn dir(&self) -> &Path { &self.dir }

    /// First existing capture for (source, slot), TSV preferred.
    pub fn capture_path(&self, source: &Matchup, slot: Slot) -> Option<(PathBuf, char)> {
        let base = self.dir.join(source.id());
        [("tsv", '\t'), ("csv", ',')]
            .into_iter()
            .map(|(ext, sep)| (base.join(format!("{}.{ext}", slot.key())), sep))
            .find(|(p, _)| p.is_file())
    }

    pub fn open(&self, source: &Matchup, slot: Slot) -> Result<CapturedList, ExtractError> {
        let (path, sep) = self
            .capture_path(source, slot)
            .ok_or_else(|| ExtractError::CaptureMissing(self.dir.join(source.id()).join(slot.key())))?;
        let text = fs::read_to_string(&path)
            .map_err(|e| ExtractError::Io { path: path.clone(), source: e })?;
        Ok(CapturedList::from_text(&text, sep, self.viewport))
    }
}

impl Extractor for CaptureExtractor {
    fn extract(&self, source: &Matchup, slot: Slot) -> Result<Vec<ObservationRow>, ExtractError> {
        let mut list = self.open(source, slot)?;
        logd!("Replaying {} cards for {} / {}", list.len(), source.id(), slot);
        extract_rows(&mut list, self.policy)
    }
}
