// src/extract/walker.rs
use std::collections::{HashSet, VecDeque};
use std::iter::FusedIterator;

use super::{ObservationRow, ScrollSurface};
use crate::config::consts::{MAX_STEPS, STABILITY_WINDOW};
use crate::error::ExtractError;

/// When to stop walking a list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TraversalPolicy {
    /// Hard cap on read/advance rounds.
    pub max_steps: usize,
    /// Consecutive rounds without a new label before an unmoving list counts as finished.
    pub stability_window: usize,
}

impl Default for TraversalPolicy {
    fn default() -> Self {
        Self { max_steps: MAX_STEPS, stability_window: STABILITY_WINDOW }
    }
}

/// Lazy, finite walk over a [`ScrollSurface`].
///
/// Yields each distinct, complete row once. A read failure is yielded once as
/// `Err` and ends the walk. Not restartable: it borrows the surface mutably and
/// leaves it scrolled wherever it stopped.
pub struct ListWalker<'a, S: ScrollSurface + ?Sized> {
    surface: &'a mut S,
    policy: TraversalPolicy,
    seen: HashSet<String>,
    pending: VecDeque<ObservationRow>,
    step: usize,
    idle_steps: usize,
    done: bool,
}

impl<'a, S: ScrollSurface + ?Sized> ListWalker<'a, S> {
    pub fn new(surface: &'a mut S, policy: TraversalPolicy) -> Self {
        Self {
            surface,
            policy,
            seen: HashSet::new(),
            pending: VecDeque::new(),
            step: 0,
            idle_steps: 0,
            done: false,
        }
    }

    /// Rounds performed so far.
    pub fn steps(&self) -> usize { self.step }

    /// One read + advance round. Queues newly seen rows.
    fn round(&mut self) -> Result<(), ExtractError> {
        let cards = self.surface.read_visible_items()?;

        let mut fresh = 0usize;
        for card in cards {
            let Some(label) = card.label() else { continue };
            if self.seen.contains(&label) { continue; }
            // Incomplete card: leave it unseen so a later render can fill it in.
            let Some(row) = card.to_row() else { continue };
            self.seen.insert(label);
            self.pending.push_back(row);
            fresh += 1;
        }

        if fresh == 0 { self.idle_steps += 1; } else { self.idle_steps = 0; }

        let moved = match self.surface.advance() {
            Ok(moved) => moved,
            Err(e) => {
                loge!("List advance failed at step {}: {e}", self.step);
                false
            }
        };

        self.step += 1;
        if self.idle_steps >= self.policy.stability_window && !moved {
            self.done = true;
        }
        if self.step >= self.policy.max_steps {
            self.done = true;
        }
        Ok(())
    }
}

impl<S: ScrollSurface + ?Sized> Iterator for ListWalker<'_, S> {
    type Item = Result<ObservationRow, ExtractError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(row) = self.pending.pop_front() {
                return Some(Ok(row));
            }
            if self.done || self.policy.max_steps == 0 {
                return None;
            }
            if let Err(e) = self.round() {
                self.done = true;
                self.pending.clear();
                return Some(Err(e));
            }
        }
    }
}

impl<S: ScrollSurface + ?Sized> FusedIterator for ListWalker<'_, S> {}
