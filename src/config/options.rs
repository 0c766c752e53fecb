// src/config/options.rs
use std::path::PathBuf;

use super::consts::*;
use super::slot::Slot;
use crate::error::InputError;
use crate::extract::TraversalPolicy;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExportFormat {
    #[default]
    Csv,
    Tsv,
}

impl ExportFormat {
    pub fn ext(&self) -> &'static str {
        match self { ExportFormat::Csv => "csv", ExportFormat::Tsv => "tsv" }
    }
    pub fn delim(&self) -> char {
        match self { ExportFormat::Csv => ',', ExportFormat::Tsv => '\t' }
    }
}

/// Knobs for the sequential selector.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SelectOptions {
    /// Weight of the `sqrt(pick_rate)` popularity bonus.
    pub beta: f64,
    /// Candidates below this pick rate (percent) are never chosen.
    pub min_pr: f64,
}

impl Default for SelectOptions {
    fn default() -> Self {
        Self { beta: DEFAULT_BETA, min_pr: DEFAULT_MIN_PR }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ExportOptions {
    pub out_dir: PathBuf,
    pub format: ExportFormat,
    /// Rows per slot file.
    pub top_n: usize,
    /// When false, nothing is written; the payload is still produced.
    pub enabled: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from(DEFAULT_OUT_DIR),
            format: ExportFormat::Csv,
            top_n: DEFAULT_TOP_N,
            enabled: true,
        }
    }
}

/// One pipeline invocation.
#[derive(Clone, Debug, PartialEq)]
pub struct RunOptions {
    pub subject: String,
    pub opponents: Vec<String>,
    pub slots: Vec<Slot>,
    pub select: SelectOptions,
    pub export: ExportOptions,
    pub traversal: TraversalPolicy,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            subject: s!(),
            opponents: Vec::new(),
            slots: Slot::ALL.to_vec(),
            select: SelectOptions::default(),
            export: ExportOptions::default(),
            traversal: TraversalPolicy::default(),
        }
    }
}

impl RunOptions {
    /// Reject malformed input before anything is extracted.
    pub fn validate(&self) -> Result<(), InputError> {
        if self.subject.trim().is_empty() {
            return Err(InputError::MissingSubject);
        }
        match self.opponents.len() {
            0 => return Err(InputError::NoOpponents),
            n if n > MAX_OPPONENTS => {
                return Err(InputError::TooManyOpponents { got: n, max: MAX_OPPONENTS });
            }
            _ => {}
        }
        if self.slots.is_empty() {
            return Err(InputError::NoSlots);
        }
        if !self.select.beta.is_finite() {
            return Err(InputError::InvalidValue { flag: "--beta", value: self.select.beta.to_string() });
        }
        if !self.select.min_pr.is_finite() {
            return Err(InputError::InvalidValue { flag: "--min-pr", value: self.select.min_pr.to_string() });
        }
        Ok(())
    }
}

/// Split raw opponent arguments on commas and whitespace, dropping blanks.
/// Duplicates are kept once, first occurrence wins.
pub fn split_opponents<S: AsRef<str>>(raw: &[S]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for chunk in raw {
        for name in chunk.as_ref().split(|c: char| c == ',' || c.is_whitespace()) {
            if name.is_empty() { continue; }
            if !out.iter().any(|o| o.eq_ignore_ascii_case(name)) {
                out.push(s!(name));
            }
        }
    }
    out
}
