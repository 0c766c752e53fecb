// src/file.rs

use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::config::Slot;
use crate::config::consts::EXPORT_COLUMNS;
use crate::config::options::ExportOptions;
use crate::sanitize::slug;
use crate::csv::to_delimited_string;
use crate::error::ExportError;
use crate::stats::ScoredCandidate;

pub fn ensure_directory(dir: &Path) -> Result<(), ExportError> {
    if dir.exists() && !dir.is_dir() {
        return Err(ExportError::NotADirectory(dir.to_path_buf()));
    }
    if !dir.exists() {
        fs::create_dir_all(dir).map_err(|e| ExportError::Io { path: dir.to_path_buf(), source: e })?;
    }
    Ok(())
}

/// `<subject>_vs_<opp1>_<opp2>…_<suffix>`, all slugged. Same inputs, same name.
pub fn export_stem(subject: &str, opponents: &[String], slot: Slot) -> String {
    let opps: Vec<String> = opponents.iter().map(|o| slug(o)).collect();
    join!(slug(subject), "_vs_", &opps.join("_"), "_", slot.suffix())
}

pub fn export_path(export: &ExportOptions, subject: &str, opponents: &[String], slot: Slot) -> PathBuf {
    let stem = export_stem(subject, opponents, slot);
    export.out_dir.join(join!(stem, ".", export.format.ext()))
}

/// One line per candidate, in `EXPORT_COLUMNS` order.
pub fn candidate_record(c: &ScoredCandidate) -> Vec<String> {
    vec![
        c.label.clone(),
        c.win_rate.to_string(),
        c.pick_rate.to_string(),
        c.games.to_string(),
        c.wr_eb.to_string(),
        c.share.to_string(),
        c.score.to_string(),
    ]
}

/// Top-N of a slot's ranking as delimited text, header included.
pub fn slot_export_string(candidates: &[ScoredCandidate], top_n: usize, sep: char) -> String {
    let rows: Vec<Vec<String>> = candidates.iter().take(top_n).map(candidate_record).collect();
    to_delimited_string(&EXPORT_COLUMNS[..], &rows, sep)
}

/// Write one slot's export file. Returns the path written.
pub fn write_slot_export(
    export: &ExportOptions,
    subject: &str,
    opponents: &[String],
    slot: Slot,
    candidates: &[ScoredCandidate],
) -> Result<PathBuf, ExportError> {
    ensure_directory(&export.out_dir)?;
    let path = export_path(export, subject, opponents, slot);
    let contents = slot_export_string(candidates, export.top_n, export.format.delim());
    fs::write(&path, contents).map_err(|e| ExportError::Io { path: path.clone(), source: e })?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stem_is_deterministic_and_slugged() {
        let opps = vec![s!("Kai'Sa"), s!("Miss Fortune")];
        assert_eq!(export_stem("Ahri", &opps, Slot::Boots), "ahri_vs_kaisa_missfortune_boots");
        assert_eq!(export_stem("Ahri", &opps, Slot::Boots), export_stem("Ahri", &opps, Slot::Boots));
    }

    #[test]
    fn export_is_capped_at_top_n() {
        let c = |l: &str| ScoredCandidate {
            label: s!(l), win_rate: 50.0, pick_rate: 25.0, games: 100,
            wr_eb: 50.0, share: 25.0, score: 50.0,
        };
        let cands = vec![c("A"), c("B"), c("C"), c("D"), c("E")];
        let text = slot_export_string(&cands, 4, ',');
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], "label,win_rate,pick_rate,games,wr_eb,share,score");
        assert_eq!(lines[1], "A,50,25,100,50,25,50");
    }
}
