// src/runner.rs
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::{
    collect::collect_sources,
    config::options::RunOptions,
    error::PipelineError,
    extract::{ Extractor, Matchup, ObservationRow },
    file::write_slot_export,
    progress::Progress,
    report::RunReport,
    stats::{ aggregate, score_and_filter, select_build, ScorePass, SlotRanking },
};

/// Aggregate one slot's per-source rows and rank them.
pub fn rank_slot(sources: &[Vec<ObservationRow>]) -> SlotRanking {
    let agg = aggregate(sources);
    score_and_filter(&agg)
}

/// Top-level pipeline: validate → extract (fan-out) → per slot aggregate/score → export → select.
/// `progress` can be None (no UI updates) or Some(&mut impl Progress).
pub fn run(
    opts: &RunOptions,
    extractor: Arc<dyn Extractor>,
    progress: Option<&mut dyn Progress>,
) -> Result<RunReport, PipelineError> {
    opts.validate()?;

    let sources: Vec<Matchup> = opts
        .opponents
        .iter()
        .map(|o| Matchup::new(&opts.subject, o))
        .collect();

    logf!(
        "Run: subject={} opponents={:?} slots={:?}",
        opts.subject,
        opts.opponents,
        opts.slots.iter().map(|s| s.key()).collect::<Vec<_>>()
    );
    for m in &sources {
        logd!("Source {} → {}", m.id(), m.url());
    }

    let collected = collect_sources(extractor, &sources, &opts.slots, progress);

    let mut rankings: BTreeMap<_, SlotRanking> = BTreeMap::new();
    for &slot in &opts.slots {
        let ranking = rank_slot(collected.slot_sources(slot));
        let t = &ranking.thresholds;
        logd!(
            "{slot}: total_games={} hard={} soft={} prior={} kept={}",
            t.total_games, t.hard, t.soft, t.prior_strength, ranking.candidates.len()
        );
        if ranking.pass == ScorePass::Soft {
            logf!("{slot}: no candidate reached {} games, used the soft threshold {}", t.hard, t.soft);
        }
        rankings.insert(slot, ranking);
    }

    let mut files_written = Vec::new();
    if opts.export.enabled {
        for (&slot, ranking) in &rankings {
            let path = write_slot_export(&opts.export, &opts.subject, &opts.opponents, slot, &ranking.candidates)?;
            logf!("Export: {slot} → {}", path.display());
            files_written.push(path);
        }
    }

    let plan = select_build(
        rankings.iter().map(|(&slot, r)| (slot, r.candidates.as_slice())),
        &opts.select,
    );
    logf!("Build: {} of {} slots filled", plan.len(), opts.slots.len());

    Ok(RunReport {
        rankings,
        plan,
        files_written,
        failed_sources: collected.failed_sources,
    })
}
