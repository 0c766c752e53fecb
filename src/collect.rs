// src/collect.rs
use std::{
    collections::BTreeMap,
    thread,
    sync::{ mpsc, Arc, atomic::{ AtomicUsize, Ordering }}
};

use crate::{
    config::{ Slot, consts::WORKERS },
    extract::{ Extractor, Matchup, ObservationRow },
    progress::Progress,
};

/// Everything one source produced, slot by slot.
#[derive(Clone, Debug, Default)]
pub struct SourceRows {
    pub rows: BTreeMap<Slot, Vec<ObservationRow>>,
    pub failures: Vec<(Slot, String)>,
}

/// Rows from every source, regrouped per slot (sources in input order).
#[derive(Clone, Debug, Default)]
pub struct Collected {
    pub per_slot: BTreeMap<Slot, Vec<Vec<ObservationRow>>>,
    /// Sources that contributed nothing at all.
    pub failed_sources: Vec<String>,
}

impl Collected {
    pub fn slot_sources(&self, slot: Slot) -> &[Vec<ObservationRow>] {
        self.per_slot.get(&slot).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Extract every slot for one source. A failed slot is logged and left empty.
pub fn extract_source(extractor: &dyn Extractor, source: &Matchup, slots: &[Slot]) -> SourceRows {
    let mut out = SourceRows::default();
    for &slot in slots {
        match extractor.extract(source, slot) {
            Ok(rows) => {
                logd!("{} / {}: {} rows", source.id(), slot, rows.len());
                out.rows.insert(slot, rows);
            }
            Err(e) => {
                loge!("{} / {}: extraction failed: {e}", source.id(), slot);
                out.rows.insert(slot, Vec::new());
                out.failures.push((slot, e.to_string()));
            }
        }
    }
    out
}

/// Fan out one task per source and wait for all of them.
///
/// Failures never propagate: a slot that fails is empty for that source, and a
/// source whose task dies contributes nothing.
pub fn collect_sources(
    extractor: Arc<dyn Extractor>,
    sources: &[Matchup],
    slots: &[Slot],
    mut progress: Option<&mut dyn Progress>,
) -> Collected {
    if let Some(p) = progress.as_deref_mut() {
        p.begin(sources.len());
    }

    let sources_arc = Arc::new(sources.to_vec());
    let slots_arc = Arc::new(slots.to_vec());
    let counter = Arc::new(AtomicUsize::new(0));
    let (res_tx, res_rx) = mpsc::channel::<(usize, SourceRows)>();

    let workers = WORKERS.min(sources.len()).max(1);

    for _ in 0..workers {
        let sources = Arc::clone(&sources_arc);
        let slots = Arc::clone(&slots_arc);
        let idx = Arc::clone(&counter);
        let ex = Arc::clone(&extractor);
        let tx = res_tx.clone();

        thread::spawn(move || {
            loop {
                let i = idx.fetch_add(1, Ordering::Relaxed);
                if i >= sources.len() {
                    break;
                }
                let rows = extract_source(ex.as_ref(), &sources[i], &slots);
                if tx.send((i, rows)).is_err() {
                    break;
                }
            }
        });
    }
    drop(res_tx); // main thread is sole receiver now

    let mut per_source: Vec<Option<SourceRows>> = vec![None; sources.len()];
    for _ in 0..sources.len() {
        match res_rx.recv() {
            Ok((i, rows)) => {
                let id = sources[i].id();
                let all_failed = !slots.is_empty() && rows.failures.len() == slots.len();
                if let Some(p) = progress.as_deref_mut() {
                    for (slot, reason) in &rows.failures {
                        p.log(&format!("{id} / {slot}: {reason}"));
                    }
                    if all_failed {
                        p.item_failed(&id, &rows.failures[0].1);
                    } else {
                        p.item_done(&id);
                    }
                }
                per_source[i] = Some(rows);
            }
            Err(_) => break, // a worker died; whatever is missing counts as zero rows
        }
    }

    if let Some(p) = progress.as_deref_mut() {
        p.finish();
    }

    let mut collected = Collected::default();
    for &slot in slots {
        collected.per_slot.insert(slot, Vec::with_capacity(sources.len()));
    }
    for (i, res) in per_source.into_iter().enumerate() {
        let id = sources[i].id();
        let Some(mut rows) = res else {
            loge!("{id}: no result from extraction task");
            collected.failed_sources.push(id);
            continue;
        };
        if !slots.is_empty() && rows.failures.len() == slots.len() {
            collected.failed_sources.push(id);
        }
        for &slot in slots {
            let slot_rows = rows.rows.remove(&slot).unwrap_or_default();
            if let Some(bucket) = collected.per_slot.get_mut(&slot) {
                bucket.push(slot_rows);
            }
        }
    }
    collected
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExtractError;

    struct Fixed;
    impl Extractor for Fixed {
        fn extract(&self, source: &Matchup, slot: Slot) -> Result<Vec<ObservationRow>, ExtractError> {
            match (source.opponent.as_str(), slot) {
                ("Down", _) => Err(ExtractError::Transport(s!("timeout"))),
                ("Panics", _) => panic!("collaborator crashed"),
                (_, Slot::Boots) => Err(ExtractError::Transport(s!("no boots"))),
                (opp, _) => Ok(vec![ObservationRow::new(opp, 50.0, 10.0, 100)]),
            }
        }
    }

    #[test]
    fn failures_become_empty_rows() {
        let sources = vec![
            Matchup::new("Ahri", "Zed"),
            Matchup::new("Ahri", "Down"),
            Matchup::new("Ahri", "Lux"),
        ];
        let slots = [Slot::Item1, Slot::Boots];
        let got = collect_sources(Arc::new(Fixed), &sources, &slots, None);

        let item1 = got.slot_sources(Slot::Item1);
        assert_eq!(item1.len(), 3);
        assert_eq!(item1[0][0].label, "Zed");
        assert!(item1[1].is_empty());
        assert_eq!(item1[2][0].label, "Lux");
        assert!(got.slot_sources(Slot::Boots).iter().all(|r| r.is_empty()));
        assert_eq!(got.failed_sources, vec![s!("ahri_vs_down")]);
    }

    #[test]
    fn dead_task_counts_as_zero_rows() {
        let sources = vec![Matchup::new("Ahri", "Panics"), Matchup::new("Ahri", "Zed")];
        let got = collect_sources(Arc::new(Fixed), &sources, &[Slot::Item1], None);
        let labels: Vec<_> = got.slot_sources(Slot::Item1).iter().flatten().map(|r| r.label.clone()).collect();
        assert_eq!(labels, vec![s!("Zed")]);
        assert!(got.failed_sources.contains(&s!("ahri_vs_panics")));
    }
}
