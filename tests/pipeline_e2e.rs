// tests/pipeline_e2e.rs
//
// Full runs through `runner::run` with an in-memory extractor and with
// captures on disk. Export files land in a temp dir.
//
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};

use build_scout::config::Slot;
use build_scout::config::options::{ExportFormat, RunOptions};
use build_scout::error::{ExtractError, InputError, PipelineError};
use build_scout::extract::{CaptureExtractor, Extractor, Matchup, ObservationRow, TraversalPolicy};
use build_scout::progress::Progress;
use build_scout::runner;
use build_scout::stats::ScorePass;

/// Rows keyed by (opponent, slot). Unknown pairs are empty; listed opponents fail.
#[derive(Default)]
struct FakeExtractor {
    rows: HashMap<(String, Slot), Vec<ObservationRow>>,
    failing: Vec<String>,
}

impl FakeExtractor {
    fn with(mut self, opponent: &str, slot: Slot, rows: Vec<ObservationRow>) -> Self {
        self.rows.insert((opponent.to_string(), slot), rows);
        self
    }
    fn failing(mut self, opponent: &str) -> Self {
        self.failing.push(opponent.to_string());
        self
    }
}

impl Extractor for FakeExtractor {
    fn extract(&self, source: &Matchup, slot: Slot) -> Result<Vec<ObservationRow>, ExtractError> {
        if self.failing.contains(&source.opponent) {
            return Err(ExtractError::Transport(format!("{} unreachable", source.url())));
        }
        Ok(self.rows.get(&(source.opponent.clone(), slot)).cloned().unwrap_or_default())
    }
}

#[derive(Default)]
struct Recorder {
    events: Arc<Mutex<Vec<String>>>,
}

impl Progress for Recorder {
    fn begin(&mut self, total: usize) { self.push(format!("begin {total}")); }
    fn item_done(&mut self, source: &str) { self.push(format!("done {source}")); }
    fn item_failed(&mut self, source: &str, _reason: &str) { self.push(format!("failed {source}")); }
    fn log(&mut self, msg: &str) { self.push(format!("log {msg}")); }
    fn finish(&mut self) { self.push("finish".to_string()); }
}

impl Recorder {
    fn push(&self, e: String) { self.events.lock().unwrap().push(e); }
}

fn row(label: &str, wr: f64, pr: f64, games: u64) -> ObservationRow {
    ObservationRow::new(label, wr, pr, games)
}

fn opts(out: &Path, opponents: &[&str], slots: &[Slot]) -> RunOptions {
    let mut o = RunOptions::default();
    o.subject = "Ahri".into();
    o.opponents = opponents.iter().map(|s| s.to_string()).collect();
    o.slots = slots.to_vec();
    o.export.out_dir = out.to_path_buf();
    o
}

#[test]
fn two_sources_one_label_picked_once() {
    let tmp = tempfile::tempdir().unwrap();
    let ex = FakeExtractor::default()
        .with("Zed", Slot::Item1, vec![row("X", 55.0, 40.0, 200)])
        .with("Lux", Slot::Item1, vec![row("X", 45.0, 30.0, 100)])
        .with("Zed", Slot::Item2, vec![row("X", 55.0, 40.0, 200)])
        .with("Lux", Slot::Item2, vec![row("X", 45.0, 30.0, 100)]);

    let o = opts(tmp.path(), &["Zed", "Lux"], &[Slot::Item1, Slot::Item2]);
    let report = runner::run(&o, Arc::new(ex), None).unwrap();

    let item1 = &report.rankings[&Slot::Item1];
    assert_eq!(item1.pass, ScorePass::Strict);
    assert_eq!(item1.candidates.len(), 1);
    let x = &item1.candidates[0];
    assert!((x.win_rate - 51.6667).abs() < 1e-3);
    assert_eq!(x.games, 300);
    assert_eq!(x.pick_rate, 100.0);

    // X can only be used once
    assert_eq!(report.plan.len(), 1);
    assert_eq!(report.plan.selections[0].slot, Slot::Item1);
    assert!(report.plan.get(Slot::Item2).is_none());

    let v: serde_json::Value = serde_json::from_str(&report.payload(0.25).to_json().unwrap()).unwrap();
    assert_eq!(v["title"], "Optimal build (sequential pick with popularity bonus, beta=0.25)");
    assert_eq!(v["items"].as_array().unwrap().len(), 1);
    assert_eq!(v["items"][0]["slot"], "Item 1");
    assert_eq!(v["items"][0]["label"], "X");
    assert_eq!(v["items"][0]["win_rate_eb"], 51.67);
    assert_eq!(v["items"][0]["pick_rate"], 100.0);
    assert_eq!(v["items"][0]["games"], 300);
    assert_eq!(v["items"][0]["adj_score"], 54.167);
}

#[test]
fn export_files_follow_the_naming_scheme() {
    let tmp = tempfile::tempdir().unwrap();
    let out = tmp.path().join("nested").join("out");
    let ex = FakeExtractor::default().with(
        "Kai'Sa",
        Slot::Boots,
        vec![
            row("Sorcerer's Shoes", 52.0, 60.0, 900),
            row("Mercury's Treads", 50.5, 25.0, 400),
            row("Ionian Boots", 49.0, 10.0, 150),
            row("Swiftness", 48.0, 3.0, 45),
            row("Berserker's", 47.0, 2.0, 35),
        ],
    );

    let mut o = opts(&out, &["Kai'Sa", "Miss Fortune"], &[Slot::Boots, Slot::Item1]);
    o.export.format = ExportFormat::Tsv;
    o.export.top_n = 3;
    let report = runner::run(&o, Arc::new(ex), None).unwrap();

    let boots = out.join("ahri_vs_kaisa_missfortune_boots.tsv");
    let item1 = out.join("ahri_vs_kaisa_missfortune_item1.tsv");
    assert_eq!(report.files_written.len(), 2);
    assert!(report.files_written.contains(&boots));
    assert!(report.files_written.contains(&item1));

    let text = fs::read_to_string(&boots).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "label\twin_rate\tpick_rate\tgames\twr_eb\tshare\tscore");
    assert_eq!(lines.len(), 4);
    assert!(lines[1].starts_with("Sorcerer's Shoes\t"));

    // empty slot still gets a header-only file
    let text = fs::read_to_string(&item1).unwrap();
    assert_eq!(text.lines().count(), 1);
}

#[test]
fn failed_source_counts_as_zero_rows() {
    let tmp = tempfile::tempdir().unwrap();
    let ex = FakeExtractor::default()
        .with("Zed", Slot::Item1, vec![row("A", 53.0, 50.0, 400), row("B", 50.0, 50.0, 400)])
        .failing("Lux");

    let mut o = opts(tmp.path(), &["Zed", "Lux"], &[Slot::Item1]);
    o.export.enabled = false;
    let mut progress = Recorder::default();
    let events = Arc::clone(&progress.events);
    let report = runner::run(&o, Arc::new(ex), Some(&mut progress)).unwrap();

    assert!(report.files_written.is_empty());
    assert_eq!(report.failed_sources, vec!["ahri_vs_lux".to_string()]);
    assert_eq!(report.rankings[&Slot::Item1].thresholds.total_games, 800);
    assert_eq!(report.plan.selections[0].label, "A");

    let events = events.lock().unwrap();
    assert_eq!(events.first().map(String::as_str), Some("begin 2"));
    assert_eq!(events.last().map(String::as_str), Some("finish"));
    assert!(events.contains(&"done ahri_vs_zed".to_string()));
    assert!(events.contains(&"failed ahri_vs_lux".to_string()));
    assert!(events.iter().any(|e| e.starts_with("log ahri_vs_lux / item1: transport failure")));
    assert!(!events.iter().any(|e| e.starts_with("log ahri_vs_zed")));
}

#[test]
fn invalid_options_stop_before_extraction() {
    let tmp = tempfile::tempdir().unwrap();
    let o = opts(tmp.path(), &[], &[Slot::Item1]);
    let err = runner::run(&o, Arc::new(FakeExtractor::default()), None).unwrap_err();
    assert!(matches!(err, PipelineError::Input(InputError::NoOpponents)));
    assert_eq!(fs::read_dir(tmp.path()).unwrap().count(), 0);
}

fn write_capture(dir: &Path, matchup: &str, slot: &str, body: &str) {
    let d = dir.join(matchup);
    fs::create_dir_all(&d).unwrap();
    fs::write(d.join(slot), body).unwrap();
}

#[test]
fn captures_replay_through_the_list_walk() {
    let tmp = tempfile::tempdir().unwrap();
    let caps = tmp.path().join("captures");

    let mut tsv = String::from("label\twin_rate\tpick_rate\tgames\n");
    for i in 0..25 {
        tsv.push_str(&format!("Item {i}\t{}%\t{}%\t{}\n", 45 + i % 10, 4, 100 + i * 10));
    }
    // card that never finished rendering
    tsv.push_str("Ghost\t51%\t\t\n");
    write_capture(&caps, "ahri_vs_zed", "item1.tsv", &tsv);
    write_capture(&caps, "ahri_vs_lux", "item1.csv", "Item 3,\"60,0 %\",5%,\"1 000\"\n");

    let ex = CaptureExtractor::new(&caps, TraversalPolicy::default()).with_viewport(4);
    let zed = ex.extract(&Matchup::new("Ahri", "Zed"), Slot::Item1).unwrap();
    assert_eq!(zed.len(), 25);
    assert!(zed.iter().all(|r| r.label != "Ghost"));

    let lux = ex.extract(&Matchup::new("Ahri", "Lux"), Slot::Item1).unwrap();
    assert_eq!(lux, vec![ObservationRow::new("Item 3", 60.0, 5.0, 1000)]);

    let missing = ex.extract(&Matchup::new("Ahri", "Lux"), Slot::Boots);
    assert!(matches!(missing, Err(ExtractError::CaptureMissing(_))));

    let mut o = opts(&tmp.path().join("out"), &["Zed", "Lux"], &[Slot::Item1, Slot::Boots]);
    o.export.enabled = false;
    let report = runner::run(&o, Arc::new(ex), None).unwrap();
    // Item 3: 130 games at 48% from Zed plus 1000 at 60% from Lux
    let item3 = report.rankings[&Slot::Item1].candidates.iter().find(|c| c.label == "Item 3").unwrap();
    assert_eq!(item3.games, 1130);
    assert!(report.rankings[&Slot::Boots].candidates.is_empty());
    assert_eq!(report.rankings[&Slot::Boots].pass, ScorePass::Unweighted);
}
