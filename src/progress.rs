// src/progress.rs
/// Progress reporting for the extraction fan-out.
/// Frontends implement this to surface status to users.
pub trait Progress {
    /// Called at the start with the number of sources.
    fn begin(&mut self, _total: usize) {}

    /// Free-form status line for human eyes.
    fn log(&mut self, _msg: &str) {}

    /// One source finished with at least one slot extracted.
    fn item_done(&mut self, _source: &str) {}

    /// One source produced nothing usable; it counts as zero rows.
    fn item_failed(&mut self, _source: &str, _reason: &str) {}

    /// Called at the end, successful or not.
    fn finish(&mut self) {}
}

/// Line-per-event progress on stderr, for the CLI.
#[derive(Default)]
pub struct StderrProgress {
    done: usize,
    failed: usize,
    total: usize,
}

impl Progress for StderrProgress {
    fn begin(&mut self, total: usize) {
        self.total = total;
        eprintln!("Extracting {total} matchup(s)…");
    }
    fn log(&mut self, msg: &str) {
        eprintln!("{msg}");
    }
    fn item_done(&mut self, source: &str) {
        self.done += 1;
        eprintln!("  {source} ({}/{})", self.done + self.failed, self.total);
    }
    fn item_failed(&mut self, source: &str, reason: &str) {
        self.failed += 1;
        eprintln!("  {source} FAILED: {reason} ({}/{})", self.done + self.failed, self.total);
    }
    fn finish(&mut self) {
        if self.failed == 0 {
            eprintln!("Extraction complete ({}/{})", self.done, self.total);
        } else {
            eprintln!("Extraction complete ({} ok, {} failed)", self.done, self.failed);
        }
    }
}
