// src/config/consts.rs

// Source
pub const URL_TMPL: &str = "https://lolalytics.com/lol/{subject}/vs/{opponent}/build/?patch={patch}";
pub const PATCH: &str = "30";

// Input bounds
pub const MAX_OPPONENTS: usize = 5;

// List traversal
pub const MAX_STEPS: usize = 200;
pub const STABILITY_WINDOW: usize = 4;
pub const CAPTURE_VIEWPORT: usize = 6; // cards visible at once when replaying captures

// Scoring
pub const HARD_MIN_FRAC: f64 = 0.01;
pub const HARD_MIN_FLOOR: u64 = 30;
pub const SOFT_MIN_FRAC: f64 = 0.005;
pub const SOFT_MIN_FLOOR: u64 = 15;
pub const PRIOR_FRAC: f64 = 0.10;
pub const PRIOR_CAP: u64 = 300;

// Selection
pub const DEFAULT_BETA: f64 = 0.25;
pub const DEFAULT_MIN_PR: f64 = 4.0;
pub const TIE_MARGIN: f64 = 0.05;

// Export
pub const DEFAULT_OUT_DIR: &str = "out";
pub const DEFAULT_CAPTURE_DIR: &str = "captures";
pub const DEFAULT_TOP_N: usize = 4;
pub const EXPORT_COLUMNS: [&str; 7] = ["label", "win_rate", "pick_rate", "games", "wr_eb", "share", "score"];

// Concurrency
pub const WORKERS: usize = 5;
