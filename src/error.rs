// src/error.rs
use std::path::PathBuf;

/// Caller input rejected before any extraction starts.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum InputError {
    #[error("missing subject: pass --subject <name>")]
    MissingSubject,

    #[error("at least one opponent is required")]
    NoOpponents,

    #[error("too many opponents: got {got}, at most {max} are accepted")]
    TooManyOpponents { got: usize, max: usize },

    #[error("unknown slot: {0} (expected item1|boots|item2|item3|item4|item5|all)")]
    UnknownSlot(String),

    #[error("no slots selected")]
    NoSlots,

    #[error("invalid value for {flag}: {value}")]
    InvalidValue { flag: &'static str, value: String },

    #[error("missing value for {0}")]
    MissingValue(&'static str),

    #[error("unknown argument: {0}")]
    UnknownArg(String),
}

/// Failure of one source/slot extraction. Recovered as "zero rows" by the collector.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("capture not found: {}", .0.display())]
    CaptureMissing(PathBuf),

    #[error("read failed for {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("transport failure: {0}")]
    Transport(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("path exists but is not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("write failed for {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("payload encoding failed: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Export(#[from] ExportError),
}
