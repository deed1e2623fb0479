use std::path::PathBuf;

use strum::Display;
use thiserror::Error;

/// Which sequence an index was resolved against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Level {
    Group,
    Task,
    Subtask,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("{level} index {index} out of range ({len} available)")]
    IndexOutOfRange {
        level: Level,
        index: usize,
        len: usize,
    },

    #[error("name must not be empty")]
    EmptyNameNotAllowed,

    #[error(
        "task '{task}' is done, its subtasks are locked; set it to todo or in-progress first"
    )]
    TaskLocked { task: String },

    #[error("storage file {} is corrupt", path.display())]
    StoreCorrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to access {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid settings file")]
    Settings(#[from] figment::Error),

    #[error("could not determine the home directory")]
    NoHomeDirectory,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
