use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid glob pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("Watched folder not found: {}", .0.display())]
    RootNotFound(PathBuf),

    #[error("Log store error at {}: {source}", .path.display())]
    LogStore {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Why a single snapshot entry could not be relocated.
#[derive(Error, Debug)]
pub enum MoveError {
    #[error("source vanished before it could be moved")]
    SourceVanished,

    #[error("could not create {}: {source}", .dir.display())]
    CreateDir {
        dir: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("no free name left in {} after {attempts} attempts", .dir.display())]
    TargetExists { dir: PathBuf, attempts: u32 },

    #[error("could not move to {}: {source}", .target.display())]
    Rename {
        target: PathBuf,
        #[source]
        source: io::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
