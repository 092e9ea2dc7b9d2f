use std::path::PathBuf;
use std::process::ExitStatus;
use std::time::Duration;
use thiserror::Error;

/// Failures while reading Git metadata from disk
#[derive(Error, Debug)]
pub enum RefStoreError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Malformed gitdir pointer in {path}")]
    MalformedPointer { path: PathBuf },
}

/// Failures of the `git rev-parse` fallback
#[derive(Error, Debug)]
pub enum CommandError {
    #[error("Failed to launch {program}: {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },

    #[error("Failed while waiting for git: {source}")]
    Wait { source: std::io::Error },

    #[error("git did not finish within {timeout:?}")]
    TimedOut { timeout: Duration },

    #[error("git exited with {status}")]
    Failed { status: ExitStatus },

    #[error("git printed non UTF-8 output")]
    InvalidOutput,
}

/// Failures of the external window-title primitive
#[derive(Error, Debug)]
pub enum TitleError {
    #[error("No window matched title {matcher:?}")]
    Rejected { matcher: String },

    #[error("Failed to write window title: {source}")]
    Io { source: std::io::Error },
}

/// Failures while persisting or presenting recent entries
#[derive(Error, Debug)]
pub enum RecentStoreError {
    #[error("Failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to serialize recent entries: {source}")]
    Serialize { source: serde_json::Error },

    #[error("Recent-items presenter failed: {source}")]
    Presenter { source: anyhow::Error },
}
