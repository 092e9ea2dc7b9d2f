//! branch-titlebar library
//!
//! Resolves the current Git branch of a working tree from its on-disk metadata
//! and keeps a window title plus a recent-items list in sync with it.

pub mod adapters;
pub mod cli;
pub mod config;
pub mod driver;
pub mod error;
pub mod git;
pub mod ports;
pub mod recent;
pub mod sync;

// Re-exports for ergonomics
pub use error::*;
pub use git::{BranchResolver, RefKind, RefState, RefStore};
pub use sync::{SyncState, TickOutcome, TitleSynchronizer};
