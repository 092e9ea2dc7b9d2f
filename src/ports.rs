//! Interfaces to the host the synchronizer runs inside.
//!
//! The loop only talks to the project model, the window title and the
//! recent-items presentation through these traits; `crate::adapters` holds the
//! implementations used by the binary.

use crate::error::TitleError;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The project currently open in the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectSnapshot {
    /// Shown in the title, e.g. `App` for `App.sln`
    pub identifier: String,
    /// Directory the branch is resolved from
    pub root: PathBuf,
    /// Key of the project's recent entry
    pub path: PathBuf,
}

impl ProjectSnapshot {
    /// Derive a snapshot from a project file (`App.sln` → identifier `App`,
    /// root = containing directory) or from a project folder. Relative paths
    /// are made absolute against the current directory.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Self> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return None;
        }
        let absolute = std::path::absolute(path).ok()?;
        let path = absolute.as_path();

        if path.is_dir() {
            let identifier = path.file_name()?.to_string_lossy().to_string();
            return Some(Self {
                identifier,
                root: path.to_path_buf(),
                path: path.to_path_buf(),
            });
        }

        let identifier = path.file_stem()?.to_string_lossy().to_string();
        Some(Self {
            identifier,
            root: path.parent()?.to_path_buf(),
            path: path.to_path_buf(),
        })
    }
}

/// Host project model
pub trait ProjectModel {
    /// `None` when no project is open
    fn active_project(&self) -> Option<ProjectSnapshot>;
}

/// Resolves the branch label for a working tree; empty means none
pub trait BranchSource {
    fn current_branch(&self, repo_root: &Path) -> String;
}

/// The host window's title bar
pub trait TitleSurface {
    /// Current title, `None` when it cannot be read
    fn read_title(&self) -> Option<String>;

    /// Replace the title. `current` is the title the window is believed to carry;
    /// surfaces that locate their window by title use it as the matcher.
    fn write_title(&mut self, current: &str, new_title: &str) -> Result<(), TitleError>;
}

/// One entry of the recent-items presentation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JumpItem {
    pub target: String,
    pub label: String,
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JumpCategory {
    pub name: String,
    pub items: Vec<JumpItem>,
}

/// OS recent-items menu
pub trait RecentItemsPresenter: Send {
    /// Replace the whole presentation with `categories` and refresh it
    fn submit(&mut self, categories: &[JumpCategory]) -> Result<()>;
}
