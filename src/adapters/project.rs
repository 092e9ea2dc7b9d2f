use crate::ports::{ProjectModel, ProjectSnapshot};
use std::path::{Path, PathBuf};

/// Project model backed by a project file (or folder) given on the command line.
/// The snapshot is derived again on every call so renames on disk are picked up.
#[derive(Debug, Clone, Default)]
pub struct ProjectFile {
    path: Option<PathBuf>,
}

impl ProjectFile {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: Some(path.as_ref().to_path_buf()),
        }
    }

    /// No project open
    pub fn none() -> Self {
        Self { path: None }
    }
}

impl ProjectModel for ProjectFile {
    fn active_project(&self) -> Option<ProjectSnapshot> {
        self.path.as_deref().and_then(ProjectSnapshot::from_path)
    }
}
