use crate::ports::{JumpCategory, RecentItemsPresenter};
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const JUMP_LIST_FILE_NAME: &str = "jumplist.json";

/// Recent-items presentation written as a JSON document, for desktop shells
/// or launchers that pick it up from disk. Every submit replaces the file.
#[derive(Debug, Clone)]
pub struct JumpListFile {
    path: PathBuf,
}

impl JumpListFile {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn in_dir<P: AsRef<Path>>(dir: P) -> Self {
        Self::new(dir.as_ref().join(JUMP_LIST_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<Vec<JumpCategory>> {
        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read jump list: {}", self.path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse jump list: {}", self.path.display()))
    }
}

impl RecentItemsPresenter for JumpListFile {
    fn submit(&mut self, categories: &[JumpCategory]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).context("Failed to create jump list directory")?;
        }

        let contents =
            serde_json::to_string_pretty(categories).context("Failed to serialize jump list")?;
        fs::write(&self.path, contents)
            .with_context(|| format!("Failed to write jump list: {}", self.path.display()))?;

        debug!("Jump list refreshed with {} categories", categories.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::JumpItem;
    use tempfile::TempDir;

    #[test]
    fn test_submit_replaces_file() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let mut jump_list = JumpListFile::in_dir(temp_dir.path().join("nested"));

        let first = vec![JumpCategory {
            name: "Recent".to_string(),
            items: vec![JumpItem {
                target: "/a/App.sln".to_string(),
                label: "App [main]".to_string(),
                icon: "/a/App.sln".to_string(),
            }],
        }];
        jump_list.submit(&first)?;
        assert_eq!(jump_list.load()?, first);

        jump_list.submit(&[])?;
        assert!(jump_list.load()?.is_empty());
        Ok(())
    }

    #[test]
    fn test_load_missing_file_errors() -> Result<()> {
        let temp_dir = TempDir::new()?;
        assert!(JumpListFile::in_dir(temp_dir.path()).load().is_err());
        Ok(())
    }
}
