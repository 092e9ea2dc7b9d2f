use crate::error::RecentStoreError;
use crate::ports::{JumpCategory, JumpItem, RecentItemsPresenter};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

pub const RECENT_FILE_NAME: &str = "recentjumplist.json";
pub const FALLBACK_CATEGORY: &str = "Recent";

/// One remembered project and the branch it was last seen on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RecentEntry {
    pub path: String,
    #[serde(rename = "BranchName", default)]
    pub branch_label: String,
}

impl RecentEntry {
    pub fn new(path: impl Into<String>, branch_label: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            branch_label: branch_label.into(),
        }
    }

    pub fn same_path(&self, other: &str) -> bool {
        self.path.to_lowercase() == other.to_lowercase()
    }
}

/// Caps applied when building the presentation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecentLimits {
    pub max_categories: usize,
    pub max_items_per_category: usize,
    pub max_fallback_items: usize,
}

impl Default for RecentLimits {
    fn default() -> Self {
        Self {
            max_categories: 5,
            max_items_per_category: 5,
            max_fallback_items: 10,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Stored,
    /// The project file is gone, nothing was written
    MissingProject,
}

/// Persisted most-recent-first list of projects, mirrored into the recent-items menu
pub struct RecentEntryStore<P> {
    file: PathBuf,
    limits: RecentLimits,
    presenter: P,
}

impl<P: RecentItemsPresenter> RecentEntryStore<P> {
    pub fn new<F: AsRef<Path>>(file: F, limits: RecentLimits, presenter: P) -> Self {
        Self {
            file: file.as_ref().to_path_buf(),
            limits,
            presenter,
        }
    }

    /// Store inside `data_dir` under the default file name
    pub fn in_dir<D: AsRef<Path>>(data_dir: D, limits: RecentLimits, presenter: P) -> Self {
        Self::new(data_dir.as_ref().join(RECENT_FILE_NAME), limits, presenter)
    }

    pub fn file(&self) -> &Path {
        &self.file
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    /// The persisted list; a missing or unreadable file reads as empty
    pub fn load(&self) -> Vec<RecentEntry> {
        let contents = match fs::read_to_string(&self.file) {
            Ok(contents) => contents,
            Err(e) => {
                if e.kind() != std::io::ErrorKind::NotFound {
                    warn!("Failed to read {}: {}", self.file.display(), e);
                }
                return Vec::new();
            }
        };

        match serde_json::from_str(&contents) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Ignoring corrupt recent list {}: {}", self.file.display(), e);
                Vec::new()
            }
        }
    }

    /// Move `path` to the front with `branch_label`, persist, and refresh the menu
    pub fn upsert<Q: AsRef<Path>>(
        &mut self,
        path: Q,
        branch_label: &str,
    ) -> Result<UpsertOutcome, RecentStoreError> {
        let path = path.as_ref();
        if !path.exists() {
            debug!("Skipping recent entry for missing project {}", path.display());
            return Ok(UpsertOutcome::MissingProject);
        }

        let key = path.to_string_lossy().to_string();
        let mut entries = self.load();
        entries.retain(|e| !e.same_path(&key));
        entries.insert(0, RecentEntry::new(key, branch_label));

        self.save(&entries)?;

        let categories = build_presentation(&entries, &self.limits);
        self.presenter
            .submit(&categories)
            .map_err(|source| RecentStoreError::Presenter { source })?;

        info!(
            "Recorded {} on branch {:?} ({} recent entries)",
            path.display(),
            branch_label,
            entries.len()
        );
        Ok(UpsertOutcome::Stored)
    }

    fn save(&self, entries: &[RecentEntry]) -> Result<(), RecentStoreError> {
        if let Some(parent) = self.file.parent() {
            fs::create_dir_all(parent).map_err(|source| RecentStoreError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let json = serde_json::to_string(entries)
            .map_err(|source| RecentStoreError::Serialize { source })?;
        fs::write(&self.file, json).map_err(|source| RecentStoreError::Io {
            path: self.file.clone(),
            source,
        })
    }
}

/// File name without extension. Accepts both separators so entries written on
/// another platform still group.
pub fn display_name(path: &str) -> &str {
    let file = path.rsplit(['/', '\\']).next().unwrap_or(path);
    match file.rfind('.') {
        Some(dot) if dot > 0 => &file[..dot],
        _ => file,
    }
}

/// Everything before the last separator, empty for a bare file name
pub fn containing_dir(path: &str) -> &str {
    match path.rfind(['/', '\\']) {
        Some(idx) => &path[..idx],
        None => "",
    }
}

/// Group entries into dedicated per-project categories plus a fallback list
pub fn build_presentation(entries: &[RecentEntry], limits: &RecentLimits) -> Vec<JumpCategory> {
    // Groups in order of their most recent member
    let mut groups: Vec<(String, Vec<&RecentEntry>)> = Vec::new();
    for entry in entries {
        let key = display_name(&entry.path).to_lowercase();
        match groups.iter_mut().find(|(k, _)| *k == key) {
            Some((_, members)) => members.push(entry),
            None => groups.push((key, vec![entry])),
        }
    }

    let mut categories = Vec::new();
    let mut absorbed: Vec<&str> = Vec::new();

    for (_, members) in &groups {
        if categories.len() >= limits.max_categories {
            break;
        }
        let has_branch = members.iter().any(|e| !e.branch_label.is_empty());
        if members.len() < 2 || !has_branch {
            continue;
        }

        let items = members
            .iter()
            .take(limits.max_items_per_category)
            .map(|e| {
                let label = if e.branch_label.is_empty() {
                    containing_dir(&e.path).to_string()
                } else {
                    e.branch_label.clone()
                };
                link(&e.path, label)
            })
            .collect();

        categories.push(JumpCategory {
            name: display_name(&members[0].path).to_string(),
            items,
        });
        absorbed.extend(members.iter().map(|e| e.path.as_str()));
    }

    let fallback: Vec<JumpItem> = entries
        .iter()
        .filter(|e| !absorbed.contains(&e.path.as_str()))
        .take(limits.max_fallback_items)
        .map(|e| {
            let name = display_name(&e.path);
            let label = if e.branch_label.is_empty() {
                name.to_string()
            } else {
                format!("{} [{}]", name, e.branch_label)
            };
            link(&e.path, label)
        })
        .collect();

    if !fallback.is_empty() {
        categories.push(JumpCategory {
            name: FALLBACK_CATEGORY.to_string(),
            items: fallback,
        });
    }

    categories
}

fn link(path: &str, label: String) -> JumpItem {
    JumpItem {
        target: path.to_string(),
        label,
        icon: path.to_string(),
    }
}
