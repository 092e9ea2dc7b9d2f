use crate::error::RefStoreError;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

const GIT_ENTRY: &str = ".git";
const HEAD_FILE: &str = "HEAD";
const BRANCH_REF_PREFIX: &str = "ref: refs/heads/";
const GITDIR_PREFIX: &str = "gitdir: ";

/// Length of the abbreviated commit id shown for a detached HEAD
pub const SHORT_ID_LEN: usize = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefKind {
    Branch,
    Detached,
    Unknown,
}

/// What HEAD points at, as read from disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefState {
    pub kind: RefKind,
    pub label: String,
}

impl RefState {
    pub fn branch(name: impl Into<String>) -> Self {
        Self {
            kind: RefKind::Branch,
            label: name.into(),
        }
    }

    pub fn detached(short_id: impl Into<String>) -> Self {
        Self {
            kind: RefKind::Detached,
            label: short_id.into(),
        }
    }

    pub fn unknown() -> Self {
        Self {
            kind: RefKind::Unknown,
            label: String::new(),
        }
    }

    /// True when the state carries a label worth showing
    pub fn is_resolved(&self) -> bool {
        self.kind != RefKind::Unknown && !self.label.is_empty()
    }

    /// Parse the content of a `HEAD` file.
    ///
    /// A symbolic ref into `refs/heads/` yields the branch name verbatim, without
    /// checking that the ref exists. Anything else of at least [`SHORT_ID_LEN`]
    /// characters is taken as a commit id and abbreviated.
    pub fn parse_head(content: &str) -> Self {
        let content = content.trim();

        if let Some(name) = content.strip_prefix(BRANCH_REF_PREFIX) {
            return Self::branch(name);
        }

        if content.chars().count() >= SHORT_ID_LEN {
            return Self::detached(content.chars().take(SHORT_ID_LEN).collect::<String>());
        }

        Self::unknown()
    }
}

/// Where the walk found the `.git` entry
#[derive(Debug, Clone, PartialEq, Eq)]
enum GitEntry {
    Directory(PathBuf),
    Pointer(PathBuf),
}

/// Reads the current ref straight from a working tree's metadata directory
#[derive(Debug, Default, Clone, Copy)]
pub struct RefStore;

impl RefStore {
    pub fn new() -> Self {
        Self
    }

    /// Resolve HEAD for the working tree containing `repo_root`.
    ///
    /// Every read failure collapses to [`RefKind::Unknown`]; use [`RefStore::probe`]
    /// to see the error.
    pub fn resolve<P: AsRef<Path>>(&self, repo_root: P) -> RefState {
        let repo_root = repo_root.as_ref();
        match self.probe(repo_root) {
            Ok(state) => state,
            Err(e) => {
                debug!("Ref metadata unreadable under {}: {}", repo_root.display(), e);
                RefState::unknown()
            }
        }
    }

    pub fn probe<P: AsRef<Path>>(&self, repo_root: P) -> Result<RefState, RefStoreError> {
        match self.metadata_dir(repo_root)? {
            Some(metadata_dir) => read_head(&metadata_dir),
            None => Ok(RefState::unknown()),
        }
    }

    /// Locate the metadata directory, following a linked-worktree pointer file.
    /// `None` when no ancestor carries a `.git` entry.
    pub fn metadata_dir<P: AsRef<Path>>(
        &self,
        repo_root: P,
    ) -> Result<Option<PathBuf>, RefStoreError> {
        match find_git_entry(repo_root.as_ref())? {
            Some(GitEntry::Directory(dir)) => Ok(Some(dir)),
            Some(GitEntry::Pointer(file)) => read_gitdir_pointer(&file).map(Some),
            None => Ok(None),
        }
    }
}

fn find_git_entry(start: &Path) -> Result<Option<GitEntry>, RefStoreError> {
    let start = std::path::absolute(start).unwrap_or_else(|_| start.to_path_buf());
    let mut current = start.as_path();

    loop {
        let candidate = current.join(GIT_ENTRY);
        match fs::metadata(&candidate) {
            Ok(meta) if meta.is_dir() => return Ok(Some(GitEntry::Directory(candidate))),
            Ok(meta) if meta.is_file() => return Ok(Some(GitEntry::Pointer(candidate))),
            Ok(_) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(source) => {
                return Err(RefStoreError::Io {
                    path: candidate,
                    source,
                });
            }
        }

        // Path::parent is None once the filesystem root is reached
        match current.parent() {
            Some(parent) if parent != current => current = parent,
            _ => return Ok(None),
        }
    }
}

fn read_gitdir_pointer(pointer_file: &Path) -> Result<PathBuf, RefStoreError> {
    let content = fs::read_to_string(pointer_file).map_err(|source| RefStoreError::Io {
        path: pointer_file.to_path_buf(),
        source,
    })?;

    let target = content
        .trim()
        .strip_prefix(GITDIR_PREFIX)
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| RefStoreError::MalformedPointer {
            path: pointer_file.to_path_buf(),
        })?;

    let target = PathBuf::from(target);
    if target.is_absolute() {
        return Ok(target);
    }

    let base = pointer_file.parent().unwrap_or_else(|| Path::new("."));
    Ok(base.join(target))
}

fn read_head(metadata_dir: &Path) -> Result<RefState, RefStoreError> {
    let head_path = metadata_dir.join(HEAD_FILE);
    let content = fs::read_to_string(&head_path).map_err(|source| RefStoreError::Io {
        path: head_path,
        source,
    })?;
    Ok(RefState::parse_head(&content))
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use tempfile::TempDir;

    fn write_git_dir(root: &Path, head: &str) -> Result<PathBuf> {
        let git_dir = root.join(".git");
        fs::create_dir_all(&git_dir)?;
        fs::write(git_dir.join("HEAD"), head)?;
        Ok(git_dir)
    }

    #[test]
    fn test_parse_head_branch() {
        assert_eq!(
            RefState::parse_head("ref: refs/heads/main\n"),
            RefState::branch("main")
        );
        assert_eq!(
            RefState::parse_head("ref: refs/heads/feature/x"),
            RefState::branch("feature/x")
        );
    }

    #[test]
    fn test_parse_head_detached() {
        let state = RefState::parse_head("0123456789abcdef0123456789abcdef01234567\n");
        assert_eq!(state, RefState::detached("0123456"));
        assert!(state.is_resolved());
    }

    #[test]
    fn test_parse_head_too_short_is_unknown() {
        // Shorter than a short id: no truncated label
        assert_eq!(RefState::parse_head("abc12"), RefState::unknown());
        assert_eq!(RefState::parse_head(""), RefState::unknown());
        assert!(!RefState::parse_head("abc").is_resolved());
    }

    #[test]
    fn test_parse_head_other_symbolic_ref() {
        // Not a local branch, treated as raw content like any other text
        let state = RefState::parse_head("ref: refs/remotes/origin/main");
        assert_eq!(state.kind, RefKind::Detached);
        assert_eq!(state.label, "ref: re");
    }

    #[test]
    fn test_resolve_from_nested_directory() -> Result<()> {
        let temp_dir = TempDir::new()?;
        write_git_dir(temp_dir.path(), "ref: refs/heads/feature/x\n")?;

        let nested = temp_dir.path().join("src").join("deep").join("er");
        fs::create_dir_all(&nested)?;

        let store = RefStore::new();
        assert_eq!(store.resolve(temp_dir.path()), RefState::branch("feature/x"));
        assert_eq!(store.resolve(&nested), RefState::branch("feature/x"));
        Ok(())
    }

    #[test]
    fn test_nearest_git_entry_wins() -> Result<()> {
        let temp_dir = TempDir::new()?;
        write_git_dir(temp_dir.path(), "ref: refs/heads/outer\n")?;
        let inner = temp_dir.path().join("vendor").join("inner");
        fs::create_dir_all(&inner)?;
        write_git_dir(&inner, "ref: refs/heads/inner\n")?;

        assert_eq!(RefStore::new().resolve(&inner), RefState::branch("inner"));
        Ok(())
    }

    #[test]
    fn test_relative_worktree_pointer() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let main_git = write_git_dir(&temp_dir.path().join("main"), "ref: refs/heads/main\n")?;
        let wt_meta = main_git.join("worktrees").join("topic");
        fs::create_dir_all(&wt_meta)?;
        fs::write(wt_meta.join("HEAD"), "ref: refs/heads/topic\n")?;

        let worktree = temp_dir.path().join("topic");
        fs::create_dir_all(&worktree)?;
        fs::write(worktree.join(".git"), "gitdir: ../main/.git/worktrees/topic\n")?;

        let store = RefStore::new();
        assert_eq!(store.resolve(&worktree), RefState::branch("topic"));
        assert_eq!(store.resolve(&worktree), read_head(&wt_meta)?);
        Ok(())
    }

    #[test]
    fn test_absolute_worktree_pointer() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let meta = temp_dir.path().join("meta");
        fs::create_dir_all(&meta)?;
        fs::write(meta.join("HEAD"), "fedcba9876543210fedcba9876543210fedcba98")?;

        let worktree = temp_dir.path().join("wt");
        fs::create_dir_all(&worktree)?;
        fs::write(worktree.join(".git"), format!("gitdir: {}\n", meta.display()))?;

        assert_eq!(RefStore::new().resolve(&worktree), RefState::detached("fedcba9"));
        Ok(())
    }

    #[test]
    fn test_malformed_pointer() -> Result<()> {
        let temp_dir = TempDir::new()?;
        fs::write(temp_dir.path().join(".git"), "this is not a pointer")?;

        let store = RefStore::new();
        assert!(matches!(
            store.probe(temp_dir.path()),
            Err(RefStoreError::MalformedPointer { .. })
        ));
        assert_eq!(store.resolve(temp_dir.path()), RefState::unknown());
        Ok(())
    }

    #[test]
    fn test_missing_head_is_an_error() -> Result<()> {
        let temp_dir = TempDir::new()?;
        fs::create_dir_all(temp_dir.path().join(".git"))?;

        let store = RefStore::new();
        assert!(matches!(
            store.probe(temp_dir.path()),
            Err(RefStoreError::Io { .. })
        ));
        assert_eq!(store.resolve(temp_dir.path()), RefState::unknown());
        Ok(())
    }

    #[test]
    fn test_metadata_dir_follows_pointer() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let meta = temp_dir.path().join("elsewhere");
        fs::create_dir_all(&meta)?;
        let worktree = temp_dir.path().join("wt");
        fs::create_dir_all(&worktree)?;
        fs::write(worktree.join(".git"), "gitdir: ../elsewhere")?;

        let found = RefStore::new().metadata_dir(&worktree)?;
        assert_eq!(found, Some(worktree.join("../elsewhere")));
        Ok(())
    }
}
