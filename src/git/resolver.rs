use crate::error::CommandError;
use crate::git::refstore::RefStore;
use crate::ports::BranchSource;
use std::path::Path;
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};
use tracing::debug;

pub const DEFAULT_GIT_PROGRAM: &str = "git";
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(5);

// Placeholder git prints for a detached HEAD
const DETACHED_PLACEHOLDER: &str = "HEAD";
const POLL_STEP: Duration = Duration::from_millis(20);

#[cfg(windows)]
const CREATE_NO_WINDOW: u32 = 0x0800_0000;

/// `git rev-parse --abbrev-ref HEAD` with a bounded wait
#[derive(Debug, Clone)]
pub struct GitCommand {
    program: String,
    timeout: Duration,
}

impl Default for GitCommand {
    fn default() -> Self {
        Self::new(DEFAULT_GIT_PROGRAM, DEFAULT_COMMAND_TIMEOUT)
    }
}

impl GitCommand {
    pub fn new(program: impl Into<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            timeout,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Ask git for the abbreviated name of HEAD in `workdir`.
    ///
    /// Returns `Ok(None)` when git succeeds but has no branch to report
    /// (empty output or the `HEAD` placeholder of a detached checkout).
    pub fn abbrev_ref(&self, workdir: &Path) -> Result<Option<String>, CommandError> {
        let mut command = Command::new(&self.program);
        command
            .args(["rev-parse", "--abbrev-ref", "HEAD"])
            .current_dir(workdir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null());

        #[cfg(windows)]
        {
            use std::os::windows::process::CommandExt;
            command.creation_flags(CREATE_NO_WINDOW);
        }

        let mut child = command.spawn().map_err(|source| CommandError::Spawn {
            program: self.program.clone(),
            source,
        })?;

        let deadline = Instant::now() + self.timeout;
        loop {
            match child.try_wait() {
                Ok(Some(_)) => break,
                Ok(None) if Instant::now() >= deadline => {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(CommandError::TimedOut {
                        timeout: self.timeout,
                    });
                }
                Ok(None) => thread::sleep(POLL_STEP),
                Err(source) => {
                    let _ = child.kill();
                    return Err(CommandError::Wait { source });
                }
            }
        }

        let output = child
            .wait_with_output()
            .map_err(|source| CommandError::Wait { source })?;
        if !output.status.success() {
            return Err(CommandError::Failed {
                status: output.status,
            });
        }

        let stdout = String::from_utf8(output.stdout).map_err(|_| CommandError::InvalidOutput)?;
        let name = stdout.trim();
        if name.is_empty() || name == DETACHED_PLACEHOLDER {
            return Ok(None);
        }
        Ok(Some(name.to_string()))
    }
}

/// Branch label for a working tree: on-disk metadata first, git itself as a last resort
#[derive(Debug, Clone, Default)]
pub struct BranchResolver {
    refs: RefStore,
    command: GitCommand,
}

impl BranchResolver {
    pub fn new(command: GitCommand) -> Self {
        Self {
            refs: RefStore::new(),
            command,
        }
    }

    /// Empty string means there is no usable branch
    pub fn resolve<P: AsRef<Path>>(&self, repo_root: P) -> String {
        let repo_root = repo_root.as_ref();

        let state = self.refs.resolve(repo_root);
        if state.is_resolved() {
            return state.label;
        }

        match self.command.abbrev_ref(repo_root) {
            Ok(Some(name)) => name,
            Ok(None) => String::new(),
            Err(e) => {
                debug!("git fallback failed in {}: {}", repo_root.display(), e);
                String::new()
            }
        }
    }
}

impl BranchSource for BranchResolver {
    fn current_branch(&self, repo_root: &Path) -> String {
        self.resolve(repo_root)
    }
}
