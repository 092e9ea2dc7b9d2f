use crate::ports::{BranchSource, ProjectSnapshot, RecentItemsPresenter, TitleSurface};
use crate::recent::{RecentEntryStore, UpsertOutcome};
use std::thread;
use tracing::{debug, info, warn};

const RECENT_WORKER_NAME: &str = "recent-items";

/// What the synchronizer last pushed out. Owned by the UI loop and lent to
/// each tick; never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncState {
    pub last_applied_branch: String,
    pub last_applied_title: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    NoProject,
    NoBranch,
    /// The title surface refused the new title; state was left as is
    TitleRejected,
    Synced {
        title_changed: bool,
        recent_updated: bool,
    },
}

pub fn format_title(identifier: &str, branch: &str) -> String {
    format!("{} - [{}]", identifier, branch)
}

pub struct TitleSynchronizer<B, T, P> {
    branches: B,
    title: T,
    recent: RecentEntryStore<P>,
}

impl<B, T, P> TitleSynchronizer<B, T, P>
where
    B: BranchSource,
    T: TitleSurface,
    P: RecentItemsPresenter,
{
    pub fn new(branches: B, title: T, recent: RecentEntryStore<P>) -> Self {
        Self {
            branches,
            title,
            recent,
        }
    }

    pub fn title_surface(&self) -> &T {
        &self.title
    }

    pub fn recent(&self) -> &RecentEntryStore<P> {
        &self.recent
    }

    /// One synchronization cycle. Must run on the context that owns the title surface.
    pub fn tick(
        &mut self,
        state: &mut SyncState,
        project: Option<&ProjectSnapshot>,
    ) -> TickOutcome {
        let Some(project) = project else {
            return TickOutcome::NoProject;
        };

        let branch = self.branches.current_branch(&project.root);
        if branch.is_empty() {
            debug!("No branch for {}", project.root.display());
            return TickOutcome::NoBranch;
        }

        let desired = format_title(&project.identifier, &branch);
        let current = self
            .title
            .read_title()
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| state.last_applied_title.clone());

        let title_changed = current != desired;
        if title_changed {
            if let Err(e) = self.title.write_title(&current, &desired) {
                debug!("Title update to {:?} failed: {}", desired, e);
                return TickOutcome::TitleRejected;
            }
            info!("Window title set to {:?}", desired);
            state.last_applied_title = desired;
        }

        let mut recent_updated = false;
        if branch != state.last_applied_branch {
            info!(
                "Branch changed from {:?} to {:?}",
                state.last_applied_branch, branch
            );
            state.last_applied_branch = branch;
            let path = project.path.to_string_lossy();
            recent_updated = self.record_recent(&path, &state.last_applied_branch);
        }

        TickOutcome::Synced {
            title_changed,
            recent_updated,
        }
    }

    /// Runs the store update on its own thread and waits for it
    fn record_recent(&mut self, path: &str, branch: &str) -> bool {
        let recent = &mut self.recent;
        let joined = thread::scope(|scope| {
            let worker = thread::Builder::new()
                .name(RECENT_WORKER_NAME.to_string())
                .spawn_scoped(scope, move || recent.upsert(path, branch));
            match worker {
                Ok(handle) => handle.join().ok(),
                Err(e) => {
                    warn!("Failed to start {} worker: {}", RECENT_WORKER_NAME, e);
                    None
                }
            }
        });

        match joined {
            Some(Ok(UpsertOutcome::Stored)) => true,
            Some(Ok(UpsertOutcome::MissingProject)) => false,
            Some(Err(e)) => {
                warn!("Failed to update recent entries: {}", e);
                false
            }
            None => {
                warn!("{} worker panicked", RECENT_WORKER_NAME);
                false
            }
        }
    }
}
