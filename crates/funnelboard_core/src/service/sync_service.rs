//! Persistence synchronizer.
//!
//! # Responsibility
//! - Push the live in-session projection of a project to the storage
//!   collaborator and surface failures to every caller.
//!
//! # Invariants
//! - At most one write is in flight per synchronizer.
//! - A save requested during an in-flight write is parked (depth 1, latest
//!   wins) and written by the in-flight caller right after its own write.
//! - A parked caller blocks until the write carrying its request finishes
//!   and returns that write's result; superseded callers share the result
//!   of the save that replaced theirs.
//! - A failed write is logged and returned as `Err`; it never panics.

use crate::model::{ProjectId, ProjectUpdate};
use crate::repo::{ProjectRepository, RepoError};
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

pub type SyncResult<T> = Result<T, SyncError>;

/// Persistence failure raised by `PersistenceSynchronizer::save`.
///
/// Cloneable so one failed write can be reported to every caller it carried.
#[derive(Debug, Clone)]
pub enum SyncError {
    Repo {
        project_id: ProjectId,
        source: Arc<RepoError>,
    },
}

impl Display for SyncError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo { project_id, source } => {
                write!(f, "failed to save project {project_id}: {source}")
            }
        }
    }
}

impl Error for SyncError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo { source, .. } => Some(source.as_ref()),
        }
    }
}

/// How a `save` request was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Written by this call.
    Saved,
    /// Parked behind an in-flight write and written by that caller
    /// (possibly superseded by a later parked save).
    Coalesced,
}

/// The parked save plus the number of callers waiting on it.
#[derive(Debug)]
struct PendingSave {
    batch: u64,
    waiters: usize,
    project_id: ProjectId,
    update: ProjectUpdate,
}

/// Result of a drained write, kept until every waiter has claimed it.
#[derive(Debug)]
struct SettledSave {
    batch: u64,
    waiters: usize,
    result: SyncResult<()>,
}

#[derive(Debug, Default)]
struct SaveSlot {
    in_flight: bool,
    next_batch: u64,
    pending: Option<PendingSave>,
    settled: Vec<SettledSave>,
}

/// Serializes saves against one storage collaborator.
pub struct PersistenceSynchronizer<R> {
    repository: R,
    slot: Mutex<SaveSlot>,
    drained: Condvar,
}

impl<R: ProjectRepository> PersistenceSynchronizer<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository,
            slot: Mutex::new(SaveSlot::default()),
            drained: Condvar::new(),
        }
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Whether a write is currently in flight.
    pub fn is_saving(&self) -> bool {
        self.lock_slot().in_flight
    }

    /// Number of callers parked behind the in-flight write.
    pub fn queued_saves(&self) -> usize {
        self.lock_slot()
            .pending
            .as_ref()
            .map_or(0, |pending| pending.waiters)
    }

    /// Saves `update` under `project_id`.
    ///
    /// Blocks while a parked save waits for its drained write.
    ///
    /// # Errors
    /// - `SyncError::Repo` when the write carrying this request fails: this
    ///   call's own write, or the drained write it was coalesced into.
    pub fn save(&self, project_id: ProjectId, update: ProjectUpdate) -> SyncResult<SaveOutcome> {
        let mut slot = self.lock_slot();
        if slot.in_flight {
            let batch = Self::park(&mut slot, project_id, update);
            return self
                .wait_for(slot, batch)
                .map(|()| SaveOutcome::Coalesced);
        }
        slot.in_flight = true;
        drop(slot);

        let result = self.write(project_id, &update);

        loop {
            let next = {
                let mut slot = self.lock_slot();
                match slot.pending.take() {
                    Some(next) => next,
                    None => {
                        slot.in_flight = false;
                        break;
                    }
                }
            };
            let drained = self.write(next.project_id, &next.update);
            self.lock_slot().settled.push(SettledSave {
                batch: next.batch,
                waiters: next.waiters,
                result: drained,
            });
            self.drained.notify_all();
        }

        result.map(|()| SaveOutcome::Saved)
    }

    fn park(slot: &mut SaveSlot, project_id: ProjectId, update: ProjectUpdate) -> u64 {
        let pending = match slot.pending.take() {
            Some(previous) => {
                info!(
                    "event=project_save module=sync status=superseded project_id={} waiters={}",
                    previous.project_id, previous.waiters
                );
                PendingSave {
                    batch: previous.batch,
                    waiters: previous.waiters + 1,
                    project_id,
                    update,
                }
            }
            None => {
                let batch = slot.next_batch;
                slot.next_batch += 1;
                PendingSave {
                    batch,
                    waiters: 1,
                    project_id,
                    update,
                }
            }
        };
        info!("event=project_save module=sync status=coalesced project_id={project_id}");
        let batch = pending.batch;
        slot.pending = Some(pending);
        batch
    }

    fn wait_for(&self, mut slot: MutexGuard<'_, SaveSlot>, batch: u64) -> SyncResult<()> {
        loop {
            if let Some(index) = slot.settled.iter().position(|settled| settled.batch == batch) {
                let settled = &mut slot.settled[index];
                settled.waiters -= 1;
                if settled.waiters == 0 {
                    return slot.settled.swap_remove(index).result;
                }
                return settled.result.clone();
            }
            slot = self
                .drained
                .wait(slot)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    fn write(&self, project_id: ProjectId, update: &ProjectUpdate) -> SyncResult<()> {
        let started_at = Instant::now();
        match self.repository.save_project(project_id, update) {
            Ok(()) => {
                info!(
                    "event=project_save module=sync status=ok project_id={project_id} nodes={} edges={} documents={} events={} duration_ms={}",
                    update.nodes.len(),
                    update.edges.len(),
                    update.notebook_documents.len(),
                    update.calendar_events.len(),
                    started_at.elapsed().as_millis()
                );
                Ok(())
            }
            Err(source) => {
                error!(
                    "event=project_save module=sync status=error project_id={project_id} duration_ms={} error={source}",
                    started_at.elapsed().as_millis()
                );
                Err(SyncError::Repo {
                    project_id,
                    source: Arc::new(source),
                })
            }
        }
    }

    fn lock_slot(&self) -> MutexGuard<'_, SaveSlot> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
