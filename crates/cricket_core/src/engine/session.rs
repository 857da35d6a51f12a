//! Scoring Session
//!
//! Wraps a `MatchController` for a live room: scorers mutate, spectators
//! read. After each accepted command the session publishes a fresh snapshot
//! and, once the match is over, queues the record for archiving. Neither
//! step can fail the command.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::{Result, ScoringError};
use crate::models::{MatchSummary, ScoringCommand};
use crate::save::{MatchRecord, PersistenceWorker};

use super::controller::{MatchController, ScoringPhase};
use super::snapshot::{MatchSnapshot, SnapshotBoard};

/// What the caller is allowed to do. Rooms and passwords are checked
/// before a session ever sees the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Access {
    Scorer,
    Spectator,
}

impl Access {
    pub fn can_score(&self) -> bool {
        matches!(self, Access::Scorer)
    }
}

pub struct ScoringSession {
    controller: MatchController,
    board: Arc<SnapshotBoard>,
    persistence: Option<PersistenceWorker>,
    archived: bool,
}

impl ScoringSession {
    pub fn new(controller: MatchController) -> Self {
        let board = Arc::new(SnapshotBoard::new(MatchSnapshot::capture(&controller)));
        Self { controller, board, persistence: None, archived: false }
    }

    pub fn with_persistence(mut self, worker: PersistenceWorker) -> Self {
        self.persistence = Some(worker);
        self
    }

    pub fn controller(&self) -> &MatchController {
        &self.controller
    }

    /// Handle for spectators; stays valid after the session is dropped.
    pub fn board(&self) -> Arc<SnapshotBoard> {
        Arc::clone(&self.board)
    }

    pub fn snapshot(&self) -> Arc<MatchSnapshot> {
        self.board.latest()
    }

    pub fn submit(&mut self, access: Access, command: ScoringCommand) -> Result<ScoringPhase> {
        if !access.can_score() {
            log::warn!("Rejected {} from a spectator", command.name());
            return Err(ScoringError::Unauthorized);
        }

        let phase = self.controller.apply(command)?;
        let snapshot = MatchSnapshot::capture(&self.controller);
        if let Some(worker) = &self.persistence {
            worker.submit_snapshot(snapshot.clone());
        }
        self.board.publish(snapshot);

        if phase.is_terminal() && !self.archived {
            if let Some(summary) = self.controller.summary().cloned() {
                self.archive(summary);
            }
        }
        Ok(phase)
    }

    fn archive(&mut self, summary: MatchSummary) {
        self.archived = true;
        match &self.persistence {
            Some(worker) => worker.submit_record(MatchRecord::new(summary)),
            None => log::debug!("No persistence attached; match {} not archived", summary.match_id),
        }
    }

    /// Ends the session, flushing pending saves.
    pub fn finish(mut self) -> MatchController {
        if let Some(worker) = self.persistence.take() {
            let stats = worker.shutdown();
            log::debug!("Session persistence: {stats:?}");
        }
        self.controller
    }
}
