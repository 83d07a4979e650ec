//! Undo/redo over the session's edit log.
//!
//! Both operations follow the same shape: check the gate, pop the top
//! entry from one stack, push its inverse onto the other, and replay
//! the inverse through the dispatcher tagged with a [`ReplaySource`]
//! marker and the parent entry id. Pop, cross-push, and replay run to
//! completion within one call, and the gate keeps a second invocation
//! (or any fresh edit's pending mutation) from interleaving.

use uuid::Uuid;

use crate::dispatcher::{DispatchRequest, ReplaySource};
use crate::error::SessionError;
use crate::session::MapSession;

/// What an undo/redo invocation did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryOutcome {
    /// The entry with this id was replayed.
    Applied { entry_id: Uuid },
    /// A mutation is still in flight; nothing was popped or replayed.
    Busy,
    /// The stack was empty.
    Empty,
}

impl MapSession {
    /// Undo the most recent edit.
    pub async fn undo(&mut self) -> Result<HistoryOutcome, SessionError> {
        if !self.gate.is_idle() {
            tracing::debug!(in_flight = self.gate.in_flight(), "Undo blocked by in-flight work");
            return Ok(HistoryOutcome::Busy);
        }
        let Some(entry) = self.log.pop_undo() else {
            return Ok(HistoryOutcome::Empty);
        };

        let inverted = entry.inverted();
        self.log.push_redo(inverted.clone());

        let request = DispatchRequest {
            verb: inverted.verb,
            payload: inverted.payload,
            replay: Some(ReplaySource::Undo),
            sub_action: inverted.sub_action,
            parent_id: Some(entry.id),
        };
        match self.dispatch(request).await {
            Ok(_) => Ok(HistoryOutcome::Applied { entry_id: entry.id }),
            Err(error) => {
                // The dispatcher already rolled the local state back;
                // restore the stacks so the entry is not lost.
                self.log.pop_redo();
                self.log.push_undo(entry);
                Err(error)
            }
        }
    }

    /// Redo the most recently undone edit.
    pub async fn redo(&mut self) -> Result<HistoryOutcome, SessionError> {
        if !self.gate.is_idle() {
            tracing::debug!(in_flight = self.gate.in_flight(), "Redo blocked by in-flight work");
            return Ok(HistoryOutcome::Busy);
        }
        let Some(entry) = self.log.pop_redo() else {
            return Ok(HistoryOutcome::Empty);
        };

        // The redo stack holds inverses; inverting again yields the
        // original forward edit to replay.
        let inverted = entry.inverted();
        self.log.push_undo(inverted.clone());

        let request = DispatchRequest {
            verb: inverted.verb,
            payload: inverted.payload,
            replay: Some(ReplaySource::Redo),
            sub_action: inverted.sub_action,
            parent_id: Some(entry.id),
        };
        match self.dispatch(request).await {
            Ok(_) => Ok(HistoryOutcome::Applied { entry_id: entry.id }),
            Err(error) => {
                self.log.pop_undo();
                self.log.push_redo(entry);
                Err(error)
            }
        }
    }
}
