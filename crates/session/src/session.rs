//! The map editing session: one open map, its history, and its wiring.

use std::sync::Arc;

use tokio::sync::broadcast;
use waypoint_core::edit_log::EditLog;
use waypoint_core::map::JourneyMap;
use waypoint_events::{MapEvent, MapEventBus};
use waypoint_remote::MapRemote;

use crate::controller::HistoryOutcome;
use crate::error::SessionError;
use crate::gate::InFlightGate;
use crate::keys::{history_command, HistoryCommand, KeyChord, Platform};

/// An open journey map being edited.
///
/// Owns the document, the undo/redo log, the in-flight gate, and the
/// event bus. Created when the map screen opens; dropping it on
/// navigation tears the whole editing state down, so nothing survives
/// into the next map. Sessions are independent — tests routinely run
/// several side by side.
pub struct MapSession {
    pub(crate) map: JourneyMap,
    pub(crate) log: EditLog,
    pub(crate) gate: InFlightGate,
    pub(crate) remote: Arc<dyn MapRemote>,
    pub(crate) events: MapEventBus,
    platform: Platform,
}

impl MapSession {
    /// Open a session over a loaded map.
    pub fn new(map: JourneyMap, remote: Arc<dyn MapRemote>) -> Self {
        Self {
            map,
            log: EditLog::new(),
            gate: InFlightGate::new(),
            remote,
            events: MapEventBus::default(),
            platform: Platform::Other,
        }
    }

    /// Set the platform used for keyboard shortcut resolution.
    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    /// The current document state.
    pub fn map(&self) -> &JourneyMap {
        &self.map
    }

    /// The session's in-flight gate (shared with callers that issue
    /// their own remote work for this map, e.g. the initial load).
    pub fn gate(&self) -> &InFlightGate {
        &self.gate
    }

    /// Current undo stack depth.
    pub fn undo_depth(&self) -> usize {
        self.log.undo_len()
    }

    /// Current redo stack depth.
    pub fn redo_depth(&self) -> usize {
        self.log.redo_len()
    }

    /// Subscribe to the change events this session publishes.
    pub fn subscribe_events(&self) -> broadcast::Receiver<MapEvent> {
        self.events.subscribe()
    }

    /// Drop all history (e.g. after replacing the document wholesale).
    pub fn clear_history(&mut self) {
        self.log.clear();
    }

    /// Handle a keyboard chord, running undo or redo when it resolves.
    ///
    /// Returns `None` when the chord is not a history shortcut. When it
    /// returns `Some`, the caller must suppress the event's native
    /// default so the browser's own undo stays out of the way.
    pub async fn handle_key(
        &mut self,
        chord: &KeyChord,
    ) -> Result<Option<HistoryOutcome>, SessionError> {
        match history_command(chord, self.platform) {
            Some(HistoryCommand::Undo) => Ok(Some(self.undo().await?)),
            Some(HistoryCommand::Redo) => Ok(Some(self.redo().await?)),
            None => Ok(None),
        }
    }
}
