//! The mutation dispatcher: the single funnel every edit goes through.
//!
//! Order of operations for a dispatch:
//!
//! 1. apply the edit to the in-memory map (optimistic update);
//! 2. persist it through [`MapRemote`], holding the in-flight gate;
//! 3. on persistence failure, roll the optimistic edit back by
//!    applying its inverse, then surface the error;
//! 4. on success of a forward edit, absorb any server-assigned id,
//!    record the entry on the undo stack (clearing redo), and publish
//!    a change event.
//!
//! Replays (undo/redo) run through the same funnel with a
//! [`ReplaySource`] marker and are not re-recorded — the controller
//! owns the stack movement for those.

use uuid::Uuid;
use waypoint_core::action::{EditPayload, EditVerb, SubAction};
use waypoint_core::apply::{apply_edit, ApplyOutcome};
use waypoint_core::item::RowItem;
use waypoint_core::map::JourneyMap;
use waypoint_core::types::EntityId;
use waypoint_events::MapEvent;
use waypoint_remote::MapMutation;
use waypoint_remote::mutations::RowInput;

use crate::error::SessionError;
use crate::session::MapSession;

// ---------------------------------------------------------------------------
// Request / result
// ---------------------------------------------------------------------------

/// Marks a dispatch as a history replay rather than a forward edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplaySource {
    Undo,
    Redo,
}

/// One edit to run through the dispatcher.
#[derive(Debug, Clone)]
pub struct DispatchRequest {
    pub verb: EditVerb,
    pub payload: EditPayload,
    /// `Some` when this dispatch replays a history entry.
    pub replay: Option<ReplaySource>,
    pub sub_action: Option<SubAction>,
    /// Id of the history entry a replay derives from, correlating the
    /// primitive halves of compound operations.
    pub parent_id: Option<Uuid>,
}

impl DispatchRequest {
    /// A forward (user-initiated) edit.
    pub fn forward(verb: EditVerb, payload: EditPayload) -> Self {
        Self {
            verb,
            payload,
            replay: None,
            sub_action: None,
            parent_id: None,
        }
    }

    /// Tag the request as a compound operation.
    pub fn with_sub_action(mut self, sub_action: SubAction) -> Self {
        self.sub_action = Some(sub_action);
        self
    }
}

/// What a dispatch did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchResult {
    /// The edit was applied locally and persisted.
    Applied {
        /// Id of the recorded history entry (forward edits only).
        entry_id: Option<Uuid>,
        /// Server-assigned id absorbed after a CREATE.
        server_id: Option<EntityId>,
    },
    /// The edit resolved to a no-op (lookup miss or idempotent
    /// repeat); nothing was persisted or recorded.
    Skipped,
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

impl MapSession {
    /// Run one edit through the dispatcher.
    ///
    /// Never fails on a local lookup miss — local and remote state can
    /// drift, and the editor must stay responsive; the miss is logged
    /// and reported as [`DispatchResult::Skipped`]. A persistence
    /// failure rolls the optimistic edit back and returns the error.
    pub async fn dispatch(
        &mut self,
        request: DispatchRequest,
    ) -> Result<DispatchResult, SessionError> {
        let DispatchRequest {
            verb,
            mut payload,
            replay,
            sub_action,
            parent_id,
        } = request;

        let outcome = apply_edit(&mut self.map, verb, &payload);
        let changed = match outcome {
            ApplyOutcome::Applied { changed } => changed,
            ApplyOutcome::Unchanged => {
                tracing::debug!(?verb, "Edit had no local effect; skipping persistence");
                return Ok(DispatchResult::Skipped);
            }
            ApplyOutcome::NotFound { entity, id } => {
                // Recoverable drift between local and remote state.
                tracing::warn!(?verb, entity, %id, "Edit target not found; skipping");
                return Ok(DispatchResult::Skipped);
            }
        };

        let mutations = mutations_for(&self.map.id, verb, &payload);
        let mut server_id = None;
        {
            let _guard = self.gate.begin();
            for mutation in mutations {
                let expects_id = mutation.expects_created_id();
                match self.remote.persist(mutation).await {
                    Ok(ack) => {
                        if expects_id {
                            server_id = ack.id;
                        }
                    }
                    Err(error) => {
                        tracing::warn!(?verb, %error, "Persistence failed; rolling back");
                        apply_edit(&mut self.map, verb.inverse(), &payload.inverted());
                        return Err(error.into());
                    }
                }
            }
        }

        if let Some(id) = &server_id {
            absorb_server_id(&mut self.map, &mut payload, id);
        }

        let entry_id = if replay.is_none() {
            let entry =
                waypoint_core::action::EditLogEntry::new(verb, payload.clone(), sub_action);
            let id = entry.id;
            self.log.record(entry);
            Some(id)
        } else {
            tracing::debug!(?replay, ?parent_id, "Replayed history entry");
            None
        };

        self.publish_event(verb, &payload, &changed, server_id.as_deref());

        Ok(DispatchResult::Applied { entry_id, server_id })
    }

    fn publish_event(
        &self,
        verb: EditVerb,
        payload: &EditPayload,
        changed: &[EntityId],
        server_id: Option<&str>,
    ) {
        let mut event = MapEvent::new(event_type(payload, verb), self.map.id.clone());
        if let EditPayload::Item { item, .. } | EditPayload::ItemMove { item, .. } = payload {
            let location = item.location();
            event = event
                .at_row(location.row_id)
                .at_column(location.column_id, location.step_id);
        }
        if let Some(id) = server_id {
            event = event.for_entity(id.to_string());
        } else if let Some(id) = changed.first() {
            event = event.for_entity(id.clone());
        }
        self.events.publish(event);
    }
}

// ---------------------------------------------------------------------------
// Mutation mapping
// ---------------------------------------------------------------------------

/// The persistence mutations for one edit, in execution order.
///
/// Most edits map to exactly one mutation; a compound CREATE-DELETE
/// persists as delete-from-old then create-at-new.
fn mutations_for(map_id: &EntityId, verb: EditVerb, payload: &EditPayload) -> Vec<MapMutation> {
    match payload {
        EditPayload::Item { item, previous } => match verb {
            EditVerb::Create => vec![MapMutation::CreateItem {
                map_id: map_id.clone(),
                item: item.clone(),
            }],
            EditVerb::Update => vec![MapMutation::UpdateItem {
                map_id: map_id.clone(),
                item: item.clone(),
            }],
            EditVerb::Delete => vec![delete_item_mutation(map_id, item)],
            EditVerb::CreateDelete => {
                let mut mutations = Vec::with_capacity(2);
                if let Some(prev) = previous {
                    mutations.push(delete_item_mutation(map_id, prev));
                }
                mutations.push(MapMutation::CreateItem {
                    map_id: map_id.clone(),
                    item: item.clone(),
                });
                mutations
            }
            _ => Vec::new(),
        },

        EditPayload::ItemMove {
            item,
            from,
            to,
            to_index,
            ..
        } => match verb {
            EditVerb::Drag => vec![MapMutation::MoveItem {
                map_id: map_id.clone(),
                kind: item.kind(),
                item_id: item.id().clone(),
                from: from.clone(),
                to: to.clone(),
                to_index: *to_index,
            }],
            _ => Vec::new(),
        },

        EditPayload::Text {
            row_id,
            column_id,
            element,
            ..
        } => match verb {
            EditVerb::Create | EditVerb::Update => vec![MapMutation::UpsertCellText {
                map_id: map_id.clone(),
                element: element.clone(),
            }],
            EditVerb::Delete => vec![MapMutation::DeleteCellText {
                map_id: map_id.clone(),
                element_id: element.id.clone(),
                row_id: row_id.clone(),
                column_id: column_id.clone(),
            }],
            _ => Vec::new(),
        },

        EditPayload::Row { row, index, .. } => match verb {
            EditVerb::Create => vec![MapMutation::CreateRow {
                map_id: map_id.clone(),
                row: RowInput::from_row(row, *index),
            }],
            EditVerb::Update => vec![MapMutation::UpdateRow {
                map_id: map_id.clone(),
                row: RowInput::from_row(row, *index),
            }],
            EditVerb::Delete => vec![MapMutation::DeleteRow {
                map_id: map_id.clone(),
                row_id: row.id.clone(),
            }],
            EditVerb::Enable | EditVerb::Disable => vec![MapMutation::SetRowLocked {
                map_id: map_id.clone(),
                row_id: row.id.clone(),
                locked: verb == EditVerb::Disable,
            }],
            _ => Vec::new(),
        },

        EditPayload::Column { column, index, .. } => match verb {
            EditVerb::Create => vec![MapMutation::CreateColumn {
                map_id: map_id.clone(),
                column: column.clone(),
                index: *index,
            }],
            EditVerb::Update => vec![MapMutation::UpdateColumn {
                map_id: map_id.clone(),
                column: column.clone(),
            }],
            EditVerb::Delete => vec![MapMutation::DeleteColumn {
                map_id: map_id.clone(),
                column_id: column.id.clone(),
            }],
            EditVerb::Drag => vec![MapMutation::MoveColumn {
                map_id: map_id.clone(),
                column_id: column.id.clone(),
                to_index: *index,
            }],
            EditVerb::Enable | EditVerb::Disable => vec![MapMutation::SetColumnEnabled {
                map_id: map_id.clone(),
                column_id: column.id.clone(),
                enabled: verb == EditVerb::Enable,
            }],
            _ => Vec::new(),
        },

        EditPayload::MapTitle { title, .. } => match verb {
            EditVerb::Update => vec![MapMutation::UpdateMapTitle {
                map_id: map_id.clone(),
                title: title.clone(),
            }],
            _ => Vec::new(),
        },
    }
}

fn delete_item_mutation(map_id: &EntityId, item: &RowItem) -> MapMutation {
    MapMutation::DeleteItem {
        map_id: map_id.clone(),
        kind: item.kind(),
        item_id: item.id().clone(),
        location: item.location(),
    }
}

// ---------------------------------------------------------------------------
// Server id absorption
// ---------------------------------------------------------------------------

/// Replace an optimistic client id with the server-assigned one, in
/// both the map and the payload about to be recorded, so later undo
/// entries reference the id the backend knows.
fn absorb_server_id(map: &mut JourneyMap, payload: &mut EditPayload, server_id: &str) {
    match payload {
        EditPayload::Item { item, .. } => {
            let old_id = item.id().clone();
            if old_id == server_id {
                return;
            }
            let location = item.location();
            if let Some(cell) = map.cell_mut(&location.row_id, &location.column_id) {
                if let Some(index) = cell.position_of(item.kind(), &old_id) {
                    if let Some(mut stored) = cell.remove_item(item.kind(), index) {
                        stored.set_id(server_id.to_string());
                        cell.insert_item(index, stored);
                    }
                }
            }
            item.set_id(server_id.to_string());
        }
        EditPayload::Row { row, .. } => {
            let old_id = row.id.clone();
            if old_id == server_id {
                return;
            }
            if let Some(stored) = map.row_mut(&old_id) {
                stored.id = server_id.to_string();
            }
            row.id = server_id.to_string();
        }
        EditPayload::Column { column, .. } => {
            let old_id = column.id.clone();
            if old_id == server_id {
                return;
            }
            if let Some(stored) = map.column_mut(&old_id) {
                stored.id = server_id.to_string();
            }
            // Cells were stamped with the optimistic column id; keep
            // every row's cell aligned with the server id.
            for row in &mut map.rows {
                for cell in &mut row.cells {
                    if cell.column_id == old_id {
                        cell.column_id = server_id.to_string();
                        if cell.step_id == old_id {
                            cell.step_id = server_id.to_string();
                        }
                    }
                }
            }
            column.id = server_id.to_string();
        }
        _ => {}
    }
}

// ---------------------------------------------------------------------------
// Event naming
// ---------------------------------------------------------------------------

/// Dot-separated event name for a (payload, verb) pair.
fn event_type(payload: &EditPayload, verb: EditVerb) -> &'static str {
    match (payload, verb) {
        (EditPayload::Item { .. }, EditVerb::Create) => "item.created",
        (EditPayload::Item { .. }, EditVerb::Update) => "item.updated",
        (EditPayload::Item { .. }, EditVerb::Delete) => "item.deleted",
        (EditPayload::Item { .. }, EditVerb::CreateDelete) => "item.reassigned",
        (EditPayload::Item { .. }, _) => "item.changed",
        (EditPayload::ItemMove { .. }, _) => "item.moved",
        (EditPayload::Text { .. }, EditVerb::Delete) => "cell.text_deleted",
        (EditPayload::Text { .. }, _) => "cell.text_updated",
        (EditPayload::Row { .. }, EditVerb::Create) => "row.created",
        (EditPayload::Row { .. }, EditVerb::Delete) => "row.deleted",
        (EditPayload::Row { .. }, EditVerb::Disable) => "row.locked",
        (EditPayload::Row { .. }, EditVerb::Enable) => "row.unlocked",
        (EditPayload::Row { .. }, _) => "row.updated",
        (EditPayload::Column { .. }, EditVerb::Create) => "column.created",
        (EditPayload::Column { .. }, EditVerb::Delete) => "column.deleted",
        (EditPayload::Column { .. }, EditVerb::Drag) => "column.moved",
        (EditPayload::Column { .. }, EditVerb::Enable) => "column.enabled",
        (EditPayload::Column { .. }, EditVerb::Disable) => "column.disabled",
        (EditPayload::Column { .. }, _) => "column.updated",
        (EditPayload::MapTitle { .. }, _) => "map.title_updated",
    }
}
