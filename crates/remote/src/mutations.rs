//! The typed mutation catalogue.
//!
//! Every edit the dispatcher persists maps to exactly one
//! [`MapMutation`] variant. Each variant knows its GraphQL document,
//! the root field to read the acknowledgement from, and how to build
//! its variables object, so the HTTP client stays a dumb transport.

use serde::Serialize;
use serde_json::json;
use waypoint_core::item::{ItemKind, ItemLocation, RowItem, TextElement};
use waypoint_core::map::{Column, Row, RowKind};
use waypoint_core::types::EntityId;

// ---------------------------------------------------------------------------
// Row input
// ---------------------------------------------------------------------------

/// Row metadata sent with row mutations.
///
/// Cell contents travel through their own item mutations; sending the
/// whole grid with every row edit would race concurrent item writes.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RowInput {
    pub id: EntityId,
    pub kind: RowKind,
    pub label: String,
    pub size: i32,
    pub collapsed: bool,
    pub locked: bool,
    pub index: usize,
}

impl RowInput {
    /// Snapshot the persistable metadata of a row at `index`.
    pub fn from_row(row: &Row, index: usize) -> Self {
        Self {
            id: row.id.clone(),
            kind: row.kind,
            label: row.label.clone(),
            size: row.size,
            collapsed: row.collapsed,
            locked: row.locked,
            index,
        }
    }
}

// ---------------------------------------------------------------------------
// Acknowledgement
// ---------------------------------------------------------------------------

/// What the server acknowledged for a mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationAck {
    /// The persisted entity's id. For CREATE mutations this is the
    /// server-assigned id the local state must absorb; deletes may
    /// acknowledge without one.
    pub id: Option<EntityId>,
}

// ---------------------------------------------------------------------------
// Mutation catalogue
// ---------------------------------------------------------------------------

/// One persistable map edit.
#[derive(Debug, Clone, PartialEq)]
pub enum MapMutation {
    CreateItem { map_id: EntityId, item: RowItem },
    UpdateItem { map_id: EntityId, item: RowItem },
    DeleteItem {
        map_id: EntityId,
        kind: ItemKind,
        item_id: EntityId,
        location: ItemLocation,
    },
    MoveItem {
        map_id: EntityId,
        kind: ItemKind,
        item_id: EntityId,
        from: ItemLocation,
        to: ItemLocation,
        to_index: usize,
    },
    UpsertCellText { map_id: EntityId, element: TextElement },
    DeleteCellText {
        map_id: EntityId,
        element_id: EntityId,
        row_id: EntityId,
        column_id: EntityId,
    },
    CreateRow { map_id: EntityId, row: RowInput },
    UpdateRow { map_id: EntityId, row: RowInput },
    DeleteRow { map_id: EntityId, row_id: EntityId },
    SetRowLocked {
        map_id: EntityId,
        row_id: EntityId,
        locked: bool,
    },
    CreateColumn {
        map_id: EntityId,
        column: Column,
        index: usize,
    },
    UpdateColumn { map_id: EntityId, column: Column },
    DeleteColumn { map_id: EntityId, column_id: EntityId },
    MoveColumn {
        map_id: EntityId,
        column_id: EntityId,
        to_index: usize,
    },
    SetColumnEnabled {
        map_id: EntityId,
        column_id: EntityId,
        enabled: bool,
    },
    UpdateMapTitle { map_id: EntityId, title: String },
}

impl MapMutation {
    /// The GraphQL document for this mutation.
    pub fn document(&self) -> &'static str {
        match self {
            Self::CreateItem { .. } => {
                "mutation CreateItem($input: CreateItemInput!) { createItem(input: $input) { id } }"
            }
            Self::UpdateItem { .. } => {
                "mutation UpdateItem($input: UpdateItemInput!) { updateItem(input: $input) { id } }"
            }
            Self::DeleteItem { .. } => {
                "mutation DeleteItem($input: DeleteItemInput!) { deleteItem(input: $input) { id } }"
            }
            Self::MoveItem { .. } => {
                "mutation MoveItem($input: MoveItemInput!) { moveItem(input: $input) { id } }"
            }
            Self::UpsertCellText { .. } => {
                "mutation UpsertCellText($input: UpsertCellTextInput!) { upsertCellText(input: $input) { id } }"
            }
            Self::DeleteCellText { .. } => {
                "mutation DeleteCellText($input: DeleteCellTextInput!) { deleteCellText(input: $input) { id } }"
            }
            Self::CreateRow { .. } => {
                "mutation CreateRow($input: CreateRowInput!) { createRow(input: $input) { id } }"
            }
            Self::UpdateRow { .. } => {
                "mutation UpdateRow($input: UpdateRowInput!) { updateRow(input: $input) { id } }"
            }
            Self::DeleteRow { .. } => {
                "mutation DeleteRow($input: DeleteRowInput!) { deleteRow(input: $input) { id } }"
            }
            Self::SetRowLocked { .. } => {
                "mutation SetRowLocked($input: SetRowLockedInput!) { setRowLocked(input: $input) { id } }"
            }
            Self::CreateColumn { .. } => {
                "mutation CreateColumn($input: CreateColumnInput!) { createColumn(input: $input) { id } }"
            }
            Self::UpdateColumn { .. } => {
                "mutation UpdateColumn($input: UpdateColumnInput!) { updateColumn(input: $input) { id } }"
            }
            Self::DeleteColumn { .. } => {
                "mutation DeleteColumn($input: DeleteColumnInput!) { deleteColumn(input: $input) { id } }"
            }
            Self::MoveColumn { .. } => {
                "mutation MoveColumn($input: MoveColumnInput!) { moveColumn(input: $input) { id } }"
            }
            Self::SetColumnEnabled { .. } => {
                "mutation SetColumnEnabled($input: SetColumnEnabledInput!) { setColumnEnabled(input: $input) { id } }"
            }
            Self::UpdateMapTitle { .. } => {
                "mutation UpdateMapTitle($input: UpdateMapTitleInput!) { updateMapTitle(input: $input) { id } }"
            }
        }
    }

    /// The root response field the acknowledgement is read from.
    pub fn ack_field(&self) -> &'static str {
        match self {
            Self::CreateItem { .. } => "createItem",
            Self::UpdateItem { .. } => "updateItem",
            Self::DeleteItem { .. } => "deleteItem",
            Self::MoveItem { .. } => "moveItem",
            Self::UpsertCellText { .. } => "upsertCellText",
            Self::DeleteCellText { .. } => "deleteCellText",
            Self::CreateRow { .. } => "createRow",
            Self::UpdateRow { .. } => "updateRow",
            Self::DeleteRow { .. } => "deleteRow",
            Self::SetRowLocked { .. } => "setRowLocked",
            Self::CreateColumn { .. } => "createColumn",
            Self::UpdateColumn { .. } => "updateColumn",
            Self::DeleteColumn { .. } => "deleteColumn",
            Self::MoveColumn { .. } => "moveColumn",
            Self::SetColumnEnabled { .. } => "setColumnEnabled",
            Self::UpdateMapTitle { .. } => "updateMapTitle",
        }
    }

    /// Build the `variables` object for the request body.
    pub fn variables(&self) -> serde_json::Value {
        let input = match self {
            Self::CreateItem { map_id, item } | Self::UpdateItem { map_id, item } => {
                json!({ "mapId": map_id, "item": item })
            }
            Self::DeleteItem {
                map_id,
                kind,
                item_id,
                location,
            } => json!({
                "mapId": map_id,
                "kind": kind,
                "id": item_id,
                "rowId": location.row_id,
                "columnId": location.column_id,
                "stepId": location.step_id,
            }),
            Self::MoveItem {
                map_id,
                kind,
                item_id,
                from,
                to,
                to_index,
            } => json!({
                "mapId": map_id,
                "kind": kind,
                "id": item_id,
                "from": from,
                "to": to,
                "toIndex": to_index,
            }),
            Self::UpsertCellText { map_id, element } => {
                json!({ "mapId": map_id, "element": element })
            }
            Self::DeleteCellText {
                map_id,
                element_id,
                row_id,
                column_id,
            } => json!({
                "mapId": map_id,
                "id": element_id,
                "rowId": row_id,
                "columnId": column_id,
            }),
            Self::CreateRow { map_id, row } | Self::UpdateRow { map_id, row } => {
                json!({ "mapId": map_id, "row": row })
            }
            Self::DeleteRow { map_id, row_id } => json!({ "mapId": map_id, "id": row_id }),
            Self::SetRowLocked {
                map_id,
                row_id,
                locked,
            } => json!({ "mapId": map_id, "id": row_id, "locked": locked }),
            Self::CreateColumn {
                map_id,
                column,
                index,
            } => json!({ "mapId": map_id, "column": column, "index": index }),
            Self::UpdateColumn { map_id, column } => {
                json!({ "mapId": map_id, "column": column })
            }
            Self::DeleteColumn { map_id, column_id } => {
                json!({ "mapId": map_id, "id": column_id })
            }
            Self::MoveColumn {
                map_id,
                column_id,
                to_index,
            } => json!({ "mapId": map_id, "id": column_id, "toIndex": to_index }),
            Self::SetColumnEnabled {
                map_id,
                column_id,
                enabled,
            } => json!({ "mapId": map_id, "id": column_id, "enabled": enabled }),
            Self::UpdateMapTitle { map_id, title } => {
                json!({ "mapId": map_id, "title": title })
            }
        };
        json!({ "input": input })
    }

    /// Whether a successful acknowledgement must carry an id for the
    /// caller to absorb (CREATE family).
    pub fn expects_created_id(&self) -> bool {
        matches!(
            self,
            Self::CreateItem { .. } | Self::CreateRow { .. } | Self::CreateColumn { .. }
        )
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
