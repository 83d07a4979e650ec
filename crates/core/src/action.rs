//! Edit actions, their inverse table, and the edit-log entry.
//!
//! Every recorded edit carries enough `previous_*` state to construct
//! its exact inverse. The verb inverse table is a fixed bijection
//! (CREATE↔DELETE, UPDATE↔UPDATE, DRAG↔DRAG, ENABLE↔DISABLE,
//! CREATE-DELETE↔itself), kept as a total function so the compiler
//! enforces coverage when a verb is added.

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::item::{ItemLocation, RowItem, TextElement};
use crate::map::{Column, Row};
use crate::types::{EntityId, Timestamp};

// ---------------------------------------------------------------------------
// Verbs
// ---------------------------------------------------------------------------

/// The primitive operation an edit performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export)]
pub enum EditVerb {
    Create,
    Update,
    Delete,
    Drag,
    /// A compound move that is logically a delete-at-old plus a
    /// create-at-new (e.g. an outcome changing both step and persona).
    CreateDelete,
    Enable,
    Disable,
}

impl EditVerb {
    /// The verb that undoes this one. Total and involutive:
    /// `v.inverse().inverse() == v` for every verb.
    pub fn inverse(self) -> Self {
        match self {
            Self::Create => Self::Delete,
            Self::Delete => Self::Create,
            Self::Update => Self::Update,
            Self::Drag => Self::Drag,
            Self::CreateDelete => Self::CreateDelete,
            Self::Enable => Self::Disable,
            Self::Disable => Self::Enable,
        }
    }

    /// All verbs, for table-driven tests.
    pub const ALL: &'static [EditVerb] = &[
        Self::Create,
        Self::Update,
        Self::Delete,
        Self::Drag,
        Self::CreateDelete,
        Self::Enable,
        Self::Disable,
    ];
}

// ---------------------------------------------------------------------------
// Scope and sub-action
// ---------------------------------------------------------------------------

/// Which part of the map an edit targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum EditScope {
    Item,
    Text,
    Row,
    Column,
    MapTitle,
}

/// Secondary tag for edits where a single user action combines two
/// primitive operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum SubAction {
    /// An item move that also changed its persona assignment, persisted
    /// as delete-from-old plus create-at-new.
    CreateDelete,
}

// ---------------------------------------------------------------------------
// Payloads
// ---------------------------------------------------------------------------

/// The full mutation input for an edit, including the previous state
/// needed to invert it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "scope", rename_all = "snake_case")]
#[ts(export)]
pub enum EditPayload {
    /// Create / update / delete / create-delete of a row item.
    ///
    /// For CREATE, `previous` is `None`; for UPDATE it holds the
    /// pre-edit item; for CREATE-DELETE it holds the item at its old
    /// location/persona while `item` is the replacement.
    Item {
        item: RowItem,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        previous: Option<RowItem>,
    },

    /// A drag move of a row item between cells.
    ItemMove {
        item: RowItem,
        from: ItemLocation,
        from_index: usize,
        to: ItemLocation,
        to_index: usize,
    },

    /// The free-text element of a text cell.
    Text {
        row_id: EntityId,
        column_id: EntityId,
        element: TextElement,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        previous: Option<TextElement>,
    },

    /// A whole-row operation (create, delete, label/flag update).
    Row {
        row: Row,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        previous: Option<Row>,
        /// Position in the map's row list (for create/delete).
        index: usize,
    },

    /// A column structure operation; `index`/`previous_index` drive
    /// create, delete and drag placement.
    Column {
        column: Column,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        previous: Option<Column>,
        index: usize,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        previous_index: Option<usize>,
    },

    /// Map title update.
    MapTitle { title: String, previous: String },
}

impl EditPayload {
    /// The scope this payload targets.
    pub fn scope(&self) -> EditScope {
        match self {
            Self::Item { .. } => EditScope::Item,
            Self::ItemMove { .. } => EditScope::Item,
            Self::Text { .. } => EditScope::Text,
            Self::Row { .. } => EditScope::Row,
            Self::Column { .. } => EditScope::Column,
            Self::MapTitle { .. } => EditScope::MapTitle,
        }
    }

    /// The payload that undoes this one: new and previous state swap
    /// places, move endpoints swap direction.
    pub fn inverted(&self) -> Self {
        match self {
            Self::Item { item, previous } => match previous {
                // UPDATE / CREATE-DELETE: swap new and previous.
                Some(prev) => Self::Item {
                    item: prev.clone(),
                    previous: Some(item.clone()),
                },
                // CREATE / DELETE: the same item, verb flip does the rest.
                None => Self::Item {
                    item: item.clone(),
                    previous: None,
                },
            },
            Self::ItemMove {
                item,
                from,
                from_index,
                to,
                to_index,
            } => {
                let mut reversed = item.clone();
                reversed.set_location(from);
                Self::ItemMove {
                    item: reversed,
                    from: to.clone(),
                    from_index: *to_index,
                    to: from.clone(),
                    to_index: *from_index,
                }
            }
            Self::Text {
                row_id,
                column_id,
                element,
                previous,
            } => Self::Text {
                row_id: row_id.clone(),
                column_id: column_id.clone(),
                element: previous.clone().unwrap_or_else(|| TextElement {
                    id: element.id.clone(),
                    row_id: row_id.clone(),
                    column_id: column_id.clone(),
                    text: String::new(),
                }),
                previous: Some(element.clone()),
            },
            Self::Row {
                row,
                previous,
                index,
            } => Self::Row {
                row: previous.clone().unwrap_or_else(|| row.clone()),
                previous: previous.as_ref().map(|_| row.clone()),
                index: *index,
            },
            Self::Column {
                column,
                previous,
                index,
                previous_index,
            } => Self::Column {
                column: previous.clone().unwrap_or_else(|| column.clone()),
                previous: previous.as_ref().map(|_| column.clone()),
                index: previous_index.unwrap_or(*index),
                previous_index: previous_index.map(|_| *index),
            },
            Self::MapTitle { title, previous } => Self::MapTitle {
                title: previous.clone(),
                previous: title.clone(),
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Edit log entry
// ---------------------------------------------------------------------------

/// One recorded edit, invertible from its own payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct EditLogEntry {
    pub id: Uuid,
    pub verb: EditVerb,
    pub payload: EditPayload,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_action: Option<SubAction>,
    pub recorded_at: Timestamp,
}

impl EditLogEntry {
    /// A new entry with a generated id and the current timestamp.
    pub fn new(verb: EditVerb, payload: EditPayload, sub_action: Option<SubAction>) -> Self {
        Self {
            id: Uuid::new_v4(),
            verb,
            payload,
            sub_action,
            recorded_at: chrono::Utc::now(),
        }
    }

    /// The scope the entry's payload targets.
    pub fn scope(&self) -> EditScope {
        self.payload.scope()
    }

    /// The entry that exactly undoes this one. Keeps the original id so
    /// a replay can be correlated back to its parent entry.
    pub fn inverted(&self) -> Self {
        Self {
            id: self.id,
            verb: self.verb.inverse(),
            payload: self.payload.inverted(),
            sub_action: self.sub_action,
            recorded_at: self.recorded_at,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
