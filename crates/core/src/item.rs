//! Row items: the draggable/editable content held by a cell.
//!
//! Each row kind stores one of five item collections (touchpoints,
//! outcomes, metrics, links, box elements) plus an optional free-text
//! element. [`RowItem`] unifies the five draggable kinds so the drag
//! reconciliation and apply layers can splice items generically.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::types::EntityId;

// ---------------------------------------------------------------------------
// Item kinds
// ---------------------------------------------------------------------------

/// The five draggable item collections a cell can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum ItemKind {
    TouchPoints,
    Metrics,
    Outcomes,
    Links,
    BoxElements,
}

impl ItemKind {
    /// Human-readable label for the collection.
    pub fn label(self) -> &'static str {
        match self {
            Self::TouchPoints => "Touchpoints",
            Self::Metrics => "Metrics",
            Self::Outcomes => "Outcomes",
            Self::Links => "Links",
            Self::BoxElements => "Box elements",
        }
    }
}

// ---------------------------------------------------------------------------
// Item location
// ---------------------------------------------------------------------------

/// The (row, column, step) address of an item within a map.
///
/// Carried on every item so a persistence mutation or a collaborator
/// broadcast can re-derive the change without walking the grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ItemLocation {
    pub row_id: EntityId,
    pub column_id: EntityId,
    pub step_id: EntityId,
}

// ---------------------------------------------------------------------------
// Concrete item types
// ---------------------------------------------------------------------------

/// A customer touchpoint (an interaction on a channel).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct TouchPoint {
    pub id: EntityId,
    pub row_id: EntityId,
    pub column_id: EntityId,
    pub step_id: EntityId,
    pub title: String,
    /// Channel the interaction happens on (e.g. `"email"`, `"store"`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
}

/// A desired or observed outcome, optionally tied to a persona.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Outcome {
    pub id: EntityId,
    pub row_id: EntityId,
    pub column_id: EntityId,
    pub step_id: EntityId,
    pub title: String,
    /// Persona this outcome is attributed to, for sentiment rows.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub persona_id: Option<EntityId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A measurable KPI attached to a step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Metric {
    pub id: EntityId,
    pub row_id: EntityId,
    pub column_id: EntityId,
    pub step_id: EntityId,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal: Option<f64>,
}

/// An external link attached to a step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct LinkItem {
    pub id: EntityId,
    pub row_id: EntityId,
    pub column_id: EntityId,
    pub step_id: EntityId,
    pub title: String,
    pub url: String,
}

/// A generic content element for rows without a dedicated item type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct BoxElement {
    pub id: EntityId,
    pub row_id: EntityId,
    pub column_id: EntityId,
    pub step_id: EntityId,
    pub text: String,
}

/// The single free-text element of a text cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct TextElement {
    pub id: EntityId,
    pub row_id: EntityId,
    pub column_id: EntityId,
    pub text: String,
}

// ---------------------------------------------------------------------------
// RowItem — the unified draggable item
// ---------------------------------------------------------------------------

/// Any of the five draggable item kinds.
///
/// Used wherever splice/move code must be generic over the collection
/// being dragged. The variant always matches the collection the item
/// lives in; inserting a `RowItem` into a cell routes it to the
/// collection of its own kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[ts(export)]
pub enum RowItem {
    TouchPoint(TouchPoint),
    Outcome(Outcome),
    Metric(Metric),
    Link(LinkItem),
    BoxElement(BoxElement),
}

impl RowItem {
    /// The item's entity id.
    pub fn id(&self) -> &EntityId {
        match self {
            Self::TouchPoint(t) => &t.id,
            Self::Outcome(o) => &o.id,
            Self::Metric(m) => &m.id,
            Self::Link(l) => &l.id,
            Self::BoxElement(b) => &b.id,
        }
    }

    /// The collection this item belongs to.
    pub fn kind(&self) -> ItemKind {
        match self {
            Self::TouchPoint(_) => ItemKind::TouchPoints,
            Self::Outcome(_) => ItemKind::Outcomes,
            Self::Metric(_) => ItemKind::Metrics,
            Self::Link(_) => ItemKind::Links,
            Self::BoxElement(_) => ItemKind::BoxElements,
        }
    }

    /// The item's current (row, column, step) address.
    pub fn location(&self) -> ItemLocation {
        let (row_id, column_id, step_id) = match self {
            Self::TouchPoint(t) => (&t.row_id, &t.column_id, &t.step_id),
            Self::Outcome(o) => (&o.row_id, &o.column_id, &o.step_id),
            Self::Metric(m) => (&m.row_id, &m.column_id, &m.step_id),
            Self::Link(l) => (&l.row_id, &l.column_id, &l.step_id),
            Self::BoxElement(b) => (&b.row_id, &b.column_id, &b.step_id),
        };
        ItemLocation {
            row_id: row_id.clone(),
            column_id: column_id.clone(),
            step_id: step_id.clone(),
        }
    }

    /// Restamp the item's address after a move.
    pub fn set_location(&mut self, location: &ItemLocation) {
        match self {
            Self::TouchPoint(t) => {
                t.row_id = location.row_id.clone();
                t.column_id = location.column_id.clone();
                t.step_id = location.step_id.clone();
            }
            Self::Outcome(o) => {
                o.row_id = location.row_id.clone();
                o.column_id = location.column_id.clone();
                o.step_id = location.step_id.clone();
            }
            Self::Metric(m) => {
                m.row_id = location.row_id.clone();
                m.column_id = location.column_id.clone();
                m.step_id = location.step_id.clone();
            }
            Self::Link(l) => {
                l.row_id = location.row_id.clone();
                l.column_id = location.column_id.clone();
                l.step_id = location.step_id.clone();
            }
            Self::BoxElement(b) => {
                b.row_id = location.row_id.clone();
                b.column_id = location.column_id.clone();
                b.step_id = location.step_id.clone();
            }
        }
    }

    /// Replace the item's entity id (server-id absorption after CREATE).
    pub fn set_id(&mut self, id: EntityId) {
        match self {
            Self::TouchPoint(t) => t.id = id,
            Self::Outcome(o) => o.id = id,
            Self::Metric(m) => m.id = id,
            Self::Link(l) => l.id = id,
            Self::BoxElement(b) => b.id = id,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
