//! The journey-map document model (columns × rows × cells).
//!
//! A [`JourneyMap`] is owned exclusively by the open map session and
//! replaced wholesale on navigation. Every [`Row`] keeps one [`Cell`]
//! per map column, positionally aligned with [`JourneyMap::columns`];
//! all column structure operations reindex every row's cell vector in
//! lockstep so that alignment is maintained by a single authority.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreError;
use crate::item::{ItemKind, RowItem, TextElement};
use crate::types::EntityId;

// ---------------------------------------------------------------------------
// Limits
// ---------------------------------------------------------------------------

/// Maximum length of a map title.
pub const MAX_TITLE_LEN: usize = 120;

/// Maximum length of a row or column label.
pub const MAX_LABEL_LEN: usize = 80;

/// Minimum span width multiplier for a row or column.
pub const MIN_SIZE: i32 = 1;

/// Maximum span width multiplier for a row or column.
pub const MAX_SIZE: i32 = 4;

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate a map title (non-empty after trimming, length-capped).
pub fn validate_title(title: &str) -> Result<(), CoreError> {
    if title.trim().is_empty() {
        return Err(CoreError::Validation("Map title must not be empty".into()));
    }
    if title.len() > MAX_TITLE_LEN {
        return Err(CoreError::Validation(format!(
            "Map title exceeds {MAX_TITLE_LEN} characters"
        )));
    }
    Ok(())
}

/// Validate a row/column label (may be empty, length-capped).
pub fn validate_label(label: &str) -> Result<(), CoreError> {
    if label.len() > MAX_LABEL_LEN {
        return Err(CoreError::Validation(format!(
            "Label exceeds {MAX_LABEL_LEN} characters"
        )));
    }
    Ok(())
}

/// Validate a span width multiplier.
pub fn validate_size(size: i32) -> Result<(), CoreError> {
    if !(MIN_SIZE..=MAX_SIZE).contains(&size) {
        return Err(CoreError::Validation(format!(
            "Size must be between {MIN_SIZE} and {MAX_SIZE}, got {size}"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Row kind
// ---------------------------------------------------------------------------

/// Discriminant identifying which kind of content a row holds.
///
/// A closed enum so that adding a new row kind is a compiler-enforced
/// change everywhere the kind is matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export)]
pub enum RowKind {
    TouchPoints,
    Metrics,
    Outcomes,
    Links,
    BoxElement,
    Text,
    Insights,
    Sentiment,
    Divider,
}

impl RowKind {
    /// The draggable collection this row kind stores.
    ///
    /// Kinds without a dedicated collection (text, insights, sentiment,
    /// divider) fall back to [`ItemKind::BoxElements`], matching how the
    /// editor treats generic content rows.
    pub fn item_kind(self) -> ItemKind {
        match self {
            Self::TouchPoints => ItemKind::TouchPoints,
            Self::Metrics => ItemKind::Metrics,
            Self::Outcomes => ItemKind::Outcomes,
            Self::Links => ItemKind::Links,
            Self::BoxElement | Self::Text | Self::Insights | Self::Sentiment | Self::Divider => {
                ItemKind::BoxElements
            }
        }
    }

    /// Whether rows of this kind carry persona assignments.
    pub fn supports_personas(self) -> bool {
        matches!(self, Self::Sentiment | Self::Outcomes)
    }
}

// ---------------------------------------------------------------------------
// Columns and personas
// ---------------------------------------------------------------------------

/// A step column of the grid. Ordering is significant (left-to-right).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Column {
    pub id: EntityId,
    pub label: String,
    /// Span width multiplier.
    pub size: i32,
    /// Set while a structural mutation for this column is in flight.
    #[serde(default)]
    pub loading: bool,
    /// Disabled columns are greyed out and excluded from editing.
    #[serde(default)]
    pub disabled: bool,
}

/// Reference to a persona assigned to a sentiment/outcome row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PersonaRef {
    pub id: EntityId,
    pub name: String,
}

// ---------------------------------------------------------------------------
// Cell
// ---------------------------------------------------------------------------

/// The cell at a (row, column) intersection holding the actual items.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Cell {
    /// Step this cell belongs to (the column's step id).
    pub step_id: EntityId,
    pub column_id: EntityId,
    #[serde(default)]
    pub touch_points: Vec<crate::item::TouchPoint>,
    #[serde(default)]
    pub outcomes: Vec<crate::item::Outcome>,
    #[serde(default)]
    pub metrics: Vec<crate::item::Metric>,
    #[serde(default)]
    pub links: Vec<crate::item::LinkItem>,
    #[serde(default)]
    pub box_elements: Vec<crate::item::BoxElement>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_element: Option<TextElement>,
}

impl Cell {
    /// An empty cell for the given column.
    pub fn empty(column_id: EntityId, step_id: EntityId) -> Self {
        Self {
            step_id,
            column_id,
            ..Default::default()
        }
    }

    /// Number of items in the collection of the given kind.
    pub fn item_count(&self, kind: ItemKind) -> usize {
        match kind {
            ItemKind::TouchPoints => self.touch_points.len(),
            ItemKind::Metrics => self.metrics.len(),
            ItemKind::Outcomes => self.outcomes.len(),
            ItemKind::Links => self.links.len(),
            ItemKind::BoxElements => self.box_elements.len(),
        }
    }

    /// Whether the collection of `kind` contains an item with `id`.
    pub fn contains_item(&self, kind: ItemKind, id: &str) -> bool {
        self.position_of(kind, id).is_some()
    }

    /// Index of the item with `id` in the collection of `kind`.
    pub fn position_of(&self, kind: ItemKind, id: &str) -> Option<usize> {
        match kind {
            ItemKind::TouchPoints => self.touch_points.iter().position(|i| i.id == id),
            ItemKind::Metrics => self.metrics.iter().position(|i| i.id == id),
            ItemKind::Outcomes => self.outcomes.iter().position(|i| i.id == id),
            ItemKind::Links => self.links.iter().position(|i| i.id == id),
            ItemKind::BoxElements => self.box_elements.iter().position(|i| i.id == id),
        }
    }

    /// Remove and return the item at `index` from the collection of `kind`.
    pub fn remove_item(&mut self, kind: ItemKind, index: usize) -> Option<RowItem> {
        if index >= self.item_count(kind) {
            return None;
        }
        Some(match kind {
            ItemKind::TouchPoints => RowItem::TouchPoint(self.touch_points.remove(index)),
            ItemKind::Metrics => RowItem::Metric(self.metrics.remove(index)),
            ItemKind::Outcomes => RowItem::Outcome(self.outcomes.remove(index)),
            ItemKind::Links => RowItem::Link(self.links.remove(index)),
            ItemKind::BoxElements => RowItem::BoxElement(self.box_elements.remove(index)),
        })
    }

    /// Remove and return the item with `id` from the collection of `kind`.
    ///
    /// Returns `None` if the id is absent (idempotent delete).
    pub fn remove_item_by_id(&mut self, kind: ItemKind, id: &str) -> Option<RowItem> {
        let index = self.position_of(kind, id)?;
        self.remove_item(kind, index)
    }

    /// Insert an item into the collection of its own kind at `index`,
    /// clamped to the collection length.
    pub fn insert_item(&mut self, index: usize, item: RowItem) {
        let index = index.min(self.item_count(item.kind()));
        match item {
            RowItem::TouchPoint(t) => self.touch_points.insert(index, t),
            RowItem::Metric(m) => self.metrics.insert(index, m),
            RowItem::Outcome(o) => self.outcomes.insert(index, o),
            RowItem::Link(l) => self.links.insert(index, l),
            RowItem::BoxElement(b) => self.box_elements.insert(index, b),
        }
    }

    /// Id-keyed upsert: replace the item with the same id in place, or
    /// append when absent. Never produces a duplicate id.
    pub fn upsert_item(&mut self, item: RowItem) {
        match self.position_of(item.kind(), item.id()) {
            Some(index) => {
                let kind = item.kind();
                self.remove_item(kind, index);
                self.insert_item(index, item);
            }
            None => {
                let end = self.item_count(item.kind());
                self.insert_item(end, item);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Row
// ---------------------------------------------------------------------------

/// A horizontal band of the grid, holding one cell per column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Row {
    pub id: EntityId,
    pub kind: RowKind,
    pub label: String,
    pub size: i32,
    #[serde(default)]
    pub collapsed: bool,
    #[serde(default)]
    pub locked: bool,
    pub cells: Vec<Cell>,
    #[serde(default)]
    pub personas: Vec<PersonaRef>,
}

impl Row {
    /// A row of `kind` with one empty cell per given column.
    pub fn new(id: EntityId, kind: RowKind, label: String, columns: &[Column]) -> Self {
        let cells = columns
            .iter()
            .map(|c| Cell::empty(c.id.clone(), step_id_for(c)))
            .collect();
        Self {
            id,
            kind,
            label,
            size: MIN_SIZE,
            collapsed: false,
            locked: false,
            cells,
            personas: Vec::new(),
        }
    }

    /// The cell aligned with the given column, if any.
    pub fn cell(&self, column_id: &str) -> Option<&Cell> {
        self.cells.iter().find(|c| c.column_id == column_id)
    }

    pub fn cell_mut(&mut self, column_id: &str) -> Option<&mut Cell> {
        self.cells.iter_mut().find(|c| c.column_id == column_id)
    }

    /// Total number of items of `kind` across all cells of this row.
    pub fn item_count(&self, kind: ItemKind) -> usize {
        self.cells.iter().map(|c| c.item_count(kind)).sum()
    }
}

/// Step id derived for a column. The backend assigns one step per
/// column; locally-created columns reuse the column id until then.
fn step_id_for(column: &Column) -> EntityId {
    column.id.clone()
}

// ---------------------------------------------------------------------------
// JourneyMap
// ---------------------------------------------------------------------------

/// The journey-map grid document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct JourneyMap {
    pub id: EntityId,
    pub title: String,
    pub workspace_id: EntityId,
    pub columns: Vec<Column>,
    pub rows: Vec<Row>,
}

impl JourneyMap {
    /// An empty map with no columns or rows.
    pub fn new(id: EntityId, title: String, workspace_id: EntityId) -> Self {
        Self {
            id,
            title,
            workspace_id,
            columns: Vec::new(),
            rows: Vec::new(),
        }
    }

    pub fn row(&self, row_id: &str) -> Option<&Row> {
        self.rows.iter().find(|r| r.id == row_id)
    }

    pub fn row_mut(&mut self, row_id: &str) -> Option<&mut Row> {
        self.rows.iter_mut().find(|r| r.id == row_id)
    }

    pub fn column(&self, column_id: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.id == column_id)
    }

    pub fn column_mut(&mut self, column_id: &str) -> Option<&mut Column> {
        self.columns.iter_mut().find(|c| c.id == column_id)
    }

    /// The cell at a (row, column) intersection.
    pub fn cell_mut(&mut self, row_id: &str, column_id: &str) -> Option<&mut Cell> {
        self.row_mut(row_id)?.cell_mut(column_id)
    }

    /// Index of the column with `column_id`.
    pub fn column_index(&self, column_id: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.id == column_id)
    }

    /// Insert a column at `index` (clamped) and splice an empty cell
    /// into every row at the same position.
    pub fn insert_column(&mut self, index: usize, column: Column) {
        let index = index.min(self.columns.len());
        let cell_template = (column.id.clone(), step_id_for(&column));
        self.columns.insert(index, column);
        for row in &mut self.rows {
            row.cells.insert(
                index.min(row.cells.len()),
                Cell::empty(cell_template.0.clone(), cell_template.1.clone()),
            );
        }
    }

    /// Remove the column with `column_id`, removing the aligned cell
    /// from every row. Returns the removed column, or `None` if absent.
    pub fn remove_column(&mut self, column_id: &str) -> Option<Column> {
        let index = self.column_index(column_id)?;
        let column = self.columns.remove(index);
        for row in &mut self.rows {
            if index < row.cells.len() {
                row.cells.remove(index);
            }
        }
        Some(column)
    }

    /// Move a column from `from` to `to`, reindexing every row's cell
    /// vector in lockstep so positional alignment is preserved.
    pub fn move_column(&mut self, from: usize, to: usize) -> Result<(), CoreError> {
        let len = self.columns.len();
        if from >= len || to >= len {
            return Err(CoreError::Validation(format!(
                "Column move out of range: {from} -> {to} with {len} columns"
            )));
        }
        if from == to {
            return Ok(());
        }
        let column = self.columns.remove(from);
        self.columns.insert(to, column);
        for row in &mut self.rows {
            if from < row.cells.len() {
                let cell = row.cells.remove(from);
                row.cells.insert(to.min(row.cells.len()), cell);
            }
        }
        Ok(())
    }

    /// Total number of items of `kind` across the whole map.
    pub fn item_count(&self, kind: ItemKind) -> usize {
        self.rows.iter().map(|r| r.item_count(kind)).sum()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
