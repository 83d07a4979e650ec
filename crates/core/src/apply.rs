//! Application of a single edit to an in-memory journey map.
//!
//! This is the local half of the mutation dispatcher: the session
//! layer applies the edit optimistically through [`apply_edit`] before
//! the persistence mutation resolves, and re-applies inverted entries
//! for undo/redo replays and failure rollback.
//!
//! Lookup misses never panic and never error: local and remote state
//! can drift, and the editor must stay responsive when it does. The
//! caller receives [`ApplyOutcome::NotFound`] and decides how loudly
//! to log it.

use crate::action::{EditPayload, EditVerb};
use crate::item::ItemLocation;
use crate::map::JourneyMap;
use crate::types::EntityId;

// ---------------------------------------------------------------------------
// Outcome
// ---------------------------------------------------------------------------

/// Result of applying one edit locally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// The map changed; `changed` lists the affected entity ids
    /// (forward-compatible with collaborator broadcast).
    Applied { changed: Vec<EntityId> },
    /// The edit resolved but had no effect (e.g. deleting an id that
    /// is already gone). Idempotent re-application lands here.
    Unchanged,
    /// The target row/cell/column could not be located.
    NotFound { entity: &'static str, id: EntityId },
}

impl ApplyOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied { .. })
    }
}

// ---------------------------------------------------------------------------
// Apply
// ---------------------------------------------------------------------------

/// Apply `(verb, payload)` to the map in place.
///
/// CREATE is an id-keyed upsert and DELETE of an absent id is a no-op,
/// so re-applying the same edit yields the same state. Verb/payload
/// combinations that make no sense together resolve to
/// [`ApplyOutcome::Unchanged`] rather than panicking.
pub fn apply_edit(map: &mut JourneyMap, verb: EditVerb, payload: &EditPayload) -> ApplyOutcome {
    match payload {
        EditPayload::Item { item, previous } => match verb {
            EditVerb::Create => upsert_item(map, item),
            EditVerb::Update => update_item(map, item),
            EditVerb::Delete => delete_item(map, &item.location(), item.kind(), item.id()),
            EditVerb::CreateDelete => {
                // Delete-at-old plus create-at-new; the previous item
                // carries the old location/persona.
                let mut changed = Vec::new();
                if let Some(prev) = previous {
                    if let ApplyOutcome::Applied { changed: ids } =
                        delete_item(map, &prev.location(), prev.kind(), prev.id())
                    {
                        changed.extend(ids);
                    }
                }
                match upsert_item(map, item) {
                    ApplyOutcome::Applied { changed: ids } => {
                        changed.extend(ids);
                        ApplyOutcome::Applied { changed }
                    }
                    other if changed.is_empty() => other,
                    _ => ApplyOutcome::Applied { changed },
                }
            }
            _ => ApplyOutcome::Unchanged,
        },

        EditPayload::ItemMove {
            item,
            from,
            to,
            to_index,
            ..
        } => {
            if verb != EditVerb::Drag {
                return ApplyOutcome::Unchanged;
            }
            move_item(map, item, from, to, *to_index)
        }

        EditPayload::Text {
            row_id,
            column_id,
            element,
            ..
        } => {
            let Some(cell) = map.cell_mut(row_id, column_id) else {
                return ApplyOutcome::NotFound { entity: "cell", id: column_id.clone() };
            };
            match verb {
                EditVerb::Create | EditVerb::Update => {
                    cell.text_element = Some(element.clone());
                    ApplyOutcome::Applied { changed: vec![element.id.clone()] }
                }
                EditVerb::Delete => {
                    if cell.text_element.as_ref().is_some_and(|t| t.id == element.id) {
                        cell.text_element = None;
                        ApplyOutcome::Applied { changed: vec![element.id.clone()] }
                    } else {
                        ApplyOutcome::Unchanged
                    }
                }
                _ => ApplyOutcome::Unchanged,
            }
        }

        EditPayload::Row { row, index, .. } => match verb {
            EditVerb::Create => {
                if map.row(&row.id).is_some() {
                    return ApplyOutcome::Unchanged;
                }
                let index = (*index).min(map.rows.len());
                map.rows.insert(index, row.clone());
                ApplyOutcome::Applied { changed: vec![row.id.clone()] }
            }
            EditVerb::Delete => {
                let Some(position) = map.rows.iter().position(|r| r.id == row.id) else {
                    return ApplyOutcome::Unchanged;
                };
                map.rows.remove(position);
                ApplyOutcome::Applied { changed: vec![row.id.clone()] }
            }
            EditVerb::Update => {
                let Some(target) = map.row_mut(&row.id) else {
                    return ApplyOutcome::NotFound { entity: "row", id: row.id.clone() };
                };
                // Metadata only; cell contents are edited through their
                // own item mutations.
                target.label = row.label.clone();
                target.size = row.size;
                target.collapsed = row.collapsed;
                target.locked = row.locked;
                target.personas = row.personas.clone();
                ApplyOutcome::Applied { changed: vec![row.id.clone()] }
            }
            EditVerb::Enable | EditVerb::Disable => {
                let Some(target) = map.row_mut(&row.id) else {
                    return ApplyOutcome::NotFound { entity: "row", id: row.id.clone() };
                };
                target.locked = verb == EditVerb::Disable;
                ApplyOutcome::Applied { changed: vec![row.id.clone()] }
            }
            _ => ApplyOutcome::Unchanged,
        },

        EditPayload::Column { column, index, .. } => match verb {
            EditVerb::Create => {
                if map.column(&column.id).is_some() {
                    return ApplyOutcome::Unchanged;
                }
                map.insert_column(*index, column.clone());
                ApplyOutcome::Applied { changed: vec![column.id.clone()] }
            }
            EditVerb::Delete => match map.remove_column(&column.id) {
                Some(removed) => ApplyOutcome::Applied { changed: vec![removed.id] },
                None => ApplyOutcome::Unchanged,
            },
            EditVerb::Update => {
                let Some(target) = map.column_mut(&column.id) else {
                    return ApplyOutcome::NotFound { entity: "column", id: column.id.clone() };
                };
                target.label = column.label.clone();
                target.size = column.size;
                ApplyOutcome::Applied { changed: vec![column.id.clone()] }
            }
            EditVerb::Enable | EditVerb::Disable => {
                let Some(target) = map.column_mut(&column.id) else {
                    return ApplyOutcome::NotFound { entity: "column", id: column.id.clone() };
                };
                target.disabled = verb == EditVerb::Disable;
                ApplyOutcome::Applied { changed: vec![column.id.clone()] }
            }
            EditVerb::Drag => {
                let Some(from) = map.column_index(&column.id) else {
                    return ApplyOutcome::NotFound { entity: "column", id: column.id.clone() };
                };
                let to = (*index).min(map.columns.len().saturating_sub(1));
                match map.move_column(from, to) {
                    Ok(()) if from != to => {
                        ApplyOutcome::Applied { changed: vec![column.id.clone()] }
                    }
                    Ok(()) => ApplyOutcome::Unchanged,
                    Err(_) => ApplyOutcome::Unchanged,
                }
            }
            _ => ApplyOutcome::Unchanged,
        },

        EditPayload::MapTitle { title, .. } => match verb {
            EditVerb::Update => {
                if map.title == *title {
                    return ApplyOutcome::Unchanged;
                }
                map.title = title.clone();
                ApplyOutcome::Applied { changed: vec![map.id.clone()] }
            }
            _ => ApplyOutcome::Unchanged,
        },
    }
}

// ---------------------------------------------------------------------------
// Item helpers
// ---------------------------------------------------------------------------

fn upsert_item(map: &mut JourneyMap, item: &crate::item::RowItem) -> ApplyOutcome {
    let location = item.location();
    let Some(cell) = map.cell_mut(&location.row_id, &location.column_id) else {
        return ApplyOutcome::NotFound { entity: "cell", id: location.column_id };
    };
    if let Some(index) = cell.position_of(item.kind(), item.id()) {
        if same_item(cell, item, index) {
            return ApplyOutcome::Unchanged;
        }
    }
    cell.upsert_item(item.clone());
    ApplyOutcome::Applied { changed: vec![item.id().clone()] }
}

/// Whether the stored item at `index` already equals `item`.
fn same_item(cell: &crate::map::Cell, item: &crate::item::RowItem, index: usize) -> bool {
    let stored = match item.kind() {
        crate::item::ItemKind::TouchPoints => {
            cell.touch_points.get(index).cloned().map(crate::item::RowItem::TouchPoint)
        }
        crate::item::ItemKind::Metrics => {
            cell.metrics.get(index).cloned().map(crate::item::RowItem::Metric)
        }
        crate::item::ItemKind::Outcomes => {
            cell.outcomes.get(index).cloned().map(crate::item::RowItem::Outcome)
        }
        crate::item::ItemKind::Links => {
            cell.links.get(index).cloned().map(crate::item::RowItem::Link)
        }
        crate::item::ItemKind::BoxElements => {
            cell.box_elements.get(index).cloned().map(crate::item::RowItem::BoxElement)
        }
    };
    stored.as_ref() == Some(item)
}

fn update_item(map: &mut JourneyMap, item: &crate::item::RowItem) -> ApplyOutcome {
    let location = item.location();
    let Some(cell) = map.cell_mut(&location.row_id, &location.column_id) else {
        return ApplyOutcome::NotFound { entity: "cell", id: location.column_id };
    };
    if !cell.contains_item(item.kind(), item.id()) {
        return ApplyOutcome::Unchanged;
    }
    cell.upsert_item(item.clone());
    ApplyOutcome::Applied { changed: vec![item.id().clone()] }
}

fn delete_item(
    map: &mut JourneyMap,
    location: &ItemLocation,
    kind: crate::item::ItemKind,
    id: &str,
) -> ApplyOutcome {
    let Some(cell) = map.cell_mut(&location.row_id, &location.column_id) else {
        return ApplyOutcome::NotFound { entity: "cell", id: location.column_id.clone() };
    };
    match cell.remove_item_by_id(kind, id) {
        Some(removed) => ApplyOutcome::Applied { changed: vec![removed.id().clone()] },
        None => ApplyOutcome::Unchanged,
    }
}

fn move_item(
    map: &mut JourneyMap,
    item: &crate::item::RowItem,
    from: &ItemLocation,
    to: &ItemLocation,
    to_index: usize,
) -> ApplyOutcome {
    if map.cell_mut(&to.row_id, &to.column_id).is_none() {
        return ApplyOutcome::NotFound { entity: "cell", id: to.column_id.clone() };
    }
    let Some(source_cell) = map.cell_mut(&from.row_id, &from.column_id) else {
        return ApplyOutcome::NotFound { entity: "cell", id: from.column_id.clone() };
    };
    let Some(mut moved) = source_cell.remove_item_by_id(item.kind(), item.id()) else {
        return ApplyOutcome::Unchanged;
    };
    moved.set_location(to);
    let changed = vec![moved.id().clone()];
    // Checked above; rows are not removed between the two lookups.
    if let Some(dest_cell) = map.cell_mut(&to.row_id, &to.column_id) {
        dest_cell.insert_item(to_index, moved);
    }
    ApplyOutcome::Applied { changed }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
