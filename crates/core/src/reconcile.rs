//! Drag-and-drop grid reconciliation.
//!
//! Given a drop event and the current row matrix, compute the new
//! matrix with the dragged item moved, plus the pre-move identifiers
//! the caller needs to issue the matching persistence mutation and to
//! record an undo entry. The input rows are never mutated; the caller
//! swaps in the returned matrix after the move is accepted.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::item::{ItemLocation, RowItem};
use crate::map::{Row, RowKind};

// ---------------------------------------------------------------------------
// Drag identifiers
// ---------------------------------------------------------------------------

/// One end of a drag, addressed structurally by position.
///
/// Indices reference the session's current row matrix directly; there
/// is no encoded droppable-id string to parse back apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct DragEndpoint {
    pub row_index: usize,
    pub cell_index: usize,
    pub item_index: usize,
}

/// A completed drag gesture.
///
/// `destination` is `None` when the item was dropped outside any valid
/// target, which is a normal, expected case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct DragResult {
    /// Kind of the row being dragged within; resolves the collection.
    pub row_kind: RowKind,
    pub source: DragEndpoint,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<DragEndpoint>,
}

/// The result of reconciling a drag.
#[derive(Debug, Clone, PartialEq)]
pub struct DragOutcome {
    /// The new row matrix with the item moved.
    pub rows: Vec<Row>,
    /// The moved item, restamped with its new row/column/step ids.
    pub item: RowItem,
    /// Where the item lived before the move.
    pub prior: ItemLocation,
    /// Index of the item within its source collection before the move.
    pub prior_index: usize,
}

// ---------------------------------------------------------------------------
// Reconciliation
// ---------------------------------------------------------------------------

/// Compute the row matrix after a drag, without mutating the input.
///
/// Returns `None` when the destination is absent (dropped outside any
/// target) or when any index no longer resolves against the current
/// matrix — both are treated as no-ops the caller simply ignores.
///
/// Exactly one of three mutually exclusive branches applies:
/// cross-row move, same-row cross-cell move, or same-cell reorder.
/// Cross-row and cross-cell moves restamp the item's row/column/step
/// ids from the destination cell.
pub fn reconcile_drag(result: &DragResult, rows: &[Row]) -> Option<DragOutcome> {
    let destination = result.destination.as_ref()?;
    let source = &result.source;
    let kind = result.row_kind.item_kind();

    let src_row = rows.get(source.row_index)?;
    let src_cell = src_row.cells.get(source.cell_index)?;
    if source.item_index >= src_cell.item_count(kind) {
        return None;
    }
    let dest_row = rows.get(destination.row_index)?;
    let dest_cell = dest_row.cells.get(destination.cell_index)?;

    let prior = ItemLocation {
        row_id: src_row.id.clone(),
        column_id: src_cell.column_id.clone(),
        step_id: src_cell.step_id.clone(),
    };
    let target = ItemLocation {
        row_id: dest_row.id.clone(),
        column_id: dest_cell.column_id.clone(),
        step_id: dest_cell.step_id.clone(),
    };

    let mut rows = rows.to_vec();
    let mut item =
        rows[source.row_index].cells[source.cell_index].remove_item(kind, source.item_index)?;

    if source.row_index != destination.row_index {
        // Cross-row move.
        item.set_location(&target);
        rows[destination.row_index].cells[destination.cell_index]
            .insert_item(destination.item_index, item.clone());
    } else if source.cell_index != destination.cell_index {
        // Same row, different cell.
        item.set_location(&target);
        rows[source.row_index].cells[destination.cell_index]
            .insert_item(destination.item_index, item.clone());
    } else {
        // Reorder within the same cell.
        rows[source.row_index].cells[source.cell_index]
            .insert_item(destination.item_index, item.clone());
    }

    Some(DragOutcome {
        rows,
        item,
        prior,
        prior_index: source.item_index,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::{ItemKind, TouchPoint};
    use crate::map::{Cell, Column, Row};

    fn column(id: &str) -> Column {
        Column {
            id: id.into(),
            label: id.into(),
            size: 1,
            loading: false,
            disabled: false,
        }
    }

    fn touch_point(id: &str, row: &str, col: &str) -> TouchPoint {
        TouchPoint {
            id: id.into(),
            row_id: row.into(),
            column_id: col.into(),
            step_id: col.into(),
            title: format!("tp {id}"),
            channel: None,
        }
    }

    /// Two touchpoint rows over two columns; row 0 has items t1..t3 in
    /// cell 0 and t4 in cell 1, row 1 starts empty.
    fn fixture() -> Vec<Row> {
        let columns = [column("c1"), column("c2")];
        let mut r1 = Row::new("r1".into(), RowKind::TouchPoints, "Touchpoints".into(), &columns);
        let mut r2 = Row::new("r2".into(), RowKind::TouchPoints, "More".into(), &columns);
        r1.cells[0].touch_points =
            vec![touch_point("t1", "r1", "c1"), touch_point("t2", "r1", "c1"), touch_point("t3", "r1", "c1")];
        r1.cells[1].touch_points = vec![touch_point("t4", "r1", "c2")];
        r2.cells = vec![
            Cell::empty("c1".into(), "c1".into()),
            Cell::empty("c2".into(), "c2".into()),
        ];
        vec![r1, r2]
    }

    fn total(rows: &[Row], kind: ItemKind) -> usize {
        rows.iter().map(|r| r.item_count(kind)).sum()
    }

    fn drag(source: DragEndpoint, destination: DragEndpoint) -> DragResult {
        DragResult {
            row_kind: RowKind::TouchPoints,
            source,
            destination: Some(destination),
        }
    }

    #[test]
    fn missing_destination_is_a_noop() {
        let rows = fixture();
        let before = rows.clone();
        let result = DragResult {
            row_kind: RowKind::TouchPoints,
            source: DragEndpoint { row_index: 0, cell_index: 0, item_index: 0 },
            destination: None,
        };

        assert!(reconcile_drag(&result, &rows).is_none());
        assert_eq!(rows, before);
    }

    #[test]
    fn cross_cell_move_preserves_total_item_count() {
        let rows = fixture();
        let result = drag(
            DragEndpoint { row_index: 0, cell_index: 0, item_index: 0 },
            DragEndpoint { row_index: 0, cell_index: 1, item_index: 1 },
        );

        let outcome = reconcile_drag(&result, &rows).unwrap();
        assert_eq!(total(&outcome.rows, ItemKind::TouchPoints), 4);
        assert_eq!(outcome.rows[0].cells[0].touch_points.len(), 2);
        assert_eq!(outcome.rows[0].cells[1].touch_points.len(), 2);
        // Restamped onto the destination column/step.
        assert_eq!(outcome.rows[0].cells[1].touch_points[1].id, "t1");
        assert_eq!(outcome.rows[0].cells[1].touch_points[1].column_id, "c2");
        // Input untouched.
        assert_eq!(rows[0].cells[0].touch_points.len(), 3);
    }

    #[test]
    fn cross_row_move_restamps_row_column_and_step() {
        let rows = fixture();
        let result = drag(
            DragEndpoint { row_index: 0, cell_index: 0, item_index: 1 },
            DragEndpoint { row_index: 1, cell_index: 1, item_index: 0 },
        );

        let outcome = reconcile_drag(&result, &rows).unwrap();
        let moved = &outcome.rows[1].cells[1].touch_points[0];
        assert_eq!(moved.id, "t2");
        assert_eq!(moved.row_id, "r2");
        assert_eq!(moved.column_id, "c2");
        assert_eq!(moved.step_id, "c2");
        assert_eq!(outcome.prior.row_id, "r1");
        assert_eq!(outcome.prior.column_id, "c1");
        assert_eq!(outcome.prior_index, 1);
        assert_eq!(total(&outcome.rows, ItemKind::TouchPoints), 4);
    }

    #[test]
    fn same_cell_reorder_moves_the_item_to_the_new_index() {
        let rows = fixture();
        let result = drag(
            DragEndpoint { row_index: 0, cell_index: 0, item_index: 0 },
            DragEndpoint { row_index: 0, cell_index: 0, item_index: 2 },
        );

        let outcome = reconcile_drag(&result, &rows).unwrap();
        let ids: Vec<_> = outcome.rows[0].cells[0]
            .touch_points
            .iter()
            .map(|t| t.id.as_str())
            .collect();
        assert_eq!(ids, ["t2", "t3", "t1"]);
        // A pure reorder keeps the item's address.
        assert_eq!(outcome.item.location(), outcome.prior);
    }

    #[test]
    fn out_of_range_indices_resolve_to_none() {
        let rows = fixture();
        let stale_item = drag(
            DragEndpoint { row_index: 0, cell_index: 0, item_index: 9 },
            DragEndpoint { row_index: 0, cell_index: 1, item_index: 0 },
        );
        let stale_row = drag(
            DragEndpoint { row_index: 5, cell_index: 0, item_index: 0 },
            DragEndpoint { row_index: 0, cell_index: 1, item_index: 0 },
        );

        assert!(reconcile_drag(&stale_item, &rows).is_none());
        assert!(reconcile_drag(&stale_row, &rows).is_none());
    }

    #[test]
    fn destination_index_past_the_end_appends() {
        let rows = fixture();
        let result = drag(
            DragEndpoint { row_index: 0, cell_index: 0, item_index: 0 },
            DragEndpoint { row_index: 1, cell_index: 0, item_index: 99 },
        );

        let outcome = reconcile_drag(&result, &rows).unwrap();
        assert_eq!(outcome.rows[1].cells[0].touch_points.len(), 1);
        assert_eq!(total(&outcome.rows, ItemKind::TouchPoints), 4);
    }
}
