//! Dispatcher behavior: optimistic apply, persistence, rollback,
//! server-id absorption, and compound operations.

mod common;

use assert_matches::assert_matches;
use common::{outcome, session};
use waypoint_core::action::{EditPayload, EditVerb, SubAction};
use waypoint_core::item::{ItemKind, RowItem};
use waypoint_core::reconcile::{reconcile_drag, DragEndpoint, DragResult};
use waypoint_core::map::RowKind;
use waypoint_remote::MapMutation;
use waypoint_session::{DispatchRequest, DispatchResult, SessionError};

fn create_request(item: RowItem) -> DispatchRequest {
    DispatchRequest::forward(EditVerb::Create, EditPayload::Item { item, previous: None })
}

#[tokio::test]
async fn dispatch_applies_locally_and_persists_remotely() {
    let (mut session, remote) = session();

    let result = session
        .dispatch(create_request(outcome("o1", "r1", "c1")))
        .await
        .unwrap();

    assert_matches!(result, DispatchResult::Applied { entry_id: Some(_), .. });
    assert_eq!(session.map().row("r1").unwrap().cells[0].outcomes.len(), 1);
    assert_eq!(session.undo_depth(), 1);

    let calls = remote.calls();
    assert_eq!(calls.len(), 1);
    assert_matches!(&calls[0], MapMutation::CreateItem { map_id, item } => {
        assert_eq!(map_id, "m1");
        assert_eq!(item.id(), "o1");
    });
}

#[tokio::test]
async fn remote_failure_rolls_the_optimistic_edit_back() {
    let (mut session, remote) = session();
    remote.fail_next("row is archived");

    let before = session.map().clone();
    let result = session.dispatch(create_request(outcome("o1", "r1", "c1"))).await;

    assert_matches!(result, Err(SessionError::Remote(_)));
    assert_eq!(session.map(), &before);
    // A failed edit leaves no history behind.
    assert_eq!(session.undo_depth(), 0);
    assert_eq!(session.redo_depth(), 0);
}

#[tokio::test]
async fn lookup_miss_is_skipped_without_a_network_call() {
    let (mut session, remote) = session();

    let result = session
        .dispatch(create_request(outcome("o1", "no-such-row", "c1")))
        .await
        .unwrap();

    assert_eq!(result, DispatchResult::Skipped);
    assert!(remote.calls().is_empty());
    assert_eq!(session.undo_depth(), 0);
}

#[tokio::test]
async fn deleting_an_absent_item_is_skipped() {
    let (mut session, remote) = session();

    let result = session
        .dispatch(DispatchRequest::forward(
            EditVerb::Delete,
            EditPayload::Item { item: outcome("ghost", "r1", "c1"), previous: None },
        ))
        .await
        .unwrap();

    assert_eq!(result, DispatchResult::Skipped);
    assert!(remote.calls().is_empty());
}

#[tokio::test]
async fn create_absorbs_the_server_assigned_id() {
    let (mut session, remote) = session();
    remote.push_server_id("srv-9");

    let result = session
        .dispatch(create_request(outcome("tmp-1", "r1", "c1")))
        .await
        .unwrap();

    assert_matches!(result, DispatchResult::Applied { server_id: Some(id), .. } => {
        assert_eq!(id, "srv-9");
    });
    let stored = &session.map().row("r1").unwrap().cells[0].outcomes[0];
    assert_eq!(stored.id, "srv-9");

    // Undoing the create must delete by the server id, not the
    // optimistic temp id.
    session.undo().await.unwrap();
    let calls = remote.calls();
    assert_matches!(calls.last().unwrap(), MapMutation::DeleteItem { item_id, .. } => {
        assert_eq!(item_id, "srv-9");
    });
}

#[tokio::test]
async fn compound_create_delete_persists_both_halves_in_order() {
    let (mut session, remote) = session();
    session
        .dispatch(create_request(outcome("o1", "r1", "c1")))
        .await
        .unwrap();

    let old = outcome("o1", "r1", "c1");
    let mut replacement = outcome("o1", "r2", "c2");
    if let RowItem::Outcome(o) = &mut replacement {
        o.persona_id = Some("p1".into());
    }
    session
        .dispatch(
            DispatchRequest::forward(
                EditVerb::CreateDelete,
                EditPayload::Item { item: replacement, previous: Some(old) },
            )
            .with_sub_action(SubAction::CreateDelete),
        )
        .await
        .unwrap();

    let calls = remote.calls();
    assert_eq!(calls.len(), 3);
    assert_matches!(&calls[1], MapMutation::DeleteItem { item_id, location, .. } => {
        assert_eq!(item_id, "o1");
        assert_eq!(location.row_id, "r1");
    });
    assert_matches!(&calls[2], MapMutation::CreateItem { item, .. } => {
        assert_eq!(item.location().row_id, "r2");
    });
    assert_eq!(session.map().row("r1").unwrap().cells[0].outcomes.len(), 0);
    assert_eq!(session.map().row("r2").unwrap().cells[1].outcomes.len(), 1);
}

#[tokio::test]
async fn drag_dispatch_preserves_total_item_count() {
    let (mut session, remote) = session();
    session.dispatch(create_request(outcome("o1", "r1", "c1"))).await.unwrap();
    session.dispatch(create_request(outcome("o2", "r1", "c1"))).await.unwrap();

    let drag = DragResult {
        row_kind: RowKind::Outcomes,
        source: DragEndpoint { row_index: 0, cell_index: 0, item_index: 0 },
        destination: Some(DragEndpoint { row_index: 1, cell_index: 1, item_index: 0 }),
    };
    let outcome_state = reconcile_drag(&drag, &session.map().rows).unwrap();
    let payload = EditPayload::ItemMove {
        item: outcome_state.item.clone(),
        from: outcome_state.prior.clone(),
        from_index: outcome_state.prior_index,
        to: outcome_state.item.location(),
        to_index: 0,
    };

    session
        .dispatch(DispatchRequest::forward(EditVerb::Drag, payload))
        .await
        .unwrap();

    assert_eq!(session.map().item_count(ItemKind::Outcomes), 2);
    assert_eq!(session.map().row("r2").unwrap().cells[1].outcomes[0].id, "o1");
    assert_matches!(remote.calls().last().unwrap(), MapMutation::MoveItem { item_id, to, .. } => {
        assert_eq!(item_id, "o1");
        assert_eq!(to.row_id, "r2");
    });
}

#[tokio::test]
async fn dispatch_publishes_a_change_event() {
    let (mut session, _remote) = session();
    let mut events = session.subscribe_events();

    session.dispatch(create_request(outcome("o1", "r1", "c1"))).await.unwrap();

    let event = events.recv().await.unwrap();
    assert_eq!(event.event_type, "item.created");
    assert_eq!(event.map_id, "m1");
    assert_eq!(event.row_id.as_deref(), Some("r1"));
    assert_eq!(event.entity_id.as_deref(), Some("o1"));
}
