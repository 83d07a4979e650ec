//! Undo/redo controller behavior over a live session.

mod common;

use assert_matches::assert_matches;
use common::{outcome, session};
use waypoint_core::action::{EditPayload, EditVerb};
use waypoint_remote::MapMutation;
use waypoint_session::{DispatchRequest, HistoryOutcome, KeyChord, SessionError};

fn create(id: &str) -> DispatchRequest {
    DispatchRequest::forward(
        EditVerb::Create,
        EditPayload::Item { item: outcome(id, "r1", "c1"), previous: None },
    )
}

#[tokio::test]
async fn forward_edits_push_undo_and_clear_redo() {
    let (mut session, _remote) = session();

    session.dispatch(create("o1")).await.unwrap();
    session.dispatch(create("o2")).await.unwrap();
    assert_eq!(session.undo_depth(), 2);
    assert_eq!(session.redo_depth(), 0);

    session.undo().await.unwrap();
    assert_eq!(session.undo_depth(), 1);
    assert_eq!(session.redo_depth(), 1);

    // A fresh edit forks history: the redo branch is gone.
    session.dispatch(create("o3")).await.unwrap();
    assert_eq!(session.undo_depth(), 2);
    assert_eq!(session.redo_depth(), 0);
}

#[tokio::test]
async fn undo_then_redo_restores_the_forward_state() {
    let (mut session, _remote) = session();
    let initial = session.map().clone();

    session.dispatch(create("o1")).await.unwrap();
    let edited = session.map().clone();
    assert_ne!(initial, edited);

    let undone = session.undo().await.unwrap();
    assert_matches!(undone, HistoryOutcome::Applied { .. });
    assert_eq!(session.map(), &initial);

    let redone = session.redo().await.unwrap();
    assert_matches!(redone, HistoryOutcome::Applied { .. });
    assert_eq!(session.map(), &edited);
    assert_eq!(session.undo_depth(), 1);
    assert_eq!(session.redo_depth(), 0);
}

#[tokio::test]
async fn undo_replays_the_inverse_through_persistence() {
    let (mut session, remote) = session();
    session.dispatch(create("o1")).await.unwrap();

    session.undo().await.unwrap();

    let calls = remote.calls();
    assert_eq!(calls.len(), 2);
    assert_matches!(&calls[1], MapMutation::DeleteItem { item_id, .. } => {
        assert_eq!(item_id, "o1");
    });
}

#[tokio::test]
async fn empty_stacks_report_empty() {
    let (mut session, remote) = session();

    assert_eq!(session.undo().await.unwrap(), HistoryOutcome::Empty);
    assert_eq!(session.redo().await.unwrap(), HistoryOutcome::Empty);
    assert!(remote.calls().is_empty());
}

#[tokio::test]
async fn in_flight_work_blocks_history_without_consuming_it() {
    let (mut session, remote) = session();
    session.dispatch(create("o1")).await.unwrap();

    let guard = session.gate().begin();
    assert_eq!(session.undo().await.unwrap(), HistoryOutcome::Busy);
    // Nothing was popped or replayed while blocked.
    assert_eq!(session.undo_depth(), 1);
    assert_eq!(session.redo_depth(), 0);
    assert_eq!(remote.calls().len(), 1);

    drop(guard);
    assert_matches!(session.undo().await.unwrap(), HistoryOutcome::Applied { .. });
    assert_eq!(session.redo_depth(), 1);
}

#[tokio::test]
async fn failed_replay_restores_both_stacks() {
    let (mut session, remote) = session();
    session.dispatch(create("o1")).await.unwrap();
    let edited = session.map().clone();

    remote.fail_next("server went away");
    let result = session.undo().await;

    assert_matches!(result, Err(SessionError::Remote(_)));
    // The entry stays undoable and the optimistic removal was rolled
    // back, so the map still shows the edit.
    assert_eq!(session.undo_depth(), 1);
    assert_eq!(session.redo_depth(), 0);
    assert_eq!(session.map(), &edited);

    // The retry goes through once the remote recovers.
    session.undo().await.unwrap();
    assert_eq!(session.undo_depth(), 0);
    assert_eq!(session.redo_depth(), 1);
}

#[tokio::test]
async fn history_cap_evicts_the_oldest_entry() {
    let (mut session, _remote) = session();

    for i in 0..=waypoint_core::edit_log::MAX_HISTORY_DEPTH {
        session.dispatch(create(&format!("o{i}"))).await.unwrap();
    }

    assert_eq!(session.undo_depth(), waypoint_core::edit_log::MAX_HISTORY_DEPTH);
}

#[tokio::test]
async fn ctrl_z_resolves_to_undo_and_is_consumed() {
    let (mut session, _remote) = session();
    session.dispatch(create("o1")).await.unwrap();

    let undo_chord = KeyChord { key: "z".into(), ctrl: true, shift: false, meta: false };
    let handled = session.handle_key(&undo_chord).await.unwrap();
    assert_matches!(handled, Some(HistoryOutcome::Applied { .. }));
    assert_eq!(session.redo_depth(), 1);

    let redo_chord = KeyChord { key: "Z".into(), ctrl: true, shift: true, meta: false };
    let handled = session.handle_key(&redo_chord).await.unwrap();
    assert_matches!(handled, Some(HistoryOutcome::Applied { .. }));
    assert_eq!(session.redo_depth(), 0);

    let plain = KeyChord { key: "z".into(), ctrl: false, shift: false, meta: false };
    assert_eq!(session.handle_key(&plain).await.unwrap(), None);
}
