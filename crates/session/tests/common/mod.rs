//! Shared fixtures: an in-memory recording remote and map builders.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use waypoint_core::item::{Outcome, RowItem};
use waypoint_core::map::{Column, JourneyMap, Row, RowKind};
use waypoint_remote::{MapMutation, MapRemote, MutationAck, RemoteError};
use waypoint_session::MapSession;

/// A [`MapRemote`] that records every mutation and scripts outcomes.
///
/// By default every mutation succeeds; creates acknowledge with the
/// client-submitted id unless a server id is scripted via
/// [`push_server_id`](Self::push_server_id). Failures are scripted per
/// call with [`fail_next`](Self::fail_next).
#[derive(Default)]
pub struct RecordingRemote {
    calls: Mutex<Vec<MapMutation>>,
    server_ids: Mutex<VecDeque<String>>,
    failures: Mutex<VecDeque<String>>,
}

impl RecordingRemote {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// All mutations persisted so far, in order.
    pub fn calls(&self) -> Vec<MapMutation> {
        self.calls.lock().unwrap().clone()
    }

    /// Script the id the next CREATE acknowledges with.
    pub fn push_server_id(&self, id: &str) {
        self.server_ids.lock().unwrap().push_back(id.to_string());
    }

    /// Script the next persist call to fail with a GraphQL error.
    pub fn fail_next(&self, message: &str) {
        self.failures.lock().unwrap().push_back(message.to_string());
    }

    fn echo_id(mutation: &MapMutation) -> Option<String> {
        match mutation {
            MapMutation::CreateItem { item, .. } => Some(item.id().clone()),
            MapMutation::CreateRow { row, .. } => Some(row.id.clone()),
            MapMutation::CreateColumn { column, .. } => Some(column.id.clone()),
            _ => None,
        }
    }
}

#[async_trait]
impl MapRemote for RecordingRemote {
    async fn persist(&self, mutation: MapMutation) -> Result<MutationAck, RemoteError> {
        if let Some(message) = self.failures.lock().unwrap().pop_front() {
            self.calls.lock().unwrap().push(mutation);
            return Err(RemoteError::GraphQl(vec![message]));
        }

        let id = if mutation.expects_created_id() {
            self.server_ids
                .lock()
                .unwrap()
                .pop_front()
                .or_else(|| Self::echo_id(&mutation))
        } else {
            None
        };
        self.calls.lock().unwrap().push(mutation);
        Ok(MutationAck { id })
    }
}

// ---------------------------------------------------------------------------
// Map fixtures
// ---------------------------------------------------------------------------

pub fn column(id: &str) -> Column {
    Column {
        id: id.into(),
        label: format!("Step {id}"),
        size: 1,
        loading: false,
        disabled: false,
    }
}

/// A two-column map with an outcomes row `r1` and a second row `r2`.
pub fn fixture_map() -> JourneyMap {
    let mut map = JourneyMap::new("m1".into(), "Onboarding".into(), "w1".into());
    map.insert_column(0, column("c1"));
    map.insert_column(1, column("c2"));
    let columns = map.columns.clone();
    map.rows.push(Row::new("r1".into(), RowKind::Outcomes, "Outcomes".into(), &columns));
    map.rows.push(Row::new("r2".into(), RowKind::Outcomes, "More outcomes".into(), &columns));
    map
}

pub fn outcome(id: &str, row: &str, col: &str) -> RowItem {
    RowItem::Outcome(Outcome {
        id: id.into(),
        row_id: row.into(),
        column_id: col.into(),
        step_id: col.into(),
        title: format!("Outcome {id}"),
        persona_id: None,
        description: None,
    })
}

/// A session over the fixture map with a fresh recording remote.
pub fn session() -> (MapSession, Arc<RecordingRemote>) {
    init_tracing();
    let remote = RecordingRemote::new();
    let session = MapSession::new(fixture_map(), remote.clone());
    (session, remote)
}

/// Route session logs through the test harness when `RUST_LOG` is set.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
