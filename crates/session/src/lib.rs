//! Waypoint map editing session.
//!
//! One [`MapSession`] is created when a map is opened and dropped on
//! navigation; it owns the in-memory [`JourneyMap`], the undo/redo
//! [`EditLog`], and the in-flight gate, so multiple sessions can
//! coexist (and be exercised independently in tests) without any
//! process-wide state.
//!
//! - [`dispatcher`] — the single funnel every edit goes through:
//!   optimistic local apply, remote persistence, rollback on failure,
//!   history recording, collaborator event publishing.
//! - [`controller`] — keyboard-driven undo/redo over the edit log.
//! - [`gate`] — the per-session in-flight counter that keeps replays
//!   from interleaving with pending mutations.
//! - [`keys`] — platform-sensitive shortcut resolution.
//!
//! [`JourneyMap`]: waypoint_core::map::JourneyMap
//! [`EditLog`]: waypoint_core::edit_log::EditLog

pub mod controller;
pub mod dispatcher;
pub mod error;
pub mod gate;
pub mod keys;
pub mod session;

pub use controller::HistoryOutcome;
pub use dispatcher::{DispatchRequest, DispatchResult, ReplaySource};
pub use error::SessionError;
pub use gate::{InFlightGate, InFlightGuard};
pub use keys::{history_command, HistoryCommand, KeyChord, Platform};
pub use session::MapSession;
