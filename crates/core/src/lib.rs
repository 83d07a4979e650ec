//! Waypoint journey-map domain core.
//!
//! Pure in-memory logic for the journey-map editor, with zero network or
//! runtime dependencies so it can be exercised directly from tests and
//! reused by any future tooling:
//!
//! - [`map`] — the journey-map document model (columns × rows × cells).
//! - [`item`] — the row-item kinds a cell holds (touchpoints, outcomes,
//!   metrics, links, box elements, text).
//! - [`action`] — edit verbs, their inverse table, and the edit-log entry.
//! - [`edit_log`] — the bounded undo/redo stacks owned by a map session.
//! - [`reconcile`] — drag-and-drop grid reconciliation.
//! - [`apply`] — application of a single edit to an in-memory map.

pub mod action;
pub mod apply;
pub mod edit_log;
pub mod error;
pub mod item;
pub mod map;
pub mod reconcile;
pub mod types;

pub use error::CoreError;
