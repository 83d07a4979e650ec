//! Waypoint map change events.
//!
//! Building blocks for broadcasting map edits to collaborators:
//!
//! - [`MapEvent`] — the canonical change envelope, carrying enough
//!   identifying fields (map, row, column, step, entity) for a remote
//!   peer to re-derive the change without the full document.
//! - [`MapEventBus`] — in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//!
//! The socket transport that would fan these out across clients is a
//! separate concern; this crate only defines the envelope and the
//! in-process hub a bridge would subscribe to.

pub mod bus;

pub use bus::{MapEvent, MapEventBus};
