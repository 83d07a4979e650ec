//! Waypoint GraphQL persistence client.
//!
//! The map engine persists every edit through the workspace GraphQL
//! API. This crate provides:
//!
//! - [`MapRemote`] — the async seam the session layer dispatches
//!   through, so tests substitute an in-memory fake.
//! - [`MapMutation`] — the typed mutation catalogue, one variant per
//!   row-item/row/column/map operation, each knowing its GraphQL
//!   document and variables.
//! - [`GraphQlRemote`] — the HTTP implementation over [`reqwest`].
//! - [`RemoteConfig`] — endpoint/token configuration from the
//!   environment.

pub mod client;
pub mod config;
pub mod error;
pub mod mutations;
pub mod persist;

pub use client::GraphQlRemote;
pub use config::RemoteConfig;
pub use error::RemoteError;
pub use mutations::{MapMutation, MutationAck};
pub use persist::MapRemote;
