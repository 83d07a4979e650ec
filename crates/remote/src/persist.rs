//! The persistence seam between the session layer and the network.

use async_trait::async_trait;

use crate::error::RemoteError;
use crate::mutations::{MapMutation, MutationAck};

/// Remote persistence for map edits.
///
/// The session dispatcher funnels every mutation through this trait.
/// Production uses [`GraphQlRemote`](crate::GraphQlRemote); tests use
/// an in-memory fake that records calls and scripts outcomes.
#[async_trait]
pub trait MapRemote: Send + Sync {
    /// Persist one mutation, returning the server acknowledgement.
    async fn persist(&self, mutation: MapMutation) -> Result<MutationAck, RemoteError>;
}
