//! HTTP implementation of [`MapRemote`] over [`reqwest`].

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use crate::config::RemoteConfig;
use crate::error::RemoteError;
use crate::mutations::{MapMutation, MutationAck};
use crate::persist::MapRemote;

/// GraphQL-over-HTTP client for the workspace API.
///
/// Sends each mutation as a `POST {query, variables}` request and maps
/// transport failures, non-2xx statuses, and GraphQL `errors[]` onto
/// [`RemoteError`].
pub struct GraphQlRemote {
    client: reqwest::Client,
    config: RemoteConfig,
}

/// Wire shape of a GraphQL response envelope.
#[derive(Debug, Deserialize)]
struct GraphQlResponse {
    #[serde(default)]
    data: Option<serde_json::Value>,
    #[serde(default)]
    errors: Option<Vec<GraphQlErrorEntry>>,
}

#[derive(Debug, Deserialize)]
struct GraphQlErrorEntry {
    message: String,
}

impl GraphQlRemote {
    /// Create a client for the given configuration.
    pub fn new(config: RemoteConfig) -> Result<Self, RemoteError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client, config })
    }

    /// Create a client reusing an existing [`reqwest::Client`]
    /// (useful for connection pooling across sessions).
    pub fn with_client(client: reqwest::Client, config: RemoteConfig) -> Self {
        Self { client, config }
    }

    /// Extract the acknowledgement for `field` from a parsed envelope.
    fn ack_from_response(
        response: GraphQlResponse,
        field: &'static str,
    ) -> Result<MutationAck, RemoteError> {
        if let Some(errors) = response.errors {
            if !errors.is_empty() {
                return Err(RemoteError::GraphQl(
                    errors.into_iter().map(|e| e.message).collect(),
                ));
            }
        }
        let data = response.data.ok_or(RemoteError::MissingData { field })?;
        let entity = data
            .get(field)
            .filter(|v| !v.is_null())
            .ok_or(RemoteError::MissingData { field })?;
        let id = entity
            .get("id")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string());
        Ok(MutationAck { id })
    }
}

#[async_trait]
impl MapRemote for GraphQlRemote {
    async fn persist(&self, mutation: MapMutation) -> Result<MutationAck, RemoteError> {
        let field = mutation.ack_field();
        let body = json!({
            "query": mutation.document(),
            "variables": mutation.variables(),
        });

        let mut request = self.client.post(&self.config.endpoint).json(&body);
        if let Some(token) = &self.config.token {
            request = request.bearer_auth(token);
        }

        tracing::debug!(field, endpoint = %self.config.endpoint, "Sending map mutation");

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(field, status = status.as_u16(), "Map mutation rejected");
            return Err(RemoteError::Endpoint {
                status: status.as_u16(),
                body,
            });
        }

        let envelope: GraphQlResponse = response.json().await?;
        let ack = Self::ack_from_response(envelope, field)?;

        if mutation.expects_created_id() && ack.id.is_none() {
            return Err(RemoteError::MissingData { field });
        }
        Ok(ack)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
