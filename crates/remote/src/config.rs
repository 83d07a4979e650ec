//! Remote endpoint configuration from the environment.

use crate::error::RemoteError;

/// Environment variable naming the GraphQL endpoint URL.
pub const ENV_GRAPHQL_URL: &str = "WAYPOINT_GRAPHQL_URL";

/// Environment variable holding the bearer token, if the workspace
/// requires authentication.
pub const ENV_API_TOKEN: &str = "WAYPOINT_API_TOKEN";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Connection settings for the workspace GraphQL API.
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    /// GraphQL endpoint URL, e.g. `https://api.example.com/graphql`.
    pub endpoint: String,
    /// Optional bearer token sent as `Authorization: Bearer <token>`.
    pub token: Option<String>,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl RemoteConfig {
    /// A config for the given endpoint with defaults for the rest.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            token: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Attach a bearer token.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Load configuration from the environment (after loading `.env`
    /// if present).
    ///
    /// `WAYPOINT_GRAPHQL_URL` is required; `WAYPOINT_API_TOKEN` is
    /// optional.
    pub fn from_env() -> Result<Self, RemoteError> {
        // A missing .env file is fine; real environments set vars directly.
        let _ = dotenvy::dotenv();

        let endpoint = std::env::var(ENV_GRAPHQL_URL)
            .map_err(|_| RemoteError::Config(format!("{ENV_GRAPHQL_URL} is not set")))?;
        if endpoint.trim().is_empty() {
            return Err(RemoteError::Config(format!("{ENV_GRAPHQL_URL} is empty")));
        }

        let token = std::env::var(ENV_API_TOKEN).ok().filter(|t| !t.is_empty());

        Ok(Self {
            endpoint,
            token,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_attaches_the_token() {
        let config = RemoteConfig::new("https://api.test/graphql").with_token("t0k3n");
        assert_eq!(config.endpoint, "https://api.test/graphql");
        assert_eq!(config.token.as_deref(), Some("t0k3n"));
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }
}
