//! Access token sources.

use crate::error::{ClientError, ClientResult};
use async_trait::async_trait;
use std::fmt;

/// Supplies the bearer token attached to each request.
///
/// Called once per attempt, so implementations that cache and refresh
/// tokens see retries as fresh requests.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    async fn access_token(&self) -> ClientResult<String>;
}

/// A fixed token obtained elsewhere.
#[derive(Clone)]
pub struct StaticToken(String);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Reads the token from environment variable `var`.
    pub fn from_env(var: &str) -> ClientResult<Self> {
        match std::env::var(var) {
            Ok(token) if !token.trim().is_empty() => Ok(Self(token.trim().to_string())),
            Ok(_) => Err(ClientError::Auth(format!("{var} is empty"))),
            Err(_) => Err(ClientError::Auth(format!("{var} is not set"))),
        }
    }
}

impl fmt::Debug for StaticToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("StaticToken(<redacted>)")
    }
}

#[async_trait]
impl TokenProvider for StaticToken {
    async fn access_token(&self) -> ClientResult<String> {
        if self.0.is_empty() {
            return Err(ClientError::Auth("empty access token".to_string()));
        }
        Ok(self.0.clone())
    }
}
