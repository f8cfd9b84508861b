//! Identity directory
//!
//! The training service does not own users or members. Tokens are resolved
//! and user ids are confirmed through the membership service; handlers see
//! only the [`Directory`] trait so tests can substitute an in-process stub.
//!
//! Lookups are single attempts. There is no retry and no caching.

use async_trait::async_trait;
use reqwest::{header, Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Header carrying the caller's token on calls to the membership service
pub const AUTH_TOKEN_HEADER: &str = "X-Auth-Token";

const USER_AGENT: &str = concat!("training-api/", env!("CARGO_PKG_VERSION"));

/// Authenticated identity attached to every protected request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub user_id: i64,
    /// Tenant the caller acts for
    pub member_id: i64,
    /// Whether the caller's Member may create records of its own
    pub self_managed: bool,
    /// Token presented by the caller, forwarded on directory lookups
    pub token: String,
}

/// Directory lookup errors
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// The membership service refused the token
    #[error("Token rejected by membership service (HTTP {0})")]
    Rejected(u16),

    /// The membership service could not be reached
    #[error("Membership service request failed: {0}")]
    Network(String),

    /// The membership service answered with an unexpected body
    #[error("Failed to parse membership response: {0}")]
    Parse(String),
}

/// Identity lookups needed by the training service
#[async_trait]
pub trait Directory: Send + Sync {
    /// Resolve a token into the caller it belongs to
    async fn authenticate(&self, token: &str) -> Result<Caller, DirectoryError>;

    /// Whether `user_id` names a user the token holder may read
    async fn user_exists(&self, token: &str, user_id: i64) -> Result<bool, DirectoryError>;
}

// ========================================
// Membership service client
// ========================================

#[derive(Debug, Deserialize)]
struct TokenEnvelope {
    content: TokenContent,
}

#[derive(Debug, Deserialize)]
struct TokenContent {
    user: TokenUser,
}

#[derive(Debug, Deserialize)]
struct TokenUser {
    id: i64,
    member: TokenMember,
}

#[derive(Debug, Deserialize)]
struct TokenMember {
    id: i64,
    #[serde(default)]
    self_managed: bool,
}

/// HTTP client for the membership service
///
/// - `GET {base}/auth/token/` resolves the token in `X-Auth-Token`
/// - `GET {base}/user/{id}/` confirms a user is readable; only `200` counts
pub struct MembershipClient {
    http_client: Client,
    base_url: String,
}

impl MembershipClient {
    /// Create a client for the service at `base_url`
    ///
    /// Without a timeout the client waits as long as the connection stays open.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, DirectoryError> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::USER_AGENT,
            header::HeaderValue::from_static(USER_AGENT),
        );

        let mut builder = Client::builder().default_headers(headers);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let http_client = builder
            .build()
            .map_err(|e| DirectoryError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn get(&self, path: &str, token: &str) -> Result<reqwest::Response, DirectoryError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(url = %url, "Querying membership service");

        self.http_client
            .get(&url)
            .header(AUTH_TOKEN_HEADER, token)
            .send()
            .await
            .map_err(|e| DirectoryError::Network(e.to_string()))
    }
}

#[async_trait]
impl Directory for MembershipClient {
    async fn authenticate(&self, token: &str) -> Result<Caller, DirectoryError> {
        let response = self.get("/auth/token/", token).await?;

        if response.status() != StatusCode::OK {
            return Err(DirectoryError::Rejected(response.status().as_u16()));
        }

        let envelope: TokenEnvelope = response
            .json()
            .await
            .map_err(|e| DirectoryError::Parse(e.to_string()))?;

        Ok(Caller {
            user_id: envelope.content.user.id,
            member_id: envelope.content.user.member.id,
            self_managed: envelope.content.user.member.self_managed,
            token: token.to_string(),
        })
    }

    async fn user_exists(&self, token: &str, user_id: i64) -> Result<bool, DirectoryError> {
        let response = self.get(&format!("/user/{}/", user_id), token).await?;
        debug!(user_id, status = %response.status(), "User lookup finished");
        Ok(response.status() == StatusCode::OK)
    }
}
