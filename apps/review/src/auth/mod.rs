//! Authentication is delegated to an external provider. The service only
//! needs to know whether the caller is signed in, or whether that is still
//! being determined.

use async_trait::async_trait;
use axum::http::{header, HeaderMap};
use thiserror::Error;

pub mod remote;

pub use remote::RemoteAuth;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthStatus {
    pub is_authenticated: bool,
    pub is_loading: bool,
}

impl AuthStatus {
    pub const AUTHENTICATED: AuthStatus = AuthStatus {
        is_authenticated: true,
        is_loading: false,
    };
    pub const ANONYMOUS: AuthStatus = AuthStatus {
        is_authenticated: false,
        is_loading: false,
    };
    pub const LOADING: AuthStatus = AuthStatus {
        is_authenticated: false,
        is_loading: true,
    };

    /// True once the check has finished and the caller is not signed in.
    pub fn requires_redirect(&self) -> bool {
        !self.is_loading && !self.is_authenticated
    }
}

/// Where unauthenticated callers are sent, returning to `next` afterwards.
/// `next` is percent-encoded so it stays a single query value.
pub fn auth_redirect_target(next: &str) -> String {
    format!("/auth?next={}", urlencoding::encode(next))
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("auth provider request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("auth provider returned status {0}")]
    UnexpectedStatus(u16),
}

#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn status(&self, token: Option<&str>) -> Result<AuthStatus, AuthError>;
}

/// Accepts a fixed set of tokens. Used when no remote provider is configured.
pub struct StaticTokenAuth {
    tokens: Vec<String>,
}

impl StaticTokenAuth {
    pub fn new(tokens: Vec<String>) -> Self {
        Self { tokens }
    }
}

#[async_trait]
impl AuthProvider for StaticTokenAuth {
    async fn status(&self, token: Option<&str>) -> Result<AuthStatus, AuthError> {
        let known = token.is_some_and(|t| self.tokens.iter().any(|k| k == t));
        Ok(if known {
            AuthStatus::AUTHENTICATED
        } else {
            AuthStatus::ANONYMOUS
        })
    }
}

/// Bearer token from `Authorization`, falling back to the `session` cookie.
pub fn token_from_headers(headers: &HeaderMap) -> Option<String> {
    if let Some(token) = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
    {
        let token = token.trim();
        if !token.is_empty() {
            return Some(token.to_string());
        }
    }

    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == "session" && !value.is_empty())
        .map(|(_, value)| value.to_string())
}
