use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::{debug, warn};

use crate::auth::{AuthError, AuthProvider, AuthStatus};

const AUTH_TIMEOUT: Duration = Duration::from_secs(5);

/// Asks an external auth service whether a token is valid.
///
/// 2xx means signed in, 401/403 means not. A timeout leaves the status
/// undetermined, reported as loading.
#[derive(Clone)]
pub struct RemoteAuth {
    client: Client,
    url: String,
}

impl RemoteAuth {
    pub fn new(url: String) -> Self {
        Self::with_timeout(url, AUTH_TIMEOUT)
    }

    pub fn with_timeout(url: String, timeout: Duration) -> Self {
        Self {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .expect("Failed to build HTTP client"),
            url,
        }
    }
}

#[async_trait]
impl AuthProvider for RemoteAuth {
    async fn status(&self, token: Option<&str>) -> Result<AuthStatus, AuthError> {
        let Some(token) = token else {
            return Ok(AuthStatus::ANONYMOUS);
        };

        let response = match self.client.get(&self.url).bearer_auth(token).send().await {
            Ok(r) => r,
            Err(e) if e.is_timeout() => {
                warn!("Auth provider timed out; treating status as loading");
                return Ok(AuthStatus::LOADING);
            }
            Err(e) => return Err(e.into()),
        };

        let status = response.status();
        debug!("Auth provider responded {status}");
        match status {
            s if s.is_success() => Ok(AuthStatus::AUTHENTICATED),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Ok(AuthStatus::ANONYMOUS),
            s => Err(AuthError::UnexpectedStatus(s.as_u16())),
        }
    }
}
