//! Port for exchanging credentials for a bearer token.

use async_trait::async_trait;

use super::RemoteApiError;
use crate::domain::LoginCredentials;

/// `POST /auth/login`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginGateway: Send + Sync {
    /// Return the raw JWT issued for `credentials`.
    async fn login(&self, credentials: &LoginCredentials) -> Result<String, RemoteApiError>;
}
