//! Port for member records held by the remote API.

use async_trait::async_trait;

use super::RemoteApiError;
use crate::domain::{AuthToken, NewSocio, Socio, SocioUpdate};

/// Member CRUD against `/socios`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SocioRepository: Send + Sync {
    /// `POST /socios`.
    async fn create(&self, token: &AuthToken, socio: &NewSocio) -> Result<Socio, RemoteApiError>;

    /// `GET /socios`.
    async fn list(&self, token: &AuthToken) -> Result<Vec<Socio>, RemoteApiError>;

    /// `GET /socios/{codunico}`.
    async fn find(&self, token: &AuthToken, codunico: &str) -> Result<Socio, RemoteApiError>;

    /// `PATCH /socios/{codunico}`.
    async fn update(
        &self,
        token: &AuthToken,
        codunico: &str,
        changes: &SocioUpdate,
    ) -> Result<Socio, RemoteApiError>;

    /// `DELETE /socios/{codunico}`.
    async fn delete(&self, token: &AuthToken, codunico: &str) -> Result<(), RemoteApiError>;
}
