//! Port for application users held by the remote API.

use async_trait::async_trait;

use super::RemoteApiError;
use crate::domain::{AuthToken, NewUsuario, Usuario, UsuarioUpdate};

/// User CRUD against `/usuarios`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsuarioRepository: Send + Sync {
    /// `POST /usuarios`.
    async fn create(
        &self,
        token: &AuthToken,
        usuario: &NewUsuario,
    ) -> Result<Usuario, RemoteApiError>;

    /// `GET /usuarios`.
    async fn list(&self, token: &AuthToken) -> Result<Vec<Usuario>, RemoteApiError>;

    /// `GET /usuarios/{id}`.
    async fn find(&self, token: &AuthToken, id: i64) -> Result<Usuario, RemoteApiError>;

    /// `PATCH /usuarios`.
    async fn update(
        &self,
        token: &AuthToken,
        changes: &UsuarioUpdate,
    ) -> Result<Usuario, RemoteApiError>;

    /// `DELETE /usuarios/{id}`.
    async fn delete(&self, token: &AuthToken, id: i64) -> Result<(), RemoteApiError>;
}
