//! Port for positions held by the remote API.

use async_trait::async_trait;

use super::RemoteApiError;
use crate::domain::{AuthToken, Cargo, NewCargo};

/// Position operations against `/cargos`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CargoRepository: Send + Sync {
    /// `POST /cargos`.
    async fn create(&self, token: &AuthToken, cargo: &NewCargo) -> Result<Cargo, RemoteApiError>;

    /// `GET /cargos`.
    async fn list(&self, token: &AuthToken) -> Result<Vec<Cargo>, RemoteApiError>;

    /// `GET /cargos/{id}`.
    async fn find(&self, token: &AuthToken, id: i64) -> Result<Cargo, RemoteApiError>;

    /// `PATCH /cargos/{id}`.
    async fn update(
        &self,
        token: &AuthToken,
        id: i64,
        cargo: &NewCargo,
    ) -> Result<Cargo, RemoteApiError>;
}
