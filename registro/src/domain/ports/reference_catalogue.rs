//! Port for the lookup tables behind the member form selects.

use async_trait::async_trait;

use super::RemoteApiError;
use crate::domain::{
    AuthToken, Autoidentificacion, AutoidentificacionUpdate, NewAutoidentificacion, NewRegion,
    Provincia, Region, RegionUpdate,
};

/// Provinces, regions, and self-identification categories.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReferenceCatalogue: Send + Sync {
    /// `GET /provincias`.
    async fn provincias(&self, token: &AuthToken) -> Result<Vec<Provincia>, RemoteApiError>;

    /// `GET /provincias/{id}`.
    async fn provincia(&self, token: &AuthToken, id: i64) -> Result<Provincia, RemoteApiError>;

    /// `GET /regiones`.
    async fn regiones(&self, token: &AuthToken) -> Result<Vec<Region>, RemoteApiError>;

    /// `GET /regiones/{id}`.
    async fn region(&self, token: &AuthToken, id: i64) -> Result<Region, RemoteApiError>;

    /// `POST /regiones`.
    async fn create_region(
        &self,
        token: &AuthToken,
        region: &NewRegion,
    ) -> Result<Region, RemoteApiError>;

    /// `PATCH /regiones`.
    async fn update_region(
        &self,
        token: &AuthToken,
        region: &RegionUpdate,
    ) -> Result<Region, RemoteApiError>;

    /// `GET /autoidentificacion`.
    async fn autoidentificaciones(
        &self,
        token: &AuthToken,
    ) -> Result<Vec<Autoidentificacion>, RemoteApiError>;

    /// `GET /autoidentificacion/{id}`.
    async fn autoidentificacion(
        &self,
        token: &AuthToken,
        id: i64,
    ) -> Result<Autoidentificacion, RemoteApiError>;

    /// `POST /autoidentificacion`.
    async fn create_autoidentificacion(
        &self,
        token: &AuthToken,
        category: &NewAutoidentificacion,
    ) -> Result<Autoidentificacion, RemoteApiError>;

    /// `PATCH /autoidentificacion`.
    async fn update_autoidentificacion(
        &self,
        token: &AuthToken,
        category: &AutoidentificacionUpdate,
    ) -> Result<Autoidentificacion, RemoteApiError>;
}
