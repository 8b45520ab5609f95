//! `/provincias`, `/regiones`, and `/autoidentificacion`.

use async_trait::async_trait;
use reqwest::Method;

use super::ApiClient;
use crate::domain::ports::{ReferenceCatalogue, RemoteApiError};
use crate::domain::{
    AuthToken, Autoidentificacion, AutoidentificacionUpdate, NewAutoidentificacion, NewRegion,
    Provincia, Region, RegionUpdate,
};

const PROVINCIAS: &str = "provincias";
const REGIONES: &str = "regiones";
const AUTOIDENTIFICACION: &str = "autoidentificacion";

#[async_trait]
impl ReferenceCatalogue for ApiClient {
    async fn provincias(&self, token: &AuthToken) -> Result<Vec<Provincia>, RemoteApiError> {
        self.get(token, &[PROVINCIAS]).await
    }

    async fn provincia(&self, token: &AuthToken, id: i64) -> Result<Provincia, RemoteApiError> {
        self.get(token, &[PROVINCIAS, &id.to_string()]).await
    }

    async fn regiones(&self, token: &AuthToken) -> Result<Vec<Region>, RemoteApiError> {
        self.get(token, &[REGIONES]).await
    }

    async fn region(&self, token: &AuthToken, id: i64) -> Result<Region, RemoteApiError> {
        self.get(token, &[REGIONES, &id.to_string()]).await
    }

    async fn create_region(
        &self,
        token: &AuthToken,
        region: &NewRegion,
    ) -> Result<Region, RemoteApiError> {
        self.send_json(Method::POST, Some(token), &[REGIONES], region)
            .await
    }

    async fn update_region(
        &self,
        token: &AuthToken,
        region: &RegionUpdate,
    ) -> Result<Region, RemoteApiError> {
        self.send_json(Method::PATCH, Some(token), &[REGIONES], region)
            .await
    }

    async fn autoidentificaciones(
        &self,
        token: &AuthToken,
    ) -> Result<Vec<Autoidentificacion>, RemoteApiError> {
        self.get(token, &[AUTOIDENTIFICACION]).await
    }

    async fn autoidentificacion(
        &self,
        token: &AuthToken,
        id: i64,
    ) -> Result<Autoidentificacion, RemoteApiError> {
        self.get(token, &[AUTOIDENTIFICACION, &id.to_string()]).await
    }

    async fn create_autoidentificacion(
        &self,
        token: &AuthToken,
        category: &NewAutoidentificacion,
    ) -> Result<Autoidentificacion, RemoteApiError> {
        self.send_json(Method::POST, Some(token), &[AUTOIDENTIFICACION], category)
            .await
    }

    async fn update_autoidentificacion(
        &self,
        token: &AuthToken,
        category: &AutoidentificacionUpdate,
    ) -> Result<Autoidentificacion, RemoteApiError> {
        self.send_json(Method::PATCH, Some(token), &[AUTOIDENTIFICACION], category)
            .await
    }
}
