//! `/cargos` resource.

use async_trait::async_trait;
use reqwest::Method;

use super::ApiClient;
use crate::domain::ports::{CargoRepository, RemoteApiError};
use crate::domain::{AuthToken, Cargo, NewCargo};

const RESOURCE: &str = "cargos";

#[async_trait]
impl CargoRepository for ApiClient {
    async fn create(&self, token: &AuthToken, cargo: &NewCargo) -> Result<Cargo, RemoteApiError> {
        self.send_json(Method::POST, Some(token), &[RESOURCE], cargo)
            .await
    }

    async fn list(&self, token: &AuthToken) -> Result<Vec<Cargo>, RemoteApiError> {
        self.get(token, &[RESOURCE]).await
    }

    async fn find(&self, token: &AuthToken, id: i64) -> Result<Cargo, RemoteApiError> {
        self.get(token, &[RESOURCE, &id.to_string()]).await
    }

    async fn update(
        &self,
        token: &AuthToken,
        id: i64,
        cargo: &NewCargo,
    ) -> Result<Cargo, RemoteApiError> {
        self.send_json(Method::PATCH, Some(token), &[RESOURCE, &id.to_string()], cargo)
            .await
    }
}
