//! `/socios` resource.

use async_trait::async_trait;
use reqwest::Method;

use super::ApiClient;
use crate::domain::ports::{RemoteApiError, SocioRepository};
use crate::domain::{AuthToken, NewSocio, Socio, SocioUpdate};

const RESOURCE: &str = "socios";

#[async_trait]
impl SocioRepository for ApiClient {
    async fn create(&self, token: &AuthToken, socio: &NewSocio) -> Result<Socio, RemoteApiError> {
        self.send_json(Method::POST, Some(token), &[RESOURCE], socio)
            .await
    }

    async fn list(&self, token: &AuthToken) -> Result<Vec<Socio>, RemoteApiError> {
        self.get(token, &[RESOURCE]).await
    }

    async fn find(&self, token: &AuthToken, codunico: &str) -> Result<Socio, RemoteApiError> {
        self.get(token, &[RESOURCE, codunico]).await
    }

    async fn update(
        &self,
        token: &AuthToken,
        codunico: &str,
        changes: &SocioUpdate,
    ) -> Result<Socio, RemoteApiError> {
        self.send_json(Method::PATCH, Some(token), &[RESOURCE, codunico], changes)
            .await
    }

    async fn delete(&self, token: &AuthToken, codunico: &str) -> Result<(), RemoteApiError> {
        self.remove(token, &[RESOURCE, codunico]).await
    }
}
