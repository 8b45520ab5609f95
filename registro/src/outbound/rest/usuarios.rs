//! `/usuarios` resource.

use async_trait::async_trait;
use reqwest::Method;

use super::ApiClient;
use crate::domain::ports::{RemoteApiError, UsuarioRepository};
use crate::domain::{AuthToken, NewUsuario, Usuario, UsuarioUpdate};

const RESOURCE: &str = "usuarios";

#[async_trait]
impl UsuarioRepository for ApiClient {
    async fn create(
        &self,
        token: &AuthToken,
        usuario: &NewUsuario,
    ) -> Result<Usuario, RemoteApiError> {
        self.send_json(Method::POST, Some(token), &[RESOURCE], usuario)
            .await
    }

    async fn list(&self, token: &AuthToken) -> Result<Vec<Usuario>, RemoteApiError> {
        self.get(token, &[RESOURCE]).await
    }

    async fn find(&self, token: &AuthToken, id: i64) -> Result<Usuario, RemoteApiError> {
        self.get(token, &[RESOURCE, &id.to_string()]).await
    }

    async fn update(
        &self,
        token: &AuthToken,
        changes: &UsuarioUpdate,
    ) -> Result<Usuario, RemoteApiError> {
        self.send_json(Method::PATCH, Some(token), &[RESOURCE], changes)
            .await
    }

    async fn delete(&self, token: &AuthToken, id: i64) -> Result<(), RemoteApiError> {
        self.remove(token, &[RESOURCE, &id.to_string()]).await
    }
}
