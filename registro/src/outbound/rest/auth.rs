//! `POST /auth/login`.

use async_trait::async_trait;
use reqwest::Method;

use super::ApiClient;
use super::dto::{LoginRequestDto, LoginResponseDto};
use crate::domain::LoginCredentials;
use crate::domain::ports::{LoginGateway, RemoteApiError};

#[async_trait]
impl LoginGateway for ApiClient {
    async fn login(&self, credentials: &LoginCredentials) -> Result<String, RemoteApiError> {
        let body = LoginRequestDto {
            user: credentials.username(),
            password: credentials.password(),
        };
        let raw = self
            .send_json_raw(Method::POST, &["auth", "login"], &body)
            .await?;
        let reply: LoginResponseDto = serde_json::from_slice(&raw).map_err(|error| {
            RemoteApiError::decode(format!("invalid login payload: {error}"))
        })?;
        reply
            .into_token()
            .ok_or_else(|| RemoteApiError::decode("login reply carried no token"))
    }
}
