//! Login and logout.

use std::sync::Arc;

use tracing::info;

use crate::domain::ports::LoginGateway;
use crate::domain::{Error, LoginCredentials, Session, UserInfo};

const LOGIN_FALLBACK: &str = "Credenciales inválidas";

/// Exchanges credentials for a session.
#[derive(Clone)]
pub struct AuthService<G> {
    gateway: Arc<G>,
    session: Arc<Session>,
}

impl<G> AuthService<G> {
    /// Create a new service with the given gateway and session.
    pub fn new(gateway: Arc<G>, session: Arc<Session>) -> Self {
        Self { gateway, session }
    }
}

impl<G> AuthService<G>
where
    G: LoginGateway,
{
    /// Validate the credentials, log in, and persist the issued token.
    pub async fn login(&self, username: &str, password: &str) -> Result<UserInfo, Error> {
        let credentials = LoginCredentials::try_from_parts(username, password)
            .map_err(|error| Error::invalid_request(error.to_string()))?;
        let raw = self
            .gateway
            .login(&credentials)
            .await
            .map_err(|error| error.into_domain(LOGIN_FALLBACK))?;
        let user = self.session.establish(&raw).await?;
        info!(user_name = %user.user_name, "login succeeded");
        Ok(user)
    }

    /// Close the session.
    pub async fn logout(&self) -> Result<(), Error> {
        self.session.logout().await
    }

    /// The logged-in operator.
    pub async fn whoami(&self) -> Result<UserInfo, Error> {
        self.session.require_user().await
    }
}
