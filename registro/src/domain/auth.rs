//! Authentication primitives: login credentials and access tokens.
//!
//! The API issues a JWT on login. The client never checks its signature; it
//! only reads the payload to learn who is logged in and when the token
//! expires, and relies on the API to reject forged or stale tokens.

use std::fmt;

use base64::Engine as _;
use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

/// Domain error returned when login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginValidationError {
    /// Username was missing or blank once trimmed.
    EmptyUsername,
    /// Password was blank once trimmed.
    EmptyPassword,
}

impl fmt::Display for LoginValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyUsername => write!(f, "El usuario es requerido"),
            Self::EmptyPassword => write!(f, "La contraseña es requerida"),
        }
    }
}

impl std::error::Error for LoginValidationError {}

/// Validated login credentials.
///
/// ## Invariants
/// - `username` is trimmed and non-empty.
/// - `password` is non-blank but keeps caller-provided whitespace.
///
/// # Examples
/// ```
/// use registro::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" operador ", "secreto").unwrap();
/// assert_eq!(creds.username(), "operador");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    username: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw username/password inputs.
    pub fn try_from_parts(username: &str, password: &str) -> Result<Self, LoginValidationError> {
        let normalized = username.trim();
        if normalized.is_empty() {
            return Err(LoginValidationError::EmptyUsername);
        }
        if password.trim().is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }
        Ok(Self {
            username: normalized.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Username sent to the login endpoint.
    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    /// Password sent to the login endpoint.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Role carried in the token's `rol` claim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Rol {
    /// `superadmin`
    SuperAdmin,
    /// `admin`
    Admin,
    /// `user`
    User,
    /// Any role name this client does not know.
    Other(String),
}

impl Rol {
    /// Whether the role may manage users and other administrative data.
    pub fn is_admin(&self) -> bool {
        matches!(self, Self::SuperAdmin | Self::Admin)
    }

    /// Wire name of the role.
    pub fn as_str(&self) -> &str {
        match self {
            Self::SuperAdmin => "superadmin",
            Self::Admin => "admin",
            Self::User => "user",
            Self::Other(name) => name.as_str(),
        }
    }
}

impl From<String> for Rol {
    fn from(value: String) -> Self {
        match value.as_str() {
            "superadmin" => Self::SuperAdmin,
            "admin" => Self::Admin,
            "user" => Self::User,
            _ => Self::Other(value),
        }
    }
}

impl From<Rol> for String {
    fn from(value: Rol) -> Self {
        match value {
            Rol::Other(name) => name,
            known => known.as_str().to_owned(),
        }
    }
}

impl fmt::Display for Rol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity of the logged-in operator, read from the token payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    /// Numeric user id, recorded as `registradoPorid` on new members.
    pub user_id: i64,
    /// Login name.
    pub user_name: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Role name.
    pub rol: Rol,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenClaims {
    #[serde(flatten)]
    user: UserInfo,
    exp: i64,
}

/// Errors raised while reading a token payload.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenDecodeError {
    /// The token is not three dot-separated segments.
    #[error("token is not a JWT")]
    Malformed,
    /// The payload segment is not base64.
    #[error("token payload is not base64: {message}")]
    Encoding {
        /// Decoder failure.
        message: String,
    },
    /// The payload JSON lacks the expected claims.
    #[error("token payload is missing claims: {message}")]
    Claims {
        /// Parser failure.
        message: String,
    },
}

/// A bearer token with its decoded, unverified claims.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken {
    raw: Zeroizing<String>,
    user: UserInfo,
    expires_at_ms: i64,
}

impl AuthToken {
    /// Decode the payload of `raw`.
    ///
    /// # Examples
    /// ```
    /// use registro::domain::AuthToken;
    ///
    /// // {"userId":7,"userName":"ana","firstName":"Ana","lastName":"Paz","rol":"admin","exp":4102444800}
    /// let raw = "e30.eyJ1c2VySWQiOjcsInVzZXJOYW1lIjoiYW5hIiwiZmlyc3ROYW1lIjoiQW5hIiwibGFzdE5hbWUiOiJQYXoiLCJyb2wiOiJhZG1pbiIsImV4cCI6NDEwMjQ0NDgwMH0.c2ln";
    /// let token = AuthToken::decode(raw).expect("valid token");
    /// assert_eq!(token.user().user_id, 7);
    /// assert!(token.user().rol.is_admin());
    /// ```
    pub fn decode(raw: &str) -> Result<Self, TokenDecodeError> {
        let mut segments = raw.trim().split('.');
        let (Some(_header), Some(payload), Some(_signature), None) = (
            segments.next(),
            segments.next(),
            segments.next(),
            segments.next(),
        ) else {
            return Err(TokenDecodeError::Malformed);
        };

        let bytes = URL_SAFE_NO_PAD
            .decode(payload.trim_end_matches('='))
            .or_else(|_| STANDARD.decode(payload))
            .map_err(|error| TokenDecodeError::Encoding {
                message: error.to_string(),
            })?;
        let claims: TokenClaims =
            serde_json::from_slice(&bytes).map_err(|error| TokenDecodeError::Claims {
                message: error.to_string(),
            })?;

        Ok(Self {
            raw: Zeroizing::new(raw.trim().to_owned()),
            user: claims.user,
            expires_at_ms: claims.exp.saturating_mul(1000),
        })
    }

    /// The token exactly as issued, for the `Authorization` header.
    pub fn as_str(&self) -> &str {
        self.raw.as_str()
    }

    /// Identity claims.
    pub fn user(&self) -> &UserInfo {
        &self.user
    }

    /// Whether the token expired strictly before `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at_ms < now.timestamp_millis()
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthToken")
            .field("user", &self.user)
            .field("expires_at_ms", &self.expires_at_ms)
            .finish_non_exhaustive()
    }
}
