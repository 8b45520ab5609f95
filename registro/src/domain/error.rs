//! Domain-level error types.
//!
//! Services return these errors to inbound adapters, which render them as
//! toasts, terminal messages, or exit codes. They never carry transport
//! types.

use std::fmt;

use serde::Serialize;
use serde_json::Value;

/// Stable machine-readable error code describing the failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[non_exhaustive]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// The input failed validation before any remote or disk access.
    InvalidRequest,
    /// No active session, or the session token has expired.
    Unauthorized,
    /// Authenticated but the role does not allow the action.
    Forbidden,
    /// The requested record does not exist.
    NotFound,
    /// The remote API could not be reached or timed out.
    ServiceUnavailable,
    /// Anything else, including filesystem failures.
    InternalError,
}

/// Domain error payload.
///
/// ## Invariants
/// - `message` is non-empty once trimmed; blank messages are replaced by a
///   generic fallback so that every failure has something to show the user.
///
/// # Examples
/// ```
/// use registro::domain::{Error, ErrorCode};
///
/// let err = Error::not_found("Socio no encontrado");
/// assert_eq!(err.code(), ErrorCode::NotFound);
/// assert_eq!(err.to_string(), "Socio no encontrado");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainError {
    code: ErrorCode,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

/// Message used when a failure arrives without one.
pub const DEFAULT_ERROR_MESSAGE: &str = "Ha ocurrido un error. Por favor, intenta nuevamente.";
/// Shown when the session token is missing or stale.
pub const SESSION_EXPIRED_MESSAGE: &str =
    "Tu sesión ha expirado. Por favor, inicia sesión nuevamente.";
/// Shown when the API cannot be reached.
pub const NETWORK_ERROR_MESSAGE: &str =
    "Error de conexión. Por favor, verifica tu conexión a internet.";
/// Shown when the role does not allow an action.
pub const FORBIDDEN_MESSAGE: &str = "No tienes permiso para acceder a este recurso.";
/// Shown when a record does not exist.
pub const NOT_FOUND_MESSAGE: &str = "El recurso solicitado no existe.";

impl DomainError {
    /// Create a new error, substituting [`DEFAULT_ERROR_MESSAGE`] for blank
    /// messages.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        let message = message.into();
        let message = if message.trim().is_empty() {
            DEFAULT_ERROR_MESSAGE.to_owned()
        } else {
            message
        };
        Self {
            code,
            message,
            details: None,
        }
    }

    /// Stable machine-readable error code.
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Human-readable message shown to the operator.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Supplementary error details, such as per-field validation messages.
    pub fn details(&self) -> Option<&Value> {
        self.details.as_ref()
    }

    /// Attach structured details to the error.
    ///
    /// # Examples
    /// ```
    /// use registro::domain::Error;
    /// use serde_json::json;
    ///
    /// let err = Error::invalid_request("Complete los campos obligatorios")
    ///     .with_details(json!({ "fields": ["ptelefono"] }));
    /// assert!(err.details().is_some());
    /// ```
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Convenience constructor for [`ErrorCode::InvalidRequest`].
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidRequest, message)
    }

    /// Convenience constructor for [`ErrorCode::Unauthorized`].
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unauthorized, message)
    }

    /// Convenience constructor for [`ErrorCode::Forbidden`].
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Forbidden, message)
    }

    /// Convenience constructor for [`ErrorCode::NotFound`].
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    /// Convenience constructor for [`ErrorCode::ServiceUnavailable`].
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ServiceUnavailable, message)
    }

    /// Convenience constructor for [`ErrorCode::InternalError`].
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for DomainError {}
