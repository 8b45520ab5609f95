//! Error vocabulary shared by every port backed by the remote REST API.

use super::define_port_error;
use crate::domain::Error;
use crate::domain::error::{FORBIDDEN_MESSAGE, NETWORK_ERROR_MESSAGE, SESSION_EXPIRED_MESSAGE};

define_port_error! {
    /// Errors raised by REST API adapters.
    pub enum RemoteApiError {
        /// The API rejected the bearer token (401).
        Unauthorized { message: String } => "remote API rejected credentials: {message}",
        /// The API refused the action for this role (403).
        Forbidden { message: String } => "remote API refused the action: {message}",
        /// The addressed record does not exist (404).
        NotFound { message: String } => "remote record not found: {message}",
        /// Any other non-success status. `message` is the envelope's
        /// message and may be empty.
        Rejected { status: u16, message: String } => "remote API returned {status}: {message}",
        /// The request exceeded its timeout.
        Timeout { message: String } => "remote API timed out: {message}",
        /// The request never produced a response.
        Transport { message: String } => "remote API unreachable: {message}",
        /// The response body could not be decoded.
        Decode { message: String } => "remote API response malformed: {message}",
    }
}

impl RemoteApiError {
    /// Map to a domain error, using `fallback` when the API gave no message.
    ///
    /// # Examples
    /// ```
    /// use registro::domain::ErrorCode;
    /// use registro::domain::ports::RemoteApiError;
    ///
    /// let err = RemoteApiError::rejected(400_u16, "").into_domain("Error en el registro");
    /// assert_eq!(err.code(), ErrorCode::InvalidRequest);
    /// assert_eq!(err.message(), "Error en el registro");
    /// ```
    pub fn into_domain(self, fallback: &str) -> Error {
        let or_fallback = |message: String| {
            if message.trim().is_empty() {
                fallback.to_owned()
            } else {
                message
            }
        };
        match self {
            Self::Unauthorized { message } => Error::unauthorized(if message.trim().is_empty() {
                SESSION_EXPIRED_MESSAGE.to_owned()
            } else {
                message
            }),
            Self::Forbidden { message } => Error::forbidden(if message.trim().is_empty() {
                FORBIDDEN_MESSAGE.to_owned()
            } else {
                message
            }),
            Self::NotFound { message } => Error::not_found(or_fallback(message)),
            Self::Rejected { status, message } if status < 500 => {
                Error::invalid_request(or_fallback(message))
            }
            Self::Rejected { message, .. } => Error::internal(or_fallback(message)),
            Self::Timeout { .. } | Self::Transport { .. } => {
                Error::service_unavailable(NETWORK_ERROR_MESSAGE)
            }
            Self::Decode { message } => {
                Error::internal(format!("{fallback}: respuesta inválida ({message})"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[rstest]
    #[case(RemoteApiError::unauthorized(""), ErrorCode::Unauthorized)]
    #[case(RemoteApiError::forbidden(""), ErrorCode::Forbidden)]
    #[case(RemoteApiError::not_found("Socio no encontrado"), ErrorCode::NotFound)]
    #[case(RemoteApiError::rejected(409_u16, "duplicado"), ErrorCode::InvalidRequest)]
    #[case(RemoteApiError::rejected(500_u16, ""), ErrorCode::InternalError)]
    #[case(RemoteApiError::timeout("15s"), ErrorCode::ServiceUnavailable)]
    #[case(RemoteApiError::transport("refused"), ErrorCode::ServiceUnavailable)]
    #[case(RemoteApiError::decode("eof"), ErrorCode::InternalError)]
    fn maps_each_variant(#[case] error: RemoteApiError, #[case] code: ErrorCode) {
        assert_eq!(error.into_domain("Error en el registro").code(), code);
    }

    #[test]
    fn keeps_the_api_message_when_present() {
        let err = RemoteApiError::rejected(400_u16, "La cédula ya existe").into_domain("fallback");
        assert_eq!(err.message(), "La cédula ya existe");
    }

    #[test]
    fn falls_back_per_operation() {
        let err = RemoteApiError::rejected(500_u16, " ").into_domain("Error eliminando usuario");
        assert_eq!(err.message(), "Error eliminando usuario");
    }
}
