//! Errors surfaced by the command-line front end.

use pagination::PageRequestError;

use crate::domain::{Error, ErrorCode};

/// Anything that stops a command.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// A service rejected the operation.
    #[error(transparent)]
    Domain(#[from] Error),
    /// An adapter could not be built from the settings.
    #[error("configuración inválida: {0}")]
    Setup(String),
    /// The page arguments are out of range.
    #[error("paginación inválida: {0}")]
    Page(#[from] PageRequestError),
    /// Reading from the terminal failed.
    #[error("no se pudo leer la entrada: {0}")]
    Input(#[from] std::io::Error),
}

impl CliError {
    /// Process exit code for this failure.
    ///
    /// # Examples
    /// ```
    /// use registro::domain::Error;
    /// use registro::inbound::cli::CliError;
    ///
    /// assert_eq!(CliError::from(Error::not_found("Socio no encontrado")).exit_code(), 2);
    /// ```
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Domain(error) => match error.code() {
                ErrorCode::NotFound => 2,
                ErrorCode::Unauthorized => 3,
                ErrorCode::InvalidRequest => 4,
                ErrorCode::ServiceUnavailable => 5,
                ErrorCode::Forbidden => 6,
                ErrorCode::InternalError => 1,
            },
            Self::Page(_) => 4,
            Self::Setup(_) | Self::Input(_) => 1,
        }
    }

    /// Per-field messages, when a form failed validation.
    pub fn details(&self) -> Option<&serde_json::Value> {
        match self {
            Self::Domain(error) => error.details(),
            _ => None,
        }
    }
}
