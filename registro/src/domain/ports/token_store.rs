//! Port for persisting the session token between runs.

use async_trait::async_trait;

use super::define_port_error;

define_port_error! {
    /// Errors raised by token store adapters.
    pub enum TokenStoreError {
        /// Reading or writing the backing storage failed.
        Io { message: String } => "token store I/O failed: {message}",
    }
}

/// Durable home for the raw bearer token.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// The stored token, if any.
    async fn load(&self) -> Result<Option<String>, TokenStoreError>;

    /// Replace the stored token.
    async fn save(&self, token: &str) -> Result<(), TokenStoreError>;

    /// Remove the stored token; succeeds when nothing is stored.
    async fn clear(&self) -> Result<(), TokenStoreError>;
}
