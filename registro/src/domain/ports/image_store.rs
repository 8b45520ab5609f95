//! Port for writing member images to disk.

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::{ImageIdentity, ImageKind};

define_port_error! {
    /// Errors raised by image store adapters.
    pub enum ImageStoreError {
        /// Creating the member folder failed.
        CreateDir { path: String, message: String } =>
            "could not create image folder {path}: {message}",
        /// Writing the image file failed.
        Write { path: String, message: String } =>
            "could not write image {path}: {message}",
    }
}

/// Filesystem destination for member images.
///
/// Writes land at `<root>/FSEIMAGES/<folder>/<file>` as named by
/// [`ImageIdentity`]; the folder is created when missing and an existing
/// file is overwritten.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Write `bytes` for `identity` and `kind`, returning the absolute path
    /// written.
    async fn write(
        &self,
        identity: &ImageIdentity,
        kind: ImageKind,
        bytes: &[u8],
    ) -> Result<String, ImageStoreError>;
}
