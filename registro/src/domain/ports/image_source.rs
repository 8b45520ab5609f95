//! Port for picking an image file.

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::{ImageDataUri, ImageKind};

define_port_error! {
    /// Errors raised by image source adapters.
    pub enum ImageSourceError {
        /// The picked file is not one of the accepted image types.
        UnsupportedType { path: String } => "unsupported image type: {path}",
        /// Reading the picked file failed.
        Read { path: String, message: String } => "could not read image {path}: {message}",
    }
}

/// Interactive or scripted image picker.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ImageSource: Send + Sync {
    /// Pick the image for `kind` and return it as a data URI, or `None` when
    /// the selection was cancelled.
    async fn select(&self, kind: ImageKind) -> Result<Option<ImageDataUri>, ImageSourceError>;
}
