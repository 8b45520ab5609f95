//! Image picker backed by paths chosen up front.

use std::path::PathBuf;

use async_trait::async_trait;

use crate::domain::image::{has_accepted_extension, mime_for_path};
use crate::domain::ports::{ImageSource, ImageSourceError};
use crate::domain::{ImageDataUri, ImageKind};
use crate::outbound::fs::read_file;

/// Resolves each image kind to a path given on the command line.
#[derive(Debug, Clone, Default)]
pub struct FilesystemImageSource {
    foto: Option<PathBuf>,
    firma: Option<PathBuf>,
}

impl FilesystemImageSource {
    /// Picker for the given photo and signature paths. A missing path
    /// behaves like a cancelled dialog.
    pub fn new(foto: Option<PathBuf>, firma: Option<PathBuf>) -> Self {
        Self { foto, firma }
    }
}

#[async_trait]
impl ImageSource for FilesystemImageSource {
    async fn select(&self, kind: ImageKind) -> Result<Option<ImageDataUri>, ImageSourceError> {
        let picked = match kind {
            ImageKind::Foto => self.foto.clone(),
            ImageKind::Firma => self.firma.clone(),
        };
        let Some(path) = picked else {
            return Ok(None);
        };
        if !has_accepted_extension(&path) {
            return Err(ImageSourceError::unsupported_type(path.display().to_string()));
        }

        let mime = mime_for_path(&path);
        let read_path = path.clone();
        let bytes = tokio::task::spawn_blocking(move || read_file(&read_path))
            .await
            .map_err(|error| ImageSourceError::read(path.display().to_string(), error.to_string()))?
            .map_err(|error| ImageSourceError::read(path.display().to_string(), error.to_string()))?;
        Ok(Some(ImageDataUri::encode(mime, &bytes)))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::test_support::cap_fs::{scratch_dir, write_file};

    #[tokio::test]
    async fn picked_file_becomes_data_uri() {
        let dir = scratch_dir();
        let path = dir.path().join("foto.JPG");
        write_file(&path, b"hi").expect("fixture written");

        let uri = FilesystemImageSource::new(Some(path), None)
            .select(ImageKind::Foto)
            .await
            .expect("select succeeds")
            .expect("a file was picked");
        assert_eq!(uri.as_str(), "data:image/jpeg;base64,aGk=");
    }

    #[tokio::test]
    async fn missing_path_is_a_cancellation() {
        let picked = FilesystemImageSource::default()
            .select(ImageKind::Firma)
            .await
            .expect("select succeeds");
        assert!(picked.is_none());
    }

    #[tokio::test]
    async fn other_extensions_are_refused() {
        let err = FilesystemImageSource::new(Some(PathBuf::from("/tmp/firma.bmp")), None)
            .select(ImageKind::Foto)
            .await
            .expect_err("bmp is not accepted");
        assert!(matches!(err, ImageSourceError::UnsupportedType { .. }));
    }

    #[tokio::test]
    async fn unreadable_file_reports_read_error() {
        let dir = scratch_dir();
        let err = FilesystemImageSource::new(None, Some(dir.path().join("ausente.png")))
            .select(ImageKind::Firma)
            .await
            .expect_err("file is missing");
        assert!(matches!(err, ImageSourceError::Read { .. }));
    }
}
