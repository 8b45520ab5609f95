//! Image capture and persistence.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::ports::{ImageSource, ImageSourceError, ImageStore, ImageStoreError};
use crate::domain::{Error, ImageDataUri, ImageIdentity, ImageKind};

/// Where an image ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedImage {
    /// Path stored on the member record, relative to the images root.
    pub relative: String,
    /// Path actually written.
    pub absolute: String,
}

/// Decode `data` and write it for `identity` and `kind`.
///
/// Decoding happens before any filesystem access, so an invalid payload
/// never leaves a folder behind.
pub async fn persist_image<T>(
    store: &T,
    identity: &ImageIdentity,
    kind: ImageKind,
    data: &ImageDataUri,
) -> Result<SavedImage, Error>
where
    T: ImageStore + ?Sized,
{
    let bytes = data.decode().map_err(|error| {
        Error::invalid_request(format!("La imagen de {kind} no es válida: {error}"))
    })?;
    let absolute = store
        .write(identity, kind, &bytes)
        .await
        .map_err(|error| map_store_error(kind, error))?;
    debug!(folder = identity.folder(), %kind, bytes = bytes.len(), "image persisted");
    Ok(SavedImage {
        relative: identity.relative_path(kind),
        absolute,
    })
}

fn map_store_error(kind: ImageKind, error: ImageStoreError) -> Error {
    warn!(%error, %kind, "image write failed");
    Error::internal(format!("Error al guardar la {kind}")).with_details(serde_json::json!({
        "cause": error.to_string(),
    }))
}

/// Picks images and saves them under a member's folder.
#[derive(Clone)]
pub struct ImageService<S, T> {
    source: Arc<S>,
    store: Arc<T>,
}

impl<S, T> ImageService<S, T> {
    /// Create a new service with the given source and store.
    pub fn new(source: Arc<S>, store: Arc<T>) -> Self {
        Self { source, store }
    }
}

impl<S, T> ImageService<S, T>
where
    S: ImageSource,
    T: ImageStore,
{
    /// Pick an image for `kind`; `None` when the operator cancelled.
    pub async fn select(&self, kind: ImageKind) -> Result<Option<ImageDataUri>, Error> {
        self.source.select(kind).await.map_err(|error| match error {
            ImageSourceError::UnsupportedType { path } => Error::invalid_request(format!(
                "Solo se aceptan imágenes jpg, jpeg, png o gif: {path}"
            )),
            ImageSourceError::Read { path, message } => {
                Error::internal(format!("No se pudo leer la imagen {path}: {message}"))
            }
        })
    }

    /// Persist `data` for the member named by the three identity parts.
    pub async fn persist(
        &self,
        pnombre: &str,
        papellido: &str,
        cedula: &str,
        kind: ImageKind,
        data: &ImageDataUri,
    ) -> Result<SavedImage, Error> {
        let identity = ImageIdentity::new(pnombre, papellido, cedula)
            .map_err(|error| Error::invalid_request(error.to_string()))?;
        persist_image(self.store.as_ref(), &identity, kind, data).await
    }
}
