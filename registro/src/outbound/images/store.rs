//! `cap_std`-backed image store rooted at the desktop by default.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use crate::domain::image::IMAGES_DIR;
use crate::domain::ports::{ImageStore, ImageStoreError};
use crate::domain::{ImageIdentity, ImageKind};
use crate::outbound::fs::open_or_create_dir;

/// Writes `<root>/FSEIMAGES/<folder>/<folder>_<KIND>.PNG`.
#[derive(Debug, Clone)]
pub struct DesktopImageStore {
    root: PathBuf,
}

impl DesktopImageStore {
    /// Store images under `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Folder that receives `FSEIMAGES`.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn write_blocking(
        folder_path: &Path,
        file_name: &str,
        bytes: &[u8],
    ) -> Result<(), ImageStoreError> {
        let folder = open_or_create_dir(folder_path).map_err(|error| {
            ImageStoreError::create_dir(folder_path.display().to_string(), error.to_string())
        })?;
        folder.write(file_name, bytes).map_err(|error| {
            ImageStoreError::write(
                folder_path.join(file_name).display().to_string(),
                error.to_string(),
            )
        })
    }
}

#[async_trait]
impl ImageStore for DesktopImageStore {
    async fn write(
        &self,
        identity: &ImageIdentity,
        kind: ImageKind,
        bytes: &[u8],
    ) -> Result<String, ImageStoreError> {
        let folder_path = self.root.join(IMAGES_DIR).join(identity.folder());
        let file_name = identity.file_name(kind);
        let target = folder_path.join(&file_name).display().to_string();

        let payload = bytes.to_vec();
        let task_folder = folder_path.clone();
        tokio::task::spawn_blocking(move || {
            Self::write_blocking(&task_folder, &file_name, &payload)
        })
        .await
        .map_err(|error| ImageStoreError::write(target.clone(), error.to_string()))??;

        debug!(path = %target, bytes = bytes.len(), "image written");
        Ok(target)
    }
}
