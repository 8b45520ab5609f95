//! Session token persisted as a single file.

use std::ffi::OsString;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
#[cfg(unix)]
use cap_std::fs::{OpenOptionsExt, Permissions, PermissionsExt};
use cap_std::{
    ambient_authority,
    fs::{Dir, OpenOptions},
};
use tracing::debug;
use zeroize::Zeroizing;

use crate::domain::ports::{TokenStore, TokenStoreError};
use crate::outbound::fs::{open_or_create_dir, parent_and_file_name};

#[cfg(unix)]
const TOKEN_FILE_MODE: u32 = 0o600;

/// Keeps the bearer token in one file, by default under the user's config
/// directory.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    /// Store the token at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(path: &Path, action: &str, error: io::Error) -> TokenStoreError {
        TokenStoreError::io(format!("{action} {}: {error}", path.display()))
    }

    fn open_parent(path: &Path) -> io::Result<Option<(Dir, OsString)>> {
        let (parent, file_name) = parent_and_file_name(path)?;
        match Dir::open_ambient_dir(parent, ambient_authority()) {
            Ok(dir) => Ok(Some((dir, file_name))),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(error) => Err(error),
        }
    }

    fn load_blocking(path: &Path) -> Result<Option<String>, TokenStoreError> {
        let Some((dir, file_name)) =
            Self::open_parent(path).map_err(|error| Self::io_error(path, "open", error))?
        else {
            return Ok(None);
        };
        match dir.read_to_string(Path::new(&file_name)) {
            Ok(raw) => {
                let token = raw.trim();
                Ok((!token.is_empty()).then(|| token.to_owned()))
            }
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(error) => Err(Self::io_error(path, "read", error)),
        }
    }

    fn save_blocking(path: &Path, token: &str) -> Result<(), TokenStoreError> {
        let (parent, file_name) =
            parent_and_file_name(path).map_err(|error| Self::io_error(path, "resolve", error))?;
        let dir =
            open_or_create_dir(parent).map_err(|error| Self::io_error(path, "create", error))?;
        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        options.mode(TOKEN_FILE_MODE);
        let mut file = dir
            .open_with(Path::new(&file_name), &options)
            .map_err(|error| Self::io_error(path, "open", error))?;
        // `mode` only applies on creation; older token files are tightened here.
        #[cfg(unix)]
        file.set_permissions(Permissions::from_mode(TOKEN_FILE_MODE))
            .map_err(|error| Self::io_error(path, "restrict", error))?;
        file.write_all(token.as_bytes())
            .map_err(|error| Self::io_error(path, "write", error))
    }

    fn clear_blocking(path: &Path) -> Result<(), TokenStoreError> {
        let Some((dir, file_name)) =
            Self::open_parent(path).map_err(|error| Self::io_error(path, "open", error))?
        else {
            return Ok(());
        };
        match dir.remove_file(Path::new(&file_name)) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(error) => Err(Self::io_error(path, "remove", error)),
        }
    }

    async fn blocking<T, F>(&self, action: &str, task: F) -> Result<T, TokenStoreError>
    where
        T: Send + 'static,
        F: FnOnce(&Path) -> Result<T, TokenStoreError> + Send + 'static,
    {
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || task(&path))
            .await
            .map_err(|error| TokenStoreError::io(format!("{action} task failed: {error}")))?
    }
}

#[async_trait]
impl TokenStore for FileTokenStore {
    async fn load(&self) -> Result<Option<String>, TokenStoreError> {
        self.blocking("load", Self::load_blocking).await
    }

    async fn save(&self, token: &str) -> Result<(), TokenStoreError> {
        let token = Zeroizing::new(token.to_owned());
        self.blocking("save", move |path| Self::save_blocking(path, &token))
            .await?;
        debug!(path = %self.path.display(), "token saved");
        Ok(())
    }

    async fn clear(&self) -> Result<(), TokenStoreError> {
        self.blocking("clear", Self::clear_blocking).await
    }
}
