//! Installer staging files and digest checks.

use std::path::{Path, PathBuf};

use cap_std::fs::Dir;
#[cfg(unix)]
use cap_std::fs::{Permissions, PermissionsExt};
use semver::Version;
use sha2::{Digest, Sha256};
use tokio::io::AsyncWriteExt;
use tracing::warn;
use uuid::Uuid;

use crate::domain::ports::UpdateFeedError;
use crate::outbound::fs::open_or_create_dir;

const DEFAULT_EXTENSION: &str = "exe";
#[cfg(unix)]
const INSTALLER_MODE: u32 = 0o755;

/// Staging file name for `version`, keeping the installer's extension.
pub(super) fn installer_file_name(version: &Version, url: &str) -> String {
    let extension = url
        .split(['?', '#'])
        .next()
        .and_then(|path| path.rsplit('/').next())
        .and_then(|name| name.rsplit_once('.'))
        .map(|(_, ext)| ext)
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .unwrap_or(DEFAULT_EXTENSION);
    format!("registro-fse-{version}-{}.{extension}", Uuid::new_v4().simple())
}

/// An installer being written to the staging directory.
pub(super) struct StagedInstaller {
    dir: Dir,
    file: tokio::fs::File,
    name: String,
    path: PathBuf,
    hasher: Sha256,
    written: u64,
}

impl StagedInstaller {
    pub async fn create(staging_dir: &Path, name: String) -> Result<Self, UpdateFeedError> {
        let task_dir = staging_dir.to_path_buf();
        let task_name = name.clone();
        let (dir, file) = run_blocking(move || {
            let dir = open_or_create_dir(&task_dir).map_err(|error| {
                UpdateFeedError::storage(format!("{}: {error}", task_dir.display()))
            })?;
            let file = dir
                .create(&task_name)
                .map_err(|error| UpdateFeedError::storage(format!("{task_name}: {error}")))?;
            Ok((dir, file))
        })
        .await?;
        Ok(Self {
            dir,
            file: tokio::fs::File::from_std(file.into_std()),
            path: staging_dir.join(&name),
            name,
            hasher: Sha256::new(),
            written: 0,
        })
    }

    pub async fn append(&mut self, chunk: &[u8]) -> Result<u64, UpdateFeedError> {
        self.file
            .write_all(chunk)
            .await
            .map_err(|error| self.storage_error(error))?;
        self.hasher.update(chunk);
        self.written += chunk.len() as u64;
        Ok(self.written)
    }

    /// Flush, check the digest, and return the installer path ready to run.
    /// A mismatch removes the file.
    pub async fn finish(
        mut self,
        expected_sha256: Option<&str>,
    ) -> Result<PathBuf, UpdateFeedError> {
        self.file
            .flush()
            .await
            .map_err(|error| self.storage_error(error))?;
        let actual = hex::encode(self.hasher.finalize_reset());
        let mismatch = expected_sha256
            .map(str::trim)
            .filter(|expected| !expected.eq_ignore_ascii_case(&actual));
        if let Some(expected) = mismatch {
            self.discard().await;
            return Err(UpdateFeedError::integrity(expected, actual));
        }

        let Self {
            dir,
            file,
            name,
            path,
            ..
        } = self;
        // The write handle must be closed before the installer is executed.
        drop(file);
        run_blocking(move || mark_executable(&dir, &name)).await?;
        Ok(path)
    }

    /// Remove the partial file.
    pub async fn discard(self) {
        let Self { dir, file, name, .. } = self;
        drop(file);
        let removed = tokio::task::spawn_blocking(move || {
            dir.remove_file(&name)
                .map_err(|error| format!("{name}: {error}"))
        })
        .await;
        match removed {
            Ok(Ok(())) => {}
            Ok(Err(error)) => warn!(%error, "could not remove staged installer"),
            Err(error) => warn!(%error, "staged installer cleanup task failed"),
        }
    }

    fn storage_error(&self, error: std::io::Error) -> UpdateFeedError {
        UpdateFeedError::storage(format!("{}: {error}", self.name))
    }
}

#[cfg(unix)]
fn mark_executable(dir: &Dir, name: &str) -> Result<(), UpdateFeedError> {
    dir.set_permissions(name, Permissions::from_mode(INSTALLER_MODE))
        .map_err(|error| UpdateFeedError::storage(format!("{name}: {error}")))
}

#[cfg(not(unix))]
fn mark_executable(_dir: &Dir, _name: &str) -> Result<(), UpdateFeedError> {
    Ok(())
}

async fn run_blocking<T, F>(task: F) -> Result<T, UpdateFeedError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, UpdateFeedError> + Send + 'static,
{
    tokio::task::spawn_blocking(task)
        .await
        .map_err(|error| UpdateFeedError::storage(format!("staging task failed: {error}")))?
}
