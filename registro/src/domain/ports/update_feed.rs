//! Port for the release feed and installer downloads.

use async_trait::async_trait;
use tokio::sync::mpsc::UnboundedSender;

use super::define_port_error;
use crate::domain::{DownloadProgress, DownloadedUpdate, ReleaseInfo};

define_port_error! {
    /// Errors raised by update feed adapters.
    pub enum UpdateFeedError {
        /// The feed or installer could not be fetched.
        Transport { message: String } => "update feed unreachable: {message}",
        /// The manifest could not be decoded.
        Manifest { message: String } => "update manifest invalid: {message}",
        /// The installer digest did not match the manifest.
        Integrity { expected: String, actual: String } =>
            "installer digest mismatch: expected {expected}, got {actual}",
        /// Writing the installer to the staging area failed.
        Storage { message: String } => "could not stage installer: {message}",
    }
}

/// Remote source of releases.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UpdateFeed: Send + Sync {
    /// The latest published release, whatever its version.
    async fn latest_release(&self) -> Result<ReleaseInfo, UpdateFeedError>;

    /// Download the installer for `release`, sending one progress report per
    /// received chunk.
    async fn download(
        &self,
        release: &ReleaseInfo,
        progress: UnboundedSender<DownloadProgress>,
    ) -> Result<DownloadedUpdate, UpdateFeedError>;
}
