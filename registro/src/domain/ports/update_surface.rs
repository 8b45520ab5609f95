//! Port for the windowing surface the update flow talks to.

use async_trait::async_trait;

use crate::domain::{DownloadProgress, UpdateNotice};

/// Whatever presents the update flow to the operator.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UpdateSurface: Send + Sync {
    /// Show a blocking notice and resolve once its only button is pressed.
    async fn notify(&self, notice: UpdateNotice);

    /// Replace the window title.
    fn set_title(&self, title: &str);

    /// Relay download progress to the UI layer.
    fn send_progress(&self, progress: DownloadProgress);

    /// Block or unblock interaction with the rest of the application.
    fn set_locked(&self, locked: bool);
}
