//! Terminal rendition of the update window.

use std::io::{IsTerminal, Write};
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info, warn};

use crate::domain::ports::UpdateSurface;
use crate::domain::{DownloadProgress, NoticeLevel, UpdateNotice};

/// Shows update notices on standard error and waits for Enter before
/// resolving them when standard input is a terminal.
#[derive(Debug)]
pub struct TerminalUpdateSurface {
    interactive: bool,
    locked: AtomicBool,
}

impl TerminalUpdateSurface {
    /// Surface that prompts only when attached to a terminal.
    pub fn new() -> Self {
        Self::with_interaction(std::io::stdin().is_terminal())
    }

    /// Surface that prompts iff `interactive`.
    pub fn with_interaction(interactive: bool) -> Self {
        Self {
            interactive,
            locked: AtomicBool::new(false),
        }
    }

    /// Whether other commands are blocked.
    pub fn is_locked(&self) -> bool {
        self.locked.load(Ordering::SeqCst)
    }

    async fn wait_for_enter(&self) {
        if !self.interactive {
            return;
        }
        let mut line = String::new();
        let mut stdin = BufReader::new(tokio::io::stdin());
        if let Err(error) = stdin.read_line(&mut line).await {
            warn!(%error, "could not read the acknowledgement");
        }
    }
}

impl Default for TerminalUpdateSurface {
    fn default() -> Self {
        Self::new()
    }
}

/// Text block for `notice` as shown in the terminal.
pub(super) fn notice_text(notice: &UpdateNotice) -> String {
    let marker = match notice.level() {
        NoticeLevel::Info => "i",
        NoticeLevel::Warning => "!",
        NoticeLevel::Error => "x",
    };
    format!(
        "\n[{marker}] {}\n{}\n[{}]",
        notice.title(),
        notice.message(),
        notice.button()
    )
}

#[async_trait]
impl UpdateSurface for TerminalUpdateSurface {
    async fn notify(&self, notice: UpdateNotice) {
        eprintln!("{}", notice_text(&notice));
        self.wait_for_enter().await;
    }

    fn set_title(&self, title: &str) {
        debug!(title, "window title");
        let mut stderr = std::io::stderr();
        if stderr.is_terminal() {
            let _ = write!(stderr, "\x1b]0;{title}\x07");
            let _ = stderr.flush();
        }
    }

    fn send_progress(&self, progress: DownloadProgress) {
        let mut stderr = std::io::stderr();
        let _ = write!(stderr, "\r{}", progress.message());
        if progress.total > 0 && progress.transferred >= progress.total {
            let _ = writeln!(stderr);
        }
        let _ = stderr.flush();
    }

    fn set_locked(&self, locked: bool) {
        info!(locked, "update surface lock");
        self.locked.store(locked, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    //! Coverage for the terminal surface.
    use super::*;
    use semver::Version;

    #[test]
    fn fatal_notice_names_the_close_action() {
        let text = notice_text(&UpdateNotice::Fatal);
        assert!(text.contains("[x] Error Crítico"));
        assert!(text.ends_with("[Cerrar Aplicación]"));
    }

    #[test]
    fn available_notice_names_the_version() {
        let text = notice_text(&UpdateNotice::Available {
            version: Version::new(1, 4, 0),
        });
        assert!(text.contains("(1.4.0)"));
        assert!(text.contains("OBLIGATORIA"));
    }

    #[tokio::test]
    async fn non_interactive_notices_resolve_immediately() {
        let surface = TerminalUpdateSurface::with_interaction(false);
        surface.notify(UpdateNotice::ReadyToInstall).await;
        surface.set_locked(true);
        assert!(surface.is_locked());
    }
}
