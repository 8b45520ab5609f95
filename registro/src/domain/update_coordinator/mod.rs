//! Forced auto-update orchestration.
//!
//! The coordinator checks the release feed on start-up and then on a fixed
//! interval. A newer release locks the surface and is downloaded straight
//! away while the operator reads the notice; the only way forward is to
//! install it. Any failure shows one fatal notice and ends the process.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use semver::Version;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

use crate::domain::ports::{ProcessControl, UpdateFeed, UpdateSurface};
use crate::domain::update::{APP_TITLE, UpdateEvent, UpdateNotice, UpdateState};
use crate::domain::{DownloadProgress, DownloadedUpdate, ReleaseInfo};

/// Exit code used when the update flow fails.
pub const FATAL_EXIT_CODE: i32 = 1;

/// Collaborators the coordinator drives.
#[derive(Clone)]
pub struct UpdateCoordinatorPorts {
    /// Release manifest and installer source.
    pub feed: Arc<dyn UpdateFeed>,
    /// Window or terminal presenting the flow.
    pub surface: Arc<dyn UpdateSurface>,
    /// Host process lifecycle.
    pub process: Arc<dyn ProcessControl>,
}

/// How a single check cycle ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// The running version is current.
    UpToDate,
    /// Another cycle was still in flight.
    Skipped,
    /// The installer was launched.
    Installing {
        /// Installed release.
        version: Version,
    },
    /// The cycle failed and the process was told to exit.
    Failed {
        /// Failure description.
        error: String,
    },
}

impl CycleOutcome {
    /// Whether the process is on its way out.
    pub fn is_final(&self) -> bool {
        matches!(self, Self::Installing { .. } | Self::Failed { .. })
    }
}

/// Drives the mandatory update state machine.
pub struct UpdateCoordinator {
    ports: UpdateCoordinatorPorts,
    running: Version,
    state: Mutex<UpdateState>,
}

impl UpdateCoordinator {
    /// Create a coordinator for the application at version `running`.
    pub fn new(ports: UpdateCoordinatorPorts, running: Version) -> Self {
        Self {
            ports,
            running,
            state: Mutex::new(UpdateState::Idle),
        }
    }

    /// Current state.
    pub fn state(&self) -> UpdateState {
        self.lock_state().clone()
    }

    fn lock_state(&self) -> MutexGuard<'_, UpdateState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn transition(&self, event: UpdateEvent) -> Result<UpdateState, String> {
        let mut state = self.lock_state();
        let progress = matches!(event, UpdateEvent::Progress(_));
        match state.apply(event) {
            Ok(next) => {
                if progress {
                    debug!(from = %*state, to = %next, "update state changed");
                } else {
                    info!(from = %*state, to = %next, "update state changed");
                }
                *state = next.clone();
                Ok(next)
            }
            Err(rejected) => {
                warn!(error = %rejected, "update transition rejected");
                Err(rejected.to_string())
            }
        }
    }

    /// Check on start-up and then every `interval` until an update installs
    /// or the flow fails.
    ///
    /// Ticks missed while a cycle is running are dropped, not queued.
    pub async fn run(&self, interval: Duration) -> CycleOutcome {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            ticker.tick().await;
            let outcome = self.check_once().await;
            if outcome.is_final() {
                return outcome;
            }
        }
    }

    /// Run one check cycle.
    ///
    /// Returns [`CycleOutcome::Skipped`] without touching the feed when a
    /// cycle is already in flight.
    pub async fn check_once(&self) -> CycleOutcome {
        {
            let mut state = self.lock_state();
            if state.is_busy() {
                debug!(state = %*state, "update check skipped");
                return CycleOutcome::Skipped;
            }
            *state = UpdateState::Checking;
            info!(running = %self.running, "checking for updates");
        }

        let release = match self.ports.feed.latest_release().await {
            Ok(release) => release,
            Err(err) => return self.fail(err.to_string()).await,
        };
        if !release.is_newer_than(&self.running) {
            let _ = self.transition(UpdateEvent::NoUpdate);
            return CycleOutcome::UpToDate;
        }

        if let Err(err) = self.transition(UpdateEvent::Available(release.version.clone())) {
            return self.fail(err).await;
        }
        let downloaded = match self.download(&release).await {
            Ok(downloaded) => downloaded,
            Err(err) => return self.fail(err).await,
        };
        if let Err(err) = self.transition(UpdateEvent::Downloaded) {
            return self.fail(err).await;
        }
        self.install(downloaded).await
    }

    async fn download(&self, release: &ReleaseInfo) -> Result<DownloadedUpdate, String> {
        let surface = &self.ports.surface;
        surface.set_locked(true);

        let (tx, mut rx) = mpsc::unbounded_channel::<DownloadProgress>();
        let notice = surface.notify(UpdateNotice::Available {
            version: release.version.clone(),
        });
        let download = self.ports.feed.download(release, tx);
        let relay = async {
            while let Some(progress) = rx.recv().await {
                if self.transition(UpdateEvent::Progress(progress)).is_ok() {
                    surface.set_title(&progress.title());
                    surface.send_progress(progress);
                }
            }
        };
        let ((), downloaded, ()) = tokio::join!(notice, download, relay);
        let downloaded = downloaded.map_err(|err| err.to_string())?;
        surface.set_title(APP_TITLE);
        info!(
            version = %downloaded.version,
            installer = %downloaded.installer.display(),
            "update downloaded"
        );
        Ok(downloaded)
    }

    async fn install(&self, downloaded: DownloadedUpdate) -> CycleOutcome {
        self.ports.surface.notify(UpdateNotice::ReadyToInstall).await;
        if let Err(err) = self.transition(UpdateEvent::InstallStarted) {
            return self.fail(err).await;
        }
        match self.ports.process.quit_and_install(&downloaded.installer) {
            Ok(()) => CycleOutcome::Installing {
                version: downloaded.version,
            },
            Err(err) => {
                let message = err.to_string();
                error!(error = %message, "installer launch failed");
                self.terminate().await;
                CycleOutcome::Failed { error: message }
            }
        }
    }

    async fn fail(&self, message: String) -> CycleOutcome {
        error!(error = %message, "update flow failed");
        let _ = self.transition(UpdateEvent::Failed(message.clone()));
        self.terminate().await;
        CycleOutcome::Failed { error: message }
    }

    async fn terminate(&self) {
        self.ports.surface.notify(UpdateNotice::Fatal).await;
        self.ports.process.quit(FATAL_EXIT_CODE);
    }
}
