//! Forced-update state machine and the notices it produces.
//!
//! The coordinator drives these types; they hold no I/O. Every release that
//! is newer than the running build must be installed: there is no way to
//! postpone a download, and any failure ends the process.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use semver::Version;
use serde::{Deserialize, Serialize};

/// Interval between two update checks.
pub const UPDATE_CHECK_INTERVAL: Duration = Duration::from_secs(10 * 60);

/// Window title prefix shown while a download runs.
pub const APP_TITLE: &str = "Registro FSE";

const BYTES_PER_MIB: u64 = 1024 * 1024;

/// A release advertised by the update feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseInfo {
    /// Semantic version of the release.
    pub version: Version,
    /// Installer download location.
    pub url: String,
    /// Expected SHA-256 of the installer, hex encoded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha256: Option<String>,
    /// Advertised installer size in bytes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    /// Free-form notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_notes: Option<String>,
}

impl ReleaseInfo {
    /// Whether this release should replace `running`.
    pub fn is_newer_than(&self, running: &Version) -> bool {
        self.version > *running
    }
}

/// An installer that finished downloading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadedUpdate {
    /// Version that was downloaded.
    pub version: Version,
    /// Location of the installer on disk.
    pub installer: PathBuf,
}

/// Raw progress reported by the feed for one received chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DownloadProgress {
    /// Bytes received so far.
    pub transferred: u64,
    /// Total bytes expected; zero when unknown.
    pub total: u64,
}

impl DownloadProgress {
    /// Percentage rounded to the nearest integer, capped at 100.
    pub fn percent(&self) -> u64 {
        if self.total == 0 {
            return 0;
        }
        let scaled = self.transferred.min(self.total).saturating_mul(100);
        rounded_div(scaled, self.total)
    }

    /// Received size in whole MiB, rounded.
    pub fn transferred_mib(&self) -> u64 {
        rounded_div(self.transferred, BYTES_PER_MIB)
    }

    /// Expected size in whole MiB, rounded.
    pub fn total_mib(&self) -> u64 {
        rounded_div(self.total, BYTES_PER_MIB)
    }

    /// Window title while downloading.
    ///
    /// # Examples
    /// ```
    /// use registro::domain::DownloadProgress;
    ///
    /// let progress = DownloadProgress { transferred: 50, total: 200 };
    /// assert_eq!(progress.title(), "Registro FSE - Descargando actualización 25%");
    /// ```
    pub fn title(&self) -> String {
        format!("{APP_TITLE} - Descargando actualización {}%", self.percent())
    }

    /// Progress line for logs and the terminal.
    pub fn message(&self) -> String {
        format!(
            "Descargando actualización: {}% ({}MB / {}MB)",
            self.percent(),
            self.transferred_mib(),
            self.total_mib()
        )
    }
}

fn rounded_div(numerator: u64, denominator: u64) -> u64 {
    let half = denominator / 2;
    numerator.saturating_add(half).checked_div(denominator).unwrap_or(0)
}

/// Where the coordinator is in the update cycle.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum UpdateState {
    /// Waiting for the next check.
    #[default]
    Idle,
    /// Asking the feed for the latest release.
    Checking,
    /// A newer release was found; the download is about to start.
    UpdateAvailable {
        /// Release that will be installed.
        version: Version,
    },
    /// The installer is being fetched.
    Downloading {
        /// Release being fetched.
        version: Version,
        /// Rounded percentage.
        percent: u64,
    },
    /// The installer is ready and the install prompt is shown.
    Downloaded {
        /// Release ready to install.
        version: Version,
    },
    /// The process is handing over to the installer.
    Installing {
        /// Release being installed.
        version: Version,
    },
    /// The cycle failed and the process is shutting down.
    Failed {
        /// Failure description.
        error: String,
    },
}

impl UpdateState {
    /// Whether no further transition is possible.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Installing { .. } | Self::Failed { .. })
    }

    /// Whether a check cycle is currently running.
    pub fn is_busy(&self) -> bool {
        !matches!(self, Self::Idle)
    }

    /// Apply `event`, returning the next state.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidTransition`] when `event` is not valid in this
    /// state; the state is left unchanged.
    pub fn apply(&self, event: UpdateEvent) -> Result<Self, InvalidTransition> {
        let next = match (self, event) {
            (Self::Idle, UpdateEvent::CheckStarted) => Self::Checking,
            (Self::Checking, UpdateEvent::NoUpdate) => Self::Idle,
            (Self::Checking, UpdateEvent::Available(version)) => Self::UpdateAvailable { version },
            (Self::UpdateAvailable { version }, UpdateEvent::Progress(progress)) => {
                Self::Downloading {
                    version: version.clone(),
                    percent: progress.percent(),
                }
            }
            (Self::Downloading { version, .. }, UpdateEvent::Progress(progress)) => {
                Self::Downloading {
                    version: version.clone(),
                    percent: progress.percent(),
                }
            }
            (
                Self::UpdateAvailable { version } | Self::Downloading { version, .. },
                UpdateEvent::Downloaded,
            ) => Self::Downloaded {
                version: version.clone(),
            },
            (Self::Downloaded { version }, UpdateEvent::InstallStarted) => Self::Installing {
                version: version.clone(),
            },
            (state, UpdateEvent::Failed(error)) if !state.is_terminal() => Self::Failed { error },
            (state, event) => {
                return Err(InvalidTransition {
                    from: state.clone(),
                    event: event.name(),
                });
            }
        };
        Ok(next)
    }
}

impl fmt::Display for UpdateState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => f.write_str("idle"),
            Self::Checking => f.write_str("checking"),
            Self::UpdateAvailable { version } => write!(f, "update available ({version})"),
            Self::Downloading { version, percent } => {
                write!(f, "downloading {version} ({percent}%)")
            }
            Self::Downloaded { version } => write!(f, "downloaded ({version})"),
            Self::Installing { version } => write!(f, "installing {version}"),
            Self::Failed { error } => write!(f, "failed: {error}"),
        }
    }
}

/// Inputs to [`UpdateState::apply`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateEvent {
    /// A check cycle began.
    CheckStarted,
    /// The feed has nothing newer.
    NoUpdate,
    /// The feed advertises a newer release.
    Available(Version),
    /// A download chunk arrived.
    Progress(DownloadProgress),
    /// The installer is on disk.
    Downloaded,
    /// The operator acknowledged the install prompt.
    InstallStarted,
    /// The check or download failed.
    Failed(String),
}

impl UpdateEvent {
    fn name(&self) -> &'static str {
        match self {
            Self::CheckStarted => "check-started",
            Self::NoUpdate => "no-update",
            Self::Available(_) => "available",
            Self::Progress(_) => "progress",
            Self::Downloaded => "downloaded",
            Self::InstallStarted => "install-started",
            Self::Failed(_) => "failed",
        }
    }
}

/// Rejected state transition.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("event {event} is not valid while {from}")]
pub struct InvalidTransition {
    /// State the event was applied to.
    pub from: UpdateState,
    /// Name of the rejected event.
    pub event: &'static str,
}

/// Severity of a blocking notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    /// Informational.
    Info,
    /// Requires attention.
    Warning,
    /// The application is about to close.
    Error,
}

/// Blocking, single-button notices shown during the update flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateNotice {
    /// A mandatory update was found and is downloading.
    Available {
        /// New version.
        version: Version,
    },
    /// The installer is ready; the only action installs it.
    ReadyToInstall,
    /// The flow failed; the only action closes the application.
    Fatal,
}

impl UpdateNotice {
    /// Severity of the notice.
    pub fn level(&self) -> NoticeLevel {
        match self {
            Self::Available { .. } => NoticeLevel::Warning,
            Self::ReadyToInstall => NoticeLevel::Info,
            Self::Fatal => NoticeLevel::Error,
        }
    }

    /// Notice title.
    pub fn title(&self) -> &'static str {
        match self {
            Self::Available { .. } => "Actualización",
            Self::ReadyToInstall => "Actualización Descargada",
            Self::Fatal => "Error Crítico",
        }
    }

    /// Notice body.
    pub fn message(&self) -> String {
        match self {
            Self::Available { version } => format!(
                "Se ha detectado una nueva versión ({version}).\n\n\
                 La actualización es OBLIGATORIA para continuar usando la aplicación.\n\n\
                 La descarga comenzará automáticamente."
            ),
            Self::ReadyToInstall => "La actualización se ha descargado correctamente.\n\n\
                 La aplicación se cerrará y se instalará la nueva versión automáticamente."
                .to_owned(),
            Self::Fatal => "Hubo un error al descargar la actualización obligatoria.\n\n\
                 La aplicación se cerrará. Por favor, contacte al administrador del sistema."
                .to_owned(),
        }
    }

    /// Label of the only button.
    pub fn button(&self) -> &'static str {
        match self {
            Self::Available { .. } => "Aceptar",
            Self::ReadyToInstall => "Instalar Ahora",
            Self::Fatal => "Cerrar Aplicación",
        }
    }
}
