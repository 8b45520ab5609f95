//! Port for ending the running process.

use std::path::Path;

use super::define_port_error;

define_port_error! {
    /// Errors raised while handing over to an installer.
    pub enum ProcessControlError {
        /// The installer could not be started.
        Spawn { path: String, message: String } =>
            "could not start installer {path}: {message}",
    }
}

/// Lifecycle control over the host process.
#[cfg_attr(test, mockall::automock)]
pub trait ProcessControl: Send + Sync {
    /// Terminate with `code`. Real adapters do not return.
    fn quit(&self, code: i32);

    /// Launch `installer` detached and terminate. Real adapters only return
    /// on failure.
    fn quit_and_install(&self, installer: &Path) -> Result<(), ProcessControlError>;
}
