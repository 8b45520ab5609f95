//! Host process control.

use std::path::Path;
use std::process::{Command, Stdio};

use tracing::{error, info};

use crate::domain::ports::{ProcessControl, ProcessControlError};

const MSI_LAUNCHER: &str = "msiexec";

/// Command that runs `installer`. Windows Installer packages are not
/// executables and go through `msiexec /i`.
fn installer_command(installer: &Path) -> Command {
    let is_msi = installer
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("msi"));
    if is_msi {
        let mut command = Command::new(MSI_LAUNCHER);
        command.arg("/i").arg(installer);
        command
    } else {
        Command::new(installer)
    }
}

/// Ends the running process, optionally launching an installer first.
#[derive(Debug, Clone, Copy, Default)]
pub struct HostProcess;

impl ProcessControl for HostProcess {
    fn quit(&self, code: i32) {
        error!(code, "exiting");
        std::process::exit(code);
    }

    fn quit_and_install(&self, installer: &Path) -> Result<(), ProcessControlError> {
        installer_command(installer)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|err| {
                ProcessControlError::spawn(installer.display().to_string(), err.to_string())
            })?;
        info!(installer = %installer.display(), "installer launched, exiting");
        std::process::exit(0);
    }
}
