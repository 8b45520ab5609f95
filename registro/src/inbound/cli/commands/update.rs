//! `update`.

use std::sync::Arc;

use tracing::info;

use crate::app::App;
use crate::domain::CycleOutcome;
use crate::inbound::cli::{CliError, Output, TerminalUpdateSurface};

pub(super) async fn run(app: &App, output: Output, once: bool) -> Result<(), CliError> {
    let surface = Arc::new(TerminalUpdateSurface::new());
    let Some(coordinator) = app.update_coordinator(surface)? else {
        output.message("Las actualizaciones automáticas están desactivadas");
        return Ok(());
    };

    let outcome = if once {
        coordinator.check_once().await
    } else {
        let interval = app.settings().update_check_interval();
        info!(interval_secs = interval.as_secs(), "watching for updates");
        coordinator.run(interval).await
    };
    match outcome {
        CycleOutcome::UpToDate => output.message("La aplicación está actualizada"),
        CycleOutcome::Skipped => output.message("Ya hay una comprobación en curso"),
        CycleOutcome::Installing { version } => {
            output.message(&format!("Instalando la versión {version}"));
        }
        CycleOutcome::Failed { error } => output.message(&format!("Actualización fallida: {error}")),
    }
    Ok(())
}
