//! Command dispatch.

mod catalogos;
mod imagenes;
mod sesion;
mod socios;
mod update;
mod usuarios;

use std::sync::Arc;

use tracing::{debug, info};

use super::{Cli, CliError, Command, Output, TerminalUpdateSurface};
use crate::app::App;
use crate::domain::SessionStatus;

/// Run `cli` against the adapters in `app`.
///
/// A configured update feed is checked before any other command; a newer
/// release is installed and the command itself never runs.
///
/// # Errors
///
/// Returns the first error raised by the command's service.
pub async fn run(cli: Cli, app: &App) -> Result<(), CliError> {
    let output = Output::new(cli.json);
    if !matches!(cli.command, Command::Update { .. }) && startup_update_check(app).await? {
        return Ok(());
    }
    if cli.command.restores_session() {
        match app.session().restore().await? {
            SessionStatus::Active(user) => debug!(user_id = user.user_id, "session restored"),
            SessionStatus::Expired => info!("stored session expired"),
            SessionStatus::Anonymous => debug!("no stored session"),
        }
    }

    match cli.command {
        Command::Login { usuario, password } => {
            sesion::login(app, output, &usuario, password).await
        }
        Command::Logout => sesion::logout(app, output).await,
        Command::Whoami { watch } => sesion::whoami(app, output, watch).await,
        Command::Socios(command) => socios::run(app, output, command).await,
        Command::Cargos(command) => catalogos::cargos(app, output, command).await,
        Command::Referencias(command) => catalogos::referencias(app, output, command).await,
        Command::Usuarios(command) => usuarios::run(app, output, command).await,
        Command::Imagenes(command) => imagenes::run(app, output, command).await,
        Command::Update { once } => update::run(app, output, once).await,
    }
}

/// Whether the startup check handed over to an installer or failed.
async fn startup_update_check(app: &App) -> Result<bool, CliError> {
    let surface = Arc::new(TerminalUpdateSurface::new());
    let Some(coordinator) = app.update_coordinator(surface)? else {
        return Ok(false);
    };
    Ok(coordinator.check_once().await.is_final())
}
