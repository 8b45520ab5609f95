//! `cargos` and `referencias`.

use crate::app::App;
use crate::inbound::cli::{CargosCommand, CliError, Output, ReferenciasCommand};

pub(super) async fn cargos(
    app: &App,
    output: Output,
    command: CargosCommand,
) -> Result<(), CliError> {
    let service = app.cargos();
    match command {
        CargosCommand::List => {
            output.records(&service.list().await?, "No hay cargos registrados");
        }
        CargosCommand::Add { nombre, tipo } => {
            output.record(&service.create(&nombre, tipo).await?);
        }
        CargosCommand::Edit { id, nombre, tipo } => {
            output.record(&service.update(id, &nombre, tipo).await?);
        }
    }
    Ok(())
}

pub(super) async fn referencias(
    app: &App,
    output: Output,
    command: ReferenciasCommand,
) -> Result<(), CliError> {
    let service = app.referencias();
    match command {
        ReferenciasCommand::Provincias => {
            output.records(&service.provincias().await?, "No hay provincias registradas");
        }
        ReferenciasCommand::Regiones => {
            output.records(&service.regiones().await?, "No hay regiones registradas");
        }
        ReferenciasCommand::Autoidentificaciones => output.records(
            &service.autoidentificaciones().await?,
            "No hay autoidentificaciones registradas",
        ),
        ReferenciasCommand::NuevaRegion { nombre } => {
            output.record(&service.create_region(&nombre).await?);
        }
        ReferenciasCommand::EditarRegion { id, nombre } => {
            output.record(&service.update_region(id, &nombre).await?);
        }
        ReferenciasCommand::NuevaAutoidentificacion { nombre } => {
            output.record(&service.create_autoidentificacion(&nombre).await?);
        }
        ReferenciasCommand::EditarAutoidentificacion { id, nombre } => {
            output.record(&service.update_autoidentificacion(id, &nombre).await?);
        }
    }
    Ok(())
}
