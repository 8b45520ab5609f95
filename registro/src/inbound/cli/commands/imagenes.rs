//! `imagenes guardar`.

use serde::Serialize;

use crate::app::App;
use crate::domain::{ImageKind, SavedImage};
use crate::inbound::cli::{CliError, ImagenesCommand, Line, Output};

#[derive(Debug, Serialize)]
struct SavedRow {
    kind: ImageKind,
    relative: String,
    absolute: String,
}

impl SavedRow {
    fn new(kind: ImageKind, image: SavedImage) -> Self {
        Self {
            kind,
            relative: image.relative,
            absolute: image.absolute,
        }
    }
}

impl Line for SavedRow {
    fn line(&self) -> String {
        format!("{}: {}", self.kind, self.absolute)
    }
}

pub(super) async fn run(
    app: &App,
    output: Output,
    command: ImagenesCommand,
) -> Result<(), CliError> {
    let ImagenesCommand::Guardar {
        pnombre,
        papellido,
        cedula,
        foto,
        firma,
    } = command;
    let service = app.imagenes(foto, firma);

    let mut saved = Vec::new();
    for kind in [ImageKind::Foto, ImageKind::Firma] {
        let Some(data) = service.select(kind).await? else {
            continue;
        };
        let image = service
            .persist(&pnombre, &papellido, &cedula, kind, &data)
            .await?;
        saved.push(SavedRow::new(kind, image));
    }
    output.records(&saved, "No se seleccionó ninguna imagen");
    Ok(())
}
