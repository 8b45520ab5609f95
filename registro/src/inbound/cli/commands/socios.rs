//! `socios` subcommands.

use pagination::PageRequest;

use crate::app::App;
use crate::domain::{ImageKind, SocioDraft};
use crate::inbound::cli::{CliError, Output, SocioArgs, SociosCommand};

pub(super) async fn run(app: &App, output: Output, command: SociosCommand) -> Result<(), CliError> {
    let service = app.socios();
    match command {
        SociosCommand::List {
            page,
            per_page,
            filter,
        } => {
            let request = PageRequest::new(page, per_page)?;
            let page = service.list(request, filter.as_deref()).await?;
            output.page(&page, "No hay socios registrados");
        }
        SociosCommand::Show { codunico } => output.record(&service.show(&codunico).await?),
        SociosCommand::New(fields) => {
            let draft = draft_with_images(app, fields, SocioDraft::default()).await?;
            output.record(&service.register(draft).await?);
        }
        SociosCommand::Edit { codunico, fields } => {
            let current = service.show(&codunico).await?;
            let draft = draft_with_images(app, fields, SocioDraft::from(&current)).await?;
            output.record(&service.update(&codunico, draft).await?);
        }
        SociosCommand::Delete { codunico } => {
            service.delete(&codunico).await?;
            output.message(&format!("Socio {} eliminado", codunico.trim()));
        }
    }
    Ok(())
}

/// Overlay the given fields on `base` and read any picked images.
async fn draft_with_images(
    app: &App,
    fields: SocioArgs,
    base: SocioDraft,
) -> Result<SocioDraft, CliError> {
    let images = app.imagenes(fields.foto.clone(), fields.firma.clone());
    let mut draft = overlay(fields, base);
    draft.foto = images.select(ImageKind::Foto).await?;
    draft.firma = images.select(ImageKind::Firma).await?;
    Ok(draft)
}

fn overlay(fields: SocioArgs, base: SocioDraft) -> SocioDraft {
    SocioDraft {
        cedula: fields.cedula.unwrap_or(base.cedula),
        pnombre: fields.pnombre.unwrap_or(base.pnombre),
        snombre: fields.snombre.unwrap_or(base.snombre),
        papellido: fields.papellido.unwrap_or(base.papellido),
        sapellido: fields.sapellido.unwrap_or(base.sapellido),
        ptelefono: fields.ptelefono.unwrap_or(base.ptelefono),
        stelefono: fields.stelefono.unwrap_or(base.stelefono),
        email: fields.email.unwrap_or(base.email),
        autoidentificacionfk: fields
            .autoidentificacion
            .unwrap_or(base.autoidentificacionfk),
        cargoid: fields.cargo.unwrap_or(base.cargoid),
        provinciaid: fields.provincia.unwrap_or(base.provinciaid),
        regionid: fields.region.unwrap_or(base.regionid),
        sector: fields.sector.unwrap_or(base.sector),
        foto: base.foto,
        firma: base.firma,
    }
}
