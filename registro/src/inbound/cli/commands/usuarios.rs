//! `usuarios` subcommands.

use zeroize::Zeroizing;

use crate::app::App;
use crate::domain::UsuarioForm;
use crate::inbound::cli::{CliError, Output, UsuarioArgs, UsuariosCommand};

pub(super) async fn run(
    app: &App,
    output: Output,
    command: UsuariosCommand,
) -> Result<(), CliError> {
    let service = app.usuarios();
    match command {
        UsuariosCommand::List => {
            output.records(&service.list().await?, "No hay usuarios registrados");
        }
        UsuariosCommand::Show { id } => output.record(&service.find(id).await?),
        UsuariosCommand::Add(fields) => {
            let form = overlay(fields, UsuarioForm::default());
            output.record(&service.create(form).await?);
        }
        UsuariosCommand::Edit { id, fields, active } => {
            let current = service.find(id).await?;
            let form = overlay(fields, UsuarioForm::from(&current));
            output.record(&service.update(id, form, active).await?);
        }
        UsuariosCommand::Delete { id } => {
            service.delete(id).await?;
            output.message(&format!("Usuario {id} eliminado"));
        }
    }
    Ok(())
}

fn overlay(fields: UsuarioArgs, base: UsuarioForm) -> UsuarioForm {
    UsuarioForm {
        username: fields.username.unwrap_or(base.username),
        email: fields.email.unwrap_or(base.email),
        firstname: fields.firstname.unwrap_or(base.firstname),
        lastname: fields.lastname.unwrap_or(base.lastname),
        password: fields.password.map_or(base.password, Zeroizing::new),
        rol_id: fields.rol.unwrap_or(base.rol_id),
    }
}

#[cfg(test)]
mod tests {
    //! Form overlay coverage.
    use super::*;
    use crate::domain::usuario::DEFAULT_ROL_ID;

    #[test]
    fn new_users_default_to_the_standard_role() {
        let form = overlay(
            UsuarioArgs {
                username: Some("ana".to_owned()),
                ..UsuarioArgs::default()
            },
            UsuarioForm::default(),
        );
        assert_eq!(form.username, "ana");
        assert_eq!(form.rol_id, DEFAULT_ROL_ID);
        assert!(form.password.is_empty());
    }
}
