//! User management, restricted to administrators.

use std::sync::Arc;

use tracing::info;

use crate::domain::error::FORBIDDEN_MESSAGE;
use crate::domain::ports::UsuarioRepository;
use crate::domain::{AuthToken, Error, Session, Usuario, UsuarioForm};

/// User workflows built on the user repository.
#[derive(Clone)]
pub struct UsuarioService<R> {
    repo: Arc<R>,
    session: Arc<Session>,
}

impl<R> UsuarioService<R> {
    /// Create a new service with the given repository and session.
    pub fn new(repo: Arc<R>, session: Arc<Session>) -> Self {
        Self { repo, session }
    }
}

impl<R> UsuarioService<R>
where
    R: UsuarioRepository,
{
    async fn admin_token(&self) -> Result<AuthToken, Error> {
        let token = self.session.bearer().await?;
        if !token.user().rol.is_admin() {
            return Err(Error::forbidden(FORBIDDEN_MESSAGE));
        }
        Ok(token)
    }

    /// Every user.
    pub async fn list(&self) -> Result<Vec<Usuario>, Error> {
        let token = self.admin_token().await?;
        self.repo
            .list(&token)
            .await
            .map_err(|error| error.into_domain("Error obteniendo usuarios"))
    }

    /// A single user.
    pub async fn find(&self, id: i64) -> Result<Usuario, Error> {
        let token = self.admin_token().await?;
        self.repo
            .find(&token, id)
            .await
            .map_err(|error| error.into_domain("Error obteniendo usuario"))
    }

    /// Create a user.
    pub async fn create(&self, form: UsuarioForm) -> Result<Usuario, Error> {
        form.validate_for_create()?;
        let token = self.admin_token().await?;
        let created = self
            .repo
            .create(&token, &form.into_new_usuario())
            .await
            .map_err(|error| error.into_domain("Error en el registro"))?;
        info!(id = created.id, username = %created.username, "usuario created");
        Ok(created)
    }

    /// Save edits to a user; the password changes only when one was typed.
    pub async fn update(
        &self,
        id: i64,
        form: UsuarioForm,
        active: Option<bool>,
    ) -> Result<Usuario, Error> {
        form.validate_for_update()?;
        let token = self.admin_token().await?;
        self.repo
            .update(&token, &form.into_usuario_update(id, active))
            .await
            .map_err(|error| error.into_domain("Error actualizando usuario"))
    }

    /// Delete a user. Operators cannot delete themselves.
    pub async fn delete(&self, id: i64) -> Result<(), Error> {
        let token = self.admin_token().await?;
        if token.user().user_id == id {
            return Err(Error::invalid_request("No puede eliminar su propio usuario"));
        }
        self.repo
            .delete(&token, id)
            .await
            .map_err(|error| error.into_domain("Error eliminando usuario"))?;
        info!(id, "usuario deleted");
        Ok(())
    }
}
