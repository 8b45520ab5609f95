//! Member registration, editing, listing, and deletion.

use std::sync::Arc;

use pagination::{Page, PageRequest};
use tracing::info;

use crate::domain::ports::{ImageStore, SocioRepository};
use crate::domain::{Error, ImageKind, Session, Socio, SocioDraft, persist_image};

const CREATE_FALLBACK: &str = "Error en el registro";
const LIST_FALLBACK: &str = "Error obteniendo socios";
const FIND_FALLBACK: &str = "Error obteniendo el socio";
const UPDATE_FALLBACK: &str = "No se pudo actualizar el socio";
const DELETE_FALLBACK: &str = "Error eliminando el socio";

/// Member workflows built on the member repository and the image store.
#[derive(Clone)]
pub struct SocioService<R, T> {
    repo: Arc<R>,
    images: Arc<T>,
    session: Arc<Session>,
}

impl<R, T> SocioService<R, T> {
    /// Create a new service with the given collaborators.
    pub fn new(repo: Arc<R>, images: Arc<T>, session: Arc<Session>) -> Self {
        Self {
            repo,
            images,
            session,
        }
    }
}

impl<R, T> SocioService<R, T>
where
    R: SocioRepository,
    T: ImageStore,
{
    /// Register a new member.
    ///
    /// The form is validated before anything else happens. The photo is then
    /// written, followed by the signature, and only when both succeed is the
    /// member created remotely with the stored image paths.
    pub async fn register(&self, draft: SocioDraft) -> Result<Socio, Error> {
        let draft = draft.normalized();
        draft.validate_for_create()?;
        let identity = draft
            .image_identity()
            .map_err(|error| Error::invalid_request(error.to_string()))?;
        let token = self.session.bearer().await?;

        let (Some(foto), Some(firma)) = (draft.foto.as_ref(), draft.firma.as_ref()) else {
            return Err(Error::invalid_request(super::socio::INCOMPLETE_FORM_MESSAGE));
        };
        let foto = persist_image(self.images.as_ref(), &identity, ImageKind::Foto, foto).await?;
        let firma =
            persist_image(self.images.as_ref(), &identity, ImageKind::Firma, firma).await?;

        let body = draft.into_new_socio(foto.relative, firma.relative, token.user().user_id);
        let created = self
            .repo
            .create(&token, &body)
            .await
            .map_err(|error| error.into_domain(CREATE_FALLBACK))?;
        info!(codunico = %created.codunico, "socio registered");
        Ok(created)
    }

    /// Save edits to `codunico`, replacing only the images that were picked.
    pub async fn update(&self, codunico: &str, draft: SocioDraft) -> Result<Socio, Error> {
        let draft = draft.normalized();
        draft.validate_for_update()?;
        let token = self.session.bearer().await?;

        let mut rutafoto = None;
        let mut rutafirma = None;
        if draft.foto.is_some() || draft.firma.is_some() {
            let identity = draft
                .image_identity()
                .map_err(|error| Error::invalid_request(error.to_string()))?;
            if let Some(foto) = draft.foto.as_ref() {
                let saved =
                    persist_image(self.images.as_ref(), &identity, ImageKind::Foto, foto).await?;
                rutafoto = Some(saved.relative);
            }
            if let Some(firma) = draft.firma.as_ref() {
                let saved =
                    persist_image(self.images.as_ref(), &identity, ImageKind::Firma, firma)
                        .await?;
                rutafirma = Some(saved.relative);
            }
        }

        let changes = draft.into_socio_update(
            codunico.to_owned(),
            rutafoto,
            rutafirma,
            token.user().user_id,
        );
        let updated = self
            .repo
            .update(&token, codunico, &changes)
            .await
            .map_err(|error| error.into_domain(UPDATE_FALLBACK))?;
        info!(codunico, "socio updated");
        Ok(updated)
    }

    /// One page of members, optionally filtered by code, id number, or name.
    pub async fn list(
        &self,
        request: PageRequest,
        filter: Option<&str>,
    ) -> Result<Page<Socio>, Error> {
        let token = self.session.bearer().await?;
        let socios = self
            .repo
            .list(&token)
            .await
            .map_err(|error| error.into_domain(LIST_FALLBACK))?;
        let matching = match filter {
            Some(filter) => socios
                .into_iter()
                .filter(|socio| socio.matches(filter))
                .collect(),
            None => socios,
        };
        Ok(Page::paginate(matching, request))
    }

    /// A single member.
    pub async fn show(&self, codunico: &str) -> Result<Socio, Error> {
        let codunico = codunico.trim();
        if codunico.is_empty() {
            return Err(Error::invalid_request("Código inválido"));
        }
        let token = self.session.bearer().await?;
        self.repo
            .find(&token, codunico)
            .await
            .map_err(|error| error.into_domain(FIND_FALLBACK))
    }

    /// Delete a member.
    pub async fn delete(&self, codunico: &str) -> Result<(), Error> {
        let codunico = codunico.trim();
        if codunico.is_empty() {
            return Err(Error::invalid_request("Código inválido"));
        }
        let token = self.session.bearer().await?;
        self.repo
            .delete(&token, codunico)
            .await
            .map_err(|error| error.into_domain(DELETE_FALLBACK))?;
        info!(codunico, "socio deleted");
        Ok(())
    }
}

#[cfg(test)]
#[path = "socio_service_tests.rs"]
mod tests;
