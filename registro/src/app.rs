//! Composition root: builds the outbound adapters from settings and hands
//! out services wired to them.

use std::path::PathBuf;
use std::sync::Arc;

use mockable::DefaultClock;
use semver::Version;

use crate::config::RegistroSettings;
use crate::domain::ports::UpdateSurface;
use crate::domain::{
    AuthService, CargoService, ImageService, ReferenceService, Session, SocioService,
    UpdateCoordinator, UpdateCoordinatorPorts, UsuarioService,
};
use crate::inbound::cli::CliError;
use crate::outbound::images::{DesktopImageStore, FilesystemImageSource};
use crate::outbound::process::HostProcess;
use crate::outbound::rest::ApiClient;
use crate::outbound::token_store::FileTokenStore;
use crate::outbound::update_feed::HttpUpdateFeed;

/// Adapters built from [`RegistroSettings`] and shared by every service.
#[derive(Clone)]
pub struct App {
    settings: RegistroSettings,
    api: Arc<ApiClient>,
    images: Arc<DesktopImageStore>,
    session: Arc<Session>,
}

impl App {
    /// Build the REST client, image store, and session for `settings`.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::Setup`] when the API URL is unusable.
    pub fn from_settings(settings: RegistroSettings) -> Result<Self, CliError> {
        let api = ApiClient::new(settings.api_url(), settings.request_timeout())
            .map_err(|error| CliError::Setup(error.to_string()))?;
        let store = FileTokenStore::new(settings.token_file());
        let session = Session::new(Arc::new(store), Arc::new(DefaultClock));
        let images = DesktopImageStore::new(settings.images_root());
        Ok(Self {
            settings,
            api: Arc::new(api),
            images: Arc::new(images),
            session: Arc::new(session),
        })
    }

    /// Settings the adapters were built from.
    pub fn settings(&self) -> &RegistroSettings {
        &self.settings
    }

    /// Shared login session.
    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    /// Login and logout.
    pub fn auth(&self) -> AuthService<ApiClient> {
        AuthService::new(Arc::clone(&self.api), Arc::clone(&self.session))
    }

    /// Member workflows.
    pub fn socios(&self) -> SocioService<ApiClient, DesktopImageStore> {
        SocioService::new(
            Arc::clone(&self.api),
            Arc::clone(&self.images),
            Arc::clone(&self.session),
        )
    }

    /// Positions.
    pub fn cargos(&self) -> CargoService<ApiClient> {
        CargoService::new(Arc::clone(&self.api), Arc::clone(&self.session))
    }

    /// Lookup tables.
    pub fn referencias(&self) -> ReferenceService<ApiClient> {
        ReferenceService::new(Arc::clone(&self.api), Arc::clone(&self.session))
    }

    /// User accounts.
    pub fn usuarios(&self) -> UsuarioService<ApiClient> {
        UsuarioService::new(Arc::clone(&self.api), Arc::clone(&self.session))
    }

    /// Image picking from the given paths and saving under the images root.
    pub fn imagenes(
        &self,
        foto: Option<PathBuf>,
        firma: Option<PathBuf>,
    ) -> ImageService<FilesystemImageSource, DesktopImageStore> {
        ImageService::new(
            Arc::new(FilesystemImageSource::new(foto, firma)),
            Arc::clone(&self.images),
        )
    }

    /// Update coordinator for this build, or `None` when no feed is
    /// configured.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::Setup`] when the feed URL is unusable.
    pub fn update_coordinator(
        &self,
        surface: Arc<dyn UpdateSurface>,
    ) -> Result<Option<UpdateCoordinator>, CliError> {
        let Some(feed_url) = self.settings.update_feed_url() else {
            return Ok(None);
        };
        let feed = HttpUpdateFeed::new(
            feed_url,
            self.settings.staging_dir(),
            self.settings.request_timeout(),
        )
        .map_err(|error| CliError::Setup(error.to_string()))?;
        let ports = UpdateCoordinatorPorts {
            feed: Arc::new(feed),
            surface,
            process: Arc::new(HostProcess),
        };
        Ok(Some(UpdateCoordinator::new(ports, running_version())))
    }
}

fn running_version() -> Version {
    Version::parse(env!("CARGO_PKG_VERSION")).unwrap_or_else(|_| Version::new(0, 0, 0))
}
