//! Domain ports defining the edges of the hexagon.
//!
//! Ports describe how the domain expects to interact with driven adapters:
//! the REST API, the local filesystem, the update feed, and the windowing
//! surface. Each trait exposes strongly typed errors so adapters map their
//! failures into predictable variants that services translate into
//! [`crate::domain::Error`].

mod macros;

mod cargo_repository;
mod image_source;
mod image_store;
mod login_gateway;
mod process_control;
mod reference_catalogue;
mod remote_api;
mod socio_repository;
mod token_store;
mod update_feed;
mod update_surface;
mod usuario_repository;

pub(crate) use macros::define_port_error;

#[cfg(test)]
pub use cargo_repository::MockCargoRepository;
pub use cargo_repository::CargoRepository;
#[cfg(test)]
pub use image_source::MockImageSource;
pub use image_source::{ImageSource, ImageSourceError};
#[cfg(test)]
pub use image_store::MockImageStore;
pub use image_store::{ImageStore, ImageStoreError};
#[cfg(test)]
pub use login_gateway::MockLoginGateway;
pub use login_gateway::LoginGateway;
#[cfg(test)]
pub use process_control::MockProcessControl;
pub use process_control::{ProcessControl, ProcessControlError};
#[cfg(test)]
pub use reference_catalogue::MockReferenceCatalogue;
pub use reference_catalogue::ReferenceCatalogue;
pub use remote_api::RemoteApiError;
#[cfg(test)]
pub use socio_repository::MockSocioRepository;
pub use socio_repository::SocioRepository;
#[cfg(test)]
pub use token_store::MockTokenStore;
pub use token_store::{TokenStore, TokenStoreError};
#[cfg(test)]
pub use update_feed::MockUpdateFeed;
pub use update_feed::{UpdateFeed, UpdateFeedError};
#[cfg(test)]
pub use update_surface::MockUpdateSurface;
pub use update_surface::UpdateSurface;
#[cfg(test)]
pub use usuario_repository::MockUsuarioRepository;
pub use usuario_repository::UsuarioRepository;
