//! Domain entities, rules, and services.
//!
//! Purpose: hold everything Registro FSE knows about members, positions,
//! users, sessions, images, and updates without depending on HTTP, the
//! filesystem, or the terminal. Adapters reach the domain through
//! [`ports`].
//!
//! Public surface:
//! - Error (alias to `error::DomainError`) and ErrorCode.
//! - Entities and request bodies: Socio, Cargo, Usuario, and the lookups.
//! - Session and AuthToken for authenticated calls.
//! - Services: AuthService, SocioService, CargoService, ReferenceService,
//!   UsuarioService, ImageService, UpdateCoordinator.

pub mod auth;
pub mod cargo;
pub mod error;
pub mod image;
pub mod ports;
pub mod reference;
pub mod session;
pub mod socio;
pub mod update;
pub mod usuario;
pub mod validation;

mod auth_service;
mod cargo_service;
mod image_service;
mod reference_service;
mod socio_service;
mod update_coordinator;
mod usuario_service;

pub use self::auth::{AuthToken, LoginCredentials, LoginValidationError, Rol, UserInfo};
pub use self::auth_service::AuthService;
pub use self::cargo::{Cargo, CargoTipo, NewCargo};
pub use self::cargo_service::CargoService;
pub use self::error::{DomainError as Error, ErrorCode};
pub use self::image::{
    ImageDataError, ImageDataUri, ImageIdentity, ImageIdentityError, ImageKind,
};
pub use self::image_service::{ImageService, SavedImage, persist_image};
pub use self::reference::{
    Autoidentificacion, AutoidentificacionUpdate, NewAutoidentificacion, NewRegion, Provincia,
    Region, RegionUpdate,
};
pub use self::reference_service::ReferenceService;
pub use self::session::{SESSION_VERIFY_INTERVAL, Session, SessionStatus};
pub use self::socio::{NewSocio, Socio, SocioDraft, SocioUpdate};
pub use self::socio_service::SocioService;
pub use self::update::{
    APP_TITLE, DownloadProgress, DownloadedUpdate, InvalidTransition, NoticeLevel, ReleaseInfo,
    UPDATE_CHECK_INTERVAL, UpdateEvent, UpdateNotice, UpdateState,
};
pub use self::update_coordinator::{
    CycleOutcome, FATAL_EXIT_CODE, UpdateCoordinator, UpdateCoordinatorPorts,
};
pub use self::usuario::{NewUsuario, Usuario, UsuarioForm, UsuarioRol, UsuarioUpdate};
pub use self::usuario_service::UsuarioService;

/// Convenient domain result alias.
///
/// # Examples
/// ```
/// use registro::domain::{DomainResult, Error};
///
/// fn guard(admin: bool) -> DomainResult<()> {
///     if admin { Ok(()) } else { Err(Error::forbidden("solo administradores")) }
/// }
/// assert!(guard(false).is_err());
/// ```
pub type DomainResult<T> = Result<T, Error>;
