//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **rest**: the Registro FSE REST API over reqwest
//! - **images**: picking and storing member images with `cap_std`
//! - **token_store**: the session token file
//! - **update_feed**: release manifest and installer downloads
//! - **process**: quitting and handing over to an installer
//!
//! Adapters are thin translators between domain types and infrastructure
//! representations. They contain no business logic.

mod fs;
pub mod images;
pub mod process;
pub mod rest;
pub mod token_store;
pub mod update_feed;
