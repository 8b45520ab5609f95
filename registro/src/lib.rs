//! Registro FSE member registry client.
//!
//! The crate follows a hexagonal layout: [`domain`] holds entities, rules,
//! and services behind port traits; [`outbound`] implements those ports
//! against the REST API, the local filesystem, and the update feed; and
//! [`inbound`] drives the services from the command line. [`app`] wires
//! the adapters into services.

pub mod app;
pub mod config;
pub mod domain;
pub mod inbound;
pub mod outbound;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
