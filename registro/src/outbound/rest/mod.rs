//! REST API adapters.
//!
//! A single [`ApiClient`] implements every repository port backed by the
//! Registro FSE API. Each resource lives in its own module; the client
//! module owns transport, authentication headers, and error mapping.

mod auth;
mod cargos;
mod client;
mod dto;
mod referencias;
mod socios;
mod usuarios;

pub use client::{ApiClient, ApiClientError};
