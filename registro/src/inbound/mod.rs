//! Inbound adapters.
//!
//! Only the terminal front end lives here; it parses commands, builds the
//! services from settings, and renders their results.

pub mod cli;
