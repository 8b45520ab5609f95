//! Release feed adapter.
//!
//! Fetches the JSON release manifest and streams installers into a staging
//! directory, verifying their SHA-256 digest when the manifest carries one.

mod http_feed;
mod staging;

pub use http_feed::HttpUpdateFeed;
