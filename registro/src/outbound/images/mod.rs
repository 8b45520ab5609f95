//! Image adapters.
//!
//! [`DesktopImageStore`] writes member images under `FSEIMAGES` and
//! [`FilesystemImageSource`] reads picked files into data URIs.

mod source;
mod store;

pub use source::FilesystemImageSource;
pub use store::DesktopImageStore;
