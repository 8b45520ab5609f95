//! Member photo and signature images.
//!
//! Images travel through the application as base64 data URIs and land on
//! disk under a folder derived from the member's identity:
//! `FSEIMAGES/<PAPELLIDO>_<PNOMBRE>_<CEDULA>/<FOLDER>_<KIND>.PNG`.

use std::fmt;
use std::path::Path;
use std::sync::OnceLock;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Top-level directory, below the images root, holding every member folder.
pub const IMAGES_DIR: &str = "FSEIMAGES";

/// File extensions accepted when picking an image.
pub const ACCEPTED_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "gif"];

static DATA_URI_PREFIX_RE: OnceLock<Regex> = OnceLock::new();

fn data_uri_prefix() -> &'static Regex {
    DATA_URI_PREFIX_RE.get_or_init(|| {
        Regex::new(r"^data:image/\w+;base64,")
            .unwrap_or_else(|error| panic!("data URI prefix regex failed to compile: {error}"))
    })
}

/// Which of the two member images is meant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageKind {
    /// Portrait photograph.
    Foto,
    /// Handwritten signature.
    Firma,
}

impl ImageKind {
    /// Upper-case suffix used in file names.
    pub fn suffix(self) -> &'static str {
        match self {
            Self::Foto => "FOTO",
            Self::Firma => "FIRMA",
        }
    }
}

impl fmt::Display for ImageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Foto => f.write_str("foto"),
            Self::Firma => f.write_str("firma"),
        }
    }
}

/// Validation errors raised while building an [`ImageIdentity`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ImageIdentityError {
    /// A part was blank.
    #[error("{field} must not be empty")]
    Empty {
        /// Offending part.
        field: &'static str,
    },
    /// A part could escape the member folder.
    #[error("{field} must not contain path separators")]
    PathLike {
        /// Offending part.
        field: &'static str,
    },
}

/// The identity parts that name a member's image folder.
///
/// ## Invariants
/// - Every part is non-blank.
/// - No part contains `/`, `\`, or a NUL byte, and no part is `.` or `..`.
///
/// # Examples
/// ```
/// use registro::domain::{ImageIdentity, ImageKind};
///
/// let identity = ImageIdentity::new("Juan", "Perez", "0102030405").unwrap();
/// assert_eq!(
///     identity.relative_path(ImageKind::Foto),
///     "FSEIMAGES/PEREZ_JUAN_0102030405/PEREZ_JUAN_0102030405_FOTO.PNG",
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageIdentity {
    folder: String,
}

impl ImageIdentity {
    /// Validate the parts and derive the folder name.
    pub fn new(pnombre: &str, papellido: &str, cedula: &str) -> Result<Self, ImageIdentityError> {
        let pnombre = check_part("pnombre", pnombre)?;
        let papellido = check_part("papellido", papellido)?;
        let cedula = check_part("cedula", cedula)?;
        Ok(Self {
            folder: format!("{papellido}_{pnombre}_{cedula}").to_uppercase(),
        })
    }

    /// Folder name, `UPPER(papellido_pnombre_cedula)`.
    pub fn folder(&self) -> &str {
        self.folder.as_str()
    }

    /// File name inside the folder for `kind`.
    pub fn file_name(&self, kind: ImageKind) -> String {
        format!("{}_{}.PNG", self.folder, kind.suffix())
    }

    /// Path stored on the member record, relative to the images root.
    pub fn relative_path(&self, kind: ImageKind) -> String {
        format!("{IMAGES_DIR}/{}/{}", self.folder, self.file_name(kind))
    }
}

fn check_part<'a>(field: &'static str, raw: &'a str) -> Result<&'a str, ImageIdentityError> {
    let value = raw.trim();
    if value.is_empty() {
        return Err(ImageIdentityError::Empty { field });
    }
    if value == "." || value == ".." || value.contains(['/', '\\', '\0']) {
        return Err(ImageIdentityError::PathLike { field });
    }
    Ok(value)
}

/// Errors raised while decoding a data URI.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ImageDataError {
    /// Nothing was provided.
    #[error("image data is empty")]
    Empty,
    /// The payload is not valid base64.
    #[error("image data is not valid base64: {message}")]
    Encoding {
        /// Decoder failure.
        message: String,
    },
}

/// An image encoded as `data:<mime>;base64,<payload>`.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageDataUri(String);

impl ImageDataUri {
    /// Wrap an already encoded data URI, or bare base64 payload.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Encode `bytes` with the given MIME type.
    ///
    /// # Examples
    /// ```
    /// use registro::domain::ImageDataUri;
    ///
    /// let uri = ImageDataUri::encode("image/png", b"png");
    /// assert_eq!(uri.as_str(), "data:image/png;base64,cG5n");
    /// ```
    pub fn encode(mime: &str, bytes: &[u8]) -> Self {
        Self(format!("data:{mime};base64,{}", STANDARD.encode(bytes)))
    }

    /// Full URI text.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Payload with any `data:image/<subtype>;base64,` prefix removed.
    pub fn payload(&self) -> &str {
        match data_uri_prefix().find(&self.0) {
            Some(prefix) => &self.0[prefix.end()..],
            None => self.0.as_str(),
        }
    }

    /// Decode the payload into raw image bytes.
    pub fn decode(&self) -> Result<Vec<u8>, ImageDataError> {
        let payload = self.payload().trim();
        if payload.is_empty() {
            return Err(ImageDataError::Empty);
        }
        STANDARD
            .decode(payload)
            .map_err(|error| ImageDataError::Encoding {
                message: error.to_string(),
            })
    }
}

impl fmt::Debug for ImageDataUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let head: String = self.0.chars().take(32).collect();
        f.debug_tuple("ImageDataUri")
            .field(&format_args!("{head}… ({} chars)", self.0.len()))
            .finish()
    }
}

/// MIME type inferred from a file's extension.
pub fn mime_for_path(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        _ => "application/octet-stream",
    }
}

/// Whether `path` has one of the [`ACCEPTED_EXTENSIONS`].
pub fn has_accepted_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            ACCEPTED_EXTENSIONS
                .iter()
                .any(|accepted| ext.eq_ignore_ascii_case(accepted))
        })
}
