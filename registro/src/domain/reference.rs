//! Read-mostly lookup tables used by member form selects.

use serde::{Deserialize, Serialize};

use super::Error;

/// A province.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provincia {
    /// Database id.
    pub id: i64,
    /// Province name.
    pub provincia: String,
}

/// A region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    /// Database id.
    pub id: i64,
    /// Region name.
    pub region: String,
}

/// A self-identification category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Autoidentificacion {
    /// Database id.
    pub id: i64,
    /// Category name.
    pub nombre: String,
}

/// Body of `POST /regiones`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewRegion {
    /// Region name.
    pub region: String,
}

/// Body of `PATCH /regiones`; the id travels in the body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegionUpdate {
    /// Region being updated.
    pub id: i64,
    /// New name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
}

/// Body of `POST /autoidentificacion`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewAutoidentificacion {
    /// Category name.
    pub nombre: String,
}

/// Body of `PATCH /autoidentificacion`; the id travels in the body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AutoidentificacionUpdate {
    /// Category being updated.
    pub id: i64,
    /// New name.
    pub nombre: String,
}

/// Trim and upper-case a lookup name, rejecting blanks.
pub fn normalize_name(raw: &str, label: &str) -> Result<String, Error> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(Error::invalid_request(format!("El nombre de {label} es requerido")));
    }
    Ok(trimmed.to_uppercase())
}
