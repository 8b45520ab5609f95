//! Positions ("cargos") members can hold.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::Error;

/// Words a position name may not contain, compared case-insensitively.
///
/// These name administrative levels rather than roles, and the registry
/// models levels separately through regions and provinces.
pub const FORBIDDEN_WORDS: [&str; 7] = [
    "NACIONAL",
    "PROVINCIA",
    "PROVINCIAL",
    "CANTON",
    "CANTONAL",
    "COMUNIDAD",
    "COMUNA",
];

/// Category of a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CargoTipo {
    /// Rank-and-file member. Older records use the label `Socio`.
    #[serde(alias = "Socio")]
    Miembro,
    /// Leadership role.
    #[default]
    Dirigente,
}

impl CargoTipo {
    /// Wire label.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Miembro => "Miembro",
            Self::Dirigente => "Dirigente",
        }
    }
}

impl fmt::Display for CargoTipo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CargoTipo {
    type Err = Error;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_lowercase().as_str() {
            "miembro" | "socio" => Ok(Self::Miembro),
            "dirigente" => Ok(Self::Dirigente),
            other => Err(Error::invalid_request(format!(
                "Tipo de cargo desconocido: {other}"
            ))),
        }
    }
}

/// A position as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cargo {
    /// Database id.
    pub id: i64,
    /// Position name.
    pub cargo: String,
    /// Category.
    pub tipo: CargoTipo,
}

/// Body of `POST /cargos` and `PATCH /cargos/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewCargo {
    /// Position name, upper-cased.
    pub cargo: String,
    /// Category.
    pub tipo: CargoTipo,
}

impl NewCargo {
    /// Normalise the name to upper case.
    pub fn new(cargo: &str, tipo: CargoTipo) -> Self {
        Self {
            cargo: cargo.trim().to_uppercase(),
            tipo,
        }
    }

    /// First forbidden word contained in the name, if any.
    pub fn forbidden_word(&self) -> Option<&'static str> {
        let upper = self.cargo.to_uppercase();
        FORBIDDEN_WORDS
            .into_iter()
            .find(|word| upper.contains(word))
    }

    /// Whether `existing` already holds a position with the same trimmed,
    /// upper-cased name and the same category.
    ///
    /// # Examples
    /// ```
    /// use registro::domain::{Cargo, CargoTipo, NewCargo};
    ///
    /// let existing = [Cargo { id: 1, cargo: "Tesorero ".into(), tipo: CargoTipo::Dirigente }];
    /// assert!(NewCargo::new("tesorero", CargoTipo::Dirigente).is_duplicate(&existing));
    /// assert!(!NewCargo::new("tesorero", CargoTipo::Miembro).is_duplicate(&existing));
    /// ```
    pub fn is_duplicate(&self, existing: &[Cargo]) -> bool {
        let name = self.cargo.trim().to_uppercase();
        existing
            .iter()
            .any(|cargo| cargo.cargo.trim().to_uppercase() == name && cargo.tipo == self.tipo)
    }

    /// Check the name against the required, forbidden-word, and duplicate
    /// rules.
    pub fn validate(&self, existing: &[Cargo]) -> Result<(), Error> {
        if self.cargo.trim().is_empty() {
            return Err(Error::invalid_request("El nombre del cargo es requerido"));
        }
        if let Some(word) = self.forbidden_word() {
            return Err(Error::invalid_request(format!(
                "No puede ingresar el término \"{word}\""
            )));
        }
        if self.is_duplicate(existing) {
            return Err(Error::invalid_request(format!(
                "El cargo \"{}\" con tipo \"{}\" ya existe",
                self.cargo, self.tipo
            )));
        }
        Ok(())
    }
}
