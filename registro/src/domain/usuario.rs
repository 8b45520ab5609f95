//! Application users and the form that manages them.

use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use super::validation::{FieldErrors, is_valid_email};
use super::{Error, Rol};

/// Role id given to new users when none is chosen.
pub const DEFAULT_ROL_ID: i64 = 2;

/// Minimum password length on create.
pub const MIN_PASSWORD_LEN: usize = 6;

const INVALID_FORM_MESSAGE: &str = "Revise los datos del usuario";

/// Role attached to a user record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsuarioRol {
    /// Role id.
    pub id: i64,
    /// Role name.
    pub rol: Rol,
}

/// A user as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usuario {
    /// Database id.
    pub id: i64,
    /// Login name.
    pub username: String,
    /// Contact email.
    pub email: String,
    /// Given name.
    pub firstname: String,
    /// Family name.
    pub lastname: String,
    /// Role, when the API expands it.
    #[serde(default)]
    pub rol: Option<UsuarioRol>,
    /// Whether the user may log in.
    #[serde(default)]
    pub active: bool,
}

/// User form contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsuarioForm {
    /// Login name.
    pub username: String,
    /// Contact email.
    pub email: String,
    /// Given name.
    pub firstname: String,
    /// Family name.
    pub lastname: String,
    /// Password; blank on edit keeps the current one.
    pub password: Zeroizing<String>,
    /// Role id.
    pub rol_id: i64,
}

impl Default for UsuarioForm {
    fn default() -> Self {
        Self {
            username: String::new(),
            email: String::new(),
            firstname: String::new(),
            lastname: String::new(),
            password: Zeroizing::new(String::new()),
            rol_id: DEFAULT_ROL_ID,
        }
    }
}

impl UsuarioForm {
    fn common_errors(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        errors.require("username", &self.username, "El nombre de usuario es requerido");
        if self.email.trim().is_empty() {
            errors.push("email", "El correo es requerido");
        } else if !is_valid_email(&self.email) {
            errors.push("email", "Correo electrónico no válido");
        }
        errors.require("firstname", &self.firstname, "El nombre es requerido");
        errors.require("lastname", &self.lastname, "El apellido es requerido");
        errors
    }

    /// Check the form before creating a user.
    pub fn validate_for_create(&self) -> Result<(), Error> {
        let mut errors = self.common_errors();
        if self.password.trim().is_empty() {
            errors.push("password", "La contraseña es requerida");
        } else if self.password.chars().count() < MIN_PASSWORD_LEN {
            errors.push(
                "password",
                format!("La contraseña debe tener al menos {MIN_PASSWORD_LEN} caracteres"),
            );
        }
        errors.into_result(INVALID_FORM_MESSAGE)
    }

    /// Check the form before saving edits.
    pub fn validate_for_update(&self) -> Result<(), Error> {
        self.common_errors().into_result(INVALID_FORM_MESSAGE)
    }

    /// Body of `POST /usuarios`.
    pub fn into_new_usuario(self) -> NewUsuario {
        NewUsuario {
            username: self.username.trim().to_owned(),
            email: self.email.trim().to_owned(),
            firstname: self.firstname.trim().to_owned(),
            lastname: self.lastname.trim().to_owned(),
            password: self.password,
            rol_id: self.rol_id,
        }
    }

    /// Body of `PATCH /usuarios`; the password only when one was typed.
    pub fn into_usuario_update(self, id: i64, active: Option<bool>) -> UsuarioUpdate {
        let password = if self.password.trim().is_empty() {
            None
        } else {
            Some(self.password)
        };
        UsuarioUpdate {
            id,
            username: Some(self.username.trim().to_owned()),
            email: Some(self.email.trim().to_owned()),
            firstname: Some(self.firstname.trim().to_owned()),
            lastname: Some(self.lastname.trim().to_owned()),
            password,
            rol_id: Some(self.rol_id),
            active,
        }
    }
}

impl From<&Usuario> for UsuarioForm {
    fn from(usuario: &Usuario) -> Self {
        Self {
            username: usuario.username.clone(),
            email: usuario.email.clone(),
            firstname: usuario.firstname.clone(),
            lastname: usuario.lastname.clone(),
            password: Zeroizing::new(String::new()),
            rol_id: usuario.rol.as_ref().map_or(DEFAULT_ROL_ID, |rol| rol.id),
        }
    }
}

fn serialize_secret<S: serde::Serializer>(
    secret: &Zeroizing<String>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(secret.as_str())
}

fn serialize_optional_secret<S: serde::Serializer>(
    secret: &Option<Zeroizing<String>>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match secret {
        Some(value) => serializer.serialize_some(value.as_str()),
        None => serializer.serialize_none(),
    }
}

/// Body of `POST /usuarios`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUsuario {
    /// Login name.
    pub username: String,
    /// Contact email.
    pub email: String,
    /// Given name.
    pub firstname: String,
    /// Family name.
    pub lastname: String,
    /// Initial password.
    #[serde(serialize_with = "serialize_secret")]
    pub password: Zeroizing<String>,
    /// Role id.
    pub rol_id: i64,
}

/// Body of `PATCH /usuarios`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsuarioUpdate {
    /// User being updated.
    pub id: i64,
    /// Login name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Contact email.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Given name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub firstname: Option<String>,
    /// Family name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lastname: Option<String>,
    /// New password.
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_optional_secret"
    )]
    pub password: Option<Zeroizing<String>>,
    /// Role id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rol_id: Option<i64>,
    /// Active flag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}
