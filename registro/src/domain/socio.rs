//! Member ("socio") records and the forms that create and edit them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::validation::{FieldErrors, is_valid_cedula, is_valid_email, is_valid_phone};
use super::{Cargo, Error, ImageDataUri, ImageIdentity, ImageIdentityError, Provincia, Region};

/// Summary shown when a member form has missing or invalid fields.
pub const INCOMPLETE_FORM_MESSAGE: &str = "Complete todos los campos obligatorios";

/// Regions above this id require a `sector`.
pub const SECTOR_REQUIRED_ABOVE_REGION: i64 = 2;

/// A member as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Socio {
    /// Database id.
    #[serde(default)]
    pub id: i64,
    /// Unique member code assigned by the API.
    pub codunico: String,
    /// National id number.
    pub cedula: String,
    /// First given name.
    pub pnombre: String,
    /// Second given name.
    #[serde(default)]
    pub snombre: Option<String>,
    /// First family name.
    pub papellido: String,
    /// Second family name.
    #[serde(default)]
    pub sapellido: Option<String>,
    /// Primary phone.
    pub ptelefono: String,
    /// Secondary phone.
    #[serde(default)]
    pub stelefono: Option<String>,
    /// Contact email.
    #[serde(default)]
    pub email: Option<String>,
    /// Self-identification category id.
    #[serde(default)]
    pub autoidentificacionfk: Option<i64>,
    /// Position id.
    #[serde(default)]
    pub cargoid: Option<i64>,
    /// Province id.
    pub provinciaid: i64,
    /// Region id.
    #[serde(default)]
    pub regionid: Option<i64>,
    /// Sector, for regions that have them.
    #[serde(default)]
    pub sector: Option<String>,
    /// Photo path relative to the images root.
    pub rutafoto: String,
    /// Signature path relative to the images root.
    pub rutafirma: String,
    /// Whether the member card was printed since the last edit.
    #[serde(default)]
    pub impreso: bool,
    /// Id of the user who registered the member.
    pub registrado_porid: i64,
    /// Registration timestamp.
    #[serde(default)]
    pub fecha_registro: Option<DateTime<Utc>>,
    /// Workstation that registered the member.
    #[serde(default)]
    pub machine: Option<String>,
    /// Expanded position, when the API includes it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cargo: Option<Cargo>,
    /// Expanded province, when the API includes it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provincia: Option<Provincia>,
    /// Expanded region, when the API includes it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<Region>,
}

impl Socio {
    /// Full display name, given names first.
    pub fn full_name(&self) -> String {
        [
            Some(self.pnombre.as_str()),
            self.snombre.as_deref(),
            Some(self.papellido.as_str()),
            self.sapellido.as_deref(),
        ]
        .into_iter()
        .flatten()
        .filter(|part| !part.trim().is_empty())
        .collect::<Vec<_>>()
        .join(" ")
    }

    /// Case-insensitive match on the code, id number, or any name part.
    ///
    /// A blank filter matches every member.
    pub fn matches(&self, filter: &str) -> bool {
        let needle = filter.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        [
            Some(self.codunico.as_str()),
            Some(self.cedula.as_str()),
            Some(self.pnombre.as_str()),
            self.snombre.as_deref(),
            Some(self.papellido.as_str()),
            self.sapellido.as_deref(),
        ]
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(&needle))
    }
}

/// Member form contents as typed by the operator.
///
/// Blank strings stand for "not provided" and id `0` for "nothing
/// selected", matching how the form's inputs and selects start out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SocioDraft {
    /// National id number.
    pub cedula: String,
    /// First given name.
    pub pnombre: String,
    /// Second given name.
    pub snombre: String,
    /// First family name.
    pub papellido: String,
    /// Second family name.
    pub sapellido: String,
    /// Primary phone.
    pub ptelefono: String,
    /// Secondary phone.
    pub stelefono: String,
    /// Contact email.
    pub email: String,
    /// Self-identification category id.
    pub autoidentificacionfk: i64,
    /// Position id.
    pub cargoid: i64,
    /// Province id.
    pub provinciaid: i64,
    /// Region id.
    pub regionid: i64,
    /// Sector.
    pub sector: String,
    /// Selected photo.
    pub foto: Option<ImageDataUri>,
    /// Selected signature.
    pub firma: Option<ImageDataUri>,
}

impl SocioDraft {
    /// Trim every text field and upper-case names and sector.
    pub fn normalized(mut self) -> Self {
        for field in [
            &mut self.pnombre,
            &mut self.snombre,
            &mut self.papellido,
            &mut self.sapellido,
            &mut self.sector,
        ] {
            *field = field.trim().to_uppercase();
        }
        for field in [
            &mut self.cedula,
            &mut self.ptelefono,
            &mut self.stelefono,
            &mut self.email,
        ] {
            *field = field.trim().to_owned();
        }
        self
    }

    /// Whether the selected region requires a sector.
    pub fn requires_sector(&self) -> bool {
        self.regionid > SECTOR_REQUIRED_ABOVE_REGION
    }

    fn common_errors(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        errors.require("pnombre", &self.pnombre, "El primer nombre es requerido");
        errors.require("papellido", &self.papellido, "El primer apellido es requerido");
        errors.require("cedula", &self.cedula, "La cédula es requerida");
        errors.require("ptelefono", &self.ptelefono, "El teléfono principal es requerido");
        errors.require_id("cargoid", self.cargoid, "Seleccione un cargo");
        errors.require_id("provinciaid", self.provinciaid, "Seleccione una provincia");
        errors.require_id("regionid", self.regionid, "Seleccione una región");

        if !self.cedula.trim().is_empty() && !is_valid_cedula(self.cedula.trim()) {
            errors.push("cedula", "La cédula debe tener hasta 10 dígitos");
        }
        if !self.ptelefono.trim().is_empty() && !is_valid_phone(&self.ptelefono) {
            errors.push("ptelefono", "Número de teléfono inválido");
        }
        if !self.stelefono.trim().is_empty() && !is_valid_phone(&self.stelefono) {
            errors.push("stelefono", "Número de teléfono inválido");
        }
        if !self.email.trim().is_empty() && !is_valid_email(self.email.trim()) {
            errors.push("email", "Correo electrónico inválido");
        }
        if self.requires_sector() {
            errors.require("sector", &self.sector, "El sector es requerido para esta región");
        }
        errors
    }

    /// Check the form before registering a new member.
    pub fn validate_for_create(&self) -> Result<(), Error> {
        let mut errors = self.common_errors();
        errors.require_id(
            "autoidentificacionfk",
            self.autoidentificacionfk,
            "Seleccione una autoidentificación",
        );
        if self.foto.is_none() {
            errors.push("foto", "Seleccione una foto");
        }
        if self.firma.is_none() {
            errors.push("firma", "Seleccione una firma");
        }
        errors.into_result(INCOMPLETE_FORM_MESSAGE)
    }

    /// Check the form before saving edits; images are optional here.
    pub fn validate_for_update(&self) -> Result<(), Error> {
        self.common_errors().into_result(INCOMPLETE_FORM_MESSAGE)
    }

    /// Identity that names this member's image folder.
    pub fn image_identity(&self) -> Result<ImageIdentity, ImageIdentityError> {
        ImageIdentity::new(&self.pnombre, &self.papellido, &self.cedula)
    }

    /// Create request body.
    pub fn into_new_socio(
        self,
        rutafoto: String,
        rutafirma: String,
        registrado_porid: i64,
    ) -> NewSocio {
        let requires_sector = self.requires_sector();
        NewSocio {
            cedula: self.cedula,
            pnombre: self.pnombre,
            snombre: non_blank(self.snombre),
            papellido: self.papellido,
            sapellido: non_blank(self.sapellido),
            ptelefono: self.ptelefono,
            stelefono: non_blank(self.stelefono),
            email: non_blank(self.email),
            autoidentificacionfk: self.autoidentificacionfk,
            cargoid: self.cargoid,
            provinciaid: self.provinciaid,
            regionid: self.regionid,
            sector: if requires_sector {
                non_blank(self.sector)
            } else {
                None
            },
            rutafoto,
            rutafirma,
            registrado_porid,
        }
    }

    /// Update request body for `codunico`; image paths only when replaced.
    pub fn into_socio_update(
        self,
        codunico: String,
        rutafoto: Option<String>,
        rutafirma: Option<String>,
        registrado_porid: i64,
    ) -> SocioUpdate {
        let requires_sector = self.requires_sector();
        SocioUpdate {
            codunico,
            cedula: Some(self.cedula),
            pnombre: Some(self.pnombre),
            snombre: non_blank(self.snombre),
            papellido: Some(self.papellido),
            sapellido: non_blank(self.sapellido),
            ptelefono: Some(self.ptelefono),
            stelefono: non_blank(self.stelefono),
            email: non_blank(self.email),
            autoidentificacionfk: (self.autoidentificacionfk != 0)
                .then_some(self.autoidentificacionfk),
            cargoid: Some(self.cargoid),
            provinciaid: Some(self.provinciaid),
            regionid: Some(self.regionid),
            sector: if requires_sector {
                non_blank(self.sector)
            } else {
                None
            },
            rutafoto,
            rutafirma,
            registrado_porid: Some(registrado_porid),
            impreso: Some(false),
        }
    }
}

impl From<&Socio> for SocioDraft {
    fn from(socio: &Socio) -> Self {
        Self {
            cedula: socio.cedula.clone(),
            pnombre: socio.pnombre.clone(),
            snombre: socio.snombre.clone().unwrap_or_default(),
            papellido: socio.papellido.clone(),
            sapellido: socio.sapellido.clone().unwrap_or_default(),
            ptelefono: socio.ptelefono.clone(),
            stelefono: socio.stelefono.clone().unwrap_or_default(),
            email: socio.email.clone().unwrap_or_default(),
            autoidentificacionfk: socio.autoidentificacionfk.unwrap_or_default(),
            cargoid: socio.cargoid.unwrap_or_default(),
            provinciaid: socio.provinciaid,
            regionid: socio.regionid.unwrap_or_default(),
            sector: socio.sector.clone().unwrap_or_default(),
            foto: None,
            firma: None,
        }
    }
}

fn non_blank(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

/// Body of `POST /socios`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSocio {
    /// National id number.
    pub cedula: String,
    /// First given name.
    pub pnombre: String,
    /// Second given name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snombre: Option<String>,
    /// First family name.
    pub papellido: String,
    /// Second family name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sapellido: Option<String>,
    /// Primary phone.
    pub ptelefono: String,
    /// Secondary phone.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stelefono: Option<String>,
    /// Contact email.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Self-identification category id.
    pub autoidentificacionfk: i64,
    /// Position id.
    pub cargoid: i64,
    /// Province id.
    pub provinciaid: i64,
    /// Region id.
    pub regionid: i64,
    /// Sector.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sector: Option<String>,
    /// Photo path.
    pub rutafoto: String,
    /// Signature path.
    pub rutafirma: String,
    /// Registering user.
    pub registrado_porid: i64,
}

/// Body of `PATCH /socios/{codunico}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SocioUpdate {
    /// Member being updated.
    pub codunico: String,
    /// National id number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cedula: Option<String>,
    /// First given name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pnombre: Option<String>,
    /// Second given name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snombre: Option<String>,
    /// First family name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub papellido: Option<String>,
    /// Second family name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sapellido: Option<String>,
    /// Primary phone.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ptelefono: Option<String>,
    /// Secondary phone.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stelefono: Option<String>,
    /// Contact email.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Self-identification category id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub autoidentificacionfk: Option<i64>,
    /// Position id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cargoid: Option<i64>,
    /// Province id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provinciaid: Option<i64>,
    /// Region id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub regionid: Option<i64>,
    /// Sector.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sector: Option<String>,
    /// Replacement photo path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rutafoto: Option<String>,
    /// Replacement signature path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rutafirma: Option<String>,
    /// User saving the edit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registrado_porid: Option<i64>,
    /// Printed flag; edits always reset it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub impreso: Option<bool>,
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::{fixture, rstest};
    use serde_json::json;

    #[fixture]
    fn draft() -> SocioDraft {
        SocioDraft {
            cedula: "0102030405".into(),
            pnombre: " juan ".into(),
            papellido: "perez".into(),
            ptelefono: "0987654321".into(),
            autoidentificacionfk: 1,
            cargoid: 2,
            provinciaid: 3,
            regionid: 1,
            foto: Some(ImageDataUri::new("data:image/png;base64,aGk=")),
            firma: Some(ImageDataUri::new("data:image/png;base64,aGk=")),
            ..SocioDraft::default()
        }
    }

    fn failing_fields(err: &Error) -> Vec<String> {
        err.details()
            .and_then(|details| details.get("fields"))
            .and_then(|fields| fields.as_array())
            .map(|fields| {
                fields
                    .iter()
                    .filter_map(|field| field.get("field"))
                    .filter_map(|field| field.as_str())
                    .map(str::to_owned)
                    .collect()
            })
            .unwrap_or_default()
    }

    #[rstest]
    fn complete_draft_passes(draft: SocioDraft) {
        draft.normalized().validate_for_create().expect("valid draft");
    }

    #[rstest]
    #[case::ptelefono(|d: &mut SocioDraft| d.ptelefono.clear(), "ptelefono")]
    #[case::cedula(|d: &mut SocioDraft| d.cedula = "12345678901".into(), "cedula")]
    #[case::cargo(|d: &mut SocioDraft| d.cargoid = 0, "cargoid")]
    #[case::autoidentificacion(|d: &mut SocioDraft| d.autoidentificacionfk = 0, "autoidentificacionfk")]
    #[case::foto(|d: &mut SocioDraft| d.foto = None, "foto")]
    #[case::email(|d: &mut SocioDraft| d.email = "no-es-correo".into(), "email")]
    #[case::sector(|d: &mut SocioDraft| d.regionid = 3, "sector")]
    fn create_reports_each_missing_field(
        draft: SocioDraft,
        #[case] breaks: fn(&mut SocioDraft),
        #[case] field: &str,
    ) {
        let mut draft = draft;
        breaks(&mut draft);
        let err = draft.validate_for_create().expect_err("invalid draft");
        assert_eq!(err.message(), INCOMPLETE_FORM_MESSAGE);
        assert!(failing_fields(&err).iter().any(|name| name == field), "{field}");
    }

    #[rstest]
    fn update_tolerates_missing_images(draft: SocioDraft) {
        let draft = SocioDraft {
            foto: None,
            firma: None,
            autoidentificacionfk: 0,
            ..draft
        };
        draft.validate_for_update().expect("images are optional on edit");
    }

    #[rstest]
    fn new_socio_uses_api_field_names(draft: SocioDraft) {
        let body = draft
            .normalized()
            .into_new_socio("FSEIMAGES/a".into(), "FSEIMAGES/b".into(), 7);
        let value = serde_json::to_value(&body).expect("serialise body");
        assert_eq!(value["pnombre"], json!("JUAN"));
        assert_eq!(value["registradoPorid"], json!(7));
        assert!(value.get("sector").is_none(), "sector only for regions > 2");
        assert!(value.get("snombre").is_none());
    }

    #[rstest]
    fn update_resets_printed_flag(draft: SocioDraft) {
        let body = draft.into_socio_update("FSE-1".into(), None, None, 7);
        let value = serde_json::to_value(&body).expect("serialise body");
        assert_eq!(value["impreso"], json!(false));
        assert!(value.get("rutafoto").is_none());
    }

    #[rstest]
    #[case("", true)]
    #[case("juan", true)]
    #[case("FSE-0001", true)]
    #[case("0102", true)]
    #[case("maria", false)]
    fn filters_by_code_id_or_name(#[case] filter: &str, #[case] expected: bool) {
        let socio: Socio = serde_json::from_value(json!({
            "codunico": "FSE-0001",
            "cedula": "0102030405",
            "pnombre": "JUAN",
            "papellido": "PEREZ",
            "ptelefono": "0987654321",
            "provinciaid": 1,
            "rutafoto": "",
            "rutafirma": "",
            "registradoPorid": 1,
            "fechaRegistro": "2025-01-02T03:04:05Z",
        }))
        .expect("decode socio");
        assert_eq!(socio.matches(filter), expected);
        assert_eq!(socio.full_name(), "JUAN PEREZ");
    }
}
