//! Field-level validation shared by the member, user, and login forms.
//!
//! Forms collect every failing field before reporting, so the operator sees
//! all problems at once instead of fixing them one submission at a time.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;
use serde_json::json;

use super::Error;

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();
static CEDULA_RE: OnceLock<Regex> = OnceLock::new();
static INTERNATIONAL_PHONE_RE: OnceLock<Regex> = OnceLock::new();
static LOCAL_PHONE_RE: OnceLock<Regex> = OnceLock::new();

fn compile(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| {
        Regex::new(pattern).unwrap_or_else(|error| panic!("regex {pattern} failed to compile: {error}"))
    })
}

/// Whether `value` looks like an email address (`^\S+@\S+\.\S+$`).
///
/// # Examples
/// ```
/// use registro::domain::validation::is_valid_email;
///
/// assert!(is_valid_email("socio@fse.ec"));
/// assert!(!is_valid_email("socio@fse"));
/// ```
pub fn is_valid_email(value: &str) -> bool {
    compile(&EMAIL_RE, r"^\S+@\S+\.\S+$").is_match(value)
}

/// Whether `value` is a national id number of one to ten digits.
pub fn is_valid_cedula(value: &str) -> bool {
    compile(&CEDULA_RE, r"^\d{1,10}$").is_match(value)
}

/// Whether `value` is a dialable phone number.
///
/// Accepts E.164 numbers (`+593987654321`) and Ecuadorian national numbers
/// with a trunk prefix (`0987654321`, `022345678`). Spaces, dashes, and
/// parentheses are ignored.
pub fn is_valid_phone(value: &str) -> bool {
    let compact: String = value
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '(' | ')'))
        .collect();
    compile(&INTERNATIONAL_PHONE_RE, r"^\+[1-9]\d{7,14}$").is_match(&compact)
        || compile(&LOCAL_PHONE_RE, r"^0\d{8,9}$").is_match(&compact)
}

/// One failing form field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Wire name of the field.
    pub field: &'static str,
    /// Message shown next to the field.
    pub message: String,
}

/// Accumulator for form validation failures.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    /// Start with no failures.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failure for `field`.
    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push(FieldError {
            field,
            message: message.into(),
        });
    }

    /// Record a failure when `value` is blank once trimmed.
    pub fn require(&mut self, field: &'static str, value: &str, message: &str) {
        if value.trim().is_empty() {
            self.push(field, message);
        }
    }

    /// Record a failure when a select was left on its placeholder (id 0).
    pub fn require_id(&mut self, field: &'static str, value: i64, message: &str) {
        if value == 0 {
            self.push(field, message);
        }
    }

    /// Whether `field` has at least one failure.
    pub fn contains(&self, field: &str) -> bool {
        self.0.iter().any(|error| error.field == field)
    }

    /// Whether no failures were recorded.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Recorded failures in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    /// `Ok(())` when empty, otherwise an invalid-request error carrying
    /// every failure as details.
    pub fn into_result(self, summary: &str) -> Result<(), Error> {
        if self.0.is_empty() {
            return Ok(());
        }
        Err(Error::invalid_request(summary).with_details(json!({ "fields": self.0 })))
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for error in &self.0 {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", error.field, error.message)?;
            first = false;
        }
        Ok(())
    }
}
