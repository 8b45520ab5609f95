//! Rendering of command results.

use std::fmt::Write as _;

use pagination::Page;
use serde::Serialize;
use serde_json::{Value, json};

use super::CliError;
use crate::domain::{Autoidentificacion, Cargo, Provincia, Region, Socio, UserInfo, Usuario};

/// One line of human output for a record.
pub trait Line {
    /// Render the record on a single line.
    fn line(&self) -> String;
}

impl Line for Socio {
    fn line(&self) -> String {
        let printed = if self.impreso { " [impreso]" } else { "" };
        format!(
            "{}  {}  {}  {}{printed}",
            self.codunico,
            self.cedula,
            self.full_name(),
            self.ptelefono
        )
    }
}

impl Line for Cargo {
    fn line(&self) -> String {
        format!("{:>4}  {}  ({})", self.id, self.cargo, self.tipo)
    }
}

impl Line for Provincia {
    fn line(&self) -> String {
        format!("{:>4}  {}", self.id, self.provincia)
    }
}

impl Line for Region {
    fn line(&self) -> String {
        format!("{:>4}  {}", self.id, self.region)
    }
}

impl Line for Autoidentificacion {
    fn line(&self) -> String {
        format!("{:>4}  {}", self.id, self.nombre)
    }
}

impl Line for Usuario {
    fn line(&self) -> String {
        let rol = self
            .rol
            .as_ref()
            .map_or_else(|| "-".to_owned(), |rol| rol.rol.to_string());
        let state = if self.active { "activo" } else { "inactivo" };
        format!(
            "{:>4}  {}  {} {}  <{}>  {rol}  {state}",
            self.id, self.username, self.firstname, self.lastname, self.email
        )
    }
}

impl Line for UserInfo {
    fn line(&self) -> String {
        format!(
            "{} {} ({}, {})",
            self.first_name, self.last_name, self.user_name, self.rol
        )
    }
}

/// Writes results to standard output as text or JSON.
#[derive(Debug, Clone, Copy)]
pub struct Output {
    json: bool,
}

impl Output {
    /// Human output unless `json` is set.
    pub fn new(json: bool) -> Self {
        Self { json }
    }

    /// Render a single record.
    pub fn record<T: Serialize + Line>(&self, record: &T) {
        if self.json {
            print_json(&success(record));
        } else {
            println!("{}", record.line());
        }
    }

    /// Render a list of records.
    pub fn records<T: Serialize + Line>(&self, records: &[T], empty: &str) {
        if self.json {
            print_json(&success(records));
            return;
        }
        if records.is_empty() {
            println!("{empty}");
        }
        for record in records {
            println!("{}", record.line());
        }
    }

    /// Render one page of records followed by the page position.
    pub fn page<T: Serialize + Line>(&self, page: &Page<T>, empty: &str) {
        if self.json {
            print_json(&success(page));
            return;
        }
        self.records(page.items(), empty);
        if page.total_pages() > 0 {
            println!(
                "Página {} de {} ({} registros)",
                page.page(),
                page.total_pages(),
                page.total_items()
            );
        }
    }

    /// Render a confirmation message.
    pub fn message(&self, message: &str) {
        if self.json {
            print_json(&json!({ "success": true, "message": message }));
        } else {
            println!("{message}");
        }
    }

    /// Render a failure on standard error, or as JSON on standard output.
    pub fn error(&self, error: &CliError) {
        if self.json {
            print_json(&json!({
                "success": false,
                "error": {
                    "message": error.to_string(),
                    "details": error.details(),
                }
            }));
        } else {
            eprint!("{}", error_text(error));
        }
    }
}

fn success<T: Serialize + ?Sized>(data: &T) -> Value {
    json!({ "success": true, "data": data })
}

fn print_json(value: &Value) {
    match serde_json::to_string_pretty(value) {
        Ok(rendered) => println!("{rendered}"),
        Err(error) => eprintln!("no se pudo generar JSON: {error}"),
    }
}

/// Human text for `error`, one line per invalid field.
pub(super) fn error_text(error: &CliError) -> String {
    let mut text = format!("Error: {error}\n");
    let fields = error
        .details()
        .and_then(|details| details.get("fields"))
        .and_then(Value::as_array);
    for field in fields.into_iter().flatten() {
        let name = field.get("field").and_then(Value::as_str).unwrap_or("?");
        let message = field.get("message").and_then(Value::as_str).unwrap_or("");
        let _ = writeln!(text, "  - {name}: {message}");
    }
    text
}
