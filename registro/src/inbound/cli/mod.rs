//! Command-line front end.
//!
//! Every subcommand maps onto one service operation. The global `--json`
//! flag switches rendering from terse human lines to a machine-readable
//! `{ success, data }` document.

mod commands;
mod error;
mod output;
mod surface;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::CargoTipo;

pub use commands::run;
pub use error::CliError;
pub use output::{Line, Output};
pub use surface::TerminalUpdateSurface;

/// `registro` arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "registro",
    about = "Registro FSE member registry client",
    version
)]
pub struct Cli {
    /// Print results as JSON.
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Log in and keep the session token.
    Login {
        /// Login name.
        usuario: String,
        /// Password; read from standard input when omitted.
        #[arg(long)]
        password: Option<String>,
    },
    /// Close the session.
    Logout,
    /// Show the logged-in operator.
    Whoami {
        /// Keep verifying the session every minute until it ends.
        #[arg(long)]
        watch: bool,
    },
    /// Member records.
    #[command(subcommand)]
    Socios(SociosCommand),
    /// Positions.
    #[command(subcommand)]
    Cargos(CargosCommand),
    /// Provinces, regions, and self-identification categories.
    #[command(subcommand)]
    Referencias(ReferenciasCommand),
    /// User accounts (administrators only).
    #[command(subcommand)]
    Usuarios(UsuariosCommand),
    /// Member images.
    #[command(subcommand)]
    Imagenes(ImagenesCommand),
    /// Check for a mandatory update and install it.
    Update {
        /// Check once instead of every interval.
        #[arg(long)]
        once: bool,
    },
}

impl Command {
    /// Whether the command needs the stored session loaded first.
    pub fn restores_session(&self) -> bool {
        !matches!(self, Self::Login { .. } | Self::Imagenes(_) | Self::Update { .. })
    }
}

/// `socios` subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum SociosCommand {
    /// List members, ten per page.
    List {
        /// One-based page.
        #[arg(long, default_value_t = 1)]
        page: usize,
        /// Rows per page.
        #[arg(long, default_value_t = pagination::DEFAULT_PAGE_SIZE)]
        per_page: usize,
        /// Match on code, id number, or any name part.
        #[arg(long)]
        filter: Option<String>,
    },
    /// Show one member.
    Show {
        /// Member code.
        codunico: String,
    },
    /// Register a new member.
    New(SocioArgs),
    /// Edit a member; omitted fields keep their current value.
    Edit {
        /// Member code.
        codunico: String,
        #[command(flatten)]
        fields: SocioArgs,
    },
    /// Delete a member.
    Delete {
        /// Member code.
        codunico: String,
    },
}

/// Member form fields.
#[derive(Debug, Clone, Default, Args)]
pub struct SocioArgs {
    /// National id number.
    #[arg(long)]
    pub cedula: Option<String>,
    /// First given name.
    #[arg(long)]
    pub pnombre: Option<String>,
    /// Second given name.
    #[arg(long)]
    pub snombre: Option<String>,
    /// First family name.
    #[arg(long)]
    pub papellido: Option<String>,
    /// Second family name.
    #[arg(long)]
    pub sapellido: Option<String>,
    /// Primary phone.
    #[arg(long)]
    pub ptelefono: Option<String>,
    /// Secondary phone.
    #[arg(long)]
    pub stelefono: Option<String>,
    /// Contact email.
    #[arg(long)]
    pub email: Option<String>,
    /// Self-identification category id.
    #[arg(long)]
    pub autoidentificacion: Option<i64>,
    /// Position id.
    #[arg(long)]
    pub cargo: Option<i64>,
    /// Province id.
    #[arg(long)]
    pub provincia: Option<i64>,
    /// Region id.
    #[arg(long)]
    pub region: Option<i64>,
    /// Sector, required for regions above 2.
    #[arg(long)]
    pub sector: Option<String>,
    /// Photo file (jpg, jpeg, png, or gif).
    #[arg(long, value_name = "path")]
    pub foto: Option<PathBuf>,
    /// Signature file (jpg, jpeg, png, or gif).
    #[arg(long, value_name = "path")]
    pub firma: Option<PathBuf>,
}

/// `cargos` subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum CargosCommand {
    /// List positions.
    List,
    /// Add a position.
    Add {
        /// Position name.
        nombre: String,
        /// `miembro` or `dirigente`.
        #[arg(long, default_value_t = CargoTipo::Dirigente)]
        tipo: CargoTipo,
    },
    /// Rename or recategorise a position.
    Edit {
        /// Position id.
        id: i64,
        /// New name.
        nombre: String,
        /// `miembro` or `dirigente`.
        #[arg(long, default_value_t = CargoTipo::Dirigente)]
        tipo: CargoTipo,
    },
}

/// `referencias` subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum ReferenciasCommand {
    /// List provinces.
    Provincias,
    /// List regions.
    Regiones,
    /// List self-identification categories.
    Autoidentificaciones,
    /// Add a region.
    NuevaRegion {
        /// Region name.
        nombre: String,
    },
    /// Rename a region.
    EditarRegion {
        /// Region id.
        id: i64,
        /// New name.
        nombre: String,
    },
    /// Add a self-identification category.
    NuevaAutoidentificacion {
        /// Category name.
        nombre: String,
    },
    /// Rename a self-identification category.
    EditarAutoidentificacion {
        /// Category id.
        id: i64,
        /// New name.
        nombre: String,
    },
}

/// `usuarios` subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum UsuariosCommand {
    /// List users.
    List,
    /// Show one user.
    Show {
        /// User id.
        id: i64,
    },
    /// Create a user.
    Add(UsuarioArgs),
    /// Edit a user; omitted fields keep their current value.
    Edit {
        /// User id.
        id: i64,
        #[command(flatten)]
        fields: UsuarioArgs,
        /// Enable or disable the account.
        #[arg(long)]
        active: Option<bool>,
    },
    /// Delete a user.
    Delete {
        /// User id.
        id: i64,
    },
}

/// User form fields.
#[derive(Debug, Clone, Default, Args)]
pub struct UsuarioArgs {
    /// Login name.
    #[arg(long)]
    pub username: Option<String>,
    /// Contact email.
    #[arg(long)]
    pub email: Option<String>,
    /// Given name.
    #[arg(long)]
    pub firstname: Option<String>,
    /// Family name.
    #[arg(long)]
    pub lastname: Option<String>,
    /// Password; blank on edit keeps the current one.
    #[arg(long)]
    pub password: Option<String>,
    /// Role id.
    #[arg(long)]
    pub rol: Option<i64>,
}

/// `imagenes` subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum ImagenesCommand {
    /// Save a member's photo and signature under `FSEIMAGES`.
    Guardar {
        /// First given name.
        #[arg(long)]
        pnombre: String,
        /// First family name.
        #[arg(long)]
        papellido: String,
        /// National id number.
        #[arg(long)]
        cedula: String,
        /// Photo file.
        #[arg(long, value_name = "path")]
        foto: Option<PathBuf>,
        /// Signature file.
        #[arg(long, value_name = "path")]
        firma: Option<PathBuf>,
    },
}
