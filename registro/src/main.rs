//! `registro` entry-point: loads settings, wires adapters, and runs one
//! command.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::ffi::OsString;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr, eyre};
use ortho_config::OrthoConfig;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

use registro::app::App;
use registro::config::RegistroSettings;
use registro::inbound::cli::{self, Cli, Output};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(error) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .try_init()
    {
        warn!(%error, "tracing init failed");
    }

    let cli = Cli::parse();
    let settings = RegistroSettings::load_from_iter([OsString::from("registro")])
        .map_err(|error| eyre!("load registro settings: {error}"))?;
    let app = App::from_settings(settings).wrap_err("build adapters")?;

    let output = Output::new(cli.json);
    if let Err(error) = cli::run(cli, &app).await {
        output.error(&error);
        std::process::exit(error.exit_code());
    }
    Ok(())
}
