//! `login`, `logout`, and `whoami`.

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use zeroize::Zeroizing;

use crate::app::App;
use crate::domain::{SESSION_VERIFY_INTERVAL, SessionStatus};
use crate::inbound::cli::{CliError, Output};

pub(super) async fn login(
    app: &App,
    output: Output,
    usuario: &str,
    password: Option<String>,
) -> Result<(), CliError> {
    let password = match password {
        Some(password) => Zeroizing::new(password),
        None => read_password().await?,
    };
    let user = app.auth().login(usuario, &password).await?;
    output.record(&user);
    Ok(())
}

pub(super) async fn logout(app: &App, output: Output) -> Result<(), CliError> {
    app.auth().logout().await?;
    output.message("Sesión cerrada");
    Ok(())
}

pub(super) async fn whoami(app: &App, output: Output, watch: bool) -> Result<(), CliError> {
    let user = app.auth().whoami().await?;
    output.record(&user);
    if !watch {
        return Ok(());
    }

    info!(
        interval_secs = SESSION_VERIFY_INTERVAL.as_secs(),
        "watching the session"
    );
    match app.session().watch(SESSION_VERIFY_INTERVAL).await? {
        SessionStatus::Expired => output.message("La sesión ha expirado"),
        _ => output.message("Sesión cerrada"),
    }
    Ok(())
}

async fn read_password() -> Result<Zeroizing<String>, CliError> {
    eprint!("Contraseña: ");
    let mut line = Zeroizing::new(String::new());
    BufReader::new(tokio::io::stdin())
        .read_line(&mut line)
        .await?;
    Ok(Zeroizing::new(line.trim_end_matches(['\r', '\n']).to_owned()))
}
