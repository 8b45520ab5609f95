//! `cargo run -p architecture-lint`: check `registro/src` layer boundaries.

use std::io::{self, Write};
use std::process::ExitCode;

use camino::{Utf8Path, Utf8PathBuf};

fn main() -> ExitCode {
    let Some(root) = workspace_root() else {
        let _ = writeln!(
            io::stderr().lock(),
            "no workspace Cargo.toml found above the current directory"
        );
        return ExitCode::FAILURE;
    };
    match architecture_lint::lint_crate_sources(&root.join("registro")) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let _ = writeln!(io::stderr().lock(), "{err}");
            ExitCode::FAILURE
        }
    }
}

fn workspace_root() -> Option<Utf8PathBuf> {
    let candidates = [
        std::env::var("CARGO_WORKSPACE_DIR").ok().map(Utf8PathBuf::from),
        std::env::current_dir()
            .ok()
            .and_then(|dir| Utf8PathBuf::from_path_buf(dir).ok()),
        Some(Utf8PathBuf::from(env!("CARGO_MANIFEST_DIR"))),
    ];
    candidates
        .into_iter()
        .flatten()
        .find_map(|start| find_workspace_root(&start))
}

fn find_workspace_root(start: &Utf8Path) -> Option<Utf8PathBuf> {
    start
        .ancestors()
        .find(|dir| declares_workspace(dir))
        .map(Utf8Path::to_path_buf)
}

fn declares_workspace(dir: &Utf8Path) -> bool {
    cap_std::fs::Dir::open_ambient_dir(dir, cap_std::ambient_authority())
        .and_then(|dir| dir.read_to_string("Cargo.toml"))
        .is_ok_and(|manifest| manifest.contains("[workspace]"))
}
