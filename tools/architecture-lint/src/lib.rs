//! Repo-local lint keeping the `registro` crate hexagonal.
//!
//! `registro/src` is split into `domain` (entities, services, and ports),
//! `inbound` (the command line), and `outbound` (REST, filesystem, update
//! feed, and process adapters). Wiring lives outside those three layers in
//! `app.rs` and `main.rs`, which this lint does not inspect.
//!
//! Rules:
//! - `domain` must not reach `inbound` or `outbound`, nor any HTTP,
//!   filesystem, CLI, or configuration crate.
//! - `inbound` must not reach `outbound`, nor talk HTTP or the filesystem
//!   itself.
//! - `outbound` must not reach `inbound`, nor the CLI or configuration
//!   crates.

use std::collections::BTreeSet;
use std::fmt;
use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs::Dir;
use syn::visit::Visit;

/// Name under which integration code refers to the linted crate.
const CRATE_NAME: &str = "registro";

/// Layers a source file can belong to, by top-level directory.
const LAYER_DIRS: [&str; 3] = ["domain", "inbound", "outbound"];

/// One boundary crossing found by the lint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// File path relative to `registro/src`.
    pub file: Utf8PathBuf,
    /// Which rule was broken.
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.file, self.message)
    }
}

/// Why a lint run did not pass.
#[derive(Debug)]
pub enum ArchitectureLintError {
    /// Walking or reading the source tree failed.
    Io(io::Error),
    /// A file was not valid Rust or sat outside every layer.
    Parse { file: Utf8PathBuf, message: String },
    /// The sources cross layer boundaries.
    Violations(Vec<Violation>),
}

impl fmt::Display for ArchitectureLintError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "could not read registro sources: {err}"),
            Self::Parse { file, message } => write!(f, "could not lint {file}: {message}"),
            Self::Violations(violations) => {
                writeln!(f, "registro layer boundaries crossed:")?;
                for violation in violations {
                    writeln!(f, "- {violation}")?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ArchitectureLintError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for ArchitectureLintError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

/// A Rust file to lint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintSource {
    /// Path relative to `registro/src`, starting with the layer directory.
    pub file: Utf8PathBuf,
    /// File contents.
    pub contents: String,
}

impl LintSource {
    /// Source at `file` with `contents`.
    pub fn new(file: impl Into<Utf8PathBuf>, contents: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            contents: contents.into(),
        }
    }
}

/// Lint the layer directories under `crate_dir/src`.
///
/// `crate_dir` is the `registro/` directory at the repository root. Missing
/// layer directories are skipped.
pub fn lint_crate_sources(crate_dir: &Utf8Path) -> Result<(), ArchitectureLintError> {
    let src = Dir::open_ambient_dir(crate_dir.join("src"), ambient_authority())?;
    let mut sources = Vec::new();
    for layer in LAYER_DIRS {
        if !src.is_dir(layer) {
            continue;
        }
        let dir = src.open_dir(layer)?;
        collect_sources(&dir, Utf8Path::new(layer), &mut sources)?;
    }
    lint_sources(&sources)
}

/// Lint in-memory sources.
pub fn lint_sources(sources: &[LintSource]) -> Result<(), ArchitectureLintError> {
    let mut violations = Vec::new();
    for source in sources {
        let layer = Layer::of(&source.file).ok_or_else(|| ArchitectureLintError::Parse {
            file: source.file.clone(),
            message: "file is not under domain/, inbound/, or outbound/".to_owned(),
        })?;
        let parsed =
            syn::parse_file(&source.contents).map_err(|err| ArchitectureLintError::Parse {
                file: source.file.clone(),
                message: err.to_string(),
            })?;
        violations.extend(check_file(&source.file, layer, &parsed));
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(ArchitectureLintError::Violations(violations))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Layer {
    Domain,
    Inbound,
    Outbound,
}

impl Layer {
    fn of(file: &Utf8Path) -> Option<Self> {
        match file.components().next()?.as_str() {
            "domain" => Some(Self::Domain),
            "inbound" => Some(Self::Inbound),
            "outbound" => Some(Self::Outbound),
            _ => None,
        }
    }

    const fn name(self) -> &'static str {
        match self {
            Self::Domain => "domain",
            Self::Inbound => "inbound",
            Self::Outbound => "outbound",
        }
    }

    fn forbidden_layers(self) -> &'static [&'static str] {
        match self {
            Self::Domain => &["inbound", "outbound", "app"],
            Self::Inbound => &["outbound"],
            Self::Outbound => &["inbound", "app"],
        }
    }

    fn forbidden_crates(self) -> &'static [&'static str] {
        match self {
            Self::Domain => &[
                "reqwest",
                "cap_std",
                "dirs",
                "clap",
                "ortho_config",
                "color_eyre",
                "tracing_subscriber",
                "sha2",
            ],
            Self::Inbound => &["reqwest", "cap_std", "sha2"],
            Self::Outbound => &["clap", "ortho_config", "color_eyre", "tracing_subscriber"],
        }
    }
}

fn check_file(file: &Utf8Path, layer: Layer, parsed: &syn::File) -> Vec<Violation> {
    let mut collector = PathCollector::default();
    collector.visit_file(parsed);

    let mut messages = BTreeSet::new();
    for segments in &collector.paths {
        let internal =
            internal_root(segments).filter(|root| layer.forbidden_layers().contains(root));
        if let Some(root) = internal {
            messages.insert(format!("{} must not depend on crate::{root}", layer.name()));
        }
        let external =
            external_root(segments).filter(|root| layer.forbidden_crates().contains(root));
        if let Some(root) = external {
            messages.insert(format!(
                "{} must not depend on external crate `{root}`",
                layer.name()
            ));
        }
    }

    messages
        .into_iter()
        .map(|message| Violation {
            file: file.to_path_buf(),
            message,
        })
        .collect()
}

fn is_relative(segment: &str) -> bool {
    matches!(segment, "crate" | "self" | "super")
}

/// First module under the crate root named by `segments`, if they point
/// inside `registro`.
fn internal_root(segments: &[String]) -> Option<&str> {
    let first = segments.first()?.as_str();
    if LAYER_DIRS.contains(&first) {
        return Some(first);
    }
    let start = if is_relative(first) {
        segments.iter().position(|segment| !is_relative(segment))?
    } else if first == CRATE_NAME {
        1
    } else {
        return None;
    };
    segments.get(start).map(String::as_str)
}

fn external_root(segments: &[String]) -> Option<&str> {
    let root = segments.first()?.as_str();
    if is_relative(root) || root == CRATE_NAME {
        None
    } else {
        Some(root)
    }
}

#[derive(Default)]
struct PathCollector {
    paths: BTreeSet<Vec<String>>,
}

impl PathCollector {
    fn record_use_tree(&mut self, tree: &syn::UseTree, mut prefix: Vec<String>) {
        match tree {
            syn::UseTree::Path(path) => {
                prefix.push(path.ident.to_string());
                self.record_use_tree(&path.tree, prefix);
            }
            syn::UseTree::Name(name) => {
                prefix.push(name.ident.to_string());
                self.paths.insert(prefix);
            }
            syn::UseTree::Rename(rename) => {
                prefix.push(rename.ident.to_string());
                self.paths.insert(prefix);
            }
            syn::UseTree::Glob(_) => {
                prefix.push("*".to_owned());
                self.paths.insert(prefix);
            }
            syn::UseTree::Group(group) => {
                for item in &group.items {
                    self.record_use_tree(item, prefix.clone());
                }
            }
        }
    }
}

impl<'ast> Visit<'ast> for PathCollector {
    fn visit_path(&mut self, node: &'ast syn::Path) {
        let segments: Vec<String> = node
            .segments
            .iter()
            .map(|segment| segment.ident.to_string())
            .collect();
        if !segments.is_empty() {
            self.paths.insert(segments);
        }
        syn::visit::visit_path(self, node);
    }

    fn visit_item_use(&mut self, node: &'ast syn::ItemUse) {
        self.record_use_tree(&node.tree, Vec::new());
    }
}

fn collect_sources(
    dir: &Dir,
    relative: &Utf8Path,
    sources: &mut Vec<LintSource>,
) -> Result<(), ArchitectureLintError> {
    for entry in dir.entries()? {
        let entry = entry?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        let path = relative.join(name);
        if entry.file_type()?.is_dir() {
            let child = entry.open_dir()?;
            collect_sources(&child, &path, sources)?;
            continue;
        }
        if path.extension() != Some("rs") {
            continue;
        }
        let contents = dir.read_to_string(name)?;
        sources.push(LintSource::new(path, contents));
    }
    Ok(())
}
