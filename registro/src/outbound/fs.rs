//! Capability-scoped filesystem helpers shared by the adapters.

use std::ffi::OsString;
use std::io;
use std::path::Path;

use cap_std::{ambient_authority, fs::Dir};

/// Split `path` into its parent directory and final component.
pub(crate) fn parent_and_file_name(path: &Path) -> io::Result<(&Path, OsString)> {
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    let parent = if parent.as_os_str().is_empty() {
        Path::new(".")
    } else {
        parent
    };
    let file_name = path.file_name().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "path must include a file or directory name",
        )
    })?;
    Ok((parent, file_name.to_os_string()))
}

/// Open `path`, creating it and its ancestors first.
pub(crate) fn open_or_create_dir(path: &Path) -> io::Result<Dir> {
    Dir::create_ambient_dir_all(path, ambient_authority())?;
    Dir::open_ambient_dir(path, ambient_authority())
}

/// Read the whole file at `path`.
pub(crate) fn read_file(path: &Path) -> io::Result<Vec<u8>> {
    let (parent, file_name) = parent_and_file_name(path)?;
    let directory = Dir::open_ambient_dir(parent, ambient_authority())?;
    directory.read(Path::new(&file_name))
}
