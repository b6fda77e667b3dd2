//! Capability-based filesystem helpers for hitchspot input and output files.
//!
//! Every helper resolves an ambient directory once and performs the actual
//! file operation relative to it through `cap-std`, so callers work with
//! `camino` UTF-8 paths and never touch `std::fs` directly.
#![forbid(unsafe_code)]

use std::io::{self, Write};
use std::path::Component;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8};

/// Open an existing file for reading.
///
/// # Errors
/// Propagates the I/O error when the file cannot be opened.
pub fn open_utf8_file(path: &Utf8Path) -> io::Result<fs_utf8::File> {
    fs_utf8::File::open_ambient(path, ambient_authority())
}

/// Create (or truncate) a file, creating missing parent directories first.
///
/// # Errors
/// Propagates I/O errors from directory creation or file creation.
pub fn create_utf8_file(path: &Utf8Path) -> io::Result<fs_utf8::File> {
    ensure_parent_dir(path)?;
    let (dir, name) = open_parent_dir(path)?;
    dir.create(name.as_str())
}

/// Replace the contents of `path` with `bytes`.
///
/// # Errors
/// Propagates I/O errors from [`create_utf8_file`] or the write itself.
pub fn write_utf8_file(path: &Utf8Path, bytes: &[u8]) -> io::Result<()> {
    let mut file = create_utf8_file(path)?;
    file.write_all(bytes)?;
    file.flush()
}

/// Open the directory containing `path` and return it with the file name.
///
/// # Errors
/// Fails when `path` has no file name or the parent cannot be opened.
pub fn open_parent_dir(path: &Utf8Path) -> io::Result<(fs_utf8::Dir, String)> {
    let file_name = path
        .file_name()
        .ok_or_else(|| io::Error::other(format!("{path} does not name a file")))?
        .to_owned();
    let parent = path
        .parent()
        .filter(|parent| !parent.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."));
    let dir = fs_utf8::Dir::open_ambient_dir(parent, ambient_authority())?;
    Ok((dir, file_name))
}

/// Create the parent directory of `path` if it does not exist yet.
///
/// # Errors
/// Propagates I/O errors from opening the base directory or creating the
/// missing components.
pub fn ensure_parent_dir(path: &Utf8Path) -> io::Result<()> {
    let Some(parent) = path.parent() else {
        return Ok(());
    };
    if parent.as_str().is_empty() {
        return Ok(());
    }
    let (base, relative) = split_base(parent)?;
    if relative.as_str().is_empty() {
        return Ok(());
    }
    base.create_dir_all(&relative)
}

/// Report whether `path` names an existing regular file.
///
/// Missing files report `false` rather than an error.
///
/// # Errors
/// Propagates I/O errors other than "not found".
pub fn is_regular_file(path: &Utf8Path) -> io::Result<bool> {
    let (dir, name) = match open_parent_dir(path) {
        Ok(found) => found,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(false),
        Err(err) => return Err(err),
    };
    match dir.metadata(name.as_str()) {
        Ok(meta) => Ok(meta.is_file()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(err) => Err(err),
    }
}

/// Split a directory path into an ambient base directory and the relative
/// remainder that `cap-std` may create beneath it.
fn split_base(parent: &Utf8Path) -> io::Result<(fs_utf8::Dir, Utf8PathBuf)> {
    let mut components = parent.as_std_path().components();
    let base = match components.next() {
        Some(Component::Prefix(prefix)) => {
            // Drive or UNC prefix, followed by the root separator.
            let prefix = prefix
                .as_os_str()
                .to_str()
                .ok_or_else(|| io::Error::other("non-UTF-8 path prefix"))?;
            if matches!(components.next(), Some(Component::RootDir)) {
                Utf8PathBuf::from(prefix).join(std::path::MAIN_SEPARATOR_STR)
            } else {
                Utf8PathBuf::from(prefix)
            }
        }
        Some(Component::RootDir) => Utf8PathBuf::from(std::path::MAIN_SEPARATOR_STR),
        _ => {
            let dir = fs_utf8::Dir::open_ambient_dir(".", ambient_authority())?;
            return Ok((dir, parent.to_path_buf()));
        }
    };
    let relative = Utf8PathBuf::from_path_buf(components.as_path().to_path_buf())
        .map_err(|_| io::Error::other("non-UTF-8 parent path"))?;
    let dir = fs_utf8::Dir::open_ambient_dir(&base, ambient_authority())?;
    Ok((dir, relative))
}
