//! Reading and rewriting files.

use std::borrow::Cow;
use std::io::Write;
use std::path::{Path, PathBuf};

/// A per-file failure. Each carries the path it concerns.
#[derive(Debug, thiserror::Error)]
pub enum FileError {
    #[error("failed to read '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("'{path}' is not valid UTF-8 text")]
    NotUtf8 { path: PathBuf },
    #[error("failed to write '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl FileError {
    pub fn path(&self) -> &Path {
        match self {
            FileError::Read { path, .. }
            | FileError::NotUtf8 { path }
            | FileError::Write { path, .. } => path,
        }
    }
}

/// Read a file as UTF-8 text.
pub fn read_source(path: &Path) -> Result<String, FileError> {
    let bytes = std::fs::read(path).map_err(|source| FileError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let text = simdutf8::basic::from_utf8(&bytes).map_err(|_| FileError::NotUtf8 {
        path: path.to_path_buf(),
    })?;
    Ok(text.to_owned())
}

/// Replace a file's contents without ever leaving it half-written.
///
/// The text goes to a temporary file in the same directory, which is then
/// renamed over the target. The target's permissions are preserved.
pub fn write_atomically(path: &Path, contents: &str) -> Result<(), FileError> {
    let write_err = |source| FileError::Write {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut temp = tempfile::NamedTempFile::new_in(dir).map_err(write_err)?;
    temp.write_all(contents.as_bytes()).map_err(write_err)?;
    temp.as_file().sync_all().map_err(write_err)?;

    if let Ok(metadata) = std::fs::metadata(path) {
        std::fs::set_permissions(temp.path(), metadata.permissions()).map_err(write_err)?;
    }
    temp.persist(path).map_err(|err| write_err(err.error))?;
    Ok(())
}

/// Remove every emoji from a file. Returns whether the file changed.
pub fn remove_emojis_from_file(path: &Path) -> Result<bool, FileError> {
    let text = read_source(path)?;
    let cleaned = match eraser_emoji::remove_emojis(&text) {
        Cow::Borrowed(_) => return Ok(false),
        Cow::Owned(cleaned) => cleaned,
    };
    write_atomically(path, &cleaned)?;
    tracing::debug!(path = %path.display(), "removed emojis");
    Ok(true)
}
