//! Prepend release notes to the log file.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::NoteError;

/// Separator between a new note and the previous log content.
const NOTE_SEPARATOR: &str = "\n\n";

/// Prepend a note to the log at `path`, most recent first.
///
/// - Creates the file if it doesn't exist
/// - Keeps all existing content below the new note
/// - Writes through a temp file in the same directory, so a failed write
///   leaves the previous log intact
/// - Keeps the existing file's permissions, and writes through a symlink
///   to the file it points at
pub fn prepend_note(path: &Path, note: &str) -> Result<(), NoteError> {
    let target = resolve_target(path);
    let existing = read_existing(&target)?;
    let content = compose(note, &existing);

    let dir = target
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let mut tmp = NamedTempFile::new_in(dir).map_err(NoteError::WriteFailed)?;
    tmp.write_all(content.as_bytes())
        .map_err(NoteError::WriteFailed)?;
    tmp.flush().map_err(NoteError::WriteFailed)?;

    if let Ok(metadata) = fs::metadata(&target) {
        tmp.as_file()
            .set_permissions(metadata.permissions())
            .map_err(NoteError::WriteFailed)?;
    }

    tmp.persist(&target)
        .map_err(|e| NoteError::PersistFailed(e.error))?;

    debug!(path = %target.display(), bytes = content.len(), "Wrote release notes");
    Ok(())
}

/// The file a write to `path` should replace: the symlink target when
/// `path` is a link to an existing file, otherwise `path` itself.
fn resolve_target(path: &Path) -> PathBuf {
    match fs::symlink_metadata(path) {
        Ok(meta) if meta.file_type().is_symlink() => {
            fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
        }
        _ => path.to_path_buf(),
    }
}

/// Read the current log, treating a missing file as empty.
pub fn read_existing(path: &Path) -> Result<String, NoteError> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(content),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(String::new()),
        Err(e) => Err(NoteError::ReadFailed(e)),
    }
}

/// New note, separator, then the previous content.
fn compose(note: &str, existing: &str) -> String {
    let mut content = String::with_capacity(note.len() + NOTE_SEPARATOR.len() + existing.len());
    content.push_str(note);
    content.push_str(NOTE_SEPARATOR);
    content.push_str(existing);
    content
}
