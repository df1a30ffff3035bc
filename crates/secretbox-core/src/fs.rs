//! Filesystem utilities for reading inputs and writing outputs atomically.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::{Result, SecretBoxError};

const UTF8_BOM: char = '\u{feff}';

/// Read a whole file as text, dropping a leading UTF-8 byte-order mark.
///
/// Returns `Ok(None)` when the bytes are not UTF-8 so each caller can map
/// that to its own error.
pub fn read_text(path: &Path) -> Result<Option<String>> {
    let bytes = fs::read(path).map_err(|e| {
        SecretBoxError::Io(format!("Failed to read {}: {}", path.display(), e))
    })?;
    Ok(String::from_utf8(bytes).ok().map(|text| match text.strip_prefix(UTF8_BOM) {
        Some(stripped) => stripped.to_string(),
        None => text,
    }))
}

/// Replace `path` with `data` via a temporary sibling file.
///
/// Readers see either the old contents or the new ones, never a partial
/// write. The temp file is removed on failure.
pub fn write_atomic(path: &Path, data: &[u8]) -> Result<()> {
    let filename = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| {
            SecretBoxError::Io(format!("Invalid output filename: {}", path.display()))
        })?;
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| SecretBoxError::Io(format!("System time error: {}", e)))?
        .as_nanos();
    let temp_name = format!(".{}.{}.tmp", filename, nanos);
    let temp_path = match path.parent() {
        Some(parent) => parent.join(temp_name),
        None => temp_name.into(),
    };

    let written = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&temp_path)
        .and_then(|mut file| {
            file.write_all(data)?;
            file.sync_all()
        });
    if let Err(e) = written {
        let _ = fs::remove_file(&temp_path);
        return Err(SecretBoxError::Io(format!(
            "Failed to write {}: {}",
            path.display(),
            e
        )));
    }

    rename_with_fallback(&temp_path, path).map_err(|e| {
        SecretBoxError::Io(format!("Failed to write {}: {}", path.display(), e))
    })
}

/// Rename a file, with fallback for platforms where rename fails if target exists.
///
/// On some platforms (notably Windows), `fs::rename` fails if the destination
/// already exists. The destination is removed and the rename retried. If the
/// rename ultimately fails, the temp file is cleaned up.
pub fn rename_with_fallback(temp_path: &Path, destination: &Path) -> io::Result<()> {
    if let Err(initial_err) = fs::rename(temp_path, destination) {
        let _ = fs::remove_file(destination);
        fs::rename(temp_path, destination).map_err(|retry_err| {
            let _ = fs::remove_file(temp_path);
            io::Error::new(
                retry_err.kind(),
                format!(
                    "Atomic rename failed (initial: {}, retry: {})",
                    initial_err, retry_err
                ),
            )
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::tempdir;

    #[test]
    fn test_rename_overwrites_existing() {
        let dir = tempdir().unwrap();
        let temp = dir.path().join("temp.txt");
        let dest = dir.path().join("dest.txt");

        File::create(&dest).unwrap().write_all(b"old").unwrap();
        File::create(&temp).unwrap().write_all(b"new").unwrap();

        rename_with_fallback(&temp, &dest).unwrap();

        assert!(!temp.exists());
        assert_eq!(fs::read_to_string(&dest).unwrap(), "new");
    }

    #[test]
    fn test_write_atomic_creates_and_replaces() {
        let dir = tempdir().unwrap();
        let dest = dir.path().join("out.json");

        write_atomic(&dest, b"first").unwrap();
        assert_eq!(fs::read(&dest).unwrap(), b"first");

        write_atomic(&dest, b"second").unwrap();
        assert_eq!(fs::read(&dest).unwrap(), b"second");

        // No temp files left behind
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_write_atomic_into_missing_directory_fails_cleanly() {
        let dir = tempdir().unwrap();
        let dest = dir.path().join("missing").join("out.json");

        let err = write_atomic(&dest, b"data").unwrap_err();
        assert!(matches!(err, SecretBoxError::Io(_)));
        assert!(!dest.exists());
    }

    #[test]
    fn test_read_text_strips_bom() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("in.json");
        fs::write(&path, "\u{feff}{\"a\":1}").unwrap();

        assert_eq!(read_text(&path).unwrap().unwrap(), "{\"a\":1}");
    }

    #[test]
    fn test_read_text_non_utf8_is_none() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("in.bin");
        fs::write(&path, [0xFF, 0xFE, 0x00]).unwrap();

        assert!(read_text(&path).unwrap().is_none());
    }
}
