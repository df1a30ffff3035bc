//! Keyfile backend for hosts without a usable credential store.
//!
//! Each scope gets one file of raw key bytes inside a per-user directory.
//! Account scoping comes from file ownership and `0600` permissions, so the
//! directory must live under the user's home (the CLI defaults to the XDG
//! data directory).

use std::fs::{self, File, OpenOptions};
use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use zeroize::Zeroizing;

use super::KeyStore;
use crate::error::{Result, SecretBoxError};
use crate::seal::{MasterKey, Scope};

/// Distinguishes temp files written by threads of one process.
static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Key store that keeps one file per scope under `dir`.
#[derive(Debug, Clone)]
pub struct KeyfileStore {
    dir: PathBuf,
}

impl KeyfileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File holding the key for `scope`.
    ///
    /// Named by a short BLAKE3 digest so account names never need escaping.
    pub fn path_for(&self, scope: &Scope) -> PathBuf {
        let slot = format!("{}/{}", scope.service(), scope.account());
        let hash = blake3::hash(slot.as_bytes());
        self.dir.join(format!("{}.key", &hash.to_hex()[..16]))
    }

    fn temp_path_for(&self, path: &Path) -> PathBuf {
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let seq = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
        self.dir
            .join(format!(".{}.{}.{}.tmp", name, std::process::id(), seq))
    }
}

impl KeyStore for KeyfileStore {
    fn load(&self, scope: &Scope) -> Result<Option<MasterKey>> {
        let path = self.path_for(scope);
        let bytes = match fs::read(&path) {
            Ok(bytes) => Zeroizing::new(bytes),
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(SecretBoxError::KeyStore(format!(
                    "Failed to read keyfile {}: {}",
                    path.display(),
                    e
                )))
            }
        };
        MasterKey::from_slice(&bytes).map(Some)
    }

    /// The key is written in full to an owner-only temp file, then
    /// hard-linked to its final name. Linking fails if the name is taken,
    /// so concurrent first writers cannot replace each other and readers
    /// never see a partial file.
    fn store(&self, scope: &Scope, key: &MasterKey) -> Result<()> {
        let path = self.path_for(scope);
        fs::create_dir_all(&self.dir).map_err(|e| {
            SecretBoxError::KeyStore(format!(
                "Failed to create keyfile directory {}: {}",
                self.dir.display(),
                e
            ))
        })?;

        let temp_path = self.temp_path_for(&path);
        let written = create_private(&temp_path).and_then(|mut file| {
            file.write_all(key.as_bytes())?;
            file.sync_all()
        });
        if let Err(e) = written {
            let _ = fs::remove_file(&temp_path);
            return Err(SecretBoxError::KeyStore(format!(
                "Failed to write keyfile {}: {}",
                path.display(),
                e
            )));
        }

        let linked = fs::hard_link(&temp_path, &path);
        let _ = fs::remove_file(&temp_path);
        match linked {
            Ok(()) => {
                tracing::debug!(path = %path.display(), "wrote keyfile");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                Err(SecretBoxError::KeyExists(path.display().to_string()))
            }
            Err(e) => Err(SecretBoxError::KeyStore(format!(
                "Failed to write keyfile {}: {}",
                path.display(),
                e
            ))),
        }
    }
}

/// Create a new file readable only by its owner.
fn create_private(path: &Path) -> io::Result<File> {
    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    options.open(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_keyfile_is_none() {
        let dir = tempdir().unwrap();
        let store = KeyfileStore::new(dir.path());
        assert!(store.load(&Scope::new("s", "a")).unwrap().is_none());
    }

    #[test]
    fn test_store_creates_directory_and_reloads() {
        let dir = tempdir().unwrap();
        let store = KeyfileStore::new(dir.path().join("nested").join("keys"));
        let scope = Scope::new("s", "a");
        let key = MasterKey::generate().unwrap();

        store.store(&scope, &key).unwrap();

        let reopened = KeyfileStore::new(store.dir());
        assert_eq!(reopened.load(&scope).unwrap(), Some(key));
    }

    #[test]
    fn test_scopes_get_distinct_files() {
        let store = KeyfileStore::new("/tmp/unused");
        let a = store.path_for(&Scope::new("s", "alice"));
        let b = store.path_for(&Scope::new("s", "bob"));
        let c = store.path_for(&Scope::new("t", "alice"));
        assert_ne!(a, b);
        assert_ne!(a, c);
        assert_eq!(a, store.path_for(&Scope::new("s", "alice")));
    }

    #[test]
    fn test_refuses_to_overwrite() {
        let dir = tempdir().unwrap();
        let store = KeyfileStore::new(dir.path());
        let scope = Scope::new("s", "a");
        store.store(&scope, &MasterKey::generate().unwrap()).unwrap();

        let err = store
            .store(&scope, &MasterKey::generate().unwrap())
            .unwrap_err();
        assert!(matches!(err, SecretBoxError::KeyExists(_)));
    }

    #[test]
    fn test_concurrent_first_writes_keep_one_key() {
        use std::sync::Barrier;
        use std::thread;

        for _ in 0..100 {
            let dir = tempdir().unwrap();
            let store = KeyfileStore::new(dir.path().join("keys"));
            let scope = Scope::new("s", "a");
            let barrier = Barrier::new(2);

            let outcomes: Vec<(MasterKey, Result<()>)> = thread::scope(|s| {
                let handles: Vec<_> = (0..2)
                    .map(|_| {
                        s.spawn(|| {
                            let key = MasterKey::generate().unwrap();
                            barrier.wait();
                            let outcome = store.store(&scope, &key);
                            (key, outcome)
                        })
                    })
                    .collect();
                handles.into_iter().map(|h| h.join().unwrap()).collect()
            });

            let winners: Vec<&MasterKey> = outcomes
                .iter()
                .filter(|(_, outcome)| outcome.is_ok())
                .map(|(key, _)| key)
                .collect();
            assert_eq!(winners.len(), 1);
            assert!(outcomes
                .iter()
                .any(|(_, outcome)| matches!(outcome, Err(SecretBoxError::KeyExists(_)))));
            assert_eq!(store.load(&scope).unwrap().as_ref(), Some(winners[0]));

            // Temp files are cleaned up on both paths.
            assert_eq!(fs::read_dir(store.dir()).unwrap().count(), 1);
        }
    }

    #[test]
    fn test_truncated_keyfile_rejected() {
        let dir = tempdir().unwrap();
        let store = KeyfileStore::new(dir.path());
        let scope = Scope::new("s", "a");
        std::fs::write(store.path_for(&scope), b"short").unwrap();
        assert!(store.load(&scope).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_keyfile_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let store = KeyfileStore::new(dir.path());
        let scope = Scope::new("s", "a");
        store.store(&scope, &MasterKey::generate().unwrap()).unwrap();

        let mode = std::fs::metadata(store.path_for(&scope))
            .unwrap()
            .permissions()
            .mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
