//! File-backed local cache.
//!
//! Each key is stored as one file under the cache directory. File names are
//! the hex-encoded key, so any key string maps to a valid file name. Writes go
//! to a temporary file in the same directory which is then renamed over the
//! target, so a reader never observes a half-written value.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::cache::LocalCache;
use crate::error::StoreResult;

const ENTRY_EXT: &str = "entry";

/// A [`LocalCache`] persisting each key as a file.
#[derive(Debug)]
pub struct FileCache {
    dir: PathBuf,
}

impl FileCache {
    /// Open (or create) a cache rooted at `dir`.
    pub fn open(dir: impl AsRef<Path>) -> StoreResult<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        debug!(dir = %dir.display(), "file cache opened");
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.{ENTRY_EXT}", hex::encode(key.as_bytes())))
    }

    fn key_from_path(path: &Path) -> Option<String> {
        if path.extension()? != ENTRY_EXT {
            return None;
        }
        let stem = path.file_stem()?.to_str()?;
        let bytes = hex::decode(stem).ok()?;
        String::from_utf8(bytes).ok()
    }
}

impl LocalCache for FileCache {
    fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        match fs::read(self.path_for(key)) {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &[u8]) -> StoreResult<()> {
        let mut tmp = tempfile::NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(value)?;
        tmp.as_file().sync_all()?;
        tmp.persist(self.path_for(key)).map_err(|e| e.error)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> StoreResult<bool> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn keys(&self, prefix: &str) -> StoreResult<Vec<String>> {
        let mut keys = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            match Self::key_from_path(&path) {
                Some(key) if key.starts_with(prefix) => keys.push(key),
                Some(_) => {}
                None => {
                    // Leftover temp files from interrupted writes land here too.
                    if path.extension().is_some_and(|e| e == ENTRY_EXT) {
                        warn!(path = %path.display(), "skipping undecodable cache entry");
                    }
                }
            }
        }
        keys.sort();
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_cache() -> (tempfile::TempDir, FileCache) {
        let dir = tempfile::tempdir().unwrap();
        let cache = FileCache::open(dir.path().join("cache")).unwrap();
        (dir, cache)
    }

    #[test]
    fn set_then_get() {
        let (_dir, cache) = temp_cache();
        cache.set("registry/latest", b"{\"version\":\"1.0.0\"}").unwrap();
        assert_eq!(
            cache.get("registry/latest").unwrap(),
            Some(b"{\"version\":\"1.0.0\"}".to_vec())
        );
    }

    #[test]
    fn missing_key_is_none() {
        let (_dir, cache) = temp_cache();
        assert!(cache.get("freelancer/nobody").unwrap().is_none());
    }

    #[test]
    fn overwrite_replaces_value() {
        let (_dir, cache) = temp_cache();
        cache.set("k", b"first").unwrap();
        cache.set("k", b"second").unwrap();
        assert_eq!(cache.get("k").unwrap(), Some(b"second".to_vec()));
        assert_eq!(cache.keys("").unwrap(), vec!["k"]);
    }

    #[test]
    fn values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let cache = FileCache::open(dir.path()).unwrap();
            cache.set("proof/P1", b"doc").unwrap();
        }
        let reopened = FileCache::open(dir.path()).unwrap();
        assert_eq!(reopened.get("proof/P1").unwrap(), Some(b"doc".to_vec()));
    }

    #[test]
    fn keys_with_slashes_and_unicode() {
        let (_dir, cache) = temp_cache();
        cache.set("freelancer/0xÄbc/ü", b"1").unwrap();
        cache.set("proof/P1", b"2").unwrap();
        assert_eq!(cache.keys("freelancer/").unwrap(), vec!["freelancer/0xÄbc/ü"]);
    }

    #[test]
    fn remove_reports_presence() {
        let (_dir, cache) = temp_cache();
        cache.set("k", b"v").unwrap();
        assert!(cache.remove("k").unwrap());
        assert!(!cache.remove("k").unwrap());
        assert!(cache.get("k").unwrap().is_none());
    }

    #[test]
    fn foreign_files_are_ignored() {
        let (_dir, cache) = temp_cache();
        fs::write(cache.dir().join("README"), b"not an entry").unwrap();
        cache.set("a", b"1").unwrap();
        assert_eq!(cache.keys("").unwrap(), vec!["a"]);
    }
}
