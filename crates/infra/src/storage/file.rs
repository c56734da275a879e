//! JSON-file key-value store
//!
//! Each key lives in `<dir>/<key>.json`. Writes go to a temporary sibling
//! file that is then renamed over the target, so readers never observe a
//! half-written value.
//!
//! Updates are serialised within the process. Separate processes sharing the
//! directory are last-writer-wins.

use std::fs;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;
use vitalscope_core::{KeyValueStore, UpdateFn};
use vitalscope_domain::{Result, VitalScopeError};

use crate::errors::InfraError;

#[derive(Debug)]
pub struct FileKeyValueStore {
    dir: PathBuf,
    write_lock: Mutex<()>,
}

impl FileKeyValueStore {
    /// Use `dir` as the store root, creating it when missing
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(io_error)?;
        debug!(dir = %dir.display(), "file key-value store opened");
        Ok(Self { dir, write_lock: Mutex::new(()) })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn key_path(&self, key: &str) -> Result<PathBuf> {
        validate_key(key)?;
        Ok(self.dir.join(format!("{key}.json")))
    }

    async fn blocking<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce() -> Result<T> + Send + 'static,
    {
        tokio::task::spawn_blocking(f)
            .await
            .map_err(|e| VitalScopeError::from(InfraError::from(e)))?
    }
}

#[async_trait]
impl KeyValueStore for FileKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.key_path(key)?;
        self.blocking(move || read_value(&path)).await
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        let path = self.key_path(key)?;
        let _guard = self.write_lock.lock().await;
        self.blocking(move || write_value(&path, &value)).await
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let path = self.key_path(key)?;
        let _guard = self.write_lock.lock().await;
        self.blocking(move || match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_error(e)),
        })
        .await
    }

    async fn update(&self, key: &str, mutator: UpdateFn) -> Result<()> {
        let path = self.key_path(key)?;
        let _guard = self.write_lock.lock().await;
        self.blocking(move || {
            let current = read_value(&path)?;
            let next = mutator(current)?;
            write_value(&path, &next)
        })
        .await
    }
}

/// Keys become file names, so only a conservative character set is allowed
fn validate_key(key: &str) -> Result<()> {
    let valid = !key.is_empty()
        && !key.starts_with('.')
        && key.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));

    if valid {
        Ok(())
    } else {
        Err(VitalScopeError::InvalidInput(format!("invalid storage key: {key:?}")))
    }
}

fn read_value(path: &Path) -> Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(io_error(e)),
    }
}

fn write_value(path: &Path, value: &str) -> Result<()> {
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, value).map_err(io_error)?;
    fs::rename(&tmp, path).map_err(io_error)
}

fn io_error(err: std::io::Error) -> VitalScopeError {
    VitalScopeError::from(InfraError::from(err))
}
