//! Temporary directory helper
//!
//! RAII wrapper for a directory under the system temp dir that is removed
//! when dropped.

// IO errors are self-explanatory for these wrappers
#![allow(clippy::missing_errors_doc)]

use std::path::{Path, PathBuf};
use std::{fs, io};

/// Temporary directory that is automatically deleted when dropped
#[derive(Debug)]
pub struct TempDir {
    path: PathBuf,
}

impl TempDir {
    /// Create a new temporary directory with a prefix
    pub fn new(prefix: &str) -> io::Result<Self> {
        let dir_name = format!("{}-{}", prefix, uuid::Uuid::new_v4());
        let path = std::env::temp_dir().join(dir_name);

        fs::create_dir_all(&path)?;

        Ok(Self { path })
    }

    /// Path to the temporary directory
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path of `name` inside the directory, without creating it
    pub fn join(&self, name: &str) -> PathBuf {
        self.path.join(name)
    }

    /// Create a file in the temporary directory
    pub fn create_file(&self, name: &str, contents: &str) -> io::Result<PathBuf> {
        let file_path = self.path.join(name);
        fs::write(&file_path, contents)?;
        Ok(file_path)
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        if self.path.exists() {
            let _ = fs::remove_dir_all(&self.path);
        }
    }
}
