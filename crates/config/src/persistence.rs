//! File system persistence for level files
//!
//! Writes go through a temporary file in the target directory followed by
//! an atomic rename, so a crash never leaves a half-written level file.
//! Missing directories are created on demand.

use crate::level_file::LevelFile;
use crate::{ConfigError, ConfigResult};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Reads and writes one level file
pub struct LevelFilePersistence {
    path: PathBuf,
}

impl LevelFilePersistence {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Loads the file, normalizing lines of known parameters
    pub fn load(&self, is_known: impl Fn(&str) -> bool) -> ConfigResult<LevelFile> {
        LevelFile::read(&self.path, is_known)
    }

    /// Saves the file atomically
    pub fn save(&self, file: &LevelFile) -> ConfigResult<()> {
        let dir = self
            .path
            .parent()
            .ok_or_else(|| ConfigError::PathResolutionError {
                reason: format!("{} has no parent directory", self.path.display()),
            })?;
        ensure_directory_exists(dir)?;

        let temp_file = NamedTempFile::new_in(dir).map_err(ConfigError::IoError)?;
        self.write_atomic(temp_file, &file.render())?;

        log::debug!("Wrote {}", self.path.display());
        Ok(())
    }

    /// Writes content to a temporary file and atomically renames it
    fn write_atomic(&self, mut temp_file: NamedTempFile, content: &str) -> ConfigResult<()> {
        temp_file
            .write_all(content.as_bytes())
            .map_err(ConfigError::IoError)?;
        temp_file.flush().map_err(ConfigError::IoError)?;
        temp_file
            .persist(&self.path)
            .map_err(|e| ConfigError::WriteError {
                path: self.path.clone(),
                source: e.error,
            })?;
        Ok(())
    }
}

/// Ensures a directory exists, creating it if necessary
pub(crate) fn ensure_directory_exists(path: &Path) -> ConfigResult<()> {
    if !path.exists() {
        fs::create_dir_all(path).map_err(|e| ConfigError::DirectoryCreationError {
            path: path.to_path_buf(),
            source: e,
        })?;
        log::info!("Created config directory: {}", path.display());
    }
    Ok(())
}
