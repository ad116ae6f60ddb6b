//! Snapshots of the engine's state
//!
//! A [`BackupSnapshot`] is a deep copy of every parameter and every level's
//! lines. The engine keeps one in memory around transient overlays such as
//! the per-game ITEM level. Snapshots can also be archived as timestamped
//! TOML files and restored later, with rotation of old archives.

use crate::level_file::LevelFile;
use crate::manager::ConfigManager;
use crate::parameter::Parameter;
use crate::paths::FrontendPaths;
use crate::persistence::{ensure_directory_exists, LevelFilePersistence};
use crate::{ConfigError, ConfigResult};
use marquee_core::Level;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Lines and source file of one level inside a snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotLevel {
    pub level: Level,
    pub source: Option<PathBuf>,
    pub lines: Vec<String>,
}

/// Deep copy of parameters and level files
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupSnapshot {
    pub taken_at: String,
    pub params: Vec<Parameter>,
    pub levels: Vec<SnapshotLevel>,
}

impl BackupSnapshot {
    pub fn params(&self) -> &[Parameter] {
        &self.params
    }

    pub fn level(&self, level: Level) -> Option<&SnapshotLevel> {
        self.levels.iter().find(|l| l.level == level)
    }

    fn into_parts(
        self,
    ) -> (
        Vec<Parameter>,
        [LevelFile; Level::COUNT],
        [Option<PathBuf>; Level::COUNT],
    ) {
        let mut files: [LevelFile; Level::COUNT] = Default::default();
        let mut sources: [Option<PathBuf>; Level::COUNT] = Default::default();
        for entry in self.levels {
            files[entry.level.index()] = LevelFile::from_lines(entry.lines);
            sources[entry.level.index()] = entry.source;
        }
        (self.params, files, sources)
    }
}

impl ConfigManager {
    /// Copies the current state
    pub fn snapshot(&self) -> BackupSnapshot {
        BackupSnapshot {
            taken_at: chrono::Local::now().to_rfc3339(),
            params: self.parameters().to_vec(),
            levels: Level::ALL
                .iter()
                .map(|&level| SnapshotLevel {
                    level,
                    source: self.sources[level.index()].clone(),
                    lines: self.level_files[level.index()].lines().to_vec(),
                })
                .collect(),
        }
    }

    /// Replaces the current state with a snapshot and re-derives values
    pub fn restore_snapshot(&mut self, snapshot: BackupSnapshot) {
        let (params, files, sources) = snapshot.into_parts();
        self.replace_state(params, files, sources);
        self.fix_missing_params();
    }

    /// Keeps a copy of the current state for [`restore_back_up_state`]
    ///
    /// [`restore_back_up_state`]: Self::restore_back_up_state
    pub fn back_up_state(&mut self) {
        self.backup = Some(self.snapshot());
        log::debug!("Configuration state backed up");
    }

    pub fn has_backup(&self) -> bool {
        self.backup.is_some()
    }

    /// Returns to the state of the last [`back_up_state`]
    ///
    /// The backup is kept, so the same state can be restored again.
    ///
    /// [`back_up_state`]: Self::back_up_state
    pub fn restore_back_up_state(&mut self) -> ConfigResult<()> {
        let snapshot = self.backup.clone().ok_or(ConfigError::NoBackup)?;
        self.restore_snapshot(snapshot);
        log::debug!("Configuration state restored from backup");
        Ok(())
    }

    /// Writes every level's lines back to the file they came from
    ///
    /// Returns the number of files written.
    pub fn flush_level_files(&self) -> ConfigResult<usize> {
        let mut written = 0;
        for level in Level::ALL {
            if let Some(path) = &self.sources[level.index()] {
                LevelFilePersistence::new(path.clone()).save(&self.level_files[level.index()])?;
                written += 1;
            }
        }
        log::info!("Wrote {} level file(s)", written);
        Ok(written)
    }
}

/// Timestamped snapshot files in one directory
pub struct SnapshotArchive {
    dir: PathBuf,
    max_snapshots: usize,
}

impl SnapshotArchive {
    /// Snapshots are stored in the specified directory
    pub fn new(dir: PathBuf) -> Self {
        Self {
            dir,
            max_snapshots: 10,
        }
    }

    /// The archive of a front-end root
    pub fn for_paths(paths: &FrontendPaths) -> Self {
        Self::new(paths.snapshots_dir())
    }

    /// Sets the maximum number of snapshots to keep
    pub fn with_max_snapshots(mut self, max: usize) -> Self {
        self.max_snapshots = max;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Archives a snapshot, returning the new file's path
    pub fn save(&self, snapshot: &BackupSnapshot) -> ConfigResult<PathBuf> {
        ensure_directory_exists(&self.dir)?;

        let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S_%6f");
        let mut path = self.dir.join(format!("snapshot_{}.toml", timestamp));
        let mut suffix = 1;
        while path.exists() {
            path = self
                .dir
                .join(format!("snapshot_{}_{}.toml", timestamp, suffix));
            suffix += 1;
        }

        let toml_string = toml::to_string_pretty(snapshot)?;
        fs::write(&path, toml_string).map_err(|e| ConfigError::WriteError {
            path: path.clone(),
            source: e,
        })?;

        log::info!("Archived configuration snapshot at {}", path.display());

        self.rotate()?;

        Ok(path)
    }

    /// Reads an archived snapshot
    pub fn load(&self, path: &Path) -> ConfigResult<BackupSnapshot> {
        if !path.exists() {
            return Err(ConfigError::PathResolutionError {
                reason: format!("Snapshot file not found: {}", path.display()),
            });
        }

        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let snapshot = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })?;

        log::info!("Read configuration snapshot {}", path.display());

        Ok(snapshot)
    }

    /// Lists archived snapshots, newest first
    pub fn list(&self) -> ConfigResult<Vec<SnapshotInfo>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }

        let mut snapshots = Vec::new();

        for entry in fs::read_dir(&self.dir).map_err(ConfigError::IoError)? {
            let path = entry.map_err(ConfigError::IoError)?.path();

            if path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("toml") {
                if let Some(filename) = path.file_name().and_then(|s| s.to_str()) {
                    if filename.starts_with("snapshot_") {
                        let metadata = fs::metadata(&path).map_err(ConfigError::IoError)?;
                        let created = metadata
                            .created()
                            .or_else(|_| metadata.modified())
                            .map_err(ConfigError::IoError)?;

                        snapshots.push(SnapshotInfo {
                            filename: filename.to_string(),
                            path,
                            created,
                            size_bytes: metadata.len(),
                        });
                    }
                }
            }
        }

        // file names embed the timestamp
        snapshots.sort_by(|a, b| b.filename.cmp(&a.filename));

        Ok(snapshots)
    }

    /// Deletes one archived snapshot
    pub fn delete(&self, path: &Path) -> ConfigResult<()> {
        if !path.starts_with(&self.dir) {
            return Err(ConfigError::PathResolutionError {
                reason: "Snapshot path is not in the snapshot directory".to_string(),
            });
        }

        fs::remove_file(path).map_err(|e| ConfigError::WriteError {
            path: path.to_path_buf(),
            source: e,
        })?;

        log::info!("Deleted snapshot at {}", path.display());

        Ok(())
    }

    /// Deletes every archived snapshot
    pub fn delete_all(&self) -> ConfigResult<usize> {
        let snapshots = self.list()?;
        let count = snapshots.len();

        for snapshot in snapshots {
            self.delete(&snapshot.path)?;
        }

        log::info!("Deleted {} snapshot(s)", count);

        Ok(count)
    }

    /// Keeps only the most recent snapshots
    fn rotate(&self) -> ConfigResult<()> {
        let snapshots = self.list()?;

        if snapshots.len() > self.max_snapshots {
            let stale = &snapshots[self.max_snapshots..];
            for snapshot in stale {
                self.delete(&snapshot.path)?;
            }

            log::info!("Rotated snapshots, deleted {} old snapshot(s)", stale.len());
        }

        Ok(())
    }
}

/// Information about an archived snapshot
#[derive(Debug, Clone)]
pub struct SnapshotInfo {
    /// Full path to the snapshot file
    pub path: PathBuf,
    pub filename: String,
    pub created: std::time::SystemTime,
    pub size_bytes: u64,
}

impl SnapshotInfo {
    /// Returns a human-readable timestamp
    pub fn created_timestamp(&self) -> String {
        use std::time::UNIX_EPOCH;

        self.created
            .duration_since(UNIX_EPOCH)
            .ok()
            .and_then(|d| {
                chrono::DateTime::from_timestamp(d.as_secs() as i64, 0)
                    .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
            })
            .unwrap_or_else(|| "Unknown".to_string())
    }

    /// Returns file size in a human-readable format
    pub fn size_human(&self) -> String {
        let bytes = self.size_bytes as f64;
        if bytes < 1024.0 {
            format!("{} B", bytes)
        } else if bytes < 1024.0 * 1024.0 {
            format!("{:.1} KB", bytes / 1024.0)
        } else {
            format!("{:.1} MB", bytes / (1024.0 * 1024.0))
        }
    }
}
