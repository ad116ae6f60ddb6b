//! On-disk layout of a front-end root

use crate::{ConfigError, ConfigResult};
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Synthetic platform that collapses the platform chain into one file
pub const AGGREGATE_PLATFORM: &str = "all_emu";

/// File name of the GLOBAL level
pub const GLOBAL_FILE_NAME: &str = "feel.ini";

/// Directory names below the root
pub const CONFIG_DIR: &str = "config";
pub const LAYOUTS_DIR: &str = "layouts";
pub const SNAPSHOTS_DIR: &str = "snapshots";

/// Environment variable naming the root directory
pub const ROOT_ENV_VAR: &str = "MARQUEE_ROOT";

/// Paths derived from the front-end root directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontendPaths {
    root: PathBuf,
}

impl FrontendPaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Picks the root when none is given explicitly
    ///
    /// `MARQUEE_ROOT` wins, then the working directory if it holds a
    /// `config/` directory, then the platform data directory.
    pub fn discover() -> ConfigResult<Self> {
        if let Ok(root) = std::env::var(ROOT_ENV_VAR) {
            if !root.trim().is_empty() {
                return Ok(Self::new(root));
            }
        }
        if let Ok(cwd) = std::env::current_dir() {
            if cwd.join(CONFIG_DIR).is_dir() {
                return Ok(Self::new(cwd));
            }
        }
        Self::default_root().map(Self::new)
    }

    /// Platform data directory for the front-end
    pub fn default_root() -> ConfigResult<PathBuf> {
        let proj_dirs = ProjectDirs::from("org", "marquee", "marquee").ok_or_else(|| {
            ConfigError::PathResolutionError {
                reason: "Could not determine data directory".to_string(),
            }
        })?;
        Ok(proj_dirs.data_dir().to_path_buf())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_dir(&self) -> PathBuf {
        self.root.join(CONFIG_DIR)
    }

    pub fn layouts_dir(&self) -> PathBuf {
        self.root.join(LAYOUTS_DIR)
    }

    pub fn snapshots_dir(&self) -> PathBuf {
        self.root.join(SNAPSHOTS_DIR)
    }

    pub fn global_file(&self) -> PathBuf {
        self.config_dir().join(GLOBAL_FILE_NAME)
    }

    /// Shared file used for every chained level of the aggregate platform
    pub fn aggregate_file(&self) -> PathBuf {
        self.config_dir().join(format!("{}.ini", AGGREGATE_PLATFORM))
    }

    pub fn platform_dir(&self, platform: &str) -> PathBuf {
        self.config_dir().join(platform)
    }

    pub fn platform_file(&self, platform: &str) -> PathBuf {
        self.platform_dir(platform).join(format!("{}.ini", platform))
    }

    pub fn emulator_dir(&self, platform: &str, emulator: &str) -> PathBuf {
        self.platform_dir(platform).join(emulator)
    }

    pub fn emulator_file(&self, platform: &str, emulator: &str) -> PathBuf {
        self.emulator_dir(platform, emulator)
            .join(format!("{}.ini", emulator))
    }

    pub fn gamelist_file(&self, platform: &str, emulator: &str, gamelist: &str) -> PathBuf {
        self.emulator_dir(platform, emulator)
            .join(format!("{}.ini", gamelist))
    }

    pub fn layout_file(&self, layout: &str) -> PathBuf {
        self.layouts_dir().join(layout).join("layout.ini")
    }

    pub fn item_file(&self, platform: &str, emulator: &str, game: &str) -> PathBuf {
        self.emulator_dir(platform, emulator)
            .join("cfg")
            .join(format!("{}.ini", game))
    }

    /// Anchors a relative path at the root; absolute paths pass through
    pub fn resolve(&self, path: &str) -> PathBuf {
        let candidate = Path::new(path);
        if candidate.is_absolute() {
            candidate.to_path_buf()
        } else {
            self.root.join(candidate)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths() -> FrontendPaths {
        FrontendPaths::new("/fe")
    }

    #[test]
    fn test_level_file_layout() {
        let p = paths();
        assert_eq!(p.global_file(), PathBuf::from("/fe/config/feel.ini"));
        assert_eq!(
            p.platform_file("arcade"),
            PathBuf::from("/fe/config/arcade/arcade.ini")
        );
        assert_eq!(
            p.emulator_file("arcade", "mame"),
            PathBuf::from("/fe/config/arcade/mame/mame.ini")
        );
        assert_eq!(
            p.gamelist_file("arcade", "mame", "mame-0"),
            PathBuf::from("/fe/config/arcade/mame/mame-0.ini")
        );
        assert_eq!(
            p.layout_file("sheet"),
            PathBuf::from("/fe/layouts/sheet/layout.ini")
        );
        assert_eq!(
            p.item_file("arcade", "mame", "pacman"),
            PathBuf::from("/fe/config/arcade/mame/cfg/pacman.ini")
        );
    }

    #[test]
    fn test_aggregate_file() {
        assert_eq!(
            paths().aggregate_file(),
            PathBuf::from("/fe/config/all_emu.ini")
        );
    }

    #[test]
    fn test_snapshots_live_outside_config() {
        let p = paths();
        assert!(!p.snapshots_dir().starts_with(p.config_dir()));
    }

    #[test]
    #[cfg(unix)]
    fn test_resolve_relative_and_absolute() {
        let p = paths();
        assert_eq!(p.resolve("./mame"), PathBuf::from("/fe/./mame"));
        assert_eq!(p.resolve("/opt/mame"), PathBuf::from("/opt/mame"));
    }

    #[test]
    fn test_default_root() {
        let root = FrontendPaths::default_root();
        assert!(root.is_ok());
    }
}
