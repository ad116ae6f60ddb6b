//! Discovery of platforms, emulators and gamelists on disk
//!
//! Each list merges the preferred order stored in a `*_list` parameter with
//! what actually exists below `config/`. Preferred entries come first when
//! they exist, then everything else found on disk.

use crate::level_file::{decode_text, normalize_line};
use crate::manager::ConfigManager;
use crate::{ConfigError, ConfigResult};
use marquee_core::label_cleanup;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// What a discovered list enumerates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListKind {
    Platforms,
    Emulators,
    Gamelists,
}

impl ListKind {
    /// Parameter holding the preferred order
    pub fn list_param(self) -> &'static str {
        match self {
            Self::Platforms => "platform_list",
            Self::Emulators => "emulator_list",
            Self::Gamelists => "gamelist_list",
        }
    }

    /// Selector seeded from the first entry
    pub fn current_param(self) -> &'static str {
        match self {
            Self::Platforms => "current_platform",
            Self::Emulators => "current_emulator",
            Self::Gamelists => "current_gamelist",
        }
    }

    /// Parameter read from each entry's own file for its title
    pub fn title_param(self) -> &'static str {
        match self {
            Self::Platforms => "platform_title",
            Self::Emulators => "emulator_title",
            Self::Gamelists => "gamelist_title",
        }
    }
}

impl std::str::FromStr for ListKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "platforms" | "platform" => Ok(Self::Platforms),
            "emulators" | "emulator" => Ok(Self::Emulators),
            "gamelists" | "gamelist" => Ok(Self::Gamelists),
            other => Err(format!("unknown list '{}'", other)),
        }
    }
}

/// One discovered entry with its display title
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListEntry {
    pub key: String,
    pub title: String,
}

impl fmt::Display for ListEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{}", self.key, self.title)
    }
}

/// Preferred entries that exist on disk, then the remaining disk entries
pub fn merge_preferred(preferred: &str, on_disk: &[String]) -> Vec<String> {
    let mut merged: Vec<String> = Vec::new();
    for item in preferred.split(',').map(str::trim) {
        if on_disk.iter().any(|d| d == item) && !merged.iter().any(|m| m == item) {
            merged.push(item.to_string());
        }
    }
    for item in on_disk {
        if !merged.contains(item) {
            merged.push(item.clone());
        }
    }
    merged
}

/// Writes a list back in its stored form
pub fn join_list(items: &[String]) -> String {
    items.join(", ")
}

/// Sorted names of the subdirectories of `dir`; a missing directory is empty
pub fn list_subdirectories(dir: &Path) -> ConfigResult<Vec<String>> {
    list_dir(dir, |path| {
        if path.is_dir() {
            path.file_name().and_then(|n| n.to_str()).map(str::to_string)
        } else {
            None
        }
    })
}

/// Sorted stems of the `*.ini` files in `dir`; a missing directory is empty
pub fn list_ini_stems(dir: &Path) -> ConfigResult<Vec<String>> {
    list_dir(dir, |path| {
        let is_ini = path.is_file()
            && path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("ini"));
        if is_ini {
            path.file_stem().and_then(|n| n.to_str()).map(str::to_string)
        } else {
            None
        }
    })
}

fn list_dir(dir: &Path, pick: impl Fn(&Path) -> Option<String>) -> ConfigResult<Vec<String>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let read_error = |e| ConfigError::ReadError {
        path: dir.to_path_buf(),
        source: e,
    };
    let mut names = Vec::new();
    for entry in fs::read_dir(dir).map_err(read_error)? {
        let entry = entry.map_err(read_error)?;
        if let Some(name) = pick(&entry.path()) {
            names.push(name);
        }
    }
    names.sort();
    Ok(names)
}

/// Reads one parameter from a level file without loading it
///
/// The last line naming the parameter wins. A missing or unreadable file
/// yields `default`.
pub fn value_from_file(path: &Path, name: &str, default: &str) -> String {
    let Ok(bytes) = fs::read(path) else {
        return default.to_string();
    };
    let text = decode_text(bytes, path);
    let wanted = name.trim().to_lowercase();
    let mut result = default.to_string();
    for raw in text.lines() {
        let line = normalize_line(raw);
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some((key, value)) = line.split_once(' ') {
            if key.to_lowercase() == wanted {
                result = value.to_string();
            }
        }
    }
    result
}

impl ConfigManager {
    /// Discovers a list under the current selectors
    ///
    /// Writes the merged order back to the list parameter and seeds the
    /// matching selector when it is empty.
    pub fn discover_list(&mut self, kind: ListKind) -> ConfigResult<Vec<ListEntry>> {
        let platform = self.current_platform().to_string();
        let emulator = self.current_emulator().to_string();
        self.discover_list_under(kind, &platform, &emulator)
    }

    pub(crate) fn discover_list_under(
        &mut self,
        kind: ListKind,
        platform: &str,
        emulator: &str,
    ) -> ConfigResult<Vec<ListEntry>> {
        let paths = self.paths().clone();
        let on_disk = match kind {
            ListKind::Platforms => list_subdirectories(&paths.config_dir())?,
            ListKind::Emulators => list_subdirectories(&paths.platform_dir(platform))?,
            ListKind::Gamelists => list_ini_stems(&paths.emulator_dir(platform, emulator))?
                .into_iter()
                .filter(|stem| stem != emulator)
                .collect(),
        };

        let merged = merge_preferred(self.get_str(kind.list_param()), &on_disk);
        self.set_known(kind.list_param(), &join_list(&merged));

        if self.get_str(kind.current_param()).is_empty() && !merged.is_empty() {
            let first = match kind {
                ListKind::Emulators => merged
                    .iter()
                    .find(|e| e.as_str() == "mame")
                    .unwrap_or(&merged[0]),
                _ => &merged[0],
            }
            .clone();
            self.set_known(kind.current_param(), &first);
        }

        log::debug!("Discovered {} {:?}", merged.len(), kind);

        Ok(merged
            .into_iter()
            .map(|key| {
                let file: PathBuf = match kind {
                    ListKind::Platforms => paths.platform_file(&key),
                    ListKind::Emulators => paths.emulator_file(platform, &key),
                    ListKind::Gamelists => paths.gamelist_file(platform, emulator, &key),
                };
                let title = label_cleanup(&value_from_file(&file, kind.title_param(), &key));
                let title = if title.trim().is_empty() {
                    key.clone()
                } else {
                    title
                };
                ListEntry { key, title }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn names(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_merge_preferred_order_then_disk() {
        let disk = names(&["arcade", "console", "handheld"]);
        let merged = merge_preferred("console, missing, arcade, console", &disk);
        assert_eq!(merged, names(&["console", "arcade", "handheld"]));
    }

    #[test]
    fn test_merge_with_empty_preference() {
        let disk = names(&["b", "a"]);
        assert_eq!(merge_preferred("", &disk), names(&["b", "a"]));
    }

    #[test]
    fn test_join_list() {
        assert_eq!(join_list(&names(&["a", "b"])), "a, b");
        assert_eq!(join_list(&[]), "");
    }

    #[test]
    fn test_listings_are_sorted_and_filtered() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let dir = temp_dir.path();
        fs::create_dir(dir.join("zeta")).expect("Should create dir");
        fs::create_dir(dir.join("alpha")).expect("Should create dir");
        fs::write(dir.join("mame-1.ini"), "").expect("Should write");
        fs::write(dir.join("mame-0.INI"), "").expect("Should write");
        fs::write(dir.join("notes.txt"), "").expect("Should write");

        assert_eq!(
            list_subdirectories(dir).expect("Should list"),
            names(&["alpha", "zeta"])
        );
        assert_eq!(
            list_ini_stems(dir).expect("Should list"),
            names(&["mame-0", "mame-1"])
        );
        assert!(list_subdirectories(&dir.join("nope"))
            .expect("Missing dir is empty")
            .is_empty());
    }

    #[test]
    fn test_value_from_file_last_match_wins() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("arcade.ini");
        fs::write(
            &path,
            "# platform_title Ignored\nPlatform_Title   Old\nplatform_title\tVideo  Arcade\n",
        )
        .expect("Should write");

        assert_eq!(
            value_from_file(&path, "platform_title", "arcade"),
            "Video Arcade"
        );
        assert_eq!(value_from_file(&path, "emulator_title", "x"), "x");
        assert_eq!(
            value_from_file(&temp_dir.path().join("none.ini"), "platform_title", "arcade"),
            "arcade"
        );
    }

    #[test]
    fn test_value_from_file_reads_latin1() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("arcade.ini");
        fs::write(&path, b"platform_title Jeux Vid\xE9o\n").expect("Should write");

        assert_eq!(
            value_from_file(&path, "platform_title", "arcade"),
            "Jeux Vid\u{e9}o"
        );
    }

    #[test]
    fn test_discovered_titles_are_cleaned() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config = temp_dir.path().join("config");
        fs::create_dir_all(config.join("arcade")).expect("Should create dirs");
        fs::create_dir_all(config.join("console")).expect("Should create dirs");
        fs::write(config.join("arcade/arcade.ini"), "platform_title Arcade\u{2122}\n")
            .expect("Should write");
        fs::write(config.join("console/console.ini"), "platform_title \u{2122}\n")
            .expect("Should write");

        let mut manager =
            ConfigManager::with_builtin_catalog(temp_dir.path()).expect("Should build engine");
        let entries = manager
            .discover_list(ListKind::Platforms)
            .expect("Should discover");

        assert_eq!(
            entries,
            vec![
                ListEntry {
                    key: "arcade".to_string(),
                    title: "Arcade".to_string(),
                },
                ListEntry {
                    key: "console".to_string(),
                    title: "console".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_list_entry_display() {
        let entry = ListEntry {
            key: "mame".to_string(),
            title: "M.A.M.E.".to_string(),
        };
        assert_eq!(entry.to_string(), "mame|M.A.M.E.");
    }

    #[test]
    fn test_list_kind_from_str() {
        assert_eq!("Emulators".parse::<ListKind>(), Ok(ListKind::Emulators));
        assert!("roms".parse::<ListKind>().is_err());
    }
}
