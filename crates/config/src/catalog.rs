//! The parameter catalog: every known setting with its level and default
//!
//! The catalog is data. The built-in one is compiled in from
//! `catalog/parameters.toml`; a replacement can be loaded from disk.

use crate::{ConfigError, ConfigResult};
use marquee_core::Level;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

const BUILTIN_CATALOG: &str = include_str!("../catalog/parameters.toml");

/// Which string mapper a parameter's value goes through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamKind {
    Bool,
    Int,
    Float,
    Text,
    Color,
    Key,
    FontStyle,
    TextAlign,
    UseMouse,
    ScreenSaver,
    SmartasdMode,
    FnetSort,
    AutostartMode,
    ListType,
    SortType,
}

#[derive(Debug, Deserialize)]
struct EntrySpec {
    kind: ParamKind,
    #[serde(default)]
    default: String,
    #[serde(default)]
    optional: bool,
}

/// One catalog entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub name: String,
    pub level: Level,
    pub kind: ParamKind,
    pub default: String,
    pub optional: bool,
}

/// Ordered set of known parameters
#[derive(Debug, Clone)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    /// The catalog shipped with the front-end
    pub fn builtin() -> ConfigResult<Self> {
        Self::from_toml_str(BUILTIN_CATALOG, Path::new("<builtin catalog>"))
    }

    /// Loads a catalog from a TOML file
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let text = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_toml_str(&text, path)
    }

    /// Parses a catalog document: one table per level, entries in write order
    pub fn from_toml_str(text: &str, origin: &Path) -> ConfigResult<Self> {
        let parse_error = |source| ConfigError::ParseError {
            path: PathBuf::from(origin),
            source,
        };

        let document: toml::Table = toml::from_str(text).map_err(parse_error)?;
        let mut entries = Vec::new();
        let mut seen = HashSet::new();

        for (section, body) in document {
            let level: Level = section
                .parse()
                .map_err(|reason| ConfigError::CatalogError { reason })?;
            let table = body.as_table().ok_or_else(|| ConfigError::CatalogError {
                reason: format!("section [{}] is not a table", section),
            })?;

            for (name, spec) in table {
                let spec: EntrySpec = spec.clone().try_into().map_err(parse_error)?;
                let name = name.trim().to_lowercase();
                if !seen.insert(name.clone()) {
                    return Err(ConfigError::CatalogError {
                        reason: format!("parameter '{}' is declared twice", name),
                    });
                }
                entries.push(CatalogEntry {
                    name,
                    level,
                    kind: spec.kind,
                    default: spec.default,
                    optional: spec.optional,
                });
            }
        }

        log::debug!(
            "Loaded {} catalog entries from {}",
            entries.len(),
            origin.display()
        );
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn get(&self, name: &str) -> Option<&CatalogEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog_loads() {
        let catalog = Catalog::builtin().expect("Builtin catalog should parse");
        assert!(catalog.len() > 200);

        let rate = catalog
            .get("keyboard_scroll_rate")
            .expect("Should know keyboard_scroll_rate");
        assert_eq!(rate.level, Level::Global);
        assert_eq!(rate.kind, ParamKind::Int);
        assert_eq!(rate.default, "225");
        assert!(rate.optional);
    }

    #[test]
    fn test_builtin_catalog_keeps_file_order() {
        let catalog = Catalog::builtin().expect("Builtin catalog should parse");
        let first = &catalog.entries()[0];
        assert_eq!(first.name, "layout_test_mode");

        let levels: Vec<Level> = catalog.entries().iter().map(|e| e.level).collect();
        let mut sorted = levels.clone();
        sorted.sort();
        assert_eq!(levels, sorted);
    }

    #[test]
    fn test_selectors_live_at_their_levels() {
        let catalog = Catalog::builtin().expect("Builtin catalog should parse");
        let level_of = |name: &str| catalog.get(name).map(|e| e.level);
        assert_eq!(level_of("current_platform"), Some(Level::Global));
        assert_eq!(level_of("current_emulator"), Some(Level::Platform));
        assert_eq!(level_of("current_gamelist"), Some(Level::Emulator));
        assert_eq!(level_of("current_layout"), Some(Level::Emulator));
        assert_eq!(level_of("current_game"), Some(Level::Gamelist));
        assert_eq!(level_of("screen_res_x"), Some(Level::Layout));
    }

    #[test]
    fn test_custom_catalog() {
        let text = r#"
            [global]
            alpha = { kind = "int", default = "1" }

            [layout]
            beta = { kind = "color", default = "1, 2, 3", optional = true }
        "#;
        let catalog = Catalog::from_toml_str(text, Path::new("test")).expect("Should parse");
        assert_eq!(catalog.len(), 2);
        let beta = catalog.get("beta").expect("Should know beta");
        assert_eq!(beta.level, Level::Layout);
        assert!(beta.optional);
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let text = r#"
            [global]
            alpha = { kind = "int" }
            [platform]
            alpha = { kind = "int" }
        "#;
        let result = Catalog::from_toml_str(text, Path::new("test"));
        assert!(matches!(result, Err(ConfigError::CatalogError { .. })));
    }

    #[test]
    fn test_unknown_level_rejected() {
        let text = "[cabinet]\nalpha = { kind = \"int\" }\n";
        let result = Catalog::from_toml_str(text, Path::new("test"));
        assert!(matches!(result, Err(ConfigError::CatalogError { .. })));
    }

    #[test]
    fn test_unknown_kind_rejected() {
        let text = "[global]\nalpha = { kind = \"matrix\" }\n";
        let result = Catalog::from_toml_str(text, Path::new("test"));
        assert!(matches!(result, Err(ConfigError::ParseError { .. })));
    }
}
