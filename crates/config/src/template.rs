//! Placeholder expansion for launch command lines
//!
//! Command lines and paths may contain `[rom_path]`, `[rom_name]`,
//! `[full_path]`, `[rom_extension]`, `[full_dos_path]`, `[emulator_path]`
//! and `[video_path]`. Each pass replaces the first occurrence of every
//! placeholder, case-insensitively, and passes repeat until nothing is
//! left to replace. Replacements may themselves contain placeholders.

use crate::manager::ConfigManager;
use marquee_core::RunChain;
use std::path::Path;

/// Upper bound on expansion passes; a value containing its own
/// placeholder would otherwise never settle
pub const MAX_EXPANSION_PASSES: usize = 32;

/// The game being launched
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RomContext {
    /// Key of the entry in the game list
    pub key: String,
    /// File name of the ROM without extension
    pub name: String,
    /// Subdirectory of `rom_path` holding the ROM, often empty
    pub relative_path: String,
    /// Where the game lives when launched from the aggregate list
    pub run_chain: RunChain,
}

impl RomContext {
    /// A ROM whose key and file name are the same
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            key: name.clone(),
            name,
            ..Self::default()
        }
    }

    pub fn with_relative_path(mut self, relative_path: impl Into<String>) -> Self {
        self.relative_path = relative_path.into();
        self
    }

    pub fn with_run_chain(mut self, run_chain: RunChain) -> Self {
        self.run_chain = run_chain;
        self
    }
}

/// Replaces the first case-insensitive occurrence of an ASCII `token`
fn replace_first(haystack: &str, token: &str, replacement: &str) -> Option<String> {
    let index = haystack.to_ascii_lowercase().find(token)?;
    let mut result = String::with_capacity(haystack.len() + replacement.len());
    result.push_str(&haystack[..index]);
    result.push_str(replacement);
    result.push_str(&haystack[index + token.len()..]);
    Some(result)
}

fn substitute(text: &mut String, token: &str, replacement: &str) -> bool {
    match replace_first(text, token, replacement) {
        Some(replaced) => {
            *text = replaced;
            true
        }
        None => false,
    }
}

impl ConfigManager {
    /// Picks the extension of an existing ROM file
    ///
    /// With several comma-separated extensions configured, the first one
    /// whose file exists wins, or none at all. A single extension is used
    /// as configured.
    pub fn rom_extension(&self, rom_path: &str, rom_name: &str) -> String {
        let configured = self.get_str("rom_extension");
        if !configured.contains(',') {
            return configured.to_string();
        }
        configured
            .split(',')
            .map(str::trim)
            .find(|ext| {
                let file = format!("{}/{}.{}", rom_path, rom_name, ext);
                self.paths().resolve(&file).is_file()
            })
            .unwrap_or("")
            .to_string()
    }

    /// Expands every placeholder in `template`
    ///
    /// ROM placeholders are left alone when `rom` is `None`.
    pub fn expand_template(&self, template: &str, rom: Option<&RomContext>) -> String {
        let mut text = template.to_string();
        let emulator_path = self.get_str("emulator_path");
        let video_path = self.get_str("video_path");

        let mut rom_path = self.get_str("rom_path").to_string();
        if let Some(rom) = rom {
            if !rom.relative_path.is_empty() {
                rom_path = format!("{}/{}", rom_path, rom.relative_path);
            }
        }

        for _ in 0..MAX_EXPANSION_PASSES {
            if text.is_empty() {
                return text;
            }
            let mut found = substitute(&mut text, "[rom_path]", &rom_path);

            if let Some(rom) = rom {
                let resolved_rom_path =
                    replace_first(&rom_path, "[emulator_path]", emulator_path)
                        .unwrap_or_else(|| rom_path.clone());
                let extension = self.rom_extension(&resolved_rom_path, &rom.name);
                let full_path = format!("{}/{}.{}", resolved_rom_path, rom.name, extension);

                found |= substitute(&mut text, "[rom_name]", &rom.name);
                found |= substitute(&mut text, "[full_path]", &full_path);
                found |= substitute(&mut text, "[rom_extension]", &extension);
                // no short names outside Windows: the full path stands in
                found |= substitute(&mut text, "[full_dos_path]", &full_path);
            }

            found |= substitute(&mut text, "[emulator_path]", emulator_path);
            found |= substitute(&mut text, "[video_path]", video_path);

            if !found {
                return text;
            }
        }

        log::warn!(
            "Placeholders in '{}' did not settle after {} passes",
            template,
            MAX_EXPANSION_PASSES
        );
        text
    }

    /// Expands a command path and anchors it at the root when relative
    pub fn expand_program(&self, template: &str, rom: Option<&RomContext>) -> String {
        let expanded = self.expand_template(template, rom);
        if expanded.is_empty() || Path::new(&expanded).is_absolute() {
            return expanded;
        }
        self.paths().resolve(&expanded).to_string_lossy().into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn setup() -> (TempDir, ConfigManager) {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let manager =
            ConfigManager::with_builtin_catalog(temp_dir.path()).expect("Should build engine");
        (temp_dir, manager)
    }

    #[test]
    fn test_replace_first_is_case_insensitive() {
        assert_eq!(
            replace_first("a [ROM_Name] b [rom_name]", "[rom_name]", "x"),
            Some("a x b [rom_name]".to_string())
        );
        assert_eq!(replace_first("nothing", "[rom_name]", "x"), None);
    }

    #[test]
    fn test_full_rom_path_expansion() {
        let (_temp_dir, mut manager) = setup();
        manager.set_parameter("rom_path", "C:/roms").expect("Should set");
        manager.set_parameter("rom_extension", "zip").expect("Should set");

        let rom = RomContext::new("pacman");
        let expanded =
            manager.expand_template("[rom_path]/[rom_name].[rom_extension]", Some(&rom));
        assert_eq!(expanded, "C:/roms/pacman.zip");
    }

    #[test]
    fn test_repeated_placeholders_need_several_passes() {
        let (_temp_dir, manager) = setup();
        let rom = RomContext::new("dkong");
        let expanded = manager.expand_template("[rom_name] [rom_name] [ROM_NAME]", Some(&rom));
        assert_eq!(expanded, "dkong dkong dkong");
    }

    #[test]
    fn test_nested_placeholders() {
        let (_temp_dir, mut manager) = setup();
        manager
            .set_parameter("emulator_path", "/opt/mame")
            .expect("Should set");
        manager
            .set_parameter("rom_path", "[emulator_path]/roms")
            .expect("Should set");
        manager.set_parameter("rom_extension", "7z").expect("Should set");

        let rom = RomContext::new("galaga").with_relative_path("namco");
        assert_eq!(
            manager.expand_template("-rompath \"[rom_path]\" [full_path]", Some(&rom)),
            "-rompath \"/opt/mame/roms/namco\" /opt/mame/roms/namco/galaga.7z"
        );
    }

    #[test]
    fn test_rom_placeholders_kept_without_rom() {
        let (_temp_dir, mut manager) = setup();
        manager
            .set_parameter("video_path", "/videos")
            .expect("Should set");
        assert_eq!(
            manager.expand_template("[video_path]/[rom_name].mp4", None),
            "/videos/[rom_name].mp4"
        );
    }

    #[test]
    fn test_empty_template() {
        let (_temp_dir, manager) = setup();
        assert_eq!(manager.expand_template("", None), "");
    }

    #[test]
    fn test_self_reference_terminates() {
        let (_temp_dir, mut manager) = setup();
        manager
            .set_parameter("emulator_path", "[emulator_path]/x")
            .expect("Should set");
        let expanded = manager.expand_template("[emulator_path]", None);
        assert!(expanded.ends_with("/x"));
    }

    #[test]
    fn test_rom_extension_picks_existing_file() {
        let (temp_dir, mut manager) = setup();
        fs::create_dir_all(temp_dir.path().join("roms")).expect("Should create dir");
        fs::write(temp_dir.path().join("roms/mslug.7z"), "").expect("Should write");
        manager
            .set_parameter("rom_extension", "zip, 7z")
            .expect("Should set");

        assert_eq!(manager.rom_extension("roms", "mslug"), "7z");
        assert_eq!(manager.rom_extension("roms", "missing"), "");

        manager
            .set_parameter("rom_extension", "zip")
            .expect("Should set");
        assert_eq!(manager.rom_extension("roms", "missing"), "zip");
    }

    #[test]
    fn test_expand_program_anchors_relative_paths() {
        let (temp_dir, mut manager) = setup();
        manager
            .set_parameter("emulator_path", "emus/mame")
            .expect("Should set");
        let program = manager.expand_program("[emulator_path]/mame", None);
        assert_eq!(
            Path::new(&program),
            temp_dir.path().join("emus/mame/mame").as_path()
        );
    }
}
