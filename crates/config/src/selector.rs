//! The platform, emulator and gamelist selector chain
//!
//! Selecting a level resets the values it supplied, stores the new
//! selector, loads the level and cascades into the next selector. The
//! aggregate platform skips the emulator and gamelist files entirely.

use crate::discovery::ListKind;
use crate::manager::ConfigManager;
use crate::ConfigResult;
use marquee_core::{Level, RunChain};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Where the selector chain is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SelectorState {
    /// Fully resolved for a real platform
    Normal,
    /// A selection is being applied
    Reloading,
    /// Fully resolved for the aggregate platform
    Aggregate,
}

impl fmt::Display for SelectorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Normal => "normal",
            Self::Reloading => "reloading",
            Self::Aggregate => "aggregate",
        };
        f.write_str(name)
    }
}

impl ConfigManager {
    pub fn selector_state(&self) -> SelectorState {
        self.state
    }

    fn settle(&mut self) {
        self.state = if self.is_aggregate() {
            SelectorState::Aggregate
        } else {
            SelectorState::Normal
        };
    }

    /// Switches platform and cascades into its current emulator
    ///
    /// Returns false when a level could not be loaded or the platform has
    /// no emulators.
    pub fn select_platform(&mut self, platform: &str) -> ConfigResult<bool> {
        self.state = SelectorState::Reloading;
        log::info!("Selecting platform '{}'", platform);

        self.restore_level_values(Level::Platform);
        self.set_known("current_platform", platform);
        let loaded = self.load_config(Level::Platform)?;

        let result = if self.is_aggregate() {
            let chained = self.select_emulator("")?;
            loaded && chained
        } else {
            let emulators = self.discover_list(ListKind::Emulators)?;
            match emulators.first() {
                None => {
                    log::warn!("Platform '{}' has no emulators", platform);
                    false
                }
                Some(first) => {
                    if self.current_emulator().is_empty() {
                        let key = first.key.clone();
                        self.set_known("current_emulator", &key);
                    }
                    let emulator = self.current_emulator().to_string();
                    let chained = self.select_emulator(&emulator)?;
                    loaded && chained
                }
            }
        };

        self.settle();
        Ok(result)
    }

    /// Switches emulator and cascades into its current gamelist
    ///
    /// A gamelist selector that does not belong to the emulator is reset to
    /// `<emulator>-0` and saved.
    pub fn select_emulator(&mut self, emulator: &str) -> ConfigResult<bool> {
        self.state = SelectorState::Reloading;
        log::info!("Selecting emulator '{}'", emulator);

        self.restore_level_values(Level::Emulator);
        self.set_known("current_emulator", emulator);

        let mut loaded = true;
        if !self.is_aggregate() {
            loaded = self.load_config(Level::Emulator)?;

            if self.get_str("emulator_list").is_empty() {
                self.set_known("emulator_list", emulator);
            }
            let default_gamelist = format!("{}-0", emulator);
            if !self.get_str("gamelist_list").contains(emulator) {
                self.set_known("gamelist_list", &default_gamelist);
            }
            let belongs = self
                .current_gamelist()
                .to_lowercase()
                .starts_with(&emulator.to_lowercase());
            if !belongs {
                self.set_known("current_gamelist", &default_gamelist);
                self.set_known("gamelist_title", "All Games");
                self.save_config()?;
            }
            self.discover_list(ListKind::Gamelists)?;
        }

        let gamelist = self.current_gamelist().to_string();
        let chained = self.select_gamelist(&gamelist)?;

        self.settle();
        Ok(loaded && chained)
    }

    /// Switches gamelist; the aggregate platform has no gamelist file
    pub fn select_gamelist(&mut self, gamelist: &str) -> ConfigResult<bool> {
        self.state = SelectorState::Reloading;
        log::info!("Selecting gamelist '{}'", gamelist);

        self.restore_level_values(Level::Gamelist);
        self.set_known("current_gamelist", gamelist);
        let result = self.is_aggregate() || self.load_config(Level::Gamelist)?;

        self.settle();
        Ok(result)
    }

    /// Re-reads the current layout
    pub fn refresh_layout(&mut self) -> ConfigResult<bool> {
        self.restore_level_values(Level::Layout);
        self.load_config(Level::Layout)
    }

    /// Full startup sequence
    ///
    /// Loads the chain and the layout, repairs paths, saves and selects the
    /// current platform.
    pub fn refresh_configuration(&mut self) -> ConfigResult<bool> {
        self.state = SelectorState::Reloading;
        let loaded = self.load_config(Level::Global)?;
        let layout = self.refresh_layout()?;
        self.fix_config_parameters()?;

        let platform = self.current_platform().to_string();
        let selected = if platform.is_empty() {
            true
        } else {
            self.select_platform(&platform)?
        };

        self.settle();
        Ok(loaded && layout && selected)
    }

    /// An independent engine resolved for a run chain
    ///
    /// Only the platform, emulator and gamelist levels are read. The
    /// receiver is left untouched.
    pub fn for_run_chain(&self, chain: &RunChain) -> ConfigResult<ConfigManager> {
        let mut engine = self.fresh();
        for (level, selector, value) in [
            (Level::Platform, "current_platform", &chain.platform),
            (Level::Emulator, "current_emulator", &chain.emulator),
            (Level::Gamelist, "current_gamelist", &chain.gamelist),
        ] {
            engine.restore_level_values(level);
            engine.set_known(selector, value);
            engine.load_config(level)?;
        }
        engine.settle();
        Ok(engine)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn write(root: &Path, relative: &str, text: &str) {
        let path = root.join(relative);
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).expect("Should create dirs");
        }
        fs::write(path, text).expect("Should write file");
    }

    /// Two platforms; arcade has mame (two gamelists) and fba
    fn fixture() -> (TempDir, ConfigManager) {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let root = temp_dir.path();
        write(root, "config/feel.ini", "current_platform arcade\n");
        write(
            root,
            "config/arcade/arcade.ini",
            "platform_title Arcade\ncurrent_emulator mame\n",
        );
        write(
            root,
            "config/arcade/mame/mame.ini",
            "emulator_title M.A.M.E.\ncurrent_gamelist mame-1\nrom_path /roms/mame\n",
        );
        write(root, "config/arcade/mame/mame-0.ini", "gamelist_title All\n");
        write(
            root,
            "config/arcade/mame/mame-1.ini",
            "gamelist_title Favourites\nrom_path /roms/favs\n",
        );
        write(
            root,
            "config/arcade/fba/fba.ini",
            "emulator_title FinalBurn\nrom_path /roms/fba\n",
        );
        write(root, "config/console/console.ini", "platform_title Console\n");

        let manager = ConfigManager::with_builtin_catalog(root).expect("Should build engine");
        (temp_dir, manager)
    }

    #[test]
    fn test_refresh_configuration_resolves_chain() {
        let (_temp_dir, mut manager) = fixture();
        assert!(manager.refresh_configuration().expect("Should refresh"));

        assert_eq!(manager.selector_state(), SelectorState::Normal);
        assert_eq!(manager.current_emulator(), "mame");
        assert_eq!(manager.current_gamelist(), "mame-1");
        assert_eq!(manager.get_str("gamelist_title"), "Favourites");
        let rom_path = manager.get_parameter("rom_path").expect("Should exist");
        assert_eq!(rom_path.value(), "/roms/favs");
        assert_eq!(rom_path.current_level(), Level::Gamelist);
    }

    #[test]
    fn test_select_gamelist_falls_back_to_emulator_value() {
        let (_temp_dir, mut manager) = fixture();
        manager.refresh_configuration().expect("Should refresh");

        assert!(manager.select_gamelist("mame-0").expect("Should select"));
        let rom_path = manager.get_parameter("rom_path").expect("Should exist");
        assert_eq!(rom_path.value(), "/roms/mame");
        assert_eq!(rom_path.current_level(), Level::Emulator);
        assert_eq!(manager.get_str("gamelist_title"), "All");
    }

    #[test]
    fn test_select_emulator_resets_foreign_gamelist() {
        let (temp_dir, mut manager) = fixture();
        manager.refresh_configuration().expect("Should refresh");

        assert!(manager.select_emulator("fba").expect("Should select"));
        assert_eq!(manager.current_gamelist(), "fba-0");
        assert_eq!(manager.get_str("gamelist_title"), "All Games");
        assert_eq!(manager.get_str("rom_path"), "/roms/fba");
        assert!(temp_dir.path().join("config/arcade/fba/fba-0.ini").exists());
    }

    #[test]
    fn test_select_emulator_fills_empty_emulator_list() {
        let (_temp_dir, mut manager) = fixture();
        manager.refresh_configuration().expect("Should refresh");
        manager
            .set_parameter("emulator_list", "")
            .expect("Should clear list");

        manager.select_emulator("fba").expect("Should select");
        assert_eq!(manager.get_str("emulator_list"), "fba");

        manager.select_emulator("mame").expect("Should select");
        assert_eq!(manager.get_str("emulator_list"), "fba");
    }

    #[test]
    fn test_select_platform_seeds_fallback_emulator() {
        let (temp_dir, mut manager) = fixture();
        manager.refresh_configuration().expect("Should refresh");

        assert!(manager.select_platform("console").expect("Should select"));
        assert_eq!(manager.current_platform(), "console");
        assert_eq!(manager.get_str("platform_title"), "Console");
        assert_eq!(manager.current_emulator(), "mame");
        assert!(temp_dir
            .path()
            .join("config/console/mame/mame.ini")
            .exists());
        assert_eq!(manager.selector_state(), SelectorState::Normal);
    }

    #[test]
    fn test_aggregate_platform_skips_chain() {
        let (temp_dir, mut manager) = fixture();
        manager.refresh_configuration().expect("Should refresh");

        assert!(manager.select_platform("all_emu").expect("Should select"));
        assert_eq!(manager.selector_state(), SelectorState::Aggregate);
        assert_eq!(manager.current_emulator(), "");
        assert!(temp_dir.path().join("config/all_emu.ini").exists());
        assert_eq!(manager.get_str("platform_title"), "* TOP GAMES *");
    }

    #[test]
    fn test_for_run_chain_leaves_receiver_untouched() {
        let (_temp_dir, mut manager) = fixture();
        manager.refresh_configuration().expect("Should refresh");
        let before = manager.parameters().to_vec();

        let chain = RunChain::new("arcade", "fba", "fba-0", "sf2");
        let engine = manager.for_run_chain(&chain).expect("Should resolve");

        assert_eq!(engine.current_emulator(), "fba");
        assert_eq!(engine.get_str("rom_path"), "/roms/fba");
        assert_eq!(manager.parameters(), before.as_slice());
    }

    #[test]
    fn test_selector_state_display() {
        assert_eq!(SelectorState::Reloading.to_string(), "reloading");
    }
}
