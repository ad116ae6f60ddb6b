//! Parameters derived from other parameters
//!
//! [`ConfigManager::fix_missing_params`] runs after every load chain and
//! after a backup is restored. [`ConfigManager::fix_config_parameters`]
//! repairs paths once the configuration is first read and saves the result.

use crate::manager::ConfigManager;
use crate::ConfigResult;
use marquee_core::{InstallationId, Level};

/// Title shown for the all-platforms list when none is configured
pub const AGGREGATE_TITLE: &str = "* TOP GAMES *";

/// Byte index of the last path separator in a command line
fn last_separator(command: &str) -> Option<usize> {
    command.rfind(['/', '\\'])
}

impl ConfigManager {
    /// Fills values that can be inferred from others
    pub fn fix_missing_params(&mut self) {
        if self.get_str("emulator_path").is_empty() {
            let command = self.get_str("emulator_commandline");
            if let Some(index) = last_separator(command).filter(|&i| i > 0) {
                let dir = command[..index].to_string();
                self.set_known("emulator_path", &dir);
            }
        }

        if self.is_aggregate() {
            if self.get_str("platform_title").is_empty() {
                self.set_known("platform_title", AGGREGATE_TITLE);
            }
            self.pin_level("current_layout", Level::Platform);
        }
    }

    /// Repairs self-referencing paths and saves
    ///
    /// When `emulator_path` does not exist but the directory of the
    /// emulator executable does, the command line is rewritten relative to
    /// that directory. An empty installation id is generated here too.
    pub fn fix_config_parameters(&mut self) -> ConfigResult<()> {
        let emulator_path = self.get_str("emulator_path").to_string();
        let command = self.get_str("emulator_commandline").to_string();

        if !self.paths().resolve(&emulator_path).is_dir() {
            if let Some(index) = last_separator(&command) {
                let dir = &command[..index];
                if !dir.is_empty() && self.paths().resolve(dir).is_dir() {
                    let exe = &command[index + 1..];
                    log::info!("Emulator path {} missing, using {}", emulator_path, dir);
                    self.set_known("emulator_commandline", &format!("[emulator_path]/{}", exe));
                    self.set_known("emulator_path", dir);
                }
            }
        }

        let emulator_path = self.get_str("emulator_path");
        if emulator_path.contains("[emulator_path]") {
            let fixed = emulator_path.replace("[emulator_path]", ".");
            self.set_known("emulator_path", &fixed);
        }

        let rom_path = self.get_str("rom_path");
        if ["[rom_path]", "[full_path]", "[full_dos_path]"]
            .iter()
            .any(|token| rom_path.contains(*token))
        {
            let fixed = rom_path
                .replace("[rom_path]", ".")
                .replace("[full_path]", ".")
                .replace("[full_dos_path]", ".");
            self.set_known("rom_path", &fixed);
        }

        if self.get_str("feel_uuid").is_empty() {
            let id = InstallationId::new();
            log::info!("Generated installation id {}", id);
            self.set_known("feel_uuid", &id.as_string());
        }

        self.save_config()
    }
}
