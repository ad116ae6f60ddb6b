//! Launch plans: the command lines that start a game
//!
//! Preparing a launch records the current game, saves, takes a backup and
//! then layers the per-game configuration on top (the ROM's own settings
//! file, a run-chain engine, or the ITEM level). Finishing the launch puts
//! the backup back, so none of those overlays reach the base chain.

use crate::error::{ConfigError, ConfigResult};
use crate::manager::ConfigManager;
use crate::template::RomContext;
use marquee_core::{Level, ListType, RunChain};
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Games played for less than this are not remembered as last played
pub const MIN_PLAY_TIME: Duration = Duration::from_secs(3);

/// Stage of a launch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LaunchPhase {
    PreEmulator,
    Emulator,
    PostEmulator,
}

impl LaunchPhase {
    fn param_prefix(self) -> &'static str {
        match self {
            LaunchPhase::PreEmulator => "pre_emulator_app",
            LaunchPhase::Emulator => "emulator",
            LaunchPhase::PostEmulator => "post_emulator_app",
        }
    }
}

impl fmt::Display for LaunchPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.param_prefix())
    }
}

/// One program to run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LaunchCommand {
    pub phase: LaunchPhase,
    pub program: String,
    pub arguments: String,
    pub working_dir: Option<PathBuf>,
    pub wait_for_exit: bool,
    pub no_window: bool,
    pub use_shell: bool,
}

impl LaunchCommand {
    /// Splits `arguments` on whitespace, keeping double-quoted runs together
    pub fn argv(&self) -> Vec<String> {
        let mut args = Vec::new();
        let mut current = String::new();
        let mut quoted = false;
        let mut pending = false;

        for c in self.arguments.chars() {
            match c {
                '"' => {
                    quoted = !quoted;
                    pending = true;
                }
                c if c.is_whitespace() && !quoted => {
                    if pending {
                        args.push(std::mem::take(&mut current));
                        pending = false;
                    }
                }
                c => {
                    current.push(c);
                    pending = true;
                }
            }
        }
        if pending {
            args.push(current);
        }
        args
    }

    /// Program and arguments as one line
    pub fn command_line(&self) -> String {
        if self.arguments.is_empty() {
            self.program.clone()
        } else {
            format!("{} {}", self.program, self.arguments)
        }
    }
}

/// Ordered commands for one game
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LaunchPlan {
    pub rom: String,
    pub commands: Vec<LaunchCommand>,
}

impl LaunchPlan {
    /// Builds the plan from a resolved configuration
    ///
    /// The helper phases are only present when their command line is set.
    pub fn build(config: &ConfigManager, rom: &RomContext) -> Self {
        let commands = [
            LaunchPhase::PreEmulator,
            LaunchPhase::Emulator,
            LaunchPhase::PostEmulator,
        ]
        .into_iter()
        .filter_map(|phase| phase_command(config, rom, phase))
        .collect();

        Self {
            rom: rom.key.clone(),
            commands,
        }
    }

    pub fn command(&self, phase: LaunchPhase) -> Option<&LaunchCommand> {
        self.commands.iter().find(|c| c.phase == phase)
    }
}

fn phase_command(
    config: &ConfigManager,
    rom: &RomContext,
    phase: LaunchPhase,
) -> Option<LaunchCommand> {
    let prefix = phase.param_prefix();
    let template = config.get_str(&format!("{}_commandline", prefix));
    if template.trim().is_empty() {
        return None;
    }

    let program = config.expand_program(template, Some(rom));
    let arguments = config.expand_template(
        config.get_str(&format!("{}_arguments", prefix)),
        Some(rom),
    );
    let working_dir = Path::new(&program)
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .map(Path::to_path_buf);

    let (wait_for_exit, no_window, use_shell) = match phase {
        LaunchPhase::Emulator => (
            true,
            config.get_bool("emulator_nodosbox"),
            config.get_bool("emulator_useshell"),
        ),
        LaunchPhase::PreEmulator => (config.get_bool("pre_emulator_wait_for_exit"), true, false),
        LaunchPhase::PostEmulator => (config.get_bool("post_emulator_wait_for_exit"), true, false),
    };

    Some(LaunchCommand {
        phase,
        program,
        arguments,
        working_dir,
        wait_for_exit,
        no_window,
        use_shell,
    })
}

impl ConfigManager {
    /// Records the game, backs up the configuration and plans the launch
    ///
    /// On success the engine holds the per-game overlay until
    /// [`finish_launch`](Self::finish_launch) is called. On error the backup
    /// has already been restored.
    pub fn prepare_launch(&mut self, rom: &RomContext) -> ConfigResult<LaunchPlan> {
        self.set_known("current_game", &rom.key);
        self.save_config()?;
        self.back_up_state();

        match self.overlay_for(rom) {
            Ok(plan) => {
                log::info!(
                    "Planned launch of {} with {} command(s)",
                    rom.key,
                    plan.commands.len()
                );
                Ok(plan)
            }
            Err(e) => {
                self.restore_back_up_state()?;
                Err(e)
            }
        }
    }

    fn overlay_for(&mut self, rom: &RomContext) -> ConfigResult<LaunchPlan> {
        if self.list_type() == ListType::RomSettingsIniList {
            let extension = self.get_str("rom_extension").to_string();
            if extension.contains(',') {
                return Err(ConfigError::LaunchRejected {
                    reason: format!(
                        "rom_extension '{}' lists several extensions, a settings list needs exactly one",
                        extension
                    ),
                });
            }
            let settings = format!("{}/{}.{}", self.get_str("rom_path"), rom.key, extension);
            let path = self.paths().resolve(&settings);
            self.load_config_from(Level::Emulator, &path)?;
            return Ok(LaunchPlan::build(self, rom));
        }

        if rom.run_chain.is_set() {
            let mut engine = self.for_run_chain(&rom.run_chain)?;
            engine.set_known("current_game", &rom.key);
            engine.load_config(Level::Item)?;
            return Ok(LaunchPlan::build(&engine, rom));
        }

        self.load_config(Level::Item)?;
        Ok(LaunchPlan::build(self, rom))
    }

    /// Restores the pre-launch configuration and remembers the game
    ///
    /// Sessions shorter than [`MIN_PLAY_TIME`] are not recorded.
    pub fn finish_launch(&mut self, rom: &RomContext, played: Duration) -> ConfigResult<()> {
        self.restore_back_up_state()?;
        if played > MIN_PLAY_TIME {
            let chain = RunChain::new(
                self.current_platform(),
                self.current_emulator(),
                self.current_gamelist(),
                rom.key.as_str(),
            );
            self.set_known("last_game_played", &chain.to_string());
            self.save_config()?;
        }
        Ok(())
    }
}
