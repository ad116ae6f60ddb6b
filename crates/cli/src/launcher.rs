// FILE: crates/cli/src/launcher.rs

use anyhow::{Context, Result};
use marquee_config::{LaunchCommand, LaunchPhase, LaunchPlan};
use marquee_core::AppError;
use std::time::{Duration, Instant};
use tokio::process::Command;

/// Upper bound for helper programs the plan waits on
pub const HELPER_TIMEOUT: Duration = Duration::from_secs(30);

#[cfg(windows)]
const CREATE_NO_WINDOW: u32 = 0x0800_0000;

fn build_command(command: &LaunchCommand) -> Command {
    let mut process = if command.use_shell {
        shell_command(&command.command_line())
    } else {
        let mut process = Command::new(&command.program);
        process.args(command.argv());
        process
    };

    if let Some(dir) = command.working_dir.as_ref().filter(|dir| dir.is_dir()) {
        process.current_dir(dir);
    }

    #[cfg(windows)]
    if command.no_window {
        process.creation_flags(CREATE_NO_WINDOW);
    }

    process
}

#[cfg(windows)]
fn shell_command(line: &str) -> Command {
    let mut process = Command::new("cmd");
    process.arg("/C").arg(line);
    process
}

#[cfg(not(windows))]
fn shell_command(line: &str) -> Command {
    let mut process = Command::new("sh");
    process.arg("-c").arg(line);
    process
}

/// Runs one command, returning how long it ran when waited on
async fn run_command(command: &LaunchCommand) -> Result<Duration> {
    let started = Instant::now();
    let mut child = build_command(command)
        .spawn()
        .map_err(|e| AppError::launch(command.command_line(), e))?;
    log::info!("Started {}: {}", command.phase, command.command_line());

    if !command.wait_for_exit {
        return Ok(Duration::ZERO);
    }

    let waited = if command.phase == LaunchPhase::Emulator {
        child.wait().await
    } else {
        match tokio::time::timeout(HELPER_TIMEOUT, child.wait()).await {
            Ok(status) => status,
            Err(_) => {
                let _ = child.kill().await;
                return Err(AppError::LaunchTimeout {
                    command: command.command_line(),
                    seconds: HELPER_TIMEOUT.as_secs(),
                }
                .into());
            }
        }
    };
    let status = waited.with_context(|| format!("Failed waiting for {}", command.phase))?;

    if !status.success() {
        log::warn!("{} exited with {}", command.phase, status);
    }
    Ok(started.elapsed())
}

/// Runs the plan in order and returns the emulator's play time
pub async fn run_plan(plan: &LaunchPlan) -> Result<Duration> {
    let mut played = Duration::ZERO;
    for command in &plan.commands {
        let elapsed = run_command(command).await?;
        if command.phase == LaunchPhase::Emulator {
            played = elapsed;
        }
    }
    log::debug!("{} played for {:?}", plan.rom, played);
    Ok(played)
}

/// Format a play time as MM:SS or HH:MM:SS
pub fn format_played(played: Duration) -> String {
    let total = played.as_secs();
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;
    if hours > 0 {
        format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{:02}:{:02}", minutes, seconds)
    }
}
