// FILE: crates/cli/src/commands.rs

use crate::launcher;
use anyhow::{bail, Context, Result};
use clap::ArgMatches;
use console::style;
use marquee_config::{
    Catalog, ConfigManager, FrontendPaths, LaunchPlan, LevelFileWatcher, ListKind, RomContext,
    SnapshotArchive, ValidationError,
};
use marquee_core::{AppError, Level, RunChain, UiQueue};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

/// Builds the engine for the root and catalog given on the command line
pub fn open_engine(matches: &ArgMatches) -> Result<ConfigManager> {
    let paths = match matches.get_one::<String>("root") {
        Some(root) => FrontendPaths::new(root),
        None => FrontendPaths::discover().context("Failed to determine the front-end root")?,
    };
    let catalog = match matches.get_one::<String>("catalog") {
        Some(file) => Catalog::from_file(Path::new(file))
            .with_context(|| format!("Failed to read catalog {}", file))?,
        None => Catalog::builtin().context("Failed to read the built-in catalog")?,
    };
    log::debug!("Front-end root is {}", paths.root().display());
    Ok(ConfigManager::new(paths, Arc::new(catalog)))
}

/// Reads the level chain and the layout without writing anything
fn load_chain(config: &mut ConfigManager) -> Result<()> {
    let chain = config
        .load_config(Level::Global)
        .context("Failed to load configuration")?;
    let layout = config
        .refresh_layout()
        .context("Failed to load layout")?;
    if !(chain && layout) {
        match unresolved_report(config)? {
            Some(err) => {
                log::warn!("{}", err);
                println!("{} {}", style("!").yellow().bold(), err.user_message());
            }
            None => log::warn!("Some configuration levels could not be resolved"),
        }
    }
    Ok(())
}

/// Names the selector behind the first level without a file
fn unresolved_report(config: &mut ConfigManager) -> Result<Option<AppError>> {
    let levels = Level::ALL.into_iter().filter(|level| *level <= Level::Layout);
    Ok(config.unresolved_file_name(levels)?)
}

/// Load the full chain, seeding missing files, and save
pub fn init(config: &mut ConfigManager) -> Result<()> {
    let resolved = config
        .refresh_configuration()
        .context("Failed to initialize configuration")?;
    config.save_config().context("Failed to save configuration")?;

    println!(
        "{} Configuration ready at {}",
        style("✓").green().bold(),
        config.paths().root().display()
    );
    for (level, path) in config.loaded_files() {
        println!("  {:<9} {}", level, path.display());
    }
    if !resolved {
        println!(
            "{} some levels could not be resolved, check the selectors",
            style("!").yellow().bold()
        );
    }
    Ok(())
}

fn parse_level(matches: &ArgMatches) -> Result<Option<Level>> {
    matches
        .get_one::<String>("level")
        .map(|raw| raw.parse::<Level>().map_err(|e| anyhow::anyhow!(e)))
        .transpose()
}

/// Lines of the parameter dump, optionally restricted to one level
fn dump_lines(config: &ConfigManager, level: Option<Level>) -> Vec<String> {
    match level {
        None => config
            .parameter_dump()
            .iter()
            .flat_map(|page| page.lines().map(str::to_string).collect::<Vec<_>>())
            .collect(),
        Some(level) => config
            .parameters()
            .iter()
            .filter(|p| p.current_level() == level)
            .map(|p| format!("{} ({}) = {}", p.name(), level, p.value()))
            .collect(),
    }
}

/// Print every parameter with the level supplying it
pub fn dump(config: &mut ConfigManager, matches: &ArgMatches) -> Result<()> {
    load_chain(config)?;

    if matches.get_flag("json") {
        println!("{}", config.export_json()?);
        return Ok(());
    }

    let level = parse_level(matches)?;
    for line in dump_lines(config, level) {
        if line.parse::<Level>().is_ok() {
            println!("\n{}", style(line).bold().cyan());
        } else {
            println!("{}", line);
        }
    }
    Ok(())
}

/// Value, level and file of one parameter
fn describe(config: &mut ConfigManager, name: &str) -> Result<(String, Level, Option<PathBuf>)> {
    let (value, level) = match config.get_parameter(name) {
        Some(p) => (p.value().to_string(), p.current_level()),
        None => bail!("Unknown parameter '{}'", name),
    };
    let file = config.file_name_from_param(name)?;
    Ok((value, level, file))
}

/// Show a parameter's value, level and file
pub fn get(config: &mut ConfigManager, matches: &ArgMatches) -> Result<()> {
    let name = matches
        .get_one::<String>("name")
        .ok_or_else(|| anyhow::anyhow!("Parameter name is required"))?;

    load_chain(config)?;
    let (value, level, file) = describe(config, name)?;

    println!("{}", style(name).bold());
    println!("  Value: {}", value);
    println!("  Level: {}", level);
    match file {
        Some(file) => println!("  File:  {}", file.display()),
        None => println!("  File:  (none)"),
    }
    Ok(())
}

/// Set a parameter and save
pub fn set(config: &mut ConfigManager, matches: &ArgMatches) -> Result<()> {
    let name = matches
        .get_one::<String>("name")
        .ok_or_else(|| anyhow::anyhow!("Parameter name is required"))?;
    let value = matches
        .get_one::<String>("value")
        .ok_or_else(|| anyhow::anyhow!("Value is required"))?;

    load_chain(config)?;
    apply_setting(config, name, value, parse_level(matches)?)?;

    let (value, level, file) = describe(config, name)?;
    println!(
        "{} {} = {} ({})",
        style("✓").green().bold(),
        name,
        value,
        level
    );
    if let Some(file) = file {
        println!("  Saved to {}", file.display());
    }
    Ok(())
}

fn apply_setting(
    config: &mut ConfigManager,
    name: &str,
    value: &str,
    level: Option<Level>,
) -> Result<()> {
    config.set_parameter(name, value).map_err(AppError::from)?;
    if let Some(level) = level {
        config.set_parameter_level(name, level)?;
    }
    config.save_config().context("Failed to save configuration")?;
    Ok(())
}

/// Discover platforms, emulators or gamelists
pub fn list(config: &mut ConfigManager, matches: &ArgMatches) -> Result<()> {
    let kind: ListKind = matches
        .get_one::<String>("kind")
        .ok_or_else(|| anyhow::anyhow!("List kind is required"))?
        .parse()
        .map_err(|e: String| anyhow::anyhow!(e))?;

    load_chain(config)?;
    let current = config.get_str(kind.current_param()).to_string();
    let entries = config.discover_list(kind)?;

    if entries.is_empty() {
        println!("Nothing found.");
        return Ok(());
    }
    for entry in entries {
        if entry.key == current {
            println!("{} {:<20} {}", style("*").green().bold(), entry.key, entry.title);
        } else {
            println!("  {:<20} {}", entry.key, entry.title);
        }
    }
    Ok(())
}

fn select_chain(
    config: &mut ConfigManager,
    platform: &str,
    emulator: Option<&str>,
    gamelist: Option<&str>,
) -> Result<bool> {
    let mut resolved = config.select_platform(platform)?;
    if let Some(emulator) = emulator {
        resolved = config.select_emulator(emulator)?;
    }
    if let Some(gamelist) = gamelist {
        resolved = config.select_gamelist(gamelist)?;
    }
    config.save_config().context("Failed to save configuration")?;
    Ok(resolved)
}

/// Switch platform, emulator and gamelist, then save
pub fn select(config: &mut ConfigManager, matches: &ArgMatches) -> Result<()> {
    let platform = matches
        .get_one::<String>("platform")
        .ok_or_else(|| anyhow::anyhow!("Platform is required"))?;

    load_chain(config)?;
    let resolved = select_chain(
        config,
        platform,
        matches.get_one::<String>("emulator").map(String::as_str),
        matches.get_one::<String>("gamelist").map(String::as_str),
    )?;
    if !resolved {
        if let Some(err) = unresolved_report(config)? {
            return Err(err.into());
        }
        bail!("Selection of '{}' could not be completed", platform);
    }

    println!(
        "{} {} / {} / {} ({})",
        style("✓").green().bold(),
        config.current_platform(),
        config.current_emulator(),
        config.current_gamelist(),
        config.selector_state()
    );
    Ok(())
}

fn print_problems(title: &str, problems: &[ValidationError]) {
    println!("\n{} {}", style(problems.len()).bold().yellow(), title);
    for problem in problems {
        println!("  {}", problem);
    }
}

/// Report malformed values and missing launch directories
pub fn check(config: &mut ConfigManager, matches: &ArgMatches) -> Result<ExitCode> {
    load_chain(config)?;

    let mut clean = true;
    if let Err(problems) = config.validate() {
        print_problems("malformed value(s)", &problems);
        clean = false;
    }
    if matches.get_flag("paths") {
        if let Err(problems) = config.validate_paths() {
            print_problems("missing director(ies)", &problems);
            clean = false;
        }
    }

    if clean {
        println!("{} Configuration is valid", style("✓").green().bold());
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

fn rom_context(matches: &ArgMatches) -> Result<RomContext> {
    let rom = matches
        .get_one::<String>("rom")
        .ok_or_else(|| anyhow::anyhow!("ROM is required"))?;
    let mut context = RomContext::new(rom.as_str());
    if let Some(relative) = matches.get_one::<String>("relative") {
        context = context.with_relative_path(relative.as_str());
    }
    if let Some(raw) = matches.get_one::<String>("chain") {
        let chain = RunChain::parse(raw);
        if !chain.is_set() {
            bail!("Run chain must look like platform|emulator|gamelist|rom, got '{}'", raw);
        }
        context = context.with_run_chain(chain);
    }
    Ok(context)
}

fn print_plan(plan: &LaunchPlan) {
    println!("\n{} {}", style("Launch plan for").bold(), style(&plan.rom).bold().cyan());
    for command in &plan.commands {
        println!("  [{}] {}", command.phase, command.command_line());
        if let Some(dir) = &command.working_dir {
            println!("      in {}", dir.display());
        }
    }
}

/// Launch a game with the resolved configuration
///
/// The configuration is backed up before the per-game overlay and restored
/// afterwards, whatever happens to the processes.
pub async fn launch(config: &mut ConfigManager, matches: &ArgMatches) -> Result<()> {
    let rom = rom_context(matches)?;
    config
        .refresh_configuration()
        .context("Failed to load configuration")?;

    let plan = config.prepare_launch(&rom)?;
    print_plan(&plan);

    if matches.get_flag("dry-run") {
        config.finish_launch(&rom, Duration::ZERO)?;
        return Ok(());
    }

    match launcher::run_plan(&plan).await {
        Ok(played) => {
            config.finish_launch(&rom, played)?;
            println!(
                "{} Played {} for {}",
                style("✓").green().bold(),
                rom.key,
                launcher::format_played(played)
            );
            Ok(())
        }
        Err(e) => Err(abandon_launch(config, &rom, e)),
    }
}

/// Restores the pre-launch configuration, keeping the launch error
fn abandon_launch(config: &mut ConfigManager, rom: &RomContext, err: anyhow::Error) -> anyhow::Error {
    if let Err(restore) = config.finish_launch(rom, Duration::ZERO) {
        log::error!("Failed to restore configuration after launch error: {}", restore);
    }
    err
}

/// Archive and restore configuration snapshots
pub fn snapshot(config: &mut ConfigManager, matches: &ArgMatches) -> Result<()> {
    let archive = SnapshotArchive::for_paths(config.paths());

    match matches.subcommand() {
        Some(("save", _)) => {
            load_chain(config)?;
            let path = archive.save(&config.snapshot())?;
            println!("{} Snapshot saved to {}", style("✓").green().bold(), path.display());
        }
        Some(("list", _)) => {
            let snapshots = archive.list()?;
            if snapshots.is_empty() {
                println!("No snapshots in {}", archive.dir().display());
            }
            for info in snapshots {
                println!(
                    "  {}  {}  {}",
                    info.created_timestamp(),
                    info.size_human(),
                    info.filename
                );
            }
        }
        Some(("restore", sub_matches)) => {
            let file = sub_matches
                .get_one::<String>("file")
                .ok_or_else(|| anyhow::anyhow!("Snapshot file is required"))?;
            let mut path = PathBuf::from(file);
            if !path.is_absolute() && !path.exists() {
                path = archive.dir().join(file);
            }
            let snapshot = archive.load(&path)?;
            config.restore_snapshot(snapshot);
            let written = config.flush_level_files()?;
            println!(
                "{} Restored {} level file(s) from {}",
                style("✓").green().bold(),
                written,
                path.display()
            );
        }
        _ => bail!("Unknown snapshot action"),
    }
    Ok(())
}

/// Reload the configuration whenever a level file changes
pub async fn watch(mut config: ConfigManager, matches: &ArgMatches) -> Result<()> {
    let interval = Duration::from_secs(*matches.get_one::<u64>("interval").unwrap_or(&2));
    config
        .refresh_configuration()
        .context("Failed to load configuration")?;

    let queue = UiQueue::new();
    let watcher = LevelFileWatcher::new(&config, queue.sender()).with_check_interval(interval);
    let count = watcher.watched_files().count();
    let handle = watcher.start_watching();
    println!(
        "Watching {} level file(s), press Ctrl-C to stop",
        style(count).bold().cyan()
    );

    let mut ticker = tokio::time::interval(Duration::from_millis(200));
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            _ = ticker.tick() => {
                if queue.drain_one(&mut config) {
                    println!(
                        "{} Reloaded: {} / {} / {}",
                        style("↻").cyan(),
                        config.current_platform(),
                        config.current_emulator(),
                        config.current_gamelist()
                    );
                }
            }
        }
    }

    handle.stop();
    println!("Stopped watching.");
    Ok(())
}
