// FILE: crates/cli/src/main.rs

use anyhow::Result;
use clap::{Arg, ArgAction, Command};
use marquee_core::AppError;
use std::process::ExitCode;

mod commands;
mod launcher;

fn build_cli() -> Command {
    Command::new("marquee")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Inspect and drive the configuration of a Marquee arcade front-end")
        .arg(
            Arg::new("root")
                .short('r')
                .long("root")
                .value_name("DIR")
                .env("MARQUEE_ROOT")
                .help("Front-end root directory (defaults to the current directory when it has config/)")
                .global(true),
        )
        .arg(
            Arg::new("catalog")
                .long("catalog")
                .value_name("FILE")
                .help("Parameter catalog to use instead of the built-in one")
                .global(true),
        )
        .subcommand(Command::new("init").about("Load the full level chain, seeding missing files, and save"))
        .subcommand(
            Command::new("dump")
                .about("Print every parameter with the level supplying it")
                .arg(Arg::new("level").short('l').long("level").value_name("LEVEL").help("Only parameters sourced from this level"))
                .arg(Arg::new("json").long("json").help("Print JSON with source files").action(ArgAction::SetTrue)),
        )
        .subcommand(
            Command::new("get")
                .about("Show a parameter's value, level and file")
                .arg(Arg::new("name").required(true).value_name("NAME").help("Parameter name")),
        )
        .subcommand(
            Command::new("set")
                .about("Set a parameter and save")
                .arg(Arg::new("name").required(true).value_name("NAME").help("Parameter name"))
                .arg(Arg::new("value").required(true).value_name("VALUE").allow_hyphen_values(true).help("New value"))
                .arg(Arg::new("level").short('l').long("level").value_name("LEVEL").help("Level whose file should hold the value")),
        )
        .subcommand(
            Command::new("list")
                .about("Discover platforms, emulators or gamelists")
                .arg(Arg::new("kind").required(true).value_name("KIND").value_parser(["platforms", "emulators", "gamelists"]).help("What to list")),
        )
        .subcommand(
            Command::new("select")
                .about("Switch platform, emulator and gamelist, then save")
                .arg(Arg::new("platform").required(true).value_name("PLATFORM"))
                .arg(Arg::new("emulator").value_name("EMULATOR"))
                .arg(Arg::new("gamelist").value_name("GAMELIST")),
        )
        .subcommand(
            Command::new("check")
                .about("Report malformed values and missing launch directories")
                .arg(Arg::new("paths").long("paths").help("Also check launch directories").action(ArgAction::SetTrue)),
        )
        .subcommand(
            Command::new("launch")
                .about("Launch a game with the resolved configuration")
                .arg(Arg::new("rom").required(true).value_name("ROM").help("ROM key"))
                .arg(Arg::new("relative").long("relative").value_name("DIR").help("Subdirectory of rom_path holding the ROM"))
                .arg(Arg::new("chain").short('c').long("chain").value_name("P|E|G|R").help("Run chain of a game from the aggregate list"))
                .arg(Arg::new("dry-run").short('n').long("dry-run").help("Print the commands without running them").action(ArgAction::SetTrue)),
        )
        .subcommand(
            Command::new("snapshot")
                .about("Archive and restore configuration snapshots")
                .subcommand_required(true)
                .subcommand(Command::new("save").about("Archive the current configuration"))
                .subcommand(Command::new("list").about("List archived snapshots, newest first"))
                .subcommand(
                    Command::new("restore")
                        .about("Write an archived snapshot back to its level files")
                        .arg(Arg::new("file").required(true).value_name("FILE")),
                ),
        )
        .subcommand(
            Command::new("watch")
                .about("Reload the configuration whenever a level file changes")
                .arg(Arg::new("interval").long("interval").value_name("SECS").value_parser(clap::value_parser!(u64)).default_value("2").help("Polling interval in seconds")),
        )
}

async fn run() -> Result<ExitCode> {
    let matches = build_cli().get_matches();
    let mut config = commands::open_engine(&matches)?;

    match matches.subcommand() {
        Some(("init", _)) => commands::init(&mut config),
        Some(("dump", sub_matches)) => commands::dump(&mut config, sub_matches),
        Some(("get", sub_matches)) => commands::get(&mut config, sub_matches),
        Some(("set", sub_matches)) => commands::set(&mut config, sub_matches),
        Some(("list", sub_matches)) => commands::list(&mut config, sub_matches),
        Some(("select", sub_matches)) => commands::select(&mut config, sub_matches),
        Some(("check", sub_matches)) => return commands::check(&mut config, sub_matches),
        Some(("launch", sub_matches)) => commands::launch(&mut config, sub_matches).await,
        Some(("snapshot", sub_matches)) => commands::snapshot(&mut config, sub_matches),
        Some(("watch", sub_matches)) => commands::watch(config, sub_matches).await,
        _ => {
            build_cli().print_help()?;
            Ok(())
        }
    }?;
    Ok(ExitCode::SUCCESS)
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run().await {
        Ok(code) => code,
        Err(e) => {
            log::error!("{:?}", e);
            match e.downcast_ref::<AppError>() {
                Some(app) => eprintln!("marquee: {}\n  {:#}", app.user_message(), e),
                None => eprintln!("marquee: {:#}", e),
            }
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_is_consistent() {
        build_cli().debug_assert();
    }

    #[test]
    fn test_launch_arguments() {
        let matches = build_cli()
            .try_get_matches_from([
                "marquee",
                "--root",
                "/games",
                "launch",
                "pacman",
                "--dry-run",
                "--chain",
                "arcade|mame|mame-0|pacman",
            ])
            .expect("Should parse");
        assert_eq!(
            matches.get_one::<String>("root").map(String::as_str),
            Some("/games")
        );
        let (name, launch) = matches.subcommand().expect("Should have subcommand");
        assert_eq!(name, "launch");
        assert!(launch.get_flag("dry-run"));
    }

    #[test]
    fn test_list_kind_is_checked() {
        assert!(build_cli()
            .try_get_matches_from(["marquee", "list", "layouts"])
            .is_err());
    }

    #[test]
    fn test_snapshot_needs_an_action() {
        assert!(build_cli()
            .try_get_matches_from(["marquee", "snapshot"])
            .is_err());
    }
}
