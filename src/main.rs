//! Command-line entry point.
//!
//! Parses arguments, loads configuration and dispatches to a command handler.
//! With `--json` the structured log output is switched off so stdout carries
//! only the JSON document.

#[macro_use]
extern crate gloaming;

use anyhow::Result;

use gloaming::args::{CliAction, GlobalOptions, ParsedArgs};
use gloaming::commands;
use gloaming::common::constants::EXIT_FAILURE;
use gloaming::common::logger::Log;
use gloaming::config::{self, Config};

fn main() {
    let parsed_args = ParsedArgs::parse(std::env::args());

    let result = match parsed_args.action {
        CliAction::ShowVersion => {
            log_version!();
            log_end!();
            Ok(())
        }
        CliAction::ShowHelp => {
            gloaming::args::display_help();
            Ok(())
        }
        CliAction::ShowHelpDueToError => {
            gloaming::args::display_help();
            std::process::exit(EXIT_FAILURE);
        }
        CliAction::Help { command } => commands::help::run_help_command(command.as_deref()),
        CliAction::Timeline { global, location } => run(&global, |config| {
            commands::pin_instant(config, &location)?;
            commands::timeline::handle_timeline_command(&global, &location, config)
        }),
        CliAction::Status { global, location } => run(&global, |config| {
            commands::pin_instant(config, &location)?;
            commands::status::handle_status_command(&global, &location, config)
        }),
        CliAction::Ev { global, triple, nd } => run(&global, |_| {
            commands::exposure::handle_ev_command(&global, &triple, nd)
        }),
        CliAction::Equiv {
            global,
            base,
            changed,
            value,
            locked,
            target,
            nd,
        } => run(&global, |config| {
            commands::exposure::handle_equiv_command(
                &global, config, &base, changed, value, locked, target, nd,
            )
        }),
        CliAction::Reciprocity {
            global,
            shutter_seconds,
            film,
            nd,
        } => run(&global, |config| {
            commands::reciprocity::handle_reciprocity_command(
                &global,
                config,
                shutter_seconds,
                film.as_deref(),
                nd,
            )
        }),
        CliAction::Films { global, query } => run(&global, |config| {
            commands::films::handle_films_command(&global, config, query.as_deref())
        }),
    };

    if let Err(e) = result {
        if Log::is_enabled() {
            log_error_exit!("{e:#}");
        } else {
            eprintln!("Error: {e:#}");
        }
        std::process::exit(EXIT_FAILURE);
    }
}

/// Shared setup for every command that touches configuration.
fn run(global: &GlobalOptions, command: impl FnOnce(&Config) -> Result<()>) -> Result<()> {
    if global.json {
        Log::set_enabled(false);
    }

    config::set_config_dir(global.config_dir.clone())?;

    log_version!();
    if global.debug_enabled {
        log_pipe!();
        log_debug!("Debug mode enabled - showing calculation details");
    }

    let config = config::load()?;
    if global.debug_enabled {
        config.log_config();
    }

    command(&config)?;

    log_end!();
    Ok(())
}
