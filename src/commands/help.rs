//! Help command: general or per-command help.

use anyhow::Result;

/// Show brief usage for a command (used for error messages)
pub fn show_command_usage(command: &str) {
    match command {
        "status" | "s" => log_block_start!("Usage: gloaming status [--at <time>] [--lat <deg> --lon <deg>]"),
        "ev" | "e" => log_block_start!("Usage: gloaming ev <aperture> <shutter> <iso> [--nd <filter>]"),
        "equiv" | "q" => log_block_start!(
            "Usage: gloaming equiv <aperture> <shutter> <iso> <param>=<value> [--lock <param>]"
        ),
        "reciprocity" | "r" => {
            log_block_start!("Usage: gloaming reciprocity <shutter> [--film <key>] [--nd <filter>]")
        }
        "films" | "f" => log_block_start!("Usage: gloaming films [QUERY]"),
        _ => log_block_start!("Usage: gloaming [OPTIONS] [COMMAND]"),
    }
}

/// Run the help command (dispatcher)
pub fn run_help_command(command: Option<&str>) -> Result<()> {
    match command {
        None => crate::args::display_help(),
        Some("timeline") | Some("t") => display_timeline_help(),
        Some("status") | Some("s") => display_status_help(),
        Some("ev") | Some("e") => display_ev_help(),
        Some("equiv") | Some("q") => display_equiv_help(),
        Some("reciprocity") | Some("r") => display_reciprocity_help(),
        Some("films") | Some("f") => display_films_help(),
        Some("help") | Some("h") => display_help_help(),
        Some(unknown) => {
            log_warning_standalone!("Unknown command: {}", unknown);
            crate::args::display_help();
        }
    }
    Ok(())
}

fn display_timeline_help() {
    log_version!();
    log_block_start!("timeline - Light phases for one day");
    log_block_start!("Usage: gloaming [timeline] [OPTIONS]");
    log_block_start!("Lists blue hour, golden hour, daylight and night with start and end times.");
    log_indented!("Blue hour is the sun between -6° and -4°, golden hour between -4° and +6°.");
    log_indented!("Boundaries marked ~ were estimated because the sun did not cross that");
    log_indented!("elevation inside the search window (high latitudes, polar seasons).");
    log_block_start!("Options:");
    log_indented!("--lat <deg> --lon <deg>  Location (default: configuration)");
    log_indented!("--date <YYYY-MM-DD>      Day to compute (default: today)");
    log_indented!("--tz <zone>              Display timezone (default: configuration, then UTC)");
    log_indented!("--sun-json <file>        Sunrise/sunset/twilight from a provider response");
    log_block_start!("Examples:");
    log_indented!("gloaming --lat 35.6895 --lon 139.6917 --tz Asia/Tokyo");
    log_indented!("gloaming timeline --date 2024-12-21 --json");
    log_end!();
}

fn display_status_help() {
    log_version!();
    log_block_start!("status - Current light phase");
    show_command_usage("status");
    log_block_start!("Shows the phase containing the instant, its progress and the next phase.");
    log_block_start!("Options:");
    log_indented!("--at <time>  RFC 3339, or 'YYYY-MM-DD HH:MM' in the display timezone");
    log_indented!("             (default: now)");
    log_block_start!("Examples:");
    log_indented!("gloaming status");
    log_indented!("gloaming status --at '2024-06-21 20:45' --tz Europe/London");
    log_end!();
}

fn display_ev_help() {
    log_version!();
    log_block_start!("ev - Exposure value of an exposure");
    show_command_usage("ev");
    log_block_start!("EV = log2(N²/t) + log2(ISO/100)");
    log_block_start!("Arguments:");
    log_indented!("aperture  f/8, F5.6 or 11");
    log_indented!("shutter   1/250, 0.5, 30s, 2m");
    log_indented!("iso       100, 400, ...");
    log_block_start!("Examples:");
    log_indented!("gloaming ev f/8 1/4 100");
    log_indented!("gloaming ev f/11 1/60 100 --nd ND1000");
    log_end!();
}

fn display_equiv_help() {
    log_version!();
    log_block_start!("equiv - Equivalent exposure after changing one parameter");
    show_command_usage("equiv");
    log_block_start!("Changes one parameter, holds another and solves the third, snapped to a");
    log_indented!("standard value (or your [gear] lists). The result keeps the base EV unless");
    log_indented!("a target is given.");
    log_block_start!("Options:");
    log_indented!("--lock <param>     aperture, shutter or iso (default: iso; aperture when");
    log_indented!("                   changing iso)");
    log_indented!("--target-ev <ev>   Solve for this EV instead of the base EV");
    log_indented!("--scene <ev>       Solve for a reference scene, EV -6 to 16");
    log_indented!("--nd <filter>      Also show the shutter behind an ND filter");
    log_block_start!("Examples:");
    log_indented!("gloaming equiv f/8 1/4 100 aperture=5.6");
    log_indented!("gloaming equiv f/5.6 1/125 400 iso=100 --lock shutter");
    log_indented!("gloaming equiv f/16 1/125 100 aperture=8 --scene 12");
    log_end!();
}

fn display_reciprocity_help() {
    log_version!();
    log_block_start!("reciprocity - Corrected exposure time for long exposures on film");
    show_command_usage("reciprocity");
    log_block_start!("Past a film's toe time t1 the metered time is stretched by");
    log_indented!("(t / t1)^p, capped at the film's maximum multiplier.");
    log_block_start!("Options:");
    log_indented!("--film <key>   Film stock (default: 'film' in the configuration)");
    log_indented!("--nd <filter>  Apply an ND filter to the metered time first");
    log_block_start!("Examples:");
    log_indented!("gloaming reciprocity 30s --film ilford_hp5");
    log_indented!("gloaming reciprocity 1/8 --film kodak_portra400 --nd ND1000");
    log_end!();
}

fn display_films_help() {
    log_version!();
    log_block_start!("films - List film stocks");
    show_command_usage("films");
    log_block_start!("Lists built-in stocks and [[films]] from the configuration.");
    log_indented!("QUERY filters by key or name, case-insensitive.");
    log_block_start!("Examples:");
    log_indented!("gloaming films");
    log_indented!("gloaming films velvia");
    log_end!();
}

fn display_help_help() {
    log_version!();
    log_block_start!("help - Display help information");
    log_block_start!("Usage: gloaming help [COMMAND]");
    log_block_start!("Arguments:");
    log_indented!("COMMAND  Optional command to get help for");
    log_indented!("         If omitted, shows general help");
    log_block_start!("Examples:");
    log_indented!("gloaming help equiv");
    log_indented!("gloaming help reciprocity");
    log_end!();
}
