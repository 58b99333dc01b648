//! Command-line argument parsing.
//!
//! Arguments are split into global flags (valid everywhere), valued options
//! and positionals. The first positional names the command; `timeline` is the
//! default when none is given. Valued options accept both `--lat 35.7` and
//! `--lat=35.7`, and their value may start with `-` so negative coordinates work.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::path::PathBuf;

use crate::exposure::format::{parse_aperture, parse_shutter};
use crate::exposure::nd::{NdFilter, find_filter};
use crate::exposure::{ExposureParam, ExposureTriple};

/// Flags shared by every command.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GlobalOptions {
    pub debug_enabled: bool,
    pub json: bool,
    pub config_dir: Option<String>,
}

/// Where and when to compute light phases. Anything unset falls back to the
/// configuration, then to the current date.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocationOptions {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub date: Option<NaiveDate>,
    /// Raw `--at` value; parsed once the display timezone is known
    pub at: Option<String>,
    pub timezone: Option<String>,
    pub sun_json: Option<PathBuf>,
}

/// What the equivalent exposure should aim for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EvTarget {
    /// Keep the EV of the base exposure
    Preserve,
    Explicit(f64),
    Scene(i32),
}

/// Represents the parsed command-line arguments and their intended actions.
#[derive(Debug, Clone, PartialEq)]
pub enum CliAction {
    Timeline {
        global: GlobalOptions,
        location: LocationOptions,
    },
    Status {
        global: GlobalOptions,
        location: LocationOptions,
    },
    Ev {
        global: GlobalOptions,
        triple: ExposureTriple,
        nd: Option<&'static NdFilter>,
    },
    Equiv {
        global: GlobalOptions,
        base: ExposureTriple,
        changed: ExposureParam,
        value: f64,
        locked: ExposureParam,
        target: EvTarget,
        nd: Option<&'static NdFilter>,
    },
    Reciprocity {
        global: GlobalOptions,
        shutter_seconds: f64,
        film: Option<String>,
        nd: Option<&'static NdFilter>,
    },
    Films {
        global: GlobalOptions,
        query: Option<String>,
    },
    /// `help [COMMAND]`
    Help {
        command: Option<String>,
    },
    ShowHelp,
    ShowVersion,
    /// Show help due to bad arguments and exit with failure
    ShowHelpDueToError,
}

/// Result of parsing command-line arguments.
pub struct ParsedArgs {
    pub action: CliAction,
}

/// Options that consume the following argument.
const VALUED_OPTIONS: &[&str] = &[
    "--config",
    "-c",
    "--lat",
    "--lon",
    "--date",
    "--at",
    "--tz",
    "--sun-json",
    "--lock",
    "--target-ev",
    "--scene",
    "--film",
    "--nd",
];

#[derive(Default)]
struct RawArgs {
    global: GlobalOptions,
    help: bool,
    version: bool,
    options: Vec<(String, String)>,
    positionals: Vec<String>,
}

impl RawArgs {
    fn option(&self, names: &[&str]) -> Option<&str> {
        self.options
            .iter()
            .rev()
            .find(|(name, _)| names.contains(&name.as_str()))
            .map(|(_, value)| value.as_str())
    }

    fn parsed_option<T: std::str::FromStr>(&self, name: &str) -> Result<Option<T>> {
        self.option(&[name])
            .map(|value| {
                value
                    .parse::<T>()
                    .map_err(|_| anyhow::anyhow!("Invalid value for {name}: '{value}'"))
            })
            .transpose()
    }
}

impl ParsedArgs {
    /// Parse command-line arguments, including the program name in position 0.
    pub fn parse<I, S>(args: I) -> ParsedArgs
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let args_vec: Vec<String> = args
            .into_iter()
            .skip(1)
            .map(|s| s.as_ref().to_string())
            .collect();

        let action = match parse_action(&args_vec) {
            Ok(action) => action,
            Err(e) => {
                log_warning_standalone!("{e:#}");
                CliAction::ShowHelpDueToError
            }
        };

        ParsedArgs { action }
    }
}

fn split_args(args: &[String]) -> Result<RawArgs> {
    let mut raw = RawArgs::default();
    let mut i = 0;

    while i < args.len() {
        let arg = &args[i];

        if let Some((name, value)) = arg.split_once('=')
            && VALUED_OPTIONS.contains(&name)
        {
            raw.options.push((name.to_string(), value.to_string()));
            i += 1;
            continue;
        }

        match arg.as_str() {
            "--help" | "-h" => raw.help = true,
            "--version" | "-V" | "-v" => raw.version = true,
            "--debug" | "-d" => raw.global.debug_enabled = true,
            "--json" | "-j" => raw.global.json = true,
            name if VALUED_OPTIONS.contains(&name) => {
                let value = args
                    .get(i + 1)
                    .with_context(|| format!("Missing value for {name}"))?;
                raw.options.push((name.to_string(), value.clone()));
                i += 1;
            }
            // A bare number like -6 is a positional, not a flag
            flag if flag.starts_with('-') && flag.parse::<f64>().is_err() => {
                anyhow::bail!("Unknown option: {flag}");
            }
            _ => raw.positionals.push(arg.clone()),
        }
        i += 1;
    }

    raw.global.config_dir = raw.option(&["--config", "-c"]).map(str::to_string);
    Ok(raw)
}

fn parse_action(args: &[String]) -> Result<CliAction> {
    let raw = split_args(args)?;

    if raw.version {
        return Ok(CliAction::ShowVersion);
    }

    let command = raw.positionals.first().map(String::as_str);
    let rest = raw.positionals.get(1..).unwrap_or_default();

    if raw.help {
        return Ok(match command {
            Some("help") | None => CliAction::ShowHelp,
            Some(cmd) => CliAction::Help {
                command: Some(cmd.to_string()),
            },
        });
    }

    match command {
        None | Some("timeline") | Some("t") => {
            expect_no_extra(command.unwrap_or("timeline"), rest)?;
            Ok(CliAction::Timeline {
                location: location_options(&raw)?,
                global: raw.global,
            })
        }
        Some("status") | Some("s") => {
            expect_no_extra("status", rest)?;
            Ok(CliAction::Status {
                location: location_options(&raw)?,
                global: raw.global,
            })
        }
        Some("ev") | Some("e") => {
            let triple = parse_triple("ev", rest)?;
            expect_no_extra("ev", rest.get(3..).unwrap_or_default())?;
            Ok(CliAction::Ev {
                triple,
                nd: nd_option(&raw)?,
                global: raw.global,
            })
        }
        Some("equiv") | Some("q") => parse_equiv(&raw, rest),
        Some("reciprocity") | Some("r") => {
            let shutter = rest
                .first()
                .context("Missing shutter time. Usage: gloaming reciprocity <shutter> [--film <key>]")?;
            expect_no_extra("reciprocity", rest.get(1..).unwrap_or_default())?;
            Ok(CliAction::Reciprocity {
                shutter_seconds: parse_shutter(shutter)?,
                film: raw.option(&["--film"]).map(str::to_string),
                nd: nd_option(&raw)?,
                global: raw.global,
            })
        }
        Some("films") | Some("f") => {
            expect_no_extra("films", rest.get(1..).unwrap_or_default())?;
            Ok(CliAction::Films {
                query: rest.first().cloned(),
                global: raw.global,
            })
        }
        Some("help") | Some("h") => Ok(CliAction::Help {
            command: rest.first().cloned(),
        }),
        Some(unknown) => anyhow::bail!("Unknown command: {unknown}"),
    }
}

fn expect_no_extra(command: &str, extra: &[String]) -> Result<()> {
    if let Some(arg) = extra.first() {
        anyhow::bail!("Unexpected argument '{arg}' for {command}");
    }
    Ok(())
}

fn location_options(raw: &RawArgs) -> Result<LocationOptions> {
    let date = raw
        .option(&["--date"])
        .map(|value| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .with_context(|| format!("Invalid date '{value}'. Use YYYY-MM-DD"))
        })
        .transpose()?;

    Ok(LocationOptions {
        latitude: raw.parsed_option("--lat")?,
        longitude: raw.parsed_option("--lon")?,
        date,
        at: raw.option(&["--at"]).map(str::to_string),
        timezone: raw.option(&["--tz"]).map(str::to_string),
        sun_json: raw.option(&["--sun-json"]).map(PathBuf::from),
    })
}

fn nd_option(raw: &RawArgs) -> Result<Option<&'static NdFilter>> {
    raw.option(&["--nd"])
        .map(|query| {
            find_filter(query).with_context(|| {
                format!("Unknown ND filter '{query}'. Use a name like ND1000 or a stop count 1-12")
            })
        })
        .transpose()
}

fn parse_triple(command: &str, args: &[String]) -> Result<ExposureTriple> {
    let [aperture, shutter, iso, ..] = args else {
        anyhow::bail!("{command} needs an exposure: <aperture> <shutter> <iso> (e.g. f/8 1/4 100)");
    };
    let iso: u32 = iso
        .trim_start_matches("ISO")
        .trim_start_matches("iso")
        .parse()
        .with_context(|| format!("Invalid ISO '{iso}'"))?;
    ExposureTriple::new(parse_aperture(aperture)?, parse_shutter(shutter)?, iso)
}

/// Parse a parameter value the way it is usually written for that parameter.
pub fn parse_param_value(param: ExposureParam, text: &str) -> Result<f64> {
    match param {
        ExposureParam::Aperture => parse_aperture(text),
        ExposureParam::Shutter => parse_shutter(text),
        ExposureParam::Iso => {
            let value: f64 = text
                .parse()
                .with_context(|| format!("Invalid ISO '{text}'"))?;
            if !(value.is_finite() && value > 0.0) {
                anyhow::bail!("ISO must be positive (got {text})");
            }
            Ok(value)
        }
    }
}

/// `equiv <aperture> <shutter> <iso> <param>=<value> [--lock <param>] [--target-ev <ev> | --scene <ev>]`
fn parse_equiv(raw: &RawArgs, rest: &[String]) -> Result<CliAction> {
    let base = parse_triple("equiv", rest)?;

    let change = rest.get(3).context(
        "Missing change. Usage: gloaming equiv <aperture> <shutter> <iso> <param>=<value>",
    )?;
    expect_no_extra("equiv", rest.get(4..).unwrap_or_default())?;

    let (name, value) = change
        .split_once('=')
        .with_context(|| format!("Expected <param>=<value>, got '{change}'"))?;
    let changed: ExposureParam = name.parse()?;
    let value = parse_param_value(changed, value)?;

    // ISO is the usual constant; when ISO itself changes, hold the aperture
    let locked = match raw.option(&["--lock"]) {
        Some(name) => name.parse()?,
        None if changed == ExposureParam::Iso => ExposureParam::Aperture,
        None => ExposureParam::Iso,
    };
    if locked == changed {
        anyhow::bail!("Cannot lock {locked} while changing it");
    }

    let target = match (
        raw.parsed_option::<f64>("--target-ev")?,
        raw.parsed_option::<i32>("--scene")?,
    ) {
        (Some(_), Some(_)) => anyhow::bail!("Use either --target-ev or --scene, not both"),
        (Some(ev), None) => EvTarget::Explicit(ev),
        (None, Some(scene)) => EvTarget::Scene(scene),
        (None, None) => EvTarget::Preserve,
    };

    Ok(CliAction::Equiv {
        global: raw.global.clone(),
        base,
        changed,
        value,
        locked,
        target,
        nd: nd_option(raw)?,
    })
}

/// Display usage and options.
pub fn display_help() {
    log_version!();
    log_block_start!("Usage: gloaming [OPTIONS] [COMMAND]");
    log_block_start!("Commands:");
    log_indented!("timeline, t             Light phases for a day (default)");
    log_indented!("status, s               Current light phase and time to the next one");
    log_indented!("ev, e <f> <t> <iso>     Exposure value of an exposure");
    log_indented!("equiv, q <f> <t> <iso> <param>=<value>");
    log_indented!("                        Equivalent exposure after changing one parameter");
    log_indented!("reciprocity, r <t>      Reciprocity-corrected exposure time for a film");
    log_indented!("films, f [QUERY]        List film stocks");
    log_indented!("help, h [COMMAND]       Detailed help for a command");
    log_block_start!("Options:");
    log_indented!("-c, --config <dir>      Use a custom configuration directory");
    log_indented!("-d, --debug             Print calculation details");
    log_indented!("-j, --json              Machine-readable output");
    log_indented!("-h, --help              Print help information");
    log_indented!("-V, --version           Print version information");
    log_block_start!("Location and time:");
    log_indented!("--lat <deg> --lon <deg> Location (overrides the configuration)");
    log_indented!("--date <YYYY-MM-DD>     Day to compute (default: today)");
    log_indented!("--at <time>             Instant for status, RFC 3339 or 'YYYY-MM-DD HH:MM'");
    log_indented!("--tz <zone>             Display timezone, e.g. Europe/London");
    log_indented!("--sun-json <file>       Use sunrise/sunset/twilight from a provider response");
    log_block_start!("Exposure:");
    log_indented!("--lock <param>          Parameter held constant (default: iso)");
    log_indented!("--target-ev <ev>        Solve for an explicit EV");
    log_indented!("--scene <ev>            Solve for a reference scene's EV");
    log_indented!("--film <key>            Film stock for reciprocity");
    log_indented!("--nd <filter>           ND filter, e.g. ND1000 or 10");
    log_end!();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> CliAction {
        let mut full = vec!["gloaming"];
        full.extend_from_slice(args);
        ParsedArgs::parse(full).action
    }

    #[test]
    fn test_parse_no_args() {
        assert_eq!(
            parse(&[]),
            CliAction::Timeline {
                global: GlobalOptions::default(),
                location: LocationOptions::default(),
            }
        );
    }

    #[test]
    fn test_parse_global_flags() {
        let action = parse(&["--debug", "-j", "--config", "/tmp/gloaming"]);
        assert_eq!(
            action,
            CliAction::Timeline {
                global: GlobalOptions {
                    debug_enabled: true,
                    json: true,
                    config_dir: Some("/tmp/gloaming".to_string()),
                },
                location: LocationOptions::default(),
            }
        );
    }

    #[test]
    fn test_parse_help_and_version() {
        assert_eq!(parse(&["--help"]), CliAction::ShowHelp);
        assert_eq!(parse(&["-h"]), CliAction::ShowHelp);
        assert_eq!(parse(&["-V"]), CliAction::ShowVersion);
        assert_eq!(parse(&["status", "--version"]), CliAction::ShowVersion);
        assert_eq!(
            parse(&["equiv", "--help"]),
            CliAction::Help {
                command: Some("equiv".to_string())
            }
        );
        assert_eq!(
            parse(&["help", "films"]),
            CliAction::Help {
                command: Some("films".to_string())
            }
        );
    }

    #[test]
    fn test_parse_location_with_negative_values() {
        let action = parse(&[
            "status",
            "--lat",
            "-33.8688",
            "--lon=151.2093",
            "--date",
            "2024-12-21",
            "--at",
            "2024-12-21 19:30",
            "--tz",
            "Australia/Sydney",
        ]);
        let CliAction::Status { location, .. } = action else {
            panic!("expected status, got {action:?}");
        };
        assert_eq!(location.latitude, Some(-33.8688));
        assert_eq!(location.longitude, Some(151.2093));
        assert_eq!(location.date, NaiveDate::from_ymd_opt(2024, 12, 21));
        assert_eq!(location.at.as_deref(), Some("2024-12-21 19:30"));
        assert_eq!(location.timezone.as_deref(), Some("Australia/Sydney"));
    }

    #[test]
    fn test_parse_invalid_values() {
        assert_eq!(parse(&["--lat", "north"]), CliAction::ShowHelpDueToError);
        assert_eq!(parse(&["--date", "21/06/2024"]), CliAction::ShowHelpDueToError);
        assert_eq!(parse(&["--lat"]), CliAction::ShowHelpDueToError);
        assert_eq!(parse(&["--frobnicate"]), CliAction::ShowHelpDueToError);
        assert_eq!(parse(&["sunbathe"]), CliAction::ShowHelpDueToError);
        assert_eq!(parse(&["status", "extra"]), CliAction::ShowHelpDueToError);
    }

    #[test]
    fn test_parse_ev() {
        let action = parse(&["ev", "f/8", "1/4", "100", "--nd", "ND1000"]);
        let CliAction::Ev { triple, nd, .. } = action else {
            panic!("expected ev, got {action:?}");
        };
        assert_eq!(triple, ExposureTriple::new(8.0, 0.25, 100).unwrap());
        assert_eq!(nd.map(|f| f.stops), Some(10));

        assert_eq!(parse(&["ev", "f/8", "1/4"]), CliAction::ShowHelpDueToError);
        assert_eq!(parse(&["ev", "f/8", "1/4", "0"]), CliAction::ShowHelpDueToError);
        assert_eq!(
            parse(&["ev", "f/8", "1/4", "100", "--nd", "ND3"]),
            CliAction::ShowHelpDueToError
        );
    }

    #[test]
    fn test_parse_equiv_defaults_lock() {
        let action = parse(&["equiv", "8", "0.25", "100", "aperture=5.6"]);
        assert_eq!(
            action,
            CliAction::Equiv {
                global: GlobalOptions::default(),
                base: ExposureTriple::new(8.0, 0.25, 100).unwrap(),
                changed: ExposureParam::Aperture,
                value: 5.6,
                locked: ExposureParam::Iso,
                target: EvTarget::Preserve,
                nd: None,
            }
        );

        let CliAction::Equiv { locked, value, .. } =
            parse(&["equiv", "8", "1/4", "400", "iso=100"])
        else {
            panic!("expected equiv");
        };
        assert_eq!(locked, ExposureParam::Aperture);
        assert_eq!(value, 100.0);
    }

    #[test]
    fn test_parse_equiv_targets() {
        let CliAction::Equiv { target, locked, value, .. } = parse(&[
            "equiv", "f/16", "1/125", "100", "shutter=1/250", "--lock", "iso", "--scene", "15",
        ]) else {
            panic!("expected equiv");
        };
        assert_eq!(target, EvTarget::Scene(15));
        assert_eq!(locked, ExposureParam::Iso);
        assert_eq!(value, 1.0 / 250.0);

        let CliAction::Equiv { target, .. } =
            parse(&["equiv", "8", "1/4", "100", "aperture=4", "--target-ev", "-2.5"])
        else {
            panic!("expected equiv");
        };
        assert_eq!(target, EvTarget::Explicit(-2.5));
    }

    #[test]
    fn test_parse_equiv_errors() {
        // Changing and locking the same parameter
        assert_eq!(
            parse(&["equiv", "8", "1/4", "100", "iso=200", "--lock", "iso"]),
            CliAction::ShowHelpDueToError
        );
        // Both targets
        assert_eq!(
            parse(&[
                "equiv", "8", "1/4", "100", "iso=200", "--target-ev", "8", "--scene", "8"
            ]),
            CliAction::ShowHelpDueToError
        );
        // Missing change
        assert_eq!(parse(&["equiv", "8", "1/4", "100"]), CliAction::ShowHelpDueToError);
        assert_eq!(
            parse(&["equiv", "8", "1/4", "100", "focus=3"]),
            CliAction::ShowHelpDueToError
        );
    }

    #[test]
    fn test_parse_reciprocity_and_films() {
        let action = parse(&["reciprocity", "2m", "--film", "ilford_hp5"]);
        assert_eq!(
            action,
            CliAction::Reciprocity {
                global: GlobalOptions::default(),
                shutter_seconds: 120.0,
                film: Some("ilford_hp5".to_string()),
                nd: None,
            }
        );
        assert_eq!(parse(&["reciprocity"]), CliAction::ShowHelpDueToError);

        assert_eq!(
            parse(&["films", "portra"]),
            CliAction::Films {
                global: GlobalOptions::default(),
                query: Some("portra".to_string()),
            }
        );
    }
}
