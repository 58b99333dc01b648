//! Films command: list the film table.

use anyhow::Result;
use serde::Serialize;

use super::print_json;
use crate::args::GlobalOptions;
use crate::config::Config;
use crate::exposure::format::format_shutter;
use crate::reciprocity::FilmStock;

#[derive(Serialize)]
struct FilmsReport<'a> {
    query: Option<&'a str>,
    films: Vec<&'a FilmStock>,
}

pub fn handle_films_command(
    global: &GlobalOptions,
    config: &Config,
    query: Option<&str>,
) -> Result<()> {
    let table = config.film_table()?;
    let films: Vec<&FilmStock> = match query {
        Some(q) => table.search(q),
        None => table.iter().collect(),
    };

    if global.json {
        return print_json(&FilmsReport { query, films });
    }

    match query {
        Some(q) => log_block_start!("{} film(s) matching '{}'", films.len(), q),
        None => log_block_start!("{} film stocks", films.len()),
    }

    if films.is_empty() {
        log_indented!("Try a shorter query, e.g. 'portra' or 'ilford'");
        return Ok(());
    }

    for film in films {
        log_indented!(
            "{:<20} {:<30} ISO {:<5} {:<14} from {:>4} ×{}{}",
            film.key,
            film.name,
            film.iso,
            film.kind.to_string(),
            format_shutter(film.profile.t1),
            film.profile.max_multiplier,
            if film.custom { "  (custom)" } else { "" }
        );
    }

    Ok(())
}
