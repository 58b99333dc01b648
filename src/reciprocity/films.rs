//! Film stock table.
//!
//! The built-in catalog (`data/films.toml`) and parameter set
//! (`data/reciprocity.toml`) are embedded at compile time and joined by key.
//! Loading fails fast on anything that does not line up: a catalog entry
//! without parameters, parameters for an unknown key, duplicate keys, or a
//! profile outside the valid ranges. User films from the configuration are
//! layered on top and replace built-ins that share a key.

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;

use super::ReciprocityProfile;
use crate::common::constants::DEFAULT_FILM_ISO;

const BUILTIN_CATALOG: &str = include_str!("../../data/films.toml");
const BUILTIN_RECIPROCITY: &str = include_str!("../../data/reciprocity.toml");

static ISO_DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+)").expect("valid ISO pattern"));

/// Stocks whose key does not spell out the speed, or spells out something else.
const KNOWN_ISOS: &[(&str, u32)] = &[
    ("kodak_portra", 400),
    ("kodak_gold", 200),
    ("kodak_trix", 400),
    ("fuji_superia", 400),
    ("fuji_acros", 100),
    ("ilford_hp5", 400),
    ("ilford_fp4", 125),
    ("ilford_delta3200", 3200),
    ("ilford_panf", 50),
    ("cinestill_800t", 800),
    ("lomo_cn", 400),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilmKind {
    #[serde(rename = "c41")]
    ColorNegative,
    #[serde(rename = "bw-modern")]
    BlackWhiteModern,
    #[serde(rename = "bw-classic")]
    BlackWhiteClassic,
    #[serde(rename = "slide")]
    Slide,
}

impl fmt::Display for FilmKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::ColorNegative => "C-41",
            Self::BlackWhiteModern => "B&W (T-grain)",
            Self::BlackWhiteClassic => "B&W (classic)",
            Self::Slide => "E-6 slide",
        };
        f.write_str(label)
    }
}

/// A resolved film stock: catalog data plus its reciprocity profile.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilmStock {
    pub key: String,
    pub name: String,
    pub kind: FilmKind,
    pub iso: u32,
    pub profile: ReciprocityProfile,
    pub custom: bool,
}

/// User-defined film from the `[[films]]` configuration array.
///
/// `t2` and `log_k` belong to an older three-segment model. They are still
/// accepted so existing files parse, but nothing reads them.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CustomFilm {
    pub key: String,
    pub name: String,
    pub iso: Option<u32>,
    pub kind: Option<FilmKind>,
    pub t1: f64,
    pub p: f64,
    pub max_multiplier: f64,
    #[serde(default)]
    pub t2: Option<f64>,
    #[serde(default)]
    pub log_k: Option<f64>,
}

impl CustomFilm {
    pub fn has_legacy_fields(&self) -> bool {
        self.t2.is_some() || self.log_k.is_some()
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CatalogEntry {
    key: String,
    name: String,
    kind: FilmKind,
    iso: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    films: Vec<CatalogEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ProfileEntry {
    t1: f64,
    p: f64,
    max_multiplier: f64,
    #[serde(default)]
    t2: Option<f64>,
    #[serde(default)]
    log_k: Option<f64>,
}

/// Speed for a film key: a table of well-known stocks first, then the first
/// number in the key, then the default.
pub fn infer_iso(key: &str) -> u32 {
    if let Some((_, iso)) = KNOWN_ISOS.iter().find(|(known, _)| *known == key) {
        return *iso;
    }
    ISO_DIGITS
        .captures(key)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<u32>().ok())
        .filter(|iso| *iso > 0)
        .unwrap_or(DEFAULT_FILM_ISO)
}

/// Immutable, validated set of film stocks in catalog order.
#[derive(Debug, Clone)]
pub struct FilmTable {
    films: Vec<FilmStock>,
}

impl FilmTable {
    /// Load the embedded catalog and parameters.
    pub fn builtin() -> Result<Self> {
        Self::from_sources(BUILTIN_CATALOG, BUILTIN_RECIPROCITY)
            .context("Built-in film data is invalid")
    }

    /// Join a catalog document with a parameter document.
    pub fn from_sources(catalog: &str, reciprocity: &str) -> Result<Self> {
        let catalog: CatalogFile =
            toml::from_str(catalog).context("Failed to parse film catalog")?;
        let mut params: BTreeMap<String, ProfileEntry> =
            toml::from_str(reciprocity).context("Failed to parse reciprocity parameters")?;

        let mut seen = HashSet::new();
        let mut films = Vec::with_capacity(catalog.films.len());

        for entry in catalog.films {
            validate_key(&entry.key)?;
            if !seen.insert(entry.key.clone()) {
                anyhow::bail!("Duplicate film key '{}' in catalog", entry.key);
            }
            let Some(raw) = params.remove(&entry.key) else {
                anyhow::bail!("Film '{}' has no reciprocity parameters", entry.key);
            };
            if raw.t2.is_some() || raw.log_k.is_some() {
                log_warning!(
                    "Film '{}': 't2' and 'log_k' are no longer used and will be ignored",
                    entry.key
                );
            }
            let profile = ReciprocityProfile::new(raw.t1, raw.p, raw.max_multiplier)
                .with_context(|| format!("Invalid reciprocity parameters for '{}'", entry.key))?;
            if entry.iso == Some(0) {
                anyhow::bail!("Film '{}' has an ISO of 0", entry.key);
            }

            films.push(FilmStock {
                iso: entry.iso.unwrap_or_else(|| infer_iso(&entry.key)),
                key: entry.key,
                name: entry.name,
                kind: entry.kind,
                profile,
                custom: false,
            });
        }

        if let Some(orphan) = params.keys().next() {
            anyhow::bail!("Reciprocity parameters for unknown film '{orphan}'");
        }

        Ok(Self { films })
    }

    /// Layer user films over this table. A custom film replaces the entry with
    /// the same key in place; new keys are appended.
    pub fn with_custom(mut self, custom: &[CustomFilm]) -> Result<Self> {
        let mut seen = HashSet::new();
        for film in custom {
            validate_key(&film.key)?;
            if !seen.insert(film.key.as_str()) {
                anyhow::bail!("Custom film '{}' is defined more than once", film.key);
            }
            if film.iso == Some(0) {
                anyhow::bail!("Custom film '{}' has an ISO of 0", film.key);
            }
            let profile = ReciprocityProfile::new(film.t1, film.p, film.max_multiplier)
                .with_context(|| format!("Invalid reciprocity parameters for '{}'", film.key))?;

            let existing = self.films.iter().position(|f| f.key == film.key);
            let stock = FilmStock {
                key: film.key.clone(),
                name: film.name.clone(),
                kind: film
                    .kind
                    .or_else(|| existing.map(|i| self.films[i].kind))
                    .unwrap_or(FilmKind::ColorNegative),
                iso: film.iso.unwrap_or_else(|| infer_iso(&film.key)),
                profile,
                custom: true,
            };

            match existing {
                Some(index) => self.films[index] = stock,
                None => self.films.push(stock),
            }
        }
        Ok(self)
    }

    pub fn get(&self, key: &str) -> Option<&FilmStock> {
        self.films.iter().find(|f| f.key == key)
    }

    /// Look up a key, with a readable error listing close matches.
    pub fn require(&self, key: &str) -> Result<&FilmStock> {
        if let Some(film) = self.get(key) {
            return Ok(film);
        }
        let suggestions: Vec<&str> = self.search(key).iter().map(|f| f.key.as_str()).collect();
        if suggestions.is_empty() {
            anyhow::bail!("Unknown film '{key}'. Run 'gloaming films' to list available stocks");
        }
        anyhow::bail!(
            "Unknown film '{key}'. Did you mean: {}?",
            suggestions.join(", ")
        )
    }

    /// Case-insensitive substring match on key or name.
    pub fn search(&self, query: &str) -> Vec<&FilmStock> {
        let query = query.to_lowercase();
        self.films
            .iter()
            .filter(|f| {
                f.key.to_lowercase().contains(&query) || f.name.to_lowercase().contains(&query)
            })
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FilmStock> {
        self.films.iter()
    }

    pub fn len(&self) -> usize {
        self.films.len()
    }

    pub fn is_empty(&self) -> bool {
        self.films.is_empty()
    }
}

fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        anyhow::bail!("Film key must not be empty");
    }
    if !key
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-')
    {
        anyhow::bail!(
            "Film key '{key}' may only contain lowercase letters, digits, '_' and '-'"
        );
    }
    Ok(())
}
