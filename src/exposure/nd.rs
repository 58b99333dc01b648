//! Neutral density filters.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NdFilter {
    pub name: &'static str,
    /// Optical density
    pub density: f64,
    pub stops: u32,
}

impl NdFilter {
    /// Light reduction factor, 2^stops.
    pub fn factor(&self) -> u64 {
        1u64 << self.stops
    }
}

pub const ND_FILTERS: &[NdFilter] = &[
    NdFilter { name: "ND2", density: 0.3, stops: 1 },
    NdFilter { name: "ND4", density: 0.6, stops: 2 },
    NdFilter { name: "ND8", density: 0.9, stops: 3 },
    NdFilter { name: "ND16", density: 1.2, stops: 4 },
    NdFilter { name: "ND32", density: 1.5, stops: 5 },
    NdFilter { name: "ND64", density: 1.8, stops: 6 },
    NdFilter { name: "ND128", density: 2.1, stops: 7 },
    NdFilter { name: "ND256", density: 2.4, stops: 8 },
    NdFilter { name: "ND512", density: 2.7, stops: 9 },
    NdFilter { name: "ND1000", density: 3.0, stops: 10 },
    NdFilter { name: "ND2000", density: 3.3, stops: 11 },
    NdFilter { name: "ND4000", density: 3.6, stops: 12 },
];

/// Shutter time needed behind a filter of `stops` to match `base_seconds` without it.
pub fn nd_shutter(base_seconds: f64, stops: f64) -> f64 {
    base_seconds * 2f64.powf(stops)
}

/// Look up a filter by name (`ND1000`, `nd64`) or by stop count (`10`).
pub fn find_filter(query: &str) -> Option<&'static NdFilter> {
    let query = query.trim();
    if let Ok(stops) = query.parse::<u32>() {
        return ND_FILTERS.iter().find(|f| f.stops == stops);
    }
    ND_FILTERS.iter().find(|f| f.name.eq_ignore_ascii_case(query))
}
