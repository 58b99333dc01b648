//! Application-wide constants.
//!
//! Solar thresholds, search tuning, exposure defaults and configuration limits
//! live here so the engine modules and the configuration validator agree on them.

// # Solar Elevation Thresholds (degrees)

/// Apparent sunrise/sunset: upper limb on the horizon including refraction.
pub const SUNRISE_ELEVATION: f64 = -0.833;
/// Civil twilight boundary, also the outer edge of blue hour.
pub const CIVIL_TWILIGHT_ELEVATION: f64 = -6.0;
/// Boundary between blue hour and golden hour.
pub const BLUE_GOLDEN_ELEVATION: f64 = -4.0;
/// Upper edge of golden hour.
pub const GOLDEN_DAYLIGHT_ELEVATION: f64 = 6.0;

// # Crossing Search

pub const CROSSING_MAX_ITERATIONS: u32 = 50;
/// Stop once the midpoint elevation is this close to the target (degrees).
pub const CROSSING_TOLERANCE_DEGREES: f64 = 0.01;
/// Stop once the bracket is narrower than this.
pub const CROSSING_MIN_BRACKET_MS: i64 = 1000;

// # Timeline

pub const DEFAULT_SEARCH_WINDOW_MINUTES: i64 = 120;
pub const MINIMUM_SEARCH_WINDOW_MINUTES: i64 = 10;
pub const MAXIMUM_SEARCH_WINDOW_MINUTES: i64 = 360;

// Fixed offsets used when neither the search nor the twilight rate is usable (minutes).
pub const FALLBACK_MORNING_BLUE_START: i64 = -40;
pub const FALLBACK_MORNING_GOLDEN_START: i64 = -20;
pub const FALLBACK_MORNING_GOLDEN_END: i64 = 60;
pub const FALLBACK_EVENING_GOLDEN_START: i64 = -60;
pub const FALLBACK_EVENING_BLUE_START: i64 = 10;
pub const FALLBACK_EVENING_BLUE_END: i64 = 40;

/// Latitude cap for the offline sunrise/sunset estimate.
pub const ESTIMATE_LATITUDE_CAP: f64 = 65.0;

// # Exposure

/// Residual EV above which an equivalent exposure is reported as inexact.
pub const DEFAULT_EV_TOLERANCE: f64 = 0.3;
pub const MAXIMUM_EV_TOLERANCE: f64 = 3.0;
pub const DEFAULT_CIRCLE_OF_CONFUSION_MM: f64 = 0.029;

// # Reciprocity

pub const RECIPROCITY_CHECKPOINTS: [f64; 13] = [
    1.0, 2.0, 4.0, 8.0, 15.0, 30.0, 60.0, 120.0, 240.0, 480.0, 900.0, 1800.0, 3600.0,
];
/// ISO assumed when neither the catalog nor the film key names one.
pub const DEFAULT_FILM_ISO: u32 = 400;

// # Configuration

pub const CONFIG_DIR_NAME: &str = "gloaming";
pub const CONFIG_FILE_NAME: &str = "gloaming.toml";

// # Process

pub const EXIT_FAILURE: i32 = 1;
