//! Debug output for solar calculations.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use super::provider::SunTimes;
use super::{Coordinate, solar_position};

/// Format an instant as wall-clock time in the display timezone.
pub fn format_local(instant: DateTime<Utc>, tz: Tz) -> String {
    instant.with_timezone(&tz).format("%H:%M:%S").to_string()
}

/// Civil twilight that coincides with its sunrise/sunset was never reached.
fn civil_or_unreached(civil: DateTime<Utc>, anchor: DateTime<Utc>, tz: Tz) -> String {
    if civil == anchor {
        "not reached (sun stays above -6°)".to_string()
    } else {
        format_local(civil, tz)
    }
}

/// Log the day's solar inputs and the sun's position at solar noon.
pub fn log_solar_debug_info(sun_times: &SunTimes, coordinate: Coordinate, tz: Tz) {
    if coordinate.is_capped() {
        log_pipe!();
        log_warning!(
            "Latitude {:.4}° is beyond ±65°; offline estimates use the capped latitude",
            coordinate.latitude
        );
    }

    log_pipe!();
    log_debug!("Solar calculation details:");
    log_indented!("        Coordinates: {coordinate}");
    log_indented!("           Timezone: {tz}");
    log_indented!(
        "  Civil dawn (-6.0°): {}",
        civil_or_unreached(sun_times.civil_twilight_begin, sun_times.sunrise, tz)
    );
    log_indented!("   Sunrise (-0.833°): {}", format_local(sun_times.sunrise, tz));
    log_indented!("    Sunset (-0.833°): {}", format_local(sun_times.sunset, tz));
    log_indented!(
        "  Civil dusk (-6.0°): {}",
        civil_or_unreached(sun_times.civil_twilight_end, sun_times.sunset, tz)
    );

    if let Some(noon) = sun_times.solar_noon {
        let position = solar_position(noon, coordinate.latitude, coordinate.longitude);
        log_indented!("         Solar noon: {}", format_local(noon, tz));
        log_indented!("  Noon elevation: {:>8.3}°", position.elevation);
        log_indented!("     Declination: {:>8.3}°", position.declination);
        log_indented!("  Equation of time: {:>+6.2} min", position.equation_of_time);
    }

    if let Some(seconds) = sun_times.day_length_seconds {
        log_indented!(
            "         Day length: {}h {:02}m",
            seconds / 3600,
            (seconds % 3600) / 60
        );
    }
}
