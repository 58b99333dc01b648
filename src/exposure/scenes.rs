//! Reference scenes by EV, from snow in full sun down to long-exposure darkness.

use serde::Serialize;

use super::ExposureTriple;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EvScene {
    pub ev: i32,
    pub description: &'static str,
    /// A typical setting for the scene at ISO 100
    pub reference: ExposureTriple,
}

const fn scene(ev: i32, description: &'static str, aperture: f64, shutter_seconds: f64) -> EvScene {
    EvScene {
        ev,
        description,
        reference: ExposureTriple {
            aperture,
            shutter_seconds,
            iso: 100,
        },
    }
}

pub const EV_SCENES: &[EvScene] = &[
    scene(16, "Snow / sand in bright sun", 16.0, 1.0 / 250.0),
    scene(15, "Bright sunny day (sunny 16)", 16.0, 1.0 / 125.0),
    scene(14, "Hazy sun, soft shadows", 11.0, 1.0 / 125.0),
    scene(13, "Cloudy bright", 8.0, 1.0 / 125.0),
    scene(12, "Overcast, sunrise or sunset", 5.6, 1.0 / 125.0),
    scene(11, "Deep shade, twilight", 4.0, 1.0 / 125.0),
    scene(10, "After sunset, stormy sky", 2.8, 1.0 / 125.0),
    scene(9, "Blue hour, bright night street", 2.8, 1.0 / 60.0),
    scene(8, "City at night, bonfire", 2.8, 1.0 / 30.0),
    scene(7, "Indoor artificial light", 2.8, 1.0 / 15.0),
    scene(6, "Home interior, night market", 2.8, 1.0 / 8.0),
    scene(5, "Bright street light", 2.8, 1.0 / 4.0),
    scene(4, "Candlelight, string lights", 2.8, 1.0 / 2.0),
    scene(3, "Moonlit landscape", 2.8, 1.0),
    scene(2, "Distant lights, lightning", 2.8, 2.0),
    scene(1, "Distant skyline", 2.8, 4.0),
    scene(0, "Starlight only", 2.8, 8.0),
    scene(-1, "Milky Way, aurora", 2.8, 15.0),
    scene(-2, "Deep sky", 2.8, 30.0),
    scene(-3, "Total darkness", 2.8, 60.0),
    scene(-4, "Moonless landscape", 2.8, 120.0),
    scene(-5, "Extremely dark", 2.8, 240.0),
    scene(-6, "Long exposure art", 2.8, 480.0),
];

pub fn find_scene(ev: i32) -> Option<&'static EvScene> {
    EV_SCENES.iter().find(|s| s.ev == ev)
}
