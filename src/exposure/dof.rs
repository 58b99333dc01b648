//! Depth of field and hyperfocal distance.
//!
//! Thin-lens approximations. Inputs: f-number, focal length in millimetres,
//! subject distance in metres and circle of confusion in millimetres.
//! Results are in metres; an infinite far limit is `None`.

use anyhow::Result;
use serde::Serialize;
use std::str::FromStr;

use crate::common::constants::DEFAULT_CIRCLE_OF_CONFUSION_MM;

/// Sensor format, used to pick a circle of confusion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SensorFormat {
    FullFrame,
    ApsCNikonSony,
    ApsCCanon,
    MicroFourThirds,
    OneInch,
}

impl SensorFormat {
    pub fn crop_factor(&self) -> f64 {
        match self {
            Self::FullFrame => 1.0,
            Self::ApsCNikonSony => 1.5,
            Self::ApsCCanon => 1.6,
            Self::MicroFourThirds => 2.0,
            Self::OneInch => 2.7,
        }
    }

    pub fn circle_of_confusion_mm(&self) -> f64 {
        match self {
            Self::FullFrame => DEFAULT_CIRCLE_OF_CONFUSION_MM,
            Self::ApsCNikonSony => 0.019,
            Self::ApsCCanon => 0.018,
            Self::MicroFourThirds => 0.015,
            Self::OneInch => 0.011,
        }
    }
}

impl FromStr for SensorFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "ff" | "full-frame" | "135" => Ok(Self::FullFrame),
            "apsc" | "aps-c" | "nikon" | "sony" => Ok(Self::ApsCNikonSony),
            "canon" | "aps-c-canon" => Ok(Self::ApsCCanon),
            "m43" | "mft" | "micro-four-thirds" => Ok(Self::MicroFourThirds),
            "1in" | "one-inch" => Ok(Self::OneInch),
            other => anyhow::bail!("Unknown sensor format '{other}'"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DepthOfField {
    pub near_limit: f64,
    pub far_limit: Option<f64>,
    pub total: Option<f64>,
    pub hyperfocal: f64,
    pub in_front: f64,
    pub behind: Option<f64>,
}

fn hyperfocal_mm(aperture: f64, focal_length_mm: f64, coc_mm: f64) -> f64 {
    focal_length_mm * focal_length_mm / (aperture * coc_mm) + focal_length_mm
}

/// Hyperfocal distance in metres.
pub fn hyperfocal_distance(aperture: f64, focal_length_mm: f64, coc_mm: f64) -> f64 {
    hyperfocal_mm(aperture, focal_length_mm, coc_mm) / 1000.0
}

pub fn depth_of_field(
    aperture: f64,
    focal_length_mm: f64,
    distance_m: f64,
    coc_mm: f64,
) -> Result<DepthOfField> {
    for (name, value) in [
        ("aperture", aperture),
        ("focal length", focal_length_mm),
        ("distance", distance_m),
        ("circle of confusion", coc_mm),
    ] {
        if !(value.is_finite() && value > 0.0) {
            anyhow::bail!("{name} must be positive (got {value})");
        }
    }

    let f = focal_length_mm;
    let d = distance_m * 1000.0;
    let h = hyperfocal_mm(aperture, f, coc_mm);

    let near = d * (h - f) / (h + d - 2.0 * f);
    let far = (d < h - f).then(|| d * (h - f) / (h - d));

    Ok(DepthOfField {
        near_limit: near / 1000.0,
        far_limit: far.map(|v| v / 1000.0),
        total: far.map(|v| (v - near) / 1000.0),
        hyperfocal: h / 1000.0,
        in_front: (d - near) / 1000.0,
        behind: far.map(|v| (v - d) / 1000.0),
    })
}
