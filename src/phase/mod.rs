//! Light phases of a photographic day.
//!
//! A day is split into contiguous segments by solar elevation: blue hour
//! (-6° to -4°), golden hour (-4° to +6°), daylight, and night. [`timeline`]
//! finds the segment boundaries and [`state`] answers "where are we now".

pub mod state;
pub mod timeline;

pub use state::{PhaseState, resolve_phase_state};
pub use timeline::{
    BlueHourWindow, Boundary, BoundarySource, GoldenBlueHours, Timeline, build_timeline,
    calculate_golden_blue_hours,
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Named light phase, in timeline order.
#[derive(Debug, PartialEq, Eq, Copy, Clone, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LightPhase {
    MorningBlueHour,
    MorningGoldenHour,
    Daylight,
    EveningGoldenHour,
    EveningBlueHour,
    Night,
    /// Rollover copy of the morning blue hour, 24 hours later
    NextMorningBlueHour,
}

impl fmt::Display for LightPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl LightPhase {
    pub const ALL: [LightPhase; 7] = [
        Self::MorningBlueHour,
        Self::MorningGoldenHour,
        Self::Daylight,
        Self::EveningGoldenHour,
        Self::EveningBlueHour,
        Self::Night,
        Self::NextMorningBlueHour,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::MorningBlueHour => "Morning blue hour",
            Self::MorningGoldenHour => "Morning golden hour",
            Self::Daylight => "Daylight",
            Self::EveningGoldenHour => "Evening golden hour",
            Self::EveningBlueHour => "Evening blue hour",
            Self::Night => "Night",
            Self::NextMorningBlueHour => "Next morning blue hour",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Self::MorningBlueHour | Self::EveningBlueHour | Self::NextMorningBlueHour => "◐",
            Self::MorningGoldenHour | Self::EveningGoldenHour => "◒",
            Self::Daylight => "○",
            Self::Night => "●",
        }
    }

    pub fn accent(&self) -> Accent {
        match self {
            Self::MorningBlueHour | Self::EveningBlueHour | Self::NextMorningBlueHour => {
                Accent::BlueHour
            }
            Self::MorningGoldenHour | Self::EveningGoldenHour => Accent::GoldenHour,
            Self::Daylight => Accent::Primary,
            Self::Night => Accent::TextTertiary,
        }
    }

    pub fn is_blue_hour(&self) -> bool {
        self.accent() == Accent::BlueHour
    }

    pub fn is_golden_hour(&self) -> bool {
        self.accent() == Accent::GoldenHour
    }
}

/// Presentation hint attached to each segment; renderers map it to a color.
#[derive(Debug, PartialEq, Eq, Copy, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Accent {
    BlueHour,
    GoldenHour,
    Primary,
    TextTertiary,
}

impl Accent {
    /// ANSI color used by the terminal renderer.
    pub fn ansi_code(&self) -> &'static str {
        match self {
            Self::BlueHour => "\x1b[34m",
            Self::GoldenHour => "\x1b[33m",
            Self::Primary => "\x1b[37m",
            Self::TextTertiary => "\x1b[90m",
        }
    }
}

/// One contiguous span of the timeline, `[start, end)`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhaseSegment {
    pub id: LightPhase,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub label: &'static str,
    pub accent: Accent,
    /// At least one edge was estimated rather than found by the elevation search
    pub approximate: bool,
}

impl PhaseSegment {
    pub fn new(id: LightPhase, start: DateTime<Utc>, end: DateTime<Utc>, approximate: bool) -> Self {
        Self {
            id,
            start,
            end,
            label: id.display_name(),
            accent: id.accent(),
            approximate,
        }
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant < self.end
    }

    pub fn duration(&self) -> chrono::Duration {
        self.end - self.start
    }
}
