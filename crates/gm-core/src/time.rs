//! Time of day, stored either as a phase word or an hour 0-23.

use std::fmt;

use serde_json::Value;

use crate::state::{CampaignState, as_int};

/// Root key for the time of day.
pub const TIME_OF_DAY: &str = "time_of_day";

/// Named phases of the day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DayPhase {
    /// Early hours after dawn.
    Morning,
    /// Daylight.
    Day,
    /// Dusk.
    Evening,
    /// Night.
    Night,
    /// The dead of night.
    Midnight,
}

impl DayPhase {
    /// Parse a phase word, ignoring case and surrounding whitespace.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "morning" | "dawn" => Some(Self::Morning),
            "day" | "noon" | "afternoon" => Some(Self::Day),
            "evening" | "dusk" => Some(Self::Evening),
            "night" => Some(Self::Night),
            "midnight" => Some(Self::Midnight),
            _ => None,
        }
    }
}

impl fmt::Display for DayPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Morning => "morning",
            Self::Day => "day",
            Self::Evening => "evening",
            Self::Night => "night",
            Self::Midnight => "midnight",
        };
        f.write_str(s)
    }
}

/// The time of day in either representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeOfDay {
    /// A named phase.
    Phase(DayPhase),
    /// An hour, 0-23.
    Hour(u8),
}

impl TimeOfDay {
    /// Read a time value. Hours outside 0-23 and unknown words are ignored.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => DayPhase::parse(s).map(Self::Phase).or_else(|| {
                s.trim()
                    .parse::<u8>()
                    .ok()
                    .filter(|h| *h < 24)
                    .map(Self::Hour)
            }),
            Value::Number(_) => as_int(value)
                .filter(|h| (0..24).contains(h))
                .map(|h| Self::Hour(h as u8)),
            _ => None,
        }
    }

    /// Evening, night, midnight, or hours 20-23 and 0-5.
    pub fn is_night(self) -> bool {
        match self {
            Self::Phase(phase) => matches!(
                phase,
                DayPhase::Evening | DayPhase::Night | DayPhase::Midnight
            ),
            Self::Hour(hour) => hour >= 20 || hour <= 5,
        }
    }
}

/// The document's time of day, if readable.
pub fn time_of_day(state: &CampaignState) -> Option<TimeOfDay> {
    state.get(TIME_OF_DAY).and_then(TimeOfDay::from_value)
}

/// True if the document's time of day is night. Missing time is daytime.
pub fn is_night(state: &CampaignState) -> bool {
    time_of_day(state).is_some_and(TimeOfDay::is_night)
}
