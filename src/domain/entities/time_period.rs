//! Time windows used to bound click counting.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Window over which clicks are counted.
///
/// Serialized with the wire names `ALL_TIME`, `1_WEEK` and `24_HOURS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimePeriod {
    #[serde(rename = "ALL_TIME")]
    AllTime,
    #[serde(rename = "1_WEEK")]
    PastWeek,
    #[serde(rename = "24_HOURS")]
    Past24Hours,
}

impl TimePeriod {
    pub const ALL: [TimePeriod; 3] = [Self::AllTime, Self::PastWeek, Self::Past24Hours];

    /// Returns the earliest click timestamp included in the window.
    ///
    /// `AllTime` has no lower bound. Durations are fixed (7×24h, 24h) and
    /// ignore calendar effects such as DST.
    pub fn lower_bound(self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            Self::AllTime => None,
            Self::PastWeek => Some(now - Duration::days(7)),
            Self::Past24Hours => Some(now - Duration::hours(24)),
        }
    }

    /// Wire name of the period.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AllTime => "ALL_TIME",
            Self::PastWeek => "1_WEEK",
            Self::Past24Hours => "24_HOURS",
        }
    }

    /// Comma-separated list of accepted wire names.
    pub fn expected_values() -> String {
        Self::ALL
            .iter()
            .map(|p| p.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for TimePeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimePeriod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("must be one of {}", Self::expected_values()))
    }
}
