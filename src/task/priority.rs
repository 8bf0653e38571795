use crate::api::types::Task;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// User-facing priority, P1 (urgent) through P4 (normal).
///
/// The service stores priority inverted: raw 4 is P1 and raw 1 is P4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum DisplayPriority {
    P1,
    P2,
    P3,
    P4,
}

impl DisplayPriority {
    pub const ALL: [DisplayPriority; 4] = [
        DisplayPriority::P1,
        DisplayPriority::P2,
        DisplayPriority::P3,
        DisplayPriority::P4,
    ];

    /// Map a raw stored priority to its display value. Values outside 1..=4
    /// have no display priority.
    pub fn from_raw(raw: u8) -> Option<Self> {
        match raw {
            4 => Some(DisplayPriority::P1),
            3 => Some(DisplayPriority::P2),
            2 => Some(DisplayPriority::P3),
            1 => Some(DisplayPriority::P4),
            _ => None,
        }
    }

    /// Parse a display number (1 = urgent)
    pub fn from_value(value: u8) -> Option<Self> {
        match value {
            1 => Some(DisplayPriority::P1),
            2 => Some(DisplayPriority::P2),
            3 => Some(DisplayPriority::P3),
            4 => Some(DisplayPriority::P4),
            _ => None,
        }
    }

    pub fn value(self) -> u8 {
        match self {
            DisplayPriority::P1 => 1,
            DisplayPriority::P2 => 2,
            DisplayPriority::P3 => 3,
            DisplayPriority::P4 => 4,
        }
    }

    pub fn raw(self) -> u8 {
        5 - self.value()
    }
}

impl fmt::Display for DisplayPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.value())
    }
}

impl From<DisplayPriority> for u8 {
    fn from(priority: DisplayPriority) -> Self {
        priority.value()
    }
}

impl TryFrom<u8> for DisplayPriority {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        DisplayPriority::from_value(value)
            .ok_or_else(|| format!("Invalid priority {}. Valid priorities are 1 to 4", value))
    }
}

impl FromStr for DisplayPriority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_prefix('p')
            .or_else(|| trimmed.strip_prefix('P'))
            .unwrap_or(trimmed);
        digits
            .parse::<u8>()
            .ok()
            .and_then(DisplayPriority::from_value)
            .ok_or_else(|| {
                format!(
                    "Invalid priority '{}'. Valid options are: 1, 2, 3, 4 (or P1..P4)",
                    s
                )
            })
    }
}

impl Task {
    /// Display priority of this task, `None` when the raw value is out of range
    pub fn display_priority(&self) -> Option<DisplayPriority> {
        DisplayPriority::from_raw(self.priority)
    }
}
