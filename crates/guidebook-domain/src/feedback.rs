//! Feedback triage status.

use serde::{Deserialize, Serialize};

/// Wire format: `u8` (0 = Pending, 1 = InProgress, 2 = Resolved).
///
/// New feedback always starts as `Pending`; only an admin moves it forward
/// (or back).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackStatus {
    #[default]
    Pending = 0,
    InProgress = 1,
    Resolved = 2,
}

impl FeedbackStatus {
    /// Convert from the stored integer. Returns `None` for unknown values.
    pub fn from_i16(v: i16) -> Option<Self> {
        match v {
            0 => Some(Self::Pending),
            1 => Some(Self::InProgress),
            2 => Some(Self::Resolved),
            _ => None,
        }
    }

    pub fn as_i16(self) -> i16 {
        self as i16
    }
}
