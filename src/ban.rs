//! Ban records as served by the ban-list API

use chrono::{DateTime, Utc};
use derive_more::{Display, From};
use serde::{Deserialize, Serialize};

/// Opaque identifier of a ban, the punished player's UUID
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display, From, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BanId(String);

impl BanId {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for BanId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// A single entry of the ban list
///
/// Times are kept as sent, since the API may use fractional seconds. Rounding
/// happens only when a whole second is needed, so the unban time is the
/// rounded sum of the raw values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BanRecord {
    /// Identifier of the punished player
    #[serde(rename = "punished")]
    pub subject_id: BanId,
    /// Display name of the punished player
    #[serde(rename = "punishedName")]
    pub subject_name: String,
    /// Kind of punishment, e.g. `BAN` or `MUTE`
    #[serde(rename = "type")]
    pub punishment_type: String,
    pub reason: String,
    /// Length of the punishment in seconds
    #[serde(rename = "duration")]
    pub duration_seconds: f64,
    /// When the punishment was issued, in epoch seconds
    #[serde(rename = "timestamp")]
    pub banned_at: f64,
}

// `as` saturates out-of-range floats and maps NaN to zero.
#[allow(clippy::cast_possible_truncation)]
impl BanRecord {
    /// Issue time rounded to the nearest second
    #[must_use]
    pub fn banned_at_secs(&self) -> i64 {
        self.banned_at.round() as i64
    }

    /// Whole seconds of punishment, partial seconds dropped
    #[must_use]
    pub fn whole_duration_secs(&self) -> i64 {
        self.duration_seconds.floor() as i64
    }

    /// Epoch second at which the punishment expires
    #[must_use]
    pub fn unbanned_at(&self) -> i64 {
        (self.banned_at + self.duration_seconds).round() as i64
    }

    #[must_use]
    pub fn banned_at_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.banned_at_secs(), 0)
    }

    #[must_use]
    pub fn unbanned_at_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.unbanned_at(), 0)
    }
}
