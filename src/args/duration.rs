//! Human-readable durations: `3d`, `1w2h`, `6mo`.
//!
//! Months are kept apart from the fixed-length part because their length
//! depends on the calendar. [`HumanDuration::to_std`] approximates a month
//! as 30 days.

use std::fmt;
use std::time::{Duration, SystemTime};

use serde::{Serialize, Serializer};
use thiserror::Error;

const MINUTE: u64 = 60;
const HOUR: u64 = 60 * MINUTE;
const DAY: u64 = 24 * HOUR;
const WEEK: u64 = 7 * DAY;
const APPROX_MONTH: u64 = 30 * DAY;

/// A parsed duration. A zero value is a real, explicit zero-length duration;
/// "no duration supplied" is represented by the absence of a value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct HumanDuration {
    months: u32,
    seconds: u64,
}

impl HumanDuration {
    pub const ZERO: HumanDuration = HumanDuration {
        months: 0,
        seconds: 0,
    };

    pub const fn from_seconds(seconds: u64) -> Self {
        Self { months: 0, seconds }
    }

    pub const fn from_months(months: u32) -> Self {
        Self { months, seconds: 0 }
    }

    pub fn months(&self) -> u32 {
        self.months
    }

    pub fn seconds(&self) -> u64 {
        self.seconds
    }

    pub fn is_zero(&self) -> bool {
        self.months == 0 && self.seconds == 0
    }

    pub fn checked_add(self, other: Self) -> Option<Self> {
        Some(Self {
            months: self.months.checked_add(other.months)?,
            seconds: self.seconds.checked_add(other.seconds)?,
        })
    }

    pub fn checked_mul(self, count: u64) -> Option<Self> {
        let months = u64::from(self.months).checked_mul(count)?;
        Some(Self {
            months: u32::try_from(months).ok()?,
            seconds: self.seconds.checked_mul(count)?,
        })
    }

    /// Fixed-length approximation with 30-day months.
    pub fn to_std(&self) -> Duration {
        let months = u64::from(self.months).saturating_mul(APPROX_MONTH);
        Duration::from_secs(months.saturating_add(self.seconds))
    }

    /// The instant this duration expires when started at `start`.
    pub fn checked_add_to(&self, start: SystemTime) -> Option<SystemTime> {
        start.checked_add(self.to_std())
    }
}

impl fmt::Display for HumanDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            return f.write_str("0s");
        }

        let mut parts = Vec::new();
        let (years, months) = (self.months / 12, self.months % 12);
        if years > 0 {
            parts.push(format!("{}y", years));
        }
        if months > 0 {
            parts.push(format!("{}mo", months));
        }

        let mut seconds = self.seconds;
        for (unit, size) in [("d", DAY), ("h", HOUR), ("m", MINUTE), ("s", 1)] {
            if seconds >= size {
                parts.push(format!("{}{}", seconds / size, unit));
                seconds %= size;
            }
        }
        f.write_str(&parts.join(" "))
    }
}

impl Serialize for HumanDuration {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Why a duration expression failed to parse.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DurationError {
    #[error("empty duration")]
    Empty,
    #[error("expected a number at offset {offset}")]
    MissingCount { offset: usize },
    #[error("number {count} has no unit")]
    MissingUnit { count: String },
    #[error("unknown unit '{unit}'")]
    UnknownUnit { unit: String },
    #[error("duration too large")]
    Overflow,
}

/// The accepted unit suffixes. Callers may register more.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DurationGrammar {
    units: Vec<(String, HumanDuration)>,
}

impl Default for DurationGrammar {
    fn default() -> Self {
        let units = [
            ("s", HumanDuration::from_seconds(1)),
            ("m", HumanDuration::from_seconds(MINUTE)),
            ("h", HumanDuration::from_seconds(HOUR)),
            ("d", HumanDuration::from_seconds(DAY)),
            ("w", HumanDuration::from_seconds(WEEK)),
            ("mo", HumanDuration::from_months(1)),
            ("y", HumanDuration::from_months(12)),
        ];
        Self {
            units: units
                .into_iter()
                .map(|(suffix, size)| (suffix.to_string(), size))
                .collect(),
        }
    }
}

impl DurationGrammar {
    /// Register `suffix` as a unit equal to `size`, replacing any unit with
    /// the same suffix.
    pub fn with_unit(mut self, suffix: &str, size: HumanDuration) -> Self {
        let suffix = suffix.to_ascii_lowercase();
        self.units.retain(|(existing, _)| *existing != suffix);
        self.units.push((suffix, size));
        self
    }

    pub fn unit(&self, suffix: &str) -> Option<HumanDuration> {
        self.units
            .iter()
            .find(|(s, _)| s.eq_ignore_ascii_case(suffix))
            .map(|(_, size)| *size)
    }

    /// Parse concatenated `<integer><unit>` pairs, e.g. `1w2d12h`.
    pub fn parse(&self, text: &str) -> Result<HumanDuration, DurationError> {
        if text.is_empty() {
            return Err(DurationError::Empty);
        }

        let mut total = HumanDuration::ZERO;
        let mut offset = 0;
        while offset < text.len() {
            let tail = &text[offset..];
            let digits = tail
                .find(|c: char| !c.is_ascii_digit())
                .unwrap_or(tail.len());
            if digits == 0 {
                return Err(DurationError::MissingCount { offset });
            }
            let count_text = &tail[..digits];

            let after = &tail[digits..];
            let letters = after
                .find(|c: char| !c.is_alphabetic())
                .unwrap_or(after.len());
            if letters == 0 {
                return Err(DurationError::MissingUnit {
                    count: count_text.to_string(),
                });
            }
            let suffix = &after[..letters];

            let size = self.unit(suffix).ok_or_else(|| DurationError::UnknownUnit {
                unit: suffix.to_string(),
            })?;
            let count: u64 = count_text.parse().map_err(|_| DurationError::Overflow)?;
            total = size
                .checked_mul(count)
                .and_then(|part| total.checked_add(part))
                .ok_or(DurationError::Overflow)?;

            offset += digits + letters;
        }
        Ok(total)
    }
}
