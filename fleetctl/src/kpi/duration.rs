//! Parsing of `HH:MM` delivery durations.
//!
//! An order's `deliveryTime` is the time elapsed between dispatch and delivery, not a wall-clock
//! timestamp, so hours are unbounded (`"26:05"` is valid) while minutes must be two digits below
//! 60.

use std::{fmt, str::FromStr};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("expected an HH:MM duration, got {value:?}")]
pub struct InvalidDuration {
    pub value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DeliveryDuration {
    hours: u32,
    minutes: u8,
}

impl DeliveryDuration {
    pub fn parse(input: &str) -> Result<Self, InvalidDuration> {
        let invalid = || InvalidDuration { value: input.to_string() };

        let (hours, minutes) = input.split_once(':').ok_or_else(invalid)?;
        if hours.is_empty() || !hours.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        if minutes.len() != 2 || !minutes.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }

        let hours: u32 = hours.parse().map_err(|_| invalid())?;
        let minutes: u8 = minutes.parse().map_err(|_| invalid())?;
        if minutes >= 60 {
            return Err(invalid());
        }

        Ok(Self { hours, minutes })
    }

    /// Total elapsed minutes.
    pub fn minutes(&self) -> u64 {
        u64::from(self.hours) * 60 + u64::from(self.minutes)
    }
}

impl FromStr for DeliveryDuration {
    type Err = InvalidDuration;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for DeliveryDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hours, self.minutes)
    }
}
