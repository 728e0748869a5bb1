use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use chrono::{NaiveTime, Timelike};
use log::warn;
use regex::Regex;

use crate::error::{Error, Result};

pub const MINUTES_PER_DAY: u32 = 24 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct ClockTime {
    hour: u8,
    minute: u8,
}

impl ClockTime {
    pub const MIDNIGHT: ClockTime = ClockTime { hour: 0, minute: 0 };

    #[cfg(test)]
    pub fn new(hour: u8, minute: u8) -> Option<Self> {
        if hour > 23 || minute > 59 {
            return None;
        }
        Some(ClockTime { hour, minute })
    }

    #[cfg(test)]
    pub fn hour(&self) -> u8 {
        self.hour
    }

    #[cfg(test)]
    pub fn minute(&self) -> u8 {
        self.minute
    }

    pub fn minutes_since_midnight(&self) -> u32 {
        self.hour as u32 * 60 + self.minute as u32
    }

    pub fn parse_or_midnight(raw: &str) -> ClockTime {
        match raw.parse() {
            Ok(time) => time,
            Err(e) => {
                warn!("{e}, using 00:00");
                ClockTime::MIDNIGHT
            }
        }
    }
}

fn twelve_hour_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^\d{1,2}:\d{2}:\d{2}\s(AM|PM)$").expect("Failed to compile regex")
    })
}

impl FromStr for ClockTime {
    type Err = Error;

    fn from_str(raw: &str) -> Result<Self> {
        if !twelve_hour_pattern().is_match(raw) {
            return Err(Error::Format(raw.to_string()));
        }

        let time = NaiveTime::parse_from_str(raw, "%I:%M:%S %p")
            .map_err(|_| Error::Format(raw.to_string()))?;
        // chrono reads :60 as a leap second
        if time.nanosecond() >= 1_000_000_000 {
            return Err(Error::Format(raw.to_string()));
        }

        Ok(ClockTime {
            hour: time.hour() as u8,
            minute: time.minute() as u8,
        })
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:0>2}:{:0>2}", self.hour, self.minute)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct ClockDuration {
    minutes: u32,
}

impl ClockDuration {
    #[cfg(test)]
    pub const ZERO: ClockDuration = ClockDuration { minutes: 0 };

    /// Time from `start` to `end`, wrapping past midnight when `end` comes first.
    pub fn between(start: ClockTime, end: ClockTime) -> Self {
        let start = start.minutes_since_midnight();
        let mut end = end.minutes_since_midnight();
        if end < start {
            end += MINUTES_PER_DAY;
        }
        ClockDuration {
            minutes: end - start,
        }
    }

    pub fn hours(&self) -> u32 {
        self.minutes / 60
    }

    pub fn minutes(&self) -> u32 {
        self.minutes % 60
    }

    pub fn total_minutes(&self) -> u32 {
        self.minutes
    }
}

impl fmt::Display for ClockDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:0>2}:{:0>2}", self.hours(), self.minutes())
    }
}
