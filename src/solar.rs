use std::fmt;

use crate::clock::{ClockDuration, ClockTime, MINUTES_PER_DAY};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Percentage(u32);

impl Percentage {
    pub const FULL: Percentage = Percentage(10_000);

    /// Share of the day covered by `duration`, rounded half up to two decimals.
    pub fn of_day(duration: ClockDuration) -> Self {
        let scaled = duration.total_minutes() as u64 * 10_000;
        let day = MINUTES_PER_DAY as u64;
        let hundredths = (scaled + day / 2) / day;
        Percentage(hundredths.min(10_000) as u32)
    }

    pub fn complement(self) -> Self {
        Percentage(Self::FULL.0 - self.0)
    }

    #[cfg(test)]
    pub fn hundredths(self) -> u32 {
        self.0
    }

    pub fn as_f64(self) -> f64 {
        self.0 as f64 / 100.0
    }
}

impl fmt::Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (whole, frac) = (self.0 / 100, self.0 % 100);
        match frac {
            0 => write!(f, "{whole}"),
            f10 if f10 % 10 == 0 => write!(f, "{whole}.{}", f10 / 10),
            _ => write!(f, "{whole}.{frac:0>2}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolarSplit {
    pub day: Percentage,
    pub night: Percentage,
}

impl SolarSplit {
    pub fn from_daylight(daylight: ClockDuration) -> Self {
        let day = Percentage::of_day(daylight);
        SolarSplit {
            day,
            night: day.complement(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolarDay {
    pub sunrise: ClockTime,
    pub sunset: ClockTime,
    pub day_hours: ClockDuration,
    pub night_hours: ClockDuration,
    pub split: SolarSplit,
}

impl SolarDay {
    pub fn new(sunrise: ClockTime, sunset: ClockTime) -> Self {
        let day_hours = ClockDuration::between(sunrise, sunset);
        let night_hours = ClockDuration::between(sunset, sunrise);
        SolarDay {
            sunrise,
            sunset,
            day_hours,
            night_hours,
            split: SolarSplit::from_daylight(day_hours),
        }
    }

    pub fn from_raw(sunrise: &str, sunset: &str) -> Self {
        Self::new(
            ClockTime::parse_or_midnight(sunrise),
            ClockTime::parse_or_midnight(sunset),
        )
    }
}
