//! Wall-clock times and their conversion to UTC instants.

use chrono::{DateTime, NaiveDate, TimeZone, Timelike, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// An `HH:MM` time of day.
///
/// Parsed values are restricted to 00:00-23:59. `24:00` only appears as a
/// display value for an end clamped to midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WallClock {
    pub hour: u32,
    pub minute: u32,
}

impl WallClock {
    pub fn new(hour: u32, minute: u32) -> Result<Self, ValidationError> {
        if hour > 23 {
            return Err(ValidationError::InvalidValue {
                field: "hour".into(),
                message: format!("{hour} is outside 0-23"),
            });
        }
        if minute > 59 {
            return Err(ValidationError::InvalidValue {
                field: "minute".into(),
                message: format!("{minute} is outside 0-59"),
            });
        }
        Ok(Self { hour, minute })
    }

    pub fn from_minute_of_day(minute: u32) -> Self {
        Self {
            hour: minute / 60,
            minute: minute % 60,
        }
    }

    pub fn minute_of_day(&self) -> u32 {
        self.hour * 60 + self.minute
    }

    /// Ensure `end` comes strictly after `start` on the same day.
    pub fn ensure_ordered(start: WallClock, end: WallClock) -> Result<(), ValidationError> {
        if end.minute_of_day() <= start.minute_of_day() {
            return Err(ValidationError::InvalidTimeRange {
                start: start.minute_of_day() as i64,
                end: end.minute_of_day() as i64,
            });
        }
        Ok(())
    }
}

impl FromStr for WallClock {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ValidationError::InvalidWallClock(s.to_string());
        let (h, m) = s.trim().split_once(':').ok_or_else(invalid)?;
        if h.is_empty() || h.len() > 2 || m.len() != 2 {
            return Err(invalid());
        }
        let hour = h.parse::<u32>().map_err(|_| invalid())?;
        let minute = m.parse::<u32>().map_err(|_| invalid())?;
        WallClock::new(hour, minute)
    }
}

impl fmt::Display for WallClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

pub(crate) fn minute_of_day<Tz: TimeZone>(dt: &DateTime<Tz>) -> u32 {
    dt.hour() * 60 + dt.minute()
}

/// UTC instant of `clock` on `date` in `tz`.
///
/// Ambiguous local times (DST fall-back) resolve to the earlier instant;
/// nonexistent ones (DST spring-forward gap) are rejected.
pub fn local_instant<Tz: TimeZone>(
    date: NaiveDate,
    clock: WallClock,
    tz: &Tz,
) -> Result<DateTime<Utc>, ValidationError> {
    let naive = date
        .and_hms_opt(clock.hour, clock.minute, 0)
        .ok_or_else(|| ValidationError::InvalidWallClock(clock.to_string()))?;
    tz.from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| ValidationError::InvalidValue {
            field: "time".into(),
            message: format!("{date} {clock} does not exist in the local timezone"),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    #[test]
    fn parses_and_formats() {
        let c: WallClock = "9:05".parse().unwrap();
        assert_eq!(c, WallClock { hour: 9, minute: 5 });
        assert_eq!(c.to_string(), "09:05");
        assert_eq!(c.minute_of_day(), 545);
    }

    #[test]
    fn rejects_out_of_range_parts() {
        assert!("24:00".parse::<WallClock>().is_err());
        assert!("12:60".parse::<WallClock>().is_err());
        assert!("1200".parse::<WallClock>().is_err());
        assert!("ab:cd".parse::<WallClock>().is_err());
        assert!("12:5".parse::<WallClock>().is_err());
    }

    #[test]
    fn ordering_check_requires_strictly_later_end() {
        let a = WallClock::new(10, 0).unwrap();
        let b = WallClock::new(10, 30).unwrap();
        assert!(WallClock::ensure_ordered(a, b).is_ok());
        assert!(WallClock::ensure_ordered(b, a).is_err());
        assert!(WallClock::ensure_ordered(a, a).is_err());
    }

    #[test]
    fn midnight_end_displays_as_24() {
        assert_eq!(WallClock::from_minute_of_day(MINUTES_PER_DAY).to_string(), "24:00");
    }

    #[test]
    fn local_instant_applies_offset() {
        let tz = FixedOffset::west_opt(5 * 3600).unwrap();
        let date = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let instant = local_instant(date, WallClock::new(9, 30).unwrap(), &tz).unwrap();
        assert_eq!(instant.to_rfc3339(), "2025-06-01T14:30:00+00:00");
    }
}
