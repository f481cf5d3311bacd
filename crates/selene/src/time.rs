//! Julian-day conversion and the local-day arithmetic the engines use.
//!
//! All computation stays in UTC; an integer hour offset is applied only
//! when mapping a user-facing calendar day to its UTC bracket and when
//! shifting results back to wall clock.

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, TimeZone, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::types::{Location, TimePeriod};

/// Days between the Julian epoch and J2000.0 (2000-01-01 12:00 TT).
pub const J2000_JD: f64 = 2_451_545.0;

/// Continuous day count since the Julian epoch, the time argument of
/// every ephemeris call.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct JulianDay(pub f64);

impl JulianDay {
    pub fn add_days(&self, days: f64) -> JulianDay {
        JulianDay(self.0 + days)
    }

    /// Signed distance in days.
    pub fn days_since(&self, other: JulianDay) -> f64 {
        self.0 - other.0
    }

    /// Julian centuries since J2000.0.
    pub fn centuries(&self) -> f64 {
        (self.0 - J2000_JD) / 36_525.0
    }
}

/// Convert a UTC instant to its Julian Day number.
///
/// Standard Gregorian conversion (Meeus, ch. 7). Seconds are kept even
/// though minute precision suffices at the ingress boundary.
pub fn julian_day(instant: DateTime<Utc>) -> JulianDay {
    use chrono::Datelike;

    let (year, month) = if instant.month() <= 2 {
        (instant.year() - 1, instant.month() + 12)
    } else {
        (instant.year(), instant.month())
    };
    let a = (year as f64 / 100.0).floor();
    let b = 2.0 - a + (a / 4.0).floor();
    let day = instant.day() as f64
        + (instant.hour() as f64
            + instant.minute() as f64 / 60.0
            + instant.second() as f64 / 3600.0)
            / 24.0;
    let jd = (365.25 * (year as f64 + 4716.0)).floor()
        + (30.6001 * (month as f64 + 1.0)).floor()
        + day
        + b
        - 1524.5;
    JulianDay(jd)
}

/// Convert a Julian Day number back to UTC, rounded to the nearest second.
pub fn from_julian_day(jd: JulianDay) -> Result<DateTime<Utc>, Error> {
    let z = (jd.0 + 0.5).floor();
    let f = jd.0 + 0.5 - z;

    let a = if z < 2_299_161.0 {
        z
    } else {
        let alpha = ((z - 1_867_216.25) / 36_524.25).floor();
        z + 1.0 + alpha - (alpha / 4.0).floor()
    };
    let b = a + 1524.0;
    let c = ((b - 122.1) / 365.25).floor();
    let d = (365.25 * c).floor();
    let e = ((b - d) / 30.6001).floor();

    let day_frac = b - d - (30.6001 * e).floor() + f;
    let day = day_frac.floor();
    let month = if e < 14.0 { e - 1.0 } else { e - 13.0 };
    let year = if month > 2.0 { c - 4716.0 } else { c - 4715.0 };

    let seconds = ((day_frac - day) * 86_400.0).round() as i64;
    let date = NaiveDate::from_ymd_opt(year as i32, month as u32, day as u32).ok_or_else(|| {
        Error::Domain(format!("julian day {} is outside the calendar range", jd.0))
    })?;
    let midnight = date
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| Error::Domain(format!("julian day {} produced invalid time", jd.0)))?;
    // Adding the day fraction as a duration lets a rounded-up midnight
    // roll over into the next calendar day.
    Ok(Utc.from_utc_datetime(&midnight) + Duration::seconds(seconds))
}

/// Standard UTC offset derived from the observer's longitude.
///
/// One hour per 15° of longitude, rounded. This is the geographic
/// estimate used when the caller has no observed offset; political
/// timezones and DST are the caller's concern and may override it.
pub fn offset_hours(location: &Location) -> i32 {
    (location.longitude / 15.0).round() as i32
}

/// UTC bracket of a local calendar day: [midnight − offset, +24h).
pub fn local_day_bounds(date: NaiveDate, offset_hours: i32) -> Result<TimePeriod, Error> {
    let midnight = date
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| Error::Domain(format!("invalid date {date}")))?;
    let utc_start = Utc.from_utc_datetime(&midnight) - Duration::hours(offset_hours as i64);
    TimePeriod::new(utc_start, utc_start + Duration::hours(24))
}

/// Shift a UTC instant into the fixed-offset wall clock.
pub fn to_local(instant: DateTime<Utc>, offset_hours: i32) -> Result<DateTime<FixedOffset>, Error> {
    let offset = FixedOffset::east_opt(offset_hours * 3600)
        .ok_or_else(|| Error::Domain(format!("offset {offset_hours}h out of range")))?;
    Ok(instant.with_timezone(&offset))
}
