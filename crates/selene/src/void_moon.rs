//! Void-of-course moon: the tail of the moon's stay in a sign after
//! its last major aspect to any other body.

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::aspects::{AspectScanner, AstroEvent};
use crate::cancel::CancelToken;
use crate::ephemeris::Ephemeris;
use crate::error::Error;
use crate::moon::sign::{moon_sign_period, MoonSignSegment};
use crate::planets::Planet;
use crate::types::Location;

/// A void-of-course interval, reported in the caller's wall clock.
///
/// Both endpoints carry the same fixed offset; applying it uniformly
/// keeps the interval inside the (equally shifted) moon-sign period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoidOfCourse {
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
    /// The aspect whose peak opens the interval; absent when the moon
    /// makes no aspect at all during its stay in the sign.
    pub last_aspect: Option<AstroEvent>,
    /// The sign the moon is leaving.
    pub segment: MoonSignSegment,
}

/// Derive the void-of-course interval for a local calendar date.
///
/// The moon-sign period enclosing local noon is scanned for major
/// aspects from the moon to every other body; the interval runs from
/// the last peak (or the period start when there is none) to the sign
/// egress, both endpoints shifted into the local clock.
pub fn void_of_course(
    eph: &dyn Ephemeris,
    date: NaiveDate,
    location: &Location,
    offset_hours: i32,
    cancel: Option<&CancelToken>,
) -> Result<VoidOfCourse, Error> {
    let offset = FixedOffset::east_opt(offset_hours * 3600)
        .ok_or_else(|| Error::Domain(format!("offset {offset_hours}h out of range")))?;

    let local_noon = date
        .and_hms_opt(12, 0, 0)
        .ok_or_else(|| Error::Domain(format!("invalid date {date}")))?;
    let noon_utc = Utc.from_utc_datetime(&local_noon) - Duration::hours(offset_hours as i64);

    let segment = moon_sign_period(eph, noon_utc, location)?;
    let period = crate::types::TimePeriod::new(segment.start, segment.end)?;

    let others: Vec<Planet> = Planet::NATAL
        .iter()
        .copied()
        .filter(|&p| p != Planet::Moon)
        .collect();
    let events = AspectScanner::new().mono_events_on_period(
        eph,
        period,
        Planet::Moon,
        &others,
        location,
        cancel,
    )?;

    let last = events
        .iter()
        .filter(|event| event.peak.is_some())
        .max_by_key(|event| event.peak)
        .copied();

    let start_utc = match last.and_then(|event| event.peak) {
        Some(peak) => peak,
        None => segment.start,
    };

    Ok(VoidOfCourse {
        start: start_utc.with_timezone(&offset),
        end: segment.end.with_timezone(&offset),
        last_aspect: last,
        segment,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ephemeris::KeplerianEphemeris;

    fn moscow() -> Location {
        Location::new(37.6173, 55.7558).unwrap()
    }

    #[test]
    fn void_interval_sits_inside_the_sign_period() {
        let eph = KeplerianEphemeris::new();
        let date = NaiveDate::from_ymd_opt(2026, 1, 25).unwrap();
        let void = void_of_course(&eph, date, &moscow(), 3, None).unwrap();

        let start_utc = void.start.with_timezone(&Utc);
        let end_utc = void.end.with_timezone(&Utc);
        assert!(start_utc >= void.segment.start);
        assert!(end_utc == void.segment.end);
        assert!(start_utc <= end_utc);
    }

    #[test]
    fn last_aspect_peak_opens_the_interval() {
        let eph = KeplerianEphemeris::new();
        let date = NaiveDate::from_ymd_opt(2026, 4, 2).unwrap();
        let void = void_of_course(&eph, date, &moscow(), 3, None).unwrap();

        if let Some(event) = void.last_aspect {
            assert_eq!(event.transit, Planet::Moon);
            assert_eq!(event.peak.unwrap(), void.start.with_timezone(&Utc));
        } else {
            // No aspect at all: the whole sign period is void.
            assert_eq!(void.start.with_timezone(&Utc), void.segment.start);
        }
    }

    #[test]
    fn cancellation_aborts_the_scan() {
        let eph = KeplerianEphemeris::new();
        let date = NaiveDate::from_ymd_opt(2026, 1, 25).unwrap();
        let token = CancelToken::new();
        token.cancel();
        let result = void_of_course(&eph, date, &moscow(), 3, Some(&token));
        assert!(matches!(result, Err(Error::Canceled)));
    }
}
