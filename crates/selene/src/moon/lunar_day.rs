//! Lunar days: the 29–30 ordinals of a lunation.
//!
//! Day #1 opens at the new moon and closes at the first moonrise after
//! it; every later day runs moonrise to moonrise; the last day of the
//! lunation is cut short by the next new moon. The days tile the
//! lunation without gaps or overlap.

use chrono::{DateTime, Duration, Utc};

use crate::ephemeris::Ephemeris;
use crate::error::Error;
use crate::frames::normalize_pm180;
use crate::moon::riseset::{next_moonrise, previous_moonrise};
use crate::planets::Planet;
use crate::time::{self, julian_day, JulianDay};
use crate::types::Location;

/// Shared one-minute bisection stop.
const BISECTION_LIMIT_DAYS: f64 = 60.0 / 86_400.0;

/// A lunation never exceeds 30 days; cap the new-moon walk above that.
const MAX_WALK_DAYS: usize = 32;

/// Upper bound on moonrises inside one lunation.
const MAX_RISES: usize = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct LunarDay {
    /// Ordinal within the lunation, 1..=30.
    pub number: u8,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Signed moon–sun elongation in (-180, 180], zero at the new moon,
/// rising through zero as the moon overtakes the sun.
fn elongation_pm180(eph: &dyn Ephemeris, jd: JulianDay) -> Result<f64, Error> {
    let moon = eph.longitude(Planet::Moon, jd, None)?;
    let sun = eph.longitude(Planet::Sun, jd, None)?;
    Ok(normalize_pm180(moon - sun))
}

/// Newton polish after bisection: divide the residual elongation by the
/// synodic rate. Lands within a fraction of a second so that searches
/// started from either side of a lunation agree on its boundary.
fn refine_new_moon(eph: &dyn Ephemeris, mut jd: JulianDay) -> Result<JulianDay, Error> {
    for _ in 0..4 {
        let moon = eph.state(Planet::Moon, jd, None)?;
        let sun = eph.state(Planet::Sun, jd, None)?;
        let rate = moon.speed - sun.speed;
        if rate <= 0.0 {
            return Err(Error::Computation("synodic rate not positive at new moon"));
        }
        let residual = normalize_pm180(moon.longitude - sun.longitude);
        jd = jd.add_days(-residual / rate);
        if (residual / rate).abs() < 1.0e-8 {
            break;
        }
    }
    Ok(jd)
}

fn bisect_new_moon(
    eph: &dyn Ephemeris,
    mut before: JulianDay,
    mut after: JulianDay,
) -> Result<JulianDay, Error> {
    // Invariant: elongation < 0 at `before`, >= 0 at `after`.
    while after.days_since(before) > BISECTION_LIMIT_DAYS {
        let mid = JulianDay((before.0 + after.0) / 2.0);
        if elongation_pm180(eph, mid)? < 0.0 {
            before = mid;
        } else {
            after = mid;
        }
    }
    refine_new_moon(eph, after)
}

/// The new moon at or before `instant`.
pub fn previous_new_moon(
    eph: &dyn Ephemeris,
    instant: DateTime<Utc>,
) -> Result<DateTime<Utc>, Error> {
    let mut later = julian_day(instant);
    let mut later_elong = elongation_pm180(eph, later)?;
    for _ in 0..MAX_WALK_DAYS {
        let earlier = later.add_days(-1.0);
        let earlier_elong = elongation_pm180(eph, earlier)?;
        // The sawtooth rises through zero only at the new moon; the
        // jump at the full moon has the opposite sign pattern.
        if earlier_elong < 0.0 && later_elong >= 0.0 {
            return time::from_julian_day(bisect_new_moon(eph, earlier, later)?);
        }
        later = earlier;
        later_elong = earlier_elong;
    }
    Err(Error::Computation("previous new moon not found"))
}

/// The first new moon strictly after `instant`.
pub fn next_new_moon(
    eph: &dyn Ephemeris,
    instant: DateTime<Utc>,
) -> Result<DateTime<Utc>, Error> {
    let mut earlier = julian_day(instant);
    let mut earlier_elong = elongation_pm180(eph, earlier)?;
    for _ in 0..MAX_WALK_DAYS {
        let later = earlier.add_days(1.0);
        let later_elong = elongation_pm180(eph, later)?;
        if earlier_elong < 0.0 && later_elong >= 0.0 {
            return time::from_julian_day(bisect_new_moon(eph, earlier, later)?);
        }
        earlier = later;
        earlier_elong = later_elong;
    }
    Err(Error::Computation("next new moon not found"))
}

/// Where the lunar day containing `instant` begins: the later of the
/// previous moonrise and the previous new moon.
pub fn lunar_day_start(
    eph: &dyn Ephemeris,
    instant: DateTime<Utc>,
    location: &Location,
) -> Result<DateTime<Utc>, Error> {
    let new_moon = previous_new_moon(eph, instant)?;
    let rise = previous_moonrise(eph, location, instant)?;
    Ok(new_moon.max(rise))
}

/// Where the lunar day containing `instant` ends: the earlier of the
/// next moonrise and the next new moon.
pub fn lunar_day_end(
    eph: &dyn Ephemeris,
    instant: DateTime<Utc>,
    location: &Location,
) -> Result<DateTime<Utc>, Error> {
    let new_moon = next_new_moon(eph, instant)?;
    let rise = next_moonrise(eph, location, instant)?;
    Ok(new_moon.min(rise))
}

/// Ordinal of the lunar day containing `instant`: one plus the number
/// of moonrises between the last new moon and `instant`.
pub fn lunar_day_number(
    eph: &dyn Ephemeris,
    instant: DateTime<Utc>,
    location: &Location,
) -> Result<u8, Error> {
    let new_moon = previous_new_moon(eph, instant)?;
    let mut number: u8 = 1;
    let mut cursor = new_moon;
    for _ in 0..MAX_RISES {
        let rise = next_moonrise(eph, location, cursor)?;
        if rise > instant {
            return Ok(number);
        }
        number += 1;
        cursor = rise;
    }
    Err(Error::Computation("moonrise count exceeded a lunation"))
}

/// The full lunar-day record containing `instant`.
pub fn lunar_day(
    eph: &dyn Ephemeris,
    instant: DateTime<Utc>,
    location: &Location,
) -> Result<LunarDay, Error> {
    let number = lunar_day_number(eph, instant, location)?;
    let start = lunar_day_start(eph, instant, location)?;
    let end = lunar_day_end(eph, instant, location)?;
    Ok(LunarDay { number, start, end })
}

/// The lunar day after `day`, probed just past its end.
pub fn next_lunar_day(
    eph: &dyn Ephemeris,
    day: &LunarDay,
    location: &Location,
) -> Result<LunarDay, Error> {
    lunar_day(eph, day.end + Duration::minutes(10), location)
}

/// The lunar day before `day`, probed just before its start.
pub fn previous_lunar_day(
    eph: &dyn Ephemeris,
    day: &LunarDay,
    location: &Location,
) -> Result<LunarDay, Error> {
    lunar_day(eph, day.start - Duration::minutes(10), location)
}

/// The lunar day occupying the largest share of a 24-hour local day.
///
/// `day_start` is the UTC instant of local midnight. The common cases
/// resolve from three probes; when three distinct lunar days touch the
/// date (two boundary crossings in 24 hours) a 25-point hourly tally
/// decides, ties going to the earliest number seen.
pub fn main_lunar_day_on_date(
    eph: &dyn Ephemeris,
    day_start: DateTime<Utc>,
    location: &Location,
) -> Result<LunarDay, Error> {
    let at_midnight = lunar_day(eph, day_start, location)?;
    let at_noon = lunar_day(eph, day_start + Duration::hours(12), location)?;
    if at_midnight.number == at_noon.number {
        return Ok(at_midnight);
    }
    let at_next_midnight = lunar_day(eph, day_start + Duration::hours(24), location)?;
    if at_noon.number == at_next_midnight.number {
        return Ok(at_noon);
    }

    let mut numbers = Vec::with_capacity(25);
    for hour in 0..=24 {
        let number =
            lunar_day_number(eph, day_start + Duration::hours(hour), location)?;
        numbers.push(number);
    }
    let mut best_hour = 0usize;
    let mut best_count = 0usize;
    for (hour, &number) in numbers.iter().enumerate() {
        let count = numbers.iter().filter(|&&n| n == number).count();
        if count > best_count {
            best_count = count;
            best_hour = hour;
        }
    }
    lunar_day(
        eph,
        day_start + Duration::hours(best_hour as i64),
        location,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ephemeris::KeplerianEphemeris;
    use chrono::TimeZone;

    fn moscow() -> Location {
        Location::new(37.6173, 55.7558).unwrap()
    }

    #[test]
    fn new_moons_are_a_synodic_month_apart() {
        let eph = KeplerianEphemeris::new();
        let near = Utc.with_ymd_and_hms(2026, 1, 25, 0, 0, 0).unwrap();
        let first = next_new_moon(&eph, near).unwrap();
        let second = next_new_moon(&eph, first + Duration::minutes(1)).unwrap();
        let days = (second - first).num_seconds() as f64 / 86_400.0;
        assert!((days - 29.53).abs() < 0.05, "lunation length {days}");
    }

    #[test]
    fn previous_and_next_new_moon_bracket_the_instant() {
        let eph = KeplerianEphemeris::new();
        let instant = Utc.with_ymd_and_hms(2026, 5, 14, 9, 30, 0).unwrap();
        let prev = previous_new_moon(&eph, instant).unwrap();
        let next = next_new_moon(&eph, instant).unwrap();
        assert!(prev <= instant);
        assert!(next > instant);
        assert!(next > prev);
    }

    #[test]
    fn first_lunar_day_opens_at_the_new_moon() {
        let eph = KeplerianEphemeris::new();
        let loc = moscow();
        let near = Utc.with_ymd_and_hms(2026, 2, 1, 0, 0, 0).unwrap();
        let new_moon = next_new_moon(&eph, near).unwrap();
        let first_rise = crate::moon::riseset::next_moonrise(&eph, &loc, new_moon).unwrap();

        // Probe halfway between the boundaries so the result cannot
        // straddle either of them.
        let day = lunar_day(&eph, new_moon + (first_rise - new_moon) / 2, &loc).unwrap();
        assert_eq!(day.number, 1);
        assert!((day.start - new_moon).num_seconds().abs() <= 2);
        assert!((day.end - first_rise).num_seconds().abs() <= 2);
    }

    #[test]
    fn lunar_days_tile_the_lunation() {
        let eph = KeplerianEphemeris::new();
        let loc = moscow();
        let near = Utc.with_ymd_and_hms(2026, 2, 1, 0, 0, 0).unwrap();
        let new_moon = next_new_moon(&eph, near).unwrap();
        let lunation_end = next_new_moon(&eph, new_moon + Duration::hours(1)).unwrap();
        let first_rise = crate::moon::riseset::next_moonrise(&eph, &loc, new_moon).unwrap();

        let mut day = lunar_day(&eph, new_moon + (first_rise - new_moon) / 2, &loc).unwrap();
        let mut last_number = 0u8;
        let mut steps = 0;
        loop {
            assert!(day.number >= 1 && day.number <= 30);
            assert!(
                day.number as i16 - last_number as i16 == 1,
                "numbers must ascend without gaps: {last_number} -> {}",
                day.number
            );
            assert!(day.end > day.start);
            last_number = day.number;

            if (day.end - lunation_end).num_seconds().abs() <= 2 {
                break; // final day closed by the next new moon
            }
            let next = next_lunar_day(&eph, &day, &loc).unwrap();
            assert!(
                (next.start - day.end).num_seconds().abs() <= 2,
                "gap between day {} end and day {} start",
                day.number,
                next.number
            );
            day = next;
            steps += 1;
            assert!(steps < 32, "lunation did not close");
        }
        assert!(last_number >= 28, "lunation held {last_number} days");
    }

    #[test]
    fn previous_lunar_day_inverts_next() {
        let eph = KeplerianEphemeris::new();
        let loc = moscow();
        let instant = Utc.with_ymd_and_hms(2026, 8, 20, 12, 0, 0).unwrap();
        let day = lunar_day(&eph, instant, &loc).unwrap();
        let next = next_lunar_day(&eph, &day, &loc).unwrap();
        let back = previous_lunar_day(&eph, &next, &loc).unwrap();
        assert_eq!(back.number, day.number);
        assert!((back.start - day.start).num_seconds().abs() <= 2);
    }

    #[test]
    fn main_lunar_day_dominates_the_date() {
        let eph = KeplerianEphemeris::new();
        let loc = moscow();
        let day_start = Utc.with_ymd_and_hms(2026, 3, 9, 21, 0, 0).unwrap(); // local midnight UTC+3
        let day_end = day_start + Duration::hours(24);

        let main = main_lunar_day_on_date(&eph, day_start, &loc).unwrap();

        // Walk every lunar day touching the date and measure overlap.
        let mut cursor = lunar_day(&eph, day_start, &loc).unwrap();
        let mut best_number = cursor.number;
        let mut best_overlap = Duration::zero();
        loop {
            let overlap = cursor.end.min(day_end) - cursor.start.max(day_start);
            if overlap > best_overlap {
                best_overlap = overlap;
                best_number = cursor.number;
            }
            if cursor.end >= day_end {
                break;
            }
            cursor = next_lunar_day(&eph, &cursor, &loc).unwrap();
        }
        assert_eq!(main.number, best_number);
    }
}
