//! The moon's zodiac sign: instantaneous classification, the sign
//! change on a calendar day, and the bracketing interval of the
//! current sign.
//!
//! The moon covers at most ~0.62°/hour, so a one-hour probe can never
//! step over a whole 30° sign; that makes coarse striding plus
//! bisection safe everywhere here.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::ephemeris::Ephemeris;
use crate::error::Error;
use crate::planets::Planet;
use crate::time::{self, julian_day, JulianDay};
use crate::types::Location;
use crate::zodiac::ZodiacSign;

/// Bisection stops once the bracket is this narrow (one minute),
/// the shared stopping width across all engines.
const BISECTION_LIMIT_DAYS: f64 = 60.0 / 86_400.0;

/// Stride for walking toward a sign boundary.
const STRIDE_HOURS: f64 = 1.0;

/// A sign can last ~2.8 days; cap the outward walk well past that.
const MAX_STRIDES: usize = 80;

/// The moon holds `sign` on the half-open interval [start, end).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoonSignSegment {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub sign: ZodiacSign,
}

/// A sign transition found within a local day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoonSignChange {
    pub at: DateTime<Utc>,
    pub sign: ZodiacSign,
}

/// What `moon_signs_on_date` reports: the sign at the start of the
/// local day and, when the moon egresses during the day, the change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoonSignsOnDate {
    pub start_sign: ZodiacSign,
    pub change: Option<MoonSignChange>,
}

pub fn moon_sign_at(
    eph: &dyn Ephemeris,
    instant: DateTime<Utc>,
    location: &Location,
) -> Result<ZodiacSign, Error> {
    sign_at_jd(eph, Planet::Moon, julian_day(instant), location)
}

fn sign_at_jd(
    eph: &dyn Ephemeris,
    planet: Planet,
    jd: JulianDay,
    location: &Location,
) -> Result<ZodiacSign, Error> {
    let longitude = eph.longitude(planet, jd, Some(location))?;
    Ok(ZodiacSign::from_longitude(longitude))
}

/// Narrow a bracket around a sign boundary to one minute.
///
/// Invariant on entry: the planet holds `sign_before` at `before` and a
/// different sign at `after`. Returns the `after` edge of the final
/// bracket, i.e. the first probed instant past the boundary.
fn refine_boundary(
    eph: &dyn Ephemeris,
    planet: Planet,
    location: &Location,
    mut before: JulianDay,
    mut after: JulianDay,
    sign_before: ZodiacSign,
) -> Result<JulianDay, Error> {
    while after.days_since(before) > BISECTION_LIMIT_DAYS {
        let mid = JulianDay((before.0 + after.0) / 2.0);
        if sign_at_jd(eph, planet, mid, location)? == sign_before {
            before = mid;
        } else {
            after = mid;
        }
    }
    Ok(after)
}

/// Moon signs over one local calendar day.
///
/// Evaluates at the start and end of the local day; when they differ,
/// bisects the single transition to within a minute.
pub fn moon_signs_on_date(
    eph: &dyn Ephemeris,
    date: NaiveDate,
    offset_hours: i32,
    location: &Location,
) -> Result<MoonSignsOnDate, Error> {
    let bounds = time::local_day_bounds(date, offset_hours)?;
    let start_jd = julian_day(bounds.start);
    let end_jd = julian_day(bounds.end);

    let start_sign = sign_at_jd(eph, Planet::Moon, start_jd, location)?;
    let end_sign = sign_at_jd(eph, Planet::Moon, end_jd, location)?;
    if start_sign == end_sign {
        return Ok(MoonSignsOnDate {
            start_sign,
            change: None,
        });
    }

    let boundary = refine_boundary(eph, Planet::Moon, location, start_jd, end_jd, start_sign)?;
    Ok(MoonSignsOnDate {
        start_sign,
        change: Some(MoonSignChange {
            at: time::from_julian_day(boundary)?,
            sign: end_sign,
        }),
    })
}

/// The bracketing interval of the moon's current sign around `instant`.
///
/// Walks outward in one-hour strides until the sign differs, then
/// bisects into the last stride on each side.
pub fn moon_sign_period(
    eph: &dyn Ephemeris,
    instant: DateTime<Utc>,
    location: &Location,
) -> Result<MoonSignSegment, Error> {
    let jd = julian_day(instant);
    let sign = sign_at_jd(eph, Planet::Moon, jd, location)?;

    let start = walk_to_boundary(eph, location, jd, sign, -STRIDE_HOURS)?;
    let end = walk_to_boundary(eph, location, jd, sign, STRIDE_HOURS)?;

    Ok(MoonSignSegment {
        start: time::from_julian_day(start)?,
        end: time::from_julian_day(end)?,
        sign,
    })
}

fn walk_to_boundary(
    eph: &dyn Ephemeris,
    location: &Location,
    from: JulianDay,
    sign: ZodiacSign,
    stride_hours: f64,
) -> Result<JulianDay, Error> {
    let stride = stride_hours / 24.0;
    let mut inside = from;
    for _ in 0..MAX_STRIDES {
        let probe = inside.add_days(stride);
        if sign_at_jd(eph, Planet::Moon, probe, location)? != sign {
            // Order the bracket chronologically regardless of direction.
            return if stride > 0.0 {
                refine_boundary(eph, Planet::Moon, location, inside, probe, sign)
            } else {
                // Walking backwards: `probe` holds the previous sign and
                // the boundary is the first instant of `sign`.
                let prev_sign = sign_at_jd(eph, Planet::Moon, probe, location)?;
                refine_boundary(eph, Planet::Moon, location, probe, inside, prev_sign)
            };
        }
        inside = probe;
    }
    Err(Error::Computation("sign boundary not found within stride cap"))
}

/// Every sign-entry instant of `planet` within `period`.
///
/// Hour-grid scan with the same boundary refinement; the grid is dense
/// enough for every body up to the moon's rate.
pub fn sign_ingresses(
    eph: &dyn Ephemeris,
    planet: Planet,
    period: crate::types::TimePeriod,
    location: &Location,
) -> Result<Vec<(DateTime<Utc>, ZodiacSign)>, Error> {
    let mut ingresses = Vec::new();
    let mut cursor = period.start;
    let mut cursor_sign = sign_at_jd(eph, planet, julian_day(cursor), location)?;

    while cursor < period.end {
        let probe = (cursor + Duration::hours(1)).min(period.end);
        let probe_sign = sign_at_jd(eph, planet, julian_day(probe), location)?;
        if probe_sign != cursor_sign {
            let boundary = refine_boundary(
                eph,
                planet,
                location,
                julian_day(cursor),
                julian_day(probe),
                cursor_sign,
            )?;
            ingresses.push((time::from_julian_day(boundary)?, probe_sign));
        }
        cursor = probe;
        cursor_sign = probe_sign;
    }
    Ok(ingresses)
}
