//! Moon phase from the illuminated fraction, with a six-hour probe to
//! tell waxing from waning.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ephemeris::Ephemeris;
use crate::error::Error;
use crate::frames::separation_deg;
use crate::planets::Planet;
use crate::time::julian_day;
use crate::types::Location;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoonPhase {
    New,
    WaxingCrescent,
    FirstQuarter,
    WaxingGibbous,
    Full,
    WaningGibbous,
    LastQuarter,
    WaningCrescent,
}

impl MoonPhase {
    pub fn name(&self) -> &'static str {
        match self {
            MoonPhase::New => "new",
            MoonPhase::WaxingCrescent => "waxing_crescent",
            MoonPhase::FirstQuarter => "first_quarter",
            MoonPhase::WaxingGibbous => "waxing_gibbous",
            MoonPhase::Full => "full",
            MoonPhase::WaningGibbous => "waning_gibbous",
            MoonPhase::LastQuarter => "last_quarter",
            MoonPhase::WaningCrescent => "waning_crescent",
        }
    }
}

impl fmt::Display for MoonPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Illuminated fraction of the lunar disc, in [0, 1].
///
/// Derived from the sun–moon elongation: the phase angle is its
/// supplement, so k = (1 − cos ψ) / 2. New moon gives 0, full gives 1.
pub fn illuminated_fraction(
    eph: &dyn Ephemeris,
    instant: DateTime<Utc>,
    location: &Location,
) -> Result<f64, Error> {
    let jd = julian_day(instant);
    let moon = eph.longitude(Planet::Moon, jd, Some(location))?;
    let sun = eph.longitude(Planet::Sun, jd, Some(location))?;
    let elongation = separation_deg(moon, sun);
    Ok((1.0 - elongation.to_radians().cos()) / 2.0)
}

/// Classify the phase at an instant.
///
/// Fraction bands pick the shape; the fraction six hours earlier picks
/// the direction. Six hours is coarse enough to ride over jitter near
/// the quarters yet far shorter than the week between them.
pub fn moon_phase(
    eph: &dyn Ephemeris,
    instant: DateTime<Utc>,
    location: &Location,
) -> Result<MoonPhase, Error> {
    let fraction = illuminated_fraction(eph, instant, location)?;
    if fraction <= 0.01 {
        return Ok(MoonPhase::New);
    }
    if fraction >= 0.99 {
        return Ok(MoonPhase::Full);
    }

    let earlier = illuminated_fraction(eph, instant - Duration::hours(6), location)?;
    let waxing = fraction > earlier;

    Ok(if fraction < 0.45 {
        if waxing {
            MoonPhase::WaxingCrescent
        } else {
            MoonPhase::WaningCrescent
        }
    } else if fraction <= 0.55 {
        if waxing {
            MoonPhase::FirstQuarter
        } else {
            MoonPhase::LastQuarter
        }
    } else if waxing {
        MoonPhase::WaxingGibbous
    } else {
        MoonPhase::WaningGibbous
    })
}
