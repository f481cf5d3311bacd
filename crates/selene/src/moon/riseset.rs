//! Moonrise search.
//!
//! Iterative hour-angle algorithm from standard spherical astronomy:
//! find the time the moon's geocentric altitude crosses the standard
//! rising altitude (parallax minus refraction), anchored to the lunar
//! transit nearest a local noon. At polar latitudes the moon can stay
//! up or down for days; the public entry points recover by advancing
//! the probe day until a rising resolves.

use chrono::{DateTime, Utc};
use log::debug;

use crate::ephemeris::Ephemeris;
use crate::error::Error;
use crate::frames::{ecliptic_to_equatorial, gmst_deg, local_sidereal_deg, normalize_pm180, obliquity_deg};
use crate::planets::Planet;
use crate::time::{self, julian_day, JulianDay};
use crate::types::Location;

const MAX_ITERATIONS: usize = 8;

/// Convergence threshold in days (~0.09 s).
const CONVERGENCE_DAYS: f64 = 1.0e-6;

/// Sidereal turn rate, degrees of hour angle per day.
const SIDEREAL_RATE_DEG: f64 = 360.985_647_366;

/// Standard refraction at the horizon, degrees (34').
const REFRACTION_DEG: f64 = 0.566;

const EARTH_EQUATORIAL_RADIUS_KM: f64 = 6_378.14;
const AU_KM: f64 = 149_597_870.7;

/// Longest stretch without a moonrise is under a month even at the
/// poles; give the day-advancing recovery a generous cap.
const MAX_SEARCH_DAYS: i64 = 45;

/// Guard band for the forward search. The iteration converges to
/// ~0.1 s and results are rounded to whole seconds, so an anchor that
/// is itself a previously returned rise could otherwise match again as
/// "strictly later" by a fraction of a second.
const ANCHOR_EPSILON_DAYS: f64 = 2.0 / 86_400.0;

/// Outcome of a single-day probe.
#[derive(Debug, Clone, Copy, PartialEq)]
enum RiseProbe {
    At(JulianDay),
    /// The moon stays below the rising altitude all day.
    NeverRises,
    /// The moon stays above it (circumpolar).
    NeverSets,
}

fn moon_equatorial(
    eph: &dyn Ephemeris,
    jd: JulianDay,
) -> Result<(f64, f64, f64), Error> {
    let state = eph.state(Planet::Moon, jd, None)?;
    let (ra, dec) = ecliptic_to_equatorial(state.longitude, state.latitude, obliquity_deg(jd));
    Ok((ra, dec, state.distance_au))
}

/// Standard rising altitude for the moon at a given distance:
/// 0.7275·parallax − refraction (both in degrees).
fn rising_altitude_deg(distance_au: f64) -> f64 {
    let sin_parallax = EARTH_EQUATORIAL_RADIUS_KM / (distance_au * AU_KM);
    let parallax_deg = sin_parallax.asin().to_degrees();
    0.7275 * parallax_deg - REFRACTION_DEG
}

/// Find the moonrise anchored to the lunar transit nearest `jd_noon`.
fn moonrise_near(
    eph: &dyn Ephemeris,
    location: &Location,
    jd_noon: JulianDay,
) -> Result<RiseProbe, Error> {
    let phi = location.latitude_rad();
    let (ra, dec, distance) = moon_equatorial(eph, jd_noon)?;

    let h0 = rising_altitude_deg(distance).to_radians();
    let dec_rad = dec.to_radians();
    let cos_ha = (h0.sin() - phi.sin() * dec_rad.sin()) / (phi.cos() * dec_rad.cos());
    if cos_ha > 1.0 {
        return Ok(RiseProbe::NeverRises);
    }
    if cos_ha < -1.0 {
        return Ok(RiseProbe::NeverSets);
    }
    let ha_rise = cos_ha.acos().to_degrees(); // always positive

    // Transit nearest the probe noon, then back off by the rise hour angle.
    let lst_noon = local_sidereal_deg(gmst_deg(jd_noon), location.longitude);
    let ha_noon = normalize_pm180(lst_noon - ra);
    let jd_transit = jd_noon.add_days(-ha_noon / SIDEREAL_RATE_DEG);
    let mut jd_event = jd_transit.add_days(-ha_rise / SIDEREAL_RATE_DEG);

    // Refine: the moon's RA moves ~13°/day, so the first estimate can
    // be off by minutes; each pass recomputes the geometry at the
    // current estimate and corrects along the sidereal rate.
    for _ in 0..MAX_ITERATIONS {
        let (ra_i, dec_i, distance_i) = moon_equatorial(eph, jd_event)?;
        let h0_i = rising_altitude_deg(distance_i).to_radians();
        let dec_i_rad = dec_i.to_radians();

        let cos_ha_i = (h0_i.sin() - phi.sin() * dec_i_rad.sin()) / (phi.cos() * dec_i_rad.cos());
        if cos_ha_i > 1.0 {
            return Ok(RiseProbe::NeverRises);
        }
        if cos_ha_i < -1.0 {
            return Ok(RiseProbe::NeverSets);
        }
        let ha_target = -cos_ha_i.acos().to_degrees(); // rising branch

        let lst = local_sidereal_deg(gmst_deg(jd_event), location.longitude);
        let ha_actual = normalize_pm180(lst - ra_i);
        let correction = normalize_pm180(ha_target - ha_actual) / SIDEREAL_RATE_DEG;

        jd_event = jd_event.add_days(correction);
        if correction.abs() < CONVERGENCE_DAYS {
            break;
        }
    }

    Ok(RiseProbe::At(jd_event))
}

/// Mean-solar local noon (UTC JD) of the local day containing `jd`.
fn local_noon_of(jd: JulianDay, location: &Location) -> JulianDay {
    let shift = location.longitude / 360.0;
    let day_index = (jd.0 + shift + 0.5).floor();
    JulianDay(day_index - shift)
}

/// First moonrise strictly after `after`.
pub fn next_moonrise(
    eph: &dyn Ephemeris,
    location: &Location,
    after: DateTime<Utc>,
) -> Result<DateTime<Utc>, Error> {
    let jd_after = julian_day(after);
    let noon0 = local_noon_of(jd_after, location);

    for day in 0..MAX_SEARCH_DAYS {
        let noon = noon0.add_days(day as f64);
        match moonrise_near(eph, location, noon)? {
            RiseProbe::At(jd) if jd.0 > jd_after.0 + ANCHOR_EPSILON_DAYS => {
                return time::from_julian_day(jd)
            }
            RiseProbe::At(_) => {}
            probe => {
                debug!(
                    "no moonrise at lat {} on probe day {day}: {probe:?}, advancing",
                    location.latitude
                );
            }
        }
    }
    Err(Error::Computation("no moonrise within the search window"))
}

/// Last moonrise at or before `instant`.
pub fn previous_moonrise(
    eph: &dyn Ephemeris,
    location: &Location,
    instant: DateTime<Utc>,
) -> Result<DateTime<Utc>, Error> {
    let jd_limit = julian_day(instant);
    let noon0 = local_noon_of(jd_limit, location);

    // A rise late in the local day can be anchored to the next day's
    // transit, so the backward scan starts one day ahead.
    for step in 0..MAX_SEARCH_DAYS {
        let noon = noon0.add_days((1 - step) as f64);
        match moonrise_near(eph, location, noon)? {
            RiseProbe::At(jd) if jd.0 <= jd_limit.0 => return time::from_julian_day(jd),
            RiseProbe::At(_) => {}
            probe => {
                debug!(
                    "no moonrise at lat {} on probe day {}: {probe:?}, retreating",
                    location.latitude,
                    1 - step
                );
            }
        }
    }
    Err(Error::Computation("no moonrise within the search window"))
}
