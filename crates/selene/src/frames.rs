//! Coordinate transforms shared by the topocentric correction and the
//! moonrise search: mean obliquity, ecliptic/equatorial conversion, and
//! Greenwich sidereal time.
//!
//! Formulas are the standard spherical-astronomy ones (Meeus ch. 12,
//! 13, 22); angles are degrees unless a name says otherwise.

use crate::time::{JulianDay, J2000_JD};

/// Mean obliquity of the ecliptic, degrees.
pub fn obliquity_deg(jd: JulianDay) -> f64 {
    let t = jd.centuries();
    23.439_291_111 - 0.013_004_167 * t - 1.638_9e-7 * t * t + 5.036_1e-7 * t * t * t
}

/// Ecliptic longitude/latitude to equatorial right ascension/declination.
///
/// Returns (ra_deg in [0, 360), dec_deg in [-90, 90]).
pub fn ecliptic_to_equatorial(lon_deg: f64, lat_deg: f64, obliquity_deg: f64) -> (f64, f64) {
    let lon = lon_deg.to_radians();
    let lat = lat_deg.to_radians();
    let eps = obliquity_deg.to_radians();

    let ra = (lon.sin() * eps.cos() - lat.tan() * eps.sin()).atan2(lon.cos());
    let dec = (lat.sin() * eps.cos() + lat.cos() * eps.sin() * lon.sin()).asin();
    (ra.to_degrees().rem_euclid(360.0), dec.to_degrees())
}

/// Equatorial back to ecliptic. Returns (lon_deg in [0, 360), lat_deg).
pub fn equatorial_to_ecliptic(ra_deg: f64, dec_deg: f64, obliquity_deg: f64) -> (f64, f64) {
    let ra = ra_deg.to_radians();
    let dec = dec_deg.to_radians();
    let eps = obliquity_deg.to_radians();

    let lon = (ra.sin() * eps.cos() + dec.tan() * eps.sin()).atan2(ra.cos());
    let lat = (dec.sin() * eps.cos() - dec.cos() * eps.sin() * ra.sin()).asin();
    (lon.to_degrees().rem_euclid(360.0), lat.to_degrees())
}

/// Greenwich mean sidereal time in degrees, [0, 360).
///
/// Meeus eq. 12.4; the UT1-UTC difference (under a second) is ignored,
/// which costs far less than the one-minute search resolution.
pub fn gmst_deg(jd_ut: JulianDay) -> f64 {
    let d = jd_ut.0 - J2000_JD;
    let t = d / 36_525.0;
    let theta = 280.460_618_37 + 360.985_647_366_29 * d + 0.000_387_933 * t * t
        - t * t * t / 38_710_000.0;
    theta.rem_euclid(360.0)
}

/// Local sidereal time from GMST and east longitude, degrees in [0, 360).
pub fn local_sidereal_deg(gmst_deg: f64, longitude_east_deg: f64) -> f64 {
    (gmst_deg + longitude_east_deg).rem_euclid(360.0)
}

/// Normalize an angle difference to (-180, 180].
pub fn normalize_pm180(angle_deg: f64) -> f64 {
    let a = angle_deg.rem_euclid(360.0);
    if a > 180.0 {
        a - 360.0
    } else {
        a
    }
}

/// Angular separation of two longitudes, folded to [0, 180].
pub fn separation_deg(lon1: f64, lon2: f64) -> f64 {
    let d = (lon1 - lon2).abs().rem_euclid(360.0);
    if d > 180.0 {
        360.0 - d
    } else {
        d
    }
}
