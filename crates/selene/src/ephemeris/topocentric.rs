//! Parallax correction from the geocentre to an observer on the
//! surface (Meeus ch. 40). Only the moon moves visibly under it
//! (up to ~1°); for the planets the shift is under an arcsecond but
//! costs nothing to apply uniformly.

use crate::ephemeris::types::EclipticState;
use crate::frames::{
    ecliptic_to_equatorial, equatorial_to_ecliptic, gmst_deg, local_sidereal_deg, obliquity_deg,
};
use crate::time::JulianDay;
use crate::types::Location;

const EARTH_EQUATORIAL_RADIUS_KM: f64 = 6_378.14;
const EARTH_EQUATORIAL_RADIUS_M: f64 = 6_378_140.0;
const AU_KM: f64 = 149_597_870.7;

/// Flattening factor b/a of the reference ellipsoid.
const EARTH_FLATTENING: f64 = 0.996_647_19;

pub fn apply(state: EclipticState, jd: JulianDay, observer: &Location) -> EclipticState {
    let distance_km = state.distance_au * AU_KM;
    if distance_km <= EARTH_EQUATORIAL_RADIUS_KM {
        return state;
    }
    let sin_parallax = EARTH_EQUATORIAL_RADIUS_KM / distance_km;

    // Observer's geocentric coordinates on the ellipsoid.
    let phi = observer.latitude_rad();
    let u = (EARTH_FLATTENING * phi.tan()).atan();
    let height = observer.altitude / EARTH_EQUATORIAL_RADIUS_M;
    let rho_sin_phi = EARTH_FLATTENING * u.sin() + height * phi.sin();
    let rho_cos_phi = u.cos() + height * phi.cos();

    let eps = obliquity_deg(jd);
    let (ra_deg, dec_deg) = ecliptic_to_equatorial(state.longitude, state.latitude, eps);
    let lst = local_sidereal_deg(gmst_deg(jd), observer.longitude);
    let hour_angle = (lst - ra_deg).to_radians();
    let dec = dec_deg.to_radians();

    let denom = dec.cos() - rho_cos_phi * sin_parallax * hour_angle.cos();
    let delta_ra = (-rho_cos_phi * sin_parallax * hour_angle.sin()).atan2(denom);
    let dec_topo = ((dec.sin() - rho_sin_phi * sin_parallax) * delta_ra.cos()).atan2(denom);

    let ra_topo = ra_deg + delta_ra.to_degrees();
    let (longitude, latitude) = equatorial_to_ecliptic(ra_topo, dec_topo.to_degrees(), eps);

    EclipticState {
        longitude,
        latitude,
        ..state
    }
}
