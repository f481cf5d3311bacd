//! Deterministic mean-motion ephemeris.
//!
//! Each body moves along the ecliptic at its mean rate from its J2000
//! mean longitude; the moon additionally carries its mean latitude
//! oscillation. The model reproduces the real cadence of sign
//! transitions, lunations and fast aspects, which is what the search
//! engines care about, and it needs no native library — the test
//! suites and offline tooling run against it.

use crate::ephemeris::types::{EclipticState, Ephemeris};
use crate::error::Error;
use crate::planets::Planet;
use crate::time::{JulianDay, J2000_JD};
use crate::types::Location;

struct MeanMotion {
    /// Mean longitude at J2000.0, degrees.
    longitude_j2000: f64,
    /// Mean daily motion, degrees per day.
    rate: f64,
    /// Representative observer distance, AU.
    distance_au: f64,
}

fn motion_of(planet: Planet) -> MeanMotion {
    // J2000 mean longitudes and mean motions; outer-planet rates are
    // heliocentric means, close enough for slow transiting bodies.
    match planet {
        Planet::Sun => MeanMotion {
            longitude_j2000: 280.460,
            rate: 0.985_647_36,
            distance_au: 1.0,
        },
        Planet::Moon => MeanMotion {
            longitude_j2000: 218.316,
            rate: 13.176_396_48,
            distance_au: 0.002_57,
        },
        Planet::Mercury => MeanMotion {
            longitude_j2000: 252.251,
            rate: 4.092_334,
            distance_au: 1.0,
        },
        Planet::Venus => MeanMotion {
            longitude_j2000: 181.980,
            rate: 1.602_130,
            distance_au: 1.2,
        },
        Planet::Mars => MeanMotion {
            longitude_j2000: 355.433,
            rate: 0.524_033,
            distance_au: 1.5,
        },
        Planet::Jupiter => MeanMotion {
            longitude_j2000: 34.351,
            rate: 0.083_091,
            distance_au: 5.2,
        },
        Planet::Saturn => MeanMotion {
            longitude_j2000: 50.077,
            rate: 0.033_459,
            distance_au: 9.5,
        },
        Planet::Uranus => MeanMotion {
            longitude_j2000: 314.055,
            rate: 0.011_731,
            distance_au: 19.2,
        },
        Planet::Neptune => MeanMotion {
            longitude_j2000: 304.349,
            rate: 0.005_982,
            distance_au: 30.1,
        },
        Planet::Pluto => MeanMotion {
            longitude_j2000: 238.958,
            rate: 0.003_968,
            distance_au: 39.5,
        },
    }
}

/// Mean argument of latitude of the moon at J2000, and its rate.
const MOON_F0: f64 = 93.272;
const MOON_F_RATE: f64 = 13.229_350;
const MOON_INCLINATION: f64 = 5.128;

#[derive(Debug, Default, Clone, Copy)]
pub struct KeplerianEphemeris;

impl KeplerianEphemeris {
    pub fn new() -> Self {
        Self
    }
}

impl Ephemeris for KeplerianEphemeris {
    fn state(
        &self,
        planet: Planet,
        jd: JulianDay,
        _observer: Option<&Location>,
    ) -> Result<EclipticState, Error> {
        let motion = motion_of(planet);
        let days = jd.0 - J2000_JD;
        let longitude = (motion.longitude_j2000 + motion.rate * days).rem_euclid(360.0);
        let latitude = if planet == Planet::Moon {
            MOON_INCLINATION * (MOON_F0 + MOON_F_RATE * days).to_radians().sin()
        } else {
            0.0
        };
        Ok(EclipticState {
            longitude,
            latitude,
            distance_au: motion.distance_au,
            speed: motion.rate,
        })
    }
}
