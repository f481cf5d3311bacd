use std::path::PathBuf;

use parking_lot::Mutex;
use swisseph::swe::calc_ut;

use crate::ephemeris::topocentric;
use crate::ephemeris::types::{EclipticState, Ephemeris};
use crate::error::Error;
use crate::planets::Planet;
use crate::time::JulianDay;
use crate::types::Location;

// Swiss Ephemeris calculation flags.
const FLG_SWIEPH: i32 = 2; // use Swiss Ephemeris data files
const FLG_MOSEPH: i32 = 4; // Moshier analytic theory, no data files needed
const FLG_SPEED: i32 = 256; // request longitude speed in out[3]

/// Swiss Ephemeris backend.
///
/// The native library keeps process-wide state, so every call is
/// serialized through one mutex; embedders that want parallel queries
/// run one adapter per worker.
pub struct SwissEphemerisAdapter {
    flags: i32,
    _ephemeris_path: Option<PathBuf>,
    lock: Mutex<()>,
}

impl SwissEphemerisAdapter {
    /// Create an adapter. With an ephemeris directory the high-precision
    /// data files are used; without one the built-in Moshier theory is,
    /// which needs no files and is accurate to well under the search
    /// orbs used here.
    pub fn new(ephemeris_path: Option<PathBuf>) -> Result<Self, Error> {
        if let Some(path) = &ephemeris_path {
            if !path.exists() {
                return Err(Error::Domain(format!(
                    "ephemeris path {} does not exist",
                    path.display()
                )));
            }
        }
        let flags = if ephemeris_path.is_some() {
            FLG_SPEED | FLG_SWIEPH
        } else {
            FLG_SPEED | FLG_MOSEPH
        };
        Ok(Self {
            flags,
            _ephemeris_path: ephemeris_path,
            lock: Mutex::new(()),
        })
    }
}

impl Ephemeris for SwissEphemerisAdapter {
    fn state(
        &self,
        planet: Planet,
        jd: JulianDay,
        observer: Option<&Location>,
    ) -> Result<EclipticState, Error> {
        let out = {
            let _guard = self.lock.lock();
            let result = calc_ut(jd.0, planet.swe_body() as u32, self.flags as u32).map_err(
                |e| Error::Ephemeris {
                    planet,
                    jd: jd.0,
                    message: format!("Swiss Ephemeris error: {e}"),
                },
            )?;
            result.out
        };

        let state = EclipticState {
            longitude: out[0].rem_euclid(360.0),
            latitude: out[1],
            distance_au: out[2],
            speed: out[3],
        };
        Ok(match observer {
            Some(location) => topocentric::apply(state, jd, location),
            None => state,
        })
    }
}
