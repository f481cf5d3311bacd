use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::planets::Planet;
use crate::time::JulianDay;
use crate::types::Location;

/// A body's ecliptic state at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EclipticState {
    /// Ecliptic longitude in degrees, [0, 360).
    pub longitude: f64,
    /// Ecliptic latitude in degrees.
    pub latitude: f64,
    /// Distance from the observer in astronomical units.
    pub distance_au: f64,
    /// Instantaneous longitude speed in degrees per day.
    pub speed: f64,
}

impl EclipticState {
    pub fn is_retrograde(&self) -> bool {
        self.speed < 0.0
    }
}

/// The single seam every engine talks to.
///
/// Implementations wrap a concrete planetary theory; callers stay
/// agnostic to the library behind it. Passing an observer activates
/// topocentric correction (parallax from the surface point instead of
/// the geocentre).
pub trait Ephemeris: Send + Sync {
    fn state(
        &self,
        planet: Planet,
        jd: JulianDay,
        observer: Option<&Location>,
    ) -> Result<EclipticState, Error>;

    /// Longitude-only convenience for the classification paths.
    fn longitude(
        &self,
        planet: Planet,
        jd: JulianDay,
        observer: Option<&Location>,
    ) -> Result<f64, Error> {
        Ok(self.state(planet, jd, observer)?.longitude)
    }
}
