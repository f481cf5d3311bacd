use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Geographic location of an observer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// East longitude in degrees, -180..180.
    pub longitude: f64,
    /// Latitude in degrees, -90..90.
    pub latitude: f64,
    /// Altitude above sea level in meters.
    #[serde(default)]
    pub altitude: f64,
}

impl Location {
    pub fn new(longitude: f64, latitude: f64) -> Result<Self, Error> {
        Self::with_altitude(longitude, latitude, 0.0)
    }

    pub fn with_altitude(longitude: f64, latitude: f64, altitude: f64) -> Result<Self, Error> {
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(Error::Domain(format!(
                "longitude {longitude} outside [-180, 180]"
            )));
        }
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(Error::Domain(format!(
                "latitude {latitude} outside [-90, 90]"
            )));
        }
        Ok(Self {
            longitude,
            latitude,
            altitude,
        })
    }

    pub fn longitude_rad(&self) -> f64 {
        self.longitude.to_radians()
    }

    pub fn latitude_rad(&self) -> f64 {
        self.latitude.to_radians()
    }
}

/// The person a forecast is computed for: birth moment and the two
/// locations that matter (where they were born, where they are now).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Subject {
    pub birth_instant: DateTime<Utc>,
    pub birth_location: Location,
    pub current_location: Location,
}

impl Subject {
    pub fn new(
        birth_instant: DateTime<Utc>,
        birth_location: Location,
        current_location: Location,
    ) -> Self {
        Self {
            birth_instant,
            birth_location,
            current_location,
        }
    }

    /// Rejects queries that predate the birth moment.
    pub fn check_query_instant(&self, instant: DateTime<Utc>) -> Result<(), Error> {
        if instant < self.birth_instant {
            return Err(Error::Domain(format!(
                "query instant {instant} precedes birth {}",
                self.birth_instant
            )));
        }
        Ok(())
    }
}

/// A half-open UTC interval [start, end).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimePeriod {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimePeriod {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, Error> {
        if start > end {
            return Err(Error::Domain(format!(
                "period start {start} after end {end}"
            )));
        }
        Ok(Self { start, end })
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant < self.end
    }

    pub fn duration(&self) -> chrono::Duration {
        self.end - self.start
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn location_rejects_out_of_range() {
        assert!(Location::new(181.0, 0.0).is_err());
        assert!(Location::new(0.0, 95.0).is_err());
        assert!(Location::new(37.6173, 55.7558).is_ok());
    }

    #[test]
    fn period_rejects_reversed_bounds() {
        let a = Utc.with_ymd_and_hms(2026, 1, 25, 0, 0, 0).unwrap();
        let b = Utc.with_ymd_and_hms(2026, 1, 26, 0, 0, 0).unwrap();
        assert!(TimePeriod::new(b, a).is_err());
        let p = TimePeriod::new(a, b).unwrap();
        assert!(p.contains(a));
        assert!(!p.contains(b));
    }
}
