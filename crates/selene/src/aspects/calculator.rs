//! Angular aspect matching and peak refinement.

use chrono::{DateTime, Utc};

use crate::aspects::types::Aspect;
use crate::ephemeris::Ephemeris;
use crate::error::Error;
use crate::frames::separation_deg;
use crate::planets::Planet;
use crate::time::{self, julian_day};
use crate::types::Location;

/// Default orb for peak detection, degrees.
pub const DEFAULT_ORB: f64 = 0.1;

/// Match two longitudes against an aspect set.
///
/// The separation is folded to [0, 180] before comparison, which makes
/// the check symmetric in its arguments and wrap-safe (350° vs 10° is a
/// 20° separation, not 340°). The first matching aspect in set order
/// wins; with sub-degree orbs at most one can match anyway.
pub fn aspect_of(lon1: f64, lon2: f64, aspects: &[Aspect], orb: f64) -> Option<Aspect> {
    let separation = separation_deg(lon1, lon2);
    aspects
        .iter()
        .find(|aspect| (separation - aspect.angle_deg()).abs() <= orb)
        .copied()
}

/// Refine an approximate aspect instant toward its exact peak.
///
/// One correction along the relative angular velocity: the residual
/// separation divided by |v1 − v2| is the predicted time to peak in
/// days. Fails when the bodies move in lockstep, in which case no peak
/// is defined.
pub fn peak_time(
    eph: &dyn Ephemeris,
    approx: DateTime<Utc>,
    p1: Planet,
    p2: Planet,
    aspect: Aspect,
    observer: Option<&Location>,
) -> Result<DateTime<Utc>, Error> {
    let jd = julian_day(approx);
    let s1 = eph.state(p1, jd, observer)?;
    let s2 = eph.state(p2, jd, observer)?;

    let relative_speed = (s1.speed - s2.speed).abs();
    if relative_speed < 1.0e-6 {
        return Err(Error::Computation(
            "relative angular velocity too small to refine a peak",
        ));
    }

    let mut residual = (s2.longitude - s1.longitude - aspect.angle_deg())
        .abs()
        .rem_euclid(360.0);
    if residual > 180.0 {
        residual = 360.0 - residual;
    }

    time::from_julian_day(jd.add_days(residual / relative_speed))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aspect_of_is_symmetric() {
        for (a, b) in [(10.0, 130.2), (350.0, 9.95), (200.0, 20.05)] {
            assert_eq!(
                aspect_of(a, b, &Aspect::MAJOR, DEFAULT_ORB),
                aspect_of(b, a, &Aspect::MAJOR, DEFAULT_ORB)
            );
        }
    }

    #[test]
    fn identical_longitudes_conjunct() {
        assert_eq!(
            aspect_of(42.0, 42.0, &Aspect::MAJOR, DEFAULT_ORB),
            Some(Aspect::Conjunction)
        );
    }

    #[test]
    fn wraparound_separation_matches() {
        // 350° and 10.05° are 20.05° apart; within orb of nothing major,
        // but 359.95° and 0.0° are a conjunction.
        assert_eq!(aspect_of(350.0, 10.05, &Aspect::MAJOR, DEFAULT_ORB), None);
        assert_eq!(
            aspect_of(359.95, 0.0, &Aspect::MAJOR, DEFAULT_ORB),
            Some(Aspect::Conjunction)
        );
        assert_eq!(
            aspect_of(270.0, 90.05, &Aspect::MAJOR, DEFAULT_ORB),
            Some(Aspect::Opposition)
        );
    }

    #[test]
    fn orb_bounds_are_inclusive() {
        assert_eq!(
            aspect_of(0.0, 60.1, &Aspect::MAJOR, DEFAULT_ORB),
            Some(Aspect::Sextile)
        );
        assert_eq!(aspect_of(0.0, 60.11, &Aspect::MAJOR, DEFAULT_ORB), None);
    }

    #[test]
    fn extended_set_catches_minors() {
        assert_eq!(aspect_of(0.0, 150.0, &Aspect::MAJOR, DEFAULT_ORB), None);
        assert_eq!(
            aspect_of(0.0, 150.0, &Aspect::EXTENDED, DEFAULT_ORB),
            Some(Aspect::Quincunx)
        );
    }
}
