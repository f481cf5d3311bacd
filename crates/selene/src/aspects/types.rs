use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::planets::Planet;

/// Recognized angular separations.
///
/// Angles above 180° fold onto these by direction, so the enum stops at
/// the opposition. Declaration order ascends by angle and doubles as
/// the deterministic tie-break order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Aspect {
    Conjunction,
    SemiSextile,
    Sextile,
    Square,
    Trine,
    Quincunx,
    Opposition,
}

impl Aspect {
    /// The classical majors used for void-of-course and default scans.
    pub const MAJOR: [Aspect; 5] = [
        Aspect::Conjunction,
        Aspect::Sextile,
        Aspect::Square,
        Aspect::Trine,
        Aspect::Opposition,
    ];

    /// Extended detection set including the minor separations.
    pub const EXTENDED: [Aspect; 7] = [
        Aspect::Conjunction,
        Aspect::SemiSextile,
        Aspect::Sextile,
        Aspect::Square,
        Aspect::Trine,
        Aspect::Quincunx,
        Aspect::Opposition,
    ];

    pub fn angle_deg(&self) -> f64 {
        match self {
            Aspect::Conjunction => 0.0,
            Aspect::SemiSextile => 30.0,
            Aspect::Sextile => 60.0,
            Aspect::Square => 90.0,
            Aspect::Trine => 120.0,
            Aspect::Quincunx => 150.0,
            Aspect::Opposition => 180.0,
        }
    }

    /// Integer angle, the form the interpretation tables key on.
    pub fn angle_int(&self) -> u16 {
        self.angle_deg() as u16
    }

    /// Map an angle to its aspect, folding reflex angles (>180°) onto
    /// their supplement: 240 is a trine, 330 a semi-sextile.
    pub fn from_angle(angle: f64) -> Option<Aspect> {
        let folded = {
            let a = angle.rem_euclid(360.0);
            if a > 180.0 {
                360.0 - a
            } else {
                a
            }
        };
        Aspect::EXTENDED
            .iter()
            .find(|aspect| (aspect.angle_deg() - folded).abs() < 1e-9)
            .copied()
    }

    pub fn name(&self) -> &'static str {
        match self {
            Aspect::Conjunction => "conjunction",
            Aspect::SemiSextile => "semi-sextile",
            Aspect::Sextile => "sextile",
            Aspect::Square => "square",
            Aspect::Trine => "trine",
            Aspect::Quincunx => "quincunx",
            Aspect::Opposition => "opposition",
        }
    }
}

impl fmt::Display for Aspect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One detected aspect occurrence.
///
/// `transit` is the moving body at query time, `natal` the body fixed
/// at the subject's birth. Mono events (both bodies at the same
/// instant, as in the void-of-course scan) use the same shape with the
/// pair read as (first, second). The peak is absent when refinement
/// was skipped; coalescing keeps peakless events at the head of an
/// event list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AstroEvent {
    pub transit: Planet,
    pub natal: Planet,
    pub aspect: Aspect,
    pub peak: Option<DateTime<Utc>>,
}

impl AstroEvent {
    /// Sort key: peak first (absent peaks ahead), then the triple.
    pub fn ordering_key(&self) -> (Option<DateTime<Utc>>, Planet, Planet, Aspect) {
        (self.peak, self.transit, self.natal, self.aspect)
    }
}
