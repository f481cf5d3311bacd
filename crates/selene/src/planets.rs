use serde::{Deserialize, Serialize};
use std::fmt;

/// The ten bodies the forecast core works with.
///
/// Declaration order doubles as the deterministic tie-break order for
/// event sorting, so keep it stable.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Planet {
    Sun,
    Moon,
    Mercury,
    Venus,
    Mars,
    Jupiter,
    Saturn,
    Uranus,
    Neptune,
    Pluto,
}

impl Planet {
    /// All ten bodies, used as the natal set.
    pub const NATAL: [Planet; 10] = [
        Planet::Sun,
        Planet::Moon,
        Planet::Mercury,
        Planet::Venus,
        Planet::Mars,
        Planet::Jupiter,
        Planet::Saturn,
        Planet::Uranus,
        Planet::Neptune,
        Planet::Pluto,
    ];

    /// The fast-moving bodies scanned as transits.
    pub const TRANSIT: [Planet; 5] = [
        Planet::Sun,
        Planet::Moon,
        Planet::Mercury,
        Planet::Venus,
        Planet::Mars,
    ];

    /// Swiss Ephemeris body number.
    pub fn swe_body(&self) -> i32 {
        match self {
            Planet::Sun => 0,
            Planet::Moon => 1,
            Planet::Mercury => 2,
            Planet::Venus => 3,
            Planet::Mars => 4,
            Planet::Jupiter => 5,
            Planet::Saturn => 6,
            Planet::Uranus => 7,
            Planet::Neptune => 8,
            Planet::Pluto => 9,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Planet::Sun => "sun",
            Planet::Moon => "moon",
            Planet::Mercury => "mercury",
            Planet::Venus => "venus",
            Planet::Mars => "mars",
            Planet::Jupiter => "jupiter",
            Planet::Saturn => "saturn",
            Planet::Uranus => "uranus",
            Planet::Neptune => "neptune",
            Planet::Pluto => "pluto",
        }
    }

    /// Russian display name, matching the keys of the interpretation tables.
    pub fn name_ru(&self) -> &'static str {
        match self {
            Planet::Sun => "Солнце",
            Planet::Moon => "Луна",
            Planet::Mercury => "Меркурий",
            Planet::Venus => "Венера",
            Planet::Mars => "Марс",
            Planet::Jupiter => "Юпитер",
            Planet::Saturn => "Сатурн",
            Planet::Uranus => "Уран",
            Planet::Neptune => "Нептун",
            Planet::Pluto => "Плутон",
        }
    }
}

impl fmt::Display for Planet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
