use serde::{Deserialize, Serialize};
use std::fmt;

/// The twelve signs, in band order starting from 0° Aries.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ZodiacSign {
    Aries,
    Taurus,
    Gemini,
    Cancer,
    Leo,
    Virgo,
    Libra,
    Scorpio,
    Sagittarius,
    Capricorn,
    Aquarius,
    Pisces,
}

const SIGNS: [ZodiacSign; 12] = [
    ZodiacSign::Aries,
    ZodiacSign::Taurus,
    ZodiacSign::Gemini,
    ZodiacSign::Cancer,
    ZodiacSign::Leo,
    ZodiacSign::Virgo,
    ZodiacSign::Libra,
    ZodiacSign::Scorpio,
    ZodiacSign::Sagittarius,
    ZodiacSign::Capricorn,
    ZodiacSign::Aquarius,
    ZodiacSign::Pisces,
];

impl ZodiacSign {
    /// Classify an ecliptic longitude into its 30° band.
    ///
    /// A boundary longitude (30·k) belongs to the upper band, so 30.0
    /// is Taurus, not Aries.
    pub fn from_longitude(longitude: f64) -> ZodiacSign {
        let normalized = longitude.rem_euclid(360.0);
        // The modulo guards the normalized == 360.0 float edge.
        let index = ((normalized / 30.0).floor() as usize) % 12;
        SIGNS[index]
    }

    /// The [lower, upper) longitude band of this sign.
    pub fn bounds(&self) -> (f64, f64) {
        let lower = (*self as usize as f64) * 30.0;
        (lower, lower + 30.0)
    }

    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn next(&self) -> ZodiacSign {
        SIGNS[(self.index() + 1) % 12]
    }

    pub fn name(&self) -> &'static str {
        match self {
            ZodiacSign::Aries => "aries",
            ZodiacSign::Taurus => "taurus",
            ZodiacSign::Gemini => "gemini",
            ZodiacSign::Cancer => "cancer",
            ZodiacSign::Leo => "leo",
            ZodiacSign::Virgo => "virgo",
            ZodiacSign::Libra => "libra",
            ZodiacSign::Scorpio => "scorpio",
            ZodiacSign::Sagittarius => "sagittarius",
            ZodiacSign::Capricorn => "capricorn",
            ZodiacSign::Aquarius => "aquarius",
            ZodiacSign::Pisces => "pisces",
        }
    }
}

impl fmt::Display for ZodiacSign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification_is_total() {
        let mut lon = 0.0;
        while lon < 360.0 {
            let sign = ZodiacSign::from_longitude(lon);
            let (lower, upper) = sign.bounds();
            assert!(
                lower <= lon && lon < upper,
                "{lon} classified as {sign} with band [{lower}, {upper})"
            );
            lon += 0.25;
        }
    }

    #[test]
    fn boundaries_belong_to_upper_band() {
        assert_eq!(ZodiacSign::from_longitude(0.0), ZodiacSign::Aries);
        assert_eq!(ZodiacSign::from_longitude(30.0), ZodiacSign::Taurus);
        assert_eq!(ZodiacSign::from_longitude(330.0), ZodiacSign::Pisces);
        assert_eq!(ZodiacSign::from_longitude(360.0), ZodiacSign::Aries);
    }

    #[test]
    fn negative_longitudes_wrap() {
        assert_eq!(ZodiacSign::from_longitude(-10.0), ZodiacSign::Pisces);
        assert_eq!(ZodiacSign::from_longitude(-330.0), ZodiacSign::Taurus);
    }

    #[test]
    fn next_cycles_through_all_signs() {
        let mut sign = ZodiacSign::Aries;
        for _ in 0..12 {
            sign = sign.next();
        }
        assert_eq!(sign, ZodiacSign::Aries);
    }
}
