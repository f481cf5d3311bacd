pub mod aspects;
pub mod ephemeris;
pub mod moon;

pub mod cancel;
pub mod error;
pub mod frames;
pub mod planets;
pub mod time;
pub mod types;
pub mod void_moon;
pub mod zodiac;

pub use aspects::{aspect_of, peak_time, Aspect, AspectScanner, AstroEvent};
pub use cancel::CancelToken;
pub use ephemeris::{
    CachedEphemeris, EclipticState, Ephemeris, KeplerianEphemeris, SwissEphemerisAdapter,
};
pub use error::Error;
pub use moon::{LunarDay, MoonPhase, MoonSignSegment, MoonSignsOnDate};
pub use planets::Planet;
pub use time::JulianDay;
pub use types::{Location, Subject, TimePeriod};
pub use void_moon::{void_of_course, VoidOfCourse};
pub use zodiac::ZodiacSign;
