pub mod adapter;
pub mod cache;
pub mod keplerian;
pub mod topocentric;
pub mod types;

pub use adapter::SwissEphemerisAdapter;
pub use cache::CachedEphemeris;
pub use keplerian::KeplerianEphemeris;
pub use types::{EclipticState, Ephemeris};
