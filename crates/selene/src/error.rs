use thiserror::Error;

use crate::planets::Planet;

/// Errors produced by the computation core.
#[derive(Error, Debug)]
pub enum Error {
    #[error("ephemeris lookup failed for {planet} at JD {jd}: {message}")]
    Ephemeris {
        planet: Planet,
        jd: f64,
        message: String,
    },
    #[error("computation did not converge: {0}")]
    Computation(&'static str),
    #[error("invalid input: {0}")]
    Domain(String),
    #[error("computation canceled")]
    Canceled,
}

impl Error {
    /// True when the enclosing query should be treated as fatal
    /// (ephemeris failures and non-convergence, per the error policy).
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::Ephemeris { .. } | Error::Computation(_))
    }
}
