use std::num::NonZeroUsize;

use lru::LruCache;
use parking_lot::Mutex;

use crate::ephemeris::types::{EclipticState, Ephemeris};
use crate::error::Error;
use crate::planets::Planet;
use crate::time::JulianDay;
use crate::types::Location;

const DEFAULT_CAPACITY: usize = 16_384;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct CacheKey {
    planet: Planet,
    jd_bits: u64,
    observer: Option<(u64, u64, u64)>,
}

impl CacheKey {
    fn new(planet: Planet, jd: JulianDay, observer: Option<&Location>) -> Self {
        Self {
            planet,
            jd_bits: jd.0.to_bits(),
            observer: observer.map(|loc| {
                (
                    loc.longitude.to_bits(),
                    loc.latitude.to_bits(),
                    loc.altitude.to_bits(),
                )
            }),
        }
    }
}

/// Size-bounded memo in front of any backend.
///
/// Period scans hit the same (planet, instant) pairs repeatedly — the
/// natal longitudes on every sample, the moon on overlapping searches —
/// and the native backend serializes callers, so the memo pays for
/// itself quickly. Eviction is LRU; the lock is held only around map
/// access, never across a backend call.
pub struct CachedEphemeris<E> {
    inner: E,
    cache: Mutex<LruCache<CacheKey, EclipticState>>,
}

impl<E: Ephemeris> CachedEphemeris<E> {
    pub fn new(inner: E) -> Self {
        Self::with_capacity(inner, DEFAULT_CAPACITY)
    }

    pub fn with_capacity(inner: E, capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity.max(1)).expect("capacity clamped to >= 1");
        Self {
            inner,
            cache: Mutex::new(LruCache::new(capacity)),
        }
    }

    pub fn inner(&self) -> &E {
        &self.inner
    }
}

impl<E: Ephemeris> Ephemeris for CachedEphemeris<E> {
    fn state(
        &self,
        planet: Planet,
        jd: JulianDay,
        observer: Option<&Location>,
    ) -> Result<EclipticState, Error> {
        let key = CacheKey::new(planet, jd, observer);
        if let Some(state) = self.cache.lock().get(&key) {
            return Ok(*state);
        }
        let state = self.inner.state(planet, jd, observer)?;
        self.cache.lock().put(key, state);
        Ok(state)
    }
}
