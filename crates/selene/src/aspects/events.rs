//! Period scans for aspect events.
//!
//! A scan samples planetary separations on a fixed stride, records
//! every in-orb hit, then coalesces each (transit, natal, aspect)
//! group's near-simultaneous hits into single events whose peak is the
//! cluster mean. The 10-minute stride with a 0.1° orb cannot miss a
//! peak: even the moon only advances ~0.08° per stride.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::aspects::calculator::{aspect_of, DEFAULT_ORB};
use crate::aspects::types::{Aspect, AstroEvent};
use crate::cancel::CancelToken;
use crate::ephemeris::Ephemeris;
use crate::error::Error;
use crate::planets::Planet;
use crate::time::julian_day;
use crate::types::{Location, Subject, TimePeriod};

/// Configured aspect scan.
pub struct AspectScanner {
    aspects: Vec<Aspect>,
    orb: f64,
    stride: Duration,
    /// Hits in one group closer than this merge into one event.
    merge_gap: Duration,
    /// Wider merge window for the duplicate-preserving variant; hits
    /// further apart than this always stay distinct occurrences.
    duplicate_gap: Duration,
}

impl AspectScanner {
    pub fn new() -> Self {
        Self {
            aspects: Aspect::MAJOR.to_vec(),
            orb: DEFAULT_ORB,
            stride: Duration::minutes(10),
            merge_gap: Duration::minutes(15),
            duplicate_gap: Duration::hours(2),
        }
    }

    pub fn with_aspects(mut self, aspects: &[Aspect]) -> Self {
        self.aspects = aspects.to_vec();
        self
    }

    pub fn with_orb(mut self, orb: f64) -> Self {
        self.orb = orb;
        self
    }

    /// Transit-to-natal events at a single instant.
    ///
    /// Natal longitudes are taken at the birth moment over the birth
    /// location; transits at `instant` over the current location.
    pub fn events_at(
        &self,
        eph: &dyn Ephemeris,
        instant: DateTime<Utc>,
        subject: &Subject,
    ) -> Result<Vec<AstroEvent>, Error> {
        subject.check_query_instant(instant)?;
        let natal = self.natal_longitudes(eph, subject)?;
        self.events_at_with_natal(eph, instant, subject, &natal)
    }

    /// Time-ordered, de-duplicated events over a period.
    pub fn events_on_period(
        &self,
        eph: &dyn Ephemeris,
        period: TimePeriod,
        subject: &Subject,
        cancel: Option<&CancelToken>,
    ) -> Result<Vec<AstroEvent>, Error> {
        self.scan(eph, period, subject, cancel, self.merge_gap)
    }

    /// Like [`events_on_period`](Self::events_on_period) but keeps
    /// distinct occurrences of the same triple when their peaks are
    /// separated by more than two hours, averaging within each
    /// sub-cluster.
    pub fn events_on_period_with_duplicates(
        &self,
        eph: &dyn Ephemeris,
        period: TimePeriod,
        subject: &Subject,
        cancel: Option<&CancelToken>,
    ) -> Result<Vec<AstroEvent>, Error> {
        self.scan(eph, period, subject, cancel, self.duplicate_gap)
    }

    /// Events between one body and several others, all taken at the
    /// same instant — the shape the void-of-course derivation needs.
    pub fn mono_events_on_period(
        &self,
        eph: &dyn Ephemeris,
        period: TimePeriod,
        first: Planet,
        others: &[Planet],
        location: &Location,
        cancel: Option<&CancelToken>,
    ) -> Result<Vec<AstroEvent>, Error> {
        let mut hits: BTreeMap<(Planet, Planet, Aspect), Vec<DateTime<Utc>>> = BTreeMap::new();
        let mut cursor = period.start;
        while cursor <= period.end {
            poll_cancel(cancel)?;
            let jd = julian_day(cursor);
            let first_lon = eph.longitude(first, jd, Some(location))?;
            for &other in others {
                if other == first {
                    continue;
                }
                let other_lon = eph.longitude(other, jd, Some(location))?;
                if let Some(aspect) = aspect_of(first_lon, other_lon, &self.aspects, self.orb) {
                    hits.entry((first, other, aspect)).or_default().push(cursor);
                }
            }
            cursor += self.stride;
        }
        Ok(coalesce(hits, self.merge_gap))
    }

    fn natal_longitudes(
        &self,
        eph: &dyn Ephemeris,
        subject: &Subject,
    ) -> Result<Vec<(Planet, f64)>, Error> {
        let birth_jd = julian_day(subject.birth_instant);
        Planet::NATAL
            .iter()
            .map(|&planet| {
                eph.longitude(planet, birth_jd, Some(&subject.birth_location))
                    .map(|lon| (planet, lon))
            })
            .collect()
    }

    fn events_at_with_natal(
        &self,
        eph: &dyn Ephemeris,
        instant: DateTime<Utc>,
        subject: &Subject,
        natal: &[(Planet, f64)],
    ) -> Result<Vec<AstroEvent>, Error> {
        let jd = julian_day(instant);
        let mut events = Vec::new();
        for &transit in Planet::TRANSIT.iter() {
            let transit_lon = eph.longitude(transit, jd, Some(&subject.current_location))?;
            for &(natal_planet, natal_lon) in natal {
                if let Some(aspect) =
                    aspect_of(transit_lon, natal_lon, &self.aspects, self.orb)
                {
                    events.push(AstroEvent {
                        transit,
                        natal: natal_planet,
                        aspect,
                        peak: Some(instant),
                    });
                }
            }
        }
        Ok(events)
    }

    fn scan(
        &self,
        eph: &dyn Ephemeris,
        period: TimePeriod,
        subject: &Subject,
        cancel: Option<&CancelToken>,
        merge_gap: Duration,
    ) -> Result<Vec<AstroEvent>, Error> {
        subject.check_query_instant(period.start)?;
        let natal = self.natal_longitudes(eph, subject)?;

        let mut hits: BTreeMap<(Planet, Planet, Aspect), Vec<DateTime<Utc>>> = BTreeMap::new();
        let mut cursor = period.start;
        while cursor <= period.end {
            poll_cancel(cancel)?;
            for event in self.events_at_with_natal(eph, cursor, subject, &natal)? {
                hits.entry((event.transit, event.natal, event.aspect))
                    .or_default()
                    .push(cursor);
            }
            cursor += self.stride;
        }
        Ok(coalesce(hits, merge_gap))
    }
}

impl Default for AspectScanner {
    fn default() -> Self {
        Self::new()
    }
}

fn poll_cancel(cancel: Option<&CancelToken>) -> Result<(), Error> {
    match cancel {
        Some(token) if token.is_canceled() => Err(Error::Canceled),
        _ => Ok(()),
    }
}

/// Collapse each group's sample hits into representative events.
///
/// Within a group, consecutive hits no further apart than `merge_gap`
/// form one cluster; each cluster becomes one event whose peak is the
/// arithmetic mean of its timestamps. Output is ordered by peak, ties
/// broken by the (transit, natal, aspect) triple; the BTreeMap
/// iteration makes the whole pipeline deterministic.
fn coalesce(
    hits: BTreeMap<(Planet, Planet, Aspect), Vec<DateTime<Utc>>>,
    merge_gap: Duration,
) -> Vec<AstroEvent> {
    let mut events = Vec::new();
    for ((transit, natal, aspect), times) in hits {
        let mut cluster: Vec<DateTime<Utc>> = Vec::new();
        for time in times {
            if let Some(&last) = cluster.last() {
                if time - last > merge_gap {
                    events.push(AstroEvent {
                        transit,
                        natal,
                        aspect,
                        peak: Some(mean_instant(&cluster)),
                    });
                    cluster.clear();
                }
            }
            cluster.push(time);
        }
        if !cluster.is_empty() {
            events.push(AstroEvent {
                transit,
                natal,
                aspect,
                peak: Some(mean_instant(&cluster)),
            });
        }
    }
    events.sort_by_key(|event| event.ordering_key());
    events
}

fn mean_instant(times: &[DateTime<Utc>]) -> DateTime<Utc> {
    let sum: i64 = times.iter().map(|t| t.timestamp()).sum();
    let mean = sum / times.len() as i64;
    Utc.timestamp_opt(mean, 0)
        .single()
        .unwrap_or_else(|| times[times.len() / 2])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key() -> (Planet, Planet, Aspect) {
        (Planet::Moon, Planet::Jupiter, Aspect::Square)
    }

    fn at(minutes: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 25, 0, 0, 0).unwrap() + Duration::minutes(minutes)
    }

    #[test]
    fn adjacent_hits_collapse_to_their_mean() {
        let mut hits = BTreeMap::new();
        hits.insert(key(), vec![at(0), at(10), at(20)]);
        let events = coalesce(hits, Duration::minutes(15));
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].peak, Some(at(10)));
    }

    #[test]
    fn wide_gaps_split_clusters() {
        let mut hits = BTreeMap::new();
        hits.insert(key(), vec![at(0), at(10), at(60), at(70)]);
        let events = coalesce(hits, Duration::minutes(15));
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].peak, Some(at(5)));
        assert_eq!(events[1].peak, Some(at(65)));
    }

    #[test]
    fn duplicate_window_merges_what_the_default_splits() {
        let mut hits = BTreeMap::new();
        hits.insert(key(), vec![at(0), at(30), at(60)]);
        assert_eq!(coalesce(hits.clone(), Duration::minutes(15)).len(), 3);
        assert_eq!(coalesce(hits, Duration::hours(2)).len(), 1);
    }

    #[test]
    fn groups_never_merge_across_triples() {
        let mut hits = BTreeMap::new();
        hits.insert(key(), vec![at(0)]);
        hits.insert((Planet::Moon, Planet::Saturn, Aspect::Square), vec![at(0)]);
        let events = coalesce(hits, Duration::minutes(15));
        assert_eq!(events.len(), 2);
        // Same peak: the triple breaks the tie deterministically.
        assert_eq!(events[0].natal, Planet::Jupiter);
        assert_eq!(events[1].natal, Planet::Saturn);
    }

    #[test]
    fn output_is_ordered_by_peak() {
        let mut hits = BTreeMap::new();
        hits.insert(key(), vec![at(120)]);
        hits.insert(
            (Planet::Sun, Planet::Venus, Aspect::Trine),
            vec![at(40), at(50)],
        );
        let events = coalesce(hits, Duration::minutes(15));
        assert_eq!(events[0].peak, Some(at(45)));
        assert_eq!(events[1].peak, Some(at(120)));
    }
}
