use chrono::{Duration, TimeZone, Utc};
use selene::ephemeris::{Ephemeris, KeplerianEphemeris};
use selene::moon::next_new_moon;
use selene::time::julian_day;
use selene::{
    aspect_of, peak_time, Aspect, AspectScanner, CancelToken, Error, Location, Planet, Subject,
    TimePeriod,
};

fn moscow() -> Location {
    Location::new(37.6173, 55.7558).unwrap()
}

fn subject() -> Subject {
    Subject::new(
        Utc.with_ymd_and_hms(1990, 1, 1, 0, 0, 0).unwrap(),
        moscow(),
        moscow(),
    )
}

fn month_scan() -> (KeplerianEphemeris, Subject, TimePeriod) {
    let eph = KeplerianEphemeris::new();
    let start = Utc.with_ymd_and_hms(2026, 8, 6, 0, 0, 0).unwrap();
    let period = TimePeriod::new(start, start + Duration::days(30)).unwrap();
    (eph, subject(), period)
}

#[test]
fn a_month_of_transits_yields_ordered_events() {
    let (eph, subject, period) = month_scan();
    let events = AspectScanner::new()
        .events_on_period(&eph, period, &subject, None)
        .unwrap();

    // The moon alone passes every natal longitude within the window.
    assert!(events.len() > 20, "only {} events found", events.len());

    for pair in events.windows(2) {
        assert!(
            pair[0].peak <= pair[1].peak,
            "peaks out of order: {:?} then {:?}",
            pair[0],
            pair[1]
        );
    }
}

#[test]
fn separation_at_peak_stays_within_orb() {
    let (eph, subject, period) = month_scan();
    let events = AspectScanner::new()
        .events_on_period(&eph, period, &subject, None)
        .unwrap();

    let birth_jd = julian_day(subject.birth_instant);
    for event in &events {
        let peak = event.peak.expect("scanned events carry peaks");
        let transit_lon = eph
            .longitude(event.transit, julian_day(peak), Some(&subject.current_location))
            .unwrap();
        let natal_lon = eph
            .longitude(event.natal, birth_jd, Some(&subject.birth_location))
            .unwrap();
        let separation = selene::frames::separation_deg(transit_lon, natal_lon);
        let residual = (separation - event.aspect.angle_deg()).abs();
        assert!(
            residual <= 0.1 + 1e-6,
            "{:?}: separation residual {residual}",
            event
        );
    }
}

#[test]
fn repeated_scans_are_deterministic() {
    let (eph, subject, period) = month_scan();
    let scanner = AspectScanner::new();
    let first = scanner.events_on_period(&eph, period, &subject, None).unwrap();
    let second = scanner.events_on_period(&eph, period, &subject, None).unwrap();
    assert_eq!(first, second);
}

#[test]
fn duplicate_preserving_scan_never_has_more_events() {
    let (eph, subject, period) = month_scan();
    let scanner = AspectScanner::new();
    let split = scanner.events_on_period(&eph, period, &subject, None).unwrap();
    let merged = scanner
        .events_on_period_with_duplicates(&eph, period, &subject, None)
        .unwrap();
    assert!(merged.len() <= split.len());
    assert!(!merged.is_empty());
}

#[test]
fn the_same_triple_recurs_across_a_sidereal_month() {
    let (eph, subject, period) = month_scan();
    let events = AspectScanner::new()
        .events_on_period(&eph, period, &subject, None)
        .unwrap();

    // A moon square to a fixed natal longitude peaks on both sides,
    // roughly 13.7 days apart; the scan must keep both occurrences.
    let squares: Vec<_> = events
        .iter()
        .filter(|e| {
            e.transit == Planet::Moon && e.natal == Planet::Sun && e.aspect == Aspect::Square
        })
        .collect();
    assert!(squares.len() >= 2, "found {} moon-sun squares", squares.len());
}

#[test]
fn cancellation_stops_a_scan_without_output() {
    let (eph, subject, period) = month_scan();
    let token = CancelToken::new();
    token.cancel();
    let result = AspectScanner::new().events_on_period(&eph, period, &subject, Some(&token));
    assert!(matches!(result, Err(Error::Canceled)));
}

#[test]
fn queries_before_birth_are_rejected() {
    let eph = KeplerianEphemeris::new();
    let subject = subject();
    let before_birth = Utc.with_ymd_and_hms(1980, 1, 1, 0, 0, 0).unwrap();
    let period = TimePeriod::new(before_birth, before_birth + Duration::days(1)).unwrap();
    let result = AspectScanner::new().events_on_period(&eph, period, &subject, None);
    assert!(matches!(result, Err(Error::Domain(_))));
}

#[test]
fn peak_refinement_recovers_a_known_conjunction() {
    let eph = KeplerianEphemeris::new();
    let near = Utc.with_ymd_and_hms(2026, 5, 1, 0, 0, 0).unwrap();
    // The sun-moon conjunction is the new moon, found independently.
    let conjunction = next_new_moon(&eph, near).unwrap();

    let approx = conjunction - Duration::minutes(30);
    let refined = peak_time(
        &eph,
        approx,
        Planet::Moon,
        Planet::Sun,
        Aspect::Conjunction,
        None,
    )
    .unwrap();
    let error = (refined - conjunction).num_seconds().abs();
    assert!(error <= 120, "refined peak off by {error}s");
}

#[test]
fn events_at_reports_in_orb_pairs_only() {
    let (eph, subject, period) = month_scan();
    let scanner = AspectScanner::new();
    let events = scanner.events_at(&eph, period.start, &subject).unwrap();
    let birth_jd = julian_day(subject.birth_instant);
    for event in events {
        let transit_lon = eph
            .longitude(
                event.transit,
                julian_day(period.start),
                Some(&subject.current_location),
            )
            .unwrap();
        let natal_lon = eph
            .longitude(event.natal, birth_jd, Some(&subject.birth_location))
            .unwrap();
        assert_eq!(
            aspect_of(transit_lon, natal_lon, &Aspect::MAJOR, 0.1),
            Some(event.aspect)
        );
    }
}
