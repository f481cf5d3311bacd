//! Golden scenarios against the Swiss Ephemeris backend.
//!
//! These need the native library at runtime, so they are ignored by
//! default; run with `cargo test -- --ignored` where it is available.

use chrono::{Duration, NaiveDate, TimeZone, Utc};
use selene::moon::{moon_phase, moon_signs_on_date, next_new_moon, MoonPhase};
use selene::void_moon::void_of_course;
use selene::{Location, Planet, SwissEphemerisAdapter, ZodiacSign};

fn near_moscow() -> Location {
    Location::new(37.5158, 55.7997).unwrap()
}

#[test]
#[ignore] // Requires the native Swiss Ephemeris library
fn moon_enters_taurus_on_jan_25_2026() {
    let eph = SwissEphemerisAdapter::new(None).unwrap();
    let date = NaiveDate::from_ymd_opt(2026, 1, 25).unwrap();
    let report = moon_signs_on_date(&eph, date, 3, &near_moscow()).unwrap();

    assert_eq!(report.start_sign, ZodiacSign::Aries);
    let change = report.change.expect("a sign change during the day");
    assert_eq!(change.sign, ZodiacSign::Taurus);

    // Expected egress 21:05 local (±10 minutes).
    let expected = Utc.with_ymd_and_hms(2026, 1, 25, 18, 5, 0).unwrap();
    let error = (change.at - expected).num_minutes().abs();
    assert!(error <= 10, "egress off by {error} minutes");
}

#[test]
#[ignore] // Requires the native Swiss Ephemeris library
fn void_moon_on_jan_25_2026_runs_from_the_jupiter_square() {
    let eph = SwissEphemerisAdapter::new(None).unwrap();
    let date = NaiveDate::from_ymd_opt(2026, 1, 25).unwrap();
    let void = void_of_course(&eph, date, &near_moscow(), 3, None).unwrap();

    let last = void.last_aspect.expect("a final lunar aspect in the sign");
    assert_eq!(last.transit, Planet::Moon);
    assert_eq!(last.natal, Planet::Jupiter);

    // Peak near 00:36 local, egress near 21:05 local (both ±10 min).
    let expected_start = Utc.with_ymd_and_hms(2026, 1, 24, 21, 36, 0).unwrap();
    let start_error = (void.start.with_timezone(&Utc) - expected_start)
        .num_minutes()
        .abs();
    assert!(start_error <= 10, "void start off by {start_error} minutes");

    let expected_end = Utc.with_ymd_and_hms(2026, 1, 25, 18, 5, 0).unwrap();
    let end_error = (void.end.with_timezone(&Utc) - expected_end)
        .num_minutes()
        .abs();
    assert!(end_error <= 10, "void end off by {end_error} minutes");
}

#[test]
#[ignore] // Requires the native Swiss Ephemeris library
fn the_phase_at_mid_lunation_is_full() {
    let eph = SwissEphemerisAdapter::new(None).unwrap();
    let equator = Location::new(0.0, 0.0).unwrap();
    let near = Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap();

    let new_moon = next_new_moon(&eph, near).unwrap();
    let next = next_new_moon(&eph, new_moon + Duration::hours(1)).unwrap();
    let full = new_moon + (next - new_moon) / 2;

    // Within an hour either side of the opposition.
    for offset in [-60i64, 0, 60] {
        let phase = moon_phase(&eph, full + Duration::minutes(offset), &equator).unwrap();
        assert_eq!(phase, MoonPhase::Full, "at offset {offset} minutes");
    }
}
