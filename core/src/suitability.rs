//! Day-selection fingerprints: how well a calendar day suits an
//! activity the user picked.
//!
//! Deterministic scoring from three facts the forecast already
//! carries: the dominant lunar day's traditional favorability class,
//! the phase half (waxing favors starting, waning favors finishing),
//! and how much of the waking day the void-of-course interval eats.

use chrono::Timelike;
use serde::{Deserialize, Serialize};

use crate::forecast::DailyForecast;
use selene::MoonPhase;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Activity {
    NewBeginnings,
    Finance,
    Travel,
    Health,
    Creativity,
    Rest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Suitability {
    Unfavorable,
    Neutral,
    Favorable,
}

/// Lunar days traditionally counted difficult across activity types.
const HARD_DAYS: [u8; 6] = [9, 15, 19, 23, 26, 29];

fn lunar_day_score(activity: Activity, number: u8) -> i32 {
    if HARD_DAYS.contains(&number) {
        return -1;
    }
    let favorable: &[u8] = match activity {
        Activity::NewBeginnings => &[1, 2, 3, 6, 11, 24],
        Activity::Finance => &[2, 6, 14, 16, 21, 24],
        Activity::Travel => &[3, 5, 8, 13, 21, 27],
        Activity::Health => &[7, 12, 16, 22, 28],
        Activity::Creativity => &[4, 10, 13, 17, 25, 28],
        Activity::Rest => &[7, 12, 18, 20, 25, 30],
    };
    if favorable.contains(&number) {
        1
    } else {
        0
    }
}

fn phase_score(activity: Activity, phase: MoonPhase) -> i32 {
    let waxing = matches!(
        phase,
        MoonPhase::New | MoonPhase::WaxingCrescent | MoonPhase::FirstQuarter | MoonPhase::WaxingGibbous
    );
    match activity {
        Activity::NewBeginnings | Activity::Finance | Activity::Travel => {
            if waxing {
                1
            } else {
                0
            }
        }
        Activity::Health | Activity::Rest => {
            if waxing {
                0
            } else {
                1
            }
        }
        Activity::Creativity => 0,
    }
}

/// Hours of the void interval falling into the local waking day
/// (08:00–24:00 wall clock).
fn void_waking_hours(forecast: &DailyForecast) -> f64 {
    let void = &forecast.void_of_course;
    let start_hour = void.start.time().hour() as f64 + void.start.time().minute() as f64 / 60.0;
    let end_hour = void.end.time().hour() as f64 + void.end.time().minute() as f64 / 60.0;
    // Clamp each endpoint into the waking window of its own day; a
    // void spanning midnight contributes from both sides.
    let clamp = |h: f64| h.clamp(8.0, 24.0);
    if void.start.date_naive() == void.end.date_naive() {
        (clamp(end_hour) - clamp(start_hour)).max(0.0)
    } else {
        (24.0 - clamp(start_hour)) + (clamp(end_hour) - 8.0).max(0.0)
    }
}

/// Combine the three signals into a verdict.
pub fn day_suitability(activity: Activity, forecast: &DailyForecast) -> Suitability {
    let mut score = lunar_day_score(activity, forecast.main_lunar_day.number)
        + phase_score(activity, forecast.phase);

    let void_hours = void_waking_hours(forecast);
    let initiating = matches!(
        activity,
        Activity::NewBeginnings | Activity::Finance | Activity::Travel
    );
    if initiating && void_hours > 8.0 {
        score -= 2;
    } else if initiating && void_hours > 4.0 {
        score -= 1;
    }

    if score >= 1 {
        Suitability::Favorable
    } else if score <= -1 {
        Suitability::Unfavorable
    } else {
        Suitability::Neutral
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forecast::ForecastEngine;
    use chrono::{NaiveDate, TimeZone, Utc};
    use selene::{KeplerianEphemeris, Location, Subject};
    use std::sync::Arc;

    fn forecast_on(date: NaiveDate) -> DailyForecast {
        let engine = ForecastEngine::new(Arc::new(KeplerianEphemeris::new()));
        let moscow = Location::new(37.6173, 55.7558).unwrap();
        let subject = Subject::new(
            Utc.with_ymd_and_hms(1990, 1, 1, 0, 0, 0).unwrap(),
            moscow,
            moscow,
        );
        engine.daily_forecast(&subject, date, Some(3), None).unwrap()
    }

    #[test]
    fn every_activity_gets_a_verdict() {
        let fc = forecast_on(NaiveDate::from_ymd_opt(2026, 1, 25).unwrap());
        for activity in [
            Activity::NewBeginnings,
            Activity::Finance,
            Activity::Travel,
            Activity::Health,
            Activity::Creativity,
            Activity::Rest,
        ] {
            // Totality: the scoring never panics and always lands in
            // one of the three classes.
            let _ = day_suitability(activity, &fc);
        }
    }

    #[test]
    fn verdicts_are_deterministic() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 14).unwrap();
        let a = day_suitability(Activity::Finance, &forecast_on(date));
        let b = day_suitability(Activity::Finance, &forecast_on(date));
        assert_eq!(a, b);
    }

    #[test]
    fn hard_lunar_days_never_score_favorable() {
        for number in HARD_DAYS {
            assert_eq!(lunar_day_score(Activity::NewBeginnings, number), -1);
        }
    }
}
