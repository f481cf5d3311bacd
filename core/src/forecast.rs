//! Daily forecast assembly: one call gathers every astrological fact
//! the presentation layer needs for a (subject, date) pair.

use std::sync::Arc;

use chrono::{Duration, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use selene::moon::{
    lunar_day, main_lunar_day_on_date, moon_phase, moon_signs_on_date, next_lunar_day, MoonPhase,
};
use selene::{
    AspectScanner, AstroEvent, CancelToken, Ephemeris, Error, LunarDay, MoonSignsOnDate, Subject,
    TimePeriod, VoidOfCourse,
};

/// Everything computed for one subject and one local calendar day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyForecast {
    pub date: NaiveDate,
    pub offset_hours: i32,
    pub moon_signs: MoonSignsOnDate,
    pub phase: MoonPhase,
    pub main_lunar_day: LunarDay,
    /// Every lunar day overlapping the local date, in order.
    pub lunar_days: Vec<LunarDay>,
    pub void_of_course: VoidOfCourse,
    /// Transit-to-natal events over the day's scan window.
    pub events: Vec<AstroEvent>,
}

pub struct ForecastEngine {
    eph: Arc<dyn Ephemeris>,
    scanner: AspectScanner,
}

impl ForecastEngine {
    pub fn new(eph: Arc<dyn Ephemeris>) -> Self {
        Self {
            eph,
            scanner: AspectScanner::new(),
        }
    }

    /// Compute the full forecast for a local calendar day.
    ///
    /// Without an explicit offset the subject's current longitude
    /// supplies the geographic estimate. The aspect scan runs over
    /// [T+3h, T+27h] UTC of the target date, so late-evening peaks
    /// land in the subject's morning delivery either side of the
    /// globe.
    pub fn daily_forecast(
        &self,
        subject: &Subject,
        date: NaiveDate,
        offset_hours: Option<i32>,
        cancel: Option<&CancelToken>,
    ) -> Result<DailyForecast, Error> {
        let location = subject.current_location;
        let offset = offset_hours.unwrap_or_else(|| selene::time::offset_hours(&location));
        let day = selene::time::local_day_bounds(date, offset)?;
        subject.check_query_instant(day.start)?;

        let moon_signs = moon_signs_on_date(&*self.eph, date, offset, &location)?;
        let local_noon = day.start + Duration::hours(12);
        let phase = moon_phase(&*self.eph, local_noon, &location)?;

        let main_lunar_day = main_lunar_day_on_date(&*self.eph, day.start, &location)?;
        let lunar_days = self.lunar_days_overlapping(day, &location, cancel)?;

        let void = selene::void_of_course(&*self.eph, date, &location, offset, cancel)?;

        let midnight_utc = Utc
            .from_utc_datetime(&date.and_hms_opt(0, 0, 0).ok_or_else(|| {
                Error::Domain(format!("invalid date {date}"))
            })?);
        let scan_window = TimePeriod::new(
            midnight_utc + Duration::hours(3),
            midnight_utc + Duration::hours(27),
        )?;
        let events = self
            .scanner
            .events_on_period(&*self.eph, scan_window, subject, cancel)?;
        log::debug!(
            "forecast for {date}: {} events, lunar day {}, {} sign change",
            events.len(),
            main_lunar_day.number,
            if moon_signs.change.is_some() { "one" } else { "no" },
        );

        Ok(DailyForecast {
            date,
            offset_hours: offset,
            moon_signs,
            phase,
            main_lunar_day,
            lunar_days,
            void_of_course: void,
            events,
        })
    }

    fn lunar_days_overlapping(
        &self,
        day: TimePeriod,
        location: &selene::Location,
        cancel: Option<&CancelToken>,
    ) -> Result<Vec<LunarDay>, Error> {
        let mut days = Vec::new();
        let mut cursor = lunar_day(&*self.eph, day.start, location)?;
        loop {
            if let Some(token) = cancel {
                if token.is_canceled() {
                    return Err(Error::Canceled);
                }
            }
            days.push(cursor);
            if cursor.end >= day.end {
                break;
            }
            cursor = next_lunar_day(&*self.eph, &cursor, location)?;
        }
        Ok(days)
    }
}
