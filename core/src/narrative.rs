//! Narrative assembly: stitch the interpretation table's strings onto
//! a computed forecast. No text is generated here — missing table
//! entries are logged and skipped.

use chrono::Utc;
use lunaria_interp::InterpretationStore;
use serde::{Deserialize, Serialize};

use crate::forecast::DailyForecast;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Narrative {
    pub paragraphs: Vec<String>,
}

/// Build the day's narrative from the forecast and the interpretation
/// tables: the moon-sign text, one paragraph per aspect event (with
/// the reversed-pair fallback handled by the store), and the void
/// interval rendered in wall clock.
pub fn narrative_for(forecast: &DailyForecast, store: &InterpretationStore) -> Narrative {
    let mut paragraphs = Vec::new();

    let sign = match &forecast.moon_signs.change {
        Some(change) => change.sign,
        None => forecast.moon_signs.start_sign,
    };
    if let Some(text) = store.moon_sign(forecast.moon_signs.start_sign.name()) {
        paragraphs.push(text.general.clone());
    }
    if let Some(change) = &forecast.moon_signs.change {
        if let Some(text) = store.moon_sign(sign.name()) {
            paragraphs.push(text.general.clone());
        }
        if let Ok(local) = selene::time::to_local(change.at, forecast.offset_hours) {
            paragraphs.push(format!(
                "Moon enters {} at {}.",
                change.sign,
                local.format("%H:%M")
            ));
        }
    }

    for event in &forecast.events {
        let found = store.aspect_or_log(
            event.transit.name_ru(),
            event.natal.name_ru(),
            event.aspect.angle_int(),
        );
        if let Some(text) = found {
            paragraphs.push(text.general.clone());
        }
    }

    let void = &forecast.void_of_course;
    paragraphs.push(format!(
        "Void-of-course moon from {} to {}.",
        void.start.format("%H:%M"),
        void.end.format("%H:%M"),
    ));

    Narrative { paragraphs }
}

/// Render an event peak with the configured datetime format, the shape
/// the relational store and transports expect.
pub fn format_peak(event: &selene::AstroEvent, datetime_format: &str) -> Option<String> {
    event
        .peak
        .map(|peak| peak.with_timezone(&Utc).format(datetime_format).to_string())
}
