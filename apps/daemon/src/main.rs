//! Forecast service entry point.
//!
//! Takes no arguments: configuration comes from the conventional
//! `configs/lunaria.toml` locations. Exits non-zero on any startup
//! failure, zero on a clean signal-driven shutdown.

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use chrono::Utc;
use log::{info, warn};

use lunaria_config::Settings;
use lunaria_core::ForecastEngine;
use lunaria_interp::InterpretationStore;
use selene::moon::{lunar_day_number, moon_phase};
use selene::{CachedEphemeris, Location, SwissEphemerisAdapter};

const ASPECT_TABLE: &str = "data/interpretations.csv";
const MOON_SIGN_TABLE: &str = "data/moon_sign_interpretations.csv";

/// Reference point for the startup self-check.
const MOSCOW: (f64, f64) = (37.6173, 55.7558);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let settings = Settings::load_default_locations().context("loading configuration")?;
    info!(
        "configuration loaded: {} admins, test period {} days",
        settings.admins.ids.len(),
        settings.subscription.test_period_in_days
    );

    let adapter = SwissEphemerisAdapter::new(settings.ephemeris.path.clone())
        .map_err(|e| anyhow::anyhow!("ephemeris init failed: {e}"))?;
    let ephemeris = Arc::new(CachedEphemeris::new(adapter));

    let mut interpretations = InterpretationStore::new();
    match interpretations.load_aspects(Path::new(ASPECT_TABLE)) {
        Ok(rows) => info!("loaded {rows} aspect interpretations"),
        Err(e) => warn!("aspect table {ASPECT_TABLE} unavailable: {e}"),
    }
    match interpretations.load_moon_signs(Path::new(MOON_SIGN_TABLE)) {
        Ok(rows) => info!("loaded {rows} moon-sign interpretations"),
        Err(e) => warn!("moon-sign table {MOON_SIGN_TABLE} unavailable: {e}"),
    }
    if interpretations.is_empty() {
        warn!("running without interpretation texts; narratives will be bare");
    }

    // Startup self-check: one real computation proves the ephemeris
    // works before the service reports ready.
    let here = Location::new(MOSCOW.0, MOSCOW.1)
        .map_err(|e| anyhow::anyhow!("reference location invalid: {e}"))?;
    let now = Utc::now();
    let phase = moon_phase(ephemeris.as_ref(), now, &here)
        .map_err(|e| anyhow::anyhow!("startup self-check failed: {e}"))?;
    let day = lunar_day_number(ephemeris.as_ref(), now, &here)
        .map_err(|e| anyhow::anyhow!("startup self-check failed: {e}"))?;
    info!("self-check: moon is {phase}, lunar day {day}");

    let _engine = ForecastEngine::new(ephemeris);
    info!("forecast core ready, waiting for shutdown signal");

    tokio::signal::ctrl_c().await.context("signal handler")?;
    info!("shutting down");
    Ok(())
}
