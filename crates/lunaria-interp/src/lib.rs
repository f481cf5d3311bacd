//! Interpretation text lookup.
//!
//! Two CSV-backed tables: aspect interpretations keyed by
//! (transit planet, natal planet, aspect angle) with the planet names
//! in Russian as the source data ships them, and moon-sign
//! interpretations keyed by the English sign name. Unknown keys are
//! not errors; the forecast assembly logs them and moves on.

use serde::Deserialize;
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum InterpError {
    #[error("could not open {path}: {source}")]
    Open {
        path: String,
        source: std::io::Error,
    },
    #[error("malformed interpretation row: {0}")]
    Malformed(#[from] csv::Error),
}

/// The three text variants every interpretation row carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterpretationText {
    pub general: String,
    pub favorable: String,
    pub unfavorable: String,
}

#[derive(Debug, Deserialize)]
struct AspectRow {
    transit_planet: String,
    natal_planet: String,
    aspect: u16,
    general: String,
    favorable: String,
    unfavorable: String,
}

#[derive(Debug, Deserialize)]
struct MoonSignRow {
    sign: String,
    general: String,
    favorable: String,
    unfavorable: String,
}

#[derive(Debug, Default)]
pub struct InterpretationStore {
    aspects: HashMap<(String, String, u16), InterpretationText>,
    moon_signs: HashMap<String, InterpretationText>,
}

impl InterpretationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the aspect table from headerless UTF-8 CSV.
    pub fn load_aspects(&mut self, path: &Path) -> Result<usize, InterpError> {
        let file = File::open(path).map_err(|source| InterpError::Open {
            path: path.display().to_string(),
            source,
        })?;
        self.read_aspects(file)
    }

    pub fn read_aspects<R: Read>(&mut self, reader: R) -> Result<usize, InterpError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .from_reader(reader);
        let mut loaded = 0;
        for row in csv_reader.deserialize() {
            let row: AspectRow = row?;
            self.aspects.insert(
                (row.transit_planet, row.natal_planet, row.aspect),
                InterpretationText {
                    general: row.general,
                    favorable: row.favorable,
                    unfavorable: row.unfavorable,
                },
            );
            loaded += 1;
        }
        Ok(loaded)
    }

    pub fn load_moon_signs(&mut self, path: &Path) -> Result<usize, InterpError> {
        let file = File::open(path).map_err(|source| InterpError::Open {
            path: path.display().to_string(),
            source,
        })?;
        self.read_moon_signs(file)
    }

    pub fn read_moon_signs<R: Read>(&mut self, reader: R) -> Result<usize, InterpError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .from_reader(reader);
        let mut loaded = 0;
        for row in csv_reader.deserialize() {
            let row: MoonSignRow = row?;
            self.moon_signs.insert(
                row.sign,
                InterpretationText {
                    general: row.general,
                    favorable: row.favorable,
                    unfavorable: row.unfavorable,
                },
            );
            loaded += 1;
        }
        Ok(loaded)
    }

    /// Look up an aspect interpretation, trying the reversed planet
    /// pair before giving up — the separation itself is symmetric.
    pub fn aspect(
        &self,
        transit: &str,
        natal: &str,
        aspect: u16,
    ) -> Option<&InterpretationText> {
        self.aspects
            .get(&(transit.to_string(), natal.to_string(), aspect))
            .or_else(|| {
                self.aspects
                    .get(&(natal.to_string(), transit.to_string(), aspect))
            })
    }

    /// Like [`aspect`](Self::aspect) but logs the missing key, the
    /// advisory treatment the presentation boundary wants.
    pub fn aspect_or_log(
        &self,
        transit: &str,
        natal: &str,
        aspect: u16,
    ) -> Option<&InterpretationText> {
        let found = self.aspect(transit, natal, aspect);
        if found.is_none() {
            log::warn!("no interpretation for ({transit}, {natal}, {aspect})");
        }
        found
    }

    pub fn moon_sign(&self, sign: &str) -> Option<&InterpretationText> {
        self.moon_signs.get(sign)
    }

    pub fn is_empty(&self) -> bool {
        self.aspects.is_empty() && self.moon_signs.is_empty()
    }
}
