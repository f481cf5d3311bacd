//! Service configuration.
//!
//! A typed settings struct deserialized from TOML. Every recognized
//! section is required unless marked optional; a missing key fails at
//! startup with a pointed error rather than at first use.

use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub database: DatabaseFormats,
    pub subscription: SubscriptionSettings,
    pub admins: AdminSettings,
    pub admin_chat: AdminChatSettings,
    /// Opaque file identifiers keyed by purpose.
    #[serde(default)]
    pub files: HashMap<String, String>,
    pub payments: PaymentSettings,
    /// Optional Swiss Ephemeris data directory; without it the
    /// built-in analytic theory is used.
    #[serde(default)]
    pub ephemeris: EphemerisSettings,
}

/// Date/time render formats shared with the relational store.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseFormats {
    pub datetime_format: String,
    pub date_format: String,
    pub time_format: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubscriptionSettings {
    pub test_period_in_days: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AdminSettings {
    pub ids: Vec<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AdminChatSettings {
    pub id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PaymentSettings {
    pub prodamus_secret_key: String,
    pub prodamus_payment_link: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EphemerisSettings {
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl Settings {
    /// Parse and validate a TOML settings document.
    pub fn from_toml_str(text: &str) -> anyhow::Result<Self> {
        let settings: Settings =
            toml::from_str(text).map_err(|e| anyhow::anyhow!("invalid configuration: {e}"))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("could not read {}: {e}", path.display()))?;
        Self::from_toml_str(&text)
    }

    /// Try the conventional relative locations, daemon-style.
    pub fn load_default_locations() -> anyhow::Result<Self> {
        let paths = ["configs/lunaria.toml", "../../configs/lunaria.toml"];
        for p in &paths {
            if Path::new(p).exists() {
                return Self::load(Path::new(p));
            }
        }
        anyhow::bail!("could not find lunaria.toml in {:?}", paths);
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.database.datetime_format.is_empty()
            || self.database.date_format.is_empty()
            || self.database.time_format.is_empty()
        {
            anyhow::bail!("database formats must not be empty");
        }
        if self.payments.prodamus_secret_key.is_empty() {
            anyhow::bail!("payments.prodamus_secret_key must not be empty");
        }
        if !self.payments.prodamus_payment_link.starts_with("http") {
            anyhow::bail!(
                "payments.prodamus_payment_link is not a URL: {}",
                self.payments.prodamus_payment_link
            );
        }
        if let Some(path) = &self.ephemeris.path {
            if !path.exists() {
                anyhow::bail!("ephemeris.path does not exist: {}", path.display());
            }
        }
        Ok(())
    }
}
