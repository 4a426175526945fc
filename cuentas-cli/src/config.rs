use anyhow::{Context, Result};
use chrono::NaiveDate;
use cuentas_core::{HouseholdId, HouseholdMember, MemberDirectory, today_in_zone};
use cuentas_finance::{CategoryRules, CustomRule, Period};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::state::{default_data_path, ensure_cuentas_home};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub household: String,
    #[serde(default = "default_timezone")]
    pub timezone: String,
    /// One of month, 3months, 6months, year, all, or a year such as 2025
    #[serde(default = "default_period")]
    pub default_period: String,
    #[serde(default)]
    pub include_card_payments: bool,
    /// Local transaction file; defaults to ~/.cuentas/movimientos.json
    #[serde(default)]
    pub data_file: Option<PathBuf>,
    #[serde(default)]
    pub members: Vec<HouseholdMember>,
    #[serde(default)]
    pub remote: Option<RemoteSection>,
    /// Checked before the built-in keyword table
    #[serde(default)]
    pub rules: Vec<CustomRule>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteSection {
    /// Base URL of a PostgREST endpoint, e.g. https://xyz.supabase.co
    pub url: String,
    #[serde(default = "default_table")]
    pub table: String,
    /// Environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
}

fn default_timezone() -> String {
    "America/Bogota".to_string()
}

fn default_period() -> String {
    "6months".to_string()
}

fn default_table() -> String {
    "movimientos".to_string()
}

fn default_api_key_env() -> String {
    "CUENTAS_API_KEY".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            household: "familia".to_string(),
            timezone: default_timezone(),
            default_period: default_period(),
            include_card_payments: false,
            data_file: None,
            members: Vec::new(),
            remote: None,
            rules: Vec::new(),
        }
    }
}

impl Config {
    pub fn household(&self) -> HouseholdId {
        HouseholdId::new(self.household.trim())
    }

    /// Today's date in the configured household timezone.
    pub fn today(&self) -> Result<NaiveDate> {
        today_in_zone(&self.timezone).with_context(|| format!("invalid timezone {:?}", self.timezone))
    }

    pub fn period(&self) -> Result<Period> {
        self.default_period
            .parse()
            .with_context(|| format!("invalid default_period {:?}", self.default_period))
    }

    pub fn category_rules(&self) -> CategoryRules {
        CategoryRules::with_custom(&self.rules)
    }

    pub fn data_path(&self) -> Result<PathBuf> {
        match &self.data_file {
            Some(p) => Ok(p.clone()),
            None => default_data_path(),
        }
    }
}

/// Members come from the config file; one household per config.
impl MemberDirectory for Config {
    fn list(&self, household: &HouseholdId) -> cuentas_core::Result<Vec<HouseholdMember>> {
        if household.as_str() != self.household.trim() {
            return Ok(Vec::new());
        }
        Ok(self
            .members
            .iter()
            .cloned()
            .map(|mut m| {
                if m.initials.is_empty() {
                    m.initials = HouseholdMember::new(m.id.as_str(), m.name.as_str()).initials;
                }
                m
            })
            .collect())
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(ensure_cuentas_home()?.join("config.toml"))
}

pub fn parse_config(s: &str) -> Result<Config> {
    toml::from_str(s).context("parse config.toml")
}

pub fn load_config() -> Result<Config> {
    let p = config_path()?;
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    parse_config(&s)
}

pub fn save_config(cfg: &Config) -> Result<()> {
    let p = config_path()?;
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(&p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

pub fn init_config() -> Result<()> {
    let p = config_path()?;
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    save_config(&Config::default())?;
    println!("Wrote {}", p.display());
    Ok(())
}
