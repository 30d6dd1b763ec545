//! Runtime configuration
//!
//! Built once at startup and handed to the components that need it.

use chrono::Duration;
use thiserror::Error;

/// A custom product field probed during matrix builds.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CustomField {
    pub key: String,
    pub label: String,
}

impl CustomField {
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self { key: key.into(), label: label.into() }
    }
}

#[derive(Clone, Debug)]
pub struct CompareConfig {
    pub max_products: usize,
    pub retention: Duration,
    pub cookie_name: String,
    pub cookie_path: String,
    pub lookup_timeout: std::time::Duration,
    pub custom_fields: Vec<CustomField>,
}

impl Default for CompareConfig {
    fn default() -> Self {
        Self {
            max_products: 4,
            retention: Duration::days(7),
            cookie_name: "neogen_compare".to_string(),
            cookie_path: "/".to_string(),
            lookup_timeout: std::time::Duration::from_secs(2),
            custom_fields: vec![
                CustomField::new("_neogen_hub_required", "Hub Required"),
                CustomField::new("_neogen_connectivity", "Connectivity"),
                CustomField::new("_neogen_battery_life", "Battery Life"),
                CustomField::new("_neogen_warranty", "Warranty"),
            ],
        }
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
}

impl CompareConfig {
    /// Defaults overridden by `COMPARE_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(v) = lookup("COMPARE_MAX_PRODUCTS") {
            config.max_products = parse_positive("COMPARE_MAX_PRODUCTS", &v, u32::MAX as u64)? as usize;
        }
        if let Some(v) = lookup("COMPARE_RETENTION_DAYS") {
            config.retention = Duration::days(parse_positive("COMPARE_RETENTION_DAYS", &v, MAX_RETENTION_DAYS)? as i64);
        }
        if let Some(v) = lookup("COMPARE_COOKIE_NAME") {
            if v.trim().is_empty() { return Err(ConfigError::Invalid { key: "COMPARE_COOKIE_NAME", value: v }); }
            config.cookie_name = v;
        }
        if let Some(v) = lookup("COMPARE_LOOKUP_TIMEOUT_MS") {
            config.lookup_timeout = std::time::Duration::from_millis(parse_positive("COMPARE_LOOKUP_TIMEOUT_MS", &v, u32::MAX as u64)?);
        }
        Ok(config)
    }
}

/// Ten years; keeps cookie and store expiry arithmetic in range.
const MAX_RETENTION_DAYS: u64 = 3650;

fn parse_positive(key: &'static str, value: &str, max: u64) -> Result<u64, ConfigError> {
    match value.trim().parse::<u64>() {
        Ok(n) if n > 0 && n <= max => Ok(n),
        _ => Err(ConfigError::Invalid { key, value: value.to_string() }),
    }
}
