//! Startup configuration read from the environment.

use std::env;

use thiserror::Error;

use crate::domain::ValuationConfig;

pub const API_URL_VAR: &str = "PACKAGE_SCANNER_API_URL";
pub const CASH_MULTIPLIER_VAR: &str = "PACKAGE_SCANNER_CASH_MULTIPLIER";
const DEFAULT_API_URL: &str = "http://localhost:8080/";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{var} must be a positive number, got {value:?}")]
    InvalidMultiplier { var: &'static str, value: String },
}

#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    pub api_base_url: String,
    /// Set only when the environment overrides the persisted multiplier.
    pub cash_multiplier: Option<f64>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            cash_multiplier: None,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_base_url = lookup(API_URL_VAR)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let cash_multiplier = match lookup(CASH_MULTIPLIER_VAR) {
            Some(raw) => {
                let parsed = raw
                    .trim()
                    .parse::<f64>()
                    .ok()
                    .filter(|value| ValuationConfig::is_valid_multiplier(*value));
                match parsed {
                    Some(value) => Some(value),
                    None => {
                        return Err(ConfigError::InvalidMultiplier {
                            var: CASH_MULTIPLIER_VAR,
                            value: raw,
                        })
                    }
                }
            }
            None => None,
        };

        Ok(Self {
            api_base_url,
            cash_multiplier,
        })
    }

    /// Falls back to defaults after logging why the environment was rejected.
    pub fn load() -> Self {
        match Self::from_env() {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!("ignoring invalid configuration: {err}");
                Self::default()
            }
        }
    }

    pub fn apply_to(&self, valuation: &mut ValuationConfig) {
        if let Some(multiplier) = self.cash_multiplier {
            valuation.cash_multiplier = multiplier;
        }
    }
}
