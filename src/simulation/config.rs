// src/simulation/config.rs

use crate::simulation::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const DAYS_PER_YEAR: f64 = 365.0;

/// Cost and horizon parameters of one playthrough.
///
/// Deserializes from JSON; any field left out takes its default, e.g.
/// `{"horizon_days": 10}` plays ten days at the standard prices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub horizon_days: u32,
    pub unit_cost: f64,
    /// Fraction of the unit cost charged per year of holding (0.20 = 20%).
    pub holding_rate_annual: f64,
    pub shortage_cost_per_unit: f64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            horizon_days: 30,
            unit_cost: 100.0,
            holding_rate_annual: 0.20,
            shortage_cost_per_unit: 20.0,
        }
    }
}

impl GameConfig {
    /// Daily carrying cost of one unit left in stock at the end of a day.
    pub fn holding_cost_per_unit_per_day(&self) -> f64 {
        self.unit_cost * self.holding_rate_annual / DAYS_PER_YEAR
    }

    pub fn with_horizon(mut self, horizon_days: u32) -> Self {
        self.horizon_days = horizon_days;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.horizon_days == 0 {
            return Err(ConfigError::NonPositiveHorizon);
        }
        if !self.unit_cost.is_finite() || self.unit_cost <= 0.0 {
            return Err(ConfigError::InvalidUnitCost(self.unit_cost));
        }
        if !(0.0..=1.0).contains(&self.holding_rate_annual) {
            // NaN fails the range check too
            return Err(ConfigError::HoldingRateOutOfRange(self.holding_rate_annual));
        }
        if !self.shortage_cost_per_unit.is_finite() || self.shortage_cost_per_unit < 0.0 {
            return Err(ConfigError::InvalidShortageCost(self.shortage_cost_per_unit));
        }
        Ok(())
    }

    /// Parses and validates a JSON document.
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: GameConfig =
            serde_json::from_str(raw).map_err(|e| ConfigError::Unreadable(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .map_err(|e| ConfigError::Unreadable(format!("{}: {}", path.display(), e)))?;
        Self::from_json_str(&raw)
    }
}
