// src/simulation/error.rs

use std::io;
use thiserror::Error;

/// Rejected game parameters. Raised before any game state exists.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("horizon must be at least one day")]
    NonPositiveHorizon,
    #[error("unit cost must be finite and > 0 (got {0})")]
    InvalidUnitCost(f64),
    #[error("annual holding rate must be within [0,1] (got {0})")]
    HoldingRateOutOfRange(f64),
    #[error("shortage cost must be finite and >= 0 (got {0})")]
    InvalidShortageCost(f64),
    #[error("demand bounds are inverted: low {low} > high {high}")]
    InvalidDemandBounds { low: u32, high: u32 },
    #[error("unreadable configuration: {0}")]
    Unreadable(String),
}

/// Problems with an externally supplied demand column.
#[derive(Debug, Error)]
pub enum DemandSourceError {
    #[error("demand source contains no values")]
    Empty,
    #[error("demand source has no `{0}` column")]
    MissingColumn(String),
    #[error("demand at position {index} is negative ({value})")]
    Negative { index: usize, value: i64 },
    #[error("demand at position {index} is out of range ({value})")]
    OutOfRange { index: usize, value: i64 },
    #[error("row {row}: `{value}` is not a non-negative whole number")]
    InvalidValue { row: usize, value: String },
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// A per-day order that the engine refused. State is never modified.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecisionError {
    #[error("order quantity must be >= 0 (got {0})")]
    Negative(i64),
    #[error("order quantity `{0}` is not a whole number")]
    NotAnInteger(String),
    #[error("order quantity {0} is too large")]
    TooLarge(i64),
    #[error("inventory overflow: {starting} on hand + {order} ordered")]
    InventoryOverflow { starting: u32, order: u32 },
    #[error("the game is complete after {horizon_days} days; reset to play again")]
    GameComplete { horizon_days: u32 },
}

#[derive(Debug, Error)]
pub enum PlayerError {
    #[error("console I/O failed: {0}")]
    Io(#[from] io::Error),
}

#[derive(Debug, Error)]
pub enum GameError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("demand source error: {0}")]
    Demand(#[from] DemandSourceError),
    #[error("invalid decision: {0}")]
    Decision(#[from] DecisionError),
}
