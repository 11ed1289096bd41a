// src/simulation/engine.rs

use crate::io::demand::{self, DemandSequence, DemandSource};
use crate::model::inventory::{settle_day, CostRates, OrderQty};
use crate::model::ledger::{DayRecord, Ledger};
use crate::simulation::config::GameConfig;
use crate::simulation::error::{DecisionError, GameError};
use serde::Serialize;
use tracing::{debug, info};

/// Mutable part of a playthrough.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationState {
    current_day: u32,
    starting_inventory: u32,
    ledger: Ledger,
}

impl SimulationState {
    fn initial() -> Self {
        Self {
            current_day: 1,
            starting_inventory: 0,
            ledger: Ledger::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GameStatus {
    Active { day: u32 },
    Complete,
}

/// Where the game stands after an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StateSnapshot {
    pub current_day: u32,
    pub starting_inventory: u32,
    pub complete: bool,
}

/// Result of a successful [`InventoryGame::advance`].
#[derive(Debug, Clone, PartialEq)]
pub struct Advance {
    pub record: DayRecord,
    pub snapshot: StateSnapshot,
}

/// What the player may see before deciding: never today's demand.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DayView {
    pub day: u32,
    pub horizon_days: u32,
    pub starting_inventory: u32,
    pub unit_cost: f64,
    pub holding_cost_per_day: f64,
    pub shortage_cost_per_unit: f64,
}

impl DayView {
    /// Every day has been played; only a restart is possible.
    pub fn game_over(&self) -> bool {
        self.day > self.horizon_days
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameSummary {
    pub days_played: usize,
    pub horizon_days: u32,
    pub complete: bool,
    pub total_cost: f64,
    pub records: Vec<DayRecord>,
    pub inventory_series: Vec<u32>,
    pub cumulative_costs: Vec<f64>,
}

/// One single-item playthrough under the lost-sales rule.
///
/// Owns its config, demand and state together; every change goes through
/// `&mut self`, so the day index and the demand it reads can never be
/// changed independently. A different horizon means a new game.
#[derive(Debug, Clone)]
pub struct InventoryGame {
    config: GameConfig,
    rates: CostRates,
    source: DemandSource,
    demand: DemandSequence,
    state: SimulationState,
}

impl InventoryGame {
    pub fn new(config: GameConfig, source: DemandSource) -> Result<Self, GameError> {
        config.validate()?;
        let demand = demand::resolve(&config, &source)?;

        info!(
            horizon_days = config.horizon_days,
            unit_cost = config.unit_cost,
            holding_rate = config.holding_rate_annual,
            shortage_cost = config.shortage_cost_per_unit,
            "new game"
        );

        Ok(Self {
            rates: CostRates::from(&config),
            config,
            source,
            demand,
            state: SimulationState::initial(),
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn source(&self) -> &DemandSource {
        &self.source
    }

    pub fn current_day(&self) -> u32 {
        self.state.current_day
    }

    pub fn starting_inventory(&self) -> u32 {
        self.state.starting_inventory
    }

    pub fn ledger(&self) -> &Ledger {
        &self.state.ledger
    }

    pub fn is_complete(&self) -> bool {
        self.state.current_day > self.config.horizon_days
    }

    pub fn status(&self) -> GameStatus {
        if self.is_complete() {
            GameStatus::Complete
        } else {
            GameStatus::Active {
                day: self.state.current_day,
            }
        }
    }

    pub fn snapshot(&self) -> StateSnapshot {
        StateSnapshot {
            current_day: self.state.current_day,
            starting_inventory: self.state.starting_inventory,
            complete: self.is_complete(),
        }
    }

    pub fn day_view(&self) -> DayView {
        DayView {
            day: self.state.current_day,
            horizon_days: self.config.horizon_days,
            starting_inventory: self.state.starting_inventory,
            unit_cost: self.rates.unit_cost,
            holding_cost_per_day: self.rates.holding_per_unit_per_day,
            shortage_cost_per_unit: self.rates.shortage_per_unit,
        }
    }

    /// Demand of the days already played. Upcoming days stay hidden.
    pub fn revealed_demand(&self) -> Vec<u32> {
        self.state.ledger.demand_series()
    }

    /// Plays the current day with `order` units ordered.
    ///
    /// Rejected once all days are played; the ledger is left as it was.
    pub fn advance(&mut self, order: OrderQty) -> Result<Advance, DecisionError> {
        let horizon_days = self.config.horizon_days;
        let day = self.state.current_day;
        let demand = match self.demand.for_day(day) {
            Some(d) if day <= horizon_days => d,
            _ => return Err(DecisionError::GameComplete { horizon_days }),
        };

        let starting = self.state.starting_inventory;
        let settlement = settle_day(starting, order, demand, &self.rates)?;
        let record = DayRecord::new(day, starting, order.units(), demand, &settlement);

        debug!(
            day,
            order = order.units(),
            demand,
            sold = record.units_sold,
            shortage = record.shortage_units,
            ending_inventory = record.ending_inventory,
            day_cost = record.total_day_cost,
            "day settled"
        );

        self.state.ledger.push(record.clone());
        self.state.starting_inventory = settlement.ending_inventory;
        self.state.current_day += 1;

        if self.is_complete() {
            info!(total_cost = self.total_cost(), "game complete");
        }

        Ok(Advance {
            record,
            snapshot: self.snapshot(),
        })
    }

    /// Back to day 1 with an empty ledger; config and demand are kept.
    pub fn reset(&mut self) {
        info!(days_discarded = self.state.ledger.len(), "game reset");
        self.state = SimulationState::initial();
    }

    /// Swaps in a new demand source and starts over.
    ///
    /// The new demand is resolved first; if that fails nothing changes.
    pub fn regenerate(&mut self, source: DemandSource) -> Result<(), GameError> {
        let demand = demand::resolve(&self.config, &source)?;
        self.demand = demand;
        self.source = source;
        self.reset();
        info!(source = self.source.kind(), "demand regenerated");
        Ok(())
    }

    pub fn cumulative_costs(&self) -> Vec<f64> {
        self.state.ledger.cumulative_costs()
    }

    /// Sum of all played days; a partial total while the game is active.
    pub fn total_cost(&self) -> f64 {
        self.state.ledger.total_cost()
    }

    pub fn summary(&self) -> GameSummary {
        let ledger = &self.state.ledger;
        GameSummary {
            days_played: ledger.len(),
            horizon_days: self.config.horizon_days,
            complete: self.is_complete(),
            total_cost: ledger.total_cost(),
            records: ledger.records().to_vec(),
            inventory_series: ledger.inventory_series(),
            cumulative_costs: ledger.cumulative_costs(),
        }
    }
}
