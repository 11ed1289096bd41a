// src/player/traits.rs

use crate::model::inventory::OrderQty;
use crate::simulation::engine::DayView;
use crate::simulation::error::PlayerError;
use std::fmt::Debug;

/// A single player action. Each one maps to exactly one engine call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerCommand {
    Order(OrderQty),
    /// Start over on the same demand.
    Reset,
    /// Start over on freshly generated demand from this seed.
    Reseed(u64),
    Quit,
}

/// Supplies the player's decisions, one command at a time.
///
/// Implementations only ever see the [`DayView`], so they cannot look at the
/// demand of the day they are ordering for.
pub trait OrderSource: Debug {
    fn next_command(&mut self, view: &DayView) -> Result<PlayerCommand, PlayerError>;
}
