//! Single-item inventory ordering game.
//!
//! Each day the player orders before seeing demand. Unmet demand is lost,
//! leftover stock is carried at a daily holding cost, and every day is
//! recorded in an append-only ledger.

pub mod io;
pub mod model;
pub mod player;
pub mod simulation;
