// src/player/implementations.rs

use crate::model::inventory::OrderQty;
use crate::player::traits::{OrderSource, PlayerCommand};
use crate::simulation::engine::DayView;
use crate::simulation::error::{DecisionError, PlayerError};
use std::collections::VecDeque;
use std::fmt;
use std::io::{BufRead, Write};

// =========================================================================
// 1. Scripted orders
// =========================================================================

/// Replays a fixed list of orders, then quits.
///
/// A list shorter than the horizon leaves the game part-way through.
#[derive(Debug, Clone, Default)]
pub struct ScriptedOrders {
    orders: VecDeque<OrderQty>,
}

impl ScriptedOrders {
    pub fn new(orders: impl IntoIterator<Item = OrderQty>) -> Self {
        Self {
            orders: orders.into_iter().collect(),
        }
    }

    /// Parses a comma separated list such as `60,0,50`.
    ///
    /// A single trailing comma is allowed. An empty entry anywhere else is
    /// an error, since skipping it would shift every later order by a day.
    pub fn parse(list: &str) -> Result<Self, DecisionError> {
        let list = list.trim();
        if list.is_empty() {
            return Ok(Self::default());
        }
        let list = list.strip_suffix(',').unwrap_or(list);
        let orders = list
            .split(',')
            .map(str::parse::<OrderQty>)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(orders))
    }

    pub fn remaining(&self) -> usize {
        self.orders.len()
    }
}

impl OrderSource for ScriptedOrders {
    fn next_command(&mut self, _view: &DayView) -> Result<PlayerCommand, PlayerError> {
        Ok(self
            .orders
            .pop_front()
            .map(PlayerCommand::Order)
            .unwrap_or(PlayerCommand::Quit))
    }
}

// =========================================================================
// 2. Console player
// =========================================================================

/// Prompts a human on `output` and reads answers line by line from `input`.
///
/// Accepts a whole number (the order), `reset`, `new <seed>` or `quit`.
/// Anything else is explained and asked again. End of input quits.
pub struct ConsolePlayer<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> ConsolePlayer<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn parse_line(line: &str) -> Result<PlayerCommand, String> {
        let mut words = line.split_whitespace();
        let first = words.next().unwrap_or("");
        match first.to_ascii_lowercase().as_str() {
            "q" | "quit" | "exit" => Ok(PlayerCommand::Quit),
            "r" | "reset" | "restart" => Ok(PlayerCommand::Reset),
            "new" | "reseed" => {
                let seed = words.next().ok_or("usage: new <seed>")?;
                seed.parse::<u64>()
                    .map(PlayerCommand::Reseed)
                    .map_err(|_| format!("`{}` is not a valid seed", seed))
            }
            _ => line
                .parse::<OrderQty>()
                .map(PlayerCommand::Order)
                .map_err(|e| e.to_string()),
        }
    }
}

impl<R, W> fmt::Debug for ConsolePlayer<R, W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConsolePlayer").finish_non_exhaustive()
    }
}

impl<R: BufRead, W: Write> OrderSource for ConsolePlayer<R, W> {
    fn next_command(&mut self, view: &DayView) -> Result<PlayerCommand, PlayerError> {
        loop {
            if view.game_over() {
                write!(self.output, "Game over | `reset`, `new <seed>` or `quit`: ")?;
            } else {
                write!(
                    self.output,
                    "Day {}/{} | starting inventory {} | order quantity: ",
                    view.day, view.horizon_days, view.starting_inventory
                )?;
            }
            self.output.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                writeln!(self.output)?;
                return Ok(PlayerCommand::Quit);
            }
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            match Self::parse_line(line) {
                Ok(command) => return Ok(command),
                Err(reason) => writeln!(self.output, "  {}", reason)?,
            }
        }
    }
}
