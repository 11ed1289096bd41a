// src/player/session.rs

use crate::model::ledger::DayRecord;
use crate::player::traits::{OrderSource, PlayerCommand};
use crate::simulation::engine::{GameSummary, InventoryGame};
use crate::simulation::error::PlayerError;
use tracing::warn;

/// Something that happened while a session was running.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    Played(DayRecord),
    /// The last day was just played. Follows that day's `Played`.
    Completed(GameSummary),
    Reset,
    Regenerated { seed: u64 },
    /// A command the engine refused; the game is unchanged.
    Rejected(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayOutcome {
    /// The player quit with every day of the current game played.
    Completed,
    /// The player stopped early; the ledger holds a partial playthrough.
    Stopped { days_played: usize },
}

/// Feeds commands from `source` into `game` until the player quits.
///
/// Refused commands are reported through `on_event` and the player is asked
/// again. A finished game keeps accepting `Reset` and `Reseed`, so the player
/// can start over; orders are refused until then.
pub fn play<S>(
    game: &mut InventoryGame,
    source: &mut S,
    mut on_event: impl FnMut(&SessionEvent),
) -> Result<PlayOutcome, PlayerError>
where
    S: OrderSource + ?Sized,
{
    loop {
        let event = match source.next_command(&game.day_view())? {
            PlayerCommand::Order(qty) => match game.advance(qty) {
                Ok(advance) => {
                    let finished = advance.snapshot.complete;
                    on_event(&SessionEvent::Played(advance.record));
                    if !finished {
                        continue;
                    }
                    SessionEvent::Completed(game.summary())
                }
                Err(e) => SessionEvent::Rejected(e.to_string()),
            },
            PlayerCommand::Reset => {
                game.reset();
                SessionEvent::Reset
            }
            PlayerCommand::Reseed(seed) => reseed(game, seed),
            PlayerCommand::Quit if game.is_complete() => return Ok(PlayOutcome::Completed),
            PlayerCommand::Quit => {
                return Ok(PlayOutcome::Stopped {
                    days_played: game.ledger().len(),
                })
            }
        };

        if let SessionEvent::Rejected(reason) = &event {
            warn!(%reason, day = game.current_day(), "command rejected");
        }
        on_event(&event);
    }
}

fn reseed(game: &mut InventoryGame, seed: u64) -> SessionEvent {
    let Some(source) = game.source().with_seed(seed) else {
        return SessionEvent::Rejected(
            "demand comes from a fixed table and cannot be reseeded".to_string(),
        );
    };
    match game.regenerate(source) {
        Ok(()) => SessionEvent::Regenerated { seed },
        Err(e) => SessionEvent::Rejected(e.to_string()),
    }
}
