pub mod game;
pub mod player;
pub mod result;
pub mod showdown;
pub mod state;
pub mod table;

pub use game::{Game, GameOptions, Stakes};
pub use player::{Player, Position};
pub use result::{GameResult, HandResult, PotResult};
pub use state::GameState;
pub use table::Table;

/// Fatal engine failures: configuration misuse at the surface or broken
/// internal invariants. These never occur on valid inputs mid-hand.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("table is full")]
    TableFull,
    #[error("buy-in {0} outside the table's range")]
    InvalidBuyin(Chips),
    #[error("seat '{0}' is already taken")]
    SeatTaken(PlayerId),
    #[error("need at least {needed} players, have {have}")]
    NotEnoughPlayers { needed: usize, have: usize },
    #[error("variant does not allow {0} play")]
    StructureNotAllowed(BettingStructure),
    #[error("a hand is already in progress")]
    HandInProgress,
    #[error("no hand in progress")]
    NoHand,
    #[error("the deck ran out of cards")]
    DeckExhausted,
    #[error("gameplay step {0} out of range")]
    StepOutOfRange(usize),
    #[error("pot accounting broke: {0}")]
    PotMismatch(String),
    #[error("hand is not complete")]
    NotComplete,
}

use crate::Chips;
use crate::PlayerId;
use crate::betting::BettingStructure;
use thiserror::Error;
