/// Everything a player can submit while the interpreter waits on them.
///
/// `Bet`, `Raise`, and `Complete` carry the player's round total after the
/// action (raise-to). `Call` and `BringIn` carry the chips being put in now.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerAction {
    Fold,
    Check,
    Call(Chips),
    Bet(Chips),
    Raise(Chips),
    Complete(Chips),
    BringIn(Chips),
    Discard(Vec<Card>),
    Draw(Vec<Card>),
    Expose(Vec<Card>),
    Pass(Vec<Card>),
    Separate(Vec<(Card, String)>),
    Declare(Declaration),
    Choose(String),
    ReplaceCommunity(Vec<Card>),
}

impl PlayerAction {
    pub fn kind(&self) -> ActionKind {
        match self {
            PlayerAction::Fold => ActionKind::Fold,
            PlayerAction::Check => ActionKind::Check,
            PlayerAction::Call(_) => ActionKind::Call,
            PlayerAction::Bet(_) => ActionKind::Bet,
            PlayerAction::Raise(_) => ActionKind::Raise,
            PlayerAction::Complete(_) => ActionKind::Complete,
            PlayerAction::BringIn(_) => ActionKind::BringIn,
            PlayerAction::Discard(_) => ActionKind::Discard,
            PlayerAction::Draw(_) => ActionKind::Draw,
            PlayerAction::Expose(_) => ActionKind::Expose,
            PlayerAction::Pass(_) => ActionKind::Pass,
            PlayerAction::Separate(_) => ActionKind::Separate,
            PlayerAction::Declare(_) => ActionKind::Declare,
            PlayerAction::Choose(_) => ActionKind::Choose,
            PlayerAction::ReplaceCommunity(_) => ActionKind::ReplaceCommunity,
        }
    }
}

/// payload-free action tags, the vocabulary of `get_valid_actions`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    Fold,
    Check,
    Call,
    Bet,
    Raise,
    Complete,
    BringIn,
    Discard,
    Draw,
    Expose,
    Pass,
    Separate,
    Declare,
    Choose,
    ReplaceCommunity,
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let name = match self {
            ActionKind::Fold => "FOLD",
            ActionKind::Check => "CHECK",
            ActionKind::Call => "CALL",
            ActionKind::Bet => "BET",
            ActionKind::Raise => "RAISE",
            ActionKind::Complete => "COMPLETE",
            ActionKind::BringIn => "BRING-IN",
            ActionKind::Discard => "DISCARD",
            ActionKind::Draw => "DRAW",
            ActionKind::Expose => "EXPOSE",
            ActionKind::Pass => "PASS",
            ActionKind::Separate => "SEPARATE",
            ActionKind::Declare => "DECLARE",
            ActionKind::Choose => "CHOOSE",
            ActionKind::ReplaceCommunity => "REPLACE COMMUNITY",
        };
        write!(f, "{}", name)
    }
}

/// One legal action with its bounds: chips for betting actions, card counts
/// for drawing-family actions, zeroes where no quantity applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidAction {
    pub kind: ActionKind,
    pub min: Chips,
    pub max: Chips,
}

impl ValidAction {
    pub fn new(kind: ActionKind, min: Chips, max: Chips) -> Self {
        Self { kind, min, max }
    }
    pub fn bare(kind: ActionKind) -> Self {
        Self { kind, min: 0, max: 0 }
    }
}

/// a hi/lo declaration for one pot portion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Declaration {
    High,
    Low,
    HighLow,
}

impl std::fmt::Display for Declaration {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Declaration::High => write!(f, "high"),
            Declaration::Low => write!(f, "low"),
            Declaration::HighLow => write!(f, "high_low"),
        }
    }
}

impl TryFrom<&str> for Declaration {
    type Error = String;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s {
            "high" => Ok(Declaration::High),
            "low" => Ok(Declaration::Low),
            "high_low" | "both" => Ok(Declaration::HighLow),
            other => Err(format!("invalid declaration: {}", other)),
        }
    }
}

/// Why an action was rejected. The game state is unchanged on rejection.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error("not this player's turn")]
    OutOfTurn,
    #[error("unknown player")]
    UnknownPlayer,
    #[error("action not in the legal set")]
    NotAllowed,
    #[error("amount {amount} outside [{min}, {max}]")]
    AmountOutOfRange { amount: Chips, min: Chips, max: Chips },
    #[error("card count {got} outside [{min}, {max}]")]
    WrongCardCount { got: usize, min: usize, max: usize },
    #[error("card not held: {0}")]
    CardNotHeld(String),
    #[error("no such option: {0}")]
    UnknownOption(String),
    #[error("declaration does not cover the contested pots")]
    BadDeclaration,
    #[error("the hand is not accepting actions")]
    NotAccepting,
}

/// outcome of `player_action`: success, the rejection kind if any, and
/// whether the action closed out the current step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResult {
    pub success: bool,
    pub error: Option<ActionError>,
    pub advance_step: bool,
}

impl ActionResult {
    pub fn ok(advance_step: bool) -> Self {
        Self {
            success: true,
            error: None,
            advance_step,
        }
    }
    pub fn rejected(error: ActionError) -> Self {
        Self {
            success: false,
            error: Some(error),
            advance_step: false,
        }
    }
}

use crate::Chips;
use crate::cards::card::Card;
use serde::Serialize;
use thiserror::Error;
