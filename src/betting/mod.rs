pub mod action;
pub mod bringin;
pub mod pot;
pub mod round;

pub use action::{ActionError, ActionKind, ActionResult, Declaration, PlayerAction, ValidAction};
pub use pot::Pot;
pub use round::BetState;

/// Limit, no-limit, or pot-limit bet sizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BettingStructure {
    Limit,
    NoLimit,
    PotLimit,
}

impl TryFrom<&str> for BettingStructure {
    type Error = String;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s {
            "Limit" => Ok(BettingStructure::Limit),
            "No Limit" => Ok(BettingStructure::NoLimit),
            "Pot Limit" => Ok(BettingStructure::PotLimit),
            other => Err(format!("invalid betting structure: {}", other)),
        }
    }
}

impl std::fmt::Display for BettingStructure {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            BettingStructure::Limit => write!(f, "Limit"),
            BettingStructure::NoLimit => write!(f, "No Limit"),
            BettingStructure::PotLimit => write!(f, "Pot Limit"),
        }
    }
}
