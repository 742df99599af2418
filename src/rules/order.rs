/// Who opens a betting round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FirstActor {
    AfterBigBlind,
    BringIn,
    Dealer,
    HighHand,
    LastActor,
}

impl TryFrom<&str> for FirstActor {
    type Error = String;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s {
            "after_big_blind" => Ok(FirstActor::AfterBigBlind),
            "bring_in" => Ok(FirstActor::BringIn),
            "dealer" => Ok(FirstActor::Dealer),
            "high_hand" => Ok(FirstActor::HighHand),
            "last_actor" => Ok(FirstActor::LastActor),
            other => Err(format!("invalid betting order: {}", other)),
        }
    }
}

/// First-actor selection for the opening round and every round after it.
#[derive(Debug, Clone)]
pub struct BettingOrder {
    pub initial: FirstActor,
    pub subsequent: Conditional<FirstActor>,
}

impl BettingOrder {
    /// the defaults a forced-bet style implies when the description is
    /// silent or invalid
    pub fn implied_by(style: ForcedBetStyle) -> Self {
        let (initial, subsequent) = match style {
            ForcedBetStyle::Blinds => (FirstActor::AfterBigBlind, FirstActor::Dealer),
            ForcedBetStyle::BringIn => (FirstActor::BringIn, FirstActor::HighHand),
            ForcedBetStyle::AntesOnly => (FirstActor::Dealer, FirstActor::HighHand),
        };
        Self {
            initial,
            subsequent: Conditional::Static(subsequent),
        }
    }
}

use super::conditional::Conditional;
use super::forced::ForcedBetStyle;
