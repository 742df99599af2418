/// Per-round bet tracking: the level to match, raise arithmetic, and each
/// player's round contribution. Whole-hand accounting lives in `Pot`.
#[derive(Debug, Clone)]
pub struct BetState {
    pub structure: BettingStructure,
    /// the fixed wager for limit rounds; the minimum opening bet otherwise
    pub bet_unit: Chips,
    pub current_bet: Chips,
    pub last_raise: Chips,
    pub raises: usize,
    pub raise_cap: usize,
    bets: BTreeMap<PlayerId, RoundBet>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RoundBet {
    pub amount: Chips,
    pub posted_blind: bool,
}

impl BetState {
    pub fn new(structure: BettingStructure, raise_cap: usize) -> Self {
        Self {
            structure,
            bet_unit: 0,
            current_bet: 0,
            last_raise: 0,
            raises: 0,
            raise_cap,
            bets: BTreeMap::new(),
        }
    }

    /// open a fresh betting round; `carry` keeps the level and contributions
    /// from a bring-in that this round continues
    pub fn begin_round(&mut self, bet_unit: Chips, carry: bool) {
        self.bet_unit = bet_unit;
        if !carry {
            self.current_bet = 0;
            self.last_raise = 0;
            self.raises = 0;
            self.bets.clear();
        }
    }

    pub fn contribution(&self, id: &PlayerId) -> Chips {
        self.bets.get(id).map(|b| b.amount).unwrap_or(0)
    }
    pub fn round_bet(&self, id: &PlayerId) -> Option<&RoundBet> {
        self.bets.get(id)
    }
    pub fn to_call(&self, id: &PlayerId) -> Chips {
        self.current_bet.saturating_sub(self.contribution(id))
    }

    /// add chips to a player's round total; blinds are flagged so the
    /// first voluntary round can still raise over them
    pub fn put(&mut self, id: &PlayerId, amount: Chips, blind: bool) -> Chips {
        let bet = self.bets.entry(id.clone()).or_default();
        bet.amount += amount;
        bet.posted_blind |= blind;
        bet.amount
    }

    /// lift the round's level. A full raise re-arms raising; a short
    /// all-in raises the level to call without reopening action.
    pub fn register_level(&mut self, new_level: Chips, full_raise: bool) {
        if new_level <= self.current_bet {
            return;
        }
        if full_raise {
            self.last_raise = new_level - self.current_bet;
            if self.current_bet > 0 {
                self.raises += 1;
            }
        }
        self.current_bet = new_level;
    }

    /// the smallest legal raise-to total for the acting player
    pub fn min_raise_to(&self) -> Chips {
        match self.structure {
            BettingStructure::Limit => self.current_bet + self.bet_unit,
            _ => self.current_bet + self.last_raise.max(self.bet_unit),
        }
    }

    pub fn may_raise(&self) -> bool {
        match self.structure {
            BettingStructure::Limit => self.raises < self.raise_cap,
            _ => true,
        }
    }

    /// pot-limit ceiling: the pot as it stands once the caller matches
    pub fn pot_limit_raise_to(&self, pot_total: Chips, to_call: Chips) -> Chips {
        self.current_bet + pot_total + to_call
    }
}

use super::BettingStructure;
use crate::Chips;
use crate::PlayerId;
use std::collections::BTreeMap;
