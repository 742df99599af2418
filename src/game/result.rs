/// One player's evaluated hand for one pot portion.
#[derive(Debug, Clone, Serialize)]
pub struct HandResult {
    pub player_id: PlayerId,
    pub cards: Vec<Card>,
    pub hand_name: String,
    pub hand_description: String,
    pub evaluation_type: String,
    pub hand_type: String,
    pub community_cards: Vec<Card>,
    pub used_hole_cards: Vec<Card>,
    pub rank: u32,
    pub ordered_rank: u32,
    pub classifications: BTreeMap<String, String>,
}

impl Display for HandResult {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        let cards = self
            .cards
            .iter()
            .map(|c| c.to_string())
            .collect::<Vec<String>>()
            .join(", ");
        write!(f, "Player {}: {} ({})", self.player_id, self.hand_description, cards)
    }
}

/// One pot portion's award.
#[derive(Debug, Clone, Serialize)]
pub struct PotResult {
    pub amount: Chips,
    pub winners: Vec<PlayerId>,
    pub split: bool,
    pub pot_type: String,
    pub hand_type: String,
    pub side_pot_index: Option<usize>,
    pub eligible_players: Vec<PlayerId>,
    pub reason: Option<String>,
    pub best_hands: Vec<HandResult>,
    pub declarations: BTreeMap<PlayerId, String>,
}

impl PotResult {
    pub fn amount_per_player(&self) -> Chips {
        if self.winners.is_empty() {
            0
        } else {
            self.amount / self.winners.len() as Chips
        }
    }
}

impl Display for PotResult {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        let name = match self.side_pot_index {
            None => "Main pot".to_string(),
            Some(i) => format!("Side pot {}", i + 1),
        };
        let winners = self.winners.join(", ");
        let reason = self
            .reason
            .as_ref()
            .map(|r| format!(" ({})", r))
            .unwrap_or_default();
        if self.split {
            write!(
                f,
                "{}: ${} - Split between {} (${} each){}",
                name,
                self.amount,
                winners,
                self.amount_per_player(),
                reason
            )
        } else {
            write!(f, "{}: ${} - Won by {}{}", name, self.amount, winners, reason)
        }
    }
}

/// The complete structured outcome of one hand.
#[derive(Debug, Clone, Serialize)]
pub struct GameResult {
    pub pots: Vec<PotResult>,
    pub hands: BTreeMap<PlayerId, Vec<HandResult>>,
    pub winning_hands: Vec<HandResult>,
    pub is_complete: bool,
}

impl GameResult {
    pub fn total_pot(&self) -> Chips {
        self.pots.iter().map(|p| p.amount).sum()
    }
    /// unique winners across every pot
    pub fn winners(&self) -> Vec<PlayerId> {
        let mut winners = Vec::new();
        for pot in self.pots.iter() {
            for winner in pot.winners.iter() {
                if !winners.contains(winner) {
                    winners.push(winner.clone());
                }
            }
        }
        winners
    }
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).expect("results serialize")
    }
}

impl Display for GameResult {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        writeln!(f, "Game Result (Complete: {})", self.is_complete)?;
        writeln!(f, "Total pot: ${}", self.total_pot())?;
        for pot in self.pots.iter() {
            writeln!(f, "- {}", pot)?;
        }
        for hand in self.winning_hands.iter() {
            writeln!(f, "  winner: {}", hand)?;
        }
        Ok(())
    }
}

use crate::Chips;
use crate::PlayerId;
use crate::cards::card::Card;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter, Result as FmtResult};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn results_serialize_to_json() {
        let result = GameResult {
            pots: vec![PotResult {
                amount: 60,
                winners: vec!["bob".to_string()],
                split: false,
                pot_type: "main".to_string(),
                hand_type: "Hand".to_string(),
                side_pot_index: None,
                eligible_players: vec!["alice".to_string(), "bob".to_string()],
                reason: None,
                best_hands: Vec::new(),
                declarations: BTreeMap::new(),
            }],
            hands: BTreeMap::new(),
            winning_hands: Vec::new(),
            is_complete: true,
        };
        let json = result.to_json();
        assert!(json.contains("\"amount\": 60"));
        assert!(json.contains("\"winners\""));
        assert_eq!(result.total_pot(), 60);
        assert_eq!(result.winners(), vec!["bob".to_string()]);
    }
}
