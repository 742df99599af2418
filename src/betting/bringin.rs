//! Bring-in selection for stud variants.
//!
//! Round one looks at the single door card and picks the worst of them
//! under the rule's one-card ordering; later rounds pick the best visible
//! hand under a size-dependent evaluation. Ties break toward earlier
//! position order.

/// Door-card rule names as variant descriptions spell them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardRule {
    LowCard,    // classic seven-card stud: lowest card, ace high
    LowCardAl,  // ace-low variant
    LowCardAlRh, // razz-high: ace-low bring-in, a5-high rounds after
    HighCard,   // razz: highest card, ace low
    HighCardAh, // 2-7 games: highest card, ace high
}

impl TryFrom<&str> for CardRule {
    type Error = String;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s {
            "low card" => Ok(CardRule::LowCard),
            "low card al" => Ok(CardRule::LowCardAl),
            "low card al rh" => Ok(CardRule::LowCardAlRh),
            "high card" => Ok(CardRule::HighCard),
            "high card ah" => Ok(CardRule::HighCardAh),
            other => Err(format!("unknown card rule: {}", other)),
        }
    }
}

impl std::fmt::Display for CardRule {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let name = match self {
            CardRule::LowCard => "low card",
            CardRule::LowCardAl => "low card al",
            CardRule::LowCardAlRh => "low card al rh",
            CardRule::HighCard => "high card",
            CardRule::HighCardAh => "high card ah",
        };
        write!(f, "{}", name)
    }
}

/// the evaluation that orders visible hands, by how many cards show
pub fn eval_for(visible: usize, rule: CardRule) -> EvalKind {
    match (visible.clamp(1, 5), rule) {
        (1, CardRule::LowCard) => EvalKind::OneCardLow,
        (1, CardRule::LowCardAl) => EvalKind::OneCardLowAl,
        (1, CardRule::LowCardAlRh) => EvalKind::OneCardLowAl,
        (1, CardRule::HighCard) => EvalKind::OneCardHigh,
        (1, CardRule::HighCardAh) => EvalKind::OneCardHighAh,
        (2, CardRule::LowCard) => EvalKind::TwoCardHigh,
        (2, CardRule::LowCardAl) => EvalKind::TwoCardHighAl,
        (2, CardRule::LowCardAlRh) => EvalKind::TwoCardHighAlRh,
        (2, CardRule::HighCard) => EvalKind::TwoCardLow,
        (2, CardRule::HighCardAh) => EvalKind::TwoCardLowAh,
        (3, CardRule::LowCard) => EvalKind::ThreeCardHigh,
        (3, CardRule::LowCardAl) => EvalKind::ThreeCardHighAl,
        (3, CardRule::LowCardAlRh) => EvalKind::ThreeCardHighAlRh,
        (3, CardRule::HighCard) => EvalKind::ThreeCardLow,
        (3, CardRule::HighCardAh) => EvalKind::ThreeCardLowAh,
        (4, CardRule::LowCard) => EvalKind::FourCardHigh,
        (4, CardRule::LowCardAl) => EvalKind::FourCardHighAl,
        (4, CardRule::LowCardAlRh) => EvalKind::FourCardHighAlRh,
        (4, CardRule::HighCard) => EvalKind::FourCardLow,
        (4, CardRule::HighCardAh) => EvalKind::FourCardLowAh,
        (_, CardRule::LowCard) => EvalKind::High,
        (_, CardRule::LowCardAl) => EvalKind::A5Low,
        (_, CardRule::LowCardAlRh) => EvalKind::A5LowHigh,
        (_, CardRule::HighCard) => EvalKind::A5Low,
        (_, CardRule::HighCardAh) => EvalKind::Low27,
    }
}

/// pick the first actor among (player, visible cards) in position order;
/// `round` is 1-based
pub fn first_to_act(
    players: &[(PlayerId, Vec<Card>)],
    round: usize,
    rule: CardRule,
) -> Option<PlayerId> {
    let showing = players
        .iter()
        .filter(|(_, cards)| !cards.is_empty())
        .collect::<Vec<_>>();
    let Some(first) = showing.first() else {
        return players.first().map(|(id, _)| id.clone());
    };

    let mut best: Option<(HandRanking, PlayerId)> = None;
    if round <= 1 {
        let kind = eval_for(1, rule);
        for (id, cards) in showing.iter() {
            let door = &cards[..1];
            let Ok(score) = evaluate(door, kind) else {
                continue;
            };
            if best.as_ref().map(|(b, _)| score < *b).unwrap_or(true) {
                best = Some((score, id.clone()));
            }
        }
    } else {
        let kind = eval_for(first.1.len(), rule);
        for (id, cards) in showing.iter() {
            let Ok(score) = evaluate(cards, kind) else {
                continue;
            };
            if best.as_ref().map(|(b, _)| score < *b).unwrap_or(true) {
                best = Some((score, id.clone()));
            }
        }
    }
    best.map(|(_, id)| id)
        .or_else(|| players.first().map(|(id, _)| id.clone()))
}

use crate::PlayerId;
use crate::cards::card::Card;
use crate::evaluation::evaluator::evaluate;
use crate::evaluation::kind::EvalKind;
use crate::evaluation::ranking::HandRanking;

#[cfg(test)]
mod tests {
    use super::*;

    fn seat(id: &str, cards: &[&str]) -> (PlayerId, Vec<Card>) {
        (
            id.to_string(),
            cards.iter().map(|c| Card::try_from(*c).unwrap()).collect(),
        )
    }

    #[test]
    fn stud_bring_in_is_the_lowest_door_card() {
        let players = vec![
            seat("alice", &["2c"]),
            seat("bob", &["Ks"]),
            seat("charlie", &["Ad"]),
        ];
        assert_eq!(
            first_to_act(&players, 1, CardRule::LowCard),
            Some("alice".to_string())
        );
    }

    #[test]
    fn razz_bring_in_is_the_king_not_the_ace() {
        let players = vec![
            seat("alice", &["2c"]),
            seat("bob", &["Ks"]),
            seat("charlie", &["Ad"]),
        ];
        assert_eq!(
            first_to_act(&players, 1, CardRule::HighCard),
            Some("bob".to_string())
        );
    }

    #[test]
    fn later_rounds_pick_the_best_showing_hand() {
        let players = vec![
            seat("alice", &["2c", "2h"]),
            seat("bob", &["As", "2d"]),
            seat("charlie", &["8d", "7c"]),
            seat("david", &["Kh", "Qs"]),
        ];
        // stud high: the open pair leads
        assert_eq!(
            first_to_act(&players, 2, CardRule::LowCard),
            Some("alice".to_string())
        );
        // razz: A-2 is the best low board
        assert_eq!(
            first_to_act(&players, 2, CardRule::HighCard),
            Some("bob".to_string())
        );
    }

    #[test]
    fn position_breaks_exact_ties() {
        let players = vec![seat("early", &["5c"]), seat("late", &["5d"])];
        assert_eq!(
            first_to_act(&players, 1, CardRule::LowCard),
            Some("early".to_string())
        );
    }

    #[test]
    fn no_visible_cards_falls_back_to_first_player() {
        let players = vec![seat("alice", &[]), seat("bob", &[])];
        assert_eq!(
            first_to_act(&players, 1, CardRule::LowCard),
            Some("alice".to_string())
        );
    }
}
