//! Wild-card expansion.
//!
//! Before table lookup every wild card is replaced by a concrete candidate
//! and the best resulting ranking wins. Fully wild cards (natural jokers,
//! named and matching wilds) may become anything. A bug may stand in as an
//! Ace unconditionally, but only completes a straight, flush, or straight
//! flush otherwise.

pub(crate) fn evaluate(cards: &[Card], table: &RankTable) -> Result<HandRanking, EvalError> {
    let wilds = cards
        .iter()
        .enumerate()
        .filter(|(_, c)| c.is_wild())
        .map(|(i, c)| (i, c.wild_kind().expect("wild card has a kind")))
        .collect::<Vec<(usize, WildKind)>>();
    let mut concrete = cards.to_vec();
    let mut best: Option<(u32, u32)> = None;
    substitute(&wilds, 0, &mut concrete, table, &mut best);
    let (rank, ordered_rank) = best.ok_or(EvalError::NoPlayableHand)?;
    Ok(HandRanking::new(
        rank,
        ordered_rank,
        evaluator::canonical_sort(cards, &table.family),
    ))
}

fn substitute(
    wilds: &[(usize, WildKind)],
    depth: usize,
    concrete: &mut Vec<Card>,
    table: &RankTable,
    best: &mut Option<(u32, u32)>,
) {
    if depth == wilds.len() {
        let Ok(key) = classify(concrete, &table.family) else {
            return;
        };
        if !admissible(wilds, concrete, key.0) {
            return;
        }
        if let Some(strength) = table.lookup(&key) {
            if best.map(|b| strength < b).unwrap_or(true) {
                *best = Some(strength);
            }
        }
        return;
    }
    let (position, _) = wilds[depth];
    let original = concrete[position];
    for &rank in table.family.order.iter() {
        for &suit in Suit::all() {
            let mut candidate = Card::new(rank, suit);
            candidate.turn(original.visibility());
            concrete[position] = candidate;
            substitute(wilds, depth + 1, concrete, table, best);
        }
    }
    concrete[position] = original;
}

/// a bug that landed on a non-ace only plays in straight- or flush-shaped hands
fn admissible(wilds: &[(usize, WildKind)], concrete: &[Card], class: HandClass) -> bool {
    let strainy = matches!(
        class,
        HandClass::Straight | HandClass::Flush | HandClass::StraightFlush
    );
    wilds.iter().all(|&(position, kind)| {
        kind != WildKind::Bug || concrete[position].rank() == Rank::Ace || strainy
    })
}

use super::classes::{HandClass, classify};
use super::evaluator;
use super::ranking::{EvalError, HandRanking};
use super::tables::RankTable;
use crate::cards::card::{Card, WildKind};
use crate::cards::rank::Rank;
use crate::cards::suit::Suit;

#[cfg(test)]
mod tests {
    use super::super::evaluator::evaluate;
    use super::super::kind::EvalKind;
    use crate::cards::card::Card;

    fn cards(s: &[&str]) -> Vec<Card> {
        s.iter().map(|c| Card::try_from(*c).unwrap()).collect()
    }

    #[test]
    fn joker_makes_five_of_a_kind() {
        let mut hand = cards(&["As", "Ah", "Ad", "Ac"]);
        hand.push(Card::joker());
        let ranking = evaluate(&hand, EvalKind::HighWild).unwrap();
        assert_eq!(ranking.strength(), (1, 1)); // five aces
    }

    #[test]
    fn named_wild_completes_best_hand() {
        // deuces wild: 2s fills the broadway straight flush
        let mut hand = cards(&["As", "Ks", "Qs", "Js", "2s"]);
        hand.last_mut()
            .unwrap()
            .make_wild(crate::cards::card::WildKind::Named);
        let ranking = evaluate(&hand, EvalKind::HighWild).unwrap();
        assert_eq!(ranking.strength(), (2, 1)); // royal
    }

    #[test]
    fn bug_plays_as_ace_outside_straights() {
        let mut hand = cards(&["Ks", "Kh", "Qd", "7c"]);
        let mut bug = Card::joker();
        bug.make_wild(crate::cards::card::WildKind::Bug);
        hand.push(bug);
        let with_bug = evaluate(&hand, EvalKind::HighWild).unwrap();
        let as_ace = evaluate(&cards(&["Ks", "Kh", "Qd", "7c", "Ad"]), EvalKind::HighWild).unwrap();
        assert_eq!(with_bug, as_ace); // pair of kings, ace kicker: not trips
    }

    #[test]
    fn bug_still_completes_flushes() {
        let mut hand = cards(&["Ks", "Qs", "9s", "7s"]);
        let mut bug = Card::joker();
        bug.make_wild(crate::cards::card::WildKind::Bug);
        hand.push(bug);
        let ranking = evaluate(&hand, EvalKind::HighWild).unwrap();
        let plain = evaluate(&cards(&["As", "Ks", "Qs", "9s", "7s"]), EvalKind::HighWild).unwrap();
        assert_eq!(ranking, plain); // ace-high flush
    }

    #[test]
    fn extra_wild_never_hurts() {
        let base = cards(&["Qs", "Qh", "Qd", "8c", "3s"]);
        let plain = evaluate(&base, EvalKind::HighWild).unwrap();
        let mut wilded = base.clone();
        wilded[4].make_wild(crate::cards::card::WildKind::Named);
        let improved = evaluate(&wilded, EvalKind::HighWild).unwrap();
        assert!(improved <= plain);
    }
}
