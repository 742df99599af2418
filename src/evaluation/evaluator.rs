/// Rank a card selection under an evaluation type.
///
/// Selections larger than the type's hand size are searched for their best
/// sub-hand, so seven-card stud hands evaluate directly. Wild cards are
/// expanded before lookup.
pub fn evaluate(cards: &[Card], kind: EvalKind) -> Result<HandRanking, EvalError> {
    match kind.engine() {
        Engine::Pip => pip::evaluate(cards, kind),
        Engine::Badugi => badugi::evaluate(cards, kind),
        Engine::SpadeOnly => evaluate_spade(cards),
        Engine::Table => evaluate_table(cards, kind),
    }
}

/// total order within one evaluation type; Less means the first hand wins
pub fn compare(a: &[Card], b: &[Card], kind: EvalKind) -> Result<Ordering, EvalError> {
    Ok(evaluate(a, kind)?.cmp(&evaluate(b, kind)?))
}

fn evaluate_table(cards: &[Card], kind: EvalKind) -> Result<HandRanking, EvalError> {
    let table = tables::table(kind).expect("table-driven kinds have a family");
    let size = table.family.size;
    if cards.len() < size {
        return Err(EvalError::WrongCardCount {
            expected: size,
            got: cards.len(),
        });
    }
    if cards.len() == size {
        return evaluate_exact(cards, &table);
    }
    choose(cards, size)
        .into_iter()
        .filter_map(|selection| evaluate_exact(&selection, &table).ok())
        .min()
        .ok_or(EvalError::NoPlayableHand)
}

fn evaluate_exact(cards: &[Card], table: &tables::RankTable) -> Result<HandRanking, EvalError> {
    if cards.iter().any(|c| c.is_wild()) {
        return wilds::evaluate(cards, table);
    }
    let key = classify(cards, &table.family)?;
    let (rank, ordered_rank) = table.lookup(&key).ok_or(EvalError::NoPlayableHand)?;
    Ok(HandRanking::new(
        rank,
        ordered_rank,
        canonical_sort(cards, &table.family),
    ))
}

fn evaluate_spade(cards: &[Card]) -> Result<HandRanking, EvalError> {
    let order = tables::table(EvalKind::OneCardHighAh)
        .expect("one-card family")
        .family
        .clone();
    cards
        .iter()
        .filter(|c| c.suit() == Suit::Spade)
        .filter_map(|c| order.index_of(c.rank()).map(|i| (i, *c)))
        .min_by_key(|&(i, _)| i)
        .map(|(i, card)| HandRanking::new(1, i as u32 + 1, vec![card]))
        .ok_or(EvalError::NoPlayableHand)
}

/// sort a selection into the family's canonical order for display
pub(crate) fn canonical_sort(cards: &[Card], family: &Family) -> Vec<Card> {
    let mut sorted = cards.to_vec();
    sorted.sort_by_key(|c| {
        (
            family.index_of(c.rank()).unwrap_or(u8::MAX),
            c.suit() as u8,
        )
    });
    sorted
}

/// all k-card selections, preserving input order within each
pub fn choose(cards: &[Card], k: usize) -> Vec<Vec<Card>> {
    let mut out = Vec::new();
    let mut current = Vec::with_capacity(k);
    fn recurse(cards: &[Card], k: usize, start: usize, current: &mut Vec<Card>, out: &mut Vec<Vec<Card>>) {
        if current.len() == k {
            out.push(current.clone());
            return;
        }
        for i in start..cards.len() {
            current.push(cards[i]);
            recurse(cards, k, i + 1, current, out);
            current.pop();
        }
    }
    if k <= cards.len() {
        recurse(cards, k, 0, &mut current, &mut out);
    }
    out
}

use super::badugi;
use super::classes::{Family, classify};
use super::kind::{Engine, EvalKind};
use super::pip;
use super::ranking::{EvalError, HandRanking};
use super::tables;
use super::wilds;
use crate::cards::card::Card;
use crate::cards::suit::Suit;
use std::cmp::Ordering;
