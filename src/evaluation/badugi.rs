//! Badugi-family evaluation: the best subset with no rank or suit repeated
//! plays, more cards always beating fewer. `rank` is 5 minus the number of
//! playing cards; `ordered_rank` orders the playing ranks within that size.

pub(crate) fn evaluate(cards: &[Card], kind: EvalKind) -> Result<HandRanking, EvalError> {
    if cards.len() != 4 {
        return Err(EvalError::WrongCardCount {
            expected: 4,
            got: cards.len(),
        });
    }
    let (order, colex) = match kind {
        EvalKind::Badugi => (tables::ORDER_A5, true),
        EvalKind::BadugiAh => (tables::ORDER_27, true),
        EvalKind::Hidugi => (tables::ORDER_HIGH, false),
        _ => unreachable!("non-badugi kind routed to badugi evaluator"),
    };

    let mut best: Option<(Vec<u8>, Vec<Card>)> = None;
    for mask in 1u32..(1 << cards.len()) {
        let subset = cards
            .iter()
            .enumerate()
            .filter(|(i, _)| mask & (1 << i) != 0)
            .map(|(_, c)| *c)
            .collect::<Vec<Card>>();
        if !playable(&subset) {
            continue;
        }
        let mut key = Vec::with_capacity(subset.len());
        for card in subset.iter() {
            match order.iter().position(|&r| r == card.rank()) {
                Some(i) => key.push(i as u8),
                None => return Err(EvalError::ForeignRank(card.rank())),
            }
        }
        key.sort_unstable();
        let better = match best.as_ref() {
            None => true,
            Some((held, _)) => match key.len().cmp(&held.len()) {
                Ordering::Greater => true,
                Ordering::Less => false,
                Ordering::Equal => shorter(&key, held, colex) == Ordering::Less,
            },
        };
        if better {
            best = Some((key, subset));
        }
    }

    let (key, used) = best.ok_or(EvalError::NoPlayableHand)?;
    let rank = 5 - key.len() as u32;
    let ordered_rank = tables::combos(order.len() as u8, key.len(), colex)
        .iter()
        .position(|combo| combo == &key)
        .expect("playing key is a combination") as u32
        + 1;
    Ok(HandRanking::new(rank, ordered_rank, used))
}

/// no rank repeated, no suit repeated
fn playable(subset: &[Card]) -> bool {
    for (i, a) in subset.iter().enumerate() {
        for b in subset.iter().skip(i + 1) {
            if a.rank() == b.rank() || a.suit() == b.suit() {
                return false;
            }
        }
    }
    true
}

fn shorter(a: &[u8], b: &[u8], colex: bool) -> Ordering {
    if colex {
        a.iter().rev().cmp(b.iter().rev())
    } else {
        a.iter().cmp(b.iter())
    }
}

use super::kind::EvalKind;
use super::ranking::{EvalError, HandRanking};
use super::tables;
use crate::cards::card::Card;
use std::cmp::Ordering;
