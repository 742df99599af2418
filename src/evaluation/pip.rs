//! Pip-count evaluation: hands rank by how close their card values land to
//! a target total. Distance maps to the category rank so that lower stays
//! better, and the describer reports the numeric total.

pub(crate) fn evaluate(cards: &[Card], kind: EvalKind) -> Result<HandRanking, EvalError> {
    if cards.is_empty() {
        return Err(EvalError::NoPlayableHand);
    }
    match kind {
        EvalKind::Pip49 => target(cards, 49, 10),
        EvalKind::PipZero => target(cards, 0, 0),
        EvalKind::Pip6 => target(cards, 6, 10),
        EvalKind::Pip21 => twenty_one(cards),
        EvalKind::LowPip6 => low_subset(cards, 6),
        _ => unreachable!("non-pip kind routed to pip evaluator"),
    }
}

pub(crate) fn total(cards: &[Card], faces: u32) -> u32 {
    cards.iter().map(|c| c.rank().pips(faces)).sum()
}

fn target(cards: &[Card], goal: u32, faces: u32) -> Result<HandRanking, EvalError> {
    let total = total(cards, faces);
    let distance = total.abs_diff(goal);
    Ok(HandRanking::new(1 + distance, 1, cards.to_vec()))
}

/// aces count 1 or 11, whichever lands closer to 21 without busting;
/// busted hands rank below every standing total
fn twenty_one(cards: &[Card]) -> Result<HandRanking, EvalError> {
    let hard = total(cards, 10);
    let aces = cards.iter().filter(|c| c.rank() == Rank::Ace).count() as u32;
    let mut best = hard;
    for _ in 0..aces {
        if best + 10 <= 21 {
            best += 10;
        }
    }
    let rank = if best <= 21 { 1 + (21 - best) } else { 100 + best };
    Ok(HandRanking::new(rank, 1, cards.to_vec()))
}

/// lowest total over any non-empty subset of at most `limit` cards
fn low_subset(cards: &[Card], limit: usize) -> Result<HandRanking, EvalError> {
    let mut best: Option<(u32, Vec<Card>)> = None;
    for k in 1..=limit.min(cards.len()) {
        for selection in evaluator::choose(cards, k) {
            let sum = total(&selection, 10);
            if best.as_ref().map(|(b, _)| sum < *b).unwrap_or(true) {
                best = Some((sum, selection));
            }
        }
    }
    let (sum, used) = best.ok_or(EvalError::NoPlayableHand)?;
    Ok(HandRanking::new(sum, 1, used))
}

use super::evaluator;
use super::kind::EvalKind;
use super::ranking::{EvalError, HandRanking};
use crate::cards::card::Card;
use crate::cards::rank::Rank;
