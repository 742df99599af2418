//! Cross-size comparison.
//!
//! When hands of different card counts meet in one pot (a two-card hand
//! against a five-card hand), the smaller evaluation's `(rank, ordered_rank)`
//! is translated into its five-card family by aligning hand classes: a
//! two-card pair of aces maps to the best five-card ace-pair class. The
//! mapped tuples then compare under the usual smaller-is-better convention.

pub fn widen(kind: EvalKind, ranking: &HandRanking) -> Option<(u32, u32)> {
    let target_kind = kind.wide_target()?;
    if kind == target_kind {
        return Some(ranking.strength());
    }
    let small = tables::table(kind)?;
    let target = tables::table(target_kind)?;
    let (class, key, _, _) = small.entry(ranking.rank, ranking.ordered_rank)?;
    let mapped = key
        .iter()
        .map(|&i| target.family.index_of(small.family.order[i as usize]))
        .collect::<Option<Vec<u8>>>()?;
    target
        .entries
        .iter()
        .find(|(c, k, _, _)| {
            c == class
                && match class {
                    HandClass::HighCard | HandClass::Flush => {
                        mapped.iter().all(|i| k.contains(i))
                    }
                    _ => k.starts_with(&mapped),
                }
        })
        .map(|&(_, _, rank, ordered)| (rank, ordered))
}

/// compare across evaluation types that widen into the same family;
/// -1 / 0 / +1 with negative meaning the first hand is better
pub fn compare_across(
    a: (&HandRanking, EvalKind),
    b: (&HandRanking, EvalKind),
) -> Option<i32> {
    if a.1 == b.1 {
        return Some(order_to_int(a.0.cmp(b.0)));
    }
    let target_a = a.1.wide_target().unwrap_or(a.1);
    let target_b = b.1.wide_target().unwrap_or(b.1);
    if target_a != target_b {
        return None;
    }
    let wide_a = widen_or_self(a.1, a.0)?;
    let wide_b = widen_or_self(b.1, b.0)?;
    Some(order_to_int(wide_a.cmp(&wide_b)))
}

fn widen_or_self(kind: EvalKind, ranking: &HandRanking) -> Option<(u32, u32)> {
    match kind.wide_target() {
        Some(_) => widen(kind, ranking),
        None => Some(ranking.strength()),
    }
}

fn order_to_int(order: Ordering) -> i32 {
    match order {
        Ordering::Less => -1,
        Ordering::Equal => 0,
        Ordering::Greater => 1,
    }
}

use super::classes::HandClass;
use super::kind::EvalKind;
use super::ranking::HandRanking;
use super::tables;
use std::cmp::Ordering;
