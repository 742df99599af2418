//! Lazily built ranking tables, one per evaluation family.
//!
//! A table enumerates every tie-break key of every category in best-first
//! order, assigning `(rank, ordered_rank)` pairs. Tables are process-wide
//! immutable caches built on first use and shared across game instances.

pub(crate) const ORDER_HIGH: &[Rank] = &[
    Rank::Ace,
    Rank::King,
    Rank::Queen,
    Rank::Jack,
    Rank::Ten,
    Rank::Nine,
    Rank::Eight,
    Rank::Seven,
    Rank::Six,
    Rank::Five,
    Rank::Four,
    Rank::Three,
    Rank::Two,
];
pub(crate) const ORDER_A5: &[Rank] = &[
    Rank::Ace,
    Rank::Two,
    Rank::Three,
    Rank::Four,
    Rank::Five,
    Rank::Six,
    Rank::Seven,
    Rank::Eight,
    Rank::Nine,
    Rank::Ten,
    Rank::Jack,
    Rank::Queen,
    Rank::King,
];
pub(crate) const ORDER_27: &[Rank] = &[
    Rank::Two,
    Rank::Three,
    Rank::Four,
    Rank::Five,
    Rank::Six,
    Rank::Seven,
    Rank::Eight,
    Rank::Nine,
    Rank::Ten,
    Rank::Jack,
    Rank::Queen,
    Rank::King,
    Rank::Ace,
];
// a5-low read backwards: the "highest hand by a5 ranking" families
const ORDER_A5_INV: &[Rank] = &[
    Rank::King,
    Rank::Queen,
    Rank::Jack,
    Rank::Ten,
    Rank::Nine,
    Rank::Eight,
    Rank::Seven,
    Rank::Six,
    Rank::Five,
    Rank::Four,
    Rank::Three,
    Rank::Two,
    Rank::Ace,
];
const ORDER_36: &[Rank] = &[
    Rank::Ace,
    Rank::King,
    Rank::Queen,
    Rank::Jack,
    Rank::Ten,
    Rank::Nine,
    Rank::Eight,
    Rank::Seven,
    Rank::Six,
];
const ORDER_20: &[Rank] = &[Rank::Ace, Rank::King, Rank::Queen, Rank::Jack, Rank::Ten];
const ORDER_40: &[Rank] = &[
    Rank::Ace,
    Rank::King,
    Rank::Queen,
    Rank::Jack,
    Rank::Seven,
    Rank::Six,
    Rank::Five,
    Rank::Four,
    Rank::Three,
    Rank::Two,
];

const CLASSES_HIGH: &[(u32, HandClass)] = &[
    (2, HandClass::StraightFlush),
    (3, HandClass::FourOfAKind),
    (4, HandClass::FullHouse),
    (5, HandClass::Flush),
    (6, HandClass::Straight),
    (7, HandClass::ThreeOfAKind),
    (8, HandClass::TwoPair),
    (9, HandClass::OnePair),
    (10, HandClass::HighCard),
];
const CLASSES_HIGH_WILD: &[(u32, HandClass)] = &[
    (1, HandClass::FiveOfAKind),
    (2, HandClass::StraightFlush),
    (3, HandClass::FourOfAKind),
    (4, HandClass::FullHouse),
    (5, HandClass::Flush),
    (6, HandClass::Straight),
    (7, HandClass::ThreeOfAKind),
    (8, HandClass::TwoPair),
    (9, HandClass::OnePair),
    (10, HandClass::HighCard),
];
// short decks promote flushes over full houses
const CLASSES_FFH: &[(u32, HandClass)] = &[
    (2, HandClass::StraightFlush),
    (3, HandClass::FourOfAKind),
    (4, HandClass::Flush),
    (5, HandClass::FullHouse),
    (6, HandClass::Straight),
    (7, HandClass::ThreeOfAKind),
    (8, HandClass::TwoPair),
    (9, HandClass::OnePair),
    (10, HandClass::HighCard),
];
const CLASSES_FFH_WILD: &[(u32, HandClass)] = &[
    (1, HandClass::FiveOfAKind),
    (2, HandClass::StraightFlush),
    (3, HandClass::FourOfAKind),
    (4, HandClass::Flush),
    (5, HandClass::FullHouse),
    (6, HandClass::Straight),
    (7, HandClass::ThreeOfAKind),
    (8, HandClass::TwoPair),
    (9, HandClass::OnePair),
    (10, HandClass::HighCard),
];
const CLASSES_A5: &[(u32, HandClass)] = &[
    (1, HandClass::HighCard),
    (2, HandClass::OnePair),
    (3, HandClass::TwoPair),
    (4, HandClass::ThreeOfAKind),
    (5, HandClass::FullHouse),
    (6, HandClass::FourOfAKind),
];
const CLASSES_27: &[(u32, HandClass)] = &[
    (1, HandClass::HighCard),
    (2, HandClass::OnePair),
    (3, HandClass::TwoPair),
    (4, HandClass::ThreeOfAKind),
    (5, HandClass::Straight),
    (6, HandClass::Flush),
    (7, HandClass::FullHouse),
    (8, HandClass::FourOfAKind),
    (9, HandClass::StraightFlush),
];
const CLASSES_ONE: &[(u32, HandClass)] = &[(1, HandClass::HighCard)];
const CLASSES_TWO_HIGH: &[(u32, HandClass)] =
    &[(1, HandClass::OnePair), (2, HandClass::HighCard)];
const CLASSES_TWO_LOW: &[(u32, HandClass)] =
    &[(1, HandClass::HighCard), (2, HandClass::OnePair)];
const CLASSES_THREE_HIGH: &[(u32, HandClass)] = &[
    (1, HandClass::ThreeOfAKind),
    (2, HandClass::OnePair),
    (3, HandClass::HighCard),
];
const CLASSES_THREE_LOW: &[(u32, HandClass)] = &[
    (1, HandClass::HighCard),
    (2, HandClass::OnePair),
    (3, HandClass::ThreeOfAKind),
];
const CLASSES_FOUR_HIGH: &[(u32, HandClass)] = &[
    (1, HandClass::FourOfAKind),
    (2, HandClass::ThreeOfAKind),
    (3, HandClass::TwoPair),
    (4, HandClass::OnePair),
    (5, HandClass::HighCard),
];
const CLASSES_FOUR_LOW: &[(u32, HandClass)] = &[
    (1, HandClass::HighCard),
    (2, HandClass::OnePair),
    (3, HandClass::TwoPair),
    (4, HandClass::ThreeOfAKind),
    (5, HandClass::FourOfAKind),
];

/// collapse alias kinds that share a table
pub(crate) fn canonical(kind: EvalKind) -> EvalKind {
    match kind {
        EvalKind::A5LowHigh => EvalKind::A5Low,
        EvalKind::HighWildBug => EvalKind::HighWild,
        EvalKind::TwoCardHighAlRh => EvalKind::TwoCardHighAl,
        EvalKind::ThreeCardHighAlRh => EvalKind::ThreeCardHighAl,
        EvalKind::FourCardHighAlRh => EvalKind::FourCardHighAl,
        kind => kind,
    }
}

pub(crate) fn family(kind: EvalKind) -> Option<Family> {
    let (order, classes, size, wheel, colex) = match canonical(kind) {
        EvalKind::High => (ORDER_HIGH, CLASSES_HIGH, 5, true, false),
        EvalKind::HighWild => (ORDER_HIGH, CLASSES_HIGH_WILD, 5, true, false),
        EvalKind::High36 => (ORDER_36, CLASSES_FFH, 5, true, false),
        EvalKind::High20 => (ORDER_20, CLASSES_HIGH, 5, false, false),
        EvalKind::High40Bug => (ORDER_40, CLASSES_FFH_WILD, 5, true, false),
        EvalKind::A5Low => (ORDER_A5, CLASSES_A5, 5, false, true),
        EvalKind::Low27 => (ORDER_27, CLASSES_27, 5, false, true),
        EvalKind::OneCardLow => (ORDER_27, CLASSES_ONE, 1, false, false),
        EvalKind::OneCardLowAl => (ORDER_A5, CLASSES_ONE, 1, false, false),
        EvalKind::OneCardHigh => (ORDER_A5_INV, CLASSES_ONE, 1, false, false),
        EvalKind::OneCardHighAh => (ORDER_HIGH, CLASSES_ONE, 1, false, false),
        EvalKind::TwoCardHigh => (ORDER_HIGH, CLASSES_TWO_HIGH, 2, false, false),
        EvalKind::TwoCardHighAl => (ORDER_A5_INV, CLASSES_TWO_HIGH, 2, false, false),
        EvalKind::TwoCardLow => (ORDER_A5, CLASSES_TWO_LOW, 2, false, true),
        EvalKind::TwoCardLowAh => (ORDER_27, CLASSES_TWO_LOW, 2, false, true),
        EvalKind::ThreeCardHigh => (ORDER_HIGH, CLASSES_THREE_HIGH, 3, false, false),
        EvalKind::ThreeCardHighAl => (ORDER_A5_INV, CLASSES_THREE_HIGH, 3, false, false),
        EvalKind::ThreeCardLow => (ORDER_A5, CLASSES_THREE_LOW, 3, false, true),
        EvalKind::ThreeCardLowAh => (ORDER_27, CLASSES_THREE_LOW, 3, false, true),
        EvalKind::FourCardHigh => (ORDER_HIGH, CLASSES_FOUR_HIGH, 4, false, false),
        EvalKind::FourCardHighAl => (ORDER_A5_INV, CLASSES_FOUR_HIGH, 4, false, false),
        EvalKind::FourCardLow => (ORDER_A5, CLASSES_FOUR_LOW, 4, false, true),
        EvalKind::FourCardLowAh => (ORDER_27, CLASSES_FOUR_LOW, 4, false, true),
        _ => return None,
    };
    Some(Family {
        order,
        classes,
        size,
        wheel,
        colex,
    })
}

/// A family's complete best-first ranking, plus lookup maps.
pub(crate) struct RankTable {
    pub family: Family,
    pub entries: Vec<(HandClass, Vec<u8>, u32, u32)>,
    index: HashMap<ClassKey, (u32, u32)>,
    by_strength: HashMap<(u32, u32), usize>,
}

impl RankTable {
    pub fn lookup(&self, key: &ClassKey) -> Option<(u32, u32)> {
        self.index.get(key).copied()
    }
    pub fn entry(&self, rank: u32, ordered_rank: u32) -> Option<&(HandClass, Vec<u8>, u32, u32)> {
        self.by_strength
            .get(&(rank, ordered_rank))
            .map(|&i| &self.entries[i])
    }
}

/// ascending k-subsets of 0..n, best-first: lexicographic for high-direction
/// families, colex (highest card decides first) for low-direction ones
pub(crate) fn combos(n: u8, k: usize, colex: bool) -> Vec<Vec<u8>> {
    let mut out = Vec::new();
    let mut current = Vec::with_capacity(k);
    fn recurse(n: u8, k: usize, start: u8, current: &mut Vec<u8>, out: &mut Vec<Vec<u8>>) {
        if current.len() == k {
            out.push(current.clone());
            return;
        }
        for i in start..n {
            current.push(i);
            recurse(n, k, i + 1, current, out);
            current.pop();
        }
    }
    recurse(n, k, 0, &mut current, &mut out);
    if colex {
        out.sort_by(|a, b| a.iter().rev().cmp(b.iter().rev()));
    }
    out
}

fn combos_excluding(n: u8, k: usize, colex: bool, taken: &[u8]) -> Vec<Vec<u8>> {
    combos(n, k, colex)
        .into_iter()
        .filter(|combo| combo.iter().all(|i| !taken.contains(i)))
        .collect()
}

fn build(family: Family) -> RankTable {
    let n = family.order.len() as u8;
    let size = family.size;
    let colex = family.colex;
    let straights = family.straight_keys();
    let mut entries = Vec::new();
    for &(rank, class) in family.classes.iter() {
        let keys: Vec<Vec<u8>> = match class {
            HandClass::FiveOfAKind => (0..n).map(|r| vec![r]).collect(),
            HandClass::StraightFlush | HandClass::Straight => {
                let mut runs = (0..=(n as usize - 5))
                    .map(|i| vec![i as u8])
                    .collect::<Vec<Vec<u8>>>();
                if family.wheel && n as usize > 5 {
                    runs.push(vec![n - 4]);
                }
                runs
            }
            HandClass::FourOfAKind => (0..n)
                .flat_map(|r| {
                    combos_excluding(n, size.saturating_sub(4), colex, &[r])
                        .into_iter()
                        .map(move |kickers| {
                            let mut key = vec![r];
                            key.extend(kickers);
                            key
                        })
                })
                .collect(),
            HandClass::FullHouse => (0..n)
                .flat_map(|r| {
                    (0..n)
                        .filter(move |&p| p != r)
                        .map(move |p| vec![r, p])
                })
                .collect(),
            HandClass::Flush => combos(n, size, colex)
                .into_iter()
                .filter(|combo| !straights.contains(combo))
                .collect(),
            HandClass::ThreeOfAKind => (0..n)
                .flat_map(|r| {
                    combos_excluding(n, size - 3, colex, &[r])
                        .into_iter()
                        .map(move |kickers| {
                            let mut key = vec![r];
                            key.extend(kickers);
                            key
                        })
                })
                .collect(),
            HandClass::TwoPair => {
                let mut keys = Vec::new();
                for p1 in 0..n {
                    for p2 in (p1 + 1)..n {
                        for kickers in combos_excluding(n, size - 4, colex, &[p1, p2]) {
                            let mut key = vec![p1, p2];
                            key.extend(kickers);
                            keys.push(key);
                        }
                    }
                }
                keys
            }
            HandClass::OnePair => (0..n)
                .flat_map(|r| {
                    combos_excluding(n, size - 2, colex, &[r])
                        .into_iter()
                        .map(move |kickers| {
                            let mut key = vec![r];
                            key.extend(kickers);
                            key
                        })
                })
                .collect(),
            HandClass::HighCard => {
                let exclude_straights = family.has(HandClass::Straight);
                combos(n, size, colex)
                    .into_iter()
                    .filter(|combo| !exclude_straights || !straights.contains(combo))
                    .collect()
            }
        };
        for (ordinal, key) in keys.into_iter().enumerate() {
            entries.push((class, key, rank, ordinal as u32 + 1));
        }
    }

    let index = entries
        .iter()
        .map(|(class, key, rank, ordered)| ((*class, key.clone()), (*rank, *ordered)))
        .collect::<HashMap<ClassKey, (u32, u32)>>();
    let by_strength = entries
        .iter()
        .enumerate()
        .map(|(i, (_, _, rank, ordered))| ((*rank, *ordered), i))
        .collect::<HashMap<(u32, u32), usize>>();
    RankTable {
        family,
        entries,
        index,
        by_strength,
    }
}

static TABLES: OnceLock<Mutex<HashMap<EvalKind, Arc<RankTable>>>> = OnceLock::new();

pub(crate) fn table(kind: EvalKind) -> Option<Arc<RankTable>> {
    let kind = canonical(kind);
    let family = family(kind)?;
    let cache = TABLES.get_or_init(|| Mutex::new(HashMap::new()));
    let mut cache = cache.lock().expect("rank table cache poisoned");
    Some(
        cache
            .entry(kind)
            .or_insert_with(|| {
                log::debug!("building rank table for {}", kind);
                Arc::new(build(family))
            })
            .clone(),
    )
}

use super::classes::{ClassKey, Family, HandClass};
use super::kind::EvalKind;
use crate::cards::rank::Rank;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock};
