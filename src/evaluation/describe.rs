//! Human-readable hand descriptions: a short name ("Full House") and a
//! detailed line ("Full House, Aces over Kings"), derived from the ranking
//! under the type's own rank ordering.

pub fn describe(kind: EvalKind, ranking: &HandRanking) -> (String, String) {
    let (name, detailed) = match kind.engine() {
        Engine::Pip => describe_pip(kind, ranking),
        Engine::Badugi => describe_badugi(ranking),
        Engine::SpadeOnly => describe_spade(ranking),
        Engine::Table => describe_table(kind, ranking),
    };
    match loaded_override(kind, ranking.rank) {
        Some(label) => (label, detailed),
        None => (name, detailed),
    }
}

static DESCRIPTION_DIR: OnceLock<PathBuf> = OnceLock::new();
static OVERRIDES: OnceLock<Mutex<HashMap<EvalKind, Arc<HashMap<u32, String>>>>> = OnceLock::new();

/// Point the describer at a directory of `<evaluation_type>.csv` files
/// (`Rank,HandDescription` rows). Files are read lazily, once per
/// evaluation type; computed descriptions remain the fallback.
pub fn set_description_dir(path: impl Into<PathBuf>) {
    let path = path.into();
    if DESCRIPTION_DIR.set(path.clone()).is_err() {
        log::warn!("description directory already set, ignoring {}", path.display());
    }
}

fn loaded_override(kind: EvalKind, rank: u32) -> Option<String> {
    let dir = DESCRIPTION_DIR.get()?;
    let cache = OVERRIDES.get_or_init(|| Mutex::new(HashMap::new()));
    let mut cache = cache.lock().ok()?;
    let table = cache
        .entry(kind)
        .or_insert_with(|| match read_description_csv(dir, kind) {
            Ok(table) => Arc::new(table),
            Err(error) => {
                log::warn!("no description table for {}: {:#}", kind, error);
                Arc::new(HashMap::new())
            }
        })
        .clone();
    table.get(&rank).cloned()
}

fn read_description_csv(dir: &Path, kind: EvalKind) -> anyhow::Result<HashMap<u32, String>> {
    let path = dir.join(format!("{}.csv", kind));
    let text = std::fs::read_to_string(&path)
        .with_context(|| format!("reading {}", path.display()))?;
    let mut table = HashMap::new();
    for line in text.lines().skip(1).filter(|l| !l.trim().is_empty()) {
        let (rank, description) = line
            .split_once(',')
            .with_context(|| format!("malformed row in {}: {}", path.display(), line))?;
        let rank: u32 = rank.trim().parse().context("rank column")?;
        table.insert(rank, description.trim().to_string());
    }
    Ok(table)
}

fn describe_table(kind: EvalKind, ranking: &HandRanking) -> (String, String) {
    let Some(table) = tables::table(kind) else {
        return fallback(ranking);
    };
    let Some((class, key, _, _)) = table.entry(ranking.rank, ranking.ordered_rank) else {
        return fallback(ranking);
    };
    let family = &table.family;
    let rank = |i: u8| family.order[i as usize];
    let name = class.name().to_string();
    let detailed = match class {
        HandClass::FiveOfAKind => format!("Five {}", rank(key[0]).plural_name()),
        HandClass::FourOfAKind => format!("Four {}", rank(key[0]).plural_name()),
        HandClass::ThreeOfAKind => format!("Three {}", rank(key[0]).plural_name()),
        HandClass::FullHouse => format!(
            "Full House, {} over {}",
            rank(key[0]).plural_name(),
            rank(key[1]).plural_name()
        ),
        HandClass::TwoPair => format!(
            "Two Pair, {} and {}",
            rank(key[0]).plural_name(),
            rank(key[1]).plural_name()
        ),
        HandClass::OnePair => format!("Pair of {}", rank(key[0]).plural_name()),
        HandClass::Straight => format!("{}-high Straight", straight_top(family, key).full_name()),
        HandClass::StraightFlush => {
            format!("{}-high Straight Flush", straight_top(family, key).full_name())
        }
        HandClass::Flush => {
            let top = if family.colex {
                key.last().copied().unwrap_or(0)
            } else {
                key[0]
            };
            format!("{}-high Flush", rank(top).full_name())
        }
        HandClass::HighCard => {
            if family.colex {
                let top = key.last().copied().unwrap_or(0);
                return (
                    format!("{} Low", rank(top).full_name()),
                    low_spelling(family, key),
                );
            }
            format!("{} High", rank(key[0]).full_name())
        }
    };
    (name, detailed)
}

fn straight_top(family: &Family, key: &[u8]) -> Rank {
    family.order[key[0] as usize]
}

fn low_spelling(family: &Family, key: &[u8]) -> String {
    let mut ranks = key
        .iter()
        .map(|&i| family.order[i as usize].to_string())
        .collect::<Vec<String>>();
    ranks.reverse(); // spell highest card first, the way lows are read
    format!("{} Low", ranks.join("-"))
}

fn describe_badugi(ranking: &HandRanking) -> (String, String) {
    let name = match ranking.rank {
        1 => "Badugi".to_string(),
        2 => "Three-Card Hand".to_string(),
        3 => "Two-Card Hand".to_string(),
        _ => "One-Card Hand".to_string(),
    };
    let mut ranks = ranking
        .cards_used
        .iter()
        .map(|c| c.rank().to_string())
        .collect::<Vec<String>>();
    ranks.reverse();
    (name.clone(), format!("{}: {}", name, ranks.join("-")))
}

fn describe_pip(kind: EvalKind, ranking: &HandRanking) -> (String, String) {
    let faces = match kind {
        EvalKind::PipZero => 0,
        _ => 10,
    };
    let total = match kind {
        EvalKind::Pip21 => {
            let hard = pip::total(&ranking.cards_used, 10);
            let aces = ranking
                .cards_used
                .iter()
                .filter(|c| c.rank() == Rank::Ace)
                .count() as u32;
            let mut best = hard;
            for _ in 0..aces {
                if best + 10 <= 21 {
                    best += 10;
                }
            }
            best
        }
        _ => pip::total(&ranking.cards_used, faces),
    };
    let name = total.to_string();
    let detailed = match kind {
        EvalKind::Pip21 if total > 21 => format!("{} (Bust)", total),
        EvalKind::LowPip6 => format!("{} ({} cards)", total, ranking.cards_used.len()),
        _ => name.clone(),
    };
    (name, detailed)
}

fn describe_spade(ranking: &HandRanking) -> (String, String) {
    match ranking.cards_used.first() {
        Some(card) => (
            "High Spade".to_string(),
            format!("{} of Spades", card.rank().full_name()),
        ),
        None => fallback(ranking),
    }
}

fn fallback(ranking: &HandRanking) -> (String, String) {
    (
        format!("Rank {}", ranking.rank),
        format!("Rank {} ({})", ranking.rank, ranking.ordered_rank),
    )
}

use super::classes::{Family, HandClass};
use super::kind::{Engine, EvalKind};
use super::pip;
use super::ranking::HandRanking;
use super::tables;
use crate::cards::rank::Rank;
use anyhow::Context;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock};

#[cfg(test)]
mod tests {
    use super::super::evaluator::evaluate;
    use super::*;
    use crate::cards::card::Card;

    fn cards(s: &[&str]) -> Vec<Card> {
        s.iter().map(|c| Card::try_from(*c).unwrap()).collect()
    }

    #[test]
    fn four_queens_reads_naturally() {
        let ranking = evaluate(&cards(&["Qs", "Qh", "Qd", "Qc", "2s"]), EvalKind::High).unwrap();
        let (name, detailed) = describe(EvalKind::High, &ranking);
        assert_eq!(name, "Four of a Kind");
        assert_eq!(detailed, "Four Queens");
    }

    #[test]
    fn full_house_names_both_ranks() {
        let ranking = evaluate(&cards(&["As", "Ah", "Ad", "Kc", "Ks"]), EvalKind::High).unwrap();
        let (name, detailed) = describe(EvalKind::High, &ranking);
        assert_eq!(name, "Full House");
        assert_eq!(detailed, "Full House, Aces over Kings");
    }

    #[test]
    fn wheel_reads_as_five_low() {
        let ranking = evaluate(&cards(&["As", "2h", "3d", "4c", "5s"]), EvalKind::A5Low).unwrap();
        let (name, detailed) = describe(EvalKind::A5Low, &ranking);
        assert_eq!(name, "Five Low");
        assert_eq!(detailed, "5-4-3-2-A Low");
    }

    #[test]
    fn straights_name_their_top_card() {
        let wheel = evaluate(&cards(&["As", "2h", "3d", "4c", "5h"]), EvalKind::High).unwrap();
        let (_, detailed) = describe(EvalKind::High, &wheel);
        assert_eq!(detailed, "Five-high Straight");
        let broadway = evaluate(&cards(&["As", "Kh", "Qd", "Jc", "Th"]), EvalKind::High).unwrap();
        let (_, detailed) = describe(EvalKind::High, &broadway);
        assert_eq!(detailed, "Ace-high Straight");
    }

    #[test]
    fn pip_hands_describe_their_total() {
        let ranking = evaluate(&cards(&["As", "Kh"]), EvalKind::Pip21).unwrap();
        let (name, _) = describe(EvalKind::Pip21, &ranking);
        assert_eq!(name, "21");
    }
}
