/// A categorical hand shape, shared by every table-driven evaluation family.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub enum HandClass {
    FiveOfAKind,
    StraightFlush,
    FourOfAKind,
    FullHouse,
    Flush,
    Straight,
    ThreeOfAKind,
    TwoPair,
    OnePair,
    HighCard,
}

impl HandClass {
    pub fn name(&self) -> &'static str {
        match self {
            HandClass::FiveOfAKind => "Five of a Kind",
            HandClass::StraightFlush => "Straight Flush",
            HandClass::FourOfAKind => "Four of a Kind",
            HandClass::FullHouse => "Full House",
            HandClass::Flush => "Flush",
            HandClass::Straight => "Straight",
            HandClass::ThreeOfAKind => "Three of a Kind",
            HandClass::TwoPair => "Two Pair",
            HandClass::OnePair => "Pair",
            HandClass::HighCard => "High Card",
        }
    }
}

/// The canonical tie-break key for a classified hand: the class plus rank
/// order indices (0 is the family's strongest rank) arranged class-specifically,
/// e.g. `[quad, kicker]` or `[pair, k1, k2, k3]`. Straights key on the index
/// their run starts at; the wheel keys one past the last run start.
pub type ClassKey = (HandClass, Vec<u8>);

/// One evaluation family: a rank order (best first), a category ladder
/// (best first, with the category ranks the variant format publishes),
/// and a hand size. Enumerating categories in order with tie-break keys in
/// lexicographic order yields the family's complete ranking table.
#[derive(Debug, Clone)]
pub(crate) struct Family {
    pub order: &'static [Rank],
    pub classes: &'static [(u32, HandClass)],
    pub size: usize,
    pub wheel: bool,
    /// low-direction families enumerate free-card sets highest-card-first
    /// (colex), the reversal of the high-hand enumeration
    pub colex: bool,
}

impl Family {
    pub fn has(&self, class: HandClass) -> bool {
        self.classes.iter().any(|&(_, c)| c == class)
    }
    pub fn category(&self, class: HandClass) -> Option<u32> {
        self.classes.iter().find(|&&(_, c)| c == class).map(|&(r, _)| r)
    }
    pub fn index_of(&self, rank: Rank) -> Option<u8> {
        self.order.iter().position(|&r| r == rank).map(|i| i as u8)
    }

    /// ascending index sets that read as straights, best first
    pub fn straight_keys(&self) -> Vec<Vec<u8>> {
        let n = self.order.len();
        if self.size != 5 || n < 5 {
            return Vec::new();
        }
        let mut runs = (0..=(n - 5))
            .map(|i| (i..i + 5).map(|j| j as u8).collect::<Vec<u8>>())
            .collect::<Vec<Vec<u8>>>();
        if self.wheel && n > 5 {
            let mut wheel = vec![0u8];
            wheel.extend(((n - 4)..n).map(|j| j as u8));
            runs.push(wheel);
        }
        runs
    }

    /// the key a straight-shaped ascending index set ranks under
    fn straight_key(&self, sorted: &[u8]) -> Option<Vec<u8>> {
        let n = self.order.len();
        let consecutive = sorted.windows(2).all(|w| w[1] == w[0] + 1);
        if consecutive {
            return Some(vec![sorted[0]]);
        }
        if self.wheel && n > 5 {
            let mut wheel = vec![0u8];
            wheel.extend(((n - 4)..n).map(|j| j as u8));
            if sorted == wheel.as_slice() {
                return Some(vec![(n - 4) as u8]);
            }
        }
        None
    }
}

/// Classify a concrete selection under a family, producing its table key.
pub(crate) fn classify(cards: &[Card], family: &Family) -> Result<ClassKey, EvalError> {
    if cards.len() != family.size {
        return Err(EvalError::WrongCardCount {
            expected: family.size,
            got: cards.len(),
        });
    }
    let mut indices = Vec::with_capacity(cards.len());
    for card in cards {
        match family.index_of(card.rank()) {
            Some(i) => indices.push(i),
            None => return Err(EvalError::ForeignRank(card.rank())),
        }
    }

    // count multiplicities, strongest rank first within equal counts
    let mut counts: Vec<(u8, u8)> = Vec::new();
    for &i in indices.iter() {
        match counts.iter_mut().find(|(j, _)| *j == i) {
            Some((_, n)) => *n += 1,
            None => counts.push((i, 1)),
        }
    }
    counts.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

    let distinct = counts.len() == cards.len();
    let mut sorted = indices.clone();
    sorted.sort_unstable();

    let flush = family.has(HandClass::Flush)
        && family.size == 5
        && cards.windows(2).all(|w| w[0].suit() == w[1].suit());
    let straight = family.has(HandClass::Straight) && distinct;
    let straight = if straight {
        family.straight_key(&sorted)
    } else {
        None
    };

    if let Some(key) = straight {
        if flush {
            return Ok((HandClass::StraightFlush, key));
        }
        return Ok((HandClass::Straight, key));
    }
    if flush {
        return Ok((HandClass::Flush, sorted));
    }

    let shape = counts.iter().map(|&(_, n)| n).collect::<Vec<u8>>();
    let key = counts.iter().map(|&(i, _)| i).collect::<Vec<u8>>();
    let class = match shape.as_slice() {
        [5] => HandClass::FiveOfAKind,
        [4, ..] => HandClass::FourOfAKind,
        [3, 2] => HandClass::FullHouse,
        [3, ..] => HandClass::ThreeOfAKind,
        [2, 2, ..] => HandClass::TwoPair,
        [2, ..] => HandClass::OnePair,
        _ => HandClass::HighCard,
    };
    Ok((class, key))
}

use super::ranking::EvalError;
use crate::cards::card::Card;
use crate::cards::rank::Rank;

#[cfg(test)]
mod tests {
    use super::*;
    use super::super::tables::family;
    use super::super::EvalKind;

    fn cards(s: &[&str]) -> Vec<Card> {
        s.iter().map(|c| Card::try_from(*c).unwrap()).collect()
    }

    #[test]
    fn classifies_standard_shapes() {
        let high = family(EvalKind::High).unwrap();
        let quads = classify(&cards(&["Qs", "Qh", "Qd", "Qc", "2s"]), &high).unwrap();
        assert_eq!(quads.0, HandClass::FourOfAKind);
        let boat = classify(&cards(&["As", "Ah", "Ad", "Kc", "Ks"]), &high).unwrap();
        assert_eq!(boat.0, HandClass::FullHouse);
        assert_eq!(boat.1, vec![0, 1]);
    }

    #[test]
    fn wheel_keys_after_king_high_run() {
        let high = family(EvalKind::High).unwrap();
        let wheel = classify(&cards(&["As", "2h", "3d", "4c", "5s"]), &high).unwrap();
        let king = classify(&cards(&["Ks", "Qh", "Jd", "Tc", "9s"]), &high).unwrap();
        assert_eq!(wheel.0, HandClass::Straight);
        assert_eq!(king.0, HandClass::Straight);
        assert!(wheel.1[0] > king.1[0]);
    }

    #[test]
    fn a5_low_ignores_straights_and_flushes() {
        let a5 = family(EvalKind::A5Low).unwrap();
        let wheel = classify(&cards(&["As", "2s", "3s", "4s", "5s"]), &a5).unwrap();
        assert_eq!(wheel.0, HandClass::HighCard);
    }

    #[test]
    fn deuce_seven_counts_straights() {
        let low = family(EvalKind::Low27).unwrap();
        let straight = classify(&cards(&["2s", "3h", "4d", "5c", "6s"]), &low).unwrap();
        assert_eq!(straight.0, HandClass::Straight);
        let wheel = classify(&cards(&["As", "2h", "3d", "4c", "5s"]), &low).unwrap();
        assert_eq!(wheel.0, HandClass::HighCard); // ace plays high, no wheel
    }
}
