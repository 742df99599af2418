#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    FaceDown,
    FaceUp,
}

/// How a card came to be wild.
///
/// A natural Joker is wild from birth and may be retyped to Named or Bug,
/// but never downgraded to Matching: its wildness is unconditional.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WildKind {
    Natural,
    Named,
    Matching,
    Bug,
}

/// A playing card. Identity is (rank, suit) only; visibility and wildness
/// are table state that travels with the card but does not distinguish it.
#[derive(Debug, Clone, Copy)]
pub struct Card {
    rank: Rank,
    suit: Suit,
    visibility: Visibility,
    wild: Option<WildKind>,
}

impl Card {
    pub fn new(rank: Rank, suit: Suit) -> Self {
        Self {
            rank,
            suit,
            visibility: Visibility::FaceDown,
            wild: None,
        }
    }
    pub fn joker() -> Self {
        Self {
            rank: Rank::Joker,
            suit: Suit::Joker,
            visibility: Visibility::FaceDown,
            wild: Some(WildKind::Natural),
        }
    }

    pub fn rank(&self) -> Rank {
        self.rank
    }
    pub fn suit(&self) -> Suit {
        self.suit
    }
    pub fn color(&self) -> Option<Color> {
        self.suit.color()
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }
    pub fn is_up(&self) -> bool {
        self.visibility == Visibility::FaceUp
    }
    pub fn flip(&mut self) {
        self.visibility = match self.visibility {
            Visibility::FaceUp => Visibility::FaceDown,
            Visibility::FaceDown => Visibility::FaceUp,
        };
    }
    pub fn turn(&mut self, visibility: Visibility) {
        self.visibility = visibility;
    }

    pub fn is_wild(&self) -> bool {
        self.wild.is_some()
    }
    pub fn wild_kind(&self) -> Option<WildKind> {
        self.wild
    }
    pub fn make_wild(&mut self, kind: WildKind) {
        if self.wild == Some(WildKind::Natural) {
            match kind {
                WildKind::Named | WildKind::Bug => self.wild = Some(kind),
                WildKind::Natural | WildKind::Matching => {}
            }
        } else {
            self.wild = Some(kind);
        }
    }
    pub fn clear_wild(&mut self) {
        self.wild = None;
    }
}

/// equality by (rank, suit) only
impl PartialEq for Card {
    fn eq(&self, other: &Self) -> bool {
        self.rank == other.rank && self.suit == other.suit
    }
}
impl Eq for Card {}
impl std::hash::Hash for Card {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.rank.hash(state);
        self.suit.hash(state);
    }
}

impl From<(Rank, Suit)> for Card {
    fn from((rank, suit): (Rank, Suit)) -> Self {
        Self::new(rank, suit)
    }
}

/// "As" for Ace of spades, "Rj" or "*j" for a Joker
impl TryFrom<&str> for Card {
    type Error = String;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        let mut chars = s.chars();
        match (chars.next(), chars.next(), chars.next()) {
            (Some('*'), Some('j'), None) | (Some('R'), Some('j'), None) => Ok(Self::joker()),
            (Some(r), Some(s), None) => {
                let rank = Rank::try_from(r).map_err(|_| format!("invalid rank: {}", r))?;
                let suit = Suit::try_from(s).map_err(|_| format!("invalid suit: {}", s))?;
                Ok(Self::new(rank, suit))
            }
            _ => Err(format!("invalid card string: {}", s)),
        }
    }
}

impl Display for Card {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        write!(f, "{}{}", self.rank, self.suit)
    }
}

impl Serialize for Card {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl crate::Arbitrary for Card {
    fn random() -> Self {
        Self::new(Rank::random(), Suit::random())
    }
}

use super::rank::Rank;
use super::suit::Color;
use super::suit::Suit;
use serde::Serialize;
use std::fmt::{Display, Formatter, Result as FmtResult};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_ignores_visibility_and_wildness() {
        let mut a = Card::try_from("As").unwrap();
        let b = Card::try_from("As").unwrap();
        a.turn(Visibility::FaceUp);
        a.make_wild(WildKind::Named);
        assert_eq!(a, b);
    }

    #[test]
    fn natural_joker_resists_matching() {
        let mut joker = Card::joker();
        joker.make_wild(WildKind::Matching);
        assert_eq!(joker.wild_kind(), Some(WildKind::Natural));
        joker.make_wild(WildKind::Bug);
        assert_eq!(joker.wild_kind(), Some(WildKind::Bug));
    }

    #[test]
    fn parse_round_trip() {
        for s in ["As", "Td", "2c", "Kh"] {
            assert_eq!(Card::try_from(s).unwrap().to_string(), s);
        }
        assert_eq!(Card::try_from("*j").unwrap().to_string(), "Rj");
    }
}
