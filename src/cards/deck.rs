/// The rank set a variant deals from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeckKind {
    Standard,  // 52 cards
    ShortTA,   // T-A only, 20 cards
    Short6A,   // 6-A, 36 cards
    Short27JA, // 2-7 and J-A, 40 cards
    Die,       // six faces, 1-6
}

impl DeckKind {
    pub fn ranks(&self) -> &'static [Rank] {
        match self {
            DeckKind::Standard => &[
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
            ],
            DeckKind::ShortTA => &[Rank::Ten, Rank::Jack, Rank::Queen, Rank::King, Rank::Ace],
            DeckKind::Short6A => &[
                Rank::Six,
                Rank::Seven,
                Rank::Eight,
                Rank::Nine,
                Rank::Ten,
                Rank::Jack,
                Rank::Queen,
                Rank::King,
                Rank::Ace,
            ],
            DeckKind::Short27JA => &[
                Rank::Two,
                Rank::Three,
                Rank::Four,
                Rank::Five,
                Rank::Six,
                Rank::Seven,
                Rank::Jack,
                Rank::Queen,
                Rank::King,
                Rank::Ace,
            ],
            DeckKind::Die => &[
                Rank::One,
                Rank::Two,
                Rank::Three,
                Rank::Four,
                Rank::Five,
                Rank::Six,
            ],
        }
    }
    pub fn size(&self) -> usize {
        match self {
            DeckKind::Die => 6,
            kind => kind.ranks().len() * 4,
        }
    }
    /// die decks have no meaningful suits; suit-aware evaluation is undefined on them
    pub fn suited(&self) -> bool {
        !matches!(self, DeckKind::Die)
    }
}

impl TryFrom<&str> for DeckKind {
    type Error = String;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s {
            "standard" => Ok(DeckKind::Standard),
            "short_ta" => Ok(DeckKind::ShortTA),
            "short_6a" => Ok(DeckKind::Short6A),
            "short_27_ja" => Ok(DeckKind::Short27JA),
            "die" => Ok(DeckKind::Die),
            other => Err(format!("invalid deck type: {}", other)),
        }
    }
}

impl Display for DeckKind {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        match self {
            DeckKind::Standard => write!(f, "standard"),
            DeckKind::ShortTA => write!(f, "short_ta"),
            DeckKind::Short6A => write!(f, "short_6a"),
            DeckKind::Short27JA => write!(f, "short_27_ja"),
            DeckKind::Die => write!(f, "die"),
        }
    }
}

/// An ordered pile of cards. Dealing removes from the end (the top).
///
/// Also used for the discard pile, which starts empty.
#[derive(Debug, Clone, Default)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    pub fn new(kind: DeckKind, jokers: usize) -> Self {
        let mut cards = Vec::with_capacity(kind.size() + jokers);
        match kind {
            DeckKind::Die => {
                // a die is a six-card "deck" of one neutral suit
                cards.extend(kind.ranks().iter().map(|&r| Card::new(r, Suit::Club)));
            }
            kind => {
                for &suit in Suit::all() {
                    for &rank in kind.ranks() {
                        cards.push(Card::new(rank, suit));
                    }
                }
            }
        }
        cards.extend((0..jokers).map(|_| Card::joker()));
        Self { cards }
    }
    pub fn empty() -> Self {
        Self { cards: Vec::new() }
    }

    pub fn shuffle(&mut self, rng: &mut impl Rng) {
        self.cards.shuffle(rng);
    }

    pub fn deal(&mut self, visibility: Visibility) -> Option<Card> {
        self.cards.pop().map(|mut card| {
            card.turn(visibility);
            card
        })
    }

    pub fn push(&mut self, card: Card) {
        self.cards.push(card);
    }
    pub fn extend(&mut self, cards: impl IntoIterator<Item = Card>) {
        self.cards.extend(cards);
    }
    /// match on (rank, suit), ignoring visibility
    pub fn remove(&mut self, card: &Card) -> Option<Card> {
        self.cards
            .iter()
            .position(|c| c == card)
            .map(|i| self.cards.remove(i))
    }
    pub fn contains(&self, card: &Card) -> bool {
        self.cards.contains(card)
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }
    pub fn len(&self) -> usize {
        self.cards.len()
    }
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
    pub fn clear(&mut self) {
        self.cards.clear();
    }
}

use super::card::{Card, Visibility};
use super::rank::Rank;
use super::suit::Suit;
use rand::Rng;
use rand::seq::SliceRandom;
use std::fmt::{Display, Formatter, Result as FmtResult};
