/// A player's cards: an ordered sequence plus named subset views.
///
/// Subsets are index lists over the primary sequence, never owners, so a
/// removal from the sequence keeps every view consistent.
#[derive(Debug, Clone, Default)]
pub struct Hand {
    cards: Vec<Card>,
    subsets: BTreeMap<String, Vec<usize>>,
}

impl Hand {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, card: Card) {
        self.cards.push(card);
    }
    pub fn push_into(&mut self, card: Card, subset: &str) {
        self.cards.push(card);
        let index = self.cards.len() - 1;
        self.subsets.entry(subset.to_string()).or_default().push(index);
    }
    /// assign an already-held card to a subset
    pub fn assign(&mut self, card: &Card, subset: &str) -> bool {
        match self.cards.iter().position(|c| c == card) {
            None => false,
            Some(index) => {
                let view = self.subsets.entry(subset.to_string()).or_default();
                if !view.contains(&index) {
                    view.push(index);
                }
                true
            }
        }
    }
    pub fn unassign(&mut self, card: &Card, subset: &str) -> bool {
        let Some(index) = self.cards.iter().position(|c| c == card) else {
            return false;
        };
        match self.subsets.get_mut(subset) {
            None => false,
            Some(view) => match view.iter().position(|&i| i == index) {
                None => false,
                Some(at) => {
                    view.remove(at);
                    true
                }
            },
        }
    }

    /// remove by (rank, suit) identity, repairing every subset view
    pub fn remove(&mut self, card: &Card) -> Option<Card> {
        let index = self.cards.iter().position(|c| c == card)?;
        let removed = self.cards.remove(index);
        for view in self.subsets.values_mut() {
            view.retain(|&i| i != index);
            for i in view.iter_mut() {
                if *i > index {
                    *i -= 1;
                }
            }
        }
        Some(removed)
    }
    pub fn take_all(&mut self) -> Vec<Card> {
        self.subsets.clear();
        std::mem::take(&mut self.cards)
    }
    pub fn clear(&mut self) {
        self.cards.clear();
        self.subsets.clear();
    }
    pub fn clear_subsets(&mut self) {
        self.subsets.clear();
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }
    pub fn contains(&self, card: &Card) -> bool {
        self.cards.contains(card)
    }
    pub fn get_mut(&mut self, card: &Card) -> Option<&mut Card> {
        self.cards.iter_mut().find(|c| *c == card)
    }
    pub fn visible(&self) -> Vec<Card> {
        self.cards.iter().filter(|c| c.is_up()).copied().collect()
    }
    pub fn concealed(&self) -> Vec<Card> {
        self.cards.iter().filter(|c| !c.is_up()).copied().collect()
    }
    pub fn subset(&self, name: &str) -> Vec<Card> {
        self.subsets
            .get(name)
            .map(|view| view.iter().map(|&i| self.cards[i]).collect())
            .unwrap_or_default()
    }
    pub fn subset_names(&self) -> impl Iterator<Item = &str> {
        self.subsets.keys().map(String::as_str)
    }
    pub fn len(&self) -> usize {
        self.cards.len()
    }
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn show_all(&mut self) {
        for card in self.cards.iter_mut() {
            card.turn(Visibility::FaceUp);
        }
    }
    pub fn hide_all(&mut self) {
        for card in self.cards.iter_mut() {
            card.turn(Visibility::FaceDown);
        }
    }
}

impl From<Vec<Card>> for Hand {
    fn from(cards: Vec<Card>) -> Self {
        Self {
            cards,
            subsets: BTreeMap::new(),
        }
    }
}

impl Display for Hand {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        if self.cards.is_empty() {
            return write!(f, "empty");
        }
        let shown = self
            .cards
            .iter()
            .map(|c| {
                if c.is_up() {
                    c.to_string()
                } else {
                    "**".to_string()
                }
            })
            .collect::<Vec<String>>();
        write!(f, "{}", shown.join(" "))
    }
}

use super::card::{Card, Visibility};
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter, Result as FmtResult};
