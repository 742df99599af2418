/// Name of the implicit community subset for single-board games.
pub const DEFAULT_SUBSET: &str = "default";

/// The community card area: one primary sequence plus named board views.
///
/// A card placed on two boards (double-board variants share streets) exists
/// once in the sequence and is indexed from both views, so card conservation
/// counts it once.
#[derive(Debug, Clone, Default)]
pub struct Board {
    cards: Vec<Card>,
    subsets: BTreeMap<String, Vec<usize>>,
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn place(&mut self, card: Card, subsets: &[String]) {
        self.cards.push(card);
        let index = self.cards.len() - 1;
        if subsets.is_empty() {
            self.subsets
                .entry(DEFAULT_SUBSET.to_string())
                .or_default()
                .push(index);
        }
        for name in subsets {
            self.subsets.entry(name.clone()).or_default().push(index);
        }
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
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
    pub fn count(&self, name: &str) -> usize {
        self.subsets.get(name).map(Vec::len).unwrap_or(0)
    }
    pub fn len(&self) -> usize {
        self.cards.len()
    }
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// flip face-down cards in a subset face up
    pub fn expose(&mut self, name: &str) {
        if let Some(view) = self.subsets.get(name) {
            for &i in view.clone().iter() {
                self.cards[i].turn(Visibility::FaceUp);
            }
        }
    }

    /// remove by identity, repairing every board view
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

    pub fn get_mut(&mut self, card: &Card) -> Option<&mut Card> {
        self.cards.iter_mut().find(|c| *c == card)
    }

    pub fn clear(&mut self) {
        self.cards.clear();
        self.subsets.clear();
    }
}

impl Display for Board {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        let shown = self
            .cards
            .iter()
            .map(|c| c.to_string())
            .collect::<Vec<String>>();
        write!(f, "{}", shown.join(" "))
    }
}

use super::card::{Card, Visibility};
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter, Result as FmtResult};

#[cfg(test)]
mod tests {
    use super::*;

    fn card(s: &str) -> Card {
        Card::try_from(s).unwrap()
    }

    #[test]
    fn default_subset_when_unnamed() {
        let mut board = Board::new();
        board.place(card("As"), &[]);
        assert_eq!(board.subset(DEFAULT_SUBSET), vec![card("As")]);
    }

    #[test]
    fn shared_card_counts_once() {
        let mut board = Board::new();
        board.place(card("As"), &["Board 1".to_string(), "Board 2".to_string()]);
        assert_eq!(board.len(), 1);
        assert_eq!(board.count("Board 1"), 1);
        assert_eq!(board.count("Board 2"), 1);
    }

    #[test]
    fn removal_repairs_views() {
        let mut board = Board::new();
        board.place(card("As"), &["Board 1".to_string()]);
        board.place(card("Kd"), &["Board 1".to_string(), "Board 2".to_string()]);
        board.remove(&card("As"));
        assert_eq!(board.subset("Board 1"), vec![card("Kd")]);
        assert_eq!(board.subset("Board 2"), vec![card("Kd")]);
    }
}
