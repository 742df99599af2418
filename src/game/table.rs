/// Seating, the button, the deck, the board, and the discard pile.
///
/// Seat order is join order; play proceeds clockwise through the vector.
#[derive(Debug, Clone)]
pub struct Table {
    seats: Vec<Player>,
    pub button: usize,
    pub deck: Deck,
    pub board: Board,
    pub discards: Deck,
    deck_kind: DeckKind,
    jokers: usize,
    max_players: usize,
}

impl Table {
    pub fn new(deck_kind: DeckKind, jokers: usize, max_players: usize) -> Self {
        Self {
            seats: Vec::new(),
            button: 0,
            deck: Deck::new(deck_kind, jokers),
            board: Board::new(),
            discards: Deck::empty(),
            deck_kind,
            jokers,
            max_players,
        }
    }

    pub fn add_player(&mut self, player: Player) -> Result<(), EngineError> {
        if self.seats.len() >= self.max_players {
            return Err(EngineError::TableFull);
        }
        if self.seats.iter().any(|p| p.id == player.id) {
            return Err(EngineError::SeatTaken(player.id));
        }
        self.seats.push(player);
        Ok(())
    }
    pub fn remove_player(&mut self, id: &PlayerId) {
        if let Some(index) = self.seats.iter().position(|p| &p.id == id) {
            self.seats.remove(index);
            if self.button >= self.seats.len() && !self.seats.is_empty() {
                self.button %= self.seats.len();
            }
        }
    }

    pub fn players(&self) -> &[Player] {
        &self.seats
    }
    pub fn players_mut(&mut self) -> &mut [Player] {
        &mut self.seats
    }
    pub fn player(&self, id: &PlayerId) -> Option<&Player> {
        self.seats.iter().find(|p| &p.id == id)
    }
    pub fn player_mut(&mut self, id: &PlayerId) -> Option<&mut Player> {
        self.seats.iter_mut().find(|p| &p.id == id)
    }
    pub fn len(&self) -> usize {
        self.seats.len()
    }
    pub fn is_empty(&self) -> bool {
        self.seats.is_empty()
    }

    pub fn move_button(&mut self) {
        if !self.seats.is_empty() {
            self.button = (self.button + 1) % self.seats.len();
        }
    }

    /// active players in clockwise order starting at the button
    pub fn position_order(&self) -> Vec<PlayerId> {
        let n = self.seats.len();
        (0..n)
            .map(|i| &self.seats[(self.button + i) % n])
            .filter(|p| p.active)
            .map(|p| p.id.clone())
            .collect()
    }

    /// assign BUTTON/SB/BB from the button per table size
    pub fn assign_positions(&mut self) {
        for seat in self.seats.iter_mut() {
            seat.positions.clear();
        }
        let order = self.position_order();
        match order.len() {
            0 | 1 => {}
            2 => {
                let first = self.player_mut(&order[0]).expect("seated");
                first.positions.insert(Position::Button);
                first.positions.insert(Position::SmallBlind);
                let second = self.player_mut(&order[1]).expect("seated");
                second.positions.insert(Position::BigBlind);
            }
            _ => {
                for (id, position) in order.iter().zip([
                    Position::Button,
                    Position::SmallBlind,
                    Position::BigBlind,
                ]) {
                    self.player_mut(id).expect("seated").positions.insert(position);
                }
            }
        }
    }

    pub fn seat_with(&self, position: Position) -> Option<&Player> {
        self.seats.iter().find(|p| p.active && p.has_position(position))
    }

    /// the next player satisfying `fit`, scanning clockwise after `id`
    pub fn next_where(&self, id: &PlayerId, fit: impl Fn(&Player) -> bool) -> Option<PlayerId> {
        let n = self.seats.len();
        let start = self.seats.iter().position(|p| &p.id == id)?;
        (1..=n)
            .map(|i| &self.seats[(start + i) % n])
            .find(|p| fit(p))
            .map(|p| p.id.clone())
    }

    /// live players with their face-up cards, in position order
    pub fn visible_hands(&self) -> Vec<(PlayerId, Vec<Card>)> {
        self.position_order()
            .into_iter()
            .filter_map(|id| self.player(&id).filter(|p| p.is_live()).map(|p| (id.clone(), p.hand.visible())))
            .collect()
    }

    /// deal one card to a player, optionally into a named hand subset
    pub fn deal_card_to(
        &mut self,
        id: &PlayerId,
        visibility: Visibility,
        subset: Option<&str>,
    ) -> Result<Card, EngineError> {
        let card = self.deck.deal(visibility).ok_or(EngineError::DeckExhausted)?;
        let player = self.player_mut(id).expect("dealt player is seated");
        match subset {
            Some(name) => player.hand.push_into(card, name),
            None => player.hand.push(card),
        }
        log::debug!("dealt {} to {}", card, id);
        Ok(card)
    }

    /// round-robin one card per active player per slot, honoring the
    /// slot's visibility
    pub fn deal_hole_cards(
        &mut self,
        slots: &[(usize, Visibility)],
        subset: Option<&str>,
    ) -> Result<(), EngineError> {
        let order = self
            .position_order()
            .into_iter()
            .filter(|id| self.player(id).map(|p| p.is_live()).unwrap_or(false))
            .collect::<Vec<PlayerId>>();
        for &(count, visibility) in slots {
            for _ in 0..count {
                for id in order.iter() {
                    self.deal_card_to(id, visibility, subset)?;
                }
            }
        }
        Ok(())
    }

    pub fn deal_community(
        &mut self,
        count: usize,
        subsets: &[String],
        visibility: Visibility,
    ) -> Result<(), EngineError> {
        for _ in 0..count {
            let card = self.deck.deal(visibility).ok_or(EngineError::DeckExhausted)?;
            log::debug!("dealt {} to board {:?}", card, subsets);
            self.board.place(card, subsets);
        }
        Ok(())
    }

    /// fresh deck, cleared hands and board, dealt-in players marked active
    pub fn reset_for_hand(&mut self) {
        for seat in self.seats.iter_mut() {
            seat.hand.clear();
            seat.folded = false;
            seat.all_in = false;
            seat.active = seat.stack > 0;
        }
        self.board.clear();
        self.discards.clear();
        self.deck = Deck::new(self.deck_kind, self.jokers);
    }

    /// deck + board + hands + discards; the conservation invariant
    pub fn card_census(&self) -> usize {
        self.deck.len()
            + self.board.len()
            + self.discards.len()
            + self.seats.iter().map(|p| p.hand.len()).sum::<usize>()
    }
    pub fn full_deck_size(&self) -> usize {
        self.deck_kind.size() + self.jokers
    }
}

use super::EngineError;
use super::player::{Player, Position};
use crate::PlayerId;
use crate::cards::board::Board;
use crate::cards::card::{Card, Visibility};
use crate::cards::deck::{Deck, DeckKind};

#[cfg(test)]
mod tests {
    use super::*;

    fn table_of(n: usize) -> Table {
        let mut table = Table::new(DeckKind::Standard, 0, 9);
        for i in 0..n {
            let mut player = Player::new(format!("p{}", i + 1), format!("Player {}", i + 1), 500);
            player.active = true;
            table.add_player(player).unwrap();
        }
        table
    }

    #[test]
    fn three_handed_positions() {
        let mut table = table_of(4);
        table.assign_positions();
        assert!(table.players()[0].has_position(Position::Button));
        assert!(table.players()[1].has_position(Position::SmallBlind));
        assert!(table.players()[2].has_position(Position::BigBlind));
        assert!(table.players()[3].positions.is_empty());
    }

    #[test]
    fn heads_up_button_is_small_blind() {
        let mut table = table_of(2);
        table.assign_positions();
        assert!(table.players()[0].has_position(Position::Button));
        assert!(table.players()[0].has_position(Position::SmallBlind));
        assert!(table.players()[1].has_position(Position::BigBlind));
    }

    #[test]
    fn button_rotation_shifts_order() {
        let mut table = table_of(3);
        table.move_button();
        table.assign_positions();
        assert!(table.players()[1].has_position(Position::Button));
        assert_eq!(table.position_order()[0], "p2");
    }

    #[test]
    fn interleaved_dealing_respects_slots() {
        let mut table = table_of(2);
        table
            .deal_hole_cards(&[(2, Visibility::FaceDown), (1, Visibility::FaceUp)], None)
            .unwrap();
        for player in table.players() {
            assert_eq!(player.hand.len(), 3);
            assert_eq!(player.hand.visible().len(), 1);
        }
        assert_eq!(table.deck.len(), 46);
        assert_eq!(table.card_census(), 52);
    }

    #[test]
    fn census_includes_board_and_discards() {
        let mut table = table_of(2);
        table
            .deal_community(3, &["default".to_string()], Visibility::FaceUp)
            .unwrap();
        let discard = table.deck.deal(Visibility::FaceDown).unwrap();
        table.discards.push(discard);
        assert_eq!(table.card_census(), 52);
    }
}
