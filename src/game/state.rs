/// The interpreter's coarse phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    Waiting,
    Dealing,
    Betting,
    Drawing,
    Showdown,
    Complete,
}

impl std::fmt::Display for GameState {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            GameState::Waiting => write!(f, "waiting"),
            GameState::Dealing => write!(f, "dealing"),
            GameState::Betting => write!(f, "betting"),
            GameState::Drawing => write!(f, "drawing"),
            GameState::Showdown => write!(f, "showdown"),
            GameState::Complete => write!(f, "complete"),
        }
    }
}
