/// Card descriptor shared by deal/draw/discard/expose/pass/separate steps.
#[derive(Debug, Clone)]
pub struct CardSpec {
    pub number: usize,
    /// lower bound for player-chosen counts (draws, discards); None means
    /// exactly `number` is allowed up to and including zero-to-number
    pub min_number: Option<usize>,
    pub state: Visibility,
    /// community subsets (deals) or the hand subset dealt into
    pub subsets: Vec<String>,
    /// hand subset a separate step files cards under
    pub hole_subset: Option<String>,
    pub direction: PassDirection,
    /// keep the replaced card's visibility on redeal
    pub preserve_state: bool,
    pub wild_rules: Vec<WildRule>,
}

impl CardSpec {
    pub fn simple(number: usize, state: Visibility) -> Self {
        Self {
            number,
            min_number: None,
            state,
            subsets: Vec::new(),
            hole_subset: None,
            direction: PassDirection::Left,
            preserve_state: false,
            wild_rules: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassDirection {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DealTarget {
    Player,
    Community,
}

/// Conditional behavior attached to a deal (e.g. a flop color check that
/// raises a state flag other configuration switches on).
#[derive(Debug, Clone)]
pub struct DealCondition {
    pub kind: String,
    pub color: Color,
    pub min_count: usize,
    /// the flag raised when the check passes
    pub raises: String,
}

/// A betting step's sizing tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BetKind {
    Blinds,
    Antes,
    BringIn,
    Small,
    Big,
    Named(String),
}

impl BetKind {
    /// forced-bet steps post money without opening player decisions
    /// (bring-in steps do open a decision for the selected player)
    pub fn is_forced(&self) -> bool {
        matches!(self, BetKind::Blinds | BetKind::Antes | BetKind::BringIn)
    }
}

/// One gameplay step, parsed into a closed union at load time.
#[derive(Debug, Clone)]
pub enum Step {
    Bet(BetKind),
    Deal {
        target: DealTarget,
        cards: Vec<CardSpec>,
        condition: Option<DealCondition>,
    },
    Draw(Vec<CardSpec>),
    Discard(Vec<CardSpec>),
    Expose(Vec<CardSpec>),
    Pass(Vec<CardSpec>),
    Separate(Vec<CardSpec>),
    Declare { options: Vec<String> },
    Choose { options: Vec<String>, label: String },
    RollDie,
    ReplaceCommunity { subset: String, number: usize },
    Remove { subset: String, number: usize },
    Showdown,
    Grouped(Vec<Step>),
}

/// A named step in the gameplay sequence.
#[derive(Debug, Clone)]
pub struct GameStep {
    pub name: String,
    pub step: Step,
}

use super::showdown::WildRule;
use crate::cards::card::Visibility;
use crate::cards::suit::Color;
