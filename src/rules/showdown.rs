/// Whether pots award by inspection or by player declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclarationMode {
    CardsSpeak,
    Declare,
}

/// A card-count requirement: a single count or a choice among counts
/// (`holeCards: [2, 3]` reads "exactly 2 or exactly 3").
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Counts {
    Exact(usize),
    OneOf(Vec<usize>),
}

impl Counts {
    pub fn options(&self) -> Vec<usize> {
        match self {
            Counts::Exact(n) => vec![*n],
            Counts::OneOf(ns) => ns.clone(),
        }
    }
}

/// What a card may be declared wild as, and by what role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WildTarget {
    Rank(Rank),
    Joker,
    LowestCommunity,
    LowestHole,
    LastCommunityCard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WildRole {
    Wild,
    Bug,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WildRule {
    pub target: WildTarget,
    pub role: WildRole,
}

/// One independently awarded pot portion: evaluation type, card-usage
/// constraints, optional qualifier and wild clauses.
#[derive(Debug, Clone)]
pub struct BestHand {
    pub name: String,
    pub eval: EvalKind,
    pub hole_cards: Option<Counts>,
    pub community_cards: Option<Counts>,
    pub any_cards: Option<usize>,
    /// restrict community cards to a named board subset
    pub subset: Option<String>,
    /// restrict hole cards to a named hand subset from a prior separate step
    pub hole_subset: Option<String>,
    pub qualifier: Option<Qualifier>,
    pub wild_rules: Vec<WildRule>,
}

impl BestHand {
    pub fn new(name: impl Into<String>, eval: EvalKind) -> Self {
        Self {
            name: name.into(),
            eval,
            hole_cards: None,
            community_cards: None,
            any_cards: None,
            subset: None,
            hole_subset: None,
            qualifier: None,
            wild_rules: Vec::new(),
        }
    }
}

/// What to do with a pot portion nobody qualified for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefaultAction {
    /// split the portion among every eligible live player
    SplitAmongEligible,
    /// award under an alternate evaluation, ignoring the qualifier
    BestHand(EvalKind),
    /// add the portion to the named sibling portion
    RollTo(String),
}

#[derive(Debug, Clone)]
pub struct PerPotDefault {
    /// bestHand name this fallback covers; None covers any portion
    pub applies_to: Option<String>,
    pub action: DefaultAction,
}

/// The full showdown configuration of a variant.
#[derive(Debug, Clone)]
pub struct ShowdownRules {
    pub order: String,
    pub starting_from: String,
    pub cards_required: String,
    pub declaration_mode: DeclarationMode,
    pub best_hand: Vec<BestHand>,
    pub conditional_best_hands: Vec<(String, Vec<BestHand>)>,
    pub default_best_hand: Vec<BestHand>,
    pub global_default_action: Option<DefaultAction>,
    pub default_actions: Vec<PerPotDefault>,
    pub classification_priority: Vec<String>,
}

impl ShowdownRules {
    /// the bestHand list in effect given which condition tags hold
    pub fn active_best_hands(&self, matches: impl Fn(&str) -> bool) -> &[BestHand] {
        for (condition, hands) in self.conditional_best_hands.iter() {
            if matches(condition) {
                return hands;
            }
        }
        if !self.conditional_best_hands.is_empty() && !self.default_best_hand.is_empty() {
            return &self.default_best_hand;
        }
        &self.best_hand
    }

    /// the fallback for a portion with no qualifying hand
    pub fn fallback_for(&self, portion: &str) -> Option<&DefaultAction> {
        self.default_actions
            .iter()
            .find(|d| d.applies_to.as_deref().map(|n| n == portion).unwrap_or(true))
            .map(|d| &d.action)
            .or(self.global_default_action.as_ref())
    }
}

use crate::cards::rank::Rank;
use crate::evaluation::kind::EvalKind;
use crate::evaluation::ranking::Qualifier;
