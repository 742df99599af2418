/// How a hand's opening money goes in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForcedBetStyle {
    Blinds,
    BringIn,
    AntesOnly,
}

impl TryFrom<&str> for ForcedBetStyle {
    type Error = String;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s {
            "blinds" => Ok(ForcedBetStyle::Blinds),
            "bring-in" => Ok(ForcedBetStyle::BringIn),
            "antes_only" => Ok(ForcedBetStyle::AntesOnly),
            other => Err(format!("invalid forced bet style: {}", other)),
        }
    }
}

impl std::fmt::Display for ForcedBetStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            ForcedBetStyle::Blinds => write!(f, "blinds"),
            ForcedBetStyle::BringIn => write!(f, "bring-in"),
            ForcedBetStyle::AntesOnly => write!(f, "antes_only"),
        }
    }
}

/// One forced-bet configuration; variants may switch between several
/// (e.g. a die roll deciding between stud and draw openings).
#[derive(Debug, Clone)]
pub struct ForcedBetRule {
    pub style: ForcedBetStyle,
    pub rule: Option<CardRule>,
    pub bring_in_eval: Option<EvalKind>,
}

impl ForcedBetRule {
    pub fn blinds() -> Self {
        Self {
            style: ForcedBetStyle::Blinds,
            rule: None,
            bring_in_eval: None,
        }
    }
}

pub type ForcedBets = Conditional<ForcedBetRule>;

use super::conditional::Conditional;
use crate::betting::bringin::CardRule;
use crate::evaluation::kind::EvalKind;
