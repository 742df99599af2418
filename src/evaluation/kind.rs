/// Every evaluation type the engine can rank hands under.
///
/// The wire names are the strings variant descriptions use in
/// `showdown.bestHand[].evaluationType` and friends.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum EvalKind {
    // 5-card families
    High,
    HighWild,
    HighWildBug,
    High36,
    High20,
    High40Bug,
    A5Low,
    A5LowHigh,
    Low27,
    // 4-card badugi family
    Badugi,
    BadugiAh,
    Hidugi,
    // pip counting
    Pip49,
    PipZero,
    Pip6,
    Pip21,
    LowPip6,
    // partial sizes, used for stud bring-in and visible-hand ordering
    OneCardLow,
    OneCardLowAl,
    OneCardHigh,
    OneCardHighAh,
    OneCardHighSpade,
    TwoCardHigh,
    TwoCardHighAl,
    TwoCardHighAlRh,
    TwoCardLow,
    TwoCardLowAh,
    ThreeCardHigh,
    ThreeCardHighAl,
    ThreeCardHighAlRh,
    ThreeCardLow,
    ThreeCardLowAh,
    FourCardHigh,
    FourCardHighAl,
    FourCardHighAlRh,
    FourCardLow,
    FourCardLowAh,
}

/// which machinery ranks hands of this kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Engine {
    Table,
    Badugi,
    Pip,
    SpadeOnly,
}

impl EvalKind {
    pub(crate) fn engine(&self) -> Engine {
        match self {
            EvalKind::Badugi | EvalKind::BadugiAh | EvalKind::Hidugi => Engine::Badugi,
            EvalKind::Pip49
            | EvalKind::PipZero
            | EvalKind::Pip6
            | EvalKind::Pip21
            | EvalKind::LowPip6 => Engine::Pip,
            EvalKind::OneCardHighSpade => Engine::SpadeOnly,
            _ => Engine::Table,
        }
    }

    /// how many cards a selection must provide
    pub fn card_count(&self) -> usize {
        match self {
            EvalKind::Badugi | EvalKind::BadugiAh | EvalKind::Hidugi => 4,
            EvalKind::LowPip6 => 6,
            EvalKind::Pip21 => 2,
            EvalKind::OneCardLow
            | EvalKind::OneCardLowAl
            | EvalKind::OneCardHigh
            | EvalKind::OneCardHighAh
            | EvalKind::OneCardHighSpade => 1,
            EvalKind::TwoCardHigh
            | EvalKind::TwoCardHighAl
            | EvalKind::TwoCardHighAlRh
            | EvalKind::TwoCardLow
            | EvalKind::TwoCardLowAh => 2,
            EvalKind::ThreeCardHigh
            | EvalKind::ThreeCardHighAl
            | EvalKind::ThreeCardHighAlRh
            | EvalKind::ThreeCardLow
            | EvalKind::ThreeCardLowAh => 3,
            EvalKind::FourCardHigh
            | EvalKind::FourCardHighAl
            | EvalKind::FourCardHighAlRh
            | EvalKind::FourCardLow
            | EvalKind::FourCardLowAh => 4,
            _ => 5,
        }
    }

    /// kinds that consult suits; undefined on die decks
    pub fn suit_aware(&self) -> bool {
        !matches!(
            self,
            EvalKind::Pip49 | EvalKind::PipZero | EvalKind::Pip6 | EvalKind::Pip21 | EvalKind::LowPip6
        )
    }

    /// the 5-card family a partial-size kind widens into for cross-size comparison
    pub fn wide_target(&self) -> Option<EvalKind> {
        match self {
            EvalKind::OneCardLow
            | EvalKind::OneCardHigh
            | EvalKind::OneCardHighSpade
            | EvalKind::TwoCardHigh
            | EvalKind::ThreeCardHigh
            | EvalKind::FourCardHigh => Some(EvalKind::High),
            EvalKind::OneCardLowAl
            | EvalKind::TwoCardHighAl
            | EvalKind::TwoCardHighAlRh
            | EvalKind::TwoCardLow
            | EvalKind::ThreeCardHighAl
            | EvalKind::ThreeCardHighAlRh
            | EvalKind::ThreeCardLow
            | EvalKind::FourCardHighAl
            | EvalKind::FourCardHighAlRh
            | EvalKind::FourCardLow => Some(EvalKind::A5Low),
            EvalKind::OneCardHighAh
            | EvalKind::TwoCardLowAh
            | EvalKind::ThreeCardLowAh
            | EvalKind::FourCardLowAh => Some(EvalKind::Low27),
            _ => None,
        }
    }
}

impl TryFrom<&str> for EvalKind {
    type Error = String;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s {
            "high" => Ok(EvalKind::High),
            "high_wild" => Ok(EvalKind::HighWild),
            "high_wild_bug" => Ok(EvalKind::HighWildBug),
            "36card_ffh_high" => Ok(EvalKind::High36),
            "20card_high" => Ok(EvalKind::High20),
            "27_ja_ffh_high_wild_bug" => Ok(EvalKind::High40Bug),
            "a5_low" => Ok(EvalKind::A5Low),
            "a5_low_high" => Ok(EvalKind::A5LowHigh),
            "27_low" => Ok(EvalKind::Low27),
            "badugi" => Ok(EvalKind::Badugi),
            "badugi_ah" => Ok(EvalKind::BadugiAh),
            "hidugi" => Ok(EvalKind::Hidugi),
            "49" => Ok(EvalKind::Pip49),
            "zero" => Ok(EvalKind::PipZero),
            "6" => Ok(EvalKind::Pip6),
            "21" => Ok(EvalKind::Pip21),
            "low_pip_6" => Ok(EvalKind::LowPip6),
            "one_card_low" => Ok(EvalKind::OneCardLow),
            "one_card_low_al" => Ok(EvalKind::OneCardLowAl),
            "one_card_high" => Ok(EvalKind::OneCardHigh),
            "one_card_high_ah" => Ok(EvalKind::OneCardHighAh),
            "one_card_high_spade" => Ok(EvalKind::OneCardHighSpade),
            "two_card_high" => Ok(EvalKind::TwoCardHigh),
            "two_card_high_al" => Ok(EvalKind::TwoCardHighAl),
            "two_card_high_al_rh" => Ok(EvalKind::TwoCardHighAlRh),
            "two_card_low" => Ok(EvalKind::TwoCardLow),
            "two_card_low_ah" => Ok(EvalKind::TwoCardLowAh),
            "three_card_high" => Ok(EvalKind::ThreeCardHigh),
            "three_card_high_al" => Ok(EvalKind::ThreeCardHighAl),
            "three_card_high_al_rh" => Ok(EvalKind::ThreeCardHighAlRh),
            "three_card_low" => Ok(EvalKind::ThreeCardLow),
            "three_card_low_ah" => Ok(EvalKind::ThreeCardLowAh),
            "four_card_high" => Ok(EvalKind::FourCardHigh),
            "four_card_high_al" => Ok(EvalKind::FourCardHighAl),
            "four_card_high_al_rh" => Ok(EvalKind::FourCardHighAlRh),
            "four_card_low" => Ok(EvalKind::FourCardLow),
            "four_card_low_ah" => Ok(EvalKind::FourCardLowAh),
            other => Err(format!("unknown evaluation type: {}", other)),
        }
    }
}

impl Display for EvalKind {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        let name = match self {
            EvalKind::High => "high",
            EvalKind::HighWild => "high_wild",
            EvalKind::HighWildBug => "high_wild_bug",
            EvalKind::High36 => "36card_ffh_high",
            EvalKind::High20 => "20card_high",
            EvalKind::High40Bug => "27_ja_ffh_high_wild_bug",
            EvalKind::A5Low => "a5_low",
            EvalKind::A5LowHigh => "a5_low_high",
            EvalKind::Low27 => "27_low",
            EvalKind::Badugi => "badugi",
            EvalKind::BadugiAh => "badugi_ah",
            EvalKind::Hidugi => "hidugi",
            EvalKind::Pip49 => "49",
            EvalKind::PipZero => "zero",
            EvalKind::Pip6 => "6",
            EvalKind::Pip21 => "21",
            EvalKind::LowPip6 => "low_pip_6",
            EvalKind::OneCardLow => "one_card_low",
            EvalKind::OneCardLowAl => "one_card_low_al",
            EvalKind::OneCardHigh => "one_card_high",
            EvalKind::OneCardHighAh => "one_card_high_ah",
            EvalKind::OneCardHighSpade => "one_card_high_spade",
            EvalKind::TwoCardHigh => "two_card_high",
            EvalKind::TwoCardHighAl => "two_card_high_al",
            EvalKind::TwoCardHighAlRh => "two_card_high_al_rh",
            EvalKind::TwoCardLow => "two_card_low",
            EvalKind::TwoCardLowAh => "two_card_low_ah",
            EvalKind::ThreeCardHigh => "three_card_high",
            EvalKind::ThreeCardHighAl => "three_card_high_al",
            EvalKind::ThreeCardHighAlRh => "three_card_high_al_rh",
            EvalKind::ThreeCardLow => "three_card_low",
            EvalKind::ThreeCardLowAh => "three_card_low_ah",
            EvalKind::FourCardHigh => "four_card_high",
            EvalKind::FourCardHighAl => "four_card_high_al",
            EvalKind::FourCardHighAlRh => "four_card_high_al_rh",
            EvalKind::FourCardLow => "four_card_low",
            EvalKind::FourCardLowAh => "four_card_low_ah",
        };
        write!(f, "{}", name)
    }
}

use std::fmt::{Display, Formatter, Result as FmtResult};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_names_round_trip() {
        for kind in [
            EvalKind::High,
            EvalKind::A5Low,
            EvalKind::Low27,
            EvalKind::Badugi,
            EvalKind::Pip21,
            EvalKind::TwoCardHighAlRh,
            EvalKind::High40Bug,
        ] {
            assert_eq!(EvalKind::try_from(kind.to_string().as_str()), Ok(kind));
        }
    }
}
