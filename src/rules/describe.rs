//! Human-readable summaries derived from a variant description: display
//! tags, per-portion final-hand text, and split-pot labels.

/// short display tags: forced-bet style, split pot, declare, qualifier,
/// wild cards, short decks, joker count, player cap
pub fn subtitle_tags(rules: &Rules) -> Vec<String> {
    let mut tags = Vec::new();
    match rules.forced_bets.default_value().style {
        ForcedBetStyle::Blinds => tags.push("Blinds".to_string()),
        ForcedBetStyle::BringIn => {
            tags.push("Antes".to_string());
            tags.push("Bring-In".to_string());
        }
        ForcedBetStyle::AntesOnly => tags.push("Antes".to_string()),
    }
    if rules.showdown.best_hand.len() > 1 {
        tags.push("Split Pot".to_string());
    }
    if rules.showdown.declaration_mode == DeclarationMode::Declare {
        tags.push("Declare".to_string());
    }
    if rules
        .showdown
        .best_hand
        .iter()
        .any(|hand| hand.qualifier.is_some())
    {
        tags.push("Qualifier".to_string());
    }
    for label in wild_card_tags(rules) {
        tags.push(label);
    }
    match rules.deck {
        DeckKind::Standard => {}
        DeckKind::Die => tags.push("Die Deck".to_string()),
        deck => tags.push(format!("{}-Card Deck", deck.size())),
    }
    if rules.jokers > 0 {
        tags.push(format!(
            "{} Joker{}",
            rules.jokers,
            if rules.jokers > 1 { "s" } else { "" }
        ));
    }
    if rules.max_players < 9 {
        tags.push(format!("{} Players Max", rules.max_players));
    }
    tags
}

fn wild_card_tags(rules: &Rules) -> Vec<String> {
    let mut labels = Vec::new();
    let mut add = |rule: &WildRule| {
        let label = match (&rule.target, rule.role) {
            (WildTarget::Rank(rank), WildRole::Bug) => format!("Bug ({})", rank.plural_name()),
            (WildTarget::Rank(rank), WildRole::Wild) => format!("{} Wild", rank.plural_name()),
            (WildTarget::Joker, WildRole::Bug) => "Bug".to_string(),
            (WildTarget::Joker, WildRole::Wild) => "Joker Wild".to_string(),
            (WildTarget::LowestCommunity, _) => "Lowest Board Card Wild".to_string(),
            (WildTarget::LowestHole, _) => "Lowest Hole Card Wild".to_string(),
            (WildTarget::LastCommunityCard, _) => "Last Community Card Wild".to_string(),
        };
        if !labels.contains(&label) {
            labels.push(label);
        }
    };
    for step in rules.gameplay.iter() {
        if let Step::Deal { cards, .. } = &step.step {
            for spec in cards.iter() {
                for rule in spec.wild_rules.iter() {
                    add(rule);
                }
            }
        }
    }
    for hand in rules.showdown.best_hand.iter() {
        for rule in hand.wild_rules.iter() {
            add(rule);
        }
    }
    labels
}

/// one line per bestHand entry, naming the evaluation and card usage
pub fn final_hand_descriptions(rules: &Rules) -> Vec<String> {
    if rules.showdown.best_hand.is_empty() {
        return vec!["Best poker hand".to_string()];
    }
    rules
        .showdown
        .best_hand
        .iter()
        .map(|hand| {
            let mut line = String::new();
            if hand.name != "Hand" {
                line.push_str(&format!("{}: ", hand.name));
            }
            line.push_str(eval_blurb(hand.eval));
            let hole = hand
                .hole_cards
                .as_ref()
                .map(|c| c.options().into_iter().max().unwrap_or(0))
                .unwrap_or(0);
            let community = hand
                .community_cards
                .as_ref()
                .map(|c| c.options().into_iter().max().unwrap_or(0))
                .unwrap_or(0);
            if hole > 0 && community > 0 {
                line.push_str(&format!(
                    " using {} hole and {} community",
                    hole, community
                ));
            } else if let Some(any) = hand.any_cards.filter(|&n| n != 5) {
                line.push_str(&format!(" ({}-card hand)", any));
            }
            if hand.qualifier.is_some() {
                line.push_str(" with qualifier");
            }
            line
        })
        .collect()
}

fn eval_blurb(kind: EvalKind) -> &'static str {
    match kind {
        EvalKind::High => "Best poker hand",
        EvalKind::HighWild | EvalKind::HighWildBug => {
            "Best poker hand with wild cards (Five of a Kind possible)"
        }
        EvalKind::High36 => "Best poker hand (36-card deck)",
        EvalKind::High20 => "Best poker hand (20-card deck)",
        EvalKind::High40Bug => "Best poker hand with bug wild (40-card deck)",
        EvalKind::A5Low => "Lowest 5 unique ranks (Ace is low); straights and flushes do not count",
        EvalKind::A5LowHigh => "Best A-5 low hand used as high",
        EvalKind::Low27 => "Lowest 5-card poker hand (Ace is high); straights and flushes count",
        EvalKind::Badugi => "Lowest 4 unique ranks and suits (Ace is low)",
        EvalKind::BadugiAh => "Lowest 4 unique ranks and suits (Ace is high)",
        EvalKind::Hidugi => "Highest 4 unique ranks and suits",
        EvalKind::Pip49 => "Closest to 49 pip count",
        EvalKind::PipZero => "Closest to zero pip count",
        EvalKind::Pip6 => "Closest to 6 pip count",
        EvalKind::Pip21 => "Closest to 21 without going over",
        EvalKind::LowPip6 => "Lowest pip count",
        EvalKind::OneCardHighSpade => "Highest single spade",
        EvalKind::TwoCardHigh => "Best 2-card poker hand",
        _ => "Best hand",
    }
}

/// "High hand / Low hand" style labels for split pots
pub fn split_pot_description(rules: &Rules) -> Option<String> {
    if rules.showdown.best_hand.len() <= 1 {
        return None;
    }
    let parts = rules
        .showdown
        .best_hand
        .iter()
        .map(|hand| {
            if hand.name != "Hand" {
                hand.name.clone()
            } else {
                match hand.eval {
                    EvalKind::A5Low | EvalKind::Low27 => "Low hand".to_string(),
                    EvalKind::High => "High hand".to_string(),
                    kind => kind.to_string(),
                }
            }
        })
        .collect::<Vec<String>>();
    Some(parts.join(" / "))
}

use super::forced::ForcedBetStyle;
use super::loader::Rules;
use super::showdown::{DeclarationMode, WildRole, WildRule, WildTarget};
use super::step::Step;
use crate::cards::deck::DeckKind;
use crate::evaluation::kind::EvalKind;
