//! The showdown resolver: per-portion card selection under usage specs,
//! qualifier enforcement with configurable fallbacks, declaration
//! handling, and per-pot odd-chip distribution.

/// a live player's cards as they stand after the final step
#[derive(Debug, Clone)]
pub(crate) struct Contender {
    pub id: PlayerId,
    pub hole: Vec<Card>,
    pub subsets: BTreeMap<String, Vec<Card>>,
}

pub(crate) struct ShowdownInput<'a> {
    pub rules: &'a ShowdownRules,
    pub pot: &'a Pot,
    pub board: &'a Board,
    /// clockwise from the seat left of the button; odd chips follow this order
    pub contenders: Vec<Contender>,
    pub declarations: &'a BTreeMap<PlayerId, Declaration>,
    pub flags: &'a BTreeSet<String>,
    /// failing a claimed portion's qualifier forfeits only that portion;
    /// when false it forfeits every claimed portion
    pub forfeit_only: bool,
}

struct Evaluation {
    ranking: HandRanking,
    used_hole: Vec<Card>,
    used_community: Vec<Card>,
    eval: EvalKind,
}

pub(crate) fn resolve(input: &ShowdownInput) -> (GameResult, BTreeMap<PlayerId, Chips>) {
    let fallback_hand = [BestHand::new("Hand", EvalKind::High)];
    let portions: &[BestHand] = {
        let active = input.rules.active_best_hands(|tag| input.flags.contains(tag));
        if active.is_empty() { &fallback_hand } else { active }
    };

    // best evaluation per player per portion
    let mut evaluations: Vec<BTreeMap<PlayerId, Evaluation>> = Vec::new();
    for portion in portions.iter() {
        let mut per_player = BTreeMap::new();
        for contender in input.contenders.iter() {
            if let Some(evaluation) = best_evaluation(portion, contender, input.board, portion.eval)
            {
                per_player.insert(contender.id.clone(), evaluation);
            }
        }
        evaluations.push(per_player);
    }

    let mut payouts: BTreeMap<PlayerId, Chips> = BTreeMap::new();
    let mut pot_results: Vec<PotResult> = Vec::new();
    let mut winning: Vec<(PlayerId, usize)> = Vec::new();

    for (pot_index, pot) in input.pot.pots().iter().enumerate() {
        pot_results.extend(settle_pot(input, pot, pot_index, portions, &evaluations));
    }
    for result in pot_results.iter() {
        distribute(result, &input.contenders, &mut payouts);
        for winner in result.winners.iter() {
            if let Some(portion_index) = portions.iter().position(|p| p.name == result.hand_type) {
                if !winning.contains(&(winner.clone(), portion_index)) {
                    winning.push((winner.clone(), portion_index));
                }
            }
        }
    }

    let mut hands: BTreeMap<PlayerId, Vec<HandResult>> = BTreeMap::new();
    for (portion_index, portion) in portions.iter().enumerate() {
        for (id, evaluation) in evaluations[portion_index].iter() {
            hands
                .entry(id.clone())
                .or_default()
                .push(hand_result(id, portion, evaluation));
        }
    }
    let winning_hands = winning
        .iter()
        .filter_map(|(id, portion_index)| {
            evaluations[*portion_index]
                .get(id)
                .map(|evaluation| hand_result(id, &portions[*portion_index], evaluation))
        })
        .collect::<Vec<HandResult>>();

    let result = GameResult {
        pots: pot_results,
        hands,
        winning_hands,
        is_complete: true,
    };
    (result, payouts)
}

/// award one pot level across the active portions
fn settle_pot(
    input: &ShowdownInput,
    pot: &SidePot,
    pot_index: usize,
    portions: &[BestHand],
    evaluations: &[BTreeMap<PlayerId, Evaluation>],
) -> Vec<PotResult> {
    let k = portions.len();
    let mut shares = vec![pot.amount / k as Chips; k];
    for extra in 0..(pot.amount as usize % k) {
        shares[extra] += 1;
    }

    // candidates per portion: eligible, live, declared, qualified
    let mut candidates: Vec<Vec<&PlayerId>> = portions
        .iter()
        .enumerate()
        .map(|(portion_index, portion)| {
            input
                .contenders
                .iter()
                .map(|c| &c.id)
                .filter(|id| pot.eligible.contains(*id))
                .filter(|id| declared(input, portion_index, portions.len(), *id))
                .filter(|id| {
                    evaluations[portion_index].get(*id).is_some_and(|e| {
                        portion
                            .qualifier
                            .map(|q| q.admits(&e.ranking))
                            .unwrap_or(true)
                    })
                })
                .collect()
        })
        .collect();

    // under the strict setting, a declarer who fails any claimed
    // portion's qualifier is out of every portion
    if input.rules.declaration_mode == DeclarationMode::Declare && !input.forfeit_only {
        let strict_failures = input
            .contenders
            .iter()
            .filter(|c| {
                portions.iter().enumerate().any(|(i, portion)| {
                    declared(input, i, k, &c.id)
                        && portion.qualifier.is_some_and(|q| {
                            evaluations[i]
                                .get(&c.id)
                                .map(|e| !q.admits(&e.ranking))
                                .unwrap_or(true)
                        })
                })
            })
            .map(|c| c.id.clone())
            .collect::<Vec<PlayerId>>();
        for portion in candidates.iter_mut() {
            portion.retain(|id| !strict_failures.iter().any(|f| f == *id));
        }
    }

    // declared-both players must win every portion outright or forfeit all
    if input.rules.declaration_mode == DeclarationMode::Declare {
        loop {
            let winners: Vec<Vec<&PlayerId>> = (0..k)
                .map(|i| best_of(&candidates[i], &evaluations[i]))
                .collect();
            let failed = input
                .declarations
                .iter()
                .filter(|&(_, &d)| d == Declaration::HighLow)
                .map(|(id, _)| id.clone())
                .filter(|id| candidates.iter().any(|c| c.iter().any(|x| *x == id)))
                .filter(|id| !winners.iter().all(|w| w.iter().any(|x| *x == id)))
                .collect::<Vec<PlayerId>>();
            if failed.is_empty() {
                break;
            }
            for portion in candidates.iter_mut() {
                portion.retain(|id| !failed.iter().any(|f| f == *id));
            }
        }
    }

    // resolve fallbacks for empty portions, possibly rolling shares around
    let mut winners_by_portion: Vec<Vec<PlayerId>> = Vec::with_capacity(k);
    let mut reasons: Vec<Option<String>> = vec![None; k];
    let mut split_fallback: Vec<bool> = vec![false; k];
    for portion_index in 0..k {
        winners_by_portion.push(
            best_of(&candidates[portion_index], &evaluations[portion_index])
                .into_iter()
                .cloned()
                .collect(),
        );
    }
    for portion_index in 0..k {
        if !winners_by_portion[portion_index].is_empty() {
            continue;
        }
        let portion = &portions[portion_index];
        match input.rules.fallback_for(&portion.name) {
            Some(DefaultAction::SplitAmongEligible) => {
                winners_by_portion[portion_index] = live_eligible(input, pot);
                reasons[portion_index] = Some("Split (No Qualifier)".to_string());
                split_fallback[portion_index] = true;
            }
            Some(DefaultAction::BestHand(kind)) => {
                let rescored = rescore(input, pot, portion, *kind);
                reasons[portion_index] = Some(format!("Best {} (no qualifier)", kind));
                winners_by_portion[portion_index] = rescored;
            }
            Some(DefaultAction::RollTo(name)) => {
                if let Some(target) = portions.iter().position(|p| &p.name == name) {
                    if target != portion_index {
                        shares[target] += shares[portion_index];
                        shares[portion_index] = 0;
                        continue;
                    }
                }
                winners_by_portion[portion_index] = live_eligible(input, pot);
                reasons[portion_index] = Some("Split (No Qualifier)".to_string());
                split_fallback[portion_index] = true;
            }
            None => {
                // no fallback configured: the portion rolls to siblings with
                // winners, else splits among the live eligible
                let siblings = (0..k)
                    .filter(|&i| i != portion_index && !winners_by_portion[i].is_empty())
                    .collect::<Vec<usize>>();
                if siblings.is_empty() {
                    winners_by_portion[portion_index] = live_eligible(input, pot);
                    reasons[portion_index] = Some("Split (No Qualifier)".to_string());
                    split_fallback[portion_index] = true;
                } else {
                    let share = shares[portion_index];
                    let per = share / siblings.len() as Chips;
                    let mut rem = share % siblings.len() as Chips;
                    for &sibling in siblings.iter() {
                        shares[sibling] += per + if rem > 0 { 1 } else { 0 };
                        rem = rem.saturating_sub(1);
                    }
                    shares[portion_index] = 0;
                }
            }
        }
    }

    // a slice whose eligible players all folded still has to pay out
    // somewhere: the live field splits it
    for portion_index in 0..k {
        if shares[portion_index] > 0 && winners_by_portion[portion_index].is_empty() {
            winners_by_portion[portion_index] =
                input.contenders.iter().map(|c| c.id.clone()).collect();
            reasons[portion_index] = Some("No eligible hand remained".to_string());
        }
    }

    // merge portions that all collapsed to the same no-qualifier split
    let mut results: Vec<PotResult> = Vec::new();
    let merged_split = split_fallback.iter().filter(|&&s| s).count() > 1
        && (0..k).filter(|&i| split_fallback[i]).all(|i| {
            winners_by_portion[i] == winners_by_portion[(0..k).find(|&j| split_fallback[j]).unwrap()]
        });
    let mut merged_amount = 0;
    for portion_index in 0..k {
        if shares[portion_index] == 0 && winners_by_portion[portion_index].is_empty() {
            continue;
        }
        if merged_split && split_fallback[portion_index] {
            merged_amount += shares[portion_index];
            continue;
        }
        results.push(build_result(
            input,
            pot,
            pot_index,
            &portions[portion_index].name,
            shares[portion_index],
            winners_by_portion[portion_index].clone(),
            reasons[portion_index].clone(),
            evaluations
                .get(portion_index)
                .map(|e| ranked_hands(&portions[portion_index], e))
                .unwrap_or_default(),
        ));
    }
    if merged_split && merged_amount > 0 {
        let first = (0..k).find(|&i| split_fallback[i]).unwrap();
        results.push(build_result(
            input,
            pot,
            pot_index,
            "Split (No Qualifier)",
            merged_amount,
            winners_by_portion[first].clone(),
            Some("Split (No Qualifier)".to_string()),
            Vec::new(),
        ));
    }
    results
}

#[allow(clippy::too_many_arguments)]
fn build_result(
    input: &ShowdownInput,
    pot: &SidePot,
    pot_index: usize,
    hand_type: &str,
    amount: Chips,
    winners: Vec<PlayerId>,
    reason: Option<String>,
    best_hands: Vec<HandResult>,
) -> PotResult {
    let declarations = match input.rules.declaration_mode {
        DeclarationMode::Declare => input
            .declarations
            .iter()
            .map(|(id, d)| (id.clone(), d.to_string()))
            .collect(),
        DeclarationMode::CardsSpeak => BTreeMap::new(),
    };
    PotResult {
        amount,
        split: winners.len() > 1,
        winners,
        pot_type: if pot_index == 0 { "main" } else { "side" }.to_string(),
        hand_type: hand_type.to_string(),
        side_pot_index: if pot_index == 0 { None } else { Some(pot_index - 1) },
        eligible_players: pot.eligible.iter().cloned().collect(),
        reason,
        best_hands,
        declarations,
    }
}

/// pay a settled portion out, odd chips to the earliest winners in
/// button order
fn distribute(
    result: &PotResult,
    contenders: &[Contender],
    payouts: &mut BTreeMap<PlayerId, Chips>,
) {
    if result.winners.is_empty() || result.amount == 0 {
        return;
    }
    let mut ordered = contenders
        .iter()
        .map(|c| &c.id)
        .filter(|id| result.winners.contains(*id))
        .collect::<Vec<&PlayerId>>();
    for id in result.winners.iter() {
        if !ordered.contains(&id) {
            ordered.push(id);
        }
    }
    let share = result.amount / ordered.len() as Chips;
    let remainder = result.amount % ordered.len() as Chips;
    for (index, id) in ordered.iter().enumerate() {
        let extra = if (index as Chips) < remainder { 1 } else { 0 };
        *payouts.entry((*id).clone()).or_default() += share + extra;
    }
}

fn declared(input: &ShowdownInput, portion_index: usize, portions: usize, id: &PlayerId) -> bool {
    if input.rules.declaration_mode == DeclarationMode::CardsSpeak || portions == 1 {
        return true;
    }
    match input.declarations.get(id) {
        None => false,
        Some(Declaration::HighLow) => true,
        // by convention the first portion is the high half
        Some(Declaration::High) => portion_index == 0,
        Some(Declaration::Low) => portion_index != 0,
    }
}

fn live_eligible(input: &ShowdownInput, pot: &SidePot) -> Vec<PlayerId> {
    input
        .contenders
        .iter()
        .map(|c| c.id.clone())
        .filter(|id| pot.eligible.contains(id))
        .collect()
}

fn best_of<'a>(
    candidates: &[&'a PlayerId],
    evaluations: &BTreeMap<PlayerId, Evaluation>,
) -> Vec<&'a PlayerId> {
    let best = candidates
        .iter()
        .filter_map(|id| evaluations.get(id.as_str()).map(|e| &e.ranking))
        .min();
    match best {
        None => Vec::new(),
        Some(best) => candidates
            .iter()
            .filter(|id| {
                evaluations
                    .get(id.as_str())
                    .map(|e| &e.ranking == best)
                    .unwrap_or(false)
            })
            .copied()
            .collect(),
    }
}

/// award under an alternate evaluation when nobody met the qualifier
fn rescore(
    input: &ShowdownInput,
    pot: &SidePot,
    portion: &BestHand,
    kind: EvalKind,
) -> Vec<PlayerId> {
    let mut best: Option<(HandRanking, Vec<PlayerId>)> = None;
    for contender in input.contenders.iter() {
        if !pot.eligible.contains(&contender.id) {
            continue;
        }
        let Some(evaluation) = best_evaluation(portion, contender, input.board, kind) else {
            continue;
        };
        let verdict = best
            .as_ref()
            .map(|(ranking, _)| evaluation.ranking.cmp(ranking))
            .unwrap_or(Ordering::Less);
        match verdict {
            Ordering::Less => best = Some((evaluation.ranking, vec![contender.id.clone()])),
            Ordering::Equal => {
                if let Some((_, ids)) = best.as_mut() {
                    ids.push(contender.id.clone());
                }
            }
            Ordering::Greater => {}
        }
    }
    best.map(|(_, ids)| ids).unwrap_or_default()
}

fn ranked_hands(
    portion: &BestHand,
    evaluations: &BTreeMap<PlayerId, Evaluation>,
) -> Vec<HandResult> {
    let mut hands = evaluations
        .iter()
        .map(|(id, evaluation)| hand_result(id, portion, evaluation))
        .collect::<Vec<HandResult>>();
    hands.sort_by_key(|h| (h.rank, h.ordered_rank));
    hands
}

fn hand_result(id: &PlayerId, portion: &BestHand, evaluation: &Evaluation) -> HandResult {
    let (hand_name, hand_description) = describe(evaluation.eval, &evaluation.ranking);
    HandResult {
        player_id: id.clone(),
        cards: evaluation.ranking.cards_used.clone(),
        hand_name,
        hand_description,
        evaluation_type: evaluation.eval.to_string(),
        hand_type: portion.name.clone(),
        community_cards: evaluation.used_community.clone(),
        used_hole_cards: evaluation.used_hole.clone(),
        rank: evaluation.ranking.rank,
        ordered_rank: evaluation.ranking.ordered_rank,
        classifications: BTreeMap::new(),
    }
}

/// the best legal card selection for one player under a portion's usage spec
fn best_evaluation(
    portion: &BestHand,
    contender: &Contender,
    board: &Board,
    eval: EvalKind,
) -> Option<Evaluation> {
    let hole: Vec<Card> = match &portion.hole_subset {
        Some(name) => contender.subsets.get(name).cloned().unwrap_or_default(),
        None => contender.hole.clone(),
    };
    let community = match &portion.subset {
        Some(name) => board.subset(name),
        None => {
            let default = board.subset(DEFAULT_SUBSET);
            if default.is_empty() && board.len() > 0 {
                board.cards().to_vec()
            } else {
                default
            }
        }
    };

    let mut best: Option<Evaluation> = None;
    for (hole_part, community_part) in selections(portion, &hole, &community) {
        let mut combined = hole_part.clone();
        combined.extend(community_part.iter().copied());
        apply_entry_wilds(&mut combined, &portion.wild_rules, &hole, &community);
        let Ok(ranking) = evaluate(&combined, eval) else {
            continue;
        };
        if best
            .as_ref()
            .map(|b| ranking < b.ranking)
            .unwrap_or(true)
        {
            best = Some(Evaluation {
                ranking,
                used_hole: hole_part,
                used_community: community_part,
                eval,
            });
        }
    }
    best
}

/// enumerate (hole part, community part) pairs the usage spec allows
fn selections(
    portion: &BestHand,
    hole: &[Card],
    community: &[Card],
) -> Vec<(Vec<Card>, Vec<Card>)> {
    if let Some(n) = portion.any_cards {
        let mut pool = hole.to_vec();
        pool.extend(community.iter().copied());
        return choose(&pool, n)
            .into_iter()
            .map(|selection| {
                let mut from_hole = Vec::new();
                let mut from_community = Vec::new();
                let mut hole_pool = hole.to_vec();
                for card in selection {
                    if let Some(i) = hole_pool.iter().position(|c| *c == card) {
                        hole_pool.remove(i);
                        from_hole.push(card);
                    } else {
                        from_community.push(card);
                    }
                }
                (from_hole, from_community)
            })
            .collect();
    }

    let hole_options = portion
        .hole_cards
        .as_ref()
        .map(Counts::options)
        .unwrap_or_else(|| vec![hole.len()]);
    let community_options = portion
        .community_cards
        .as_ref()
        .map(Counts::options)
        .unwrap_or_else(|| vec![if portion.hole_cards.is_some() { 0 } else { community.len() }]);

    let mut pairs = Vec::new();
    for &h in hole_options.iter() {
        for &c in community_options.iter() {
            for hole_part in choose(hole, h) {
                for community_part in choose(community, c) {
                    pairs.push((hole_part.clone(), community_part));
                }
            }
        }
    }
    pairs
}

/// entry-level wild clauses applied to a selection before evaluation
fn apply_entry_wilds(
    selection: &mut [Card],
    rules: &[WildRule],
    hole: &[Card],
    community: &[Card],
) {
    for rule in rules.iter() {
        let kind = match rule.role {
            WildRole::Wild => WildKind::Named,
            WildRole::Bug => WildKind::Bug,
        };
        match &rule.target {
            WildTarget::Rank(rank) => {
                for card in selection.iter_mut().filter(|c| c.rank() == *rank) {
                    card.make_wild(kind);
                }
            }
            WildTarget::Joker => {
                for card in selection.iter_mut().filter(|c| c.rank() == Rank::Joker) {
                    card.make_wild(kind);
                }
            }
            WildTarget::LowestHole => {
                if let Some(rank) = lowest_rank(hole) {
                    for card in selection.iter_mut().filter(|c| c.rank() == rank) {
                        card.make_wild(kind);
                    }
                }
            }
            WildTarget::LowestCommunity => {
                if let Some(rank) = lowest_rank(community) {
                    for card in selection.iter_mut().filter(|c| c.rank() == rank) {
                        card.make_wild(kind);
                    }
                }
            }
            WildTarget::LastCommunityCard => {
                if let Some(last) = community.last() {
                    for card in selection.iter_mut().filter(|c| *c == last) {
                        card.make_wild(kind);
                    }
                }
            }
        }
    }
}

/// lowest by deuce-low, ace-high convention
fn lowest_rank(cards: &[Card]) -> Option<Rank> {
    cards
        .iter()
        .filter(|c| c.rank() != Rank::Joker)
        .map(|c| c.rank())
        .min()
}

use super::result::{GameResult, HandResult, PotResult};
use crate::Chips;
use crate::PlayerId;
use crate::betting::Declaration;
use crate::betting::pot::{Pot, SidePot};
use crate::cards::board::{Board, DEFAULT_SUBSET};
use crate::cards::card::{Card, WildKind};
use crate::cards::rank::Rank;
use crate::evaluation::describe::describe;
use crate::evaluation::evaluator::{choose, evaluate};
use crate::evaluation::kind::EvalKind;
use crate::evaluation::ranking::HandRanking;
use crate::rules::showdown::{
    BestHand, Counts, DeclarationMode, DefaultAction, ShowdownRules, WildRole, WildRule, WildTarget,
};
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
