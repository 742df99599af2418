/// One betting level: the main pot or a side pot.
#[derive(Debug, Clone, Default)]
pub struct SidePot {
    pub amount: Chips,
    /// cumulative per-player contribution ceiling this pot collects up to
    pub bet_level: Chips,
    /// players who can win from this pot
    pub eligible: BTreeSet<PlayerId>,
    /// contributors who are neither folded nor all-in
    pub active: BTreeSet<PlayerId>,
    pub capped: bool,
    pub cap: Chips,
}

/// Main/side pot structure, rebuilt from per-player totals on every bet.
///
/// Rebuilding from totals sidesteps the incremental-mutation edge cases:
/// the sorted all-in levels fully determine the pot layout.
#[derive(Debug, Clone, Default)]
pub struct Pot {
    contributions: BTreeMap<PlayerId, Chips>,
    antes: BTreeMap<PlayerId, Chips>,
    all_in: BTreeSet<PlayerId>,
    folded: BTreeSet<PlayerId>,
    pots: Vec<SidePot>,
}

impl Pot {
    pub fn new() -> Self {
        let mut pot = Self::default();
        pot.rebuild();
        pot
    }

    /// record a bet toward the round's level
    pub fn post(&mut self, id: &PlayerId, amount: Chips, all_in: bool) {
        *self.contributions.entry(id.clone()).or_default() += amount;
        if all_in {
            self.all_in.insert(id.clone());
        }
        log::debug!(
            "{} posts {} (total {}{})",
            id,
            amount,
            self.contributions[id],
            if all_in { ", all in" } else { "" }
        );
        self.rebuild();
        self.assert_invariants();
    }

    /// antes join the main pot but never count toward a betting level
    pub fn post_ante(&mut self, id: &PlayerId, amount: Chips, all_in: bool) {
        *self.antes.entry(id.clone()).or_default() += amount;
        if all_in {
            self.all_in.insert(id.clone());
        }
        log::debug!("{} antes {}", id, amount);
        self.rebuild();
        self.assert_invariants();
    }

    pub fn fold(&mut self, id: &PlayerId) {
        self.folded.insert(id.clone());
        self.rebuild();
    }

    pub fn total(&self) -> Chips {
        self.contributions.values().sum::<Chips>() + self.antes.values().sum::<Chips>()
    }
    pub fn ante_total(&self) -> Chips {
        self.antes.values().sum()
    }
    pub fn contribution(&self, id: &PlayerId) -> Chips {
        self.contributions.get(id).copied().unwrap_or(0)
    }
    pub fn is_all_in(&self, id: &PlayerId) -> bool {
        self.all_in.contains(id)
    }

    /// main pot first, then side pots in level order
    pub fn pots(&self) -> &[SidePot] {
        &self.pots
    }
    pub fn main(&self) -> &SidePot {
        self.pots.first().expect("main pot always exists")
    }
    pub fn side_pots(&self) -> &[SidePot] {
        &self.pots[1..]
    }

    pub fn reset(&mut self) {
        self.contributions.clear();
        self.antes.clear();
        self.all_in.clear();
        self.folded.clear();
        self.rebuild();
    }

    fn rebuild(&mut self) {
        let mut levels = self
            .all_in
            .iter()
            .filter_map(|id| self.contributions.get(id))
            .copied()
            .filter(|&c| c > 0)
            .collect::<Vec<Chips>>();
        levels.sort_unstable();
        levels.dedup();

        let mut pots = Vec::with_capacity(levels.len() + 1);
        let mut prev = 0;
        for &level in levels.iter() {
            pots.push(self.slice(prev, Some(level)));
            prev = level;
        }
        let top = self.slice(prev, None);
        if top.amount > 0 || pots.is_empty() {
            pots.push(top);
        }
        // antes live in the main pot regardless of levels
        if let Some(main) = pots.first_mut() {
            main.amount += self.antes.values().sum::<Chips>();
            for (id, &ante) in self.antes.iter() {
                if ante > 0 {
                    main.eligible.insert(id.clone());
                }
            }
        }
        self.pots = pots;
    }

    /// collect each player's contribution in (prev, level], or everything
    /// above prev when the slice is uncapped
    fn slice(&self, prev: Chips, level: Option<Chips>) -> SidePot {
        let mut pot = SidePot::default();
        let mut top_seen = prev;
        for (id, &total) in self.contributions.iter() {
            let ceiling = level.map(|l| total.min(l)).unwrap_or(total);
            let share = ceiling.saturating_sub(prev.min(ceiling));
            if share > 0 {
                pot.amount += share;
                pot.eligible.insert(id.clone());
                if !self.all_in.contains(id) && !self.folded.contains(id) {
                    pot.active.insert(id.clone());
                }
            }
            top_seen = top_seen.max(ceiling);
        }
        match level {
            Some(level) => {
                pot.bet_level = level;
                pot.capped = true;
                pot.cap = level;
            }
            None => {
                pot.bet_level = top_seen;
            }
        }
        pot
    }

    /// (a) amounts match contributions, (b) every contributor is eligible
    /// somewhere, (c) capped pots respect their caps per contributor.
    pub fn check_invariants(&self) -> Result<(), String> {
        let pot_total = self.pots.iter().map(|p| p.amount).sum::<Chips>();
        if pot_total != self.total() {
            return Err(format!(
                "pot total {} != contribution total {}",
                pot_total,
                self.total()
            ));
        }
        for (id, &amount) in self.contributions.iter().chain(self.antes.iter()) {
            if amount > 0 && !self.pots.iter().any(|p| p.eligible.contains(id)) {
                return Err(format!("{} contributed but is eligible nowhere", id));
            }
        }
        let mut prev = 0;
        for pot in self.pots.iter().filter(|p| p.capped) {
            if pot.cap <= prev {
                return Err(format!("pot caps not strictly increasing at {}", pot.cap));
            }
            prev = pot.cap;
        }
        Ok(())
    }

    fn assert_invariants(&self) {
        if let Err(violation) = self.check_invariants() {
            panic!("pot invariant violated: {}", violation);
        }
    }
}

use crate::Chips;
use crate::PlayerId;
use std::collections::{BTreeMap, BTreeSet};

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> PlayerId {
        s.to_string()
    }

    #[test]
    fn single_pot_without_all_ins() {
        let mut pot = Pot::new();
        pot.post(&id("a"), 100, false);
        pot.post(&id("b"), 100, false);
        pot.post(&id("c"), 100, false);
        assert_eq!(pot.total(), 300);
        assert_eq!(pot.pots().len(), 1);
        assert_eq!(pot.main().amount, 300);
        assert!(!pot.main().capped);
        assert_eq!(pot.main().eligible.len(), 3);
    }

    #[test]
    fn all_in_cascade_builds_expected_side_pots() {
        // P1 300 all in, P2 500 all in, P3 900 all in, P4 calls 900
        let mut pot = Pot::new();
        pot.post(&id("p1"), 300, true);
        pot.post(&id("p2"), 500, true);
        pot.post(&id("p3"), 900, true);
        pot.post(&id("p4"), 900, false);
        assert_eq!(pot.total(), 2600);

        let pots = pot.pots();
        assert_eq!(pots.len(), 3);
        assert_eq!(pots[0].amount, 1200);
        assert_eq!(pots[0].eligible.len(), 4);
        assert_eq!(pots[1].amount, 600);
        assert_eq!(
            pots[1].eligible,
            ["p2", "p3", "p4"].iter().map(|s| s.to_string()).collect::<BTreeSet<PlayerId>>()
        );
        assert_eq!(pots[2].amount, 800);
        assert_eq!(
            pots[2].eligible,
            ["p3", "p4"].iter().map(|s| s.to_string()).collect::<BTreeSet<PlayerId>>()
        );
        assert_eq!(1200 + 600 + 800, 2600);
        assert!(pots[0].capped && pots[1].capped && pots[2].capped);
        assert!(pot.check_invariants().is_ok());
    }

    #[test]
    fn short_all_in_splits_the_main_pot() {
        let mut pot = Pot::new();
        pot.post(&id("a"), 100, false);
        pot.post(&id("b"), 100, false);
        pot.post(&id("c"), 40, true);
        let pots = pot.pots();
        assert_eq!(pots.len(), 2);
        assert_eq!(pots[0].amount, 120); // 40 from each
        assert_eq!(pots[0].cap, 40);
        assert_eq!(pots[1].amount, 120); // the overage from a and b
        assert!(!pots[1].capped);
        assert!(!pots[1].eligible.contains(&id("c")));
    }

    #[test]
    fn antes_join_the_main_pot_without_setting_a_level() {
        let mut pot = Pot::new();
        pot.post_ante(&id("a"), 10, false);
        pot.post_ante(&id("b"), 10, false);
        pot.post(&id("a"), 50, false);
        pot.post(&id("b"), 50, false);
        assert_eq!(pot.total(), 120);
        assert_eq!(pot.ante_total(), 20);
        assert_eq!(pot.main().amount, 120);
        assert_eq!(pot.contribution(&id("a")), 50); // bets only
    }

    #[test]
    fn ante_only_contributor_is_still_eligible() {
        let mut pot = Pot::new();
        pot.post_ante(&id("a"), 10, true); // all in on the ante
        pot.post(&id("b"), 50, false);
        assert!(pot.main().eligible.contains(&id("a")));
        assert!(pot.check_invariants().is_ok());
    }

    #[test]
    fn contributions_rebuild_identically_across_rounds() {
        let mut pot = Pot::new();
        pot.post(&id("a"), 20, false);
        pot.post(&id("b"), 20, false);
        pot.post(&id("a"), 40, false);
        pot.post(&id("b"), 40, false);
        assert_eq!(pot.main().amount, 120);
        assert_eq!(pot.contribution(&id("a")), 60);
    }
}
