/// Table stakes for one game instance. Limit games read the small/big
/// bets; blind games read the blinds; stud games read ante and bring-in.
#[derive(Debug, Clone, Copy, Default)]
pub struct Stakes {
    pub small_blind: Chips,
    pub big_blind: Chips,
    pub small_bet: Chips,
    pub big_bet: Chips,
    pub ante: Chips,
    pub bring_in: Chips,
}

impl Stakes {
    pub fn blinds(small_blind: Chips, big_blind: Chips) -> Self {
        Self {
            small_blind,
            big_blind,
            small_bet: big_blind,
            big_bet: big_blind * 2,
            ..Self::default()
        }
    }
    pub fn limit(small_bet: Chips, big_bet: Chips) -> Self {
        Self {
            small_blind: small_bet / 2,
            big_blind: small_bet,
            small_bet,
            big_bet,
            ..Self::default()
        }
    }
    pub fn with_blinds(mut self, small_blind: Chips, big_blind: Chips) -> Self {
        self.small_blind = small_blind;
        self.big_blind = big_blind;
        self
    }
    pub fn with_ante(mut self, ante: Chips) -> Self {
        self.ante = ante;
        self
    }
    pub fn with_bring_in(mut self, bring_in: Chips) -> Self {
        self.bring_in = bring_in;
        self
    }
}

#[derive(Debug, Clone)]
pub struct GameOptions {
    /// advance through non-player steps without explicit `next_step` calls
    pub auto_progress: bool,
    /// limit-game raises allowed after the opening bet
    pub raise_cap: usize,
    /// a declared player failing a qualifier forfeits only that portion
    pub forfeit_failed_declarer: bool,
    pub rng_seed: Option<u64>,
}

impl Default for GameOptions {
    fn default() -> Self {
        Self {
            auto_progress: true,
            raise_cap: crate::MAX_RAISE_REPEATS,
            forfeit_failed_declarer: true,
            rng_seed: None,
        }
    }
}

/// what the interpreter is waiting on
#[derive(Debug, Clone)]
enum Awaiting {
    Nothing,
    BringIn,
    BetRound,
    Acting(Step),
    Grouped(Vec<Step>, usize),
}

/// A single-table game instance: one variant, one structure, one hand at a
/// time. The interpreter walks the variant's gameplay steps, pausing at
/// player decisions.
pub struct Game {
    rules: Arc<Rules>,
    structure: BettingStructure,
    stakes: Stakes,
    buyin: RangeInclusive<Chips>,
    options: GameOptions,
    table: Table,
    state: GameState,
    step: usize,
    hand_running: bool,
    hands_played: usize,
    bets: BetState,
    pot: Pot,
    rng: SmallRng,
    current: Option<PlayerId>,
    queue: VecDeque<PlayerId>,
    awaiting: Awaiting,
    betting_round: usize,
    carry_bet: bool,
    last_actor: Option<PlayerId>,
    declarations: BTreeMap<PlayerId, Declaration>,
    choices: BTreeMap<PlayerId, String>,
    flags: BTreeSet<String>,
    active_wild_rules: Vec<WildRule>,
    pending_passes: Vec<(PlayerId, Vec<Card>, PassDirection)>,
    results: Option<GameResult>,
}

impl Game {
    pub fn new(
        rules: Rules,
        structure: BettingStructure,
        stakes: Stakes,
        buyin: RangeInclusive<Chips>,
        options: GameOptions,
    ) -> Result<Self, EngineError> {
        if !rules.allows(structure) {
            return Err(EngineError::StructureNotAllowed(structure));
        }
        let table = Table::new(rules.deck, rules.jokers, rules.max_players);
        let rng = match options.rng_seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_os_rng(),
        };
        Ok(Self {
            bets: BetState::new(structure, options.raise_cap),
            pot: Pot::new(),
            rng,
            rules: Arc::new(rules),
            structure,
            stakes,
            buyin,
            options,
            table,
            state: GameState::Waiting,
            step: 0,
            hand_running: false,
            hands_played: 0,
            current: None,
            queue: VecDeque::new(),
            awaiting: Awaiting::Nothing,
            betting_round: 0,
            carry_bet: false,
            last_actor: None,
            declarations: BTreeMap::new(),
            choices: BTreeMap::new(),
            flags: BTreeSet::new(),
            active_wild_rules: Vec::new(),
            pending_passes: Vec::new(),
            results: None,
        })
    }

    pub fn add_player(
        &mut self,
        id: impl Into<PlayerId>,
        name: impl Into<String>,
        buyin: Chips,
    ) -> Result<(), EngineError> {
        if self.hand_running {
            return Err(EngineError::HandInProgress);
        }
        if !self.buyin.contains(&buyin) {
            return Err(EngineError::InvalidBuyin(buyin));
        }
        self.table.add_player(Player::new(id, name, buyin))
    }
    pub fn remove_player(&mut self, id: &PlayerId) {
        if !self.hand_running {
            self.table.remove_player(id);
        }
    }

    /// Start a hand: reset the table, move the button (after the first
    /// hand), post step zero. With `auto_progress` the interpreter runs
    /// forward until a player must act.
    pub fn start_hand(&mut self, shuffle: bool) -> Result<(), EngineError> {
        if self.hand_running {
            return Err(EngineError::HandInProgress);
        }
        let funded = self.table.players().iter().filter(|p| p.stack > 0).count();
        if funded < self.rules.min_players {
            return Err(EngineError::NotEnoughPlayers {
                needed: self.rules.min_players,
                have: funded,
            });
        }
        self.table.reset_for_hand();
        if self.hands_played > 0 {
            self.table.move_button();
        }
        self.table.assign_positions();
        if shuffle {
            self.table.deck.shuffle(&mut self.rng);
        }
        self.pot.reset();
        self.bets = BetState::new(self.structure, self.options.raise_cap);
        self.declarations.clear();
        self.choices.clear();
        self.flags.clear();
        self.active_wild_rules.clear();
        self.pending_passes.clear();
        self.results = None;
        self.current = None;
        self.queue.clear();
        self.awaiting = Awaiting::Nothing;
        self.betting_round = 0;
        self.carry_bet = false;
        self.last_actor = None;
        self.step = 0;
        self.hand_running = true;
        self.hands_played += 1;
        log::info!("starting hand {} of {}", self.hands_played, self.rules.game);
        self.execute_step()?;
        self.auto_run()
    }

    /// advance past a non-player step
    pub fn next_step(&mut self) -> Result<(), EngineError> {
        if !self.hand_running {
            return Err(EngineError::NoHand);
        }
        self.advance_step()
    }

    pub fn state(&self) -> GameState {
        self.state
    }
    pub fn current_player(&self) -> Option<&PlayerId> {
        self.current.as_ref()
    }
    pub fn current_step(&self) -> usize {
        self.step
    }
    pub fn results(&self) -> Option<&GameResult> {
        self.results.as_ref()
    }
    pub fn rules(&self) -> &Rules {
        &self.rules
    }
    pub fn table(&self) -> &Table {
        &self.table
    }
    pub fn pot_total(&self) -> Chips {
        self.pot.total()
    }
    pub fn main_pot_amount(&self) -> Chips {
        self.pot.main().amount
    }
    pub fn side_pots(&self) -> &[crate::betting::pot::SidePot] {
        self.pot.side_pots()
    }
    pub fn ante_total(&self) -> Chips {
        self.pot.ante_total()
    }
    pub fn current_bet(&self) -> Chips {
        self.bets.current_bet
    }
    pub fn round_bet(&self, id: &PlayerId) -> Option<&crate::betting::round::RoundBet> {
        self.bets.round_bet(id)
    }
    /// what a player picked at a choose step this hand, if anything
    pub fn choice_of(&self, id: &PlayerId) -> Option<&str> {
        self.choices.get(id).map(String::as_str)
    }

    /// "$1/$2 No Limit Hold'em" and friends
    pub fn description(&self) -> String {
        match self.structure {
            BettingStructure::Limit => format!(
                "${}/${} Limit {}",
                self.stakes.small_bet, self.stakes.big_bet, self.rules.game
            ),
            structure => format!(
                "${}/${} {} {}",
                self.stakes.small_blind, self.stakes.big_blind, structure, self.rules.game
            ),
        }
    }

    /// Reorder the deck so upcoming deals pop the given cards in order.
    /// Test support; meaningful with `start_hand(false)`.
    pub fn stack_deck(&mut self, upcoming: &[Card]) {
        let mut rest = Deck::new(self.rules.deck, self.rules.jokers);
        for card in upcoming {
            rest.remove(card);
        }
        let mut cards = rest.cards().to_vec();
        cards.extend(upcoming.iter().rev().copied());
        let mut deck = Deck::empty();
        deck.extend(cards);
        self.table.deck = deck;
    }

    // ------------------------------------------------------------------
    // step machinery

    fn advance_step(&mut self) -> Result<(), EngineError> {
        if self.state == GameState::Complete {
            return Ok(());
        }
        self.step += 1;
        if self.step >= self.rules.gameplay.len() {
            return Err(EngineError::StepOutOfRange(self.step));
        }
        self.execute_step()
    }

    fn auto_run(&mut self) -> Result<(), EngineError> {
        while self.options.auto_progress
            && self.hand_running
            && self.state != GameState::Complete
            && matches!(self.awaiting, Awaiting::Nothing)
        {
            self.advance_step()?;
        }
        Ok(())
    }

    fn execute_step(&mut self) -> Result<(), EngineError> {
        let game_step = self
            .rules
            .gameplay
            .get(self.step)
            .ok_or(EngineError::StepOutOfRange(self.step))?
            .clone();
        log::debug!("step {}: {}", self.step, game_step.name);
        self.awaiting = Awaiting::Nothing;
        self.current = None;
        self.queue.clear();
        match game_step.step {
            Step::Bet(BetKind::Blinds) => self.post_blinds(),
            Step::Bet(BetKind::Antes) => self.post_antes(),
            Step::Bet(BetKind::BringIn) => self.start_bring_in(),
            Step::Bet(kind) => self.start_bet_round(&kind),
            Step::Deal {
                target,
                cards,
                condition,
            } => self.deal(target, &cards, condition.as_ref())?,
            Step::RollDie => self.roll_die(),
            Step::Remove { subset, number } => self.remove_community(&subset, number),
            Step::Showdown => self.run_showdown(),
            Step::Grouped(steps) => self.start_grouped(steps),
            step => self.start_player_step(step),
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // forced bets

    fn forced_rule(&self) -> ForcedBetRule {
        self.rules
            .forced_bets
            .resolve(|tag| self.flags.contains(tag))
            .clone()
    }
    fn card_rule(&self) -> CardRule {
        self.forced_rule().rule.unwrap_or(CardRule::LowCard)
    }

    fn post_blinds(&mut self) {
        self.state = GameState::Betting;
        self.bets.begin_round(self.stakes.small_bet, false);
        let dealer_blind = self.stakes.small_blind == 0
            && self.rules.betting_order.initial == FirstActor::Dealer
            && self.stakes.ante > 0;
        if dealer_blind {
            let dealer = self.table.position_order().first().cloned();
            if let Some(dealer) = dealer {
                self.post_blind(&dealer, self.stakes.big_blind);
                self.post_one_ante(&dealer);
            }
        } else {
            let small = self
                .table
                .seat_with(Position::SmallBlind)
                .map(|p| p.id.clone());
            let big = self
                .table
                .seat_with(Position::BigBlind)
                .map(|p| p.id.clone());
            if let Some(id) = small.filter(|_| self.stakes.small_blind > 0) {
                self.post_blind(&id, self.stakes.small_blind);
            }
            if let Some(id) = big {
                self.post_blind(&id, self.stakes.big_blind);
                if self.stakes.ante > 0 {
                    self.post_one_ante(&id);
                }
            }
        }
        self.bets.register_level(self.stakes.big_blind, true);
        self.carry_bet = true;
    }

    fn post_blind(&mut self, id: &PlayerId, amount: Chips) {
        let paid = self
            .table
            .player_mut(id)
            .map(|p| p.pay(amount))
            .unwrap_or(0);
        let all_in = self.table.player(id).map(|p| p.all_in).unwrap_or(false);
        self.bets.put(id, paid, true);
        self.pot.post(id, paid, all_in);
        log::debug!("{} posts blind {}", id, paid);
    }

    fn post_one_ante(&mut self, id: &PlayerId) {
        let paid = self
            .table
            .player_mut(id)
            .map(|p| p.pay(self.stakes.ante))
            .unwrap_or(0);
        let all_in = self.table.player(id).map(|p| p.all_in).unwrap_or(false);
        self.pot.post_ante(id, paid, all_in);
    }

    fn post_antes(&mut self) {
        self.state = GameState::Betting;
        if self.stakes.ante == 0 {
            return;
        }
        for id in self.table.position_order() {
            if self.table.player(&id).map(|p| p.active).unwrap_or(false) {
                self.post_one_ante(&id);
            }
        }
    }

    fn start_bring_in(&mut self) {
        self.state = GameState::Betting;
        self.bets.begin_round(self.stakes.small_bet, false);
        self.betting_round = 1;
        self.carry_bet = true;
        let chooser = bringin::first_to_act(&self.table.visible_hands(), 1, self.card_rule());
        match chooser {
            Some(id) => {
                self.queue = VecDeque::from([id.clone()]);
                self.current = Some(id);
                self.awaiting = Awaiting::BringIn;
            }
            None => log::warn!("no bring-in player could be determined"),
        }
    }

    fn bet_unit_for(&self, kind: &BetKind) -> Chips {
        let limit_unit = match kind {
            BetKind::Big => self.stakes.big_bet,
            BetKind::Named(name) => match self.rules.named_bets.get(name) {
                Some(multiplier) => self.stakes.small_bet * multiplier,
                None => {
                    log::warn!("unknown named bet '{}', using the small bet", name);
                    self.stakes.small_bet
                }
            },
            _ => self.stakes.small_bet,
        };
        match self.structure {
            BettingStructure::Limit => limit_unit,
            _ => self.stakes.big_blind.max(1),
        }
    }

    fn start_bet_round(&mut self, kind: &BetKind) {
        self.state = GameState::Betting;
        let unit = self.bet_unit_for(kind);
        let carry = self.carry_bet;
        self.carry_bet = false;
        self.bets.begin_round(unit, carry);

        let first = if carry && self.betting_round == 0 {
            self.betting_round = 1;
            self.first_actor(true)
        } else if carry {
            self.last_actor
                .as_ref()
                .and_then(|id| self.table.next_where(id, Player::can_act))
        } else {
            self.betting_round += 1;
            self.first_actor(self.betting_round == 1)
        };

        let live = self.table.players().iter().filter(|p| p.is_live()).count();
        if live <= 1 {
            self.awaiting = Awaiting::Nothing;
            return;
        }
        let Some(first) = first else {
            return;
        };
        self.queue = self.queue_from(&first);
        self.current = self.queue.front().cloned();
        if self.current.is_some() {
            self.awaiting = Awaiting::BetRound;
        }
    }

    /// players able to act, clockwise, starting at `first` inclusive
    fn queue_from(&self, first: &PlayerId) -> VecDeque<PlayerId> {
        let mut queue = VecDeque::new();
        let start = self
            .table
            .player(first)
            .filter(|p| p.can_act())
            .map(|p| p.id.clone())
            .or_else(|| self.table.next_where(first, Player::can_act));
        let Some(start) = start else {
            return queue;
        };
        queue.push_back(start.clone());
        let mut cursor = start.clone();
        while let Some(next) = self.table.next_where(&cursor, Player::can_act) {
            if next == start {
                break;
            }
            queue.push_back(next.clone());
            cursor = next;
        }
        queue
    }

    fn first_actor(&self, initial: bool) -> Option<PlayerId> {
        let actor = if initial {
            self.rules.betting_order.initial
        } else {
            *self
                .rules
                .betting_order
                .subsequent
                .resolve(|tag| self.flags.contains(tag))
        };
        let nominal = match actor {
            FirstActor::AfterBigBlind => {
                let big = self.table.seat_with(Position::BigBlind)?.id.clone();
                self.table.next_where(&big, Player::can_act)
            }
            FirstActor::Dealer => {
                let dealer = self.table.position_order().first()?.clone();
                self.table.next_where(&dealer, Player::can_act)
            }
            FirstActor::BringIn => {
                bringin::first_to_act(&self.table.visible_hands(), 1, self.card_rule())
            }
            FirstActor::HighHand => bringin::first_to_act(
                &self.table.visible_hands(),
                self.betting_round.max(2),
                self.card_rule(),
            ),
            FirstActor::LastActor => self.last_actor.clone(),
        }?;
        self.table
            .player(&nominal)
            .filter(|p| p.can_act())
            .map(|p| p.id.clone())
            .or_else(|| self.table.next_where(&nominal, Player::can_act))
    }

    // ------------------------------------------------------------------
    // dealing and automatic steps

    fn deal(
        &mut self,
        target: DealTarget,
        cards: &[CardSpec],
        condition: Option<&DealCondition>,
    ) -> Result<(), EngineError> {
        self.state = GameState::Dealing;
        match target {
            DealTarget::Player => {
                for spec in cards {
                    let slots = [(spec.number, spec.state)];
                    let subset = spec.subsets.first().map(String::as_str);
                    self.table.deal_hole_cards(&slots, subset)?;
                    self.active_wild_rules.extend(spec.wild_rules.iter().cloned());
                }
            }
            DealTarget::Community => {
                for spec in cards {
                    self.table
                        .deal_community(spec.number, &spec.subsets, spec.state)?;
                    self.active_wild_rules.extend(spec.wild_rules.iter().cloned());
                }
                if let Some(condition) = condition {
                    self.check_deal_condition(cards, condition);
                }
            }
        }
        self.apply_wild_marks();
        Ok(())
    }

    fn check_deal_condition(&mut self, cards: &[CardSpec], condition: &DealCondition) {
        let subset = cards
            .iter()
            .find_map(|spec| spec.subsets.first().cloned())
            .unwrap_or_else(|| DEFAULT_SUBSET.to_string());
        let count = self
            .table
            .board
            .subset(&subset)
            .iter()
            .filter(|card| card.color() == Some(condition.color))
            .count();
        if count >= condition.min_count {
            log::debug!("deal condition '{}' raised", condition.raises);
            self.flags.insert(condition.raises.clone());
        }
    }

    /// rank- and joker-based wild designations from deal steps cover every
    /// card on the table, including ones dealt later
    fn apply_wild_marks(&mut self) {
        let rules = self.active_wild_rules.clone();
        for rule in rules.iter() {
            let kind = match rule.role {
                WildRole::Wild => WildKind::Named,
                WildRole::Bug => WildKind::Bug,
            };
            let matches = |card: &Card| match &rule.target {
                WildTarget::Rank(rank) => card.rank() == *rank,
                WildTarget::Joker => card.rank() == Rank::Joker,
                _ => false,
            };
            for player in self.table.players_mut() {
                let held = player.hand.cards().to_vec();
                for card in held.iter().filter(|c| matches(c)) {
                    if let Some(card) = player.hand.get_mut(card) {
                        card.make_wild(kind);
                    }
                }
            }
            let on_board = self.table.board.cards().to_vec();
            for card in on_board.iter().filter(|c| matches(c)) {
                if let Some(card) = self.table.board.get_mut(card) {
                    card.make_wild(kind);
                }
            }
        }
    }

    fn roll_die(&mut self) {
        self.state = GameState::Dealing;
        let roll = self.rng.random_range(1..=6);
        log::info!("die roll: {}", roll);
        self.flags.insert(format!("die:{}", roll));
    }

    fn remove_community(&mut self, subset: &str, number: usize) {
        self.state = GameState::Dealing;
        for _ in 0..number {
            let Some(card) = self.table.board.subset(subset).last().copied() else {
                break;
            };
            if let Some(card) = self.table.board.remove(&card) {
                self.table.discards.push(card);
            }
        }
    }

    // ------------------------------------------------------------------
    // player-driven steps

    fn drawing_order(&self) -> VecDeque<PlayerId> {
        let order = self.table.position_order();
        let mut queue: VecDeque<PlayerId> = order
            .into_iter()
            .filter(|id| self.table.player(id).map(Player::is_live).unwrap_or(false))
            .collect();
        // act from the seat after the button, the button last
        if let Some(button) = queue.pop_front() {
            queue.push_back(button);
        }
        queue
    }

    fn start_player_step(&mut self, step: Step) {
        self.state = GameState::Drawing;
        self.pending_passes.clear();
        self.queue = self.drawing_order();
        self.current = self.queue.front().cloned();
        if self.current.is_some() {
            self.awaiting = Awaiting::Acting(step);
        } else {
            self.awaiting = Awaiting::Nothing;
        }
    }

    fn start_grouped(&mut self, steps: Vec<Step>) {
        self.state = GameState::Drawing;
        if let Some(Step::Bet(kind)) = steps.iter().find(|s| matches!(s, Step::Bet(_))) {
            let unit = self.bet_unit_for(kind);
            self.bets.begin_round(unit, false);
            self.betting_round += 1;
        }
        self.queue = self.drawing_order();
        self.current = self.queue.front().cloned();
        if self.current.is_some() {
            self.awaiting = Awaiting::Grouped(steps, 0);
        } else {
            self.awaiting = Awaiting::Nothing;
        }
    }

    // ------------------------------------------------------------------
    // action surface

    pub fn valid_actions(&self, id: &PlayerId) -> Vec<ValidAction> {
        if self.current.as_ref() != Some(id) {
            return Vec::new();
        }
        match &self.awaiting {
            Awaiting::Nothing => Vec::new(),
            Awaiting::BringIn => self.bring_in_actions(id),
            Awaiting::BetRound => self.bet_actions(id),
            Awaiting::Acting(step) => self.step_actions(id, step),
            Awaiting::Grouped(steps, index) => match steps.get(*index) {
                Some(Step::Bet(_)) => self.bet_actions(id),
                Some(step) => self.step_actions(id, step),
                None => Vec::new(),
            },
        }
    }

    fn bring_in_actions(&self, id: &PlayerId) -> Vec<ValidAction> {
        let stack = self.table.player(id).map(|p| p.stack).unwrap_or(0);
        let bring = self.stakes.bring_in.min(stack);
        let complete = self.bets.bet_unit.min(stack);
        vec![
            ValidAction::new(ActionKind::BringIn, bring, bring),
            ValidAction::new(ActionKind::Complete, complete, complete),
        ]
    }

    fn bet_actions(&self, id: &PlayerId) -> Vec<ValidAction> {
        let Some(player) = self.table.player(id) else {
            return Vec::new();
        };
        let contribution = self.bets.contribution(id);
        let to_call = self.bets.to_call(id);
        let all_in_total = contribution + player.stack;
        let mut actions = Vec::new();

        // folding out of turn order is never forced, but always legal
        actions.push(ValidAction::bare(ActionKind::Fold));
        if to_call == 0 {
            actions.push(ValidAction::bare(ActionKind::Check));
        } else {
            let call = to_call.min(player.stack);
            actions.push(ValidAction::new(ActionKind::Call, call, call));
        }
        if self.structure == BettingStructure::Limit
            && self.bets.current_bet > 0
            && self.bets.current_bet < self.bets.bet_unit
        {
            let complete = self.bets.bet_unit.min(all_in_total);
            actions.push(ValidAction::new(ActionKind::Complete, complete, complete));
        }
        if self.bets.current_bet == 0 {
            let (min, max) = self.open_range(id);
            if max > 0 {
                actions.push(ValidAction::new(ActionKind::Bet, min.min(max), max));
            }
        } else if self.bets.may_raise() && all_in_total > self.bets.current_bet {
            let (min, max) = self.raise_range(id);
            if max > self.bets.current_bet {
                actions.push(ValidAction::new(ActionKind::Raise, min.min(max), max));
            }
        }
        actions
    }

    /// opening bet bounds as round totals
    fn open_range(&self, id: &PlayerId) -> (Chips, Chips) {
        let player = self.table.player(id).expect("acting player is seated");
        let all_in_total = self.bets.contribution(id) + player.stack;
        match self.structure {
            BettingStructure::Limit => {
                let unit = self.bets.bet_unit.min(all_in_total);
                (unit, unit)
            }
            BettingStructure::NoLimit => (self.bets.bet_unit.min(all_in_total), all_in_total),
            BettingStructure::PotLimit => {
                let cap = self.pot.total().max(self.bets.bet_unit);
                (self.bets.bet_unit.min(all_in_total), cap.min(all_in_total))
            }
        }
    }

    /// raise-to bounds as round totals
    fn raise_range(&self, id: &PlayerId) -> (Chips, Chips) {
        let player = self.table.player(id).expect("acting player is seated");
        let all_in_total = self.bets.contribution(id) + player.stack;
        let min = self.bets.min_raise_to();
        match self.structure {
            BettingStructure::Limit => {
                let to = min.min(all_in_total);
                (to, to)
            }
            BettingStructure::NoLimit => (min.min(all_in_total), all_in_total),
            BettingStructure::PotLimit => {
                let to_call = self.bets.to_call(id);
                let cap = self.bets.pot_limit_raise_to(self.pot.total(), to_call);
                (min.min(all_in_total), cap.min(all_in_total))
            }
        }
    }

    fn step_actions(&self, id: &PlayerId, step: &Step) -> Vec<ValidAction> {
        let counts = |specs: &[CardSpec], default_min: Option<usize>| {
            let max: usize = specs.iter().map(|s| s.number).sum();
            let min: usize = specs
                .iter()
                .map(|s| s.min_number.unwrap_or(default_min.unwrap_or(s.number)))
                .sum();
            (min as Chips, max as Chips)
        };
        match step {
            Step::Draw(specs) => {
                let (min, max) = counts(specs, Some(0));
                vec![ValidAction::new(ActionKind::Draw, min, max)]
            }
            Step::Discard(specs) => {
                let (min, max) = counts(specs, None);
                vec![ValidAction::new(ActionKind::Discard, min, max)]
            }
            Step::Expose(specs) => {
                let (min, max) = counts(specs, None);
                vec![ValidAction::new(ActionKind::Expose, min, max)]
            }
            Step::Pass(specs) => {
                let (min, max) = counts(specs, None);
                vec![ValidAction::new(ActionKind::Pass, min, max)]
            }
            Step::Separate(specs) => {
                let total: usize = specs.iter().map(|s| s.number).sum();
                vec![ValidAction::new(
                    ActionKind::Separate,
                    total as Chips,
                    total as Chips,
                )]
            }
            Step::Declare { .. } => vec![ValidAction::bare(ActionKind::Declare)],
            Step::Choose { options, .. } => {
                vec![ValidAction::new(
                    ActionKind::Choose,
                    0,
                    options.len() as Chips,
                )]
            }
            Step::ReplaceCommunity { number, .. } => {
                vec![ValidAction::new(
                    ActionKind::ReplaceCommunity,
                    0,
                    *number as Chips,
                )]
            }
            _ => Vec::new(),
        }
        .into_iter()
        .filter(|_| self.table.player(id).is_some())
        .collect()
    }

    /// Submit the current player's action. Rejections leave the game
    /// unchanged; `advance_step` reports that the step just closed out.
    pub fn player_action(&mut self, id: &PlayerId, action: PlayerAction) -> ActionResult {
        if self.table.player(id).is_none() {
            return ActionResult::rejected(ActionError::UnknownPlayer);
        }
        if self.state == GameState::Complete || matches!(self.awaiting, Awaiting::Nothing) {
            return ActionResult::rejected(ActionError::NotAccepting);
        }
        if self.current.as_ref() != Some(id) {
            return ActionResult::rejected(ActionError::OutOfTurn);
        }
        let allowed = self.valid_actions(id);
        if !allowed.iter().any(|a| a.kind == action.kind()) {
            return ActionResult::rejected(ActionError::NotAllowed);
        }

        let id = id.clone();
        let outcome = match self.awaiting.clone() {
            Awaiting::BringIn => self.apply_bring_in(&id, &action),
            Awaiting::BetRound => self.apply_bet_action(&id, &action),
            Awaiting::Acting(step) => self.apply_step_action(&id, &step, &action),
            Awaiting::Grouped(steps, index) => match steps.get(index) {
                Some(Step::Bet(_)) => self.apply_bet_action(&id, &action),
                Some(step) => {
                    let step = step.clone();
                    self.apply_step_action(&id, &step, &action)
                }
                None => Err(ActionError::NotAccepting),
            },
            Awaiting::Nothing => unreachable!("checked above"),
        };
        match outcome {
            Err(error) => ActionResult::rejected(error),
            Ok(()) => {
                self.last_actor = Some(id.clone());
                let advanced = self.after_action(&id);
                ActionResult::ok(advanced)
            }
        }
    }

    /// advance the queue after a successful action; true when the step closed
    fn after_action(&mut self, id: &PlayerId) -> bool {
        if self.state == GameState::Complete {
            return true;
        }
        match &mut self.awaiting {
            Awaiting::Grouped(steps, index) => {
                *index += 1;
                if *index < steps.len() {
                    return false;
                }
                *index = 0;
                self.queue.pop_front();
            }
            _ => {
                if self.queue.front() == Some(id) {
                    self.queue.pop_front();
                }
            }
        }
        self.current = self.queue.front().cloned();
        if self.current.is_some() {
            return false;
        }
        self.finish_step();
        true
    }

    fn finish_step(&mut self) {
        self.apply_pending_passes();
        self.awaiting = Awaiting::Nothing;
        self.current = None;
        if self.options.auto_progress {
            if let Err(error) = self.auto_run() {
                log::error!("hand aborted: {}", error);
                self.state = GameState::Complete;
            }
        }
    }

    // ------------------------------------------------------------------
    // betting actions

    fn apply_bring_in(&mut self, id: &PlayerId, action: &PlayerAction) -> Result<(), ActionError> {
        match action {
            PlayerAction::BringIn(amount) => {
                let expected = self
                    .stakes
                    .bring_in
                    .min(self.table.player(id).map(|p| p.stack).unwrap_or(0));
                if *amount != expected {
                    return Err(ActionError::AmountOutOfRange {
                        amount: *amount,
                        min: expected,
                        max: expected,
                    });
                }
                self.commit_chips(id, expected, false);
                Ok(())
            }
            PlayerAction::Complete(amount) => {
                let expected = self
                    .bets
                    .bet_unit
                    .min(self.table.player(id).map(|p| p.stack).unwrap_or(0));
                if *amount != expected {
                    return Err(ActionError::AmountOutOfRange {
                        amount: *amount,
                        min: expected,
                        max: expected,
                    });
                }
                self.commit_chips(id, expected, false);
                Ok(())
            }
            _ => Err(ActionError::NotAllowed),
        }
    }

    /// pay chips toward the round, update round level without reopening
    fn commit_chips(&mut self, id: &PlayerId, amount: Chips, full_raise: bool) {
        let paid = self
            .table
            .player_mut(id)
            .map(|p| p.pay(amount))
            .unwrap_or(0);
        let all_in = self.table.player(id).map(|p| p.all_in).unwrap_or(false);
        let total = self.bets.put(id, paid, false);
        self.pot.post(id, paid, all_in);
        self.bets.register_level(total, full_raise);
    }

    fn apply_bet_action(&mut self, id: &PlayerId, action: &PlayerAction) -> Result<(), ActionError> {
        let player_stack = self.table.player(id).map(|p| p.stack).unwrap_or(0);
        let contribution = self.bets.contribution(id);
        let to_call = self.bets.to_call(id);
        let all_in_total = contribution + player_stack;
        match action {
            PlayerAction::Fold => {
                if let Some(player) = self.table.player_mut(id) {
                    player.folded = true;
                }
                self.pot.fold(id);
                log::debug!("{} folds", id);
                let live = self.table.players().iter().filter(|p| p.is_live()).count();
                if live == 1 {
                    self.award_uncontested();
                }
                Ok(())
            }
            PlayerAction::Check => Ok(()),
            PlayerAction::Call(amount) => {
                let expected = to_call.min(player_stack);
                if *amount != expected {
                    return Err(ActionError::AmountOutOfRange {
                        amount: *amount,
                        min: expected,
                        max: expected,
                    });
                }
                self.commit_chips(id, expected, false);
                Ok(())
            }
            PlayerAction::Complete(amount) => {
                let expected = self.bets.bet_unit.min(all_in_total);
                if *amount != expected {
                    return Err(ActionError::AmountOutOfRange {
                        amount: *amount,
                        min: expected,
                        max: expected,
                    });
                }
                self.commit_chips(id, expected - contribution, false);
                self.reopen_queue(id);
                Ok(())
            }
            PlayerAction::Bet(to_total) => {
                let (min, max) = self.open_range(id);
                self.wager(id, *to_total, min, max, all_in_total)
            }
            PlayerAction::Raise(to_total) => {
                let (min, max) = self.raise_range(id);
                if *to_total <= self.bets.current_bet {
                    return Err(ActionError::AmountOutOfRange {
                        amount: *to_total,
                        min,
                        max,
                    });
                }
                self.wager(id, *to_total, min, max, all_in_total)
            }
            _ => Err(ActionError::NotAllowed),
        }
    }

    /// place a bet or raise to `to_total`; short all-ins are legal but do
    /// not reopen the action
    fn wager(
        &mut self,
        id: &PlayerId,
        to_total: Chips,
        min: Chips,
        max: Chips,
        all_in_total: Chips,
    ) -> Result<(), ActionError> {
        let is_all_in = to_total == all_in_total;
        let contribution = self.bets.contribution(id);
        if (!(min..=max).contains(&to_total) && !is_all_in) || to_total < contribution {
            return Err(ActionError::AmountOutOfRange {
                amount: to_total,
                min,
                max,
            });
        }
        // measured against the unclamped minimum: a short all-in passes the
        // range check above but is not a full raise
        let full_raise = to_total >= self.bets.min_raise_to();
        self.commit_chips(id, to_total - contribution, full_raise);
        if full_raise {
            self.reopen_queue(id);
        }
        Ok(())
    }

    /// everyone else who can act gets another turn after aggression
    fn reopen_queue(&mut self, aggressor: &PlayerId) {
        let mut queue = VecDeque::new();
        let mut cursor = aggressor.clone();
        while let Some(next) = self.table.next_where(&cursor, Player::can_act) {
            if &next == aggressor {
                break;
            }
            if queue.contains(&next) {
                break;
            }
            queue.push_back(next.clone());
            cursor = next;
        }
        // the aggressor keeps their place at the front until after_action pops
        queue.push_front(aggressor.clone());
        self.queue = queue;
    }

    // ------------------------------------------------------------------
    // drawing-family actions

    fn apply_step_action(
        &mut self,
        id: &PlayerId,
        step: &Step,
        action: &PlayerAction,
    ) -> Result<(), ActionError> {
        match (step, action) {
            (Step::Discard(specs), PlayerAction::Discard(cards)) => {
                self.take_cards(id, specs, cards, false)
            }
            (Step::Draw(specs), PlayerAction::Draw(cards)) => {
                self.take_cards(id, specs, cards, true)
            }
            (Step::Expose(specs), PlayerAction::Expose(cards)) => {
                self.check_count(specs, cards.len(), None)?;
                self.check_held(id, cards)?;
                for card in cards {
                    if let Some(card) = self.table.player_mut(id).and_then(|p| p.hand.get_mut(card))
                    {
                        card.turn(Visibility::FaceUp);
                    }
                }
                Ok(())
            }
            (Step::Pass(specs), PlayerAction::Pass(cards)) => {
                self.check_count(specs, cards.len(), None)?;
                self.check_held(id, cards)?;
                let direction = specs
                    .first()
                    .map(|s| s.direction)
                    .unwrap_or(PassDirection::Left);
                let taken = cards
                    .iter()
                    .filter_map(|card| {
                        self.table.player_mut(id).and_then(|p| p.hand.remove(card))
                    })
                    .collect::<Vec<Card>>();
                self.pending_passes.push((id.clone(), taken, direction));
                Ok(())
            }
            (Step::Separate(specs), PlayerAction::Separate(assignments)) => {
                for spec in specs {
                    let Some(subset) = spec.hole_subset.as_deref() else {
                        continue;
                    };
                    let assigned = assignments
                        .iter()
                        .filter(|(_, name)| name == subset)
                        .count();
                    if assigned != spec.number {
                        return Err(ActionError::WrongCardCount {
                            got: assigned,
                            min: spec.number,
                            max: spec.number,
                        });
                    }
                }
                let cards = assignments.iter().map(|(c, _)| *c).collect::<Vec<Card>>();
                self.check_held(id, &cards)?;
                for (card, subset) in assignments {
                    self.table
                        .player_mut(id)
                        .map(|p| p.hand.assign(card, subset));
                }
                Ok(())
            }
            (Step::Declare { .. }, PlayerAction::Declare(declaration)) => {
                self.declarations.insert(id.clone(), *declaration);
                Ok(())
            }
            (Step::Choose { options, label }, PlayerAction::Choose(option)) => {
                if !options.is_empty() && !options.contains(option) {
                    return Err(ActionError::UnknownOption(option.clone()));
                }
                self.choices.insert(id.clone(), option.clone());
                self.flags.insert(option.clone());
                self.flags.insert(format!("{}:{}", label, option));
                Ok(())
            }
            (
                Step::ReplaceCommunity { subset, number },
                PlayerAction::ReplaceCommunity(cards),
            ) => {
                if cards.len() > *number {
                    return Err(ActionError::WrongCardCount {
                        got: cards.len(),
                        min: 0,
                        max: *number,
                    });
                }
                let on_board = self.table.board.subset(subset);
                if let Some(missing) = cards.iter().find(|c| !on_board.contains(c)) {
                    return Err(ActionError::CardNotHeld(missing.to_string()));
                }
                for card in cards {
                    let removed = self
                        .table
                        .board
                        .remove(card)
                        .expect("board card just checked");
                    let visibility = removed.visibility();
                    self.table.discards.push(removed);
                    let fresh = self
                        .table
                        .deck
                        .deal(visibility)
                        .expect("deck dimensioned for the variant");
                    self.table.board.place(fresh, &[subset.clone()]);
                }
                self.apply_wild_marks();
                Ok(())
            }
            _ => Err(ActionError::NotAllowed),
        }
    }

    fn check_held(&self, id: &PlayerId, cards: &[Card]) -> Result<(), ActionError> {
        let held = self
            .table
            .player(id)
            .map(|p| p.hand.cards().to_vec())
            .unwrap_or_default();
        match cards.iter().find(|c| !held.contains(c)) {
            Some(card) => Err(ActionError::CardNotHeld(card.to_string())),
            None => Ok(()),
        }
    }

    fn check_count(
        &self,
        specs: &[CardSpec],
        got: usize,
        default_min: Option<usize>,
    ) -> Result<(), ActionError> {
        let max: usize = specs.iter().map(|s| s.number).sum();
        let min: usize = specs
            .iter()
            .map(|s| s.min_number.unwrap_or(default_min.unwrap_or(s.number)))
            .sum();
        if got < min || got > max {
            return Err(ActionError::WrongCardCount { got, min, max });
        }
        Ok(())
    }

    /// discard chosen cards; draws deal like-for-like replacements
    fn take_cards(
        &mut self,
        id: &PlayerId,
        specs: &[CardSpec],
        cards: &[Card],
        replace: bool,
    ) -> Result<(), ActionError> {
        self.check_count(specs, cards.len(), if replace { Some(0) } else { None })?;
        let held = self
            .table
            .player(id)
            .map(|p| p.hand.cards().to_vec())
            .unwrap_or_default();
        for card in cards {
            if !held.contains(card) {
                return Err(ActionError::CardNotHeld(card.to_string()));
            }
        }
        let mut replacements = Vec::new();
        for card in cards {
            let removed = self
                .table
                .player_mut(id)
                .and_then(|p| p.hand.remove(card))
                .expect("held card just checked");
            replacements.push(removed.visibility());
            self.table.discards.push(removed);
        }
        if replace {
            let spec = specs.first();
            let preserve = spec.map(|s| s.preserve_state).unwrap_or(false);
            let subset = spec.and_then(|s| s.subsets.first()).map(String::as_str);
            for old_visibility in replacements {
                let visibility = if preserve {
                    old_visibility
                } else {
                    spec.map(|s| s.state).unwrap_or(Visibility::FaceDown)
                };
                self.table
                    .deal_card_to(id, visibility, subset)
                    .expect("deck dimensioned for the variant");
            }
            self.apply_wild_marks();
        }
        log::debug!("{} {} {} cards", id, if replace { "draws" } else { "discards" }, cards.len());
        Ok(())
    }

    fn apply_pending_passes(&mut self) {
        let passes = std::mem::take(&mut self.pending_passes);
        for (from, cards, direction) in passes {
            let neighbor = match direction {
                PassDirection::Left => self.table.next_where(&from, Player::is_live),
                PassDirection::Right => {
                    // scan the other way by walking almost a full circle
                    let mut cursor = from.clone();
                    let mut previous = None;
                    while let Some(next) = self.table.next_where(&cursor, Player::is_live) {
                        if next == from {
                            break;
                        }
                        previous = Some(next.clone());
                        cursor = next;
                    }
                    previous
                }
            };
            if let Some(neighbor) = neighbor {
                log::debug!("{} passes {} cards to {}", from, cards.len(), neighbor);
                if let Some(player) = self.table.player_mut(&neighbor) {
                    for card in cards {
                        player.hand.push(card);
                    }
                }
            }
        }
    }

    // ------------------------------------------------------------------
    // hand conclusion

    fn award_uncontested(&mut self) {
        let survivor = self
            .table
            .players()
            .iter()
            .find(|p| p.is_live())
            .map(|p| p.id.clone())
            .expect("exactly one live player remains");
        let mut pots = Vec::new();
        for (index, pot) in self.pot.pots().iter().enumerate() {
            if pot.amount == 0 {
                continue;
            }
            pots.push(PotResult {
                amount: pot.amount,
                winners: vec![survivor.clone()],
                split: false,
                pot_type: if index == 0 { "main" } else { "side" }.to_string(),
                hand_type: "Hand".to_string(),
                side_pot_index: if index == 0 { None } else { Some(index - 1) },
                eligible_players: pot.eligible.iter().cloned().collect(),
                reason: Some("All other players folded".to_string()),
                best_hands: Vec::new(),
                declarations: BTreeMap::new(),
            });
        }
        let total: Chips = pots.iter().map(|p| p.amount).sum();
        if let Some(player) = self.table.player_mut(&survivor) {
            player.win(total);
        }
        log::info!("{} wins {} uncontested", survivor, total);
        self.results = Some(GameResult {
            pots,
            hands: BTreeMap::new(),
            winning_hands: Vec::new(),
            is_complete: true,
        });
        self.state = GameState::Complete;
        self.hand_running = false;
        self.queue.clear();
        self.current = None;
        self.awaiting = Awaiting::Nothing;
    }

    fn run_showdown(&mut self) {
        self.state = GameState::Showdown;
        let order = self.table.position_order();
        let contenders = order
            .iter()
            .cycle()
            .skip(1) // left of the button collects odd chips first
            .take(order.len())
            .filter_map(|id| self.table.player(id))
            .filter(|p| p.is_live())
            .map(|p| showdown::Contender {
                id: p.id.clone(),
                hole: p.hand.cards().to_vec(),
                subsets: p
                    .hand
                    .subset_names()
                    .map(|name| (name.to_string(), p.hand.subset(name)))
                    .collect(),
            })
            .collect::<Vec<showdown::Contender>>();
        let input = showdown::ShowdownInput {
            rules: &self.rules.showdown,
            pot: &self.pot,
            board: &self.table.board,
            contenders,
            declarations: &self.declarations,
            flags: &self.flags,
            forfeit_only: self.options.forfeit_failed_declarer,
        };
        let (result, payouts) = showdown::resolve(&input);
        let paid: Chips = payouts.values().sum();
        assert!(
            paid == self.pot.total(),
            "payouts {} do not cover the pot {}",
            paid,
            self.pot.total()
        );
        for (id, amount) in payouts {
            if let Some(player) = self.table.player_mut(&id) {
                player.win(amount);
            }
        }
        log::info!("hand complete: {} pots awarded", result.pots.len());
        self.results = Some(result);
        self.state = GameState::Complete;
        self.hand_running = false;
    }
}

use super::EngineError;
use super::player::{Player, Position};
use super::result::{GameResult, PotResult};
use super::showdown;
use super::state::GameState;
use super::table::Table;
use crate::Chips;
use crate::PlayerId;
use crate::betting::bringin::{self, CardRule};
use crate::betting::round::BetState;
use crate::betting::{
    ActionError, ActionKind, ActionResult, BettingStructure, Declaration, PlayerAction, Pot,
    ValidAction,
};
use crate::cards::board::DEFAULT_SUBSET;
use crate::cards::card::{Card, Visibility, WildKind};
use crate::cards::deck::Deck;
use crate::cards::rank::Rank;
use crate::rules::Rules;
use crate::rules::forced::ForcedBetRule;
use crate::rules::order::FirstActor;
use crate::rules::showdown::{WildRole, WildRule, WildTarget};
use crate::rules::step::{BetKind, CardSpec, DealCondition, DealTarget, PassDirection, Step};
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::ops::RangeInclusive;
use std::sync::Arc;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::Rules;

    fn card(s: &str) -> Card {
        Card::try_from(s).unwrap()
    }
    fn cards(s: &[&str]) -> Vec<Card> {
        s.iter().map(|c| card(c)).collect()
    }

    fn holdem_rules(best_hand: &str, extra_steps: &str) -> Rules {
        let text = format!(
            r#"{{
            "game": "Hold'em",
            "players": {{"min": 2, "max": 9}},
            "deck": {{"type": "standard", "cards": 52}},
            "bettingStructures": ["Limit", "No Limit", "Pot Limit"],
            "forcedBets": {{"style": "blinds"}},
            "bettingOrder": {{"initial": "after_big_blind", "subsequent": "dealer"}},
            "gamePlay": [
                {{"bet": {{"type": "blinds"}}, "name": "Post Blinds"}},
                {{"deal": {{"location": "player", "cards": [{{"number": 2, "state": "face down"}}]}}, "name": "Deal Hole Cards"}},
                {{"bet": {{"type": "small"}}, "name": "Pre-Flop Bet"}},
                {{"deal": {{"location": "community", "cards": [{{"number": 3, "state": "face up"}}]}}, "name": "Deal Flop"}},
                {{"bet": {{"type": "small"}}, "name": "Flop Bet"}},
                {{"deal": {{"location": "community", "cards": [{{"number": 1, "state": "face up"}}]}}, "name": "Deal Turn"}},
                {{"bet": {{"type": "big"}}, "name": "Turn Bet"}},
                {{"deal": {{"location": "community", "cards": [{{"number": 1, "state": "face up"}}]}}, "name": "Deal River"}},
                {{"bet": {{"type": "big"}}, "name": "River Bet"}},
                {extra_steps}
                {{"showdown": {{"type": "final"}}, "name": "Showdown"}}
            ],
            "showdown": {{
                "order": "clockwise",
                "startingFrom": "dealer",
                "cardsRequired": "any combination of hole and community cards",
                {best_hand}
            }}
        }}"#
        );
        Rules::from_json(&text).unwrap()
    }

    fn manual() -> GameOptions {
        GameOptions {
            auto_progress: false,
            ..GameOptions::default()
        }
    }

    fn check_through(game: &mut Game, order: &[&str]) {
        for id in order {
            let id = id.to_string();
            let result = game.player_action(&id, PlayerAction::Check);
            assert!(result.success, "{} failed to check: {:?}", id, result.error);
        }
    }

    /// three-handed limit hold'em, called preflop and checked down;
    /// quad queens take one clean main pot
    #[test]
    fn limit_holdem_checked_down_quads_win() {
        let rules = holdem_rules(r#""bestHand": [{"evaluationType": "high", "anyCards": 5}]"#, "");
        let stakes = Stakes::blinds(10, 20);
        let mut game = Game::new(rules, BettingStructure::Limit, stakes, 100..=1000, manual()).unwrap();
        game.add_player("alice", "Alice", 500).unwrap();
        game.add_player("bob", "Bob", 500).unwrap();
        game.add_player("charlie", "Charlie", 500).unwrap();
        game.start_hand(false).unwrap();
        assert_eq!(game.state(), GameState::Betting);
        assert_eq!(game.current_bet(), 20);
        game.stack_deck(&cards(&[
            "As", "Qs", "8c", // first hole card each
            "Kd", "Qh", "9h", // second hole card each
            "Qd", "Qc", "7h", // flop
            "3s", // turn
            "2d", // river
        ]));

        game.next_step().unwrap(); // deal hole cards
        assert_eq!(game.table().card_census(), 52);
        game.next_step().unwrap(); // pre-flop bet
        assert_eq!(game.current_player(), Some(&"alice".to_string()));
        assert!(game
            .player_action(&"alice".to_string(), PlayerAction::Call(20))
            .success);
        assert!(game
            .player_action(&"bob".to_string(), PlayerAction::Call(10))
            .success);
        let closing = game.player_action(&"charlie".to_string(), PlayerAction::Check);
        assert!(closing.success && closing.advance_step);
        assert_eq!(game.pot_total(), 60);

        game.next_step().unwrap(); // flop
        game.next_step().unwrap(); // flop bet, small blind seat first
        assert_eq!(game.current_player(), Some(&"bob".to_string()));
        check_through(&mut game, &["bob", "charlie", "alice"]);
        game.next_step().unwrap(); // turn
        game.next_step().unwrap();
        check_through(&mut game, &["bob", "charlie", "alice"]);
        game.next_step().unwrap(); // river
        game.next_step().unwrap();
        check_through(&mut game, &["bob", "charlie", "alice"]);
        game.next_step().unwrap(); // showdown

        assert_eq!(game.state(), GameState::Complete);
        let results = game.results().unwrap();
        assert_eq!(results.total_pot(), 60);
        assert_eq!(results.pots.len(), 1);
        assert_eq!(results.winners(), vec!["bob".to_string()]);
        let winning = &results.winning_hands[0];
        assert!(winning.hand_name.contains("Four of a Kind"));
        assert_eq!(winning.hand_description, "Four Queens");
        // chip conservation
        let stacks: Chips = game.table().players().iter().map(|p| p.stack).sum();
        assert_eq!(stacks, 1500);
        assert_eq!(game.table().player(&"bob".to_string()).unwrap().stack, 540);
    }

    #[test]
    fn out_of_turn_and_illegal_actions_are_rejected() {
        let rules = holdem_rules(r#""bestHand": [{"evaluationType": "high", "anyCards": 5}]"#, "");
        let mut game = Game::new(
            rules,
            BettingStructure::Limit,
            Stakes::blinds(10, 20),
            100..=1000,
            manual(),
        )
        .unwrap();
        game.add_player("alice", "Alice", 500).unwrap();
        game.add_player("bob", "Bob", 500).unwrap();
        game.add_player("charlie", "Charlie", 500).unwrap();
        game.start_hand(false).unwrap();
        game.next_step().unwrap();
        game.next_step().unwrap();

        // bob tries to act before alice
        let result = game.player_action(&"bob".to_string(), PlayerAction::Call(10));
        assert_eq!(result.error, Some(ActionError::OutOfTurn));
        // alice owes a call, so a bare check is not in the legal set
        let result = game.player_action(&"alice".to_string(), PlayerAction::Check);
        assert_eq!(result.error, Some(ActionError::NotAllowed));
        // wrong call amount
        let result = game.player_action(&"alice".to_string(), PlayerAction::Call(15));
        assert!(matches!(result.error, Some(ActionError::AmountOutOfRange { .. })));
        // the state is untouched by rejections
        assert_eq!(game.pot_total(), 30);
        assert_eq!(game.current_player(), Some(&"alice".to_string()));
    }

    #[test]
    fn fold_to_one_ends_the_hand_without_showdown() {
        let rules = holdem_rules(r#""bestHand": [{"evaluationType": "high", "anyCards": 5}]"#, "");
        let mut game = Game::new(
            rules,
            BettingStructure::NoLimit,
            Stakes::blinds(1, 2),
            50..=1000,
            manual(),
        )
        .unwrap();
        game.add_player("alice", "Alice", 100).unwrap();
        game.add_player("bob", "Bob", 100).unwrap();
        game.add_player("charlie", "Charlie", 100).unwrap();
        game.start_hand(false).unwrap();
        game.next_step().unwrap();
        game.next_step().unwrap();

        assert!(game
            .player_action(&"alice".to_string(), PlayerAction::Raise(6))
            .success);
        assert!(game.player_action(&"bob".to_string(), PlayerAction::Fold).success);
        let result = game.player_action(&"charlie".to_string(), PlayerAction::Fold);
        assert!(result.success);
        assert_eq!(game.state(), GameState::Complete);
        let results = game.results().unwrap();
        assert_eq!(results.winners(), vec!["alice".to_string()]);
        assert_eq!(results.total_pot(), 9); // 6 + blinds 1 + 2
        assert_eq!(game.table().player(&"alice".to_string()).unwrap().stack, 103);
        let stacks: Chips = game.table().players().iter().map(|p| p.stack).sum();
        assert_eq!(stacks, 300);
    }

    /// qualifier failure on both halves collapses the pot into one split
    #[test]
    fn hi_lo_with_no_qualifier_splits_the_pot() {
        let best = r#""bestHand": [
            {"name": "High", "evaluationType": "high", "anyCards": 5, "qualifier": [8, 999999]},
            {"name": "Low", "evaluationType": "a5_low", "anyCards": 5, "qualifier": [1, 56]}
        ],
        "globalDefaultAction": {"condition": "no_qualifier_met", "action": {"type": "split_pot"}}"#;
        let rules = holdem_rules(best, "");
        let mut game = Game::new(
            rules,
            BettingStructure::Limit,
            Stakes::blinds(10, 20),
            100..=1000,
            manual(),
        )
        .unwrap();
        game.add_player("alice", "Alice", 500).unwrap();
        game.add_player("bob", "Bob", 500).unwrap();
        game.start_hand(false).unwrap();
        game.stack_deck(&cards(&[
            "Ah", "4d", // first hole cards
            "3c", "5c", // second hole cards
            "Ks", "Qd", "Jc", // flop
            "9h", // turn
            "2s", // river
        ]));
        game.next_step().unwrap();
        game.next_step().unwrap();
        // heads up: the button acts first before the flop
        assert_eq!(game.current_player(), Some(&"alice".to_string()));
        assert!(game
            .player_action(&"alice".to_string(), PlayerAction::Call(10))
            .success);
        assert!(game.player_action(&"bob".to_string(), PlayerAction::Check).success);
        game.next_step().unwrap();
        game.next_step().unwrap();
        check_through(&mut game, &["bob", "alice"]);
        game.next_step().unwrap();
        game.next_step().unwrap();
        check_through(&mut game, &["bob", "alice"]);
        game.next_step().unwrap();
        game.next_step().unwrap();
        check_through(&mut game, &["bob", "alice"]);
        game.next_step().unwrap();

        let results = game.results().unwrap();
        assert_eq!(results.pots.len(), 1);
        let pot = &results.pots[0];
        assert_eq!(pot.hand_type, "Split (No Qualifier)");
        assert_eq!(pot.amount, 40);
        assert_eq!(pot.winners.len(), 2);
        for player in game.table().players() {
            assert_eq!(player.stack, 500);
        }
    }

    /// both-declarers who win only one half forfeit everything
    #[test]
    fn declare_both_or_nothing_forfeits_split_winners() {
        let best = r#""declaration_mode": "declare",
        "bestHand": [
            {"name": "High", "evaluationType": "high", "anyCards": 5},
            {"name": "Low", "evaluationType": "a5_low", "anyCards": 5}
        ]"#;
        let declare = r#"{"declare": {"options": ["high", "low", "high_low"]}, "name": "Declare"},"#;
        let rules = holdem_rules(best, declare);
        let mut game = Game::new(
            rules,
            BettingStructure::Limit,
            Stakes::blinds(10, 20),
            100..=1000,
            manual(),
        )
        .unwrap();
        game.add_player("alice", "Alice", 500).unwrap();
        game.add_player("bob", "Bob", 500).unwrap();
        game.start_hand(false).unwrap();
        game.stack_deck(&cards(&[
            "As", "2c", // first hole cards
            "Ad", "3d", // second hole cards
            "Ks", "Qd", "9h", // flop
            "7c", // turn
            "4s", // river
        ]));
        game.next_step().unwrap();
        game.next_step().unwrap();
        assert!(game
            .player_action(&"alice".to_string(), PlayerAction::Call(10))
            .success);
        assert!(game.player_action(&"bob".to_string(), PlayerAction::Check).success);
        for _ in 0..3 {
            game.next_step().unwrap(); // deal
            game.next_step().unwrap(); // bet
            check_through(&mut game, &["bob", "alice"]);
        }
        game.next_step().unwrap(); // declare step
        assert_eq!(game.state(), GameState::Drawing);
        assert!(game
            .player_action(&"bob".to_string(), PlayerAction::Declare(Declaration::HighLow))
            .success);
        assert!(game
            .player_action(&"alice".to_string(), PlayerAction::Declare(Declaration::HighLow))
            .success);
        game.next_step().unwrap(); // showdown

        // alice held the best high (aces), bob the best low; with both
        // declared high-low, neither collects outright and the pot splits
        let results = game.results().unwrap();
        assert_eq!(results.pots.len(), 1);
        assert_eq!(results.pots[0].hand_type, "Split (No Qualifier)");
        assert_eq!(results.pots[0].winners.len(), 2);
        for player in game.table().players() {
            assert_eq!(player.stack, 500);
        }
    }

    fn stud_rules(rule: &str) -> Rules {
        let text = format!(
            r#"{{
            "game": "Seven Card Stud",
            "players": {{"min": 2, "max": 7}},
            "deck": {{"type": "standard", "cards": 52}},
            "bettingStructures": ["Limit"],
            "forcedBets": {{"style": "bring-in", "rule": "{rule}"}},
            "bettingOrder": {{"initial": "bring_in", "subsequent": "high_hand"}},
            "gamePlay": [
                {{"bet": {{"type": "antes"}}, "name": "Post Antes"}},
                {{"deal": {{"location": "player", "cards": [{{"number": 2, "state": "face down"}}, {{"number": 1, "state": "face up"}}]}}, "name": "Deal Third Street"}},
                {{"bet": {{"type": "bring-in"}}, "name": "Post Bring-In"}},
                {{"bet": {{"type": "small"}}, "name": "Third Street Bet"}},
                {{"showdown": {{"type": "final"}}, "name": "Showdown"}}
            ],
            "showdown": {{
                "order": "clockwise",
                "startingFrom": "dealer",
                "cardsRequired": "all cards",
                "bestHand": [{{"evaluationType": "three_card_high", "anyCards": 3}}]
            }}
        }}"#
        );
        Rules::from_json(&text).unwrap()
    }

    fn stud_game(rule: &str) -> Game {
        let stakes = Stakes::limit(10, 20).with_ante(1).with_bring_in(5);
        let mut game = Game::new(
            stud_rules(rule),
            BettingStructure::Limit,
            stakes,
            100..=1000,
            manual(),
        )
        .unwrap();
        game.add_player("alice", "Alice", 500).unwrap();
        game.add_player("bob", "Bob", 500).unwrap();
        game.add_player("charlie", "Charlie", 500).unwrap();
        game.start_hand(false).unwrap();
        game.stack_deck(&cards(&[
            "4h", "8d", "Jh", // first down cards
            "5s", "9c", "Js", // second down cards
            "2c", "Ks", "Ad", // door cards
        ]));
        game.next_step().unwrap(); // deal third street
        game.next_step().unwrap(); // bring-in
        game
    }

    /// with "low card" the deuce brings it in; with "high card" (razz,
    /// ace low) the king does
    #[test]
    fn bring_in_selection_follows_the_card_rule() {
        let game = stud_game("low card");
        assert_eq!(game.current_player(), Some(&"alice".to_string()));
        assert_eq!(game.ante_total(), 3);

        let game = stud_game("high card");
        assert_eq!(game.current_player(), Some(&"bob".to_string()));
    }

    #[test]
    fn bring_in_carries_into_the_first_betting_round() {
        let mut game = stud_game("low card");
        let actions = game.valid_actions(&"alice".to_string());
        assert!(actions.iter().any(|a| a.kind == ActionKind::BringIn && a.min == 5));
        assert!(actions.iter().any(|a| a.kind == ActionKind::Complete && a.min == 10));
        let result = game.player_action(&"alice".to_string(), PlayerAction::BringIn(5));
        assert!(result.success && result.advance_step);

        game.next_step().unwrap(); // third street betting continues the round
        assert_eq!(game.current_bet(), 5);
        assert_eq!(game.current_player(), Some(&"bob".to_string()));
        assert!(game.player_action(&"bob".to_string(), PlayerAction::Call(5)).success);
        assert!(game
            .player_action(&"charlie".to_string(), PlayerAction::Call(5))
            .success);
        // the bring-in seat closes the round with the option already matched
        let closing = game.player_action(&"alice".to_string(), PlayerAction::Check);
        assert!(closing.success && closing.advance_step);
        game.next_step().unwrap(); // showdown

        assert_eq!(game.state(), GameState::Complete);
        let results = game.results().unwrap();
        // pair of jacks showing wins the three-card evaluation
        assert_eq!(results.winners(), vec!["charlie".to_string()]);
        assert_eq!(results.total_pot(), 18);
        let stacks: Chips = game.table().players().iter().map(|p| p.stack).sum();
        assert_eq!(stacks, 1500);
    }

    fn nehe_rules() -> Rules {
        Rules::from_json(
            r#"{
            "game": "New England Hold'em",
            "players": {"min": 2, "max": 9},
            "deck": {"type": "standard", "cards": 52},
            "bettingStructures": ["Limit"],
            "bettingOrder": {"initial": "dealer", "subsequent": "last_actor"},
            "gamePlay": [
                {"bet": {"type": "blinds"}, "name": "Post Dealer Blind and Ante"},
                {"deal": {"location": "player", "cards": [{"number": 2, "state": "face down"}]}, "name": "Deal Hole Cards"},
                {"bet": {"type": "small"}, "name": "Pre-Flop Bet"},
                {"showdown": {"type": "final"}, "name": "Showdown"}
            ],
            "showdown": {
                "order": "clockwise",
                "startingFrom": "dealer",
                "cardsRequired": "any combination",
                "bestHand": [{"evaluationType": "two_card_high", "anyCards": 2}]
            }
        }"#,
        )
        .unwrap()
    }

    /// dealer blind plus ante from a short stack: blind posts in full,
    /// the ante takes whatever remains
    #[test]
    fn dealer_blind_and_ante_from_a_short_stack() {
        let stakes = Stakes {
            small_blind: 0,
            big_blind: 10,
            small_bet: 10,
            big_bet: 20,
            ante: 10,
            bring_in: 0,
        };
        let mut game = Game::new(
            nehe_rules(),
            BettingStructure::Limit,
            stakes,
            10..=1000,
            manual(),
        )
        .unwrap();
        game.add_player("alice", "Alice", 15).unwrap(); // the dealer
        game.add_player("bob", "Bob", 500).unwrap();
        game.add_player("charlie", "Charlie", 500).unwrap();
        game.start_hand(false).unwrap();

        let blind = game.round_bet(&"alice".to_string()).unwrap();
        assert_eq!(blind.amount, 10);
        assert!(blind.posted_blind);
        assert_eq!(game.ante_total(), 5); // only the remainder anted
        assert_eq!(game.main_pot_amount(), 15);
        assert_eq!(game.current_bet(), 10);
        let alice = game.table().player(&"alice".to_string()).unwrap();
        assert_eq!(alice.stack, 0);
        assert!(alice.all_in);
        assert!(game.round_bet(&"bob".to_string()).is_none());

        game.next_step().unwrap(); // deal
        game.next_step().unwrap(); // betting
        // first to act is the seat after the dealer
        assert_eq!(game.current_player(), Some(&"bob".to_string()));
    }

    #[test]
    fn no_limit_all_ins_build_side_pots_in_play() {
        let rules = holdem_rules(r#""bestHand": [{"evaluationType": "high", "anyCards": 5}]"#, "");
        let mut game = Game::new(
            rules,
            BettingStructure::NoLimit,
            Stakes::blinds(1, 2),
            25..=1000,
            GameOptions::default(),
        )
        .unwrap();
        game.add_player("alice", "Alice", 100).unwrap();
        game.add_player("bob", "Bob", 50).unwrap();
        game.add_player("charlie", "Charlie", 100).unwrap();
        game.start_hand(false).unwrap();

        assert!(game
            .player_action(&"alice".to_string(), PlayerAction::Raise(100))
            .success);
        assert!(game
            .player_action(&"bob".to_string(), PlayerAction::Call(49))
            .success);
        assert!(game
            .player_action(&"charlie".to_string(), PlayerAction::Call(98))
            .success);

        assert_eq!(game.pot_total(), 250);
        assert_eq!(game.main_pot_amount(), 150); // three-way to bob's 50
        assert_eq!(game.side_pots().len(), 1);
        assert_eq!(game.side_pots()[0].amount, 100);
        assert!(!game.side_pots()[0].eligible.contains(&"bob".to_string()));

        // only charlie can still act; check the hand down
        while game.state() != GameState::Complete {
            let checked = game.player_action(&"charlie".to_string(), PlayerAction::Check);
            assert!(checked.success);
        }
        let stacks: Chips = game.table().players().iter().map(|p| p.stack).sum();
        assert_eq!(stacks, 250);
    }

    fn draw_rules() -> Rules {
        Rules::from_json(
            r#"{
            "game": "Five Card Draw",
            "players": {"min": 2, "max": 6},
            "deck": {"type": "standard", "cards": 52},
            "bettingStructures": ["Limit", "No Limit"],
            "forcedBets": {"style": "blinds"},
            "gamePlay": [
                {"bet": {"type": "blinds"}, "name": "Post Blinds"},
                {"deal": {"location": "player", "cards": [{"number": 5, "state": "face down"}]}, "name": "Deal Hands"},
                {"bet": {"type": "small"}, "name": "First Bet"},
                {"draw": {"cards": [{"number": 5, "min_number": 0, "state": "face down"}]}, "name": "Draw"},
                {"bet": {"type": "big"}, "name": "Second Bet"},
                {"showdown": {"type": "final"}, "name": "Showdown"}
            ],
            "showdown": {
                "order": "clockwise",
                "startingFrom": "dealer",
                "cardsRequired": "all five cards",
                "bestHand": [{"evaluationType": "high", "holeCards": 5}]
            }
        }"#,
        )
        .unwrap()
    }

    #[test]
    fn draw_step_replaces_cards_and_conserves_the_deck() {
        let mut game = Game::new(
            draw_rules(),
            BettingStructure::Limit,
            Stakes::blinds(5, 10),
            100..=1000,
            manual(),
        )
        .unwrap();
        game.add_player("alice", "Alice", 500).unwrap();
        game.add_player("bob", "Bob", 500).unwrap();
        game.start_hand(false).unwrap();
        game.stack_deck(&cards(&[
            "As", "2c", "Ks", "3c", "Qs", "4c", "Js", "5c", "9s", "8h", // hands
            "7d", "6d", // bob's replacements
        ]));
        game.next_step().unwrap(); // deal
        game.next_step().unwrap(); // first bet
        assert!(game
            .player_action(&"alice".to_string(), PlayerAction::Call(5))
            .success);
        assert!(game.player_action(&"bob".to_string(), PlayerAction::Check).success);

        game.next_step().unwrap(); // draw
        assert_eq!(game.state(), GameState::Drawing);
        assert_eq!(game.current_player(), Some(&"bob".to_string()));
        let draws = game.valid_actions(&"bob".to_string());
        assert_eq!(draws[0].kind, ActionKind::Draw);
        assert_eq!((draws[0].min, draws[0].max), (0, 5));
        assert!(game
            .player_action(&"bob".to_string(), PlayerAction::Draw(cards(&["2c", "3c"])))
            .success);
        // standing pat is a zero-card draw
        assert!(game
            .player_action(&"alice".to_string(), PlayerAction::Draw(vec![]))
            .success);

        let bob = game.table().player(&"bob".to_string()).unwrap();
        assert_eq!(bob.hand.len(), 5);
        assert!(bob.hand.contains(&card("7d")));
        assert!(bob.hand.contains(&card("6d")));
        assert!(!bob.hand.contains(&card("2c")));
        assert_eq!(game.table().card_census(), 52);
        assert_eq!(game.table().discards.len(), 2);
    }

    /// a short all-in lifts the level but never reopens raising for
    /// players who already closed their action
    #[test]
    fn short_all_in_does_not_reopen_the_action() {
        let rules = holdem_rules(r#""bestHand": [{"evaluationType": "high", "anyCards": 5}]"#, "");
        let mut game = Game::new(
            rules,
            BettingStructure::NoLimit,
            Stakes::blinds(1, 2),
            10..=1000,
            manual(),
        )
        .unwrap();
        game.add_player("alice", "Alice", 100).unwrap();
        game.add_player("bob", "Bob", 100).unwrap();
        game.add_player("charlie", "Charlie", 12).unwrap();
        game.start_hand(false).unwrap();
        game.next_step().unwrap(); // deal
        game.next_step().unwrap(); // pre-flop bet

        assert!(game
            .player_action(&"alice".to_string(), PlayerAction::Raise(10))
            .success);
        assert!(game
            .player_action(&"bob".to_string(), PlayerAction::Call(9))
            .success);
        // charlie shoves 12 total: above the level of 10, below the
        // minimum raise to 18
        let shove = game.player_action(&"charlie".to_string(), PlayerAction::Raise(12));
        assert!(shove.success);
        assert!(shove.advance_step, "a short all-in must not reopen the action");
        assert_eq!(game.current_player(), None);
        let rebuffed = game.player_action(&"alice".to_string(), PlayerAction::Raise(30));
        assert_eq!(rebuffed.error, Some(ActionError::NotAccepting));
        assert_eq!(game.pot_total(), 32);
    }

    #[test]
    fn descriptions_name_the_stakes_and_structure() {
        let rules = holdem_rules(r#""bestHand": [{"evaluationType": "high", "anyCards": 5}]"#, "");
        let game = Game::new(
            rules,
            BettingStructure::NoLimit,
            Stakes::blinds(1, 2),
            50..=1000,
            GameOptions::default(),
        )
        .unwrap();
        assert_eq!(game.description(), "$1/$2 No Limit Hold'em");

        let rules = holdem_rules(r#""bestHand": [{"evaluationType": "high", "anyCards": 5}]"#, "");
        let game = Game::new(
            rules,
            BettingStructure::Limit,
            Stakes::limit(10, 20),
            100..=1000,
            GameOptions::default(),
        )
        .unwrap();
        assert_eq!(game.description(), "$10/$20 Limit Hold'em");
    }

    /// omaha 8: exactly two hole plus three community, low qualifier met
    #[test]
    fn omaha_eight_splits_between_high_and_low() {
        let rules = Rules::from_json(include_str!("../../demos/omaha_8.json")).unwrap();
        let mut game = Game::new(
            rules,
            BettingStructure::Limit,
            Stakes::blinds(10, 20),
            100..=1000,
            manual(),
        )
        .unwrap();
        game.add_player("alice", "Alice", 500).unwrap();
        game.add_player("bob", "Bob", 500).unwrap();
        game.start_hand(false).unwrap();
        game.stack_deck(&cards(&[
            "As", "Kh", "2d", "Ks", "Kc", "9c", "Qh", "8d", // four hole cards each
            "5h", "6s", "7c", // flop
            "Jd", // turn
            "3h", // river
        ]));
        game.next_step().unwrap();
        game.next_step().unwrap();
        assert!(game
            .player_action(&"alice".to_string(), PlayerAction::Call(10))
            .success);
        assert!(game.player_action(&"bob".to_string(), PlayerAction::Check).success);
        for _ in 0..3 {
            game.next_step().unwrap();
            game.next_step().unwrap();
            check_through(&mut game, &["bob", "alice"]);
        }
        game.next_step().unwrap();

        let results = game.results().unwrap();
        assert_eq!(results.pots.len(), 2);
        let high = results.pots.iter().find(|p| p.hand_type == "High").unwrap();
        let low = results.pots.iter().find(|p| p.hand_type == "Low").unwrap();
        // bob holds 9-8 for the board straight; alice holds A-2 for the six low
        assert_eq!(high.winners, vec!["bob".to_string()]);
        assert_eq!(low.winners, vec!["alice".to_string()]);
        assert_eq!(high.amount + low.amount, 40);
        let straight = results
            .winning_hands
            .iter()
            .find(|h| h.player_id == "bob")
            .unwrap();
        assert_eq!(straight.hand_description, "Nine-high Straight");
        assert_eq!(straight.used_hole_cards.len(), 2);
        assert_eq!(straight.community_cards.len(), 3);
        let six_low = results
            .winning_hands
            .iter()
            .find(|h| h.player_id == "alice")
            .unwrap();
        assert_eq!(six_low.hand_description, "6-5-3-2-A Low");
        for player in game.table().players() {
            assert_eq!(player.stack, 500);
        }
    }

    fn expose_rules() -> Rules {
        Rules::from_json(
            r#"{
            "game": "Open Face Teaser",
            "players": {"min": 2, "max": 6},
            "deck": {"type": "standard", "cards": 52},
            "bettingStructures": ["Limit"],
            "forcedBets": {"style": "blinds"},
            "gamePlay": [
                {"bet": {"type": "blinds"}, "name": "Post Blinds"},
                {"deal": {"location": "player", "cards": [{"number": 2, "state": "face down"}]}, "name": "Deal Hands"},
                {"expose": {"cards": [{"number": 1, "state": "face up"}]}, "name": "Expose One"},
                {"bet": {"type": "small"}, "name": "Bet"},
                {"showdown": {"type": "final"}, "name": "Showdown"}
            ],
            "showdown": {
                "order": "clockwise",
                "startingFrom": "dealer",
                "cardsRequired": "both hole cards",
                "bestHand": [{"evaluationType": "two_card_high", "holeCards": 2}]
            }
        }"#,
        )
        .unwrap()
    }

    #[test]
    fn expose_step_turns_chosen_cards_face_up() {
        let mut game = Game::new(
            expose_rules(),
            BettingStructure::Limit,
            Stakes::blinds(10, 20),
            100..=1000,
            manual(),
        )
        .unwrap();
        game.add_player("alice", "Alice", 500).unwrap();
        game.add_player("bob", "Bob", 500).unwrap();
        game.start_hand(false).unwrap();
        game.stack_deck(&cards(&["As", "Kd", "Qh", "Jc"]));
        game.next_step().unwrap(); // deal
        game.next_step().unwrap(); // expose
        assert_eq!(game.current_player(), Some(&"bob".to_string()));
        let bounds = game.valid_actions(&"bob".to_string());
        assert_eq!((bounds[0].min, bounds[0].max), (1, 1));
        // bob cannot expose a card he does not hold
        let result = game.player_action(&"bob".to_string(), PlayerAction::Expose(cards(&["As"])));
        assert!(matches!(result.error, Some(ActionError::CardNotHeld(_))));
        assert!(game
            .player_action(&"bob".to_string(), PlayerAction::Expose(cards(&["Kd"])))
            .success);
        assert!(game
            .player_action(&"alice".to_string(), PlayerAction::Expose(cards(&["As"])))
            .success);
        for player in game.table().players() {
            assert_eq!(player.hand.visible().len(), 1);
        }

        game.next_step().unwrap(); // bet
        assert!(game
            .player_action(&"alice".to_string(), PlayerAction::Call(10))
            .success);
        assert!(game.player_action(&"bob".to_string(), PlayerAction::Check).success);
        game.next_step().unwrap(); // showdown
        // ace-queen outranks king-jack in the two-card evaluation
        assert_eq!(game.results().unwrap().winners(), vec!["alice".to_string()]);
    }

    fn choose_rules() -> Rules {
        Rules::from_json(
            r#"{
            "game": "Declare Your Game",
            "players": {"min": 2, "max": 6},
            "deck": {"type": "standard", "cards": 52},
            "bettingStructures": ["Limit"],
            "forcedBets": {"style": "blinds"},
            "gamePlay": [
                {"bet": {"type": "blinds"}, "name": "Post Blinds"},
                {"deal": {"location": "player", "cards": [{"number": 5, "state": "face down"}]}, "name": "Deal Hands"},
                {"choose": {"options": ["hi_lo", "high_only"], "value": "pot_split"}, "name": "Choose the Split"},
                {"bet": {"type": "small"}, "name": "Bet"},
                {"showdown": {"type": "final"}, "name": "Showdown"}
            ],
            "showdown": {
                "order": "clockwise",
                "startingFrom": "dealer",
                "cardsRequired": "all five cards",
                "bestHand": [{"name": "High", "evaluationType": "high", "holeCards": 5}],
                "conditionalBestHands": [
                    {"condition": "hi_lo", "bestHand": [
                        {"name": "High", "evaluationType": "high", "holeCards": 5},
                        {"name": "Low", "evaluationType": "a5_low", "holeCards": 5}
                    ]}
                ],
                "defaultBestHand": [{"name": "High", "evaluationType": "high", "holeCards": 5}]
            }
        }"#,
        )
        .unwrap()
    }

    /// a choose step raises a flag that switches the showdown configuration
    #[test]
    fn choose_step_selects_the_conditional_showdown() {
        let mut game = Game::new(
            choose_rules(),
            BettingStructure::Limit,
            Stakes::blinds(10, 20),
            100..=1000,
            manual(),
        )
        .unwrap();
        game.add_player("alice", "Alice", 500).unwrap();
        game.add_player("bob", "Bob", 500).unwrap();
        game.start_hand(false).unwrap();
        game.stack_deck(&cards(&[
            "As", "2c", "Ah", "3d", "Kd", "4h", "Qc", "6s", "9s", "7d",
        ]));
        game.next_step().unwrap(); // deal
        game.next_step().unwrap(); // choose
        let rejected = game.player_action(&"bob".to_string(), PlayerAction::Choose("wild".to_string()));
        assert!(matches!(rejected.error, Some(ActionError::UnknownOption(_))));
        assert!(game
            .player_action(&"bob".to_string(), PlayerAction::Choose("hi_lo".to_string()))
            .success);
        assert!(game
            .player_action(&"alice".to_string(), PlayerAction::Choose("hi_lo".to_string()))
            .success);
        game.next_step().unwrap(); // bet
        assert!(game
            .player_action(&"alice".to_string(), PlayerAction::Call(10))
            .success);
        assert!(game.player_action(&"bob".to_string(), PlayerAction::Check).success);
        game.next_step().unwrap(); // showdown

        // with hi_lo chosen the pot splits: aces up high, seven low
        let results = game.results().unwrap();
        assert_eq!(results.pots.len(), 2);
        let high = results.pots.iter().find(|p| p.hand_type == "High").unwrap();
        let low = results.pots.iter().find(|p| p.hand_type == "Low").unwrap();
        assert_eq!(high.winners, vec!["alice".to_string()]);
        assert_eq!(low.winners, vec!["bob".to_string()]);
        for player in game.table().players() {
            assert_eq!(player.stack, 500);
        }
    }

    #[test]
    fn structure_must_be_allowed_by_the_variant() {
        let rules = stud_rules("low card"); // limit only
        let result = Game::new(
            rules,
            BettingStructure::NoLimit,
            Stakes::limit(10, 20),
            100..=1000,
            GameOptions::default(),
        );
        assert!(matches!(result, Err(EngineError::StructureNotAllowed(_))));
    }
}
