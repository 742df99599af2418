//! Variant description loading.
//!
//! Descriptions are JSON documents; structurally required fields fail the
//! load, while many betting/ordering fields default with a warning the way
//! hosts expect. Steps parse into the closed `Step` union so the
//! interpreter is a single match over tags.

/// A fully parsed, validated variant description. Immutable after load and
/// freely shareable across game instances behind an `Arc`.
#[derive(Debug, Clone)]
pub struct Rules {
    pub game: String,
    pub min_players: usize,
    pub max_players: usize,
    pub deck: DeckKind,
    pub jokers: usize,
    pub structures: Vec<BettingStructure>,
    pub forced_bets: ForcedBets,
    pub betting_order: BettingOrder,
    pub gameplay: Vec<GameStep>,
    pub showdown: ShowdownRules,
    pub named_bets: BTreeMap<String, u32>,
}

#[derive(Debug, Error)]
pub enum RulesError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("missing required field: {0}")]
    MissingField(String),
    #[error("invalid {field}: {message}")]
    InvalidField { field: String, message: String },
    #[error("deck size {declared} does not match a {kind} deck ({expected})")]
    DeckSizeMismatch {
        declared: usize,
        kind: String,
        expected: usize,
    },
    #[error("minimum players must be at least 2")]
    TooFewPlayers,
    #[error("maximum players must cover the minimum")]
    PlayerRange,
    #[error("gameplay needs {needed} cards but the deck holds {deck}")]
    CardBudget { needed: usize, deck: usize },
    #[error("invalid game step: {0}")]
    InvalidStep(String),
    #[error("evaluation {0} consults suits, which a die deck lacks")]
    SuitAwareOnDie(EvalKind),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Rules {
    pub fn from_path(path: &Path) -> Result<Self, RulesError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, RulesError> {
        let data: Value = serde_json::from_str(text)?;

        for key in ["game", "players", "deck", "bettingStructures", "gamePlay", "showdown"] {
            if data.get(key).is_none() {
                return Err(RulesError::MissingField(key.to_string()));
            }
        }
        const KNOWN: &[&str] = &[
            "game",
            "players",
            "deck",
            "bettingStructures",
            "forcedBets",
            "bettingOrder",
            "gamePlay",
            "showdown",
            "namedBets",
            "references",
        ];
        if let Some(object) = data.as_object() {
            for key in object.keys() {
                if !KNOWN.contains(&key.as_str()) {
                    log::warn!("ignoring unknown top-level key '{}'", key);
                }
            }
        }

        let game = required_str(&data, "game")?.to_string();
        let players = &data["players"];
        let min_players = required_usize(players, "min", "players.min")?;
        let max_players = required_usize(players, "max", "players.max")?;

        let deck_data = &data["deck"];
        let deck_name = required_str(deck_data, "type").map_err(|_| RulesError::MissingField("deck.type".to_string()))?;
        let deck = DeckKind::try_from(deck_name).map_err(|message| RulesError::InvalidField {
            field: "deck.type".to_string(),
            message,
        })?;
        let declared = required_usize(deck_data, "cards", "deck.cards")?;
        let jokers = deck_data
            .get("jokers")
            .and_then(Value::as_u64)
            .unwrap_or(0) as usize;

        let structures = data["bettingStructures"]
            .as_array()
            .ok_or_else(|| RulesError::MissingField("bettingStructures".to_string()))?
            .iter()
            .map(|v| {
                v.as_str()
                    .ok_or_else(|| "not a string".to_string())
                    .and_then(BettingStructure::try_from)
                    .map_err(|message| RulesError::InvalidField {
                        field: "bettingStructures".to_string(),
                        message,
                    })
            })
            .collect::<Result<Vec<BettingStructure>, RulesError>>()?;

        let forced_bets = parse_forced_bets(data.get("forcedBets"));
        let betting_order = parse_betting_order(data.get("bettingOrder"), &forced_bets);

        let gameplay = data["gamePlay"]
            .as_array()
            .ok_or_else(|| RulesError::MissingField("gamePlay".to_string()))?
            .iter()
            .map(parse_step)
            .collect::<Result<Vec<GameStep>, RulesError>>()?;

        let showdown = parse_showdown(&data["showdown"])?;

        let named_bets = data
            .get("namedBets")
            .and_then(Value::as_object)
            .map(|object| {
                object
                    .iter()
                    .filter_map(|(k, v)| v.as_u64().map(|n| (k.clone(), n as u32)))
                    .collect::<BTreeMap<String, u32>>()
            })
            .unwrap_or_default();

        let rules = Self {
            game,
            min_players,
            max_players,
            deck,
            jokers,
            structures,
            forced_bets,
            betting_order,
            gameplay,
            showdown,
            named_bets,
        };
        rules.validate(declared)?;
        Ok(rules)
    }

    fn validate(&self, declared: usize) -> Result<(), RulesError> {
        if self.min_players < 2 {
            return Err(RulesError::TooFewPlayers);
        }
        if self.max_players < self.min_players {
            return Err(RulesError::PlayerRange);
        }
        if declared != self.deck.size() {
            return Err(RulesError::DeckSizeMismatch {
                declared,
                kind: self.deck.to_string(),
                expected: self.deck.size(),
            });
        }

        let mut needed = 0;
        for step in self.gameplay.iter() {
            needed += card_budget(&step.step, self.max_players);
        }
        let deck_size = self.deck.size() + self.jokers;
        if needed > deck_size {
            return Err(RulesError::CardBudget {
                needed,
                deck: deck_size,
            });
        }

        if !self.deck.suited() {
            for kind in self.eval_kinds() {
                if kind.suit_aware() {
                    return Err(RulesError::SuitAwareOnDie(kind));
                }
            }
        }
        Ok(())
    }

    /// every evaluation type the description can reach
    pub fn eval_kinds(&self) -> Vec<EvalKind> {
        let mut kinds = Vec::new();
        let mut push = |kind: EvalKind| {
            if !kinds.contains(&kind) {
                kinds.push(kind);
            }
        };
        for hand in self
            .showdown
            .best_hand
            .iter()
            .chain(self.showdown.default_best_hand.iter())
            .chain(
                self.showdown
                    .conditional_best_hands
                    .iter()
                    .flat_map(|(_, hands)| hands.iter()),
            )
        {
            push(hand.eval);
        }
        for default in self.showdown.default_actions.iter() {
            if let DefaultAction::BestHand(kind) = &default.action {
                push(*kind);
            }
        }
        if let Some(DefaultAction::BestHand(kind)) = &self.showdown.global_default_action {
            push(*kind);
        }
        kinds
    }

    /// the highest-priority structure the variant allows
    pub fn allows(&self, structure: BettingStructure) -> bool {
        self.structures.contains(&structure)
    }
}

fn required_str<'a>(data: &'a Value, key: &str) -> Result<&'a str, RulesError> {
    data.get(key)
        .and_then(Value::as_str)
        .ok_or_else(|| RulesError::MissingField(key.to_string()))
}

fn required_usize(data: &Value, key: &str, field: &str) -> Result<usize, RulesError> {
    data.get(key)
        .and_then(Value::as_u64)
        .map(|n| n as usize)
        .ok_or_else(|| RulesError::MissingField(field.to_string()))
}

fn parse_forced_bets(data: Option<&Value>) -> ForcedBets {
    let Some(data) = data.filter(|v| !v.is_null()) else {
        return Conditional::Static(ForcedBetRule::blinds());
    };
    if let Some(orders) = data.get("conditionalOrders").and_then(Value::as_array) {
        let parsed = orders
            .iter()
            .filter_map(|order| {
                let condition = order.get("condition").and_then(Value::as_str);
                let rule = order.get("forcedBet");
                match (condition, rule) {
                    (Some(condition), Some(rule)) => {
                        Some((condition.to_string(), parse_forced_rule(rule)))
                    }
                    _ => {
                        log::warn!("conditional forced bet missing condition or forcedBet");
                        None
                    }
                }
            })
            .collect::<Vec<(String, ForcedBetRule)>>();
        let default = data
            .get("default")
            .map(parse_forced_rule)
            .unwrap_or_else(|| {
                log::warn!("conditional forced bets without a default, assuming blinds");
                ForcedBetRule::blinds()
            });
        return Conditional::Switch {
            orders: parsed,
            default,
        };
    }
    Conditional::Static(parse_forced_rule(data))
}

fn parse_forced_rule(data: &Value) -> ForcedBetRule {
    let style = data
        .get("style")
        .and_then(Value::as_str)
        .and_then(|s| match ForcedBetStyle::try_from(s) {
            Ok(style) => Some(style),
            Err(message) => {
                log::warn!("{}, defaulting to blinds", message);
                None
            }
        })
        .unwrap_or(ForcedBetStyle::Blinds);
    let mut rule = data
        .get("rule")
        .and_then(Value::as_str)
        .and_then(|s| match CardRule::try_from(s) {
            Ok(rule) => Some(rule),
            Err(message) => {
                log::warn!("{}, ignoring", message);
                None
            }
        });
    if style == ForcedBetStyle::BringIn && rule.is_none() {
        log::warn!("bring-in forced bets need a rule, defaulting to 'low card'");
        rule = Some(CardRule::LowCard);
    }
    let bring_in_eval = data
        .get("bringInEval")
        .and_then(Value::as_str)
        .and_then(|s| EvalKind::try_from(s).ok());
    ForcedBetRule {
        style,
        rule,
        bring_in_eval,
    }
}

fn parse_betting_order(data: Option<&Value>, forced: &ForcedBets) -> BettingOrder {
    let implied = BettingOrder::implied_by(forced.default_value().style);
    let Some(data) = data.filter(|v| !v.is_null()) else {
        return implied;
    };

    // last_actor is only meaningful once a round has been played, so the
    // initial order draws from the narrower allowlist
    let initial = data
        .get("initial")
        .and_then(Value::as_str)
        .and_then(|s| match FirstActor::try_from(s) {
            Ok(FirstActor::LastActor) => {
                log::warn!(
                    "bettingOrder.initial cannot be 'last_actor', defaulting from forced bets"
                );
                None
            }
            Ok(actor) => Some(actor),
            Err(message) => {
                log::warn!("{}, defaulting from forced bets", message);
                None
            }
        })
        .unwrap_or(implied.initial);

    let subsequent = match data.get("subsequent") {
        Some(Value::String(s)) => match FirstActor::try_from(s.as_str()) {
            Ok(actor) => Conditional::Static(actor),
            Err(message) => {
                log::warn!("{}, defaulting from forced bets", message);
                implied.subsequent.clone()
            }
        },
        Some(Value::Object(object)) => {
            let orders = object
                .get("conditionalOrders")
                .and_then(Value::as_array)
                .map(|orders| {
                    orders
                        .iter()
                        .filter_map(|order| {
                            let condition = order.get("condition").and_then(Value::as_str)?;
                            let actor = order
                                .get("order")
                                .and_then(Value::as_str)
                                .and_then(|s| FirstActor::try_from(s).ok())?;
                            Some((condition.to_string(), actor))
                        })
                        .collect::<Vec<(String, FirstActor)>>()
                });
            let default = object
                .get("default")
                .and_then(Value::as_str)
                .and_then(|s| FirstActor::try_from(s).ok());
            match (orders, default) {
                (Some(orders), Some(default)) => Conditional::Switch { orders, default },
                _ => {
                    log::warn!("invalid conditional betting order, defaulting from forced bets");
                    implied.subsequent.clone()
                }
            }
        }
        _ => implied.subsequent.clone(),
    };

    BettingOrder {
        initial,
        subsequent,
    }
}

fn parse_step(data: &Value) -> Result<GameStep, RulesError> {
    let name = data
        .get("name")
        .and_then(Value::as_str)
        .unwrap_or("Unnamed Step")
        .to_string();
    if let Some(grouped) = data.get("groupedActions").and_then(Value::as_array) {
        let steps = grouped
            .iter()
            .map(parse_action)
            .collect::<Result<Vec<Step>, RulesError>>()?;
        return Ok(GameStep {
            name,
            step: Step::Grouped(steps),
        });
    }
    let mut step = parse_action(data)?;
    // conditional state may ride at the step level
    if let Step::Deal { condition, .. } = &mut step {
        if condition.is_none() {
            *condition = data
                .get("conditional_state")
                .and_then(|c| parse_deal_condition(c));
        }
    }
    Ok(GameStep { name, step })
}

/// dispatch on the first recognized action key
fn parse_action(data: &Value) -> Result<Step, RulesError> {
    let object = data
        .as_object()
        .ok_or_else(|| RulesError::InvalidStep(data.to_string()))?;
    for (key, config) in object.iter() {
        let step = match key.as_str() {
            "bet" => Some(Step::Bet(parse_bet_kind(config))),
            "deal" => Some(parse_deal(config)?),
            "draw" => Some(Step::Draw(parse_card_specs(config)?)),
            "discard" => Some(Step::Discard(parse_card_specs(config)?)),
            "expose" => Some(Step::Expose(parse_card_specs(config)?)),
            "pass" => Some(Step::Pass(parse_card_specs(config)?)),
            "separate" => Some(Step::Separate(parse_card_specs(config)?)),
            "declare" => Some(Step::Declare {
                options: parse_string_list(config.get("options")).unwrap_or_else(|| {
                    vec!["high".to_string(), "low".to_string(), "high_low".to_string()]
                }),
            }),
            "choose" => Some(Step::Choose {
                options: parse_string_list(config.get("options")).unwrap_or_default(),
                label: config
                    .get("value")
                    .or_else(|| config.get("name"))
                    .and_then(Value::as_str)
                    .unwrap_or("choice")
                    .to_string(),
            }),
            "roll_die" => Some(Step::RollDie),
            "replace_community" | "replaceCommunity" => Some(Step::ReplaceCommunity {
                subset: config
                    .get("subset")
                    .and_then(Value::as_str)
                    .unwrap_or(DEFAULT_SUBSET)
                    .to_string(),
                number: config.get("number").and_then(Value::as_u64).unwrap_or(1) as usize,
            }),
            "remove" => Some(Step::Remove {
                subset: config
                    .get("subset")
                    .and_then(Value::as_str)
                    .unwrap_or(DEFAULT_SUBSET)
                    .to_string(),
                number: config.get("number").and_then(Value::as_u64).unwrap_or(1) as usize,
            }),
            "showdown" => Some(Step::Showdown),
            _ => None,
        };
        if let Some(step) = step {
            return Ok(step);
        }
    }
    Err(RulesError::InvalidStep(data.to_string()))
}

fn parse_bet_kind(config: &Value) -> BetKind {
    match config.get("type").and_then(Value::as_str) {
        Some("blinds") => BetKind::Blinds,
        Some("antes") => BetKind::Antes,
        Some("bring-in") => BetKind::BringIn,
        Some("small") => BetKind::Small,
        Some("big") => BetKind::Big,
        Some(named) => BetKind::Named(named.to_string()),
        None => {
            log::warn!("bet step without a type, assuming small");
            BetKind::Small
        }
    }
}

fn parse_deal(config: &Value) -> Result<Step, RulesError> {
    let target = match config.get("location").and_then(Value::as_str) {
        Some("community") => DealTarget::Community,
        Some("player") | None => DealTarget::Player,
        Some(other) => {
            return Err(RulesError::InvalidField {
                field: "deal.location".to_string(),
                message: format!("unknown location: {}", other),
            });
        }
    };
    let cards = parse_card_specs(config)?;
    let condition = match config.get("conditional_state") {
        Some(state) => match parse_deal_condition(state) {
            Some(condition) => Some(condition),
            None => {
                return Err(RulesError::InvalidField {
                    field: "deal.conditional_state".to_string(),
                    message: "color_check must specify color and min_count".to_string(),
                });
            }
        },
        None => None,
    };
    Ok(Step::Deal {
        target,
        cards,
        condition,
    })
}

fn parse_deal_condition(data: &Value) -> Option<DealCondition> {
    let kind = data.get("type").and_then(Value::as_str)?.to_string();
    let check = data.get("color_check")?;
    let color = match check.get("color").and_then(Value::as_str)? {
        "red" => Color::Red,
        "black" => Color::Black,
        _ => return None,
    };
    let min_count = check.get("min_count").and_then(Value::as_u64)? as usize;
    let raises = data
        .get("raises")
        .and_then(Value::as_str)
        .unwrap_or(kind.as_str())
        .to_string();
    Some(DealCondition {
        kind,
        color,
        min_count,
        raises,
    })
}

fn parse_card_specs(config: &Value) -> Result<Vec<CardSpec>, RulesError> {
    let Some(cards) = config.get("cards").and_then(Value::as_array) else {
        return Ok(Vec::new());
    };
    cards.iter().map(parse_card_spec).collect()
}

fn parse_card_spec(data: &Value) -> Result<CardSpec, RulesError> {
    let number = data.get("number").and_then(Value::as_u64).unwrap_or(1) as usize;
    let state = match data.get("state").and_then(Value::as_str) {
        Some("face up") => Visibility::FaceUp,
        Some("face down") | None => Visibility::FaceDown,
        Some(other) => {
            return Err(RulesError::InvalidField {
                field: "cards.state".to_string(),
                message: format!("unknown card state: {}", other),
            });
        }
    };
    let subsets = match data.get("subset") {
        Some(Value::String(s)) => vec![s.clone()],
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(String::from)
            .collect(),
        _ => Vec::new(),
    };
    let direction = match data.get("direction").and_then(Value::as_str) {
        Some("right") => PassDirection::Right,
        _ => PassDirection::Left,
    };
    Ok(CardSpec {
        number,
        min_number: data.get("min_number").and_then(Value::as_u64).map(|n| n as usize),
        state,
        subsets,
        hole_subset: data
            .get("hole_subset")
            .and_then(Value::as_str)
            .map(String::from),
        direction,
        preserve_state: data
            .get("preserve_state")
            .and_then(Value::as_bool)
            .unwrap_or(false),
        wild_rules: parse_wild_rules(data.get("wildCards")),
    })
}

fn parse_wild_rules(data: Option<&Value>) -> Vec<WildRule> {
    let Some(rules) = data.and_then(Value::as_array) else {
        return Vec::new();
    };
    rules
        .iter()
        .filter_map(|rule| {
            let role = match rule.get("role").and_then(Value::as_str) {
                Some("bug") => WildRole::Bug,
                _ => WildRole::Wild,
            };
            let target = match rule.get("type").and_then(Value::as_str)? {
                "joker" => WildTarget::Joker,
                "rank" => {
                    let rank = rule.get("rank").and_then(Value::as_str)?;
                    let rank = Rank::try_from(rank.chars().next()?).ok()?;
                    WildTarget::Rank(rank)
                }
                "lowest_community" => WildTarget::LowestCommunity,
                "lowest_hole" => WildTarget::LowestHole,
                "last_community_card" => WildTarget::LastCommunityCard,
                other => {
                    log::warn!("ignoring unknown wild card type '{}'", other);
                    return None;
                }
            };
            Some(WildRule { target, role })
        })
        .collect()
}

fn parse_string_list(data: Option<&Value>) -> Option<Vec<String>> {
    data.and_then(Value::as_array).map(|items| {
        items
            .iter()
            .filter_map(Value::as_str)
            .map(String::from)
            .collect()
    })
}

fn parse_counts(data: Option<&Value>) -> Option<Counts> {
    match data? {
        Value::Number(n) => n.as_u64().map(|n| Counts::Exact(n as usize)),
        Value::Array(items) => Some(Counts::OneOf(
            items
                .iter()
                .filter_map(Value::as_u64)
                .map(|n| n as usize)
                .collect(),
        )),
        _ => None,
    }
}

fn parse_showdown(data: &Value) -> Result<ShowdownRules, RulesError> {
    let order = data
        .get("order")
        .and_then(Value::as_str)
        .unwrap_or("clockwise")
        .to_string();
    let starting_from = data
        .get("startingFrom")
        .and_then(Value::as_str)
        .unwrap_or("dealer")
        .to_string();
    let cards_required = data
        .get("cardsRequired")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let declaration_mode = match data.get("declaration_mode").and_then(Value::as_str) {
        Some("declare") => DeclarationMode::Declare,
        _ => DeclarationMode::CardsSpeak,
    };

    let best_hand = parse_best_hands(data.get("bestHand"))?;
    let default_best_hand = parse_best_hands(data.get("defaultBestHand"))?;
    let conditional_best_hands = data
        .get("conditionalBestHands")
        .and_then(Value::as_array)
        .map(|conditionals| {
            conditionals
                .iter()
                .filter_map(|entry| {
                    let condition = entry.get("condition").and_then(Value::as_str)?;
                    let hands = parse_best_hands(entry.get("bestHand")).ok()?;
                    Some((condition.to_string(), hands))
                })
                .collect::<Vec<(String, Vec<BestHand>)>>()
        })
        .unwrap_or_default();

    let global_default_action = data
        .get("globalDefaultAction")
        .and_then(parse_default_action);
    let default_actions = data
        .get("defaultActions")
        .and_then(Value::as_array)
        .map(|actions| {
            actions
                .iter()
                .filter_map(|entry| {
                    let action = entry
                        .get("action")
                        .and_then(parse_default_action)
                        .or_else(|| parse_default_action(entry))?;
                    Some(PerPotDefault {
                        applies_to: entry
                            .get("appliesTo")
                            .and_then(Value::as_str)
                            .map(String::from),
                        action,
                    })
                })
                .collect::<Vec<PerPotDefault>>()
        })
        .unwrap_or_default();

    let classification_priority = parse_string_list(data.get("classification_priority"))
        .unwrap_or_default();

    Ok(ShowdownRules {
        order,
        starting_from,
        cards_required,
        declaration_mode,
        best_hand,
        conditional_best_hands,
        default_best_hand,
        global_default_action,
        default_actions,
        classification_priority,
    })
}

fn parse_best_hands(data: Option<&Value>) -> Result<Vec<BestHand>, RulesError> {
    let Some(hands) = data.and_then(Value::as_array) else {
        return Ok(Vec::new());
    };
    hands
        .iter()
        .map(|entry| {
            let eval = match entry.get("evaluationType").and_then(Value::as_str) {
                Some(name) => EvalKind::try_from(name).map_err(|message| {
                    RulesError::InvalidField {
                        field: "bestHand.evaluationType".to_string(),
                        message,
                    }
                })?,
                None => {
                    log::warn!("bestHand entry without evaluationType, assuming high");
                    EvalKind::High
                }
            };
            let name = entry
                .get("name")
                .and_then(Value::as_str)
                .unwrap_or("Hand")
                .to_string();
            let qualifier = entry.get("qualifier").and_then(Value::as_array).and_then(|q| {
                match (q.first().and_then(Value::as_u64), q.get(1).and_then(Value::as_u64)) {
                    (Some(rank), Some(ordered)) => {
                        Some(Qualifier::from((rank as u32, ordered as u32)))
                    }
                    _ => None,
                }
            });
            Ok(BestHand {
                name,
                eval,
                hole_cards: parse_counts(entry.get("holeCards")),
                community_cards: parse_counts(entry.get("communityCards")),
                any_cards: entry
                    .get("anyCards")
                    .and_then(Value::as_u64)
                    .map(|n| n as usize),
                subset: entry
                    .get("subset")
                    .or_else(|| entry.get("board"))
                    .and_then(Value::as_str)
                    .map(String::from),
                hole_subset: entry
                    .get("hole_subset")
                    .and_then(Value::as_str)
                    .map(String::from),
                qualifier,
                wild_rules: parse_wild_rules(entry.get("wildCards")),
            })
        })
        .collect()
}

fn parse_default_action(data: &Value) -> Option<DefaultAction> {
    let action = data.get("action").unwrap_or(data);
    match action.get("type").and_then(Value::as_str)? {
        "split_pot" => Some(DefaultAction::SplitAmongEligible),
        "best_hand" => action
            .get("evaluationType")
            .and_then(Value::as_str)
            .and_then(|name| EvalKind::try_from(name).ok())
            .map(DefaultAction::BestHand),
        "roll_to" => action
            .get("name")
            .and_then(Value::as_str)
            .map(|name| DefaultAction::RollTo(name.to_string())),
        other => {
            log::warn!("ignoring unknown default action '{}'", other);
            None
        }
    }
}

fn card_budget(step: &Step, max_players: usize) -> usize {
    match step {
        Step::Deal { target, cards, .. } => {
            let per: usize = cards.iter().map(|c| c.number).sum();
            match target {
                DealTarget::Player => per * max_players,
                DealTarget::Community => per,
            }
        }
        Step::Grouped(steps) => steps.iter().map(|s| card_budget(s, max_players)).sum(),
        _ => 0,
    }
}

use super::conditional::Conditional;
use super::forced::{ForcedBetRule, ForcedBetStyle, ForcedBets};
use super::order::{BettingOrder, FirstActor};
use super::showdown::{
    BestHand, Counts, DeclarationMode, DefaultAction, PerPotDefault, ShowdownRules, WildRole,
    WildRule, WildTarget,
};
use super::step::{BetKind, CardSpec, DealCondition, DealTarget, GameStep, PassDirection, Step};
use crate::betting::BettingStructure;
use crate::betting::bringin::CardRule;
use crate::cards::board::DEFAULT_SUBSET;
use crate::cards::card::Visibility;
use crate::cards::deck::DeckKind;
use crate::cards::rank::Rank;
use crate::cards::suit::Color;
use crate::evaluation::kind::EvalKind;
use crate::evaluation::ranking::Qualifier;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

#[cfg(test)]
mod tests {
    use super::*;

    fn holdem_json() -> String {
        r#"{
            "game": "Hold'em",
            "players": {"min": 2, "max": 9},
            "deck": {"type": "standard", "cards": 52},
            "bettingStructures": ["Limit", "No Limit", "Pot Limit"],
            "forcedBets": {"style": "blinds"},
            "bettingOrder": {"initial": "after_big_blind", "subsequent": "dealer"},
            "gamePlay": [
                {"bet": {"type": "blinds"}, "name": "Post Blinds"},
                {"deal": {"location": "player", "cards": [{"number": 2, "state": "face down"}]}, "name": "Deal Hole Cards"},
                {"bet": {"type": "small"}, "name": "Pre-Flop Bet"},
                {"deal": {"location": "community", "cards": [{"number": 3, "state": "face up"}]}, "name": "Deal Flop"},
                {"bet": {"type": "small"}, "name": "Flop Bet"},
                {"deal": {"location": "community", "cards": [{"number": 1, "state": "face up"}]}, "name": "Deal Turn"},
                {"bet": {"type": "big"}, "name": "Turn Bet"},
                {"deal": {"location": "community", "cards": [{"number": 1, "state": "face up"}]}, "name": "Deal River"},
                {"bet": {"type": "big"}, "name": "River Bet"},
                {"showdown": {"type": "final"}, "name": "Showdown"}
            ],
            "showdown": {
                "order": "clockwise",
                "startingFrom": "dealer",
                "cardsRequired": "any combination of hole and community cards",
                "bestHand": [{"evaluationType": "high", "anyCards": 5}]
            }
        }"#
        .to_string()
    }

    #[test]
    fn bundled_demo_variants_load() {
        for (name, text) in [
            ("holdem", include_str!("../../demos/holdem.json")),
            ("omaha_8", include_str!("../../demos/omaha_8.json")),
            ("seven_card_stud", include_str!("../../demos/seven_card_stud.json")),
            ("razz", include_str!("../../demos/razz.json")),
            ("five_card_draw", include_str!("../../demos/five_card_draw.json")),
            ("badugi", include_str!("../../demos/badugi.json")),
        ] {
            let rules = Rules::from_json(text).unwrap_or_else(|e| panic!("{}: {}", name, e));
            assert!(rules.min_players >= 2, "{}", name);
            assert!(!rules.gameplay.is_empty(), "{}", name);
            assert!(
                matches!(rules.gameplay.last().unwrap().step, Step::Showdown),
                "{} should end at showdown",
                name
            );
        }
    }

    #[test]
    fn loads_holdem() {
        let rules = Rules::from_json(&holdem_json()).unwrap();
        assert_eq!(rules.game, "Hold'em");
        assert_eq!(rules.gameplay.len(), 10);
        assert_eq!(rules.deck, DeckKind::Standard);
        assert!(rules.allows(BettingStructure::NoLimit));
        assert!(matches!(rules.gameplay[0].step, Step::Bet(BetKind::Blinds)));
        assert!(matches!(rules.gameplay[9].step, Step::Showdown));
    }

    #[test]
    fn missing_required_field_fails() {
        let result = Rules::from_json(r#"{"game": "Broken"}"#);
        assert!(matches!(result, Err(RulesError::MissingField(_))));
    }

    #[test]
    fn wrong_deck_size_fails() {
        let broken = holdem_json().replace(r#""cards": 52"#, r#""cards": 40"#);
        assert!(matches!(
            Rules::from_json(&broken),
            Err(RulesError::DeckSizeMismatch { .. })
        ));
    }

    #[test]
    fn over_dealt_gameplay_fails() {
        let broken = holdem_json().replace(r#""number": 2, "state": "face down""#, r#""number": 7, "state": "face down""#);
        assert!(matches!(
            Rules::from_json(&broken),
            Err(RulesError::CardBudget { .. })
        ));
    }

    #[test]
    fn betting_order_defaults_follow_forced_bets() {
        let stripped = holdem_json().replace(
            r#""bettingOrder": {"initial": "after_big_blind", "subsequent": "dealer"},"#,
            "",
        );
        let rules = Rules::from_json(&stripped).unwrap();
        assert_eq!(rules.betting_order.initial, FirstActor::AfterBigBlind);
        assert_eq!(
            *rules.betting_order.subsequent.default_value(),
            FirstActor::Dealer
        );
    }

    #[test]
    fn last_actor_is_not_a_valid_initial_order() {
        let swapped = holdem_json().replace(
            r#""initial": "after_big_blind""#,
            r#""initial": "last_actor""#,
        );
        let rules = Rules::from_json(&swapped).unwrap();
        // defaults from the blinds style instead of loading last_actor
        assert_eq!(rules.betting_order.initial, FirstActor::AfterBigBlind);
        // subsequent keeps the broader allowlist
        let kept = holdem_json().replace(
            r#""subsequent": "dealer""#,
            r#""subsequent": "last_actor""#,
        );
        let rules = Rules::from_json(&kept).unwrap();
        assert_eq!(
            *rules.betting_order.subsequent.default_value(),
            FirstActor::LastActor
        );
    }

    #[test]
    fn die_deck_rejects_suit_aware_evaluation() {
        let broken = holdem_json()
            .replace(r#""type": "standard", "cards": 52"#, r#""type": "die", "cards": 6"#)
            .replace(
                r#"{"deal": {"location": "player", "cards": [{"number": 2, "state": "face down"}]}, "name": "Deal Hole Cards"},"#,
                "",
            )
            .replace(
                r#"{"deal": {"location": "community", "cards": [{"number": 3, "state": "face up"}]}, "name": "Deal Flop"},"#,
                "",
            )
            .replace(
                r#"{"deal": {"location": "community", "cards": [{"number": 1, "state": "face up"}]}, "name": "Deal Turn"},"#,
                "",
            )
            .replace(
                r#"{"deal": {"location": "community", "cards": [{"number": 1, "state": "face up"}]}, "name": "Deal River"},"#,
                "",
            );
        assert!(matches!(
            Rules::from_json(&broken),
            Err(RulesError::SuitAwareOnDie(EvalKind::High))
        ));
    }

    #[test]
    fn qualifier_arrays_parse() {
        let hilo = holdem_json().replace(
            r#""bestHand": [{"evaluationType": "high", "anyCards": 5}]"#,
            r#""bestHand": [
                {"name": "High", "evaluationType": "high", "anyCards": 5},
                {"name": "Low", "evaluationType": "a5_low", "anyCards": 5, "qualifier": [1, 56]}
            ]"#,
        );
        let rules = Rules::from_json(&hilo).unwrap();
        assert_eq!(rules.showdown.best_hand.len(), 2);
        let low = &rules.showdown.best_hand[1];
        assert_eq!(low.eval, EvalKind::A5Low);
        assert_eq!(low.qualifier, Some(Qualifier::from((1, 56))));
    }

    #[test]
    fn grouped_actions_parse() {
        let grouped = holdem_json().replace(
            r#"{"bet": {"type": "small"}, "name": "Pre-Flop Bet"},"#,
            r#"{"groupedActions": [
                {"discard": {"cards": [{"number": 1, "state": "face down"}]}},
                {"bet": {"type": "small"}}
            ], "name": "Discard and Bet"},"#,
        );
        let rules = Rules::from_json(&grouped).unwrap();
        assert!(matches!(&rules.gameplay[2].step, Step::Grouped(steps) if steps.len() == 2));
    }
}
