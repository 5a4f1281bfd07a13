//! Duel state and its [`GameState`] implementation.

use std::fmt;

use engine_core::game_utils::{result_for, Outcome};
use engine_core::{AdapterError, CardId, GameState, HeroClass, Move, Player};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use crate::cards::{self, CardKind};

/// Cards a hand can hold; further draws are burned.
pub const MAX_HAND: usize = 10;
/// Minions a board can hold.
pub const MAX_BOARD: usize = 7;
/// Mana crystal cap.
pub const MAX_MANA: u8 = 10;
/// Largest supported deck.
pub const MAX_DECK_SIZE: u8 = 30;

/// Match setup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DuelConfig {
    /// Cards each player drafts
    pub deck_size: u8,
    /// Hero health at the start of the match (and the healing cap)
    pub starting_health: i32,
    /// Seed of the generator embedded in the state
    pub seed: u64,
}

impl Default for DuelConfig {
    fn default() -> Self {
        Self {
            deck_size: MAX_DECK_SIZE,
            starting_health: 30,
            seed: 0,
        }
    }
}

impl DuelConfig {
    /// Whether a match can be set up with these values.
    pub fn is_valid(&self) -> bool {
        (1..=MAX_DECK_SIZE).contains(&self.deck_size) && self.starting_health > 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Draft,
    Play,
    Over,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Weapon {
    pub attack: i32,
    pub durability: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Minion {
    pub card: CardId,
    pub attack: i32,
    pub health: i32,
    pub max_health: i32,
    pub taunt: bool,
    pub charge: bool,
    /// Summoning sickness
    pub asleep: bool,
    pub attacks_left: u8,
}

impl Minion {
    /// Summon a minion from its card, if the card is a minion.
    pub fn summon(card: CardId) -> Option<Self> {
        match cards::card(card)?.kind {
            CardKind::Minion {
                attack,
                health,
                taunt,
                charge,
                ..
            } => Some(Self {
                card,
                attack: attack as i32,
                health: health as i32,
                max_health: health as i32,
                taunt,
                charge,
                asleep: !charge,
                attacks_left: 1,
            }),
            CardKind::Spell(_) | CardKind::Weapon { .. } => None,
        }
    }

    pub fn can_attack(&self) -> bool {
        !self.asleep && self.attacks_left > 0 && self.attack > 0
    }
}

/// Everything one player owns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Side {
    pub hero: Option<HeroClass>,
    /// Drafted cards, in pick order
    pub deck: Vec<CardId>,
    pub health: i32,
    pub armor: i32,
    pub weapon: Option<Weapon>,
    /// Attack gained for the current turn only
    pub bonus_attack: i32,
    pub hero_attacked: bool,
    pub ability_used: bool,
    pub mana: u8,
    pub max_mana: u8,
    pub hand: Vec<CardId>,
    /// Shuffled library; the last card is drawn next
    pub library: Vec<CardId>,
    pub board: Vec<Minion>,
    pub fatigue: i32,
}

impl Side {
    fn new(health: i32) -> Self {
        Self {
            hero: None,
            deck: Vec::new(),
            health,
            armor: 0,
            weapon: None,
            bonus_attack: 0,
            hero_attacked: false,
            ability_used: false,
            mana: 0,
            max_mana: 0,
            hand: Vec::new(),
            library: Vec::new(),
            board: Vec::new(),
            fatigue: 0,
        }
    }

    /// Hero attack for this turn.
    pub fn hero_attack(&self) -> i32 {
        self.weapon.map_or(0, |w| w.attack) + self.bonus_attack
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0
    }

    pub fn copies_in_deck(&self, card: CardId) -> usize {
        self.deck.iter().filter(|&&c| c == card).count()
    }
}

/// Full state of a duel, from the first draft pick to the end of the match.
///
/// Cloning copies a few small vectors; the card catalogue is static and shared.
/// The embedded generator is part of the state, so identical states shuffle and
/// roll identically.
#[derive(Debug, Clone)]
pub struct DuelState {
    pub(crate) config: DuelConfig,
    pub(crate) phase: Phase,
    pub(crate) sides: [Side; 2],
    pub(crate) current: Player,
    pub(crate) just_moved: Player,
    pub(crate) turn: u32,
    pub(crate) rng: ChaCha20Rng,
}

impl DuelState {
    /// A fresh match at the first draft pick.
    pub fn new(config: DuelConfig) -> Self {
        Self {
            config,
            phase: Phase::Draft,
            sides: [
                Side::new(config.starting_health),
                Side::new(config.starting_health),
            ],
            current: Player::One,
            just_moved: Player::Two,
            turn: 0,
            rng: ChaCha20Rng::seed_from_u64(config.seed),
        }
    }

    /// Skip the draft: pick both heroes and decks, then start the match.
    ///
    /// Every pick goes through the normal draft rules, so decks breaking class
    /// or copy limits are rejected.
    pub fn from_decks(
        config: DuelConfig,
        decks: [(HeroClass, &[CardId]); 2],
    ) -> Result<Self, AdapterError> {
        let mut state = Self::new(config);
        for (class, deck) in decks {
            state.do_move(&Move::ChooseHero(class))?;
            for &card in deck {
                state.do_move(&Move::ChooseCard(card))?;
            }
        }
        state.do_move(&Move::StartMatch)?;
        Ok(state)
    }

    pub fn config(&self) -> &DuelConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Turn number, 0 during the draft.
    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn side(&self, player: Player) -> &Side {
        &self.sides[player.index()]
    }

    pub(crate) fn side_mut(&mut self, player: Player) -> &mut Side {
        &mut self.sides[player.index()]
    }

    /// How the match ended, `None` while it is running.
    pub fn outcome(&self) -> Option<Outcome> {
        if self.phase != Phase::Over {
            return None;
        }
        match (self.sides[0].is_dead(), self.sides[1].is_dead()) {
            (true, true) | (false, false) => Some(Outcome::Draw),
            (true, false) => Some(Outcome::Winner(Player::Two)),
            (false, true) => Some(Outcome::Winner(Player::One)),
        }
    }

    fn draft_moves(&self) -> Vec<Move> {
        let side = self.side(self.current);
        match side.hero {
            None => HeroClass::ALL.iter().map(|&c| Move::ChooseHero(c)).collect(),
            Some(class) if side.deck.len() < self.config.deck_size as usize => {
                cards::collection(class)
                    .filter(|&card| side.copies_in_deck(card) < cards::deck_limit(card))
                    .map(Move::ChooseCard)
                    .collect()
            }
            Some(_) => vec![Move::StartMatch],
        }
    }

    fn apply_draft(&mut self, mv: &Move) -> Result<(), AdapterError> {
        let player = self.current;
        let deck_size = self.config.deck_size as usize;
        let side = self.side(player);

        match *mv {
            Move::ChooseHero(class) => {
                if side.hero.is_some() {
                    return Err(AdapterError::illegal(mv, "hero already chosen"));
                }
                self.side_mut(player).hero = Some(class);
            }
            Move::ChooseCard(card) => {
                let Some(class) = side.hero else {
                    return Err(AdapterError::illegal(mv, "choose a hero first"));
                };
                if side.deck.len() >= deck_size {
                    return Err(AdapterError::illegal(mv, "deck is full"));
                }
                if !cards::collection(class).any(|c| c == card) {
                    return Err(AdapterError::illegal(mv, "card not in the hero's collection"));
                }
                if side.copies_in_deck(card) >= cards::deck_limit(card) {
                    return Err(AdapterError::illegal(mv, "too many copies"));
                }
                let side = self.side_mut(player);
                side.deck.push(card);
                if side.deck.len() == deck_size && player == Player::One {
                    self.current = Player::Two;
                }
            }
            Move::StartMatch => {
                let ready = self
                    .sides
                    .iter()
                    .all(|s| s.hero.is_some() && s.deck.len() == deck_size);
                if !ready {
                    return Err(AdapterError::illegal(mv, "draft is not finished"));
                }
                self.start_match();
            }
            Move::EndTurn
            | Move::UseAbility { .. }
            | Move::PlayCard { .. }
            | Move::AttackWithMinion { .. }
            | Move::AttackWithHero { .. } => {
                return Err(AdapterError::illegal(mv, "the match has not started"));
            }
        }

        self.just_moved = player;
        Ok(())
    }
}

impl GameState for DuelState {
    type Move = Move;

    fn current_player(&self) -> Player {
        self.current
    }

    fn player_just_moved(&self) -> Player {
        self.just_moved
    }

    fn legal_moves(&self) -> Vec<Move> {
        match self.phase {
            Phase::Draft => self.draft_moves(),
            Phase::Play => self.play_moves(),
            Phase::Over => Vec::new(),
        }
    }

    fn do_move(&mut self, mv: &Move) -> Result<(), AdapterError> {
        match self.phase {
            Phase::Draft => self.apply_draft(mv),
            Phase::Play => self.apply_play(mv),
            Phase::Over => Err(AdapterError::illegal(mv, "the match is over")),
        }
    }

    fn result(&self, perspective: Player) -> f64 {
        result_for(self.outcome(), perspective)
    }

    fn is_terminal(&self) -> bool {
        self.phase == Phase::Over
    }
}

impl fmt::Display for DuelState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.phase {
            Phase::Draft => {
                write!(f, "draft")?;
                for player in Player::ALL {
                    let side = self.side(player);
                    let hero = side.hero.map_or("?", HeroClass::name);
                    write!(
                        f,
                        " | {} {} {}/{}",
                        player,
                        hero,
                        side.deck.len(),
                        self.config.deck_size
                    )?;
                }
                Ok(())
            }
            Phase::Play | Phase::Over => {
                write!(f, "turn {}", self.turn)?;
                for player in Player::ALL {
                    let side = self.side(player);
                    let hero = side.hero.map_or("?", HeroClass::name);
                    write!(
                        f,
                        " | {} {} {}hp",
                        player, hero, side.health
                    )?;
                    if side.armor > 0 {
                        write!(f, "+{}", side.armor)?;
                    }
                    write!(
                        f,
                        " {}/{} mana, {} in hand, {} in library, board [",
                        side.mana,
                        side.max_mana,
                        side.hand.len(),
                        side.library.len()
                    )?;
                    for (i, m) in side.board.iter().enumerate() {
                        if i > 0 {
                            write!(f, " ")?;
                        }
                        write!(f, "{}/{}", m.attack, m.health)?;
                        if m.taunt {
                            write!(f, "T")?;
                        }
                    }
                    write!(f, "]")?;
                }
                if self.phase == Phase::Over {
                    write!(f, " | over")?;
                }
                Ok(())
            }
        }
    }
}
