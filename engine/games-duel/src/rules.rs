//! Play-phase rules: move generation, validation and resolution.
//!
//! Every move is validated completely before the first mutation, so a
//! rejected move leaves the state untouched.

use engine_core::{AdapterError, CardId, HeroClass, Move, Player};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::cards::{self, CardDef, CardKind, Effect};
use crate::state::{DuelState, Minion, Phase, Weapon, MAX_BOARD, MAX_HAND, MAX_MANA};

/// Mana cost of every hero ability.
pub const ABILITY_COST: u8 = 2;

/// Cards dealt before the first turn, per seat.
const OPENING_HAND: [usize; 2] = [3, 4];

/// A hero or a minion on one side of the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Character {
    Hero(Player),
    Minion(Player, usize),
}

/// Whether a class ability asks for a target.
pub fn ability_needs_target(class: HeroClass) -> bool {
    match class {
        HeroClass::Mage | HeroClass::Priest => true,
        HeroClass::Druid
        | HeroClass::Hunter
        | HeroClass::Paladin
        | HeroClass::Rogue
        | HeroClass::Shaman
        | HeroClass::Warlock
        | HeroClass::Warrior => false,
    }
}

/// Whether a class ability puts a minion on the board.
fn ability_summons(class: HeroClass) -> bool {
    matches!(class, HeroClass::Paladin | HeroClass::Shaman)
}

impl DuelState {
    /// Targets for spells, battlecries and abilities, as seen by the player to
    /// act: own hero, own minions, enemy hero, enemy minions.
    pub fn character_targets(&self) -> Vec<Character> {
        let me = self.current;
        let foe = me.opponent();
        let mut targets = Vec::with_capacity(2 + 2 * MAX_BOARD);
        targets.push(Character::Hero(me));
        targets.extend((0..self.side(me).board.len()).map(|i| Character::Minion(me, i)));
        targets.push(Character::Hero(foe));
        targets.extend((0..self.side(foe).board.len()).map(|i| Character::Minion(foe, i)));
        targets
    }

    /// Legal attack targets: enemy taunt minions if there are any, otherwise
    /// the enemy hero followed by the enemy minions.
    pub fn attack_targets(&self) -> Vec<Character> {
        let foe = self.current.opponent();
        let board = &self.side(foe).board;
        let taunts: Vec<Character> = board
            .iter()
            .enumerate()
            .filter(|(_, m)| m.taunt)
            .map(|(i, _)| Character::Minion(foe, i))
            .collect();
        if !taunts.is_empty() {
            return taunts;
        }
        let mut targets = Vec::with_capacity(1 + board.len());
        targets.push(Character::Hero(foe));
        targets.extend((0..board.len()).map(|i| Character::Minion(foe, i)));
        targets
    }

    fn can_play(&self, def: &CardDef) -> bool {
        let side = self.side(self.current);
        def.cost <= side.mana && (!def.is_minion() || side.board.len() < MAX_BOARD)
    }

    fn ability_available(&self) -> Option<HeroClass> {
        let side = self.side(self.current);
        let class = side.hero?;
        let usable = !side.ability_used
            && side.mana >= ABILITY_COST
            && (!ability_summons(class) || side.board.len() < MAX_BOARD);
        usable.then_some(class)
    }

    pub(crate) fn play_moves(&self) -> Vec<Move> {
        let side = self.side(self.current);
        let mut moves = Vec::new();
        let n_targets = self.character_targets().len();

        // Cards, first copy of each distinct card only
        let mut seen: Vec<CardId> = Vec::with_capacity(side.hand.len());
        for (i, &card) in side.hand.iter().enumerate() {
            if seen.contains(&card) {
                continue;
            }
            seen.push(card);
            let Some(def) = cards::card(card) else {
                continue;
            };
            if !self.can_play(def) {
                continue;
            }
            let hand_index = i as u8;
            if def.needs_target() {
                moves.extend((0..n_targets).map(|t| Move::PlayCard {
                    card,
                    hand_index,
                    target: Some(t as u8),
                }));
            } else {
                moves.push(Move::PlayCard {
                    card,
                    hand_index,
                    target: None,
                });
            }
        }

        // Hero ability
        if let Some(class) = self.ability_available() {
            if ability_needs_target(class) {
                moves.extend((0..n_targets).map(|t| Move::UseAbility {
                    target: Some(t as u8),
                }));
            } else {
                moves.push(Move::UseAbility { target: None });
            }
        }

        // Attacks
        let n_attack_targets = self.attack_targets().len();
        for (i, minion) in side.board.iter().enumerate() {
            if minion.can_attack() {
                moves.extend((0..n_attack_targets).map(|t| Move::AttackWithMinion {
                    card: minion.card,
                    field_index: i as u8,
                    target: t as u8,
                }));
            }
        }
        if side.hero_attack() > 0 && !side.hero_attacked {
            moves.extend((0..n_attack_targets).map(|t| Move::AttackWithHero { target: t as u8 }));
        }

        moves.push(Move::EndTurn);
        moves
    }

    pub(crate) fn apply_play(&mut self, mv: &Move) -> Result<(), AdapterError> {
        let player = self.current;

        match *mv {
            Move::EndTurn => self.end_turn(),
            Move::PlayCard {
                card,
                hand_index,
                target,
            } => {
                let side = self.side(player);
                if side.hand.get(hand_index as usize) != Some(&card) {
                    return Err(AdapterError::illegal(mv, "card is not at that hand index"));
                }
                let Some(def) = cards::card(card) else {
                    return Err(AdapterError::illegal(mv, "unknown card"));
                };
                if def.cost > side.mana {
                    return Err(AdapterError::illegal(mv, "not enough mana"));
                }
                if !self.can_play(def) {
                    return Err(AdapterError::illegal(mv, "board is full"));
                }
                let target = self.resolve_target(mv, def.needs_target(), target)?;
                self.play_card(hand_index as usize, def, card, target);
            }
            Move::UseAbility { target } => {
                let Some(class) = self.ability_available() else {
                    return Err(AdapterError::illegal(mv, "ability is not available"));
                };
                let target = self.resolve_target(mv, ability_needs_target(class), target)?;
                self.use_ability(class, target);
            }
            Move::AttackWithMinion {
                card,
                field_index,
                target,
            } => {
                let attacker = match self.side(player).board.get(field_index as usize) {
                    Some(m) if m.card == card => m,
                    _ => return Err(AdapterError::illegal(mv, "minion is not at that field index")),
                };
                if !attacker.can_attack() {
                    return Err(AdapterError::illegal(mv, "minion cannot attack"));
                }
                let Some(&defender) = self.attack_targets().get(target as usize) else {
                    return Err(AdapterError::illegal(mv, "no such attack target"));
                };
                self.minion_attack(field_index as usize, defender);
            }
            Move::AttackWithHero { target } => {
                let side = self.side(player);
                if side.hero_attack() <= 0 || side.hero_attacked {
                    return Err(AdapterError::illegal(mv, "hero cannot attack"));
                }
                let Some(&defender) = self.attack_targets().get(target as usize) else {
                    return Err(AdapterError::illegal(mv, "no such attack target"));
                };
                self.hero_attack(defender);
            }
            Move::StartMatch | Move::ChooseHero(_) | Move::ChooseCard(_) => {
                return Err(AdapterError::illegal(mv, "only allowed during the draft"));
            }
        }

        self.just_moved = player;
        self.remove_dead_minions();
        self.check_game_over();
        Ok(())
    }

    fn resolve_target(
        &self,
        mv: &Move,
        needs_target: bool,
        target: Option<u8>,
    ) -> Result<Option<Character>, AdapterError> {
        match (needs_target, target) {
            (true, Some(t)) => match self.character_targets().get(t as usize) {
                Some(&c) => Ok(Some(c)),
                None => Err(AdapterError::illegal(mv, "no such target")),
            },
            (true, None) => Err(AdapterError::illegal(mv, "a target is required")),
            (false, Some(_)) => Err(AdapterError::illegal(mv, "takes no target")),
            (false, None) => Ok(None),
        }
    }

    pub(crate) fn start_match(&mut self) {
        for player in Player::ALL {
            let mut library = self.side(player).deck.clone();
            library.shuffle(&mut self.rng);
            self.side_mut(player).library = library;
            self.draw(player, OPENING_HAND[player.index()]);
        }
        self.phase = Phase::Play;
        self.turn = 1;
        self.current = Player::One;
        self.begin_turn(Player::One);
        // Fatigue from the opening deal can already be lethal
        self.check_game_over();
    }

    fn begin_turn(&mut self, player: Player) {
        let side = self.side_mut(player);
        side.max_mana = (side.max_mana + 1).min(MAX_MANA);
        side.mana = side.max_mana;
        side.hero_attacked = false;
        side.ability_used = false;
        side.bonus_attack = 0;
        for minion in &mut side.board {
            minion.asleep = false;
            minion.attacks_left = 1;
        }
        self.draw(player, 1);
    }

    fn end_turn(&mut self) {
        let player = self.current;
        self.side_mut(player).bonus_attack = 0;
        self.current = player.opponent();
        self.turn += 1;
        self.begin_turn(self.current);
    }

    /// Draw `count` cards. An empty library deals growing fatigue damage and a
    /// full hand burns the drawn card.
    pub(crate) fn draw(&mut self, player: Player, count: usize) {
        for _ in 0..count {
            let side = self.side_mut(player);
            match side.library.pop() {
                Some(card) if side.hand.len() < MAX_HAND => side.hand.push(card),
                Some(_) => {}
                None => {
                    side.fatigue += 1;
                    let fatigue = side.fatigue;
                    self.damage(Character::Hero(player), fatigue);
                }
            }
        }
    }

    fn play_card(&mut self, hand_index: usize, def: &CardDef, card: CardId, target: Option<Character>) {
        let player = self.current;
        let side = self.side_mut(player);
        side.mana -= def.cost;
        side.hand.remove(hand_index);

        match def.kind {
            CardKind::Minion { battlecry, .. } => {
                if let Some(minion) = Minion::summon(card) {
                    self.side_mut(player).board.push(minion);
                }
                if let Some(effect) = battlecry {
                    self.apply_effect(effect, target);
                }
            }
            CardKind::Spell(effect) => self.apply_effect(effect, target),
            CardKind::Weapon { attack, durability } => {
                self.side_mut(player).weapon = Some(Weapon {
                    attack: attack as i32,
                    durability: durability as i32,
                });
            }
        }
    }

    fn apply_effect(&mut self, effect: Effect, target: Option<Character>) {
        let player = self.current;
        match effect {
            Effect::Damage(n) => {
                if let Some(t) = target {
                    self.damage(t, n as i32);
                }
            }
            Effect::Heal(n) => {
                if let Some(t) = target {
                    self.heal(t, n as i32);
                }
            }
            Effect::Draw(n) => self.draw(player, n as usize),
            Effect::Armor(n) => self.side_mut(player).armor += n as i32,
            Effect::DamageEnemyHero(n) => self.damage(Character::Hero(player.opponent()), n as i32),
            Effect::Missiles(n) => {
                let foe = player.opponent();
                for _ in 0..n {
                    let mut targets = vec![Character::Hero(foe)];
                    targets.extend(
                        self.side(foe)
                            .board
                            .iter()
                            .enumerate()
                            .filter(|(_, m)| m.health > 0)
                            .map(|(i, _)| Character::Minion(foe, i)),
                    );
                    let pick = targets[self.rng.gen_range(0..targets.len())];
                    self.damage(pick, 1);
                }
            }
        }
    }

    fn use_ability(&mut self, class: HeroClass, target: Option<Character>) {
        let player = self.current;
        let side = self.side_mut(player);
        side.mana -= ABILITY_COST;
        side.ability_used = true;

        match class {
            HeroClass::Druid => {
                side.bonus_attack += 1;
                side.armor += 1;
            }
            HeroClass::Hunter => self.damage(Character::Hero(player.opponent()), 2),
            HeroClass::Mage => {
                if let Some(t) = target {
                    self.damage(t, 1);
                }
            }
            HeroClass::Paladin => {
                if let Some(minion) = Minion::summon(cards::SILVER_HAND_RECRUIT) {
                    side.board.push(minion);
                }
            }
            HeroClass::Priest => {
                if let Some(t) = target {
                    self.heal(t, 2);
                }
            }
            HeroClass::Rogue => {
                side.weapon = Some(Weapon {
                    attack: 1,
                    durability: 2,
                });
            }
            HeroClass::Shaman => {
                if let Some(minion) = Minion::summon(cards::SEARING_TOTEM) {
                    side.board.push(minion);
                }
            }
            HeroClass::Warlock => {
                self.draw(player, 1);
                self.damage(Character::Hero(player), 2);
            }
            HeroClass::Warrior => side.armor += 2,
        }
    }

    fn minion_attack(&mut self, field_index: usize, defender: Character) {
        let player = self.current;
        let attacker = Character::Minion(player, field_index);
        let dealt = self.attack_of(attacker);
        let taken = self.attack_of(defender);

        self.damage(defender, dealt);
        if matches!(defender, Character::Minion(..)) {
            self.damage(attacker, taken);
        }
        if let Some(minion) = self.side_mut(player).board.get_mut(field_index) {
            minion.attacks_left = minion.attacks_left.saturating_sub(1);
        }
    }

    fn hero_attack(&mut self, defender: Character) {
        let player = self.current;
        let dealt = self.side(player).hero_attack();
        let taken = self.attack_of(defender);

        self.damage(defender, dealt);
        if matches!(defender, Character::Minion(..)) {
            self.damage(Character::Hero(player), taken);
        }

        let side = self.side_mut(player);
        side.hero_attacked = true;
        if let Some(weapon) = side.weapon.as_mut() {
            weapon.durability -= 1;
            if weapon.durability <= 0 {
                side.weapon = None;
            }
        }
    }

    /// Attack a character deals in combat. Heroes only hit back when attacking.
    fn attack_of(&self, character: Character) -> i32 {
        match character {
            Character::Hero(_) => 0,
            Character::Minion(owner, i) => self.side(owner).board.get(i).map_or(0, |m| m.attack),
        }
    }

    fn damage(&mut self, target: Character, amount: i32) {
        match target {
            Character::Hero(owner) => {
                let side = self.side_mut(owner);
                let absorbed = side.armor.min(amount);
                side.armor -= absorbed;
                side.health -= amount - absorbed;
            }
            Character::Minion(owner, i) => {
                if let Some(minion) = self.side_mut(owner).board.get_mut(i) {
                    minion.health -= amount;
                }
            }
        }
    }

    fn heal(&mut self, target: Character, amount: i32) {
        let cap = self.config.starting_health;
        match target {
            Character::Hero(owner) => {
                let side = self.side_mut(owner);
                side.health = (side.health + amount).min(cap);
            }
            Character::Minion(owner, i) => {
                if let Some(minion) = self.side_mut(owner).board.get_mut(i) {
                    minion.health = (minion.health + amount).min(minion.max_health);
                }
            }
        }
    }

    fn remove_dead_minions(&mut self) {
        for side in &mut self.sides {
            side.board.retain(|m| m.health > 0);
        }
    }

    fn check_game_over(&mut self) {
        if self.sides.iter().any(|s| s.is_dead()) {
            self.phase = Phase::Over;
        }
    }
}
