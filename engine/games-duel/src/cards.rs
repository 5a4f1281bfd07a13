//! Card catalogue.
//!
//! A small fixed pool of classic-style cards: neutral minions, a handful of
//! class spells, minions and weapons per hero, and the tokens hero abilities
//! summon. The catalogue is immutable static data, so every state clone can
//! share it.

use engine_core::{CardId, HeroClass};

/// Card rarity. Only the deck limit depends on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rarity {
    Free,
    Common,
    Rare,
    Epic,
    Legendary,
}

impl Rarity {
    /// Copies of one card a deck may hold.
    pub fn deck_limit(self) -> usize {
        match self {
            Rarity::Legendary => 1,
            Rarity::Free | Rarity::Common | Rarity::Rare | Rarity::Epic => 2,
        }
    }
}

/// What a spell or battlecry does when it resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Damage one chosen character.
    Damage(u8),
    /// Restore health to one chosen character.
    Heal(u8),
    /// Draw cards.
    Draw(u8),
    /// Gain armor.
    Armor(u8),
    /// Damage the enemy hero.
    DamageEnemyHero(u8),
    /// Deal 1 damage this many times, each to a random enemy character.
    Missiles(u8),
}

impl Effect {
    /// Whether the player picks a target for this effect.
    pub fn needs_target(self) -> bool {
        match self {
            Effect::Damage(_) | Effect::Heal(_) => true,
            Effect::Draw(_) | Effect::Armor(_) | Effect::DamageEnemyHero(_) | Effect::Missiles(_) => {
                false
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardKind {
    Minion {
        attack: u8,
        health: u8,
        taunt: bool,
        charge: bool,
        battlecry: Option<Effect>,
    },
    Spell(Effect),
    Weapon {
        attack: u8,
        durability: u8,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardDef {
    pub name: &'static str,
    /// `None` for neutral cards
    pub class: Option<HeroClass>,
    pub cost: u8,
    pub rarity: Rarity,
    pub kind: CardKind,
    /// Tokens cannot be drafted
    pub collectible: bool,
}

impl CardDef {
    const fn minion(name: &'static str, cost: u8, attack: u8, health: u8) -> Self {
        Self {
            name,
            class: None,
            cost,
            rarity: Rarity::Free,
            kind: CardKind::Minion {
                attack,
                health,
                taunt: false,
                charge: false,
                battlecry: None,
            },
            collectible: true,
        }
    }

    const fn spell(name: &'static str, class: HeroClass, cost: u8, effect: Effect) -> Self {
        Self {
            name,
            class: Some(class),
            cost,
            rarity: Rarity::Free,
            kind: CardKind::Spell(effect),
            collectible: true,
        }
    }

    const fn weapon(
        name: &'static str,
        class: HeroClass,
        cost: u8,
        attack: u8,
        durability: u8,
    ) -> Self {
        Self {
            name,
            class: Some(class),
            cost,
            rarity: Rarity::Common,
            kind: CardKind::Weapon { attack, durability },
            collectible: true,
        }
    }

    const fn rarity(mut self, rarity: Rarity) -> Self {
        self.rarity = rarity;
        self
    }

    const fn class(mut self, class: HeroClass) -> Self {
        self.class = Some(class);
        self
    }

    const fn token(mut self) -> Self {
        self.collectible = false;
        self
    }

    const fn taunt(mut self) -> Self {
        if let CardKind::Minion {
            attack,
            health,
            charge,
            battlecry,
            ..
        } = self.kind
        {
            self.kind = CardKind::Minion {
                attack,
                health,
                taunt: true,
                charge,
                battlecry,
            };
        }
        self
    }

    const fn charge(mut self) -> Self {
        if let CardKind::Minion {
            attack,
            health,
            taunt,
            battlecry,
            ..
        } = self.kind
        {
            self.kind = CardKind::Minion {
                attack,
                health,
                taunt,
                charge: true,
                battlecry,
            };
        }
        self
    }

    const fn battlecry(mut self, effect: Effect) -> Self {
        if let CardKind::Minion {
            attack,
            health,
            taunt,
            charge,
            ..
        } = self.kind
        {
            self.kind = CardKind::Minion {
                attack,
                health,
                taunt,
                charge,
                battlecry: Some(effect),
            };
        }
        self
    }

    /// Whether playing this card asks for a target.
    pub fn needs_target(&self) -> bool {
        match self.kind {
            CardKind::Minion { battlecry, .. } => battlecry.is_some_and(Effect::needs_target),
            CardKind::Spell(effect) => effect.needs_target(),
            CardKind::Weapon { .. } => false,
        }
    }

    pub fn is_minion(&self) -> bool {
        matches!(self.kind, CardKind::Minion { .. })
    }
}

use Effect::*;
use HeroClass::*;

/// Every card, indexed by [`CardId`].
pub static CATALOGUE: [CardDef; 44] = [
    // Neutral
    CardDef::minion("Elven Archer", 1, 1, 1).battlecry(Damage(1)).rarity(Rarity::Common),
    CardDef::minion("Voodoo Doctor", 1, 2, 1).battlecry(Heal(2)),
    CardDef::minion("Bloodfen Raptor", 2, 3, 2),
    CardDef::minion("River Crocolisk", 2, 2, 3),
    CardDef::minion("Frostwolf Grunt", 2, 2, 2).taunt(),
    CardDef::minion("Bluegill Warrior", 2, 2, 1).charge().rarity(Rarity::Common),
    CardDef::minion("Novice Engineer", 2, 1, 1).battlecry(Draw(1)),
    CardDef::minion("Mad Bomber", 2, 3, 2).battlecry(Missiles(3)).rarity(Rarity::Common),
    CardDef::minion("Ironforge Rifleman", 3, 2, 2).battlecry(Damage(1)).rarity(Rarity::Common),
    CardDef::minion("Earthen Ring Farseer", 3, 3, 3).battlecry(Heal(3)).rarity(Rarity::Common),
    CardDef::minion("Wolfrider", 3, 3, 1).charge(),
    CardDef::minion("Silverback Patriarch", 3, 1, 4).taunt().rarity(Rarity::Common),
    CardDef::minion("Gnomish Inventor", 4, 2, 4).battlecry(Draw(1)).rarity(Rarity::Common),
    CardDef::minion("Chillwind Yeti", 4, 4, 5).rarity(Rarity::Common),
    CardDef::minion("Sen'jin Shieldmasta", 4, 3, 5).taunt().rarity(Rarity::Common),
    CardDef::minion("Stormwind Knight", 4, 2, 5).charge().rarity(Rarity::Common),
    CardDef::minion("Nightblade", 5, 4, 4).battlecry(DamageEnemyHero(3)),
    CardDef::minion("Stormpike Commando", 5, 4, 2).battlecry(Damage(2)).rarity(Rarity::Common),
    CardDef::minion("Leeroy Jenkins", 5, 6, 2).charge().rarity(Rarity::Legendary),
    CardDef::minion("Boulderfist Ogre", 6, 6, 7),
    CardDef::minion("Reckless Rocketeer", 6, 5, 2).charge(),
    CardDef::minion("Ragnaros the Firelord", 8, 8, 8).rarity(Rarity::Legendary),
    // Druid
    CardDef::spell("Moonfire", Druid, 0, Damage(1)),
    CardDef::spell("Healing Touch", Druid, 3, Heal(8)),
    // Hunter
    CardDef::spell("Arcane Shot", Hunter, 1, Damage(2)),
    CardDef::spell("Kill Command", Hunter, 3, Damage(3)),
    // Mage
    CardDef::spell("Arcane Missiles", Mage, 1, Missiles(3)),
    CardDef::spell("Frostbolt", Mage, 2, Damage(3)),
    CardDef::spell("Fireball", Mage, 4, Damage(6)),
    // Paladin
    CardDef::spell("Holy Light", Paladin, 2, Heal(6)),
    CardDef::weapon("Truesilver Champion", Paladin, 4, 4, 2),
    // Priest
    CardDef::spell("Holy Smite", Priest, 1, Damage(2)),
    CardDef::spell("Mind Blast", Priest, 2, DamageEnemyHero(5)),
    // Rogue
    CardDef::spell("Sinister Strike", Rogue, 1, DamageEnemyHero(3)),
    CardDef::weapon("Assassin's Blade", Rogue, 5, 3, 4),
    // Shaman
    CardDef::spell("Lightning Bolt", Shaman, 1, Damage(3)).rarity(Rarity::Common),
    CardDef::minion("Fire Elemental", 6, 6, 5).battlecry(Damage(3)).class(Shaman),
    // Warlock
    CardDef::minion("Voidwalker", 1, 1, 3).taunt().class(Warlock),
    CardDef::spell("Shadow Bolt", Warlock, 3, Damage(4)),
    // Warrior
    CardDef::weapon("Fiery War Axe", Warrior, 2, 3, 2),
    CardDef::spell("Shield Block", Warrior, 3, Armor(5)).rarity(Rarity::Common),
    CardDef::weapon("Arcanite Reaper", Warrior, 5, 5, 2),
    // Tokens
    CardDef::minion("Silver Hand Recruit", 1, 1, 1).class(Paladin).token(),
    CardDef::minion("Searing Totem", 1, 1, 1).class(Shaman).token(),
];

/// Token summoned by the Paladin ability.
pub const SILVER_HAND_RECRUIT: CardId = CardId(42);
/// Token summoned by the Shaman ability.
pub const SEARING_TOTEM: CardId = CardId(43);

/// Look up a card definition.
pub fn card(id: CardId) -> Option<&'static CardDef> {
    CATALOGUE.get(id.0 as usize)
}

/// Find a card by name.
pub fn find(name: &str) -> Option<CardId> {
    CATALOGUE
        .iter()
        .position(|def| def.name == name)
        .map(|idx| CardId(idx as u16))
}

/// Collectible cards a hero of `class` may draft: neutral and own-class
/// cards, in catalogue order.
pub fn collection(class: HeroClass) -> impl Iterator<Item = CardId> {
    CATALOGUE
        .iter()
        .enumerate()
        .filter(move |(_, def)| def.collectible && def.class.map_or(true, |c| c == class))
        .map(|(idx, _)| CardId(idx as u16))
}

/// Copies of `id` a deck may hold. Unknown cards may not be drafted at all.
pub fn deck_limit(id: CardId) -> usize {
    card(id).map_or(0, |def| def.rarity.deck_limit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_ids() {
        assert_eq!(find("Silver Hand Recruit"), Some(SILVER_HAND_RECRUIT));
        assert_eq!(find("Searing Totem"), Some(SEARING_TOTEM));
        for token in [SILVER_HAND_RECRUIT, SEARING_TOTEM] {
            assert!(!card(token).unwrap().collectible);
        }
    }

    #[test]
    fn test_collection_filters_by_class() {
        let mage: Vec<CardId> = collection(HeroClass::Mage).collect();
        assert!(mage.contains(&find("Fireball").unwrap()));
        assert!(mage.contains(&find("Chillwind Yeti").unwrap()));
        assert!(!mage.contains(&find("Shield Block").unwrap()));
        assert!(!mage.contains(&SILVER_HAND_RECRUIT));
    }

    #[test]
    fn test_every_class_can_fill_a_deck() {
        for class in HeroClass::ALL {
            let capacity: usize = collection(class).map(deck_limit).sum();
            assert!(capacity >= 30, "{} can only draft {} cards", class, capacity);
        }
    }

    #[test]
    fn test_deck_limits() {
        assert_eq!(deck_limit(find("Leeroy Jenkins").unwrap()), 1);
        assert_eq!(deck_limit(find("Bloodfen Raptor").unwrap()), 2);
        assert_eq!(deck_limit(CardId(999)), 0);
    }

    #[test]
    fn test_targeting() {
        assert!(card(find("Fireball").unwrap()).unwrap().needs_target());
        assert!(card(find("Elven Archer").unwrap()).unwrap().needs_target());
        assert!(!card(find("Arcane Missiles").unwrap()).unwrap().needs_target());
        assert!(!card(find("Chillwind Yeti").unwrap()).unwrap().needs_target());
        assert!(!card(find("Fiery War Axe").unwrap()).unwrap().needs_target());
    }
}
