//! Move representation for the card duel
//!
//! The duel has a closed set of move kinds spanning both phases of a match:
//! the draft (hero and card picks, then the match start) and the play phase
//! (cards, hero ability, attacks, end of turn). Every variant exposes the same
//! optional payload slots through accessors, so diagnostics can print any move
//! uniformly while rules code matches on the variant itself.

use std::fmt;

use crate::game::GameMove;

/// Catalogue identifier of a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CardId(pub u16);

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Playable hero classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HeroClass {
    Druid,
    Hunter,
    Mage,
    Paladin,
    Priest,
    Rogue,
    Shaman,
    Warlock,
    Warrior,
}

impl HeroClass {
    /// All classes in draft order.
    pub const ALL: [HeroClass; 9] = [
        HeroClass::Druid,
        HeroClass::Hunter,
        HeroClass::Mage,
        HeroClass::Paladin,
        HeroClass::Priest,
        HeroClass::Rogue,
        HeroClass::Shaman,
        HeroClass::Warlock,
        HeroClass::Warrior,
    ];

    pub fn name(self) -> &'static str {
        match self {
            HeroClass::Druid => "Druid",
            HeroClass::Hunter => "Hunter",
            HeroClass::Mage => "Mage",
            HeroClass::Paladin => "Paladin",
            HeroClass::Priest => "Priest",
            HeroClass::Rogue => "Rogue",
            HeroClass::Shaman => "Shaman",
            HeroClass::Warlock => "Warlock",
            HeroClass::Warrior => "Warrior",
        }
    }
}

impl fmt::Display for HeroClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Discriminant of [`Move`], without payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveKind {
    StartMatch,
    ChooseHero,
    ChooseCard,
    EndTurn,
    UseAbility,
    PlayCard,
    AttackWithMinion,
    AttackWithHero,
}

/// A move in the card duel.
///
/// Target indices are positions in the target list the rules engine enumerates
/// for that move in the current state; they are only meaningful together with
/// the state they were generated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Move {
    /// Close the draft and deal the opening hands.
    StartMatch,
    /// Pick the hero class for the drafting player.
    ChooseHero(HeroClass),
    /// Add a card to the drafting player's deck.
    ChooseCard(CardId),
    /// Pass the turn.
    EndTurn,
    /// Use the hero's class ability, optionally on a target.
    UseAbility { target: Option<u8> },
    /// Play the card at `hand_index`, optionally on a target.
    PlayCard {
        card: CardId,
        hand_index: u8,
        target: Option<u8>,
    },
    /// Attack with the minion at `field_index`.
    AttackWithMinion {
        card: CardId,
        field_index: u8,
        target: u8,
    },
    /// Attack with the (armed) hero.
    AttackWithHero { target: u8 },
}

impl Move {
    pub fn kind(&self) -> MoveKind {
        match self {
            Move::StartMatch => MoveKind::StartMatch,
            Move::ChooseHero(_) => MoveKind::ChooseHero,
            Move::ChooseCard(_) => MoveKind::ChooseCard,
            Move::EndTurn => MoveKind::EndTurn,
            Move::UseAbility { .. } => MoveKind::UseAbility,
            Move::PlayCard { .. } => MoveKind::PlayCard,
            Move::AttackWithMinion { .. } => MoveKind::AttackWithMinion,
            Move::AttackWithHero { .. } => MoveKind::AttackWithHero,
        }
    }

    /// Card referenced by the move, if any.
    pub fn card(&self) -> Option<CardId> {
        match self {
            Move::ChooseCard(card)
            | Move::PlayCard { card, .. }
            | Move::AttackWithMinion { card, .. } => Some(*card),
            Move::StartMatch
            | Move::ChooseHero(_)
            | Move::EndTurn
            | Move::UseAbility { .. }
            | Move::AttackWithHero { .. } => None,
        }
    }

    /// Hero class referenced by the move, if any.
    pub fn hero(&self) -> Option<HeroClass> {
        match self {
            Move::ChooseHero(class) => Some(*class),
            _ => None,
        }
    }

    /// Hand or field index, if any.
    pub fn index(&self) -> Option<u8> {
        match self {
            Move::PlayCard { hand_index, .. } => Some(*hand_index),
            Move::AttackWithMinion { field_index, .. } => Some(*field_index),
            _ => None,
        }
    }

    /// Target index, if any.
    pub fn target(&self) -> Option<u8> {
        match self {
            Move::UseAbility { target } | Move::PlayCard { target, .. } => *target,
            Move::AttackWithMinion { target, .. } | Move::AttackWithHero { target } => {
                Some(*target)
            }
            Move::StartMatch | Move::ChooseHero(_) | Move::ChooseCard(_) | Move::EndTurn => None,
        }
    }
}

impl GameMove for Move {
    fn closes_decision(&self) -> bool {
        matches!(self, Move::EndTurn | Move::StartMatch)
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Move::StartMatch => write!(f, "start match"),
            Move::ChooseHero(class) => write!(f, "choose hero {}", class),
            Move::ChooseCard(card) => write!(f, "choose card {}", card),
            Move::EndTurn => write!(f, "end turn"),
            Move::UseAbility { target: None } => write!(f, "use ability"),
            Move::UseAbility { target: Some(t) } => write!(f, "use ability -> {}", t),
            Move::PlayCard {
                card,
                hand_index,
                target: None,
            } => write!(f, "play {} from hand[{}]", card, hand_index),
            Move::PlayCard {
                card,
                hand_index,
                target: Some(t),
            } => write!(f, "play {} from hand[{}] -> {}", card, hand_index, t),
            Move::AttackWithMinion {
                card,
                field_index,
                target,
            } => write!(f, "attack with {} at field[{}] -> {}", card, field_index, target),
            Move::AttackWithHero { target } => write!(f, "hero attack -> {}", target),
        }
    }
}
