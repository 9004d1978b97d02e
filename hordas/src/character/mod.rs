//! Heroes
//!
//! A [`Character`] is an [`Entity`] with a class, a level and status effects.
//! The four classes share one type; everything class-specific lives in
//! per-class constant tables ([`ClassKind::base_stats`]) and in the ability
//! dispatch table in [`abilities`].

pub mod abilities;
mod progression;

pub use abilities::{
    abilities_for, unlocked_ability_count, AbilityDef, AbilityInfo, Gate, TargetShape, Targets,
};
pub use progression::{xp_to_next_level, LevelUp, MAX_LEVEL};

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::combat::{Attributes, CombatContext, Combatant, EffectState, Entity};
use crate::error::ActionError;
use crate::narration::{Event, EventKind};

/// Name used for the basic attack in narration and errors
pub const BASIC_ATTACK: &str = "Ataque Básico";

/// Character class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClassKind {
    #[serde(rename = "Guerreiro")]
    Warrior,
    #[serde(rename = "Mago")]
    Mage,
    #[serde(rename = "Arqueiro")]
    Archer,
    #[serde(rename = "Curandeiro")]
    Healer,
}

/// Starting numbers for a class
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BaseStats {
    pub hp: u32,
    pub attack: u32,
    pub defense: u32,
    pub mana: u32,
    pub magic: u32,
}

impl ClassKind {
    pub fn all() -> &'static [ClassKind] {
        &[
            ClassKind::Warrior,
            ClassKind::Mage,
            ClassKind::Archer,
            ClassKind::Healer,
        ]
    }

    pub fn base_stats(&self) -> BaseStats {
        match self {
            ClassKind::Warrior => BaseStats {
                hp: 50,
                attack: 8,
                defense: 10,
                mana: 5,
                magic: 0,
            },
            ClassKind::Mage => BaseStats {
                hp: 30,
                attack: 1,
                defense: 4,
                mana: 40,
                magic: 10,
            },
            ClassKind::Archer => BaseStats {
                hp: 35,
                attack: 5,
                defense: 4,
                mana: 25,
                magic: 3,
            },
            ClassKind::Healer => BaseStats {
                hp: 20,
                attack: 0,
                defense: 3,
                mana: 35,
                magic: 8,
            },
        }
    }

    /// Mana spent by the basic attack
    pub fn basic_attack_cost(&self) -> u32 {
        match self {
            ClassKind::Mage => 1,
            _ => 0,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ClassKind::Warrior => "Guerreiro",
            ClassKind::Mage => "Mago",
            ClassKind::Archer => "Arqueiro",
            ClassKind::Healer => "Curandeiro",
        }
    }
}

impl FromStr for ClassKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "guerreiro" | "warrior" | "personalizado" | "custom" => Ok(ClassKind::Warrior),
            "mago" | "mage" => Ok(ClassKind::Mage),
            "arqueiro" | "archer" => Ok(ClassKind::Archer),
            "curandeiro" | "healer" => Ok(ClassKind::Healer),
            _ => Err(()),
        }
    }
}

impl std::fmt::Display for ClassKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A playable hero
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Character {
    pub(crate) entity: Entity,
    pub(crate) class: ClassKind,
    pub(crate) level: u32,
    pub(crate) xp: u32,
    pub(crate) effects: EffectState,
}

impl Character {
    /// Fresh level 1 hero with the class's base stats
    pub fn new(name: impl Into<String>, class: ClassKind) -> Self {
        let base = class.base_stats();
        Self {
            entity: Entity::new(
                name,
                Attributes::new(base.hp, base.attack, base.defense, base.mana),
            ),
            class,
            level: 1,
            xp: 0,
            effects: EffectState::new(),
        }
    }

    pub fn class(&self) -> ClassKind {
        self.class
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn xp(&self) -> u32 {
        self.xp
    }

    pub fn mana(&self) -> u32 {
        self.entity.attributes().mana
    }

    /// Magic power; a class constant
    pub fn magic(&self) -> u32 {
        self.class.base_stats().magic
    }

    /// Abilities available right now, in unlock order
    pub fn abilities(&self) -> Vec<AbilityInfo> {
        abilities_for(self, true)
    }

    /// Whether ability `id` could be used right now, ignoring targets
    pub fn is_ready(&self, id: u8) -> bool {
        abilities::lookup(self.class, id).is_some_and(|def| def.is_ready(self))
    }

    /// Spend mana if there is enough. Leaves mana untouched on failure.
    pub fn spend_mana(&mut self, cost: u32) -> bool {
        let mana = self.mana();
        if mana < cost {
            debug!(hero = %self.entity.name, mana, cost, "mana check failed");
            return false;
        }
        self.entity.attributes_mut().mana = mana - cost;
        debug!(hero = %self.entity.name, mana = mana - cost, cost, "mana spent");
        true
    }

    pub fn restore_mana(&mut self, amount: u32) {
        let attrs = self.entity.attributes_mut();
        attrs.mana = attrs.mana.saturating_add(amount);
    }

    /// Spend `cost` for `ability` or explain why not
    pub(crate) fn pay(&mut self, ability: &str, cost: u32) -> Result<(), ActionError> {
        if self.spend_mana(cost) {
            Ok(())
        } else {
            Err(ActionError::InsufficientMana {
                ability: ability.to_string(),
                have: self.mana(),
                need: cost,
            })
        }
    }

    /// Deliver damage to `target`, consuming any next-attack buff
    pub(crate) fn strike(
        &mut self,
        target: &mut dyn Combatant,
        raw: u32,
        action: &str,
        ctx: &mut CombatContext<'_>,
    ) -> u32 {
        let buff = self.effects.take_strike_buff();
        let applied = target.receive_damage(buff.apply(raw));
        ctx.narrator.emit(
            Event::new(EventKind::Damage, self.entity.name.as_str(), action)
                .with_target(target.name())
                .with_amount(applied),
        );
        applied
    }

    /// The class's default attack. Returns the damage applied.
    pub fn basic_attack(
        &mut self,
        target: &mut dyn Combatant,
        ctx: &mut CombatContext<'_>,
    ) -> Result<u32, ActionError> {
        self.pay(BASIC_ATTACK, self.class.basic_attack_cost())?;

        let attack = self.entity.attributes().attack;
        let raw = match self.class {
            ClassKind::Archer if self.effects.hunter_arrow_primed => {
                self.effects.hunter_arrow_primed = false;
                ctx.dice.d20() * 2 + attack
            }
            ClassKind::Healer => (ctx.dice.d6() + attack).saturating_sub(2),
            _ => ctx.dice.d6() + attack,
        };

        Ok(self.strike(target, raw, BASIC_ATTACK, ctx))
    }

    /// Use the class ability `id` (1..=7). Returns the damage applied to the
    /// enemy, or 0 for abilities that deal none.
    ///
    /// An ability whose ally argument is missing does nothing and costs
    /// nothing.
    pub fn use_special(
        &mut self,
        id: u8,
        targets: Targets<'_>,
        ctx: &mut CombatContext<'_>,
    ) -> Result<u32, ActionError> {
        let def = abilities::lookup(self.class, id).ok_or_else(|| {
            ActionError::InvalidAction(format!("{} has no ability {}", self.class, id))
        })?;
        def.execute(self, targets, ctx)
    }
}

impl Combatant for Character {
    fn entity(&self) -> &Entity {
        &self.entity
    }

    fn entity_mut(&mut self) -> &mut Entity {
        &mut self.entity
    }

    fn effects(&self) -> &EffectState {
        &self.effects
    }

    fn effects_mut(&mut self) -> &mut EffectState {
        &mut self.effects
    }
}
