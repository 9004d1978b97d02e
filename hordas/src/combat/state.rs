//! Combatant state
//!
//! The attribute record shared by every participant in a fight, the owning
//! [`Entity`] wrapper with damage/heal primitives, and the [`Combatant`]
//! trait that lets heroes and enemies be handled uniformly.

use serde::{Deserialize, Serialize};

use super::effects::EffectState;

/// Raw combat attributes
///
/// Field names serialize under the keys used by existing save files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attributes {
    /// Current hit points
    #[serde(rename = "vida")]
    pub hp: u32,
    /// Maximum hit points, fixed at creation and raised only by leveling
    #[serde(rename = "vida_max")]
    pub hp_max: u32,
    #[serde(rename = "ataque")]
    pub attack: u32,
    #[serde(rename = "defesa")]
    pub defense: u32,
    pub mana: u32,
}

impl Attributes {
    /// Attributes at full health; `hp_max` is taken from `hp`
    pub fn new(hp: u32, attack: u32, defense: u32, mana: u32) -> Self {
        Self {
            hp,
            hp_max: hp,
            attack,
            defense,
            mana,
        }
    }
}

/// Anything that can take damage and die
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    pub name: String,
    attrs: Attributes,
}

impl Entity {
    pub fn new(name: impl Into<String>, mut attrs: Attributes) -> Self {
        attrs.hp = attrs.hp.min(attrs.hp_max);
        Self {
            name: name.into(),
            attrs,
        }
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attrs
    }

    /// Mutable access for progression and mana bookkeeping inside the crate.
    /// Callers must keep `hp <= hp_max`.
    pub(crate) fn attributes_mut(&mut self) -> &mut Attributes {
        &mut self.attrs
    }

    /// Apply raw damage after subtracting defense. Returns the damage
    /// actually taken.
    pub fn receive_damage(&mut self, raw: u32) -> u32 {
        let applied = raw.saturating_sub(self.attrs.defense);
        self.attrs.hp = self.attrs.hp.saturating_sub(applied);
        applied
    }

    /// Heal (cannot exceed hp_max). Returns the amount restored.
    pub fn heal(&mut self, amount: u32) -> u32 {
        let actual = amount.min(self.attrs.hp_max - self.attrs.hp);
        self.attrs.hp += actual;
        actual
    }

    /// Drop straight to 0 hp, ignoring defense
    pub fn collapse(&mut self) {
        self.attrs.hp = 0;
    }

    pub fn is_alive(&self) -> bool {
        self.attrs.hp > 0
    }

    /// Current hp as a fraction of hp_max
    pub fn hp_fraction(&self) -> f64 {
        if self.attrs.hp_max == 0 {
            return 0.0;
        }
        f64::from(self.attrs.hp) / f64::from(self.attrs.hp_max)
    }

    /// Text health bar like `[#####-----] 25/50`
    pub fn hp_bar(&self, width: usize) -> String {
        let max = self.attrs.hp_max.max(1);
        let filled = (width as f64 * f64::from(self.attrs.hp) / f64::from(max)).round_ties_even();
        let filled = (filled as usize).min(width);
        format!(
            "[{}{}] {}/{}",
            "#".repeat(filled),
            "-".repeat(width - filled),
            self.attrs.hp,
            self.attrs.hp_max
        )
    }
}

/// A participant in combat: an entity plus its status effects
pub trait Combatant {
    fn entity(&self) -> &Entity;
    fn entity_mut(&mut self) -> &mut Entity;
    fn effects(&self) -> &EffectState;
    fn effects_mut(&mut self) -> &mut EffectState;

    fn name(&self) -> &str {
        &self.entity().name
    }

    fn attributes(&self) -> &Attributes {
        self.entity().attributes()
    }

    fn receive_damage(&mut self, raw: u32) -> u32 {
        self.entity_mut().receive_damage(raw)
    }

    fn heal(&mut self, amount: u32) -> u32 {
        self.entity_mut().heal(amount)
    }

    fn is_alive(&self) -> bool {
        self.entity().is_alive()
    }
}
