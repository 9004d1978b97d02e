//! Combat system module
//!
//! Building blocks shared by heroes and enemies:
//! - Dice rolling behind a substitutable [`Dice`] source
//! - Attributes and damage/heal primitives
//! - Timed status effects resolved at the start of each turn

mod dice;
mod effects;
mod state;

pub use dice::{Dice, DiceRoll, RandomDice, ScriptedDice};
pub use effects::{
    tick_start_of_turn, BleedKind, EffectState, Status, StrikeBuff, DEFAULT_POISON_DAMAGE,
};
pub use state::{Attributes, Combatant, Entity};

use crate::narration::Narrator;

/// The collaborators every combat action needs: a dice source and a
/// narration sink.
pub struct CombatContext<'a> {
    pub dice: &'a mut dyn Dice,
    pub narrator: &'a mut dyn Narrator,
}

impl<'a> CombatContext<'a> {
    pub fn new(dice: &'a mut dyn Dice, narrator: &'a mut dyn Narrator) -> Self {
        Self { dice, narrator }
    }
}
