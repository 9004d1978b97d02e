//! Shared harness for mission integration tests

#![allow(dead_code)]

use hordas::combat::{CombatContext, ScriptedDice};
use hordas::narration::{EventKind, EventLog};

/// Scripted dice plus an event log, handed out together as a context
pub struct Arena {
    pub dice: ScriptedDice,
    pub log: EventLog,
}

impl Arena {
    pub fn scripted(values: impl IntoIterator<Item = u32>) -> Self {
        Self {
            dice: ScriptedDice::new(values),
            log: EventLog::new(),
        }
    }

    /// Every die shows `value` (clamped to the die)
    pub fn constant(value: u32) -> Self {
        Self::scripted([value])
    }

    pub fn ctx(&mut self) -> CombatContext<'_> {
        CombatContext::new(&mut self.dice, &mut self.log)
    }

    /// Amounts of every `kind` event whose actor is `actor`
    pub fn amounts(&self, kind: EventKind, actor: &str) -> Vec<u32> {
        self.log
            .of_kind(kind)
            .filter(|e| e.actor == actor)
            .filter_map(|e| e.amount)
            .collect()
    }
}
