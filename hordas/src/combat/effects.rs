//! Status effects system
//!
//! Every combatant carries one [`EffectState`]: a fixed record of timed
//! counters (damage over time, stun, reflection, invulnerability, delayed
//! heal) plus the "next attack" buffs. [`tick_start_of_turn`] resolves all
//! of them in a fixed order at the start of the owner's turn.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::state::Combatant;
use super::CombatContext;
use crate::narration::{Event, EventKind};

/// Poison magnitude when none was specified
pub const DEFAULT_POISON_DAMAGE: u32 = 2;

/// How a bleed rolls its damage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BleedKind {
    /// 1d6 each tick
    #[serde(rename = "d6")]
    Rolled,
    /// `bleed_damage` each tick
    #[serde(rename = "fixo")]
    Fixed,
}

/// Named status, used for narration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Shock,
    Poison,
    Bleed,
    FatalMark,
    Seed,
    Stun,
    Reflect,
    Invulnerable,
}

impl Status {
    pub fn label(&self) -> &'static str {
        match self {
            Status::Shock => "Eletrocussão",
            Status::Poison => "Veneno",
            Status::Bleed => "Sangramento",
            Status::FatalMark => "Marca Fatal",
            Status::Seed => "Semente Engatilhada",
            Status::Stun => "Atordoamento",
            Status::Reflect => "Reflexão",
            Status::Invulnerable => "Invulnerabilidade",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Bonus carried into the next damage-dealing action
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StrikeBuff {
    pub bonus: u32,
    pub crit: bool,
}

impl StrikeBuff {
    /// Raw damage after adding the bonus and doubling on a critical
    pub fn apply(&self, raw: u32) -> u32 {
        let boosted = raw + self.bonus;
        if self.crit {
            boosted * 2
        } else {
            boosted
        }
    }
}

/// Status counters and flags for one combatant.
///
/// A `*_turns` counter of 0 means the effect is inactive. Magnitude fields of
/// an inactive effect are reset when it expires and are never read while it
/// is inactive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectState {
    #[serde(rename = "eletro_turnos")]
    pub shock_turns: u32,
    #[serde(rename = "veneno_turnos")]
    pub poison_turns: u32,
    #[serde(rename = "veneno_dano")]
    pub poison_damage: u32,
    #[serde(rename = "sangramento_turnos")]
    pub bleed_turns: u32,
    #[serde(rename = "sangramento_tipo")]
    pub bleed_kind: Option<BleedKind>,
    #[serde(rename = "sangramento_dano")]
    pub bleed_damage: u32,
    #[serde(rename = "marca_fatal_turnos")]
    pub fatal_mark_turns: u32,
    #[serde(rename = "semente_turnos")]
    pub seed_turns: u32,
    #[serde(rename = "nao_pode_atacar")]
    pub stunned_turns: u32,
    #[serde(rename = "refletir_dano_turnos")]
    pub reflect_turns: u32,
    #[serde(rename = "invulneravel_turnos")]
    pub invulnerable_turns: u32,
    #[serde(rename = "critico_proximo")]
    pub crit_next: bool,
    #[serde(rename = "bonus_proximo")]
    pub bonus_next: u32,
    /// Hero turns taken this mission
    #[serde(rename = "turnos")]
    pub turns: u32,
    #[serde(rename = "empurrao_sismico_usado")]
    pub seismic_push_used: bool,
    #[serde(rename = "prox_flecha_d20_critico")]
    pub hunter_arrow_primed: bool,
}

impl Default for EffectState {
    fn default() -> Self {
        Self {
            shock_turns: 0,
            poison_turns: 0,
            poison_damage: DEFAULT_POISON_DAMAGE,
            bleed_turns: 0,
            bleed_kind: None,
            bleed_damage: 0,
            fatal_mark_turns: 0,
            seed_turns: 0,
            stunned_turns: 0,
            reflect_turns: 0,
            invulnerable_turns: 0,
            crit_next: false,
            bonus_next: 0,
            turns: 0,
            seismic_push_used: false,
            hunter_arrow_primed: false,
        }
    }
}

impl EffectState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear everything, including per-mission flags
    pub fn reset_for_mission(&mut self) {
        *self = Self::default();
    }

    pub fn is_stunned(&self) -> bool {
        self.stunned_turns > 0
    }

    pub fn is_invulnerable(&self) -> bool {
        self.invulnerable_turns > 0
    }

    pub fn reflects_damage(&self) -> bool {
        self.reflect_turns > 0
    }

    pub fn apply_shock(&mut self, turns: u32) {
        self.shock_turns = self.shock_turns.max(turns);
    }

    /// Poison for `turns`; a stronger dose wins while poison is active
    pub fn apply_poison(&mut self, turns: u32, damage: u32) {
        self.poison_damage = if self.poison_turns > 0 {
            self.poison_damage.max(damage)
        } else {
            damage
        };
        self.poison_turns = self.poison_turns.max(turns);
    }

    /// Bleed for `turns`; the latest application decides how it rolls
    pub fn apply_bleed(&mut self, turns: u32, kind: BleedKind, damage: u32) {
        self.bleed_kind = Some(kind);
        self.bleed_damage = damage;
        self.bleed_turns = self.bleed_turns.max(turns);
    }

    pub fn apply_fatal_mark(&mut self, turns: u32) {
        self.fatal_mark_turns = self.fatal_mark_turns.max(turns);
    }

    pub fn plant_seed(&mut self, turns: u32) {
        self.seed_turns = self.seed_turns.max(turns);
    }

    pub fn stun(&mut self, turns: u32) {
        self.stunned_turns = self.stunned_turns.max(turns);
    }

    pub fn grant_reflect(&mut self, turns: u32) {
        self.reflect_turns = self.reflect_turns.max(turns);
    }

    pub fn grant_invulnerability(&mut self, turns: u32) {
        self.invulnerable_turns = self.invulnerable_turns.max(turns);
    }

    /// Stack a flat bonus onto the next damage-dealing action
    pub fn add_strike_bonus(&mut self, bonus: u32) {
        self.bonus_next += bonus;
    }

    /// Make the next damage-dealing action a critical
    pub fn prime_crit(&mut self) {
        self.crit_next = true;
    }

    /// Read and clear the next-attack buffs in one step
    pub fn take_strike_buff(&mut self) -> StrikeBuff {
        let buff = StrikeBuff {
            bonus: self.bonus_next,
            crit: self.crit_next,
        };
        self.bonus_next = 0;
        self.crit_next = false;
        buff
    }
}

/// Decrement a live counter; true when it just reached zero
fn countdown(counter: &mut u32) -> bool {
    if *counter == 0 {
        return false;
    }
    *counter -= 1;
    *counter == 0
}

fn deal(target: &mut dyn Combatant, ctx: &mut CombatContext<'_>, status: Status, raw: u32) -> u32 {
    let applied = target.receive_damage(raw);
    ctx.narrator.emit(
        Event::new(EventKind::EffectDamage, status.label(), "dano contínuo")
            .with_target(target.name())
            .with_amount(applied),
    );
    applied
}

fn expired(target: &dyn Combatant, ctx: &mut CombatContext<'_>, status: Status) {
    ctx.narrator.emit(
        Event::new(EventKind::EffectExpired, status.label(), "terminou").with_target(target.name()),
    );
}

/// Resolve start-of-turn effects on `target`. Returns the total damage taken.
///
/// Order: shock, poison, bleed, fatal mark, seed, then the stun, reflect and
/// invulnerability counters. While invulnerable no damage is applied (and no
/// damage dice are rolled) but every counter still runs down.
pub fn tick_start_of_turn(target: &mut dyn Combatant, ctx: &mut CombatContext<'_>) -> u32 {
    let shielded = target.effects().is_invulnerable();
    let mut total = 0;

    if target.effects().shock_turns > 0 {
        if !shielded {
            let raw = ctx.dice.d6().saturating_sub(1);
            total += deal(target, ctx, Status::Shock, raw);
        }
        if countdown(&mut target.effects_mut().shock_turns) {
            expired(target, ctx, Status::Shock);
        }
    }

    if target.effects().poison_turns > 0 {
        if !shielded {
            let raw = target.effects().poison_damage;
            total += deal(target, ctx, Status::Poison, raw);
        }
        if countdown(&mut target.effects_mut().poison_turns) {
            target.effects_mut().poison_damage = DEFAULT_POISON_DAMAGE;
            expired(target, ctx, Status::Poison);
        }
    }

    if target.effects().bleed_turns > 0 {
        if !shielded {
            let raw = match target.effects().bleed_kind {
                Some(BleedKind::Rolled) => ctx.dice.d6(),
                _ => target.effects().bleed_damage,
            };
            total += deal(target, ctx, Status::Bleed, raw);
        }
        if countdown(&mut target.effects_mut().bleed_turns) {
            let effects = target.effects_mut();
            effects.bleed_kind = None;
            effects.bleed_damage = 0;
            expired(target, ctx, Status::Bleed);
        }
    }

    if target.effects().fatal_mark_turns > 0 {
        if !shielded {
            let raw = ctx.dice.d6();
            total += deal(target, ctx, Status::FatalMark, raw);
        }
        if countdown(&mut target.effects_mut().fatal_mark_turns) {
            expired(target, ctx, Status::FatalMark);
        }
    }

    if countdown(&mut target.effects_mut().seed_turns) {
        let amount = ctx.dice.d20().saturating_sub(5);
        let healed = target.heal(amount);
        ctx.narrator.emit(
            Event::new(EventKind::Heal, Status::Seed.label(), "floresce")
                .with_target(target.name())
                .with_amount(healed),
        );
    }

    for status in [Status::Stun, Status::Reflect, Status::Invulnerable] {
        let effects = target.effects_mut();
        let counter = match status {
            Status::Stun => &mut effects.stunned_turns,
            Status::Reflect => &mut effects.reflect_turns,
            _ => &mut effects.invulnerable_turns,
        };
        if countdown(counter) {
            expired(target, ctx, status);
        }
    }

    debug!(combatant = target.name(), total, shielded, "start-of-turn effects resolved");
    total
}
