//! Class ability tables
//!
//! Every class has seven abilities, kept here as one static table per class.
//! An entry carries the numbers (cost, dice, unlock level, gate) and a
//! handler whose signature encodes what the ability acts on. Shared
//! bookkeeping (unlock level, gates, mana, missing targets) happens once in
//! [`AbilityDef::execute`]; handlers only do the ability's own work.

use tracing::debug;

use super::{Character, ClassKind};
use crate::combat::{BleedKind, CombatContext, Combatant, DiceRoll, Status};
use crate::error::ActionError;
use crate::narration::{Event, EventKind};

/// Level at which each table slot becomes available
const UNLOCK_LEVELS: [u32; 7] = [1, 1, 1, 1, 2, 4, 6];

/// Turns a Warrior must have taken before Execução Pública
pub const EXECUTION_MIN_TURNS: u32 = 4;

type EnemyFn = fn(&mut Character, &AbilityDef, &mut dyn Combatant, &mut CombatContext<'_>) -> u32;
type CasterFn = fn(&mut Character, &AbilityDef, &mut CombatContext<'_>) -> u32;
type AllyFn = fn(&mut Character, &AbilityDef, &mut Character, &mut CombatContext<'_>) -> u32;
type AlliesFn = fn(&mut Character, &AbilityDef, &mut [Character], &mut CombatContext<'_>) -> u32;

#[derive(Clone, Copy)]
enum Handler {
    Enemy(EnemyFn),
    Caster(CasterFn),
    Ally(AllyFn),
    Allies(AlliesFn),
}

/// What an ability needs to be pointed at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetShape {
    Enemy,
    Caster,
    Ally,
    Allies,
}

/// Extra condition checked before mana is spent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    Always,
    /// Caster must have taken at least this many turns this mission
    MinTurns(u32),
    OncePerMission,
}

/// One row of a class ability table
pub struct AbilityDef {
    pub id: u8,
    pub name: &'static str,
    pub cost: u32,
    /// Dice rolled by the ability, before any stat is added
    pub formula: Option<DiceRoll>,
    pub gate: Gate,
    handler: Handler,
}

impl std::fmt::Debug for AbilityDef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AbilityDef")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("cost", &self.cost)
            .field("formula", &self.formula)
            .field("gate", &self.gate)
            .finish_non_exhaustive()
    }
}

impl AbilityDef {
    pub fn unlock_level(&self) -> u32 {
        UNLOCK_LEVELS[usize::from(self.id.saturating_sub(1))]
    }

    pub fn target(&self) -> TargetShape {
        match self.handler {
            Handler::Enemy(_) => TargetShape::Enemy,
            Handler::Caster(_) => TargetShape::Caster,
            Handler::Ally(_) => TargetShape::Ally,
            Handler::Allies(_) => TargetShape::Allies,
        }
    }

    fn roll(&self, ctx: &mut CombatContext<'_>) -> u32 {
        self.formula
            .map_or(0, |formula| formula.roll_with(&mut *ctx.dice, self.name))
    }

    fn premature(&self, reason: impl Into<String>) -> ActionError {
        ActionError::PrematureAbility {
            ability: self.name.to_string(),
            reason: reason.into(),
        }
    }

    fn check_gate(&self, hero: &Character) -> Result<(), ActionError> {
        match self.gate {
            Gate::Always => Ok(()),
            Gate::MinTurns(min) if hero.effects.turns < min => Err(self.premature(format!(
                "requires {} turns, {} taken",
                min, hero.effects.turns
            ))),
            Gate::MinTurns(_) => Ok(()),
            Gate::OncePerMission if hero.effects.seismic_push_used => {
                Err(self.premature("already used this mission"))
            }
            Gate::OncePerMission => Ok(()),
        }
    }

    /// Gate and mana checks, in that order, then mark one-shot abilities used
    fn commit(&self, hero: &mut Character) -> Result<(), ActionError> {
        self.check_gate(hero)?;
        hero.pay(self.name, self.cost)?;
        if self.gate == Gate::OncePerMission {
            hero.effects.seismic_push_used = true;
        }
        Ok(())
    }

    /// Unlocked, gate open and affordable. Targets are not considered.
    pub fn is_ready(&self, hero: &Character) -> bool {
        hero.level >= self.unlock_level()
            && self.check_gate(hero).is_ok()
            && hero.mana() >= self.cost
    }

    fn skip(&self, hero: &Character, missing: &str) -> u32 {
        debug!(
            hero = %hero.entity.name,
            ability = self.name,
            missing,
            "ability has nothing to act on"
        );
        0
    }

    pub(crate) fn execute(
        &self,
        hero: &mut Character,
        targets: Targets<'_>,
        ctx: &mut CombatContext<'_>,
    ) -> Result<u32, ActionError> {
        if hero.level < self.unlock_level() {
            return Err(self.premature(format!("unlocks at level {}", self.unlock_level())));
        }

        match self.handler {
            Handler::Enemy(handler) => {
                let Some(enemy) = targets.enemy else {
                    return Ok(self.skip(hero, "enemy"));
                };
                self.commit(hero)?;
                Ok(handler(hero, self, enemy, ctx))
            }
            Handler::Caster(handler) => {
                self.commit(hero)?;
                Ok(handler(hero, self, ctx))
            }
            Handler::Ally(handler) => {
                let Some(ally) = targets.ally else {
                    return Ok(self.skip(hero, "ally"));
                };
                self.commit(hero)?;
                Ok(handler(hero, self, ally, ctx))
            }
            Handler::Allies(handler) => match targets.allies {
                Some(allies) if !allies.is_empty() => {
                    self.commit(hero)?;
                    Ok(handler(hero, self, allies, ctx))
                }
                _ => Ok(self.skip(hero, "allies")),
            },
        }
    }
}

/// What a special ability may act on. Fields left empty make abilities that
/// need them a free no-op.
#[derive(Default)]
pub struct Targets<'a> {
    pub enemy: Option<&'a mut dyn Combatant>,
    pub ally: Option<&'a mut Character>,
    pub allies: Option<&'a mut [Character]>,
}

impl<'a> Targets<'a> {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn enemy(enemy: &'a mut dyn Combatant) -> Self {
        Self {
            enemy: Some(enemy),
            ..Self::default()
        }
    }

    pub fn with_ally(mut self, ally: &'a mut Character) -> Self {
        self.ally = Some(ally);
        self
    }

    pub fn with_allies(mut self, allies: &'a mut [Character]) -> Self {
        self.allies = Some(allies);
        self
    }
}

/// Display view of an ability
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AbilityInfo {
    pub id: u8,
    pub name: &'static str,
    pub cost: u32,
    pub formula: Option<DiceRoll>,
    pub target: TargetShape,
}

impl From<&AbilityDef> for AbilityInfo {
    fn from(def: &AbilityDef) -> Self {
        Self {
            id: def.id,
            name: def.name,
            cost: def.cost,
            formula: def.formula,
            target: def.target(),
        }
    }
}

/// How many table entries a character of `level` can use
pub fn unlocked_ability_count(level: u32) -> usize {
    UNLOCK_LEVELS.iter().filter(|&&unlock| level >= unlock).count()
}

/// Abilities of `character`'s class in table order, truncated to what its
/// level has unlocked when `respect_level` is set
pub fn abilities_for(character: &Character, respect_level: bool) -> Vec<AbilityInfo> {
    let table = table(character.class);
    let count = if respect_level {
        unlocked_ability_count(character.level)
    } else {
        table.len()
    };
    table.iter().take(count).map(AbilityInfo::from).collect()
}

pub fn table(class: ClassKind) -> &'static [AbilityDef] {
    match class {
        ClassKind::Warrior => &WARRIOR,
        ClassKind::Mage => &MAGE,
        ClassKind::Archer => &ARCHER,
        ClassKind::Healer => &HEALER,
    }
}

pub fn lookup(class: ClassKind, id: u8) -> Option<&'static AbilityDef> {
    table(class).iter().find(|def| def.id == id)
}

/// The ability that becomes available on reaching `level`, if any
pub fn unlocked_at(class: ClassKind, level: u32) -> Option<&'static AbilityDef> {
    if level <= 1 {
        return None;
    }
    table(class).iter().find(|def| def.unlock_level() == level)
}

const fn ability(
    id: u8,
    name: &'static str,
    cost: u32,
    formula: Option<DiceRoll>,
    gate: Gate,
    handler: Handler,
) -> AbilityDef {
    AbilityDef {
        id,
        name,
        cost,
        formula,
        gate,
        handler,
    }
}

const fn dice(count: u32, sides: u32) -> Option<DiceRoll> {
    Some(DiceRoll::new(count, sides, 0))
}

static WARRIOR: [AbilityDef; 7] = [
    ability(
        1,
        "Execução Pública",
        7,
        dice(5, 6),
        Gate::MinTurns(EXECUTION_MIN_TURNS),
        Handler::Enemy(public_execution),
    ),
    ability(2, "Perseverança", 0, None, Gate::Always, Handler::Caster(perseverance)),
    ability(3, "Golpe Trovejante", 1, dice(1, 20), Gate::Always, Handler::Enemy(weapon_strike)),
    ability(4, "Lâmina Ínfera", 2, dice(3, 6), Gate::Always, Handler::Enemy(bleeding_strike)),
    ability(5, "Grito de Guerra", 3, None, Gate::Always, Handler::Caster(war_cry)),
    ability(
        6,
        "Investida Atordoante",
        4,
        dice(2, 6),
        Gate::Always,
        Handler::Enemy(stunning_charge),
    ),
    ability(7, "Fúria do Berserker", 5, None, Gate::Always, Handler::Caster(prime_critical)),
];

static MAGE: [AbilityDef; 7] = [
    ability(1, "Colapso Minguante", 15, dice(6, 6), Gate::Always, Handler::Enemy(plain_strike)),
    ability(2, "Descarnar", 20, dice(3, 20), Gate::Always, Handler::Enemy(bleeding_strike)),
    ability(3, "Distorção no Tempo", 0, None, Gate::Always, Handler::Caster(time_distortion)),
    ability(
        4,
        "Empurrão Sísmico",
        8,
        dice(3, 6),
        Gate::OncePerMission,
        Handler::Enemy(seismic_push),
    ),
    ability(5, "Eletrocussão", 12, dice(2, 6), Gate::Always, Handler::Enemy(electrocution)),
    ability(6, "Névoa Venenosa", 10, None, Gate::Always, Handler::Enemy(poison_mist)),
    ability(7, "Chuva de Meteoros", 25, dice(4, 20), Gate::Always, Handler::Enemy(spell_strike)),
];

static ARCHER: [AbilityDef; 7] = [
    ability(1, "Curingas", 8, dice(5, 6), Gate::Always, Handler::Enemy(plain_strike)),
    ability(2, "Cortes Certeiros", 6, None, Gate::Always, Handler::Enemy(precise_cuts)),
    ability(3, "Estilo do Caçador", 10, None, Gate::Always, Handler::Caster(hunter_style)),
    ability(4, "Marca Fatal", 10, None, Gate::Always, Handler::Enemy(fatal_mark)),
    ability(5, "Flecha Envenenada", 5, dice(1, 6), Gate::Always, Handler::Enemy(poisoned_arrow)),
    ability(6, "Olho de Águia", 4, None, Gate::Always, Handler::Caster(prime_critical)),
    ability(7, "Chuva de Flechas", 14, dice(3, 20), Gate::Always, Handler::Enemy(plain_strike)),
];

static HEALER: [AbilityDef; 7] = [
    ability(1, "Capítulo Final", 3, dice(1, 6), Gate::Always, Handler::Allies(final_chapter)),
    ability(2, "Semente Engatilhada", 5, None, Gate::Always, Handler::Ally(primed_seed)),
    ability(3, "Ventos Revigorantes", 15, None, Gate::Always, Handler::Caster(reviving_winds)),
    ability(4, "Golpe de Misericórdia", 0, dice(4, 20), Gate::Always, Handler::Enemy(mercy_stroke)),
    ability(5, "Hemofagia", 6, dice(2, 6), Gate::Always, Handler::Enemy(hemophagy)),
    ability(6, "Transfusão Vital", 8, dice(2, 6), Gate::Always, Handler::Ally(vital_transfusion)),
    ability(
        7,
        "Resplendor Cósmico",
        20,
        dice(2, 6),
        Gate::Always,
        Handler::Allies(cosmic_radiance),
    ),
];

fn afflicted(
    hero: &Character,
    def: &AbilityDef,
    target: &str,
    status: Status,
    ctx: &mut CombatContext<'_>,
) {
    ctx.narrator.emit(
        Event::new(
            EventKind::EffectApplied,
            hero.entity.name.as_str(),
            format!("{} ({})", def.name, status),
        )
        .with_target(target),
    );
}

fn buffed(hero: &Character, def: &AbilityDef, ctx: &mut CombatContext<'_>) {
    ctx.narrator
        .emit(Event::new(EventKind::Buff, hero.entity.name.as_str(), def.name));
}

fn healed(
    hero: &Character,
    def: &AbilityDef,
    target: &str,
    amount: u32,
    ctx: &mut CombatContext<'_>,
) {
    ctx.narrator.emit(
        Event::new(EventKind::Heal, hero.entity.name.as_str(), def.name)
            .with_target(target)
            .with_amount(amount),
    );
}

// Damage

fn plain_strike(
    hero: &mut Character,
    def: &AbilityDef,
    enemy: &mut dyn Combatant,
    ctx: &mut CombatContext<'_>,
) -> u32 {
    let raw = def.roll(ctx);
    hero.strike(enemy, raw, def.name, ctx)
}

/// Dice plus the caster's attack
fn weapon_strike(
    hero: &mut Character,
    def: &AbilityDef,
    enemy: &mut dyn Combatant,
    ctx: &mut CombatContext<'_>,
) -> u32 {
    let raw = def.roll(ctx) + hero.attributes().attack;
    hero.strike(enemy, raw, def.name, ctx)
}

/// Dice plus the caster's magic
fn spell_strike(
    hero: &mut Character,
    def: &AbilityDef,
    enemy: &mut dyn Combatant,
    ctx: &mut CombatContext<'_>,
) -> u32 {
    let raw = def.roll(ctx) + hero.magic();
    hero.strike(enemy, raw, def.name, ctx)
}

fn public_execution(
    hero: &mut Character,
    def: &AbilityDef,
    enemy: &mut dyn Combatant,
    ctx: &mut CombatContext<'_>,
) -> u32 {
    let raw = def.roll(ctx) * 2 + 3;
    hero.strike(enemy, raw, def.name, ctx)
}

fn bleeding_strike(
    hero: &mut Character,
    def: &AbilityDef,
    enemy: &mut dyn Combatant,
    ctx: &mut CombatContext<'_>,
) -> u32 {
    enemy.effects_mut().apply_bleed(2, BleedKind::Rolled, 0);
    afflicted(hero, def, enemy.name(), Status::Bleed, ctx);
    plain_strike(hero, def, enemy, ctx)
}

fn stunning_charge(
    hero: &mut Character,
    def: &AbilityDef,
    enemy: &mut dyn Combatant,
    ctx: &mut CombatContext<'_>,
) -> u32 {
    // The target's own tick runs before its attack, so 2 costs it one attack
    enemy.effects_mut().stun(2);
    afflicted(hero, def, enemy.name(), Status::Stun, ctx);
    weapon_strike(hero, def, enemy, ctx)
}

fn seismic_push(
    hero: &mut Character,
    def: &AbilityDef,
    enemy: &mut dyn Combatant,
    ctx: &mut CombatContext<'_>,
) -> u32 {
    enemy.effects_mut().stun(2);
    afflicted(hero, def, enemy.name(), Status::Stun, ctx);
    plain_strike(hero, def, enemy, ctx)
}

fn electrocution(
    hero: &mut Character,
    def: &AbilityDef,
    enemy: &mut dyn Combatant,
    ctx: &mut CombatContext<'_>,
) -> u32 {
    enemy.effects_mut().apply_shock(3);
    afflicted(hero, def, enemy.name(), Status::Shock, ctx);
    spell_strike(hero, def, enemy, ctx)
}

fn poisoned_arrow(
    hero: &mut Character,
    def: &AbilityDef,
    enemy: &mut dyn Combatant,
    ctx: &mut CombatContext<'_>,
) -> u32 {
    enemy.effects_mut().apply_poison(3, 2);
    afflicted(hero, def, enemy.name(), Status::Poison, ctx);
    weapon_strike(hero, def, enemy, ctx)
}

fn mercy_stroke(
    hero: &mut Character,
    def: &AbilityDef,
    enemy: &mut dyn Combatant,
    ctx: &mut CombatContext<'_>,
) -> u32 {
    let applied = plain_strike(hero, def, enemy, ctx);
    let lost = hero.attributes().hp;
    hero.entity.collapse();
    ctx.narrator.emit(
        Event::new(EventKind::Damage, hero.entity.name.as_str(), def.name)
            .with_target(hero.entity.name.as_str())
            .with_amount(lost),
    );
    applied
}

fn hemophagy(
    hero: &mut Character,
    def: &AbilityDef,
    enemy: &mut dyn Combatant,
    ctx: &mut CombatContext<'_>,
) -> u32 {
    let applied = spell_strike(hero, def, enemy, ctx);
    let restored = hero.entity.heal(applied);
    let name = hero.entity.name.clone();
    healed(hero, def, &name, restored, ctx);
    applied
}

// Status only

fn poison_mist(
    hero: &mut Character,
    def: &AbilityDef,
    enemy: &mut dyn Combatant,
    ctx: &mut CombatContext<'_>,
) -> u32 {
    enemy.effects_mut().apply_poison(4, 3);
    afflicted(hero, def, enemy.name(), Status::Poison, ctx);
    0
}

fn precise_cuts(
    hero: &mut Character,
    def: &AbilityDef,
    enemy: &mut dyn Combatant,
    ctx: &mut CombatContext<'_>,
) -> u32 {
    enemy.effects_mut().apply_bleed(5, BleedKind::Rolled, 0);
    afflicted(hero, def, enemy.name(), Status::Bleed, ctx);
    0
}

fn fatal_mark(
    hero: &mut Character,
    def: &AbilityDef,
    enemy: &mut dyn Combatant,
    ctx: &mut CombatContext<'_>,
) -> u32 {
    enemy.effects_mut().apply_fatal_mark(7);
    afflicted(hero, def, enemy.name(), Status::FatalMark, ctx);
    0
}

// Self

fn perseverance(hero: &mut Character, def: &AbilityDef, ctx: &mut CombatContext<'_>) -> u32 {
    hero.effects.grant_invulnerability(1);
    afflicted(hero, def, &hero.entity.name, Status::Invulnerable, ctx);
    0
}

fn war_cry(hero: &mut Character, def: &AbilityDef, ctx: &mut CombatContext<'_>) -> u32 {
    hero.effects.add_strike_bonus(5);
    buffed(hero, def, ctx);
    0
}

fn prime_critical(hero: &mut Character, def: &AbilityDef, ctx: &mut CombatContext<'_>) -> u32 {
    hero.effects.prime_crit();
    buffed(hero, def, ctx);
    0
}

fn hunter_style(hero: &mut Character, def: &AbilityDef, ctx: &mut CombatContext<'_>) -> u32 {
    hero.effects.hunter_arrow_primed = true;
    buffed(hero, def, ctx);
    0
}

fn time_distortion(hero: &mut Character, def: &AbilityDef, ctx: &mut CombatContext<'_>) -> u32 {
    hero.restore_mana(50);
    ctx.narrator.emit(
        Event::new(EventKind::ManaRestored, hero.entity.name.as_str(), def.name).with_amount(50),
    );
    0
}

fn reviving_winds(hero: &mut Character, def: &AbilityDef, ctx: &mut CombatContext<'_>) -> u32 {
    hero.effects.grant_reflect(1);
    afflicted(hero, def, &hero.entity.name, Status::Reflect, ctx);
    0
}

// Allies

fn primed_seed(
    hero: &mut Character,
    def: &AbilityDef,
    ally: &mut Character,
    ctx: &mut CombatContext<'_>,
) -> u32 {
    ally.effects.plant_seed(2);
    afflicted(hero, def, &ally.entity.name, Status::Seed, ctx);
    0
}

fn vital_transfusion(
    hero: &mut Character,
    def: &AbilityDef,
    ally: &mut Character,
    ctx: &mut CombatContext<'_>,
) -> u32 {
    let amount = def.roll(ctx) + hero.magic();
    let restored = ally.entity.heal(amount);
    healed(hero, def, &ally.entity.name, restored, ctx);
    0
}

fn heal_all(
    hero: &Character,
    def: &AbilityDef,
    allies: &mut [Character],
    amount: u32,
    ctx: &mut CombatContext<'_>,
) {
    for ally in allies.iter_mut() {
        let restored = ally.entity.heal(amount);
        healed(hero, def, &ally.entity.name, restored, ctx);
    }
}

fn final_chapter(
    hero: &mut Character,
    def: &AbilityDef,
    allies: &mut [Character],
    ctx: &mut CombatContext<'_>,
) -> u32 {
    let amount = def.roll(ctx);
    heal_all(hero, def, allies, amount, ctx);
    0
}

fn cosmic_radiance(
    hero: &mut Character,
    def: &AbilityDef,
    allies: &mut [Character],
    ctx: &mut CombatContext<'_>,
) -> u32 {
    let amount = def.roll(ctx) + hero.magic();
    heal_all(hero, def, allies, amount, ctx);
    0
}
