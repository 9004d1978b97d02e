//! Mission combat loop
//!
//! A mission pits one hero against a horde, one enemy at a time. Each turn
//! the hero ticks its effects and acts, then the enemy ticks its effects and
//! attacks. Rejected actions are narrated and the turn goes on; only death,
//! fleeing or clearing the horde end the mission.

use std::collections::VecDeque;

use tracing::{debug, info, info_span, warn};

use crate::character::{AbilityInfo, Character, ClassKind, TargetShape, Targets};
use crate::combat::{tick_start_of_turn, CombatContext, Combatant};
use crate::error::ActionError;
use crate::horde::{build_horde, Difficulty, Enemy, MissionHint, Scenario};
use crate::narration::{Event, EventKind};

/// Safety valve against endless encounters (two combatants that cannot hurt
/// each other). Combat itself has no timeout; reaching the limit ends the
/// mission as fled.
pub const DEFAULT_MAX_TURNS: u32 = 200;

/// Healer abilities the auto-play reaches for when hurt
const DEFENSIVE_ABILITIES: [&str; 3] = [
    "Capítulo Final",
    "Semente Engatilhada",
    "Ventos Revigorantes",
];

/// Auto-play treats a Healer below this hp fraction as in danger
const DANGER_HP_FRACTION: f64 = 0.35;

/// One hero decision
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Basic,
    /// Class ability by id (1..=7)
    Special(u8),
    Flee,
    /// Input that names no action
    Invalid(String),
}

impl Action {
    /// Menu keys: "1" basic attack, "2".."8" abilities in unlock order,
    /// "0" flee
    pub fn from_input(input: &str) -> Self {
        match input.trim() {
            "0" => Action::Flee,
            "1" => Action::Basic,
            other => match other.parse::<u8>() {
                Ok(key @ 2..=8) => Action::Special(key - 1),
                _ => Action::Invalid(other.to_string()),
            },
        }
    }

    /// Inverse of [`Action::from_input`]
    pub fn menu_key(&self) -> Option<String> {
        match self {
            Action::Flee => Some("0".to_string()),
            Action::Basic => Some("1".to_string()),
            Action::Special(id) => Some((id + 1).to_string()),
            Action::Invalid(_) => None,
        }
    }
}

/// What a decider sees when asked for the hero's action
#[derive(Debug)]
pub struct DecisionView<'a> {
    pub hero: &'a Character,
    pub enemy: &'a Enemy,
    /// Abilities unlocked at the hero's level
    pub abilities: &'a [AbilityInfo],
    /// Whether ally-targeted abilities have anyone to act on
    pub allies_present: bool,
    /// Turn within the current encounter, from 1
    pub turn: u32,
}

/// Source of hero actions: a human prompt, a script, or [`AutoPlay`]
pub trait ActionDecider {
    fn decide(&mut self, view: &DecisionView<'_>) -> Action;
}

/// Plays a fixed list of actions, then repeats `then`
#[derive(Debug, Clone)]
pub struct ScriptedPlayer {
    actions: VecDeque<Action>,
    then: Action,
}

impl ScriptedPlayer {
    pub fn new(actions: impl IntoIterator<Item = Action>, then: Action) -> Self {
        Self {
            actions: actions.into_iter().collect(),
            then,
        }
    }

    /// The same action every turn
    pub fn repeat(action: Action) -> Self {
        Self {
            actions: VecDeque::new(),
            then: action,
        }
    }

    /// Script from menu keys, as typed at the prompt
    pub fn from_inputs<'a>(inputs: impl IntoIterator<Item = &'a str>, then: Action) -> Self {
        Self::new(inputs.into_iter().map(Action::from_input), then)
    }
}

impl ActionDecider for ScriptedPlayer {
    fn decide(&mut self, _view: &DecisionView<'_>) -> Action {
        self.actions.pop_front().unwrap_or_else(|| self.then.clone())
    }
}

/// Deterministic heuristic player
///
/// A Healer in danger uses the first ready defensive ability. Otherwise the
/// first ready ability with a positive cost is used, then the basic attack.
/// When even the basic attack is unaffordable, a ready zero-cost ability is
/// tried.
///
/// Unlike a plain "first ability with a cost" rule, candidates are filtered
/// first: abilities that are locked, gated, unaffordable, already spent this
/// mission, or whose targets the fight cannot supply are never chosen. The
/// loop would reject those and the hero would lose the action.
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoPlay;

impl ActionDecider for AutoPlay {
    fn decide(&mut self, view: &DecisionView<'_>) -> Action {
        let hero = view.hero;
        let mut usable = view.abilities.iter().filter(|info| {
            hero.is_ready(info.id)
                && (view.allies_present
                    || matches!(info.target, TargetShape::Enemy | TargetShape::Caster))
        });

        if hero.class() == ClassKind::Healer && hero.entity().hp_fraction() < DANGER_HP_FRACTION {
            let defensive = usable
                .clone()
                .find(|info| DEFENSIVE_ABILITIES.contains(&info.name));
            if let Some(info) = defensive {
                return Action::Special(info.id);
            }
        }

        if let Some(info) = usable.clone().find(|info| info.cost > 0) {
            return Action::Special(info.id);
        }

        if hero.mana() < hero.class().basic_attack_cost() {
            if let Some(info) = usable.find(|info| info.cost == 0) {
                return Action::Special(info.id);
            }
        }

        Action::Basic
    }
}

/// How a mission ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissionOutcome {
    HeroWon,
    HeroLost,
    /// Hero fled, or an encounter hit the turn limit
    Fled,
}

/// Result of running a mission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MissionReport {
    pub outcome: MissionOutcome,
    /// Enemies defeated before the mission ended
    pub encounters_won: usize,
    /// Hero turns taken across all encounters
    pub turns: u32,
}

enum EncounterEnd {
    EnemyDown,
    HeroDown,
    Fled,
    Stalemate,
}

/// One hero against one horde
#[derive(Debug)]
pub struct Mission<'h> {
    hero: &'h mut Character,
    horde: Vec<Enemy>,
    scenario: Scenario,
    difficulty: Difficulty,
    max_turns: u32,
}

impl<'h> Mission<'h> {
    pub fn new(
        hero: &'h mut Character,
        scenario: Scenario,
        difficulty: Difficulty,
        hint: &MissionHint,
    ) -> Self {
        let horde = build_horde(scenario.label(), difficulty.label(), hint);
        Self::with_horde(hero, horde, scenario, difficulty)
    }

    /// Mission against a prepared enemy queue
    pub fn with_horde(
        hero: &'h mut Character,
        horde: Vec<Enemy>,
        scenario: Scenario,
        difficulty: Difficulty,
    ) -> Self {
        Self {
            hero,
            horde,
            scenario,
            difficulty,
            max_turns: DEFAULT_MAX_TURNS,
        }
    }

    /// Abandon an encounter after this many turns
    pub fn max_turns_per_encounter(mut self, turns: u32) -> Self {
        self.max_turns = turns.max(1);
        self
    }

    pub fn horde(&self) -> &[Enemy] {
        &self.horde
    }

    /// Fight through the horde. Per-mission effect state is cleared first.
    pub fn run(
        self,
        decider: &mut dyn ActionDecider,
        ctx: &mut CombatContext<'_>,
    ) -> MissionReport {
        let Mission {
            hero,
            mut horde,
            scenario,
            difficulty,
            max_turns,
        } = self;

        let span = info_span!("mission", %scenario, %difficulty);
        let _enter = span.enter();

        info!(hero = %hero.name(), class = %hero.class(), enemies = horde.len(), "mission started");
        ctx.narrator.emit(
            Event::new(EventKind::MissionStarted, hero.name(), "inicia a missão")
                .with_target(format!("{} ({})", scenario, difficulty)),
        );
        hero.effects.reset_for_mission();

        let mut encounters_won = 0;
        let mut turns = 0;
        let mut outcome = MissionOutcome::HeroWon;

        for enemy in horde.iter_mut() {
            let end = fight(hero, enemy, max_turns, &mut turns, decider, ctx);
            match end {
                EncounterEnd::EnemyDown => {
                    encounters_won += 1;
                    ctx.narrator.emit(
                        Event::new(EventKind::EncounterWon, hero.name(), "derrotou")
                            .with_target(enemy.name()),
                    );
                    if !hero.is_alive() {
                        outcome = MissionOutcome::HeroLost;
                        break;
                    }
                }
                EncounterEnd::HeroDown => {
                    outcome = MissionOutcome::HeroLost;
                    break;
                }
                EncounterEnd::Fled | EncounterEnd::Stalemate => {
                    outcome = MissionOutcome::Fled;
                    break;
                }
            }
        }

        match outcome {
            MissionOutcome::HeroWon => ctx.narrator.emit(
                Event::new(EventKind::Victory, hero.name(), "venceu todas as hordas")
                    .with_amount(encounters_won as u32),
            ),
            MissionOutcome::HeroLost => ctx.narrator.emit(
                Event::new(EventKind::Defeat, hero.name(), "foi derrotado")
                    .with_amount(encounters_won as u32),
            ),
            MissionOutcome::Fled => {}
        }

        info!(?outcome, encounters_won, turns, "mission finished");
        MissionReport {
            outcome,
            encounters_won,
            turns,
        }
    }
}

fn reject(hero: &Character, err: ActionError, ctx: &mut CombatContext<'_>) {
    warn!(hero = %hero.name(), %err, "action rejected");
    ctx.narrator
        .emit(Event::new(EventKind::Rejected, hero.name(), err.to_string()));
}

/// Carry out the hero's chosen action. Returns false when the hero fled.
fn act(
    hero: &mut Character,
    enemy: &mut Enemy,
    action: Action,
    ctx: &mut CombatContext<'_>,
) -> bool {
    let result = match action {
        Action::Flee => return false,
        Action::Basic => hero.basic_attack(enemy, ctx),
        Action::Special(id) if id >= 1 && usize::from(id) <= hero.abilities().len() => {
            hero.use_special(id, Targets::enemy(enemy), ctx)
        }
        Action::Special(id) => Err(ActionError::InvalidAction(format!(
            "ability {} is not available",
            id
        ))),
        Action::Invalid(input) => Err(ActionError::InvalidAction(input)),
    };

    if let Err(err) = result {
        reject(hero, err, ctx);
    }
    true
}

/// Enemy's attack on the hero, with invulnerability and reflection
fn enemy_attack(hero: &mut Character, enemy: &mut Enemy, ctx: &mut CombatContext<'_>) {
    let mut raw = enemy.attack_roll(&mut *ctx.dice);
    if hero.effects.is_invulnerable() {
        debug!(hero = %hero.name(), raw, "attack absorbed by invulnerability");
        raw = 0;
    }

    let applied = hero.receive_damage(raw);
    ctx.narrator.emit(
        Event::new(EventKind::Damage, enemy.name(), "ataca")
            .with_target(hero.name())
            .with_amount(applied),
    );

    if applied > 0 && hero.effects.reflects_damage() {
        let reflected = enemy.receive_damage(applied);
        ctx.narrator.emit(
            Event::new(EventKind::Reflected, hero.name(), "reflete o dano")
                .with_target(enemy.name())
                .with_amount(reflected),
        );
    }
}

fn fight(
    hero: &mut Character,
    enemy: &mut Enemy,
    max_turns: u32,
    total_turns: &mut u32,
    decider: &mut dyn ActionDecider,
    ctx: &mut CombatContext<'_>,
) -> EncounterEnd {
    let span = info_span!("encounter", enemy = %enemy.name(), boss = enemy.is_boss());
    let _enter = span.enter();

    ctx.narrator.emit(
        Event::new(EventKind::EncounterStarted, hero.name(), "enfrenta").with_target(enemy.name()),
    );

    let mut turn = 0;
    while hero.is_alive() && enemy.is_alive() {
        if turn == max_turns {
            warn!(turn, "encounter turn limit reached");
            ctx.narrator.emit(
                Event::new(EventKind::Stalemate, hero.name(), "abandona o combate")
                    .with_target(enemy.name()),
            );
            return EncounterEnd::Stalemate;
        }
        turn += 1;
        *total_turns += 1;
        hero.effects.turns += 1;

        tick_start_of_turn(hero, ctx);
        if !hero.is_alive() {
            return EncounterEnd::HeroDown;
        }

        if hero.effects.is_stunned() {
            ctx.narrator
                .emit(Event::new(EventKind::Stunned, hero.name(), "não consegue agir"));
        } else {
            let abilities = hero.abilities();
            let view = DecisionView {
                hero: &*hero,
                enemy: &*enemy,
                abilities: &abilities,
                allies_present: false,
                turn,
            };
            let action = decider.decide(&view);
            debug!(turn, ?action, "hero action");

            if !act(hero, enemy, action, ctx) {
                ctx.narrator
                    .emit(Event::new(EventKind::Fled, hero.name(), "recuou da missão"));
                return EncounterEnd::Fled;
            }
        }

        if !enemy.is_alive() {
            return EncounterEnd::EnemyDown;
        }
        if !hero.is_alive() {
            return EncounterEnd::HeroDown;
        }

        tick_start_of_turn(enemy, ctx);
        if !enemy.is_alive() {
            return EncounterEnd::EnemyDown;
        }

        if enemy.effects().is_stunned() {
            ctx.narrator
                .emit(Event::new(EventKind::Stunned, enemy.name(), "está atordoado"));
        } else {
            enemy_attack(hero, enemy, ctx);
        }
    }

    if enemy.is_alive() {
        EncounterEnd::HeroDown
    } else {
        EncounterEnd::EnemyDown
    }
}
