//! Play sessions
//!
//! A session keeps one hero across missions. The hero is created on first
//! use, earns the mission's XP reward on victory and is lost on defeat.

use tracing::info;

use crate::character::{Character, ClassKind, LevelUp};
use crate::combat::CombatContext;
use crate::config::Config;
use crate::error::{ConfigError, SnapshotError};
use crate::horde::{fold, Difficulty, MissionHint, Scenario};
use crate::mission::{ActionDecider, Mission, MissionOutcome, MissionReport, DEFAULT_MAX_TURNS};
use crate::narration::{Event, EventKind};
use crate::snapshot::CharacterSnapshot;

/// A mission offered to the player
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MissionDef {
    pub name: &'static str,
    pub objective: &'static str,
    /// XP granted on victory
    pub reward: u32,
    /// Horde selection, in [`MissionHint::parse`] syntax
    target: &'static str,
}

impl MissionDef {
    pub fn hint(&self) -> MissionHint {
        MissionHint::parse(self.target)
    }
}

pub const CATALOGUE: [MissionDef; 6] = [
    MissionDef {
        name: "Matar Ladrões",
        objective: "Eliminar ladrões no vilarejo",
        reward: 50,
        target: "Ladrão",
    },
    MissionDef {
        name: "Matar Goblins",
        objective: "Eliminar goblins na caverna",
        reward: 75,
        target: "Goblin",
    },
    MissionDef {
        name: "Matar Golens",
        objective: "Destruir golens de pedra",
        reward: 120,
        target: "Golem",
    },
    MissionDef {
        name: "Matar Elfos",
        objective: "Conter elfos hostis",
        reward: 150,
        target: "Elfo",
    },
    MissionDef {
        name: "Matar Dragões",
        objective: "Derrotar dragões ancestrais",
        reward: 500,
        target: "boss:Dragão",
    },
    MissionDef {
        name: "Limpar a Horda",
        objective: "Vencer a horda completa do cenário",
        reward: 200,
        target: "horda",
    },
];

/// Catalogue entry by name, ignoring case and accents
pub fn find_mission(name: &str) -> Option<&'static MissionDef> {
    let folded = fold(name);
    CATALOGUE.iter().find(|def| fold(def.name) == folded)
}

/// The full-wave entry
pub fn default_mission() -> &'static MissionDef {
    &CATALOGUE[CATALOGUE.len() - 1]
}

/// What one played mission did to the session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionReport {
    pub mission: String,
    pub report: MissionReport,
    pub xp_gained: u32,
    pub level_ups: Vec<LevelUp>,
    /// The hero died and was discarded
    pub hero_lost: bool,
}

#[derive(Debug, Clone)]
pub struct Session {
    hero_name: String,
    class: ClassKind,
    scenario: Scenario,
    difficulty: Difficulty,
    max_turns: u32,
    hero: Option<Character>,
}

impl Session {
    pub fn new(
        hero_name: impl Into<String>,
        class: ClassKind,
        scenario: Scenario,
        difficulty: Difficulty,
    ) -> Self {
        Self {
            hero_name: hero_name.into(),
            class,
            scenario,
            difficulty,
            max_turns: DEFAULT_MAX_TURNS,
            hero: None,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let class = config
            .class
            .parse::<ClassKind>()
            .map_err(|()| ConfigError::UnknownClass(config.class.clone()))?;
        let mut session = Self::new(
            config.hero_name.clone(),
            class,
            Scenario::lenient(&config.scenario),
            Difficulty::lenient(&config.difficulty),
        );
        session.max_turns = config.max_turns_per_encounter;
        Ok(session)
    }

    pub fn hero(&self) -> Option<&Character> {
        self.hero.as_ref()
    }

    /// The current hero, created if there is none
    pub fn hero_mut(&mut self) -> &mut Character {
        let (name, class) = (&self.hero_name, self.class);
        self.hero.get_or_insert_with(|| {
            info!(hero = %name, %class, "hero created");
            Character::new(name.clone(), class)
        })
    }

    /// Replace the hero with a saved one
    pub fn restore(&mut self, snapshot: CharacterSnapshot) -> Result<(), SnapshotError> {
        let hero = Character::from_snapshot(snapshot)?;
        self.hero_name = hero.entity.name.clone();
        self.class = hero.class();
        self.hero = Some(hero);
        Ok(())
    }

    pub fn set_scenario(&mut self, scenario: Scenario) {
        self.scenario = scenario;
    }

    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.difficulty = difficulty;
    }

    pub fn scenario(&self) -> Scenario {
        self.scenario
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// Run a catalogue mission with the session's hero and settle the outcome
    pub fn play(
        &mut self,
        mission: &MissionDef,
        decider: &mut dyn ActionDecider,
        ctx: &mut CombatContext<'_>,
    ) -> SessionReport {
        self.play_hint(mission.name, &mission.hint(), mission.reward, decider, ctx)
    }

    /// Run an ad hoc mission against the horde selected by `hint`
    pub fn play_hint(
        &mut self,
        name: &str,
        hint: &MissionHint,
        reward: u32,
        decider: &mut dyn ActionDecider,
        ctx: &mut CombatContext<'_>,
    ) -> SessionReport {
        let (scenario, difficulty, max_turns) = (self.scenario, self.difficulty, self.max_turns);
        let hero = self.hero_mut();

        let report = Mission::new(hero, scenario, difficulty, hint)
            .max_turns_per_encounter(max_turns)
            .run(decider, ctx);

        let mut settled = SessionReport {
            mission: name.to_string(),
            report,
            xp_gained: 0,
            level_ups: Vec::new(),
            hero_lost: false,
        };

        match report.outcome {
            MissionOutcome::HeroWon => {
                settled.xp_gained = reward;
                settled.level_ups = hero.gain_xp(reward);
                for level_up in &settled.level_ups {
                    ctx.narrator.emit(
                        Event::new(
                            EventKind::LevelUp,
                            hero.entity.name.as_str(),
                            level_up.to_string(),
                        )
                        .with_amount(level_up.level),
                    );
                }
            }
            MissionOutcome::HeroLost => {
                info!(mission = name, "hero fell; progress lost");
                self.hero = None;
                settled.hero_lost = true;
            }
            MissionOutcome::Fled => {}
        }

        settled
    }
}
