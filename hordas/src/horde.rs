//! Enemies and horde generation
//!
//! Enemies come from a fixed stat table keyed by type name. A horde is the
//! ordered queue of enemies for one mission: minions first, boss last.
//! Unknown names never fail; they fall back to documented defaults.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::combat::{Attributes, Combatant, Dice, EffectState, Entity};

/// `(name, hp, attack, defense)`
const ENEMY_STATS: [(&str, u32, u32, u32); 10] = [
    ("Ladrão", 15, 10, 10),
    ("Goblin", 20, 10, 5),
    ("Orc", 30, 12, 6),
    ("Lobo", 18, 9, 3),
    ("Elfo", 15, 10, 10),
    ("Esqueleto", 22, 11, 7),
    ("Golem", 35, 20, 25),
    ("Troll", 60, 14, 8),
    ("Ent", 50, 16, 12),
    ("Dragão", 40, 30, 35),
];

/// Stats for a type name missing from the table
const DEFAULT_STATS: (u32, u32, u32) = (20, 8, 4);

/// Lowercase and strip Portuguese accents so "Ruinas" matches "Ruínas"
pub(crate) fn fold(name: &str) -> String {
    name.trim()
        .chars()
        .flat_map(char::to_lowercase)
        .map(|c| match c {
            'á' | 'à' | 'â' | 'ã' => 'a',
            'é' | 'ê' => 'e',
            'í' => 'i',
            'ó' | 'ô' | 'õ' => 'o',
            'ú' | 'ü' => 'u',
            'ç' => 'c',
            other => other,
        })
        .collect()
}

/// Table entry for `kind`, as `(canonical name, hp, attack, defense)`
fn stats_for(kind: &str) -> Option<(&'static str, u32, u32, u32)> {
    let folded = fold(kind);
    ENEMY_STATS
        .iter()
        .copied()
        .find(|(name, ..)| fold(name) == folded)
}

/// A hostile combatant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enemy {
    entity: Entity,
    effects: EffectState,
    boss: bool,
}

impl Enemy {
    /// Regular enemy of type `kind`
    pub fn spawn(kind: &str) -> Self {
        let (name, hp, attack, defense) = match stats_for(kind) {
            Some(stats) => stats,
            None => {
                debug!(kind, "unknown enemy type, using default stats");
                let (hp, attack, defense) = DEFAULT_STATS;
                (kind.trim(), hp, attack, defense)
            }
        };
        Self {
            entity: Entity::new(name, Attributes::new(hp, attack, defense, 0)),
            effects: EffectState::new(),
            boss: false,
        }
    }

    /// Boss of type `kind` with its hp replaced by `hp`
    pub fn boss(kind: &str, hp: u32) -> Self {
        let mut enemy = Self::spawn(kind);
        let attrs = enemy.entity.attributes_mut();
        attrs.hp = hp;
        attrs.hp_max = hp;
        enemy.boss = true;
        enemy
    }

    pub fn is_boss(&self) -> bool {
        self.boss
    }

    /// Raw damage of this enemy's attack: 1d6 plus attack
    pub fn attack_roll(&self, dice: &mut dyn Dice) -> u32 {
        dice.roll(6, "inimigo") + self.entity.attributes().attack
    }
}

impl Combatant for Enemy {
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

/// Mission setting
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Scenario {
    #[default]
    Trilha,
    Floresta,
    Caverna,
    #[serde(rename = "Ruínas")]
    Ruinas,
}

impl Scenario {
    pub fn all() -> &'static [Scenario] {
        &[
            Scenario::Trilha,
            Scenario::Floresta,
            Scenario::Caverna,
            Scenario::Ruinas,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            Scenario::Trilha => "Trilha",
            Scenario::Floresta => "Floresta",
            Scenario::Caverna => "Caverna",
            Scenario::Ruinas => "Ruínas",
        }
    }

    /// `((minion_a, minion_b), boss)`
    pub fn plan(&self) -> ((&'static str, &'static str), &'static str) {
        match self {
            Scenario::Trilha => (("Goblin", "Orc"), "Troll"),
            Scenario::Floresta => (("Lobo", "Elfo"), "Ent"),
            Scenario::Caverna => (("Ladrão", "Goblin"), "Golem"),
            Scenario::Ruinas => (("Esqueleto", "Golem"), "Dragão"),
        }
    }

    /// Parse, falling back to the default scenario
    pub fn lenient(name: &str) -> Self {
        name.parse().unwrap_or_default()
    }
}

impl FromStr for Scenario {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let folded = fold(s);
        Scenario::all()
            .iter()
            .copied()
            .find(|scenario| fold(scenario.label()) == folded)
            .ok_or(())
    }
}

impl std::fmt::Display for Scenario {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Mission difficulty
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    #[default]
    #[serde(rename = "Fácil")]
    Easy,
    #[serde(rename = "Média")]
    Medium,
    #[serde(rename = "Difícil")]
    Hard,
}

impl Difficulty {
    pub fn all() -> &'static [Difficulty] {
        &[Difficulty::Easy, Difficulty::Medium, Difficulty::Hard]
    }

    pub fn label(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Fácil",
            Difficulty::Medium => "Média",
            Difficulty::Hard => "Difícil",
        }
    }

    pub fn boss_hp(&self) -> u32 {
        match self {
            Difficulty::Easy => 100,
            Difficulty::Medium => 300,
            Difficulty::Hard => 500,
        }
    }

    /// How many of each minion type a full wave has
    pub fn minion_counts(&self) -> (usize, usize) {
        match self {
            Difficulty::Easy => (2, 1),
            Difficulty::Medium => (3, 2),
            Difficulty::Hard => (4, 3),
        }
    }

    /// Parse, falling back to the default difficulty
    pub fn lenient(name: &str) -> Self {
        name.parse().unwrap_or_default()
    }
}

impl FromStr for Difficulty {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match fold(s).as_str() {
            "facil" | "easy" => Ok(Difficulty::Easy),
            // "Médio" appears in older save files
            "media" | "medio" | "medium" => Ok(Difficulty::Medium),
            "dificil" | "hard" => Ok(Difficulty::Hard),
            _ => Err(()),
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

pub fn plan_for_scenario(scenario: &str) -> ((&'static str, &'static str), &'static str) {
    Scenario::lenient(scenario).plan()
}

pub fn hp_for_boss(difficulty: &str) -> u32 {
    Difficulty::lenient(difficulty).boss_hp()
}

pub fn minion_counts(difficulty: &str) -> (usize, usize) {
    Difficulty::lenient(difficulty).minion_counts()
}

/// Which part of a horde a mission fights
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MissionHint {
    /// Every minion, then the boss
    #[default]
    Full,
    /// Exactly one enemy of this type
    Minion(String),
    /// Exactly one boss; the scenario's own when no type is given
    Boss(Option<String>),
}

impl MissionHint {
    /// `""`/`"horda"` for the full wave, `"boss"`/`"chefe"` optionally
    /// followed by `:Type`, anything else names a minion type
    pub fn parse(text: &str) -> Self {
        let text = text.trim();
        let (head, rest) = match text.split_once(':') {
            Some((head, rest)) => (head, Some(rest.trim())),
            None => (text, None),
        };
        match fold(head).as_str() {
            "" | "horda" | "full" => MissionHint::Full,
            "boss" | "chefe" => {
                MissionHint::Boss(rest.filter(|r| !r.is_empty()).map(str::to_string))
            }
            _ => MissionHint::Minion(text.to_string()),
        }
    }
}

/// Build the enemy queue for a mission. The boss, if any, is always last.
pub fn build_horde(scenario: &str, difficulty: &str, hint: &MissionHint) -> Vec<Enemy> {
    let scenario = Scenario::lenient(scenario);
    let difficulty = Difficulty::lenient(difficulty);
    let ((minion_a, minion_b), boss) = scenario.plan();

    let horde = match hint {
        MissionHint::Minion(kind) => vec![Enemy::spawn(kind)],
        MissionHint::Boss(kind) => {
            vec![Enemy::boss(kind.as_deref().unwrap_or(boss), difficulty.boss_hp())]
        }
        MissionHint::Full => {
            let (count_a, count_b) = difficulty.minion_counts();
            let mut horde = Vec::with_capacity(count_a + count_b + 1);
            horde.extend((0..count_a).map(|_| Enemy::spawn(minion_a)));
            horde.extend((0..count_b).map(|_| Enemy::spawn(minion_b)));
            horde.push(Enemy::boss(boss, difficulty.boss_hp()));
            horde
        }
    };

    debug!(%scenario, %difficulty, ?hint, size = horde.len(), "horde built");
    horde
}
