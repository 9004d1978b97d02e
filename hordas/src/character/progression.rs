//! Experience and leveling

use tracing::info;

use super::{abilities, Character};

pub const MAX_LEVEL: u32 = 10;

const HP_PER_LEVEL: u32 = 5;
const ATTACK_PER_LEVEL: u32 = 1;
const DEFENSE_PER_LEVEL: u32 = 1;
const MANA_PER_LEVEL: u32 = 5;

/// XP needed to leave `level`
pub fn xp_to_next_level(level: u32) -> u32 {
    100 * level
}

/// One level gained
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelUp {
    pub level: u32,
    /// Ability that became available at this level
    pub unlocked: Option<&'static str>,
    /// This level is the cap
    pub max_level: bool,
}

impl std::fmt::Display for LevelUp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Subiu para o nível {}!", self.level)?;
        if let Some(name) = self.unlocked {
            write!(f, " Nova habilidade desbloqueada: {}.", name)?;
        }
        if self.max_level {
            write!(f, " Nível máximo atingido ({}).", MAX_LEVEL)?;
        }
        Ok(())
    }
}

impl Character {
    /// Add XP, leveling up as many times as it pays for. At the cap XP is
    /// discarded.
    pub fn gain_xp(&mut self, amount: u32) -> Vec<LevelUp> {
        let mut gained = Vec::new();
        if amount == 0 || self.level >= MAX_LEVEL {
            return gained;
        }

        self.xp = self.xp.saturating_add(amount);
        while self.level < MAX_LEVEL && self.xp >= xp_to_next_level(self.level) {
            self.xp -= xp_to_next_level(self.level);
            self.level += 1;
            self.grow();

            let unlocked = abilities::unlocked_at(self.class, self.level).map(|def| def.name);
            info!(hero = %self.entity.name, level = self.level, ?unlocked, "level up");
            gained.push(LevelUp {
                level: self.level,
                unlocked,
                max_level: self.level == MAX_LEVEL,
            });
        }

        if self.level >= MAX_LEVEL {
            self.xp = 0;
        }
        gained
    }

    fn grow(&mut self) {
        let attrs = self.entity.attributes_mut();
        attrs.hp_max = attrs.hp_max.saturating_add(HP_PER_LEVEL);
        attrs.hp = attrs.hp.saturating_add(HP_PER_LEVEL).min(attrs.hp_max);
        attrs.attack = attrs.attack.saturating_add(ATTACK_PER_LEVEL);
        attrs.defense = attrs.defense.saturating_add(DEFENSE_PER_LEVEL);
        attrs.mana = attrs.mana.saturating_add(MANA_PER_LEVEL);
    }
}
