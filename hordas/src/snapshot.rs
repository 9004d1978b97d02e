//! Character snapshots
//!
//! Plain data a persistence layer can serialize however it likes. Field
//! names follow the keys of existing save files.

use serde::{Deserialize, Serialize};

use crate::character::{Character, ClassKind, MAX_LEVEL};
use crate::combat::{Attributes, EffectState, Entity};
use crate::error::SnapshotError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterSnapshot {
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "classe")]
    pub class: ClassKind,
    #[serde(rename = "nivel")]
    pub level: u32,
    pub xp: u32,
    #[serde(rename = "atributos")]
    pub attributes: Attributes,
    #[serde(rename = "efeitos", default)]
    pub effects: EffectState,
}

impl Character {
    pub fn snapshot(&self) -> CharacterSnapshot {
        CharacterSnapshot {
            name: self.entity.name.clone(),
            class: self.class,
            level: self.level,
            xp: self.xp,
            attributes: *self.entity.attributes(),
            effects: self.effects.clone(),
        }
    }

    /// Rebuild a character, rejecting snapshots that break its invariants
    pub fn from_snapshot(snapshot: CharacterSnapshot) -> Result<Self, SnapshotError> {
        if !(1..=MAX_LEVEL).contains(&snapshot.level) {
            return Err(SnapshotError::LevelOutOfRange(snapshot.level));
        }
        let attrs = snapshot.attributes;
        if attrs.hp > attrs.hp_max {
            return Err(SnapshotError::HpAboveMax {
                hp: attrs.hp,
                hp_max: attrs.hp_max,
            });
        }

        Ok(Self {
            entity: Entity::new(snapshot.name, attrs),
            class: snapshot.class,
            level: snapshot.level,
            xp: snapshot.xp,
            effects: snapshot.effects,
        })
    }
}

impl TryFrom<CharacterSnapshot> for Character {
    type Error = SnapshotError;

    fn try_from(snapshot: CharacterSnapshot) -> Result<Self, Self::Error> {
        Character::from_snapshot(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::Combatant;

    #[test]
    fn test_snapshot_keeps_progress() {
        let mut archer = Character::new("Tarin", ClassKind::Archer);
        archer.gain_xp(350);
        archer.effects.apply_fatal_mark(3);

        let restored = Character::from_snapshot(archer.snapshot()).unwrap();
        assert_eq!(restored, archer);
        assert_eq!(restored.level(), 3);
        assert_eq!(restored.xp(), 50);
    }

    #[test]
    fn test_snapshot_json_keys() {
        let mage = Character::new("Lyra", ClassKind::Mage);
        let json = serde_json::to_value(mage.snapshot()).unwrap();

        assert_eq!(json["nome"], "Lyra");
        assert_eq!(json["classe"], "Mago");
        assert_eq!(json["nivel"], 1);
        assert_eq!(json["atributos"]["vida_max"], 30);
        assert_eq!(json["efeitos"]["veneno_dano"], 2);
    }

    #[test]
    fn test_snapshot_without_effects() {
        let json = r#"{
            "nome": "Mira",
            "classe": "Curandeiro",
            "nivel": 2,
            "xp": 10,
            "atributos": {"vida": 12, "vida_max": 25, "ataque": 1, "defesa": 4, "mana": 40}
        }"#;
        let snapshot: CharacterSnapshot = serde_json::from_str(json).unwrap();
        let healer = Character::try_from(snapshot).unwrap();

        assert_eq!(healer.class(), ClassKind::Healer);
        assert_eq!(healer.attributes().hp, 12);
        assert_eq!(healer.effects().turns, 0);
        assert_eq!(healer.effects().poison_damage, 2);
    }

    #[test]
    fn test_invalid_snapshots() {
        let mut snapshot = Character::new("Aldric", ClassKind::Warrior).snapshot();
        snapshot.level = 11;
        assert_eq!(
            Character::from_snapshot(snapshot.clone()),
            Err(SnapshotError::LevelOutOfRange(11))
        );

        snapshot.level = 1;
        snapshot.attributes.hp = 80;
        assert_eq!(
            Character::from_snapshot(snapshot),
            Err(SnapshotError::HpAboveMax { hp: 80, hp_max: 50 })
        );
    }

    #[test]
    fn test_restored_mana_pool_saturates() {
        let mut snapshot = Character::new("Lyra", ClassKind::Mage).snapshot();
        snapshot.attributes.mana = u32::MAX - 10;

        let mut mage = Character::from_snapshot(snapshot).unwrap();
        mage.restore_mana(50);
        assert_eq!(mage.mana(), u32::MAX);
    }
}
