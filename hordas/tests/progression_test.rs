//! Progression and session integration tests

mod harness;

use harness::Arena;
use hordas::character::{abilities_for, unlocked_ability_count, MAX_LEVEL};
use hordas::combat::Combatant;
use hordas::mission::ScriptedPlayer;
use hordas::narration::EventKind;
use hordas::session::find_mission;
use hordas::snapshot::CharacterSnapshot;
use hordas::{Action, Character, ClassKind, Difficulty, MissionOutcome, Scenario, Session};

#[test]
fn test_unlocks_follow_level() {
    let expected = [4, 5, 5, 6, 6, 7, 7, 7, 7, 7];
    for (level, want) in (1..=MAX_LEVEL).zip(expected) {
        assert_eq!(unlocked_ability_count(level), want, "level {}", level);
    }

    let mut mage = Character::new("Lyra", ClassKind::Mage);
    assert_eq!(abilities_for(&mage, true).len(), 4);
    assert_eq!(abilities_for(&mage, false).len(), 7);

    mage.gain_xp(100 + 200 + 300);
    assert_eq!(mage.level(), 4);
    assert_eq!(mage.abilities().len(), 6);
}

#[test]
fn test_xp_stops_at_max_level() {
    let mut archer = Character::new("Tarin", ClassKind::Archer);

    let mut level_ups = Vec::new();
    for _ in 0..60 {
        level_ups.extend(archer.gain_xp(100));
    }

    assert_eq!(archer.level(), MAX_LEVEL);
    assert_eq!(archer.xp(), 0);
    assert_eq!(level_ups.len(), 9);
    assert!(level_ups.last().is_some_and(|up| up.max_level));

    // Further rewards change nothing
    assert!(archer.gain_xp(1_000).is_empty());
    assert_eq!(archer.level(), MAX_LEVEL);
    assert_eq!(archer.xp(), 0);
}

#[test]
fn test_level_up_grows_attributes() {
    let mut warrior = Character::new("Aldric", ClassKind::Warrior);
    let ups = warrior.gain_xp(100);

    assert_eq!(ups.len(), 1);
    assert_eq!(ups[0].level, 2);
    assert_eq!(ups[0].unlocked, Some("Grito de Guerra"));

    let attrs = warrior.attributes();
    assert_eq!(attrs.hp_max, 55);
    assert_eq!(attrs.attack, 9);
    assert_eq!(attrs.defense, 11);
    assert_eq!(warrior.mana(), 10);
}

#[test]
fn test_session_rewards_carry_between_missions() {
    let mut session =
        Session::new("Aldric", ClassKind::Warrior, Scenario::Caverna, Difficulty::Easy);
    let mission = find_mission("Matar Ladrões").unwrap();
    let mut arena = Arena::constant(6);
    let mut player = ScriptedPlayer::repeat(Action::Basic);

    // Each Ladrão fight costs 3 hits of 16 - 10
    let first = session.play(mission, &mut player, &mut arena.ctx());
    assert_eq!(first.report.outcome, MissionOutcome::HeroWon);
    assert!(first.level_ups.is_empty());
    assert_eq!(session.hero().map(|h| h.attributes().hp), Some(32));

    let second = session.play(mission, &mut player, &mut arena.ctx());
    assert_eq!(second.report.outcome, MissionOutcome::HeroWon);
    assert_eq!(second.level_ups.len(), 1);

    let hero = session.hero().unwrap();
    assert_eq!(hero.level(), 2);
    assert_eq!(hero.xp(), 0);
    assert_eq!(hero.attributes().hp, 19);
    assert_eq!(arena.log.count(EventKind::LevelUp), 1);
}

#[test]
fn test_snapshot_survives_json() {
    let mut healer = Character::new("Mira", ClassKind::Healer);
    healer.gain_xp(250);
    healer.receive_damage(10);

    let json = serde_json::to_string(&healer.snapshot()).unwrap();
    let snapshot: CharacterSnapshot = serde_json::from_str(&json).unwrap();
    let restored = Character::try_from(snapshot).unwrap();

    assert_eq!(restored, healer);
    assert_eq!(restored.level(), 2);
    assert_eq!(restored.xp(), 150);
}
