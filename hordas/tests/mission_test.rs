//! Mission integration tests
//!
//! Whole encounters driven through the public API with scripted dice and
//! scripted or automatic players.

mod harness;

use harness::Arena;
use hordas::combat::{CombatContext, Combatant, RandomDice};
use hordas::mission::ScriptedPlayer;
use hordas::narration::{EventKind, EventLog};
use hordas::{
    build_horde, Action, AutoPlay, Character, ClassKind, Difficulty, Enemy, Mission, MissionHint,
    MissionOutcome, Scenario,
};

fn horde(names: &[&str]) -> Vec<Enemy> {
    names.iter().map(|name| Enemy::spawn(name)).collect()
}

fn run(
    hero: &mut Character,
    enemies: Vec<Enemy>,
    player: &mut ScriptedPlayer,
    arena: &mut Arena,
) -> hordas::MissionReport {
    Mission::with_horde(hero, enemies, Scenario::Trilha, Difficulty::Easy)
        .run(player, &mut arena.ctx())
}

#[test]
fn test_warrior_clears_two_wolves() {
    let mut warrior = Character::new("Aldric", ClassKind::Warrior);
    let mut arena = Arena::constant(6);

    // 6 + 8 - 3 = 11 per swing; wolves hit back for 15 - 10 = 5
    let report = run(
        &mut warrior,
        horde(&["Lobo", "Lobo"]),
        &mut ScriptedPlayer::repeat(Action::Basic),
        &mut arena,
    );

    assert_eq!(report.outcome, MissionOutcome::HeroWon);
    assert_eq!(report.encounters_won, 2);
    assert_eq!(report.turns, 4);
    assert_eq!(warrior.attributes().hp, 40);
    assert_eq!(warrior.effects().turns, 4);
    assert_eq!(arena.amounts(EventKind::Damage, "Lobo"), vec![5, 5]);
    assert_eq!(arena.log.count(EventKind::EncounterWon), 2);
    assert_eq!(arena.log.count(EventKind::Victory), 1);
}

#[test]
fn test_defeat_ends_mission_early() {
    let mut healer = Character::new("Mira", ClassKind::Healer);
    let mut arena = Arena::constant(6);

    // The golem hits for 26 - 3 = 23 against 20 hp
    let report = run(
        &mut healer,
        horde(&["Golem", "Goblin"]),
        &mut ScriptedPlayer::repeat(Action::Basic),
        &mut arena,
    );

    assert_eq!(report.outcome, MissionOutcome::HeroLost);
    assert_eq!(report.encounters_won, 0);
    assert_eq!(report.turns, 1);
    assert_eq!(healer.attributes().hp, 0);
    assert_eq!(arena.log.count(EventKind::Defeat), 1);
    assert_eq!(arena.log.count(EventKind::Victory), 0);
}

#[test]
fn test_fleeing_keeps_won_encounters() {
    let mut warrior = Character::new("Aldric", ClassKind::Warrior);
    let mut arena = Arena::constant(6);

    let report = run(
        &mut warrior,
        horde(&["Lobo", "Lobo", "Troll"]),
        &mut ScriptedPlayer::new([Action::Basic, Action::Basic], Action::Flee),
        &mut arena,
    );

    assert_eq!(report.outcome, MissionOutcome::Fled);
    assert_eq!(report.encounters_won, 1);
    assert_eq!(report.turns, 3);
    assert_eq!(arena.log.count(EventKind::Fled), 1);
    assert_eq!(arena.log.count(EventKind::Victory), 0);
    assert_eq!(arena.log.count(EventKind::Defeat), 0);
}

#[test]
fn test_mercy_stroke_wins_encounter_then_loses_mission() {
    let mut healer = Character::new("Mira", ClassKind::Healer);
    let mut arena = Arena::constant(20);

    // 4d20 at maximum: 80 - 5 kills the goblin, then the healer collapses
    let report = run(
        &mut healer,
        horde(&["Goblin", "Orc"]),
        &mut ScriptedPlayer::repeat(Action::Special(4)),
        &mut arena,
    );

    assert_eq!(report.outcome, MissionOutcome::HeroLost);
    assert_eq!(report.encounters_won, 1);
    assert_eq!(healer.attributes().hp, 0);
    assert_eq!(arena.log.count(EventKind::EncounterWon), 1);
    assert_eq!(arena.log.count(EventKind::Defeat), 1);
}

#[test]
fn test_perseverance_absorbs_one_attack() {
    let mut warrior = Character::new("Aldric", ClassKind::Warrior);
    let mut arena = Arena::constant(6);

    // Troll attacks for 6 + 14 = 20 raw, 10 after defense
    let report = run(
        &mut warrior,
        horde(&["Troll"]),
        &mut ScriptedPlayer::new([Action::Special(2), Action::Basic], Action::Flee),
        &mut arena,
    );

    assert_eq!(report.outcome, MissionOutcome::Fled);
    assert_eq!(arena.amounts(EventKind::Damage, "Troll"), vec![0, 10]);
    assert_eq!(warrior.attributes().hp, 40);
}

#[test]
fn test_reviving_winds_reflect_attack() {
    let mut healer = Character::new("Mira", ClassKind::Healer);
    let mut arena = Arena::constant(6);

    // Goblin hits for 16 - 3 = 13; the goblin takes 13 - 5 = 8 back
    let report = run(
        &mut healer,
        horde(&["Goblin"]),
        &mut ScriptedPlayer::new([Action::Special(3)], Action::Flee),
        &mut arena,
    );

    assert_eq!(report.outcome, MissionOutcome::Fled);
    assert_eq!(healer.attributes().hp, 7);
    assert_eq!(healer.mana(), 20);
    assert_eq!(arena.amounts(EventKind::Reflected, "Mira"), vec![8]);
}

#[test]
fn test_seismic_push_stuns_once_per_mission() {
    let mut mage = Character::new("Lyra", ClassKind::Mage);
    let mut arena = Arena::constant(1);

    let report = run(
        &mut mage,
        horde(&["Troll"]),
        &mut ScriptedPlayer::new([Action::Special(4), Action::Special(4)], Action::Flee),
        &mut arena,
    );

    assert_eq!(report.outcome, MissionOutcome::Fled);
    assert_eq!(report.turns, 3);
    // Stunned through the first enemy turn, then 1 + 14 - 4 on the second
    assert_eq!(arena.log.count(EventKind::Stunned), 1);
    assert_eq!(arena.amounts(EventKind::Damage, "Troll"), vec![11]);
    assert_eq!(mage.attributes().hp, 19);
    // Second push is refused without spending mana
    assert_eq!(arena.log.count(EventKind::Rejected), 1);
    assert_eq!(mage.mana(), 32);
}

#[test]
fn test_damage_over_time_finishes_enemy() {
    let mut archer = Character::new("Tarin", ClassKind::Archer);
    let mut arena = Arena::constant(6);

    let mut wolf = Enemy::spawn("Lobo");
    wolf.receive_damage(17);
    assert_eq!(wolf.attributes().hp, 4);

    // Bleed ticks for 6 - 3 twice; the archer never strikes directly
    let report = run(
        &mut archer,
        vec![wolf],
        &mut ScriptedPlayer::new([Action::Special(2), Action::Special(4)], Action::Flee),
        &mut arena,
    );

    assert_eq!(report.outcome, MissionOutcome::HeroWon);
    assert_eq!(report.encounters_won, 1);
    assert_eq!(report.turns, 2);
    assert!(arena.amounts(EventKind::Damage, "Tarin").is_empty());
    assert!(arena.log.count(EventKind::EffectDamage) >= 2);
    assert_eq!(archer.attributes().hp, 24);
    assert_eq!(archer.mana(), 9);
}

#[test]
fn test_waning_collapse_costs_fifteen_mana() {
    let mut mage = Character::new("Lyra", ClassKind::Mage);
    let mut arena = Arena::scripted([1, 2, 3, 4, 5, 6]);

    // 6d6 = 21, minus the wolf's 3 defense, exactly its 18 hp
    let report = run(
        &mut mage,
        horde(&["Lobo"]),
        &mut ScriptedPlayer::repeat(Action::Special(1)),
        &mut arena,
    );

    assert_eq!(report.outcome, MissionOutcome::HeroWon);
    assert_eq!(report.turns, 1);
    assert_eq!(mage.mana(), 25);
    assert_eq!(arena.amounts(EventKind::Damage, "Lyra"), vec![18]);
}

#[test]
fn test_trail_horde_order() {
    let enemies = build_horde("Trilha", "Fácil", &MissionHint::Full);
    let names: Vec<&str> = enemies.iter().map(|e| e.name()).collect();
    assert_eq!(names, vec!["Goblin", "Goblin", "Orc", "Troll"]);

    let boss = enemies.last().unwrap();
    assert!(boss.is_boss());
    assert_eq!(boss.attributes().hp, 100);
}

#[test]
fn test_warrior_shrugs_off_weak_hit() {
    let mut warrior = Character::new("Aldric", ClassKind::Warrior);
    assert_eq!(warrior.receive_damage(9), 0);
    assert_eq!(warrior.attributes().hp, 50);
}

#[test]
fn test_autoplay_keeps_hp_in_bounds() {
    let mut seed = 7;
    for &class in ClassKind::all() {
        for &scenario in Scenario::all() {
            for &difficulty in Difficulty::all() {
                seed += 1;
                let mut hero = Character::new("Auto", class);
                let mut dice = RandomDice::seeded(seed);
                let mut log = EventLog::new();
                let mut ctx = CombatContext::new(&mut dice, &mut log);

                let report = Mission::new(&mut hero, scenario, difficulty, &MissionHint::Full)
                    .run(&mut AutoPlay, &mut ctx);

                let attrs = hero.attributes();
                assert!(attrs.hp <= attrs.hp_max, "{} in {}", class, scenario);
                match report.outcome {
                    MissionOutcome::HeroLost => assert_eq!(attrs.hp, 0),
                    MissionOutcome::HeroWon => {
                        assert!(attrs.hp > 0);
                        assert_eq!(log.count(EventKind::EncounterWon), report.encounters_won);
                    }
                    MissionOutcome::Fled => assert!(attrs.hp > 0),
                }
                // AutoPlay never picks anything the loop rejects
                assert_eq!(log.count(EventKind::Rejected), 0);
            }
        }
    }
}
