//! hordas - horde combat simulator
//!
//! Plays a run of auto-played missions for one hero and prints a summary.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use hordas::combat::{CombatContext, Combatant, Dice, RandomDice};
use hordas::mission::MissionOutcome;
use hordas::narration::TracingNarrator;
use hordas::session::{default_mission, find_mission};
use hordas::snapshot::CharacterSnapshot;
use hordas::{AutoPlay, Config, MissionHint, Session};

/// Turn-based horde combat simulator
#[derive(Parser, Debug)]
#[command(name = "hordas", version, about = "Auto-play horde missions")]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Hero name
    #[arg(long)]
    name: Option<String>,

    /// Hero class (Guerreiro, Mago, Arqueiro, Curandeiro)
    #[arg(long)]
    class: Option<String>,

    /// Trilha, Floresta, Caverna or Ruínas
    #[arg(long)]
    scenario: Option<String>,

    /// Fácil, Média or Difícil
    #[arg(long)]
    difficulty: Option<String>,

    /// Catalogue mission name or horde hint ("Goblin", "boss:Dragão")
    #[arg(long)]
    mission: Option<String>,

    /// Number of missions to play
    #[arg(short = 'n', long)]
    missions: Option<u32>,

    /// Dice seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,

    /// Turn limit per encounter
    #[arg(long)]
    max_turns: Option<u32>,

    /// Start from a saved hero (JSON snapshot)
    #[arg(long)]
    restore: Option<PathBuf>,

    /// Print the hero snapshot as JSON after the run
    #[arg(long)]
    snapshot: bool,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,
}

impl Args {
    /// Command-line values win over file and environment
    fn apply(&self, config: &mut Config) {
        if let Some(name) = &self.name {
            config.hero_name = name.clone();
        }
        if let Some(class) = &self.class {
            config.class = class.clone();
        }
        if let Some(scenario) = &self.scenario {
            config.scenario = scenario.clone();
        }
        if let Some(difficulty) = &self.difficulty {
            config.difficulty = difficulty.clone();
        }
        if let Some(mission) = &self.mission {
            config.mission = Some(mission.clone());
        }
        if let Some(missions) = self.missions {
            config.missions = missions;
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if let Some(max_turns) = self.max_turns {
            config.max_turns_per_encounter = max_turns;
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize tracing
    let registry = tracing_subscriber::registry().with(
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "hordas=info".into()),
    );
    if args.json_logs {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    let mut config = Config::load(args.config.as_deref())?;
    args.apply(&mut config);

    let mut session = Session::from_config(&config)?;
    if let Some(path) = &args.restore {
        let json = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path.display(), e))?;
        let snapshot: CharacterSnapshot = serde_json::from_str(&json)?;
        session.restore(snapshot)?;
    }

    let (label, hint, reward) = match config.mission.as_deref() {
        None => {
            let def = default_mission();
            (def.name.to_string(), def.hint(), def.reward)
        }
        Some(name) => match find_mission(name) {
            Some(def) => (def.name.to_string(), def.hint(), def.reward),
            None => (name.to_string(), MissionHint::parse(name), 0),
        },
    };

    let mut dice: Box<dyn Dice> = match config.seed {
        Some(seed) => Box::new(RandomDice::seeded(seed)),
        None => Box::new(RandomDice::from_os_rng()),
    };
    let mut narrator = TracingNarrator;
    let mut ctx = CombatContext::new(dice.as_mut(), &mut narrator);
    let mut player = AutoPlay;

    info!(
        hero = %config.hero_name,
        class = %config.class,
        scenario = %session.scenario(),
        difficulty = %session.difficulty(),
        missions = config.missions,
        "starting run"
    );

    let (mut won, mut lost, mut fled) = (0, 0, 0);
    for round in 1..=config.missions {
        let played = session.play_hint(&label, &hint, reward, &mut player, &mut ctx);
        match played.report.outcome {
            MissionOutcome::HeroWon => won += 1,
            MissionOutcome::HeroLost => lost += 1,
            MissionOutcome::Fled => fled += 1,
        }
        println!(
            "Missão {}: {} | {:?} | encontros vencidos: {} | turnos: {} | XP +{}",
            round,
            played.mission,
            played.report.outcome,
            played.report.encounters_won,
            played.report.turns,
            played.xp_gained
        );
        for level_up in &played.level_ups {
            println!("  {}", level_up);
        }
        if played.hero_lost {
            println!("  O herói caiu; o próximo será criado do zero.");
        }
    }

    println!("Vitórias: {} | Derrotas: {} | Fugas: {}", won, lost, fled);
    match session.hero() {
        Some(hero) => {
            println!(
                "{} ({}), nível {}, XP {} {}",
                hero.name(),
                hero.class(),
                hero.level(),
                hero.xp(),
                hero.entity().hp_bar(20)
            );
            if args.snapshot {
                println!("{}", serde_json::to_string_pretty(&hero.snapshot())?);
            }
        }
        None => println!("Nenhum herói sobreviveu."),
    }

    Ok(())
}
