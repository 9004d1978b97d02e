//! Simulator configuration
//!
//! Layered with figment: built-in defaults, then an optional TOML file, then
//! `HORDAS_*` environment variables.

use std::path::Path;

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::mission::DEFAULT_MAX_TURNS;

/// Simulator configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub hero_name: String,
    /// Class name, e.g. "Guerreiro" or "mage"
    pub class: String,
    pub scenario: String,
    pub difficulty: String,
    /// Catalogue mission name or horde hint; the full wave when unset
    pub mission: Option<String>,
    /// Missions to play in a row
    pub missions: u32,
    /// Fixed dice seed for reproducible runs
    pub seed: Option<u64>,
    /// Safety valve only: an encounter still running after this many turns
    /// is abandoned and the mission counts as fled. Combat has no timeout of
    /// its own; raise this if a long fight should play out.
    pub max_turns_per_encounter: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            hero_name: "Herói".to_string(),
            class: "Guerreiro".to_string(),
            scenario: "Trilha".to_string(),
            difficulty: "Fácil".to_string(),
            mission: None,
            missions: 1,
            seed: None,
            max_turns_per_encounter: DEFAULT_MAX_TURNS,
        }
    }
}

impl Config {
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        Ok(Self::figment(path).extract()?)
    }

    fn figment(path: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        if let Some(path) = path {
            figment = figment.merge(Toml::file(path));
        }
        figment.merge(Env::prefixed("HORDAS_"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.class, "Guerreiro");
        assert_eq!(config.missions, 1);
        assert_eq!(config.max_turns_per_encounter, 200);
        assert!(config.seed.is_none());
    }

    #[test]
    fn test_toml_overrides_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
hero_name = "Lyra"
class = "Mago"
difficulty = "Difícil"
missions = 3
seed = 42
"#
        )
        .unwrap();

        let config = Config::figment(Some(file.path())).extract::<Config>().unwrap();
        assert_eq!(config.hero_name, "Lyra");
        assert_eq!(config.class, "Mago");
        assert_eq!(config.difficulty, "Difícil");
        assert_eq!(config.missions, 3);
        assert_eq!(config.seed, Some(42));
        // Untouched keys keep their defaults
        assert_eq!(config.scenario, "Trilha");
        assert_eq!(config.max_turns_per_encounter, 200);
    }

    #[test]
    fn test_bad_value_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "missions = \"muitas\"").unwrap();

        let result: Result<Config, ConfigError> = Config::figment(Some(file.path()))
            .extract()
            .map_err(ConfigError::from);
        assert!(matches!(result, Err(ConfigError::Figment(_))));
    }
}
