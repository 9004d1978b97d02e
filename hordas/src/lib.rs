//! hordas - turn-based horde combat
//!
//! Heroes of four classes fight scripted enemy waves with a basic attack,
//! seven leveled abilities, a mana economy and timed status effects.
//! Randomness comes in through [`combat::Dice`] and everything worth telling
//! the player goes out through [`narration::Narrator`].

pub mod character;
pub mod combat;
pub mod config;
pub mod error;
pub mod horde;
pub mod mission;
pub mod narration;
pub mod session;
pub mod snapshot;

pub use character::{Character, ClassKind};
pub use config::Config;
pub use horde::{build_horde, Difficulty, Enemy, MissionHint, Scenario};
pub use mission::{Action, ActionDecider, AutoPlay, Mission, MissionOutcome, MissionReport};
pub use session::Session;
