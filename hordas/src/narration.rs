//! Narration events
//!
//! Combat never prints. Everything worth telling the player is emitted as a
//! structured [`Event`] into a [`Narrator`]; the shell decides how to show it.

use serde::Serialize;
use tracing::{info, warn};

/// What happened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum EventKind {
    MissionStarted,
    EncounterStarted,
    /// Direct damage from an action or attack
    Damage,
    /// Damage from a ticking status effect
    EffectDamage,
    Heal,
    ManaRestored,
    EffectApplied,
    EffectExpired,
    /// A next-attack buff was readied
    Buff,
    /// Actor lost its action to a stun
    Stunned,
    /// Damage bounced back onto the attacker
    Reflected,
    /// An action was refused (mana, unknown action, not yet usable)
    Rejected,
    LevelUp,
    EncounterWon,
    Victory,
    Defeat,
    Fled,
    /// Encounter abandoned after the turn limit
    Stalemate,
}

/// One narrated occurrence
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Event {
    pub kind: EventKind,
    pub actor: String,
    pub action: String,
    pub target: Option<String>,
    pub amount: Option<u32>,
}

impl Event {
    pub fn new(kind: EventKind, actor: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            kind,
            actor: actor.into(),
            action: action.into(),
            target: None,
            amount: None,
        }
    }

    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    pub fn with_amount(mut self, amount: u32) -> Self {
        self.amount = Some(amount);
        self
    }
}

impl std::fmt::Display for Event {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.actor, self.action)?;
        if let Some(target) = &self.target {
            write!(f, " -> {}", target)?;
        }
        if let Some(amount) = self.amount {
            write!(f, " ({})", amount)?;
        }
        Ok(())
    }
}

/// Sink for narration events
pub trait Narrator {
    fn emit(&mut self, event: Event);
}

impl<N: Narrator + ?Sized> Narrator for &mut N {
    fn emit(&mut self, event: Event) {
        (**self).emit(event);
    }
}

/// Collects events in memory
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Vec<Event>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn of_kind(&self, kind: EventKind) -> impl Iterator<Item = &Event> {
        self.events.iter().filter(move |e| e.kind == kind)
    }

    pub fn count(&self, kind: EventKind) -> usize {
        self.of_kind(kind).count()
    }

    /// Drain everything collected so far
    pub fn take(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }
}

impl Narrator for EventLog {
    fn emit(&mut self, event: Event) {
        self.events.push(event);
    }
}

/// Forwards events to `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNarrator;

impl Narrator for TracingNarrator {
    fn emit(&mut self, event: Event) {
        match event.kind {
            EventKind::Rejected => warn!(kind = ?event.kind, "{}", event),
            _ => info!(kind = ?event.kind, "{}", event),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_display() {
        let event = Event::new(EventKind::Damage, "Aldric", "Golpe Trovejante")
            .with_target("Goblin")
            .with_amount(12);
        assert_eq!(event.to_string(), "Aldric: Golpe Trovejante -> Goblin (12)");

        let bare = Event::new(EventKind::Fled, "Aldric", "recuou da missão");
        assert_eq!(bare.to_string(), "Aldric: recuou da missão");
    }

    #[test]
    fn test_event_log_filters() {
        let mut log = EventLog::new();
        log.emit(Event::new(EventKind::Damage, "a", "x").with_amount(3));
        log.emit(Event::new(EventKind::Heal, "a", "y").with_amount(2));
        log.emit(Event::new(EventKind::Damage, "b", "z").with_amount(1));

        assert_eq!(log.count(EventKind::Damage), 2);
        let total: u32 = log.of_kind(EventKind::Damage).filter_map(|e| e.amount).sum();
        assert_eq!(total, 4);

        let drained = log.take();
        assert_eq!(drained.len(), 3);
        assert!(log.is_empty());
    }

    fn announce(mut narrator: impl Narrator) {
        narrator.emit(Event::new(EventKind::Victory, "a", "venceu"));
    }

    #[test]
    fn test_narrator_through_reference() {
        let mut log = EventLog::new();
        announce(&mut log);
        announce(&mut log);
        assert_eq!(log.count(EventKind::Victory), 2);
    }
}
