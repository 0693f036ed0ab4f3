//! Core types for the replay spectator library
//!
//! This module defines the match data model the engine reads (participants and
//! timeline events), the analysis window used to scope every query, and the
//! library error type. Timestamps are offsets from match start, so negative
//! times cannot be represented once data reaches the engine.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Timestamp type used throughout the engine: offset from match start
pub type Timestamp = Duration;

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, SpectatorError>;

/// Stable participant identifier
///
/// This is the participant's slot in the match roster, which is also the
/// index the automation layer uses for its hero-focus key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(pub u8);

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One of the two teams in a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Team {
    Blue,
    Red,
}

impl Team {
    /// The opposing team
    pub fn opponent(self) -> Team {
        match self {
            Team::Blue => Team::Red,
            Team::Red => Team::Blue,
        }
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Team::Blue => write!(f, "Blue"),
            Team::Red => write!(f, "Red"),
        }
    }
}

/// A match actor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    /// Roster slot
    pub id: ParticipantId,
    /// Display name
    pub name: String,
    /// Team the participant plays for
    pub team: Team,
    /// Hero name as recorded in the match, if it is known
    pub hero: Option<String>,
}

impl Participant {
    /// Create a participant with no hero assigned yet
    pub fn new(id: u8, name: impl Into<String>, team: Team) -> Self {
        Self {
            id: ParticipantId(id),
            name: name.into(),
            team,
            hero: None,
        }
    }

    /// Builder method: assign the hero name
    pub fn with_hero(mut self, hero: impl Into<String>) -> Self {
        self.hero = Some(hero.into());
        self
    }
}

/// Errors that can occur while building or querying a timeline
#[derive(Debug, thiserror::Error)]
pub enum SpectatorError {
    #[error("Empty analysis window: [{from:?}, {to:?})")]
    EmptyWindow { from: Timestamp, to: Timestamp },

    #[error("Unknown participant: {0}")]
    UnknownParticipant(ParticipantId),

    #[error("Duplicate participant: {0}")]
    DuplicateParticipant(ParticipantId),

    #[error("Event at {timestamp:?} lies after match end at {duration:?}")]
    EventAfterMatchEnd {
        timestamp: Timestamp,
        duration: Timestamp,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Half-open time interval `[start, end)` scoping a single extraction
///
/// A window is never empty: construction fails when `end <= start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisWindow {
    start: Timestamp,
    end: Timestamp,
}

impl AnalysisWindow {
    /// Create a window, rejecting empty or inverted intervals
    pub fn new(start: Timestamp, end: Timestamp) -> Result<Self> {
        if end <= start {
            return Err(SpectatorError::EmptyWindow {
                from: start,
                to: end,
            });
        }
        Ok(Self { start, end })
    }

    /// Window of `length` starting at `start`, saturating at the end of time
    pub fn ahead(start: Timestamp, length: Duration) -> Result<Self> {
        Self::new(start, start.saturating_add(length))
    }

    /// Window of `radius` on both sides of `center`, clamped at match start
    pub fn around(center: Timestamp, radius: Duration) -> Result<Self> {
        Self::new(center.saturating_sub(radius), center.saturating_add(radius))
    }

    pub fn start(&self) -> Timestamp {
        self.start
    }

    pub fn end(&self) -> Timestamp {
        self.end
    }

    pub fn length(&self) -> Duration {
        self.end - self.start
    }

    /// Check whether a timestamp falls inside the window
    pub fn contains(&self, timestamp: Timestamp) -> bool {
        timestamp >= self.start && timestamp < self.end
    }
}

impl fmt::Display for AnalysisWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{:.1}s, {:.1}s)",
            self.start.as_secs_f64(),
            self.end.as_secs_f64()
        )
    }
}

/// Objective categories recorded by capture events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectiveKind {
    /// Boss / map-boss capture
    Boss,
    /// Mercenary camp capture
    Camp,
    /// Map objective that is not a camp
    Map,
    /// Team-level objective (e.g. a shared map mechanic won by a team)
    Team,
}

/// A recorded match event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A participant killed another participant
    Kill {
        killer: ParticipantId,
        victim: ParticipantId,
        timestamp: Timestamp,
    },

    /// A participant died, with the killing participant if one is known
    Death {
        victim: ParticipantId,
        killed_by: Option<ParticipantId>,
        timestamp: Timestamp,
    },

    /// An objective was captured
    ObjectiveCapture {
        actor: ParticipantId,
        objective: ObjectiveKind,
        timestamp: Timestamp,
    },

    /// A structure was destroyed
    StructureDestroyed {
        /// Participant credited with the destruction, if known
        destroyed_by: Option<ParticipantId>,
        /// Participant that owned the structure, if known
        controller: Option<ParticipantId>,
        timestamp: Timestamp,
    },

    /// A participant taunted
    Taunt {
        actor: ParticipantId,
        timestamp: Timestamp,
    },

    /// A participant pinged the map
    Ping {
        actor: ParticipantId,
        timestamp: Timestamp,
    },

    /// A unit controlled by a participant was active in enemy territory
    UnitActivity {
        actor: ParticipantId,
        timestamp: Timestamp,
    },

    /// A participant was clustered with others near an event of interest
    Proximity {
        actor: ParticipantId,
        timestamp: Timestamp,
    },

    /// A dead participant re-entered play
    Respawn {
        actor: ParticipantId,
        timestamp: Timestamp,
    },

    /// A participant was observed inside the core area owned by `core`
    CorePresence {
        actor: ParticipantId,
        core: Team,
        timestamp: Timestamp,
    },
}

/// Field-less discriminant of [`Event`], used to filter extractions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Kill,
    Death,
    ObjectiveCapture,
    StructureDestroyed,
    Taunt,
    Ping,
    UnitActivity,
    Proximity,
    Respawn,
    CorePresence,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EventKind::Kill => "Kill",
            EventKind::Death => "Death",
            EventKind::ObjectiveCapture => "ObjectiveCapture",
            EventKind::StructureDestroyed => "StructureDestroyed",
            EventKind::Taunt => "Taunt",
            EventKind::Ping => "Ping",
            EventKind::UnitActivity => "UnitActivity",
            EventKind::Proximity => "Proximity",
            EventKind::Respawn => "Respawn",
            EventKind::CorePresence => "CorePresence",
        };
        write!(f, "{}", name)
    }
}

impl Event {
    /// Get the timestamp of this event
    pub fn timestamp(&self) -> Timestamp {
        match self {
            Event::Kill { timestamp, .. }
            | Event::Death { timestamp, .. }
            | Event::ObjectiveCapture { timestamp, .. }
            | Event::StructureDestroyed { timestamp, .. }
            | Event::Taunt { timestamp, .. }
            | Event::Ping { timestamp, .. }
            | Event::UnitActivity { timestamp, .. }
            | Event::Proximity { timestamp, .. }
            | Event::Respawn { timestamp, .. }
            | Event::CorePresence { timestamp, .. } => *timestamp,
        }
    }

    /// Get the kind of this event
    pub fn kind(&self) -> EventKind {
        match self {
            Event::Kill { .. } => EventKind::Kill,
            Event::Death { .. } => EventKind::Death,
            Event::ObjectiveCapture { .. } => EventKind::ObjectiveCapture,
            Event::StructureDestroyed { .. } => EventKind::StructureDestroyed,
            Event::Taunt { .. } => EventKind::Taunt,
            Event::Ping { .. } => EventKind::Ping,
            Event::UnitActivity { .. } => EventKind::UnitActivity,
            Event::Proximity { .. } => EventKind::Proximity,
            Event::Respawn { .. } => EventKind::Respawn,
            Event::CorePresence { .. } => EventKind::CorePresence,
        }
    }

    /// The single acting participant for actor-style events
    pub fn actor(&self) -> Option<ParticipantId> {
        match self {
            Event::ObjectiveCapture { actor, .. }
            | Event::Taunt { actor, .. }
            | Event::Ping { actor, .. }
            | Event::UnitActivity { actor, .. }
            | Event::Proximity { actor, .. }
            | Event::Respawn { actor, .. }
            | Event::CorePresence { actor, .. } => Some(*actor),
            Event::Kill { killer, .. } => Some(*killer),
            Event::Death { .. } | Event::StructureDestroyed { .. } => None,
        }
    }

    /// Every participant this event refers to
    pub fn participants(&self) -> Vec<ParticipantId> {
        match self {
            Event::Kill { killer, victim, .. } => vec![*killer, *victim],
            Event::Death {
                victim, killed_by, ..
            } => std::iter::once(*victim).chain(*killed_by).collect(),
            Event::StructureDestroyed {
                destroyed_by,
                controller,
                ..
            } => destroyed_by.iter().chain(controller.iter()).copied().collect(),
            other => other.actor().into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(s: u64) -> Timestamp {
        Duration::from_secs(s)
    }

    #[test]
    fn test_window_rejects_empty_interval() {
        assert!(AnalysisWindow::new(secs(10), secs(10)).is_err());
        assert!(AnalysisWindow::new(secs(10), secs(5)).is_err());
        assert!(AnalysisWindow::ahead(secs(3), Duration::ZERO).is_err());

        let window = AnalysisWindow::new(secs(10), secs(15)).unwrap();
        assert_eq!(window.length(), secs(5));
    }

    #[test]
    fn test_window_is_half_open() {
        let window = AnalysisWindow::ahead(secs(10), secs(5)).unwrap();
        assert!(window.contains(secs(10)));
        assert!(window.contains(Duration::from_millis(14_999)));
        assert!(!window.contains(secs(15)));
        assert!(!window.contains(Duration::from_millis(9_999)));
    }

    #[test]
    fn test_window_around_clamps_at_match_start() {
        let window = AnalysisWindow::around(secs(2), secs(5)).unwrap();
        assert_eq!(window.start(), Duration::ZERO);
        assert_eq!(window.end(), secs(7));

        let window = AnalysisWindow::around(secs(20), secs(5)).unwrap();
        assert_eq!(window.start(), secs(15));
        assert_eq!(window.end(), secs(25));
    }

    #[test]
    fn test_window_saturates_instead_of_overflowing() {
        let window = AnalysisWindow::ahead(secs(10), Duration::MAX).unwrap();
        assert_eq!(window.end(), Duration::MAX);

        let window = AnalysisWindow::around(secs(10), Duration::MAX).unwrap();
        assert_eq!(window.start(), Duration::ZERO);
        assert_eq!(window.end(), Duration::MAX);

        assert!(matches!(
            AnalysisWindow::ahead(Duration::MAX, secs(1)),
            Err(SpectatorError::EmptyWindow { .. })
        ));
    }

    #[test]
    fn test_event_accessors() {
        let death = Event::Death {
            victim: ParticipantId(3),
            killed_by: Some(ParticipantId(7)),
            timestamp: secs(42),
        };
        assert_eq!(death.kind(), EventKind::Death);
        assert_eq!(death.timestamp(), secs(42));
        assert_eq!(death.actor(), None);
        assert_eq!(death.participants(), vec![ParticipantId(3), ParticipantId(7)]);

        let structure = Event::StructureDestroyed {
            destroyed_by: None,
            controller: Some(ParticipantId(1)),
            timestamp: secs(5),
        };
        assert_eq!(structure.participants(), vec![ParticipantId(1)]);
    }

    #[test]
    fn test_team_opponent() {
        assert_eq!(Team::Blue.opponent(), Team::Red);
        assert_eq!(Team::Red.opponent(), Team::Blue);
        assert_eq!(format!("{}", ParticipantId(4)), "#4");
    }
}
