//! Match timeline documents
//!
//! The replay parser hands matches over as JSON. Times are seconds from match
//! start as floating point numbers; anything negative or non-finite is
//! rejected before it reaches the engine.

use anyhow::{Context, Result};
use replay_spectator::{
    Event, EventTimeline, ObjectiveKind, Participant, ParticipantId, SpectatorError, Team,
    Timestamp,
};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Errors in a timeline document
#[derive(Debug, thiserror::Error)]
pub enum TimelineFileError {
    #[error("Malformed timeline document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Event {index}: invalid timestamp {value} (must be finite and >= 0)")]
    InvalidTimestamp { index: usize, value: f64 },

    #[error("Invalid match duration {0} (must be finite and >= 0)")]
    InvalidDuration(f64),

    #[error(transparent)]
    Timeline(#[from] SpectatorError),
}

/// Top-level JSON document
#[derive(Debug, Deserialize)]
pub struct TimelineDocument {
    /// Match length; defaults to the last event
    #[serde(default)]
    pub duration_secs: Option<f64>,
    pub participants: Vec<ParticipantRecord>,
    #[serde(default)]
    pub events: Vec<EventRecord>,
}

#[derive(Debug, Deserialize)]
pub struct ParticipantRecord {
    pub id: u8,
    pub name: String,
    pub team: Team,
    #[serde(default)]
    pub hero: Option<String>,
}

/// One event, tagged by `type`
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventRecord {
    Kill {
        killer: u8,
        victim: u8,
        at: f64,
    },
    Death {
        victim: u8,
        #[serde(default)]
        killed_by: Option<u8>,
        at: f64,
    },
    ObjectiveCapture {
        actor: u8,
        objective: ObjectiveKind,
        at: f64,
    },
    StructureDestroyed {
        #[serde(default)]
        destroyed_by: Option<u8>,
        #[serde(default)]
        controller: Option<u8>,
        at: f64,
    },
    Taunt {
        actor: u8,
        at: f64,
    },
    Ping {
        actor: u8,
        at: f64,
    },
    UnitActivity {
        actor: u8,
        at: f64,
    },
    Proximity {
        actor: u8,
        at: f64,
    },
    Respawn {
        actor: u8,
        at: f64,
    },
    CorePresence {
        actor: u8,
        core: Team,
        at: f64,
    },
}

impl EventRecord {
    fn at(&self) -> f64 {
        match self {
            EventRecord::Kill { at, .. }
            | EventRecord::Death { at, .. }
            | EventRecord::ObjectiveCapture { at, .. }
            | EventRecord::StructureDestroyed { at, .. }
            | EventRecord::Taunt { at, .. }
            | EventRecord::Ping { at, .. }
            | EventRecord::UnitActivity { at, .. }
            | EventRecord::Proximity { at, .. }
            | EventRecord::Respawn { at, .. }
            | EventRecord::CorePresence { at, .. } => *at,
        }
    }

    fn into_event(self, index: usize) -> std::result::Result<Event, TimelineFileError> {
        let value = self.at();
        let timestamp = seconds(value).ok_or(TimelineFileError::InvalidTimestamp { index, value })?;
        let id = ParticipantId;

        let event = match self {
            EventRecord::Kill { killer, victim, .. } => Event::Kill {
                killer: id(killer),
                victim: id(victim),
                timestamp,
            },
            EventRecord::Death {
                victim, killed_by, ..
            } => Event::Death {
                victim: id(victim),
                killed_by: killed_by.map(id),
                timestamp,
            },
            EventRecord::ObjectiveCapture {
                actor, objective, ..
            } => Event::ObjectiveCapture {
                actor: id(actor),
                objective,
                timestamp,
            },
            EventRecord::StructureDestroyed {
                destroyed_by,
                controller,
                ..
            } => Event::StructureDestroyed {
                destroyed_by: destroyed_by.map(id),
                controller: controller.map(id),
                timestamp,
            },
            EventRecord::Taunt { actor, .. } => Event::Taunt {
                actor: id(actor),
                timestamp,
            },
            EventRecord::Ping { actor, .. } => Event::Ping {
                actor: id(actor),
                timestamp,
            },
            EventRecord::UnitActivity { actor, .. } => Event::UnitActivity {
                actor: id(actor),
                timestamp,
            },
            EventRecord::Proximity { actor, .. } => Event::Proximity {
                actor: id(actor),
                timestamp,
            },
            EventRecord::Respawn { actor, .. } => Event::Respawn {
                actor: id(actor),
                timestamp,
            },
            EventRecord::CorePresence { actor, core, .. } => Event::CorePresence {
                actor: id(actor),
                core,
                timestamp,
            },
        };

        Ok(event)
    }
}

/// Seconds from match start, if representable
fn seconds(value: f64) -> Option<Timestamp> {
    if !value.is_finite() || value < 0.0 {
        return None;
    }
    Duration::try_from_secs_f64(value).ok()
}

impl TimelineDocument {
    /// Validate the document and build the engine's timeline
    pub fn into_timeline(self) -> std::result::Result<EventTimeline, TimelineFileError> {
        let mut builder = EventTimeline::builder();

        for record in self.participants {
            let mut participant = Participant::new(record.id, record.name, record.team);
            participant.hero = record.hero;
            builder.add_participant(participant);
        }

        for (index, record) in self.events.into_iter().enumerate() {
            builder.push(record.into_event(index)?);
        }

        if let Some(value) = self.duration_secs {
            builder.set_duration(seconds(value).ok_or(TimelineFileError::InvalidDuration(value))?);
        }

        Ok(builder.build()?)
    }
}

/// Parse a timeline from JSON text
pub fn parse_timeline(json: &str) -> std::result::Result<EventTimeline, TimelineFileError> {
    let document: TimelineDocument = serde_json::from_str(json)?;
    document.into_timeline()
}

/// Load a timeline from a JSON file
pub fn load_timeline(path: &Path) -> Result<EventTimeline> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read timeline file: {:?}", path))?;

    let timeline = parse_timeline(&content)
        .with_context(|| format!("Failed to load timeline file: {:?}", path))?;

    log::info!(
        "Loaded {:?}: {} participants, {} events, {:.1}s",
        path,
        timeline.participants().len(),
        timeline.events().len(),
        timeline.duration().as_secs_f64()
    );

    Ok(timeline)
}
