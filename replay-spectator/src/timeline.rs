//! Event timeline
//!
//! The immutable, time-ordered event log of one match. It is built once by a
//! [`TimelineBuilder`] and only read afterwards, so it can be shared by
//! reference across any number of concurrent evaluations.

use crate::types::{
    AnalysisWindow, Event, EventKind, Participant, ParticipantId, Result, SpectatorError,
    Timestamp,
};
use std::collections::HashSet;

/// Immutable event log of a single match
#[derive(Debug, Clone)]
pub struct EventTimeline {
    /// Participants ordered by id
    participants: Vec<Participant>,
    /// Events ordered by timestamp, ties kept in insertion order
    events: Vec<Event>,
    /// Total match duration
    duration: Timestamp,
}

impl EventTimeline {
    /// Start building a timeline
    pub fn builder() -> TimelineBuilder {
        TimelineBuilder::new()
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    /// Look up a participant by id
    pub fn participant(&self, id: ParticipantId) -> Option<&Participant> {
        self.participants
            .binary_search_by_key(&id, |p| p.id)
            .ok()
            .map(|idx| &self.participants[idx])
    }

    /// All events in timeline order
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Total match duration
    pub fn duration(&self) -> Timestamp {
        self.duration
    }

    /// All events with `timestamp` inside the window, in timeline order
    pub fn events_in_range(&self, window: &AnalysisWindow) -> &[Event] {
        let lo = self
            .events
            .partition_point(|e| e.timestamp() < window.start());
        let hi = self.events.partition_point(|e| e.timestamp() < window.end());
        &self.events[lo..hi]
    }

    /// All events at or before `timestamp`, in timeline order
    pub fn events_until(&self, timestamp: Timestamp) -> &[Event] {
        let hi = self.events.partition_point(|e| e.timestamp() <= timestamp);
        &self.events[..hi]
    }

    /// Events of one kind inside the window, in timeline order
    pub fn events_in_window<'a>(
        &'a self,
        window: &AnalysisWindow,
        kind: EventKind,
    ) -> impl Iterator<Item = &'a Event> + 'a {
        self.events_in_range(window)
            .iter()
            .filter(move |event| event.kind() == kind)
    }
}

/// Builder for [`EventTimeline`]
#[derive(Debug, Default)]
pub struct TimelineBuilder {
    participants: Vec<Participant>,
    events: Vec<Event>,
    duration: Option<Timestamp>,
}

impl TimelineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: add a participant
    pub fn participant(mut self, participant: Participant) -> Self {
        self.participants.push(participant);
        self
    }

    /// Builder method: record an event
    pub fn event(mut self, event: Event) -> Self {
        self.events.push(event);
        self
    }

    /// Record an event in place
    pub fn push(&mut self, event: Event) {
        self.events.push(event);
    }

    /// Add a participant in place
    pub fn add_participant(&mut self, participant: Participant) {
        self.participants.push(participant);
    }

    /// Builder method: set the total match duration
    ///
    /// Without an explicit duration the match ends at its last event.
    pub fn duration(mut self, duration: Timestamp) -> Self {
        self.duration = Some(duration);
        self
    }

    /// Set the total match duration in place
    pub fn set_duration(&mut self, duration: Timestamp) {
        self.duration = Some(duration);
    }

    /// Validate and freeze the timeline
    ///
    /// Events are stably sorted by timestamp so that simultaneous events keep
    /// the order they were recorded in.
    pub fn build(self) -> Result<EventTimeline> {
        let TimelineBuilder {
            mut participants,
            mut events,
            duration,
        } = self;

        let mut known = HashSet::new();
        for participant in &participants {
            if !known.insert(participant.id) {
                return Err(SpectatorError::DuplicateParticipant(participant.id));
            }
        }

        for event in &events {
            let unknown = event.participants().into_iter().find(|id| !known.contains(id));
            if let Some(unknown) = unknown {
                return Err(SpectatorError::UnknownParticipant(unknown));
            }
        }

        participants.sort_by_key(|p| p.id);
        events.sort_by_key(|e| e.timestamp());

        let last_event = events.last().map(|e| e.timestamp()).unwrap_or_default();
        let duration = match duration {
            Some(duration) if last_event > duration => {
                return Err(SpectatorError::EventAfterMatchEnd {
                    timestamp: last_event,
                    duration,
                });
            }
            Some(duration) => duration,
            None => last_event,
        };

        log::debug!(
            "Timeline built: {} participants, {} events, duration {:?}",
            participants.len(),
            events.len(),
            duration
        );

        Ok(EventTimeline {
            participants,
            events,
            duration,
        })
    }
}
