//! Windowed event extraction
//!
//! Pure queries over an [`EventTimeline`]: events of one kind inside a window,
//! plus the aggregates the tier evaluators need (death records, kills grouped
//! by killer, and who is alive or inside a core area).
//!
//! Deaths can reach the timeline twice, once as a `Kill` and once as a
//! `Death` of the same victim at the same time. [`Extractor::fatalities`]
//! folds both into one [`Fatality`] so a death is never counted twice.

use crate::timeline::EventTimeline;
use crate::types::{AnalysisWindow, Event, EventKind, ParticipantId, Team, Timestamp};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::time::Duration;

/// A single death, with its killer when one is recorded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fatality {
    pub victim: ParticipantId,
    pub killer: Option<ParticipantId>,
    pub at: Timestamp,
}

/// Deaths inside one window credited to the same killer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KillGroup {
    pub killer: ParticipantId,
    /// Deaths in timeline order (never empty)
    pub deaths: Vec<Fatality>,
}

impl KillGroup {
    /// Number of kills in the group
    pub fn len(&self) -> usize {
        self.deaths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.deaths.is_empty()
    }

    /// Time of the group's last death
    pub fn last_death(&self) -> Timestamp {
        self.deaths.iter().map(|d| d.at).max().unwrap_or_default()
    }
}

/// Which core area a presence query is about, relative to the participant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoreSide {
    /// The participant's own team's core
    Ally,
    /// The opposing team's core
    Enemy,
}

/// Read-only extractor over one timeline
#[derive(Debug, Clone, Copy)]
pub struct Extractor<'a> {
    timeline: &'a EventTimeline,
}

impl<'a> Extractor<'a> {
    pub fn new(timeline: &'a EventTimeline) -> Self {
        Self { timeline }
    }

    pub fn timeline(&self) -> &'a EventTimeline {
        self.timeline
    }

    /// Events of `kind` with timestamp inside the window
    pub fn extract(&self, window: &AnalysisWindow, kind: EventKind) -> Vec<&'a Event> {
        self.timeline.events_in_window(window, kind).collect()
    }

    /// Unified death records inside the window, in timeline order
    pub fn fatalities(&self, window: &AnalysisWindow) -> Vec<Fatality> {
        fold_fatalities(self.timeline.events_in_range(window))
    }

    /// Deaths with a known killer, grouped by killer in ascending killer id
    pub fn kill_groups(&self, window: &AnalysisWindow) -> Vec<KillGroup> {
        let mut groups: BTreeMap<ParticipantId, Vec<Fatality>> = BTreeMap::new();

        for fatality in self.fatalities(window) {
            if let Some(killer) = fatality.killer {
                groups.entry(killer).or_default().push(fatality);
            }
        }

        groups
            .into_iter()
            .map(|(killer, deaths)| KillGroup { killer, deaths })
            .collect()
    }

    /// Participants alive at `timestamp`, in ascending id order
    ///
    /// A participant is dead from a death at or before `timestamp` until a
    /// later respawn at or before `timestamp`. Deaths with no recorded respawn
    /// wear off after `respawn_after`.
    pub fn alive_at(&self, timestamp: Timestamp, respawn_after: Duration) -> Vec<ParticipantId> {
        // Time of each participant's last death that was not followed by a respawn
        let mut dead: HashMap<ParticipantId, Timestamp> = HashMap::new();

        for event in self.timeline.events_until(timestamp) {
            match event {
                Event::Kill {
                    victim, timestamp, ..
                }
                | Event::Death {
                    victim, timestamp, ..
                } => {
                    dead.insert(*victim, *timestamp);
                }
                Event::Respawn { actor, .. } => {
                    dead.remove(actor);
                }
                _ => {}
            }
        }

        self.timeline
            .participants()
            .iter()
            .map(|p| p.id)
            .filter(|id| match dead.get(id) {
                Some(died) => died.saturating_add(respawn_after) <= timestamp,
                None => true,
            })
            .collect()
    }

    /// Participants from `candidates` seen inside a core area during the window
    pub fn core_presence(
        &self,
        window: &AnalysisWindow,
        side: CoreSide,
        candidates: &[ParticipantId],
    ) -> Vec<ParticipantId> {
        let mut present = BTreeSet::new();

        for event in self.timeline.events_in_window(window, EventKind::CorePresence) {
            let Event::CorePresence { actor, core, .. } = event else {
                continue;
            };
            if !candidates.contains(actor) {
                continue;
            }
            let Some(team) = self.team_of(*actor) else {
                continue;
            };

            let matches = match side {
                CoreSide::Ally => *core == team,
                CoreSide::Enemy => *core == team.opponent(),
            };
            if matches {
                present.insert(*actor);
            }
        }

        present.into_iter().collect()
    }

    fn team_of(&self, id: ParticipantId) -> Option<Team> {
        self.timeline.participant(id).map(|p| p.team)
    }
}

/// Fold `Death` and `Kill` events into one record per death
fn fold_fatalities(events: &[Event]) -> Vec<Fatality> {
    // Kill credit by (victim, time), and the deaths recorded explicitly
    let mut credited: HashMap<(ParticipantId, Timestamp), ParticipantId> = HashMap::new();
    let mut recorded: HashSet<(ParticipantId, Timestamp)> = HashSet::new();

    for event in events {
        match event {
            Event::Kill {
                killer,
                victim,
                timestamp,
            } => {
                credited.entry((*victim, *timestamp)).or_insert(*killer);
            }
            Event::Death {
                victim, timestamp, ..
            } => {
                recorded.insert((*victim, *timestamp));
            }
            _ => {}
        }
    }

    let mut emitted: HashSet<(ParticipantId, Timestamp)> = HashSet::new();
    let mut fatalities = Vec::new();

    for event in events {
        let fatality = match event {
            Event::Death {
                victim,
                killed_by,
                timestamp,
            } => Fatality {
                victim: *victim,
                killer: (*killed_by).or_else(|| credited.get(&(*victim, *timestamp)).copied()),
                at: *timestamp,
            },
            Event::Kill {
                killer,
                victim,
                timestamp,
            } if !recorded.contains(&(*victim, *timestamp)) => Fatality {
                victim: *victim,
                killer: Some(*killer),
                at: *timestamp,
            },
            _ => continue,
        };

        if emitted.insert((fatality.victim, fatality.at)) {
            fatalities.push(fatality);
        }
    }

    fatalities
}
