//! Priority tiers
//!
//! A tier pairs a justification ([`SpectateEvent`]) with a window shape and an
//! evaluator function. The catalogue is plain data: adding or reordering a
//! tier is an edit to [`TierCatalogue::standard`], not to the resolver.

pub mod evaluators;

use crate::config::SelectorConfig;
use crate::extract::Extractor;
use crate::heroes::HeroLookup;
use crate::timeline::EventTimeline;
use crate::types::{AnalysisWindow, Participant, ParticipantId, Result, Timestamp};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Why the camera should watch a participant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpectateEvent {
    QuintupleKill,
    QuadKill,
    TripleKill,
    MultiKill,
    Kill,
    Death,
    Boss,
    Camp,
    MapObjective,
    TeamObjective,
    Unit,
    Taunt,
    Structure,
    Proximity,
    Killer,
    Ping,
    Alive,
}

impl SpectateEvent {
    /// Kill-streak tiers, highest multiplicity first
    pub const KILL_STREAKS: [SpectateEvent; 5] = [
        SpectateEvent::QuintupleKill,
        SpectateEvent::QuadKill,
        SpectateEvent::TripleKill,
        SpectateEvent::MultiKill,
        SpectateEvent::Kill,
    ];

    /// Exact number of kills a kill-streak tier requires
    pub fn kill_count(self) -> Option<usize> {
        match self {
            SpectateEvent::QuintupleKill => Some(5),
            SpectateEvent::QuadKill => Some(4),
            SpectateEvent::TripleKill => Some(3),
            SpectateEvent::MultiKill => Some(2),
            SpectateEvent::Kill => Some(1),
            _ => None,
        }
    }
}

impl fmt::Display for SpectateEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SpectateEvent::QuintupleKill => "Quintuple Kill",
            SpectateEvent::QuadKill => "Quad Kill",
            SpectateEvent::TripleKill => "Triple Kill",
            SpectateEvent::MultiKill => "Multi Kill",
            SpectateEvent::Kill => "Kill",
            SpectateEvent::Death => "Death",
            SpectateEvent::Boss => "Boss",
            SpectateEvent::Camp => "Camp",
            SpectateEvent::MapObjective => "Map Objective",
            SpectateEvent::TeamObjective => "Team Objective",
            SpectateEvent::Unit => "Unit",
            SpectateEvent::Taunt => "Taunt",
            SpectateEvent::Structure => "Structure",
            SpectateEvent::Proximity => "Proximity",
            SpectateEvent::Killer => "Killer",
            SpectateEvent::Ping => "Ping",
            SpectateEvent::Alive => "Alive",
        };
        write!(f, "{}", name)
    }
}

/// A provisional camera target proposed by one tier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    /// Participant to focus
    pub target: ParticipantId,
    /// Justification
    pub kind: SpectateEvent,
    /// When the justifying event happens
    pub occurs_at: Timestamp,
    /// Extra focus time after `occurs_at`
    pub grace: Duration,
}

impl Candidate {
    pub fn new(
        target: ParticipantId,
        kind: SpectateEvent,
        occurs_at: Timestamp,
        grace: Duration,
    ) -> Self {
        Self {
            target,
            kind,
            occurs_at,
            grace,
        }
    }

    /// Playback time at which the focus should end
    pub fn focus_until(&self) -> Timestamp {
        self.occurs_at.saturating_add(self.grace)
    }

    /// How long to hold the focus when it is taken at `now`
    pub fn hold_duration(&self, now: Timestamp) -> Duration {
        self.focus_until().saturating_sub(now)
    }
}

/// Shape of a tier's window relative to the current playback time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TierWindow {
    /// `[t, t + length)`
    Ahead(Duration),
    /// `[t - radius, t + radius)`, clamped at match start
    Around(Duration),
}

impl TierWindow {
    /// Concrete window at playback time `now`
    pub fn at(&self, now: Timestamp) -> Result<AnalysisWindow> {
        match *self {
            TierWindow::Ahead(length) => AnalysisWindow::ahead(now, length),
            TierWindow::Around(radius) => AnalysisWindow::around(now, radius),
        }
    }
}

/// Everything an evaluator may read
pub struct TierContext<'a> {
    pub extractor: Extractor<'a>,
    pub heroes: &'a dyn HeroLookup,
    pub config: &'a SelectorConfig,
    pub window: AnalysisWindow,
    pub kind: SpectateEvent,
}

impl<'a> TierContext<'a> {
    pub fn participant(&self, id: ParticipantId) -> Option<&'a Participant> {
        self.extractor.timeline().participant(id)
    }
}

/// Turns one window of the timeline into candidates
pub type Evaluator = fn(&TierContext<'_>) -> Vec<Candidate>;

/// One priority level
#[derive(Clone, Copy)]
pub struct Tier {
    kind: SpectateEvent,
    window: TierWindow,
    evaluate: Evaluator,
}

impl fmt::Debug for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tier")
            .field("kind", &self.kind)
            .field("window", &self.window)
            .finish_non_exhaustive()
    }
}

impl Tier {
    pub fn new(kind: SpectateEvent, window: TierWindow, evaluate: Evaluator) -> Self {
        Self {
            kind,
            window,
            evaluate,
        }
    }

    pub fn kind(&self) -> SpectateEvent {
        self.kind
    }

    pub fn window(&self) -> TierWindow {
        self.window
    }

    /// Evaluate the tier at playback time `now`
    ///
    /// Candidates come back ordered by `occurs_at`; the sort is stable so
    /// simultaneous candidates keep their evaluation order.
    pub fn evaluate(
        &self,
        timeline: &EventTimeline,
        heroes: &dyn HeroLookup,
        config: &SelectorConfig,
        now: Timestamp,
    ) -> Result<TierEvaluation> {
        let window = self.window.at(now)?;
        let context = TierContext {
            extractor: Extractor::new(timeline),
            heroes,
            config,
            window,
            kind: self.kind,
        };

        let mut candidates = (self.evaluate)(&context);
        candidates.sort_by_key(|c| c.occurs_at);

        log::trace!(
            "Tier {} over {}: {} candidate(s)",
            self.kind,
            window,
            candidates.len()
        );

        Ok(TierEvaluation {
            kind: self.kind,
            window,
            candidates,
        })
    }
}

/// Result of evaluating one tier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TierEvaluation {
    pub kind: SpectateEvent,
    pub window: AnalysisWindow,
    /// Ordered by `occurs_at`
    pub candidates: Vec<Candidate>,
}

impl TierEvaluation {
    /// Earliest candidate, if any
    pub fn earliest(&self) -> Option<&Candidate> {
        self.candidates.first()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

/// Ordered tier list, highest priority first
#[derive(Debug, Clone)]
pub struct TierCatalogue {
    tiers: Vec<Tier>,
}

impl TierCatalogue {
    /// The standard catalogue built from a selector configuration
    pub fn standard(config: &SelectorConfig) -> Self {
        use evaluators as eval;

        let event = TierWindow::Ahead(config.event_window());
        let activity = TierWindow::Ahead(config.activity_window());

        let mut tiers: Vec<Tier> = SpectateEvent::KILL_STREAKS
            .iter()
            .map(|&kind| {
                let kills = kind.kill_count().unwrap_or(1);
                Tier::new(
                    kind,
                    TierWindow::Ahead(config.streak_window(kills)),
                    eval::kill_streaks,
                )
            })
            .collect();

        tiers.extend([
            Tier::new(SpectateEvent::Death, event, eval::deaths),
            Tier::new(SpectateEvent::Boss, event, eval::objectives),
            Tier::new(SpectateEvent::Camp, event, eval::objectives),
            Tier::new(SpectateEvent::MapObjective, event, eval::objectives),
            Tier::new(SpectateEvent::TeamObjective, event, eval::objectives),
            Tier::new(SpectateEvent::Unit, activity, eval::units),
            Tier::new(SpectateEvent::Taunt, activity, eval::taunts),
            Tier::new(SpectateEvent::Structure, activity, eval::structures),
            Tier::new(SpectateEvent::Proximity, activity, eval::proximity),
            Tier::new(
                SpectateEvent::Killer,
                TierWindow::Around(config.killer_radius()),
                eval::killers,
            ),
        ]);

        if config.include_pings {
            tiers.push(Tier::new(SpectateEvent::Ping, activity, eval::pings));
        }

        tiers.push(Tier::new(SpectateEvent::Alive, activity, eval::alive));

        Self { tiers }
    }

    /// A custom catalogue, highest priority first
    pub fn from_tiers(tiers: Vec<Tier>) -> Self {
        Self { tiers }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tier> {
        self.tiers.iter()
    }

    pub fn len(&self) -> usize {
        self.tiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }

    /// Tier kinds in priority order
    pub fn kinds(&self) -> Vec<SpectateEvent> {
        self.tiers.iter().map(|t| t.kind).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_catalogue_order() {
        let catalogue = TierCatalogue::standard(&SelectorConfig::new());

        assert_eq!(
            catalogue.kinds(),
            vec![
                SpectateEvent::QuintupleKill,
                SpectateEvent::QuadKill,
                SpectateEvent::TripleKill,
                SpectateEvent::MultiKill,
                SpectateEvent::Kill,
                SpectateEvent::Death,
                SpectateEvent::Boss,
                SpectateEvent::Camp,
                SpectateEvent::MapObjective,
                SpectateEvent::TeamObjective,
                SpectateEvent::Unit,
                SpectateEvent::Taunt,
                SpectateEvent::Structure,
                SpectateEvent::Proximity,
                SpectateEvent::Killer,
                SpectateEvent::Alive,
            ]
        );
    }

    #[test]
    fn test_ping_tier_sits_above_alive() {
        let catalogue = TierCatalogue::standard(&SelectorConfig::new().with_pings(true));
        let kinds = catalogue.kinds();

        assert_eq!(kinds.len(), 17);
        assert_eq!(kinds[kinds.len() - 2], SpectateEvent::Ping);
        assert_eq!(kinds[kinds.len() - 1], SpectateEvent::Alive);
    }

    #[test]
    fn test_standard_windows() {
        let catalogue = TierCatalogue::standard(&SelectorConfig::new());
        let windows: Vec<_> = catalogue.iter().map(|t| t.window()).collect();

        assert_eq!(windows[0], TierWindow::Ahead(Duration::from_secs(48)));
        assert_eq!(windows[3], TierWindow::Ahead(Duration::from_secs(12)));
        assert_eq!(windows[4], TierWindow::Ahead(Duration::from_secs(10)));
        assert_eq!(windows[14], TierWindow::Around(Duration::from_secs(5)));
    }

    #[test]
    fn test_candidate_hold() {
        let candidate = Candidate::new(
            ParticipantId(2),
            SpectateEvent::Kill,
            Duration::from_secs(30),
            Duration::from_secs(1),
        );
        assert_eq!(candidate.focus_until(), Duration::from_secs(31));
        assert_eq!(candidate.hold_duration(Duration::from_secs(20)), Duration::from_secs(11));
        assert_eq!(candidate.hold_duration(Duration::from_secs(40)), Duration::ZERO);
    }

    #[test]
    fn test_kill_counts() {
        assert_eq!(SpectateEvent::QuintupleKill.kill_count(), Some(5));
        assert_eq!(SpectateEvent::Kill.kill_count(), Some(1));
        assert_eq!(SpectateEvent::Death.kill_count(), None);
        assert_eq!(format!("{}", SpectateEvent::TripleKill), "Triple Kill");
    }
}
