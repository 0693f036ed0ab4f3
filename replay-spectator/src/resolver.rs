//! Priority resolver
//!
//! Walks the tier catalogue from the highest priority down and stops at the
//! first tier with a candidate. Lower tiers are never evaluated once a higher
//! tier fires, so a late kill streak always beats an earlier taunt.

use crate::config::SelectorConfig;
use crate::heroes::HeroLookup;
use crate::tiers::{Candidate, SpectateEvent, TierCatalogue, TierEvaluation};
use crate::timeline::EventTimeline;
use crate::types::{AnalysisWindow, Result, Timestamp};

/// The single chosen target at a playback time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    /// Earliest candidate of the winning tier
    pub candidate: Candidate,
    /// Tier that produced the candidate
    pub tier: SpectateEvent,
    /// Position of that tier in the catalogue (0 = highest priority)
    pub tier_index: usize,
    /// Window the tier was evaluated over
    pub window: AnalysisWindow,
}

/// Resolves "who to watch" at a playback time
#[derive(Debug, Clone)]
pub struct PriorityResolver {
    catalogue: TierCatalogue,
    config: SelectorConfig,
}

impl PriorityResolver {
    /// Create a resolver with the standard catalogue for `config`
    pub fn new(config: SelectorConfig) -> Result<Self> {
        let catalogue = TierCatalogue::standard(&config);
        Self::with_catalogue(config, catalogue)
    }

    /// Create a resolver with a custom catalogue
    pub fn with_catalogue(config: SelectorConfig, catalogue: TierCatalogue) -> Result<Self> {
        config.validate()?;
        Ok(Self { catalogue, config })
    }

    pub fn catalogue(&self) -> &TierCatalogue {
        &self.catalogue
    }

    pub fn config(&self) -> &SelectorConfig {
        &self.config
    }

    /// Select the target at playback time `now`
    ///
    /// Returns `Ok(None)` when every tier is empty.
    pub fn resolve(
        &self,
        timeline: &EventTimeline,
        heroes: &dyn HeroLookup,
        now: Timestamp,
    ) -> Result<Option<Selection>> {
        for (tier_index, tier) in self.catalogue.iter().enumerate() {
            let evaluation = tier.evaluate(timeline, heroes, &self.config, now)?;

            if let Some(candidate) = evaluation.earliest().copied() {
                log::debug!(
                    "t={:.1}s: {} -> {} at {:.1}s (window {})",
                    now.as_secs_f64(),
                    evaluation.kind,
                    candidate.target,
                    candidate.occurs_at.as_secs_f64(),
                    evaluation.window
                );

                return Ok(Some(Selection {
                    candidate,
                    tier: evaluation.kind,
                    tier_index,
                    window: evaluation.window,
                }));
            }
        }

        log::debug!("t={:.1}s: no selection", now.as_secs_f64());
        Ok(None)
    }

    /// Evaluate every tier at `now`, without short-circuiting
    ///
    /// Diagnostic view of the whole catalogue; the selection is the earliest
    /// candidate of the first non-empty entry.
    pub fn resolve_tiers(
        &self,
        timeline: &EventTimeline,
        heroes: &dyn HeroLookup,
        now: Timestamp,
    ) -> Result<Vec<TierEvaluation>> {
        self.catalogue
            .iter()
            .map(|tier| tier.evaluate(timeline, heroes, &self.config, now))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heroes::{HeroClass, HeroTable};
    use crate::types::{Event, ObjectiveKind, Participant, ParticipantId, Team};
    use std::time::Duration;

    fn secs(s: u64) -> Timestamp {
        Duration::from_secs(s)
    }

    fn id(n: u8) -> ParticipantId {
        ParticipantId(n)
    }

    fn heroes() -> HeroTable {
        HeroTable::new()
            .with_hero("Brawler", HeroClass::Melee)
            .with_hero("Sniper", HeroClass::Ranged)
    }

    fn timeline(events: Vec<Event>) -> EventTimeline {
        let mut builder = EventTimeline::builder()
            .participant(Participant::new(0, "melee", Team::Blue).with_hero("Brawler"))
            .participant(Participant::new(1, "ranged", Team::Blue).with_hero("Sniper"))
            .participant(Participant::new(2, "unknown", Team::Blue))
            .participant(Participant::new(5, "r5", Team::Red).with_hero("Brawler"))
            .participant(Participant::new(6, "r6", Team::Red).with_hero("Brawler"))
            .participant(Participant::new(7, "r7", Team::Red).with_hero("Brawler"));
        for event in events {
            builder.push(event);
        }
        builder.build().unwrap()
    }

    fn death(victim: u8, killer: Option<u8>, at: u64) -> Event {
        Event::Death {
            victim: id(victim),
            killed_by: killer.map(id),
            timestamp: secs(at),
        }
    }

    #[test]
    fn test_single_melee_kill_scenario() {
        let tl = timeline(vec![Event::Kill {
            killer: id(0),
            victim: id(5),
            timestamp: secs(30),
        }]);
        let config = SelectorConfig::new().with_kill_window(Duration::from_secs(40));
        let resolver = PriorityResolver::new(config).unwrap();

        let selection = resolver.resolve(&tl, &heroes(), secs(0)).unwrap().unwrap();
        assert_eq!(selection.tier, SpectateEvent::Kill);
        assert_eq!(
            selection.candidate,
            Candidate::new(id(0), SpectateEvent::Kill, secs(30), secs(1))
        );
    }

    #[test]
    fn test_unresolved_triple_kill_scenario() {
        let tl = timeline(vec![
            death(5, Some(2), 10),
            death(6, Some(2), 12),
            death(7, Some(2), 14),
        ]);
        let resolver = PriorityResolver::new(SelectorConfig::new()).unwrap();

        let selection = resolver.resolve(&tl, &heroes(), secs(0)).unwrap().unwrap();
        assert_eq!(
            selection.candidate,
            Candidate::new(id(2), SpectateEvent::TripleKill, secs(14), secs(2))
        );

        let tiers = resolver.resolve_tiers(&tl, &heroes(), secs(0)).unwrap();
        let multi = tiers.iter().find(|t| t.kind == SpectateEvent::MultiKill).unwrap();
        let single = tiers.iter().find(|t| t.kind == SpectateEvent::Kill).unwrap();
        assert!(multi.is_empty());
        assert!(single.is_empty());
    }

    #[test]
    fn test_no_selection_when_nothing_is_alive_or_happening() {
        let tl = timeline(
            [0, 1, 2, 5, 6, 7]
                .iter()
                .map(|&victim| death(victim, None, 50))
                .collect(),
        );
        let resolver = PriorityResolver::new(SelectorConfig::new()).unwrap();

        assert!(resolver.resolve(&tl, &heroes(), secs(60)).unwrap().is_none());

        // Nobody respawns on record, so the fallback delay brings everyone back
        let back = resolver.resolve(&tl, &heroes(), secs(80)).unwrap().unwrap();
        assert_eq!(back.tier, SpectateEvent::Alive);
    }

    #[test]
    fn test_higher_tier_wins_regardless_of_time() {
        // Taunt right now, kill by a melee hero 8 seconds later
        let tl = timeline(vec![
            Event::Taunt { actor: id(6), timestamp: secs(1) },
            death(5, Some(0), 8),
        ]);
        let resolver = PriorityResolver::new(SelectorConfig::new()).unwrap();

        let selection = resolver.resolve(&tl, &heroes(), secs(0)).unwrap().unwrap();
        assert_eq!(selection.tier, SpectateEvent::Kill);
        assert_eq!(selection.tier_index, 4);
        assert_eq!(selection.candidate.target, id(0));
    }

    #[test]
    fn test_earliest_candidate_wins_within_tier() {
        let tl = timeline(vec![
            Event::ObjectiveCapture {
                actor: id(6),
                objective: ObjectiveKind::Camp,
                timestamp: secs(9),
            },
            Event::ObjectiveCapture {
                actor: id(1),
                objective: ObjectiveKind::Camp,
                timestamp: secs(3),
            },
            Event::ObjectiveCapture {
                actor: id(7),
                objective: ObjectiveKind::Camp,
                timestamp: secs(6),
            },
        ]);
        let resolver = PriorityResolver::new(SelectorConfig::new()).unwrap();

        let selection = resolver.resolve(&tl, &heroes(), secs(0)).unwrap().unwrap();
        assert_eq!(selection.tier, SpectateEvent::Camp);
        assert_eq!(selection.candidate.target, id(1));
        assert_eq!(selection.candidate.occurs_at, secs(3));
    }

    #[test]
    fn test_priority_monotonicity_across_times() {
        let tl = timeline(vec![
            death(5, Some(1), 12),
            Event::Taunt { actor: id(7), timestamp: secs(14) },
            Event::StructureDestroyed {
                destroyed_by: Some(id(2)),
                controller: None,
                timestamp: secs(20),
            },
            Event::Proximity { actor: id(0), timestamp: secs(31) },
        ]);
        let resolver = PriorityResolver::new(SelectorConfig::new()).unwrap();
        let lookup = heroes();

        for now in 0..40 {
            let tiers = resolver.resolve_tiers(&tl, &lookup, secs(now)).unwrap();
            let selection = resolver.resolve(&tl, &lookup, secs(now)).unwrap();

            match tiers.iter().position(|t| !t.is_empty()) {
                Some(first) => {
                    let selection = selection.unwrap();
                    assert_eq!(selection.tier_index, first);
                    assert_eq!(Some(&selection.candidate), tiers[first].earliest());
                    let min = tiers[first].candidates.iter().map(|c| c.occurs_at).min();
                    assert_eq!(Some(selection.candidate.occurs_at), min);
                }
                None => assert!(selection.is_none()),
            }
        }
    }

    #[test]
    fn test_resolution_is_deterministic() {
        let tl = timeline(vec![
            death(5, Some(1), 4),
            death(6, Some(1), 4),
            Event::Taunt { actor: id(2), timestamp: secs(2) },
        ]);
        let resolver = PriorityResolver::new(SelectorConfig::new()).unwrap();
        let lookup = heroes();

        let first = resolver.resolve(&tl, &lookup, secs(0)).unwrap();
        for _ in 0..10 {
            assert_eq!(resolver.resolve(&tl, &lookup, secs(0)).unwrap(), first);
        }

        // Ranged multi-kill fans out; the first victim in timeline order wins the tie
        let selection = first.unwrap();
        assert_eq!(selection.tier, SpectateEvent::MultiKill);
        assert_eq!(selection.candidate.kind, SpectateEvent::Death);
        assert_eq!(selection.candidate.target, id(5));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = SelectorConfig::new().with_min_step(Duration::ZERO);
        assert!(PriorityResolver::new(config).is_err());
    }
}
