//! Tier evaluators
//!
//! One function per tier family. Each reads the window in its [`TierContext`]
//! and returns candidates in any order; [`Tier::evaluate`](super::Tier::evaluate)
//! sorts them.

use super::{Candidate, SpectateEvent, TierContext};
use crate::extract::{CoreSide, Fatality, KillGroup};
use crate::heroes::HeroClass;
use crate::types::{Event, EventKind, ObjectiveKind, ParticipantId};
use std::time::Duration;

/// Kill-streak tiers: killers with exactly the tier's number of kills
///
/// Attribution depends on the killer's hero:
/// - unresolved: follow the killer, long grace after the last kill
/// - melee: follow the killer, short grace after the last kill
/// - ranged or split-unit: follow each victim at their own death instead
pub fn kill_streaks(ctx: &TierContext<'_>) -> Vec<Candidate> {
    let Some(required) = ctx.kind.kill_count() else {
        return Vec::new();
    };

    let mut candidates = Vec::new();

    for group in ctx
        .extractor
        .kill_groups(&ctx.window)
        .into_iter()
        .filter(|group| group.len() == required)
    {
        let class = ctx
            .participant(group.killer)
            .and_then(|killer| ctx.heroes.hero_class(killer));

        match class {
            None => candidates.push(follow_killer(ctx, &group, ctx.config.long_grace())),
            Some(HeroClass::Melee) => {
                candidates.push(follow_killer(ctx, &group, ctx.config.short_grace()))
            }
            Some(HeroClass::Ranged) | Some(HeroClass::SplitUnit) => {
                candidates.extend(follow_victims(&group.deaths, ctx.config.short_grace()))
            }
        }
    }

    candidates
}

fn follow_killer(ctx: &TierContext<'_>, group: &KillGroup, grace: Duration) -> Candidate {
    Candidate::new(group.killer, ctx.kind, group.last_death(), grace)
}

fn follow_victims(deaths: &[Fatality], grace: Duration) -> impl Iterator<Item = Candidate> + '_ {
    deaths
        .iter()
        .map(move |death| Candidate::new(death.victim, SpectateEvent::Death, death.at, grace))
}

/// Death tier: every victim in the window
pub fn deaths(ctx: &TierContext<'_>) -> Vec<Candidate> {
    let fatalities = ctx.extractor.fatalities(&ctx.window);
    follow_victims(&fatalities, ctx.config.short_grace()).collect()
}

/// Objective tiers: the capturing participant
pub fn objectives(ctx: &TierContext<'_>) -> Vec<Candidate> {
    let wanted = match ctx.kind {
        SpectateEvent::Boss => ObjectiveKind::Boss,
        SpectateEvent::Camp => ObjectiveKind::Camp,
        SpectateEvent::MapObjective => ObjectiveKind::Map,
        SpectateEvent::TeamObjective => ObjectiveKind::Team,
        _ => return Vec::new(),
    };

    ctx.extractor
        .extract(&ctx.window, EventKind::ObjectiveCapture)
        .into_iter()
        .filter_map(|event| match event {
            Event::ObjectiveCapture {
                actor,
                objective,
                timestamp,
            } if *objective == wanted => {
                Some(Candidate::new(*actor, ctx.kind, *timestamp, Duration::ZERO))
            }
            _ => None,
        })
        .collect()
}

/// Enemy-controlled unit activity
pub fn units(ctx: &TierContext<'_>) -> Vec<Candidate> {
    actor_events(ctx, EventKind::UnitActivity)
}

pub fn taunts(ctx: &TierContext<'_>) -> Vec<Candidate> {
    actor_events(ctx, EventKind::Taunt)
}

pub fn pings(ctx: &TierContext<'_>) -> Vec<Candidate> {
    actor_events(ctx, EventKind::Ping)
}

/// Proximity tier: clustered participants, held until the window closes
pub fn proximity(ctx: &TierContext<'_>) -> Vec<Candidate> {
    let end = ctx.window.end();

    actor_events(ctx, EventKind::Proximity)
        .into_iter()
        .map(|candidate| Candidate {
            grace: end.saturating_sub(candidate.occurs_at),
            ..candidate
        })
        .collect()
}

/// Structure tier: the destroying participant; unattributed kills are skipped
pub fn structures(ctx: &TierContext<'_>) -> Vec<Candidate> {
    ctx.extractor
        .extract(&ctx.window, EventKind::StructureDestroyed)
        .into_iter()
        .filter_map(|event| match event {
            Event::StructureDestroyed {
                destroyed_by: Some(destroyer),
                timestamp,
                ..
            } => Some(Candidate::new(*destroyer, ctx.kind, *timestamp, Duration::ZERO)),
            _ => None,
        })
        .collect()
}

/// Killer-of-interest tier: killers of deaths around the current time
pub fn killers(ctx: &TierContext<'_>) -> Vec<Candidate> {
    ctx.extractor
        .fatalities(&ctx.window)
        .into_iter()
        .filter_map(|death| {
            death
                .killer
                .map(|killer| Candidate::new(killer, ctx.kind, death.at, Duration::ZERO))
        })
        .collect()
}

/// Alive fallback
///
/// Prefers participants threatening the enemy core, then anyone alive away
/// from their own core, then anyone alive.
pub fn alive(ctx: &TierContext<'_>) -> Vec<Candidate> {
    let start = ctx.window.start();
    let alive = ctx.extractor.alive_at(start, ctx.config.respawn_after());
    if alive.is_empty() {
        return Vec::new();
    }

    let in_enemy_core = ctx
        .extractor
        .core_presence(&ctx.window, CoreSide::Enemy, &alive);

    let selected = if !in_enemy_core.is_empty() {
        in_enemy_core
    } else {
        let in_ally_core = ctx
            .extractor
            .core_presence(&ctx.window, CoreSide::Ally, &alive);
        let outside: Vec<ParticipantId> = alive
            .iter()
            .copied()
            .filter(|id| !in_ally_core.contains(id))
            .collect();

        if outside.is_empty() {
            alive
        } else {
            outside
        }
    };

    selected
        .into_iter()
        .map(|id| Candidate::new(id, ctx.kind, start, ctx.window.length()))
        .collect()
}

fn actor_events(ctx: &TierContext<'_>, kind: EventKind) -> Vec<Candidate> {
    ctx.extractor
        .extract(&ctx.window, kind)
        .into_iter()
        .filter_map(|event| {
            event
                .actor()
                .map(|actor| Candidate::new(actor, ctx.kind, event.timestamp(), Duration::ZERO))
        })
        .collect()
}
