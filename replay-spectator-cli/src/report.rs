//! Report generation
//!
//! Renders a directive plan, a sweep or a per-tier explanation as an
//! ASCII table (TXT) or as JSON.

use anyhow::Result;
use replay_spectator::{
    Directive, EventTimeline, ParticipantId, Selection, SpectateEvent, Team, TierEvaluation,
    Timestamp,
};
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::Write;

/// Format a playback time as `mm:ss.s`
pub fn format_clock(at: Timestamp) -> String {
    let tenths = at.as_millis() / 100;
    let minutes = tenths / 600;
    let seconds = (tenths % 600) / 10;
    format!("{:02}:{:02}.{}", minutes, seconds, tenths % 10)
}

fn generated_at() -> String {
    chrono::Local::now().to_rfc3339()
}

fn participant_label(timeline: &EventTimeline, id: ParticipantId) -> (String, Option<Team>) {
    match timeline.participant(id) {
        Some(p) => (p.name.clone(), Some(p.team)),
        None => (id.to_string(), None),
    }
}

/// One camera instruction, flattened for output
#[derive(Debug, Clone, Serialize)]
pub struct DirectiveRow {
    pub at_secs: f64,
    pub clock: String,
    pub participant: u8,
    pub name: String,
    pub team: Option<Team>,
    pub justification: SpectateEvent,
    pub occurs_at_secs: f64,
    pub hold_secs: f64,
}

/// Counts per justification and per participant
#[derive(Debug, Clone, Default, Serialize)]
pub struct PlanSummary {
    pub directives: usize,
    pub by_justification: BTreeMap<String, usize>,
    pub by_participant: BTreeMap<String, usize>,
}

/// Full directive plan for one match
#[derive(Debug, Clone, Serialize)]
pub struct PlanReport {
    pub generated_at: String,
    pub generator: String,
    pub match_duration_secs: f64,
    pub start_secs: f64,
    pub directives: Vec<DirectiveRow>,
    pub summary: PlanSummary,
}

impl PlanReport {
    pub fn build(timeline: &EventTimeline, start: Timestamp, directives: &[Directive]) -> Self {
        let mut summary = PlanSummary::default();

        let rows: Vec<DirectiveRow> = directives
            .iter()
            .map(|d| {
                let (name, team) = participant_label(timeline, d.participant);

                summary.directives += 1;
                *summary
                    .by_justification
                    .entry(d.justification.to_string())
                    .or_insert(0) += 1;
                *summary.by_participant.entry(name.clone()).or_insert(0) += 1;

                DirectiveRow {
                    at_secs: d.at.as_secs_f64(),
                    clock: format_clock(d.at),
                    participant: d.participant.0,
                    name,
                    team,
                    justification: d.justification,
                    occurs_at_secs: d.occurs_at.as_secs_f64(),
                    hold_secs: d.hold_duration.as_secs_f64(),
                }
            })
            .collect();

        Self {
            generated_at: generated_at(),
            generator: format!("replay-spectator v{}", replay_spectator::VERSION),
            match_duration_secs: timeline.duration().as_secs_f64(),
            start_secs: start.as_secs_f64(),
            directives: rows,
            summary,
        }
    }

    pub fn write_txt<W: Write + ?Sized>(&self, out: &mut W) -> Result<()> {
        writeln!(out, "═══════════════════════════════════════════════════════════════")?;
        writeln!(out, "  Spectating Plan")?;
        writeln!(out, "═══════════════════════════════════════════════════════════════")?;
        writeln!(out, "Generated:  {}", self.generated_at)?;
        writeln!(out, "Generator:  {}", self.generator)?;
        writeln!(out, "Match:      {:.1}s", self.match_duration_secs)?;
        writeln!(out, "Start:      {:.1}s", self.start_secs)?;
        writeln!(out)?;

        writeln!(
            out,
            "{:<9} {:<4} {:<16} {:<5} {:<15} {:>9} {:>7}",
            "TIME", "ID", "NAME", "TEAM", "REASON", "EVENT AT", "HOLD"
        )?;
        writeln!(out, "───────────────────────────────────────────────────────────────")?;
        for row in &self.directives {
            writeln!(
                out,
                "{:<9} {:<4} {:<16} {:<5} {:<15} {:>8.1}s {:>6.1}s",
                row.clock,
                row.participant,
                row.name,
                team_label(row.team),
                row.justification.to_string(),
                row.occurs_at_secs,
                row.hold_secs
            )?;
        }

        writeln!(out)?;
        writeln!(out, "Summary: {} directives", self.summary.directives)?;
        for (reason, count) in &self.summary.by_justification {
            writeln!(out, "  {:<15} {}", reason, count)?;
        }
        writeln!(out, "Watched:")?;
        for (name, count) in &self.summary.by_participant {
            writeln!(out, "  {:<15} {}", name, count)?;
        }

        Ok(())
    }

    pub fn write_json<W: Write + ?Sized>(&self, out: &mut W) -> Result<()> {
        serde_json::to_writer_pretty(&mut *out, self)?;
        writeln!(out)?;
        Ok(())
    }
}

fn team_label(team: Option<Team>) -> &'static str {
    match team {
        Some(Team::Blue) => "blue",
        Some(Team::Red) => "red",
        None => "-",
    }
}

/// One sampled resolution
#[derive(Debug, Clone, Serialize)]
pub struct SweepRow {
    pub at_secs: f64,
    pub clock: String,
    pub participant: Option<u8>,
    pub name: Option<String>,
    pub tier: Option<SpectateEvent>,
    pub justification: Option<SpectateEvent>,
    pub tier_index: Option<usize>,
}

/// Selections sampled at fixed intervals
#[derive(Debug, Clone, Serialize)]
pub struct SweepReport {
    pub generated_at: String,
    pub interval_secs: f64,
    pub samples: Vec<SweepRow>,
}

impl SweepReport {
    pub fn build(
        timeline: &EventTimeline,
        interval: Timestamp,
        samples: &[(Timestamp, Option<Selection>)],
    ) -> Self {
        let samples = samples
            .iter()
            .map(|(at, selection)| {
                let target = selection.map(|s| s.candidate.target);
                SweepRow {
                    at_secs: at.as_secs_f64(),
                    clock: format_clock(*at),
                    participant: target.map(|id| id.0),
                    name: target.map(|id| participant_label(timeline, id).0),
                    tier: selection.map(|s| s.tier),
                    justification: selection.map(|s| s.candidate.kind),
                    tier_index: selection.map(|s| s.tier_index),
                }
            })
            .collect();

        Self {
            generated_at: generated_at(),
            interval_secs: interval.as_secs_f64(),
            samples,
        }
    }

    pub fn write_txt<W: Write + ?Sized>(&self, out: &mut W) -> Result<()> {
        writeln!(out, "Sweep every {:.1}s ({} samples)", self.interval_secs, self.samples.len())?;
        writeln!(out, "{:<9} {:<16} {:<15} {:<15}", "TIME", "NAME", "TIER", "REASON")?;
        for row in &self.samples {
            match (&row.name, row.tier, row.justification) {
                (Some(name), Some(tier), Some(reason)) => writeln!(
                    out,
                    "{:<9} {:<16} {:<15} {:<15}",
                    row.clock,
                    name,
                    tier.to_string(),
                    reason.to_string()
                )?,
                _ => writeln!(out, "{:<9} (no selection)", row.clock)?,
            }
        }
        Ok(())
    }

    pub fn write_json<W: Write + ?Sized>(&self, out: &mut W) -> Result<()> {
        serde_json::to_writer_pretty(&mut *out, self)?;
        writeln!(out)?;
        Ok(())
    }
}

/// Every tier's candidates at one playback time
#[derive(Debug, Clone, Serialize)]
pub struct ExplainReport {
    pub at_secs: f64,
    pub clock: String,
    pub winner: Option<usize>,
    pub tiers: Vec<ExplainTier>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExplainTier {
    pub tier: SpectateEvent,
    pub window_start_secs: f64,
    pub window_end_secs: f64,
    pub candidates: Vec<ExplainCandidate>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExplainCandidate {
    pub participant: u8,
    pub name: String,
    pub kind: SpectateEvent,
    pub occurs_at_secs: f64,
    pub focus_until_secs: f64,
}

impl ExplainReport {
    pub fn build(timeline: &EventTimeline, at: Timestamp, evaluations: &[TierEvaluation]) -> Self {
        let tiers = evaluations
            .iter()
            .map(|evaluation| ExplainTier {
                tier: evaluation.kind,
                window_start_secs: evaluation.window.start().as_secs_f64(),
                window_end_secs: evaluation.window.end().as_secs_f64(),
                candidates: evaluation
                    .candidates
                    .iter()
                    .map(|c| ExplainCandidate {
                        participant: c.target.0,
                        name: participant_label(timeline, c.target).0,
                        kind: c.kind,
                        occurs_at_secs: c.occurs_at.as_secs_f64(),
                        focus_until_secs: c.focus_until().as_secs_f64(),
                    })
                    .collect(),
            })
            .collect();

        Self {
            at_secs: at.as_secs_f64(),
            clock: format_clock(at),
            winner: evaluations.iter().position(|e| !e.is_empty()),
            tiers,
        }
    }

    pub fn write_txt<W: Write + ?Sized>(&self, out: &mut W) -> Result<()> {
        writeln!(out, "Selection at {}", self.clock)?;
        for (index, tier) in self.tiers.iter().enumerate() {
            let marker = if Some(index) == self.winner { "▶" } else { " " };
            writeln!(
                out,
                "{} {:>2}. {:<15} [{:.1}s, {:.1}s)  {} candidate(s)",
                marker,
                index,
                tier.tier.to_string(),
                tier.window_start_secs,
                tier.window_end_secs,
                tier.candidates.len()
            )?;
            for c in &tier.candidates {
                writeln!(
                    out,
                    "       └─ {} ({}) {} at {:.1}s until {:.1}s",
                    c.name, c.participant, c.kind, c.occurs_at_secs, c.focus_until_secs
                )?;
            }
        }
        if self.winner.is_none() {
            writeln!(out, "No selection")?;
        }
        Ok(())
    }

    pub fn write_json<W: Write + ?Sized>(&self, out: &mut W) -> Result<()> {
        serde_json::to_writer_pretty(&mut *out, self)?;
        writeln!(out)?;
        Ok(())
    }
}
