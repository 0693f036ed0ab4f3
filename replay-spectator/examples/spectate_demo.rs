//! Standalone spectating demo
//!
//! Builds a short scripted teamfight, runs the director over it and prints
//! every camera directive followed by a summary.
//!
//! Usage:
//!   spectate_demo [--start <secs>] [--pings] [--verbose]
//!
//! Example:
//!   RUST_LOG=debug spectate_demo --start 20 --verbose

use replay_spectator::{
    Director, Event, EventTimeline, HeroTable, ObjectiveKind, Participant, ParticipantId,
    SelectorConfig, SpectateEvent, Team,
};
use std::collections::HashMap;
use std::env;
use std::time::Duration;

struct PlanStats {
    directives: usize,
    watched: Duration,
    by_justification: HashMap<SpectateEvent, usize>,
    by_participant: HashMap<ParticipantId, usize>,
}

impl PlanStats {
    fn new() -> Self {
        Self {
            directives: 0,
            watched: Duration::ZERO,
            by_justification: HashMap::new(),
            by_participant: HashMap::new(),
        }
    }

    fn print_summary(&self, timeline: &EventTimeline) {
        println!("\n=== PLAN SUMMARY ===");
        println!("Directives issued: {}", self.directives);
        println!("Time covered: {:.1}s", self.watched.as_secs_f64());

        let mut reasons: Vec<_> = self.by_justification.iter().collect();
        reasons.sort_by(|a, b| b.1.cmp(a.1));
        println!("\nBy justification:");
        for (reason, count) in reasons {
            println!("  {}: {}", reason, count);
        }

        let mut people: Vec<_> = self.by_participant.iter().collect();
        people.sort_by(|a, b| b.1.cmp(a.1).then(a.0.cmp(b.0)));
        println!("\nMost watched:");
        for (id, count) in people.iter().take(5) {
            let name = timeline
                .participant(**id)
                .map(|p| p.name.as_str())
                .unwrap_or("?");
            println!("  {} {}: {} times", id, name, count);
        }
    }
}

fn secs(s: f64) -> Duration {
    Duration::from_secs_f64(s)
}

fn scripted_match() -> Result<EventTimeline, Box<dyn std::error::Error>> {
    let p = ParticipantId;

    let mut builder = EventTimeline::builder()
        .participant(Participant::new(0, "Alice", Team::Blue).with_hero("Muradin"))
        .participant(Participant::new(1, "Bruno", Team::Blue).with_hero("Jaina"))
        .participant(Participant::new(2, "Chen", Team::Blue).with_hero("Abathur"))
        .participant(Participant::new(5, "Dana", Team::Red).with_hero("Zeratul"))
        .participant(Participant::new(6, "Eli", Team::Red).with_hero("Raynor"))
        .participant(Participant::new(7, "Fay", Team::Red))
        .duration(secs(120.0));

    builder.push(Event::Taunt { actor: p(5), timestamp: secs(6.0) });
    builder.push(Event::ObjectiveCapture {
        actor: p(1),
        objective: ObjectiveKind::Camp,
        timestamp: secs(18.0),
    });
    builder.push(Event::Proximity { actor: p(0), timestamp: secs(31.0) });
    builder.push(Event::Death {
        victim: p(5),
        killed_by: Some(p(0)),
        timestamp: secs(38.0),
    });
    builder.push(Event::Death {
        victim: p(6),
        killed_by: Some(p(0)),
        timestamp: secs(40.5),
    });
    builder.push(Event::Kill { killer: p(7), victim: p(2), timestamp: secs(41.0) });
    builder.push(Event::Death {
        victim: p(7),
        killed_by: Some(p(1)),
        timestamp: secs(44.0),
    });
    builder.push(Event::StructureDestroyed {
        destroyed_by: Some(p(0)),
        controller: None,
        timestamp: secs(60.0),
    });
    builder.push(Event::Respawn { actor: p(5), timestamp: secs(70.0) });
    builder.push(Event::ObjectiveCapture {
        actor: p(5),
        objective: ObjectiveKind::Boss,
        timestamp: secs(85.0),
    });
    builder.push(Event::CorePresence {
        actor: p(0),
        core: Team::Red,
        timestamp: secs(101.0),
    });

    Ok(builder.build()?)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let mut start = Duration::ZERO;
    let mut pings = false;
    let mut verbose = false;

    // Parse arguments
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--start" => {
                i += 1;
                if i < args.len() {
                    start = secs(args[i].parse()?);
                }
            }
            "--pings" => {
                pings = true;
            }
            "--verbose" | "-v" => {
                verbose = true;
            }
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
            }
        }
        i += 1;
    }

    let timeline = scripted_match()?;
    let heroes = HeroTable::standard();
    let config = SelectorConfig::new().with_pings(pings);

    println!("=== Replay Spectator ===");
    println!("Participants: {}", timeline.participants().len());
    println!("Events: {}", timeline.events().len());
    println!("Match length: {:.1}s", timeline.duration().as_secs_f64());
    println!("Start: {:.1}s", start.as_secs_f64());
    println!();

    let director = Director::new(&timeline, &heroes, config)?;
    let mut stats = PlanStats::new();

    println!("=== DIRECTIVES ===\n");
    for directive in director.stream(start) {
        let directive = directive?;

        stats.directives += 1;
        stats.watched += directive.hold_duration;
        *stats.by_justification.entry(directive.justification).or_insert(0) += 1;
        *stats.by_participant.entry(directive.participant).or_insert(0) += 1;

        let name = timeline
            .participant(directive.participant)
            .map(|p| p.name.as_str())
            .unwrap_or("?");
        println!(
            "[{:>6.1}s] {} {:<8} {:<14} hold {:.1}s",
            directive.at.as_secs_f64(),
            directive.participant,
            name,
            directive.justification.to_string(),
            directive.hold_duration.as_secs_f64()
        );

        if verbose {
            if let Some(selection) = director.select_at(directive.at)? {
                println!(
                    "    └─ tier #{} over {}, event at {:.1}s",
                    selection.tier_index,
                    selection.window,
                    selection.candidate.occurs_at.as_secs_f64()
                );
            }
        }
    }

    stats.print_summary(&timeline);

    Ok(())
}
