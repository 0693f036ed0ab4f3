//! Replay Spectator CLI Application
//!
//! Command-line front end for the replay-spectator library. It adds:
//! - JSON match timeline loading
//! - TOML configuration (selector windows, output, hero roster overrides)
//! - Directive plans, per-tier explanations and parallel sweeps
//! - Report generation (TXT/JSON)

use anyhow::{Context, Result};
use clap::Parser;
use rayon::prelude::*;
use replay_spectator::{Director, EventTimeline, Timestamp};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::time::Duration;

mod config;
mod report;
mod timeline_file;

use config::{AppConfig, OutputFormat};
use report::{ExplainReport, PlanReport, SweepReport};

/// Replay Spectator - Decide who the replay camera should follow
#[derive(Parser, Debug)]
#[command(name = "replay-spectator")]
#[command(about = "Plan camera targets for a recorded match", long_about = None)]
#[command(version)]
struct Args {
    /// Path to the match timeline (JSON)
    #[arg(short, long, value_name = "FILE")]
    timeline: PathBuf,

    /// Path to configuration file (config.toml)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Playback time to start planning from, in seconds
    #[arg(long, value_name = "SECS", default_value_t = 0.0)]
    start: f64,

    /// Explain the selection at a single playback time instead of planning
    #[arg(long, value_name = "SECS", conflicts_with = "sweep_every")]
    at: Option<f64>,

    /// Sample the selection every SECS seconds (in parallel) instead of planning
    #[arg(long, value_name = "SECS")]
    sweep_every: Option<f64>,

    /// Include the ping tier
    #[arg(long)]
    pings: bool,

    /// Output format (overrides config)
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Output file (default: stdout, overrides config)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Verbosity level (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging
    init_logging(args.verbose, args.quiet);

    log::info!("Replay Spectator CLI v{}", env!("CARGO_PKG_VERSION"));
    log::info!("Using spectator library v{}", replay_spectator::VERSION);

    let mut config = match &args.config {
        Some(path) => {
            log::info!("Loading configuration from: {:?}", path);
            config::load_config(path)?
        }
        None => AppConfig::default(),
    };
    apply_overrides(&mut config, &args);

    let timeline = timeline_file::load_timeline(&args.timeline)?;
    let heroes = config.roster.hero_table();
    let director = Director::new(&timeline, &heroes, config.selector.clone())?;

    let mut out = open_output(&config)?;
    let format = config.output.format;

    if let Some(at) = args.at {
        explain_mode(&director, &timeline, seconds("--at", at)?, format, &mut out)?;
    } else if let Some(interval) = args.sweep_every {
        let start = seconds("--start", args.start)?;
        let interval = seconds("--sweep-every", interval)?;
        sweep_mode(&director, &timeline, start, interval, format, &mut out)?;
    } else {
        plan_mode(&director, &timeline, seconds("--start", args.start)?, format, &mut out)?;
    }

    out.flush()?;
    Ok(())
}

/// Command-line flags take precedence over the config file
fn apply_overrides(config: &mut AppConfig, args: &Args) {
    if args.pings {
        config.selector.include_pings = true;
    }
    if let Some(format) = args.format {
        config.output.format = format;
    }
    if let Some(path) = &args.output {
        config.output.path = Some(path.clone());
    }
}

fn seconds(flag: &str, value: f64) -> Result<Timestamp> {
    if !value.is_finite() || value < 0.0 {
        anyhow::bail!("{} must be a non-negative number of seconds, got {}", flag, value);
    }
    Duration::try_from_secs_f64(value).with_context(|| format!("{} is out of range", flag))
}

fn open_output(config: &AppConfig) -> Result<Box<dyn Write>> {
    match &config.output.path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {:?}", path))?;
            log::info!("Writing report to {:?}", path);
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(io::stdout().lock())),
    }
}

/// Plan mode - run the director over the whole match
fn plan_mode(
    director: &Director<'_>,
    timeline: &EventTimeline,
    start: Timestamp,
    format: OutputFormat,
    out: &mut dyn Write,
) -> Result<()> {
    let directives = director.plan(start)?;
    log::info!("Planned {} directives", directives.len());

    let report = PlanReport::build(timeline, start, &directives);
    match format {
        OutputFormat::Txt => report.write_txt(out),
        OutputFormat::Json => report.write_json(out),
    }
}

/// Explain mode - show every tier's candidates at one playback time
fn explain_mode(
    director: &Director<'_>,
    timeline: &EventTimeline,
    at: Timestamp,
    format: OutputFormat,
    out: &mut dyn Write,
) -> Result<()> {
    let evaluations = director
        .resolver()
        .resolve_tiers(timeline, director.hero_cache(), at)?;

    let report = ExplainReport::build(timeline, at, &evaluations);
    match format {
        OutputFormat::Txt => report.write_txt(out),
        OutputFormat::Json => report.write_json(out),
    }
}

/// Sweep mode - sample selections at fixed intervals, in parallel
fn sweep_mode(
    director: &Director<'_>,
    timeline: &EventTimeline,
    start: Timestamp,
    interval: Timestamp,
    format: OutputFormat,
    out: &mut dyn Write,
) -> Result<()> {
    let times = sweep_times(start, interval, timeline.duration())?;
    log::info!("Probing {} playback times", times.len());

    let samples = times
        .par_iter()
        .map(|&at| director.select_at(at).map(|selection| (at, selection)))
        .collect::<replay_spectator::Result<Vec<_>>>()?;

    let report = SweepReport::build(timeline, interval, &samples);
    match format {
        OutputFormat::Txt => report.write_txt(out),
        OutputFormat::Json => report.write_json(out),
    }
}

/// Playback times `start, start + interval, ...` strictly before `end`
fn sweep_times(start: Timestamp, interval: Timestamp, end: Timestamp) -> Result<Vec<Timestamp>> {
    if interval.is_zero() {
        anyhow::bail!("--sweep-every must be greater than zero");
    }

    let mut times = Vec::new();
    let mut at = Some(start);
    while let Some(now) = at.filter(|now| *now < end) {
        times.push(now);
        at = now.checked_add(interval);
    }
    Ok(times)
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: u8, quiet: bool) {
    use env_logger::Builder;
    use log::LevelFilter;

    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    Builder::new()
        .filter_level(level)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use replay_spectator::{HeroTable, SelectorConfig};

    fn secs(s: u64) -> Timestamp {
        Duration::from_secs(s)
    }

    fn skirmish() -> EventTimeline {
        timeline_file::parse_timeline(
            r#"{
                "duration_secs": 20.0,
                "participants": [
                    {"id": 0, "name": "A", "team": "blue", "hero": "Muradin"},
                    {"id": 5, "name": "B", "team": "red", "hero": "Jaina"}
                ],
                "events": [
                    {"type": "kill", "killer": 0, "victim": 5, "at": 12.0}
                ]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_sweep_times_stop_before_match_end() {
        let times = sweep_times(secs(0), secs(5), secs(20)).unwrap();
        assert_eq!(times, vec![secs(0), secs(5), secs(10), secs(15)]);

        let times = sweep_times(secs(3), secs(5), secs(20)).unwrap();
        assert_eq!(times, vec![secs(3), secs(8), secs(13), secs(18)]);
    }

    #[test]
    fn test_sweep_times_empty_when_start_is_past_the_end() {
        assert!(sweep_times(secs(20), secs(5), secs(20)).unwrap().is_empty());
        assert!(sweep_times(secs(30), secs(5), secs(20)).unwrap().is_empty());
    }

    #[test]
    fn test_sweep_times_rejects_zero_interval() {
        assert!(sweep_times(secs(0), Duration::ZERO, secs(20)).is_err());
    }

    #[test]
    fn test_sweep_mode_samples_the_grid() {
        let timeline = skirmish();
        let heroes = HeroTable::standard();
        let director = Director::new(&timeline, &heroes, SelectorConfig::default()).unwrap();

        let mut out: Vec<u8> = Vec::new();
        sweep_mode(&director, &timeline, secs(0), secs(5), OutputFormat::Json, &mut out).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        let samples = value["samples"].as_array().unwrap();
        assert_eq!(samples.len(), 4);
        assert_eq!(samples[0]["at_secs"], 0.0);
        assert_eq!(samples[3]["at_secs"], 15.0);
        // The kill at 12s is inside the 10s kill window from 5s on
        assert_eq!(samples[1]["tier"], "kill");
        assert_eq!(samples[1]["participant"], 0);

        let mut out: Vec<u8> = Vec::new();
        let result = sweep_mode(
            &director,
            &timeline,
            secs(0),
            Duration::ZERO,
            OutputFormat::Txt,
            &mut out,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_explain_mode_marks_the_winning_tier() {
        let timeline = skirmish();
        let heroes = HeroTable::standard();
        let director = Director::new(&timeline, &heroes, SelectorConfig::default()).unwrap();

        let mut out: Vec<u8> = Vec::new();
        explain_mode(&director, &timeline, secs(5), OutputFormat::Json, &mut out).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        let tiers = value["tiers"].as_array().unwrap();
        assert_eq!(tiers.len(), director.resolver().catalogue().len());

        let winner = value["winner"].as_u64().unwrap() as usize;
        assert_eq!(tiers[winner]["tier"], "kill");
        assert_eq!(tiers[winner]["candidates"][0]["name"], "A");

        let mut out: Vec<u8> = Vec::new();
        explain_mode(&director, &timeline, secs(5), OutputFormat::Txt, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("Selection at 00:05.0"));
    }

    #[test]
    fn test_seconds_rejects_negative_and_non_finite() {
        assert_eq!(seconds("--at", 1.5).unwrap(), Duration::from_millis(1500));
        assert!(seconds("--at", -1.0).is_err());
        assert!(seconds("--at", f64::NAN).is_err());
        assert!(seconds("--at", f64::INFINITY).is_err());
    }

    #[test]
    fn test_flags_override_config() {
        let args = Args::parse_from([
            "replay-spectator",
            "--timeline",
            "match.json",
            "--pings",
            "--format",
            "json",
            "--output",
            "plan.json",
        ]);
        let mut config = AppConfig::default();
        apply_overrides(&mut config, &args);

        assert!(config.selector.include_pings);
        assert_eq!(config.output.format, OutputFormat::Json);
        assert_eq!(config.output.path, Some(PathBuf::from("plan.json")));
    }

    #[test]
    fn test_at_conflicts_with_sweep_every() {
        let result = Args::try_parse_from([
            "replay-spectator",
            "--timeline",
            "match.json",
            "--at",
            "10",
            "--sweep-every",
            "5",
        ]);
        assert!(result.is_err());
    }
}
