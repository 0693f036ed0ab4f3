//! Replay Spectator Library
//!
//! Picks which participant a replay camera should follow, moment by moment,
//! from the recorded event log of a team match.
//!
//! # Architecture
//!
//! The library is a pure function of its inputs:
//! - An immutable [`EventTimeline`] holds participants and time-ordered events
//! - A [`TierCatalogue`] lists priority tiers, each a window shape plus an evaluator
//! - The [`PriorityResolver`] returns the earliest candidate of the first non-empty tier
//! - A [`Director`] turns repeated resolutions into a lazy stream of [`Directive`]s
//!
//! Hero classes only affect kill attribution and are injected through the
//! [`HeroLookup`] trait; [`HeroTable::standard`] ships a built-in roster.
//!
//! The library does NOT:
//! - Parse replay files
//! - Drive a camera or any UI
//! - Read configuration files
//!
//! File formats and reporting live in the application layer (replay-spectator-cli).
//!
//! # Example Usage
//!
//! ```no_run
//! use replay_spectator::{
//!     Director, Event, EventTimeline, HeroTable, Participant, ParticipantId,
//!     SelectorConfig, Team,
//! };
//! use std::time::Duration;
//!
//! let timeline = EventTimeline::builder()
//!     .participant(Participant::new(0, "Alice", Team::Blue).with_hero("Muradin"))
//!     .participant(Participant::new(5, "Bob", Team::Red).with_hero("Raynor"))
//!     .event(Event::Kill {
//!         killer: ParticipantId(0),
//!         victim: ParticipantId(5),
//!         timestamp: Duration::from_secs(30),
//!     })
//!     .duration(Duration::from_secs(120))
//!     .build()
//!     .unwrap();
//!
//! let heroes = HeroTable::standard();
//! let director = Director::new(&timeline, &heroes, SelectorConfig::new()).unwrap();
//!
//! for directive in director.stream(Duration::ZERO) {
//!     match directive {
//!         Ok(d) => println!("{:?}: watch {} ({})", d.at, d.participant, d.justification),
//!         Err(e) => eprintln!("Selection error: {}", e),
//!     }
//! }
//! ```

// Public modules
pub mod config;
pub mod director;
pub mod extract;
pub mod heroes;
pub mod resolver;
pub mod tiers;
pub mod timeline;
pub mod types;

// Re-export main types for convenience
pub use config::SelectorConfig;
pub use director::{Directive, Director, StreamState, TargetStream};
pub use extract::{CoreSide, Extractor, Fatality, KillGroup};
pub use heroes::{Hero, HeroCache, HeroClass, HeroLookup, HeroTable};
pub use resolver::{PriorityResolver, Selection};
pub use tiers::{Candidate, SpectateEvent, Tier, TierCatalogue, TierEvaluation, TierWindow};
pub use timeline::{EventTimeline, TimelineBuilder};
pub use types::{
    AnalysisWindow, Event, EventKind, ObjectiveKind, Participant, ParticipantId, Result,
    SpectatorError, Team, Timestamp,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
