//! Target stream driver
//!
//! The [`Director`] owns everything needed to answer "who to watch" over a
//! whole match. [`Director::stream`] hands out a lazy [`TargetStream`] that
//! walks the playback clock forward: each selection is emitted as a
//! [`Directive`] and the clock jumps past its hold; when nothing is selected
//! the clock moves by the minimum step.

use crate::config::SelectorConfig;
use crate::heroes::{HeroCache, HeroLookup};
use crate::resolver::{PriorityResolver, Selection};
use crate::tiers::SpectateEvent;
use crate::timeline::EventTimeline;
use crate::types::{ParticipantId, Result, Timestamp};
use std::time::Duration;

/// One camera instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Directive {
    /// Playback time the directive is issued at
    pub at: Timestamp,
    /// Participant to focus
    pub participant: ParticipantId,
    /// Why this participant was chosen
    pub justification: SpectateEvent,
    /// When the justifying event happens
    pub occurs_at: Timestamp,
    /// How long to keep the focus; never shorter than the minimum step
    pub hold_duration: Duration,
}

impl Directive {
    /// Playback time at which the next directive may be issued
    pub fn next_at(&self) -> Timestamp {
        self.at + self.hold_duration
    }
}

/// Selection driver for one match
pub struct Director<'a> {
    timeline: &'a EventTimeline,
    heroes: &'a dyn HeroLookup,
    cache: HeroCache,
    resolver: PriorityResolver,
}

impl<'a> Director<'a> {
    /// Create a director, resolving every participant's hero up front
    pub fn new(
        timeline: &'a EventTimeline,
        heroes: &'a dyn HeroLookup,
        config: SelectorConfig,
    ) -> Result<Self> {
        let resolver = PriorityResolver::new(config)?;
        let cache = HeroCache::build(timeline.participants(), heroes);

        log::info!(
            "Director ready: {} participants ({} heroes resolved), {} tiers, match length {:.1}s",
            timeline.participants().len(),
            cache.len(),
            resolver.catalogue().len(),
            timeline.duration().as_secs_f64()
        );

        Ok(Self {
            timeline,
            heroes,
            cache,
            resolver,
        })
    }

    pub fn timeline(&self) -> &'a EventTimeline {
        self.timeline
    }

    pub fn resolver(&self) -> &PriorityResolver {
        &self.resolver
    }

    pub fn hero_cache(&self) -> &HeroCache {
        &self.cache
    }

    /// Single resolver call at playback time `now`
    pub fn select_at(&self, now: Timestamp) -> Result<Option<Selection>> {
        self.resolver.resolve(self.timeline, &self.cache, now)
    }

    /// Lazy directive sequence starting at `start`
    pub fn stream(&self, start: Timestamp) -> TargetStream<'_, 'a> {
        TargetStream {
            director: self,
            cursor: start,
            pending: Duration::ZERO,
            state: StreamState::AwaitingSelection,
        }
    }

    /// Collect the whole directive sequence starting at `start`
    pub fn plan(&self, start: Timestamp) -> Result<Vec<Directive>> {
        self.stream(start).collect()
    }

    /// Resolve still-unknown heroes against a newer `lookup`
    ///
    /// Heroes already in the cache keep their classification. Returns how
    /// many participants resolved now.
    pub fn refresh_heroes(&mut self, lookup: &dyn HeroLookup) -> usize {
        let added = self.cache.refresh(self.timeline.participants(), lookup);
        if added > 0 {
            log::info!("Late hero resolution: {} more participants resolved", added);
        }
        added
    }

    /// Forget late resolutions and resolve the roster against the original lookup
    pub fn reset(&mut self) {
        self.cache = HeroCache::build(self.timeline.participants(), self.heroes);
        log::debug!("Hero cache rebuilt: {} resolved", self.cache.len());
    }
}

/// Where a [`TargetStream`] is in its cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamState {
    /// The next pull resolves at the cursor
    AwaitingSelection,
    /// A directive was handed out; the next pull first moves past its hold
    Emitting,
    /// The cursor reached the end of the match, or resolution failed
    Done,
}

/// Lazy, finite sequence of directives
///
/// Not restartable: ask the [`Director`] for a new stream instead.
pub struct TargetStream<'d, 'a> {
    director: &'d Director<'a>,
    cursor: Timestamp,
    /// Advance owed by the last emitted directive
    pending: Duration,
    state: StreamState,
}

impl<'d, 'a> TargetStream<'d, 'a> {
    /// Current playback time
    pub fn cursor(&self) -> Timestamp {
        self.cursor
    }

    pub fn state(&self) -> StreamState {
        self.state
    }

    fn finish(&mut self) {
        self.state = StreamState::Done;
        log::info!("Target stream finished at {:.1}s", self.cursor.as_secs_f64());
    }
}

impl<'d, 'a> Iterator for TargetStream<'d, 'a> {
    type Item = Result<Directive>;

    fn next(&mut self) -> Option<Self::Item> {
        let duration = self.director.timeline.duration();
        let min_step = self.director.resolver.config().min_step();

        loop {
            match self.state {
                StreamState::Done => return None,
                StreamState::Emitting => {
                    self.cursor += self.pending;
                    self.pending = Duration::ZERO;
                    self.state = StreamState::AwaitingSelection;
                }
                StreamState::AwaitingSelection => {
                    if self.cursor >= duration {
                        self.finish();
                        return None;
                    }

                    match self.director.select_at(self.cursor) {
                        Ok(Some(selection)) => {
                            let candidate = selection.candidate;
                            let hold = candidate.hold_duration(self.cursor).max(min_step);

                            self.pending = hold;
                            self.state = StreamState::Emitting;

                            return Some(Ok(Directive {
                                at: self.cursor,
                                participant: candidate.target,
                                justification: candidate.kind,
                                occurs_at: candidate.occurs_at,
                                hold_duration: hold,
                            }));
                        }
                        Ok(None) => self.cursor += min_step,
                        Err(e) => {
                            // No further directives after a failure
                            self.finish();
                            return Some(Err(e));
                        }
                    }
                }
            }
        }
    }
}

impl<'d, 'a> std::iter::FusedIterator for TargetStream<'d, 'a> {}
