//! Selector configuration types
//!
//! Window lengths and grace periods for the tier catalogue. All durations are
//! stored in milliseconds so the configuration round-trips cleanly through
//! TOML/JSON; accessors return [`Duration`].

use crate::types::{Result, SpectatorError};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Upper bound for every configured duration: one day
pub const MAX_DURATION_MS: u64 = 86_400_000;

/// Configuration for the priority resolver and the target stream driver
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectorConfig {
    /// Time allowed between kills of one streak (default: 12000ms)
    ///
    /// An n-kill tier looks `(n - 1)` timers ahead.
    #[serde(default = "default_kill_streak_timer")]
    pub kill_streak_timer_ms: u64,

    /// Lookahead of the single-kill tier (default: 10000ms)
    #[serde(default = "default_kill_window")]
    pub kill_window_ms: u64,

    /// Lookahead of the death and objective tiers (default: 10000ms)
    #[serde(default = "default_event_window")]
    pub event_window_ms: u64,

    /// Lookahead of the unit, taunt, structure, proximity, ping and alive
    /// tiers (default: 5000ms)
    #[serde(default = "default_activity_window")]
    pub activity_window_ms: u64,

    /// Half-width of the killer-of-interest window (default: 5000ms)
    #[serde(default = "default_killer_radius")]
    pub killer_radius_ms: u64,

    /// Focus kept after a death when the killer's hero is known (default: 1000ms)
    #[serde(default = "default_short_grace")]
    pub short_grace_ms: u64,

    /// Focus kept after a kill when the killer's hero is unresolved (default: 2000ms)
    #[serde(default = "default_long_grace")]
    pub long_grace_ms: u64,

    /// How long a death keeps a participant out of the alive fallback when no
    /// respawn is recorded (default: 30000ms)
    #[serde(default = "default_respawn_after")]
    pub respawn_after_ms: u64,

    /// Smallest step the driver advances playback by (default: 1000ms)
    #[serde(default = "default_min_step")]
    pub min_step_ms: u64,

    /// Insert a ping tier just above the alive fallback
    #[serde(default)]
    pub include_pings: bool,
}

fn default_kill_streak_timer() -> u64 {
    12_000
}

fn default_kill_window() -> u64 {
    10_000
}

fn default_event_window() -> u64 {
    10_000
}

fn default_activity_window() -> u64 {
    5_000
}

fn default_killer_radius() -> u64 {
    5_000
}

fn default_short_grace() -> u64 {
    1_000
}

fn default_long_grace() -> u64 {
    2_000
}

fn default_respawn_after() -> u64 {
    30_000
}

fn default_min_step() -> u64 {
    1_000
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            kill_streak_timer_ms: default_kill_streak_timer(),
            kill_window_ms: default_kill_window(),
            event_window_ms: default_event_window(),
            activity_window_ms: default_activity_window(),
            killer_radius_ms: default_killer_radius(),
            short_grace_ms: default_short_grace(),
            long_grace_ms: default_long_grace(),
            respawn_after_ms: default_respawn_after(),
            min_step_ms: default_min_step(),
            include_pings: false,
        }
    }
}

impl SelectorConfig {
    /// Create a new selector configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: set the kill-streak timer
    pub fn with_kill_streak_timer(mut self, timer: Duration) -> Self {
        self.kill_streak_timer_ms = timer.as_millis() as u64;
        self
    }

    /// Builder method: set the single-kill lookahead
    pub fn with_kill_window(mut self, window: Duration) -> Self {
        self.kill_window_ms = window.as_millis() as u64;
        self
    }

    /// Builder method: set the death/objective lookahead
    pub fn with_event_window(mut self, window: Duration) -> Self {
        self.event_window_ms = window.as_millis() as u64;
        self
    }

    /// Builder method: set the activity lookahead
    pub fn with_activity_window(mut self, window: Duration) -> Self {
        self.activity_window_ms = window.as_millis() as u64;
        self
    }

    /// Builder method: set the killer-of-interest half-width
    pub fn with_killer_radius(mut self, radius: Duration) -> Self {
        self.killer_radius_ms = radius.as_millis() as u64;
        self
    }

    /// Builder method: set both grace periods
    pub fn with_grace(mut self, short: Duration, long: Duration) -> Self {
        self.short_grace_ms = short.as_millis() as u64;
        self.long_grace_ms = long.as_millis() as u64;
        self
    }

    /// Builder method: set the fallback respawn delay
    pub fn with_respawn_after(mut self, delay: Duration) -> Self {
        self.respawn_after_ms = delay.as_millis() as u64;
        self
    }

    /// Builder method: set the driver's minimum step
    pub fn with_min_step(mut self, step: Duration) -> Self {
        self.min_step_ms = step.as_millis() as u64;
        self
    }

    /// Builder method: enable the ping tier
    pub fn with_pings(mut self, enabled: bool) -> Self {
        self.include_pings = enabled;
        self
    }

    pub fn kill_streak_timer(&self) -> Duration {
        Duration::from_millis(self.kill_streak_timer_ms)
    }

    pub fn kill_window(&self) -> Duration {
        Duration::from_millis(self.kill_window_ms)
    }

    pub fn event_window(&self) -> Duration {
        Duration::from_millis(self.event_window_ms)
    }

    pub fn activity_window(&self) -> Duration {
        Duration::from_millis(self.activity_window_ms)
    }

    pub fn killer_radius(&self) -> Duration {
        Duration::from_millis(self.killer_radius_ms)
    }

    pub fn short_grace(&self) -> Duration {
        Duration::from_millis(self.short_grace_ms)
    }

    pub fn long_grace(&self) -> Duration {
        Duration::from_millis(self.long_grace_ms)
    }

    pub fn respawn_after(&self) -> Duration {
        Duration::from_millis(self.respawn_after_ms)
    }

    pub fn min_step(&self) -> Duration {
        Duration::from_millis(self.min_step_ms)
    }

    /// Lookahead for a kill tier of the given multiplicity
    ///
    /// A single kill uses the kill window; an n-kill streak gets `n - 1`
    /// streak timers so the last kill of a maximal streak still lands inside.
    pub fn streak_window(&self, kills: usize) -> Duration {
        match kills {
            0 | 1 => self.kill_window(),
            n => u32::try_from(n - 1)
                .ok()
                .and_then(|steps| self.kill_streak_timer().checked_mul(steps))
                .unwrap_or(Duration::MAX),
        }
    }

    /// Check that every window and the driver step are non-zero, and that no
    /// duration exceeds [`MAX_DURATION_MS`]
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("kill_streak_timer_ms", self.kill_streak_timer_ms),
            ("kill_window_ms", self.kill_window_ms),
            ("event_window_ms", self.event_window_ms),
            ("activity_window_ms", self.activity_window_ms),
            ("killer_radius_ms", self.killer_radius_ms),
            ("respawn_after_ms", self.respawn_after_ms),
            ("min_step_ms", self.min_step_ms),
        ];

        for (name, value) in required {
            if value == 0 {
                return Err(SpectatorError::InvalidConfig(format!(
                    "{} must be greater than zero",
                    name
                )));
            }
        }

        let bounded = required.into_iter().chain([
            ("short_grace_ms", self.short_grace_ms),
            ("long_grace_ms", self.long_grace_ms),
        ]);

        for (name, value) in bounded {
            if value > MAX_DURATION_MS {
                return Err(SpectatorError::InvalidConfig(format!(
                    "{} must be at most {} ({} given)",
                    name, MAX_DURATION_MS, value
                )));
            }
        }

        Ok(())
    }
}
