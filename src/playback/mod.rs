pub mod controller;
pub mod engine;

pub use controller::PlaybackController;
pub use engine::{PlaybackEngine, TickOutcome};

use crate::core::RoutePoint;
use crate::metrics::DerivedMetrics;
use serde::Serialize;
use std::time::Duration;

/// Default cadence of auto-advance
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(1000);

/// Playback state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PlaybackState {
    /// Nothing played yet; behaves like Paused
    Idle,
    Playing,
    Paused,
}

/// Playback configuration
#[derive(Debug, Clone)]
pub struct PlaybackConfig {
    /// Time between two cursor advances while playing
    pub tick_interval: Duration,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            tick_interval: DEFAULT_TICK_INTERVAL,
        }
    }
}

/// Cursor and running flag as seen by the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlaybackSnapshot {
    pub cursor: usize,
    pub is_playing: bool,
}

/// Everything a view needs to draw the current playback position
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frame {
    pub snapshot: PlaybackSnapshot,
    pub is_at_end: bool,
    pub route_len: usize,
    pub point: Option<RoutePoint>,
    pub metrics: DerivedMetrics,
}
