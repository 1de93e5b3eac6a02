use crate::core::RoutePoint;
use crate::metrics::DerivedMetrics;
use crate::playback::{Frame, PlaybackSnapshot, PlaybackState};
use std::sync::Arc;

/// Result of one auto-advance tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Cursor moved forward, still playing
    Advanced,
    /// Cursor reached the last point and playback paused
    Finished,
    /// Not playing, or the tick belonged to a superseded timer
    Ignored,
}

/// Cursor state machine over a fixed route
///
/// Every transition bumps `epoch`, so a timer started under an older epoch
/// can tell its ticks are stale.
#[derive(Debug)]
pub struct PlaybackEngine {
    route: Arc<[RoutePoint]>,
    state: PlaybackState,
    cursor: usize,
    epoch: u64,
}

impl Default for PlaybackEngine {
    fn default() -> Self {
        Self::new(Vec::<RoutePoint>::new())
    }
}

impl PlaybackEngine {
    pub fn new(route: impl Into<Arc<[RoutePoint]>>) -> Self {
        Self {
            route: route.into(),
            state: PlaybackState::Idle,
            cursor: 0,
            epoch: 0,
        }
    }

    /// Get current cursor (index into route)
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Get current playback state
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn route(&self) -> &Arc<[RoutePoint]> {
        &self.route
    }

    /// Check if currently playing
    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    /// True when the cursor sits on the last point, or the route is empty
    pub fn is_at_end(&self) -> bool {
        self.cursor + 1 >= self.route.len()
    }

    fn last_index(&self) -> usize {
        self.route.len().saturating_sub(1)
    }

    fn transition(&mut self, state: PlaybackState) {
        self.state = state;
        self.epoch = self.epoch.wrapping_add(1);
    }

    /// Replace the route; the old cursor refers to stale data
    pub fn load_route(&mut self, route: impl Into<Arc<[RoutePoint]>>) {
        self.route = route.into();
        self.cursor = 0;
        self.transition(PlaybackState::Paused);
    }

    /// Start playback, returning true if the state changed to Playing
    ///
    /// No-op on an empty route, at the last point, or when already playing.
    pub fn play(&mut self) -> bool {
        if self.route.is_empty() || self.is_at_end() || self.is_playing() {
            return false;
        }
        self.transition(PlaybackState::Playing);
        true
    }

    /// Pause playback
    pub fn pause(&mut self) {
        self.transition(PlaybackState::Paused);
    }

    /// Pause and rewind to the first point
    pub fn reset(&mut self) {
        self.cursor = 0;
        self.transition(PlaybackState::Paused);
    }

    /// Jump to `index`, clamped into the route, and pause
    pub fn seek(&mut self, index: i64) {
        let last = self.last_index() as i64;
        self.cursor = index.clamp(0, last) as usize;
        self.transition(PlaybackState::Paused);
    }

    /// Advance one step if playing
    pub fn tick(&mut self) -> TickOutcome {
        if self.state != PlaybackState::Playing {
            return TickOutcome::Ignored;
        }

        if self.cursor < self.last_index() {
            self.cursor += 1;
        }

        if self.is_at_end() {
            self.transition(PlaybackState::Paused);
            TickOutcome::Finished
        } else {
            TickOutcome::Advanced
        }
    }

    /// Advance one step on behalf of the timer started under `epoch`
    pub fn tick_for(&mut self, epoch: u64) -> TickOutcome {
        if epoch != self.epoch {
            return TickOutcome::Ignored;
        }
        self.tick()
    }

    pub fn snapshot(&self) -> PlaybackSnapshot {
        PlaybackSnapshot {
            cursor: self.cursor,
            is_playing: self.is_playing(),
        }
    }

    /// Get the point under the cursor
    pub fn current_point(&self) -> Option<&RoutePoint> {
        self.route.get(self.cursor)
    }

    pub fn metrics(&self) -> DerivedMetrics {
        DerivedMetrics::compute(&self.route, self.cursor)
    }

    pub fn frame(&self) -> Frame {
        Frame {
            snapshot: self.snapshot(),
            is_at_end: self.is_at_end(),
            route_len: self.route.len(),
            point: self.current_point().cloned(),
            metrics: self.metrics(),
        }
    }
}
