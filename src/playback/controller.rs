use crate::core::RoutePoint;
use crate::metrics::DerivedMetrics;
use crate::playback::{Frame, PlaybackConfig, PlaybackEngine, PlaybackSnapshot, TickOutcome};
use std::sync::Arc;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::debug;

/// Drives a [`PlaybackEngine`] on a timer and publishes frames to subscribers
///
/// At most one tick task is alive at a time. Every command that leaves the
/// Playing state aborts it before touching the engine.
pub struct PlaybackController {
    engine: Arc<Mutex<PlaybackEngine>>,
    config: PlaybackConfig,
    /// Handle of the running tick task
    timer: Option<JoinHandle<()>>,
    frames: Arc<watch::Sender<Frame>>,
}

impl PlaybackController {
    pub fn new(config: PlaybackConfig) -> Self {
        let engine = PlaybackEngine::default();
        let (frames, _) = watch::channel(engine.frame());

        Self {
            engine: Arc::new(Mutex::new(engine)),
            config,
            timer: None,
            frames: Arc::new(frames),
        }
    }

    pub fn config(&self) -> &PlaybackConfig {
        &self.config
    }

    /// Subscribe to frame updates
    pub fn subscribe(&self) -> watch::Receiver<Frame> {
        self.frames.subscribe()
    }

    /// Install a new route, cancelling playback of the old one
    pub async fn load_route(&mut self, route: impl Into<Arc<[RoutePoint]>>) {
        self.cancel_timer();
        let mut engine = self.engine.lock().await;
        engine.load_route(route);
        debug!("Loaded route with {} points", engine.route().len());
        self.frames.send_replace(engine.frame());
    }

    /// Start/resume playback
    ///
    /// Returns false when nothing changed: empty route, already at the end,
    /// or already playing.
    pub async fn play(&mut self) -> bool {
        let mut engine = self.engine.lock().await;
        if !engine.play() {
            return false;
        }
        let epoch = engine.epoch();
        debug!("Playing from cursor {} (epoch {})", engine.cursor(), epoch);
        self.frames.send_replace(engine.frame());
        drop(engine);

        self.cancel_timer();
        self.timer = Some(self.spawn_timer(epoch));
        true
    }

    /// Pause playback
    pub async fn pause(&mut self) {
        self.cancel_timer();
        let mut engine = self.engine.lock().await;
        engine.pause();
        debug!("Paused at cursor {}", engine.cursor());
        self.frames.send_replace(engine.frame());
    }

    /// Pause and rewind to the first point
    pub async fn reset(&mut self) {
        self.cancel_timer();
        let mut engine = self.engine.lock().await;
        engine.reset();
        debug!("Reset");
        self.frames.send_replace(engine.frame());
    }

    /// Jump to a point, clamped into the route; always pauses
    pub async fn seek(&mut self, index: i64) {
        self.cancel_timer();
        let mut engine = self.engine.lock().await;
        engine.seek(index);
        debug!("Seek to {} -> cursor {}", index, engine.cursor());
        self.frames.send_replace(engine.frame());
    }

    pub async fn snapshot(&self) -> PlaybackSnapshot {
        self.engine.lock().await.snapshot()
    }

    pub async fn metrics(&self) -> DerivedMetrics {
        self.engine.lock().await.metrics()
    }

    pub async fn is_at_end(&self) -> bool {
        self.engine.lock().await.is_at_end()
    }

    pub async fn frame(&self) -> Frame {
        self.engine.lock().await.frame()
    }

    /// Whether a tick task is still alive
    pub fn has_timer(&self) -> bool {
        self.timer.as_ref().is_some_and(|t| !t.is_finished())
    }

    fn cancel_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }

    fn spawn_timer(&self, epoch: u64) -> JoinHandle<()> {
        let engine = self.engine.clone();
        let frames = self.frames.clone();
        let period = self.config.tick_interval;

        tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                let mut engine = engine.lock().await;
                match engine.tick_for(epoch) {
                    TickOutcome::Advanced => {
                        frames.send_replace(engine.frame());
                    }
                    TickOutcome::Finished => {
                        debug!("Reached end of route at cursor {}", engine.cursor());
                        frames.send_replace(engine.frame());
                        break;
                    }
                    TickOutcome::Ignored => break,
                }
            }
        })
    }
}

impl Default for PlaybackController {
    fn default() -> Self {
        Self::new(PlaybackConfig::default())
    }
}

impl Drop for PlaybackController {
    fn drop(&mut self) {
        self.cancel_timer();
    }
}
