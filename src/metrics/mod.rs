pub mod display;

pub use display::DisplayMetrics;

use crate::core::{haversine_m, RoutePoint};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Speed above which the vehicle counts as moving (km/h)
///
/// Below this, speed is treated as GPS jitter at a stationary point.
pub const RUNNING_THRESHOLD_KMH: f64 = 1.0;

/// Motion status derived from the current speed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MotionStatus {
    Running,
    Stopped,
}

impl MotionStatus {
    pub fn from_speed(speed_kmh: f64) -> Self {
        if speed_kmh > RUNNING_THRESHOLD_KMH {
            MotionStatus::Running
        } else {
            MotionStatus::Stopped
        }
    }
}

impl fmt::Display for MotionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MotionStatus::Running => write!(f, "RUNNING"),
            MotionStatus::Stopped => write!(f, "STOPPED"),
        }
    }
}

/// Stats derived from a route and a cursor position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DerivedMetrics {
    pub speed_kmh: f64,
    pub total_distance_km: f64,
    pub last_leg_distance_km: f64,
    pub status: MotionStatus,
}

impl Default for DerivedMetrics {
    fn default() -> Self {
        Self {
            speed_kmh: 0.0,
            total_distance_km: 0.0,
            last_leg_distance_km: 0.0,
            status: MotionStatus::Stopped,
        }
    }
}

impl DerivedMetrics {
    /// Compute metrics for the point at `cursor`
    ///
    /// A cursor past the end is clamped to the last point. Timestamps that
    /// are equal, decreasing or unparseable give a speed of zero.
    pub fn compute(route: &[RoutePoint], cursor: usize) -> Self {
        if route.len() < 2 {
            return Self::default();
        }
        let cursor = cursor.min(route.len() - 1);
        if cursor == 0 {
            return Self::default();
        }

        let prev = &route[cursor - 1];
        let curr = &route[cursor];
        let leg_m = haversine_m(prev, curr);

        let speed_kmh = match elapsed_secs(prev, curr) {
            Some(dt) if dt > 0.0 => leg_m / dt * 3.6,
            _ => 0.0,
        };

        let total_m: f64 = route[..=cursor]
            .windows(2)
            .map(|pair| haversine_m(&pair[0], &pair[1]))
            .sum();

        Self {
            speed_kmh,
            total_distance_km: total_m / 1000.0,
            last_leg_distance_km: leg_m / 1000.0,
            status: MotionStatus::from_speed(speed_kmh),
        }
    }

    /// Values rounded for display
    pub fn display(&self) -> DisplayMetrics {
        DisplayMetrics::from(self)
    }
}

/// Seconds between two fixes, None if either timestamp is malformed
fn elapsed_secs(prev: &RoutePoint, curr: &RoutePoint) -> Option<f64> {
    let t1 = prev.timestamp_millis()?;
    let t2 = curr.timestamp_millis()?;
    Some((t2 - t1) as f64 / 1000.0)
}
