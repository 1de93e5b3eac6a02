use crate::metrics::{DerivedMetrics, MotionStatus};
use serde::Serialize;
use std::fmt;

/// Metrics rounded the way the info panel shows them
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DisplayMetrics {
    /// Speed rounded to the nearest km/h
    pub speed_kmh: i64,
    /// Distances rounded to two decimals
    pub total_distance_km: f64,
    pub last_leg_distance_km: f64,
    pub status: MotionStatus,
}

impl From<&DerivedMetrics> for DisplayMetrics {
    fn from(m: &DerivedMetrics) -> Self {
        Self {
            speed_kmh: m.speed_kmh.round() as i64,
            total_distance_km: round_to(m.total_distance_km, 2),
            last_leg_distance_km: round_to(m.last_leg_distance_km, 2),
            status: m.status,
        }
    }
}

impl fmt::Display for DisplayMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} km/h | total {:.2} km | last leg {:.2} km | {}",
            self.speed_kmh, self.total_distance_km, self.last_leg_distance_km, self.status
        )
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rounding() {
        let m = DerivedMetrics {
            speed_kmh: 53.5,
            total_distance_km: 834.8949,
            last_leg_distance_km: 0.0061,
            status: MotionStatus::Running,
        };
        let d = m.display();
        assert_eq!(d.speed_kmh, 54);
        assert_eq!(d.total_distance_km, 834.89);
        assert_eq!(d.last_leg_distance_km, 0.01);
    }

    #[test]
    fn test_display_line() {
        let d = DerivedMetrics::default().display();
        assert_eq!(d.to_string(), "0 km/h | total 0.00 km | last leg 0.00 km | STOPPED");
    }
}
