use crate::error::RouteResult;
use crate::metrics::DisplayMetrics;
use crate::playback::{PlaybackConfig, PlaybackController};
use crate::source::{RouteSource, Selection};
use chrono::Local;
use serde::Serialize;
use std::fmt;
use tracing::info;

/// What the info panel shows for the selected vehicle
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VehicleReport {
    pub name: String,
    pub battery: Option<u8>,
    pub metrics: DisplayMetrics,
    /// `lat, lon` of the current point
    pub coordinates: Option<String>,
    /// Local time of the current point
    pub time: Option<String>,
}

impl fmt::Display for VehicleReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.name, self.metrics.status)?;
        if let Some(battery) = self.battery {
            write!(f, " battery {}%", battery)?;
        }
        writeln!(f)?;
        writeln!(f, "  speed:          {} km/h", self.metrics.speed_kmh)?;
        writeln!(f, "  total:          {:.2} km", self.metrics.total_distance_km)?;
        writeln!(f, "  from last stop: {:.2} km", self.metrics.last_leg_distance_km)?;
        writeln!(f, "  coordinates:    {}", self.coordinates.as_deref().unwrap_or("--"))?;
        write!(f, "  time:           {}", self.time.as_deref().unwrap_or("--"))
    }
}

/// A route source, the current selection and the playback over it
pub struct Session {
    source: Box<dyn RouteSource>,
    selection: Option<Selection>,
    controller: PlaybackController,
}

impl Session {
    pub fn new(source: Box<dyn RouteSource>, config: PlaybackConfig) -> Self {
        Self {
            source,
            selection: None,
            controller: PlaybackController::new(config),
        }
    }

    pub fn source(&self) -> &dyn RouteSource {
        self.source.as_ref()
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    pub fn controller(&self) -> &PlaybackController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut PlaybackController {
        &mut self.controller
    }

    /// Switch to a vehicle/date pair
    ///
    /// Re-selecting the current pair keeps playback untouched. Returns true
    /// when a new route was loaded. On error the previous route stays active.
    pub async fn show(&mut self, selection: Selection) -> RouteResult<bool> {
        if self.selection.as_ref() == Some(&selection) {
            return Ok(false);
        }

        let points = self.source.load_route(&selection).await?;
        info!(
            "Showing {} / {}: {} points",
            selection.vehicle_id,
            selection.date_id,
            points.len()
        );
        self.controller.load_route(points).await;
        self.selection = Some(selection);
        Ok(true)
    }

    /// Build the info panel contents for the current position
    pub async fn report(&self) -> Option<VehicleReport> {
        let selection = self.selection.as_ref()?;
        let frame = self.controller.frame().await;

        let profile = self.source.profile(&selection.vehicle_id);
        let name = match profile {
            Some(p) => p.name.clone(),
            None => self
                .source
                .vehicles()
                .into_iter()
                .find(|v| v.id == selection.vehicle_id)
                .map(|v| v.name)
                .unwrap_or_else(|| selection.vehicle_id.clone()),
        };

        let point = frame.point.as_ref();
        Some(VehicleReport {
            name,
            battery: profile.map(|p| p.battery),
            metrics: frame.metrics.display(),
            coordinates: point.map(|p| p.coordinates_label()),
            time: point
                .and_then(|p| p.time())
                .map(|t| t.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string()),
        })
    }
}
