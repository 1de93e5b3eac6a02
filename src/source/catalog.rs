use crate::core::RoutePoint;
use crate::error::{RouteError, RouteResult};
use crate::input::{parse_catalog, parse_route_json};
use crate::source::{DateOption, RouteSource, Selection, VehicleOption};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Base route bundled with the crate
const DEMO_ROUTE_JSON: &str = include_str!("../../data/demo-route.json");

/// Route recorded on one day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatedRoute {
    pub date: String,
    pub points: Vec<RoutePoint>,
}

/// A vehicle with its recorded routes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleProfile {
    pub id: String,
    pub name: String,
    /// Battery charge in percent
    #[serde(default)]
    pub battery: u8,
    #[serde(default)]
    pub routes: Vec<DatedRoute>,
}

impl VehicleProfile {
    pub fn route_for(&self, date_id: &str) -> Option<&DatedRoute> {
        self.routes.iter().find(|r| r.date == date_id)
    }
}

/// On-disk catalog document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogFile {
    #[serde(default)]
    pub dates: Vec<DateOption>,
    #[serde(default)]
    pub vehicles: Vec<VehicleProfile>,
}

/// Derives a variant route from a base route
///
/// Point `i` is moved by the coordinate offset and by `i * step_ms`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RouteVariant {
    pub lat_offset: f64,
    pub lon_offset: f64,
    pub step_ms: i64,
    /// Keep only the first N points
    pub take: Option<usize>,
}

impl RouteVariant {
    pub fn apply(&self, base: &[RoutePoint]) -> Vec<RoutePoint> {
        let take = self.take.unwrap_or(base.len());
        base.iter()
            .take(take)
            .enumerate()
            .map(|(i, p)| p.shifted(self.lat_offset, self.lon_offset, i as i64 * self.step_ms))
            .collect()
    }
}

/// In-memory catalog of vehicles and their routes
#[derive(Debug, Clone)]
pub struct RouteCatalog {
    name: String,
    dates: Vec<DateOption>,
    vehicles: Vec<VehicleProfile>,
}

impl RouteCatalog {
    pub fn new(name: &str, file: CatalogFile) -> Self {
        Self {
            name: name.to_string(),
            dates: file.dates,
            vehicles: file.vehicles,
        }
    }

    /// Load a catalog from a JSON file
    pub async fn load(path: &Path) -> RouteResult<Self> {
        let data = tokio::fs::read(path).await.map_err(|source| RouteError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let file = parse_catalog(&data)?;
        debug!(
            "Loaded catalog {} with {} vehicles",
            path.display(),
            file.vehicles.len()
        );
        Ok(Self::new(&path.display().to_string(), file))
    }

    /// Two vehicles over two days, all derived from the bundled base route
    pub fn demo() -> RouteResult<Self> {
        let base = parse_route_json(DEMO_ROUTE_JSON.as_bytes())?;
        Ok(Self::demo_from(base))
    }

    pub fn demo_from(base: Vec<RoutePoint>) -> Self {
        let shifted = |lat_offset, lon_offset, step_ms, take| {
            RouteVariant { lat_offset, lon_offset, step_ms, take }.apply(&base)
        };

        let car = VehicleProfile {
            id: "v1".to_string(),
            name: "CAR-1".to_string(),
            battery: 16,
            routes: vec![
                DatedRoute { date: "today".to_string(), points: base.clone() },
                DatedRoute {
                    date: "yesterday".to_string(),
                    points: shifted(0.01, 0.01, 5000, None),
                },
            ],
        };

        let truck = VehicleProfile {
            id: "v2".to_string(),
            name: "TRUCK-1".to_string(),
            battery: 80,
            routes: vec![
                DatedRoute {
                    date: "today".to_string(),
                    points: shifted(-0.01, -0.01, 3000, None),
                },
                DatedRoute {
                    date: "yesterday".to_string(),
                    points: shifted(0.02, -0.02, 4000, Some(8)),
                },
            ],
        };

        let file = CatalogFile {
            dates: vec![
                DateOption { id: "today".to_string(), label: "Today".to_string() },
                DateOption { id: "yesterday".to_string(), label: "Yesterday".to_string() },
            ],
            vehicles: vec![car, truck],
        };

        Self::new("demo", file)
    }

    pub fn vehicle(&self, id: &str) -> Option<&VehicleProfile> {
        self.vehicles.iter().find(|v| v.id == id)
    }

    /// Look up a route without cloning it
    pub fn route(&self, selection: &Selection) -> Option<&[RoutePoint]> {
        self.vehicle(&selection.vehicle_id)?
            .route_for(&selection.date_id)
            .map(|r| r.points.as_slice())
    }
}

#[async_trait]
impl RouteSource for RouteCatalog {
    fn name(&self) -> &str {
        &self.name
    }

    fn vehicles(&self) -> Vec<VehicleOption> {
        self.vehicles
            .iter()
            .map(|v| VehicleOption { id: v.id.clone(), name: v.name.clone() })
            .collect()
    }

    fn dates(&self) -> Vec<DateOption> {
        self.dates.clone()
    }

    fn profile(&self, vehicle_id: &str) -> Option<&VehicleProfile> {
        self.vehicle(vehicle_id)
    }

    async fn load_route(&self, selection: &Selection) -> RouteResult<Vec<RoutePoint>> {
        match self.route(selection) {
            Some(points) => Ok(points.to_vec()),
            None => {
                debug!(
                    "No route for vehicle {:?} on {:?}",
                    selection.vehicle_id, selection.date_id
                );
                Ok(Vec::new())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_layout() {
        let catalog = RouteCatalog::demo().unwrap();
        let vehicles = catalog.vehicles();
        assert_eq!(vehicles.len(), 2);
        assert_eq!(vehicles[0].name, "CAR-1");
        assert_eq!(vehicles[1].name, "TRUCK-1");
        assert_eq!(catalog.dates().len(), 2);
        assert_eq!(catalog.profile("v1").map(|v| v.battery), Some(16));
        assert_eq!(catalog.profile("v2").map(|v| v.battery), Some(80));
    }

    #[test]
    fn test_demo_variants() {
        let catalog = RouteCatalog::demo().unwrap();
        let base = catalog.route(&Selection::new("v1", "today")).unwrap();
        let truck = catalog.route(&Selection::new("v2", "yesterday")).unwrap();

        assert_eq!(truck.len(), 8);
        assert!((truck[0].latitude - (base[0].latitude + 0.02)).abs() < 1e-9);
        assert!((truck[0].longitude - (base[0].longitude - 0.02)).abs() < 1e-9);

        // Point i is delayed by i * 4 s on top of its original spacing
        let base_gap = base[1].timestamp_millis().unwrap() - base[0].timestamp_millis().unwrap();
        let gap = truck[1].timestamp_millis().unwrap() - truck[0].timestamp_millis().unwrap();
        assert_eq!(gap, base_gap + 4000);
    }

    #[test]
    fn test_variant_take() {
        let base = vec![
            RoutePoint::new(1.0, 1.0, "2024-01-01T00:00:00Z"),
            RoutePoint::new(2.0, 2.0, "2024-01-01T00:00:10Z"),
        ];
        let variant = RouteVariant { take: Some(1), ..Default::default() };
        assert_eq!(variant.apply(&base).len(), 1);
        assert_eq!(RouteVariant::default().apply(&base).len(), 2);
    }

    #[tokio::test]
    async fn test_unknown_selection_is_empty() {
        let catalog = RouteCatalog::demo().unwrap();
        let missing_vehicle = catalog.load_route(&Selection::new("v7", "today")).await.unwrap();
        let missing_date = catalog.load_route(&Selection::new("v1", "last-week")).await.unwrap();
        assert!(missing_vehicle.is_empty());
        assert!(missing_date.is_empty());
    }

    #[tokio::test]
    async fn test_load_route_returns_whole_sequence() {
        let catalog = RouteCatalog::demo().unwrap();
        let points = catalog.load_route(&Selection::new("v2", "today")).await.unwrap();
        assert_eq!(points.len(), 15);
        assert!(points.windows(2).all(|w| w[0].time() < w[1].time()));
    }
}
