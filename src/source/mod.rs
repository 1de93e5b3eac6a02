pub mod catalog;
pub mod file;

pub use catalog::{RouteCatalog, VehicleProfile};
pub use file::FileSource;

use crate::core::RoutePoint;
use crate::error::RouteResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A vehicle the user can pick
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleOption {
    pub id: String,
    pub name: String,
}

/// A day the user can pick
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateOption {
    pub id: String,
    pub label: String,
}

/// Key identifying one route: which vehicle, which day
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Selection {
    pub vehicle_id: String,
    pub date_id: String,
}

impl Selection {
    pub fn new(vehicle_id: impl Into<String>, date_id: impl Into<String>) -> Self {
        Self {
            vehicle_id: vehicle_id.into(),
            date_id: date_id.into(),
        }
    }
}

/// Supplies the ordered point sequence for a selection
///
/// Implementations:
/// - In-memory vehicle catalog (built-in demo or loaded from JSON)
/// - A single route file, served for every selection
#[async_trait]
pub trait RouteSource: Send + Sync {
    /// Get the name/identifier of this source
    fn name(&self) -> &str;

    /// Vehicles offered for selection
    fn vehicles(&self) -> Vec<VehicleOption>;

    /// Dates offered for selection
    fn dates(&self) -> Vec<DateOption>;

    /// Extra details for a vehicle, if the source has any
    fn profile(&self, _vehicle_id: &str) -> Option<&VehicleProfile> {
        None
    }

    /// Load the whole route for a selection
    ///
    /// An unknown vehicle or date yields an empty route, not an error.
    async fn load_route(&self, selection: &Selection) -> RouteResult<Vec<RoutePoint>>;
}
