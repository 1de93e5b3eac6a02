pub mod geo;
pub mod point;

pub use geo::haversine_m;
pub use point::RoutePoint;
