use crate::core::RoutePoint;
use crate::error::RouteResult;
use crate::source::catalog::CatalogFile;

/// Parse a JSON array of route points
pub fn parse_route_json(data: &[u8]) -> RouteResult<Vec<RoutePoint>> {
    Ok(serde_json::from_slice(data)?)
}

/// Parse a vehicle catalog document
pub fn parse_catalog(data: &[u8]) -> RouteResult<CatalogFile> {
    Ok(serde_json::from_slice(data)?)
}
