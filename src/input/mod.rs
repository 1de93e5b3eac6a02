pub mod csv;
pub mod json;

pub use self::csv::parse_csv;
pub use self::json::{parse_catalog, parse_route_json};

use crate::core::RoutePoint;
use crate::error::{RouteError, RouteResult};
use std::path::Path;
use tracing::debug;

/// Input format detection result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Json,
    Csv,
    Unknown,
}

/// Detect the format of an input file by looking at its first bytes
pub fn detect_format(data: &[u8]) -> InputFormat {
    let text = match std::str::from_utf8(&data[..data.len().min(500)]) {
        Ok(text) => text,
        // A multi-byte character may straddle the sample boundary
        Err(e) if e.valid_up_to() > 0 => {
            std::str::from_utf8(&data[..e.valid_up_to()]).unwrap_or_default()
        }
        Err(_) => return InputFormat::Unknown,
    };
    let text = text.trim_start_matches('\u{feff}').trim_start();

    if text.starts_with('[') || text.starts_with('{') {
        return InputFormat::Json;
    }

    if text.lines().next().is_some_and(|header| header.contains(',')) {
        return InputFormat::Csv;
    }

    InputFormat::Unknown
}

/// Parse a route from raw file contents, auto-detecting format
pub fn parse_route(data: &[u8]) -> RouteResult<Vec<RoutePoint>> {
    match detect_format(data) {
        InputFormat::Json => parse_route_json(data),
        InputFormat::Csv => parse_csv(data),
        InputFormat::Unknown => Err(RouteError::UnknownFormat),
    }
}

/// Load a route from a file, auto-detecting format
pub async fn load_route_file(path: &Path) -> RouteResult<Vec<RoutePoint>> {
    let data = tokio::fs::read(path).await.map_err(|source| RouteError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let points = parse_route(&data)?;
    debug!("Loaded {} points from {}", points.len(), path.display());
    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_format() {
        assert_eq!(detect_format(b"  [ {\"latitude\": 1}]"), InputFormat::Json);
        assert_eq!(detect_format(b"{\"vehicles\": []}"), InputFormat::Json);
        assert_eq!(
            detect_format(b"lat,lon,time\n17.0,78.0,2024-01-01T00:00:00Z\n"),
            InputFormat::Csv
        );
        assert_eq!(detect_format(b"hello world"), InputFormat::Unknown);
        assert_eq!(detect_format(&[0xff, 0xfe, 0x00]), InputFormat::Unknown);
    }

    #[test]
    fn test_parse_route_dispatch() {
        let csv = b"latitude,longitude,timestamp\n17.0,78.0,2024-01-01T00:00:00Z\n";
        assert_eq!(parse_route(csv).unwrap().len(), 1);

        let json = br#"[{"latitude":17.0,"longitude":78.0,"timestamp":"2024-01-01T00:00:00Z"}]"#;
        assert_eq!(parse_route(json).unwrap().len(), 1);

        assert!(matches!(parse_route(b"???"), Err(RouteError::UnknownFormat)));
    }

    #[tokio::test]
    async fn test_missing_file() {
        let err = load_route_file(Path::new("/nonexistent/route.json")).await.unwrap_err();
        assert!(matches!(err, RouteError::Io { .. }));
    }
}
