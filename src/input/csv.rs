use crate::core::RoutePoint;
use crate::error::{RouteError, RouteResult};

const LATITUDE_NAMES: &[&str] = &["latitude", "lat"];
const LONGITUDE_NAMES: &[&str] = &["longitude", "lon", "lng", "long"];
const TIMESTAMP_NAMES: &[&str] = &["timestamp", "time", "ts", "t"];

/// Parse route points from CSV
///
/// Supports flexible column names:
/// - latitude,longitude,timestamp
/// - lat,lng,time
/// - ts,lat,lon
///
/// Extra columns are ignored. Timestamps are kept as written.
pub fn parse_csv(data: &[u8]) -> RouteResult<Vec<RoutePoint>> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(data);

    let headers = rdr.headers()?.clone();
    let (lat_idx, lon_idx, time_idx) = detect_columns(&headers)?;

    let mut points = Vec::new();

    for (row, result) in rdr.records().enumerate() {
        let record = result?;
        let row = row + 1;

        let latitude = parse_number(&record, lat_idx, row, "latitude")?;
        let longitude = parse_number(&record, lon_idx, row, "longitude")?;
        let timestamp = record.get(time_idx).unwrap_or_default().to_string();

        points.push(RoutePoint { latitude, longitude, timestamp });
    }

    Ok(points)
}

fn parse_number(
    record: &csv::StringRecord,
    idx: usize,
    row: usize,
    field: &'static str,
) -> RouteResult<f64> {
    let raw = record.get(idx).unwrap_or_default();
    raw.parse::<f64>().map_err(|_| RouteError::InvalidNumber {
        row,
        field,
        value: raw.to_string(),
    })
}

/// Detect column indices from CSV headers
fn detect_columns(headers: &csv::StringRecord) -> RouteResult<(usize, usize, usize)> {
    let lat_idx = find_column(headers, LATITUDE_NAMES)?;
    let lon_idx = find_column(headers, LONGITUDE_NAMES)?;
    let time_idx = find_column(headers, TIMESTAMP_NAMES)?;

    Ok((lat_idx, lon_idx, time_idx))
}

/// Find a column by checking possible names
fn find_column(headers: &csv::StringRecord, names: &'static [&'static str]) -> RouteResult<usize> {
    headers
        .iter()
        .position(|header| {
            let header_lower = header.to_lowercase();
            names.iter().any(|&name| header_lower == name)
        })
        .ok_or(RouteError::MissingColumn(names))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_standard_columns() {
        let data = b"latitude,longitude,timestamp\n\
            17.385044,78.486671,2024-01-01T08:00:00Z\n\
            17.385500,78.487100,2024-01-01T08:00:10Z\n";
        let points = parse_csv(data).unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(points[1], RoutePoint::new(17.3855, 78.4871, "2024-01-01T08:00:10Z"));
    }

    #[test]
    fn test_parse_aliases_and_order() {
        let data = b"TS, Lng, Lat, speed\n2024-01-01T08:00:00Z, 78.5, 17.25, 12\n";
        let points = parse_csv(data).unwrap();
        assert_eq!(points, vec![RoutePoint::new(17.25, 78.5, "2024-01-01T08:00:00Z")]);
    }

    #[test]
    fn test_missing_column() {
        let err = parse_csv(b"lat,time\n17.0,2024-01-01T00:00:00Z\n").unwrap_err();
        assert!(matches!(err, RouteError::MissingColumn(names) if names == LONGITUDE_NAMES));
    }

    #[test]
    fn test_invalid_number() {
        let err = parse_csv(b"lat,lon,time\n17.0,abc,2024-01-01T00:00:00Z\n").unwrap_err();
        match err {
            RouteError::InvalidNumber { row, field, value } => {
                assert_eq!(row, 1);
                assert_eq!(field, "longitude");
                assert_eq!(value, "abc");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
