use crate::core::RoutePoint;
use crate::error::RouteResult;
use crate::input::load_route_file;
use crate::source::{DateOption, RouteSource, Selection, VehicleOption};
use async_trait::async_trait;
use std::path::PathBuf;

/// Serves one route file regardless of the selection
///
/// The file is re-read on every load, so edits show up on the next selection.
pub struct FileSource {
    name: String,
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "route".to_string());
        Self { name, path }
    }
}

#[async_trait]
impl RouteSource for FileSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn vehicles(&self) -> Vec<VehicleOption> {
        vec![VehicleOption { id: self.name.clone(), name: self.name.clone() }]
    }

    fn dates(&self) -> Vec<DateOption> {
        vec![DateOption { id: "file".to_string(), label: self.path.display().to_string() }]
    }

    async fn load_route(&self, _selection: &Selection) -> RouteResult<Vec<RoutePoint>> {
        load_route_file(&self.path).await
    }
}
