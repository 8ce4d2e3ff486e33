use crate::common::{DomainError, DomainResult};
use crate::domains::route::RouteDataSource;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Reads route files relative to a base directory.
pub struct FilesystemRouteSource {
    base: PathBuf,
}

impl FilesystemRouteSource {
    /// Base precedence: explicit argument, `ROUTE_TOUR_DATA_DIR`, current directory.
    pub fn new(base: Option<PathBuf>) -> Self {
        let base = base.unwrap_or_else(|| {
            env::var("ROUTE_TOUR_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("."))
        });
        Self { base }
    }

    /// Resolve files next to the given config file.
    pub fn beside(config_path: &Path) -> Self {
        let base = config_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf);
        Self::new(base)
    }
}

impl RouteDataSource for FilesystemRouteSource {
    fn load_geojson(&self, name: &str) -> DomainResult<String> {
        let path = self.base.join(name);
        fs::read_to_string(&path).map_err(|e| {
            DomainError::InfrastructureError(format!("Failed to read {}: {}", path.display(), e))
        })
    }
}
