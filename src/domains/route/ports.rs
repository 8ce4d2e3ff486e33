use crate::common::DomainResult;

/// Port the route domain depends on for reading route files.
/// Adapters provide filesystem or embedded sources.
pub trait RouteDataSource: Send + Sync {
    fn load_geojson(&self, name: &str) -> DomainResult<String>;
}
