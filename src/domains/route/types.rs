use crate::common::{DomainError, DomainResult};
use serde::{Deserialize, Serialize};

/// A WGS84 coordinate in degrees. Serialized as a `[lat, lng]` pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Linear interpolation towards `to`; `t` is expected in `0.0..=1.0`.
    pub fn lerp(&self, to: &GeoPoint, t: f64) -> GeoPoint {
        GeoPoint {
            lat: self.lat + (to.lat - self.lat) * t,
            lng: self.lng + (to.lng - self.lng) * t,
        }
    }

    /// True when both axes differ by strictly less than `radius` degrees.
    pub fn is_within(&self, other: &GeoPoint, radius: f64) -> bool {
        (self.lat - other.lat).abs() < radius && (self.lng - other.lng).abs() < radius
    }
}

impl From<[f64; 2]> for GeoPoint {
    fn from(pair: [f64; 2]) -> Self {
        GeoPoint::new(pair[0], pair[1])
    }
}

impl From<GeoPoint> for [f64; 2] {
    fn from(point: GeoPoint) -> Self {
        [point.lat, point.lng]
    }
}

/// Initial camera for a map surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapView {
    pub lat: f64,
    pub lng: f64,
    pub zoom: u8,
}

impl MapView {
    /// Centre of the route's bounding box at a street-level zoom.
    pub fn fit(route: &Route) -> Self {
        let bounds = route.bounds();
        Self {
            lat: (bounds.south + bounds.north) / 2.0,
            lng: (bounds.west + bounds.east) / 2.0,
            zoom: 15,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

/// Ordered, immutable list of waypoints the vehicle follows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    waypoints: Vec<GeoPoint>,
}

impl Route {
    pub fn new(waypoints: Vec<GeoPoint>) -> DomainResult<Self> {
        if waypoints.is_empty() {
            return Err(DomainError::invalid_config("route must contain at least one waypoint"));
        }
        if waypoints.iter().any(|p| !p.lat.is_finite() || !p.lng.is_finite()) {
            return Err(DomainError::invalid_config("route contains a non-finite coordinate"));
        }
        Ok(Self { waypoints })
    }

    pub fn waypoints(&self) -> &[GeoPoint] {
        &self.waypoints
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    pub fn segment_count(&self) -> usize {
        self.waypoints.len() - 1
    }

    pub fn last_index(&self) -> usize {
        self.waypoints.len() - 1
    }

    pub fn start(&self) -> GeoPoint {
        self.waypoints[0]
    }

    pub fn waypoint(&self, index: usize) -> Option<GeoPoint> {
        self.waypoints.get(index).copied()
    }

    /// Position at `fraction` along the segment that starts at waypoint `segment`.
    pub fn interpolate(&self, segment: usize, fraction: f64) -> Option<GeoPoint> {
        let from = self.waypoints.get(segment)?;
        let to = self.waypoints.get(segment + 1)?;
        Some(from.lerp(to, fraction))
    }

    pub fn bounds(&self) -> Bounds {
        let first = self.start();
        self.waypoints.iter().fold(
            Bounds { south: first.lat, west: first.lng, north: first.lat, east: first.lng },
            |b, p| Bounds {
                south: b.south.min(p.lat),
                west: b.west.min(p.lng),
                north: b.north.max(p.lat),
                east: b.east.max(p.lng),
            },
        )
    }
}
