use geojson::{Feature, GeoJson, Value};

use crate::common::{DomainError, DomainResult};
use crate::domains::checkpoint::LandmarkSpec;
use crate::domains::route::types::GeoPoint;
use crate::domains::traffic_light::{LightCycle, TrafficLightSpec};

/// Everything a GeoJSON route file can contribute to a tour.
#[derive(Debug, Clone, Default)]
pub struct RouteImport {
    pub route: Vec<GeoPoint>,
    pub landmarks: Vec<LandmarkSpec>,
    pub traffic_lights: Vec<TrafficLightSpec>,
}

/// Parse a GeoJSON document.
///
/// The first `LineString` becomes the route. `Point` features are read as
/// landmarks or traffic lights depending on their `kind` property; other
/// features are ignored. GeoJSON positions are `[lng, lat]`.
pub fn parse_route_geojson(text: &str) -> DomainResult<RouteImport> {
    let geojson: GeoJson = text
        .parse()
        .map_err(|e: geojson::Error| DomainError::invalid_config(format!("invalid GeoJSON: {}", e)))?;

    let features = match geojson {
        GeoJson::FeatureCollection(collection) => collection.features,
        GeoJson::Feature(feature) => vec![feature],
        GeoJson::Geometry(geometry) => vec![Feature {
            bbox: None,
            geometry: Some(geometry),
            id: None,
            properties: None,
            foreign_members: None,
        }],
    };

    let mut import = RouteImport::default();
    for feature in &features {
        let Some(geometry) = &feature.geometry else { continue };
        match &geometry.value {
            Value::LineString(line) if import.route.is_empty() => {
                import.route = line.iter().map(|p| to_point(p)).collect::<DomainResult<_>>()?;
            }
            Value::Point(position) => {
                let coords = to_point(position)?;
                match string_property(feature, "kind").as_deref() {
                    Some("landmark") => import.landmarks.push(landmark_from(feature, coords)?),
                    Some("traffic_light") => import.traffic_lights.push(light_from(feature, coords)?),
                    _ => {}
                }
            }
            _ => {}
        }
    }

    if import.route.is_empty() {
        return Err(DomainError::invalid_config("GeoJSON document has no LineString route"));
    }
    Ok(import)
}

fn to_point(position: &[f64]) -> DomainResult<GeoPoint> {
    match position {
        [lng, lat, ..] => Ok(GeoPoint::new(*lat, *lng)),
        _ => Err(DomainError::invalid_config("GeoJSON position needs two coordinates")),
    }
}

fn string_property(feature: &Feature, key: &str) -> Option<String> {
    feature.property(key).and_then(|v| v.as_str()).map(str::to_string)
}

fn seconds_property(feature: &Feature, key: &str) -> DomainResult<u32> {
    feature
        .property(key)
        .and_then(|v| v.as_u64())
        .and_then(|v| u32::try_from(v).ok())
        .ok_or_else(|| DomainError::invalid_config(format!("traffic light is missing `{}` seconds", key)))
}

fn landmark_from(feature: &Feature, coords: GeoPoint) -> DomainResult<LandmarkSpec> {
    let name = string_property(feature, "name")
        .ok_or_else(|| DomainError::invalid_config("landmark feature has no name"))?;
    Ok(LandmarkSpec {
        coords,
        remark: string_property(feature, "remark").unwrap_or_default(),
        audio_id: string_property(feature, "audio_id"),
        name,
    })
}

fn light_from(feature: &Feature, coords: GeoPoint) -> DomainResult<TrafficLightSpec> {
    let name = string_property(feature, "name")
        .ok_or_else(|| DomainError::invalid_config("traffic light feature has no name"))?;
    let offset = match feature.property("offset") {
        Some(_) => seconds_property(feature, "offset")?,
        None => 0,
    };
    Ok(TrafficLightSpec {
        coords,
        name,
        cycle: LightCycle {
            green: seconds_property(feature, "green")?,
            amber: seconds_property(feature, "amber")?,
            red: seconds_property(feature, "red")?,
        },
        offset,
    })
}
