use crate::common::{DomainError, DomainResult};
use crate::domains::checkpoint::{LandmarkSpec, DEFAULT_AUDIO_BASE_PATH};
use crate::domains::route::{parse_route_geojson, GeoPoint, MapView, Route, RouteDataSource};
use crate::domains::tour::{SimulationSettings, TourSetup};
use crate::domains::traffic_light::TrafficLightSpec;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Prefix for environment overrides, e.g. `ROUTE_TOUR__SIMULATION__SPEED=fast`.
pub const ENV_PREFIX: &str = "ROUTE_TOUR";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub tour: TourConfig,
    #[serde(default)]
    pub simulation: SimulationSettings,
    #[serde(default)]
    pub runtime: RuntimeConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TourConfig {
    pub heading: Option<String>,
    pub initial_view: Option<MapView>,
    #[serde(default)]
    pub route: Vec<GeoPoint>,
    /// GeoJSON file providing the route; replaces `route` when set.
    pub route_geojson: Option<String>,
    #[serde(default)]
    pub landmarks: Vec<LandmarkSpec>,
    #[serde(default)]
    pub traffic_lights: Vec<TrafficLightSpec>,
    #[serde(default = "default_audio_base_path")]
    pub audio_base_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeConfig {
    #[serde(default = "default_tour_id")]
    pub tour_id: String,
    #[serde(default = "default_true")]
    pub autostart: bool,
    #[serde(default = "default_true")]
    pub exit_on_complete: bool,
    /// Append every event as a JSON line to this file.
    pub event_log: Option<String>,
    /// External program used to play narration files, e.g. `mpg123`.
    pub narration_command: Option<String>,
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_level")]
    pub level: String,
    pub file: Option<String>,
    #[serde(default = "default_channel_capacity")]
    pub buffer_capacity: usize,
}

fn default_audio_base_path() -> String {
    DEFAULT_AUDIO_BASE_PATH.to_string()
}

fn default_tour_id() -> String {
    "route-tour".to_string()
}

fn default_true() -> bool {
    true
}

fn default_channel_capacity() -> usize {
    256
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            tour_id: default_tour_id(),
            autostart: true,
            exit_on_complete: true,
            event_log: None,
            narration_command: None,
            channel_capacity: default_channel_capacity(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            file: None,
            buffer_capacity: default_channel_capacity(),
        }
    }
}

impl LoggingConfig {
    pub fn level_filter(&self) -> log::LevelFilter {
        self.level.parse().unwrap_or(log::LevelFilter::Info)
    }
}

impl Config {
    /// Read a TOML file as-is.
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = tokio::fs::read_to_string(path).await?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Read a TOML file with `ROUTE_TOUR__*` environment overrides layered on top.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path.as_ref()).format(config::FileFormat::Toml))
            .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()?;
        let config: Config = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> DomainResult<()> {
        if self.tour.route.is_empty() && self.tour.route_geojson.is_none() {
            return Err(DomainError::invalid_config("tour needs a `route` or a `route_geojson` file"));
        }
        if self.runtime.channel_capacity == 0 || self.logging.buffer_capacity == 0 {
            return Err(DomainError::invalid_config("channel capacities must be positive"));
        }
        Ok(())
    }
}

impl TourConfig {
    /// Resolve the configured tour into simulator inputs.
    ///
    /// Landmarks and lights from a GeoJSON file follow the ones listed in the
    /// config, so configured entries win first-match ties.
    pub fn to_setup(&self, source: &dyn RouteDataSource) -> DomainResult<TourSetup> {
        let mut waypoints = self.route.clone();
        let mut landmarks = self.landmarks.clone();
        let mut traffic_lights = self.traffic_lights.clone();

        if let Some(name) = &self.route_geojson {
            let import = parse_route_geojson(&source.load_geojson(name)?)?;
            waypoints = import.route;
            landmarks.extend(import.landmarks);
            traffic_lights.extend(import.traffic_lights);
        }

        let route = Route::new(waypoints)?;
        Ok(TourSetup {
            heading: self.heading.clone(),
            initial_view: self.initial_view.unwrap_or_else(|| MapView::fit(&route)),
            route,
            landmarks,
            traffic_lights,
            audio_base_path: self.audio_base_path.clone(),
        })
    }
}
