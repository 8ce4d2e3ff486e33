use super::aggregate::Speed;
use crate::common::DomainEvent;
use crate::domains::route::GeoPoint;
use crate::domains::traffic_light::LightState;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TourEvent {
    TourStarted {
        resumed: bool,
    },
    TourPaused,
    TourReset {
        position: GeoPoint,
    },
    /// Visited flags cleared; the narration panel points at the first landmark again.
    CheckpointsCleared {
        first_landmark: Option<String>,
    },
    VehicleMoved {
        position: GeoPoint,
        segment_index: usize,
        fraction: f64,
    },
    ProgressUpdated {
        percent: u8,
    },
    HeldAtLight {
        light_index: usize,
        light_name: String,
        light_state: LightState,
    },
    WaypointReached {
        waypoint_index: usize,
        position: GeoPoint,
    },
    LandmarkVisited {
        landmark_index: usize,
        name: String,
        remark: String,
        next_landmark: Option<String>,
    },
    NarrationRequested {
        landmark_index: usize,
        source: String,
    },
    /// Reached a waypoint with no unvisited landmark nearby.
    MovingOn,
    MovedToPrevious {
        segment_index: usize,
        position: GeoPoint,
        percent: u8,
    },
    AlreadyAtStart,
    RouteCompleted,
    ElapsedTicked {
        seconds: u64,
    },
    ElapsedReset,
    LightChanged {
        light_index: usize,
        name: String,
        state: LightState,
    },
    SpeedChanged {
        speed: Speed,
    },
    NarrationToggled {
        enabled: bool,
    },
}

impl DomainEvent for TourEvent {
    fn event_type(&self) -> &'static str {
        match self {
            TourEvent::TourStarted { .. } => "TourStarted",
            TourEvent::TourPaused => "TourPaused",
            TourEvent::TourReset { .. } => "TourReset",
            TourEvent::CheckpointsCleared { .. } => "CheckpointsCleared",
            TourEvent::VehicleMoved { .. } => "VehicleMoved",
            TourEvent::ProgressUpdated { .. } => "ProgressUpdated",
            TourEvent::HeldAtLight { .. } => "HeldAtLight",
            TourEvent::WaypointReached { .. } => "WaypointReached",
            TourEvent::LandmarkVisited { .. } => "LandmarkVisited",
            TourEvent::NarrationRequested { .. } => "NarrationRequested",
            TourEvent::MovingOn => "MovingOn",
            TourEvent::MovedToPrevious { .. } => "MovedToPrevious",
            TourEvent::AlreadyAtStart => "AlreadyAtStart",
            TourEvent::RouteCompleted => "RouteCompleted",
            TourEvent::ElapsedTicked { .. } => "ElapsedTicked",
            TourEvent::ElapsedReset => "ElapsedReset",
            TourEvent::LightChanged { .. } => "LightChanged",
            TourEvent::SpeedChanged { .. } => "SpeedChanged",
            TourEvent::NarrationToggled { .. } => "NarrationToggled",
        }
    }
}
