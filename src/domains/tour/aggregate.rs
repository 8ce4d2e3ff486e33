use super::progress::progress_percent;
use crate::domains::route::{GeoPoint, Route};
use crate::domains::traffic_light::{LightState, TrafficLightSimulator};
use serde::{Deserialize, Serialize};

/// Each segment is crossed in 50 steps of 0.02.
pub const STEPS_PER_SEGMENT: u32 = 50;

/// A light governs the vehicle within this many degrees on both axes.
pub const LIGHT_PROXIMITY_DEG: f64 = 0.0005;

/// Delay before re-checking a light that holds the vehicle.
pub const HOLD_RETRY_MS: u64 = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speed {
    Slow,
    #[default]
    Normal,
    Fast,
}

impl Speed {
    /// Slider position: 1 = slow, 2 = normal, 3 = fast.
    pub fn level(self) -> u8 {
        match self {
            Speed::Slow => 1,
            Speed::Normal => 2,
            Speed::Fast => 3,
        }
    }

    pub fn from_level(level: u8) -> Option<Speed> {
        match level {
            1 => Some(Speed::Slow),
            2 => Some(Speed::Normal),
            3 => Some(Speed::Fast),
            _ => None,
        }
    }

    pub fn step_delay_ms(self) -> u64 {
        60 * (4 - u64::from(self.level()))
    }

    pub fn label(self) -> &'static str {
        match self {
            Speed::Slow => "Slow",
            Speed::Normal => "Normal",
            Speed::Fast => "Fast",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TourState {
    #[default]
    Idle,
    Running,
    Paused,
    Completed,
}

/// Where the vehicle is along the route.
///
/// The in-segment fraction is kept as a step count so that a segment always
/// takes exactly `STEPS_PER_SEGMENT` steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MovementState {
    pub segment_index: usize,
    pub step: u32,
}

impl MovementState {
    pub fn fraction(&self) -> f64 {
        f64::from(self.step) / f64::from(STEPS_PER_SEGMENT)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    AlreadyRunning,
    /// Started from the first segment; checkpoints and elapsed time start over.
    Fresh,
    Resumed,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PreviousOutcome {
    MovedBack { segment_index: usize, position: GeoPoint },
    AlreadyAtStart { position: GeoPoint },
}

#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    /// The engine is not running; nothing happened.
    Inactive,
    /// A red or amber light is near; retry after `HOLD_RETRY_MS`.
    Held {
        light_index: usize,
        light_name: String,
        light_state: LightState,
        position: GeoPoint,
    },
    /// Position published; the next step follows after the speed delay.
    Advanced { position: GeoPoint, progress: u8 },
    /// The last step of a segment. The vehicle snapped to the next waypoint,
    /// landmarks must be checked there and the next step runs immediately.
    ArrivedAtWaypoint {
        moved_from: GeoPoint,
        progress: u8,
        waypoint_index: usize,
        position: GeoPoint,
    },
    Completed,
}

/// The movement engine: owns the vehicle's position along the route.
#[derive(Debug, Clone)]
pub struct RouteTour {
    route: Route,
    movement: MovementState,
    state: TourState,
    speed: Speed,
}

impl RouteTour {
    pub fn new(route: Route, speed: Speed) -> Self {
        Self {
            route,
            movement: MovementState::default(),
            state: TourState::Idle,
            speed,
        }
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    pub fn state(&self) -> TourState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == TourState::Running
    }

    pub fn movement(&self) -> MovementState {
        self.movement
    }

    pub fn speed(&self) -> Speed {
        self.speed
    }

    pub fn set_speed(&mut self, speed: Speed) {
        self.speed = speed;
    }

    pub fn position(&self) -> GeoPoint {
        self.route
            .interpolate(self.movement.segment_index, self.movement.fraction())
            .or_else(|| self.route.waypoint(self.movement.segment_index))
            .unwrap_or_else(|| self.route.start())
    }

    pub fn progress(&self) -> u8 {
        if self.state == TourState::Completed {
            return 100;
        }
        progress_percent(
            self.movement.segment_index,
            self.movement.fraction(),
            self.route.segment_count(),
        )
    }

    pub fn start(&mut self) -> StartOutcome {
        match self.state {
            TourState::Running => return StartOutcome::AlreadyRunning,
            TourState::Completed => self.movement = MovementState::default(),
            TourState::Idle | TourState::Paused => {}
        }
        self.state = TourState::Running;
        if self.movement.segment_index == 0 {
            self.movement.step = 0;
            StartOutcome::Fresh
        } else {
            StartOutcome::Resumed
        }
    }

    /// Returns false when there was nothing to pause.
    pub fn pause(&mut self) -> bool {
        if self.state != TourState::Running {
            return false;
        }
        self.state = TourState::Paused;
        true
    }

    /// Step back to the start of the previous segment. Landmarks are not re-checked.
    pub fn previous(&mut self) -> PreviousOutcome {
        if matches!(self.state, TourState::Running | TourState::Completed) {
            self.state = TourState::Paused;
        }
        if self.movement.segment_index == 0 {
            return PreviousOutcome::AlreadyAtStart { position: self.position() };
        }
        self.movement.segment_index -= 1;
        self.movement.step = 0;
        PreviousOutcome::MovedBack {
            segment_index: self.movement.segment_index,
            position: self.position(),
        }
    }

    pub fn reset(&mut self) {
        self.state = TourState::Idle;
        self.movement = MovementState::default();
    }

    /// Run one movement step against the current light states.
    pub fn step(&mut self, lights: &TrafficLightSimulator) -> StepOutcome {
        if self.state != TourState::Running {
            return StepOutcome::Inactive;
        }
        if self.movement.segment_index >= self.route.segment_count() {
            self.state = TourState::Completed;
            return StepOutcome::Completed;
        }

        let position = self.position();
        if let Some((light_index, light)) = lights.light_near(&position, LIGHT_PROXIMITY_DEG) {
            if light.state().stops_traffic() {
                return StepOutcome::Held {
                    light_index,
                    light_name: light.name.clone(),
                    light_state: light.state(),
                    position,
                };
            }
        }

        let progress = self.progress();
        self.movement.step += 1;
        if self.movement.step < STEPS_PER_SEGMENT {
            return StepOutcome::Advanced { position, progress };
        }

        self.movement.segment_index += 1;
        self.movement.step = 0;
        let waypoint_index = self.movement.segment_index;
        StepOutcome::ArrivedAtWaypoint {
            moved_from: position,
            progress,
            waypoint_index,
            position: self.route.waypoint(waypoint_index).unwrap_or(position),
        }
    }
}
