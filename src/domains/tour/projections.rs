use super::aggregate::{Speed, TourState};
use super::events::TourEvent;
use super::simulator::TourSimulator;
use crate::domains::route::GeoPoint;
use crate::domains::traffic_light::LightState;
use serde::{Deserialize, Serialize};

pub const STATUS_READY: &str = "Press Start to begin the route.";
pub const STATUS_STARTING: &str = "Starting the route. Look out for key landmarks along the way.";
pub const STATUS_RESUMING: &str = "Resuming the route...";
pub const STATUS_PAUSED: &str = "Route paused.";
pub const STATUS_MOVING: &str = "Moving along the route...";
pub const STATUS_PREVIOUS: &str = "Moved to previous point.";
pub const STATUS_AT_START: &str = "Already at the start point.";
pub const STATUS_RESET: &str = "Route reset. Press Start to begin again.";
pub const STATUS_COMPLETED: &str = "Route completed!";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckpointView {
    pub name: String,
    pub done: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LightView {
    pub name: String,
    pub state: LightState,
}

/// Everything a presentation surface shows, rebuilt from tour events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TourDashboard {
    pub heading: Option<String>,
    pub state: TourState,
    pub status: String,
    pub position: GeoPoint,
    pub progress_percent: u8,
    pub elapsed_seconds: u64,
    pub current_landmark: Option<String>,
    pub next_landmark: Option<String>,
    pub checkpoints: Vec<CheckpointView>,
    pub lights: Vec<LightView>,
    pub speed: Speed,
    pub narration_enabled: bool,
    pub last_narration: Option<String>,
}

impl TourDashboard {
    /// Initial dashboard matching a freshly created simulator.
    pub fn for_simulator(simulator: &TourSimulator) -> Self {
        let tracker = simulator.tracker();
        Self {
            heading: simulator.heading().map(str::to_string),
            state: simulator.state(),
            status: STATUS_READY.to_string(),
            position: simulator.position(),
            progress_percent: simulator.engine().progress(),
            elapsed_seconds: simulator.elapsed_seconds(),
            current_landmark: None,
            next_landmark: tracker.first_landmark_name(),
            checkpoints: tracker
                .landmarks()
                .iter()
                .map(|l| CheckpointView { name: l.name.clone(), done: l.visited() })
                .collect(),
            lights: simulator
                .lights()
                .lights()
                .iter()
                .map(|l| LightView { name: l.name.clone(), state: l.state() })
                .collect(),
            speed: simulator.engine().speed(),
            narration_enabled: tracker.narration_enabled(),
            last_narration: None,
        }
    }

    pub fn apply_event(&mut self, event: &TourEvent) {
        match event {
            TourEvent::TourStarted { resumed } => {
                self.state = TourState::Running;
                self.status = if *resumed { STATUS_RESUMING } else { STATUS_STARTING }.to_string();
            }
            TourEvent::TourPaused => {
                self.state = TourState::Paused;
                self.status = STATUS_PAUSED.to_string();
            }
            TourEvent::TourReset { position } => {
                self.state = TourState::Idle;
                self.position = *position;
                self.status = STATUS_RESET.to_string();
            }
            TourEvent::CheckpointsCleared { first_landmark } => {
                for checkpoint in &mut self.checkpoints {
                    checkpoint.done = false;
                }
                self.current_landmark = None;
                self.next_landmark = first_landmark.clone();
            }
            TourEvent::VehicleMoved { position, .. } | TourEvent::WaypointReached { position, .. } => {
                self.position = *position;
            }
            TourEvent::ProgressUpdated { percent } => {
                self.progress_percent = *percent;
            }
            TourEvent::HeldAtLight { light_name, light_state, .. } => {
                self.status = format!("Stopped at {} ({}). Please wait...", light_name, light_state.as_str());
            }
            TourEvent::LandmarkVisited { landmark_index, name, remark, next_landmark } => {
                if let Some(checkpoint) = self.checkpoints.get_mut(*landmark_index) {
                    checkpoint.done = true;
                }
                self.current_landmark = Some(name.clone());
                self.next_landmark = next_landmark.clone();
                self.status = remark.clone();
            }
            TourEvent::NarrationRequested { source, .. } => {
                self.last_narration = Some(source.clone());
            }
            TourEvent::MovingOn => {
                self.status = STATUS_MOVING.to_string();
            }
            TourEvent::MovedToPrevious { position, percent, .. } => {
                self.position = *position;
                self.progress_percent = *percent;
                self.status = STATUS_PREVIOUS.to_string();
            }
            TourEvent::AlreadyAtStart => {
                self.status = STATUS_AT_START.to_string();
            }
            TourEvent::RouteCompleted => {
                self.state = TourState::Completed;
                self.progress_percent = 100;
                self.status = STATUS_COMPLETED.to_string();
            }
            TourEvent::ElapsedTicked { seconds } => {
                self.elapsed_seconds = *seconds;
            }
            TourEvent::ElapsedReset => {
                self.elapsed_seconds = 0;
            }
            TourEvent::LightChanged { light_index, state, .. } => {
                if let Some(light) = self.lights.get_mut(*light_index) {
                    light.state = *state;
                }
            }
            TourEvent::SpeedChanged { speed } => {
                self.speed = *speed;
            }
            TourEvent::NarrationToggled { enabled } => {
                self.narration_enabled = *enabled;
            }
        }
    }

    pub fn elapsed_display(&self) -> String {
        format_elapsed(self.elapsed_seconds)
    }

    pub fn current_line(&self) -> String {
        match &self.current_landmark {
            Some(name) => format!("Current: {}", name),
            None => "Current: None yet, starting soon.".to_string(),
        }
    }

    pub fn next_line(&self) -> String {
        match &self.next_landmark {
            Some(name) => format!("Next: {}", name),
            None => "Next: End of route.".to_string(),
        }
    }

    pub fn checkpoints_done(&self) -> usize {
        self.checkpoints.iter().filter(|c| c.done).count()
    }

    /// One-line summary for console surfaces.
    pub fn summary_line(&self) -> String {
        format!(
            "[{}] {:>3}% | {} | {}/{} checkpoints | {} | {}",
            self.elapsed_display(),
            self.progress_percent,
            self.speed.label(),
            self.checkpoints_done(),
            self.checkpoints.len(),
            self.current_line(),
            self.status
        )
    }
}

/// `MM:SS`, minutes keep counting past 59.
pub fn format_elapsed(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
