use super::aggregate::{RouteTour, Speed, StartOutcome, StepOutcome, TourState, PreviousOutcome, HOLD_RETRY_MS};
use super::commands::TourCommand;
use super::events::TourEvent;
use crate::common::{AggregateRoot, DomainResult};
use crate::domains::checkpoint::{CheckpointTracker, LandmarkSpec};
use crate::domains::route::{GeoPoint, MapView, Route};
use crate::domains::traffic_light::{TrafficLightSimulator, TrafficLightSpec};
use serde::{Deserialize, Serialize};

/// Period of both the light ticker and the elapsed-time ticker.
pub const TICK_MS: u64 = 1000;

/// Validated inputs for one tour.
#[derive(Debug, Clone)]
pub struct TourSetup {
    pub heading: Option<String>,
    pub initial_view: MapView,
    pub route: Route,
    pub landmarks: Vec<LandmarkSpec>,
    pub traffic_lights: Vec<TrafficLightSpec>,
    pub audio_base_path: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationSettings {
    #[serde(default)]
    pub speed: Speed,
    #[serde(default = "default_narration_enabled")]
    pub narration_enabled: bool,
}

fn default_narration_enabled() -> bool {
    true
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self { speed: Speed::default(), narration_enabled: true }
    }
}

/// Timers in firing order for equal deadlines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Timer {
    LightTick,
    ElapsedTick,
    Step,
}

/// Drives a tour on a virtual millisecond clock.
///
/// The caller owns time: `advance_to` fires every timer that is due, in
/// deadline order, and `handle` applies a command at the current instant.
/// At most one movement step is ever scheduled. Everything observable is
/// recorded as `TourEvent`s in the outbox.
#[derive(Debug, Clone)]
pub struct TourSimulator {
    id: String,
    heading: Option<String>,
    initial_view: MapView,
    engine: RouteTour,
    lights: TrafficLightSimulator,
    tracker: CheckpointTracker,
    now_ms: u64,
    light_tick_due: Option<u64>,
    elapsed_tick_due: Option<u64>,
    step_due: Option<u64>,
    elapsed_seconds: u64,
    version: u64,
    uncommitted_events: Vec<TourEvent>,
}

impl TourSimulator {
    pub fn new(id: impl Into<String>, setup: TourSetup, settings: SimulationSettings) -> DomainResult<Self> {
        let lights = TrafficLightSimulator::new(setup.traffic_lights)?;
        let light_tick_due = (!lights.is_empty()).then_some(TICK_MS);

        Ok(Self {
            id: id.into(),
            heading: setup.heading,
            initial_view: setup.initial_view,
            engine: RouteTour::new(setup.route, settings.speed),
            lights,
            tracker: CheckpointTracker::new(setup.landmarks, setup.audio_base_path, settings.narration_enabled),
            now_ms: 0,
            light_tick_due,
            elapsed_tick_due: None,
            step_due: None,
            elapsed_seconds: 0,
            version: 0,
            uncommitted_events: Vec::new(),
        })
    }

    pub fn heading(&self) -> Option<&str> {
        self.heading.as_deref()
    }

    pub fn initial_view(&self) -> MapView {
        self.initial_view
    }

    pub fn engine(&self) -> &RouteTour {
        &self.engine
    }

    pub fn lights(&self) -> &TrafficLightSimulator {
        &self.lights
    }

    pub fn tracker(&self) -> &CheckpointTracker {
        &self.tracker
    }

    pub fn state(&self) -> TourState {
        self.engine.state()
    }

    pub fn position(&self) -> GeoPoint {
        self.engine.position()
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    pub fn elapsed_seconds(&self) -> u64 {
        self.elapsed_seconds
    }

    pub fn has_pending_step(&self) -> bool {
        self.step_due.is_some()
    }

    /// Earliest instant at which a timer fires.
    pub fn next_deadline(&self) -> Option<u64> {
        self.next_timer().map(|(due, _)| due)
    }

    fn next_timer(&self) -> Option<(u64, Timer)> {
        [
            (self.light_tick_due, Timer::LightTick),
            (self.elapsed_tick_due, Timer::ElapsedTick),
            (self.step_due, Timer::Step),
        ]
        .into_iter()
        .filter_map(|(due, timer)| due.map(|at| (at, timer)))
        .min()
    }

    /// Fire every timer due at or before `now_ms`, then move the clock there.
    pub fn advance_to(&mut self, now_ms: u64) {
        while let Some((due, timer)) = self.next_timer() {
            if due > now_ms {
                break;
            }
            self.now_ms = self.now_ms.max(due);
            self.fire(timer);
        }
        self.now_ms = self.now_ms.max(now_ms);
    }

    pub fn advance_by(&mut self, millis: u64) {
        self.advance_to(self.now_ms + millis);
    }

    pub fn handle(&mut self, command: TourCommand) {
        match command {
            TourCommand::Start => self.start(),
            TourCommand::Stop => self.stop(),
            TourCommand::Previous => self.previous(),
            TourCommand::Reset => self.reset(),
            TourCommand::SetSpeed(speed) => {
                self.engine.set_speed(speed);
                self.add_event(TourEvent::SpeedChanged { speed });
            }
            TourCommand::SetNarration(enabled) => {
                self.tracker.set_narration_enabled(enabled);
                self.add_event(TourEvent::NarrationToggled { enabled });
            }
        }
    }

    fn start(&mut self) {
        let outcome = self.engine.start();
        match outcome {
            StartOutcome::AlreadyRunning => return,
            StartOutcome::Fresh => {
                self.clear_checkpoints();
                self.elapsed_seconds = 0;
                self.add_event(TourEvent::ElapsedReset);
                self.add_event(TourEvent::TourStarted { resumed: false });
            }
            StartOutcome::Resumed => self.add_event(TourEvent::TourStarted { resumed: true }),
        }

        self.elapsed_tick_due = Some(self.now_ms + TICK_MS);
        self.step_due = None;
        let published = self.run_step();

        // Held before the first step: the dashboard still needs the restart position.
        if outcome == StartOutcome::Fresh && !published {
            self.publish_position();
        }
    }

    fn publish_position(&mut self) {
        let movement = self.engine.movement();
        self.add_event(TourEvent::VehicleMoved {
            position: self.engine.position(),
            segment_index: movement.segment_index,
            fraction: movement.fraction(),
        });
        self.add_event(TourEvent::ProgressUpdated { percent: self.engine.progress() });
    }

    fn stop(&mut self) {
        if self.engine.pause() {
            self.step_due = None;
            self.elapsed_tick_due = None;
            self.add_event(TourEvent::TourPaused);
        }
    }

    fn previous(&mut self) {
        let was_running = self.engine.is_running();
        self.step_due = None;
        let outcome = self.engine.previous();

        if was_running {
            self.elapsed_tick_due = None;
            self.add_event(TourEvent::TourPaused);
        }
        match outcome {
            PreviousOutcome::MovedBack { segment_index, position } => {
                self.add_event(TourEvent::MovedToPrevious {
                    segment_index,
                    position,
                    percent: self.engine.progress(),
                });
            }
            PreviousOutcome::AlreadyAtStart { .. } => self.add_event(TourEvent::AlreadyAtStart),
        }
    }

    fn reset(&mut self) {
        self.step_due = None;
        self.elapsed_tick_due = None;
        self.engine.reset();
        self.elapsed_seconds = 0;

        self.add_event(TourEvent::TourReset { position: self.engine.position() });
        self.clear_checkpoints();
        self.add_event(TourEvent::ProgressUpdated { percent: 0 });
        self.add_event(TourEvent::ElapsedReset);
    }

    fn clear_checkpoints(&mut self) {
        self.tracker.clear_visits();
        let first_landmark = self.tracker.first_landmark_name();
        self.add_event(TourEvent::CheckpointsCleared { first_landmark });
    }

    fn fire(&mut self, timer: Timer) {
        match timer {
            Timer::LightTick => {
                self.light_tick_due = Some(self.now_ms + TICK_MS);
                for change in self.lights.tick() {
                    self.add_event(TourEvent::LightChanged {
                        light_index: change.light_index,
                        name: change.name,
                        state: change.state,
                    });
                }
            }
            Timer::ElapsedTick => {
                self.elapsed_tick_due = Some(self.now_ms + TICK_MS);
                self.elapsed_seconds += 1;
                self.add_event(TourEvent::ElapsedTicked { seconds: self.elapsed_seconds });
            }
            Timer::Step => {
                self.step_due = None;
                self.run_step();
            }
        }
    }

    /// Step until the engine waits for a timer, holds, or finishes.
    /// Returns whether any position or progress was published.
    fn run_step(&mut self) -> bool {
        let mut published = false;
        loop {
            let before = self.engine.movement();
            match self.engine.step(&self.lights) {
                StepOutcome::Inactive => return published,
                StepOutcome::Held { light_index, light_name, light_state, .. } => {
                    self.add_event(TourEvent::HeldAtLight { light_index, light_name, light_state });
                    self.step_due = Some(self.now_ms + HOLD_RETRY_MS);
                    return published;
                }
                StepOutcome::Advanced { position, progress } => {
                    self.add_event(TourEvent::VehicleMoved {
                        position,
                        segment_index: before.segment_index,
                        fraction: before.fraction(),
                    });
                    self.add_event(TourEvent::ProgressUpdated { percent: progress });
                    self.step_due = Some(self.now_ms + self.engine.speed().step_delay_ms());
                    return true;
                }
                StepOutcome::ArrivedAtWaypoint { moved_from, progress, waypoint_index, position } => {
                    self.add_event(TourEvent::VehicleMoved {
                        position: moved_from,
                        segment_index: before.segment_index,
                        fraction: before.fraction(),
                    });
                    self.add_event(TourEvent::ProgressUpdated { percent: progress });
                    self.add_event(TourEvent::WaypointReached { waypoint_index, position });
                    self.check_landmarks(&position);
                    published = true;
                }
                StepOutcome::Completed => {
                    self.step_due = None;
                    self.elapsed_tick_due = None;
                    self.add_event(TourEvent::ProgressUpdated { percent: 100 });
                    self.add_event(TourEvent::RouteCompleted);
                    return true;
                }
            }
        }
    }

    fn check_landmarks(&mut self, position: &GeoPoint) {
        match self.tracker.visit_at(position) {
            Some(visit) => {
                self.add_event(TourEvent::LandmarkVisited {
                    landmark_index: visit.landmark_index,
                    name: visit.name,
                    remark: visit.remark,
                    next_landmark: visit.next_landmark,
                });
                if let Some(source) = visit.narration {
                    self.add_event(TourEvent::NarrationRequested {
                        landmark_index: visit.landmark_index,
                        source,
                    });
                }
            }
            None => self.add_event(TourEvent::MovingOn),
        }
    }
}

impl AggregateRoot for TourSimulator {
    type Event = TourEvent;

    fn aggregate_id(&self) -> &str {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }

    fn uncommitted_events(&self) -> &[Self::Event] {
        &self.uncommitted_events
    }

    fn take_uncommitted_events(&mut self) -> Vec<Self::Event> {
        std::mem::take(&mut self.uncommitted_events)
    }

    fn add_event(&mut self, event: Self::Event) {
        self.version += 1;
        self.uncommitted_events.push(event);
    }
}
