use route_tour::common::AggregateRoot;
use route_tour::domains::checkpoint::LandmarkSpec;
use route_tour::domains::route::{GeoPoint, MapView, Route};
use route_tour::domains::tour::*;
use route_tour::domains::traffic_light::{LightCycle, LightState, TrafficLightSpec};

const LINE: [[f64; 2]; 3] = [[0.0, 0.0], [0.0, 1.0], [0.0, 2.0]];

fn setup(points: &[[f64; 2]], landmarks: Vec<LandmarkSpec>, traffic_lights: Vec<TrafficLightSpec>) -> TourSetup {
    let route = Route::new(points.iter().copied().map(GeoPoint::from).collect()).unwrap();
    TourSetup {
        heading: Some("Test drive".to_string()),
        initial_view: MapView::fit(&route),
        route,
        landmarks,
        traffic_lights,
        audio_base_path: "audio/".to_string(),
    }
}

fn simulator(setup: TourSetup, speed: Speed) -> TourSimulator {
    TourSimulator::new("tour-1", setup, SimulationSettings { speed, narration_enabled: true }).unwrap()
}

fn landmark(name: &str, at: [f64; 2]) -> LandmarkSpec {
    LandmarkSpec {
        coords: GeoPoint::from(at),
        name: name.to_string(),
        remark: format!("This is {}.", name),
        audio_id: Some(name.to_lowercase()),
    }
}

/// Fire timers one deadline at a time until the tour completes.
fn run_to_completion(sim: &mut TourSimulator) -> Vec<TourEvent> {
    let mut events = sim.take_uncommitted_events();
    for _ in 0..100_000 {
        if sim.state() == TourState::Completed {
            break;
        }
        let Some(deadline) = sim.next_deadline() else { break };
        sim.advance_to(deadline);
        events.extend(sim.take_uncommitted_events());
    }
    events
}

fn count(events: &[TourEvent], predicate: impl Fn(&TourEvent) -> bool) -> usize {
    events.iter().filter(|e| predicate(e)).count()
}

#[test]
fn test_three_waypoint_route_completes() {
    let mut sim = simulator(setup(&LINE, vec![], vec![]), Speed::Normal);
    sim.handle(TourCommand::Start);
    assert_eq!(sim.state(), TourState::Running);

    let events = run_to_completion(&mut sim);

    assert_eq!(sim.state(), TourState::Completed);
    assert_eq!(sim.engine().progress(), 100);
    assert_eq!(sim.position(), GeoPoint::new(0.0, 2.0));
    assert_eq!(count(&events, |e| matches!(e, TourEvent::WaypointReached { .. })), 2);
    assert_eq!(
        events.iter().rev().take(2).cloned().collect::<Vec<_>>(),
        vec![TourEvent::RouteCompleted, TourEvent::ProgressUpdated { percent: 100 }]
    );
    assert_eq!(sim.now_ms(), 11_760);
    assert_eq!(sim.elapsed_seconds(), 11);
    assert_eq!(sim.next_deadline(), None);
    assert_eq!(sim.version(), events.len() as u64);
}

#[test]
fn test_segment_indices_visited_in_order() {
    let mut sim = simulator(setup(&LINE, vec![], vec![]), Speed::Fast);
    sim.handle(TourCommand::Start);
    let events = run_to_completion(&mut sim);

    let mut segments: Vec<usize> = events
        .iter()
        .filter_map(|e| match e {
            TourEvent::VehicleMoved { segment_index, .. } => Some(*segment_index),
            _ => None,
        })
        .collect();
    segments.dedup();
    assert_eq!(segments, vec![0, 1]);

    let reached: Vec<usize> = events
        .iter()
        .filter_map(|e| match e {
            TourEvent::WaypointReached { waypoint_index, .. } => Some(*waypoint_index),
            _ => None,
        })
        .collect();
    assert_eq!(reached, vec![1, 2]);
}

#[test]
fn test_progress_never_decreases_during_a_run() {
    let mut sim = simulator(setup(&[[0.0, 0.0], [0.0, 0.3], [0.1, 0.3], [0.1, 0.9]], vec![], vec![]), Speed::Fast);
    sim.handle(TourCommand::Start);
    let events = run_to_completion(&mut sim);

    let percents: Vec<u8> = events
        .iter()
        .filter_map(|e| match e {
            TourEvent::ProgressUpdated { percent } => Some(*percent),
            _ => None,
        })
        .collect();
    assert!(!percents.is_empty());
    assert!(percents.windows(2).all(|w| w[0] <= w[1]));
    assert!(percents.iter().all(|p| *p <= 100));
    assert_eq!(percents.last(), Some(&100));
}

#[test]
fn test_vehicle_waits_at_light_until_green() {
    let light = TrafficLightSpec {
        coords: GeoPoint::new(0.0, 1.0),
        name: "Main St".to_string(),
        cycle: LightCycle { green: 2, amber: 1, red: 2 },
        offset: 0,
    };
    let waypoint = GeoPoint::new(0.0, 1.0);
    let mut sim = simulator(setup(&LINE, vec![], vec![light]), Speed::Slow);
    sim.handle(TourCommand::Start);
    sim.take_uncommitted_events();

    let mut holds = 0;
    let mut departures = 0;
    for _ in 0..100_000 {
        if sim.state() == TourState::Completed {
            break;
        }
        let deadline = sim.next_deadline().unwrap();
        sim.advance_to(deadline);
        let tick = sim.lights().elapsed_ticks();

        for event in sim.take_uncommitted_events() {
            match event {
                TourEvent::HeldAtLight { light_state, .. } => {
                    holds += 1;
                    assert!(tick % 5 >= 2, "held on green at tick {}", tick);
                    assert_ne!(light_state, LightState::Green);
                    assert_eq!(sim.position(), waypoint);
                }
                TourEvent::VehicleMoved { position, .. } if position == waypoint => {
                    departures += 1;
                    assert!(tick % 5 < 2, "left the light at tick {}", tick);
                }
                _ => {}
            }
        }
    }

    assert_eq!(sim.state(), TourState::Completed);
    assert_eq!(departures, 1);
    // Slow speed arrives at 8.82 s, during red; green returns at tick 10.
    assert_eq!(holds, 3);
}

#[test]
fn test_light_ticker_runs_before_start() {
    let light = TrafficLightSpec {
        coords: GeoPoint::new(5.0, 5.0),
        name: "Far away".to_string(),
        cycle: LightCycle { green: 2, amber: 1, red: 2 },
        offset: 0,
    };
    let mut sim = simulator(setup(&LINE, vec![], vec![light]), Speed::Normal);
    assert_eq!(sim.next_deadline(), Some(1000));

    sim.advance_by(3000);
    assert_eq!(sim.lights().elapsed_ticks(), 3);
    assert_eq!(sim.state(), TourState::Idle);
    assert_eq!(sim.elapsed_seconds(), 0);
    assert_eq!(
        sim.take_uncommitted_events(),
        vec![
            TourEvent::LightChanged { light_index: 0, name: "Far away".to_string(), state: LightState::Amber },
            TourEvent::LightChanged { light_index: 0, name: "Far away".to_string(), state: LightState::Red },
        ]
    );
}

#[test]
fn test_previous_at_start_changes_nothing() {
    let mut sim = simulator(setup(&LINE, vec![], vec![]), Speed::Normal);
    sim.handle(TourCommand::Previous);
    assert_eq!(sim.take_uncommitted_events(), vec![TourEvent::AlreadyAtStart]);
    assert_eq!(sim.state(), TourState::Idle);

    sim.handle(TourCommand::Start);
    sim.advance_by(500);
    let before = sim.position();
    let movement = sim.engine().movement();
    sim.take_uncommitted_events();

    sim.handle(TourCommand::Previous);
    assert_eq!(
        sim.take_uncommitted_events(),
        vec![TourEvent::TourPaused, TourEvent::AlreadyAtStart]
    );
    assert_eq!(sim.position(), before);
    assert_eq!(sim.engine().movement(), movement);
    assert_eq!(sim.state(), TourState::Paused);
    assert!(!sim.has_pending_step());

    let mut dashboard = TourDashboard::for_simulator(&sim);
    dashboard.apply_event(&TourEvent::AlreadyAtStart);
    assert_eq!(dashboard.status, STATUS_AT_START);
}

#[test]
fn test_previous_snaps_back_without_revisiting_landmarks() {
    let mut sim = simulator(setup(&LINE, vec![landmark("Museum", [0.0, 1.0])], vec![]), Speed::Normal);
    sim.handle(TourCommand::Start);
    sim.advance_by(7_000);
    assert_eq!(sim.engine().movement().segment_index, 1);
    assert_eq!(sim.tracker().visited_count(), 1);
    sim.take_uncommitted_events();

    sim.handle(TourCommand::Previous);
    let events = sim.take_uncommitted_events();
    assert_eq!(
        events,
        vec![
            TourEvent::TourPaused,
            TourEvent::MovedToPrevious { segment_index: 0, position: GeoPoint::new(0.0, 0.0), percent: 0 },
        ]
    );
    assert_eq!(sim.state(), TourState::Paused);

    // Resuming from segment 0 starts a fresh run and clears checkpoints.
    sim.handle(TourCommand::Start);
    let events = sim.take_uncommitted_events();
    assert!(events.contains(&TourEvent::TourStarted { resumed: false }));
    assert_eq!(sim.tracker().visited_count(), 0);
}

#[test]
fn test_reset_while_running_returns_to_idle() {
    let mut sim = simulator(setup(&LINE, vec![landmark("Museum", [0.0, 1.0])], vec![]), Speed::Normal);
    let mut dashboard = TourDashboard::for_simulator(&sim);
    sim.handle(TourCommand::Start);
    sim.advance_by(7_000);
    assert_eq!(sim.tracker().visited_count(), 1);
    assert_eq!(sim.elapsed_seconds(), 7);

    sim.handle(TourCommand::Reset);

    assert_eq!(sim.state(), TourState::Idle);
    assert_eq!(sim.position(), GeoPoint::new(0.0, 0.0));
    assert_eq!(sim.elapsed_seconds(), 0);
    assert_eq!(sim.tracker().visited_count(), 0);
    assert!(!sim.has_pending_step());
    assert_eq!(sim.next_deadline(), None);

    for event in sim.take_uncommitted_events() {
        dashboard.apply_event(&event);
    }
    assert_eq!(dashboard.state, TourState::Idle);
    assert_eq!(dashboard.elapsed_display(), "00:00");
    assert_eq!(dashboard.progress_percent, 0);
    assert_eq!(dashboard.checkpoints_done(), 0);
    assert_eq!(dashboard.status, STATUS_RESET);
    assert_eq!(dashboard.next_line(), "Next: Museum");

    sim.advance_by(5_000);
    assert_eq!(sim.position(), GeoPoint::new(0.0, 0.0));
    assert!(sim.take_uncommitted_events().is_empty());
}

#[test]
fn test_stop_freezes_position_and_start_resumes() {
    let mut sim = simulator(setup(&LINE, vec![], vec![]), Speed::Normal);
    sim.handle(TourCommand::Stop);
    assert!(sim.take_uncommitted_events().is_empty());

    sim.handle(TourCommand::Start);
    sim.advance_by(7_000);
    sim.handle(TourCommand::Stop);
    let paused_at = sim.position();
    let elapsed = sim.elapsed_seconds();
    assert_eq!(sim.take_uncommitted_events().last(), Some(&TourEvent::TourPaused));

    sim.advance_by(10_000);
    assert_eq!(sim.position(), paused_at);
    assert_eq!(sim.elapsed_seconds(), elapsed);

    let paused_movement = sim.engine().movement();
    sim.handle(TourCommand::Start);
    let events = sim.take_uncommitted_events();
    assert_eq!(events[0], TourEvent::TourStarted { resumed: true });
    assert_eq!(
        events[1],
        TourEvent::VehicleMoved {
            position: paused_at,
            segment_index: 1,
            fraction: paused_movement.fraction(),
        }
    );

    sim.handle(TourCommand::Start);
    assert!(sim.take_uncommitted_events().is_empty());
}

#[test]
fn test_start_after_stop_in_first_segment_restarts_it() {
    let mut sim = simulator(setup(&LINE, vec![landmark("Museum", [0.0, 1.0])], vec![]), Speed::Normal);
    sim.handle(TourCommand::Start);
    sim.advance_by(3_000);
    sim.handle(TourCommand::Stop);
    assert_eq!(sim.engine().movement().segment_index, 0);
    assert!(sim.engine().progress() > 0);
    sim.take_uncommitted_events();

    sim.handle(TourCommand::Start);
    let events = sim.take_uncommitted_events();

    assert_eq!(sim.engine().movement(), MovementState { segment_index: 0, step: 1 });
    assert_eq!(events[1..], [
        TourEvent::ElapsedReset,
        TourEvent::TourStarted { resumed: false },
        TourEvent::VehicleMoved { position: GeoPoint::new(0.0, 0.0), segment_index: 0, fraction: 0.0 },
        TourEvent::ProgressUpdated { percent: 0 },
    ]);
    assert!(matches!(events[0], TourEvent::CheckpointsCleared { .. }));
    assert_eq!(count(&events, |e| matches!(e, TourEvent::VehicleMoved { .. })), 1);
    assert_eq!(sim.elapsed_seconds(), 0);
}

#[test]
fn test_single_waypoint_route_completes_on_start() {
    let mut sim = simulator(setup(&[[51.5, -0.12]], vec![landmark("Here", [51.5, -0.12])], vec![]), Speed::Normal);
    sim.handle(TourCommand::Start);

    assert_eq!(sim.state(), TourState::Completed);
    assert_eq!(sim.engine().progress(), 100);
    assert_eq!(sim.next_deadline(), None);
    let events = sim.take_uncommitted_events();
    assert!(events.contains(&TourEvent::ProgressUpdated { percent: 100 }));
    assert_eq!(events.last(), Some(&TourEvent::RouteCompleted));
}

#[test]
fn test_start_after_completion_runs_again() {
    let mut sim = simulator(setup(&LINE, vec![landmark("Museum", [0.0, 1.0])], vec![]), Speed::Fast);
    sim.handle(TourCommand::Start);
    run_to_completion(&mut sim);
    assert_eq!(sim.tracker().visited_count(), 1);

    sim.handle(TourCommand::Start);
    let events = sim.take_uncommitted_events();
    assert_eq!(sim.state(), TourState::Running);
    assert_eq!(sim.engine().movement().segment_index, 0);
    assert_eq!(sim.tracker().visited_count(), 0);
    assert!(events.contains(&TourEvent::ElapsedReset));
    assert!(events.contains(&TourEvent::TourStarted { resumed: false }));
}

#[test]
fn test_speed_change_applies_to_next_scheduled_step() {
    let mut sim = simulator(setup(&LINE, vec![], vec![]), Speed::Normal);
    sim.handle(TourCommand::Start);
    assert_eq!(sim.next_deadline(), Some(120));

    sim.advance_to(120);
    sim.handle(TourCommand::SetSpeed(Speed::Slow));
    assert_eq!(sim.next_deadline(), Some(240));
    sim.advance_to(240);
    assert_eq!(sim.next_deadline(), Some(420));

    sim.handle(TourCommand::SetSpeed(Speed::Fast));
    sim.advance_to(420);
    assert_eq!(sim.next_deadline(), Some(480));
    assert!(sim
        .take_uncommitted_events()
        .contains(&TourEvent::SpeedChanged { speed: Speed::Fast }));
}

#[test]
fn test_narration_follows_voice_toggle() {
    let landmarks = vec![landmark("Museum", [0.0, 1.0]), landmark("Park", [0.0, 2.0])];

    let mut sim = simulator(setup(&LINE, landmarks.clone(), vec![]), Speed::Fast);
    sim.handle(TourCommand::Start);
    let events = run_to_completion(&mut sim);
    let sources: Vec<String> = events
        .iter()
        .filter_map(|e| match e {
            TourEvent::NarrationRequested { source, .. } => Some(source.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(sources, vec!["audio/museum.mp3".to_string(), "audio/park.mp3".to_string()]);

    let mut quiet = simulator(setup(&LINE, landmarks, vec![]), Speed::Fast);
    quiet.handle(TourCommand::SetNarration(false));
    quiet.handle(TourCommand::Start);
    let events = run_to_completion(&mut quiet);
    assert_eq!(count(&events, |e| matches!(e, TourEvent::LandmarkVisited { .. })), 2);
    assert_eq!(count(&events, |e| matches!(e, TourEvent::NarrationRequested { .. })), 0);
    assert!(events.contains(&TourEvent::NarrationToggled { enabled: false }));
}

#[test]
fn test_dashboard_follows_a_full_run() {
    let landmarks = vec![landmark("Museum", [0.0, 1.0]), landmark("Park", [0.0, 2.0])];
    let mut sim = simulator(setup(&LINE, landmarks, vec![]), Speed::Normal);
    let mut dashboard = TourDashboard::for_simulator(&sim);
    assert_eq!(dashboard.status, STATUS_READY);
    assert_eq!(dashboard.current_line(), "Current: None yet, starting soon.");
    assert_eq!(dashboard.next_line(), "Next: Museum");

    sim.handle(TourCommand::Start);
    let events = sim.take_uncommitted_events();
    for event in &events {
        dashboard.apply_event(event);
    }
    assert_eq!(dashboard.status, STATUS_STARTING);

    sim.advance_by(6_000);
    for event in sim.take_uncommitted_events() {
        dashboard.apply_event(&event);
    }
    assert_eq!(dashboard.current_line(), "Current: Museum");
    assert_eq!(dashboard.next_line(), "Next: Park");
    assert_eq!(dashboard.last_narration.as_deref(), Some("audio/museum.mp3"));
    assert_eq!(dashboard.elapsed_display(), "00:06");

    for event in run_to_completion(&mut sim) {
        dashboard.apply_event(&event);
    }
    assert_eq!(dashboard.state, TourState::Completed);
    assert_eq!(dashboard.status, STATUS_COMPLETED);
    assert_eq!(dashboard.progress_percent, 100);
    assert_eq!(dashboard.checkpoints_done(), 2);
    assert_eq!(dashboard.next_line(), "Next: End of route.");
    assert_eq!(dashboard.position, GeoPoint::new(0.0, 2.0));
}
