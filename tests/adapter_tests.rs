use route_tour::adapters::outbound::{CommandNarrationPlayer, ConsoleDashboardSink, LoggingNarrationPlayer};
use route_tour::common::{DomainError, EventEnvelope};
use route_tour::domains::checkpoint::{LandmarkSpec, NarrationPlayer};
use route_tour::domains::logger::{DomainLogger, DynLogger};
use route_tour::domains::route::{GeoPoint, MapView, Route};
use route_tour::domains::tour::*;
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct CaptureLogger {
    lines: Mutex<Vec<String>>,
}

impl DomainLogger for CaptureLogger {
    fn info(&self, msg: &str) { self.lines.lock().unwrap().push(msg.to_string()); }
    fn warn(&self, msg: &str) { self.lines.lock().unwrap().push(format!("WARN {}", msg)); }
    fn error(&self, msg: &str) { self.lines.lock().unwrap().push(format!("ERROR {}", msg)); }
}

fn simulator() -> TourSimulator {
    let route = Route::new(vec![GeoPoint::new(0.0, 0.0), GeoPoint::new(0.0, 1.0)]).unwrap();
    let setup = TourSetup {
        heading: Some("Harbour loop".to_string()),
        initial_view: MapView::fit(&route),
        route,
        landmarks: vec![LandmarkSpec {
            coords: GeoPoint::new(0.0, 1.0),
            name: "Pier".to_string(),
            remark: "The old pier.".to_string(),
            audio_id: None,
        }],
        traffic_lights: Vec::new(),
        audio_base_path: "audio/".to_string(),
    };
    TourSimulator::new("tour-adapters", setup, SimulationSettings::default()).unwrap()
}

#[tokio::test]
async fn test_console_dashboard_prints_status_changes() {
    use route_tour::common::AggregateRoot;

    let capture = Arc::new(CaptureLogger::default());
    let mut sim = simulator();
    let sink = ConsoleDashboardSink::new(TourDashboard::for_simulator(&sim), capture.clone() as DynLogger);

    sim.handle(TourCommand::Start);
    sim.advance_by(10_000);
    for (sequence, event) in sim.take_uncommitted_events().iter().enumerate() {
        let envelope = EventEnvelope::new(event, "tour-adapters", "RouteTour", sequence as u64 + 1, 0).unwrap();
        sink.publish(&envelope, event).await.unwrap();
    }

    let lines = capture.lines.lock().unwrap();
    assert!(lines.iter().any(|l| l.ends_with(STATUS_STARTING)));
    assert!(lines.iter().any(|l| l.contains("Current: Pier") && l.contains("Next: End of route.")));
    assert!(lines.iter().any(|l| l.ends_with(STATUS_COMPLETED)));
    // Ten progress deciles at most, plus the status lines.
    assert!(lines.len() < 20, "too chatty: {:?}", lines);
}

#[test]
fn test_logging_narration_player_logs_source() {
    let capture = Arc::new(CaptureLogger::default());
    let player = LoggingNarrationPlayer::new(capture.clone() as DynLogger);

    player.play("audio/pier.mp3").unwrap();
    assert_eq!(*capture.lines.lock().unwrap(), vec!["Narration: audio/pier.mp3".to_string()]);
}

#[tokio::test]
async fn test_missing_narration_program_is_an_error() {
    let player = CommandNarrationPlayer::new("route-tour-no-such-player");
    assert!(matches!(player.play("audio/pier.mp3"), Err(DomainError::InfrastructureError(_))));
}
