use crate::common::{DomainResult, EventEnvelope};
use crate::domains::logger::DynLogger;
use crate::domains::tour::{TourDashboard, TourEvent, TourEventSink};
use async_trait::async_trait;
use tokio::sync::Mutex;

/// Renders the dashboard as log lines.
///
/// Per-step movement only prints when progress crosses a 10% mark; every
/// other status change prints immediately.
pub struct ConsoleDashboardSink {
    dashboard: Mutex<TourDashboard>,
    logger: DynLogger,
}

impl ConsoleDashboardSink {
    pub fn new(initial: TourDashboard, logger: DynLogger) -> Self {
        Self { dashboard: Mutex::new(initial), logger }
    }
}

#[async_trait]
impl TourEventSink for ConsoleDashboardSink {
    async fn publish(&self, _envelope: &EventEnvelope, event: &TourEvent) -> DomainResult<()> {
        let mut dashboard = self.dashboard.lock().await;
        let previous_decile = dashboard.progress_percent / 10;
        let previous_status = dashboard.status.clone();
        dashboard.apply_event(event);

        match event {
            TourEvent::LightChanged { name, state, .. } => {
                tracing::debug!("Light {} is now {}", name, state.as_str());
            }
            TourEvent::ElapsedTicked { .. } | TourEvent::VehicleMoved { .. } => {}
            TourEvent::ProgressUpdated { percent } => {
                if percent / 10 != previous_decile {
                    self.logger.info(&dashboard.summary_line());
                }
            }
            TourEvent::LandmarkVisited { .. } => {
                self.logger.info(&dashboard.summary_line());
                self.logger.info(&format!("  {} | {}", dashboard.current_line(), dashboard.next_line()));
            }
            TourEvent::SpeedChanged { speed } => {
                self.logger.info(&format!("Speed: {}", speed.label()));
            }
            TourEvent::NarrationToggled { enabled } => {
                self.logger.info(&format!("Narration {}", if *enabled { "on" } else { "off" }));
            }
            _ => {
                if dashboard.status != previous_status {
                    self.logger.info(&dashboard.summary_line());
                }
            }
        }
        Ok(())
    }
}
