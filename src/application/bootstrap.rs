use super::runtime::{TourHandle, TourRuntime};
use super::tour_service::TourService;
use crate::common::ApplicationResult;
use crate::config::Config;
use crate::domains::checkpoint::NarrationPlayer;
use crate::domains::logger::DynLogger;
use crate::domains::route::RouteDataSource;
use crate::domains::tour::{ChannelEventSink, TourDashboard, TourEventActor, TourEventSink, TourSimulator};
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};
use tokio::task::JoinHandle;

/// A running tour: runtime, projection actor and the service in front of them.
pub struct TourApp {
    pub handle: TourHandle,
    pub service: TourService,
    dashboard: Arc<RwLock<TourDashboard>>,
    projector: JoinHandle<()>,
}

pub fn build_simulator(config: &Config, source: &dyn RouteDataSource) -> ApplicationResult<TourSimulator> {
    let setup = config.tour.to_setup(source)?;
    let simulator = TourSimulator::new(config.runtime.tour_id.clone(), setup, config.simulation)?;
    Ok(simulator)
}

/// Spawn the runtime and the dashboard projection for `simulator`.
///
/// The projection is fed first; `extra_sinks` receive events after it.
pub fn launch(
    simulator: TourSimulator,
    extra_sinks: Vec<Arc<dyn TourEventSink>>,
    narration: Arc<dyn NarrationPlayer>,
    logger: DynLogger,
    channel_capacity: usize,
) -> TourApp {
    let (event_sender, event_receiver) = mpsc::channel(channel_capacity);
    let mut projector_actor = TourEventActor::new(TourDashboard::for_simulator(&simulator), event_receiver);
    let dashboard = projector_actor.dashboard_handle();
    let projector = tokio::spawn(async move { projector_actor.run().await });

    let mut sinks: Vec<Arc<dyn TourEventSink>> = vec![Arc::new(ChannelEventSink::new(event_sender))];
    sinks.extend(extra_sinks);

    let handle = TourRuntime::spawn(simulator, sinks, narration, logger, channel_capacity);
    let service = TourService::new(handle.commands(), dashboard.clone());

    TourApp { handle, service, dashboard, projector }
}

impl TourApp {
    /// Stop the runtime, let the projection drain, and return both final states.
    pub async fn shutdown(self) -> ApplicationResult<(TourSimulator, TourDashboard)> {
        let simulator = self.handle.shutdown().await?;
        // The runtime owned the only event sender; the projector ends once drained.
        finish_projector(self.projector).await;
        let dashboard = self.dashboard.read().await.clone();
        Ok((simulator, dashboard))
    }
}

/// Wait for the projection task; returns false when it panicked or was cancelled.
async fn finish_projector(projector: JoinHandle<()>) -> bool {
    match projector.await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!("Dashboard projection ended abnormally: {}", e);
            false
        }
    }
}
