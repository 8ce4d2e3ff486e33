use crate::common::{ApplicationError, ApplicationResult};
use crate::domains::tour::{Speed, TourCommandActor, TourDashboard};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Playback controls plus read access to the dashboard projection.
pub struct TourService {
    command_actor: TourCommandActor,
    dashboard: Arc<RwLock<TourDashboard>>,
}

impl TourService {
    pub fn new(command_actor: TourCommandActor, dashboard: Arc<RwLock<TourDashboard>>) -> Self {
        Self { command_actor, dashboard }
    }

    pub async fn start(&self) -> ApplicationResult<()> {
        self.command_actor.start().await.map_err(ApplicationError::Channel)
    }

    pub async fn stop(&self) -> ApplicationResult<()> {
        self.command_actor.stop().await.map_err(ApplicationError::Channel)
    }

    pub async fn previous(&self) -> ApplicationResult<()> {
        self.command_actor.previous().await.map_err(ApplicationError::Channel)
    }

    pub async fn reset(&self) -> ApplicationResult<()> {
        self.command_actor.reset().await.map_err(ApplicationError::Channel)
    }

    pub async fn set_speed(&self, speed: Speed) -> ApplicationResult<()> {
        self.command_actor.set_speed(speed).await.map_err(ApplicationError::Channel)
    }

    pub async fn set_narration(&self, enabled: bool) -> ApplicationResult<()> {
        self.command_actor.set_narration(enabled).await.map_err(ApplicationError::Channel)
    }

    pub fn commands(&self) -> TourCommandActor {
        self.command_actor.clone()
    }

    pub async fn dashboard(&self) -> TourDashboard {
        self.dashboard.read().await.clone()
    }
}
