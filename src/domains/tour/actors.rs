use super::aggregate::Speed;
use super::commands::TourCommand;
use super::events::TourEvent;
use super::ports::TourEventSink;
use super::projections::TourDashboard;
use crate::common::{DomainError, DomainEvent, DomainResult, EventEnvelope};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};

/// Actor that keeps the dashboard projection up to date
pub struct TourEventActor {
    dashboard: Arc<RwLock<TourDashboard>>,
    event_receiver: mpsc::Receiver<TourEvent>,
}

impl TourEventActor {
    pub fn new(initial: TourDashboard, event_receiver: mpsc::Receiver<TourEvent>) -> Self {
        Self {
            dashboard: Arc::new(RwLock::new(initial)),
            event_receiver,
        }
    }

    /// Shared handle to the projection, readable while the actor runs.
    pub fn dashboard_handle(&self) -> Arc<RwLock<TourDashboard>> {
        self.dashboard.clone()
    }

    pub async fn run(&mut self) {
        while let Some(event) = self.event_receiver.recv().await {
            self.handle_event(&event).await;
        }
    }

    async fn handle_event(&self, event: &TourEvent) {
        let mut dashboard = self.dashboard.write().await;
        dashboard.apply_event(event);
        tracing::trace!("Projected tour event: {}", event.event_type());
    }

    pub async fn dashboard(&self) -> TourDashboard {
        self.dashboard.read().await.clone()
    }
}

/// Forwards events into the channel feeding a `TourEventActor`.
pub struct ChannelEventSink {
    sender: mpsc::Sender<TourEvent>,
}

impl ChannelEventSink {
    pub fn new(sender: mpsc::Sender<TourEvent>) -> Self {
        Self { sender }
    }
}

#[async_trait]
impl TourEventSink for ChannelEventSink {
    async fn publish(&self, _envelope: &EventEnvelope, event: &TourEvent) -> DomainResult<()> {
        self.sender
            .send(event.clone())
            .await
            .map_err(|e| DomainError::InfrastructureError(format!("Failed to forward event: {}", e)))
    }
}

/// Actor front for the playback controls
#[derive(Clone)]
pub struct TourCommandActor {
    command_sender: mpsc::Sender<TourCommand>,
}

impl TourCommandActor {
    pub fn new(command_sender: mpsc::Sender<TourCommand>) -> Self {
        Self { command_sender }
    }

    pub async fn send(&self, command: TourCommand) -> Result<(), String> {
        self.command_sender
            .send(command)
            .await
            .map_err(|e| format!("Failed to send {} command: {}", command.name(), e))
    }

    /// For callers on plain threads; panics inside an async context.
    pub fn blocking_send(&self, command: TourCommand) -> Result<(), String> {
        self.command_sender
            .blocking_send(command)
            .map_err(|e| format!("Failed to send {} command: {}", command.name(), e))
    }

    pub async fn start(&self) -> Result<(), String> {
        self.send(TourCommand::Start).await
    }

    pub async fn stop(&self) -> Result<(), String> {
        self.send(TourCommand::Stop).await
    }

    pub async fn previous(&self) -> Result<(), String> {
        self.send(TourCommand::Previous).await
    }

    pub async fn reset(&self) -> Result<(), String> {
        self.send(TourCommand::Reset).await
    }

    pub async fn set_speed(&self, speed: Speed) -> Result<(), String> {
        self.send(TourCommand::SetSpeed(speed)).await
    }

    pub async fn set_narration(&self, enabled: bool) -> Result<(), String> {
        self.send(TourCommand::SetNarration(enabled)).await
    }
}
