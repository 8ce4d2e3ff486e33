use super::events::TourEvent;
use crate::common::{DomainResult, EventEnvelope};
use async_trait::async_trait;

/// Presentation side of the tour: receives every event in order.
#[async_trait]
pub trait TourEventSink: Send + Sync {
    async fn publish(&self, envelope: &EventEnvelope, event: &TourEvent) -> DomainResult<()>;
}
