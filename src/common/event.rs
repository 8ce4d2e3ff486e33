use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub trait DomainEvent: Send + Sync + Clone {
    fn event_type(&self) -> &'static str;
}

/// Serialized form of a domain event as handed to outbound sinks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventEnvelope {
    pub event_id: Uuid,
    pub aggregate_id: String,
    pub aggregate_type: String,
    pub event_type: String,
    pub sequence: u64,
    /// Simulated milliseconds since the simulator was created.
    pub sim_time_ms: u64,
    pub event_data: serde_json::Value,
    pub occurred_at: DateTime<Utc>,
}

impl EventEnvelope {
    pub fn new<E: DomainEvent + Serialize>(
        event: &E,
        aggregate_id: &str,
        aggregate_type: &str,
        sequence: u64,
        sim_time_ms: u64,
    ) -> Result<Self, serde_json::Error> {
        Ok(Self {
            event_id: Uuid::new_v4(),
            aggregate_id: aggregate_id.to_string(),
            aggregate_type: aggregate_type.to_string(),
            event_type: event.event_type().to_string(),
            sequence,
            sim_time_ms,
            event_data: serde_json::to_value(event)?,
            occurred_at: Utc::now(),
        })
    }
}
