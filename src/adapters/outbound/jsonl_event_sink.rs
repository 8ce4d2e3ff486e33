use crate::common::{DomainError, DomainResult, EventEnvelope};
use crate::domains::tour::{TourEvent, TourEventSink};
use async_trait::async_trait;
use std::path::PathBuf;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;

/// Appends every envelope to a JSON Lines file, one object per line.
///
/// Lets an external viewer replay or animate the tour.
pub struct JsonLinesEventSink {
    path: PathBuf,
}

impl JsonLinesEventSink {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    async fn ensure_parent_dir(&self) -> DomainResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| DomainError::InfrastructureError(format!("Failed to create {}: {}", parent.display(), e)))?;
        }
        Ok(())
    }
}

#[async_trait]
impl TourEventSink for JsonLinesEventSink {
    async fn publish(&self, envelope: &EventEnvelope, _event: &TourEvent) -> DomainResult<()> {
        self.ensure_parent_dir().await?;

        let mut line = serde_json::to_string(envelope)?;
        line.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| DomainError::InfrastructureError(format!("Failed to open {}: {}", self.path.display(), e)))?;
        file.write_all(line.as_bytes())
            .await
            .map_err(|e| DomainError::InfrastructureError(format!("Failed to write event: {}", e)))?;
        file.flush()
            .await
            .map_err(|e| DomainError::InfrastructureError(format!("Failed to flush {}: {}", self.path.display(), e)))
    }
}
