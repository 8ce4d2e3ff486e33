use crate::common::{DomainError, DomainResult};
use crate::domains::checkpoint::NarrationPlayer;
use crate::domains::logger::DynLogger;
use std::process::Stdio;
use tokio::process::Command;

/// Logs narration requests instead of playing them; used when no player is configured.
pub struct LoggingNarrationPlayer {
    logger: DynLogger,
}

impl LoggingNarrationPlayer {
    pub fn new(logger: DynLogger) -> Self {
        Self { logger }
    }
}

impl NarrationPlayer for LoggingNarrationPlayer {
    fn play(&self, source: &str) -> DomainResult<()> {
        self.logger.info(&format!("Narration: {}", source));
        Ok(())
    }
}

/// Spawns an external audio program per narration and does not wait for it.
/// Must be used inside a tokio runtime.
pub struct CommandNarrationPlayer {
    program: String,
}

impl CommandNarrationPlayer {
    pub fn new(program: impl Into<String>) -> Self {
        Self { program: program.into() }
    }
}

impl NarrationPlayer for CommandNarrationPlayer {
    fn play(&self, source: &str) -> DomainResult<()> {
        let mut child = Command::new(&self.program)
            .arg(source)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| DomainError::InfrastructureError(format!("Failed to start {}: {}", self.program, e)))?;

        tokio::spawn(async move {
            let _ = child.wait().await;
        });
        Ok(())
    }
}
