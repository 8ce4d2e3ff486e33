use crate::common::{AggregateRoot, ApplicationError, ApplicationResult, EventEnvelope};
use crate::domains::checkpoint::NarrationPlayer;
use crate::domains::logger::DynLogger;
use crate::domains::tour::{
    format_elapsed, TourCommand, TourCommandActor, TourEvent, TourEventSink, TourSimulator, TourState,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::Instant;

pub const AGGREGATE_TYPE: &str = "RouteTour";

/// Owns a `TourSimulator` on a tokio task and maps virtual milliseconds onto
/// `tokio::time`. Commands and timers are applied one at a time, so the
/// simulator never needs a lock.
pub struct TourRuntime {
    simulator: TourSimulator,
    commands: mpsc::Receiver<TourCommand>,
    sinks: Vec<Arc<dyn TourEventSink>>,
    narration: Arc<dyn NarrationPlayer>,
    logger: DynLogger,
    state: watch::Sender<TourState>,
}

/// Control side of a spawned runtime.
pub struct TourHandle {
    commands: TourCommandActor,
    state: watch::Receiver<TourState>,
    shutdown: oneshot::Sender<()>,
    task: JoinHandle<TourSimulator>,
}

impl TourRuntime {
    pub fn spawn(
        simulator: TourSimulator,
        sinks: Vec<Arc<dyn TourEventSink>>,
        narration: Arc<dyn NarrationPlayer>,
        logger: DynLogger,
        command_capacity: usize,
    ) -> TourHandle {
        let (command_sender, commands) = mpsc::channel(command_capacity);
        let (state, state_receiver) = watch::channel(simulator.state());
        let (shutdown, shutdown_receiver) = oneshot::channel();

        let runtime = Self { simulator, commands, sinks, narration, logger, state };
        let task = tokio::spawn(runtime.run(shutdown_receiver));

        TourHandle {
            commands: TourCommandActor::new(command_sender),
            state: state_receiver,
            shutdown,
            task,
        }
    }

    async fn run(mut self, mut shutdown: oneshot::Receiver<()>) -> TourSimulator {
        let origin = Instant::now();
        self.dispatch().await;

        loop {
            let deadline = self.simulator.next_deadline();
            let wake_at = origin + Duration::from_millis(deadline.unwrap_or_else(|| self.simulator.now_ms()));

            tokio::select! {
                _ = &mut shutdown => break,
                command = self.commands.recv() => match command {
                    Some(command) => {
                        self.simulator.advance_to(elapsed_ms(origin));
                        tracing::debug!("Tour command: {}", command.name());
                        self.simulator.handle(command);
                    }
                    None => break,
                },
                _ = tokio::time::sleep_until(wake_at), if deadline.is_some() => {
                    self.simulator.advance_to(elapsed_ms(origin));
                }
            }

            self.dispatch().await;
        }

        tracing::debug!("Tour runtime for {} stopped", self.simulator.aggregate_id());
        self.simulator
    }

    /// Drain the simulator outbox to side effects and sinks, in order.
    async fn dispatch(&mut self) {
        let events = self.simulator.take_uncommitted_events();
        if events.is_empty() {
            return;
        }

        let first_sequence = self.simulator.version() - events.len() as u64 + 1;
        for (offset, event) in events.iter().enumerate() {
            self.react(event);

            let envelope = match EventEnvelope::new(
                event,
                self.simulator.aggregate_id(),
                AGGREGATE_TYPE,
                first_sequence + offset as u64,
                self.simulator.now_ms(),
            ) {
                Ok(envelope) => envelope,
                Err(e) => {
                    self.logger.error(&format!("Failed to wrap tour event: {}", e));
                    continue;
                }
            };

            for sink in &self.sinks {
                if let Err(e) = sink.publish(&envelope, event).await {
                    tracing::warn!("Tour event sink failed: {}", e);
                }
            }
        }

        let current = self.simulator.state();
        self.state.send_if_modified(|state| {
            let changed = *state != current;
            *state = current;
            changed
        });
    }

    fn react(&self, event: &TourEvent) {
        match event {
            TourEvent::NarrationRequested { source, .. } => {
                if let Err(e) = self.narration.play(source) {
                    self.logger.warn(&format!("Narration skipped: {}", e));
                }
            }
            TourEvent::LandmarkVisited { name, .. } => {
                self.logger.info(&format!("Reached {}", name));
            }
            TourEvent::HeldAtLight { light_name, light_state, .. } => {
                tracing::debug!("Held at {} ({})", light_name, light_state.as_str());
            }
            TourEvent::RouteCompleted => {
                self.logger.info(&format!(
                    "Route completed in {}",
                    format_elapsed(self.simulator.elapsed_seconds())
                ));
            }
            _ => {}
        }
    }
}

fn elapsed_ms(origin: Instant) -> u64 {
    u64::try_from(origin.elapsed().as_millis()).unwrap_or(u64::MAX)
}

impl TourHandle {
    pub fn commands(&self) -> TourCommandActor {
        self.commands.clone()
    }

    pub fn state(&self) -> TourState {
        *self.state.borrow()
    }

    /// Wait until the tour reaches `target`.
    pub async fn wait_for(&mut self, target: TourState) -> ApplicationResult<()> {
        self.state
            .wait_for(|state| *state == target)
            .await
            .map(|_| ())
            .map_err(|_| ApplicationError::Channel("tour runtime stopped".to_string()))
    }

    /// Stop the runtime and hand back the simulator in its final state.
    pub async fn shutdown(self) -> ApplicationResult<TourSimulator> {
        let _ = self.shutdown.send(());
        self.task
            .await
            .map_err(|e| ApplicationError::Channel(format!("tour runtime task failed: {}", e)))
    }
}
