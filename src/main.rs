use route_tour::adapters::inbound::stdin_controls::{spawn_stdin_controls, CONTROLS_HELP};
use route_tour::adapters::outbound::{
    init_domain_logger, init_tracing, CommandNarrationPlayer, ConsoleDashboardSink, FilesystemRouteSource,
    JsonLinesEventSink, LoggingNarrationPlayer,
};
use route_tour::application::{build_simulator, launch};
use route_tour::domains::checkpoint::NarrationPlayer;
use route_tour::domains::tour::{TourDashboard, TourEventSink, TourState};
use route_tour::Config;
use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

const DEFAULT_CONFIG_PATH: &str = "tour.toml";

/// `ROUTE_TOUR_CONFIG`, then the first argument, then `tour.toml`.
fn config_path() -> PathBuf {
    std::env::var("ROUTE_TOUR_CONFIG")
        .ok()
        .or_else(|| std::env::args().nth(1))
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let path = config_path();
    let config = Config::load(&path)?;
    init_tracing(&config.logging.level);

    info!("Starting route tour from {}", path.display());
    let logger = init_domain_logger(&config.logging);

    let source = FilesystemRouteSource::beside(&path);
    let simulator = build_simulator(&config, &source)?;
    info!(
        "Route loaded: {} waypoints, {} landmarks, {} traffic lights",
        simulator.engine().route().len(),
        simulator.tracker().landmarks().len(),
        simulator.lights().lights().len()
    );
    if let Some(heading) = simulator.heading() {
        logger.info(heading);
    }

    let mut sinks: Vec<Arc<dyn TourEventSink>> = vec![Arc::new(ConsoleDashboardSink::new(
        TourDashboard::for_simulator(&simulator),
        logger.clone(),
    ))];
    if let Some(event_log) = &config.runtime.event_log {
        info!("Writing tour events to {}", event_log);
        sinks.push(Arc::new(JsonLinesEventSink::new(event_log)));
    }

    let narration: Arc<dyn NarrationPlayer> = match &config.runtime.narration_command {
        Some(program) => Arc::new(CommandNarrationPlayer::new(program.clone())),
        None => Arc::new(LoggingNarrationPlayer::new(logger.clone())),
    };

    let mut app = launch(simulator, sinks, narration, logger.clone(), config.runtime.channel_capacity);

    logger.info(CONTROLS_HELP);
    spawn_stdin_controls(app.service.commands(), logger.clone())?;

    if config.runtime.autostart {
        app.service.start().await?;
    }

    tokio::select! {
        result = app.handle.wait_for(TourState::Completed), if config.runtime.exit_on_complete => {
            if let Err(e) = result {
                error!("Tour stopped unexpectedly: {}", e);
            }
        }
        signal = tokio::signal::ctrl_c() => {
            signal?;
            info!("Interrupted");
        }
    }

    let (_, dashboard) = app.shutdown().await?;
    logger.info(&dashboard.summary_line());

    // Give the buffered logger a moment to drain.
    tokio::time::sleep(Duration::from_millis(50)).await;
    info!("Route tour stopped");
    Ok(())
}
