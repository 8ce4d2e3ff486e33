use crate::config::LoggingConfig;
use crate::domains::logger::{DomainLogger, DynLogger};
use chrono::Utc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

const DOMAIN_TARGET: &str = "route_tour::domain";

/// Install the tracing subscriber for runtime diagnostics.
///
/// `RUST_LOG` wins over the configured level. Only tracing is installed here;
/// the `log` facade stays free for the fast_log file logger.
pub fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let subscriber = tracing_subscriber::fmt().with_env_filter(filter).finish();
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        tracing::debug!("Tracing subscriber already installed");
    }
}

/// Forwards domain messages to the `log` facade.
struct LogFacadeLogger;

impl DomainLogger for LogFacadeLogger {
    fn info(&self, msg: &str) {
        log::info!(target: DOMAIN_TARGET, "{}", msg);
    }

    fn warn(&self, msg: &str) {
        log::warn!(target: DOMAIN_TARGET, "{}", msg);
    }

    fn error(&self, msg: &str) {
        log::error!(target: DOMAIN_TARGET, "{}", msg);
    }
}

/// Initialize fast_log with a file appender and return a logger writing through it.
pub fn init_file_logger(path: &str, level: log::LevelFilter) -> Result<DynLogger, String> {
    fast_log::init(fast_log::config::Config::new().file(path).level(level))
        .map_err(|e| format!("Failed to initialize fast_log: {}", e))?;
    Ok(Arc::new(LogFacadeLogger))
}

struct ConsoleLogger;

impl DomainLogger for ConsoleLogger {
    fn info(&self, msg: &str) {
        println!("{} {}", Utc::now().format("%H:%M:%S"), msg);
    }

    fn warn(&self, msg: &str) {
        println!("{} WARN {}", Utc::now().format("%H:%M:%S"), msg);
    }

    fn error(&self, msg: &str) {
        eprintln!("{} ERROR {}", Utc::now().format("%H:%M:%S"), msg);
    }
}

pub fn init_console_logger() -> DynLogger {
    Arc::new(ConsoleLogger)
}

struct NoopLogger;

impl DomainLogger for NoopLogger {
    fn info(&self, _msg: &str) {}
    fn warn(&self, _msg: &str) {}
    fn error(&self, _msg: &str) {}
}

/// Logger that discards everything; the default in tests.
pub fn init_noop_logger() -> DynLogger {
    Arc::new(NoopLogger)
}

/// Sends every message to each of its targets in order.
pub struct FanoutLogger {
    targets: Vec<DynLogger>,
}

impl FanoutLogger {
    pub fn new(targets: Vec<DynLogger>) -> Self {
        Self { targets }
    }
}

impl DomainLogger for FanoutLogger {
    fn info(&self, msg: &str) {
        self.targets.iter().for_each(|t| t.info(msg));
    }

    fn warn(&self, msg: &str) {
        self.targets.iter().for_each(|t| t.warn(msg));
    }

    fn error(&self, msg: &str) {
        self.targets.iter().for_each(|t| t.error(msg));
    }
}

#[derive(Clone, Copy)]
enum Level {
    Info,
    Warn,
    Error,
}

/// Non-blocking logger draining into an inner logger from a background task.
///
/// Messages that do not fit in the buffer are dropped and counted.
pub struct BufferedLogger {
    sender: mpsc::Sender<(Level, String)>,
    dropped: AtomicU64,
}

impl BufferedLogger {
    /// Must be called inside a tokio runtime.
    pub fn new(inner: DynLogger, capacity: usize) -> Self {
        let (sender, mut receiver) = mpsc::channel::<(Level, String)>(capacity);

        tokio::spawn(async move {
            while let Some((level, msg)) = receiver.recv().await {
                match level {
                    Level::Info => inner.info(&msg),
                    Level::Warn => inner.warn(&msg),
                    Level::Error => inner.error(&msg),
                }
            }
        });

        Self { sender, dropped: AtomicU64::new(0) }
    }

    /// Messages lost to a full or closed buffer so far.
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    fn push(&self, level: Level, msg: &str) {
        // Never block the simulation.
        if let Err(e) = self.sender.try_send((level, msg.to_string())) {
            let dropped = self.dropped.fetch_add(1, Ordering::Relaxed) + 1;
            tracing::debug!(dropped, "Buffered logger dropped a message: {}", e);
        }
    }
}

impl DomainLogger for BufferedLogger {
    fn info(&self, msg: &str) {
        self.push(Level::Info, msg);
    }

    fn warn(&self, msg: &str) {
        self.push(Level::Warn, msg);
    }

    fn error(&self, msg: &str) {
        self.push(Level::Error, msg);
    }
}

/// Must be called inside a tokio runtime.
pub fn init_buffered_logger(inner: DynLogger, capacity: usize) -> DynLogger {
    Arc::new(BufferedLogger::new(inner, capacity))
}

/// Build the domain logger described by the `[logging]` section.
///
/// Console output is always present; a file target is added when configured
/// and fast_log can be initialized. Messages go through a buffer so the
/// runtime never waits on I/O.
pub fn init_domain_logger(config: &LoggingConfig) -> DynLogger {
    let mut targets = vec![init_console_logger()];
    if let Some(path) = &config.file {
        match init_file_logger(path, config.level_filter()) {
            Ok(file_logger) => targets.push(file_logger),
            Err(e) => tracing::warn!("{}; continuing with console logging only", e),
        }
    }
    init_buffered_logger(Arc::new(FanoutLogger::new(targets)), config.buffer_capacity)
}
