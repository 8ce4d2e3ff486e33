use std::sync::Arc;

/// Domain-level logging port.
/// Deliberately small and infallible; adapters decide where messages go.
pub trait DomainLogger: Send + Sync + 'static {
    fn info(&self, msg: &str);
    fn warn(&self, msg: &str);
    fn error(&self, msg: &str);
}

pub type DynLogger = Arc<dyn DomainLogger>;
