use crate::common::DomainResult;

/// Audio surface used for landmark narration.
///
/// Playback is fire-and-forget: callers log and drop any error.
pub trait NarrationPlayer: Send + Sync {
    fn play(&self, source: &str) -> DomainResult<()>;
}
