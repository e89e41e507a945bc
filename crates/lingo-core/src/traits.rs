use crate::{error::LingoError, event::LiveEvent, message::MessageEntry};
use async_trait::async_trait;

/// Translation source trait — where catalogs come from.
///
/// Every backend (local JSON directory, hosted translation service, ...)
/// implements this trait to provide a uniform interface for bulk fetches
/// and, optionally, a push feed of change events.
#[async_trait]
pub trait TranslationSource: Send + Sync {
    /// Human-readable source name.
    fn name(&self) -> &str;

    /// Language codes currently available. May change between calls.
    async fn languages(&self) -> Result<Vec<String>, LingoError>;

    /// Full export for one language, tagged with that language code.
    /// An unknown language yields an empty list, never an error.
    async fn translations(&self, language: &str) -> Result<Vec<MessageEntry>, LingoError>;

    /// Subscribe to the push feed of change events.
    ///
    /// `Ok(None)` means this source does not support push updates — a
    /// normal, permanent condition, not a failure. `Err` means the feed
    /// exists but could not be established. The receiver closes when the
    /// underlying feed ends.
    async fn live_updates(
        &self,
    ) -> Result<Option<tokio::sync::mpsc::Receiver<LiveEvent>>, LingoError> {
        Ok(None)
    }
}
