//! Live-update subscription state machine and event application.
//!
//! Events are applied by refresh-by-refetch: instead of patching the
//! catalog incrementally, the affected locale(s) are refetched in full so
//! every refresh reflects a complete, self-consistent server-side state.

use crate::{
    catalog::Catalog, config::ReconnectConfig, event::LiveEvent, observers::ObserverRegistry,
    traits::TranslationSource,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinSet;
use tracing::{error, info, warn};

/// Phase of the live-update subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LivePhase {
    /// No subscription attempt has been made yet.
    NotStarted,
    /// A subscription attempt is in progress.
    Starting,
    /// The feed is connected and events are being processed.
    Subscribed,
    /// The source does not provide live updates. Terminal, not a failure.
    Unsupported,
    /// The feed closed or failed. Terminal unless a backoff reconnect
    /// policy is configured.
    Terminated,
}

/// Shared subscription state, guarded independently of the catalog lock so
/// subscription setup never serializes catalog reads.
pub(super) struct LiveState {
    phase: Mutex<LivePhase>,
    reconnect: ReconnectConfig,
}

impl LiveState {
    pub(super) fn new(reconnect: ReconnectConfig) -> Self {
        Self {
            phase: Mutex::new(LivePhase::NotStarted),
            reconnect,
        }
    }

    pub(super) async fn phase(&self) -> LivePhase {
        *self.phase.lock().await
    }

    async fn set_phase(&self, phase: LivePhase) {
        *self.phase.lock().await = phase;
    }
}

/// Start the live-update listener if it has not been started before.
///
/// The phase lock is held across the whole attempt, so concurrent callers
/// produce exactly one subscription. Any phase other than `NotStarted`
/// makes this a no-op: a declined or terminated subscription is not
/// retried here (reconnects, when configured, happen inside the listener).
pub(super) async fn ensure_started(
    live: &Arc<LiveState>,
    source: &Arc<dyn TranslationSource>,
    catalog: &Arc<Catalog>,
    observers: &Arc<ObserverRegistry>,
) {
    let mut phase = live.phase.lock().await;
    if *phase != LivePhase::NotStarted {
        return;
    }
    *phase = LivePhase::Starting;

    match source.live_updates().await {
        Ok(Some(feed)) => {
            info!("Starting live translation updates listener");
            *phase = LivePhase::Subscribed;
            tokio::spawn(run_listener(
                live.clone(),
                source.clone(),
                catalog.clone(),
                observers.clone(),
                feed,
            ));
        }
        Ok(None) => {
            info!("Translation source does not provide live updates; continuing without push feed");
            *phase = LivePhase::Unsupported;
        }
        Err(e) => {
            error!("Failed to establish live updates feed: {e}");
            *phase = LivePhase::Terminated;
        }
    }
}

/// Drive the event feed: every event is dispatched to observers first,
/// then applied to the catalog; one event's handling completes before the
/// next is taken from the feed.
async fn run_listener(
    live: Arc<LiveState>,
    source: Arc<dyn TranslationSource>,
    catalog: Arc<Catalog>,
    observers: Arc<ObserverRegistry>,
    mut feed: mpsc::Receiver<LiveEvent>,
) {
    loop {
        while let Some(event) = feed.recv().await {
            observers.dispatch(&event);
            apply_event(&source, &catalog, &event).await;
        }

        live.set_phase(LivePhase::Terminated).await;
        if !live.reconnect.is_backoff() {
            info!("Live updates feed ended; not reconnecting");
            return;
        }

        match resubscribe(&live, &source).await {
            Some(new_feed) => feed = new_feed,
            None => return,
        }
    }
}

/// Exponential-backoff resubscribe loop for the `backoff` policy.
async fn resubscribe(
    live: &Arc<LiveState>,
    source: &Arc<dyn TranslationSource>,
) -> Option<mpsc::Receiver<LiveEvent>> {
    let mut delay_secs = live.reconnect.initial_secs;
    loop {
        warn!("Live updates feed ended; reconnecting in {delay_secs}s");
        tokio::time::sleep(Duration::from_secs(delay_secs)).await;
        match source.live_updates().await {
            Ok(Some(feed)) => {
                info!("Live updates feed reconnected");
                live.set_phase(LivePhase::Subscribed).await;
                return Some(feed);
            }
            Ok(None) => {
                info!("Translation source no longer provides live updates");
                live.set_phase(LivePhase::Unsupported).await;
                return None;
            }
            Err(e) => {
                error!("Live updates reconnect failed: {e}");
                delay_secs = (delay_secs * 2).min(live.reconnect.max_secs).max(1);
            }
        }
    }
}

/// Interpret one event and refresh the affected locale(s) by refetching
/// their full exports. Failures are logged and isolated per locale; they
/// never terminate the subscription.
async fn apply_event(
    source: &Arc<dyn TranslationSource>,
    catalog: &Arc<Catalog>,
    event: &LiveEvent,
) {
    match event {
        LiveEvent::Hello {
            translation_id,
            permission,
        } => {
            info!("Live updates connected for translation {translation_id} with permission {permission}");
        }
        LiveEvent::KeyUpdated { locale, .. } => {
            info!("Live updates: key_updated -> refreshing locale '{locale}'");
            match source.translations(locale).await {
                Ok(fresh) => catalog.replace(locale, fresh),
                Err(e) => error!("Failed to refresh locale '{locale}' after key_updated: {e}"),
            }
        }
        LiveEvent::KeyCreated { .. } | LiveEvent::KeyDeleted { .. } => {
            // The key set changed; refresh every locale currently loaded.
            let locales = catalog.languages();
            if locales.is_empty() {
                return;
            }
            info!(
                "Live updates: {} -> refreshing locales {}",
                event.kind(),
                locales.join(", ")
            );
            let mut refreshes = JoinSet::new();
            for locale in locales {
                let source = source.clone();
                let catalog = catalog.clone();
                let kind = event.kind();
                refreshes.spawn(async move {
                    match source.translations(&locale).await {
                        Ok(fresh) => catalog.replace(&locale, fresh),
                        Err(e) => {
                            error!("Failed to refresh locale '{locale}' after {kind}: {e}")
                        }
                    }
                });
            }
            while refreshes.join_next().await.is_some() {}
        }
    }
}
