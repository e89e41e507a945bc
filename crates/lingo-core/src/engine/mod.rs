//! Translation cache engine — bulk load, lookup with fallback and
//! placeholder substitution, and live-update synchronization.

mod live;


pub use live::LivePhase;

use crate::{
    catalog::Catalog,
    config::CacheConfig,
    message::{substitute, MessageEntry, Placeholders},
    miss::MissLog,
    observers::{HookRegistry, LiveObserver, ObserverId, ObserverRegistry, TranslationHook},
    traits::TranslationSource,
};
use live::LiveState;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{error, info};

/// The central engine orchestrating catalog loads, lookups, and the
/// live-update subscription for one translation source.
///
/// Construction does no background work; the owner starts the live
/// subscription deliberately via [`load_translations`](Self::load_translations)
/// or [`start`](Self::start).
pub struct TranslationEngine {
    source: Arc<dyn TranslationSource>,
    catalog: Arc<Catalog>,
    fallback_language: String,
    observers: Arc<ObserverRegistry>,
    hooks: HookRegistry,
    miss_log: MissLog,
    live: Arc<LiveState>,
}

impl TranslationEngine {
    pub fn new(source: Arc<dyn TranslationSource>, config: CacheConfig) -> Self {
        Self {
            source,
            catalog: Arc::new(Catalog::new()),
            fallback_language: config.fallback_language,
            observers: Arc::new(ObserverRegistry::new()),
            hooks: HookRegistry::new(),
            miss_log: MissLog::default(),
            live: Arc::new(LiveState::new(config.reconnect)),
        }
    }

    /// Redirect the miss log to a custom file path.
    pub fn with_miss_log_path(mut self, path: std::path::PathBuf) -> Self {
        self.miss_log = MissLog::new(path);
        self
    }

    /// Load the full catalog from the source.
    ///
    /// Clears the catalog, fetches the language list, then fans out one
    /// fetch per language; each language becomes visible as soon as its
    /// export arrives. A failed fetch degrades that language to an empty
    /// entry set instead of aborting the load. Returns the per-language
    /// entry counts once every fetch has completed, after which the live
    /// subscription is started if the source supports it (idempotent
    /// across repeated loads).
    pub async fn load_translations(&self) -> HashMap<String, usize> {
        info!(
            "Retrieving all translations from source '{}'",
            self.source.name()
        );
        self.catalog.clear();

        let languages = match self.source.languages().await {
            Ok(languages) => languages,
            Err(e) => {
                error!("failed to fetch language list: {e}");
                Vec::new()
            }
        };

        let mut fetches = JoinSet::new();
        for language in languages {
            let source = self.source.clone();
            let catalog = self.catalog.clone();
            fetches.spawn(async move {
                let entries = match source.translations(&language).await {
                    Ok(entries) => entries,
                    Err(e) => {
                        error!("failed to fetch translations for '{language}': {e}");
                        Vec::new()
                    }
                };
                catalog.replace(&language, entries);
            });
        }
        while fetches.join_next().await.is_some() {}

        let counts = self.catalog.snapshot_sizes();
        self.start().await;
        counts
    }

    /// Start the live-update subscription if the source supports one.
    /// Safe to call many times; only the first call attempts to subscribe.
    pub async fn start(&self) {
        live::ensure_started(
            &self.live,
            &self.source,
            &self.catalog,
            &self.observers,
        )
        .await;
    }

    /// Look up a message, falling back to the configured fallback language.
    ///
    /// Supplied placeholders replace `%name%` tokens in a single pass over
    /// the stored template; the stored entry is never mutated. A miss
    /// against the fallback language itself is recorded to the miss log.
    /// Synchronous: never suspends beyond a brief read-lock hold.
    pub fn get(
        &self,
        language: &str,
        key: &str,
        placeholders: &Placeholders,
    ) -> Option<MessageEntry> {
        let entry = self
            .catalog
            .get(language, key)
            .or_else(|| self.catalog.get(&self.fallback_language, key));

        let Some(entry) = entry else {
            info!("No translation found for {language}:{key}");
            if language == self.fallback_language {
                self.miss_log.record(key, placeholders);
            }
            return None;
        };

        let value = substitute(&entry.value, placeholders);
        let value = self.hooks.apply(language, key, value);
        Some(MessageEntry { value, ..entry })
    }

    /// Whether a language has been loaded (possibly with zero keys).
    pub fn contains(&self, language: &str) -> bool {
        self.catalog.contains(language)
    }

    /// Per-language entry counts, for observability.
    pub fn snapshot_sizes(&self) -> HashMap<String, usize> {
        self.catalog.snapshot_sizes()
    }

    /// Register an observer notified of every live-update event.
    pub fn register_observer(&self, observer: LiveObserver) -> ObserverId {
        self.observers.register(observer)
    }

    /// Unregister a live-update observer. Returns whether it was registered.
    pub fn unregister_observer(&self, id: ObserverId) -> bool {
        self.observers.unregister(id)
    }

    /// Register a hook applied to every resolved message before return.
    pub fn register_hook(&self, hook: TranslationHook) {
        self.hooks.register(hook);
    }

    /// Deduplicated miss-log records accumulated so far.
    pub fn missing_keys(&self) -> Vec<String> {
        self.miss_log.entries()
    }

    /// Current phase of the live-update subscription.
    pub async fn live_phase(&self) -> LivePhase {
        self.live.phase().await
    }
}
