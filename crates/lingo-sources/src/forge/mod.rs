//! Hosted translation-service ("forge") source.
//!
//! Talks to the service's REST API to discover enabled locales and to
//! fetch flat per-locale exports, and subscribes to its WebSocket feed
//! for push updates.

mod ws;

use async_trait::async_trait;
use lingo_core::{
    error::LingoError, event::LiveEvent, message::MessageEntry, traits::TranslationSource,
};
use serde::Deserialize;
use std::collections::BTreeMap;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Translation source backed by a hosted translation service.
pub struct ForgeSource {
    /// Base URL without trailing slash.
    base_url: String,
    /// Translation-module ID on the service.
    translation_id: String,
    /// Optional API key, sent as `X-API-Key` header and as an `api-key`
    /// query parameter on the WebSocket URL.
    api_key: Option<String>,
    client: reqwest::Client,
}

/// One row of `/api/translations/{id}/locales`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(dead_code)]
struct LocaleInfo {
    id: String,
    translation_id: String,
    locale: String,
    enabled: bool,
    created_at: String,
}

impl ForgeSource {
    pub fn new(
        base_url: impl Into<String>,
        translation_id: impl Into<String>,
        api_key: Option<String>,
    ) -> Self {
        Self {
            base_url: normalize_base_url(&base_url.into()),
            translation_id: translation_id.into(),
            api_key,
            client: reqwest::Client::new(),
        }
    }

    fn get(&self, url: &str) -> reqwest::RequestBuilder {
        let mut request = self.client.get(url);
        if let Some(key) = self.api_key.as_deref().filter(|k| !k.is_empty()) {
            request = request.header("X-API-Key", key);
        }
        request
    }
}

#[async_trait]
impl TranslationSource for ForgeSource {
    fn name(&self) -> &str {
        "forge"
    }

    async fn languages(&self) -> Result<Vec<String>, LingoError> {
        let url = format!(
            "{}/api/translations/{}/locales",
            self.base_url, self.translation_id
        );
        let response = self
            .get(&url)
            .send()
            .await
            .map_err(|e| LingoError::Source(format!("locale list request failed: {e}")))?;

        if !response.status().is_success() {
            // Degrade to no languages instead of failing the whole load.
            warn!("locale list request returned {}", response.status());
            return Ok(Vec::new());
        }

        let locales: Vec<LocaleInfo> = response
            .json()
            .await
            .map_err(|e| LingoError::Source(format!("locale list parse failed: {e}")))?;
        debug!(
            "discovered locales for translation {}: {}",
            self.translation_id,
            locales
                .iter()
                .map(|l| format!("{}(enabled: {})", l.locale, l.enabled))
                .collect::<Vec<_>>()
                .join(", ")
        );
        Ok(enabled_locales(locales))
    }

    async fn translations(&self, language: &str) -> Result<Vec<MessageEntry>, LingoError> {
        let url = format!(
            "{}/api/translations/{}/export/{language}",
            self.base_url, self.translation_id
        );
        let response = self
            .get(&url)
            .send()
            .await
            .map_err(|e| LingoError::Source(format!("export request failed: {e}")))?;

        if !response.status().is_success() {
            warn!("export request for '{language}' returned {}", response.status());
            return Ok(Vec::new());
        }

        // A flat JSON object: { "some.key": "Value", ... }
        let data: BTreeMap<String, String> = response
            .json()
            .await
            .map_err(|e| LingoError::Source(format!("export parse failed: {e}")))?;
        Ok(data
            .into_iter()
            .map(|(key, value)| MessageEntry::new(language, key, value))
            .collect())
    }

    async fn live_updates(
        &self,
    ) -> Result<Option<mpsc::Receiver<LiveEvent>>, LingoError> {
        let url = ws_url(&self.base_url, &self.translation_id, self.api_key.as_deref());
        let stream = ws::connect(&url, self.api_key.as_deref()).await?;
        info!("connected to live updates feed at {url}");

        let (tx, rx) = mpsc::channel(64);
        tokio::spawn(ws::run_feed(stream, tx));
        Ok(Some(rx))
    }
}

/// Strip any trailing slashes from a base URL.
fn normalize_base_url(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}

/// Enabled, deduplicated locale codes from the locale listing.
fn enabled_locales(locales: Vec<LocaleInfo>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    locales
        .into_iter()
        .filter(|l| l.enabled)
        .map(|l| l.locale)
        .filter(|locale| seen.insert(locale.clone()))
        .collect()
}

/// WebSocket endpoint for a translation module: maps http(s) to ws(s) and
/// appends the API key as a query parameter when present.
fn ws_url(base_url: &str, translation_id: &str, api_key: Option<&str>) -> String {
    let base = normalize_base_url(base_url);
    let converted = if let Some(rest) = base.strip_prefix("https://") {
        format!("wss://{rest}")
    } else if let Some(rest) = base.strip_prefix("http://") {
        format!("ws://{rest}")
    } else if base.starts_with("ws://") || base.starts_with("wss://") {
        base
    } else {
        format!("wss://{base}")
    };
    let mut url = format!("{converted}/ws/translations/{translation_id}");
    if let Some(key) = api_key.filter(|k| !k.is_empty()) {
        let sep = if url.contains('?') { '&' } else { '?' };
        url.push_str(&format!("{sep}api-key={key}"));
    }
    url
}
