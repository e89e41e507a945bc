//! WebSocket reader for the forge live-update feed.

use futures_util::{SinkExt, StreamExt};
use lingo_core::{error::LingoError, event::LiveEvent};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::{
    connect_async,
    tungstenite::{client::IntoClientRequest, http::HeaderValue, Message},
    MaybeTlsStream, WebSocketStream,
};
use tracing::{debug, error, info};

pub(super) type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Establish the feed connection, attaching the API key header if present.
pub(super) async fn connect(url: &str, api_key: Option<&str>) -> Result<WsStream, LingoError> {
    let mut request = url
        .into_client_request()
        .map_err(|e| LingoError::Feed(format!("invalid feed url '{url}': {e}")))?;
    if let Some(key) = api_key.filter(|k| !k.is_empty()) {
        let value = key
            .parse::<HeaderValue>()
            .map_err(|e| LingoError::Feed(format!("invalid api key header: {e}")))?;
        request.headers_mut().insert("X-API-Key", value);
    }
    let (stream, _) = connect_async(request)
        .await
        .map_err(|e| LingoError::Feed(format!("feed connect failed: {e}")))?;
    Ok(stream)
}

/// Forward parsed events from the socket into the channel until the stream
/// ends. Answers application-level `{"type":"ping"}` keepalives with a JSON
/// pong and protocol pings with pong frames; malformed frames are dropped.
/// Dropping the sender closes the receiver, which the engine observes as
/// feed termination.
pub(super) async fn run_feed(mut stream: WsStream, tx: mpsc::Sender<LiveEvent>) {
    while let Some(frame) = stream.next().await {
        match frame {
            Ok(Message::Text(text)) => {
                if is_keepalive_ping(&text) {
                    if let Err(e) = stream.send(Message::Text(r#"{"type":"pong"}"#.into())).await {
                        debug!("failed to answer keepalive ping: {e}");
                    }
                    continue;
                }
                match serde_json::from_str::<LiveEvent>(&text) {
                    Ok(event) => {
                        if tx.send(event).await.is_err() {
                            // Receiver dropped; nobody is listening anymore.
                            return;
                        }
                    }
                    Err(e) => debug!("dropping malformed live-update frame: {e}"),
                }
            }
            Ok(Message::Ping(payload)) => {
                if let Err(e) = stream.send(Message::Pong(payload)).await {
                    debug!("failed to answer protocol ping: {e}");
                }
            }
            Ok(Message::Close(_)) => break,
            Ok(_) => {}
            Err(e) => {
                error!("live updates stream error: {e}");
                break;
            }
        }
    }
    info!("live updates stream closed");
}

/// Whether a text frame is the application-level keepalive.
fn is_keepalive_ping(text: &str) -> bool {
    serde_json::from_str::<serde_json::Value>(text)
        .ok()
        .and_then(|v| v.get("type").and_then(|t| t.as_str()).map(|t| t == "ping"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keepalive_detection() {
        assert!(is_keepalive_ping(r#"{"type":"ping"}"#));
        assert!(!is_keepalive_ping(
            r#"{"type":"hello","translationId":"t1","permission":"READ"}"#
        ));
        assert!(!is_keepalive_ping("not json"));
        assert!(!is_keepalive_ping(r#"{"kind":"ping"}"#));
    }
}
