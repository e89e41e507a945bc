use serde::{Deserialize, Serialize};

/// A change notification pushed by the translation backend.
///
/// Wire shape (stable server contract): JSON object with a `type`
/// discriminator in `hello` / `key_created` / `key_deleted` /
/// `key_updated` and camelCase field names. The application-level
/// keepalive `{"type":"ping"}` is handled at the transport layer and
/// never surfaces as an event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LiveEvent {
    /// Connection handshake acknowledgment. Informational only.
    #[serde(rename_all = "camelCase")]
    Hello {
        translation_id: String,
        permission: String,
    },
    /// A new key was added upstream.
    #[serde(rename_all = "camelCase")]
    KeyCreated {
        translation_id: String,
        key_id: String,
        key: String,
        ts: String,
    },
    /// A key was removed upstream.
    #[serde(rename_all = "camelCase")]
    KeyDeleted {
        translation_id: String,
        key_id: String,
        ts: String,
    },
    /// A key's value changed for one locale.
    #[serde(rename_all = "camelCase")]
    KeyUpdated {
        translation_id: String,
        key_id: String,
        locale: String,
        value: Option<String>,
        ts: String,
    },
}

impl LiveEvent {
    /// The wire-level discriminator for this event.
    pub fn kind(&self) -> &'static str {
        match self {
            LiveEvent::Hello { .. } => "hello",
            LiveEvent::KeyCreated { .. } => "key_created",
            LiveEvent::KeyDeleted { .. } => "key_deleted",
            LiveEvent::KeyUpdated { .. } => "key_updated",
        }
    }

    /// The translation-module identifier carried by every event.
    pub fn translation_id(&self) -> &str {
        match self {
            LiveEvent::Hello { translation_id, .. }
            | LiveEvent::KeyCreated { translation_id, .. }
            | LiveEvent::KeyDeleted { translation_id, .. }
            | LiveEvent::KeyUpdated { translation_id, .. } => translation_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hello() {
        let json = r#"{"type":"hello","translationId":"t1","permission":"READ"}"#;
        let evt: LiveEvent = serde_json::from_str(json).unwrap();
        assert_eq!(
            evt,
            LiveEvent::Hello {
                translation_id: "t1".into(),
                permission: "READ".into(),
            }
        );
        assert_eq!(evt.kind(), "hello");
    }

    #[test]
    fn test_parse_key_created() {
        let json = r#"{"type":"key_created","translationId":"t1","keyId":"k9","key":"menu.title","ts":"2024-05-01T10:00:00Z"}"#;
        let evt: LiveEvent = serde_json::from_str(json).unwrap();
        assert_eq!(evt.kind(), "key_created");
        assert_eq!(evt.translation_id(), "t1");
    }

    #[test]
    fn test_parse_key_updated_with_null_value() {
        let json = r#"{"type":"key_updated","translationId":"t1","keyId":"k9","locale":"de_DE","value":null,"ts":"2024-05-01T10:00:00Z"}"#;
        let evt: LiveEvent = serde_json::from_str(json).unwrap();
        match evt {
            LiveEvent::KeyUpdated { locale, value, .. } => {
                assert_eq!(locale, "de_DE");
                assert_eq!(value, None);
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn test_parse_key_deleted() {
        let json =
            r#"{"type":"key_deleted","translationId":"t1","keyId":"k9","ts":"2024-05-01T10:00:00Z"}"#;
        let evt: LiveEvent = serde_json::from_str(json).unwrap();
        assert_eq!(evt.kind(), "key_deleted");
    }

    #[test]
    fn test_ping_is_not_an_event() {
        let json = r#"{"type":"ping"}"#;
        assert!(serde_json::from_str::<LiveEvent>(json).is_err());
    }

    #[test]
    fn test_malformed_frame_rejected() {
        assert!(serde_json::from_str::<LiveEvent>("not json").is_err());
        assert!(serde_json::from_str::<LiveEvent>(r#"{"type":"unknown"}"#).is_err());
        // Missing required fields.
        assert!(serde_json::from_str::<LiveEvent>(r#"{"type":"key_updated"}"#).is_err());
    }
}
