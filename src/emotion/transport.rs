//! Session transport routing
//!
//! The messaging session delivers emotion events over two transports
//! that share one JSON body: a broadcast byte message, and a string
//! attribute named `emotion` on a participant identity. The session
//! provider itself is an external collaborator; this module only
//! consumes its event contract and funnels both paths into
//! [`EmotionIngestion`].

use std::collections::HashMap;

use crate::emotion::ingestion::EmotionIngestion;
use crate::emotion::types::EmotionData;

/// Attribute key carrying the emotion JSON body
pub const EMOTION_ATTRIBUTE: &str = "emotion";

/// Inbound session events relevant to emotion ingestion
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// Broadcast byte message over the session-wide channel
    Data {
        payload: Vec<u8>,
        /// Sender identity, advisory only
        participant: Option<String>,
    },
    /// Attribute change on a participant identity
    AttributesChanged {
        changed: HashMap<String, String>,
        identity: String,
    },
}

/// Route one session event into ingestion
///
/// Returns the accepted event, if any. Rejections are already logged
/// by ingestion; events without an emotion body are ignored.
pub fn route_session_event(
    ingestion: &mut EmotionIngestion,
    event: &SessionEvent,
) -> Option<EmotionData> {
    match event {
        SessionEvent::Data { payload, .. } => ingestion.ingest_bytes(payload).ok(),
        SessionEvent::AttributesChanged { changed, .. } => {
            let body = changed.get(EMOTION_ATTRIBUTE)?;
            ingestion.ingest_bytes(body.as_bytes()).ok()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emotion::ingestion::IngestionConfig;
    use crate::emotion::types::{EmotionSource, EmotionType};

    #[test]
    fn test_data_transport() {
        let mut sink = EmotionIngestion::new(IngestionConfig::default());
        let event = SessionEvent::Data {
            payload: br#"{"type":"emotion","emotion":"surprised","source":"user"}"#.to_vec(),
            participant: Some("user-1".into()),
        };
        let data = route_session_event(&mut sink, &event).unwrap();
        assert_eq!(data.emotion, EmotionType::Surprised);
        assert_eq!(sink.state().user_emotion, EmotionType::Surprised);
    }

    #[test]
    fn test_attribute_transport() {
        let mut sink = EmotionIngestion::new(IngestionConfig::default());
        let mut changed = HashMap::new();
        changed.insert(
            EMOTION_ATTRIBUTE.to_string(),
            r#"{"type":"emotion","emotion":"confused","source":"agent","timestamp":1700000000}"#
                .to_string(),
        );
        let event = SessionEvent::AttributesChanged {
            changed,
            identity: "agent-1".into(),
        };
        let data = route_session_event(&mut sink, &event).unwrap();
        assert_eq!(data.emotion, EmotionType::Confused);
        assert_eq!(data.source, EmotionSource::Agent);
        assert_eq!(data.timestamp_ms, 1_700_000_000_000);
    }

    #[test]
    fn test_unrelated_attribute_ignored() {
        let mut sink = EmotionIngestion::new(IngestionConfig::default());
        let mut changed = HashMap::new();
        changed.insert("display_name".to_string(), "Ada".to_string());
        let event = SessionEvent::AttributesChanged {
            changed,
            identity: "user-1".into(),
        };
        assert!(route_session_event(&mut sink, &event).is_none());
        assert!(sink.state().history().is_empty());
    }

    #[test]
    fn test_rejected_payload_yields_none() {
        let mut sink = EmotionIngestion::new(IngestionConfig::default());
        let event = SessionEvent::Data {
            payload: br#"{"type":"emotion","emotion":"happy"}"#.to_vec(),
            participant: None,
        };
        assert!(route_session_event(&mut sink, &event).is_none());
    }
}
