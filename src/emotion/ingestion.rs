//! Emotion event ingestion
//!
//! Validates, normalizes, and folds inbound emotion events into
//! [`EmotionState`]. Both transports deliver the same UTF-8 JSON body:
//!
//! ```json
//! { "type": "emotion", "emotion": "happy", "source": "agent",
//!   "timestamp": 1700000000, "confidence": 0.92 }
//! ```
//!
//! Malformed or out-of-vocabulary events are logged and dropped; they
//! never raise and never touch state. Timestamps arrive in seconds or
//! milliseconds depending on the producer and are normalized to epoch
//! milliseconds here.

use serde::Deserialize;
use tracing::{debug, warn};

use crate::core::error::RejectReason;
use crate::emotion::types::{EmotionData, EmotionSource, EmotionState, EmotionType};

/// Values below this are interpreted as epoch seconds
const MS_THRESHOLD: f64 = 1e12;

/// Ingestion configuration
#[derive(Debug, Clone)]
pub struct IngestionConfig {
    /// Maximum retained history entries
    pub max_history: usize,
}

impl Default for IngestionConfig {
    fn default() -> Self {
        Self { max_history: 50 }
    }
}

/// Observer invoked once per accepted event, after state commit
pub type EmotionObserver = Box<dyn Fn(&EmotionData) + Send>;

/// Raw wire body, before validation
///
/// `timestamp` stays an untyped value: producers occasionally send it
/// as a string, which must not reject an otherwise valid event.
#[derive(Debug, Deserialize)]
struct WireEvent {
    #[serde(rename = "type")]
    kind: Option<String>,
    emotion: Option<String>,
    source: Option<String>,
    timestamp: Option<serde_json::Value>,
    confidence: Option<f32>,
}

/// Validating, normalizing event sink owning the emotion state
pub struct EmotionIngestion {
    state: EmotionState,
    observers: Vec<EmotionObserver>,
}

impl EmotionIngestion {
    pub fn new(config: IngestionConfig) -> Self {
        Self {
            state: EmotionState::new(config.max_history),
            observers: Vec::new(),
        }
    }

    /// Register an observer for accepted events
    pub fn on_change<F>(&mut self, observer: F)
    where
        F: Fn(&EmotionData) + Send + 'static,
    {
        self.observers.push(Box::new(observer));
    }

    /// Read-only view of the current state
    pub fn state(&self) -> &EmotionState {
        &self.state
    }

    /// Ingest one raw payload (UTF-8 JSON bytes, either transport)
    ///
    /// On acceptance the state is committed and observers run; on
    /// rejection a warning is logged and nothing changes.
    pub fn ingest_bytes(&mut self, payload: &[u8]) -> Result<EmotionData, RejectReason> {
        let wire: WireEvent = match serde_json::from_slice(payload) {
            Ok(wire) => wire,
            Err(err) => {
                let reason = RejectReason::Malformed(err.to_string());
                warn!(%reason, "emotion event dropped");
                return Err(reason);
            }
        };
        self.ingest_wire(wire)
    }

    fn ingest_wire(&mut self, wire: WireEvent) -> Result<EmotionData, RejectReason> {
        match self.validate(wire) {
            Ok(data) => {
                self.state.apply(&data);
                debug!(
                    emotion = %data.emotion,
                    source = %data.source,
                    timestamp_ms = data.timestamp_ms,
                    "emotion event accepted"
                );
                for observer in &self.observers {
                    observer(&data);
                }
                Ok(data)
            }
            Err(reason) => {
                warn!(%reason, "emotion event dropped");
                Err(reason)
            }
        }
    }

    fn validate(&self, wire: WireEvent) -> Result<EmotionData, RejectReason> {
        if let Some(kind) = &wire.kind {
            if kind != "emotion" {
                return Err(RejectReason::WrongType(kind.clone()));
            }
        }

        let emotion = match wire.emotion.as_deref() {
            None | Some("") => return Err(RejectReason::MissingField("emotion")),
            Some(raw) => {
                EmotionType::parse(raw).ok_or_else(|| RejectReason::UnknownEmotion(raw.into()))?
            }
        };

        let source = match wire.source.as_deref() {
            None | Some("") => return Err(RejectReason::MissingField("source")),
            Some(raw) => {
                EmotionSource::parse(raw).ok_or_else(|| RejectReason::UnknownSource(raw.into()))?
            }
        };

        Ok(EmotionData {
            emotion,
            source,
            timestamp_ms: normalize_timestamp(wire.timestamp.as_ref()),
            confidence: wire.confidence,
        })
    }
}

/// Normalize a producer timestamp to epoch milliseconds
///
/// Values under 10^12 look like epoch seconds and are scaled; larger
/// values are already milliseconds. A missing or non-numeric timestamp
/// uses the ingestion-time wall clock.
fn normalize_timestamp(timestamp: Option<&serde_json::Value>) -> i64 {
    match timestamp.and_then(|v| v.as_f64()) {
        Some(ts) if ts < MS_THRESHOLD => (ts * 1000.0).floor() as i64,
        Some(ts) => ts as i64,
        None => chrono::Utc::now().timestamp_millis(),
    }
}
