//! Emotion event ingestion and state
//!
//! - `types`: the closed emotion vocabulary and per-source state
//! - `ingestion`: validation, timestamp normalization, state commit
//! - `transport`: routing of the two session transports into ingestion

pub mod ingestion;
pub mod transport;
pub mod types;

pub use ingestion::{EmotionIngestion, IngestionConfig};
pub use transport::{route_session_event, SessionEvent, EMOTION_ATTRIBUTE};
pub use types::{EmotionData, EmotionSource, EmotionState, EmotionType};
