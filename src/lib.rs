//! # facesync - Avatar Facial Expression Engine
//!
//! Drives a visual avatar's facial behavior from two live signals: the
//! remote speaker's audio stream and discrete emotion-classification
//! events delivered over a messaging session.
//!
//! ## Features
//!
//! - **Audio-reactive lip-sync**: FFT-based loudness and viseme
//!   analysis, one sample per render tick
//! - **Emotion ingestion**: validated, timestamp-normalized events with
//!   bounded per-source history and last-write-wins state
//! - **Three expression backends**: exclusive VRM presets, additive
//!   ARKit blendshape combinations, and continuous viseme morphs
//! - **Autonomous blinking**: randomized, fully cancellable blink timer
//! - **Cross-model tolerance**: targets a model lacks are skipped,
//!   never errors
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use facesync::{
//!     AnalyzerConfig, AvatarDriver, BlinkConfig, IngestionConfig,
//!     ModelDescriptor, ModelKind, SessionEvent,
//! };
//!
//! let mut driver = AvatarDriver::new(
//!     AnalyzerConfig::loudness(),
//!     IngestionConfig::default(),
//!     BlinkConfig::default(),
//! );
//!
//! driver.attach_audio(track_id, Box::new(track_source));
//! driver.load_model(ModelDescriptor {
//!     name: "rpm-avatar".into(),
//!     kind: ModelKind::ArkitBlendshapes,
//!     target_names: morph_dictionary_keys,
//! })?;
//!
//! // Per inbound session event:
//! driver.handle_session_event(&SessionEvent::Data { payload, participant: None });
//!
//! // Once per render frame (~60 Hz):
//! driver.tick();
//! ```
//!
//! All lookup tables are keyed by the closed nine-tag emotion enum and
//! dispatched with exhaustive matches; the per-model weight arena is
//! resolved once at model-load time.

pub mod audio;
pub mod core;
pub mod driver;
pub mod emotion;
pub mod expression;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// Core re-exports
pub use crate::core::{AudioOperation, FaceError, RejectReason, Result, TaskHandle};

// Audio re-exports
pub use audio::{
    AnalysisMode, AnalyzerConfig, AudioSource, LoudnessSample, SourceHandle, SpectrumAnalyzer,
    Viseme,
};

// Emotion re-exports
pub use emotion::{
    route_session_event, EmotionData, EmotionIngestion, EmotionSource, EmotionState, EmotionType,
    IngestionConfig, SessionEvent, EMOTION_ATTRIBUTE,
};

// Expression re-exports
pub use expression::{
    Backend, BlendshapeBackend, BlinkConfig, BlinkScheduler, ExpressionSynthesizer, PresetBackend,
    TargetBuffer, TargetIndex, VisemeBackend,
};

// Driver re-exports
pub use driver::{AvatarDriver, ModelDescriptor, ModelKind};
