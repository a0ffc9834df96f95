//! Avatar face driver
//!
//! Top-level wiring of the pipeline: audio analyzer, emotion ingestion,
//! expression synthesis, and blink. Model loading is asynchronous and
//! external; until a model is handed over, `tick` is a no-op that
//! returns immediately. Tearing the driver down stops its blink task
//! deterministically.

use std::sync::{Arc, Mutex};

use tracing::info;

use crate::audio::{AnalyzerConfig, AudioSource, SourceHandle, SpectrumAnalyzer};
use crate::core::error::{FaceError, Result};
use crate::core::scheduler::TaskHandle;
use crate::emotion::{
    route_session_event, EmotionData, EmotionIngestion, IngestionConfig, SessionEvent,
};
use crate::expression::{
    Backend, BlendshapeBackend, BlinkConfig, BlinkScheduler, ExpressionSynthesizer, PresetBackend,
    TargetBuffer, VisemeBackend,
};

/// How the loaded avatar exposes its expression surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelKind {
    /// Name-indexed preset set-value interface (VRM expressions)
    ExpressionPresets,
    /// ARKit morph dictionary plus weight array
    ArkitBlendshapes,
    /// Oculus viseme morphs only, mouth driven purely from audio
    VisemeMorphs,
}

impl ModelKind {
    /// Blink target names for this expression surface
    fn blink_targets(&self) -> &'static [&'static str] {
        match self {
            ModelKind::ExpressionPresets => &["blink"],
            ModelKind::ArkitBlendshapes => &["eyeBlinkLeft", "eyeBlinkRight"],
            ModelKind::VisemeMorphs => &[],
        }
    }
}

/// Loaded-model description handed over by the asset loader
#[derive(Debug, Clone)]
pub struct ModelDescriptor {
    pub name: String,
    pub kind: ModelKind,
    /// Target names the model exposes (presets or morph dictionary keys)
    pub target_names: Vec<String>,
}

/// The assembled face pipeline
///
/// One `tick` call per render frame; session events and audio
/// attachment may happen at any time in between.
pub struct AvatarDriver {
    analyzer: SpectrumAnalyzer,
    ingestion: EmotionIngestion,
    blink_config: BlinkConfig,
    face: Option<ExpressionSynthesizer>,
    blink: Option<TaskHandle>,
}

impl AvatarDriver {
    pub fn new(
        analyzer_config: AnalyzerConfig,
        ingestion_config: IngestionConfig,
        blink_config: BlinkConfig,
    ) -> Self {
        Self {
            analyzer: SpectrumAnalyzer::new(analyzer_config),
            ingestion: EmotionIngestion::new(ingestion_config),
            blink_config,
            face: None,
            blink: None,
        }
    }

    /// Connect the remote speaker's audio (idempotent per source id)
    pub fn attach_audio(&mut self, source_id: u64, source: Box<dyn AudioSource>) -> SourceHandle {
        self.analyzer.attach(source_id, source)
    }

    /// Disconnect the audio source
    pub fn detach_audio(&mut self, handle: SourceHandle) {
        self.analyzer.detach(handle);
    }

    /// Feed one inbound session event into emotion ingestion
    pub fn handle_session_event(&mut self, event: &SessionEvent) -> Option<EmotionData> {
        route_session_event(&mut self.ingestion, event)
    }

    /// Register an observer for accepted emotion events
    pub fn on_emotion_change<F>(&mut self, observer: F)
    where
        F: Fn(&EmotionData) + Send + 'static,
    {
        self.ingestion.on_change(observer);
    }

    /// Read-only emotion state
    pub fn emotion_state(&self) -> &crate::emotion::EmotionState {
        self.ingestion.state()
    }

    /// Hand over a resolved avatar model and start driving it
    ///
    /// Builds the target buffer, selects the backend for the model's
    /// expression surface, and starts the blink task on the kind's eye
    /// targets. Requires a tokio runtime context. A model without any
    /// targets is a load failure, reported as [`FaceError::Model`];
    /// the driver keeps no-oping until a usable model arrives.
    pub fn load_model(&mut self, descriptor: ModelDescriptor) -> Result<()> {
        if descriptor.target_names.is_empty() {
            return Err(FaceError::Model {
                message: "model exposes no expression targets".to_string(),
                model_name: Some(descriptor.name),
            });
        }

        // Replace any previous model: stop its blink writer first.
        self.blink = None;
        self.face = None;

        let buffer = Arc::new(Mutex::new(TargetBuffer::new(descriptor.target_names)));
        let backend = {
            let buf = buffer
                .lock()
                .map_err(|_| FaceError::Internal {
                    message: "target buffer lock poisoned during model load".to_string(),
                })?;
            match descriptor.kind {
                ModelKind::ExpressionPresets => Backend::Preset(PresetBackend::new(&buf)),
                ModelKind::ArkitBlendshapes => Backend::Blendshape(BlendshapeBackend::new(&buf)),
                ModelKind::VisemeMorphs => Backend::Viseme(VisemeBackend::new(&buf)),
            }
        };

        let blink_targets = descriptor.kind.blink_targets();
        if !blink_targets.is_empty() {
            let scheduler = BlinkScheduler::new(self.blink_config.clone());
            self.blink = Some(scheduler.start_on_buffer(Arc::clone(&buffer), blink_targets));
        }

        self.face = Some(ExpressionSynthesizer::new(buffer, backend));
        info!(model = %descriptor.name, kind = ?descriptor.kind, "avatar model loaded");
        Ok(())
    }

    /// Whether a model is loaded and frames are being rendered
    pub fn is_model_loaded(&self) -> bool {
        self.face.is_some()
    }

    /// The shared weight buffer of the loaded model, for the renderer
    pub fn target_buffer(&self) -> Option<Arc<Mutex<TargetBuffer>>> {
        self.face.as_ref().map(|f| f.buffer())
    }

    /// Run one render frame: sample audio, synthesize expression
    ///
    /// No-op until a model is loaded. Never blocks.
    pub fn tick(&mut self) {
        let Some(face) = self.face.as_mut() else {
            return;
        };
        let sample = self.analyzer.sample();
        face.render(self.ingestion.state(), &sample);
    }

    /// Tear down: stop the blink task with a hard no-more-writes bound
    pub async fn shutdown(mut self) {
        if let Some(blink) = self.blink.take() {
            blink.stop().await;
        }
    }
}
