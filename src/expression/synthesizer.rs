//! Per-frame expression synthesis
//!
//! Combines the current emotion state and this tick's audio sample into
//! weight writes on the shared [`TargetBuffer`]. The backend is a
//! tagged variant chosen at model-load time; all three share the same
//! capability surface (apply emotion, apply audio) and are dispatched
//! with an exhaustive match.

use std::sync::{Arc, Mutex};

use crate::audio::LoudnessSample;
use crate::emotion::EmotionState;
use crate::expression::blendshape::BlendshapeBackend;
use crate::expression::preset::PresetBackend;
use crate::expression::targets::TargetBuffer;
use crate::expression::visemes::VisemeBackend;

/// Expression backend, selected at avatar-load time
#[derive(Debug)]
pub enum Backend {
    /// Exclusive VRM-style expression presets
    Preset(PresetBackend),
    /// Additive ARKit blendshape combinations
    Blendshape(BlendshapeBackend),
    /// Continuous viseme morphs driven purely from audio
    Viseme(VisemeBackend),
}

impl Backend {
    fn apply_emotion(&mut self, buffer: &mut TargetBuffer, state: &EmotionState) {
        // The avatar renders the remote agent, so its face follows the
        // agent-side emotion.
        let emotion = state.agent_emotion;
        match self {
            Backend::Preset(backend) => backend.apply_emotion(buffer, emotion),
            Backend::Blendshape(backend) => backend.apply_emotion(buffer, emotion),
            Backend::Viseme(backend) => backend.apply_emotion(buffer),
        }
    }

    fn apply_audio(&mut self, buffer: &mut TargetBuffer, sample: &LoudnessSample) {
        match self {
            Backend::Preset(backend) => backend.apply_audio(buffer, sample),
            Backend::Blendshape(backend) => backend.apply_audio(buffer, sample),
            Backend::Viseme(backend) => backend.apply_audio(buffer, sample),
        }
    }
}

/// Frame-driven writer into the shared target buffer
///
/// `render` is called once per frame and never blocks. Emotion is
/// applied before audio, so loudness lands on top of (and within
/// backends, disjoint from) the emotion writes. Blink indices are not
/// part of any backend's index set; the blink task is the only writer
/// there.
pub struct ExpressionSynthesizer {
    buffer: Arc<Mutex<TargetBuffer>>,
    backend: Backend,
}

impl ExpressionSynthesizer {
    pub fn new(buffer: Arc<Mutex<TargetBuffer>>, backend: Backend) -> Self {
        Self { buffer, backend }
    }

    /// The shared buffer this synthesizer writes into
    pub fn buffer(&self) -> Arc<Mutex<TargetBuffer>> {
        Arc::clone(&self.buffer)
    }

    /// Write one frame of expression weights
    pub fn render(&mut self, state: &EmotionState, sample: &LoudnessSample) {
        if let Ok(mut buffer) = self.buffer.lock() {
            self.backend.apply_emotion(&mut buffer, state);
            self.backend.apply_audio(&mut buffer, sample);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::Viseme;
    use crate::emotion::{EmotionData, EmotionSource, EmotionType};

    fn state_with_agent(emotion: EmotionType) -> EmotionState {
        let mut state = EmotionState::new(50);
        state.apply(&EmotionData {
            emotion,
            source: EmotionSource::Agent,
            timestamp_ms: 1,
            confidence: None,
        });
        state
    }

    #[test]
    fn test_preset_render_is_exclusive_per_frame() {
        let buffer = Arc::new(Mutex::new(TargetBuffer::new([
            "happy", "sad", "angry", "surprised", "relaxed", "aa",
        ])));
        let backend = Backend::Preset(PresetBackend::new(&buffer.lock().unwrap()));
        let mut synth = ExpressionSynthesizer::new(Arc::clone(&buffer), backend);

        synth.render(&state_with_agent(EmotionType::Angry), &LoudnessSample::Volume(0.5));
        assert_eq!(buffer.lock().unwrap().get_by_name("angry"), 1.0);

        synth.render(
            &state_with_agent(EmotionType::Surprised),
            &LoudnessSample::Volume(0.5),
        );
        let buf = buffer.lock().unwrap();
        assert_eq!(buf.get_by_name("angry"), 0.0);
        assert_eq!(buf.get_by_name("surprised"), 1.0);
        assert!((buf.get_by_name("aa") - 0.35).abs() < 1e-6);
    }

    #[test]
    fn test_user_emotion_does_not_drive_face() {
        let buffer = Arc::new(Mutex::new(TargetBuffer::new([
            "happy", "sad", "angry", "surprised", "relaxed", "aa",
        ])));
        let backend = Backend::Preset(PresetBackend::new(&buffer.lock().unwrap()));
        let mut synth = ExpressionSynthesizer::new(Arc::clone(&buffer), backend);

        let mut state = EmotionState::new(50);
        state.apply(&EmotionData {
            emotion: EmotionType::Angry,
            source: EmotionSource::User,
            timestamp_ms: 1,
            confidence: None,
        });

        synth.render(&state, &LoudnessSample::Volume(0.0));
        let buf = buffer.lock().unwrap();
        assert_eq!(buf.get_by_name("angry"), 0.0);
        assert_eq!(buf.get_by_name("relaxed"), 1.0, "agent stays neutral");
    }

    #[test]
    fn test_viseme_render_smooths_across_frames() {
        let buffer = Arc::new(Mutex::new(TargetBuffer::new(["viseme_AA", "viseme_PP"])));
        let backend = Backend::Viseme(VisemeBackend::new(&buffer.lock().unwrap()));
        let mut synth = ExpressionSynthesizer::new(Arc::clone(&buffer), backend);

        let state = EmotionState::new(50);
        synth.render(&state, &LoudnessSample::Viseme(Viseme::D));
        let first = buffer.lock().unwrap().get_by_name("viseme_AA");
        assert!((first - 0.5).abs() < 1e-6, "attack rate 0.5 from zero");

        synth.render(&state, &LoudnessSample::Viseme(Viseme::D));
        let second = buffer.lock().unwrap().get_by_name("viseme_AA");
        assert!(second > first && second < 1.0);
    }
}
