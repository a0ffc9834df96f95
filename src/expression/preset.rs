//! Exclusive expression-preset backend
//!
//! For avatar formats that expose pre-authored expressions as single
//! set-value controls (the VRM expression set). Exactly one preset is
//! active per frame: all known presets are reset to 0, then the one the
//! current emotion maps to is set to 1.0. Loudness drives the open
//! mouth preset independently.

use crate::audio::LoudnessSample;
use crate::emotion::EmotionType;
use crate::expression::targets::{TargetBuffer, TargetIndex};

/// The standard VRM expression presets this backend drives
pub const VRM_PRESETS: [&str; 5] = ["happy", "sad", "angry", "surprised", "relaxed"];

/// Open-mouth viseme preset used for lip-sync
pub const MOUTH_OPEN_PRESET: &str = "aa";

/// Loudness-to-mouth scale for a natural look
const MOUTH_SCALE: f32 = 0.7;

/// Preset name for each emotion tag
///
/// The preset vocabulary is smaller than the emotion vocabulary, so
/// several tags collapse onto their closest preset.
pub fn preset_for(emotion: EmotionType) -> &'static str {
    match emotion {
        EmotionType::Happy => "happy",
        EmotionType::Sad => "sad",
        EmotionType::Angry => "angry",
        EmotionType::Anxious => "sad",
        EmotionType::Surprised => "surprised",
        EmotionType::Grateful => "happy",
        EmotionType::Excited => "happy",
        EmotionType::Confused => "relaxed",
        EmotionType::Neutral => "relaxed",
    }
}

/// Exclusive preset writer, indices resolved once at model load
#[derive(Debug)]
pub struct PresetBackend {
    /// All presets the model actually has, reset each frame
    known: Vec<TargetIndex>,
    /// Per-emotion resolved preset (None when the model lacks it)
    by_emotion: [Option<TargetIndex>; 9],
    mouth_open: Option<TargetIndex>,
}

impl PresetBackend {
    pub fn new(buffer: &TargetBuffer) -> Self {
        let known = VRM_PRESETS
            .iter()
            .filter_map(|name| buffer.resolve(name))
            .collect();

        let mut by_emotion = [None; 9];
        for (slot, emotion) in by_emotion.iter_mut().zip(EmotionType::all()) {
            *slot = buffer.resolve(preset_for(*emotion));
        }

        Self {
            known,
            by_emotion,
            mouth_open: buffer.resolve(MOUTH_OPEN_PRESET),
        }
    }

    /// Reset every known preset, then set the target preset to 1.0
    pub fn apply_emotion(&mut self, buffer: &mut TargetBuffer, emotion: EmotionType) {
        for &preset in &self.known {
            buffer.set(preset, 0.0);
        }
        let slot = EmotionType::all().iter().position(|e| *e == emotion);
        if let Some(Some(target)) = slot.map(|i| self.by_emotion[i]) {
            buffer.set(target, 1.0);
        }
    }

    /// Drive the open-mouth preset from scalar loudness
    ///
    /// Viseme samples are not meaningful for this backend and are
    /// ignored.
    pub fn apply_audio(&mut self, buffer: &mut TargetBuffer, sample: &LoudnessSample) {
        if let (Some(mouth), Some(volume)) = (self.mouth_open, sample.volume()) {
            buffer.set(mouth, volume * MOUTH_SCALE);
        }
    }
}
