//! Additive ARKit-blendshape backend
//!
//! For models exposing a raw morph-target dictionary (Ready Player Me
//! style ARKit naming). Each emotion maps to a weighted combination of
//! blendshapes; loudness writes two mouth shapes on top through a
//! disjoint pair of indices, so lip-sync never disturbs the expression
//! and vice versa. Eye-blink shapes are owned by the blink writer and
//! are never part of this backend's index set.

use crate::audio::LoudnessSample;
use crate::emotion::EmotionType;
use crate::expression::targets::{TargetBuffer, TargetIndex};

/// Lip-sync shapes and their loudness scales
pub const JAW_OPEN: &str = "jawOpen";
pub const MOUTH_OPEN: &str = "mouthOpen";
const JAW_SCALE: f32 = 0.6;
const MOUTH_SCALE: f32 = 0.4;

/// ARKit blendshape combination for each emotion tag
///
/// Weights are fixed per shape; `neutral` is the empty combination.
pub fn combination(emotion: EmotionType) -> &'static [(&'static str, f32)] {
    match emotion {
        EmotionType::Happy => &[
            ("mouthSmileLeft", 0.7),
            ("mouthSmileRight", 0.7),
            ("eyeSquintLeft", 0.3),
            ("eyeSquintRight", 0.3),
        ],
        EmotionType::Sad => &[
            ("mouthFrownLeft", 0.6),
            ("mouthFrownRight", 0.6),
            ("browDownLeft", 0.5),
            ("browDownRight", 0.5),
            ("browInnerUp", 0.3),
        ],
        EmotionType::Angry => &[
            ("mouthFrownLeft", 0.5),
            ("mouthFrownRight", 0.5),
            ("browDownLeft", 0.8),
            ("browDownRight", 0.8),
            ("jawForward", 0.3),
            ("eyeSquintLeft", 0.4),
            ("eyeSquintRight", 0.4),
        ],
        EmotionType::Anxious => &[
            ("mouthFrownLeft", 0.3),
            ("mouthFrownRight", 0.3),
            ("browInnerUp", 0.6),
            ("eyeWideLeft", 0.3),
            ("eyeWideRight", 0.3),
        ],
        EmotionType::Surprised => &[
            ("mouthOpen", 0.4),
            ("jawOpen", 0.3),
            ("browInnerUp", 0.8),
            ("browOuterUpLeft", 0.7),
            ("browOuterUpRight", 0.7),
            ("eyeWideLeft", 0.8),
            ("eyeWideRight", 0.8),
        ],
        EmotionType::Grateful => &[
            ("mouthSmileLeft", 0.6),
            ("mouthSmileRight", 0.6),
            ("browInnerUp", 0.2),
        ],
        EmotionType::Excited => &[
            ("mouthSmileLeft", 0.9),
            ("mouthSmileRight", 0.9),
            ("mouthOpen", 0.3),
            ("browOuterUpLeft", 0.5),
            ("browOuterUpRight", 0.5),
            ("eyeWideLeft", 0.4),
            ("eyeWideRight", 0.4),
        ],
        EmotionType::Confused => &[
            ("browInnerUp", 0.4),
            ("browDownLeft", 0.2),
            ("browOuterUpRight", 0.3),
            ("mouthFrownLeft", 0.2),
        ],
        EmotionType::Neutral => &[],
    }
}

/// Additive blendshape writer, indices resolved once at model load
#[derive(Debug)]
pub struct BlendshapeBackend {
    /// Union of every index this backend may write, zeroed each frame
    known: Vec<TargetIndex>,
    /// Per-emotion resolved combinations
    combos: Vec<Vec<(TargetIndex, f32)>>,
    jaw_open: Option<TargetIndex>,
    mouth_open: Option<TargetIndex>,
}

impl BlendshapeBackend {
    pub fn new(buffer: &TargetBuffer) -> Self {
        fn push_known(known: &mut Vec<TargetIndex>, target: TargetIndex) {
            if !known.contains(&target) {
                known.push(target);
            }
        }

        let mut known = Vec::new();
        let combos = EmotionType::all()
            .iter()
            .map(|&emotion| {
                combination(emotion)
                    .iter()
                    .filter_map(|(name, weight)| {
                        buffer.resolve(name).map(|target| {
                            push_known(&mut known, target);
                            (target, *weight)
                        })
                    })
                    .collect()
            })
            .collect();

        let jaw_open = buffer.resolve(JAW_OPEN);
        let mouth_open = buffer.resolve(MOUTH_OPEN);
        if let Some(target) = jaw_open {
            push_known(&mut known, target);
        }
        if let Some(target) = mouth_open {
            push_known(&mut known, target);
        }

        Self {
            known,
            combos,
            jaw_open,
            mouth_open,
        }
    }

    /// Zero every known index, then write the emotion's combination
    pub fn apply_emotion(&mut self, buffer: &mut TargetBuffer, emotion: EmotionType) {
        for &target in &self.known {
            buffer.set(target, 0.0);
        }
        if let Some(slot) = EmotionType::all().iter().position(|e| *e == emotion) {
            for &(target, weight) in &self.combos[slot] {
                buffer.set(target, weight);
            }
        }
    }

    /// Write the two lip-sync shapes from scalar loudness
    ///
    /// Runs after `apply_emotion` each frame, so the jaw/mouth indices
    /// carry the loudness value rather than the emotion combination.
    pub fn apply_audio(&mut self, buffer: &mut TargetBuffer, sample: &LoudnessSample) {
        let Some(volume) = sample.volume() else {
            return;
        };
        if let Some(jaw) = self.jaw_open {
            buffer.set(jaw, volume * JAW_SCALE);
        }
        if let Some(mouth) = self.mouth_open {
            buffer.set(mouth, volume * MOUTH_SCALE);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arkit_buffer() -> TargetBuffer {
        TargetBuffer::new([
            "mouthSmileLeft",
            "mouthSmileRight",
            "mouthFrownLeft",
            "mouthFrownRight",
            "mouthOpen",
            "jawOpen",
            "jawForward",
            "browInnerUp",
            "browDownLeft",
            "browDownRight",
            "browOuterUpLeft",
            "browOuterUpRight",
            "eyeBlinkLeft",
            "eyeBlinkRight",
            "eyeWideLeft",
            "eyeWideRight",
            "eyeSquintLeft",
            "eyeSquintRight",
        ])
    }

    #[test]
    fn test_emotion_combination_written() {
        let mut buffer = arkit_buffer();
        let mut backend = BlendshapeBackend::new(&buffer);

        backend.apply_emotion(&mut buffer, EmotionType::Happy);
        assert_eq!(buffer.get_by_name("mouthSmileLeft"), 0.7);
        assert_eq!(buffer.get_by_name("mouthSmileRight"), 0.7);
        assert_eq!(buffer.get_by_name("eyeSquintLeft"), 0.3);
        assert_eq!(buffer.get_by_name("browDownLeft"), 0.0);
    }

    #[test]
    fn test_switching_emotion_clears_previous_combination() {
        let mut buffer = arkit_buffer();
        let mut backend = BlendshapeBackend::new(&buffer);

        backend.apply_emotion(&mut buffer, EmotionType::Surprised);
        assert_eq!(buffer.get_by_name("eyeWideLeft"), 0.8);

        backend.apply_emotion(&mut buffer, EmotionType::Happy);
        assert_eq!(buffer.get_by_name("eyeWideLeft"), 0.0);
        assert_eq!(buffer.get_by_name("browInnerUp"), 0.0);
        assert_eq!(buffer.get_by_name("mouthSmileLeft"), 0.7);
    }

    #[test]
    fn test_neutral_is_empty_combination() {
        let mut buffer = arkit_buffer();
        let mut backend = BlendshapeBackend::new(&buffer);

        backend.apply_emotion(&mut buffer, EmotionType::Excited);
        backend.apply_emotion(&mut buffer, EmotionType::Neutral);
        assert!(buffer.weights().iter().all(|&w| w == 0.0));
    }

    #[test]
    fn test_volume_writes_disjoint_mouth_pair() {
        let mut buffer = arkit_buffer();
        let mut backend = BlendshapeBackend::new(&buffer);

        backend.apply_emotion(&mut buffer, EmotionType::Happy);
        backend.apply_audio(&mut buffer, &LoudnessSample::Volume(1.0));

        assert!((buffer.get_by_name("jawOpen") - 0.6).abs() < 1e-6);
        assert!((buffer.get_by_name("mouthOpen") - 0.4).abs() < 1e-6);
        // Emotion indices are unaffected by the audio write
        assert_eq!(buffer.get_by_name("mouthSmileLeft"), 0.7);
    }

    #[test]
    fn test_blink_indices_never_touched() {
        let mut buffer = arkit_buffer();
        let left = buffer.resolve("eyeBlinkLeft").unwrap();
        let right = buffer.resolve("eyeBlinkRight").unwrap();
        buffer.set(left, 1.0);
        buffer.set(right, 1.0);

        let mut backend = BlendshapeBackend::new(&buffer);
        for &emotion in EmotionType::all() {
            backend.apply_emotion(&mut buffer, emotion);
            backend.apply_audio(&mut buffer, &LoudnessSample::Volume(0.9));
            assert_eq!(buffer.get(left), 1.0, "{emotion} touched eyeBlinkLeft");
            assert_eq!(buffer.get(right), 1.0, "{emotion} touched eyeBlinkRight");
        }
    }

    #[test]
    fn test_partial_model_skips_missing_shapes() {
        let mut buffer = TargetBuffer::new(["mouthSmileLeft", "jawOpen"]);
        let mut backend = BlendshapeBackend::new(&buffer);

        backend.apply_emotion(&mut buffer, EmotionType::Happy);
        backend.apply_audio(&mut buffer, &LoudnessSample::Volume(0.5));
        assert_eq!(buffer.get_by_name("mouthSmileLeft"), 0.7);
        assert!((buffer.get_by_name("jawOpen") - 0.3).abs() < 1e-6);
    }
}
