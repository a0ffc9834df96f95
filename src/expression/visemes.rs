//! Continuous viseme backend
//!
//! Audio-reactive mouth animation without discrete emotion mapping:
//! every known viseme morph decays toward 0 each frame (exponential
//! release) and the currently active code's morph is driven toward 1
//! (faster attack), producing smooth transitions instead of hard
//! switches between mouth shapes.

use crate::audio::{LoudnessSample, Viseme};
use crate::expression::targets::{TargetBuffer, TargetIndex};

/// Per-frame release rate toward 0 for inactive morphs
const RELEASE_RATE: f32 = 0.3;
/// Per-frame attack rate toward 1 for the active morph
const ATTACK_RATE: f32 = 0.5;

/// Smoothed viseme-morph writer, indices resolved once at model load
#[derive(Debug)]
pub struct VisemeBackend {
    /// Unique viseme morph indices (A and X share one morph)
    known: Vec<TargetIndex>,
    /// Resolved morph per viseme code
    by_code: [Option<TargetIndex>; 9],
}

impl VisemeBackend {
    pub fn new(buffer: &TargetBuffer) -> Self {
        let mut known = Vec::new();
        let mut by_code = [None; 9];
        for (slot, code) in by_code.iter_mut().zip(Viseme::all()) {
            if let Some(target) = buffer.resolve(code.morph_target()) {
                *slot = Some(target);
                if !known.contains(&target) {
                    known.push(target);
                }
            }
        }
        Self { known, by_code }
    }

    /// No emotion vocabulary on this backend
    pub fn apply_emotion(&mut self, _buffer: &mut TargetBuffer) {}

    /// Release all known morphs, then attack the active code's morph
    pub fn apply_audio(&mut self, buffer: &mut TargetBuffer, sample: &LoudnessSample) {
        let Some(code) = sample.viseme() else {
            return;
        };

        for &target in &self.known {
            let current = buffer.get(target);
            buffer.set(target, lerp(current, 0.0, RELEASE_RATE));
        }

        if let Some(slot) = Viseme::all().iter().position(|c| *c == code) {
            if let Some(target) = self.by_code[slot] {
                let current = buffer.get(target);
                buffer.set(target, lerp(current, 1.0, ATTACK_RATE));
            }
        }
    }
}

fn lerp(from: f32, to: f32, rate: f32) -> f32 {
    from + (to - from) * rate
}
