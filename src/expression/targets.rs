//! Shared expression weight buffer
//!
//! The loaded avatar model exposes a set of named weight targets
//! (blendshapes or expression presets). [`TargetBuffer`] is the arena
//! for those weights: a name-to-index map resolved once at model load
//! plus a flat weight vector written every frame.
//!
//! Unknown names resolve to nothing and writes through them are no-ops;
//! cross-model compatibility is best-effort, never an error. Writers
//! (expression synthesis and blink) must keep disjoint index sets.

use std::collections::HashMap;

/// Resolved position of a named target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TargetIndex(pub usize);

/// Name-indexed weight arena for one avatar model
#[derive(Debug, Clone, Default)]
pub struct TargetBuffer {
    index: HashMap<String, usize>,
    weights: Vec<f32>,
}

impl TargetBuffer {
    /// Build a buffer from the model's target names, all weights zero
    ///
    /// Duplicate names keep their first index, matching a morph
    /// dictionary that maps several names onto one slot.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut index = HashMap::new();
        let mut count = 0;
        for name in names {
            let name = name.into();
            index.entry(name).or_insert_with(|| {
                let slot = count;
                count += 1;
                slot
            });
        }
        Self {
            index,
            weights: vec![0.0; count],
        }
    }

    /// Resolve a target name once; unknown names yield None
    pub fn resolve(&self, name: &str) -> Option<TargetIndex> {
        self.index.get(name).copied().map(TargetIndex)
    }

    /// Write a weight, clamped to [0, 1]
    pub fn set(&mut self, target: TargetIndex, weight: f32) {
        if let Some(slot) = self.weights.get_mut(target.0) {
            *slot = weight.clamp(0.0, 1.0);
        }
    }

    /// Write by name; silently skipped when the model lacks the target
    pub fn set_by_name(&mut self, name: &str, weight: f32) {
        if let Some(target) = self.resolve(name) {
            self.set(target, weight);
        }
    }

    /// Current weight of a resolved target
    pub fn get(&self, target: TargetIndex) -> f32 {
        self.weights.get(target.0).copied().unwrap_or(0.0)
    }

    /// Current weight by name (0.0 for unknown names)
    pub fn get_by_name(&self, name: &str) -> f32 {
        self.resolve(name).map(|t| self.get(t)).unwrap_or(0.0)
    }

    /// Number of targets
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    /// Whether the model exposed no targets at all
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// The raw per-frame weight array, as the renderer reads it
    pub fn weights(&self) -> &[f32] {
        &self.weights
    }
}
