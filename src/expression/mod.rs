//! Expression synthesis
//!
//! - `targets`: the shared name-indexed weight arena
//! - `preset`: exclusive VRM expression-preset backend
//! - `blendshape`: additive ARKit blendshape backend
//! - `visemes`: continuous audio-driven viseme backend
//! - `synthesizer`: per-frame dispatch over the selected backend
//! - `blink`: autonomous blink pulse writer

pub mod blendshape;
pub mod blink;
pub mod preset;
pub mod synthesizer;
pub mod targets;
pub mod visemes;

pub use blendshape::BlendshapeBackend;
pub use blink::{BlinkConfig, BlinkScheduler};
pub use preset::PresetBackend;
pub use synthesizer::{Backend, ExpressionSynthesizer};
pub use targets::{TargetBuffer, TargetIndex};
pub use visemes::VisemeBackend;
