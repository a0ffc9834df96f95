//! Audio analysis
//!
//! Frequency-domain analysis of a live audio source:
//! - `analyzer`: FFT-based loudness/viseme sampling per render tick
//! - `viseme`: discrete mouth-code classification from band energy

pub mod analyzer;
pub mod viseme;

pub use analyzer::{
    loudness, AnalysisMode, AnalyzerConfig, AudioSource, LoudnessSample, SourceHandle,
    SpectrumAnalyzer,
};
pub use viseme::Viseme;
