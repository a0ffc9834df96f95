//! Live audio spectrum analysis
//!
//! Converts a live audio source into a continuously updated loudness or
//! viseme summary, one [`SpectrumAnalyzer::sample`] call per render
//! tick. The analyzer keeps a byte-scaled (0..255) magnitude spectrum
//! with exponential smoothing across ticks, the same shape a Web-Audio
//! analyser node exposes, so band thresholds stay comparable.

use std::sync::Arc;

use rustfft::{num_complex::Complex, FftPlanner};
use tracing::{debug, warn};

use crate::audio::viseme::Viseme;

/// Byte-scale ceiling used to normalize loudness into [0, 1]
const LOUDNESS_CEILING: f32 = 128.0;

/// Speech-frequency sub-band used for scalar loudness
const SPEECH_BAND: (usize, usize) = (10, 40);

/// What `sample` should compute from the spectrum
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisMode {
    /// Scalar loudness in [0, 1]
    Loudness,
    /// Discrete viseme code
    Viseme,
}

/// One analysis result per render tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LoudnessSample {
    /// Average speech-band magnitude, normalized to [0, 1]
    Volume(f32),
    /// Frequency-band viseme classification
    Viseme(Viseme),
}

impl LoudnessSample {
    /// The silent sample for a given mode
    pub fn silent(mode: AnalysisMode) -> Self {
        match mode {
            AnalysisMode::Loudness => LoudnessSample::Volume(0.0),
            AnalysisMode::Viseme => LoudnessSample::Viseme(Viseme::A),
        }
    }

    /// Scalar volume, if this is a volume sample
    pub fn volume(&self) -> Option<f32> {
        match self {
            LoudnessSample::Volume(v) => Some(*v),
            LoudnessSample::Viseme(_) => None,
        }
    }

    /// Viseme code, if this is a viseme sample
    pub fn viseme(&self) -> Option<Viseme> {
        match self {
            LoudnessSample::Volume(_) => None,
            LoudnessSample::Viseme(v) => Some(*v),
        }
    }
}

/// Analyzer configuration
#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    /// FFT window size (power of two, e.g. 256 or 1024)
    pub fft_size: usize,
    /// Exponential smoothing constant in [0, 1); higher = smoother
    pub smoothing: f32,
    /// Output mode
    pub mode: AnalysisMode,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self::loudness()
    }
}

impl AnalyzerConfig {
    /// Scalar-loudness config: small window, heavy smoothing
    pub fn loudness() -> Self {
        Self {
            fft_size: 256,
            smoothing: 0.8,
            mode: AnalysisMode::Loudness,
        }
    }

    /// Viseme config: larger window for speech resolution, light smoothing
    pub fn viseme() -> Self {
        Self {
            fft_size: 1024,
            smoothing: 0.3,
            mode: AnalysisMode::Viseme,
        }
    }
}

/// Any object exposing a live, analyzable mono audio signal
///
/// Implementations pull from a media element, a network track, a ring
/// buffer fed by a decoder, or a synthetic generator in tests.
pub trait AudioSource: Send {
    /// Fill `buf` with the next samples in [-1, 1]
    ///
    /// Returns the number of samples written; the analyzer zero-fills
    /// the remainder. Returning 0 means no data this tick.
    fn read_samples(&mut self, buf: &mut [f32]) -> usize;
}

/// Opaque handle for a connected audio source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceHandle(u64);

/// Live loudness/viseme analyzer over a fixed-size frequency transform
pub struct SpectrumAnalyzer {
    config: AnalyzerConfig,
    fft: Option<Arc<dyn rustfft::Fft<f32>>>,
    window: Vec<f32>,
    /// Smoothed byte-scaled magnitudes, one per positive-frequency bin
    bins: Vec<f32>,
    frame: Vec<f32>,
    scratch: Vec<Complex<f32>>,
    source: Option<(u64, Box<dyn AudioSource>)>,
}

impl SpectrumAnalyzer {
    /// Create an analyzer; an unusable transform degrades to silence
    ///
    /// An invalid FFT size (zero, or not a power of two) does not
    /// error: the analyzer logs once and every `sample` call returns
    /// the silent value for its mode.
    pub fn new(config: AnalyzerConfig) -> Self {
        let usable = config.fft_size >= 32 && config.fft_size.is_power_of_two();
        let fft = if usable {
            let mut planner = FftPlanner::new();
            Some(planner.plan_fft_forward(config.fft_size))
        } else {
            warn!(
                fft_size = config.fft_size,
                "unsupported FFT size, analyzer degraded to silent output"
            );
            None
        };

        let bin_count = config.fft_size / 2;
        Self {
            window: hann_window(config.fft_size),
            bins: vec![0.0; bin_count],
            frame: vec![0.0; config.fft_size],
            scratch: vec![Complex::new(0.0, 0.0); config.fft_size],
            fft,
            source: None,
            config,
        }
    }

    /// Connect an audio source, reusing an existing connection
    ///
    /// Attaching is idempotent per `source_id`: a second attach with
    /// the id already connected keeps the existing source and returns
    /// the same handle. A different id replaces the connection.
    pub fn attach(&mut self, source_id: u64, source: Box<dyn AudioSource>) -> SourceHandle {
        match &self.source {
            Some((existing, _)) if *existing == source_id => {
                debug!(source_id, "audio source already connected, reusing");
            }
            _ => {
                self.source = Some((source_id, source));
                self.bins.iter_mut().for_each(|b| *b = 0.0);
                debug!(source_id, "audio source connected");
            }
        }
        SourceHandle(source_id)
    }

    /// Disconnect the source behind `handle`, if still connected
    pub fn detach(&mut self, handle: SourceHandle) {
        if matches!(&self.source, Some((id, _)) if *id == handle.0) {
            self.source = None;
            self.bins.iter_mut().for_each(|b| *b = 0.0);
            debug!(source_id = handle.0, "audio source disconnected");
        }
    }

    /// Whether a source is currently connected
    pub fn is_attached(&self) -> bool {
        self.source.is_some()
    }

    /// Analyze one window and produce this tick's sample
    ///
    /// Never blocks and never fails: with no source, or a degraded
    /// transform, this returns the silent sample for the mode.
    pub fn sample(&mut self) -> LoudnessSample {
        let Some(fft) = self.fft.clone() else {
            return LoudnessSample::silent(self.config.mode);
        };
        let Some((_, source)) = self.source.as_mut() else {
            return LoudnessSample::silent(self.config.mode);
        };

        let n = source.read_samples(&mut self.frame).min(self.frame.len());
        if n < self.frame.len() {
            self.frame[n..].iter_mut().for_each(|s| *s = 0.0);
        }

        for (i, slot) in self.scratch.iter_mut().enumerate() {
            *slot = Complex::new(self.frame[i] * self.window[i], 0.0);
        }
        fft.process(&mut self.scratch);

        // Byte-scale magnitudes so a full-scale tone peaks near 255,
        // then smooth exponentially across ticks.
        let scale = 255.0 / (self.config.fft_size as f32 / 4.0);
        let tau = self.config.smoothing.clamp(0.0, 0.99);
        for (bin, value) in self.bins.iter_mut().zip(self.scratch.iter()) {
            let magnitude = (value.norm() * scale).clamp(0.0, 255.0);
            *bin = tau * *bin + (1.0 - tau) * magnitude;
        }

        match self.config.mode {
            AnalysisMode::Loudness => LoudnessSample::Volume(loudness(&self.bins)),
            AnalysisMode::Viseme => LoudnessSample::Viseme(Viseme::classify(&self.bins)),
        }
    }

    /// Current smoothed spectrum (byte-scaled)
    pub fn spectrum(&self) -> &[f32] {
        &self.bins
    }
}

/// Scalar loudness: mean speech-band magnitude normalized into [0, 1]
pub fn loudness(bins: &[f32]) -> f32 {
    let start = SPEECH_BAND.0.min(bins.len());
    let end = SPEECH_BAND.1.min(bins.len());
    if start >= end {
        return 0.0;
    }
    let average = bins[start..end].iter().sum::<f32>() / (end - start) as f32;
    (average / LOUDNESS_CEILING).clamp(0.0, 1.0)
}

/// Hann window (periodic form)
fn hann_window(size: usize) -> Vec<f32> {
    use std::f32::consts::PI;
    (0..size)
        .map(|i| 0.5 * (1.0 - (2.0 * PI * i as f32 / size as f32).cos()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    /// Endless sine tone at a fixed fraction of the sample rate
    struct SineSource {
        phase: f32,
        step: f32,
        amplitude: f32,
    }

    impl SineSource {
        fn new(frequency_fraction: f32, amplitude: f32) -> Self {
            Self {
                phase: 0.0,
                step: 2.0 * PI * frequency_fraction,
                amplitude,
            }
        }
    }

    impl AudioSource for SineSource {
        fn read_samples(&mut self, buf: &mut [f32]) -> usize {
            for sample in buf.iter_mut() {
                *sample = self.amplitude * self.phase.sin();
                self.phase += self.step;
            }
            buf.len()
        }
    }

    /// Source that never produces data
    struct EmptySource;

    impl AudioSource for EmptySource {
        fn read_samples(&mut self, _buf: &mut [f32]) -> usize {
            0
        }
    }

    #[test]
    fn test_sample_without_source_is_silent() {
        let mut analyzer = SpectrumAnalyzer::new(AnalyzerConfig::loudness());
        assert_eq!(analyzer.sample(), LoudnessSample::Volume(0.0));

        let mut analyzer = SpectrumAnalyzer::new(AnalyzerConfig::viseme());
        assert_eq!(analyzer.sample(), LoudnessSample::Viseme(Viseme::A));
    }

    #[test]
    fn test_degraded_transform_is_silent() {
        let mut analyzer = SpectrumAnalyzer::new(AnalyzerConfig {
            fft_size: 100, // not a power of two
            smoothing: 0.5,
            mode: AnalysisMode::Loudness,
        });
        analyzer.attach(1, Box::new(SineSource::new(0.1, 1.0)));
        assert_eq!(analyzer.sample(), LoudnessSample::Volume(0.0));
    }

    #[test]
    fn test_attach_is_idempotent() {
        let mut analyzer = SpectrumAnalyzer::new(AnalyzerConfig::loudness());
        let first = analyzer.attach(7, Box::new(SineSource::new(0.1, 1.0)));

        // Warm the spectrum, then re-attach with the same id: the
        // existing connection (and its smoothed state) is kept.
        for _ in 0..20 {
            analyzer.sample();
        }
        let warmed = analyzer.spectrum().to_vec();

        let second = analyzer.attach(7, Box::new(SineSource::new(0.1, 1.0)));
        assert_eq!(first, second);
        assert_eq!(analyzer.spectrum(), warmed.as_slice());

        // A different id replaces the connection and resets state.
        analyzer.attach(8, Box::new(EmptySource));
        assert!(analyzer.spectrum().iter().all(|&b| b == 0.0));
    }

    #[test]
    fn test_detach_silences_output() {
        let mut analyzer = SpectrumAnalyzer::new(AnalyzerConfig::loudness());
        let handle = analyzer.attach(3, Box::new(SineSource::new(0.08, 1.0)));
        for _ in 0..20 {
            analyzer.sample();
        }
        analyzer.detach(handle);
        assert!(!analyzer.is_attached());
        assert_eq!(analyzer.sample(), LoudnessSample::Volume(0.0));
    }

    #[test]
    fn test_speech_band_tone_raises_loudness() {
        // Bin 20 of 128 at fft_size 256: inside the speech band
        let mut analyzer = SpectrumAnalyzer::new(AnalyzerConfig::loudness());
        analyzer.attach(1, Box::new(SineSource::new(20.0 / 256.0, 1.0)));

        let mut volume = 0.0;
        for _ in 0..50 {
            if let LoudnessSample::Volume(v) = analyzer.sample() {
                volume = v;
            }
        }
        assert!(volume > 0.0, "tone in the speech band must register");
        assert!(volume <= 1.0);
    }

    #[test]
    fn test_out_of_band_tone_stays_quiet() {
        // Bin 60 of 128: outside the 10..40 speech band
        let mut analyzer = SpectrumAnalyzer::new(AnalyzerConfig::loudness());
        analyzer.attach(1, Box::new(SineSource::new(60.0 / 256.0, 1.0)));

        let mut volume = 1.0;
        for _ in 0..50 {
            if let LoudnessSample::Volume(v) = analyzer.sample() {
                volume = v;
            }
        }
        assert!(volume < 0.2, "tone outside the speech band, got {volume}");
    }

    #[test]
    fn test_loudness_clamps_to_unit_range() {
        let bins = vec![255.0f32; 128];
        assert_eq!(loudness(&bins), 1.0);
        assert_eq!(loudness(&[]), 0.0);
    }
}
