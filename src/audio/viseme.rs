//! Viseme classification from frequency spectra
//!
//! Maps a byte-scaled frequency spectrum (0..255 per bin, the shape a
//! Web-Audio-style analyser produces) to one of nine discrete mouth
//! codes. The classification is purely energetic: which band dominates
//! and how loud the frame is overall. No phonetic analysis.

/// Discrete mouth-shape code
///
/// `A` doubles as the silence/closed code; `X` is the closed default
/// for quiet mid-band frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Viseme {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
    X,
}

/// Silence gate: frames whose overall mean is below this stay closed
const SILENCE_FLOOR: f32 = 5.0;

/// Low band, roughly 100-300 Hz at 1024-point FFT: rounded vowels
const LOW_BAND: (usize, usize) = (2, 6);
/// Mid band, roughly 300-2000 Hz: open vowels and most consonants
const MID_BAND: (usize, usize) = (6, 40);
/// High band, 2 kHz and up: fricatives
const HIGH_BAND: (usize, usize) = (40, 100);

impl Viseme {
    /// Classify a spectrum into a viseme code
    ///
    /// `bins` holds byte-scaled magnitudes (0..255). Short spectra are
    /// handled by clamping band ranges; an empty spectrum is silence.
    pub fn classify(bins: &[f32]) -> Viseme {
        if bins.is_empty() {
            return Viseme::A;
        }

        let average = bins.iter().sum::<f32>() / bins.len() as f32;
        if average < SILENCE_FLOOR {
            return Viseme::A;
        }

        let low = band_mean(bins, LOW_BAND);
        let mid = band_mean(bins, MID_BAND);
        let high = band_mean(bins, HIGH_BAND);

        if high > mid && high > low {
            // Fricatives: "F", "S", "TH"
            if average > 60.0 {
                Viseme::H
            } else {
                Viseme::G
            }
        } else if low > mid {
            // Rounded vowels: "O", "U"
            if average > 50.0 {
                Viseme::E
            } else {
                Viseme::F
            }
        } else {
            // Open vowels and consonants: "A", "E", "I", "kk"
            if average > 70.0 {
                Viseme::D
            } else if average > 50.0 {
                Viseme::C
            } else if average > 30.0 {
                Viseme::B
            } else {
                Viseme::X
            }
        }
    }

    /// Morph target name for this code (Oculus viseme naming)
    pub fn morph_target(&self) -> &'static str {
        match self {
            Viseme::A => "viseme_PP",
            Viseme::B => "viseme_kk",
            Viseme::C => "viseme_I",
            Viseme::D => "viseme_AA",
            Viseme::E => "viseme_O",
            Viseme::F => "viseme_U",
            Viseme::G => "viseme_FF",
            Viseme::H => "viseme_TH",
            Viseme::X => "viseme_PP",
        }
    }

    /// All viseme codes
    pub fn all() -> &'static [Viseme] {
        &[
            Viseme::A,
            Viseme::B,
            Viseme::C,
            Viseme::D,
            Viseme::E,
            Viseme::F,
            Viseme::G,
            Viseme::H,
            Viseme::X,
        ]
    }
}

impl std::fmt::Display for Viseme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let code = match self {
            Viseme::A => "A",
            Viseme::B => "B",
            Viseme::C => "C",
            Viseme::D => "D",
            Viseme::E => "E",
            Viseme::F => "F",
            Viseme::G => "G",
            Viseme::H => "H",
            Viseme::X => "X",
        };
        write!(f, "{}", code)
    }
}

/// Mean magnitude over a half-open bin range, clamped to the spectrum
fn band_mean(bins: &[f32], (start, end): (usize, usize)) -> f32 {
    let start = start.min(bins.len());
    let end = end.min(bins.len());
    if start >= end {
        return 0.0;
    }
    bins[start..end].iter().sum::<f32>() / (end - start) as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 128-bin spectrum with a constant value over one bin range
    fn spectrum(range: (usize, usize), value: f32) -> Vec<f32> {
        let mut bins = vec![0.0f32; 128];
        for bin in bins[range.0..range.1].iter_mut() {
            *bin = value;
        }
        bins
    }

    #[test]
    fn test_silent_spectrum_is_closed() {
        // Overall average 1: below the silence floor
        let bins = vec![1.0f32; 128];
        assert_eq!(Viseme::classify(&bins), Viseme::A);
        assert_eq!(Viseme::classify(&[]), Viseme::A);
    }

    #[test]
    fn test_high_band_energy_maps_to_th() {
        // All energy in bins 40..100, overall average ~65
        let bins = spectrum((40, 100), 65.0 * 128.0 / 60.0);
        let average = bins.iter().sum::<f32>() / bins.len() as f32;
        assert!((average - 65.0).abs() < 0.5);
        assert_eq!(Viseme::classify(&bins), Viseme::H);
    }

    #[test]
    fn test_quiet_high_band_maps_to_ff() {
        // High band dominates but overall average stays below 60
        let bins = spectrum((40, 100), 100.0);
        assert_eq!(Viseme::classify(&bins), Viseme::G);
    }

    #[test]
    fn test_low_band_vowels() {
        // Low band dominates, loud frame: open "O"
        let mut bins = spectrum((2, 6), 255.0);
        for bin in bins[6..128].iter_mut() {
            *bin = 50.0;
        }
        assert!(bins.iter().sum::<f32>() / 128.0 > 50.0);
        assert_eq!(Viseme::classify(&bins), Viseme::E);

        // Low band dominates, quiet frame: rounded "U"
        let bins = spectrum((2, 6), 200.0);
        assert_eq!(Viseme::classify(&bins), Viseme::F);
    }

    #[test]
    fn test_mid_band_ladder() {
        // Mid band dominates; the overall average picks the code
        let loud = spectrum((6, 40), 71.0 * 128.0 / 34.0);
        assert_eq!(Viseme::classify(&loud), Viseme::D);

        let medium = spectrum((6, 40), 55.0 * 128.0 / 34.0);
        assert_eq!(Viseme::classify(&medium), Viseme::C);

        let soft = spectrum((6, 40), 35.0 * 128.0 / 34.0);
        assert_eq!(Viseme::classify(&soft), Viseme::B);

        let faint = spectrum((6, 40), 10.0 * 128.0 / 34.0);
        assert_eq!(Viseme::classify(&faint), Viseme::X);
    }

    #[test]
    fn test_morph_targets_shared_closed_shape() {
        // A and X both map to the closed PP shape
        assert_eq!(Viseme::A.morph_target(), Viseme::X.morph_target());
        assert_eq!(Viseme::D.morph_target(), "viseme_AA");
        assert_eq!(Viseme::all().len(), 9);
    }
}
