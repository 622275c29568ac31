//! Audio feature extraction
//!
//! Converts a waveform into an [`AudioFeatureSet`] of spectral, temporal
//! and semantic descriptors. Extraction is a pure, deterministic function
//! of the input samples: the same frame always yields the same features.
//!
//! The semantic descriptors are deliberately cheap heuristics. They trade
//! classification accuracy for determinism and zero model weight, which is
//! all the decision loop needs.

use super::features::{AudioFeatureSet, NoiseType, SoundEvent};
use crate::analysis::features::thresholds;
use crate::dsp::{linear_to_db, rms, Fft};

/// Center of the speech band used by the centroid proximity score (Hz)
const SPEECH_CENTROID_HZ: f32 = 2000.0;

/// Half-width of the centroid proximity score (Hz)
const SPEECH_CENTROID_WIDTH_HZ: f32 = 4000.0;

/// Zero-crossing rate typical for speech
const SPEECH_ZCR: f32 = 0.5;

/// Width of the ZCR proximity score
const SPEECH_ZCR_WIDTH: f32 = 1.0;

/// Fraction of total energy defining the rolloff frequency
const ROLLOFF_FRACTION: f32 = 0.85;

/// Extracts audio features without handing raw waveforms downstream
pub struct FeatureExtractor {
    sample_rate: u32,
}

impl FeatureExtractor {
    /// Create a feature extractor for the given sample rate
    pub fn new(sample_rate: u32) -> Self {
        Self { sample_rate }
    }

    /// Sample rate this extractor assumes for its input frames
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Extract features from one frame
    ///
    /// Malformed input (empty, or containing non-finite samples) never
    /// errors; it yields the conservative degraded feature set instead.
    pub fn extract(&self, samples: &[f32], duration_hint_ms: Option<f32>) -> AudioFeatureSet {
        let duration_ms = duration_hint_ms
            .unwrap_or_else(|| samples.len() as f32 / self.sample_rate as f32 * 1000.0);

        if samples.is_empty() || samples.iter().any(|s| !s.is_finite()) {
            return AudioFeatureSet::degraded(self.sample_rate, duration_ms);
        }

        let fft = Fft::new(samples.len());
        let magnitudes: Vec<f32> = fft
            .forward_real(samples)
            .iter()
            .map(|c| c.norm())
            .collect();

        let spectral_centroid_hz = self.spectral_centroid(&fft, &magnitudes);
        let spectral_rolloff_hz = self.spectral_rolloff(&fft, &magnitudes);
        let zero_crossing_rate = zero_crossing_rate(samples);
        let onset_strength = onset_strength(samples);
        let noise_level_db = linear_to_db(rms(samples));
        let speech_probability = speech_probability(spectral_centroid_hz, zero_crossing_rate);

        AudioFeatureSet {
            spectral_centroid_hz,
            spectral_rolloff_hz,
            zero_crossing_rate,
            onset_strength,
            noise_level_db,
            speech_probability,
            noise_type: NoiseType::from_centroid(spectral_centroid_hz),
            sound_event: SoundEvent::classify(noise_level_db, speech_probability),
            is_silence: noise_level_db < thresholds::SILENCE_DB,
            is_speech_present: speech_probability > thresholds::SPEECH_PRESENT,
            sample_rate: self.sample_rate,
            duration_ms,
            timestamp: None,
        }
    }

    /// Magnitude-weighted mean frequency; 0 for an empty spectrum
    fn spectral_centroid(&self, fft: &Fft, magnitudes: &[f32]) -> f32 {
        let total: f32 = magnitudes.iter().sum();
        if total <= 0.0 {
            return 0.0;
        }
        let weighted: f32 = magnitudes
            .iter()
            .enumerate()
            .map(|(k, &m)| fft.bin_frequency(k, self.sample_rate) * m)
            .sum();
        weighted / total
    }

    /// Smallest frequency whose cumulative magnitude reaches 85% of total
    fn spectral_rolloff(&self, fft: &Fft, magnitudes: &[f32]) -> f32 {
        let total: f32 = magnitudes.iter().sum();
        if total <= 0.0 {
            return 0.0;
        }
        let target = ROLLOFF_FRACTION * total;
        let mut cumulative = 0.0;
        for (k, &m) in magnitudes.iter().enumerate() {
            cumulative += m;
            if cumulative >= target {
                return fft.bin_frequency(k, self.sample_rate);
            }
        }
        0.0
    }
}

/// Mean of sign changes between consecutive samples, normalized by 2
fn zero_crossing_rate(samples: &[f32]) -> f32 {
    if samples.len() < 2 {
        return 0.0;
    }
    let changes: f32 = samples
        .windows(2)
        .map(|w| (sign(w[1]) - sign(w[0])).abs())
        .sum();
    changes / (samples.len() - 1) as f32 / 2.0
}

fn sign(x: f32) -> f32 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// RMS energy of the first difference, a cheap onset proxy
fn onset_strength(samples: &[f32]) -> f32 {
    if samples.len() < 2 {
        return 0.0;
    }
    let diffs: Vec<f32> = samples.windows(2).map(|w| w[1] - w[0]).collect();
    rms(&diffs)
}

/// Average of two clamped proximity scores: centroid near 2 kHz, ZCR near 0.5
fn speech_probability(centroid_hz: f32, zcr: f32) -> f32 {
    let centroid_score =
        (1.0 - (centroid_hz - SPEECH_CENTROID_HZ).abs() / SPEECH_CENTROID_WIDTH_HZ).clamp(0.0, 1.0);
    let zcr_score = (1.0 - (zcr - SPEECH_ZCR).abs() / SPEECH_ZCR_WIDTH).clamp(0.0, 1.0);
    (centroid_score + zcr_score) / 2.0
}
