//! Strategy application
//!
//! Applies a validated [`Strategy`] to a waveform through an ordered chain
//! of transforms. Order matters: each stage consumes the previous stage's
//! output.
//!
//! 1. Noise suppression (spectral subtraction)
//! 2. Noise gate
//! 3. Speech band emphasis
//! 4. Dynamic range compression
//! 5. Custom banded emphasis
//! 6. Fixed high/low frequency adjustments
//! 7. Adaptive gain
//! 8. Hard clip to [-1, 1]
//!
//! Spectral stages transform the whole frame at once. That is fine for the
//! bounded-duration frames this pipeline processes; a streaming variant
//! would need overlap-add block processing instead.

use crate::dsp::spectrum::{db_to_linear, moving_average, percentile, Fft};
use crate::strategy::{BandEmphasis, Strategy};
use rustfft::num_complex::Complex;

/// Percentile of per-bin energy used as the noise floor estimate
const NOISE_FLOOR_PERCENTILE: f32 = 10.0;

/// Fraction of original bin energy kept as a floor during subtraction,
/// which limits musical-noise artifacts from over-suppression
const SUPPRESSION_ENERGY_FLOOR: f32 = 0.1;

/// Scale applied to the linear gate threshold before masking
const GATE_THRESHOLD_SCALE: f32 = 0.1;

/// Moving-average window for gate mask smoothing (samples)
const GATE_SMOOTHING_WINDOW: usize = 100;

/// Amplitude above which compression engages
const COMPRESSION_THRESHOLD: f32 = 0.5;

/// Moving-average window for the compression gain envelope (samples)
const COMPRESSION_SMOOTHING_WINDOW: usize = 50;

/// Speech band emphasized by the enhancement stage (Hz)
const SPEECH_BAND_LOW_HZ: f32 = 300.0;
const SPEECH_BAND_HIGH_HZ: f32 = 3000.0;

/// Presence region boosted by the fixed high adjustment (Hz)
const HIGH_ADJUST_HZ: f32 = 4000.0;

/// Rumble region attenuated by the fixed low adjustment (Hz)
const LOW_ADJUST_HZ: f32 = 200.0;

/// Band edges for custom banded emphasis (Hz)
const BAND_LOW_HZ: f32 = 500.0;
const BAND_MID_HZ: f32 = 2000.0;
const BAND_HIGH_HZ: f32 = 8000.0;

/// Applies validated processing strategies to waveforms
pub struct AudioProcessor {
    sample_rate: u32,
    fft: Fft,
}

impl AudioProcessor {
    /// Create a processor for the given sample rate
    pub fn new(sample_rate: u32) -> Self {
        Self {
            sample_rate,
            fft: Fft::new(1),
        }
    }

    /// Sample rate this processor assumes for its input frames
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Apply a strategy to a frame
    ///
    /// The output always has the same length as the input and every sample
    /// lies in [-1, 1]. Identical input and strategy produce identical
    /// output.
    pub fn apply(&mut self, samples: &[f32], strategy: &Strategy) -> Vec<f32> {
        if samples.is_empty() {
            return Vec::new();
        }
        self.fft.resize(samples.len());

        let mut processed = samples.to_vec();

        if strategy.noise_suppression_strength > 0.0 {
            processed = self.suppress_noise(&processed, strategy.noise_suppression_strength);
        }

        processed = noise_gate(&processed, strategy.noise_gate_threshold_db);

        if strategy.speech_enhancement_strength > 0.0 {
            processed = self.enhance_speech(&processed, strategy.speech_enhancement_strength);
        }

        if strategy.compression_ratio > 1.0 {
            processed = compress(&processed, strategy.compression_ratio);
        }

        if let Some(bands) = &strategy.band_emphasis {
            if !bands.is_flat() {
                processed = self.emphasize_bands(&processed, bands);
            }
        }

        processed = self.adjust_frequency_shelves(
            &processed,
            strategy.high_freq_boost_db,
            strategy.low_freq_reduction_db,
        );

        for sample in &mut processed {
            *sample = (*sample * strategy.adaptive_gain).clamp(-1.0, 1.0);
        }

        processed
    }

    /// Spectral subtraction against the 10th-percentile energy floor
    fn suppress_noise(&self, samples: &[f32], strength: f32) -> Vec<f32> {
        let mut spectrum = self.fft.forward_real(samples);
        let energies: Vec<f32> = spectrum.iter().map(|c| c.norm_sqr()).collect();
        let noise_floor = percentile(&energies, NOISE_FLOOR_PERCENTILE);

        for (bin, &energy) in spectrum.iter_mut().zip(energies.iter()) {
            let suppressed =
                (energy - strength * noise_floor).max(SUPPRESSION_ENERGY_FLOOR * energy);
            // Keep the original phase, only the magnitude shrinks
            *bin = Complex::from_polar(suppressed.sqrt(), bin.arg());
        }

        self.fft.inverse_real(&spectrum)
    }

    /// Multiply the speech band by 1 + 0.5 * level, other bins unchanged
    fn enhance_speech(&self, samples: &[f32], level: f32) -> Vec<f32> {
        let gain = 1.0 + 0.5 * level;
        self.shape_spectrum(samples, |freq| {
            if (SPEECH_BAND_LOW_HZ..=SPEECH_BAND_HIGH_HZ).contains(&freq) {
                gain
            } else {
                1.0
            }
        })
    }

    /// Per-band emphasis in dB over the four named bands
    fn emphasize_bands(&self, samples: &[f32], bands: &BandEmphasis) -> Vec<f32> {
        let low = db_to_linear(bands.low_db);
        let mid_low = db_to_linear(bands.mid_low_db);
        let mid_high = db_to_linear(bands.mid_high_db);
        let high = db_to_linear(bands.high_db);

        self.shape_spectrum(samples, |freq| {
            if freq < BAND_LOW_HZ {
                low
            } else if freq < BAND_MID_HZ {
                mid_low
            } else if freq < BAND_HIGH_HZ {
                mid_high
            } else {
                high
            }
        })
    }

    /// Fixed presence boost above 4 kHz and rumble reduction below 200 Hz
    fn adjust_frequency_shelves(
        &self,
        samples: &[f32],
        high_boost_db: f32,
        low_reduction_db: f32,
    ) -> Vec<f32> {
        if high_boost_db == 0.0 && low_reduction_db == 0.0 {
            return samples.to_vec();
        }
        let boost = db_to_linear(high_boost_db);
        let reduction = db_to_linear(low_reduction_db);

        self.shape_spectrum(samples, |freq| {
            if high_boost_db != 0.0 && freq > HIGH_ADJUST_HZ {
                boost
            } else if low_reduction_db != 0.0 && freq < LOW_ADJUST_HZ {
                reduction
            } else {
                1.0
            }
        })
    }

    /// Forward transform, apply a real per-bin gain by frequency, invert
    fn shape_spectrum(&self, samples: &[f32], gain_at: impl Fn(f32) -> f32) -> Vec<f32> {
        let mut spectrum = self.fft.forward_real(samples);
        for (k, bin) in spectrum.iter_mut().enumerate() {
            *bin *= gain_at(self.fft.bin_frequency(k, self.sample_rate));
        }
        self.fft.inverse_real(&spectrum)
    }
}

/// Binary open/close mask from the gate threshold, smoothed to avoid clicks
fn noise_gate(samples: &[f32], threshold_db: f32) -> Vec<f32> {
    let threshold = db_to_linear(threshold_db) * GATE_THRESHOLD_SCALE;
    let mask: Vec<f32> = samples
        .iter()
        .map(|&s| if s.abs() > threshold { 1.0 } else { 0.0 })
        .collect();
    let gate = moving_average(&mask, GATE_SMOOTHING_WINDOW);
    samples.iter().zip(gate.iter()).map(|(&s, &g)| s * g).collect()
}

/// Static downward compression above the fixed threshold
///
/// The gain envelope is smoothed with a short moving average before it is
/// applied, which suppresses pumping artifacts from sample-rate gain jumps.
fn compress(samples: &[f32], ratio: f32) -> Vec<f32> {
    let gains: Vec<f32> = samples
        .iter()
        .map(|&s| {
            let level = s.abs();
            if level > COMPRESSION_THRESHOLD {
                (COMPRESSION_THRESHOLD + (level - COMPRESSION_THRESHOLD) / ratio) / level
            } else {
                1.0
            }
        })
        .collect();
    let smoothed = moving_average(&gains, COMPRESSION_SMOOTHING_WINDOW);
    samples
        .iter()
        .zip(smoothed.iter())
        .map(|(&s, &g)| s * g)
        .collect()
}
