//! Spectral and signal helpers shared by the extractor and the processor
//!
//! The pipeline transforms whole bounded-duration frames at once, so the
//! FFT wrapper works on arbitrary frame lengths and exposes only the
//! positive-frequency half spectrum. Streaming reimplementations would
//! replace this with overlap-add block processing.

use rustfft::num_complex::Complex;
use rustfft::FftPlanner;
use std::sync::Arc;

/// Value floor used before taking log of an RMS or magnitude
pub const LOG_FLOOR: f32 = 1e-10;

/// FFT processor with cached plans for one frame length
pub struct Fft {
    planner: FftPlanner<f32>,
    forward: Arc<dyn rustfft::Fft<f32>>,
    inverse: Arc<dyn rustfft::Fft<f32>>,
    size: usize,
}

impl Fft {
    /// Create a new FFT processor for the given frame length
    pub fn new(size: usize) -> Self {
        let mut planner = FftPlanner::new();
        let forward = planner.plan_fft_forward(size.max(1));
        let inverse = planner.plan_fft_inverse(size.max(1));
        Self {
            planner,
            forward,
            inverse,
            size: size.max(1),
        }
    }

    /// Current frame length
    pub fn size(&self) -> usize {
        self.size
    }

    /// Re-plan for a different frame length if needed
    pub fn resize(&mut self, size: usize) {
        let size = size.max(1);
        if size != self.size {
            self.forward = self.planner.plan_fft_forward(size);
            self.inverse = self.planner.plan_fft_inverse(size);
            self.size = size;
        }
    }

    /// Forward transform of a real signal
    ///
    /// Returns the positive-frequency half spectrum (`size/2 + 1` bins,
    /// DC through Nyquist).
    pub fn forward_real(&self, input: &[f32]) -> Vec<Complex<f32>> {
        let mut buffer: Vec<Complex<f32>> =
            input.iter().map(|&x| Complex::new(x, 0.0)).collect();
        buffer.resize(self.size, Complex::new(0.0, 0.0));

        self.forward.process(&mut buffer);

        buffer.truncate(self.size / 2 + 1);
        buffer
    }

    /// Inverse transform of a half spectrum back to a real signal
    ///
    /// The negative frequencies are reconstructed by conjugate symmetry, so
    /// any per-bin edit applied to the half spectrum lands symmetrically
    /// and the output stays real.
    pub fn inverse_real(&self, half: &[Complex<f32>]) -> Vec<f32> {
        let mut buffer = Vec::with_capacity(self.size);
        buffer.extend_from_slice(half);
        for k in half.len()..self.size {
            buffer.push(half[self.size - k].conj());
        }
        buffer.resize(self.size, Complex::new(0.0, 0.0));

        self.inverse.process(&mut buffer);

        let scale = 1.0 / self.size as f32;
        buffer.iter().map(|c| c.re * scale).collect()
    }

    /// Center frequency of half-spectrum bin `k` in Hz
    pub fn bin_frequency(&self, k: usize, sample_rate: u32) -> f32 {
        k as f32 * sample_rate as f32 / self.size as f32
    }
}

/// Convert decibels to linear amplitude
#[inline]
pub fn db_to_linear(db: f32) -> f32 {
    10.0_f32.powf(db / 20.0)
}

/// Convert linear amplitude to decibels, floored to avoid -inf
#[inline]
pub fn linear_to_db(linear: f32) -> f32 {
    20.0 * linear.max(LOG_FLOOR).log10()
}

/// Centered moving average with zero-padded edges
///
/// For window `w` the average at index `i` spans `[i - w/2, i + (w-1)/2]`
/// and always divides by the full window length, so edges taper toward
/// zero instead of overweighting the few samples present there.
pub fn moving_average(values: &[f32], window: usize) -> Vec<f32> {
    if window <= 1 || values.is_empty() {
        return values.to_vec();
    }
    let n = values.len();
    let mut prefix = vec![0.0f64; n + 1];
    for (i, &v) in values.iter().enumerate() {
        prefix[i + 1] = prefix[i] + f64::from(v);
    }

    let before = window / 2;
    let after = window - before;
    let inv = 1.0 / window as f64;
    (0..n)
        .map(|i| {
            let lo = i.saturating_sub(before);
            let hi = (i + after).min(n);
            ((prefix[hi] - prefix[lo]) * inv) as f32
        })
        .collect()
}

/// Percentile with linear interpolation between closest ranks
pub fn percentile(values: &[f32], pct: f32) -> f32 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let rank = (pct / 100.0).clamp(0.0, 1.0) * (sorted.len() - 1) as f32;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    if lo == hi {
        sorted[lo]
    } else {
        let frac = rank - lo as f32;
        sorted[lo] * (1.0 - frac) + sorted[hi] * frac
    }
}

/// Basic level statistics for a signal
#[derive(Debug, Clone, Copy, serde::Serialize, serde::Deserialize)]
pub struct SignalStats {
    /// RMS level (linear)
    pub rms: f32,
    /// RMS level in dB
    pub rms_db: f32,
    /// Peak absolute sample value
    pub peak: f32,
    /// Peak level in dB
    pub peak_db: f32,
    /// Peak-to-RMS ratio
    pub crest_factor: f32,
}

/// Compute level statistics for a signal
pub fn signal_stats(samples: &[f32]) -> SignalStats {
    if samples.is_empty() {
        return SignalStats {
            rms: 0.0,
            rms_db: linear_to_db(0.0),
            peak: 0.0,
            peak_db: linear_to_db(0.0),
            crest_factor: 0.0,
        };
    }
    let rms = rms(samples);
    let peak = samples.iter().fold(0.0f32, |acc, &s| acc.max(s.abs()));
    SignalStats {
        rms,
        rms_db: linear_to_db(rms),
        peak,
        peak_db: linear_to_db(peak),
        crest_factor: peak / (rms + LOG_FLOOR),
    }
}

/// Root-mean-square level of a signal
pub fn rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum_sq: f64 = samples.iter().map(|&s| f64::from(s) * f64::from(s)).sum();
    ((sum_sq / samples.len() as f64) as f32).sqrt()
}

/// Scale a signal so its RMS level lands at `target_db`
pub fn normalize_to_db(samples: &[f32], target_db: f32) -> Vec<f32> {
    let current_db = linear_to_db(rms(samples));
    let gain = db_to_linear(target_db - current_db);
    samples.iter().map(|&s| s * gain).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f32::consts::PI;

    #[test]
    fn test_fft_roundtrip() {
        let fft = Fft::new(256);
        let input: Vec<f32> = (0..256)
            .map(|i| (2.0 * PI * 10.0 * i as f32 / 256.0).sin())
            .collect();

        let spectrum = fft.forward_real(&input);
        assert_eq!(spectrum.len(), 129);

        let reconstructed = fft.inverse_real(&spectrum);
        for (a, b) in input.iter().zip(reconstructed.iter()) {
            assert_abs_diff_eq!(a, b, epsilon = 1e-3);
        }
    }

    #[test]
    fn test_fft_roundtrip_odd_length() {
        let fft = Fft::new(255);
        let input: Vec<f32> = (0..255).map(|i| ((i % 17) as f32 - 8.0) / 8.0).collect();

        let spectrum = fft.forward_real(&input);
        let reconstructed = fft.inverse_real(&spectrum);
        for (a, b) in input.iter().zip(reconstructed.iter()) {
            assert_abs_diff_eq!(a, b, epsilon = 1e-3);
        }
    }

    #[test]
    fn test_fft_resize() {
        let mut fft = Fft::new(128);
        fft.resize(512);
        assert_eq!(fft.size(), 512);
        assert_eq!(fft.forward_real(&vec![0.0; 512]).len(), 257);
    }

    #[test]
    fn test_bin_frequency() {
        let fft = Fft::new(1600);
        assert_abs_diff_eq!(fft.bin_frequency(0, 16000), 0.0);
        assert_abs_diff_eq!(fft.bin_frequency(100, 16000), 1000.0);
        // Nyquist
        assert_abs_diff_eq!(fft.bin_frequency(800, 16000), 8000.0);
    }

    #[test]
    fn test_db_conversions() {
        assert_abs_diff_eq!(db_to_linear(0.0), 1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(db_to_linear(-20.0), 0.1, epsilon = 1e-6);
        assert_abs_diff_eq!(linear_to_db(1.0), 0.0, epsilon = 1e-4);
        assert_abs_diff_eq!(linear_to_db(0.1), -20.0, epsilon = 1e-4);
        // Floor avoids -inf for silence
        assert_abs_diff_eq!(linear_to_db(0.0), -200.0, epsilon = 1e-3);
    }

    #[test]
    fn test_moving_average_constant_signal() {
        let values = vec![1.0; 200];
        let smoothed = moving_average(&values, 100);
        assert_eq!(smoothed.len(), 200);
        // Center is unaffected, edges taper because of zero padding
        assert_abs_diff_eq!(smoothed[100], 1.0, epsilon = 1e-6);
        assert!(smoothed[0] < 0.6);
    }

    #[test]
    fn test_moving_average_window_one_is_identity() {
        let values = vec![0.5, -0.25, 0.75];
        assert_eq!(moving_average(&values, 1), values);
    }

    #[test]
    fn test_percentile() {
        let values = vec![4.0, 1.0, 3.0, 2.0, 5.0];
        assert_abs_diff_eq!(percentile(&values, 0.0), 1.0);
        assert_abs_diff_eq!(percentile(&values, 50.0), 3.0);
        assert_abs_diff_eq!(percentile(&values, 100.0), 5.0);
        // Linear interpolation between ranks
        assert_abs_diff_eq!(percentile(&values, 10.0), 1.4, epsilon = 1e-6);
    }

    #[test]
    fn test_signal_stats_sine() {
        let signal: Vec<f32> = (0..16000)
            .map(|i| (2.0 * PI * 440.0 * i as f32 / 16000.0).sin())
            .collect();
        let stats = signal_stats(&signal);
        assert_abs_diff_eq!(stats.rms, 1.0 / 2.0_f32.sqrt(), epsilon = 1e-3);
        assert_abs_diff_eq!(stats.peak, 1.0, epsilon = 1e-3);
        assert_abs_diff_eq!(stats.crest_factor, 2.0_f32.sqrt(), epsilon = 1e-2);
    }

    #[test]
    fn test_normalize_to_db() {
        let signal = vec![0.01; 1000];
        let normalized = normalize_to_db(&signal, -20.0);
        let stats = signal_stats(&normalized);
        assert_abs_diff_eq!(stats.rms_db, -20.0, epsilon = 0.1);
    }
}
