//! CLI command handlers

use crate::agent::RuleBasedAdvisor;
use crate::analysis::FeatureExtractor;
use crate::controller::Controller;
use crate::profile::UserProfile;
use crate::strategy::StrategyLibrary;
use crate::{AurisError, Result};
use hound::{SampleFormat, WavSpec, WavWriter};
use log::{info, warn};
use std::path::Path;

/// Read a WAV file and fold it down to mono f32 samples
pub fn read_wav_mono(path: &Path) -> Result<(Vec<f32>, u32)> {
    let mut reader = hound::WavReader::open(path).map_err(|e| AurisError::UnsupportedWav {
        reason: format!("{}: {e}", path.display()),
    })?;
    let spec = reader.spec();
    let channels = spec.channels as usize;

    let interleaved: Vec<f32> = match spec.sample_format {
        SampleFormat::Float => reader
            .samples::<f32>()
            .collect::<std::result::Result<_, _>>()
            .map_err(|e| AurisError::UnsupportedWav {
                reason: e.to_string(),
            })?,
        SampleFormat::Int => {
            let scale = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 / scale))
                .collect::<std::result::Result<_, _>>()
                .map_err(|e| AurisError::UnsupportedWav {
                    reason: e.to_string(),
                })?
        }
    };

    if interleaved.is_empty() {
        return Err(AurisError::EmptyAudio);
    }

    // Average channels down to mono
    let mono: Vec<f32> = interleaved
        .chunks(channels)
        .map(|frame| frame.iter().sum::<f32>() / channels as f32)
        .collect();

    Ok((mono, spec.sample_rate))
}

/// Write mono f32 samples as a 16-bit WAV file
pub fn write_wav_mono(path: &Path, samples: &[f32], sample_rate: u32) -> Result<()> {
    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let mut writer = WavWriter::create(path, spec).map_err(|e| AurisError::UnsupportedWav {
        reason: e.to_string(),
    })?;
    for &sample in samples {
        let quantized = (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
        writer
            .write_sample(quantized)
            .map_err(|e| AurisError::UnsupportedWav {
                reason: e.to_string(),
            })?;
    }
    writer.finalize().map_err(|e| AurisError::UnsupportedWav {
        reason: e.to_string(),
    })?;
    Ok(())
}

/// Run a WAV file through the pipeline frame by frame
pub fn process(input: &Path, output: &Path, preset: Option<&str>, frame_ms: u32) -> Result<()> {
    let (samples, sample_rate) = read_wav_mono(input)?;
    info!(
        "Loaded {} ({} samples at {} Hz)",
        input.display(),
        samples.len(),
        sample_rate
    );

    let frame_len = (sample_rate as usize * frame_ms as usize / 1000).max(1);
    let mut processed = Vec::with_capacity(samples.len());
    let mut decisions = 0usize;

    if let Some(preset) = preset {
        // A fixed preset skips the decision loop entirely
        let library = StrategyLibrary::new();
        let strategy = library
            .get(preset)
            .ok_or_else(|| AurisError::UnknownPreset {
                name: preset.to_string(),
            })?
            .strategy
            .clone();
        let mut processor = crate::dsp::AudioProcessor::new(sample_rate);
        for chunk in samples.chunks(frame_len) {
            processed.extend_from_slice(&processor.apply(chunk, &strategy));
        }
    } else {
        let mut controller = Controller::new(
            sample_rate,
            UserProfile::default(),
            Box::new(RuleBasedAdvisor::new()),
        );
        for chunk in samples.chunks(frame_len) {
            let outcome = controller.process(chunk, false)?;
            if outcome.decision_made {
                decisions += 1;
            }
            if let Some(check) = &outcome.safety {
                for warning in &check.warnings {
                    warn!("{warning}");
                }
            }
            processed.extend_from_slice(&outcome.processed);
        }
    }

    write_wav_mono(output, &processed, sample_rate)?;
    info!(
        "Wrote {} ({} frames, {} decision cycles)",
        output.display(),
        samples.len().div_ceil(frame_len),
        decisions
    );
    Ok(())
}

/// Extract features from a WAV file and print them as JSON
pub fn features(input: &Path) -> Result<()> {
    let (samples, sample_rate) = read_wav_mono(input)?;
    let extractor = FeatureExtractor::new(sample_rate);
    let features = extractor.extract(&samples, None);

    println!("{}", serde_json::to_string_pretty(&features)?);
    println!();
    println!("{}", features.context_summary());
    Ok(())
}

/// List available strategy presets
pub fn presets() -> Result<()> {
    let library = StrategyLibrary::new();
    for name in library.names() {
        let description = library.description(name).unwrap_or("");
        println!("{name:<20} {description}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    fn sine_wav(path: &Path, sample_rate: u32, seconds: f32) {
        let num_samples = (sample_rate as f32 * seconds) as usize;
        let samples: Vec<f32> = (0..num_samples)
            .map(|i| 0.5 * (2.0 * PI * 440.0 * i as f32 / sample_rate as f32).sin())
            .collect();
        write_wav_mono(path, &samples, sample_rate).unwrap();
    }

    #[test]
    fn test_wav_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tone.wav");
        sine_wav(&path, 16000, 0.5);

        let (samples, sample_rate) = read_wav_mono(&path).unwrap();
        assert_eq!(sample_rate, 16000);
        assert_eq!(samples.len(), 8000);
        // 16-bit quantization error stays small
        let peak = samples.iter().fold(0.0f32, |m, &s| m.max(s.abs()));
        assert!((peak - 0.5).abs() < 0.01);
    }

    #[test]
    fn test_process_command_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.wav");
        let output = dir.path().join("out.wav");
        sine_wav(&input, 16000, 1.0);

        process(&input, &output, None, 250).unwrap();

        let (processed, sample_rate) = read_wav_mono(&output).unwrap();
        assert_eq!(sample_rate, 16000);
        assert_eq!(processed.len(), 16000);
        assert!(processed.iter().all(|s| (-1.0..=1.0).contains(s)));
    }

    #[test]
    fn test_process_with_preset() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.wav");
        let output = dir.path().join("out.wav");
        sine_wav(&input, 16000, 0.5);

        process(&input, &output, Some("music"), 250).unwrap();
        assert!(output.exists());

        let err = process(&input, &output, Some("underwater"), 250).unwrap_err();
        assert_eq!(err.error_code(), "UNKNOWN_PRESET");
    }

    #[test]
    fn test_missing_input_file() {
        let err = read_wav_mono(Path::new("/nonexistent/file.wav")).unwrap_err();
        assert_eq!(err.error_code(), "UNSUPPORTED_WAV");
    }
}
