//! Pipeline integration tests
//!
//! End-to-end properties of the extraction and processing halves of the
//! pipeline, exercised over a range of waveform shapes.

use auris::analysis::{FeatureExtractor, SoundEvent};
use auris::dsp::AudioProcessor;
use auris::strategy::{bounds, BandEmphasis, FrequencyProfile, Strategy, StrategyLibrary};
use std::f32::consts::PI;

const SAMPLE_RATE: u32 = 16000;

fn sine(frequency: f32, amplitude: f32, num_samples: usize) -> Vec<f32> {
    (0..num_samples)
        .map(|i| amplitude * (2.0 * PI * frequency * i as f32 / SAMPLE_RATE as f32).sin())
        .collect()
}

fn pseudo_noise(amplitude: f32, num_samples: usize) -> Vec<f32> {
    // Deterministic noise: tests must replay bit-for-bit
    (0..num_samples)
        .map(|i| {
            let hash = (i as u64).wrapping_mul(2654435761).wrapping_add(40503);
            amplitude * (((hash % 2000) as f32 / 1000.0) - 1.0)
        })
        .collect()
}

fn test_waveforms() -> Vec<(&'static str, Vec<f32>)> {
    vec![
        ("silence", vec![0.0; 4096]),
        ("sine_440", sine(440.0, 0.5, 4096)),
        ("sine_loud", sine(1000.0, 0.99, 4096)),
        ("noise", pseudo_noise(0.8, 4096)),
        ("dc_offset", vec![0.7; 4096]),
        ("impulse", {
            let mut v = vec![0.0; 4096];
            v[2048] = 1.0;
            v
        }),
        ("short_frame", sine(440.0, 0.5, 37)),
        (
            "speech_like",
            sine(300.0, 0.3, 4096)
                .iter()
                .zip(sine(2400.0, 0.2, 4096).iter())
                .map(|(a, b)| a + b)
                .collect(),
        ),
    ]
}

fn full_strategy() -> Strategy {
    Strategy {
        name: "everything_on".to_string(),
        noise_suppression_strength: 0.7,
        speech_enhancement_strength: 0.6,
        compression_ratio: 4.0,
        high_freq_boost_db: 5.0,
        low_freq_reduction_db: -6.0,
        adaptive_gain: 1.5,
        noise_gate_threshold_db: -50.0,
        frequency_profile: FrequencyProfile::SpeechOptimized,
        band_emphasis: Some(BandEmphasis {
            low_db: -2.0,
            mid_low_db: 1.0,
            mid_high_db: 2.0,
            high_db: -1.0,
        }),
        confidence: 0.8,
        rationale: "Exercise every stage of the transform chain".to_string(),
        duration_seconds: 30,
        is_reversible: true,
    }
}

#[test]
fn output_length_and_range_hold_for_all_waveforms() {
    let mut processor = AudioProcessor::new(SAMPLE_RATE);
    let strategies = [
        Strategy::conservative_fallback(),
        full_strategy(),
        StrategyLibrary::new()
            .get("crowded_restaurant")
            .unwrap()
            .strategy
            .clone(),
    ];

    for (name, waveform) in test_waveforms() {
        for strategy in &strategies {
            let output = processor.apply(&waveform, strategy);
            assert_eq!(
                output.len(),
                waveform.len(),
                "length changed for '{name}' under '{}'",
                strategy.name
            );
            assert!(
                output.iter().all(|s| (-1.0..=1.0).contains(s)),
                "sample out of [-1, 1] for '{name}' under '{}'",
                strategy.name
            );
            assert!(
                output.iter().all(|s| s.is_finite()),
                "non-finite output for '{name}' under '{}'",
                strategy.name
            );
        }
    }
}

#[test]
fn silent_waveform_reports_silence() {
    let extractor = FeatureExtractor::new(SAMPLE_RATE);
    let features = extractor.extract(&vec![0.0; 8000], None);

    assert!(features.noise_level_db < 30.0);
    assert!(features.is_silence);
    assert_eq!(features.sound_event, SoundEvent::Silence);
}

#[test]
fn processing_is_deterministic_across_runs() {
    let mut processor = AudioProcessor::new(SAMPLE_RATE);
    let strategy = full_strategy();

    for (name, waveform) in test_waveforms() {
        let first = processor.apply(&waveform, &strategy);
        let second = processor.apply(&waveform, &strategy);
        assert_eq!(first, second, "nondeterministic output for '{name}'");
    }
}

#[test]
fn extraction_then_processing_roundtrip() {
    let extractor = FeatureExtractor::new(SAMPLE_RATE);
    let mut processor = AudioProcessor::new(SAMPLE_RATE);
    let library = StrategyLibrary::new();

    let waveform = sine(1200.0, 0.4, 8000);
    let features = extractor.extract(&waveform, None);
    assert!(features.speech_probability > 0.0);

    // Any preset must be applicable to the same frame the features came from
    for name in library.names() {
        let strategy = &library.get(name).unwrap().strategy;
        let output = processor.apply(&waveform, strategy);
        assert_eq!(output.len(), waveform.len());
    }
}

#[test]
fn strategy_numeric_fields_replay_bit_for_bit() {
    // Interchange contract: numeric fields survive serialization exactly
    let strategy = Strategy {
        noise_suppression_strength: 0.333_333_34,
        compression_ratio: 3.141_592_7,
        high_freq_boost_db: 2.718_281_8,
        ..full_strategy()
    };

    let json = serde_json::to_string(&strategy).unwrap();
    let restored: Strategy = serde_json::from_str(&json).unwrap();

    assert_eq!(
        restored.noise_suppression_strength.to_bits(),
        strategy.noise_suppression_strength.to_bits()
    );
    assert_eq!(
        restored.compression_ratio.to_bits(),
        strategy.compression_ratio.to_bits()
    );
    assert_eq!(
        restored.high_freq_boost_db.to_bits(),
        strategy.high_freq_boost_db.to_bits()
    );
    assert_eq!(restored, strategy);
}

#[test]
fn features_numeric_fields_replay_bit_for_bit() {
    let extractor = FeatureExtractor::new(SAMPLE_RATE);
    let features = extractor.extract(&sine(440.0, 0.5, 4096), None);

    let json = serde_json::to_string(&features).unwrap();
    let restored: auris::analysis::AudioFeatureSet = serde_json::from_str(&json).unwrap();

    assert_eq!(
        restored.spectral_centroid_hz.to_bits(),
        features.spectral_centroid_hz.to_bits()
    );
    assert_eq!(
        restored.noise_level_db.to_bits(),
        features.noise_level_db.to_bits()
    );
    assert_eq!(
        restored.speech_probability.to_bits(),
        features.speech_probability.to_bits()
    );
}

#[test]
fn every_preset_passes_safety_validation() {
    use auris::agent::SafetyValidator;
    use auris::strategy::CandidateStrategy;

    let library = StrategyLibrary::new();
    let validator = SafetyValidator::new();

    for name in library.names() {
        let strategy = &library.get(name).unwrap().strategy;
        let check = validator.validate(&CandidateStrategy::from(strategy));
        assert!(
            check.is_safe,
            "preset '{name}' failed validation: {:?}",
            check.violations
        );
        assert!(
            strategy.duration_seconds >= bounds::MIN_DURATION_SECONDS,
            "preset '{name}' below oscillation guard"
        );
    }
}

#[test]
fn gate_clamps_even_hot_input() {
    // Worst case: input already outside [-1, 1]; output still clamps
    let mut processor = AudioProcessor::new(SAMPLE_RATE);
    let hot = sine(500.0, 3.0, 4096);
    let output = processor.apply(&hot, &Strategy::conservative_fallback());
    assert!(output.iter().all(|s| (-1.0..=1.0).contains(s)));
}
