//! Audio feature definitions
//!
//! The feature set is the only shape in which audio ever reaches the
//! decision side of the system: compact descriptors, never samples.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Classification thresholds for the semantic descriptors
pub mod thresholds {
    /// Noise floor below which a window counts as silence (dB)
    pub const SILENCE_DB: f32 = 30.0;

    /// Speech probability above which speech is flagged present
    pub const SPEECH_PRESENT: f32 = 0.5;

    /// Speech probability above which the window classifies as a speech event
    pub const SPEECH_EVENT: f32 = 0.7;

    /// Noise floor above which the window classifies as loud noise (dB)
    pub const LOUD_NOISE_DB: f32 = 60.0;

    /// Centroid boundary between low and mid frequency noise (Hz)
    pub const LOW_FREQ_HZ: f32 = 500.0;

    /// Centroid boundary between mid and high frequency noise (Hz)
    pub const MID_FREQ_HZ: f32 = 2000.0;

    /// Centroid boundary between high and very high frequency noise (Hz)
    pub const HIGH_FREQ_HZ: f32 = 8000.0;
}

/// Broad spectral character of the background noise
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoiseType {
    LowFrequency,
    MidFrequency,
    HighFrequency,
    VeryHighFrequency,
}

impl NoiseType {
    /// Classify from the spectral centroid
    pub fn from_centroid(centroid_hz: f32) -> Self {
        if centroid_hz < thresholds::LOW_FREQ_HZ {
            NoiseType::LowFrequency
        } else if centroid_hz < thresholds::MID_FREQ_HZ {
            NoiseType::MidFrequency
        } else if centroid_hz < thresholds::HIGH_FREQ_HZ {
            NoiseType::HighFrequency
        } else {
            NoiseType::VeryHighFrequency
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            NoiseType::LowFrequency => "low_frequency",
            NoiseType::MidFrequency => "mid_frequency",
            NoiseType::HighFrequency => "high_frequency",
            NoiseType::VeryHighFrequency => "very_high_frequency",
        }
    }
}

/// Detected sound event category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SoundEvent {
    Silence,
    Speech,
    LoudNoise,
    BackgroundSound,
}

impl SoundEvent {
    /// Classify from noise floor and speech probability
    pub fn classify(noise_level_db: f32, speech_probability: f32) -> Self {
        if noise_level_db < thresholds::SILENCE_DB {
            SoundEvent::Silence
        } else if speech_probability > thresholds::SPEECH_EVENT {
            SoundEvent::Speech
        } else if noise_level_db > thresholds::LOUD_NOISE_DB {
            SoundEvent::LoudNoise
        } else {
            SoundEvent::BackgroundSound
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            SoundEvent::Silence => "silence",
            SoundEvent::Speech => "speech",
            SoundEvent::LoudNoise => "loud_noise",
            SoundEvent::BackgroundSound => "background_sound",
        }
    }
}

/// Container for the features extracted from one analysis window
///
/// Created fresh per input frame and never mutated after population.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioFeatureSet {
    // Spectral features
    /// Magnitude-weighted mean frequency (Hz)
    pub spectral_centroid_hz: f32,
    /// Frequency below which 85% of the energy is concentrated (Hz)
    pub spectral_rolloff_hz: f32,

    // Temporal features
    /// Fraction of sign changes between consecutive samples, in [0, 1]
    pub zero_crossing_rate: f32,
    /// RMS energy of the first difference of the signal
    pub onset_strength: f32,

    // Semantic descriptors
    /// Estimated noise floor in dB (floored to avoid -inf)
    pub noise_level_db: f32,
    /// Estimated probability of speech presence, in [0, 1]
    pub speech_probability: f32,
    /// Background noise character
    pub noise_type: NoiseType,
    /// Detected sound category
    pub sound_event: SoundEvent,
    /// Whether the window is silent (noise floor below the silence threshold)
    pub is_silence: bool,
    /// Whether speech is flagged present (probability above 0.5)
    pub is_speech_present: bool,

    // Metadata
    /// Sample rate of the source frame in Hz
    pub sample_rate: u32,
    /// Duration of the source frame in milliseconds
    pub duration_ms: f32,
    /// Capture timestamp, if stamped by the caller
    pub timestamp: Option<DateTime<Utc>>,
}

impl AudioFeatureSet {
    /// Conservative defaults for malformed input (empty or non-finite)
    ///
    /// Spectral and temporal fields are zeroed and the noise floor sits at
    /// the log floor, so the window classifies as silence.
    pub fn degraded(sample_rate: u32, duration_ms: f32) -> Self {
        let noise_level_db = crate::dsp::linear_to_db(0.0);
        Self {
            spectral_centroid_hz: 0.0,
            spectral_rolloff_hz: 0.0,
            zero_crossing_rate: 0.0,
            onset_strength: 0.0,
            noise_level_db,
            speech_probability: 0.0,
            noise_type: NoiseType::LowFrequency,
            sound_event: SoundEvent::Silence,
            is_silence: true,
            is_speech_present: false,
            sample_rate,
            duration_ms,
            timestamp: None,
        }
    }

    /// Stamp the capture time
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Render the feature set as a compact context line for an advisor
    pub fn context_summary(&self) -> String {
        let mut parts = Vec::new();

        if self.is_silence {
            parts.push("Environment: Silent or very quiet".to_string());
        } else {
            parts.push(format!(
                "Environment: Sound detected at {:.1}dB",
                self.noise_level_db
            ));
        }

        if self.is_speech_present {
            parts.push(format!(
                "Speech: Present ({:.0}% confidence)",
                self.speech_probability * 100.0
            ));
        } else {
            parts.push(format!(
                "Speech: Not detected ({:.0}% confidence)",
                self.speech_probability * 100.0
            ));
        }

        parts.push(format!("Noise type: {}", self.noise_type.label()));
        parts.push(format!("Sound event: {}", self.sound_event.label()));

        if self.spectral_centroid_hz > 0.0 {
            parts.push(format!(
                "Spectral profile: {:.0}Hz centroid",
                self.spectral_centroid_hz
            ));
        }

        parts.join(" | ")
    }
}
