//! Observation context assembly
//!
//! The Observe phase of the decision loop snapshots everything the advisor
//! is allowed to know: descriptors, profile, recent decisions, feedback,
//! time and device state. Raw samples cannot enter by construction; the
//! context is built from an [`AudioFeatureSet`], never from a waveform.

use crate::analysis::{AudioFeatureSet, NoiseType, SoundEvent};
use crate::profile::{HearingLossPattern, ListeningIntent, Preference, UserProfile};
use chrono::{DateTime, Datelike, Timelike, Utc};
use serde::{Deserialize, Serialize};

/// Coarse acoustic scene label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AcousticScene {
    Quiet,
    Conversation,
    Noisy,
    Ambient,
    /// No usable scene information; triggers the confidence penalty
    Unknown,
}

impl AcousticScene {
    /// Derive the scene from classified features
    pub fn from_features(features: &AudioFeatureSet) -> Self {
        match features.sound_event {
            SoundEvent::Silence => AcousticScene::Quiet,
            SoundEvent::Speech => AcousticScene::Conversation,
            SoundEvent::LoudNoise => AcousticScene::Noisy,
            SoundEvent::BackgroundSound => AcousticScene::Ambient,
        }
    }
}

/// Device state snapshot (never waveform data)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeviceState {
    pub battery_percent: u8,
    pub temperature_celsius: f32,
    /// Processing load fraction in [0, 1]
    pub processing_load: f32,
}

impl Default for DeviceState {
    fn default() -> Self {
        Self {
            battery_percent: 100,
            temperature_celsius: 25.0,
            processing_load: 0.3,
        }
    }
}

/// Wall-clock context for the decision
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemporalContext {
    /// HH:MM, 24 hour clock
    pub time_of_day: String,
    /// Full weekday name
    pub day_of_week: String,
}

impl TemporalContext {
    /// Capture the current wall clock
    pub fn now() -> Self {
        Self::at(Utc::now())
    }

    /// Capture a specific instant (deterministic for tests)
    pub fn at(instant: DateTime<Utc>) -> Self {
        Self {
            time_of_day: format!("{:02}:{:02}", instant.hour(), instant.minute()),
            day_of_week: instant.weekday().to_string(),
        }
    }
}

/// Digest of one past decision, enough for stability checking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionDigest {
    pub strategy_name: String,
    pub confidence: f32,
    pub timestamp: DateTime<Utc>,
}

/// One recorded feedback outcome, fed back into future observations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackRecord {
    /// Strategy label the feedback applies to
    pub strategy_name: String,
    /// Effectiveness signal in [-1, 1]
    pub effectiveness: f32,
    pub timestamp: DateTime<Utc>,
}

/// Everything observed for one decision cycle, without raw audio
///
/// Assembled fresh each cycle and discarded once the decision is made.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservationContext {
    pub acoustic_scene: AcousticScene,
    pub noise_level_db: f32,
    pub speech_confidence: f32,
    pub speech_present: bool,
    /// Optional ASR transcript, possibly incomplete or noisy
    pub transcript: Option<String>,
    pub noise_type: NoiseType,

    // User context
    pub hearing_loss_pattern: HearingLossPattern,
    pub preference: Preference,
    pub listening_intent: ListeningIntent,

    // Stability context
    pub recent_decisions: Vec<DecisionDigest>,
    pub feedback_history: Vec<FeedbackRecord>,

    pub temporal: TemporalContext,
    pub device: DeviceState,
}

impl ObservationContext {
    /// Build an observation from extracted features and the user profile
    pub fn from_features(
        features: &AudioFeatureSet,
        profile: &UserProfile,
        recent_decisions: Vec<DecisionDigest>,
        feedback_history: Vec<FeedbackRecord>,
    ) -> Self {
        Self {
            acoustic_scene: AcousticScene::from_features(features),
            noise_level_db: features.noise_level_db,
            speech_confidence: features.speech_probability,
            speech_present: features.is_speech_present,
            transcript: None,
            noise_type: features.noise_type,
            hearing_loss_pattern: profile.hearing_loss_pattern,
            preference: profile.preference,
            listening_intent: profile.listening_intent,
            recent_decisions,
            feedback_history,
            temporal: TemporalContext::now(),
            device: DeviceState::default(),
        }
    }

    /// Attach a device state snapshot
    pub fn with_device(mut self, device: DeviceState) -> Self {
        self.device = device;
        self
    }

    /// Attach an ASR transcript
    pub fn with_transcript(mut self, transcript: &str) -> Self {
        self.transcript = Some(transcript.to_string());
        self
    }
}
