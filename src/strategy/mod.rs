//! Processing strategy types
//!
//! A [`Strategy`] is the bounded control vector that travels from the
//! decision engine to the audio processor. A [`CandidateStrategy`] is the
//! untrusted wire format an advisor emits; only the safety validator may
//! turn one into a `Strategy`.

mod presets;

pub use presets::{StrategyLibrary, StrategyPreset};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The single authoritative bound set for every strategy parameter
///
/// Both `SafetyValidator::validate` and `SafetyValidator::apply_bounds`
/// read from this table; no other range definition exists in the crate.
pub mod bounds {
    /// Noise suppression strength range
    pub const MIN_NOISE_SUPPRESSION: f32 = 0.0;
    pub const MAX_NOISE_SUPPRESSION: f32 = 0.95;

    /// Speech enhancement strength range
    pub const MIN_SPEECH_ENHANCEMENT: f32 = 0.0;
    pub const MAX_SPEECH_ENHANCEMENT: f32 = 0.9;

    /// Dynamic range compression ratio range
    pub const MIN_COMPRESSION_RATIO: f32 = 1.0;
    pub const MAX_COMPRESSION_RATIO: f32 = 8.0;

    /// High frequency boost range (dB)
    pub const MIN_HIGH_FREQ_BOOST_DB: f32 = -0.5;
    pub const MAX_HIGH_FREQ_BOOST_DB: f32 = 10.0;

    /// Low frequency reduction range (dB)
    pub const MIN_LOW_FREQ_REDUCTION_DB: f32 = -12.0;
    pub const MAX_LOW_FREQ_REDUCTION_DB: f32 = 0.0;

    /// Adaptive gain range (linear, wider legacy range)
    pub const MIN_ADAPTIVE_GAIN: f32 = 0.3;
    pub const MAX_ADAPTIVE_GAIN: f32 = 2.0;

    /// Noise gate threshold range (dB)
    pub const MIN_NOISE_GATE_THRESHOLD_DB: f32 = -60.0;
    pub const MAX_NOISE_GATE_THRESHOLD_DB: f32 = -10.0;

    /// Confidence range
    pub const MIN_CONFIDENCE: f32 = 0.0;
    pub const MAX_CONFIDENCE: f32 = 1.0;

    /// Decision duration range (seconds): the lower bound prevents rapid
    /// oscillation, the upper bound prevents a stale strategy outliving
    /// its context
    pub const MIN_DURATION_SECONDS: u32 = 10;
    pub const MAX_DURATION_SECONDS: u32 = 3600;

    /// Minimum rationale length in characters
    pub const MIN_RATIONALE_CHARS: usize = 20;
}

/// Named frequency shaping profile
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrequencyProfile {
    #[default]
    Neutral,
    SpeechOptimized,
    ClarityBoost,
    ComfortFocus,
}

impl FrequencyProfile {
    /// All allowed profile names
    pub const ALLOWED: &'static [&'static str] = &[
        "neutral",
        "speech_optimized",
        "clarity_boost",
        "comfort_focus",
    ];

    /// Wire name of the profile
    pub fn as_str(&self) -> &'static str {
        match self {
            FrequencyProfile::Neutral => "neutral",
            FrequencyProfile::SpeechOptimized => "speech_optimized",
            FrequencyProfile::ClarityBoost => "clarity_boost",
            FrequencyProfile::ComfortFocus => "comfort_focus",
        }
    }
}

impl FromStr for FrequencyProfile {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "neutral" => Ok(FrequencyProfile::Neutral),
            "speech_optimized" => Ok(FrequencyProfile::SpeechOptimized),
            "clarity_boost" => Ok(FrequencyProfile::ClarityBoost),
            "comfort_focus" => Ok(FrequencyProfile::ComfortFocus),
            _ => Err(()),
        }
    }
}

impl fmt::Display for FrequencyProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-band emphasis gains in dB
///
/// Band edges: low < 500 Hz, mid-low 500-2000 Hz, mid-high 2000-8000 Hz,
/// high >= 8000 Hz.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BandEmphasis {
    pub low_db: f32,
    pub mid_low_db: f32,
    pub mid_high_db: f32,
    pub high_db: f32,
}

impl BandEmphasis {
    /// Whether every band sits at unity gain
    pub fn is_flat(&self) -> bool {
        self.low_db == 0.0
            && self.mid_low_db == 0.0
            && self.mid_high_db == 0.0
            && self.high_db == 0.0
    }
}

/// A validated, bounded audio processing strategy
///
/// Every `Strategy` that reaches the audio processor has passed the safety
/// validator (directly, or after clamping through `apply_bounds`). A
/// strategy is produced once per decision cycle and superseded, never
/// mutated, by the next cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Strategy {
    /// Descriptive strategy label, used as the learning key
    pub name: String,
    /// Spectral subtraction strength
    pub noise_suppression_strength: f32,
    /// Speech band emphasis level
    pub speech_enhancement_strength: f32,
    /// Dynamic range compression ratio (1.0 = bypass)
    pub compression_ratio: f32,
    /// Presence boost above 4 kHz (dB)
    pub high_freq_boost_db: f32,
    /// Rumble reduction below 200 Hz (dB, non-positive)
    pub low_freq_reduction_db: f32,
    /// Overall linear gain
    pub adaptive_gain: f32,
    /// Noise gate threshold (dB)
    pub noise_gate_threshold_db: f32,
    /// Named frequency shaping profile
    pub frequency_profile: FrequencyProfile,
    /// Optional custom per-band emphasis
    pub band_emphasis: Option<BandEmphasis>,
    /// Advisor confidence in this strategy
    pub confidence: f32,
    /// Why this strategy was chosen (at least 20 characters)
    pub rationale: String,
    /// How long the strategy stays in effect
    pub duration_seconds: u32,
    /// Whether the strategy can be reverted (must always be true)
    pub is_reversible: bool,
}

impl Strategy {
    /// The minimal intervention strategy substituted whenever a candidate
    /// fails safety validation
    ///
    /// Must itself always pass validation; the decision engine re-checks
    /// this on every fallback.
    pub fn conservative_fallback() -> Self {
        Self {
            name: "minimal_intervention_monitoring".to_string(),
            noise_suppression_strength: 0.3,
            speech_enhancement_strength: 0.0,
            compression_ratio: 1.0,
            high_freq_boost_db: 0.0,
            low_freq_reduction_db: 0.0,
            adaptive_gain: 1.0,
            noise_gate_threshold_db: -40.0,
            frequency_profile: FrequencyProfile::Neutral,
            band_emphasis: None,
            confidence: 0.6,
            rationale: "Safety check failed. Using minimal intervention while monitoring."
                .to_string(),
            duration_seconds: bounds::MIN_DURATION_SECONDS,
            is_reversible: true,
        }
    }
}

/// An unvalidated strategy as emitted by an advisor
///
/// Every field is optional because the advisor is untrusted: missing
/// fields are safety violations, not deserialization errors. The
/// frequency profile stays a raw string for the same reason.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CandidateStrategy {
    pub name: Option<String>,
    pub noise_suppression_strength: Option<f32>,
    pub speech_enhancement_strength: Option<f32>,
    pub compression_ratio: Option<f32>,
    pub high_freq_boost_db: Option<f32>,
    pub low_freq_reduction_db: Option<f32>,
    pub adaptive_gain: Option<f32>,
    pub noise_gate_threshold_db: Option<f32>,
    pub frequency_profile: Option<String>,
    pub band_emphasis: Option<BandEmphasis>,
    pub confidence: Option<f32>,
    pub rationale: Option<String>,
    pub duration_seconds: Option<u32>,
    pub is_reversible: Option<bool>,
}

impl CandidateStrategy {
    /// Convert into a validated [`Strategy`]
    ///
    /// Intended to be called only after a passing safety check; missing
    /// required fields surface as `AdvisorMalformed`, and omitted optional
    /// fields take their neutral defaults.
    pub fn finalize(self) -> crate::Result<Strategy> {
        let missing = |field: &str| crate::AurisError::AdvisorMalformed {
            reason: format!("missing required field: {field}"),
        };

        let frequency_profile = match self.frequency_profile.as_deref() {
            None => FrequencyProfile::Neutral,
            Some(raw) => {
                FrequencyProfile::from_str(raw).map_err(|()| {
                    crate::AurisError::AdvisorMalformed {
                        reason: format!("invalid frequency_profile: {raw}"),
                    }
                })?
            }
        };

        Ok(Strategy {
            name: self.name.ok_or_else(|| missing("name"))?,
            noise_suppression_strength: self
                .noise_suppression_strength
                .ok_or_else(|| missing("noise_suppression_strength"))?,
            speech_enhancement_strength: self
                .speech_enhancement_strength
                .ok_or_else(|| missing("speech_enhancement_strength"))?,
            compression_ratio: self
                .compression_ratio
                .ok_or_else(|| missing("compression_ratio"))?,
            high_freq_boost_db: self
                .high_freq_boost_db
                .ok_or_else(|| missing("high_freq_boost_db"))?,
            low_freq_reduction_db: self.low_freq_reduction_db.unwrap_or(0.0),
            adaptive_gain: self.adaptive_gain.unwrap_or(1.0),
            noise_gate_threshold_db: self.noise_gate_threshold_db.unwrap_or(-40.0),
            frequency_profile,
            band_emphasis: self.band_emphasis,
            confidence: self.confidence.ok_or_else(|| missing("confidence"))?,
            rationale: self.rationale.ok_or_else(|| missing("rationale"))?,
            duration_seconds: self
                .duration_seconds
                .ok_or_else(|| missing("duration_seconds"))?,
            is_reversible: self.is_reversible.ok_or_else(|| missing("is_reversible"))?,
        })
    }
}

impl From<&Strategy> for CandidateStrategy {
    fn from(strategy: &Strategy) -> Self {
        Self {
            name: Some(strategy.name.clone()),
            noise_suppression_strength: Some(strategy.noise_suppression_strength),
            speech_enhancement_strength: Some(strategy.speech_enhancement_strength),
            compression_ratio: Some(strategy.compression_ratio),
            high_freq_boost_db: Some(strategy.high_freq_boost_db),
            low_freq_reduction_db: Some(strategy.low_freq_reduction_db),
            adaptive_gain: Some(strategy.adaptive_gain),
            noise_gate_threshold_db: Some(strategy.noise_gate_threshold_db),
            frequency_profile: Some(strategy.frequency_profile.as_str().to_string()),
            band_emphasis: strategy.band_emphasis,
            confidence: Some(strategy.confidence),
            rationale: Some(strategy.rationale.clone()),
            duration_seconds: Some(strategy.duration_seconds),
            is_reversible: Some(strategy.is_reversible),
        }
    }
}
