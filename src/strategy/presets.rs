//! Predefined processing strategies
//!
//! Presets cover the common listening environments so the pipeline has a
//! sensible strategy before the first decision cycle and the rule-based
//! advisor has a vocabulary to pick from. Every preset passes safety
//! validation unchanged.

use super::{FrequencyProfile, Strategy};
use std::collections::BTreeMap;

/// A named, described strategy entry
#[derive(Debug, Clone)]
pub struct StrategyPreset {
    /// Preset key, stable across releases
    pub name: &'static str,
    /// One-line description for UIs and status output
    pub description: &'static str,
    /// The strategy applied when this preset is selected
    pub strategy: Strategy,
}

/// Library of predefined processing strategies
pub struct StrategyLibrary {
    presets: BTreeMap<&'static str, StrategyPreset>,
}

impl StrategyLibrary {
    /// Build the library of standard strategies
    pub fn new() -> Self {
        let mut presets = BTreeMap::new();
        for preset in Self::create_presets() {
            presets.insert(preset.name, preset);
        }
        Self { presets }
    }

    fn create_presets() -> Vec<StrategyPreset> {
        let base = |name: &str,
                    ns: f32,
                    se: f32,
                    cr: f32,
                    hfb: f32,
                    lfr: f32,
                    gain: f32,
                    gate: f32,
                    profile: FrequencyProfile,
                    confidence: f32,
                    rationale: &str| Strategy {
            name: name.to_string(),
            noise_suppression_strength: ns,
            speech_enhancement_strength: se,
            compression_ratio: cr,
            high_freq_boost_db: hfb,
            low_freq_reduction_db: lfr,
            adaptive_gain: gain,
            noise_gate_threshold_db: gate,
            frequency_profile: profile,
            band_emphasis: None,
            confidence,
            rationale: rationale.to_string(),
            duration_seconds: 30,
            is_reversible: true,
        };

        vec![
            StrategyPreset {
                name: "silence",
                description: "Minimal processing for quiet environments",
                strategy: base(
                    "silence",
                    0.1,
                    0.0,
                    1.0,
                    0.0,
                    0.0,
                    1.0,
                    -60.0,
                    FrequencyProfile::Neutral,
                    0.9,
                    "Minimal processing - environment is quiet",
                ),
            },
            StrategyPreset {
                name: "quiet_office",
                description: "Light processing for quiet office environments",
                strategy: base(
                    "quiet_office",
                    0.3,
                    0.3,
                    2.0,
                    1.0,
                    -2.0,
                    1.0,
                    -45.0,
                    FrequencyProfile::SpeechOptimized,
                    0.85,
                    "Light noise suppression with speech emphasis",
                ),
            },
            StrategyPreset {
                name: "busy_office",
                description: "Moderate processing for busy office with background noise",
                strategy: base(
                    "busy_office",
                    0.6,
                    0.5,
                    3.0,
                    2.0,
                    -3.0,
                    1.1,
                    -40.0,
                    FrequencyProfile::SpeechOptimized,
                    0.8,
                    "Moderate suppression for steady office chatter",
                ),
            },
            StrategyPreset {
                name: "crowded_restaurant",
                description: "Strong processing for high-noise environments",
                strategy: base(
                    "crowded_restaurant",
                    0.8,
                    0.7,
                    4.5,
                    3.0,
                    -4.0,
                    1.2,
                    -35.0,
                    FrequencyProfile::ClarityBoost,
                    0.75,
                    "Strong speech extraction in a very noisy environment",
                ),
            },
            StrategyPreset {
                name: "outdoor",
                description: "Moderate processing for outdoor environments",
                strategy: base(
                    "outdoor",
                    0.5,
                    0.4,
                    2.5,
                    1.5,
                    -2.5,
                    1.0,
                    -42.0,
                    FrequencyProfile::Neutral,
                    0.8,
                    "Balanced shaping for variable outdoor noise",
                ),
            },
            StrategyPreset {
                name: "music",
                description: "Minimal processing to preserve music quality",
                strategy: base(
                    "music",
                    0.2,
                    0.1,
                    1.5,
                    0.5,
                    -1.0,
                    1.0,
                    -50.0,
                    FrequencyProfile::Neutral,
                    0.85,
                    "Preserve dynamic range for music listening",
                ),
            },
            StrategyPreset {
                name: "phone_call",
                description: "Optimize for phone call clarity",
                strategy: base(
                    "phone_call",
                    0.7,
                    0.8,
                    5.0,
                    4.0,
                    -5.0,
                    1.3,
                    -38.0,
                    FrequencyProfile::ClarityBoost,
                    0.8,
                    "Telephone-band emphasis for call intelligibility",
                ),
            },
            StrategyPreset {
                name: "comfort_mode",
                description: "Gentle processing prioritizing comfort over clarity",
                strategy: base(
                    "comfort_mode",
                    0.4,
                    0.2,
                    2.0,
                    0.5,
                    -1.0,
                    0.9,
                    -50.0,
                    FrequencyProfile::ComfortFocus,
                    0.8,
                    "Gentle shaping for comfortable long listening",
                ),
            },
        ]
    }

    /// Get a preset by name
    pub fn get(&self, name: &str) -> Option<&StrategyPreset> {
        self.presets.get(name)
    }

    /// All preset names, sorted
    pub fn names(&self) -> Vec<&'static str> {
        self.presets.keys().copied().collect()
    }

    /// Description of a preset, if it exists
    pub fn description(&self, name: &str) -> Option<&'static str> {
        self.presets.get(name).map(|p| p.description)
    }
}

impl Default for StrategyLibrary {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::bounds;

    #[test]
    fn test_library_contains_standard_presets() {
        let library = StrategyLibrary::new();
        for name in [
            "silence",
            "quiet_office",
            "busy_office",
            "crowded_restaurant",
            "outdoor",
            "music",
            "phone_call",
            "comfort_mode",
        ] {
            assert!(library.get(name).is_some(), "missing preset {name}");
        }
        assert_eq!(library.names().len(), 8);
    }

    #[test]
    fn test_unknown_preset_is_none() {
        let library = StrategyLibrary::new();
        assert!(library.get("underwater").is_none());
        assert!(library.description("underwater").is_none());
    }

    #[test]
    fn test_every_preset_is_within_bounds() {
        let library = StrategyLibrary::new();
        for name in library.names() {
            let s = &library.get(name).unwrap().strategy;
            assert!(
                (bounds::MIN_NOISE_SUPPRESSION..=bounds::MAX_NOISE_SUPPRESSION)
                    .contains(&s.noise_suppression_strength),
                "{name}: noise suppression out of bounds"
            );
            assert!(
                (bounds::MIN_SPEECH_ENHANCEMENT..=bounds::MAX_SPEECH_ENHANCEMENT)
                    .contains(&s.speech_enhancement_strength),
                "{name}: speech enhancement out of bounds"
            );
            assert!(
                (bounds::MIN_COMPRESSION_RATIO..=bounds::MAX_COMPRESSION_RATIO)
                    .contains(&s.compression_ratio),
                "{name}: compression ratio out of bounds"
            );
            assert!(
                (bounds::MIN_ADAPTIVE_GAIN..=bounds::MAX_ADAPTIVE_GAIN)
                    .contains(&s.adaptive_gain),
                "{name}: adaptive gain out of bounds"
            );
            assert!(
                (bounds::MIN_NOISE_GATE_THRESHOLD_DB..=bounds::MAX_NOISE_GATE_THRESHOLD_DB)
                    .contains(&s.noise_gate_threshold_db),
                "{name}: gate threshold out of bounds"
            );
            assert!(s.is_reversible, "{name}: presets must be reversible");
            assert!(
                s.rationale.len() >= bounds::MIN_RATIONALE_CHARS,
                "{name}: rationale too short"
            );
            assert!(
                s.duration_seconds >= bounds::MIN_DURATION_SECONDS,
                "{name}: duration below oscillation guard"
            );
        }
    }

    #[test]
    fn test_descriptions_present() {
        let library = StrategyLibrary::new();
        assert_eq!(
            library.description("music"),
            Some("Minimal processing to preserve music quality")
        );
    }
}
