//! User profile management
//!
//! The profile captures who is listening and what they want out of the
//! device. It feeds observation building and advisor reasoning; it never
//! touches audio directly.

use crate::strategy::BandEmphasis;
use serde::{Deserialize, Serialize};

/// Audiometric configuration of the listener
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HearingLossPattern {
    #[default]
    Flat,
    HighFrequency,
    LowFrequency,
    Sloping,
}

/// What the listener wants the processing to optimize for
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Preference {
    Clarity,
    Comfort,
    #[default]
    Balanced,
    Natural,
}

/// Power budget for processing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PowerMode {
    BatterySaver,
    #[default]
    Normal,
    Performance,
}

/// How much background noise the listener tolerates before wanting help
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoiseTolerance {
    Low,
    #[default]
    Medium,
    High,
}

/// How quickly learned adjustments should take hold
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdaptationSpeed {
    Slow,
    #[default]
    Medium,
    Fast,
}

/// The listener's current goal, used when weighing clarity against comfort
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListeningIntent {
    #[default]
    Conversation,
    SpeechRecovery,
    EnvironmentalAwareness,
    Music,
}

impl ListeningIntent {
    /// Whether this intent prioritizes speech clarity
    pub fn wants_clarity(&self) -> bool {
        matches!(
            self,
            ListeningIntent::Conversation | ListeningIntent::SpeechRecovery
        )
    }
}

/// User hearing aid preferences and characteristics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    // Hearing characteristics
    pub hearing_loss_pattern: HearingLossPattern,

    // Processing preferences
    pub preference: Preference,
    pub power_mode: PowerMode,
    pub background_noise_tolerance: NoiseTolerance,
    pub listening_intent: ListeningIntent,

    // User settings
    pub user_id: Option<String>,
    pub name: Option<String>,

    // Adaptation settings
    pub learning_enabled: bool,
    pub adaptation_speed: AdaptationSpeed,

    // Per-band preference adjustments (dB)
    pub frequency_preferences: BandEmphasis,

    // Usage patterns (office, outdoor, home, ...)
    pub typical_environments: Vec<String>,
}

impl UserProfile {
    /// Profile tuned for maximum speech clarity
    pub fn clarity() -> Self {
        Self {
            hearing_loss_pattern: HearingLossPattern::HighFrequency,
            preference: Preference::Clarity,
            background_noise_tolerance: NoiseTolerance::Low,
            learning_enabled: true,
            ..Default::default()
        }
    }

    /// Profile tuned for listening comfort
    pub fn comfort() -> Self {
        Self {
            preference: Preference::Comfort,
            background_noise_tolerance: NoiseTolerance::High,
            learning_enabled: true,
            ..Default::default()
        }
    }

    /// Profile that keeps processing as transparent as possible
    pub fn natural() -> Self {
        Self {
            preference: Preference::Natural,
            learning_enabled: true,
            ..Default::default()
        }
    }

    /// Profile that trades adaptation speed for battery life
    pub fn battery_saver() -> Self {
        Self {
            power_mode: PowerMode::BatterySaver,
            adaptation_speed: AdaptationSpeed::Slow,
            learning_enabled: true,
            ..Default::default()
        }
    }

    /// Display name, falling back to a generic label
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("Default")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_profile() {
        let profile = UserProfile::default();
        assert_eq!(profile.preference, Preference::Balanced);
        assert_eq!(profile.listening_intent, ListeningIntent::Conversation);
        assert_eq!(profile.display_name(), "Default");
        assert!(profile.frequency_preferences.is_flat());
    }

    #[test]
    fn test_named_profiles() {
        assert_eq!(UserProfile::clarity().preference, Preference::Clarity);
        assert_eq!(
            UserProfile::clarity().hearing_loss_pattern,
            HearingLossPattern::HighFrequency
        );
        assert_eq!(
            UserProfile::comfort().background_noise_tolerance,
            NoiseTolerance::High
        );
        assert_eq!(
            UserProfile::battery_saver().adaptation_speed,
            AdaptationSpeed::Slow
        );
    }

    #[test]
    fn test_intent_clarity_wants() {
        assert!(ListeningIntent::Conversation.wants_clarity());
        assert!(ListeningIntent::SpeechRecovery.wants_clarity());
        assert!(!ListeningIntent::Music.wants_clarity());
        assert!(!ListeningIntent::EnvironmentalAwareness.wants_clarity());
    }

    #[test]
    fn test_profile_serde_roundtrip() {
        let mut profile = UserProfile::clarity();
        profile.name = Some("Ada".to_string());
        profile.typical_environments = vec!["office".to_string(), "outdoor".to_string()];

        let json = serde_json::to_string(&profile).unwrap();
        assert!(json.contains("\"preference\":\"clarity\""));

        let restored: UserProfile = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, profile);
    }
}
