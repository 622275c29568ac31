//! Strategy advisor boundary
//!
//! The advisor is the only untrusted, potentially slow edge of the system.
//! It may be a local rule engine, a cached wrapper, or a remote reasoning
//! service; the decision engine treats every implementation the same way:
//! call it, and route whatever comes back through the safety validator.
//! A failing or malformed advisor costs one fallback cycle, nothing more.

use crate::agent::observation::{AcousticScene, ObservationContext};
use crate::profile::{ListeningIntent, Preference, UserProfile};
use crate::strategy::{CandidateStrategy, StrategyLibrary};
use crate::Result;
use log::{debug, warn};
use std::sync::Mutex;

/// Noise level above which conversation counts as restaurant-loud (dB)
const LOUD_CONVERSATION_DB: f32 = 65.0;

/// Noise level above which an office counts as busy (dB)
const BUSY_OFFICE_DB: f32 = 45.0;

/// A source of candidate processing strategies
///
/// Implementations may block, fail, or return garbage; the caller owns
/// validation and fallback. `propose` must never receive raw audio, which
/// the [`ObservationContext`] type guarantees.
pub trait StrategyAdvisor: Send {
    /// Advisor name for logs and diagnostics
    fn name(&self) -> &str;

    /// Propose a candidate strategy for the observed situation
    fn propose(
        &self,
        observation: &ObservationContext,
        profile: &UserProfile,
    ) -> Result<CandidateStrategy>;
}

/// Deterministic advisor that picks from the preset library
///
/// Selection is keyed on acoustic scene, noise level and listening intent.
/// Useful as the default backend and as the offline fallback behind a
/// remote advisor.
pub struct RuleBasedAdvisor {
    library: StrategyLibrary,
}

impl RuleBasedAdvisor {
    pub fn new() -> Self {
        Self {
            library: StrategyLibrary::new(),
        }
    }

    /// Pick a preset name for the observed situation
    fn select_preset(&self, observation: &ObservationContext, profile: &UserProfile) -> &'static str {
        // Intent takes precedence over scene: a music listener in a noisy
        // room still wants dynamics preserved
        if observation.listening_intent == ListeningIntent::Music {
            return "music";
        }
        if observation.listening_intent == ListeningIntent::SpeechRecovery {
            return "phone_call";
        }
        if profile.preference == Preference::Comfort {
            return "comfort_mode";
        }

        match observation.acoustic_scene {
            AcousticScene::Quiet => "silence",
            AcousticScene::Conversation => {
                if observation.noise_level_db > LOUD_CONVERSATION_DB {
                    "crowded_restaurant"
                } else if observation.noise_level_db > BUSY_OFFICE_DB {
                    "busy_office"
                } else {
                    "quiet_office"
                }
            }
            AcousticScene::Noisy => "crowded_restaurant",
            AcousticScene::Ambient => "outdoor",
            AcousticScene::Unknown => "comfort_mode",
        }
    }
}

impl Default for RuleBasedAdvisor {
    fn default() -> Self {
        Self::new()
    }
}

impl StrategyAdvisor for RuleBasedAdvisor {
    fn name(&self) -> &str {
        "rule_based"
    }

    fn propose(
        &self,
        observation: &ObservationContext,
        profile: &UserProfile,
    ) -> Result<CandidateStrategy> {
        let preset_name = self.select_preset(observation, profile);
        let preset = self
            .library
            .get(preset_name)
            .ok_or_else(|| crate::AurisError::UnknownPreset {
                name: preset_name.to_string(),
            })?;

        debug!(
            "rule_based advisor selected '{}' for scene {:?} at {:.1}dB",
            preset_name, observation.acoustic_scene, observation.noise_level_db
        );

        let mut candidate = CandidateStrategy::from(&preset.strategy);
        candidate.rationale = Some(format!(
            "{} (scene: {:?}, noise {:.1}dB)",
            preset.strategy.rationale, observation.acoustic_scene, observation.noise_level_db
        ));
        Ok(candidate)
    }
}

/// Wraps another advisor and serves the last good candidate when it fails
///
/// The cache holds at most one entry and is only consulted on inner
/// failure, so a healthy inner advisor behaves exactly as if unwrapped.
pub struct CachedAdvisor {
    inner: Box<dyn StrategyAdvisor>,
    last_good: Mutex<Option<CandidateStrategy>>,
}

impl CachedAdvisor {
    pub fn new(inner: Box<dyn StrategyAdvisor>) -> Self {
        Self {
            inner,
            last_good: Mutex::new(None),
        }
    }
}

impl StrategyAdvisor for CachedAdvisor {
    fn name(&self) -> &str {
        "cached"
    }

    fn propose(
        &self,
        observation: &ObservationContext,
        profile: &UserProfile,
    ) -> Result<CandidateStrategy> {
        match self.inner.propose(observation, profile) {
            Ok(candidate) => {
                if let Ok(mut cache) = self.last_good.lock() {
                    *cache = Some(candidate.clone());
                }
                Ok(candidate)
            }
            Err(err) => {
                let cached = self.last_good.lock().ok().and_then(|c| c.clone());
                match cached {
                    Some(candidate) => {
                        warn!(
                            "advisor '{}' failed ({}), serving last good candidate",
                            self.inner.name(),
                            err
                        );
                        Ok(candidate)
                    }
                    None => Err(err),
                }
            }
        }
    }
}
