//! Pipeline controller
//!
//! Wires feature extraction, the decision engine and the audio processor
//! into one session-owned loop, and enforces the minimum decision interval:
//! between cycles the previous validated strategy stays in effect, so the
//! output never oscillates faster than the guard allows.

use crate::agent::{
    DecisionEngine, FeedbackOutcome, FeedbackRecord, SafetyCheck, StrategyAdvisor,
};
use crate::analysis::{AudioFeatureSet, FeatureExtractor};
use crate::dsp::AudioProcessor;
use crate::profile::UserProfile;
use crate::strategy::{Strategy, StrategyLibrary};
use crate::{AurisError, Result};
use chrono::Utc;
use log::info;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Minimum wall-clock interval between decisions
const DECISION_INTERVAL: Duration = Duration::from_secs(1);

/// Preset applied before the first decision cycle
const INITIAL_PRESET: &str = "quiet_office";

/// Result of processing one frame
#[derive(Debug, Clone)]
pub struct ProcessOutcome {
    /// The processed (or passed-through) samples
    pub processed: Vec<f32>,
    /// Features extracted from the frame, absent in passthrough mode
    pub features: Option<AudioFeatureSet>,
    /// The strategy in effect, absent in passthrough mode
    pub strategy: Option<Strategy>,
    /// Whether this frame triggered a new decision cycle
    pub decision_made: bool,
    /// Safety check of the decision, when one was made
    pub safety: Option<SafetyCheck>,
}

/// Snapshot of the controller state for status displays
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControllerStatus {
    pub processing_enabled: bool,
    pub current_strategy: Option<String>,
    pub user_profile: String,
    pub decisions_recorded: usize,
    pub available_presets: Vec<String>,
}

/// Main controller for the hearing aid pipeline
///
/// Owns one session's engine state exclusively; callers processing frames
/// concurrently must serialize access per session so the oscillation guard
/// holds.
pub struct Controller {
    sample_rate: u32,
    profile: UserProfile,
    extractor: FeatureExtractor,
    processor: AudioProcessor,
    engine: DecisionEngine,
    library: StrategyLibrary,
    current_strategy: Option<Strategy>,
    last_decision_at: Option<Instant>,
    feedback_records: Vec<FeedbackRecord>,
    processing_enabled: bool,
}

impl Controller {
    /// Create a controller around the given advisor
    pub fn new(sample_rate: u32, profile: UserProfile, advisor: Box<dyn StrategyAdvisor>) -> Self {
        Self {
            sample_rate,
            profile,
            extractor: FeatureExtractor::new(sample_rate),
            processor: AudioProcessor::new(sample_rate),
            engine: DecisionEngine::new(advisor),
            library: StrategyLibrary::new(),
            current_strategy: None,
            last_decision_at: None,
            feedback_records: Vec::new(),
            processing_enabled: true,
        }
    }

    /// Process one frame through the pipeline
    ///
    /// A new decision is made at most once per minimum interval unless
    /// `force_decision` is set; otherwise the previous validated strategy
    /// stays in effect.
    pub fn process(&mut self, samples: &[f32], force_decision: bool) -> Result<ProcessOutcome> {
        if !self.processing_enabled {
            return Ok(ProcessOutcome {
                processed: samples.to_vec(),
                features: None,
                strategy: None,
                decision_made: false,
                safety: None,
            });
        }

        let features = self
            .extractor
            .extract(samples, None)
            .with_timestamp(Utc::now());

        let should_decide = force_decision || self.interval_elapsed();
        let mut safety = None;

        let strategy = if should_decide {
            let (decision, check) =
                self.engine
                    .decide(&features, &self.profile, &self.feedback_records);
            self.last_decision_at = Some(Instant::now());
            safety = Some(check);
            decision.strategy
        } else if let Some(current) = self.current_strategy.clone() {
            current
        } else {
            // No decision yet and none due: start from a mild preset
            let preset = self
                .library
                .get(INITIAL_PRESET)
                .ok_or_else(|| AurisError::UnknownPreset {
                    name: INITIAL_PRESET.to_string(),
                })?;
            preset.strategy.clone()
        };
        self.current_strategy = Some(strategy.clone());

        let processed = self.processor.apply(samples, &strategy);

        Ok(ProcessOutcome {
            processed,
            features: Some(features),
            strategy: Some(strategy),
            decision_made: should_decide,
            safety,
        })
    }

    /// Report an interaction outcome and refine with a fresh decision
    ///
    /// Feeds the Learn phase, records the feedback for future observation
    /// contexts, then forces a new cycle so the refinement applies now
    /// rather than at the next interval.
    pub fn process_with_feedback(
        &mut self,
        samples: &[f32],
        outcome: &FeedbackOutcome,
        satisfaction: Option<f32>,
    ) -> Result<ProcessOutcome> {
        self.engine.integrate_feedback(outcome, satisfaction);

        if let Some(last) = self.engine.history().last() {
            let label = last.strategy.name.clone();
            if let Some(effectiveness) = self.engine.latest_effectiveness(&label) {
                self.feedback_records.push(FeedbackRecord {
                    strategy_name: label,
                    effectiveness,
                    timestamp: Utc::now(),
                });
            }
        }

        self.process(samples, true)
    }

    /// Manually select a strategy preset
    pub fn select_preset(&mut self, name: &str) -> Result<()> {
        let preset = self
            .library
            .get(name)
            .ok_or_else(|| AurisError::UnknownPreset {
                name: name.to_string(),
            })?;
        self.current_strategy = Some(preset.strategy.clone());
        info!("Strategy preset selected: {name}");
        Ok(())
    }

    /// Replace the user profile
    pub fn set_profile(&mut self, profile: UserProfile) {
        info!("User profile updated: {}", profile.display_name());
        self.profile = profile;
    }

    /// Enable or disable processing (disabled means passthrough)
    pub fn set_enabled(&mut self, enabled: bool) {
        self.processing_enabled = enabled;
        info!(
            "Audio processing {}",
            if enabled { "enabled" } else { "disabled" }
        );
    }

    /// Sample rate of this pipeline
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Access the decision engine (history, summaries, effectiveness)
    pub fn engine(&self) -> &DecisionEngine {
        &self.engine
    }

    /// Current system status snapshot
    pub fn status(&self) -> ControllerStatus {
        ControllerStatus {
            processing_enabled: self.processing_enabled,
            current_strategy: self.current_strategy.as_ref().map(|s| s.name.clone()),
            user_profile: self.profile.display_name().to_string(),
            decisions_recorded: self.engine.history().len(),
            available_presets: self.library.names().iter().map(|n| n.to_string()).collect(),
        }
    }

    fn interval_elapsed(&self) -> bool {
        match self.last_decision_at {
            None => true,
            Some(at) => at.elapsed() >= DECISION_INTERVAL,
        }
    }
}
