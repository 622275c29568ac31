//! Decision engine - the Observe-Reason-Act-Learn loop
//!
//! One engine instance owns one session's decision state: the bounded
//! decision history, the per-strategy effectiveness log and the last
//! decision time. Four phases run each cycle:
//!
//! 1. Observe: snapshot descriptors, profile and history into an
//!    [`ObservationContext`] - never raw audio
//! 2. Reason: ask the advisor for a candidate and compute our own
//!    confidence in it (advisor confidence is never passed through)
//! 3. Act: validate the candidate; on any failure substitute the
//!    conservative fallback and re-validate it
//! 4. Learn: fold outcome feedback into the effectiveness log, invoked
//!    separately by the surrounding system via [`DecisionEngine::integrate_feedback`]

use crate::agent::advisor::StrategyAdvisor;
use crate::agent::observation::{
    AcousticScene, DecisionDigest, FeedbackRecord, ObservationContext,
};
use crate::agent::safety::{SafetyCheck, SafetyValidator};
use crate::analysis::AudioFeatureSet;
use crate::profile::UserProfile;
use crate::strategy::{bounds, CandidateStrategy, Strategy};
use chrono::{DateTime, Utc};
use log::{debug, error, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Confidence model constants
pub mod confidence {
    /// Floor applied to every computed confidence
    pub const MIN: f32 = 0.3;

    /// Ceiling applied to every computed confidence
    pub const MAX: f32 = 1.0;

    /// Bonus when the listening intent prioritizes speech clarity
    pub const CLARITY_INTENT_BONUS: f32 = 0.1;

    /// Penalty when the acoustic scene is unknown
    pub const UNKNOWN_SCENE_PENALTY: f32 = 0.2;

    /// Floor applied together with the unknown-scene penalty
    pub const UNKNOWN_SCENE_FLOOR: f32 = 0.4;

    /// Below this, candidate strengths are capped to conservative limits
    pub const CONSERVATIVE_THRESHOLD: f32 = 0.6;

    /// Noise suppression cap for low-certainty decisions
    pub const MAX_SUPPRESSION_WHEN_UNCERTAIN: f32 = 0.5;

    /// Speech enhancement cap for low-certainty decisions
    pub const MAX_ENHANCEMENT_WHEN_UNCERTAIN: f32 = 0.3;
}

/// Decision history high-water mark; exceeding it triggers a trim
pub const HISTORY_HIGH_WATER: usize = 10_000;

/// Entries retained after a history trim, most recent first in age
pub const HISTORY_RETAINED: usize = 5_000;

/// How many recent decisions enter the observation context
const RECENT_DECISIONS_WINDOW: usize = 5;

/// Decisions summarized by [`DecisionEngine::summary`]
const SUMMARY_WINDOW: usize = 100;

/// A conditional follow-up attached to a decision
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecondaryAdjustment {
    pub condition: String,
    pub adjustment: String,
}

/// The engine's record of one decision cycle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Decision {
    pub id: Uuid,
    /// The validated strategy in effect for this cycle
    pub strategy: Strategy,
    /// Engine-computed confidence, not advisor-reported
    pub confidence: f32,
    pub rationale: String,
    pub duration_seconds: u32,
    pub secondary_adjustments: Vec<SecondaryAdjustment>,
    pub is_reversible: bool,
    pub timestamp: DateTime<Utc>,
}

impl Decision {
    fn digest(&self) -> DecisionDigest {
        DecisionDigest {
            strategy_name: self.strategy.name.clone(),
            confidence: self.confidence,
            timestamp: self.timestamp,
        }
    }
}

/// Objective outcome metrics reported after an interaction
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FeedbackOutcome {
    /// Change in ASR confidence attributable to the strategy
    pub asr_confidence_change: f32,
    /// Whether the user manually overrode the strategy
    pub user_override: bool,
}

/// One effectiveness observation for a strategy label
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EffectivenessSample {
    /// Signal in [-1, 1]; 0.5 is the neutral baseline
    pub effectiveness: f32,
    pub timestamp: DateTime<Utc>,
}

/// Aggregate view over recent decisions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineSummary {
    pub decisions_recorded: usize,
    pub recent_decisions: usize,
    pub avg_noise_suppression: f32,
    pub avg_speech_enhancement: f32,
    pub avg_confidence: f32,
}

/// Compute the effectiveness signal from objective and subjective feedback
///
/// Starts at the neutral baseline 0.5, adds half the ASR confidence change,
/// folds in scaled subjective satisfaction when given, penalizes user
/// overrides, and clamps to [-1, 1].
pub fn compute_effectiveness(outcome: &FeedbackOutcome, satisfaction: Option<f32>) -> f32 {
    let mut effectiveness = 0.5;

    effectiveness += outcome.asr_confidence_change * 0.5;

    if let Some(satisfaction) = satisfaction {
        let normalized = (satisfaction - 50.0) / 50.0;
        effectiveness += normalized * 0.3;
    }

    if outcome.user_override {
        effectiveness -= 0.3;
    }

    effectiveness.clamp(-1.0, 1.0)
}

/// Decision engine for hearing aid audio processing
///
/// Owns one session's state exclusively; concurrent frames for the same
/// session must be serialized by the caller so the minimum-interval
/// oscillation guard holds.
pub struct DecisionEngine {
    advisor: Box<dyn StrategyAdvisor>,
    validator: SafetyValidator,
    decision_history: Vec<Decision>,
    effectiveness_log: HashMap<String, Vec<EffectivenessSample>>,
    last_decision_time: Option<DateTime<Utc>>,
}

impl DecisionEngine {
    /// Create an engine around the given advisor
    pub fn new(advisor: Box<dyn StrategyAdvisor>) -> Self {
        Self {
            advisor,
            validator: SafetyValidator::new(),
            decision_history: Vec::new(),
            effectiveness_log: HashMap::new(),
            last_decision_time: None,
        }
    }

    /// Execute one full decision cycle
    ///
    /// Always yields a decision: advisor failures and safety violations
    /// cost the cycle its candidate, never its outcome.
    pub fn decide(
        &mut self,
        features: &AudioFeatureSet,
        profile: &UserProfile,
        recent_feedback: &[FeedbackRecord],
    ) -> (Decision, SafetyCheck) {
        // Phase 1: OBSERVE
        let observation = self.observe(features, profile, recent_feedback);
        debug!(
            "OBSERVE: scene {:?}, noise {:.1}dB, speech {:.0}%, intent {:?}",
            observation.acoustic_scene,
            observation.noise_level_db,
            observation.speech_confidence * 100.0,
            observation.listening_intent
        );

        // Phase 2: REASON
        let computed_confidence = Self::assess_confidence(&observation);
        let candidate = self.reason(&observation, profile, computed_confidence);

        // Phase 3: ACT
        let (decision, check) = self.act(candidate);

        self.decision_history.push(decision.clone());
        self.trim_history();
        self.last_decision_time = Some(decision.timestamp);

        // Phase 4: LEARN happens later, via integrate_feedback
        info!(
            "Decision made: {} (confidence: {:.2})",
            decision.strategy.name, decision.confidence
        );

        (decision, check)
    }

    /// OBSERVE phase: gather all relevant context without raw audio
    fn observe(
        &self,
        features: &AudioFeatureSet,
        profile: &UserProfile,
        recent_feedback: &[FeedbackRecord],
    ) -> ObservationContext {
        let recent_decisions = self
            .decision_history
            .iter()
            .rev()
            .take(RECENT_DECISIONS_WINDOW)
            .map(Decision::digest)
            .collect();

        ObservationContext::from_features(
            features,
            profile,
            recent_decisions,
            recent_feedback.to_vec(),
        )
    }

    /// REASON phase: obtain a candidate and stamp our computed confidence
    ///
    /// A failing advisor yields a deliberately empty candidate, which the
    /// Act phase treats as a structural validation failure.
    fn reason(
        &self,
        observation: &ObservationContext,
        profile: &UserProfile,
        computed_confidence: f32,
    ) -> CandidateStrategy {
        let mut candidate = match self.advisor.propose(observation, profile) {
            Ok(candidate) => candidate,
            Err(err) => {
                warn!(
                    "advisor '{}' failed, forcing fallback: {err}",
                    self.advisor.name()
                );
                return CandidateStrategy::default();
            }
        };

        // Confidence is assessed here, not taken from the advisor
        candidate.confidence = Some(computed_confidence);

        if computed_confidence < confidence::CONSERVATIVE_THRESHOLD {
            if let Some(ns) = candidate.noise_suppression_strength {
                candidate.noise_suppression_strength =
                    Some(ns.min(confidence::MAX_SUPPRESSION_WHEN_UNCERTAIN));
            }
            if let Some(se) = candidate.speech_enhancement_strength {
                candidate.speech_enhancement_strength =
                    Some(se.min(confidence::MAX_ENHANCEMENT_WHEN_UNCERTAIN));
            }
            debug!(
                "REASON: low certainty ({computed_confidence:.2}), \
                 capped suppression/enhancement"
            );
        }

        candidate
    }

    /// Assess confidence in the situation the strategy addresses
    ///
    /// Base is the speech confidence score; clarity-seeking intents earn a
    /// small bonus, an unknown scene costs a penalty, and the result is
    /// clamped into [0.3, 1.0].
    pub fn assess_confidence(observation: &ObservationContext) -> f32 {
        let mut confidence = observation.speech_confidence;

        if observation.listening_intent.wants_clarity() {
            confidence = (confidence + confidence::CLARITY_INTENT_BONUS).min(confidence::MAX);
        }

        if observation.acoustic_scene == AcousticScene::Unknown {
            confidence = (confidence - confidence::UNKNOWN_SCENE_PENALTY)
                .max(confidence::UNKNOWN_SCENE_FLOOR);
        }

        confidence.clamp(confidence::MIN, confidence::MAX)
    }

    /// ACT phase: validate the candidate or substitute the fallback
    fn act(&self, candidate: CandidateStrategy) -> (Decision, SafetyCheck) {
        let check = self.validator.validate(&candidate);

        let (strategy, check, secondary_adjustments) = if check.is_safe {
            match candidate.finalize() {
                Ok(strategy) => (strategy, check, Vec::new()),
                Err(err) => {
                    // Unreachable after a passing check, but never panic
                    error!("validated candidate failed to finalize: {err}");
                    self.fallback()
                }
            }
        } else {
            error!("Safety violations detected: {:?}", check.violations);
            self.fallback()
        };

        // Oscillation guard: duration never drops below the minimum,
        // whatever the advisor asked for
        let duration_seconds = strategy.duration_seconds.max(bounds::MIN_DURATION_SECONDS);
        let strategy = Strategy {
            duration_seconds,
            ..strategy
        };

        let decision = Decision {
            id: Uuid::new_v4(),
            // The Reason phase stamped the engine-computed confidence into
            // the candidate; the fallback carries its own
            confidence: strategy.confidence,
            rationale: strategy.rationale.clone(),
            duration_seconds,
            secondary_adjustments,
            is_reversible: strategy.is_reversible,
            timestamp: Utc::now(),
            strategy,
        };

        (decision, check)
    }

    /// Build the conservative fallback and re-validate it
    ///
    /// The fallback must always pass its own validation; a failure here
    /// would mean the bounds table and the fallback disagree.
    fn fallback(&self) -> (Strategy, SafetyCheck, Vec<SecondaryAdjustment>) {
        warn!("Fallback: using conservative minimal intervention strategy");

        let strategy = Strategy::conservative_fallback();
        let recheck = self.validator.validate(&CandidateStrategy::from(&strategy));
        debug_assert!(recheck.is_safe, "conservative fallback failed validation");

        let adjustments = vec![SecondaryAdjustment {
            condition: "if_safety_cleared".to_string(),
            adjustment: "return_to_previous_strategy".to_string(),
        }];

        (strategy, recheck, adjustments)
    }

    /// LEARN phase: integrate feedback for the most recent decision
    ///
    /// Computes the effectiveness signal and appends it to the per-label
    /// log. Updates are incremental - samples are appended, never
    /// overwritten, so prior labels' data stays intact.
    pub fn integrate_feedback(&mut self, outcome: &FeedbackOutcome, satisfaction: Option<f32>) {
        let Some(last) = self.decision_history.last() else {
            debug!("LEARN: no decision to attach feedback to");
            return;
        };

        let label = last.strategy.name.clone();
        let effectiveness = compute_effectiveness(outcome, satisfaction);

        self.effectiveness_log
            .entry(label.clone())
            .or_default()
            .push(EffectivenessSample {
                effectiveness,
                timestamp: Utc::now(),
            });

        info!("Learning: {label} effectiveness = {effectiveness:.2}");
    }

    /// Most recent effectiveness signal recorded for a strategy label
    pub fn latest_effectiveness(&self, label: &str) -> Option<f32> {
        self.effectiveness_log
            .get(label)
            .and_then(|samples| samples.last())
            .map(|sample| sample.effectiveness)
    }

    /// Full decision history, oldest first
    pub fn history(&self) -> &[Decision] {
        &self.decision_history
    }

    /// When the engine last emitted a decision
    pub fn last_decision_time(&self) -> Option<DateTime<Utc>> {
        self.last_decision_time
    }

    /// Aggregate view over the most recent decisions
    pub fn summary(&self) -> EngineSummary {
        let recent: Vec<&Decision> = self
            .decision_history
            .iter()
            .rev()
            .take(SUMMARY_WINDOW)
            .collect();
        let count = recent.len().max(1) as f32;

        EngineSummary {
            decisions_recorded: self.decision_history.len(),
            recent_decisions: recent.len(),
            avg_noise_suppression: recent
                .iter()
                .map(|d| d.strategy.noise_suppression_strength)
                .sum::<f32>()
                / count,
            avg_speech_enhancement: recent
                .iter()
                .map(|d| d.strategy.speech_enhancement_strength)
                .sum::<f32>()
                / count,
            avg_confidence: recent.iter().map(|d| d.confidence).sum::<f32>() / count,
        }
    }

    /// Trim the history once it exceeds the high-water mark
    ///
    /// Keeps the most recent entries in chronological order.
    fn trim_history(&mut self) {
        if self.decision_history.len() > HISTORY_HIGH_WATER {
            let excess = self.decision_history.len() - HISTORY_RETAINED;
            self.decision_history.drain(..excess);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::advisor::RuleBasedAdvisor;
    use crate::analysis::AudioFeatureSet;
    use crate::Result;
    use approx::assert_abs_diff_eq;

    /// Advisor returning a fixed candidate, for steering the Act phase
    struct ScriptedAdvisor {
        candidate: CandidateStrategy,
    }

    impl StrategyAdvisor for ScriptedAdvisor {
        fn name(&self) -> &str {
            "scripted"
        }

        fn propose(
            &self,
            _observation: &ObservationContext,
            _profile: &UserProfile,
        ) -> Result<CandidateStrategy> {
            Ok(self.candidate.clone())
        }
    }

    struct FailingAdvisor;

    impl StrategyAdvisor for FailingAdvisor {
        fn name(&self) -> &str {
            "failing"
        }

        fn propose(
            &self,
            _observation: &ObservationContext,
            _profile: &UserProfile,
        ) -> Result<CandidateStrategy> {
            Err(crate::AurisError::AdvisorUnavailable {
                advisor: "failing".to_string(),
                reason: "simulated outage".to_string(),
            })
        }
    }

    fn features() -> AudioFeatureSet {
        AudioFeatureSet::degraded(16000, 100.0)
    }

    fn observation_with(scene: AcousticScene, speech_confidence: f32) -> ObservationContext {
        let mut observation = ObservationContext::from_features(
            &features(),
            &UserProfile::default(),
            Vec::new(),
            Vec::new(),
        );
        observation.acoustic_scene = scene;
        observation.speech_confidence = speech_confidence;
        observation
    }

    #[test]
    fn test_decide_with_rule_based_advisor_is_safe() {
        let mut engine = DecisionEngine::new(Box::new(RuleBasedAdvisor::new()));
        let (decision, check) = engine.decide(&features(), &UserProfile::default(), &[]);

        assert!(check.is_safe);
        assert!(decision.is_reversible);
        assert!(decision.duration_seconds >= bounds::MIN_DURATION_SECONDS);
        assert_eq!(engine.history().len(), 1);
        assert!(engine.last_decision_time().is_some());
    }

    #[test]
    fn test_unsafe_candidate_triggers_fallback() {
        let mut bad = CandidateStrategy::from(&Strategy::conservative_fallback());
        bad.noise_suppression_strength = Some(5.0);
        bad.is_reversible = Some(false);

        let mut engine = DecisionEngine::new(Box::new(ScriptedAdvisor { candidate: bad }));
        let (decision, _check) = engine.decide(&features(), &UserProfile::default(), &[]);

        assert_eq!(decision.strategy.name, "minimal_intervention_monitoring");
        assert!(decision.is_reversible);
        assert!(decision.duration_seconds >= bounds::MIN_DURATION_SECONDS);
        assert_eq!(decision.secondary_adjustments.len(), 1);

        // The emitted decision itself passes validation
        let recheck =
            SafetyValidator::new().validate(&CandidateStrategy::from(&decision.strategy));
        assert!(recheck.is_safe);
    }

    #[test]
    fn test_advisor_failure_triggers_fallback() {
        let mut engine = DecisionEngine::new(Box::new(FailingAdvisor));
        let (decision, check) = engine.decide(&features(), &UserProfile::default(), &[]);

        assert_eq!(decision.strategy.name, "minimal_intervention_monitoring");
        assert!(check.is_safe, "fallback recheck must pass");
        assert_abs_diff_eq!(decision.confidence, 0.6);
    }

    #[test]
    fn test_short_duration_floored_to_minimum() {
        let mut eager = CandidateStrategy::from(&Strategy::conservative_fallback());
        // In-bounds duration, engine still enforces the floor afterwards
        eager.duration_seconds = Some(bounds::MIN_DURATION_SECONDS);

        let mut engine = DecisionEngine::new(Box::new(ScriptedAdvisor { candidate: eager }));
        let (decision, _) = engine.decide(&features(), &UserProfile::default(), &[]);
        assert!(decision.duration_seconds >= bounds::MIN_DURATION_SECONDS);
    }

    #[test]
    fn test_assess_confidence_unknown_scene() {
        let observation = observation_with(AcousticScene::Unknown, 0.35);
        let confidence = DecisionEngine::assess_confidence(&observation);

        // 0.35 + 0.1 (conversation intent) - 0.2, floored at 0.4
        assert!(confidence < 0.6);
        assert_abs_diff_eq!(confidence, 0.4, epsilon = 1e-6);
    }

    #[test]
    fn test_assess_confidence_clarity_bonus_capped() {
        let mut observation = observation_with(AcousticScene::Conversation, 0.95);
        let confidence = DecisionEngine::assess_confidence(&observation);
        assert_abs_diff_eq!(confidence, 1.0, epsilon = 1e-6);

        observation.listening_intent = crate::profile::ListeningIntent::Music;
        let confidence = DecisionEngine::assess_confidence(&observation);
        assert_abs_diff_eq!(confidence, 0.95, epsilon = 1e-6);
    }

    #[test]
    fn test_assess_confidence_floor() {
        let mut observation = observation_with(AcousticScene::Ambient, 0.0);
        observation.listening_intent = crate::profile::ListeningIntent::Music;
        let confidence = DecisionEngine::assess_confidence(&observation);
        assert_abs_diff_eq!(confidence, confidence::MIN, epsilon = 1e-6);
    }

    #[test]
    fn test_low_certainty_caps_candidate_strengths() {
        // Aggressive but in-bounds candidate
        let mut aggressive = CandidateStrategy::from(&Strategy::conservative_fallback());
        aggressive.noise_suppression_strength = Some(0.9);
        aggressive.speech_enhancement_strength = Some(0.8);

        let mut engine = DecisionEngine::new(Box::new(ScriptedAdvisor {
            candidate: aggressive,
        }));

        // Degraded features give speech probability 0.0 -> confidence 0.4
        let (decision, check) = engine.decide(&features(), &UserProfile::default(), &[]);

        assert!(check.is_safe);
        assert!(decision.confidence < 0.6);
        assert!(decision.strategy.noise_suppression_strength <= 0.5);
        assert!(decision.strategy.speech_enhancement_strength <= 0.3);
    }

    #[test]
    fn test_effectiveness_positive_outcome() {
        let outcome = FeedbackOutcome {
            asr_confidence_change: 0.15,
            user_override: false,
        };
        let effectiveness = compute_effectiveness(&outcome, Some(85.0));
        assert!(effectiveness > 0.5, "got {effectiveness}");
        assert_abs_diff_eq!(effectiveness, 0.785, epsilon = 1e-6);
    }

    #[test]
    fn test_effectiveness_negative_outcome() {
        let outcome = FeedbackOutcome {
            asr_confidence_change: -0.10,
            user_override: true,
        };
        let effectiveness = compute_effectiveness(&outcome, Some(25.0));
        assert!(effectiveness < 0.5, "got {effectiveness}");
        assert_abs_diff_eq!(effectiveness, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_effectiveness_clamped() {
        let outcome = FeedbackOutcome {
            asr_confidence_change: 10.0,
            user_override: false,
        };
        assert_abs_diff_eq!(compute_effectiveness(&outcome, Some(100.0)), 1.0);

        let outcome = FeedbackOutcome {
            asr_confidence_change: -10.0,
            user_override: true,
        };
        assert_abs_diff_eq!(compute_effectiveness(&outcome, Some(0.0)), -1.0);
    }

    #[test]
    fn test_integrate_feedback_appends_incrementally() {
        let mut engine = DecisionEngine::new(Box::new(RuleBasedAdvisor::new()));
        let (decision, _) = engine.decide(&features(), &UserProfile::default(), &[]);
        let label = decision.strategy.name.clone();

        engine.integrate_feedback(
            &FeedbackOutcome {
                asr_confidence_change: 0.2,
                user_override: false,
            },
            None,
        );
        let first = engine.latest_effectiveness(&label).unwrap();

        engine.integrate_feedback(
            &FeedbackOutcome {
                asr_confidence_change: -0.2,
                user_override: true,
            },
            None,
        );
        let second = engine.latest_effectiveness(&label).unwrap();

        assert!(first > second);
        // Append-only: both samples survive
        assert_eq!(engine.effectiveness_log[&label].len(), 2);
        assert_abs_diff_eq!(engine.effectiveness_log[&label][0].effectiveness, first);
    }

    #[test]
    fn test_integrate_feedback_without_decisions_is_noop() {
        let mut engine = DecisionEngine::new(Box::new(RuleBasedAdvisor::new()));
        engine.integrate_feedback(&FeedbackOutcome::default(), Some(90.0));
        assert!(engine.effectiveness_log.is_empty());
    }

    #[test]
    fn test_observation_includes_recent_decisions() {
        let mut engine = DecisionEngine::new(Box::new(RuleBasedAdvisor::new()));
        for _ in 0..8 {
            engine.decide(&features(), &UserProfile::default(), &[]);
        }
        let observation = engine.observe(&features(), &UserProfile::default(), &[]);
        assert_eq!(observation.recent_decisions.len(), RECENT_DECISIONS_WINDOW);
    }

    #[test]
    fn test_history_trimming_preserves_order() {
        let mut engine = DecisionEngine::new(Box::new(RuleBasedAdvisor::new()));
        // Synthesize history directly; running 10k full cycles is wasteful
        let template = {
            let (decision, _) = engine.decide(&features(), &UserProfile::default(), &[]);
            decision
        };
        engine.decision_history.clear();
        for i in 0..(HISTORY_HIGH_WATER + 1) {
            let mut decision = template.clone();
            decision.duration_seconds = i as u32;
            engine.decision_history.push(decision);
        }

        engine.trim_history();

        assert_eq!(engine.decision_history.len(), HISTORY_RETAINED);
        // The most recent window survives, in chronological order
        let first = engine.decision_history.first().unwrap().duration_seconds;
        let last = engine.decision_history.last().unwrap().duration_seconds;
        assert_eq!(last, HISTORY_HIGH_WATER as u32);
        assert_eq!(first, (HISTORY_HIGH_WATER + 1 - HISTORY_RETAINED) as u32);
        assert!(engine
            .decision_history
            .windows(2)
            .all(|w| w[0].duration_seconds < w[1].duration_seconds));
    }

    #[test]
    fn test_summary_aggregates_recent_window() {
        let mut engine = DecisionEngine::new(Box::new(RuleBasedAdvisor::new()));
        for _ in 0..3 {
            engine.decide(&features(), &UserProfile::default(), &[]);
        }
        let summary = engine.summary();
        assert_eq!(summary.decisions_recorded, 3);
        assert_eq!(summary.recent_decisions, 3);
        assert!(summary.avg_confidence > 0.0);
    }
}
