//! Safety validation for advisor output - strict compliance enforcement
//!
//! Every candidate strategy crosses this gate before it can touch audio.
//! The validator enforces:
//! - No references to raw audio or signal-level internals in advisor text
//! - Parameter bounds from the single `strategy::bounds` table
//! - Reversibility of every decision
//! - Stability constraints (minimum duration against oscillation)
//! - An explicit rationale of useful length
//!
//! Validation and clamping are two distinct recovery paths: the decision
//! loop discards failed candidates and falls back, while `apply_bounds` is
//! an explicit clamping utility for callers that want correction instead.
//! The two are never interchangeable.

use crate::strategy::{bounds, CandidateStrategy, FrequencyProfile};
use log::{error, info, warn};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Substrings an advisor may never emit: the reasoning side of the system
/// has no business referencing signal-level data or processing internals.
pub const PROHIBITED_TERMS: &[&str] = &[
    "raw audio",
    "waveform",
    "sample rate",
    "fft",
    "coefficient",
    "impulse response",
    "filter design",
    "dsp",
    "digital signal",
];

/// Aggressiveness score above which a gentler strategy is recommended
const MAX_AGGRESSIVENESS: f32 = 2.0;

/// Confidence below which minimal intervention is recommended
const LOW_CONFIDENCE_WARNING: f32 = 0.5;

/// Result of safety validation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SafetyCheck {
    /// Whether the strategy may be applied
    pub is_safe: bool,
    /// Blocking violations, one entry per failed check
    pub violations: Vec<String>,
    /// Non-blocking recommendations
    pub warnings: Vec<String>,
    /// Human-readable outcome summary
    pub message: String,
}

impl SafetyCheck {
    /// Whether any warnings were raised
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// One field corrected by `apply_bounds`, kept for the audit trail
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundCorrection {
    pub field: &'static str,
    pub original: f32,
    pub corrected: f32,
}

/// Validates candidate strategies against the bounded-parameter contract
///
/// Pure and stateless: identical input always yields an identical check.
#[derive(Debug, Clone, Copy, Default)]
pub struct SafetyValidator;

impl SafetyValidator {
    pub fn new() -> Self {
        Self
    }

    /// Validate a candidate strategy for strict safety compliance
    ///
    /// Structural problems (prohibited content, missing fields) short-circuit
    /// the numeric checks: a candidate that is not even shaped correctly gets
    /// no partial credit for in-range values.
    pub fn validate(&self, candidate: &CandidateStrategy) -> SafetyCheck {
        let mut violations = Vec::new();
        let mut warnings = Vec::new();

        self.check_prohibited_content(candidate, &mut violations);
        self.check_required_fields(candidate, &mut violations);

        if !violations.is_empty() {
            return self.finish(violations, warnings);
        }

        self.check_numeric_bounds(candidate, &mut violations);
        self.check_frequency_profile(candidate, &mut violations);
        self.check_reversibility(candidate, &mut violations);
        self.check_rationale(candidate, &mut violations);
        self.check_duration(candidate, &mut violations);
        self.collect_warnings(candidate, &mut warnings);

        self.finish(violations, warnings)
    }

    /// Clamp every numeric field into its valid range
    ///
    /// Fallback path only, never the primary one: structural, rationale and
    /// reversibility violations are deliberately left untouched. Every
    /// correction is logged and returned for audit traceability. Applying
    /// the result a second time yields no further corrections.
    pub fn apply_bounds(
        &self,
        candidate: &CandidateStrategy,
    ) -> (CandidateStrategy, Vec<BoundCorrection>) {
        let mut safe = candidate.clone();
        let mut corrections = Vec::new();

        let mut clamp = |field: &'static str, value: &mut Option<f32>, min: f32, max: f32| {
            if let Some(original) = *value {
                let corrected = original.clamp(min, max);
                if corrected != original {
                    corrections.push(BoundCorrection {
                        field,
                        original,
                        corrected,
                    });
                    *value = Some(corrected);
                }
            }
        };

        clamp(
            "noise_suppression_strength",
            &mut safe.noise_suppression_strength,
            bounds::MIN_NOISE_SUPPRESSION,
            bounds::MAX_NOISE_SUPPRESSION,
        );
        clamp(
            "speech_enhancement_strength",
            &mut safe.speech_enhancement_strength,
            bounds::MIN_SPEECH_ENHANCEMENT,
            bounds::MAX_SPEECH_ENHANCEMENT,
        );
        clamp(
            "compression_ratio",
            &mut safe.compression_ratio,
            bounds::MIN_COMPRESSION_RATIO,
            bounds::MAX_COMPRESSION_RATIO,
        );
        clamp(
            "high_freq_boost_db",
            &mut safe.high_freq_boost_db,
            bounds::MIN_HIGH_FREQ_BOOST_DB,
            bounds::MAX_HIGH_FREQ_BOOST_DB,
        );
        clamp(
            "low_freq_reduction_db",
            &mut safe.low_freq_reduction_db,
            bounds::MIN_LOW_FREQ_REDUCTION_DB,
            bounds::MAX_LOW_FREQ_REDUCTION_DB,
        );
        clamp(
            "adaptive_gain",
            &mut safe.adaptive_gain,
            bounds::MIN_ADAPTIVE_GAIN,
            bounds::MAX_ADAPTIVE_GAIN,
        );
        clamp(
            "noise_gate_threshold_db",
            &mut safe.noise_gate_threshold_db,
            bounds::MIN_NOISE_GATE_THRESHOLD_DB,
            bounds::MAX_NOISE_GATE_THRESHOLD_DB,
        );
        clamp(
            "confidence",
            &mut safe.confidence,
            bounds::MIN_CONFIDENCE,
            bounds::MAX_CONFIDENCE,
        );

        if let Some(original) = safe.duration_seconds {
            let corrected =
                original.clamp(bounds::MIN_DURATION_SECONDS, bounds::MAX_DURATION_SECONDS);
            if corrected != original {
                corrections.push(BoundCorrection {
                    field: "duration_seconds",
                    original: original as f32,
                    corrected: corrected as f32,
                });
                safe.duration_seconds = Some(corrected);
            }
        }

        if !corrections.is_empty() {
            let summary: Vec<String> = corrections
                .iter()
                .map(|c| format!("{}: {:.2} -> {:.2}", c.field, c.original, c.corrected))
                .collect();
            warn!("Safety bounds applied - corrections: {}", summary.join("; "));
        }

        (safe, corrections)
    }

    fn check_prohibited_content(&self, candidate: &CandidateStrategy, violations: &mut Vec<String>) {
        let texts = [candidate.name.as_deref(), candidate.rationale.as_deref()];
        for text in texts.into_iter().flatten() {
            let lower = text.to_lowercase();
            for term in PROHIBITED_TERMS {
                if lower.contains(term) {
                    violations.push(format!(
                        "CRITICAL: prohibited term detected: '{term}'. \
                         The advisor must never reference raw audio or signal internals."
                    ));
                }
            }
        }
    }

    fn check_required_fields(&self, candidate: &CandidateStrategy, violations: &mut Vec<String>) {
        let mut require = |present: bool, field: &str| {
            if !present {
                violations.push(format!("Missing required field: {field}"));
            }
        };

        require(candidate.name.is_some(), "name");
        require(
            candidate.noise_suppression_strength.is_some(),
            "noise_suppression_strength",
        );
        require(
            candidate.speech_enhancement_strength.is_some(),
            "speech_enhancement_strength",
        );
        require(candidate.compression_ratio.is_some(), "compression_ratio");
        require(candidate.high_freq_boost_db.is_some(), "high_freq_boost_db");
        require(candidate.rationale.is_some(), "rationale");
        require(candidate.confidence.is_some(), "confidence");
        require(candidate.duration_seconds.is_some(), "duration_seconds");
        require(candidate.is_reversible.is_some(), "is_reversible");
    }

    fn check_numeric_bounds(&self, candidate: &CandidateStrategy, violations: &mut Vec<String>) {
        let mut check = |field: &str, value: f32, min: f32, max: f32| {
            if value < min || value > max {
                violations.push(format!(
                    "{field} out of bounds: {value:.2} (valid: [{min}, {max}])"
                ));
            }
        };

        check(
            "noise_suppression_strength",
            candidate.noise_suppression_strength.unwrap_or(0.5),
            bounds::MIN_NOISE_SUPPRESSION,
            bounds::MAX_NOISE_SUPPRESSION,
        );
        check(
            "speech_enhancement_strength",
            candidate.speech_enhancement_strength.unwrap_or(0.0),
            bounds::MIN_SPEECH_ENHANCEMENT,
            bounds::MAX_SPEECH_ENHANCEMENT,
        );
        check(
            "compression_ratio",
            candidate.compression_ratio.unwrap_or(1.0),
            bounds::MIN_COMPRESSION_RATIO,
            bounds::MAX_COMPRESSION_RATIO,
        );
        check(
            "high_freq_boost_db",
            candidate.high_freq_boost_db.unwrap_or(0.0),
            bounds::MIN_HIGH_FREQ_BOOST_DB,
            bounds::MAX_HIGH_FREQ_BOOST_DB,
        );
        check(
            "low_freq_reduction_db",
            candidate.low_freq_reduction_db.unwrap_or(0.0),
            bounds::MIN_LOW_FREQ_REDUCTION_DB,
            bounds::MAX_LOW_FREQ_REDUCTION_DB,
        );
        check(
            "adaptive_gain",
            candidate.adaptive_gain.unwrap_or(1.0),
            bounds::MIN_ADAPTIVE_GAIN,
            bounds::MAX_ADAPTIVE_GAIN,
        );
        check(
            "noise_gate_threshold_db",
            candidate.noise_gate_threshold_db.unwrap_or(-40.0),
            bounds::MIN_NOISE_GATE_THRESHOLD_DB,
            bounds::MAX_NOISE_GATE_THRESHOLD_DB,
        );
        check(
            "confidence",
            candidate.confidence.unwrap_or(0.5),
            bounds::MIN_CONFIDENCE,
            bounds::MAX_CONFIDENCE,
        );
    }

    fn check_frequency_profile(&self, candidate: &CandidateStrategy, violations: &mut Vec<String>) {
        if let Some(raw) = candidate.frequency_profile.as_deref() {
            if FrequencyProfile::from_str(raw).is_err() {
                violations.push(format!(
                    "Invalid frequency_profile: {raw} (valid: {:?})",
                    FrequencyProfile::ALLOWED
                ));
            }
        }
    }

    fn check_reversibility(&self, candidate: &CandidateStrategy, violations: &mut Vec<String>) {
        if !candidate.is_reversible.unwrap_or(false) {
            violations.push(
                "CRITICAL: strategy must be reversible. \
                 All decisions must include revert capability."
                    .to_string(),
            );
        }
    }

    fn check_rationale(&self, candidate: &CandidateStrategy, violations: &mut Vec<String>) {
        let rationale = candidate.rationale.as_deref().unwrap_or("");
        if rationale.chars().count() < bounds::MIN_RATIONALE_CHARS {
            violations.push(format!(
                "Rationale must be a clear explanation (minimum {} characters)",
                bounds::MIN_RATIONALE_CHARS
            ));
        }
    }

    fn check_duration(&self, candidate: &CandidateStrategy, violations: &mut Vec<String>) {
        let duration = candidate.duration_seconds.unwrap_or(30);
        if duration < bounds::MIN_DURATION_SECONDS {
            violations.push(format!(
                "Duration too short: {duration}s (minimum: {}s) - prevents rapid oscillation",
                bounds::MIN_DURATION_SECONDS
            ));
        }
        if duration > bounds::MAX_DURATION_SECONDS {
            violations.push(format!(
                "Duration too long: {duration}s (maximum: {}s)",
                bounds::MAX_DURATION_SECONDS
            ));
        }
    }

    fn collect_warnings(&self, candidate: &CandidateStrategy, warnings: &mut Vec<String>) {
        let confidence = candidate.confidence.unwrap_or(0.5);
        if confidence < LOW_CONFIDENCE_WARNING {
            warnings.push(format!(
                "Low confidence decision ({:.0}%). Recommend minimal intervention strategy.",
                confidence * 100.0
            ));
        }

        let ns = candidate.noise_suppression_strength.unwrap_or(0.0);
        let se = candidate.speech_enhancement_strength.unwrap_or(0.0);
        let cr = candidate.compression_ratio.unwrap_or(1.0);
        let hfb = candidate.high_freq_boost_db.unwrap_or(0.0);
        let aggressiveness = ns + se + (cr - 1.0) / 7.0 + hfb / 10.0;
        if aggressiveness > MAX_AGGRESSIVENESS {
            warnings.push(format!(
                "High aggressiveness score ({aggressiveness:.1}). \
                 Recommend a gentler strategy."
            ));
        }
    }

    fn finish(&self, violations: Vec<String>, warnings: Vec<String>) -> SafetyCheck {
        let (is_safe, message) = if !violations.is_empty() {
            let mut message = format!("Safety FAILED: {} violation(s)", violations.len());
            if !warnings.is_empty() {
                message.push_str(&format!(" + {} warning(s)", warnings.len()));
            }
            (false, message)
        } else if !warnings.is_empty() {
            (
                true,
                format!("Safety PASSED with {} warning(s)", warnings.len()),
            )
        } else {
            (
                true,
                "Safety validation PASSED - all constraints respected".to_string(),
            )
        };

        if !violations.is_empty() {
            error!("{message}: {violations:?}");
        } else if !warnings.is_empty() {
            warn!("{message}: {warnings:?}");
        } else {
            info!("{message}");
        }

        SafetyCheck {
            is_safe,
            violations,
            warnings,
            message,
        }
    }
}
