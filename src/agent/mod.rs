//! Decision loop
//!
//! This module provides:
//! - Observation context assembly (descriptors in, never samples)
//! - The pluggable strategy advisor boundary
//! - Strict safety validation of advisor output
//! - The Observe-Reason-Act-Learn decision engine

mod advisor;
mod decision;
mod observation;
#[cfg(feature = "remote-advisor")]
mod remote;
mod safety;

pub use advisor::{CachedAdvisor, RuleBasedAdvisor, StrategyAdvisor};
pub use decision::{
    compute_effectiveness, confidence, Decision, DecisionEngine, EffectivenessSample,
    EngineSummary, FeedbackOutcome, SecondaryAdjustment, HISTORY_HIGH_WATER, HISTORY_RETAINED,
};
pub use observation::{
    AcousticScene, DecisionDigest, DeviceState, FeedbackRecord, ObservationContext,
    TemporalContext,
};
#[cfg(feature = "remote-advisor")]
pub use remote::RemoteAdvisor;
pub use safety::{BoundCorrection, SafetyCheck, SafetyValidator, PROHIBITED_TERMS};
