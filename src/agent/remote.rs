//! Remote strategy advisor over HTTP
//!
//! Bridges the decision loop to an out-of-process reasoning service. The
//! request body is the serialized observation plus profile; the response
//! must be a candidate strategy. Transport failures surface as
//! `AdvisorUnavailable`, so the engine falls back instead of blocking the
//! cycle.

use crate::agent::advisor::StrategyAdvisor;
use crate::agent::observation::ObservationContext;
use crate::profile::UserProfile;
use crate::strategy::CandidateStrategy;
use crate::{AurisError, Result};
use log::debug;
use serde::Serialize;
use std::time::Duration;

/// Default request timeout
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Serialize)]
struct ProposalRequest<'a> {
    observation: &'a ObservationContext,
    profile: &'a UserProfile,
}

/// Advisor backed by a remote HTTP reasoning service
pub struct RemoteAdvisor {
    endpoint: String,
    client: reqwest::blocking::Client,
}

impl RemoteAdvisor {
    /// Create an advisor against the given proposal endpoint
    pub fn new(endpoint: &str) -> Result<Self> {
        Self::with_timeout(endpoint, DEFAULT_TIMEOUT)
    }

    /// Create an advisor with a custom request timeout
    pub fn with_timeout(endpoint: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AurisError::AdvisorUnavailable {
                advisor: "remote".to_string(),
                reason: format!("client construction failed: {e}"),
            })?;
        Ok(Self {
            endpoint: endpoint.to_string(),
            client,
        })
    }
}

impl StrategyAdvisor for RemoteAdvisor {
    fn name(&self) -> &str {
        "remote"
    }

    fn propose(
        &self,
        observation: &ObservationContext,
        profile: &UserProfile,
    ) -> Result<CandidateStrategy> {
        debug!("posting observation to remote advisor at {}", self.endpoint);

        let response = self
            .client
            .post(&self.endpoint)
            .json(&ProposalRequest {
                observation,
                profile,
            })
            .send()
            .map_err(|e| AurisError::AdvisorUnavailable {
                advisor: "remote".to_string(),
                reason: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(AurisError::AdvisorUnavailable {
                advisor: "remote".to_string(),
                reason: format!("service returned {}", response.status()),
            });
        }

        response
            .json::<CandidateStrategy>()
            .map_err(|e| AurisError::AdvisorMalformed {
                reason: e.to_string(),
            })
    }
}
