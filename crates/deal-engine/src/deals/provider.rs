use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{Counterparty, CounterpartyId, Project, ProjectId};
use super::scoring::{DealScore, EligibilityFlags, ReasonCode, SubScores, MODEL_VERSION};

/// Read access to project and counterparty records held by the surrounding system.
///
/// Implementations are handed to [`DealService`](super::service::DealService) explicitly;
/// nothing in this crate reaches for a process-wide client.
pub trait DealDataProvider: Send + Sync {
    fn project(&self, id: &ProjectId) -> Result<Option<Project>, ProviderError>;
    fn available_projects(&self) -> Result<Vec<Project>, ProviderError>;
    fn counterparty(&self, id: &CounterpartyId) -> Result<Option<Counterparty>, ProviderError>;
    /// Counterparties in the order they should be considered for tie-breaks.
    fn active_counterparties(&self) -> Result<Vec<Counterparty>, ProviderError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("record not found")]
    NotFound,
    #[error("data provider unavailable: {0}")]
    Unavailable(String),
}

/// Outbound hook for telling a counterparty about a strong match (e-mail, inbox, webhook).
pub trait MatchNotifier: Send + Sync {
    fn notify(&self, alert: MatchAlert) -> Result<(), NotifyError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchAlert {
    pub template: String,
    pub counterparty_id: CounterpartyId,
    pub project_id: ProjectId,
    pub details: BTreeMap<String, String>,
}

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("notification transport unavailable: {0}")]
    Transport(String),
}

/// A score stamped outside the engine. The engine itself never reads the clock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub score: DealScore,
    pub model_version: String,
    pub computed_at: DateTime<Utc>,
}

impl ScoreRecord {
    pub fn stamp(score: DealScore) -> Self {
        Self {
            score,
            model_version: MODEL_VERSION.to_string(),
            computed_at: Utc::now(),
        }
    }

    pub fn view(&self) -> ScoreView {
        ScoreView {
            project_id: self.score.project_id.clone(),
            composite: self.score.composite,
            tier: self.score.tier.label(),
            tier_number: self.score.tier.number(),
            sub_scores: self.score.sub_scores,
            reasons: self.score.reason_labels(),
            reason_codes: self.score.reason_codes.clone(),
            eligibility: self.score.eligibility,
            model_version: self.model_version.clone(),
            computed_at: self.computed_at,
        }
    }
}

/// JSON shape returned to dashboards and API clients.
#[derive(Debug, Clone, Serialize)]
pub struct ScoreView {
    pub project_id: ProjectId,
    pub composite: f64,
    pub tier: &'static str,
    pub tier_number: u8,
    pub sub_scores: SubScores,
    pub reasons: Vec<String>,
    pub reason_codes: Vec<ReasonCode>,
    pub eligibility: EligibilityFlags,
    pub model_version: String,
    pub computed_at: DateTime<Utc>,
}
