mod eligibility;
mod reasons;
pub(crate) mod rules;
mod tier;
mod weights;

pub use eligibility::{eligibility_flags, EligibilityFlags};
pub(crate) use reasons::reasons_for;
pub use reasons::{ReasonCode, ScoreDimension};
pub use rules::SUB_SCORE_CEILING;
pub use tier::DealTier;
pub use weights::ScoreWeights;

use super::domain::{Project, ProjectId};
use super::intake::IntakeViolation;
use serde::{Deserialize, Serialize};

/// Revision of the rubric stamped onto persisted score records.
pub const MODEL_VERSION: &str = "deal-score-v1";

/// Stateless evaluator that applies the composite weights to a project.
#[derive(Debug, Clone, Default)]
pub struct ScoringEngine {
    weights: ScoreWeights,
}

impl ScoringEngine {
    pub fn new(weights: ScoreWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &ScoreWeights {
        &self.weights
    }

    /// Validates the project first: NaN and infinite inputs never reach the sub-scorers.
    pub fn score(&self, project: &Project) -> Result<DealScore, IntakeViolation> {
        project.validate()?;
        let sub_scores = SubScores::for_project(project);
        let composite = sub_scores.composite(&self.weights);

        Ok(DealScore {
            project_id: project.id.clone(),
            sub_scores,
            composite,
            tier: DealTier::classify(composite),
            reason_codes: reasons_for(project),
            eligibility: eligibility_flags(&project.location),
        })
    }
}

/// The five independent dimension scores, each at most 100.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SubScores {
    pub distress: f64,
    pub impact: f64,
    pub readiness: f64,
    pub sponsor: f64,
    pub complexity: f64,
}

impl SubScores {
    pub(crate) fn for_project(project: &Project) -> Self {
        Self {
            distress: rules::distress(&project.location),
            impact: rules::impact(&project.impact),
            readiness: rules::readiness(&project.readiness),
            sponsor: rules::sponsor(&project.sponsor),
            complexity: rules::complexity(&project.complexity),
        }
    }

    /// Weighted combination. Not clamped: complexity can push it below zero.
    pub fn composite(&self, weights: &ScoreWeights) -> f64 {
        weights.distress * self.distress
            + weights.impact * self.impact
            + weights.readiness * self.readiness
            + weights.sponsor * self.sponsor
            - weights.complexity_penalty * self.complexity
    }
}

/// Immutable scoring output for one project snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DealScore {
    pub project_id: ProjectId,
    pub sub_scores: SubScores,
    pub composite: f64,
    pub tier: DealTier,
    pub reason_codes: Vec<ReasonCode>,
    pub eligibility: EligibilityFlags,
}

impl DealScore {
    pub fn reason_labels(&self) -> Vec<String> {
        self.reason_codes
            .iter()
            .map(|code| code.label().to_string())
            .collect()
    }
}

/// Score a project with the standard weights.
pub fn score(project: &Project) -> Result<DealScore, IntakeViolation> {
    ScoringEngine::default().score(project)
}

/// Human-readable justifications in dimension order.
pub fn reason_codes(project: &Project) -> Result<Vec<String>, IntakeViolation> {
    project.validate()?;
    Ok(reasons_for(project)
        .into_iter()
        .map(|code| code.label().to_string())
        .collect())
}
