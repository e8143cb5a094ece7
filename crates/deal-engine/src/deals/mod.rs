//! Deal scoring and counterparty matching for the tax-credit marketplace.
//!
//! Submissions pass through [`ProjectIntake`] before reaching the pure scoring and matching
//! engines. [`DealService`] stitches those together with the injected data provider and
//! notifier, and [`deal_router`] exposes the service over HTTP.

pub mod batch;
pub mod domain;
pub mod intake;
pub mod matching;
pub mod provider;
pub mod router;
pub mod scoring;
pub mod service;

#[cfg(test)]
mod tests;

pub use batch::{
    decode_submission, score_batch, score_entries, AutoMatchSummary, BatchEntry, BatchFailure,
    BatchReport, BatchView,
};
pub use domain::{
    ComplexityProfile, Counterparty, CounterpartyId, ImpactProfile, LocationProfile,
    ManagementStrength, Project, ProjectId, ReadinessProfile, SponsorProfile,
};
pub use intake::{IntakeViolation, ProjectIntake, ProjectSubmission};
pub use matching::{
    limit_matches, match_counterparties, match_projects, LimitedMatches, MatchEngine,
    MatchPoints, MatchReason, MatchResult, MatchStrength, ProjectMatch, DEFAULT_DISPLAY_CAP,
};
pub use provider::{
    DealDataProvider, MatchAlert, MatchNotifier, NotifyError, ProviderError, ScoreRecord,
    ScoreView,
};
pub use router::{deal_router, MatchingRequest, ScoringRequest};
pub use scoring::{
    reason_codes, score, DealScore, DealTier, EligibilityFlags, ReasonCode, ScoreDimension,
    ScoreWeights, ScoringEngine, SubScores, MODEL_VERSION,
};
pub use service::{DealService, DealServiceError};
