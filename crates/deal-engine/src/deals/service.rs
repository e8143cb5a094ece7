use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, info, warn};

use super::batch::{score_entries_with, AutoMatchSummary, BatchEntry, BatchFailure, BatchReport};
use super::domain::{CounterpartyId, ProjectId};
use super::intake::{IntakeViolation, ProjectIntake, ProjectSubmission};
use super::matching::{limit_matches, LimitedMatches, MatchEngine, MatchResult, ProjectMatch};
use super::provider::{DealDataProvider, MatchAlert, MatchNotifier, ProviderError, ScoreRecord};
use super::scoring::ScoringEngine;
use crate::config::MatchingConfig;

/// Service composing intake, the scoring and matching engines, and the injected data seams.
pub struct DealService<P, N> {
    intake: ProjectIntake,
    provider: Arc<P>,
    notifier: Arc<N>,
    scoring: Arc<ScoringEngine>,
    matching: Arc<MatchEngine>,
    policy: MatchingConfig,
}

impl<P, N> DealService<P, N>
where
    P: DealDataProvider + 'static,
    N: MatchNotifier + 'static,
{
    pub fn new(provider: Arc<P>, notifier: Arc<N>, policy: MatchingConfig) -> Self {
        Self::with_engines(
            provider,
            notifier,
            policy,
            ScoringEngine::default(),
            MatchEngine::default(),
        )
    }

    pub fn with_engines(
        provider: Arc<P>,
        notifier: Arc<N>,
        policy: MatchingConfig,
        scoring: ScoringEngine,
        matching: MatchEngine,
    ) -> Self {
        Self {
            intake: ProjectIntake,
            provider,
            notifier,
            scoring: Arc::new(scoring),
            matching: Arc::new(matching),
            policy,
        }
    }

    pub fn policy(&self) -> MatchingConfig {
        self.policy
    }

    /// Validate an inbound submission and score it.
    pub fn score_submission(
        &self,
        submission: ProjectSubmission,
    ) -> Result<ScoreRecord, DealServiceError> {
        let project = self.intake.project_from_submission(submission)?;
        let score = self.scoring.score(&project)?;
        info!(
            project_id = %project.id.0,
            composite = score.composite,
            tier = score.tier.label(),
            "scored project submission"
        );
        Ok(ScoreRecord::stamp(score))
    }

    /// Score many submissions; invalid ones are reported rather than failing the call.
    pub fn score_batch(&self, submissions: Vec<ProjectSubmission>) -> BatchReport {
        self.score_entries(submissions.into_iter().map(Ok))
    }

    /// Like [`Self::score_batch`], but entries that already failed to decode are carried
    /// through into the report's failures.
    pub fn score_entries<I>(&self, entries: I) -> BatchReport
    where
        I: IntoIterator<Item = BatchEntry>,
    {
        let report = score_entries_with(&self.scoring, entries);
        info!(
            scored = report.scores.len(),
            failed = report.failures.len(),
            "scored project batch"
        );
        report
    }

    /// Score a stored project fetched through the data provider.
    pub fn score_project(&self, project_id: &ProjectId) -> Result<ScoreRecord, DealServiceError> {
        let project = self
            .provider
            .project(project_id)?
            .ok_or(ProviderError::NotFound)?;

        let score = self.scoring.score(&project)?;
        debug!(project_id = %project_id.0, composite = score.composite, "scored stored project");
        Ok(ScoreRecord::stamp(score))
    }

    /// Counterparties for a project after the minimum-score filter and the display cap.
    pub fn matches_for_project(
        &self,
        project_id: &ProjectId,
    ) -> Result<LimitedMatches<MatchResult>, DealServiceError> {
        self.matches_for_project_above(project_id, self.policy.min_score)
    }

    /// [`Self::matches_for_project`] with a caller-chosen minimum score.
    pub fn matches_for_project_above(
        &self,
        project_id: &ProjectId,
        min_score: u32,
    ) -> Result<LimitedMatches<MatchResult>, DealServiceError> {
        let project = self
            .provider
            .project(project_id)?
            .ok_or(ProviderError::NotFound)?;
        project.validate()?;

        let counterparties = self.provider.active_counterparties()?;
        let mut ranked = self.matching.match_counterparties(&project, &counterparties);
        ranked.retain(|candidate| candidate.score >= min_score);

        let limited = limit_matches(ranked, self.policy.display_cap);
        info!(
            project_id = %project_id.0,
            min_score,
            total_found = limited.total_found,
            shown = limited.results.len(),
            "matched counterparties for project"
        );
        Ok(limited)
    }

    /// Projects for a counterparty. Invalid project records are skipped, not fatal.
    pub fn matches_for_counterparty(
        &self,
        counterparty_id: &CounterpartyId,
    ) -> Result<LimitedMatches<ProjectMatch>, DealServiceError> {
        self.matches_for_counterparty_above(counterparty_id, self.policy.min_score)
    }

    /// [`Self::matches_for_counterparty`] with a caller-chosen minimum score.
    pub fn matches_for_counterparty_above(
        &self,
        counterparty_id: &CounterpartyId,
        min_score: u32,
    ) -> Result<LimitedMatches<ProjectMatch>, DealServiceError> {
        let counterparty = self
            .provider
            .counterparty(counterparty_id)?
            .ok_or(ProviderError::NotFound)?;

        let projects: Vec<_> = self
            .provider
            .available_projects()?
            .into_iter()
            .filter(|project| match project.validate() {
                Ok(()) => true,
                Err(violation) => {
                    warn!(project_id = %project.id.0, error = %violation, "skipping invalid project");
                    false
                }
            })
            .collect();

        let mut ranked = self.matching.match_projects(&counterparty, &projects);
        ranked.retain(|candidate| candidate.score >= min_score);

        let limited = limit_matches(ranked, self.policy.display_cap);
        info!(
            counterparty_id = %counterparty_id.0,
            min_score,
            total_found = limited.total_found,
            shown = limited.results.len(),
            "matched projects for counterparty"
        );
        Ok(limited)
    }

    /// Match every available project and notify counterparties about good or better matches
    /// that survive the display cap. One bad project never stops the sweep.
    pub fn run_auto_match(&self) -> Result<AutoMatchSummary, DealServiceError> {
        let projects = self.provider.available_projects()?;
        let counterparties = self.provider.active_counterparties()?;

        let mut summary = AutoMatchSummary {
            processed: projects.len(),
            matches: 0,
            notified: 0,
            notify_failures: 0,
            failures: Vec::new(),
        };

        for project in projects {
            if let Err(violation) = project.validate() {
                warn!(project_id = %project.id.0, error = %violation, "auto-match skipped project");
                summary.failures.push(BatchFailure {
                    project_id: project.id.0.clone(),
                    error: violation.to_string(),
                });
                continue;
            }

            let mut ranked = self.matching.match_counterparties(&project, &counterparties);
            ranked.retain(|candidate| candidate.score >= self.policy.min_score);
            let limited = limit_matches(ranked, self.policy.display_cap);
            summary.matches += limited.results.len();

            for candidate in limited
                .results
                .iter()
                .filter(|candidate| candidate.strength.is_notifiable())
            {
                let mut details = BTreeMap::new();
                details.insert("project_name".to_string(), project.name.clone());
                details.insert("score".to_string(), candidate.score.to_string());
                details.insert("strength".to_string(), candidate.strength.label().to_string());

                let alert = MatchAlert {
                    template: "counterparty_match".to_string(),
                    counterparty_id: candidate.counterparty.id.clone(),
                    project_id: project.id.clone(),
                    details,
                };

                match self.notifier.notify(alert) {
                    Ok(()) => summary.notified += 1,
                    Err(err) => {
                        summary.notify_failures += 1;
                        warn!(
                            project_id = %project.id.0,
                            counterparty_id = %candidate.counterparty.id.0,
                            error = %err,
                            "match notification failed"
                        );
                    }
                }
            }
        }

        info!(
            processed = summary.processed,
            matches = summary.matches,
            notified = summary.notified,
            notify_failures = summary.notify_failures,
            failed = summary.failures.len(),
            "auto-match sweep finished"
        );
        Ok(summary)
    }
}

/// Error raised by the deal service.
#[derive(Debug, thiserror::Error)]
pub enum DealServiceError {
    #[error(transparent)]
    Intake(#[from] IntakeViolation),
    #[error(transparent)]
    Provider(#[from] ProviderError),
}
