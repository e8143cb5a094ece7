use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use super::intake::{ProjectIntake, ProjectSubmission};
use super::provider::{ScoreRecord, ScoreView};
use super::scoring::{DealScore, ScoringEngine};

/// One record that could not be processed, reported without aborting the batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchFailure {
    pub project_id: String,
    pub error: String,
}

/// A batch member: a decoded submission, or the failure recorded while reading it.
pub type BatchEntry = Result<ProjectSubmission, BatchFailure>;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchReport {
    pub scores: Vec<DealScore>,
    pub failures: Vec<BatchFailure>,
}

impl BatchReport {
    pub fn processed(&self) -> usize {
        self.scores.len() + self.failures.len()
    }

    /// Stamp every score the same way a single-project response is stamped.
    pub fn into_view(self) -> BatchView {
        BatchView {
            processed: self.processed(),
            scores: self
                .scores
                .into_iter()
                .map(|score| ScoreRecord::stamp(score).view())
                .collect(),
            failures: self.failures,
        }
    }
}

/// JSON shape of a scored batch.
#[derive(Debug, Clone, Serialize)]
pub struct BatchView {
    pub processed: usize,
    pub scores: Vec<ScoreView>,
    pub failures: Vec<BatchFailure>,
}

/// Counts from an auto-match sweep over every available project.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AutoMatchSummary {
    pub processed: usize,
    pub matches: usize,
    pub notified: usize,
    pub notify_failures: usize,
    pub failures: Vec<BatchFailure>,
}

/// Decode one raw batch member. A payload that does not fit the submission shape becomes a
/// failure carrying whatever `project_id` string it had.
pub fn decode_submission(value: Value) -> BatchEntry {
    let reference = value
        .get("project_id")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .unwrap_or("unknown")
        .to_string();

    serde_json::from_value(value).map_err(|err| BatchFailure {
        project_id: reference,
        error: format!("malformed project payload: {err}"),
    })
}

/// Validate and score each entry independently, in input order.
pub fn score_entries_with<I>(engine: &ScoringEngine, entries: I) -> BatchReport
where
    I: IntoIterator<Item = BatchEntry>,
{
    let intake = ProjectIntake;
    let mut scores = Vec::new();
    let mut failures = Vec::new();

    for entry in entries {
        let submission = match entry {
            Ok(submission) => submission,
            Err(failure) => {
                warn!(
                    project_id = %failure.project_id,
                    error = %failure.error,
                    "skipping unreadable project in batch"
                );
                failures.push(failure);
                continue;
            }
        };

        let reference = submission.reference();
        match intake
            .project_from_submission(submission)
            .and_then(|project| engine.score(&project))
        {
            Ok(score) => scores.push(score),
            Err(violation) => {
                warn!(
                    project_id = %reference,
                    error = %violation,
                    "skipping invalid project in batch"
                );
                failures.push(BatchFailure {
                    project_id: reference,
                    error: violation.to_string(),
                });
            }
        }
    }

    BatchReport { scores, failures }
}

pub fn score_batch_with(
    engine: &ScoringEngine,
    submissions: Vec<ProjectSubmission>,
) -> BatchReport {
    score_entries_with(engine, submissions.into_iter().map(Ok))
}

pub fn score_batch(submissions: Vec<ProjectSubmission>) -> BatchReport {
    score_batch_with(&ScoringEngine::default(), submissions)
}

pub fn score_entries<I>(entries: I) -> BatchReport
where
    I: IntoIterator<Item = BatchEntry>,
{
    score_entries_with(&ScoringEngine::default(), entries)
}
