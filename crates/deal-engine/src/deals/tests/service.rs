use std::sync::Arc;

use super::common::*;

use crate::config::MatchingConfig;
use crate::deals::domain::{CounterpartyId, ProjectId};
use crate::deals::intake::IntakeViolation;
use crate::deals::provider::ProviderError;
use crate::deals::scoring::{DealTier, MODEL_VERSION};
use crate::deals::service::{DealService, DealServiceError};

#[test]
fn score_submission_stamps_model_version() {
    let (service, _, _) = build_service();

    let record = service
        .score_submission(submission())
        .expect("submission scores");

    assert_eq!(record.model_version, MODEL_VERSION);
    assert_eq!(record.score.tier, DealTier::Conditional);
    let view = record.view();
    assert_eq!(view.tier, "Tier 3 – Conditional");
    assert_eq!(view.tier_number, 3);
    assert_eq!(view.reasons.len(), view.reason_codes.len());
}

#[test]
fn score_submission_surfaces_intake_violation() {
    let (service, _, _) = build_service();
    let mut invalid = submission();
    invalid.location.region = None;

    match service.score_submission(invalid) {
        Err(DealServiceError::Intake(IntakeViolation::MissingField { field })) => {
            assert_eq!(field, "location.region")
        }
        other => panic!("expected intake violation, got {other:?}"),
    }
}

#[test]
fn score_project_reads_from_provider() {
    let (service, _, _) = build_service();

    let record = service
        .score_project(&ProjectId("proj-002".to_string()))
        .expect("stored project scores");
    assert_eq!(record.score.project_id.0, "proj-002");
    assert_eq!(record.score.tier, DealTier::Reject);
}

#[test]
fn score_project_reports_missing_record() {
    let (service, _, _) = build_service();

    match service.score_project(&ProjectId("proj-404".to_string())) {
        Err(DealServiceError::Provider(ProviderError::NotFound)) => {}
        other => panic!("expected not found, got {other:?}"),
    }
}

#[test]
fn score_project_rejects_corrupt_stored_record() {
    let (service, provider, _) = build_service();
    let mut corrupt = anchor_project();
    corrupt.id = ProjectId("proj-nan".to_string());
    corrupt.location.poverty_rate = f64::NAN;
    provider.add_project(corrupt);

    match service.score_project(&ProjectId("proj-nan".to_string())) {
        Err(DealServiceError::Intake(IntakeViolation::NonFinite { .. })) => {}
        other => panic!("expected non-finite rejection, got {other:?}"),
    }
}

#[test]
fn project_matches_filter_below_minimum_then_cap() {
    let (service, _, _) = build_service();

    let limited = service
        .matches_for_project(&ProjectId("proj-001".to_string()))
        .expect("matches resolve");

    // cde-d scores 20 and never counts toward total_found.
    assert_eq!(limited.total_found, 4);
    assert_eq!(limited.cap, 3);
    let ids: Vec<&str> = limited
        .results
        .iter()
        .map(|result| result.counterparty.id.0.as_str())
        .collect();
    assert_eq!(ids, vec!["cde-a", "cde-b", "cde-e"]);
    assert!(limited.was_truncated());
}

#[test]
fn policy_controls_cap_and_floor() {
    let provider = Arc::new(MemoryProvider::new(vec![anchor_project()], counterparties()));
    let notifier = Arc::new(MemoryNotifier::default());
    let service = DealService::new(
        provider,
        notifier,
        MatchingConfig {
            display_cap: 10,
            min_score: 0,
        },
    );

    let limited = service
        .matches_for_project(&ProjectId("proj-001".to_string()))
        .expect("matches resolve");
    assert_eq!(limited.results.len(), 5);
    assert_eq!(limited.total_found, 5);
    assert_eq!(service.policy().display_cap, 10);
}

#[test]
fn counterparty_matches_skip_low_scores() {
    let (service, _, _) = build_service();

    let limited = service
        .matches_for_counterparty(&CounterpartyId("cde-b".to_string()))
        .expect("matches resolve");

    assert_eq!(limited.total_found, 1);
    assert_eq!(limited.results[0].project_id.0, "proj-001");
    assert_eq!(limited.results[0].score, 75);
}

#[test]
fn counterparty_matches_skip_invalid_projects() {
    let (service, provider, _) = build_service();
    let mut corrupt = anchor_project();
    corrupt.id = ProjectId("proj-nan".to_string());
    corrupt.readiness.dscr = f64::INFINITY;
    provider.add_project(corrupt);

    let limited = service
        .matches_for_counterparty(&CounterpartyId("cde-a".to_string()))
        .expect("matches resolve");

    assert!(limited
        .results
        .iter()
        .all(|result| result.project_id.0 != "proj-nan"));
    assert_eq!(limited.total_found, 1);
}

#[test]
fn unknown_counterparty_is_not_found() {
    let (service, _, _) = build_service();

    match service.matches_for_counterparty(&CounterpartyId("cde-z".to_string())) {
        Err(DealServiceError::Provider(ProviderError::NotFound)) => {}
        other => panic!("expected not found, got {other:?}"),
    }
}

#[test]
fn provider_outage_propagates() {
    let service = DealService::new(
        Arc::new(UnavailableProvider),
        Arc::new(MemoryNotifier::default()),
        MatchingConfig::default(),
    );

    match service.matches_for_project(&ProjectId("proj-001".to_string())) {
        Err(DealServiceError::Provider(ProviderError::Unavailable(reason))) => {
            assert!(reason.contains("offline"))
        }
        other => panic!("expected provider outage, got {other:?}"),
    }
    assert!(service.run_auto_match().is_err());
}

#[test]
fn auto_match_notifies_strong_matches_within_cap() {
    let (service, _, notifier) = build_service();

    let summary = service.run_auto_match().expect("sweep completes");

    assert_eq!(summary.processed, 2);
    assert_eq!(summary.matches, 3);
    assert_eq!(summary.notified, 3);
    assert_eq!(summary.notify_failures, 0);
    assert!(summary.failures.is_empty());

    let events = notifier.events();
    let recipients: Vec<&str> = events
        .iter()
        .map(|alert| alert.counterparty_id.0.as_str())
        .collect();
    assert_eq!(recipients, vec!["cde-a", "cde-b", "cde-e"]);
    assert!(events.iter().all(|alert| alert.template == "counterparty_match"));
    assert_eq!(
        events[0].details.get("strength").map(String::as_str),
        Some("excellent")
    );
}

#[test]
fn auto_match_isolates_invalid_projects() {
    let (service, provider, notifier) = build_service();
    let mut corrupt = anchor_project();
    corrupt.id = ProjectId("proj-nan".to_string());
    corrupt.location.unemployment_rate = f64::NAN;
    provider.add_project(corrupt);

    let summary = service.run_auto_match().expect("sweep completes");

    assert_eq!(summary.processed, 3);
    assert_eq!(summary.failures.len(), 1);
    assert_eq!(summary.failures[0].project_id, "proj-nan");
    assert_eq!(notifier.events().len(), 3);
}

#[test]
fn notification_failures_do_not_abort_sweep() {
    let provider = Arc::new(MemoryProvider::new(
        vec![anchor_project(), quiet_project()],
        counterparties(),
    ));
    let service = DealService::new(
        provider,
        Arc::new(FailingNotifier),
        MatchingConfig::default(),
    );

    let summary = service.run_auto_match().expect("sweep completes");
    assert_eq!(summary.matches, 3);
    assert_eq!(summary.notified, 0);
    assert_eq!(summary.notify_failures, 3);
}

#[test]
fn counterparty_matches_accept_min_score_override() {
    let (service, _, _) = build_service();
    let counterparty = CounterpartyId("cde-b".to_string());

    let strict = service
        .matches_for_counterparty_above(&counterparty, 80)
        .expect("matching succeeds");
    assert_eq!(strict.total_found, 0);

    let open = service
        .matches_for_counterparty_above(&counterparty, 0)
        .expect("matching succeeds");
    assert_eq!(open.total_found, 2);
    assert_eq!(open.results[0].project_id.0, "proj-001");
}

#[test]
fn batch_scoring_goes_through_service() {
    let (service, _, _) = build_service();
    let mut broken = submission();
    broken.project_id = None;

    let report = service.score_batch(vec![submission(), broken]);
    assert_eq!(report.scores.len(), 1);
    assert_eq!(report.failures.len(), 1);
}
