//! End-to-end scenarios for scoring, matching, and alerting through the public API.
//!
//! Projects arrive as CSV rows, pass intake, get stored behind a provider, and are then scored
//! and matched through the service facade and the HTTP router.

mod common {
    use std::collections::BTreeSet;
    use std::sync::{Arc, Mutex};

    use deal_engine::config::MatchingConfig;
    use deal_engine::deals::{
        Counterparty, CounterpartyId, DealDataProvider, DealService, MatchAlert, MatchNotifier,
        NotifyError, Project, ProjectId, ProjectIntake, ProviderError,
    };
    use deal_engine::import::ProjectCsvImporter;

    pub(super) const PIPELINE: &str = "\
Project ID,Project Name,State,Poverty Rate,Median Income Ratio,Unemployment Rate,Severely Distressed,Jobs Created,Percent Low Income Served,Essential Service,DSCR,Site Control,Funding Gap Percent,Years Operating,Net Assets,Prior Deals,Allocator Count,State Credit
KS-100,Wichita Clinic,KS,80,40,10,yes,100,50,yes,1.5,yes,20,10,5000000,5,1,yes
KS-200,Topeka Grocery,KS,12,95,5,no,10,10,no,1.0,no,35,2,100000,0,2,no
KS-300,Broken Row,KS,abc,80,5,no,,,,,,,,,,,
";

    pub(super) fn lenders() -> Vec<Counterparty> {
        let entry = |id: &str, regions: &[&str], severe: bool, essential: bool| Counterparty {
            id: CounterpartyId(id.to_string()),
            name: format!("{id} Fund"),
            service_area: regions
                .iter()
                .map(|region| region.to_string())
                .collect::<BTreeSet<_>>(),
            accepts_severe_distress: severe,
            prefers_essential_service: essential,
        };

        vec![
            entry("cde-flint-hills", &["KS"], true, true),
            entry("cde-sunflower", &["KS", "MO"], false, true),
            entry("cde-high-plains", &["KS", "CO"], true, false),
            entry("cde-rockies", &["CO"], true, true),
        ]
    }

    pub(super) fn projects_from(csv: &str) -> Vec<Project> {
        ProjectCsvImporter::from_reader(csv.as_bytes())
            .expect("csv parses")
            .submissions
            .into_iter()
            .filter_map(|submission| ProjectIntake.project_from_submission(submission).ok())
            .collect()
    }

    #[derive(Default)]
    pub(super) struct Book {
        projects: Vec<Project>,
        counterparties: Vec<Counterparty>,
    }

    impl Book {
        pub(super) fn new(projects: Vec<Project>, counterparties: Vec<Counterparty>) -> Self {
            Self {
                projects,
                counterparties,
            }
        }
    }

    impl DealDataProvider for Book {
        fn project(&self, id: &ProjectId) -> Result<Option<Project>, ProviderError> {
            Ok(self.projects.iter().find(|p| &p.id == id).cloned())
        }

        fn available_projects(&self) -> Result<Vec<Project>, ProviderError> {
            Ok(self.projects.clone())
        }

        fn counterparty(&self, id: &CounterpartyId) -> Result<Option<Counterparty>, ProviderError> {
            Ok(self.counterparties.iter().find(|c| &c.id == id).cloned())
        }

        fn active_counterparties(&self) -> Result<Vec<Counterparty>, ProviderError> {
            Ok(self.counterparties.clone())
        }
    }

    #[derive(Default)]
    pub(super) struct Outbox {
        sent: Mutex<Vec<MatchAlert>>,
    }

    impl Outbox {
        pub(super) fn sent(&self) -> Vec<MatchAlert> {
            self.sent.lock().expect("outbox mutex poisoned").clone()
        }
    }

    impl MatchNotifier for Outbox {
        fn notify(&self, alert: MatchAlert) -> Result<(), NotifyError> {
            self.sent.lock().expect("outbox mutex poisoned").push(alert);
            Ok(())
        }
    }

    pub(super) fn service() -> (Arc<DealService<Book, Outbox>>, Arc<Outbox>) {
        let book = Arc::new(Book::new(projects_from(PIPELINE), lenders()));
        let outbox = Arc::new(Outbox::default());
        let service = DealService::new(book, outbox.clone(), MatchingConfig::default());
        (Arc::new(service), outbox)
    }
}

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use common::*;
use deal_engine::deals::{
    deal_router, limit_matches, match_counterparties, score, score_entries, DealTier, ProjectId,
    ReasonCode,
};
use deal_engine::import::ProjectCsvImporter;
use serde_json::Value;
use tower::ServiceExt;

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("json payload")
}

#[test]
fn unreadable_cells_reject_only_their_row() {
    let import = ProjectCsvImporter::from_reader(PIPELINE.as_bytes()).expect("csv parses");

    assert_eq!(import.submissions.len(), 2);
    assert_eq!(import.rejected.len(), 1);
    assert_eq!(import.rejected[0].line, 4);
    assert_eq!(import.rejected[0].column, "Poverty Rate");
    assert_eq!(import.rejected[0].project_id.as_deref(), Some("KS-300"));
}

#[test]
fn pipeline_batch_reports_rejected_rows_beside_scores() {
    let import = ProjectCsvImporter::from_reader(PIPELINE.as_bytes()).expect("csv parses");

    let report = score_entries(import.into_entries());

    assert_eq!(report.processed(), 3);
    let scored: Vec<&str> = report
        .scores
        .iter()
        .map(|score| score.project_id.0.as_str())
        .collect();
    assert_eq!(scored, vec!["KS-100", "KS-200"]);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].project_id, "KS-300");
    assert!(report.failures[0].error.contains("Poverty Rate"));
}

#[test]
fn imported_clinic_scores_as_conditional() {
    let projects = projects_from(PIPELINE);
    assert_eq!(projects.len(), 2);

    let clinic = score(&projects[0]).expect("valid project");
    assert!((clinic.composite - 47.55).abs() < 1e-9);
    assert_eq!(clinic.tier, DealTier::Conditional);
    assert_eq!(clinic.reason_codes.first(), Some(&ReasonCode::SevereDistress));

    let grocery = score(&projects[1]).expect("valid project");
    assert_eq!(grocery.tier, DealTier::Reject);
}

#[test]
fn library_matching_and_limiter_compose() {
    let projects = projects_from(PIPELINE);
    let ranked = match_counterparties(&projects[0], &lenders());

    let scores: Vec<u32> = ranked.iter().map(|m| m.score).collect();
    assert_eq!(scores, vec![100, 75, 75, 70]);

    let limited = limit_matches(ranked, 3);
    assert_eq!(limited.total_found, 4);
    let ids: Vec<&str> = limited
        .results
        .iter()
        .map(|m| m.counterparty.id.0.as_str())
        .collect();
    assert_eq!(ids, vec!["cde-flint-hills", "cde-sunflower", "cde-high-plains"]);
}

#[test]
fn auto_match_alerts_the_capped_lenders() {
    let (service, outbox) = service();

    let summary = service.run_auto_match().expect("sweep completes");

    assert_eq!(summary.processed, 2);
    assert_eq!(summary.notified, 3);
    assert_eq!(summary.notify_failures, 0);
    let recipients: Vec<String> = outbox
        .sent()
        .into_iter()
        .map(|alert| alert.counterparty_id.0)
        .collect();
    assert_eq!(
        recipients,
        vec!["cde-flint-hills", "cde-sunflower", "cde-high-plains"]
    );
    assert!(outbox
        .sent()
        .iter()
        .all(|alert| alert.project_id == ProjectId("KS-100".to_string())));
}

#[tokio::test]
async fn router_scores_and_matches_stored_projects() {
    let (service, _) = service();
    let router = deal_router(service);

    let response = router
        .clone()
        .oneshot(
            Request::get("/api/v1/projects/KS-100/score")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = json_body(response).await;
    assert_eq!(payload["tier"], "Tier 3 – Conditional");
    assert_eq!(payload["eligibility"]["qualified_census_tract"], true);

    let response = router
        .oneshot(
            Request::post("/api/v1/matching")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"counterparty_id":"cde-sunflower"}"#))
                .expect("request"),
        )
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = json_body(response).await;
    assert_eq!(payload["total_found"], 1);
    assert_eq!(payload["matches"][0]["project_id"], "KS-100");
}

#[tokio::test]
async fn router_reports_unknown_projects() {
    let (service, _) = service();

    let response = deal_router(service)
        .oneshot(
            Request::post("/api/v1/matching")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"project_id":"KS-999"}"#))
                .expect("request"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
