use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::config::MatchingConfig;
use crate::deals::domain::{
    ComplexityProfile, Counterparty, CounterpartyId, ImpactProfile, LocationProfile,
    ManagementStrength, Project, ProjectId, ReadinessProfile, SponsorProfile,
};
use crate::deals::intake::{
    ComplexitySubmission, ImpactSubmission, LocationSubmission, ProjectSubmission,
    ReadinessSubmission, SponsorSubmission,
};
use crate::deals::provider::{
    DealDataProvider, MatchAlert, MatchNotifier, NotifyError, ProviderError,
};
use crate::deals::service::DealService;

/// Distress 61, impact 65, readiness 50, sponsor 40, complexity 30.
pub(super) fn anchor_project() -> Project {
    Project {
        id: ProjectId("proj-001".to_string()),
        name: "Riverside Health Clinic".to_string(),
        location: LocationProfile {
            region: "IA".to_string(),
            poverty_rate: 80.0,
            median_income_ratio: 40.0,
            unemployment_rate: 10.0,
            severely_distressed: true,
            non_metro: false,
        },
        impact: ImpactProfile {
            jobs_created: 100,
            percent_low_income_served: 50.0,
            essential_service: true,
            catalytic_impact: false,
            revitalization_area: false,
        },
        readiness: ReadinessProfile {
            dscr: 1.5,
            site_control: true,
            permits_secured: false,
            funding_gap_percent: 20.0,
            other_financing_committed: false,
        },
        sponsor: SponsorProfile {
            years_operating: 10.0,
            net_assets: 5_000_000.0,
            prior_deals: 5,
            management_strength: ManagementStrength::Low,
        },
        complexity: ComplexityProfile {
            allocator_count: 1,
            state_credit: true,
            ..ComplexityProfile::default()
        },
    }
}

/// A lightly distressed Missouri deal with a crowded capital stack and no track record.
pub(super) fn quiet_project() -> Project {
    Project {
        id: ProjectId("proj-002".to_string()),
        name: "Market Street Lofts".to_string(),
        location: LocationProfile {
            region: "MO".to_string(),
            poverty_rate: 10.0,
            median_income_ratio: 110.0,
            unemployment_rate: 4.0,
            severely_distressed: false,
            non_metro: false,
        },
        impact: ImpactProfile::default(),
        readiness: ReadinessProfile::default(),
        sponsor: SponsorProfile::default(),
        complexity: ComplexityProfile {
            allocator_count: 3,
            ..ComplexityProfile::default()
        },
    }
}

pub(super) fn counterparty(
    id: &str,
    regions: &[&str],
    accepts_severe_distress: bool,
    prefers_essential_service: bool,
) -> Counterparty {
    Counterparty {
        id: CounterpartyId(id.to_string()),
        name: format!("{id} Community Fund"),
        service_area: regions.iter().map(|region| region.to_string()).collect::<BTreeSet<_>>(),
        accepts_severe_distress,
        prefers_essential_service,
    }
}

/// Against [`anchor_project`]: cde-a 100, cde-b 75, cde-c 45, cde-d 20, cde-e 75.
pub(super) fn counterparties() -> Vec<Counterparty> {
    vec![
        counterparty("cde-a", &["IA"], true, true),
        counterparty("cde-b", &["IA", "MO"], false, true),
        counterparty("cde-c", &["NE"], true, false),
        counterparty("cde-d", &["TX"], false, false),
        counterparty("cde-e", &["ia"], true, false),
    ]
}

pub(super) fn submission() -> ProjectSubmission {
    ProjectSubmission {
        project_id: Some("proj-001".to_string()),
        name: Some("Riverside Health Clinic".to_string()),
        location: LocationSubmission {
            region: Some("ia".to_string()),
            poverty_rate: Some(80.0),
            median_income_ratio: Some(40.0),
            unemployment_rate: Some(10.0),
            severely_distressed: Some(true),
            non_metro: None,
        },
        impact: ImpactSubmission {
            jobs_created: Some(100),
            percent_low_income_served: Some(50.0),
            essential_service: Some(true),
            ..ImpactSubmission::default()
        },
        readiness: ReadinessSubmission {
            dscr: Some(1.5),
            site_control: Some(true),
            funding_gap_percent: Some(20.0),
            ..ReadinessSubmission::default()
        },
        sponsor: SponsorSubmission {
            years_operating: Some(10.0),
            net_assets: Some(5_000_000.0),
            prior_deals: Some(5),
            management_strength: None,
        },
        complexity: ComplexitySubmission {
            allocator_count: Some(1),
            state_credit: Some(true),
            ..ComplexitySubmission::default()
        },
    }
}

pub(super) fn build_service() -> (
    DealService<MemoryProvider, MemoryNotifier>,
    Arc<MemoryProvider>,
    Arc<MemoryNotifier>,
) {
    let provider = Arc::new(MemoryProvider::new(
        vec![anchor_project(), quiet_project()],
        counterparties(),
    ));
    let notifier = Arc::new(MemoryNotifier::default());
    let service = DealService::new(provider.clone(), notifier.clone(), MatchingConfig::default());
    (service, provider, notifier)
}

#[derive(Default, Clone)]
pub(super) struct MemoryProvider {
    projects: Arc<Mutex<Vec<Project>>>,
    counterparties: Arc<Mutex<Vec<Counterparty>>>,
}

impl MemoryProvider {
    pub(super) fn new(projects: Vec<Project>, counterparties: Vec<Counterparty>) -> Self {
        Self {
            projects: Arc::new(Mutex::new(projects)),
            counterparties: Arc::new(Mutex::new(counterparties)),
        }
    }

    pub(super) fn add_project(&self, project: Project) {
        self.projects
            .lock()
            .expect("provider mutex poisoned")
            .push(project);
    }
}

impl DealDataProvider for MemoryProvider {
    fn project(&self, id: &ProjectId) -> Result<Option<Project>, ProviderError> {
        let guard = self.projects.lock().expect("provider mutex poisoned");
        Ok(guard.iter().find(|project| &project.id == id).cloned())
    }

    fn available_projects(&self) -> Result<Vec<Project>, ProviderError> {
        Ok(self.projects.lock().expect("provider mutex poisoned").clone())
    }

    fn counterparty(&self, id: &CounterpartyId) -> Result<Option<Counterparty>, ProviderError> {
        let guard = self.counterparties.lock().expect("provider mutex poisoned");
        Ok(guard.iter().find(|counterparty| &counterparty.id == id).cloned())
    }

    fn active_counterparties(&self) -> Result<Vec<Counterparty>, ProviderError> {
        Ok(self
            .counterparties
            .lock()
            .expect("provider mutex poisoned")
            .clone())
    }
}

pub(super) struct UnavailableProvider;

impl DealDataProvider for UnavailableProvider {
    fn project(&self, _id: &ProjectId) -> Result<Option<Project>, ProviderError> {
        Err(ProviderError::Unavailable("warehouse offline".to_string()))
    }

    fn available_projects(&self) -> Result<Vec<Project>, ProviderError> {
        Err(ProviderError::Unavailable("warehouse offline".to_string()))
    }

    fn counterparty(&self, _id: &CounterpartyId) -> Result<Option<Counterparty>, ProviderError> {
        Err(ProviderError::Unavailable("warehouse offline".to_string()))
    }

    fn active_counterparties(&self) -> Result<Vec<Counterparty>, ProviderError> {
        Err(ProviderError::Unavailable("warehouse offline".to_string()))
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryNotifier {
    events: Arc<Mutex<Vec<MatchAlert>>>,
}

impl MemoryNotifier {
    pub(super) fn events(&self) -> Vec<MatchAlert> {
        self.events.lock().expect("notifier mutex poisoned").clone()
    }
}

impl MatchNotifier for MemoryNotifier {
    fn notify(&self, alert: MatchAlert) -> Result<(), NotifyError> {
        self.events
            .lock()
            .expect("notifier mutex poisoned")
            .push(alert);
        Ok(())
    }
}

pub(super) struct FailingNotifier;

impl MatchNotifier for FailingNotifier {
    fn notify(&self, _alert: MatchAlert) -> Result<(), NotifyError> {
        Err(NotifyError::Transport("smtp relay refused".to_string()))
    }
}

pub(super) fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
