use deal_engine::deals::{
    ComplexityProfile, Counterparty, CounterpartyId, DealDataProvider, ImpactProfile,
    LocationProfile, ManagementStrength, MatchAlert, MatchNotifier, NotifyError, Project,
    ProjectId, ProjectIntake, ProviderError, ReadinessProfile, SponsorProfile,
};
use deal_engine::error::AppError;
use deal_engine::import::ProjectCsvImporter;
use metrics_exporter_prometheus::PrometheusHandle;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use tracing::{info, warn};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Process-local deal book used by the service until a warehouse-backed provider is wired in.
#[derive(Default, Clone)]
pub(crate) struct InMemoryDealProvider {
    projects: Arc<Mutex<Vec<Project>>>,
    counterparties: Arc<Mutex<Vec<Counterparty>>>,
}

impl InMemoryDealProvider {
    pub(crate) fn new(projects: Vec<Project>, counterparties: Vec<Counterparty>) -> Self {
        Self {
            projects: Arc::new(Mutex::new(projects)),
            counterparties: Arc::new(Mutex::new(counterparties)),
        }
    }
}

impl DealDataProvider for InMemoryDealProvider {
    fn project(&self, id: &ProjectId) -> Result<Option<Project>, ProviderError> {
        let guard = self.projects.lock().map_err(|_| poisoned())?;
        Ok(guard.iter().find(|project| &project.id == id).cloned())
    }

    fn available_projects(&self) -> Result<Vec<Project>, ProviderError> {
        let guard = self.projects.lock().map_err(|_| poisoned())?;
        Ok(guard.clone())
    }

    fn counterparty(&self, id: &CounterpartyId) -> Result<Option<Counterparty>, ProviderError> {
        let guard = self.counterparties.lock().map_err(|_| poisoned())?;
        Ok(guard.iter().find(|counterparty| &counterparty.id == id).cloned())
    }

    fn active_counterparties(&self) -> Result<Vec<Counterparty>, ProviderError> {
        let guard = self.counterparties.lock().map_err(|_| poisoned())?;
        Ok(guard.clone())
    }
}

fn poisoned() -> ProviderError {
    ProviderError::Unavailable("deal book lock poisoned".to_string())
}

/// Records match alerts and writes each one to the log.
#[derive(Default, Clone)]
pub(crate) struct LoggingMatchNotifier {
    events: Arc<Mutex<Vec<MatchAlert>>>,
}

impl MatchNotifier for LoggingMatchNotifier {
    fn notify(&self, alert: MatchAlert) -> Result<(), NotifyError> {
        info!(
            template = %alert.template,
            counterparty_id = %alert.counterparty_id.0,
            project_id = %alert.project_id.0,
            "match alert queued"
        );
        let mut guard = self
            .events
            .lock()
            .map_err(|_| NotifyError::Transport("alert log lock poisoned".to_string()))?;
        guard.push(alert);
        Ok(())
    }
}

impl LoggingMatchNotifier {
    pub(crate) fn events(&self) -> Vec<MatchAlert> {
        self.events
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

/// Load a pipeline export, keeping the rows that are readable and pass intake.
pub(crate) fn load_projects(path: &Path) -> Result<Vec<Project>, AppError> {
    let import = ProjectCsvImporter::from_path(path)?;
    for rejected in &import.rejected {
        warn!(error = %rejected, "skipping unreadable project row");
    }

    let intake = ProjectIntake;
    let mut projects = Vec::with_capacity(import.submissions.len());

    for submission in import.submissions {
        let reference = submission.reference();
        match intake.project_from_submission(submission) {
            Ok(project) => projects.push(project),
            Err(violation) => {
                warn!(project_id = %reference, error = %violation, "skipping project row")
            }
        }
    }

    info!(path = %path.display(), loaded = projects.len(), "loaded project pipeline");
    Ok(projects)
}

pub(crate) fn sample_projects() -> Vec<Project> {
    vec![
        Project {
            id: ProjectId("IA-2031".to_string()),
            name: "Riverside Community Health Center".to_string(),
            location: LocationProfile {
                region: "IA".to_string(),
                poverty_rate: 45.0,
                median_income_ratio: 48.0,
                unemployment_rate: 14.0,
                severely_distressed: true,
                non_metro: false,
            },
            impact: ImpactProfile {
                jobs_created: 85,
                percent_low_income_served: 70.0,
                essential_service: true,
                catalytic_impact: true,
                revitalization_area: false,
            },
            readiness: ReadinessProfile {
                dscr: 1.45,
                site_control: true,
                permits_secured: true,
                funding_gap_percent: 8.0,
                other_financing_committed: true,
            },
            sponsor: SponsorProfile {
                years_operating: 22.0,
                net_assets: 14_500_000.0,
                prior_deals: 4,
                management_strength: ManagementStrength::High,
            },
            complexity: ComplexityProfile {
                allocator_count: 1,
                ..ComplexityProfile::default()
            },
        },
        Project {
            id: ProjectId("MO-1187".to_string()),
            name: "Ozark Fresh Food Hub".to_string(),
            location: LocationProfile {
                region: "MO".to_string(),
                poverty_rate: 27.0,
                median_income_ratio: 68.0,
                unemployment_rate: 8.2,
                severely_distressed: false,
                non_metro: true,
            },
            impact: ImpactProfile {
                jobs_created: 40,
                percent_low_income_served: 55.0,
                essential_service: true,
                catalytic_impact: false,
                revitalization_area: true,
            },
            readiness: ReadinessProfile {
                dscr: 1.2,
                site_control: true,
                permits_secured: false,
                funding_gap_percent: 15.0,
                other_financing_committed: false,
            },
            sponsor: SponsorProfile {
                years_operating: 6.0,
                net_assets: 2_200_000.0,
                prior_deals: 1,
                management_strength: ManagementStrength::Medium,
            },
            complexity: ComplexityProfile {
                allocator_count: 2,
                state_credit: true,
                bridge_financing: true,
                ..ComplexityProfile::default()
            },
        },
        Project {
            id: ProjectId("NE-0442".to_string()),
            name: "Union Depot Historic Rehab".to_string(),
            location: LocationProfile {
                region: "NE".to_string(),
                poverty_rate: 21.0,
                median_income_ratio: 78.0,
                unemployment_rate: 6.1,
                severely_distressed: false,
                non_metro: false,
            },
            impact: ImpactProfile {
                jobs_created: 120,
                percent_low_income_served: 30.0,
                essential_service: false,
                catalytic_impact: true,
                revitalization_area: true,
            },
            readiness: ReadinessProfile {
                dscr: 1.1,
                site_control: false,
                permits_secured: false,
                funding_gap_percent: 28.0,
                other_financing_committed: false,
            },
            sponsor: SponsorProfile {
                years_operating: 3.0,
                net_assets: 900_000.0,
                prior_deals: 0,
                management_strength: ManagementStrength::Low,
            },
            complexity: ComplexityProfile {
                allocator_count: 3,
                state_credit: true,
                historic_credit: true,
                brownfield: true,
                bridge_financing: false,
                mezzanine_financing: true,
                intercreditor_agreement: true,
            },
        },
    ]
}

pub(crate) fn sample_counterparties() -> Vec<Counterparty> {
    let entry = |id: &str, name: &str, regions: &[&str], severe: bool, essential: bool| {
        Counterparty {
            id: CounterpartyId(id.to_string()),
            name: name.to_string(),
            service_area: regions.iter().map(|region| region.to_string()).collect(),
            accepts_severe_distress: severe,
            prefers_essential_service: essential,
        }
    };

    vec![
        entry("cde-heartland", "Heartland Community Capital", &["IA", "NE", "MO"], true, true),
        entry("cde-prairie", "Prairie Impact Fund", &["IA", "MN"], false, true),
        entry("cde-gateway", "Gateway Development Partners", &["MO", "KS"], true, false),
        entry("cde-platte", "Platte River CDE", &["NE"], false, false),
        entry("cde-national", "National Rural Lending Alliance", &["TX", "OK", "AR"], true, true),
    ]
}
