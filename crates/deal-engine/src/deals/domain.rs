use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Identifier wrapper for projects seeking allocation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProjectId(pub String);

/// Identifier wrapper for capital allocators (CDEs) that can be matched to a project.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CounterpartyId(pub String);

/// Validated project snapshot consumed by the scoring and matching engines.
///
/// Instances should come out of [`ProjectIntake`](super::intake::ProjectIntake) or pass
/// [`Project::validate`] before scoring; the engines themselves never re-check inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    pub location: LocationProfile,
    pub impact: ImpactProfile,
    pub readiness: ReadinessProfile,
    pub sponsor: SponsorProfile,
    pub complexity: ComplexityProfile,
}

/// Census-tract distress indicators for the project site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationProfile {
    /// Two-letter state code, matched against counterparty service areas.
    pub region: String,
    pub poverty_rate: f64,
    pub median_income_ratio: f64,
    pub unemployment_rate: f64,
    pub severely_distressed: bool,
    pub non_metro: bool,
}

/// Community outcomes the project commits to.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ImpactProfile {
    pub jobs_created: u32,
    pub percent_low_income_served: f64,
    pub essential_service: bool,
    pub catalytic_impact: bool,
    pub revitalization_area: bool,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ReadinessProfile {
    pub dscr: f64,
    pub site_control: bool,
    pub permits_secured: bool,
    pub funding_gap_percent: f64,
    pub other_financing_committed: bool,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SponsorProfile {
    pub years_operating: f64,
    pub net_assets: f64,
    pub prior_deals: u32,
    pub management_strength: ManagementStrength,
}

/// Capital stack features that make a closing harder to assemble.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ComplexityProfile {
    pub allocator_count: u32,
    pub state_credit: bool,
    pub historic_credit: bool,
    pub brownfield: bool,
    pub bridge_financing: bool,
    pub mezzanine_financing: bool,
    pub intercreditor_agreement: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ManagementStrength {
    #[default]
    Low,
    Medium,
    High,
}

impl ManagementStrength {
    pub const fn label(self) -> &'static str {
        match self {
            ManagementStrength::Low => "Low",
            ManagementStrength::Medium => "Medium",
            ManagementStrength::High => "High",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "low" => Some(Self::Low),
            "medium" | "med" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }
}

/// Coverage criteria a counterparty publishes for deal flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counterparty {
    pub id: CounterpartyId,
    pub name: String,
    pub service_area: BTreeSet<String>,
    pub accepts_severe_distress: bool,
    pub prefers_essential_service: bool,
}

impl Counterparty {
    pub fn serves(&self, region: &str) -> bool {
        self.service_area
            .iter()
            .any(|area| area.eq_ignore_ascii_case(region.trim()))
    }
}
