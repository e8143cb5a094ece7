use serde::{Deserialize, Serialize};

use super::domain::{
    ComplexityProfile, ImpactProfile, LocationProfile, ManagementStrength, Project, ProjectId,
    ReadinessProfile, SponsorProfile,
};

/// Validation errors raised before a project reaches the scoring engine.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum IntakeViolation {
    #[error("project identifier is required")]
    MissingIdentifier,
    #[error("required field `{field}` is missing")]
    MissingField { field: &'static str },
    #[error("field `{field}` must be a finite number (found {value})")]
    NonFinite { field: &'static str, value: f64 },
}

/// Loosely typed project payload as it arrives from forms, imports, or the HTTP API.
///
/// Only the identifier, region, and the three tract statistics are required. Every other
/// attribute falls back to zero or `false` when omitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectSubmission {
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub location: LocationSubmission,
    #[serde(default)]
    pub impact: ImpactSubmission,
    #[serde(default)]
    pub readiness: ReadinessSubmission,
    #[serde(default)]
    pub sponsor: SponsorSubmission,
    #[serde(default)]
    pub complexity: ComplexitySubmission,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationSubmission {
    pub region: Option<String>,
    pub poverty_rate: Option<f64>,
    pub median_income_ratio: Option<f64>,
    pub unemployment_rate: Option<f64>,
    pub severely_distressed: Option<bool>,
    pub non_metro: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImpactSubmission {
    pub jobs_created: Option<u32>,
    pub percent_low_income_served: Option<f64>,
    pub essential_service: Option<bool>,
    pub catalytic_impact: Option<bool>,
    pub revitalization_area: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReadinessSubmission {
    pub dscr: Option<f64>,
    pub site_control: Option<bool>,
    pub permits_secured: Option<bool>,
    pub funding_gap_percent: Option<f64>,
    pub other_financing_committed: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SponsorSubmission {
    pub years_operating: Option<f64>,
    pub net_assets: Option<f64>,
    pub prior_deals: Option<u32>,
    pub management_strength: Option<ManagementStrength>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComplexitySubmission {
    pub allocator_count: Option<u32>,
    pub state_credit: Option<bool>,
    pub historic_credit: Option<bool>,
    pub brownfield: Option<bool>,
    pub bridge_financing: Option<bool>,
    pub mezzanine_financing: Option<bool>,
    pub intercreditor_agreement: Option<bool>,
}

impl ProjectSubmission {
    /// Best-effort identifier for error reporting, even when the submission is invalid.
    pub fn reference(&self) -> String {
        self.project_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .unwrap_or("unknown")
            .to_string()
    }
}

/// Boundary guard producing strict [`Project`] values from submissions.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProjectIntake;

impl ProjectIntake {
    pub fn project_from_submission(
        &self,
        submission: ProjectSubmission,
    ) -> Result<Project, IntakeViolation> {
        let id = submission
            .project_id
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
            .ok_or(IntakeViolation::MissingIdentifier)?;

        let location = submission.location;
        let region = location
            .region
            .map(|region| region.trim().to_ascii_uppercase())
            .filter(|region| !region.is_empty())
            .ok_or(IntakeViolation::MissingField {
                field: "location.region",
            })?;

        let poverty_rate = required(location.poverty_rate, "location.poverty_rate")?;
        let median_income_ratio =
            required(location.median_income_ratio, "location.median_income_ratio")?;
        let unemployment_rate = required(location.unemployment_rate, "location.unemployment_rate")?;

        let impact = submission.impact;
        let readiness = submission.readiness;
        let sponsor = submission.sponsor;
        let complexity = submission.complexity;

        let project = Project {
            name: submission
                .name
                .map(|name| name.trim().to_string())
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| id.clone()),
            id: ProjectId(id),
            location: LocationProfile {
                region,
                poverty_rate,
                median_income_ratio,
                unemployment_rate,
                severely_distressed: location.severely_distressed.unwrap_or(false),
                non_metro: location.non_metro.unwrap_or(false),
            },
            impact: ImpactProfile {
                jobs_created: impact.jobs_created.unwrap_or(0),
                percent_low_income_served: impact.percent_low_income_served.unwrap_or(0.0),
                essential_service: impact.essential_service.unwrap_or(false),
                catalytic_impact: impact.catalytic_impact.unwrap_or(false),
                revitalization_area: impact.revitalization_area.unwrap_or(false),
            },
            readiness: ReadinessProfile {
                dscr: readiness.dscr.unwrap_or(0.0),
                site_control: readiness.site_control.unwrap_or(false),
                permits_secured: readiness.permits_secured.unwrap_or(false),
                funding_gap_percent: readiness.funding_gap_percent.unwrap_or(0.0),
                other_financing_committed: readiness.other_financing_committed.unwrap_or(false),
            },
            sponsor: SponsorProfile {
                years_operating: sponsor.years_operating.unwrap_or(0.0),
                net_assets: sponsor.net_assets.unwrap_or(0.0),
                prior_deals: sponsor.prior_deals.unwrap_or(0),
                management_strength: sponsor.management_strength.unwrap_or_default(),
            },
            complexity: ComplexityProfile {
                allocator_count: complexity.allocator_count.unwrap_or(0),
                state_credit: complexity.state_credit.unwrap_or(false),
                historic_credit: complexity.historic_credit.unwrap_or(false),
                brownfield: complexity.brownfield.unwrap_or(false),
                bridge_financing: complexity.bridge_financing.unwrap_or(false),
                mezzanine_financing: complexity.mezzanine_financing.unwrap_or(false),
                intercreditor_agreement: complexity.intercreditor_agreement.unwrap_or(false),
            },
        };

        project.validate()?;
        Ok(project)
    }
}

impl Project {
    /// Reject NaN and infinite values so they never propagate into a composite score.
    ///
    /// Negative values are allowed: the distress formula has no lower bound and callers
    /// rely on seeing the raw result.
    pub fn validate(&self) -> Result<(), IntakeViolation> {
        let numbers = [
            ("location.poverty_rate", self.location.poverty_rate),
            ("location.median_income_ratio", self.location.median_income_ratio),
            ("location.unemployment_rate", self.location.unemployment_rate),
            (
                "impact.percent_low_income_served",
                self.impact.percent_low_income_served,
            ),
            ("readiness.dscr", self.readiness.dscr),
            (
                "readiness.funding_gap_percent",
                self.readiness.funding_gap_percent,
            ),
            ("sponsor.years_operating", self.sponsor.years_operating),
            ("sponsor.net_assets", self.sponsor.net_assets),
        ];

        for (field, value) in numbers {
            if !value.is_finite() {
                return Err(IntakeViolation::NonFinite { field, value });
            }
        }

        if self.id.0.trim().is_empty() {
            return Err(IntakeViolation::MissingIdentifier);
        }

        Ok(())
    }
}

fn required(value: Option<f64>, field: &'static str) -> Result<f64, IntakeViolation> {
    value.ok_or(IntakeViolation::MissingField { field })
}
