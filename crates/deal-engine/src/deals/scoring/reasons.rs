use serde::{Deserialize, Serialize};

use super::super::domain::{ManagementStrength, Project};
use super::rules::{dscr_points, funding_gap_points, job_points, DSCR_POINTS_CAP, JOB_POINTS_CAP};

/// Scoring dimension a reason code belongs to, in reporting order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreDimension {
    Distress,
    Impact,
    Readiness,
    Sponsor,
    Complexity,
}

/// Justification for a sub-score contribution. Variant order is reporting order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReasonCode {
    SevereDistress,
    NonMetro,
    JobCreationCap,
    EssentialService,
    CatalyticImpact,
    RevitalizationArea,
    StrongDebtCoverage,
    SiteControl,
    PermitsSecured,
    FundingGapManageable,
    OtherFinancingCommitted,
    PriorDealExperience,
    StrongManagement,
    CapitalAllocatorParties,
    StateCreditStack,
    HistoricCreditStack,
    Brownfield,
    BridgeFinancing,
    MezzanineFinancing,
    IntercreditorAgreement,
}

impl ReasonCode {
    pub const fn dimension(self) -> ScoreDimension {
        use ReasonCode::*;
        match self {
            SevereDistress | NonMetro => ScoreDimension::Distress,
            JobCreationCap | EssentialService | CatalyticImpact | RevitalizationArea => {
                ScoreDimension::Impact
            }
            StrongDebtCoverage
            | SiteControl
            | PermitsSecured
            | FundingGapManageable
            | OtherFinancingCommitted => ScoreDimension::Readiness,
            PriorDealExperience | StrongManagement => ScoreDimension::Sponsor,
            CapitalAllocatorParties
            | StateCreditStack
            | HistoricCreditStack
            | Brownfield
            | BridgeFinancing
            | MezzanineFinancing
            | IntercreditorAgreement => ScoreDimension::Complexity,
        }
    }

    pub const fn label(self) -> &'static str {
        use ReasonCode::*;
        match self {
            SevereDistress => "Located in a severely distressed census tract",
            NonMetro => "Non-metropolitan location",
            JobCreationCap => "Job creation at maximum credit",
            EssentialService => "Provides an essential community service",
            CatalyticImpact => "Catalytic impact on surrounding area",
            RevitalizationArea => "Within a designated revitalization area",
            StrongDebtCoverage => "Debt service coverage at maximum credit",
            SiteControl => "Site control secured",
            PermitsSecured => "Permits secured",
            FundingGapManageable => "Funding gap below 20%",
            OtherFinancingCommitted => "Other financing committed",
            PriorDealExperience => "Sponsor has prior tax-credit deals",
            StrongManagement => "High management strength",
            CapitalAllocatorParties => "Capital allocator parties in structure",
            StateCreditStack => "Stacks state tax credits",
            HistoricCreditStack => "Stacks historic tax credits",
            Brownfield => "Brownfield remediation",
            BridgeFinancing => "Requires bridge financing",
            MezzanineFinancing => "Requires mezzanine financing",
            IntercreditorAgreement => "Requires intercreditor agreements",
        }
    }
}

/// Derive reason codes, grouped distress, impact, readiness, sponsor, then complexity.
///
/// Each condition mirrors a non-zero contribution in [`super::rules`].
pub(crate) fn reasons_for(project: &Project) -> Vec<ReasonCode> {
    let location = &project.location;
    let impact = &project.impact;
    let readiness = &project.readiness;
    let sponsor = &project.sponsor;
    let complexity = &project.complexity;

    let checks = [
        (location.severely_distressed, ReasonCode::SevereDistress),
        (location.non_metro, ReasonCode::NonMetro),
        (
            job_points(impact.jobs_created) >= JOB_POINTS_CAP,
            ReasonCode::JobCreationCap,
        ),
        (impact.essential_service, ReasonCode::EssentialService),
        (impact.catalytic_impact, ReasonCode::CatalyticImpact),
        (impact.revitalization_area, ReasonCode::RevitalizationArea),
        (
            dscr_points(readiness.dscr) >= DSCR_POINTS_CAP,
            ReasonCode::StrongDebtCoverage,
        ),
        (readiness.site_control, ReasonCode::SiteControl),
        (readiness.permits_secured, ReasonCode::PermitsSecured),
        (
            funding_gap_points(readiness.funding_gap_percent) > 0.0,
            ReasonCode::FundingGapManageable,
        ),
        (
            readiness.other_financing_committed,
            ReasonCode::OtherFinancingCommitted,
        ),
        (sponsor.prior_deals > 0, ReasonCode::PriorDealExperience),
        (
            sponsor.management_strength == ManagementStrength::High,
            ReasonCode::StrongManagement,
        ),
        (
            complexity.allocator_count > 0,
            ReasonCode::CapitalAllocatorParties,
        ),
        (complexity.state_credit, ReasonCode::StateCreditStack),
        (complexity.historic_credit, ReasonCode::HistoricCreditStack),
        (complexity.brownfield, ReasonCode::Brownfield),
        (complexity.bridge_financing, ReasonCode::BridgeFinancing),
        (complexity.mezzanine_financing, ReasonCode::MezzanineFinancing),
        (
            complexity.intercreditor_agreement,
            ReasonCode::IntercreditorAgreement,
        ),
    ];

    checks
        .into_iter()
        .filter_map(|(applies, code)| applies.then_some(code))
        .collect()
}
