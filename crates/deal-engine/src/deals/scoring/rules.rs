use super::super::domain::{
    ComplexityProfile, ImpactProfile, LocationProfile, ManagementStrength, ReadinessProfile,
    SponsorProfile,
};

/// Upper bound shared by every sub-score. There is deliberately no shared lower bound.
pub const SUB_SCORE_CEILING: f64 = 100.0;

pub(crate) const SEVERE_DISTRESS_POINTS: f64 = 15.0;
pub(crate) const NON_METRO_POINTS: f64 = 5.0;

pub(crate) const JOB_POINTS_CAP: f64 = 30.0;
pub(crate) const ESSENTIAL_SERVICE_POINTS: f64 = 25.0;
pub(crate) const CATALYTIC_IMPACT_POINTS: f64 = 15.0;
pub(crate) const REVITALIZATION_AREA_POINTS: f64 = 10.0;

pub(crate) const DSCR_POINTS_CAP: f64 = 35.0;
pub(crate) const SITE_CONTROL_POINTS: f64 = 20.0;
pub(crate) const PERMITS_POINTS: f64 = 10.0;
pub(crate) const FUNDING_GAP_BASELINE: f64 = 20.0;
pub(crate) const OTHER_FINANCING_POINTS: f64 = 15.0;

pub(crate) const YEARS_OPERATING_CAP: f64 = 40.0;
pub(crate) const NET_ASSETS_CAP: f64 = 30.0;
pub(crate) const PRIOR_DEAL_POINTS: f64 = 5.0;
pub(crate) const HIGH_MANAGEMENT_POINTS: f64 = 10.0;

pub(crate) const ALLOCATOR_POINTS: f64 = 10.0;
pub(crate) const STATE_CREDIT_POINTS: f64 = 20.0;
pub(crate) const HISTORIC_CREDIT_POINTS: f64 = 25.0;
pub(crate) const BROWNFIELD_POINTS: f64 = 10.0;
pub(crate) const BRIDGE_FINANCING_POINTS: f64 = 20.0;
pub(crate) const MEZZANINE_FINANCING_POINTS: f64 = 15.0;
pub(crate) const INTERCREDITOR_POINTS: f64 = 15.0;

pub(crate) fn job_points(jobs_created: u32) -> f64 {
    (f64::from(jobs_created) / 2.0).min(JOB_POINTS_CAP)
}

pub(crate) fn dscr_points(dscr: f64) -> f64 {
    (dscr * 20.0).min(DSCR_POINTS_CAP)
}

pub(crate) fn funding_gap_points(funding_gap_percent: f64) -> f64 {
    (FUNDING_GAP_BASELINE - funding_gap_percent).max(0.0)
}

/// Economic distress of the project's census tract.
pub fn distress(location: &LocationProfile) -> f64 {
    let mut score = 0.0;
    score += location.poverty_rate * 0.4;
    score += (100.0 - location.median_income_ratio) * 0.2;
    score += location.unemployment_rate * 0.2;
    if location.severely_distressed {
        score += SEVERE_DISTRESS_POINTS;
    }
    if location.non_metro {
        score += NON_METRO_POINTS;
    }
    score.min(SUB_SCORE_CEILING)
}

pub fn impact(impact: &ImpactProfile) -> f64 {
    let mut score = 0.0;
    score += job_points(impact.jobs_created);
    score += impact.percent_low_income_served * 0.2;
    if impact.essential_service {
        score += ESSENTIAL_SERVICE_POINTS;
    }
    if impact.catalytic_impact {
        score += CATALYTIC_IMPACT_POINTS;
    }
    if impact.revitalization_area {
        score += REVITALIZATION_AREA_POINTS;
    }
    score.min(SUB_SCORE_CEILING)
}

pub fn readiness(readiness: &ReadinessProfile) -> f64 {
    let mut score = 0.0;
    score += dscr_points(readiness.dscr);
    if readiness.site_control {
        score += SITE_CONTROL_POINTS;
    }
    if readiness.permits_secured {
        score += PERMITS_POINTS;
    }
    score += funding_gap_points(readiness.funding_gap_percent);
    if readiness.other_financing_committed {
        score += OTHER_FINANCING_POINTS;
    }
    score.min(SUB_SCORE_CEILING)
}

/// Sponsor track record. Prior deals are uncapped until the shared ceiling.
pub fn sponsor(sponsor: &SponsorProfile) -> f64 {
    let mut score = 0.0;
    score += sponsor.years_operating.min(YEARS_OPERATING_CAP);
    score += (sponsor.net_assets / 1_000_000.0).min(NET_ASSETS_CAP);
    score += f64::from(sponsor.prior_deals) * PRIOR_DEAL_POINTS;
    if sponsor.management_strength == ManagementStrength::High {
        score += HIGH_MANAGEMENT_POINTS;
    }
    score.min(SUB_SCORE_CEILING)
}

/// Structural complexity. Higher is worse; the composite subtracts it.
pub fn complexity(complexity: &ComplexityProfile) -> f64 {
    let mut score = f64::from(complexity.allocator_count) * ALLOCATOR_POINTS;
    if complexity.state_credit {
        score += STATE_CREDIT_POINTS;
    }
    if complexity.historic_credit {
        score += HISTORIC_CREDIT_POINTS;
    }
    if complexity.brownfield {
        score += BROWNFIELD_POINTS;
    }
    if complexity.bridge_financing {
        score += BRIDGE_FINANCING_POINTS;
    }
    if complexity.mezzanine_financing {
        score += MEZZANINE_FINANCING_POINTS;
    }
    if complexity.intercreditor_agreement {
        score += INTERCREDITOR_POINTS;
    }
    score.min(SUB_SCORE_CEILING)
}
