use serde::{Deserialize, Serialize};

use super::super::domain::{Counterparty, Project};

/// Point values for each matching rule. The standard table sums to exactly 100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchPoints {
    pub service_area: u32,
    pub severe_distress: u32,
    pub essential_service: u32,
    pub single_allocator: u32,
    pub sponsor_track_record: u32,
}

impl MatchPoints {
    pub const STANDARD: Self = Self {
        service_area: 30,
        severe_distress: 25,
        essential_service: 25,
        single_allocator: 10,
        sponsor_track_record: 10,
    };

    pub const fn ceiling(&self) -> u32 {
        self.service_area
            + self.severe_distress
            + self.essential_service
            + self.single_allocator
            + self.sponsor_track_record
    }
}

impl Default for MatchPoints {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// Rule that fired for a project/counterparty pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchReason {
    ServiceArea,
    SevereDistressAccepted,
    EssentialServicePreferred,
    SingleAllocator,
    SponsorTrackRecord,
}

impl MatchReason {
    pub const fn label(self) -> &'static str {
        match self {
            MatchReason::ServiceArea => "Project is inside the service area",
            MatchReason::SevereDistressAccepted => "Accepts severely distressed tracts",
            MatchReason::EssentialServicePreferred => "Prefers essential-service projects",
            MatchReason::SingleAllocator => "At most one capital allocator in the structure",
            MatchReason::SponsorTrackRecord => "Sponsor has closed prior deals",
        }
    }
}

/// Additive, unclamped score for one pair plus the rules that contributed.
pub(crate) fn evaluate_pair(
    project: &Project,
    counterparty: &Counterparty,
    points: &MatchPoints,
) -> (u32, Vec<MatchReason>) {
    let mut score = 0;
    let mut reasons = Vec::new();

    if counterparty.serves(&project.location.region) {
        score += points.service_area;
        reasons.push(MatchReason::ServiceArea);
    }

    if counterparty.accepts_severe_distress && project.location.severely_distressed {
        score += points.severe_distress;
        reasons.push(MatchReason::SevereDistressAccepted);
    }

    if counterparty.prefers_essential_service && project.impact.essential_service {
        score += points.essential_service;
        reasons.push(MatchReason::EssentialServicePreferred);
    }

    if project.complexity.allocator_count <= 1 {
        score += points.single_allocator;
        reasons.push(MatchReason::SingleAllocator);
    }

    if project.sponsor.prior_deals >= 1 {
        score += points.sponsor_track_record;
        reasons.push(MatchReason::SponsorTrackRecord);
    }

    (score, reasons)
}
