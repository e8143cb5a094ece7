mod limit;
mod rules;

pub use limit::{limit_matches, LimitedMatches, DEFAULT_DISPLAY_CAP};
pub use rules::{MatchPoints, MatchReason};

use std::cmp::Reverse;

use serde::{Deserialize, Serialize};

use super::domain::{Counterparty, Project, ProjectId};

/// Coarse label for a match score, used to decide who gets notified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStrength {
    Weak,
    Fair,
    Good,
    Excellent,
}

impl MatchStrength {
    pub const fn from_score(score: u32) -> Self {
        if score >= 80 {
            MatchStrength::Excellent
        } else if score >= 60 {
            MatchStrength::Good
        } else if score >= 40 {
            MatchStrength::Fair
        } else {
            MatchStrength::Weak
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            MatchStrength::Weak => "weak",
            MatchStrength::Fair => "fair",
            MatchStrength::Good => "good",
            MatchStrength::Excellent => "excellent",
        }
    }

    pub const fn is_notifiable(self) -> bool {
        matches!(self, MatchStrength::Good | MatchStrength::Excellent)
    }
}

/// A counterparty ranked against one project. `rank` is 1-based.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub rank: usize,
    pub counterparty: Counterparty,
    pub score: u32,
    pub strength: MatchStrength,
    pub reasons: Vec<MatchReason>,
}

/// A project ranked for one counterparty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectMatch {
    pub rank: usize,
    pub project_id: ProjectId,
    pub project_name: String,
    pub score: u32,
    pub strength: MatchStrength,
    pub reasons: Vec<MatchReason>,
}

/// Applies the point table to project/counterparty pairs.
#[derive(Debug, Clone, Default)]
pub struct MatchEngine {
    points: MatchPoints,
}

impl MatchEngine {
    pub fn new(points: MatchPoints) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &MatchPoints {
        &self.points
    }

    /// Rank counterparties for a project, highest score first. Equal scores keep input order.
    pub fn match_counterparties(
        &self,
        project: &Project,
        counterparties: &[Counterparty],
    ) -> Vec<MatchResult> {
        let scored = counterparties.iter().map(|counterparty| {
            let (score, reasons) = rules::evaluate_pair(project, counterparty, &self.points);
            (counterparty, score, reasons)
        });

        rank_stable(scored)
            .into_iter()
            .enumerate()
            .map(|(index, (counterparty, score, reasons))| MatchResult {
                rank: index + 1,
                counterparty: counterparty.clone(),
                score,
                strength: MatchStrength::from_score(score),
                reasons,
            })
            .collect()
    }

    /// Rank projects for a counterparty with the same rules and tie-break.
    pub fn match_projects(
        &self,
        counterparty: &Counterparty,
        projects: &[Project],
    ) -> Vec<ProjectMatch> {
        let scored = projects.iter().map(|project| {
            let (score, reasons) = rules::evaluate_pair(project, counterparty, &self.points);
            (project, score, reasons)
        });

        rank_stable(scored)
            .into_iter()
            .enumerate()
            .map(|(index, (project, score, reasons))| ProjectMatch {
                rank: index + 1,
                project_id: project.id.clone(),
                project_name: project.name.clone(),
                score,
                strength: MatchStrength::from_score(score),
                reasons,
            })
            .collect()
    }
}

fn rank_stable<T>(
    scored: impl Iterator<Item = (T, u32, Vec<MatchReason>)>,
) -> Vec<(T, u32, Vec<MatchReason>)> {
    let mut ranked: Vec<_> = scored.collect();
    // `sort_by_key` is stable, so ties stay in input order.
    ranked.sort_by_key(|(_, score, _)| Reverse(*score));
    ranked
}

pub fn match_counterparties(
    project: &Project,
    counterparties: &[Counterparty],
) -> Vec<MatchResult> {
    MatchEngine::default().match_counterparties(project, counterparties)
}

pub fn match_projects(counterparty: &Counterparty, projects: &[Project]) -> Vec<ProjectMatch> {
    MatchEngine::default().match_projects(counterparty, projects)
}
