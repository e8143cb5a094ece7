use serde::{Deserialize, Serialize};

/// Composite weights. The four positive terms sum to 0.90 and complexity is subtracted
/// at 0.10, so a perfect project tops out at 90.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreWeights {
    pub distress: f64,
    pub impact: f64,
    pub readiness: f64,
    pub sponsor: f64,
    pub complexity_penalty: f64,
}

impl ScoreWeights {
    pub const STANDARD: Self = Self {
        distress: 0.30,
        impact: 0.25,
        readiness: 0.20,
        sponsor: 0.15,
        complexity_penalty: 0.10,
    };
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self::STANDARD
    }
}
