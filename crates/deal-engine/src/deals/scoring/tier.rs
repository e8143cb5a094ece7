use serde::{Deserialize, Serialize};

const GREENLIGHT_FLOOR: f64 = 75.0;
const REVIEW_FLOOR: f64 = 60.0;
const CONDITIONAL_FLOOR: f64 = 40.0;

/// Decision bucket derived from the composite score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DealTier {
    Greenlight,
    Review,
    Conditional,
    Reject,
}

impl DealTier {
    /// First matching floor wins; anything below the conditional floor, negative composites
    /// included, is rejected.
    pub fn classify(composite: f64) -> Self {
        if composite >= GREENLIGHT_FLOOR {
            DealTier::Greenlight
        } else if composite >= REVIEW_FLOOR {
            DealTier::Review
        } else if composite >= CONDITIONAL_FLOOR {
            DealTier::Conditional
        } else {
            DealTier::Reject
        }
    }

    pub const fn number(self) -> u8 {
        match self {
            DealTier::Greenlight => 1,
            DealTier::Review => 2,
            DealTier::Conditional => 3,
            DealTier::Reject => 4,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            DealTier::Greenlight => "Tier 1 – Greenlight",
            DealTier::Review => "Tier 2 – Review",
            DealTier::Conditional => "Tier 3 – Conditional",
            DealTier::Reject => "Tier 4 – Reject",
        }
    }
}

impl std::fmt::Display for DealTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
