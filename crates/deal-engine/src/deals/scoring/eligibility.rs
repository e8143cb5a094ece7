use serde::{Deserialize, Serialize};

use super::super::domain::LocationProfile;

const LOW_INCOME_POVERTY_FLOOR: f64 = 20.0;
const LOW_INCOME_MEDIAN_CEILING: f64 = 80.0;
const DEEP_DISTRESS_POVERTY_FLOOR: f64 = 30.0;
const DEEP_DISTRESS_UNEMPLOYMENT_FLOOR: f64 = 15.0;
const QUALIFIED_TRACT_POVERTY_FLOOR: f64 = 25.0;

/// Program eligibility derived from tract statistics alone. These flags do not feed the
/// composite; they travel with the score for display and filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EligibilityFlags {
    pub low_income_community: bool,
    pub deep_distress_indicated: bool,
    pub qualified_census_tract: bool,
}

pub fn eligibility_flags(location: &LocationProfile) -> EligibilityFlags {
    EligibilityFlags {
        low_income_community: location.poverty_rate >= LOW_INCOME_POVERTY_FLOOR
            || location.median_income_ratio <= LOW_INCOME_MEDIAN_CEILING,
        deep_distress_indicated: location.poverty_rate >= DEEP_DISTRESS_POVERTY_FLOOR
            || location.unemployment_rate >= DEEP_DISTRESS_UNEMPLOYMENT_FLOOR,
        qualified_census_tract: location.poverty_rate >= QUALIFIED_TRACT_POVERTY_FLOOR,
    }
}
