use serde::{Deserialize, Deserializer};
use std::io::Read;

/// One spreadsheet row with every cell still in its raw, trimmed form.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ProjectRow {
    #[serde(rename = "Project ID", default, deserialize_with = "empty_string_as_none")]
    pub(crate) project_id: Option<String>,
    #[serde(rename = "Project Name", default, deserialize_with = "empty_string_as_none")]
    pub(crate) project_name: Option<String>,
    #[serde(rename = "State", default, deserialize_with = "empty_string_as_none")]
    pub(crate) state: Option<String>,

    #[serde(rename = "Poverty Rate", default, deserialize_with = "empty_string_as_none")]
    pub(crate) poverty_rate: Option<String>,
    #[serde(
        rename = "Median Income Ratio",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    pub(crate) median_income_ratio: Option<String>,
    #[serde(
        rename = "Unemployment Rate",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    pub(crate) unemployment_rate: Option<String>,
    #[serde(
        rename = "Severely Distressed",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    pub(crate) severely_distressed: Option<String>,
    #[serde(rename = "Non Metro", default, deserialize_with = "empty_string_as_none")]
    pub(crate) non_metro: Option<String>,

    #[serde(rename = "Jobs Created", default, deserialize_with = "empty_string_as_none")]
    pub(crate) jobs_created: Option<String>,
    #[serde(
        rename = "Percent Low Income Served",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    pub(crate) percent_low_income_served: Option<String>,
    #[serde(
        rename = "Essential Service",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    pub(crate) essential_service: Option<String>,
    #[serde(
        rename = "Catalytic Impact",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    pub(crate) catalytic_impact: Option<String>,
    #[serde(
        rename = "Revitalization Area",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    pub(crate) revitalization_area: Option<String>,

    #[serde(rename = "DSCR", default, deserialize_with = "empty_string_as_none")]
    pub(crate) dscr: Option<String>,
    #[serde(rename = "Site Control", default, deserialize_with = "empty_string_as_none")]
    pub(crate) site_control: Option<String>,
    #[serde(
        rename = "Permits Secured",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    pub(crate) permits_secured: Option<String>,
    #[serde(
        rename = "Funding Gap Percent",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    pub(crate) funding_gap_percent: Option<String>,
    #[serde(
        rename = "Other Financing Committed",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    pub(crate) other_financing_committed: Option<String>,

    #[serde(
        rename = "Years Operating",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    pub(crate) years_operating: Option<String>,
    #[serde(rename = "Net Assets", default, deserialize_with = "empty_string_as_none")]
    pub(crate) net_assets: Option<String>,
    #[serde(rename = "Prior Deals", default, deserialize_with = "empty_string_as_none")]
    pub(crate) prior_deals: Option<String>,
    #[serde(
        rename = "Management Strength",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    pub(crate) management_strength: Option<String>,

    #[serde(
        rename = "Allocator Count",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    pub(crate) allocator_count: Option<String>,
    #[serde(rename = "State Credit", default, deserialize_with = "empty_string_as_none")]
    pub(crate) state_credit: Option<String>,
    #[serde(
        rename = "Historic Credit",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    pub(crate) historic_credit: Option<String>,
    #[serde(rename = "Brownfield", default, deserialize_with = "empty_string_as_none")]
    pub(crate) brownfield: Option<String>,
    #[serde(
        rename = "Bridge Financing",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    pub(crate) bridge_financing: Option<String>,
    #[serde(
        rename = "Mezzanine Financing",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    pub(crate) mezzanine_financing: Option<String>,
    #[serde(
        rename = "Intercreditor Agreement",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    pub(crate) intercreditor_agreement: Option<String>,
}

pub(crate) fn parse_rows<R: Read>(reader: R) -> Result<Vec<ProjectRow>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    csv_reader.deserialize::<ProjectRow>().collect()
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

/// Spreadsheet-style booleans. `None` means the cell could not be read as one.
pub(crate) fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "y" | "1" => Some(true),
        "false" | "no" | "n" | "0" => Some(false),
        _ => None,
    }
}

/// Numbers may carry thousands separators, a leading `$`, or a trailing `%`.
pub(crate) fn parse_decimal(value: &str) -> Option<f64> {
    let cleaned: String = value
        .trim()
        .trim_start_matches('$')
        .trim_end_matches('%')
        .chars()
        .filter(|ch| *ch != ',')
        .collect();
    cleaned.trim().parse::<f64>().ok()
}

pub(crate) fn parse_count(value: &str) -> Option<u32> {
    let cleaned: String = value.trim().chars().filter(|ch| *ch != ',').collect();
    cleaned.parse::<u32>().ok()
}
