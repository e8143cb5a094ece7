mod parser;

use crate::deals::batch::{BatchEntry, BatchFailure};
use crate::deals::domain::ManagementStrength;
use crate::deals::intake::{
    ComplexitySubmission, ImpactSubmission, LocationSubmission, ProjectSubmission,
    ReadinessSubmission, SponsorSubmission,
};
use std::io::Read;
use std::path::Path;
use tracing::warn;

use parser::{parse_count, parse_decimal, parse_flag, ProjectRow};

#[derive(Debug)]
pub enum ProjectImportError {
    Io(std::io::Error),
    Csv(csv::Error),
}

impl std::fmt::Display for ProjectImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProjectImportError::Io(err) => write!(f, "failed to read project export: {}", err),
            ProjectImportError::Csv(err) => write!(f, "invalid project CSV data: {}", err),
        }
    }
}

impl std::error::Error for ProjectImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ProjectImportError::Io(err) => Some(err),
            ProjectImportError::Csv(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for ProjectImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for ProjectImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// A data row dropped because one of its cells could not be read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedRow {
    pub line: usize,
    pub project_id: Option<String>,
    pub column: &'static str,
    pub value: String,
}

impl RejectedRow {
    pub fn into_failure(self) -> BatchFailure {
        let error = self.to_string();
        BatchFailure {
            project_id: self.project_id.unwrap_or_else(|| "unknown".to_string()),
            error,
        }
    }
}

impl std::fmt::Display for RejectedRow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "line {}: column `{}` has unreadable value `{}`",
            self.line, self.column, self.value
        )
    }
}

/// Rows read from one export, split into usable submissions and rejected rows.
#[derive(Debug, Default)]
pub struct ProjectImport {
    pub submissions: Vec<ProjectSubmission>,
    pub rejected: Vec<RejectedRow>,
}

impl ProjectImport {
    /// Batch entries for scoring; rejected rows become failures in the report.
    pub fn into_entries(self) -> impl Iterator<Item = BatchEntry> {
        self.submissions
            .into_iter()
            .map(Ok)
            .chain(self.rejected.into_iter().map(|row| Err(row.into_failure())))
    }
}

/// Reads a deal pipeline spreadsheet export into submissions ready for intake.
///
/// A row with an unreadable cell is rejected on its own; missing required fields are left for
/// [`ProjectIntake`](crate::deals::ProjectIntake) to report per project. Only I/O and CSV
/// structure errors fail the whole import.
pub struct ProjectCsvImporter;

impl ProjectCsvImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<ProjectImport, ProjectImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<ProjectImport, ProjectImportError> {
        let mut import = ProjectImport::default();

        for (index, row) in parser::parse_rows(reader)?.into_iter().enumerate() {
            // Line 1 is the header row.
            let cells = RowCells {
                line: index + 2,
                project_id: row.project_id.clone(),
            };
            match cells.submission(row) {
                Ok(submission) => import.submissions.push(submission),
                Err(rejected) => {
                    warn!(line = rejected.line, column = rejected.column, "rejected project row");
                    import.rejected.push(rejected);
                }
            }
        }

        Ok(import)
    }
}

struct RowCells {
    line: usize,
    project_id: Option<String>,
}

impl RowCells {
    fn submission(&self, row: ProjectRow) -> Result<ProjectSubmission, RejectedRow> {
        Ok(ProjectSubmission {
            project_id: row.project_id,
            name: row.project_name,
            location: LocationSubmission {
                region: row.state,
                poverty_rate: self.decimal("Poverty Rate", row.poverty_rate)?,
                median_income_ratio: self
                    .decimal("Median Income Ratio", row.median_income_ratio)?,
                unemployment_rate: self.decimal("Unemployment Rate", row.unemployment_rate)?,
                severely_distressed: self.flag("Severely Distressed", row.severely_distressed)?,
                non_metro: self.flag("Non Metro", row.non_metro)?,
            },
            impact: ImpactSubmission {
                jobs_created: self.count("Jobs Created", row.jobs_created)?,
                percent_low_income_served: self
                    .decimal("Percent Low Income Served", row.percent_low_income_served)?,
                essential_service: self.flag("Essential Service", row.essential_service)?,
                catalytic_impact: self.flag("Catalytic Impact", row.catalytic_impact)?,
                revitalization_area: self.flag("Revitalization Area", row.revitalization_area)?,
            },
            readiness: ReadinessSubmission {
                dscr: self.decimal("DSCR", row.dscr)?,
                site_control: self.flag("Site Control", row.site_control)?,
                permits_secured: self.flag("Permits Secured", row.permits_secured)?,
                funding_gap_percent: self.decimal("Funding Gap Percent", row.funding_gap_percent)?,
                other_financing_committed: self
                    .flag("Other Financing Committed", row.other_financing_committed)?,
            },
            sponsor: SponsorSubmission {
                years_operating: self.decimal("Years Operating", row.years_operating)?,
                net_assets: self.decimal("Net Assets", row.net_assets)?,
                prior_deals: self.count("Prior Deals", row.prior_deals)?,
                management_strength: self.parse(
                    "Management Strength",
                    row.management_strength,
                    ManagementStrength::parse,
                )?,
            },
            complexity: ComplexitySubmission {
                allocator_count: self.count("Allocator Count", row.allocator_count)?,
                state_credit: self.flag("State Credit", row.state_credit)?,
                historic_credit: self.flag("Historic Credit", row.historic_credit)?,
                brownfield: self.flag("Brownfield", row.brownfield)?,
                bridge_financing: self.flag("Bridge Financing", row.bridge_financing)?,
                mezzanine_financing: self.flag("Mezzanine Financing", row.mezzanine_financing)?,
                intercreditor_agreement: self
                    .flag("Intercreditor Agreement", row.intercreditor_agreement)?,
            },
        })
    }

    fn parse<T>(
        &self,
        column: &'static str,
        cell: Option<String>,
        parse: impl Fn(&str) -> Option<T>,
    ) -> Result<Option<T>, RejectedRow> {
        match cell {
            None => Ok(None),
            Some(value) => match parse(&value) {
                Some(parsed) => Ok(Some(parsed)),
                None => Err(RejectedRow {
                    line: self.line,
                    project_id: self.project_id.clone(),
                    column,
                    value,
                }),
            },
        }
    }

    fn decimal(
        &self,
        column: &'static str,
        cell: Option<String>,
    ) -> Result<Option<f64>, RejectedRow> {
        self.parse(column, cell, parse_decimal)
    }

    fn count(
        &self,
        column: &'static str,
        cell: Option<String>,
    ) -> Result<Option<u32>, RejectedRow> {
        self.parse(column, cell, parse_count)
    }

    fn flag(
        &self,
        column: &'static str,
        cell: Option<String>,
    ) -> Result<Option<bool>, RejectedRow> {
        self.parse(column, cell, parse_flag)
    }
}
