use crate::infra::{
    sample_counterparties, sample_projects, InMemoryDealProvider, LoggingMatchNotifier,
};
use chrono::Local;
use clap::Args;
use deal_engine::config::MatchingConfig;
use deal_engine::deals::{score_entries, DealScore, DealService, ScoreRecord};
use deal_engine::error::AppError;
use deal_engine::import::ProjectCsvImporter;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// Pipeline CSV export to score
    #[arg(long)]
    pub(crate) projects: PathBuf,
    /// Print the reason codes behind each score
    #[arg(long)]
    pub(crate) reasons: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Number of matches shown per project (defaults to the 3-deal rule)
    #[arg(long)]
    pub(crate) display_cap: Option<usize>,
    /// Skip the auto-match sweep at the end of the demo.
    #[arg(long)]
    pub(crate) skip_auto_match: bool,
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let ScoreArgs { projects, reasons } = args;

    let import = ProjectCsvImporter::from_path(&projects)?;
    let report = score_entries(import.into_entries());

    println!(
        "Scored {} of {} projects from {}",
        report.scores.len(),
        report.processed(),
        projects.display()
    );
    for score in &report.scores {
        render_score(score, reasons);
    }

    if !report.failures.is_empty() {
        println!("\nRejected rows:");
        for failure in &report.failures {
            println!("  - {}: {}", failure.project_id, failure.error);
        }
    }

    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        display_cap,
        skip_auto_match,
    } = args;

    let mut policy = MatchingConfig::default();
    if let Some(cap) = display_cap {
        policy.display_cap = cap;
    }

    let projects = sample_projects();
    let provider = Arc::new(InMemoryDealProvider::new(
        projects.clone(),
        sample_counterparties(),
    ));
    let notifier = Arc::new(LoggingMatchNotifier::default());
    let service = DealService::new(provider, notifier.clone(), policy);

    println!(
        "Deal engine demo ({})",
        Local::now().format("%Y-%m-%d %H:%M")
    );
    println!("\nPipeline scores");
    for project in &projects {
        match service.score_project(&project.id) {
            Ok(record) => render_record(&record),
            Err(err) => println!("  - {}: score unavailable ({})", project.id.0, err),
        }
    }

    println!(
        "\nCounterparty matches ({}-deal rule, minimum score {})",
        policy.display_cap, policy.min_score
    );
    for project in &projects {
        let limited = match service.matches_for_project(&project.id) {
            Ok(limited) => limited,
            Err(err) => {
                println!("  - {}: matching unavailable ({})", project.id.0, err);
                continue;
            }
        };

        println!(
            "  {} ({}): showing {} of {} qualifying counterparties",
            project.name,
            project.id.0,
            limited.results.len(),
            limited.total_found
        );
        for result in &limited.results {
            let reasons: Vec<&str> = result.reasons.iter().map(|reason| reason.label()).collect();
            println!(
                "    {}. {} - {} ({}) | {}",
                result.rank,
                result.counterparty.name,
                result.score,
                result.strength.label(),
                reasons.join("; ")
            );
        }
    }

    if skip_auto_match {
        return Ok(());
    }

    println!("\nAuto-match sweep");
    let summary = match service.run_auto_match() {
        Ok(summary) => summary,
        Err(err) => {
            println!("  Sweep unavailable: {}", err);
            return Ok(());
        }
    };
    println!(
        "- {} projects processed | {} matches surfaced | {} alerts sent | {} alerts failed",
        summary.processed, summary.matches, summary.notified, summary.notify_failures
    );
    for failure in &summary.failures {
        println!("  Skipped {}: {}", failure.project_id, failure.error);
    }

    let events = notifier.events();
    if events.is_empty() {
        println!("  Match alerts: none dispatched");
    } else {
        println!("  Match alerts:");
        for alert in events {
            println!(
                "    - template={} -> {} for {}",
                alert.template, alert.counterparty_id.0, alert.project_id.0
            );
        }
    }

    Ok(())
}

fn render_record(record: &ScoreRecord) {
    render_score(&record.score, true);
    println!(
        "    model {} | computed {}",
        record.model_version,
        record
            .computed_at
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M:%S")
    );
}

fn render_score(score: &DealScore, with_reasons: bool) {
    let sub = &score.sub_scores;
    println!(
        "  - {}: {:.2} -> {}",
        score.project_id.0, score.composite, score.tier
    );
    println!(
        "    distress {:.1} | impact {:.1} | readiness {:.1} | sponsor {:.1} | complexity {:.1}",
        sub.distress, sub.impact, sub.readiness, sub.sponsor, sub.complexity
    );

    let flags = score.eligibility;
    println!(
        "    low-income community: {} | deep distress: {} | qualified tract: {}",
        yes_no(flags.low_income_community),
        yes_no(flags.deep_distress_indicated),
        yes_no(flags.qualified_census_tract)
    );

    if with_reasons {
        for label in score.reason_labels() {
            println!("    * {}", label);
        }
    }
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}
