//! CLI entry point for the financial records quality checker.

use anyhow::Result;
use clap::Parser;
use dotenv::dotenv;
use fin_quality::{
    DatasetFormat, QualityChecker, QualityDimension, QualityRun, QualitySummary, load_dataset,
    save_dataset, save_summary_report,
};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Data quality checks for corporate financial records",
    long_about = "Evaluates a financial records extract for completeness, consistency,\n\
                  validity and uniqueness, appends per-record flag columns and writes a\n\
                  JSON quality summary.\n\n\
                  ENVIRONMENT VARIABLES:\n  \
                  RUST_LOG              Overrides --log-level (also read from .env)\n\n\
                  EXAMPLES:\n  \
                  # Check the default sample extract\n  \
                  fin-quality\n\n  \
                  # Check a Parquet file and write the report elsewhere\n  \
                  fin-quality -i records.parquet -r reports/quality.json\n\n  \
                  # Evaluate only, write nothing\n  \
                  fin-quality -i records.csv --dry-run\n\n  \
                  # Machine-readable summary\n  \
                  fin-quality -i records.csv --json | jq .overall_quality_score"
)]
struct Args {
    /// Path to the dataset to check (CSV or Parquet)
    #[arg(short, long, default_value = "CaseStudy_Quality_sample25.csv")]
    input: String,

    /// Path for the annotated dataset
    ///
    /// Defaults to "<input-stem>_checked.<ext>" next to the input
    #[arg(short, long)]
    output: Option<String>,

    /// Path for the JSON summary report
    #[arg(short, long, default_value = "quality_summary_report.json")]
    report: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Suppress progress output (only show warnings, errors and the final result)
    #[arg(short, long)]
    quiet: bool,

    /// Print the summary JSON to stdout instead of the human-readable summary
    ///
    /// Disables all logging so stdout carries only the JSON report.
    #[arg(long)]
    json: bool,

    /// Evaluate and print the summary without writing any file
    #[arg(long)]
    dry_run: bool,
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is completely disabled to ensure
/// only JSON is written to stdout.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    // .env first so RUST_LOG from it reaches the filter
    dotenv().ok();

    let args = Args::parse();
    init_logging(&args.log_level, args.quiet, args.json);

    let mut data = load_dataset(&args.input)?;

    let checker = QualityChecker::default();
    let run = checker.run_all_checks(&mut data)?;
    let summary = checker.generate_quality_summary(&data, &run);

    if args.dry_run {
        debug!("Dry run: skipping output files");
    } else {
        let output = args
            .output
            .clone()
            .map(PathBuf::from)
            .unwrap_or_else(|| default_output_path(&args.input));
        save_dataset(&mut data, &output)?;
        save_summary_report(&summary, &args.report)?;
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    info!("Data quality check completed successfully!");
    print_human_readable_summary(&summary, &run, &args);

    Ok(())
}

/// `<stem>_checked.<ext>` next to the input, keeping the input's format.
fn default_output_path(input: &str) -> PathBuf {
    let path = Path::new(input);
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("dataset");
    let extension = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or_else(|| DatasetFormat::from_path(path).extension());

    path.with_file_name(format!("{stem}_checked.{extension}"))
}

/// Print a human-readable summary of the run.
///
/// Uses `println!` so the summary is visible regardless of log level.
fn print_human_readable_summary(summary: &QualitySummary, run: &QualityRun, args: &Args) {
    println!();
    println!("{}", "=".repeat(60));
    println!("DATA QUALITY SUMMARY");
    println!("{}", "=".repeat(60));
    println!("Total Records: {}", summary.total_records);
    println!(
        "Overall Quality Score: {:.2}",
        summary.overall_quality_score
    );
    println!();

    for dimension in QualityDimension::ALL {
        if let Some(measure) = summary.quality_measures.get(&dimension) {
            println!(
                "{}: {} issues ({:.2}%)",
                dimension.display_name(),
                measure.total_issues,
                measure.percentage
            );
        }
        for line in rule_breakdown(run, dimension) {
            println!("  - {line}");
        }
    }
    println!();

    if args.dry_run {
        println!("Dry run: no files written");
    } else {
        println!("Summary report: {}", args.report);
    }
    println!("{}", "=".repeat(60));
}

/// One `rule: count` line per rule that flagged records in `dimension`.
fn rule_breakdown(run: &QualityRun, dimension: QualityDimension) -> Vec<String> {
    run.outcome(dimension)
        .map(|outcome| {
            outcome
                .rule_counts()
                .into_iter()
                .map(|(rule, count)| format!("{}: {}", rule.name(), count))
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_output_path_keeps_extension() {
        assert_eq!(
            default_output_path("data/CaseStudy_Quality_sample25.csv"),
            PathBuf::from("data/CaseStudy_Quality_sample25_checked.csv")
        );
        assert_eq!(
            default_output_path("records.parquet"),
            PathBuf::from("records_checked.parquet")
        );
    }

    #[test]
    fn test_default_output_path_without_extension() {
        assert_eq!(
            default_output_path("records"),
            PathBuf::from("records_checked.csv")
        );
    }

    #[test]
    fn test_rule_breakdown_lists_triggered_rules() {
        use fin_quality::{DimensionOutcome, DimensionResult, RuleKind, RuleViolation};

        let violation = |rule| Some(RuleViolation::new(rule, "timevalue"));
        let run = QualityRun {
            outcomes: vec![DimensionOutcome {
                dimension: QualityDimension::Validity,
                result: DimensionResult::new(3, 4, "desc"),
                violations: vec![
                    violation(RuleKind::YearRange),
                    None,
                    violation(RuleKind::RevenueRange),
                    violation(RuleKind::YearRange),
                ],
            }],
        };

        assert_eq!(
            rule_breakdown(&run, QualityDimension::Validity),
            vec!["year_range: 2", "revenue_range: 1"]
        );
        assert!(rule_breakdown(&run, QualityDimension::Uniqueness).is_empty());
    }

    #[test]
    fn test_missing_input_reports_load_failure() {
        let err = load_dataset("no/such/input.csv").unwrap_err();
        assert!(matches!(err, fin_quality::QualityError::LoadFailed { .. }));
    }

    #[test]
    fn test_args_defaults() {
        let args = Args::parse_from(["fin-quality"]);
        assert_eq!(args.input, "CaseStudy_Quality_sample25.csv");
        assert_eq!(args.report, "quality_summary_report.json");
        assert!(args.output.is_none());
        assert!(!args.dry_run && !args.json && !args.quiet);
    }
}
